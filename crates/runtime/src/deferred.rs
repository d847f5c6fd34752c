use crate::tick::Tick;

/// One-shot actions postponed to a later reconciliation pass.
///
/// Actions become due on the first tick strictly after the one they were
/// scheduled on, and are handed out in scheduling order exactly once.
#[derive(Debug)]
pub struct DeferredQueue<A> {
    next_order: u64,
    pending: Vec<(Tick, u64, A)>,
}

impl<A> Default for DeferredQueue<A> {
    fn default() -> Self {
        Self {
            next_order: 0,
            pending: Vec::new(),
        }
    }
}

impl<A> DeferredQueue<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` to run on the tick after `now`.
    pub fn defer(&mut self, now: Tick, action: A) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);
        self.pending.push((now.next(), order, action));
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every action due at or before `now`.
    pub fn take_due(&mut self, now: Tick) -> Vec<A> {
        let mut due = Vec::new();
        let mut keep = Vec::with_capacity(self.pending.len());
        for (at, order, action) in self.pending.drain(..) {
            if at <= now {
                due.push((order, action));
            } else {
                keep.push((at, order, action));
            }
        }
        self.pending = keep;
        due.sort_by_key(|(order, _)| *order);
        due.into_iter().map(|(_, action)| action).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::DeferredQueue;
    use crate::tick::Tick;

    #[test]
    fn actions_are_not_due_on_the_scheduling_tick() {
        let mut q = DeferredQueue::new();
        q.defer(Tick::new(3), "a");
        assert!(q.take_due(Tick::new(3)).is_empty());
        assert_eq!(q.take_due(Tick::new(4)), vec!["a"]);
        assert!(q.is_empty());
    }

    #[test]
    fn due_actions_run_once_in_scheduling_order() {
        let mut q = DeferredQueue::new();
        q.defer(Tick::new(0), "a");
        q.defer(Tick::new(1), "c");
        q.defer(Tick::new(0), "b");

        assert_eq!(q.take_due(Tick::new(5)), vec!["a", "c", "b"]);
        assert!(q.take_due(Tick::new(6)).is_empty());
    }

    #[test]
    fn later_actions_stay_queued() {
        let mut q = DeferredQueue::new();
        q.defer(Tick::new(0), 1);
        q.defer(Tick::new(4), 2);
        assert_eq!(q.take_due(Tick::new(1)), vec![1]);
        assert!(!q.is_empty());
        assert_eq!(q.take_due(Tick::new(5)), vec![2]);
    }
}

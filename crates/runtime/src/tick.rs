use serde::{Deserialize, Serialize};

/// Reconciliation pass counter.
///
/// Every externally delivered notification is processed inside exactly one
/// tick. Deferred work is keyed on tick indices so it stays replayable.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tick {
    /// 0-based pass index.
    pub index: u64,
}

impl Tick {
    pub fn new(index: u64) -> Self {
        Self { index }
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::Tick;

    #[test]
    fn next_advances_index() {
        let t0 = Tick::new(0);
        assert_eq!(t0.next(), Tick::new(1));
        assert!(t0.next() > t0);
    }
}

use serde::Serialize;

use crate::tick::Tick;

/// User-visible, dismissible conditions raised by the core.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// The vector style endpoint is missing or malformed; the map fell back to raster.
    Configuration,
    /// Location access was denied or restricted.
    PermissionDenied,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub tick: u64,
    pub kind: NoticeKind,
    pub message: String,
}

/// Collects notices until the presentation layer drains them.
#[derive(Debug, Default)]
pub struct NoticeBus {
    notices: Vec<Notice>,
}

impl NoticeBus {
    pub fn new() -> Self {
        Self {
            notices: Vec::new(),
        }
    }

    pub fn emit(&mut self, tick: Tick, kind: NoticeKind, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(tick = tick.index, ?kind, %message, "notice raised");
        self.notices.push(Notice {
            tick: tick.index,
            kind,
            message,
        });
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
mod tests {
    use super::{NoticeBus, NoticeKind};
    use crate::tick::Tick;

    #[test]
    fn records_notices_with_tick_index() {
        let mut bus = NoticeBus::new();
        bus.emit(Tick::new(2), NoticeKind::PermissionDenied, "denied");
        assert_eq!(bus.notices().len(), 1);
        assert_eq!(bus.notices()[0].tick, 2);
        assert_eq!(bus.notices()[0].kind, NoticeKind::PermissionDenied);
    }

    #[test]
    fn drain_clears_notices() {
        let mut bus = NoticeBus::new();
        bus.emit(Tick::new(0), NoticeKind::Configuration, "m");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.notices().is_empty());
    }
}

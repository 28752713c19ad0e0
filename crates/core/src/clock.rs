//! Logical-clock timers owned by a session.
//!
//! Three activities share a session: the countdown, the physics cascade and
//! the crush deadline. Each is a single optional due time on the session's
//! millisecond clock. Dropping or clearing the [`Timers`] value cancels all of
//! them at once, so nothing scheduled for an old level can reach a new one.

/// Scheduled activity kinds, in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    Crush,
    Countdown,
    Physics,
}

impl TimerKind {
    const ALL: [TimerKind; 3] = [TimerKind::Crush, TimerKind::Countdown, TimerKind::Physics];
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timers {
    crush: Option<u64>,
    countdown: Option<u64>,
    physics: Option<u64>,
}

impl Timers {
    fn slot(&self, kind: TimerKind) -> Option<u64> {
        match kind {
            TimerKind::Crush => self.crush,
            TimerKind::Countdown => self.countdown,
            TimerKind::Physics => self.physics,
        }
    }

    fn slot_mut(&mut self, kind: TimerKind) -> &mut Option<u64> {
        match kind {
            TimerKind::Crush => &mut self.crush,
            TimerKind::Countdown => &mut self.countdown,
            TimerKind::Physics => &mut self.physics,
        }
    }

    /// Schedule `kind` at `at`, replacing any pending due time.
    pub fn schedule(&mut self, kind: TimerKind, at: u64) {
        *self.slot_mut(kind) = Some(at);
    }

    /// Schedule `kind` at `at` unless it is already pending.
    ///
    /// Returns true if this call scheduled it.
    pub fn schedule_if_idle(&mut self, kind: TimerKind, at: u64) -> bool {
        let slot = self.slot_mut(kind);
        if slot.is_some() {
            return false;
        }
        *slot = Some(at);
        true
    }

    /// Returns true if `kind` was pending.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        self.slot_mut(kind).take().is_some()
    }

    pub fn cancel_all(&mut self) {
        *self = Self::default();
    }

    pub fn due_at(&self, kind: TimerKind) -> Option<u64> {
        self.slot(kind)
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.slot(kind).is_some()
    }

    /// Remove and return the earliest timer due at or before `limit`.
    ///
    /// Ties resolve crush, then countdown, then physics.
    pub fn pop_due(&mut self, limit: u64) -> Option<(u64, TimerKind)> {
        let (due, kind) = TimerKind::ALL
            .into_iter()
            .filter_map(|kind| self.slot(kind).map(|due| (due, kind)))
            .filter(|&(due, _)| due <= limit)
            .min_by_key(|&(due, kind)| (due, kind as u8))?;
        *self.slot_mut(kind) = None;
        Some((due, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_due_in_time_order() {
        let mut t = Timers::default();
        t.schedule(TimerKind::Physics, 100);
        t.schedule(TimerKind::Countdown, 1000);
        t.schedule(TimerKind::Crush, 500);

        assert_eq!(t.pop_due(2000), Some((100, TimerKind::Physics)));
        assert_eq!(t.pop_due(2000), Some((500, TimerKind::Crush)));
        assert_eq!(t.pop_due(2000), Some((1000, TimerKind::Countdown)));
        assert_eq!(t.pop_due(2000), None);
    }

    #[test]
    fn test_pop_due_respects_limit() {
        let mut t = Timers::default();
        t.schedule(TimerKind::Countdown, 1000);
        assert_eq!(t.pop_due(999), None);
        assert!(t.is_pending(TimerKind::Countdown));
        assert_eq!(t.pop_due(1000), Some((1000, TimerKind::Countdown)));
    }

    #[test]
    fn test_ties_prefer_crush() {
        let mut t = Timers::default();
        t.schedule(TimerKind::Physics, 500);
        t.schedule(TimerKind::Countdown, 500);
        t.schedule(TimerKind::Crush, 500);
        assert_eq!(t.pop_due(500).map(|(_, k)| k), Some(TimerKind::Crush));
        assert_eq!(t.pop_due(500).map(|(_, k)| k), Some(TimerKind::Countdown));
        assert_eq!(t.pop_due(500).map(|(_, k)| k), Some(TimerKind::Physics));
    }

    #[test]
    fn test_schedule_if_idle_is_idempotent() {
        let mut t = Timers::default();
        assert!(t.schedule_if_idle(TimerKind::Crush, 500));
        assert!(!t.schedule_if_idle(TimerKind::Crush, 900));
        assert_eq!(t.due_at(TimerKind::Crush), Some(500));
    }

    #[test]
    fn test_cancel_all() {
        let mut t = Timers::default();
        t.schedule(TimerKind::Crush, 1);
        t.schedule(TimerKind::Physics, 2);
        t.cancel_all();
        assert_eq!(t, Timers::default());
        assert!(!t.cancel(TimerKind::Crush));
    }
}

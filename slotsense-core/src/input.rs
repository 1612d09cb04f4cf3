//! Input debouncing and slot navigation
//!
//! Converts raw press events (delivered from interrupt context by the
//! platform adapter) into logical actions. The debounce check-and-update is
//! not atomic by itself; the adapter wraps the whole controller in a mutex
//! so concurrent deliveries of the same input cannot interleave.

/// Logical input source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Move the selection cursor towards slot 1
    Previous,
    /// Move the selection cursor towards slot N
    Next,
    /// Toggle occupancy of the selected slot
    Select,
}

impl InputKind {
    const COUNT: usize = 3;

    const fn index(self) -> usize {
        match self {
            InputKind::Previous => 0,
            InputKind::Next => 1,
            InputKind::Select => 2,
        }
    }
}

/// Time-based debounce filter, one window per logical input
#[derive(Debug)]
pub struct Debouncer {
    window_ms: u64,
    last_accepted_ms: [Option<u64>; InputKind::COUNT],
}

impl Debouncer {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_accepted_ms: [None; InputKind::COUNT],
        }
    }

    /// Check a raw press event at time `now_ms`
    ///
    /// Returns true and records the timestamp when the event is accepted.
    /// Events closer than the window to the last accepted one are ignored;
    /// an event exactly at the window boundary is accepted.
    pub fn accept(&mut self, kind: InputKind, now_ms: u64) -> bool {
        let last = &mut self.last_accepted_ms[kind.index()];
        if let Some(prev) = *last {
            if now_ms.saturating_sub(prev) < self.window_ms {
                return false;
            }
        }
        *last = Some(now_ms);
        true
    }
}

/// Selection cursor over the N slots, bounded to `[0, N-1]`
#[derive(Debug, Default)]
pub struct Navigator<const N: usize> {
    cursor: usize,
}

impl<const N: usize> Navigator<N> {
    pub fn new() -> Self {
        Self { cursor: 0 }
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move towards slot 1, saturating at index 0
    pub fn previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move towards slot N, saturating at index N-1
    pub fn next(&mut self) {
        if self.cursor + 1 < N {
            self.cursor += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_event_is_always_accepted() {
        let mut debouncer = Debouncer::new(270);
        assert!(debouncer.accept(InputKind::Select, 0));
    }

    #[test]
    fn events_inside_window_are_ignored() {
        let mut debouncer = Debouncer::new(270);
        assert!(debouncer.accept(InputKind::Select, 1000));
        assert!(!debouncer.accept(InputKind::Select, 1100));
        assert!(!debouncer.accept(InputKind::Select, 1269));
    }

    #[test]
    fn event_at_window_boundary_is_accepted() {
        let mut debouncer = Debouncer::new(270);
        assert!(debouncer.accept(InputKind::Select, 1000));
        assert!(debouncer.accept(InputKind::Select, 1270));
        assert!(debouncer.accept(InputKind::Select, 1540));
    }

    #[test]
    fn inputs_are_debounced_independently() {
        let mut debouncer = Debouncer::new(270);
        assert!(debouncer.accept(InputKind::Previous, 1000));
        assert!(debouncer.accept(InputKind::Next, 1001));
        assert!(debouncer.accept(InputKind::Select, 1002));
        assert!(!debouncer.accept(InputKind::Previous, 1003));
    }

    #[test]
    fn rejected_event_does_not_reset_the_window() {
        let mut debouncer = Debouncer::new(270);
        assert!(debouncer.accept(InputKind::Select, 1000));
        assert!(!debouncer.accept(InputKind::Select, 1200));
        // Window is measured from the accepted event at t=1000
        assert!(debouncer.accept(InputKind::Select, 1270));
    }

    #[test]
    fn cursor_saturates_at_both_ends() {
        let mut nav = Navigator::<4>::new();
        assert_eq!(nav.cursor(), 0);
        nav.previous();
        assert_eq!(nav.cursor(), 0);

        for _ in 0..10 {
            nav.next();
        }
        assert_eq!(nav.cursor(), 3);
        nav.previous();
        assert_eq!(nav.cursor(), 2);
    }
}

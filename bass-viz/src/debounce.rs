/// Debounce for a mechanical button on an edge interrupt.
///
/// Two states: idle, and pending confirmation. A rising edge while idle asks
/// the caller to arm a one-shot timer; when that timer fires, the press
/// counts only if the line level read at that moment is still asserted.
/// Anything else is contact noise and is discarded. Release edges need no
/// debounce and are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Pending,
}

pub struct ButtonDebouncer {
    state: State,
}

impl ButtonDebouncer {
    pub const fn new() -> Self {
        Self { state: State::Idle }
    }

    /// Feed an edge interrupt with the level read at interrupt time.
    /// Returns true when the caller should arm the debounce timer. Edges
    /// arriving while a check is already pending are swallowed.
    pub fn on_edge(&mut self, level_high: bool) -> bool {
        if self.state == State::Pending || !level_high {
            return false;
        }
        self.state = State::Pending;
        true
    }

    /// Feed the timer expiry with the level read right now. Returns true if
    /// the press is confirmed.
    pub fn on_timer(&mut self, level_high: bool) -> bool {
        let pending = self.state == State::Pending;
        self.state = State::Idle;
        pending && level_high
    }

    pub fn is_pending(&self) -> bool {
        self.state == State::Pending
    }
}

impl Default for ButtonDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_press_is_confirmed() {
        let mut button = ButtonDebouncer::new();
        assert!(button.on_edge(true));
        assert!(button.is_pending());
        assert!(button.on_timer(true));
        assert!(!button.is_pending());
    }

    #[test]
    fn test_bounce_that_settles_low_is_discarded() {
        let mut button = ButtonDebouncer::new();
        assert!(button.on_edge(true));
        assert!(!button.on_timer(false));
    }

    #[test]
    fn test_release_edge_is_ignored() {
        let mut button = ButtonDebouncer::new();
        assert!(!button.on_edge(false));
        assert!(!button.is_pending());
    }

    #[test]
    fn test_edges_while_pending_are_swallowed() {
        let mut button = ButtonDebouncer::new();
        assert!(button.on_edge(true));
        assert!(!button.on_edge(true));
        assert!(button.on_timer(true));
    }

    #[test]
    fn test_spurious_timer_confirms_nothing() {
        let mut button = ButtonDebouncer::new();
        assert!(!button.on_timer(true));
    }
}

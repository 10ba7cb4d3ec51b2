use crate::clock::Millis;

/// A display-only value that settles after a quiet window.
///
/// Each `schedule` restarts the window; the pending sample is committed by a
/// later `poll` once the window has passed. Nothing here feeds the final
/// result.
#[derive(Debug, Clone)]
pub struct Debounced<T> {
    shown: T,
    pending: Option<(T, Millis)>,
    window_ms: u64,
}

impl<T: Copy + Default> Debounced<T> {
    pub fn new(window_ms: u64) -> Self {
        Self {
            shown: T::default(),
            pending: None,
            window_ms,
        }
    }

    pub fn schedule(&mut self, value: T, now: Millis) {
        self.pending = Some((value, now + self.window_ms));
    }

    /// Commit the pending sample if its window has elapsed.
    pub fn poll(&mut self, now: Millis) -> bool {
        match self.pending {
            Some((value, due)) if now >= due => {
                self.shown = value;
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Show `value` immediately, dropping anything pending.
    pub fn set(&mut self, value: T) {
        self.shown = value;
        self.pending = None;
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn clear(&mut self) {
        self.set(T::default());
    }

    pub fn value(&self) -> T {
        self.shown
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_settles_after_window() {
        let mut wpm = Debounced::<f64>::new(250);
        wpm.schedule(42.0, 1_000);

        assert!(!wpm.poll(1_100));
        assert_eq!(wpm.value(), 0.0);

        assert!(wpm.poll(1_250));
        assert_eq!(wpm.value(), 42.0);
        assert!(!wpm.is_pending());
    }

    #[test]
    fn test_reschedule_restarts_window() {
        let mut wpm = Debounced::<f64>::new(250);
        wpm.schedule(10.0, 0);
        wpm.schedule(20.0, 200);

        assert!(!wpm.poll(300));
        assert!(wpm.poll(450));
        assert_eq!(wpm.value(), 20.0);
    }

    #[test]
    fn test_cancel_drops_pending() {
        let mut wpm = Debounced::<f64>::new(250);
        wpm.schedule(10.0, 0);
        wpm.cancel();
        assert!(!wpm.poll(1_000));
        assert_eq!(wpm.value(), 0.0);
    }

    #[test]
    fn test_zero_window_commits_on_next_poll() {
        let mut wpm = Debounced::<f64>::new(0);
        wpm.schedule(7.0, 10);
        assert!(wpm.poll(10));
        assert_eq!(wpm.value(), 7.0);
    }
}

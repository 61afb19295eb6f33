//! Cooperative cancellation (§5, §6 "Interrupted").
//!
//! The core never spawns a signal handler thread of its own; it exposes a one-shot flag that an
//! embedder (the CLI binary, e.g.) arms via [`Termination::install_signal_handler`], plus an
//! optional wall-clock deadline. Both are checked from the top of every recursive search frame.

use std::io;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

#[derive(Debug, Clone)]
pub(crate) struct Termination {
    deadline: Option<Instant>,
    interrupted: Arc<AtomicBool>,
}

impl Termination {
    /// No deadline; stops only on interrupt.
    pub(crate) fn unbounded() -> Self {
        Termination {
            deadline: None,
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A deadline starting now.
    pub(crate) fn starting_now(budget: Duration) -> Self {
        Termination {
            deadline: Some(Instant::now() + budget),
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Arms `SIGINT`/`SIGTERM` to raise the interrupt flag this condition checks. Errors only if
    /// the process cannot register a signal handler at all.
    pub(crate) fn install_signal_handler(&self) -> io::Result<()> {
        signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&self.interrupted))?;
        signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&self.interrupted))?;
        Ok(())
    }

    /// For tests and embedders that want to raise the flag themselves without going through the
    /// OS (§9 "Randomness" sibling concern: reproducible, signal-free interruption).
    #[allow(unused, reason = "used by tests exercising interrupt handling")]
    pub(crate) fn interrupt(&self) {
        self.interrupted.store(true, Ordering::Relaxed);
    }

    pub(crate) fn should_stop(&self) -> bool {
        self.was_interrupted()
            || self
                .deadline
                .is_some_and(|deadline| Instant::now() >= deadline)
    }

    pub(crate) fn was_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_never_stops_on_its_own() {
        let termination = Termination::unbounded();
        assert!(!termination.should_stop());
    }

    #[test]
    fn interrupt_is_observed() {
        let termination = Termination::unbounded();
        assert!(!termination.should_stop());
        termination.interrupt();
        assert!(termination.should_stop());
    }

    #[test]
    fn expired_budget_stops() {
        let termination = Termination::starting_now(Duration::from_millis(0));
        std::thread::sleep(Duration::from_millis(5));
        assert!(termination.should_stop());
    }
}

// ── Operation lifecycle ───────────────────────────────────────────────────────
//
// Every top-level operation (write, read, notify) walks the same state
// machine:
//
//   Idle → Loading → Ready → Operating → Closing → Idle
//             │        │                   │
//             └────────┴─────→ Failed ←────┘ → Idle
//
// Operating is only reachable through Ready, i.e. after the module loaded
// and the entry points resolved.  Pure state; no I/O.

use log::{debug, error};

/// One state of a top-level operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Idle,
    /// Acquiring the capability module and resolving entry points.
    Loading,
    /// Entry points resolved; nothing transferred or shown yet.
    Ready,
    /// The transfer or dialog call is in progress.
    Operating,
    /// Releasing the handle.
    Closing,
    Failed,
}

impl Phase {
    /// Whether `self → next` is an edge of the state machine.
    pub(crate) fn can_advance_to(self, next: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, next),
            (Idle, Loading)
                | (Loading, Ready)
                | (Ready, Operating)
                | (Operating, Closing)
                | (Closing, Idle)
                | (Loading, Failed)
                | (Ready, Failed)
                | (Closing, Failed)
                | (Failed, Idle)
        )
    }
}

/// Records the phases one operation passes through.
#[derive(Debug, Clone)]
pub(crate) struct Lifecycle {
    operation: &'static str,
    history: Vec<Phase>,
}

impl Lifecycle {
    /// Start tracking `operation` in the `Idle` phase.
    pub(crate) fn begin(operation: &'static str) -> Self {
        Self {
            operation,
            history: vec![Phase::Idle],
        }
    }

    pub(crate) fn phase(&self) -> Phase {
        self.history.last().copied().unwrap_or(Phase::Idle)
    }

    /// Every phase visited so far, starting with `Idle`.
    pub(crate) fn history(&self) -> &[Phase] {
        &self.history
    }

    /// Move to `next`.  Illegal edges are a programming error: they trip a
    /// debug assertion and are logged and ignored in release builds.
    pub(crate) fn advance(&mut self, next: Phase) {
        let current = self.phase();
        if !current.can_advance_to(next) {
            error!("{}: illegal transition {current:?} -> {next:?}", self.operation);
            debug_assert!(false, "illegal transition {current:?} -> {next:?}");
            return;
        }
        debug!("{}: {current:?} -> {next:?}", self.operation);
        self.history.push(next);
    }

    /// Return to `Idle`, passing through `Failed` if `outcome` is an error.
    pub(crate) fn settle<T, E>(&mut self, outcome: &Result<T, E>) {
        if outcome.is_err() {
            self.advance(Phase::Failed);
            debug!(
                "{}: failed {} operating, via {:?}",
                self.operation,
                if self.operated() { "after" } else { "before" },
                self.history(),
            );
        }
        self.advance(Phase::Idle);
    }

    /// Whether the operation reached `Operating` at any point.
    pub(crate) fn operated(&self) -> bool {
        self.history.contains(&Phase::Operating)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use super::Phase::*;

    #[test]
    fn happy_path_returns_to_idle() {
        let mut life = Lifecycle::begin("write");
        for p in [Loading, Ready, Operating, Closing] {
            life.advance(p);
        }
        life.settle(&Ok::<(), ()>(()));
        assert_eq!(life.history(), [Idle, Loading, Ready, Operating, Closing, Idle]);
        assert!(life.operated());
    }

    #[test]
    fn load_failure_skips_operating() {
        let mut life = Lifecycle::begin("read");
        life.advance(Loading);
        life.settle(&Err::<(), ()>(()));
        assert_eq!(life.history(), [Idle, Loading, Failed, Idle]);
        assert!(!life.operated());
    }

    #[test]
    fn transfer_failure_closes_before_failing() {
        let mut life = Lifecycle::begin("read");
        for p in [Loading, Ready, Operating, Closing] {
            life.advance(p);
        }
        life.settle(&Err::<(), ()>(()));
        assert_eq!(life.phase(), Idle);
        assert_eq!(&life.history()[4..], [Closing, Failed, Idle]);
    }

    #[test]
    fn operating_requires_ready() {
        assert!(!Loading.can_advance_to(Operating));
        assert!(!Idle.can_advance_to(Operating));
        assert!(!Operating.can_advance_to(Failed));
        assert!(Ready.can_advance_to(Operating));
    }
}

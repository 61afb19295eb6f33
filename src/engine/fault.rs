/// Raised by a filter, the propagator, or the state computer when a branch's bounds can no
/// longer satisfy some rule's post-condition (§4.2, §7 `InconsistencyFault`).
///
/// This is deliberately not part of [`crate::basic_types::ConstraintOperationError`]: per §7 it
/// never escapes the search frame that induced it. It is local control flow for pruning a dead
/// branch, not a user-facing error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InconsistencyFault;

use thiserror::Error;

/// One of the consistency invariants of §3 was violated while constructing a variable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("variable '{variable}' violates invariant: {reason}")]
pub struct InvariantViolation {
    /// The name of the offending variable.
    pub variable: String,
    /// Which invariant failed and why, e.g. "lower is not a subset of upper".
    pub reason: String,
}

impl InvariantViolation {
    pub(crate) fn new(variable: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            reason: reason.into(),
        }
    }
}

/// A constraint referenced a variable name that was never declared via
/// [`crate::api::Solver::make_variable`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown variable '{0}'")]
pub struct UnknownVariableError(pub String);

/// The error returned by the builder-style problem-construction API
/// (`Solver::make_variable`, `Solver::add_constraint`). Both variants are surfaced immediately;
/// neither is ever raised once `solve` has started (see §7).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintOperationError {
    /// A variable was declared twice, or was inconsistent at declaration time.
    #[error(transparent)]
    InvariantViolation(#[from] InvariantViolation),
    /// A constraint referenced an undeclared variable.
    #[error(transparent)]
    UnknownVariable(#[from] UnknownVariableError),
}

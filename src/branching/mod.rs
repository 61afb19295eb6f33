//! Variable and value heuristics used to pick the next branching decision (§4.5).

pub mod value_selection;
pub mod variable_selection;

pub use value_selection::ValueStrategy;
pub use variable_selection::VariableStrategy;

/// Which window-selection algorithm governs the randomised tie-break among ranked variable
/// candidates once the per-restart random budget allows a detour (§4.5 "Randomised tie-breaks").
/// Confusingly named after the *restart* policy in the source this was distilled from, since that
/// solver reused one setting for both restart-driven windowing and the tie-break window; kept
/// here for the same reason.
#[derive(Debug, Clone, Copy)]
pub enum RestartStrategy {
    Random,
    Next,
    ConstrainedRandom,
}

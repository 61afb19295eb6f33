//! The subset-bound representation of set variables (§3) and the store that owns them.

mod set_variable;
mod store;

pub use set_variable::SetVariable;
pub use store::VariableId;
pub(crate) use store::VariableStore;

use crate::basic_types::KeyedVec;

/// The bounds of every declared variable at one point of the search tree. The state computer
/// clones this per branch rather than mutating the root store (§3 "Lifecycle", §9 "Cloning vs.
/// trailing").
pub(crate) type VariableAssignment = KeyedVec<VariableId, SetVariable>;

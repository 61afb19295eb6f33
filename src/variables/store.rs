use std::collections::BTreeSet;
use std::num::NonZero;

use crate::basic_types::ConstraintOperationError;
use crate::basic_types::HashMap;
use crate::basic_types::InvariantViolation;
use crate::basic_types::KeyedVec;
use crate::basic_types::StorageKey;
use crate::variables::SetVariable;

/// A handle to a [`SetVariable`] owned by a [`VariableStore`]. Cheap to copy; constraints hold
/// these (or the variable's name) rather than owning handles into the variable itself (§9
/// "Cyclic references").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(NonZero<u32>);

impl StorageKey for VariableId {
    fn index(&self) -> usize {
        self.0.index()
    }

    fn create_from_index(index: usize) -> Self {
        VariableId(NonZero::create_from_index(index))
    }
}

/// The single owner of every [`SetVariable`] declared on a [`crate::api::Solver`] (§4.1).
///
/// Variables are created during problem construction and never deleted (§3 "Lifecycle").
/// Mutation of their bounds happens only through the filtering layer acting on a branch's cloned
/// copy, never directly on the store.
#[derive(Debug, Default, Clone)]
pub(crate) struct VariableStore {
    variables: KeyedVec<VariableId, SetVariable>,
    names: HashMap<String, VariableId>,
}

impl VariableStore {
    /// Insert a new variable. Rejects a duplicate name or an inconsistent variable (§4.1).
    pub(crate) fn add(
        &mut self,
        variable: SetVariable,
    ) -> Result<VariableId, ConstraintOperationError> {
        if self.names.contains_key(variable.name()) {
            return Err(InvariantViolation::new(
                variable.name(),
                "a variable with this name is already declared",
            )
            .into());
        }

        if !variable.is_consistent_public() {
            return Err(InvariantViolation::new(
                variable.name(),
                "variable is inconsistent at declaration time",
            )
            .into());
        }

        let id = VariableId(NonZero::new(self.variables.len() as u32 + 1).expect("nonzero"));
        let name = variable.name().to_owned();
        self.variables.push(variable);
        let _ = self.names.insert(name, id);
        Ok(id)
    }

    pub(crate) fn get(&self, id: VariableId) -> &SetVariable {
        self.variables
            .get(id)
            .expect("VariableId is always valid for its own store")
    }

    pub(crate) fn id_of(&self, name: &str) -> Option<VariableId> {
        self.names.get(name).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.variables.len()
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = VariableId> + '_ {
        self.variables.keys()
    }

    /// The union of every declared variable's upper bound — informational only (§4.1).
    pub(crate) fn universe(&self) -> BTreeSet<i64> {
        self.variables
            .iter()
            .flat_map(|variable| variable.upper().iter().copied())
            .collect()
    }
}

impl SetVariable {
    /// Public-crate consistency check used by the store at declaration time; distinct from
    /// [`SetVariable::is_valid`], which also requires `min_card` to already be met.
    pub(crate) fn is_consistent_public(&self) -> bool {
        self.lower().is_subset(self.upper())
            && self.lower().len() <= self.max_card()
            && self.upper().len() >= self.min_card()
            && self.min_card() <= self.max_card()
    }
}

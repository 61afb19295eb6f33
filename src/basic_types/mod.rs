//! Small shared building blocks used throughout the solver: error types, hashing aliases, a
//! seedable random source, and the [`KeyedVec`] storage helper.

mod error;
mod keyed_vec;
mod random;

pub use error::ConstraintOperationError;
pub use error::InvariantViolation;
pub use error::UnknownVariableError;
pub(crate) use keyed_vec::KeyedVec;
pub(crate) use keyed_vec::StorageKey;
pub(crate) use random::Random;

/// A [`std::collections::HashSet`] using the faster (non-cryptographic) FNV hasher, matching the
/// rest of the constraint/propagation hot path where keys are small integers or variable names.
pub(crate) type HashSet<T> = std::collections::HashSet<T, fnv::FnvBuildHasher>;

/// A [`std::collections::HashMap`] using the faster (non-cryptographic) FNV hasher.
pub(crate) type HashMap<K, V> = std::collections::HashMap<K, V, fnv::FnvBuildHasher>;

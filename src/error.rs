use thiserror::Error;

/// Errors reported by the mutating skip list operations.
///
/// Absence is never an error: `delete` of a missing pair reports `false`,
/// and read paths return empty results. The only failure a caller must
/// handle is a uniqueness conflict, which carries the offending key back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SkipListError<K> {
    /// The list was created with the uniqueness constraint and the key is
    /// already associated with a value.
    #[error("key is not unique: {0:?}")]
    KeyNotUnique(K),
}

impl<K> SkipListError<K> {
    /// Returns the key that caused the conflict.
    pub fn into_key(self) -> K {
        match self {
            SkipListError::KeyNotUnique(key) => key,
        }
    }
}

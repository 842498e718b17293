use std::fmt::Debug;
use thiserror::Error;

/// Returned by [`IdentifiedVec::push`](crate::IdentifiedVec::push) when the collection already
/// holds an element with the same id. The rejected element is handed back.
#[derive(Debug, Error)]
#[error("an element with id {id:?} is already present")]
pub struct DuplicateIdError<Id: Debug, T> {
    pub id: Id,
    pub element: T,
}

impl<Id: Debug, T> DuplicateIdError<Id, T> {
    /// Recovers the element that could not be inserted.
    pub fn into_element(self) -> T {
        self.element
    }
}

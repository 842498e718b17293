//! Identity-keyed collections.
use crate::error::DuplicateIdError;
use indexmap::IndexMap;
use std::fmt;
use std::fmt::Debug;
use std::hash::Hash;
use std::ops::{Index, IndexMut};

/// Elements with a stable identity.
pub trait Identifiable {
    type Id: Clone + Debug + Eq + Hash;
    fn id(&self) -> Self::Id;
}

/// An ordered collection of elements, unique by [`Identifiable::id`].
///
/// Elements can be addressed both by position (`v[0]`) and by id (`v.get(&id)`).
/// The id of an element is read once, when it is inserted: mutating the field an element derives
/// its id from (through `get_mut`, `iter_mut` or indexing) does not re-key it.
pub struct IdentifiedVec<T: Identifiable> {
    entries: IndexMap<T::Id, T>,
}

impl<T: Identifiable> IdentifiedVec<T> {
    /// Creates an empty collection.
    pub fn new() -> IdentifiedVec<T> {
        IdentifiedVec {
            entries: IndexMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends an element, returning its position.
    ///
    /// Fails, without modifying the collection, if an element with the same id is already present.
    pub fn push(&mut self, element: T) -> Result<usize, DuplicateIdError<T::Id, T>> {
        let id = element.id();
        if self.entries.contains_key(&id) {
            return Err(DuplicateIdError { id, element });
        }
        let (index, _) = self.entries.insert_full(id, element);
        Ok(index)
    }

    /// Inserts an element, replacing (in place) any element with the same id.
    ///
    /// Returns the replaced element.
    pub fn upsert(&mut self, element: T) -> Option<T> {
        self.entries.insert(element.id(), element)
    }

    /// Removes the element with the given id, shifting the following elements.
    pub fn remove(&mut self, id: &T::Id) -> Option<T> {
        self.entries.shift_remove(id)
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: &T::Id) -> Option<&mut T> {
        self.entries.get_mut(id)
    }

    /// Returns the position of the element with the given id.
    pub fn index_of(&self, id: &T::Id) -> Option<usize> {
        self.entries.get_index_of(id)
    }

    pub fn ids(&self) -> impl ExactSizeIterator<Item = &T::Id> + '_ {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &T> + '_ {
        self.entries.values()
    }

    pub fn iter_mut(&mut self) -> impl ExactSizeIterator<Item = &mut T> + '_ {
        self.entries.values_mut()
    }
}

impl<T: Identifiable> Default for IdentifiedVec<T> {
    fn default() -> Self {
        IdentifiedVec::new()
    }
}

// #26925
impl<T: Identifiable + Clone> Clone for IdentifiedVec<T> {
    fn clone(&self) -> Self {
        IdentifiedVec {
            entries: self.entries.clone(),
        }
    }
}

impl<T: Identifiable + Debug> fmt::Debug for IdentifiedVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.entries.values()).finish()
    }
}

impl<T: Identifiable + PartialEq> PartialEq for IdentifiedVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Identifiable + Eq> Eq for IdentifiedVec<T> {}

impl<T: Identifiable> Index<usize> for IdentifiedVec<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.entries[index]
    }
}

impl<T: Identifiable> IndexMut<usize> for IdentifiedVec<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.entries[index]
    }
}

/// Later elements replace earlier elements with the same id, keeping the position of the first.
impl<T: Identifiable> FromIterator<T> for IdentifiedVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        IdentifiedVec {
            entries: iter.into_iter().map(|element| (element.id(), element)).collect(),
        }
    }
}

impl<T: Identifiable> Extend<T> for IdentifiedVec<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.entries
            .extend(iter.into_iter().map(|element| (element.id(), element)))
    }
}

impl<T: Identifiable> IntoIterator for IdentifiedVec<T> {
    type Item = T;
    type IntoIter = indexmap::map::IntoValues<T::Id, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}

impl<'a, T: Identifiable> IntoIterator for &'a IdentifiedVec<T> {
    type Item = &'a T;
    type IntoIter = indexmap::map::Values<'a, T::Id, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

impl<'a, T: Identifiable> IntoIterator for &'a mut IdentifiedVec<T> {
    type Item = &'a mut T;
    type IntoIter = indexmap::map::ValuesMut<'a, T::Id, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values_mut()
    }
}

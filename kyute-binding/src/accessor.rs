//! How a binding obtains its child from the parent, and where (if anywhere) it stores it back.
use crate::field::Equivalence;
use crate::lens::Lens;
use std::fmt;
use tracing::trace;

/// Lens to the storage of a child, as held by an accessor.
pub type StorageLens<P, C> = Box<dyn Lens<P, C> + Send + Sync>;

/// Strategy for obtaining a child value from a parent and persisting it back.
pub enum Accessor<P, C> {
    /// The child lives in a field of the parent and is always present.
    Stored {
        storage: StorageLens<P, C>,
        dedup: Option<Equivalence<C>>,
    },
    /// The child lives in an `Option` field of the parent.
    StoredOptional {
        storage: StorageLens<P, Option<C>>,
        dedup: Option<Equivalence<C>>,
    },
    /// The child is derived from the parent on every access and never stored.
    Computed {
        derive: Box<dyn Fn(&P) -> Option<C> + Send + Sync>,
    },
}

impl<P, C> Accessor<P, C> {
    pub fn stored(storage: impl Lens<P, C> + Send + Sync + 'static) -> Accessor<P, C> {
        Accessor::Stored {
            storage: Box::new(storage),
            dedup: None,
        }
    }

    pub fn stored_optional(storage: impl Lens<P, Option<C>> + Send + Sync + 'static) -> Accessor<P, C> {
        Accessor::StoredOptional {
            storage: Box::new(storage),
            dedup: None,
        }
    }

    pub fn computed(derive: impl Fn(&P) -> Option<C> + Send + Sync + 'static) -> Accessor<P, C> {
        Accessor::Computed {
            derive: Box::new(derive),
        }
    }

    /// Returns the storage-level equivalence predicate, if this accessor has storage.
    pub(crate) fn dedup_slot(&mut self) -> Option<&mut Option<Equivalence<C>>> {
        match self {
            Accessor::Stored { dedup, .. } | Accessor::StoredOptional { dedup, .. } => Some(dedup),
            Accessor::Computed { .. } => None,
        }
    }

    /// Borrows the stored child. Computed children have no storage and yield `None`.
    pub fn current<'a>(&self, parent: &'a P) -> Option<&'a C> {
        match self {
            Accessor::Stored { storage, .. } => Some(storage.get(parent)),
            Accessor::StoredOptional { storage, .. } => storage.get(parent).as_ref(),
            Accessor::Computed { .. } => None,
        }
    }

    /// Returns a fresh copy of the child, or `None` if there is no child.
    pub fn get(&self, parent: &P) -> Option<C>
    where
        C: Clone,
    {
        match self {
            Accessor::Stored { storage, .. } => Some(storage.get(parent).clone()),
            Accessor::StoredOptional { storage, .. } => storage.get(parent).clone(),
            Accessor::Computed { derive } => derive(parent),
        }
    }

    /// Writes `value` to the child storage.
    ///
    /// Writes that the storage-level equivalence predicate considers redundant are skipped.
    /// `None` clears optional storage, and is ignored by the other variants.
    pub fn persist(&self, parent: &mut P, value: Option<C>) {
        match self {
            Accessor::Stored { storage, dedup } => {
                let Some(value) = value else {
                    trace!("absent value ignored: storage is not optional");
                    return;
                };
                if let Some(equivalent) = dedup {
                    if equivalent(storage.get(parent), &value) {
                        trace!("storage write skipped: equivalent child");
                        return;
                    }
                }
                storage.set(parent, value);
            }
            Accessor::StoredOptional { storage, dedup } => {
                let Some(value) = value else {
                    trace!("clearing optional storage");
                    storage.set(parent, None);
                    return;
                };
                if let (Some(equivalent), Some(current)) = (dedup, storage.get(parent)) {
                    if equivalent(current, &value) {
                        trace!("storage write skipped: equivalent child");
                        return;
                    }
                }
                storage.set(parent, Some(value));
            }
            Accessor::Computed { .. } => {
                // nothing to store
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Accessor::Stored { .. } => "Stored",
            Accessor::StoredOptional { .. } => "StoredOptional",
            Accessor::Computed { .. } => "Computed",
        }
    }
}

impl<P, C> fmt::Debug for Accessor<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s = f.debug_struct(self.kind());
        if let Some(dedup) = match self {
            Accessor::Stored { dedup, .. } | Accessor::StoredOptional { dedup, .. } => Some(dedup),
            Accessor::Computed { .. } => None,
        } {
            s.field("dedup", &dedup.is_some());
        }
        s.finish()
    }
}

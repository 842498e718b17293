//! State bindings.
//!
//! A [`StateBinding`] lets a parent state expose the state of a child feature while keeping some
//! fields of the child mirrored with fields of the parent, in both directions:
//!
//! ```
//! use kyute_binding::{Lens, StateBinding, StaticBinding};
//!
//! #[derive(Clone, Default, Lens)]
//! struct Feature {
//!     external: String,
//!     internal: i32,
//! }
//!
//! #[derive(Clone, Default, Lens)]
//! struct State {
//!     content: String,
//!     _feature: Feature,
//! }
//!
//! static FEATURE: StaticBinding<State, Feature> =
//!     StaticBinding::new(|| StateBinding::stored(State::_feature).rw(State::content, Feature::external));
//!
//! let mut state = State::default();
//! FEATURE.try_with_mut(&mut state, |feature| feature.external = "Hello!".to_string());
//! assert_eq!(state.content, "Hello!");
//!
//! state.content = "World!".to_string();
//! assert_eq!(FEATURE.get(&state).unwrap().external, "World!");
//! ```
//!
//! Reading the child (`get`) returns a fresh copy with every bound field copied from the parent.
//! Writing it (`set`) copies the bound fields back into the parent, then stores the child (if the
//! binding has storage). Storage is only refreshed on writes: until then, the bound fields of the
//! stored child may hold stale values, which is why the child must always be accessed through the
//! binding.
use crate::accessor::Accessor;
use crate::field::{Correspondence, Fields};
use crate::lens::Lens;
use crate::lift::{Cardinality, Lift};
use crate::Data;
use std::fmt;
use tracing::{trace, warn};

/// A binding that lives in a `static`, built on first use.
pub type StaticBinding<P, C> = once_cell::sync::Lazy<StateBinding<P, C>>;

/// Binds a child state of type `C` to a parent state of type `P`.
///
/// Bindings are stateless: all the state lives in the values passed to [`get`](Self::get) and
/// [`set`](Self::set), so one binding is typically built once (see [`StaticBinding`]) and used for
/// every instance of the parent.
pub struct StateBinding<P, C> {
    accessor: Accessor<P, C>,
    fields: Fields<P, C>,
    // set by `map` over containers of at most one element: tells whether the container is empty
    vacant: Option<fn(&C) -> bool>,
}

impl<P, C> fmt::Debug for StateBinding<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("StateBinding")
            .field("accessor", &self.accessor)
            .field("fields", &self.fields.len())
            .finish()
    }
}

impl<P: 'static, C: 'static> StateBinding<P, C> {
    pub fn new(accessor: Accessor<P, C>) -> StateBinding<P, C> {
        StateBinding {
            accessor,
            fields: Fields::new(),
            vacant: None,
        }
    }

    /// Binds a child stored in a field of the parent.
    pub fn stored(storage: impl Lens<P, C> + Send + Sync + 'static) -> StateBinding<P, C> {
        StateBinding::new(Accessor::stored(storage))
    }

    /// Binds a child stored in an optional field of the parent.
    ///
    /// The binding yields nothing, and field propagation is skipped entirely, while the field is
    /// `None`.
    pub fn stored_optional(storage: impl Lens<P, Option<C>> + Send + Sync + 'static) -> StateBinding<P, C> {
        StateBinding::new(Accessor::stored_optional(storage))
    }

    /// Binds a child that has no storage and is derived from the parent on every access.
    ///
    /// Only the bound fields of the child survive a write.
    pub fn computed(derive: impl Fn(&P) -> C + Send + Sync + 'static) -> StateBinding<P, C> {
        StateBinding::new(Accessor::computed(move |parent| Some(derive(parent))))
    }

    /// Like [`computed`](Self::computed), for children that don't always exist.
    pub fn computed_optional(derive: impl Fn(&P) -> Option<C> + Send + Sync + 'static) -> StateBinding<P, C> {
        StateBinding::new(Accessor::computed(derive))
    }

    /// Skips storing the child when `equivalence(stored, new)` holds.
    ///
    /// Independent of the equivalence predicates of individual fields.
    /// Has no effect on computed bindings.
    pub fn dedup_storage(mut self, equivalence: impl Fn(&C, &C) -> bool + Send + Sync + 'static) -> Self {
        match self.accessor.dedup_slot() {
            Some(slot) => *slot = Some(Box::new(equivalence)),
            None => warn!("dedup_storage has no effect on a computed binding"),
        }
        self
    }

    /// [`dedup_storage`](Self::dedup_storage) with [`Data::same`] as the equivalence.
    pub fn dedup_storage_same(self) -> Self
    where
        C: Data,
    {
        self.dedup_storage(C::same)
    }

    /// Appends an arbitrary correspondence.
    pub fn with(mut self, correspondence: impl Correspondence<P, C> + 'static) -> Self {
        self.fields = self.fields.with(correspondence);
        self
    }

    /// Keeps a field of the parent and a field of the child in sync.
    pub fn rw<V, PL, CL>(mut self, parent: PL, child: CL) -> Self
    where
        V: Clone + 'static,
        PL: Lens<P, V> + Send + Sync + 'static,
        CL: Lens<C, V> + Send + Sync + 'static,
    {
        self.fields = self.fields.rw(parent, child);
        self
    }

    /// Like [`rw`](Self::rw), but the parent field is not written at all when
    /// `equivalence(parent_value, child_value)` holds.
    pub fn rw_dedup<V, PL, CL>(
        mut self,
        parent: PL,
        child: CL,
        equivalence: impl Fn(&V, &V) -> bool + Send + Sync + 'static,
    ) -> Self
    where
        V: Clone + 'static,
        PL: Lens<P, V> + Send + Sync + 'static,
        CL: Lens<C, V> + Send + Sync + 'static,
    {
        self.fields = self.fields.rw_dedup(parent, child, equivalence);
        self
    }

    /// [`rw_dedup`](Self::rw_dedup) with [`Data::same`] as the equivalence.
    pub fn rw_same<V, PL, CL>(mut self, parent: PL, child: CL) -> Self
    where
        V: Data,
        PL: Lens<P, V> + Send + Sync + 'static,
        CL: Lens<C, V> + Send + Sync + 'static,
    {
        self.fields = self.fields.rw_same(parent, child);
        self
    }

    /// Copies a value read or derived from the parent into a field of the child.
    /// Edits to that field are not written back.
    pub fn ro<V, G, CL>(mut self, parent: G, child: CL) -> Self
    where
        V: 'static,
        G: Fn(&P) -> V + Send + Sync + 'static,
        CL: Lens<C, V> + Send + Sync + 'static,
    {
        self.fields = self.fields.ro(parent, child);
        self
    }

    /// Lifts correspondences declared over one element to every element of the child container.
    ///
    /// For containers that may hold several elements (`Vec`, maps, [`IdentifiedVec`](crate::IdentifiedVec)),
    /// the lifted fields are forward-only: an edit to a bound field of one element is overwritten
    /// by the parent value on the next read.
    ///
    /// For `Option` children, writing back an empty option over a stored empty option is skipped.
    pub fn map(mut self, inner: Fields<P, C::Element>) -> Self
    where
        C: Lift,
        C::Element: 'static,
    {
        if <C::Cardinality as Cardinality>::REVERSE_PROPAGATION {
            self.vacant = Some(|child: &C| child.only().is_none());
        }
        self.fields = self.fields.map(inner);
        self
    }

    /// Returns the child with all bound fields copied from the parent, or `None` if there is no child.
    pub fn get(&self, parent: &P) -> Option<C>
    where
        C: Clone,
    {
        let mut child = self.accessor.get(parent)?;
        self.fields.forward(parent, &mut child);
        Some(child)
    }

    /// Copies the bound fields of `value` into the parent, then stores it.
    ///
    /// `None` clears optional storage and is otherwise ignored.
    pub fn set(&self, parent: &mut P, value: Option<C>) {
        if let Some(child) = &value {
            if let Some(vacant) = self.vacant {
                if vacant(child) && self.accessor.current(parent).map_or(false, vacant) {
                    trace!("storage write skipped: container stays empty");
                    return;
                }
            }
            self.fields.backward(parent, child);
        }
        self.accessor.persist(parent, value);
    }

    /// Calls `f` with the current child, if there is one.
    pub fn try_with<R>(&self, parent: &P, f: impl FnOnce(&C) -> R) -> Option<R>
    where
        C: Clone,
    {
        self.get(parent).map(|child| f(&child))
    }

    /// Calls `f` with the current child and writes the result back, if there is a child.
    ///
    /// When there is no child, `f` isn't called and the parent is left untouched.
    pub fn try_with_mut<R>(&self, parent: &mut P, f: impl FnOnce(&mut C) -> R) -> Option<R>
    where
        C: Clone,
    {
        let mut child = self.get(parent)?;
        let result = f(&mut child);
        self.set(parent, Some(child));
        Some(result)
    }
}

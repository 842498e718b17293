//! Field correspondences: declared pairings between a field of a parent and a field of a child.
use crate::lens::Lens;
use crate::lift::{Lift, Lifted};
use crate::Data;
use std::fmt;
use std::marker::PhantomData;
use tracing::trace;

/// Equivalence predicate used to skip redundant writes.
pub type Equivalence<V> = Box<dyn Fn(&V, &V) -> bool + Send + Sync>;

/// Propagates values between a parent `P` and a child `C`.
///
/// `forward` runs on every read of the child, `backward` on every write of the child.
pub trait Correspondence<P, C>: Send + Sync {
    /// Parent -> child.
    fn forward(&self, parent: &P, child: &mut C);
    /// Child -> parent.
    fn backward(&self, parent: &mut P, child: &C);
}

//--------------------------------------------------------------------------------------------------

/// Two-way correspondence between a parent field and a child field of the same type.
pub struct FieldSync<PL, CL, V> {
    parent: PL,
    child: CL,
    equivalence: Option<Equivalence<V>>,
}

impl<PL, CL, V> FieldSync<PL, CL, V> {
    pub fn new(parent: PL, child: CL) -> FieldSync<PL, CL, V> {
        FieldSync {
            parent,
            child,
            equivalence: None,
        }
    }

    /// Skips writing the parent field when `equivalence(parent_value, child_value)` holds.
    pub fn dedup(mut self, equivalence: impl Fn(&V, &V) -> bool + Send + Sync + 'static) -> Self {
        self.equivalence = Some(Box::new(equivalence));
        self
    }
}

impl<P, C, V, PL, CL> Correspondence<P, C> for FieldSync<PL, CL, V>
where
    PL: Lens<P, V> + Send + Sync,
    CL: Lens<C, V> + Send + Sync,
    V: Clone,
{
    fn forward(&self, parent: &P, child: &mut C) {
        self.child.set(child, self.parent.get(parent).clone());
    }

    fn backward(&self, parent: &mut P, child: &C) {
        let value = self.child.get(child);
        if let Some(equivalent) = &self.equivalence {
            if equivalent(self.parent.get(parent), value) {
                trace!("parent field write skipped: equivalent value");
                return;
            }
        }
        self.parent.set(parent, value.clone());
    }
}

//--------------------------------------------------------------------------------------------------

/// Forward-only correspondence: the child field receives a value read (or derived) from the parent,
/// and edits to it are never written back.
pub struct ReadOnly<G, CL, V> {
    parent: G,
    child: CL,
    _phantom: PhantomData<fn() -> V>,
}

impl<G, CL, V> ReadOnly<G, CL, V> {
    pub fn new(parent: G, child: CL) -> ReadOnly<G, CL, V> {
        ReadOnly {
            parent,
            child,
            _phantom: PhantomData,
        }
    }
}

impl<P, C, V, G, CL> Correspondence<P, C> for ReadOnly<G, CL, V>
where
    G: Fn(&P) -> V + Send + Sync,
    CL: Lens<C, V> + Send + Sync,
{
    fn forward(&self, parent: &P, child: &mut C) {
        self.child.set(child, (self.parent)(parent));
    }

    fn backward(&self, _parent: &mut P, _child: &C) {}
}

//--------------------------------------------------------------------------------------------------

/// An ordered list of correspondences between `P` and `C`.
///
/// Correspondences run in the order they were declared, in both directions.
pub struct Fields<P, C> {
    items: Vec<Box<dyn Correspondence<P, C>>>,
}

impl<P, C> Default for Fields<P, C> {
    fn default() -> Self {
        Fields { items: Vec::new() }
    }
}

impl<P, C> fmt::Debug for Fields<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Fields").field("len", &self.items.len()).finish()
    }
}

impl<P, C> Fields<P, C> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<P: 'static, C: 'static> Fields<P, C> {
    pub fn new() -> Fields<P, C> {
        Fields::default()
    }

    /// Appends an arbitrary correspondence.
    pub fn with(mut self, correspondence: impl Correspondence<P, C> + 'static) -> Self {
        self.items.push(Box::new(correspondence));
        self
    }

    /// Keeps `parent` and `child` in sync (read-write).
    pub fn rw<V, PL, CL>(self, parent: PL, child: CL) -> Self
    where
        V: Clone + 'static,
        PL: Lens<P, V> + Send + Sync + 'static,
        CL: Lens<C, V> + Send + Sync + 'static,
    {
        self.with(FieldSync::<PL, CL, V>::new(parent, child))
    }

    /// Like [`rw`](Self::rw), but the parent field is left untouched (not even re-assigned) when
    /// `equivalence(parent_value, child_value)` holds.
    pub fn rw_dedup<V, PL, CL>(
        self,
        parent: PL,
        child: CL,
        equivalence: impl Fn(&V, &V) -> bool + Send + Sync + 'static,
    ) -> Self
    where
        V: Clone + 'static,
        PL: Lens<P, V> + Send + Sync + 'static,
        CL: Lens<C, V> + Send + Sync + 'static,
    {
        self.with(FieldSync::new(parent, child).dedup(equivalence))
    }

    /// [`rw_dedup`](Self::rw_dedup) with [`Data::same`] as the equivalence.
    pub fn rw_same<V, PL, CL>(self, parent: PL, child: CL) -> Self
    where
        V: Data,
        PL: Lens<P, V> + Send + Sync + 'static,
        CL: Lens<C, V> + Send + Sync + 'static,
    {
        self.rw_dedup(parent, child, V::same)
    }

    /// Copies a value read or derived from the parent into `child` (read-only).
    pub fn ro<V, G, CL>(self, parent: G, child: CL) -> Self
    where
        V: 'static,
        G: Fn(&P) -> V + Send + Sync + 'static,
        CL: Lens<C, V> + Send + Sync + 'static,
    {
        self.with(ReadOnly::new(parent, child))
    }

    /// Lifts correspondences declared over a single element to every element of the container `C`.
    ///
    /// See [`Lift`] for how the cardinality of the container affects writes.
    pub fn map(self, inner: Fields<P, C::Element>) -> Self
    where
        C: Lift,
        C::Element: 'static,
    {
        self.with(Lifted::<C, P>::new(inner))
    }
}

impl<P, C> Correspondence<P, C> for Fields<P, C> {
    fn forward(&self, parent: &P, child: &mut C) {
        for item in self.items.iter() {
            item.forward(parent, child);
        }
    }

    fn backward(&self, parent: &mut P, child: &C) {
        for item in self.items.iter() {
            item.backward(parent, child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Correspondence, Fields};
    use crate::lens;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Parent {
        text: String,
        count: i32,
    }

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Child {
        text: String,
        count: i32,
        label: String,
    }

    #[test]
    fn forward_and_backward() {
        let fields = Fields::new()
            .rw(lens!(Parent, text), lens!(Child, text))
            .rw(lens!(Parent, count), lens!(Child, count));

        let mut parent = Parent {
            text: "parent".to_string(),
            count: 3,
        };
        let mut child = Child::default();
        fields.forward(&parent, &mut child);
        assert_eq!(child.text, "parent");
        assert_eq!(child.count, 3);

        child.count = 5;
        fields.backward(&mut parent, &child);
        assert_eq!(parent.count, 5);
        assert_eq!(parent.text, "parent");
    }

    #[test]
    fn declared_order_wins() {
        // both correspondences write `Child::text`: the last one declared sees the final say
        let fields = Fields::new()
            .rw(lens!(Parent, text), lens!(Child, text))
            .ro(|p: &Parent| format!("#{}", p.count), lens!(Child, text));
        let parent = Parent {
            text: "a".to_string(),
            count: 1,
        };
        let mut child = Child::default();
        fields.forward(&parent, &mut child);
        assert_eq!(child.text, "#1");
    }

    #[test]
    fn read_only_is_not_written_back() {
        let fields = Fields::new().ro(|p: &Parent| p.text.to_uppercase(), lens!(Child, label));
        let mut parent = Parent {
            text: "abc".to_string(),
            count: 0,
        };
        let mut child = Child::default();
        fields.forward(&parent, &mut child);
        assert_eq!(child.label, "ABC");

        child.label = "xyz".to_string();
        fields.backward(&mut parent, &child);
        assert_eq!(parent.text, "abc");
    }
}

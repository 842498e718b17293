//! Lifting correspondences over containers of children.
//!
//! A binding declared over a single child can be replicated over a container of children with
//! `map`. Reading always refreshes every element from the parent. Writing back is only defined when
//! the container holds at most one element by construction ([`One`]): with several elements there
//! is no canonical choice of which element's value should win for the single parent field, so
//! those containers ([`Many`]) are forward-only.
use crate::field::{Correspondence, Fields};
use crate::IdentifiedVec;
use crate::Identifiable;
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;

/// Cardinality of a container, as far as reverse propagation is concerned.
pub trait Cardinality {
    /// Whether child -> parent copies are performed.
    const REVERSE_PROPAGATION: bool;
}

/// At most one element (e.g. `Option`): writes propagate back to the parent.
#[derive(Copy, Clone, Debug)]
pub enum One {}

/// Any number of elements: forward-only.
#[derive(Copy, Clone, Debug)]
pub enum Many {}

impl Cardinality for One {
    const REVERSE_PROPAGATION: bool = true;
}

impl Cardinality for Many {
    const REVERSE_PROPAGATION: bool = false;
}

/// Containers of children that correspondences can be lifted over.
pub trait Lift {
    type Element;
    type Cardinality: Cardinality;

    /// Visits every element, in the container's iteration order.
    fn for_each_mut(&mut self, f: impl FnMut(&mut Self::Element));

    /// The element that is written back to the parent, for containers of cardinality [`One`].
    fn only(&self) -> Option<&Self::Element> {
        None
    }
}

impl<E> Lift for Option<E> {
    type Element = E;
    type Cardinality = One;

    fn for_each_mut(&mut self, mut f: impl FnMut(&mut E)) {
        if let Some(element) = self {
            f(element)
        }
    }

    fn only(&self) -> Option<&E> {
        self.as_ref()
    }
}

impl<E> Lift for Vec<E> {
    type Element = E;
    type Cardinality = Many;

    fn for_each_mut(&mut self, f: impl FnMut(&mut E)) {
        self.iter_mut().for_each(f)
    }
}

impl<E> Lift for VecDeque<E> {
    type Element = E;
    type Cardinality = Many;

    fn for_each_mut(&mut self, f: impl FnMut(&mut E)) {
        self.iter_mut().for_each(f)
    }
}

impl<E, const N: usize> Lift for [E; N] {
    type Element = E;
    type Cardinality = Many;

    fn for_each_mut(&mut self, f: impl FnMut(&mut E)) {
        self.iter_mut().for_each(f)
    }
}

impl<K, E, S> Lift for HashMap<K, E, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Element = E;
    type Cardinality = Many;

    fn for_each_mut(&mut self, f: impl FnMut(&mut E)) {
        self.values_mut().for_each(f)
    }
}

impl<K: Ord, E> Lift for BTreeMap<K, E> {
    type Element = E;
    type Cardinality = Many;

    fn for_each_mut(&mut self, f: impl FnMut(&mut E)) {
        self.values_mut().for_each(f)
    }
}

impl<K, E, S> Lift for IndexMap<K, E, S> {
    type Element = E;
    type Cardinality = Many;

    fn for_each_mut(&mut self, f: impl FnMut(&mut E)) {
        self.values_mut().for_each(f)
    }
}

impl<E: Identifiable> Lift for IdentifiedVec<E> {
    type Element = E;
    type Cardinality = Many;

    fn for_each_mut(&mut self, f: impl FnMut(&mut E)) {
        self.iter_mut().for_each(f)
    }
}

//--------------------------------------------------------------------------------------------------

/// Correspondences over a single element, applied to a whole container `K`.
pub struct Lifted<K: Lift, P> {
    inner: Fields<P, K::Element>,
    _phantom: PhantomData<fn(&K)>,
}

impl<K: Lift, P> Lifted<K, P> {
    pub fn new(inner: Fields<P, K::Element>) -> Lifted<K, P> {
        Lifted {
            inner,
            _phantom: PhantomData,
        }
    }
}

impl<K: Lift, P> Correspondence<P, K> for Lifted<K, P> {
    fn forward(&self, parent: &P, child: &mut K) {
        child.for_each_mut(|element| self.inner.forward(parent, element));
    }

    fn backward(&self, parent: &mut P, child: &K) {
        if !<K::Cardinality as Cardinality>::REVERSE_PROPAGATION {
            return;
        }
        if let Some(element) = child.only() {
            self.inner.backward(parent, element);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Lift;
    use crate::field::{Correspondence, Fields};
    use crate::lens;
    use indexmap::IndexMap;
    use std::collections::{BTreeMap, VecDeque};

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Parent {
        text: String,
    }

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Child {
        text: String,
    }

    fn element_fields() -> Fields<Parent, Child> {
        Fields::new().rw(lens!(Parent, text), lens!(Child, text))
    }

    fn child(text: &str) -> Child {
        Child { text: text.to_string() }
    }

    #[test]
    fn option_propagates_both_ways() {
        let fields = Fields::<Parent, Option<Child>>::new().map(element_fields());
        let mut parent = Parent { text: "p".to_string() };

        let mut present = Some(Child::default());
        fields.forward(&parent, &mut present);
        assert_eq!(present, Some(child("p")));

        fields.backward(&mut parent, &Some(child("c")));
        assert_eq!(parent.text, "c");

        // absent: nothing to copy in either direction
        let mut absent: Option<Child> = None;
        fields.forward(&parent, &mut absent);
        fields.backward(&mut parent, &absent);
        assert_eq!(absent, None);
        assert_eq!(parent.text, "c");
    }

    #[test]
    fn vec_is_forward_only() {
        let fields = Fields::<Parent, Vec<Child>>::new().map(element_fields());
        let mut parent = Parent { text: "p".to_string() };

        let mut children = vec![child("a"), child("b")];
        fields.forward(&parent, &mut children);
        assert_eq!(children, vec![child("p"), child("p")]);

        // even a single element doesn't write back
        fields.backward(&mut parent, &vec![child("x")]);
        assert_eq!(parent.text, "p");
    }

    #[test]
    fn nested_containers() {
        let fields = Fields::<Parent, Vec<Vec<Child>>>::new()
            .map(Fields::<Parent, Vec<Child>>::new().map(element_fields()));
        let parent = Parent { text: "p".to_string() };
        let mut children = vec![vec![child("a")], vec![], vec![child("b"), child("c")]];
        fields.forward(&parent, &mut children);
        assert!(children.iter().flatten().all(|c| c.text == "p"));
    }

    #[test]
    fn map_values() {
        let fields = Fields::<Parent, BTreeMap<u32, Child>>::new().map(element_fields());
        let parent = Parent { text: "p".to_string() };
        let mut children: BTreeMap<u32, Child> = [(1, child("a")), (2, child("b"))].into_iter().collect();
        fields.forward(&parent, &mut children);
        assert_eq!(children[&1], child("p"));
        assert_eq!(children[&2], child("p"));
        assert!(children.only().is_none());
    }

    #[test]
    fn deque_is_forward_only() {
        let fields = Fields::<Parent, VecDeque<Child>>::new().map(element_fields());
        let mut parent = Parent { text: "p".to_string() };
        let mut children: VecDeque<Child> = [child("a"), child("b")].into_iter().collect();
        fields.forward(&parent, &mut children);
        assert!(children.iter().all(|c| c.text == "p"));

        fields.backward(&mut parent, &[child("x")].into_iter().collect());
        assert_eq!(parent.text, "p");
    }

    #[test]
    fn array_is_forward_only() {
        let fields = Fields::<Parent, [Child; 3]>::new().map(element_fields());
        let mut parent = Parent { text: "p".to_string() };
        let mut children = [child("a"), child("b"), child("c")];
        fields.forward(&parent, &mut children);
        assert_eq!(children, [child("p"), child("p"), child("p")]);

        fields.backward(&mut parent, &[child("x"), child("y"), child("z")]);
        assert_eq!(parent.text, "p");
    }

    #[test]
    fn index_map_is_forward_only() {
        let fields = Fields::<Parent, IndexMap<&'static str, Child>>::new().map(element_fields());
        let mut parent = Parent { text: "p".to_string() };
        let mut children: IndexMap<&'static str, Child> =
            [("b", child("b")), ("a", child("a"))].into_iter().collect();
        fields.forward(&parent, &mut children);
        assert_eq!(children.keys().copied().collect::<Vec<_>>(), ["b", "a"]);
        assert!(children.values().all(|c| c.text == "p"));

        let single: IndexMap<&'static str, Child> = [("x", child("x"))].into_iter().collect();
        fields.backward(&mut parent, &single);
        assert_eq!(parent.text, "p");
    }
}

// Copyright 2019 The Druid Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Traits for handling value types.
//!
//! [`Data::same`] is the equivalence used by the `*_same` builder methods of bindings
//! (e.g. [`StateBinding::rw_same`](crate::StateBinding::rw_same)) to skip redundant writes.

use crate::IdentifiedVec;
use crate::Identifiable;
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::{ptr, rc::Rc, sync::Arc};

pub trait Data: Clone + 'static {
    fn same(&self, other: &Self) -> bool;
}

/// `Data` through `PartialEq`, for types where equality is cheap.
macro_rules! impl_data_eq {
    ($($t:ty),* $(,)?) => {
        $(
            impl Data for $t {
                fn same(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_data_eq!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, char, bool, String, ());
impl_data_eq!(
    std::path::PathBuf,
    std::time::Duration,
    std::time::Instant,
    std::time::SystemTime
);

impl Data for &'static str {
    fn same(&self, other: &Self) -> bool {
        ptr::eq(*self, *other)
    }
}

// NaN is the same as itself, and 0.0 differs from -0.0
impl Data for f32 {
    fn same(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl Data for f64 {
    fn same(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl<T: ?Sized + 'static> Data for Arc<T> {
    fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: ?Sized + 'static> Data for Rc<T> {
    fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: Data> Data for Option<T> {
    fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same(b),
            (a, b) => a.is_none() && b.is_none(),
        }
    }
}

impl<T: Data, U: Data> Data for Result<T, U> {
    fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Ok(a), Ok(b)) => a.same(b),
            (Err(a), Err(b)) => a.same(b),
            _ => false,
        }
    }
}

impl<T0: Data, T1: Data> Data for (T0, T1) {
    fn same(&self, other: &Self) -> bool {
        self.0.same(&other.0) && self.1.same(&other.1)
    }
}

// Containers compare element by element: a storage-level dedup on a container of children has to
// look inside it.

fn same_elements<'a, T: Data>(
    a: impl ExactSizeIterator<Item = &'a T>,
    b: impl ExactSizeIterator<Item = &'a T>,
) -> bool {
    a.len() == b.len() && a.zip(b).all(|(a, b)| a.same(b))
}

impl<T: Data, const N: usize> Data for [T; N] {
    fn same(&self, other: &Self) -> bool {
        same_elements(self.iter(), other.iter())
    }
}

impl<T: Data> Data for Vec<T> {
    fn same(&self, other: &Self) -> bool {
        same_elements(self.iter(), other.iter())
    }
}

impl<T: Data> Data for VecDeque<T> {
    fn same(&self, other: &Self) -> bool {
        same_elements(self.iter(), other.iter())
    }
}

impl<T> Data for IdentifiedVec<T>
where
    T: Identifiable + Data,
    T::Id: 'static,
{
    fn same(&self, other: &Self) -> bool {
        same_elements(self.iter(), other.iter()) && self.ids().eq(other.ids())
    }
}

/// Same keys in the same order.
impl<K: Ord + Clone + 'static, V: Data> Data for BTreeMap<K, V> {
    fn same(&self, other: &Self) -> bool {
        self.keys().eq(other.keys()) && same_elements(self.values(), other.values())
    }
}

/// Same keys in the same order.
impl<K, V, S> Data for IndexMap<K, V, S>
where
    K: Hash + Eq + Clone + 'static,
    V: Data,
    S: BuildHasher + Clone + 'static,
{
    fn same(&self, other: &Self) -> bool {
        self.keys().eq(other.keys()) && same_elements(self.values(), other.values())
    }
}

/// Same keys, in any order.
impl<K, V, S> Data for HashMap<K, V, S>
where
    K: Hash + Eq + Clone + 'static,
    V: Data,
    S: BuildHasher + Clone + 'static,
{
    fn same(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).map_or(false, |other| v.same(other)))
    }
}

#[cfg(test)]
mod tests {
    use super::Data;

    #[test]
    fn array_data() {
        let input = [1u8, 0, 0, 1, 0];
        assert!(input.same(&[1u8, 0, 0, 1, 0]));
        assert!(!input.same(&[1u8, 1, 0, 1, 0]));
    }

    #[test]
    fn float_bits() {
        assert!(f64::NAN.same(&f64::NAN));
        assert!(!0.0f64.same(&-0.0));
    }

    #[test]
    fn vec_length_mismatch() {
        assert!(vec![1, 2].same(&vec![1, 2]));
        assert!(!vec![1, 2].same(&vec![1, 2, 3]));
    }

    #[test]
    fn maps() {
        use indexmap::IndexMap;
        use std::collections::HashMap;

        let a: HashMap<u32, String> = [(1, "a".to_string()), (2, "b".to_string())].into_iter().collect();
        let b: HashMap<u32, String> = [(2, "b".to_string()), (1, "a".to_string())].into_iter().collect();
        assert!(a.same(&b));

        // order matters for ordered maps
        let a: IndexMap<u32, u8> = [(1, 0), (2, 0)].into_iter().collect();
        let b: IndexMap<u32, u8> = [(2, 0), (1, 0)].into_iter().collect();
        assert!(!a.same(&b));
        assert!(a.same(&a.clone()));
    }

    #[test]
    fn shared_pointers() {
        let a = std::rc::Rc::new(String::from("x"));
        let b = std::rc::Rc::new(String::from("x"));
        assert!(a.same(&a.clone()));
        assert!(!a.same(&b));
    }
}

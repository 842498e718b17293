//! Typed field projections.
//!
//! A lens is a reified accessor for some "child" part of type `B` of a "parent" object of type `A`.
//! Bindings are declared in terms of lenses so that every field path is checked by the compiler
//! when the binding is constructed: there is no lookup by name at runtime.
//!
//! Lenses are usually obtained from `#[derive(Lens)]`, which generates one zero-sized lens type per
//! field and exposes it as an associated constant named after the field:
//!
//! ```
//! use kyute_binding::Lens;
//!
//! #[derive(Clone, Lens)]
//! struct Settings {
//!     name: String,
//! }
//!
//! #[derive(Clone, Lens)]
//! struct State {
//!     settings: Settings,
//! }
//!
//! let mut state = State { settings: Settings { name: "a".to_string() } };
//! let name = State::settings.compose(Settings::name);
//! name.set(&mut state, "b".to_string());
//! assert_eq!(name.get(&state), "b");
//! ```
//!
//! Without the derive, [`lens!`](crate::lens!) builds a lens from a pair of closures.
use std::fmt;
use std::marker::PhantomData;

/// Trait implemented by "lens" types, which act like a reified accessor for
/// some "child" part of type `B` of a "parent" object of type `A`.
///
/// This trait is object safe: bindings store their lenses boxed.
pub trait Lens<A: ?Sized, B: ?Sized> {
    // --- Accessors ---
    fn get<'a>(&self, data: &'a A) -> &'a B;
    fn get_mut<'a>(&self, data: &'a mut A) -> &'a mut B;

    /// Overwrites the target.
    ///
    /// This is the only way bindings write through a lens, so lenses that need to observe writes
    /// only have to override this method.
    fn set(&self, data: &mut A, value: B)
    where
        B: Sized,
    {
        *self.get_mut(data) = value;
    }

    fn with<R, F: FnOnce(&B) -> R>(&self, data: &A, f: F) -> R
    where
        Self: Sized,
    {
        f(self.get(data))
    }

    fn with_mut<R, F: FnOnce(&mut B) -> R>(&self, data: &mut A, f: F) -> R
    where
        Self: Sized,
    {
        f(self.get_mut(data))
    }

    // --- Composition ---

    /// Lens composition.
    fn compose<K, C: ?Sized>(self, rhs: K) -> LensCompose<Self, K, B>
    where
        Self: Sized,
        K: Lens<B, C>,
    {
        LensCompose(self, rhs, PhantomData)
    }
}

impl<A: ?Sized, B: ?Sized, L: Lens<A, B> + ?Sized> Lens<A, B> for &L {
    fn get<'a>(&self, data: &'a A) -> &'a B {
        (**self).get(data)
    }

    fn get_mut<'a>(&self, data: &'a mut A) -> &'a mut B {
        (**self).get_mut(data)
    }

    fn set(&self, data: &mut A, value: B)
    where
        B: Sized,
    {
        (**self).set(data, value)
    }
}

//--------------------------------------------------------------------------------------------------

/// Identity lens.
#[derive(Copy, Clone, Debug, Default)]
pub struct IdentityLens;

impl<A: ?Sized> Lens<A, A> for IdentityLens {
    fn get<'a>(&self, data: &'a A) -> &'a A {
        data
    }

    fn get_mut<'a>(&self, data: &'a mut A) -> &'a mut A {
        data
    }
}

//--------------------------------------------------------------------------------------------------

/// Lens composition: combines `Lens<U,V>` and `Lens<V,W>` to `Lens<U,W>`.
///
/// Equivalent to applying two lenses in succession.
pub struct LensCompose<K, L, B: ?Sized>(pub K, pub L, pub PhantomData<fn(&B)>);

// #26925
impl<K: Clone, L: Clone, B: ?Sized> Clone for LensCompose<K, L, B> {
    fn clone(&self) -> Self {
        LensCompose(self.0.clone(), self.1.clone(), PhantomData)
    }
}

impl<K: Copy, L: Copy, B: ?Sized> Copy for LensCompose<K, L, B> {}

impl<K: fmt::Debug, L: fmt::Debug, B: ?Sized> fmt::Debug for LensCompose<K, L, B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}.{:?}", self.0, self.1)
    }
}

// the intermediate borrow `&'a B` needs `B: 'a` for every `'a`
impl<K, L, A: ?Sized, B: ?Sized + 'static, C: ?Sized> Lens<A, C> for LensCompose<K, L, B>
where
    K: Lens<A, B>,
    L: Lens<B, C>,
{
    fn get<'a>(&self, data: &'a A) -> &'a C {
        self.1.get(self.0.get(data))
    }

    fn get_mut<'a>(&self, data: &'a mut A) -> &'a mut C {
        self.1.get_mut(self.0.get_mut(data))
    }

    // Forward to the outer lens so that a lens observing writes still sees them when it is the
    // last step of a path.
    fn set(&self, data: &mut A, value: C)
    where
        C: Sized,
    {
        self.1.set(self.0.get_mut(data), value)
    }
}

//--------------------------------------------------------------------------------------------------

/// A lens built from a pair of accessor closures.
///
/// See also [`lens!`](crate::lens!).
#[derive(Copy, Clone)]
pub struct FieldLens<G, M> {
    get: G,
    get_mut: M,
}

impl<G, M> FieldLens<G, M> {
    pub fn new<A: ?Sized, B: ?Sized>(get: G, get_mut: M) -> FieldLens<G, M>
    where
        G: for<'a> Fn(&'a A) -> &'a B,
        M: for<'a> Fn(&'a mut A) -> &'a mut B,
    {
        FieldLens { get, get_mut }
    }
}

impl<G, M> fmt::Debug for FieldLens<G, M> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("FieldLens")
    }
}

impl<A: ?Sized, B: ?Sized, G, M> Lens<A, B> for FieldLens<G, M>
where
    G: for<'a> Fn(&'a A) -> &'a B,
    M: for<'a> Fn(&'a mut A) -> &'a mut B,
{
    fn get<'a>(&self, data: &'a A) -> &'a B {
        (self.get)(data)
    }

    fn get_mut<'a>(&self, data: &'a mut A) -> &'a mut B {
        (self.get_mut)(data)
    }
}

/// Builds a lens to a (possibly nested) field of a type, for types that don't derive `Lens`.
///
/// ```
/// use kyute_binding::{lens, Lens};
///
/// struct Window {
///     title: String,
///     size: (u32, u32),
/// }
///
/// let title = lens!(Window, title);
/// let width = lens!(Window, size.0);
/// let mut window = Window { title: "untitled".to_string(), size: (640, 480) };
/// title.set(&mut window, "hello".to_string());
/// assert_eq!(title.get(&window), "hello");
/// assert_eq!(*width.get(&window), 640);
/// ```
#[macro_export]
macro_rules! lens {
    ($ty:ty, $($field:tt).+) => {
        $crate::FieldLens::new::<$ty, _>(|data| &data.$($field).+, |data| &mut data.$($field).+)
    };
}

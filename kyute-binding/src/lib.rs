//! Two-way bindings between the state of a parent feature and the state of a child feature.
//!
//! # Terminology
//!
//! ## Lens
//! A typed accessor to a field of an aggregate, checked by the compiler (see [`Lens`]).
//!
//! ## Correspondence
//! A declared pairing between a field of the parent and a field of the child. Parent values are
//! copied into the child every time the child is read (_forward propagation_); child values are
//! copied back into the parent when the child is written (_reverse propagation_).
//! An optional equivalence predicate suppresses writes that wouldn't change anything.
//!
//! ## Accessor
//! Where the child comes from: a field of the parent, an optional field of the parent, or a
//! function of the parent (see [`Accessor`]).
//!
//! ## Lifting
//! Replicating correspondences declared over one child across a container of children
//! (see [`Lift`]). Containers that can hold several children are forward-only.
//!
//! ## Binding
//! An accessor and an ordered list of correspondences (see [`StateBinding`]).

// so that the derive macros can refer to `::kyute_binding` from within this crate
extern crate self as kyute_binding;

mod accessor;
mod binding;
mod data;
mod error;
mod field;
mod identified;
mod lens;
mod lift;

pub use accessor::Accessor;
pub use accessor::StorageLens;
pub use binding::StateBinding;
pub use binding::StaticBinding;
pub use data::Data;
pub use error::DuplicateIdError;
pub use field::Correspondence;
pub use field::Equivalence;
pub use field::FieldSync;
pub use field::Fields;
pub use field::ReadOnly;
pub use identified::Identifiable;
pub use identified::IdentifiedVec;
pub use kyute_binding_macros::Data;
pub use kyute_binding_macros::Lens;
pub use lens::FieldLens;
pub use lens::IdentityLens;
pub use lens::Lens;
pub use lens::LensCompose;
pub use lift::Cardinality;
pub use lift::Lift;
pub use lift::Lifted;
pub use lift::Many;
pub use lift::One;

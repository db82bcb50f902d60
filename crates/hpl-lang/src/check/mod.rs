//! Validation contracts run while the AST is built.
//!
//! - [`types`]: operand kinds of every expression node, checked as each node
//!   is constructed and again per predicate with alias bindings and, when a
//!   [`FieldTypeResolver`](crate::schema::FieldTypeResolver) is present,
//!   message field types.
//! - [`sanity`]: alias visibility and quantifier scoping for whole
//!   properties and assumptions.

mod funcs;
pub mod sanity;
pub mod types;


pub use sanity::{check_assumption, check_predicate, check_property};
pub use types::{Kinds, Ty, TypeEnv};

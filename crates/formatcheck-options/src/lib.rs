//! Typed formatting options and their resolution from style conventions.
//!
//! Convention files are untyped key/value text. This crate is the one place
//! where those strings become typed, language-scoped option values: a static
//! catalogue of [`OptionDescriptor`]s describes each option, and
//! [`resolve_options`] overlays a [`ConventionSnapshot`] onto an immutable
//! [`ResolvedOptionSet`].

pub mod catalog;
pub mod conventions;
pub mod descriptor;
pub mod resolve;
pub mod set;

pub use catalog::{default_options, find_by_convention_key, FORMATTING_OPTIONS};
pub use conventions::{
    ConventionError, ConventionProvider, ConventionSnapshot, FixedConventions, NoConventions,
};
pub use descriptor::{OptionDescriptor, OptionValue, ValueType};
pub use resolve::{resolve_options, OptionResolver};
pub use set::{OptionKey, ResolvedOptionSet};

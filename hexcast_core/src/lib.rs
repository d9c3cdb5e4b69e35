//! Shared data model and error types for hexcast.
//!
//! This crate defines the effect-tree input consumed by the spell compiler
//! and the unified error hierarchy used across the workspace:
//!
//! - [`SpellTemplate`] - A named, ordered list of effect nodes
//! - [`EffectNode`] - One variant-tagged node of a spell's effect tree
//! - [`TypeTag`] - The external type-identification scheme for effect variants
//! - [`HexcastError`] - All failure conditions, compiler-internal and boundary
//!
//! Effect trees are produced by an external provider (see `hexcast_cli`),
//! are immutable during compilation, and are discarded afterwards.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod effect;
pub mod error;

pub use effect::{tags, EffectNode, SpellTemplate, TypeTag};
pub use error::{HexcastError, HexcastResult};

//! Error types and result definitions for hexcast.
//!
//! All failure conditions in the workspace funnel into [`HexcastError`]:
//! dispatch failures, codegen defects, and the user-facing lookup error.
//! Compiler-internal failures abort the compilation in progress with no
//! partial-output guarantee; only [`HexcastError::SpellNotFound`] is
//! recoverable at the boundary.

use crate::effect::TypeTag;
use thiserror::Error;

/// The unified result type used throughout hexcast.
pub type HexcastResult<T> = Result<T, HexcastError>;

/// All hexcast error conditions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HexcastError {
    /// An effect node's type tag is outside the supported variant set.
    #[error("unsupported effect variant with type tag {tag}")]
    UnsupportedVariant {
        /// The unrecognized tag.
        tag: TypeTag,
    },

    /// A base effect's numeric type code has no registered handler.
    #[error("no handler registered for effect type {code}")]
    UnhandledEffectType {
        /// The offending type code.
        code: i32,
    },

    /// The general-purpose register pool is exhausted.
    ///
    /// This signals a codegen defect (a handler holding more temporaries
    /// than the configured pool), never a problem with the input spell.
    #[error("register allocation limit of {limit} exceeded")]
    RegisterExhausted {
        /// The configured pool size.
        limit: u8,
    },

    /// A label was bound to a second position.
    #[error("label L{label} bound twice")]
    LabelRebound {
        /// Index of the offending label.
        label: u32,
    },

    /// A label was referenced but never bound before finalization.
    #[error("label L{label} referenced but never bound")]
    UnboundLabel {
        /// Index of the offending label.
        label: u32,
    },

    /// No spell template matches the requested name.
    #[error("no spell named '{name}' found")]
    SpellNotFound {
        /// The name that failed to match.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spell_not_found_names_the_spell() {
        let err = HexcastError::SpellNotFound {
            name: "Frost Lance".into(),
        };
        assert_eq!(err.to_string(), "no spell named 'Frost Lance' found");
    }

    #[test]
    fn unhandled_effect_type_names_the_code() {
        let err = HexcastError::UnhandledEffectType { code: 42 };
        assert_eq!(err.to_string(), "no handler registered for effect type 42");
    }
}

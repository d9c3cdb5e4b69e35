//! Spell-to-bytecode compiler for the hexcast battle VM.
//!
//! This crate lowers a spell's effect tree into linear, position-independent
//! bytecode for the register-based battle VM.
//!
//! # Architecture
//!
//! ```text
//! Effect tree → Effect Dispatcher → Spell Compiler → Code Emitter backend
//! ```
//!
//! # Key Types
//!
//! - [`SpellCompiler`] - Per-variant codegen handlers and branch assembly
//! - [`EffectVisitor`] - Dispatch over the ten effect variants
//! - [`RegisterAllocator`] - Scoped borrowing of general-purpose registers
//! - [`CodeEmitter`] - Abstract instruction sink, one method per VM opcode
//! - [`DebugEmitter`] - Reference backend rendering human-readable listings
//!
//! # Example
//!
//! ```
//! use hexcast_compiler::{effect_types, DebugEmitter, SpellCompiler};
//! use hexcast_core::{EffectNode, SpellTemplate};
//!
//! let spell = SpellTemplate::new(
//!     "Siphon",
//!     vec![EffectNode::base(effect_types::STEAL_HEALTH, 120, 0, 0.5)],
//! );
//!
//! let compiler = SpellCompiler::new(DebugEmitter::new());
//! let listing = compiler.compile(&spell).unwrap();
//!
//! assert_eq!(
//!     listing,
//!     " 0: LOAD $ARG, 120\n 1: ATTACK\n 2: LOAD $R0, 50\n 3: PCT $ARG, $R0\n 4: DRAIN\n"
//! );
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod compiler;
pub mod debug;
pub mod dispatch;
pub mod emitter;
pub mod regalloc;

pub use compiler::{effect_types, SpellCompiler, DEFAULT_REGISTER_LIMIT};
pub use debug::DebugEmitter;
pub use dispatch::EffectVisitor;
pub use emitter::{CodeEmitter, Label, Register};
pub use regalloc::{RegisterAllocator, ScopedRegister};

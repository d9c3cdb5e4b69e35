//! The abstract code emission interface and its operand types.
//!
//! [`CodeEmitter`] is an instruction sink with one method per VM opcode.
//! Backends choose the physical representation: [`crate::DebugEmitter`]
//! renders human-readable text for diagnostics; a binary encoder for the VM
//! is an alternative implementation of the same trait. The compiler depends
//! only on this interface.
//!
//! Emission order is program order. Backends must not reorder instructions:
//! label resolution and the contiguity of the guard-jump block emitted for
//! randomized branches both depend on it.

use hexcast_core::HexcastResult;
use std::fmt;

/// A symbolic operand identifying one VM register.
///
/// Special-purpose registers have fixed VM-defined semantics and are never
/// allocated or released. General-purpose registers are interchangeable and
/// exclusively managed by [`crate::RegisterAllocator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    /// General-purpose register, managed by the allocator.
    Gp(u8),
    /// Always reads as zero.
    Zero,
    /// Argument to the spell; base amount for attack/heal/drain.
    Arg,
    /// Target of the spell, including behavior flag bits.
    Tgt,
    /// Additional armor piercing.
    Ap,
    /// Outgoing damage multiplier.
    DmgMul,
    /// Flat damage bonus.
    DmgFlat,
    /// Damage cap.
    DmgCap,
    /// Outgoing heal multiplier.
    HealMul,
    /// Flat heal bonus.
    HealFlat,
    /// Heal cap.
    HealCap,
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Register::Gp(index) => write!(f, "R{index}"),
            Register::Zero => f.write_str("ZERO"),
            Register::Arg => f.write_str("ARG"),
            Register::Tgt => f.write_str("TGT"),
            Register::Ap => f.write_str("AP"),
            Register::DmgMul => f.write_str("DMUL"),
            Register::DmgFlat => f.write_str("DFLAT"),
            Register::DmgCap => f.write_str("DCAP"),
            Register::HealMul => f.write_str("HMUL"),
            Register::HealFlat => f.write_str("HFLAT"),
            Register::HealCap => f.write_str("HCAP"),
        }
    }
}

/// A symbolic instruction address.
///
/// Labels are created unbound by [`CodeEmitter::create_label`], may be
/// referenced by control-flow instructions before binding, and are bound
/// exactly once. Every referenced label must be bound by the time the
/// program is finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(u32);

impl Label {
    /// Creates a label handle with the given index.
    ///
    /// Intended for emitter backends; compiler code obtains labels from
    /// [`CodeEmitter::create_label`].
    #[inline]
    pub const fn new(index: u32) -> Self {
        Label(index)
    }

    /// The label's index, unique within one emitter.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// An instruction sink with one operation per VM opcode.
///
/// Every operand is a register reference, a label reference, or a 32-bit
/// signed constant. Implementors must treat all constants as 32-bit signed
/// values and must support label references made before the label is bound.
pub trait CodeEmitter {
    /// The finalized program representation this backend produces.
    type Program;

    /// Creates a fresh, unbound label.
    fn create_label(&mut self) -> Label;

    /// Binds a label to the current position in the instruction stream.
    ///
    /// Fails with `LabelRebound` if the label is already bound.
    fn bind_label(&mut self, label: Label) -> HexcastResult<()>;

    /// Moves a value from source to destination register.
    fn emit_mov(&mut self, dst: Register, src: Register);

    /// Loads a 32-bit constant into the destination register.
    fn emit_load(&mut self, dst: Register, value: i32);

    /// Adds the source register into the destination register.
    fn emit_add(&mut self, dst: Register, src: Register);

    /// Adds an immediate value to the destination register.
    fn emit_addi(&mut self, dst: Register, value: i32);

    /// Rescales the destination register to (source / 100) of its value.
    fn emit_pct(&mut self, dst: Register, src: Register);

    /// Multiplies the destination by the source register.
    fn emit_mul(&mut self, dst: Register, src: Register);

    /// Divides the destination by the source register.
    fn emit_div(&mut self, dst: Register, src: Register);

    /// Shifts the destination right by the source register.
    fn emit_shr(&mut self, dst: Register, src: Register);

    /// Bitwise ANDs the source into the destination register.
    fn emit_and(&mut self, dst: Register, src: Register);

    /// Bitwise ORs the source into the destination register.
    fn emit_or(&mut self, dst: Register, src: Register);

    /// Bitwise XORs the source into the destination register.
    fn emit_xor(&mut self, dst: Register, src: Register);

    /// Writes the bitwise complement of the source into the destination.
    fn emit_not(&mut self, dst: Register, src: Register);

    /// Sets the given bit index in the destination register.
    fn emit_bset(&mut self, dst: Register, bit: u8);

    /// Clears the given bit index in the destination register.
    fn emit_bclr(&mut self, dst: Register, bit: u8);

    /// Jumps to the instruction address held in a register.
    fn emit_jmpr(&mut self, target: Register);

    /// Unconditionally jumps to a label, bound or not yet bound.
    fn emit_jmp(&mut self, label: Label);

    /// Jumps to a label if the two registers compare equal.
    fn emit_jeq(&mut self, a: Register, b: Register, label: Label);

    /// Randomly executes exactly one of the next `count` instructions.
    fn emit_rng(&mut self, count: u32);

    /// Attacks with the current special-purpose register configuration.
    fn emit_attack(&mut self);

    /// Heals with the current special-purpose register configuration.
    fn emit_heal(&mut self);

    /// Heals by the value in ARG without applying outgoing heal boosts.
    fn emit_drain(&mut self);

    /// Reshuffles the spell deck and restores the player's hand.
    fn emit_reshuffle(&mut self);

    /// Finalizes the program.
    ///
    /// Fails with `UnboundLabel` if any referenced label was never bound.
    fn finish(self) -> HexcastResult<Self::Program>
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_names() {
        assert_eq!(Register::Gp(3).to_string(), "R3");
        assert_eq!(Register::Arg.to_string(), "ARG");
        assert_eq!(Register::DmgMul.to_string(), "DMUL");
        assert_eq!(Register::HealCap.to_string(), "HCAP");
    }

    #[test]
    fn label_round_trips_its_index() {
        assert_eq!(Label::new(7).index(), 7);
    }
}

//! Code emitter backend producing human-readable listings.
//!
//! Each instruction is rendered as `"<n>: OP operands"` with a zero-based
//! instruction counter right-aligned to width 2, register operands as
//! `$NAME`, and label operands as `#L<i>`. Binding a label inserts a
//! `"L<i>:"` line carrying no instruction number. The output is a debugging
//! and verification aid, not the wire format consumed by the VM.

use crate::emitter::{CodeEmitter, Label, Register};
use hexcast_core::{HexcastError, HexcastResult};
use rustc_hash::FxHashSet;

/// A code emitter which produces human-readable opcodes for debugging.
#[derive(Debug, Default)]
pub struct DebugEmitter {
    lines: Vec<String>,
    instruction_count: u32,
    next_label: u32,
    bound: FxHashSet<u32>,
    referenced: FxHashSet<u32>,
}

impl DebugEmitter {
    /// Creates an empty emitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of instructions emitted so far (bind lines excluded).
    pub fn instruction_count(&self) -> u32 {
        self.instruction_count
    }

    fn push(&mut self, opcode: String) {
        self.lines.push(format!("{:>2}: {}", self.instruction_count, opcode));
        self.instruction_count += 1;
    }

    fn label_ref(&mut self, label: Label) -> String {
        self.referenced.insert(label.index());
        format!("#L{}", label.index())
    }
}

impl CodeEmitter for DebugEmitter {
    type Program = String;

    fn create_label(&mut self) -> Label {
        let label = Label::new(self.next_label);
        self.next_label += 1;
        label
    }

    fn bind_label(&mut self, label: Label) -> HexcastResult<()> {
        if !self.bound.insert(label.index()) {
            return Err(HexcastError::LabelRebound {
                label: label.index(),
            });
        }
        self.lines.push(format!("L{}:", label.index()));
        Ok(())
    }

    fn emit_mov(&mut self, dst: Register, src: Register) {
        self.push(format!("MOV ${dst}, ${src}"));
    }

    fn emit_load(&mut self, dst: Register, value: i32) {
        self.push(format!("LOAD ${dst}, {value}"));
    }

    fn emit_add(&mut self, dst: Register, src: Register) {
        self.push(format!("ADD ${dst}, ${src}"));
    }

    fn emit_addi(&mut self, dst: Register, value: i32) {
        self.push(format!("ADDI ${dst}, {value}"));
    }

    fn emit_pct(&mut self, dst: Register, src: Register) {
        self.push(format!("PCT ${dst}, ${src}"));
    }

    fn emit_mul(&mut self, dst: Register, src: Register) {
        self.push(format!("MUL ${dst}, ${src}"));
    }

    fn emit_div(&mut self, dst: Register, src: Register) {
        self.push(format!("DIV ${dst}, ${src}"));
    }

    fn emit_shr(&mut self, dst: Register, src: Register) {
        self.push(format!("SHR ${dst}, ${src}"));
    }

    fn emit_and(&mut self, dst: Register, src: Register) {
        self.push(format!("AND ${dst}, ${src}"));
    }

    fn emit_or(&mut self, dst: Register, src: Register) {
        self.push(format!("OR ${dst}, ${src}"));
    }

    fn emit_xor(&mut self, dst: Register, src: Register) {
        self.push(format!("XOR ${dst}, ${src}"));
    }

    fn emit_not(&mut self, dst: Register, src: Register) {
        self.push(format!("NOT ${dst}, ${src}"));
    }

    fn emit_bset(&mut self, dst: Register, bit: u8) {
        self.push(format!("BSET ${dst}, {bit}"));
    }

    fn emit_bclr(&mut self, dst: Register, bit: u8) {
        self.push(format!("BCLR ${dst}, {bit}"));
    }

    fn emit_jmpr(&mut self, target: Register) {
        self.push(format!("JMPR ${target}"));
    }

    fn emit_jmp(&mut self, label: Label) {
        let target = self.label_ref(label);
        self.push(format!("JMP {target}"));
    }

    fn emit_jeq(&mut self, a: Register, b: Register, label: Label) {
        let target = self.label_ref(label);
        self.push(format!("JEQ ${a}, ${b}, {target}"));
    }

    fn emit_rng(&mut self, count: u32) {
        self.push(format!("RNG {count}"));
    }

    fn emit_attack(&mut self) {
        self.push("ATTACK".into());
    }

    fn emit_heal(&mut self) {
        self.push("HEAL".into());
    }

    fn emit_drain(&mut self) {
        self.push("DRAIN".into());
    }

    fn emit_reshuffle(&mut self) {
        self.push("RESHUFFLE".into());
    }

    fn finish(self) -> HexcastResult<String> {
        if let Some(unbound) = self
            .referenced
            .iter()
            .filter(|index| !self.bound.contains(index))
            .min()
        {
            return Err(HexcastError::UnboundLabel { label: *unbound });
        }

        let mut program = self.lines.join("\n");
        if !program.is_empty() {
            program.push('\n');
        }
        Ok(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_numbered_instructions() {
        let mut emitter = DebugEmitter::new();
        emitter.emit_load(Register::Arg, 100);
        emitter.emit_attack();

        let program = emitter.finish().unwrap();
        assert_eq!(program, " 0: LOAD $ARG, 100\n 1: ATTACK\n");
    }

    #[test]
    fn bind_lines_carry_no_instruction_number() {
        let mut emitter = DebugEmitter::new();
        let label = emitter.create_label();
        emitter.emit_jmp(label);
        emitter.bind_label(label).unwrap();
        emitter.emit_attack();

        let program = emitter.finish().unwrap();
        assert_eq!(program, " 0: JMP #L0\nL0:\n 1: ATTACK\n");
    }

    #[test]
    fn forward_references_resolve_to_one_bind() {
        let mut emitter = DebugEmitter::new();
        let label = emitter.create_label();
        emitter.emit_jmp(label);
        emitter.emit_jmp(label);
        emitter.emit_jmp(label);
        emitter.bind_label(label).unwrap();

        let program = emitter.finish().unwrap();
        assert_eq!(program.matches("#L0").count(), 3);
        assert_eq!(program.matches("\nL0:").count(), 1);
    }

    #[test]
    fn rebinding_a_label_fails() {
        let mut emitter = DebugEmitter::new();
        let label = emitter.create_label();
        emitter.bind_label(label).unwrap();

        assert_eq!(
            emitter.bind_label(label),
            Err(HexcastError::LabelRebound { label: 0 })
        );
    }

    #[test]
    fn unbound_reference_fails_at_finish() {
        let mut emitter = DebugEmitter::new();
        let label = emitter.create_label();
        emitter.emit_jmp(label);

        assert_eq!(
            emitter.finish(),
            Err(HexcastError::UnboundLabel { label: 0 })
        );
    }

    #[test]
    fn bound_but_unreferenced_label_is_fine() {
        let mut emitter = DebugEmitter::new();
        let label = emitter.create_label();
        emitter.bind_label(label).unwrap();

        assert_eq!(emitter.finish().unwrap(), "L0:\n");
    }

    #[test]
    fn empty_program_is_empty_text() {
        assert_eq!(DebugEmitter::new().finish().unwrap(), "");
    }

    #[test]
    fn counter_right_aligns_to_width_two() {
        let mut emitter = DebugEmitter::new();
        for _ in 0..11 {
            emitter.emit_heal();
        }

        let program = emitter.finish().unwrap();
        assert!(program.starts_with(" 0: HEAL\n"));
        assert!(program.contains("\n10: HEAL\n"));
    }
}

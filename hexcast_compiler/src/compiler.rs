//! The compiler that turns spell effects into battle VM bytecode.
//!
//! [`SpellCompiler`] walks a spell's effect tree through the
//! [`EffectVisitor`] dispatch and emits instructions through a
//! [`CodeEmitter`] backend, borrowing temporaries from a
//! [`RegisterAllocator`] as needed. One compiler instance serves exactly one
//! [`SpellCompiler::compile`] call; the allocator and emitter are owned by
//! it and discarded with it.
//!
//! The ten effect variants fall into three handler shapes:
//!
//! - payload: prologue loads plus one entry of the effect-type table
//! - sequence: children compiled in order
//! - random: the randomized-branch assembly below
//!
//! # Randomized branches
//!
//! A random composite with N children compiles to an `RNG N` instruction
//! followed by N guard jumps, one per child in order. At runtime exactly one
//! guard jump survives and transfers control into its child's code; each
//! child except the last ends in a jump to a shared exit label bound after
//! the final child. No child's instructions are duplicated and no other
//! child executes.

use crate::dispatch::EffectVisitor;
use crate::emitter::{CodeEmitter, Label, Register};
use crate::regalloc::RegisterAllocator;
use hexcast_core::{EffectNode, HexcastError, HexcastResult, SpellTemplate};
use smallvec::SmallVec;
use tracing::debug;

/// Register pool size used when no explicit limit is given.
pub const DEFAULT_REGISTER_LIMIT: u8 = 10;

/// Flag bit on the TGT register that suppresses critical-hit resolution.
const TARGET_NO_CRIT_BIT: u8 = 6;

/// Numeric `effect_type` codes with registered handlers.
pub mod effect_types {
    /// Attack with the current special-purpose register configuration.
    pub const DAMAGE: i32 = 1;
    /// Attack with critical-hit resolution suppressed.
    pub const DAMAGE_NO_CRIT: i32 = 2;
    /// Heal, subject to outgoing heal boosts at runtime.
    pub const HEAL: i32 = 3;
    /// Heal without outgoing heal boosts.
    pub const DRAIN: i32 = 4;
    /// Attack, then return a fraction of the base damage as an unboosted
    /// heal.
    pub const STEAL_HEALTH: i32 = 5;
}

/// Stack-allocated entry-label block for randomized branches.
///
/// Random composites rarely exceed a handful of alternatives, so the guard
/// labels stay off the heap in the common case.
type EntryLabels = SmallVec<[Label; 8]>;

type EffectTypeHandler<E> = fn(&mut SpellCompiler<E>, &EffectNode) -> HexcastResult<()>;

/// Compiles the effects of spells into bytecode for the battle VM.
///
/// The emitter backend decides what the finished program looks like; see
/// [`crate::DebugEmitter`] for the human-readable reference backend.
pub struct SpellCompiler<E: CodeEmitter> {
    emitter: E,
    regalloc: RegisterAllocator,
}

impl<E: CodeEmitter> SpellCompiler<E> {
    /// Creates a compiler with the default register pool.
    pub fn new(emitter: E) -> Self {
        Self::with_register_limit(emitter, DEFAULT_REGISTER_LIMIT)
    }

    /// Creates a compiler with an explicit register pool size.
    pub fn with_register_limit(emitter: E, register_limit: u8) -> Self {
        Self {
            emitter,
            regalloc: RegisterAllocator::new(register_limit),
        }
    }

    /// Compiles a spell and finalizes the emitted program.
    ///
    /// Consumes the compiler: the allocator and emitter serve exactly one
    /// compilation. On error the spell's output must be discarded; there is
    /// no partial-output guarantee.
    pub fn compile(mut self, spell: &SpellTemplate) -> HexcastResult<E::Program> {
        debug!(spell = %spell.name, effects = spell.effects.len(), "compiling spell");
        self.visit(spell)?;
        self.emitter.finish()
    }

    fn effect_type_handler(code: i32) -> Option<EffectTypeHandler<E>> {
        match code {
            effect_types::DAMAGE => Some(Self::compile_damage),
            effect_types::DAMAGE_NO_CRIT => Some(Self::compile_damage_no_crit),
            effect_types::HEAL => Some(Self::compile_heal),
            effect_types::DRAIN => Some(Self::compile_drain),
            effect_types::STEAL_HEALTH => Some(Self::compile_steal_health),
            _ => None,
        }
    }

    /// Lowers a payload-shaped node: prologue loads, then the effect-type
    /// handler.
    ///
    /// The table is consulted before anything is emitted so that an
    /// unhandled code produces zero instructions for the node.
    fn compile_payload(&mut self, effect: &EffectNode) -> HexcastResult<()> {
        let handler = Self::effect_type_handler(effect.effect_type).ok_or(
            HexcastError::UnhandledEffectType {
                code: effect.effect_type,
            },
        )?;

        // The VM resets registers to zero; zero values are never loaded.
        if effect.effect_param != 0 {
            self.emitter.emit_load(Register::Arg, effect.effect_param);
        }
        if effect.armor_piercing_param != 0 {
            self.emitter
                .emit_load(Register::Ap, effect.armor_piercing_param);
        }

        handler(self, effect)
    }

    fn compile_damage(&mut self, _effect: &EffectNode) -> HexcastResult<()> {
        self.emitter.emit_attack();
        Ok(())
    }

    fn compile_damage_no_crit(&mut self, _effect: &EffectNode) -> HexcastResult<()> {
        self.emitter.emit_bset(Register::Tgt, TARGET_NO_CRIT_BIT);
        self.emitter.emit_attack();
        Ok(())
    }

    fn compile_heal(&mut self, effect: &EffectNode) -> HexcastResult<()> {
        self.scale_arg(effect.heal_modifier)?;
        self.emitter.emit_heal();
        Ok(())
    }

    fn compile_drain(&mut self, effect: &EffectNode) -> HexcastResult<()> {
        self.scale_arg(effect.heal_modifier)?;
        self.emitter.emit_drain();
        Ok(())
    }

    fn compile_steal_health(&mut self, effect: &EffectNode) -> HexcastResult<()> {
        self.emitter.emit_attack();

        // The damage dealt comes back as an unboosted heal of the same ARG.
        self.scale_arg(effect.heal_modifier)?;
        self.emitter.emit_drain();
        Ok(())
    }

    /// Rescales ARG to `heal_modifier` of its value through a borrowed
    /// temporary.
    ///
    /// Emitted unconditionally, including for a computed 100%.
    fn scale_arg(&mut self, heal_modifier: f64) -> HexcastResult<()> {
        let percentage = (heal_modifier * 100.0).round() as i32;

        let tmp = self.regalloc.borrow()?;
        self.emitter.emit_load(*tmp, percentage);
        self.emitter.emit_pct(Register::Arg, *tmp);
        Ok(())
    }

    /// Compiles children back to back, in order.
    fn compile_sequence(&mut self, children: &[EffectNode]) -> HexcastResult<()> {
        for child in children {
            self.visit_effect(child)?;
        }
        Ok(())
    }

    /// Linearizes a composite of which exactly one child executes at
    /// runtime, chosen uniformly at random.
    fn compile_random_choice(&mut self, children: &[EffectNode]) -> HexcastResult<()> {
        if children.is_empty() {
            return Ok(());
        }

        // Guard-jump block: RNG nullifies all but one of the next N jumps.
        self.emitter.emit_rng(children.len() as u32);
        let mut entries = EntryLabels::new();
        for _ in children {
            let entry = self.emitter.create_label();
            self.emitter.emit_jmp(entry);
            entries.push(entry);
        }

        let exit = self.emitter.create_label();
        let last = children.len() - 1;
        for (index, (entry, child)) in entries.iter().zip(children).enumerate() {
            self.emitter.bind_label(*entry)?;
            self.visit_effect(child)?;
            if index != last {
                self.emitter.emit_jmp(exit);
            }
        }

        self.emitter.bind_label(exit)
    }
}

impl<E: CodeEmitter> EffectVisitor for SpellCompiler<E> {
    fn visit_spell_effect(&mut self, effect: &EffectNode) -> HexcastResult<()> {
        self.compile_payload(effect)
    }

    fn visit_shadow_spell_effect(&mut self, effect: &EffectNode) -> HexcastResult<()> {
        self.compile_payload(effect)
    }

    fn visit_count_based_spell_effect(&mut self, effect: &EffectNode) -> HexcastResult<()> {
        self.compile_payload(effect)
    }

    fn visit_random_spell_effect(&mut self, effect: &EffectNode) -> HexcastResult<()> {
        self.compile_random_choice(&effect.children)
    }

    fn visit_random_per_target_spell_effect(&mut self, effect: &EffectNode) -> HexcastResult<()> {
        // The per-target re-roll happens in the VM; the emitted shape is
        // identical to the single-roll composite.
        self.compile_random_choice(&effect.children)
    }

    fn visit_variable_spell_effect(&mut self, effect: &EffectNode) -> HexcastResult<()> {
        self.compile_sequence(&effect.children)
    }

    fn visit_conditional_spell_effect(&mut self, effect: &EffectNode) -> HexcastResult<()> {
        self.compile_sequence(&effect.children)
    }

    fn visit_effect_list_spell_effect(&mut self, effect: &EffectNode) -> HexcastResult<()> {
        self.compile_sequence(&effect.children)
    }

    fn visit_delay_spell_effect(&mut self, effect: &EffectNode) -> HexcastResult<()> {
        self.compile_payload(effect)
    }

    fn visit_hanging_conversion_spell_effect(&mut self, effect: &EffectNode) -> HexcastResult<()> {
        self.compile_payload(effect)
    }
}

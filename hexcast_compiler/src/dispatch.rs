//! Dispatch over the effect variants of a spell.
//!
//! [`EffectVisitor`] is the routing seam between the effect tree and the
//! codegen handlers. [`EffectVisitor::visit`] walks a spell's ordered effect
//! list; each node is matched against the fixed ten-variant tag table and
//! routed to exactly one handler. The dispatcher emits nothing itself.
//!
//! Handlers assume they are invoked only through dispatch; composite
//! handlers recurse by calling [`EffectVisitor::visit_effect`] on their
//! children rather than invoking sibling handlers directly.

use hexcast_core::{tags, EffectNode, HexcastError, HexcastResult, SpellTemplate};

/// Visitor interface for processing the supported effect variants.
///
/// Implementors provide one method per variant; `visit` and `visit_effect`
/// perform the routing and should not be overridden.
pub trait EffectVisitor {
    /// Visits a spell template by processing all its effects in order.
    fn visit(&mut self, spell: &SpellTemplate) -> HexcastResult<()> {
        for effect in &spell.effects {
            self.visit_effect(effect)?;
        }
        Ok(())
    }

    /// Routes one effect node to its variant handler.
    ///
    /// A node whose tag is outside the ten-variant set fails with
    /// `UnsupportedVariant` before any instruction is emitted for it.
    fn visit_effect(&mut self, effect: &EffectNode) -> HexcastResult<()> {
        match effect.tag {
            tags::SPELL_EFFECT => self.visit_spell_effect(effect),
            tags::SHADOW_SPELL_EFFECT => self.visit_shadow_spell_effect(effect),
            tags::COUNT_BASED_SPELL_EFFECT => self.visit_count_based_spell_effect(effect),
            tags::RANDOM_SPELL_EFFECT => self.visit_random_spell_effect(effect),
            tags::RANDOM_PER_TARGET_SPELL_EFFECT => {
                self.visit_random_per_target_spell_effect(effect)
            }
            tags::VARIABLE_SPELL_EFFECT => self.visit_variable_spell_effect(effect),
            tags::CONDITIONAL_SPELL_EFFECT => self.visit_conditional_spell_effect(effect),
            tags::EFFECT_LIST_SPELL_EFFECT => self.visit_effect_list_spell_effect(effect),
            tags::DELAY_SPELL_EFFECT => self.visit_delay_spell_effect(effect),
            tags::HANGING_CONVERSION_SPELL_EFFECT => {
                self.visit_hanging_conversion_spell_effect(effect)
            }
            tag => Err(HexcastError::UnsupportedVariant { tag }),
        }
    }

    /// Visits a `SpellEffect` node.
    fn visit_spell_effect(&mut self, effect: &EffectNode) -> HexcastResult<()>;

    /// Visits a `ShadowSpellEffect` node.
    fn visit_shadow_spell_effect(&mut self, effect: &EffectNode) -> HexcastResult<()>;

    /// Visits a `CountBasedSpellEffect` node.
    fn visit_count_based_spell_effect(&mut self, effect: &EffectNode) -> HexcastResult<()>;

    /// Visits a `RandomSpellEffect` node.
    fn visit_random_spell_effect(&mut self, effect: &EffectNode) -> HexcastResult<()>;

    /// Visits a `RandomPerTargetSpellEffect` node.
    fn visit_random_per_target_spell_effect(&mut self, effect: &EffectNode) -> HexcastResult<()>;

    /// Visits a `VariableSpellEffect` node.
    fn visit_variable_spell_effect(&mut self, effect: &EffectNode) -> HexcastResult<()>;

    /// Visits a `ConditionalSpellEffect` node.
    fn visit_conditional_spell_effect(&mut self, effect: &EffectNode) -> HexcastResult<()>;

    /// Visits an `EffectListSpellEffect` node.
    fn visit_effect_list_spell_effect(&mut self, effect: &EffectNode) -> HexcastResult<()>;

    /// Visits a `DelaySpellEffect` node.
    fn visit_delay_spell_effect(&mut self, effect: &EffectNode) -> HexcastResult<()>;

    /// Visits a `HangingConversionSpellEffect` node.
    fn visit_hanging_conversion_spell_effect(&mut self, effect: &EffectNode) -> HexcastResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexcast_core::TypeTag;

    /// Records which handler ran, without emitting anything.
    #[derive(Default)]
    struct Recorder {
        visited: Vec<&'static str>,
    }

    macro_rules! record {
        ($method:ident, $name:literal) => {
            fn $method(&mut self, _effect: &EffectNode) -> HexcastResult<()> {
                self.visited.push($name);
                Ok(())
            }
        };
    }

    impl EffectVisitor for Recorder {
        record!(visit_spell_effect, "spell");
        record!(visit_shadow_spell_effect, "shadow");
        record!(visit_count_based_spell_effect, "count_based");
        record!(visit_random_spell_effect, "random");
        record!(visit_random_per_target_spell_effect, "random_per_target");
        record!(visit_variable_spell_effect, "variable");
        record!(visit_conditional_spell_effect, "conditional");
        record!(visit_effect_list_spell_effect, "effect_list");
        record!(visit_delay_spell_effect, "delay");
        record!(visit_hanging_conversion_spell_effect, "hanging_conversion");
    }

    #[test]
    fn routes_each_variant_to_its_handler() {
        let variants = [
            (tags::SPELL_EFFECT, "spell"),
            (tags::SHADOW_SPELL_EFFECT, "shadow"),
            (tags::COUNT_BASED_SPELL_EFFECT, "count_based"),
            (tags::RANDOM_SPELL_EFFECT, "random"),
            (tags::RANDOM_PER_TARGET_SPELL_EFFECT, "random_per_target"),
            (tags::VARIABLE_SPELL_EFFECT, "variable"),
            (tags::CONDITIONAL_SPELL_EFFECT, "conditional"),
            (tags::EFFECT_LIST_SPELL_EFFECT, "effect_list"),
            (tags::DELAY_SPELL_EFFECT, "delay"),
            (tags::HANGING_CONVERSION_SPELL_EFFECT, "hanging_conversion"),
        ];

        let mut recorder = Recorder::default();
        for (tag, _) in &variants {
            recorder.visit_effect(&EffectNode::new(*tag)).unwrap();
        }

        let expected: Vec<&str> = variants.iter().map(|(_, name)| *name).collect();
        assert_eq!(recorder.visited, expected);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let stray = TypeTag::from_class_name("PolymorphSpellEffect");
        let mut recorder = Recorder::default();

        let err = recorder.visit_effect(&EffectNode::new(stray)).unwrap_err();
        assert_eq!(err, HexcastError::UnsupportedVariant { tag: stray });
        assert!(recorder.visited.is_empty());
    }

    #[test]
    fn visits_template_effects_in_order() {
        let spell = SpellTemplate::new(
            "test",
            vec![
                EffectNode::new(tags::SPELL_EFFECT),
                EffectNode::new(tags::RANDOM_SPELL_EFFECT),
                EffectNode::new(tags::DELAY_SPELL_EFFECT),
            ],
        );

        let mut recorder = Recorder::default();
        recorder.visit(&spell).unwrap();
        assert_eq!(recorder.visited, ["spell", "random", "delay"]);
    }
}

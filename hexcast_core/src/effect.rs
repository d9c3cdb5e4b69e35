//! The effect-tree data model consumed by the spell compiler.
//!
//! A spell is described by a [`SpellTemplate`]: a name plus an ordered list
//! of [`EffectNode`]s. Each node carries a [`TypeTag`] identifying its
//! variant, the payload fields shared by all variants, and - for composite
//! variants - an ordered list of child nodes.
//!
//! The tree is read-only input: an external provider builds it, one
//! compilation consumes it, and it is discarded afterwards. Field presence
//! per variant is a provider-side concern; the compiler assumes the fields
//! it reads are meaningful for the variant it is processing.

use std::fmt;

/// External type tag identifying an effect node's variant.
///
/// Tags are 32-bit FNV-1a hashes of the variant's class name, mirroring the
/// type-identification scheme of the game's object system. The compiler
/// recognizes exactly the ten tags in [`tags`]; anything else is rejected at
/// dispatch with `UnsupportedVariant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct TypeTag(pub u32);

impl TypeTag {
    /// Computes the tag for a variant class name.
    pub const fn from_class_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash: u32 = 0x811c_9dc5;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u32;
            hash = hash.wrapping_mul(0x0100_0193);
            i += 1;
        }
        TypeTag(hash)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Tags for the ten supported effect variants.
pub mod tags {
    use super::TypeTag;

    /// Base effect; behavior selected by the numeric `effect_type` code.
    pub const SPELL_EFFECT: TypeTag = TypeTag::from_class_name("SpellEffect");
    /// Shadow-enhanced effect carrying the standard payload.
    pub const SHADOW_SPELL_EFFECT: TypeTag = TypeTag::from_class_name("ShadowSpellEffect");
    /// Payload effect repeated a VM-determined number of times.
    pub const COUNT_BASED_SPELL_EFFECT: TypeTag =
        TypeTag::from_class_name("CountBasedSpellEffect");
    /// Composite; exactly one child executes, chosen at random.
    pub const RANDOM_SPELL_EFFECT: TypeTag = TypeTag::from_class_name("RandomSpellEffect");
    /// Composite; the random choice is re-rolled per target.
    pub const RANDOM_PER_TARGET_SPELL_EFFECT: TypeTag =
        TypeTag::from_class_name("RandomPerTargetSpellEffect");
    /// Composite; child selection driven by a cast-time variable.
    pub const VARIABLE_SPELL_EFFECT: TypeTag = TypeTag::from_class_name("VariableSpellEffect");
    /// Composite; children gated by VM-evaluated conditions.
    pub const CONDITIONAL_SPELL_EFFECT: TypeTag =
        TypeTag::from_class_name("ConditionalSpellEffect");
    /// Composite; children execute in order.
    pub const EFFECT_LIST_SPELL_EFFECT: TypeTag =
        TypeTag::from_class_name("EffectListSpellEffect");
    /// Payload effect applied after a VM-managed delay.
    pub const DELAY_SPELL_EFFECT: TypeTag = TypeTag::from_class_name("DelaySpellEffect");
    /// Payload effect converting hanging effects on the target.
    pub const HANGING_CONVERSION_SPELL_EFFECT: TypeTag =
        TypeTag::from_class_name("HangingConversionSpellEffect");
}

/// One variant-tagged node of a spell's effect tree.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectNode {
    /// The variant tag assigned by the provider.
    pub tag: TypeTag,
    /// Numeric behavior code; meaningful for payload-shaped variants only.
    pub effect_type: i32,
    /// Base amount loaded into the ARG register when non-zero.
    pub effect_param: i32,
    /// Armor-piercing amount loaded into the AP register when non-zero.
    pub armor_piercing_param: i32,
    /// Heal scaling factor; 0.5 scales ARG to 50%.
    pub heal_modifier: f64,
    /// Ordered child nodes; non-empty for composite variants only.
    pub children: Vec<EffectNode>,
}

impl EffectNode {
    /// Creates an empty node with the given variant tag.
    pub fn new(tag: TypeTag) -> Self {
        Self {
            tag,
            effect_type: 0,
            effect_param: 0,
            armor_piercing_param: 0,
            heal_modifier: 0.0,
            children: Vec::new(),
        }
    }

    /// Creates a base `SpellEffect` node with the given payload.
    pub fn base(
        effect_type: i32,
        effect_param: i32,
        armor_piercing_param: i32,
        heal_modifier: f64,
    ) -> Self {
        Self {
            tag: tags::SPELL_EFFECT,
            effect_type,
            effect_param,
            armor_piercing_param,
            heal_modifier,
            children: Vec::new(),
        }
    }

    /// Creates a composite node with the given children.
    pub fn composite(tag: TypeTag, children: Vec<EffectNode>) -> Self {
        Self {
            children,
            ..Self::new(tag)
        }
    }
}

/// A named spell: the unit of compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct SpellTemplate {
    /// Identifying name, unique within a spell file.
    pub name: String,
    /// Ordered top-level effects.
    pub effects: Vec<EffectNode>,
}

impl SpellTemplate {
    /// Creates a template from a name and its effects.
    pub fn new(name: impl Into<String>, effects: Vec<EffectNode>) -> Self {
        Self {
            name: name.into(),
            effects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_distinct() {
        let all = [
            tags::SPELL_EFFECT,
            tags::SHADOW_SPELL_EFFECT,
            tags::COUNT_BASED_SPELL_EFFECT,
            tags::RANDOM_SPELL_EFFECT,
            tags::RANDOM_PER_TARGET_SPELL_EFFECT,
            tags::VARIABLE_SPELL_EFFECT,
            tags::CONDITIONAL_SPELL_EFFECT,
            tags::EFFECT_LIST_SPELL_EFFECT,
            tags::DELAY_SPELL_EFFECT,
            tags::HANGING_CONVERSION_SPELL_EFFECT,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn tag_hash_is_stable() {
        assert_eq!(
            TypeTag::from_class_name("SpellEffect"),
            TypeTag::from_class_name("SpellEffect")
        );
        assert_ne!(
            TypeTag::from_class_name("SpellEffect"),
            TypeTag::from_class_name("spelleffect")
        );
    }

    #[test]
    fn composite_node_keeps_child_order() {
        let node = EffectNode::composite(
            tags::RANDOM_SPELL_EFFECT,
            vec![EffectNode::base(1, 10, 0, 0.0), EffectNode::base(1, 20, 0, 0.0)],
        );
        assert_eq!(node.children[0].effect_param, 10);
        assert_eq!(node.children[1].effect_param, 20);
    }
}

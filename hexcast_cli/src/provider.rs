//! Loading spell templates from spell files.
//!
//! A spell file is a JSON document describing templates and their effect
//! trees. This is a stand-in for the game's archive deserializer: it
//! satisfies the same provider contract (name + ordered effect nodes with
//! variant class tags) without reproducing the archive's binary format.
//!
//! Missing numeric fields default to zero, matching the VM's reset-state
//! semantics; unknown class names pass through as tags and are rejected at
//! dispatch, not here.

use anyhow::Context;
use hexcast_core::{EffectNode, HexcastError, HexcastResult, SpellTemplate, TypeTag};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SpellFile {
    #[serde(default)]
    spells: Vec<SpellRecord>,
}

#[derive(Debug, Deserialize)]
struct SpellRecord {
    name: String,
    #[serde(default)]
    effects: Vec<EffectRecord>,
}

#[derive(Debug, Deserialize)]
struct EffectRecord {
    class: String,
    #[serde(default)]
    effect_type: i32,
    #[serde(default)]
    effect_param: i32,
    #[serde(default)]
    armor_piercing_param: i32,
    #[serde(default)]
    heal_modifier: f64,
    #[serde(default)]
    effects: Vec<EffectRecord>,
}

impl SpellRecord {
    fn into_template(self) -> SpellTemplate {
        let effects = self.effects.into_iter().map(EffectRecord::into_node).collect();
        SpellTemplate::new(self.name, effects)
    }
}

impl EffectRecord {
    fn into_node(self) -> EffectNode {
        EffectNode {
            tag: TypeTag::from_class_name(&self.class),
            effect_type: self.effect_type,
            effect_param: self.effect_param,
            armor_piercing_param: self.armor_piercing_param,
            heal_modifier: self.heal_modifier,
            children: self.effects.into_iter().map(EffectRecord::into_node).collect(),
        }
    }
}

/// Parses a spell-file document into templates.
pub fn parse_spell_file(text: &str) -> serde_json::Result<Vec<SpellTemplate>> {
    let file: SpellFile = serde_json::from_str(text)?;
    Ok(file
        .spells
        .into_iter()
        .map(SpellRecord::into_template)
        .collect())
}

/// Reads and parses a spell file from disk.
pub fn load_spell_file(path: &Path) -> anyhow::Result<Vec<SpellTemplate>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading spell file {}", path.display()))?;
    let spells = parse_spell_file(&text)
        .with_context(|| format!("parsing spell file {}", path.display()))?;

    debug!(count = spells.len(), "loaded spell templates");
    Ok(spells)
}

/// Selects a spell template by exact name match.
pub fn find_spell<'a>(
    spells: &'a [SpellTemplate],
    name: &str,
) -> HexcastResult<&'a SpellTemplate> {
    spells
        .iter()
        .find(|spell| spell.name == name)
        .ok_or_else(|| HexcastError::SpellNotFound {
            name: name.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexcast_core::tags;

    const SAMPLE: &str = r#"{
        "spells": [
            {
                "name": "Siphon",
                "effects": [
                    {
                        "class": "SpellEffect",
                        "effect_type": 5,
                        "effect_param": 120,
                        "heal_modifier": 0.5
                    }
                ]
            },
            {
                "name": "Chaos Bolt",
                "effects": [
                    {
                        "class": "RandomSpellEffect",
                        "effects": [
                            { "class": "SpellEffect", "effect_type": 1, "effect_param": 80 },
                            { "class": "SpellEffect", "effect_type": 1, "effect_param": 120 }
                        ]
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn parses_templates_with_defaults() {
        let spells = parse_spell_file(SAMPLE).unwrap();
        assert_eq!(spells.len(), 2);

        let siphon = &spells[0];
        assert_eq!(siphon.name, "Siphon");
        let effect = &siphon.effects[0];
        assert_eq!(effect.tag, tags::SPELL_EFFECT);
        assert_eq!(effect.effect_param, 120);
        assert_eq!(effect.armor_piercing_param, 0);
        assert_eq!(effect.heal_modifier, 0.5);
    }

    #[test]
    fn parses_nested_composites() {
        let spells = parse_spell_file(SAMPLE).unwrap();
        let bolt = &spells[1];
        let random = &bolt.effects[0];
        assert_eq!(random.tag, tags::RANDOM_SPELL_EFFECT);
        assert_eq!(random.children.len(), 2);
        assert_eq!(random.children[1].effect_param, 120);
    }

    #[test]
    fn unknown_class_names_pass_through() {
        let spells = parse_spell_file(
            r#"{ "spells": [ { "name": "X", "effects": [ { "class": "MysterySpellEffect" } ] } ] }"#,
        )
        .unwrap();
        assert_eq!(
            spells[0].effects[0].tag,
            TypeTag::from_class_name("MysterySpellEffect")
        );
    }

    #[test]
    fn lookup_is_exact_match() {
        let spells = parse_spell_file(SAMPLE).unwrap();
        assert_eq!(find_spell(&spells, "Siphon").unwrap().name, "Siphon");

        let err = find_spell(&spells, "siphon").unwrap_err();
        assert_eq!(err.to_string(), "no spell named 'siphon' found");
    }
}

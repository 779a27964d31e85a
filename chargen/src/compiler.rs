use tracing::debug;

use crate::compiled::CompiledCharacterData;
use crate::definitions::Hydrated;
use crate::grants::apply_automatic_grants;
use crate::options::{Choice, ChoiceCategory, ChoiceSelection};
use crate::resolver::resolve_keys;

/// Merges automatic grants and player selections into one deduplicated record.
pub fn compile_choices(selections: &[ChoiceSelection], defs: &Hydrated) -> CompiledCharacterData {
    let mut out = CompiledCharacterData::default();
    apply_automatic_grants(defs, &mut out);
    for selection in selections {
        apply_selection(selection, defs, &mut out);
    }
    out.dedup();
    out
}

/// Routes one selection to its accumulation rule.
pub fn apply_selection(selection: &ChoiceSelection, defs: &Hydrated, out: &mut CompiledCharacterData) {
    let keys = &selection.selected_keys;
    use ChoiceCategory::*;
    match selection.category {
        Skill => out.skill_proficiencies.extend(keys.iter().cloned()),
        Language => out.languages.extend(keys.iter().cloned()),
        Tool => out.tool_proficiencies.extend(keys.iter().cloned()),
        WeaponProficiency => out.weapon_proficiencies.extend(keys.iter().cloned()),
        ArmorProficiency => out.armor_proficiencies.extend(keys.iter().cloned()),
        Equipment => {
            let choice = find_equipment_choice(defs, &selection.choice_id);
            resolve_keys(choice, keys, &mut out.equipment);
        }
        Spell | Cantrip | Feat | FightingStyle => {
            debug!(choice = %selection.choice_id, category = ?selection.category, "not accumulated");
        }
        AbilityScore => {
            for key in keys {
                let (ability, bonus) = parse_ability_key(key);
                out.add_ability_bonus(ability, bonus);
            }
        }
        Unrecognized => {
            debug!(choice = %selection.choice_id, "unrecognized category; ignored");
        }
    }
}

/// Class choices first, then background.
fn find_equipment_choice<'d>(defs: &'d Hydrated, choice_id: &str) -> Option<&'d Choice> {
    defs.class
        .as_ref()
        .and_then(|c| c.find_choice(choice_id))
        .or_else(|| defs.background.as_ref().and_then(|b| b.find_choice(choice_id)))
}

/// `"CHA"` is +1, `"CHA:2"` is +2. A suffix that isn't a number makes the whole
/// key the ability name.
fn parse_ability_key(key: &str) -> (&str, i32) {
    match key.rsplit_once(':') {
        Some((ability, n)) => match n.trim_start_matches('+').parse::<i32>() {
            Ok(bonus) if !ability.is_empty() => (ability, bonus),
            _ => (key, 1),
        },
        None => (key, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ability_keys() {
        assert_eq!(parse_ability_key("CHA"), ("CHA", 1));
        assert_eq!(parse_ability_key("STR:2"), ("STR", 2));
        assert_eq!(parse_ability_key("STR:+2"), ("STR", 2));
        assert_eq!(parse_ability_key("DEX:-1"), ("DEX", -1));
        assert_eq!(parse_ability_key("WIS:lots"), ("WIS:lots", 1));
        assert_eq!(parse_ability_key(":3"), (":3", 1));
    }
}

use tracing::trace;

use crate::compiled::{CompiledCharacterData, EquipmentItem, ItemType};
use crate::definitions::{
    AbilityBonus, Background, Class, Hydrated, Proficiency, ProficiencyKind, Race, Subrace,
};

/// Seeds `out` with every grant that needs no player decision.
/// Must run before any selection is compiled.
pub fn apply_automatic_grants(defs: &Hydrated, out: &mut CompiledCharacterData) {
    if let Some(race) = &defs.race {
        apply_race(race, out);
    }
    if let Some(subrace) = &defs.subrace {
        apply_subrace(subrace, out);
    }
    if let Some(class) = &defs.class {
        apply_class(class, out);
    }
    if let Some(background) = &defs.background {
        apply_background(background, out);
    }
}

pub fn apply_race(race: &Race, out: &mut CompiledCharacterData) {
    trace!(race = %race.id, "race grants");
    add_bonuses(&race.ability_bonuses, out);
    out.languages.extend(race.languages.iter().cloned());
    add_proficiencies(&race.proficiencies, out);
}

pub fn apply_subrace(subrace: &Subrace, out: &mut CompiledCharacterData) {
    trace!(subrace = %subrace.id, "subrace grants");
    add_bonuses(&subrace.ability_bonuses, out);
    out.languages.extend(subrace.languages.iter().cloned());
    add_proficiencies(&subrace.proficiencies, out);
}

/// Class starting equipment is never granted here; it always comes through a choice.
pub fn apply_class(class: &Class, out: &mut CompiledCharacterData) {
    trace!(class = %class.id, "class grants");
    out.armor_proficiencies
        .extend(class.armor_proficiencies.iter().cloned());
    out.weapon_proficiencies
        .extend(class.weapon_proficiencies.iter().cloned());
    out.tool_proficiencies
        .extend(class.tool_proficiencies.iter().cloned());
    out.saving_throws.extend(class.saving_throws.iter().cloned());
}

pub fn apply_background(background: &Background, out: &mut CompiledCharacterData) {
    trace!(background = %background.id, "background grants");
    out.skill_proficiencies
        .extend(background.skill_proficiencies.iter().cloned());
    out.tool_proficiencies
        .extend(background.tool_proficiencies.iter().cloned());
    out.languages.extend(background.languages.iter().cloned());
    out.equipment.extend(
        background
            .starting_equipment
            .iter()
            .map(|item| EquipmentItem::new(item.item_id.as_str(), item.name.as_str(), 1, ItemType::Gear)),
    );
}

// Race and subrace bonuses to the same ability add up.
fn add_bonuses(bonuses: &[AbilityBonus], out: &mut CompiledCharacterData) {
    for b in bonuses {
        out.add_ability_bonus(&b.ability, b.bonus);
    }
}

fn add_proficiencies(profs: &[Proficiency], out: &mut CompiledCharacterData) {
    for p in profs {
        let target = match p.kind() {
            ProficiencyKind::Skill => &mut out.skill_proficiencies,
            ProficiencyKind::Armor => &mut out.armor_proficiencies,
            ProficiencyKind::Weapon => &mut out.weapon_proficiencies,
            ProficiencyKind::Tool => &mut out.tool_proficiencies,
        };
        target.push(p.id.clone());
    }
}

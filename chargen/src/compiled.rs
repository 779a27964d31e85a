use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::dedup::dedup_in_place;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Fixed background kit.
    Gear,
    /// Resolved from an explicit choice option.
    Equipment,
    /// Accepted verbatim: category references and passthrough keys.
    Generic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub item_id: String,
    pub name: String,
    pub quantity: u32,
    pub item_type: ItemType,
}

impl EquipmentItem {
    pub fn new(
        item_id: impl Into<String>,
        name: impl Into<String>,
        quantity: u32,
        item_type: ItemType,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            name: name.into(),
            quantity,
            item_type,
        }
    }

    /// An unresolvable key kept as a literal item.
    pub fn passthrough(key: &str) -> Self {
        Self::new(key, key, 1, ItemType::Generic)
    }
}

/// Flattened result of all automatic grants and player choices for one draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledCharacterData {
    pub skill_proficiencies: Vec<String>,
    pub armor_proficiencies: Vec<String>,
    pub weapon_proficiencies: Vec<String>,
    pub tool_proficiencies: Vec<String>,
    pub saving_throws: Vec<String>,
    pub languages: Vec<String>,
    pub equipment: Vec<EquipmentItem>,
    pub ability_bonuses: IndexMap<String, i32>,
}

impl CompiledCharacterData {
    /// Sums into any bonus already recorded. Saturates at the `i32` bounds.
    pub fn add_ability_bonus(&mut self, ability: &str, bonus: i32) {
        let total = self.ability_bonuses.entry(ability.to_string()).or_insert(0);
        *total = total.saturating_add(bonus);
    }

    /// Removes repeats from the six proficiency/language lists. Equipment is
    /// left alone: two picks of the same item are two items.
    pub fn dedup(&mut self) {
        dedup_in_place(&mut self.skill_proficiencies);
        dedup_in_place(&mut self.armor_proficiencies);
        dedup_in_place(&mut self.weapon_proficiencies);
        dedup_in_place(&mut self.tool_proficiencies);
        dedup_in_place(&mut self.saving_throws);
        dedup_in_place(&mut self.languages);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ability_bonuses_sum_per_ability() {
        let mut c = CompiledCharacterData::default();
        c.add_ability_bonus("CON", 2);
        c.add_ability_bonus("WIS", 1);
        c.add_ability_bonus("CON", 1);
        assert_eq!(c.ability_bonuses["CON"], 3);
        assert_eq!(c.ability_bonuses.keys().collect::<Vec<_>>(), vec!["CON", "WIS"]);
    }

    #[test]
    fn ability_bonuses_saturate() {
        let mut c = CompiledCharacterData::default();
        c.add_ability_bonus("STR", i32::MAX);
        c.add_ability_bonus("STR", 1);
        c.add_ability_bonus("DEX", i32::MIN);
        c.add_ability_bonus("DEX", -1);
        assert_eq!(c.ability_bonuses["STR"], i32::MAX);
        assert_eq!(c.ability_bonuses["DEX"], i32::MIN);
    }
}

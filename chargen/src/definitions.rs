use serde::{Deserialize, Serialize};

use crate::options::Choice;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityBonus {
    pub ability: String,
    pub bonus: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProficiencyKind {
    Skill,
    Armor,
    Weapon,
    Tool,
}

/// A proficiency granted by a race or subrace. Upstream data does not always
/// say what kind it is, so `kind` may be missing and is then inferred from the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proficiency {
    pub id: String,
    #[serde(default)]
    pub kind: Option<ProficiencyKind>,
}

impl Proficiency {
    pub fn kind(&self) -> ProficiencyKind {
        self.kind.unwrap_or_else(|| ProficiencyKind::infer(&self.id))
    }
}

impl ProficiencyKind {
    /// Best-effort classification for untagged proficiency ids, e.g.
    /// `skill-perception`, `light-armor`, `smiths-tools`, `battleaxes`.
    pub fn infer(id: &str) -> Self {
        let id = id.to_ascii_lowercase();
        if id.starts_with("skill-") {
            ProficiencyKind::Skill
        } else if id.contains("armor") || id.contains("shield") {
            ProficiencyKind::Armor
        } else if id.contains("tools")
            || id.contains("supplies")
            || id.contains("kit")
            || id.contains("instrument")
            || id.contains("gaming-set")
        {
            ProficiencyKind::Tool
        } else {
            ProficiencyKind::Weapon
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub item_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Race {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub ability_bonuses: Vec<AbilityBonus>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub proficiencies: Vec<Proficiency>,
    #[serde(default)]
    pub language_choice: Option<Choice>,
    #[serde(default)]
    pub proficiency_choices: Vec<Choice>,
    #[serde(default)]
    pub ability_bonus_choice: Option<Choice>,
    #[serde(default)]
    pub subraces: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subrace {
    pub id: String,
    pub name: String,
    pub race_id: String,
    #[serde(default)]
    pub ability_bonuses: Vec<AbilityBonus>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub proficiencies: Vec<Proficiency>,
    #[serde(default)]
    pub language_choice: Option<Choice>,
    #[serde(default)]
    pub proficiency_choices: Vec<Choice>,
}

/// A class feature. Only features with a `choice` matter to choice resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u8,
    #[serde(default)]
    pub choice: Option<FeatureChoice>,
}

fn default_level() -> u8 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureChoice {
    /// Free-form type tag from upstream, e.g. `fighting_style`, `expertise`.
    pub choice_type: String,
    pub choice: Choice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub hit_die: u8,
    #[serde(default)]
    pub armor_proficiencies: Vec<String>,
    #[serde(default)]
    pub weapon_proficiencies: Vec<String>,
    #[serde(default)]
    pub tool_proficiencies: Vec<String>,
    #[serde(default)]
    pub saving_throws: Vec<String>,
    #[serde(default)]
    pub skill_choice_count: u32,
    #[serde(default)]
    pub skill_options: Vec<String>,
    #[serde(default)]
    pub proficiency_choices: Vec<Choice>,
    #[serde(default)]
    pub equipment_choices: Vec<Choice>,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl Class {
    /// Looks up a choice by id across equipment, proficiency and feature choices.
    pub fn find_choice(&self, choice_id: &str) -> Option<&Choice> {
        self.equipment_choices
            .iter()
            .chain(self.proficiency_choices.iter())
            .chain(
                self.features
                    .iter()
                    .filter_map(|f| f.choice.as_ref().map(|fc| &fc.choice)),
            )
            .find(|c| c.id == choice_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Background {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub skill_proficiencies: Vec<String>,
    #[serde(default)]
    pub tool_proficiencies: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub starting_equipment: Vec<ItemRef>,
    #[serde(default)]
    pub language_choice: Option<Choice>,
    #[serde(default)]
    pub equipment_choices: Vec<Choice>,
}

impl Background {
    pub fn find_choice(&self, choice_id: &str) -> Option<&Choice> {
        self.equipment_choices
            .iter()
            .chain(self.language_choice.iter())
            .find(|c| c.id == choice_id)
    }
}

/// Everything a draft references, fetched up front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hydrated {
    pub race: Option<Race>,
    pub subrace: Option<Subrace>,
    pub class: Option<Class>,
    pub background: Option<Background>,
}

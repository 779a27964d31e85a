use serde::{Deserialize, Serialize};

/// What kind of thing a choice grants. Drives how a selection is accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChoiceCategory {
    Skill,
    Language,
    Tool,
    WeaponProficiency,
    ArmorProficiency,
    Equipment,
    Spell,
    Cantrip,
    Feat,
    FightingStyle,
    AbilityScore,
    /// Anything upstream sends that we don't know about yet.
    #[serde(other)]
    Unrecognized,
}

/// Which build-defining section a selection was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceSource {
    Race,
    Subrace,
    Class,
    Background,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub category: ChoiceCategory,
    #[serde(default = "default_choose")]
    pub choose: u32,
    pub options: OptionSet,
}

fn default_choose() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OptionSet {
    Explicit {
        options: Vec<ChoiceOption>,
    },
    /// "Any simple weapon", "any musical instrument", ...
    CategoryReference {
        category_id: String,
        #[serde(default)]
        exclude_ids: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChoiceOption {
    Item {
        item_id: String,
        name: String,
    },
    CountedItem {
        item_id: String,
        name: String,
        quantity: u32,
    },
    Bundle {
        items: Vec<BundleItem>,
    },
    NestedChoice {
        choice: Box<Choice>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BundleItem {
    Item {
        item_id: String,
        name: String,
        #[serde(default = "default_quantity")]
        quantity: u32,
    },
    Choice {
        choice: Box<Choice>,
    },
}

fn default_quantity() -> u32 {
    1
}

/// A player's answer to one choice, as recorded on a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceSelection {
    pub choice_id: String,
    pub category: ChoiceCategory,
    pub source: ChoiceSource,
    #[serde(default)]
    pub selected_keys: Vec<String>,
}

impl ChoiceSelection {
    pub fn new(
        choice_id: impl Into<String>,
        category: ChoiceCategory,
        source: ChoiceSource,
        keys: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            choice_id: choice_id.into(),
            category,
            source,
            selected_keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

impl Choice {
    /// The explicit options, or an empty slice for a category reference.
    pub fn explicit_options(&self) -> &[ChoiceOption] {
        match &self.options {
            OptionSet::Explicit { options } => options,
            OptionSet::CategoryReference { .. } => &[],
        }
    }
}

/// Key under which a bundle option is selected: `bundle_<index-in-choice>`.
pub fn bundle_key(option_index: usize) -> String {
    format!("bundle_{}", option_index)
}

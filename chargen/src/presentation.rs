//! Display-ready mirror of the choice definitions.
//!
//! Every rendered choice gets a synthetic id that is unique across one render
//! (`{owner}_equipment_0`, `{owner}_feature_{choice}`, ...) and keeps the
//! definition's own id in `choice_id`, which is what a selection must record.

use serde::{Deserialize, Serialize};

use crate::definitions::{Background, Class, FeatureChoice, Race, Subrace};
use crate::options::{bundle_key, BundleItem, Choice, ChoiceCategory, ChoiceOption, OptionSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresentationCategory {
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
    /// Anything without a dedicated widget.
    Feature,
}

impl From<ChoiceCategory> for PresentationCategory {
    fn from(value: ChoiceCategory) -> Self {
        match value {
            ChoiceCategory::Skill => Self::Skill,
            ChoiceCategory::Language => Self::Language,
            ChoiceCategory::Tool => Self::Tool,
            ChoiceCategory::WeaponProficiency => Self::WeaponProficiency,
            ChoiceCategory::ArmorProficiency => Self::ArmorProficiency,
            ChoiceCategory::Equipment => Self::Equipment,
            ChoiceCategory::Spell => Self::Spell,
            ChoiceCategory::Cantrip => Self::Cantrip,
            ChoiceCategory::Feat => Self::Feat,
            ChoiceCategory::FightingStyle => Self::FightingStyle,
            ChoiceCategory::AbilityScore => Self::AbilityScore,
            ChoiceCategory::Unrecognized => Self::Feature,
        }
    }
}

impl PresentationCategory {
    /// Maps a feature's declared choice type; unknown types render as `Feature`.
    pub fn from_feature_type(choice_type: &str) -> Self {
        match choice_type.to_ascii_lowercase().replace('-', "_").as_str() {
            "fighting_style" | "fighting_styles" => Self::FightingStyle,
            "skill" | "skills" | "expertise" => Self::Skill,
            "language" | "languages" => Self::Language,
            "tool" | "tools" => Self::Tool,
            "spell" | "spells" => Self::Spell,
            "cantrip" | "cantrips" => Self::Cantrip,
            "feat" | "feats" => Self::Feat,
            "ability_score" | "ability_scores" => Self::AbilityScore,
            _ => Self::Feature,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationChoice {
    pub id: String,
    pub choice_id: String,
    pub description: String,
    pub category: PresentationCategory,
    pub choose: u32,
    pub options: Vec<PresentationOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_reference: Option<PresentationCategoryReference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationCategoryReference {
    pub category_id: String,
    pub exclude_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PresentationOption {
    Item {
        id: String,
        name: String,
        quantity: u32,
    },
    Bundle(PresentationBundle),
    Choice {
        choice: PresentationChoice,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationBundle {
    /// Selection key for the whole bundle: `bundle_<n>`, behind a
    /// `nested_<i>/` path when the bundle sits inside a nested choice.
    pub id: String,
    pub label: String,
    pub items: Vec<PresentationBundleItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PresentationBundleItem {
    Item {
        id: String,
        name: String,
        quantity: u32,
    },
    Choice {
        /// `bundle_<n>:<position>` plus any `nested_<i>/` path; append
        /// `:<item_id>` to form the selection key.
        key_prefix: String,
        choice: PresentationChoice,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Features up to and including this level are rendered.
    pub level: u8,
    pub include_category_references: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            level: 1,
            include_category_references: true,
        }
    }
}

pub fn render_class(class: &Class, opts: &RenderOptions) -> Vec<PresentationChoice> {
    let mut out = Vec::new();

    if class.skill_choice_count > 0 && !class.skill_options.is_empty() {
        let id = format!("{}_skills", class.id);
        out.push(PresentationChoice {
            choice_id: id.clone(),
            id,
            description: format!("Choose {} skills", class.skill_choice_count),
            category: PresentationCategory::Skill,
            choose: class.skill_choice_count,
            options: class
                .skill_options
                .iter()
                .map(|skill| PresentationOption::Item {
                    id: skill.clone(),
                    name: skill.clone(),
                    quantity: 1,
                })
                .collect(),
            category_reference: None,
        });
    }

    for (i, choice) in class.proficiency_choices.iter().enumerate() {
        let id = format!("{}_proficiency_{}", class.id, i);
        out.push(render_choice(&id, choice, choice.category.into()));
    }

    for (i, choice) in class.equipment_choices.iter().enumerate() {
        let id = format!("{}_equipment_{}", class.id, i);
        out.push(render_choice(&id, choice, PresentationCategory::Equipment));
    }

    for feature in class.features.iter().filter(|f| f.level <= opts.level) {
        if let Some(FeatureChoice { choice_type, choice }) = &feature.choice {
            let id = format!("{}_feature_{}", class.id, choice.id);
            let mut rendered =
                render_choice(&id, choice, PresentationCategory::from_feature_type(choice_type));
            if rendered.description.is_empty() {
                rendered.description = feature.name.clone();
            }
            out.push(rendered);
        }
    }

    finish(out, opts)
}

pub fn render_race(race: &Race, opts: &RenderOptions) -> Vec<PresentationChoice> {
    let mut out = Vec::new();
    if let Some(choice) = &race.ability_bonus_choice {
        let id = format!("{}_ability_scores", race.id);
        out.push(render_choice(&id, choice, PresentationCategory::AbilityScore));
    }
    if let Some(choice) = &race.language_choice {
        let id = format!("{}_language", race.id);
        out.push(render_choice(&id, choice, PresentationCategory::Language));
    }
    for (i, choice) in race.proficiency_choices.iter().enumerate() {
        let id = format!("{}_proficiency_{}", race.id, i);
        out.push(render_choice(&id, choice, choice.category.into()));
    }
    finish(out, opts)
}

pub fn render_subrace(subrace: &Subrace, opts: &RenderOptions) -> Vec<PresentationChoice> {
    let mut out = Vec::new();
    if let Some(choice) = &subrace.language_choice {
        let id = format!("{}_language", subrace.id);
        out.push(render_choice(&id, choice, PresentationCategory::Language));
    }
    for (i, choice) in subrace.proficiency_choices.iter().enumerate() {
        let id = format!("{}_proficiency_{}", subrace.id, i);
        out.push(render_choice(&id, choice, choice.category.into()));
    }
    finish(out, opts)
}

pub fn render_background(background: &Background, opts: &RenderOptions) -> Vec<PresentationChoice> {
    let mut out = Vec::new();
    if let Some(choice) = &background.language_choice {
        let id = format!("{}_language", background.id);
        out.push(render_choice(&id, choice, PresentationCategory::Language));
    }
    for (i, choice) in background.equipment_choices.iter().enumerate() {
        let id = format!("{}_equipment_{}", background.id, i);
        out.push(render_choice(&id, choice, PresentationCategory::Equipment));
    }
    finish(out, opts)
}

fn finish(mut out: Vec<PresentationChoice>, opts: &RenderOptions) -> Vec<PresentationChoice> {
    if !opts.include_category_references {
        out.retain(|c| c.category_reference.is_none());
    }
    out
}

/// Renders one choice and everything below it. Nested choices get ids derived
/// from `id`, so uniqueness of `id` carries down the tree.
pub fn render_choice(id: &str, choice: &Choice, category: PresentationCategory) -> PresentationChoice {
    render_scoped(id, "", choice, category)
}

/// `key_path` prefixes the selection keys of this choice's bundles, so they
/// resolve against the top-level choice.
fn render_scoped(
    id: &str,
    key_path: &str,
    choice: &Choice,
    category: PresentationCategory,
) -> PresentationChoice {
    let (options, category_reference) = match &choice.options {
        OptionSet::Explicit { options } => (
            options
                .iter()
                .enumerate()
                .map(|(i, opt)| render_option(id, key_path, i, opt))
                .collect(),
            None,
        ),
        OptionSet::CategoryReference {
            category_id,
            exclude_ids,
        } => (
            Vec::new(),
            Some(PresentationCategoryReference {
                category_id: category_id.clone(),
                exclude_ids: exclude_ids.clone(),
            }),
        ),
    };
    PresentationChoice {
        id: id.to_string(),
        choice_id: choice.id.clone(),
        description: choice.description.clone(),
        category,
        choose: choice.choose,
        options,
        category_reference,
    }
}

fn render_option(
    parent_id: &str,
    key_path: &str,
    index: usize,
    option: &ChoiceOption,
) -> PresentationOption {
    match option {
        ChoiceOption::Item { item_id, name } => PresentationOption::Item {
            id: item_id.clone(),
            name: display_name(item_id, name),
            quantity: 1,
        },
        ChoiceOption::CountedItem {
            item_id,
            name,
            quantity,
        } => PresentationOption::Item {
            id: item_id.clone(),
            name: display_name(item_id, name),
            quantity: *quantity,
        },
        ChoiceOption::Bundle { items } => {
            PresentationOption::Bundle(render_bundle(parent_id, key_path, index, items))
        }
        ChoiceOption::NestedChoice { choice } => {
            let id = format!("{}_nested_{}", parent_id, index);
            let path = format!("{}nested_{}/", key_path, index);
            PresentationOption::Choice {
                choice: render_scoped(&id, &path, choice, choice.category.into()),
            }
        }
    }
}

fn render_bundle(
    parent_id: &str,
    key_path: &str,
    index: usize,
    items: &[BundleItem],
) -> PresentationBundle {
    let marker = bundle_key(index);
    let key = format!("{}{}", key_path, marker);
    let rendered: Vec<PresentationBundleItem> = items
        .iter()
        .enumerate()
        .map(|(position, item)| match item {
            BundleItem::Item {
                item_id,
                name,
                quantity,
            } => PresentationBundleItem::Item {
                id: item_id.clone(),
                name: display_name(item_id, name),
                quantity: *quantity,
            },
            BundleItem::Choice { choice } => {
                let id = format!("{}_{}_{}", parent_id, marker, position);
                let key_prefix = format!("{}:{}", key, position);
                let path = format!("{}:", key_prefix);
                PresentationBundleItem::Choice {
                    key_prefix,
                    choice: render_scoped(&id, &path, choice, choice.category.into()),
                }
            }
        })
        .collect();
    PresentationBundle {
        label: bundle_label(&rendered),
        id: key,
        items: rendered,
    }
}

fn bundle_label(items: &[PresentationBundleItem]) -> String {
    items
        .iter()
        .map(|item| match item {
            PresentationBundleItem::Item { name, quantity, .. } if *quantity > 1 => {
                format!("{} {}", quantity, name)
            }
            PresentationBundleItem::Item { name, .. } => name.clone(),
            PresentationBundleItem::Choice { choice, .. } if !choice.description.is_empty() => {
                choice.description.clone()
            }
            PresentationBundleItem::Choice { choice, .. } => choice.choice_id.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_name(id: &str, name: &str) -> String {
    if name.is_empty() {
        id.to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_types_map_to_categories() {
        assert_eq!(
            PresentationCategory::from_feature_type("fighting_style"),
            PresentationCategory::FightingStyle
        );
        assert_eq!(
            PresentationCategory::from_feature_type("Fighting-Style"),
            PresentationCategory::FightingStyle
        );
        assert_eq!(
            PresentationCategory::from_feature_type("expertise"),
            PresentationCategory::Skill
        );
        assert_eq!(
            PresentationCategory::from_feature_type("divine_domain"),
            PresentationCategory::Feature
        );
    }

    #[test]
    fn labels_show_quantities() {
        let items = vec![
            PresentationBundleItem::Item {
                id: "shortbow".into(),
                name: "Shortbow".into(),
                quantity: 1,
            },
            PresentationBundleItem::Item {
                id: "arrow".into(),
                name: "Arrow".into(),
                quantity: 20,
            },
        ];
        assert_eq!(bundle_label(&items), "Shortbow, 20 Arrow");
    }
}

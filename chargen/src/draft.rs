use serde::{Deserialize, Serialize};

use crate::options::{ChoiceSelection, ChoiceSource};

/// A character under construction: the build-defining picks plus every
/// recorded selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Draft {
    pub id: String,
    pub race_id: Option<String>,
    pub subrace_id: Option<String>,
    pub class_id: Option<String>,
    pub background_id: Option<String>,
    pub selections: Vec<ChoiceSelection>,
}

impl Draft {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Swaps out every selection for `source`. Selections for other sources
    /// keep their order; the new ones go at the end.
    pub fn replace_selections(&mut self, source: ChoiceSource, selections: Vec<ChoiceSelection>) {
        self.selections.retain(|s| s.source != source);
        self.selections
            .extend(selections.into_iter().map(|mut s| {
                s.source = source;
                s
            }));
    }

    pub fn selections_from(&self, source: ChoiceSource) -> impl Iterator<Item = &ChoiceSelection> {
        self.selections.iter().filter(move |s| s.source == source)
    }

    /// Changing race drops the subrace and every race/subrace selection.
    pub fn set_race(&mut self, race_id: impl Into<String>) {
        self.race_id = Some(race_id.into());
        self.subrace_id = None;
        self.selections
            .retain(|s| !matches!(s.source, ChoiceSource::Race | ChoiceSource::Subrace));
    }

    pub fn set_class(&mut self, class_id: impl Into<String>) {
        self.class_id = Some(class_id.into());
        self.selections.retain(|s| s.source != ChoiceSource::Class);
    }

    pub fn set_background(&mut self, background_id: impl Into<String>) {
        self.background_id = Some(background_id.into());
        self.selections
            .retain(|s| s.source != ChoiceSource::Background);
    }
}

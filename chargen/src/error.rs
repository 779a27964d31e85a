use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    Race,
    Subrace,
    Class,
    Background,
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DefinitionKind::Race => "race",
            DefinitionKind::Subrace => "subrace",
            DefinitionKind::Class => "class",
            DefinitionKind::Background => "background",
        })
    }
}

/// Errors from a rules-data source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: DefinitionKind, id: String },

    #[error("rules data unavailable: {reason}")]
    Unavailable { reason: String },
}

#[derive(Debug, Error)]
pub enum ChargenError {
    #[error("failed to load {kind} '{id}'")]
    MissingDefinition {
        kind: DefinitionKind,
        id: String,
        #[source]
        source: SourceError,
    },

    #[error("subrace '{subrace}' does not belong to race '{race}'")]
    SubraceMismatch { subrace: String, race: String },

    #[error("subrace '{subrace}' chosen without a race")]
    SubraceWithoutRace { subrace: String },

    #[error("invalid content in {name}: {message}")]
    Content { name: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChargenError>;

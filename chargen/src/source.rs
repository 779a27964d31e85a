use std::{fs, path::Path};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::builtin_packs;
use crate::definitions::{Background, Class, Race, Subrace};
use crate::error::{ChargenError, DefinitionKind, Result, SourceError};

/// Resolves identifiers to canonical definitions.
pub trait RulesSource {
    fn race(&self, id: &str) -> std::result::Result<Race, SourceError>;
    fn subrace(&self, id: &str) -> std::result::Result<Subrace, SourceError>;
    fn class(&self, id: &str) -> std::result::Result<Class, SourceError>;
    fn background(&self, id: &str) -> std::result::Result<Background, SourceError>;
}

/// One content file. Any section may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentPack {
    pub races: Vec<Race>,
    pub subraces: Vec<Subrace>,
    pub classes: Vec<Class>,
    pub backgrounds: Vec<Background>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    Yaml,
    Json,
}

impl ContentFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(ContentFormat::Yaml),
            "json" => Some(ContentFormat::Json),
            _ => None,
        }
    }
}

impl ContentPack {
    pub fn parse(name: &str, text: &str, format: ContentFormat) -> Result<Self> {
        let parsed = match format {
            ContentFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
            ContentFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| ChargenError::Content {
            name: name.to_string(),
            message,
        })
    }
}

/// In-memory rules data keyed by id. Later inserts replace earlier ones.
#[derive(Debug, Clone, Default)]
pub struct ContentLibrary {
    races: IndexMap<String, Race>,
    subraces: IndexMap<String, Subrace>,
    classes: IndexMap<String, Class>,
    backgrounds: IndexMap<String, Background>,
}

impl ContentLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// The content bundled with the crate.
    pub fn builtin() -> Result<Self> {
        let mut lib = Self::new();
        for (name, text) in builtin_packs() {
            lib.add_pack(ContentPack::parse(name, text, ContentFormat::Yaml)?);
        }
        Ok(lib)
    }

    pub fn add_pack(&mut self, pack: ContentPack) {
        for race in pack.races {
            self.races.insert(race.id.clone(), race);
        }
        for subrace in pack.subraces {
            self.subraces.insert(subrace.id.clone(), subrace);
        }
        for class in pack.classes {
            self.classes.insert(class.id.clone(), class);
        }
        for background in pack.backgrounds {
            self.backgrounds.insert(background.id.clone(), background);
        }
    }

    /// Loads every `.yaml`/`.yml`/`.json` file under `dir`, recursively, in
    /// path order. Other files are skipped.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        let mut paths = Vec::new();
        collect_files(dir, &mut paths)?;
        paths.sort();
        let mut loaded = 0;
        for path in paths {
            let Some(format) = ContentFormat::from_path(&path) else {
                continue;
            };
            let text = fs::read_to_string(&path)?;
            let name = path.display().to_string();
            debug!(file = %name, "loading content");
            self.add_pack(ContentPack::parse(&name, &text, format)?);
            loaded += 1;
        }
        Ok(loaded)
    }

    pub fn race_ids(&self) -> impl Iterator<Item = &str> {
        self.races.keys().map(String::as_str)
    }

    pub fn subrace_ids(&self) -> impl Iterator<Item = &str> {
        self.subraces.keys().map(String::as_str)
    }

    pub fn class_ids(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn background_ids(&self) -> impl Iterator<Item = &str> {
        self.backgrounds.keys().map(String::as_str)
    }
}

fn collect_files(dir: &Path, out: &mut Vec<std::path::PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

fn lookup<T: Clone>(
    map: &IndexMap<String, T>,
    kind: DefinitionKind,
    id: &str,
) -> std::result::Result<T, SourceError> {
    map.get(id).cloned().ok_or_else(|| SourceError::NotFound {
        kind,
        id: id.to_string(),
    })
}

impl RulesSource for ContentLibrary {
    fn race(&self, id: &str) -> std::result::Result<Race, SourceError> {
        lookup(&self.races, DefinitionKind::Race, id)
    }

    fn subrace(&self, id: &str) -> std::result::Result<Subrace, SourceError> {
        lookup(&self.subraces, DefinitionKind::Subrace, id)
    }

    fn class(&self, id: &str) -> std::result::Result<Class, SourceError> {
        lookup(&self.classes, DefinitionKind::Class, id)
    }

    fn background(&self, id: &str) -> std::result::Result<Background, SourceError> {
        lookup(&self.backgrounds, DefinitionKind::Background, id)
    }
}

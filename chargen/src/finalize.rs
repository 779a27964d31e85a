use tracing::{debug, info_span};

use crate::compiled::CompiledCharacterData;
use crate::compiler::compile_choices;
use crate::definitions::Hydrated;
use crate::draft::Draft;
use crate::error::{ChargenError, DefinitionKind, Result, SourceError};
use crate::source::RulesSource;

fn fetch<T>(
    kind: DefinitionKind,
    id: Option<&str>,
    get: impl FnOnce(&str) -> std::result::Result<T, SourceError>,
) -> Result<Option<T>> {
    let Some(id) = id else {
        return Ok(None);
    };
    get(id)
        .map(Some)
        .map_err(|source| ChargenError::MissingDefinition {
            kind,
            id: id.to_string(),
            source,
        })
}

/// Fetches every definition the draft references. Any failed lookup aborts.
pub fn hydrate(draft: &Draft, source: &impl RulesSource) -> Result<Hydrated> {
    if let (None, Some(subrace)) = (&draft.race_id, &draft.subrace_id) {
        return Err(ChargenError::SubraceWithoutRace {
            subrace: subrace.clone(),
        });
    }
    let race = fetch(DefinitionKind::Race, draft.race_id.as_deref(), |id| source.race(id))?;
    let subrace = fetch(DefinitionKind::Subrace, draft.subrace_id.as_deref(), |id| {
        source.subrace(id)
    })?;
    if let (Some(race), Some(subrace)) = (&race, &subrace) {
        if subrace.race_id != race.id {
            return Err(ChargenError::SubraceMismatch {
                subrace: subrace.id.clone(),
                race: race.id.clone(),
            });
        }
    }
    let class = fetch(DefinitionKind::Class, draft.class_id.as_deref(), |id| source.class(id))?;
    let background = fetch(DefinitionKind::Background, draft.background_id.as_deref(), |id| {
        source.background(id)
    })?;
    Ok(Hydrated {
        race,
        subrace,
        class,
        background,
    })
}

/// Hydrates the draft and compiles its selections. No partial result on error.
pub fn finalize(draft: &Draft, source: &impl RulesSource) -> Result<CompiledCharacterData> {
    let _span = info_span!("finalize", draft = %draft.id).entered();
    let defs = hydrate(draft, source)?;
    let compiled = compile_choices(&draft.selections, &defs);
    debug!(
        skills = compiled.skill_proficiencies.len(),
        languages = compiled.languages.len(),
        equipment = compiled.equipment.len(),
        "compiled"
    );
    Ok(compiled)
}

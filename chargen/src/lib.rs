pub mod compiled;
pub mod compiler;
pub mod content;
pub mod dedup;
pub mod definitions;
pub mod draft;
pub mod error;
pub mod finalize;
pub mod grants;
pub mod options;
pub mod presentation;
pub mod resolver;
pub mod source;

pub use compiled::{CompiledCharacterData, EquipmentItem, ItemType};
pub use compiler::compile_choices;
pub use dedup::dedup_stable;
pub use definitions::{Background, Class, Hydrated, Race, Subrace};
pub use draft::Draft;
pub use error::{ChargenError, DefinitionKind, Result, SourceError};
pub use finalize::{finalize, hydrate};
pub use options::{
    BundleItem, Choice, ChoiceCategory, ChoiceOption, ChoiceSelection, ChoiceSource, OptionSet,
};
pub use presentation::{
    render_background, render_class, render_race, render_subrace, PresentationChoice,
    PresentationOption, RenderOptions,
};
pub use resolver::{decode_bundle_key, resolve_key, resolve_keys};
pub use source::{ContentLibrary, RulesSource};

/* ---------------- rendering entry point ---------------- */

/// Which definition to render choices for.
#[derive(Debug, Clone, Copy)]
pub enum RenderTarget<'a> {
    Race(&'a Race),
    Subrace(&'a Subrace),
    Class(&'a Class),
    Background(&'a Background),
}

/// Renders the choices of one definition, independent of any player selection.
pub fn render_choice_presentation(
    target: RenderTarget<'_>,
    opts: &RenderOptions,
) -> Vec<PresentationChoice> {
    match target {
        RenderTarget::Race(r) => render_race(r, opts),
        RenderTarget::Subrace(s) => render_subrace(s, opts),
        RenderTarget::Class(c) => render_class(c, opts),
        RenderTarget::Background(b) => render_background(b, opts),
    }
}

use anyhow::{bail, Context, Result};
use chargen::{
    finalize, render_choice_presentation, ContentLibrary, Draft, RenderOptions, RenderTarget,
    RulesSource,
};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use encoding_rs::Encoding;
use serde::Serialize;
use std::{fs, path::Path, path::PathBuf};
use tracing::Level;

#[derive(Copy, Clone, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Target {
    #[arg(long)]
    class: Option<String>,
    #[arg(long)]
    race: Option<String>,
    #[arg(long)]
    subrace: Option<String>,
    #[arg(long)]
    background: Option<String>,
}

#[derive(Subcommand)]
enum Cmd {
    /// List the ids of every loaded race, subrace, class and background
    List,
    /// Render the choices one definition offers
    Present {
        #[command(flatten)]
        target: Target,
        /// Render features up to this level
        #[arg(long, default_value_t = 1)]
        level: u8,
        /// Leave out "any X" category-reference choices
        #[arg(long, default_value_t = false)]
        no_category_refs: bool,
    },
    /// Finalize a draft file (YAML or JSON) into compiled character data
    Compile {
        /// Path to the draft
        #[arg(long)]
        draft: PathBuf,
    },
}

#[derive(Parser)]
#[command(name = "chargen")]
#[command(about = "Character choice compiler harness")]
struct Cli {
    /// Extra content directory, loaded over the built-in content
    #[arg(long, global = true)]
    content: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json, global = true)]
    format: Format,
    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Cmd,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut lib = ContentLibrary::builtin().context("failed to load built-in content")?;
    if let Some(dir) = cli.content.as_deref() {
        let n = lib
            .load_dir(dir)
            .with_context(|| format!("failed to load content from {}", dir.display()))?;
        tracing::info!(files = n, dir = %dir.display(), "loaded content");
    }

    match cli.cmd {
        Cmd::List => {
            print_ids("races", lib.race_ids());
            print_ids("subraces", lib.subrace_ids());
            print_ids("classes", lib.class_ids());
            print_ids("backgrounds", lib.background_ids());
        }
        Cmd::Present {
            target,
            level,
            no_category_refs,
        } => {
            let opts = RenderOptions {
                level,
                include_category_references: !no_category_refs,
            };
            let rendered = if let Some(id) = target.class {
                let class = lib.class(&id)?;
                render_choice_presentation(RenderTarget::Class(&class), &opts)
            } else if let Some(id) = target.race {
                let race = lib.race(&id)?;
                render_choice_presentation(RenderTarget::Race(&race), &opts)
            } else if let Some(id) = target.subrace {
                let subrace = lib.subrace(&id)?;
                render_choice_presentation(RenderTarget::Subrace(&subrace), &opts)
            } else if let Some(id) = target.background {
                let background = lib.background(&id)?;
                render_choice_presentation(RenderTarget::Background(&background), &opts)
            } else {
                bail!("one of --class, --race, --subrace or --background is required");
            };
            emit(&rendered, cli.format)?;
        }
        Cmd::Compile { draft } => {
            let d = read_draft(&draft)?;
            let compiled =
                finalize(&d, &lib).with_context(|| format!("failed to finalize draft '{}'", d.id))?;
            emit(&compiled, cli.format)?;
        }
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn print_ids<'a>(label: &str, ids: impl Iterator<Item = &'a str>) {
    println!("{}: {}", label, ids.collect::<Vec<_>>().join(", "));
}

fn emit<T: Serialize>(value: &T, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(value)?),
        Format::Yaml => print!("{}", serde_yaml::to_string(value)?),
    }
    Ok(())
}

fn read_text_auto(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

fn read_draft(path: &Path) -> Result<Draft> {
    let text = read_text_auto(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let draft = if is_json {
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse draft JSON: {}", path.display()))?
    } else {
        serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse draft YAML: {}", path.display()))?
    };
    Ok(draft)
}

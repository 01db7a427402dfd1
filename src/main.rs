//! `generate-colliders` - run one collider generation pass from the command line
//!
//! Prints the collider report as JSON on stdout, or writes it to `--output`.

use anyhow::{bail, Context, Result};
use clap::Parser;
use humanoid_colliders::{
    mannequin, Character, CharacterDocument, ColliderGenerator, ColliderSet, GenerationConfig,
    GenerationLevel,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "generate-colliders",
    about = "Generate physics colliders for a humanoid character document"
)]
struct Cli {
    /// Character document (JSON). Required unless --demo is given.
    character: Option<PathBuf>,

    /// Use the built-in mannequin instead of a character document
    #[arg(long, conflicts_with = "character")]
    demo: bool,

    /// Collider detail: None, Minimal, Medium or Full
    #[arg(long)]
    level: Option<GenerationLevel>,

    /// Uniform size multiplier applied to every collider
    #[arg(long)]
    size: Option<f32>,

    /// Generation settings (JSON); --level and --size take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the report here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Also save the input character as a document (useful with --demo)
    #[arg(long)]
    save_character: Option<PathBuf>,
}

fn load_character(cli: &Cli) -> Result<Character> {
    match (&cli.character, cli.demo) {
        (_, true) => Ok(mannequin()),
        (Some(path), false) => CharacterDocument::load(path)
            .and_then(CharacterDocument::into_character)
            .with_context(|| format!("loading character {}", path.display())),
        (None, false) => bail!("no character given; pass a document path or --demo"),
    }
}

fn load_config(cli: &Cli) -> Result<GenerationConfig> {
    let mut config = match &cli.config {
        Some(path) => GenerationConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GenerationConfig::default(),
    };
    if let Some(level) = cli.level {
        config.level = level;
    }
    if let Some(size) = cli.size {
        config.size_multiplier = size;
    }
    config.validate().context("invalid settings")?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let character = load_character(&cli)?;
    let config = load_config(&cli)?;

    if let Some(path) = &cli.save_character {
        let json = CharacterDocument::from_character(&character).to_json_string()?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Saved character to {}", path.display());
    }

    let mut host = ColliderSet::new();
    let mut generator = ColliderGenerator::new(config);
    let report = generator
        .generate(&character, &mut host)
        .with_context(|| format!("generating colliders for {}", character.name))?;

    let json = report.to_json_string()?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            log::info!("Wrote {} colliders to {}", report.colliders.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

//! Nebula Deck - command-line deck builder
//!
//! Browses the card catalog, keeps a persistent deck within the copy limits
//! and exports it as JSON or as a PNG of card tiles.

use clap::{Parser, Subcommand};
use nebula_deck::config::{resolve_api_base, API_URL_ENV};
use nebula_deck::errors::Error;
use nebula_deck::formatters::{format_deck, format_filter_options, format_results, FilterOptions};
use nebula_deck::store::{load_api_base, save_api_base};
use nebula_deck::utils::{now, output_path};
use nebula_deck::{
    CardFilters, CatalogQuery, DeckBuilder, DeckConfig, ExportFile, FileStore, HttpCatalog,
    HttpImageLoader, Status, Tone,
};
use std::path::{Path, PathBuf};

type Builder = DeckBuilder<HttpCatalog, FileStore>;

/// Build, export and import card decks against a catalog service
#[derive(Parser, Debug)]
#[command(name = "nebula-deck")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory holding the saved deck and catalog address
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Catalog base URL for this run (overrides the saved one)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// JSON file with copy limit overrides and feature flags
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search or list catalog cards
    Fetch(FetchArgs),
    /// Add copies of a card to the deck
    Add {
        key: String,
        #[arg(long, default_value_t = 1)]
        times: u32,
    },
    /// Remove one copy of a card, or all of them with --all
    Remove {
        key: String,
        #[arg(long, default_value_t = false)]
        all: bool,
    },
    /// Empty the deck
    Clear,
    /// Print the deck
    Show,
    /// Write the deck as a JSON document
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace the deck with a JSON document
    Import { path: PathBuf },
    /// Render the deck as a PNG
    ExportImage {
        #[arg(long)]
        out: Option<PathBuf>,
        /// Device pixel ratio; above 1 renders at 2x
        #[arg(long, default_value_t = 1.0)]
        pixel_ratio: f32,
    },
    /// Save the catalog base URL for later runs
    SetApi { url: String },
}

#[derive(clap::Args, Debug, Default)]
struct FetchArgs {
    /// Free-text search; filters are ignored when set
    #[arg(short, long)]
    query: Option<String>,
    #[arg(long)]
    rarity: Option<String>,
    #[arg(long)]
    feature: Option<String>,
    #[arg(long = "type")]
    card_type: Option<String>,
    #[arg(long)]
    level: Option<String>,
    #[arg(long)]
    round: Option<String>,
    #[arg(long = "character")]
    character_name: Option<String>,
    #[arg(long)]
    number: Option<String>,
    #[arg(long = "year")]
    publication_year: Option<String>,
    /// Only cards with errata
    #[arg(long, default_value_t = false)]
    errata: bool,
    /// Set code such as BP01 or PR, matched locally
    #[arg(long)]
    set: Option<String>,
}

impl FetchArgs {
    fn into_query(self) -> CatalogQuery {
        CatalogQuery {
            text: self.query,
            filters: CardFilters {
                rarity: self.rarity,
                feature: self.feature,
                card_type: self.card_type,
                level: self.level,
                round: self.round,
                character_name: self.character_name,
                number: self.number,
                publication_year: self.publication_year,
                errata_enable: self.errata,
            },
            set: self.set,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Set RUST_LOG to control log level, e.g. RUST_LOG=nebula_deck=debug
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        log::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    let config = match &cli.config {
        Some(path) => DeckConfig::load(path)?,
        None => DeckConfig::default(),
    };
    let data_dir = cli.data_dir.clone().unwrap_or_else(FileStore::default_dir);
    let mut store = FileStore::new(data_dir)?;

    if let Command::SetApi { url } = &cli.command {
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::ConfigError("API base URL must not be empty".to_string()));
        }
        save_api_base(&mut store, url)?;
        println!("Saved API base: {url}");
        return Ok(());
    }

    let stored = load_api_base(&store);
    let env_value = std::env::var(API_URL_ENV).ok();
    let base = resolve_api_base(cli.api_base.as_deref(), None)
        .or_else(|| resolve_api_base(stored.as_deref(), env_value.as_deref()));
    match &base {
        Some(base) => log::info!("Catalog: {}", base),
        None => log::info!("No catalog configured"),
    }
    let catalog = base.as_deref().map(HttpCatalog::new);
    let mut builder: Builder = DeckBuilder::new(catalog, store, config);

    match cli.command {
        Command::Fetch(args) => {
            let ok = builder.fetch_cards(&args.into_query()).await;
            if ok {
                let features = builder.config().features;
                print!("{}", format_results(builder.results(), &features));
                let options = format_filter_options(&FilterOptions::from_cards(builder.results()));
                if !options.is_empty() {
                    println!("\nFilter options:\n{options}");
                }
            }
            report(builder.status())
        }
        Command::Add { key, times } => {
            for _ in 0..times.max(1) {
                if !builder.add(&key).await {
                    break;
                }
            }
            report(builder.status())
        }
        Command::Remove { key, all } => {
            let changed = if all {
                builder.remove(&key)
            } else {
                builder.decrement(&key)
            };
            if changed {
                print!("{}", format_deck(builder.deck(), builder.config()));
                report(builder.status())
            } else {
                report(&Status::new(format!("{key} is not in the deck."), Tone::Warn))
            }
        }
        Command::Clear => {
            builder.clear();
            report(builder.status())
        }
        Command::Show => {
            print!("{}", format_deck(builder.deck(), builder.config()));
            Ok(())
        }
        Command::Export { out } => {
            let file = builder.export_json(now())?;
            write_export(out.as_deref(), &file)?;
            report(builder.status())
        }
        Command::Import { path } => {
            let bytes = std::fs::read(&path).map_err(|e| {
                Error::RuntimeError(format!("Failed to read {}: {}", path.display(), e))
            })?;
            if builder.import_bytes(&bytes).await {
                print!("{}", format_deck(builder.deck(), builder.config()));
            }
            report(builder.status())
        }
        Command::ExportImage { out, pixel_ratio } => {
            let loader = HttpImageLoader::new();
            if let Some(file) = builder.export_image(&loader, pixel_ratio, now()).await? {
                write_export(out.as_deref(), &file)?;
            }
            report(builder.status())
        }
        Command::SetApi { .. } => unreachable!("handled before the catalog is resolved"),
    }
}

fn write_export(out: Option<&Path>, file: &ExportFile) -> Result<(), Error> {
    let path = output_path(out, &file.file_name);
    std::fs::write(&path, &file.bytes)
        .map_err(|e| Error::RuntimeError(format!("Failed to write {}: {}", path.display(), e)))?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Print the status line; an error status fails the command
fn report(status: &Status) -> Result<(), Error> {
    match status.tone {
        Tone::Info => println!("{}", status.message),
        Tone::Warn => println!("Warning: {}", status.message),
        Tone::Error => return Err(Error::RuntimeError(status.message.clone())),
    }
    Ok(())
}

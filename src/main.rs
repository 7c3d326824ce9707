use anyhow::{Context, Result, bail};
use chrono::{Local, TimeZone};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

use planscriber::config::Config;
use planscriber::export;
use planscriber::model::{Document, PhotoPayload};
use planscriber::project::{self, ProjectSnapshot, StoreOptions};

#[derive(Parser, Debug)]
#[command(name = "planscriber")]
#[command(version, about = "Floor-plan annotation engine with JPEG and PDF report export")]
struct Cli {
    /// Override the project store directory
    #[arg(long, global = true, value_name = "DIR")]
    store_dir: Option<PathBuf>,

    /// Use an explicit config file instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List stored projects, newest first
    List,
    /// Show details of one stored project
    Show {
        /// Project id
        id: Uuid,
    },
    /// Delete a stored project
    Delete {
        /// Project id
        id: Uuid,
    },
    /// Import an annotation payload and save it as a project
    Import {
        /// JSON payload (native snapshot or flat record list)
        json: PathBuf,
        /// Base image file to attach
        #[arg(long, value_name = "FILE")]
        image: PathBuf,
        /// Override the plan name
        #[arg(long)]
        name: Option<String>,
    },
    /// Export the flattened JPEG image of a project
    ExportImage {
        #[command(flatten)]
        source: SourceArgs,
        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Export the PDF report (diagram page + point report pages)
    ExportPdf {
        #[command(flatten)]
        source: SourceArgs,
        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct SourceArgs {
    /// Export a stored project by id
    #[arg(long, value_name = "ID", conflicts_with_all = ["json", "image"])]
    project: Option<Uuid>,

    /// Export directly from a JSON payload (requires --image)
    #[arg(long, value_name = "FILE", requires = "image")]
    json: Option<PathBuf>,

    /// Base image for --json exports
    #[arg(long, value_name = "FILE")]
    image: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    let mut store = config.store_options();
    if let Some(dir) = &cli.store_dir {
        store.base_dir = dir.clone();
    }

    match cli.command {
        Command::List => list(&store),
        Command::Show { id } => show(&store, id),
        Command::Delete { id } => delete(&store, id),
        Command::Import { json, image, name } => import(&store, &json, &image, name),
        Command::ExportImage { source, output } => {
            let (document, image_data) = resolve_source(&store, &source)?;
            export::export_jpeg(&document, &image_data, &output, config.raster_options())?;
            println!("Immagine esportata: {}", output.display());
            Ok(())
        }
        Command::ExportPdf { source, output } => {
            let (document, image_data) = resolve_source(&store, &source)?;
            export::export_pdf(&document, &image_data, &output)?;
            println!("Report PDF esportato: {}", output.display());
            Ok(())
        }
    }
}

fn list(store: &StoreOptions) -> Result<()> {
    let projects = project::list_projects(store)?;
    if projects.is_empty() {
        println!("Nessun progetto salvato.");
        return Ok(());
    }
    for meta in projects {
        println!(
            "{}  {}  {} ({})",
            meta.id,
            format_timestamp(meta.last_modified),
            if meta.plan_name.is_empty() {
                "(senza nome)"
            } else {
                meta.plan_name.as_str()
            },
            meta.image_name
        );
    }
    Ok(())
}

fn show(store: &StoreOptions, id: Uuid) -> Result<()> {
    let saved = project::load_project(store, id)?;
    println!("Progetto:      {}", saved.id);
    println!(
        "Nome:          {}",
        if saved.snapshot.plan_name.is_empty() {
            "(senza nome)"
        } else {
            saved.snapshot.plan_name.as_str()
        }
    );
    println!("Piano:         {}", saved.snapshot.floor);
    println!("Immagine:      {}", saved.snapshot.image_name);
    println!("Rotazione:     {}°", saved.snapshot.rotation);
    println!("Scala marker:  {}", saved.snapshot.marker_scale);
    println!("Punti:         {}", saved.snapshot.points.len());
    println!("Linee:         {}", saved.snapshot.lines.len());
    println!("Modificato:    {}", format_timestamp(saved.last_modified));
    Ok(())
}

fn delete(store: &StoreOptions, id: Uuid) -> Result<()> {
    if project::delete_project(store, id)? {
        println!("Progetto {id} eliminato.");
        Ok(())
    } else {
        bail!("progetto {id} non trovato");
    }
}

fn import(
    store: &StoreOptions,
    json_path: &PathBuf,
    image_path: &PathBuf,
    name: Option<String>,
) -> Result<()> {
    let payload = fs::read_to_string(json_path)
        .with_context(|| format!("failed to read {}", json_path.display()))?;
    let outcome = project::import_json(&payload)?;

    let image_data = fs::read(image_path)
        .with_context(|| format!("failed to read image {}", image_path.display()))?;

    let mut document = outcome.document;
    if let Some(name) = name {
        document.plan_name = name;
    }

    let image_name = outcome.image_name.unwrap_or_else(|| {
        image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image.png".to_string())
    });

    let snapshot = ProjectSnapshot::from_document(&document, image_name);
    let id = project::save_project(store, snapshot, PhotoPayload::new(image_data), None)?;
    println!("Progetto importato: {id}");
    Ok(())
}

/// Resolves an export source into a document plus base image bytes.
fn resolve_source(store: &StoreOptions, source: &SourceArgs) -> Result<(Document, Vec<u8>)> {
    match (&source.project, &source.json) {
        (Some(id), None) => {
            let saved = project::load_project(store, *id)?;
            let document = saved.snapshot.into_document();
            Ok((document, saved.image_data.0))
        }
        (None, Some(json_path)) => {
            let image_path = source
                .image
                .as_ref()
                .context("--json exports require --image")?;
            let payload = fs::read_to_string(json_path)
                .with_context(|| format!("failed to read {}", json_path.display()))?;
            let outcome = project::import_json(&payload)?;
            let image_data = fs::read(image_path)
                .with_context(|| format!("failed to read image {}", image_path.display()))?;
            Ok((outcome.document, image_data))
        }
        _ => bail!("specify either --project <ID> or --json <FILE> --image <FILE>"),
    }
}

fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis) {
        chrono::LocalResult::Single(when) => when.format("%Y-%m-%d %H:%M").to_string(),
        _ => "-".to_string(),
    }
}

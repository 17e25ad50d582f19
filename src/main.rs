use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use icon_composer::{
    ComposerConfig, EditorSession, FileStore, IconCatalog, LayerPatch, ProjectStore,
    ReorderDirection, paint_order, resolve_color,
};

#[derive(Parser)]
#[command(name = "icon-composer")]
#[command(about = "Compose layered stroke icons and export them as SVG")]
struct Cli {
    /// Directory holding saved projects
    #[arg(long, global = true, default_value = ".icon-composer")]
    store: PathBuf,

    /// JSON file with configuration overrides
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Select this layer before running the command
    #[arg(long, global = true)]
    layer: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List icons, optionally filtered by a search query
    Icons { query: Option<String> },
    /// List saved projects, newest first
    Projects,
    /// Start a new project with the default layer
    New,
    /// Open a saved project
    Open { id: String },
    /// Rename the current project
    Rename { name: String },
    /// Delete a saved project
    RemoveProject { id: String },
    /// List layers of the current project in paint order
    Layers,
    /// Add a layer showing an icon
    Add { icon: String },
    /// Edit the selected layer
    Set(SetArgs),
    /// Delete the selected layer
    Delete,
    /// Duplicate the selected layer
    Duplicate,
    /// Move the selected layer one step toward the front
    Raise,
    /// Move the selected layer one step toward the back
    Lower,
    /// Export the current project as an SVG file
    Export(ExportArgs),
}

impl Command {
    /// Commands that only inspect state. These never write the store, even
    /// when startup created an unsaved project.
    fn is_read_only(&self) -> bool {
        match self {
            Command::Icons { .. } | Command::Projects | Command::Layers => true,
            Command::Export(args) => !args.reset,
            _ => false,
        }
    }
}

#[derive(clap::Args)]
struct SetArgs {
    #[arg(long)]
    icon: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    x: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    y: Option<f64>,
    #[arg(long)]
    scale: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    rotate: Option<f64>,
    #[arg(long)]
    opacity: Option<f64>,
    /// Hex color or swatch name
    #[arg(long)]
    color: Option<String>,
}

impl SetArgs {
    fn into_patch(self) -> LayerPatch {
        LayerPatch {
            icon_id: self.icon,
            x: self.x,
            y: self.y,
            scale: self.scale,
            rotate: self.rotate,
            opacity: self.opacity,
            color: self.color.as_deref().map(resolve_color),
        }
    }
}

#[derive(clap::Args)]
struct ExportArgs {
    /// File name; `.svg` is appended when missing
    #[arg(short, long)]
    name: Option<String>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Print the document instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// Include the selection highlight (stdout only)
    #[arg(long, requires = "stdout")]
    preview: bool,

    /// Start a new project once the file is written
    #[arg(long, conflicts_with = "stdout")]
    reset: bool,
}

fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|time| time.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn require(changed: bool, what: &str) -> Result<()> {
    if !changed {
        bail!("Nothing to {what}: no layer selected or no neighbour to swap with");
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ComposerConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ComposerConfig::default(),
    };

    let store = ProjectStore::new(FileStore::new(&cli.store));
    let mut session = EditorSession::start(IconCatalog::builtin(), config, store);

    if let Some(id) = &cli.layer {
        if !session.select(id) {
            bail!("No layer `{id}` in project {}", session.project_id());
        }
    }

    let read_only = cli.command.is_read_only();

    match cli.command {
        Command::Icons { query } => {
            for icon in session.catalog().search(query.as_deref().unwrap_or("")) {
                println!("{}\t{}", icon.id, icon.name);
            }
        }
        Command::Projects => {
            for project in session.projects() {
                let marker = if project.id == session.project_id() { "*" } else { " " };
                println!(
                    "{marker} {}\t{}\t{}\t{} layers",
                    project.id,
                    project.name,
                    format_timestamp(project.updated_at),
                    project.layers.len()
                );
            }
        }
        Command::New => {
            session.new_project();
            println!("{}", session.project_id());
        }
        Command::Open { id } => {
            if !session.open_project(&id) {
                bail!("No saved project `{id}`");
            }
            println!("{}\t{}", session.project_id(), session.project_name());
        }
        Command::Rename { name } => session.rename_project(&name),
        Command::RemoveProject { id } => session.delete_project(&id)?,
        Command::Layers => {
            let selection = session.selection();
            for layer in paint_order(session.layers()) {
                let marker = if Some(layer.id.as_str()) == selection { "*" } else { " " };
                println!(
                    "{marker} {}\t{}\tz={}\tat {},{}\tscale {}\trotate {}\topacity {}\t{}",
                    layer.id,
                    layer.icon_id,
                    layer.z_index,
                    layer.x,
                    layer.y,
                    layer.scale,
                    layer.rotate,
                    layer.opacity,
                    layer.color
                );
            }
        }
        Command::Add { icon } => {
            if !session.catalog().contains(&icon) {
                bail!("Unknown icon `{icon}`");
            }
            println!("{}", session.add_layer(&icon));
        }
        Command::Set(args) => {
            let patch = args.into_patch();
            if patch.is_empty() {
                bail!("Nothing to set");
            }
            require(session.update_selected(&patch), "edit")?;
        }
        Command::Delete => require(session.delete_selected(), "delete")?,
        Command::Duplicate => {
            require(session.duplicate_selected(), "duplicate")?;
            if let Some(id) = session.selection() {
                println!("{id}");
            }
        }
        Command::Raise => require(session.move_selected(ReorderDirection::Up), "raise")?,
        Command::Lower => require(session.move_selected(ReorderDirection::Down), "lower")?,
        Command::Export(args) => {
            if args.stdout {
                let svg = if args.preview {
                    session.preview_svg()
                } else {
                    session.export_svg()
                };
                println!("{svg}");
            } else {
                let name = args
                    .name
                    .unwrap_or_else(|| session.config().default_export_name.clone());
                let Some(file) = session.export(Some(&name)) else {
                    bail!("Export cancelled: empty file name");
                };
                let path = file.write_to(&args.out)?;
                println!("{}", path.display());
                if args.reset {
                    session.new_project();
                }
            }
        }
    }

    if read_only {
        return Ok(());
    }
    if session.settle().is_none() && session.is_dirty() {
        bail!("Failed to save project {}", session.project_id());
    }

    Ok(())
}

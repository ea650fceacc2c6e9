use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::{Path, PathBuf};

use boxproject::config::Settings;
use boxproject::keymap::{Addon, KeyChord, KeyEvent};
use boxproject::ops::{BoxToggle, Context, OperatorReport, RotateImage, Status};
use boxproject::state::{Library, Scene};

#[derive(Parser)]
#[command(name = "boxproject")]
#[command(about = "Box projection toggle and texture rotation for shader node graphs", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Image catalog database (defaults to the platform data directory)
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show whether images are rotated and the path of their counterpart
    Resolve {
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Toggle box/flat projection on the selected image-texture nodes
    Toggle {
        #[arg(long, value_name = "FILE")]
        scene: PathBuf,
    },

    /// Swap the selected nodes' images for their rotated counterparts
    Rotate {
        #[arg(long, value_name = "FILE")]
        scene: PathBuf,
    },

    /// Press a key chord (e.g. alt+q) in the node editor
    Key {
        chord: KeyChord,
        #[arg(long, value_name = "FILE")]
        scene: PathBuf,
    },

    /// Load image files into the catalog
    Load {
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// List the images in the catalog
    Images,

    /// Report catalog images whose files are missing
    Verify,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::load_default()?,
    };

    match cli.command {
        Commands::Resolve { paths } => {
            for path in paths {
                let resolution = boxproject::resolve(&path)?;
                let state = if resolution.is_rotated { "rotated" } else { "original" };
                println!("{}\t{}\t{}", path, state, resolution.counterpart_path());
            }
        }
        Commands::Toggle { scene } => {
            let library = open_library(cli.db.as_deref(), &settings)?;
            run_on_scene(&scene, &library, &settings, |addon, ctx| {
                addon.call(BoxToggle::IDNAME, ctx)
            })?;
        }
        Commands::Rotate { scene } => {
            let library = open_library(cli.db.as_deref(), &settings)?;
            run_on_scene(&scene, &library, &settings, |addon, ctx| {
                addon.call(RotateImage::IDNAME, ctx)
            })?;
        }
        Commands::Key { chord, scene } => {
            let library = open_library(cli.db.as_deref(), &settings)?;
            run_on_scene(&scene, &library, &settings, |addon, ctx| {
                Ok(addon
                    .dispatch(chord, KeyEvent::Press, ctx)?
                    .unwrap_or_else(OperatorReport::cancelled))
            })?;
        }
        Commands::Load { files } => {
            let library = open_library(cli.db.as_deref(), &settings)?;
            for file in files {
                let record = library.load(&file)?;
                println!("{}\t{}", record.name, record.filepath);
            }
        }
        Commands::Images => {
            let library = open_library(cli.db.as_deref(), &settings)?;
            for image in library.all_images()? {
                println!(
                    "{}\t{}x{}\t{}",
                    image.name, image.width, image.height, image.filepath
                );
            }
        }
        Commands::Verify => {
            let library = open_library(cli.db.as_deref(), &settings)?;
            let missing = library.verify_files()?;
            println!("{} of {} images missing", missing, library.image_count()?);
        }
    }

    Ok(())
}

fn open_library(db: Option<&Path>, settings: &Settings) -> Result<Library> {
    let path = db
        .map(Path::to_path_buf)
        .or_else(|| settings.library_path.clone())
        .or_else(Library::default_path)
        .context("could not determine where to keep the image catalog")?;

    Library::open(&path)
        .with_context(|| format!("failed to open image catalog {}", path.display()))
}

/// Load the scene, run one operator through the registered addon and save
/// the scene back if the operator finished.
fn run_on_scene<F>(scene_path: &Path, library: &Library, settings: &Settings, run: F) -> Result<()>
where
    F: FnOnce(&Addon, &mut Context<'_>) -> Result<OperatorReport, boxproject::Error>,
{
    let mut scene = Scene::load(scene_path)?;

    let mut addon = Addon::new();
    addon.register(settings)?;

    let report = run(&addon, &mut Context::new(&mut scene, library, settings))?;
    if report.status == Status::Finished {
        scene
            .save(scene_path)
            .with_context(|| format!("failed to save {}", scene_path.display()))?;
    }
    println!("{:?}: {} nodes changed", report.status, report.touched);

    addon.unregister()?;
    Ok(())
}

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use cgmath::{InnerSpace, Vector3};
use clap::{Parser, Subcommand};
use engine::debug_draw::DrawRecorder;
use engine::logging::{init_logging, DEFAULT_LOG_ENV_VAR};
use engine::profile;
use los_teleport::{
    PhysicsWorld, Resolution, SceneDescription, SightLineResolver, SightRay, TeleportConfig,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "los_query")]
#[command(about = "Resolve line-of-sight teleports against a scene file")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve where a teleport along a sight line would land
    Resolve {
        /// Scene file with objects and surfaces
        #[arg(long)]
        scene: PathBuf,

        /// Teleport config file (defaults are used when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Eye position, e.g. "0,1.5,0"
        #[arg(long, allow_hyphen_values = true)]
        origin: String,

        /// Aim direction, e.g. "1,0,0" (normalized for you)
        #[arg(long, allow_hyphen_values = true)]
        direction: String,

        /// Force the debug overlay on and print its draw commands
        #[arg(long)]
        debug: bool,
    },
    /// Write a default config file
    InitConfig {
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Load, migrate and validate a config file, then print it
    CheckConfig { path: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(DEFAULT_LOG_ENV_VAR, cli.verbose);

    match cli.command {
        Commands::Resolve {
            scene,
            config,
            origin,
            direction,
            debug,
        } => handle_resolve(&scene, config.as_deref(), &origin, &direction, debug),
        Commands::InitConfig { path, force } => handle_init_config(&path, force),
        Commands::CheckConfig { path } => handle_check_config(&path),
    }
}

fn handle_resolve(
    scene_path: &Path,
    config_path: Option<&Path>,
    origin: &str,
    direction: &str,
    debug: bool,
) -> Result<()> {
    let teleport_config = match config_path {
        Some(path) => TeleportConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => TeleportConfig::default(),
    };

    let mut resolver_config = teleport_config.resolver_config();
    resolver_config.debug |= debug;

    let scene = SceneDescription::load(scene_path)
        .with_context(|| format!("Failed to load scene: {}", scene_path.display()))?;
    let world = PhysicsWorld::from_scene(&scene);

    let origin = parse_vector(origin).context("Invalid --origin")?;
    let direction = parse_vector(direction).context("Invalid --direction")?;
    if direction.magnitude2() == 0.0 {
        bail!("--direction must not be the zero vector");
    }
    let ray = SightRay::new(origin, direction.normalize());

    info!(
        "Resolving from {:?} along {:?} ({} checkpoints over {})",
        ray.origin, ray.direction, resolver_config.checkpoint_count, resolver_config.max_distance
    );

    let mut recorder = DrawRecorder::new();
    let mut resolver = SightLineResolver::new();
    let destination = profile!(
        "resolve",
        resolver.resolve(&ray, &resolver_config, &world, &world, Some(&mut recorder))
    );

    let p = destination.position;
    println!("destination: {:.3}, {:.3}, {:.3}", p.x, p.y, p.z);
    match &destination.resolution {
        Resolution::Object { checkpoint, object } => {
            println!(
                "resolved by: object '{}' ({:?}) at checkpoint {}",
                object.type_name, object.id, checkpoint
            );
        }
        Resolution::Terrain { checkpoint, hit } => {
            println!(
                "resolved by: terrain at checkpoint {} ({:.3} past it)",
                checkpoint, hit.distance
            );
        }
        Resolution::Unresolved => {
            println!("resolved by: nothing, far end of the sight line");
        }
    }
    println!("checkpoints evaluated: {}", destination.checkpoints_evaluated);

    if !recorder.is_empty() {
        println!();
        for command in recorder.console_commands() {
            println!("{}", command);
        }
    }

    Ok(())
}

fn handle_init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    TeleportConfig::default()
        .save(path)
        .with_context(|| format!("Failed to write config: {}", path.display()))?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn handle_check_config(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("{} does not exist", path.display());
    }

    let config = TeleportConfig::load(path)
        .with_context(|| format!("Failed to load config: {}", path.display()))?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    println!();
    println!(
        "OK: step distance {:.2}, {} prioritized types",
        config.resolver_config().step_distance(),
        config.prioritized_types.len()
    );
    Ok(())
}

/// Parse "x,y,z"
fn parse_vector(text: &str) -> Result<Vector3<f32>> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(anyhow!("Expected x,y,z but got '{}'", text));
    }

    let mut values = [0.0f32; 3];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .parse()
            .with_context(|| format!("Invalid number '{}' in '{}'", part, text))?;
    }

    Ok(Vector3::from(values))
}

use anyhow::Context;
use clap::{Parser, Subcommand};
use crossfield_assets::load_environment;
use crossfield_pattern::{Pattern, Placement, Plane, Spacing};
use crossfield_render::{DebugTextRenderer, Renderer};
use crossfield_scene::{EnvironmentInfo, Scene};
use crossfield_tools::{ParamChange, SceneInspector, apply_change};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "crossfield-cli", about = "CLI tool for crossfield scenes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print generated box placements
    Pattern {
        /// Spacing between boxes, clamped to [-1, 1]
        #[arg(short, long, default_value_t = 0.0, allow_hyphen_values = true)]
        spacing: f32,
        /// Only print one plane (xy, xz or yz)
        #[arg(short, long)]
        plane: Option<Plane>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Build the scene and print a text description of it
    Describe {
        /// Spacing between boxes, clamped to [-1, 1]
        #[arg(short, long, default_value_t = 0.0, allow_hyphen_values = true)]
        spacing: f32,
        /// List every box position
        #[arg(short, long)]
        boxes: bool,
        /// Attach this HDR image as the environment before describing
        #[arg(long)]
        hdri: Option<PathBuf>,
    },
    /// Load an equirectangular HDR image and report its mip chain
    Hdri {
        /// Path to the .hdr file
        path: PathBuf,
    },
}

fn placements(spacing: f32, plane: Option<Plane>) -> Vec<Placement> {
    Pattern::default()
        .generate(Spacing::new(spacing))
        .into_iter()
        .filter(|p| plane.is_none_or(|want| p.plane == want))
        .collect()
}

fn build_scene(spacing: f32) -> Scene {
    let mut scene = Scene::new();
    apply_change(
        &mut scene,
        &Pattern::default(),
        ParamChange::Spacing(Spacing::new(spacing)),
    );
    scene
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let pattern = Pattern::default();
            println!("crossfield-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "pattern: {} rows={:?} boxes={}",
                crossfield_pattern::crate_info(),
                pattern.rows(),
                pattern.total_box_count()
            );
            println!("assets: {}", crossfield_assets::crate_info());
            println!("render: {}", crossfield_render::crate_info());
            println!("tools: {}", crossfield_tools::crate_info());
        }
        Commands::Pattern {
            spacing,
            plane,
            json,
        } => {
            let placements = placements(spacing, plane);
            tracing::debug!(count = placements.len(), "generated placements");
            if json {
                println!("{}", serde_json::to_string_pretty(&placements)?);
            } else {
                println!(
                    "Pattern: spacing={:.2} step={:.2} boxes={}",
                    Spacing::new(spacing).value(),
                    Spacing::new(spacing).step(),
                    placements.len()
                );
                for p in &placements {
                    println!(
                        "  {} row={} col={} pos=({:.2}, {:.2}, {:.2})",
                        p.plane, p.row, p.column, p.position.x, p.position.y, p.position.z
                    );
                }
            }
        }
        Commands::Describe {
            spacing,
            boxes,
            hdri,
        } => {
            let mut scene = build_scene(spacing);
            if let Some(path) = hdri {
                match load_environment(&path) {
                    Ok(map) => scene.set_environment(EnvironmentInfo {
                        source: path.display().to_string(),
                        width: map.width(),
                        height: map.height(),
                        mip_levels: map.mip_level_count(),
                    }),
                    Err(e) => {
                        tracing::warn!("environment map unavailable ({}): {e}", path.display())
                    }
                }
            }
            let renderer = if boxes {
                DebugTextRenderer::with_boxes()
            } else {
                DebugTextRenderer::new()
            };
            print!("{}", renderer.render(&scene));
            println!("{}", SceneInspector::summary(&scene));
        }
        Commands::Hdri { path } => {
            let map = load_environment(&path)
                .with_context(|| format!("loading {}", path.display()))?;
            let [r, g, b, _] = map.average();
            println!(
                "HDRI: {} {}x{} mips={}",
                path.display(),
                map.width(),
                map.height(),
                map.mip_level_count()
            );
            for (i, level) in map.levels().iter().enumerate() {
                println!("  mip {i}: {}x{}", level.width, level.height);
            }
            println!("average radiance: ({r:.4}, {g:.4}, {b:.4})");
        }
    }

    Ok(())
}

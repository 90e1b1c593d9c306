use std::path::Path;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use skiff_assets::AssetStore;
use skiff_control::{DemoScene, FrameDriver, MotionConfig};
use skiff_input::{HeldKeys, Key};

#[derive(Parser)]
#[command(name = "skiff-cli", about = "Headless skiff tool: inspect assets, run the sim")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Run the demo simulation without a window
    Sim {
        /// Number of frames to simulate at 60 Hz
        #[arg(short, long, default_value = "300")]
        frames: u32,
        /// Direction to hold for the whole run
        #[arg(long, value_enum)]
        hold: Option<Hold>,
        /// Collect collider wireframes and report the segment count
        #[arg(long)]
        colliders: bool,
    },
    /// Load an asset manifest and report what it contains
    Assets {
        /// Directory containing manifest.json
        #[arg(long, default_value = "./assets")]
        assets_dir: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Hold {
    Forward,
    Backward,
    Left,
    Right,
}

impl Hold {
    fn key(self) -> Key {
        match self {
            Hold::Forward => Key::KeyW,
            Hold::Backward => Key::KeyS,
            Hold::Left => Key::KeyA,
            Hold::Right => Key::KeyD,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("skiff-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common:  {}", skiff_common::crate_info());
            println!("physics: {}", skiff_physics::crate_info());
            println!("scene:   {}", skiff_scene::crate_info());
            println!("assets:  {}", skiff_assets::crate_info());
            println!("input:   {}", skiff_input::crate_info());
            println!("control: {}", skiff_control::crate_info());
        }
        Commands::Sim {
            frames,
            hold,
            colliders,
        } => {
            println!("Headless sim: {frames} frames at 60 Hz");

            let mut demo = DemoScene::build();
            let mut driver =
                FrameDriver::new(demo.player_body, demo.player_node, MotionConfig::default());
            driver.dismiss_instructions();

            let mut held = HeldKeys::new();
            if let Some(hold) = hold {
                held.press(hold.key());
            }

            let dt = 1.0 / 60.0;
            for frame in 0..frames {
                driver.tick(
                    dt,
                    &held,
                    &mut demo.physics,
                    &mut demo.scene,
                    &mut demo.camera,
                    colliders,
                )?;
                tracing::debug!(frame, "ticked");
                if frame % 60 == 0 {
                    if let Some(pos) = demo.physics.position(demo.player_body) {
                        let dir = driver.direction();
                        println!(
                            "frame {frame:4}: pos=({:+.2}, {:+.2}, {:+.2}) heading=({:+.2}, {:+.2})",
                            pos.x, pos.y, pos.z, dir.x, dir.z
                        );
                    }
                }
            }

            if let (Some(pos), Some(vel)) = (
                demo.physics.position(demo.player_body),
                demo.physics.linear_velocity(demo.player_body),
            ) {
                println!(
                    "final: pos=({:+.2}, {:+.2}, {:+.2}) vel=({:+.2}, {:+.2}, {:+.2})",
                    pos.x, pos.y, pos.z, vel.x, vel.y, vel.z
                );
            }
            println!("bodies: {}", demo.physics.body_count());
            if colliders {
                println!(
                    "collider wireframe: {} segments",
                    demo.physics.debug_lines().len()
                );
            }
        }
        Commands::Assets { assets_dir } => {
            let store = AssetStore::load_manifest(Path::new(&assets_dir))?;
            println!("{} assets in {assets_dir}", store.len());
            for (_, mesh) in store.meshes() {
                println!(
                    "mesh    {}: {} vertices, {} indices",
                    mesh.name,
                    mesh.vertex_count(),
                    mesh.index_count()
                );
            }
            for (_, tex) in store.textures() {
                println!("texture {}: {}x{}", tex.name, tex.width, tex.height);
            }
        }
    }

    Ok(())
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for skiff")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, deny, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Run cargo deny check
    Deny,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Regenerate the checked-in demo textures
    GenAssets,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            run_fmt()?;
            run_clippy()?;
            run_tests()?;
            run_deny()?;
            run_doc()?;
        }
        Commands::Fmt => run_fmt()?,
        Commands::Clippy => run_clippy()?,
        Commands::Test => run_tests()?,
        Commands::Deny => run_deny()?,
        Commands::Doc => run_doc()?,
        Commands::Build => run_build()?,
        Commands::GenAssets => gen_assets()?,
    }

    Ok(())
}

fn run_fmt() -> Result<()> {
    println!("==> Running cargo fmt --check");
    let status = Command::new("cargo")
        .args(["fmt", "--all", "--", "--check"])
        .status()?;
    if !status.success() {
        anyhow::bail!("cargo fmt check failed");
    }
    Ok(())
}

fn run_clippy() -> Result<()> {
    println!("==> Running cargo clippy");
    let status = Command::new("cargo")
        .args([
            "clippy",
            "--workspace",
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ])
        .status()?;
    if !status.success() {
        anyhow::bail!("cargo clippy failed");
    }
    Ok(())
}

fn run_tests() -> Result<()> {
    println!("==> Running cargo test");
    let status = Command::new("cargo")
        .args(["test", "--workspace"])
        .status()?;
    if !status.success() {
        anyhow::bail!("cargo test failed");
    }
    Ok(())
}

fn run_deny() -> Result<()> {
    println!("==> Running cargo deny check (licenses bans sources)");
    let status = Command::new("cargo")
        .args(["deny", "check", "licenses", "bans", "sources"])
        .status()?;
    if !status.success() {
        anyhow::bail!("cargo deny check failed");
    }
    Ok(())
}

fn run_doc() -> Result<()> {
    println!("==> Running cargo doc");
    let status = Command::new("cargo")
        .args(["doc", "--workspace", "--no-deps"])
        .status()?;
    if !status.success() {
        anyhow::bail!("cargo doc failed");
    }
    Ok(())
}

fn run_build() -> Result<()> {
    println!("==> Running cargo build");
    let status = Command::new("cargo")
        .args(["build", "--workspace"])
        .status()?;
    if !status.success() {
        anyhow::bail!("cargo build failed");
    }
    Ok(())
}

/// Rewrite assets/textures/*.png from the pixel functions below. The meshes
/// under assets/models/ are authored by hand and are not touched.
fn gen_assets() -> Result<()> {
    let dir = workspace_root()?.join("assets").join("textures");
    std::fs::create_dir_all(&dir)?;

    write_texture(&dir.join("ship.png"), 64, 64, ship_pixel)?;
    write_texture(&dir.join("floor.png"), 32, 32, floor_pixel)?;
    write_texture(&dir.join("wall.png"), 32, 32, wall_pixel)?;

    println!("==> Wrote 3 textures to {}", dir.display());
    Ok(())
}

fn workspace_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(PathBuf::from)
        .context("xtask must live one level under the workspace root")
}

fn write_texture(path: &Path, w: u32, h: u32, pixel: fn(u32, u32) -> [u8; 3]) -> Result<()> {
    let img = image::RgbaImage::from_fn(w, h, |x, y| {
        let [r, g, b] = pixel(x, y);
        image::Rgba([r, g, b, 255])
    });
    img.save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("    {}", path.display());
    Ok(())
}

/// Hull plating: 16 px panels with a dark seam, a bevel highlight, and
/// alternating panel shades. Rendered with nearest filtering.
fn ship_pixel(x: u32, y: u32) -> [u8; 3] {
    if x % 16 == 0 || y % 16 == 0 {
        [58, 62, 68]
    } else if x % 16 == 1 || y % 16 == 1 {
        [112, 118, 126]
    } else if (x / 16 + y / 16) % 2 == 0 {
        [96, 102, 110]
    } else {
        [88, 94, 102]
    }
}

/// Two-tone green checker with a thin grid line, tiled across the ground.
fn floor_pixel(x: u32, y: u32) -> [u8; 3] {
    if x % 16 == 0 || y % 16 == 0 {
        [54, 84, 54]
    } else if (x / 16 + y / 16) % 2 == 0 {
        [74, 112, 74]
    } else {
        [62, 96, 62]
    }
}

/// Running-bond brick: 8 px courses, alternate rows offset half a brick.
fn wall_pixel(x: u32, y: u32) -> [u8; 3] {
    let mortar = [150, 145, 138];
    if y % 8 == 0 {
        return mortar;
    }
    let offset = if (y / 8) % 2 == 0 { 0 } else { 8 };
    if (x + offset) % 16 == 0 {
        mortar
    } else {
        [142, 84, 72]
    }
}

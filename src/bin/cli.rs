// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Meshview CLI

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use meshview::geometry::{color, INVALID_QUALITY};
use meshview::{
    analyze, export_stl, AnyMesh, Drawable, Geometry, MeshStats, Primitive, Shading, SliceBox, StlEncoding,
    ViewerConfig,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "meshview")]
#[command(about = "Inspect, slice and export triangle, quad, tet and hex meshes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Viewer config file (defaults to ./meshview.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print element counts, extent and quality of a mesh file
    Info {
        input: PathBuf,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report scaled-Jacobian quality of a volumetric mesh
    Quality {
        input: PathBuf,

        /// Number of worst cells to list
        #[arg(short, long, default_value = "10")]
        worst: usize,
    },

    /// Export a surface mesh to STL
    Export {
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        /// Write ASCII instead of binary STL
        #[arg(long)]
        ascii: bool,
    },

    /// Build the render buffer of a mesh and summarize it
    Buffer {
        input: PathBuf,

        /// smooth, flat or wireframe (overrides the config)
        #[arg(short, long)]
        shading: Option<Shading>,

        /// Keep cells whose centroid z lies in this range, e.g. `0,0.5`
        #[arg(long, value_parser = parse_range)]
        slice_z: Option<(f32, f32)>,

        /// Write the vertex records as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a structured hex grid and print its statistics
    Demo {
        /// Cells along x, y and z
        #[arg(long, num_args = 3, default_values_t = [1, 1, 1])]
        dims: Vec<usize>,

        /// Split every hex into six tets
        #[arg(long)]
        tets: bool,
    },
}

fn parse_range(value: &str) -> Result<(f32, f32), String> {
    let (lo, hi) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LO,HI but got '{}'", value))?;
    let parse = |s: &str| s.trim().parse::<f32>().map_err(|e| e.to_string());
    Ok((parse(lo)?, parse(hi)?))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "meshview=warn".into()),
        )
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("{} {:#}", "Error:".red(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ViewerConfig::from_file(path)?,
        None => ViewerConfig::load()?,
    };

    match cli.command {
        Commands::Info { input, json } => info_command(&input, json, &config),
        Commands::Quality { input, worst } => quality_command(&input, worst, &config),
        Commands::Export { input, output, ascii } => export_command(&input, &output, ascii, &config),
        Commands::Buffer {
            input,
            shading,
            slice_z,
            output,
        } => buffer_command(&input, shading, slice_z, output.as_deref(), &config),
        Commands::Demo { dims, tets } => demo_command(&dims, tets),
    }
}

fn open(input: &Path, config: &ViewerConfig) -> Result<Drawable<AnyMesh>> {
    if !input.exists() {
        bail!("Input file not found: {}", input.display());
    }
    meshview::open(input, config)
}

fn info_command(input: &Path, json: bool, config: &ViewerConfig) -> Result<()> {
    let drawable = open(input, config)?;
    let stats = analyze(drawable.mesh());
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        stats.print();
    }
    Ok(())
}

fn quality_label(q: f32) -> colored::ColoredString {
    let text = format!("{:>8.4}", q);
    if q == INVALID_QUALITY {
        text.red().bold()
    } else if q < 0.3 {
        text.red()
    } else if q < 0.7 {
        text.yellow()
    } else {
        text.green()
    }
}

fn quality_command(input: &Path, worst: usize, config: &ViewerConfig) -> Result<()> {
    let drawable = open(input, config)?;
    let mesh = drawable.mesh();
    if mesh.as_volume().is_none() {
        bail!("{} is a {} mesh; quality needs tets or hexes", input.display(), mesh.kind());
    }

    let qualities = mesh.qualities();
    let stats = analyze(mesh);
    print_summary(&stats);

    let mut order: Vec<usize> = (0..qualities.len()).collect();
    order.sort_by(|&a, &b| qualities[a].total_cmp(&qualities[b]));

    println!("\n  {}", format!("Worst {} cells:", worst.min(order.len())).bold());
    for &pid in order.iter().take(worst) {
        let centroid = mesh.core().poly_centroid(pid);
        println!(
            "    {} {:>8}  {}  ({:.3}, {:.3}, {:.3})",
            "cell".bright_black(),
            pid,
            quality_label(qualities[pid]),
            centroid.x,
            centroid.y,
            centroid.z
        );
    }
    println!("{}", "═".repeat(80).bright_black());
    Ok(())
}

fn print_summary(stats: &MeshStats) {
    println!("\n{}", "═".repeat(80).bright_black());
    println!("{} {}", stats.name.bold(), format!("({})", stats.kind).bright_black());
    println!("{}", "═".repeat(80).bright_black());
    println!("  {} {}", "Cells:".bright_black(), stats.poly_count.to_string().cyan());
    if let Some(q) = &stats.quality {
        println!("  {} {}", "Min quality:".bright_black(), quality_label(q.min));
        println!("  {} {}", "Max quality:".bright_black(), quality_label(q.max));
        println!("  {} {}", "Mean quality:".bright_black(), quality_label(q.mean));
        let invalid = q.invalid.to_string();
        println!(
            "  {} {}",
            "Invalid cells:".bright_black(),
            if q.invalid > 0 { invalid.red() } else { invalid.green() }
        );
    }
}

fn export_command(input: &Path, output: &Path, ascii: bool, config: &ViewerConfig) -> Result<()> {
    let drawable = open(input, config)?;
    let surface = drawable
        .mesh()
        .as_surface()
        .with_context(|| format!("{} is volumetric; only surface meshes export to STL", input.display()))?;

    let encoding = if ascii { StlEncoding::Ascii } else { StlEncoding::Binary };
    let start = std::time::Instant::now();
    export_stl(surface, output, encoding)?;
    println!(
        "{} {} -> {} in {:.2?}",
        "✓".green(),
        input.display(),
        output.display().to_string().cyan(),
        start.elapsed()
    );
    Ok(())
}

fn buffer_command(
    input: &Path,
    shading: Option<Shading>,
    slice_z: Option<(f32, f32)>,
    output: Option<&Path>,
    config: &ViewerConfig,
) -> Result<()> {
    let mut drawable = open(input, config)?;
    if let Some(shading) = shading {
        drawable.set_shading(shading);
    }
    if let Some(z) = slice_z {
        let mesh = drawable.mesh_mut();
        // a freshly loaded mesh is dirty and slice() ignores dirty meshes,
        // so clear the flag for the slice and raise it again for buffer()
        mesh.set_dirty(false);
        let bbox = mesh.bounding_box();
        mesh.slice(SliceBox { z, ..SliceBox::from_bbox(&bbox) });
        mesh.set_dirty(true);
    }

    let start = std::time::Instant::now();
    let record_count = drawable.buffer().len();
    let elapsed = start.elapsed();
    let ranges = drawable.draw_ranges();

    println!("\n{}", "═".repeat(80).bright_black());
    println!("{} {}", drawable.mesh().name().bold(), format!("({})", drawable.shading()).bright_black());
    println!("{}", "═".repeat(80).bright_black());
    println!("  {} {}", "Records:".bright_black(), record_count.to_string().cyan());
    println!(
        "  {} {}",
        "Visible cells:".bright_black(),
        drawable.mesh().core().visible_count().to_string().cyan()
    );
    println!("  {} {:?}", "Triangle range:".bright_black(), ranges.triangles);
    println!("  {} {:?}", "Line range:".bright_black(), ranges.lines);
    println!("  {} {:.2?}", "Built in:".bright_black(), elapsed);

    if let Some(path) = output {
        let json = serde_json::to_string(drawable.buffer())?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        println!("  {} {}", "Written:".bright_black(), path.display().to_string().cyan());
    }
    println!("{}", "═".repeat(80).bright_black());
    Ok(())
}

fn demo_command(dims: &[usize], tets: bool) -> Result<()> {
    let dims = [dims[0], dims[1], dims[2]];
    let primitive = if dims == [1, 1, 1] && !tets {
        Primitive::DemoHex
    } else if tets {
        Primitive::tet_grid(dims, 1.0)
    } else {
        Primitive::hex_grid(dims, 1.0)
    };
    let mut mesh = primitive.to_mesh()?;
    if mesh.name().is_empty() {
        mesh.core_mut().set_name("Grid");
    }

    let stats = analyze(&mesh);
    stats.print();

    let mut drawable = Drawable::new(mesh);
    let records = drawable.buffer().len();
    let worst = stats.quality.map(|q| q.min).unwrap_or(1.0);
    let swatch = color::quality_to_color(worst);
    println!(
        "{} {} render records, worst cell color ({:.2}, {:.2}, {:.2})",
        "ℹ".bright_blue(),
        records,
        swatch.x,
        swatch.y,
        swatch.z
    );
    Ok(())
}

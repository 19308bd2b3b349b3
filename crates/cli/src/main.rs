//! swath CLI - width profiles of elongated polygons

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use swath_algorithms::profile::{
    polygon_orientation, select_centerlines, width_profile_with_mode, Centerline,
    OrientationScope, PolygonOrientation, WidthProfileParams,
};
use swath_algorithms::statistics::profile_statistics;
use swath_core::io::{
    read_centerlines, read_feature_collection, read_polygons, write_centerlines, write_probes,
    write_table_file, CenterlineFeature,
};
use swath_core::{CenterlineBranch, PolygonFeature};
use swath_parallel::{num_cpus, ProcessingMode};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "swath")]
#[command(author, version, about = "Width profiles of elongated polygons", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a GeoJSON layer
    Info {
        /// Input GeoJSON file
        input: PathBuf,
        /// Integer property holding the polygon id
        #[arg(long, default_value = "polygon_id")]
        id_field: String,
    },
    /// Measure width along the centerline of each polygon
    Profile {
        /// Polygon layer (GeoJSON)
        polygons: PathBuf,
        /// Skeleton branch layer (GeoJSON)
        skeleton: PathBuf,
        /// Output width table (CSV)
        #[arg(short, long)]
        output: PathBuf,
        /// Sampling interval along the centerline
        #[arg(short, long)]
        interval: Option<f64>,
        /// Probe half-length; must exceed the largest half-width
        #[arg(long)]
        half_length: Option<f64>,
        /// JSON file with profiling parameters; flags override it
        #[arg(long)]
        config: Option<PathBuf>,
        /// Integer property holding the polygon id
        #[arg(long, default_value = "polygon_id")]
        id_field: String,
        /// Write clipped probes to this GeoJSON file
        #[arg(long)]
        probes: Option<PathBuf>,
        /// Write per-polygon statistics to this CSV file
        #[arg(long)]
        stats: Option<PathBuf>,
        /// Estimate orientation only from centerline segments inside the polygon
        #[arg(long)]
        within_polygon: bool,
        /// Drop samples that fall outside their polygon
        #[arg(long)]
        require_containment: bool,
        /// Number of worker threads
        #[arg(short, long)]
        threads: Option<usize>,
        /// Process polygons on a single thread
        #[arg(long, conflicts_with = "threads")]
        sequential: bool,
    },
    /// Export the longest skeleton branch of each polygon
    Select {
        /// Skeleton branch layer (GeoJSON)
        skeleton: PathBuf,
        /// Output GeoJSON file
        output: PathBuf,
        /// Integer property holding the polygon id
        #[arg(long, default_value = "polygon_id")]
        id_field: String,
    },
    /// Write the axis orientation of each polygon
    Orientation {
        /// Polygon layer (GeoJSON)
        polygons: PathBuf,
        /// Skeleton branch layer (GeoJSON)
        skeleton: PathBuf,
        /// Output table (CSV)
        output: PathBuf,
        /// Integer property holding the polygon id
        #[arg(long, default_value = "polygon_id")]
        id_field: String,
        /// Use only centerline segments inside the polygon
        #[arg(long)]
        within_polygon: bool,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set up logging")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn load_polygons(path: &Path, id_field: &str) -> Result<Vec<PolygonFeature>> {
    let pb = spinner("Reading polygons...");
    let polygons = read_polygons(path, id_field)
        .with_context(|| format!("Failed to read polygons from {}", path.display()))?;
    pb.finish_and_clear();
    info!("Polygons: {}", polygons.len());
    Ok(polygons)
}

fn load_branches(path: &Path, id_field: &str) -> Result<Vec<CenterlineBranch>> {
    let pb = spinner("Reading skeleton...");
    let branches = read_centerlines(path, id_field)
        .with_context(|| format!("Failed to read skeleton from {}", path.display()))?;
    pb.finish_and_clear();
    info!("Skeleton branches: {}", branches.len());
    Ok(branches)
}

fn load_params(config: Option<&Path>) -> Result<WidthProfileParams> {
    match config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Invalid config {}", path.display()))
        }
        None => Ok(WidthProfileParams::default()),
    }
}

fn processing_mode(threads: Option<usize>, sequential: bool) -> ProcessingMode {
    match (threads, sequential) {
        (_, true) => ProcessingMode::Sequential,
        (Some(n), false) => ProcessingMode::ParallelWith(n),
        (None, false) => ProcessingMode::Parallel,
    }
}

/// Centerlines in polygon input order, for reproducible output.
fn ordered_centerlines<'a>(
    polygons: &'a [PolygonFeature],
    branches: &[CenterlineBranch],
) -> Vec<(&'a PolygonFeature, Centerline)> {
    let mut selected = select_centerlines(branches);
    polygons
        .iter()
        .filter_map(|p| selected.remove(&p.id).map(|c| (p, c)))
        .collect()
}

/// Orientation of every polygon that has a centerline and valid geometry.
fn orientation_rows(
    polygons: &[PolygonFeature],
    branches: &[CenterlineBranch],
    scope: OrientationScope,
) -> Vec<PolygonOrientation> {
    ordered_centerlines(polygons, branches)
        .iter()
        .filter_map(|(polygon, c)| match polygon_orientation(polygon, c, scope) {
            Ok(row) => Some(row),
            Err(e) => {
                info!("skipping {}", e);
                None
            }
        })
        .collect()
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { input, id_field } => {
            let fc = read_feature_collection(&input).context("Failed to read layer")?;
            let mut kinds: std::collections::BTreeMap<&'static str, usize> = Default::default();
            let mut with_id = 0;
            for f in fc.iter() {
                let kind = match &f.geometry {
                    Some(geo_types::Geometry::Polygon(_)) => "Polygon",
                    Some(geo_types::Geometry::MultiPolygon(_)) => "MultiPolygon",
                    Some(geo_types::Geometry::LineString(_)) => "LineString",
                    Some(geo_types::Geometry::MultiLineString(_)) => "MultiLineString",
                    Some(geo_types::Geometry::Point(_)) => "Point",
                    Some(_) => "Other",
                    None => "None",
                };
                *kinds.entry(kind).or_insert(0) += 1;
                if f.polygon_id(&id_field).is_some() {
                    with_id += 1;
                }
            }

            println!("File: {}", input.display());
            println!("Features: {}", fc.len());
            for (kind, n) in &kinds {
                println!("  {}: {}", kind, n);
            }
            println!("With '{}' id: {}", id_field, with_id);
        }

        // ── Profile ──────────────────────────────────────────────────
        Commands::Profile {
            polygons,
            skeleton,
            output,
            interval,
            half_length,
            config,
            id_field,
            probes,
            stats,
            within_polygon,
            require_containment,
            threads,
            sequential,
        } => {
            let mut params = load_params(config.as_deref())?;
            if let Some(d) = interval {
                params.sample_interval = d;
            }
            if let Some(l) = half_length {
                params.probe_half_length = l;
            }
            if within_polygon {
                params.orientation_scope = OrientationScope::WithinPolygon;
            }
            if require_containment {
                params.require_containment = true;
            }
            params.retain_probes = probes.is_some();
            let mode = processing_mode(threads, sequential);
            let workers = match mode {
                ProcessingMode::Sequential => 1,
                ProcessingMode::Parallel => num_cpus(),
                ProcessingMode::ParallelWith(n) => n,
            };
            info!(
                "Interval {}, probe half-length {}, {} worker(s)",
                params.sample_interval, params.probe_half_length, workers
            );

            let polygon_layer = load_polygons(&polygons, &id_field)?;
            let branches = load_branches(&skeleton, &id_field)?;

            let start = Instant::now();
            let pb = spinner("Profiling...");
            let profile = width_profile_with_mode(&polygon_layer, &branches, &params, mode)
                .context("Failed to compute width profile")?;
            pb.finish_and_clear();
            let elapsed = start.elapsed();

            write_table_file(&output, &profile.records).context("Failed to write width table")?;
            if let Some(path) = &probes {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                write_probes(file, &profile.probes).context("Failed to write probes")?;
                println!("Probes saved to: {}", path.display());
            }
            if let Some(path) = &stats {
                write_table_file(path, &profile_statistics(&profile.records))
                    .context("Failed to write statistics")?;
                println!("Statistics saved to: {}", path.display());
            }

            let report = &profile.report;
            println!("{}", report.summary());
            println!(
                "  Records: {} ({} zero-width, {} outside samples dropped)",
                profile.records.len(),
                report.degenerate_probes,
                report.outside_samples
            );
            if report.orphan_branches > 0 {
                println!("  Branches without polygon: {}", report.orphan_branches);
            }
            done("Width profile", &output, elapsed);
        }

        // ── Select ───────────────────────────────────────────────────
        Commands::Select {
            skeleton,
            output,
            id_field,
        } => {
            let branches = load_branches(&skeleton, &id_field)?;
            let start = Instant::now();

            // Keep ids in first-seen order
            let mut selected = select_centerlines(&branches);
            let features: Vec<CenterlineFeature> = branches
                .iter()
                .filter_map(|b| selected.remove(&b.polygon_id))
                .map(|c| CenterlineFeature::from(&c))
                .collect();
            let elapsed = start.elapsed();

            let file = File::create(&output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            write_centerlines(file, &features).context("Failed to write centerlines")?;
            info!("Centerlines: {}", features.len());
            done("Centerlines", &output, elapsed);
        }

        // ── Orientation ──────────────────────────────────────────────
        Commands::Orientation {
            polygons,
            skeleton,
            output,
            id_field,
            within_polygon,
        } => {
            let polygon_layer = load_polygons(&polygons, &id_field)?;
            let branches = load_branches(&skeleton, &id_field)?;
            let start = Instant::now();

            let scope = if within_polygon {
                OrientationScope::WithinPolygon
            } else {
                OrientationScope::Centerline
            };
            let rows = orientation_rows(&polygon_layer, &branches, scope);
            let elapsed = start.elapsed();

            write_table_file(&output, &rows).context("Failed to write orientations")?;
            info!(
                "Orientations: {} of {} polygons",
                rows.len(),
                polygon_layer.len()
            );
            done("Orientations", &output, elapsed);
        }
    }

    Ok(())
}

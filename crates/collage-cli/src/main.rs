use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use collage_core::{
    CollageConfig, InputPhoto, Size, plan_layout, plan_layout_adaptive, render_plan, to_json,
};
use globset::{Glob, GlobSetBuilder};
use image::{DynamicImage, GenericImageView, ImageReader};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::{error, info};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "collage",
    about = "Lay out a folder of photos into one exact-fit column collage",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --no-progress or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lay out photos and render the collage image
    Create(CreateArgs),
    /// Layout-only (no pixel work): compute placements and export the JSON plan
    Layout(CreateArgs),
    /// Simple timing bench (plans once, prints time + stats)
    Bench(BenchArgs),
}

#[derive(Parser, Debug, Clone)]
struct CreateArgs {
    // Input/Output
    /// Input file or directory
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// Collage base name (files will be name.png/.json)
    #[arg(short, long, default_value = "collage", help_heading = "Input/Output")]
    name: String,
    /// YAML config file path (overrides layout-related options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,

    // Layout
    /// Canvas width
    #[arg(long, default_value_t = 1080, help_heading = "Layout")]
    width: u32,
    /// Canvas height
    #[arg(long, default_value_t = 1920, help_heading = "Layout")]
    height: u32,
    /// Force the column count instead of estimating it from the photo set
    #[arg(long, help_heading = "Layout")]
    columns: Option<usize>,
    /// Probability that a photo spans two similar-height columns (0..=1)
    #[arg(long, default_value_t = 0.2, help_heading = "Layout")]
    span_probability: f64,
    /// Neighbor columns within this many pixels count as similar height
    #[arg(long, default_value_t = 10, help_heading = "Layout")]
    tolerance: u32,
    /// RNG seed (span coin flips and --shuffle)
    #[arg(long, default_value_t = 0, help_heading = "Layout")]
    seed: u64,
    /// Shuffle the input order before placing
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    shuffle: bool,
    /// Fail instead of retrying with fewer columns when alignment is infeasible
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    no_retry: bool,

    // Export
    /// Output image format: png | jpeg | tiff
    #[arg(long, default_value = "png", value_parser = ["png", "jpeg", "tiff"], help_heading = "Export")]
    format: String,
    /// JPEG quality (1..=100)
    #[arg(long, default_value_t = 90, help_heading = "Export")]
    jpeg_quality: u8,
    /// Write the JSON plan next to the image
    #[arg(long, default_value_t = false, help_heading = "Export")]
    export_plan: bool,
    /// Export layout stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: plan and print stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    /// Input directory
    input: PathBuf,
    /// Canvas width
    #[arg(long, default_value_t = 1080)]
    width: u32,
    /// Canvas height
    #[arg(long, default_value_t = 1920)]
    height: u32,
    /// RNG seed
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Create(args) => run_create(args, cli.progress && !cli.quiet, false),
        Commands::Layout(args) => run_create(args, false, true),
        Commands::Bench(b) => run_bench(b),
    }
}

fn run_create(cli: &CreateArgs, show_progress: bool, layout_only: bool) -> anyhow::Result<()> {
    let base = CollageConfig {
        canvas_width: cli.width,
        canvas_height: cli.height,
        span_probability: cli.span_probability,
        similar_height_tolerance: cli.tolerance,
        seed: cli.seed,
        columns: cli.columns,
    };

    // Load config file if provided; config file sets layout options en bloc
    let cfg = if let Some(path) = &cli.config {
        let file = fs::read_to_string(path)?;
        let y: YamlConfig = serde_yaml::from_str(&file)?;
        y.into_collage_config(base)
    } else {
        base
    };

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("create out_dir {}", cli.out_dir.display()))?;

    let paths = gather_paths(&cli.input, &cli.include, &cli.exclude)?;
    let mut photos = load_photos_with_progress(&paths, show_progress)?;
    info!(count = photos.len(), "loaded input photos");
    if cli.shuffle {
        let mut rng = StdRng::seed_from_u64(cfg.seed);
        photos.shuffle(&mut rng);
    }

    let sizes: Vec<Size> = photos
        .iter()
        .map(|p| {
            let (width, height) = p.image.dimensions();
            Size::new(width, height)
        })
        .collect();
    let plan = if cli.no_retry {
        plan_layout(&sizes, &cfg)?
    } else {
        plan_layout_adaptive(&sizes, &cfg)?
    };
    let stats = plan.stats();
    info!(
        columns = stats.columns,
        spans = stats.num_spans,
        coverage = format!("{:.2}%", stats.coverage * 100.0),
        cropped_rows = stats.cropped_rows,
        "layout planned"
    );

    if layout_only {
        if !cli.dry_run {
            let json_path = cli.out_dir.join(format!("{}.json", cli.name));
            let json = serde_json::to_string_pretty(&to_json(&plan))?;
            fs::write(&json_path, json)
                .with_context(|| format!("write {}", json_path.display()))?;
            info!(?json_path, items = plan.items.len(), "plan written");
        }
        write_stats(cli, &stats)?;
        return Ok(());
    }

    let rgba = render_plan(&photos, &plan)?;
    if !cli.dry_run {
        let image_path = cli
            .out_dir
            .join(format!("{}.{}", cli.name, image_extension(&cli.format)));
        save_image(&rgba, &image_path, &cli.format, cli.jpeg_quality)?;
        info!(?image_path, "collage written");

        if cli.export_plan {
            let json_path = cli.out_dir.join(format!("{}.json", cli.name));
            let json = serde_json::to_string_pretty(&to_json(&plan))?;
            fs::write(&json_path, json)
                .with_context(|| format!("write {}", json_path.display()))?;
            info!(?json_path, "plan written");
        }
    }
    write_stats(cli, &stats)?;
    Ok(())
}

fn write_stats(cli: &CreateArgs, stats: &collage_core::LayoutStats) -> anyhow::Result<()> {
    if let Some(stats_path) = &cli.export_stats {
        if cli.dry_run {
            println!("{}", stats.summary());
        } else {
            fs::write(stats_path, serde_json::to_string_pretty(stats)?)
                .with_context(|| format!("write {}", stats_path.display()))?;
            info!(?stats_path, "stats exported");
        }
    }
    Ok(())
}

fn image_extension(format: &str) -> &'static str {
    match format {
        "jpeg" => "jpg",
        "tiff" => "tif",
        _ => "png",
    }
}

fn save_image(
    rgba: &image::RgbaImage,
    path: &Path,
    format: &str,
    jpeg_quality: u8,
) -> anyhow::Result<()> {
    match format {
        "jpeg" => {
            // JPEG carries no alpha channel
            let rgb = DynamicImage::ImageRgba8(rgba.clone()).to_rgb8();
            let file = fs::File::create(path)
                .with_context(|| format!("create {}", path.display()))?;
            let mut writer = std::io::BufWriter::new(file);
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                &mut writer,
                jpeg_quality.clamp(1, 100),
            );
            rgb.write_with_encoder(encoder)
                .with_context(|| format!("encode {}", path.display()))?;
        }
        "tiff" => {
            rgba.save_with_format(path, image::ImageFormat::Tiff)
                .with_context(|| format!("write {}", path.display()))?;
        }
        _ => {
            rgba.save(path)
                .with_context(|| format!("write {}", path.display()))?;
        }
    }
    Ok(())
}

fn run_bench(b: &BenchArgs) -> anyhow::Result<()> {
    use std::time::Instant;
    // Minimal bench: load the photos, plan once, print time + stats
    let paths = gather_paths(&b.input, &[], &[])?;
    let photos = load_photos_with_progress(&paths, false)?;
    let sizes: Vec<Size> = photos
        .iter()
        .map(|p| {
            let (width, height) = p.image.dimensions();
            Size::new(width, height)
        })
        .collect();
    let cfg = CollageConfig {
        canvas_width: b.width,
        canvas_height: b.height,
        seed: b.seed,
        ..Default::default()
    };
    let start = Instant::now();
    let plan = plan_layout_adaptive(&sizes, &cfg)?;
    let dur = start.elapsed();
    let stats = plan.stats();
    println!(
        "photos={} columns={} coverage={:.2}% time={}",
        stats.num_photos,
        stats.columns,
        stats.coverage * 100.0,
        bench_fmt_dur(dur)
    );
    Ok(())
}

fn bench_fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{}us", d.as_micros())
    }
}

fn gather_paths(
    path: &Path,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    // Build glob matchers
    let mut inc_set = None;
    if !include.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in include {
            b.add(Glob::new(pat)?);
        }
        inc_set = Some(b.build()?);
    }
    let mut exc_set = None;
    if !exclude.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in exclude {
            b.add(Glob::new(pat)?);
        }
        exc_set = Some(b.build()?);
    }
    let mut list: Vec<PathBuf> = Vec::new();
    if path.is_file() {
        if !should_skip(path, inc_set.as_ref(), exc_set.as_ref()) && is_photo(path) {
            list.push(path.to_path_buf());
        }
    } else {
        for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && !should_skip(p, inc_set.as_ref(), exc_set.as_ref()) && is_photo(p) {
                list.push(p.to_path_buf());
            }
        }
    }
    // Deterministic arrival order regardless of filesystem enumeration
    list.sort();
    Ok(list)
}

fn should_skip(
    p: &Path,
    include: Option<&globset::GlobSet>,
    exclude: Option<&globset::GlobSet>,
) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn is_photo(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "bmp" | "tif" | "tiff")
    )
}

fn load_photos_with_progress(paths: &[PathBuf], progress: bool) -> anyhow::Result<Vec<InputPhoto>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} loading {pos}/{len} [{elapsed_precise}] {wide_msg}",
            )
            .unwrap(),
        );
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        match load_photo(p) {
            Ok(img) => {
                let key = p.to_string_lossy().replace('\\', "/");
                list.push(InputPhoto { key, image: img });
            }
            Err(e) => {
                error!(?p, error = %e, "skip photo");
            }
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

fn load_photo(p: &Path) -> anyhow::Result<DynamicImage> {
    let img = ImageReader::open(p)?.with_guessed_format()?.decode()?;
    Ok(img)
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    canvas_width: Option<u32>,
    canvas_height: Option<u32>,
    span_probability: Option<f64>,
    similar_height_tolerance: Option<u32>,
    seed: Option<u64>,
    columns: Option<usize>,
}

impl YamlConfig {
    fn into_collage_config(self, mut cfg: CollageConfig) -> CollageConfig {
        if let Some(v) = self.canvas_width {
            cfg.canvas_width = v;
        }
        if let Some(v) = self.canvas_height {
            cfg.canvas_height = v;
        }
        if let Some(v) = self.span_probability {
            cfg.span_probability = v;
        }
        if let Some(v) = self.similar_height_tolerance {
            cfg.similar_height_tolerance = v;
        }
        if let Some(v) = self.seed {
            cfg.seed = v;
        }
        if let Some(v) = self.columns {
            cfg.columns = Some(v);
        }
        cfg
    }
}

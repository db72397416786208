use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use ht_compare::{
    Annotation, AnnotationEvent, Comparator, CompareConfig, ComparisonOutcome, RecordingRenderer,
    Side,
};
use ht_core::{Image, PolylineSet, Rgba8};
use ht_morph::{BinaryMask, InkThreshold, preprocess_with, thin_zhang_suen};
use ht_raster::{RasterSource, ReferenceGlyph, SvgDrawing, decode_reference};
use ht_skeleton::{NodeKind, SkeletonConfig, trace_skeleton};
use image::{GrayImage, Rgb, RgbImage};
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "ht_gallery")]
#[command(about = "Run the tracing pipeline stages on glyph fixtures")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(name = "preprocess")]
    Preprocess(PreprocessArgs),
    #[command(name = "skeleton")]
    Skeleton(SkeletonArgs),
    #[command(name = "compare")]
    Compare(CompareArgs),
}

#[derive(Args, Debug, Clone)]
struct InputArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    /// Stretch the input onto a square canvas of this side before processing.
    #[arg(long)]
    size: Option<usize>,
    #[arg(long, default_value_t = 10)]
    ink_max_channel: u8,
    #[arg(long, default_value = "docs/fig/raw")]
    out: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct PreprocessArgs {
    #[command(flatten)]
    common: InputArgs,
}

#[derive(Args, Debug, Clone)]
struct SkeletonArgs {
    #[command(flatten)]
    common: InputArgs,
    #[arg(long, default_value_t = 1)]
    min_component_size: usize,
}

#[derive(Args, Debug, Clone)]
struct CompareArgs {
    /// Reference glyph image (GIF, JPEG or PNG).
    #[arg(long, required = true)]
    reference: PathBuf,
    /// User drawing as SVG markup.
    #[arg(long, required = true)]
    drawing: PathBuf,
    #[arg(long)]
    size: Option<usize>,
    #[arg(long)]
    threshold: Option<f32>,
    /// JSON file with comparison settings; missing fields keep defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Keep running until every marker has been removed, so the event log
    /// in result.json covers the full annotation timeline.
    #[arg(long, default_value_t = false)]
    wait_markers: bool,
    #[arg(long, default_value = "docs/fig/raw")]
    out: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
struct MetaPreprocess {
    width: usize,
    height: usize,
    ink_rule: String,
    foreground: usize,
}

#[derive(Debug, Clone, Serialize)]
struct GraphNodeDto {
    id: usize,
    kind: &'static str,
    x: f32,
    y: f32,
    degree: usize,
}

#[derive(Debug, Clone, Serialize)]
struct BranchDto {
    from: usize,
    to: usize,
    length: f32,
    closed: bool,
}

#[derive(Debug, Clone, Serialize)]
struct PolylinesDto {
    width: usize,
    height: usize,
    nodes: Vec<GraphNodeDto>,
    branches: Vec<BranchDto>,
    polylines: Vec<Vec<[f32; 2]>>,
}

#[derive(Debug, Clone, Serialize)]
struct MetaSkeleton {
    adjacency: &'static str,
    min_component_size: usize,
    polyline_count: usize,
    point_count: usize,
    junctions: usize,
    ends: usize,
}

#[derive(Debug, Clone, Serialize)]
struct UnmatchedDto {
    side: &'static str,
    x: f32,
    y: f32,
    distance: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
struct EventDto {
    event: &'static str,
    id: u64,
    at_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    marker: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    at: Option<[f32; 2]>,
}

#[derive(Debug, Clone, Serialize)]
struct CompareResultDto {
    verdict: bool,
    threshold: f32,
    canvas_size: usize,
    reference_points: usize,
    user_points: usize,
    unmatched: Vec<UnmatchedDto>,
    events: Vec<EventDto>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.cmd {
        Command::Preprocess(args) => run_preprocess(args),
        Command::Skeleton(args) => run_skeleton(args),
        Command::Compare(args) => run_compare(args),
    }
}

fn run_preprocess(args: PreprocessArgs) -> Result<()> {
    let case_dir = prepare_case(&args.common.out, "preprocess")?;
    let rgba = load_input_rgba(&args.common.input, args.common.size)?;
    let ink = InkThreshold {
        max_channel: args.common.ink_max_channel,
    };

    let mask = preprocess_with(rgba, ink);
    save_mask(case_dir.join("mask.png"), &mask)?;

    write_json(
        case_dir.join("meta.json"),
        &MetaPreprocess {
            width: mask.width(),
            height: mask.height(),
            ink_rule: format!("alpha > 0 and max(r, g, b) <= {}", ink.max_channel),
            foreground: mask.count_foreground(),
        },
    )?;

    Ok(())
}

fn run_skeleton(args: SkeletonArgs) -> Result<()> {
    let case_dir = prepare_case(&args.common.out, "skeleton")?;
    let rgba = load_input_rgba(&args.common.input, args.common.size)?;
    let ink = InkThreshold {
        max_channel: args.common.ink_max_channel,
    };
    let cfg = SkeletonConfig {
        min_component_size: args.min_component_size,
        ..SkeletonConfig::default()
    };

    let mask = preprocess_with(rgba, ink);
    let thinned = thin_zhang_suen(&mask, &cfg.thin);
    let graph = trace_skeleton(&thinned, &cfg);
    let set = graph.to_polyline_set();

    let mut skeleton = BinaryMask::new_empty(mask.width(), mask.height());
    for p in set.iter_points() {
        skeleton.set(p.x as usize, p.y as usize, true);
    }
    save_mask(case_dir.join("skeleton.png"), &skeleton)?;

    let nodes = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(id, n)| {
            let p = n.point();
            GraphNodeDto {
                id,
                kind: node_kind_name(n.kind),
                x: p.x,
                y: p.y,
                degree: n.degree,
            }
        })
        .collect::<Vec<_>>();
    let branches = graph
        .branches
        .iter()
        .map(|b| BranchDto {
            from: b.from,
            to: b.to,
            length: b.polyline.arc_length(),
            closed: b.is_closed(),
        })
        .collect::<Vec<_>>();

    write_json(
        case_dir.join("polylines.json"),
        &PolylinesDto {
            width: graph.width,
            height: graph.height,
            nodes,
            branches,
            polylines: polylines_dto(&set),
        },
    )?;

    write_json(
        case_dir.join("meta.json"),
        &MetaSkeleton {
            adjacency: "8-neighbour, covered diagonals dropped",
            min_component_size: cfg.min_component_size,
            polyline_count: set.num_polylines(),
            point_count: set.num_points(),
            junctions: graph.num_junctions(),
            ends: graph.num_ends(),
        },
    )?;

    Ok(())
}

fn run_compare(args: CompareArgs) -> Result<()> {
    ensure_file_exists(&args.reference, "reference")?;
    ensure_file_exists(&args.drawing, "drawing")?;

    let mut cfg = match &args.config {
        Some(path) => read_json::<CompareConfig>(path)
            .with_context(|| format!("reading comparison config {}", path.display()))?,
        None => CompareConfig::default(),
    };
    if let Some(size) = args.size {
        cfg.canvas_size = size;
    }
    if let Some(threshold) = args.threshold {
        cfg.threshold = threshold;
    }
    if cfg.canvas_size == 0 {
        bail!("canvas size must be positive.");
    }

    let case_dir = prepare_case(&args.out, "compare")?;
    let bytes = fs::read(&args.reference)
        .with_context(|| format!("reading reference {}", args.reference.display()))?;
    let glyph = ReferenceGlyph::new(args.reference.display().to_string(), bytes);
    let markup = fs::read_to_string(&args.drawing)
        .with_context(|| format!("reading drawing {}", args.drawing.display()))?;
    let drawing = SvgDrawing::new(markup);

    let background = glyph
        .render(cfg.canvas_size)
        .context("rendering reference for overlay")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;

    let renderer = Arc::new(RecordingRenderer::new());
    let linger = Duration::from_millis(cfg.mismatch_marker_ms.max(cfg.success_marker_ms));
    let outcome = runtime.block_on(async {
        let comparator = Comparator::with_tokio(cfg.clone(), renderer.clone());
        let outcome = comparator
            .compare(Arc::new(glyph), Some(Arc::new(drawing)))
            .await?;
        if args.wait_markers {
            tokio::time::sleep(linger).await;
        }
        anyhow::Ok(outcome)
    })?;
    info!(
        "verdict {} with {} unmatched points",
        outcome.verdict,
        outcome.comparison.num_unmatched()
    );

    write_json(
        case_dir.join("result.json"),
        &CompareResultDto {
            verdict: outcome.verdict,
            threshold: cfg.threshold,
            canvas_size: cfg.canvas_size,
            reference_points: outcome.reference_polylines.num_points(),
            user_points: outcome.user_polylines.num_points(),
            unmatched: unmatched_dto(&outcome),
            events: renderer.events().iter().map(event_dto).collect(),
        },
    )?;

    let overlay = render_compare_overlay(&background, &outcome)?;
    overlay
        .save(case_dir.join("overlay.png"))
        .with_context(|| format!("saving overlay in {}", case_dir.display()))?;

    Ok(())
}

fn prepare_case(out: &Path, case_name: &str) -> Result<PathBuf> {
    let case_dir = out.join(case_name);
    fs::create_dir_all(&case_dir)
        .with_context(|| format!("creating output directory {}", case_dir.display()))?;
    Ok(case_dir)
}

fn load_input_rgba(path: &Path, size: Option<usize>) -> Result<Image<Rgba8>> {
    ensure_file_exists(path, "input")?;

    if let Some(size) = size {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        return decode_reference(&bytes, size)
            .with_context(|| format!("decoding input image {}", path.display()));
    }

    let rgba = image::open(path)
        .with_context(|| format!("opening input image {}", path.display()))?
        .to_rgba8();
    let (w, h) = rgba.dimensions();
    Image::from_rgba_bytes(w as usize, h as usize, rgba.as_raw())
        .with_context(|| format!("constructing ht-core image from {}", path.display()))
}

fn save_mask(path: PathBuf, mask: &BinaryMask) -> Result<()> {
    let img = mask.image();
    let gray = GrayImage::from_raw(img.width() as u32, img.height() as u32, img.data().to_vec())
        .context("constructing GrayImage from mask bytes")?;
    gray.save(&path)
        .with_context(|| format!("saving image {}", path.display()))
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing json {}", path.display()))
}

fn polylines_dto(set: &PolylineSet) -> Vec<Vec<[f32; 2]>> {
    set.polylines
        .iter()
        .map(|pl| pl.points.iter().map(|p| [p.x, p.y]).collect())
        .collect()
}

fn unmatched_dto(outcome: &ComparisonOutcome) -> Vec<UnmatchedDto> {
    let sides = [
        ("user", &outcome.comparison.user),
        ("reference", &outcome.comparison.reference),
    ];
    sides
        .into_iter()
        .flat_map(|(side, report)| {
            report.unmatched.iter().map(move |m| UnmatchedDto {
                side,
                x: m.query.x,
                y: m.query.y,
                distance: m.distance.is_finite().then_some(m.distance),
            })
        })
        .collect()
}

fn event_dto(event: &AnnotationEvent) -> EventDto {
    match event {
        AnnotationEvent::Added {
            id, annotation, at, ..
        } => {
            let (marker, point) = match annotation {
                Annotation::Mismatch { at, side } => (side_name(*side), Some([at.x, at.y])),
                Annotation::Success => ("success", None),
            };
            EventDto {
                event: "added",
                id: id.0,
                at_ms: at.as_millis(),
                marker: Some(marker),
                at: point,
            }
        }
        AnnotationEvent::Removed { id, at } => EventDto {
            event: "removed",
            id: id.0,
            at_ms: at.as_millis(),
            marker: None,
            at: None,
        },
    }
}

fn side_name(side: Side) -> &'static str {
    match side {
        Side::Reference => "mismatch_reference",
        Side::User => "mismatch_user",
    }
}

/// Reference glyph faded over white, reference skeleton in blue, user
/// skeleton in green, unmatched points as red dots.
fn render_compare_overlay(
    background: &Image<Rgba8>,
    outcome: &ComparisonOutcome,
) -> Result<RgbImage> {
    let (w, h) = (background.width() as u32, background.height() as u32);
    let faded = background
        .data()
        .iter()
        .flat_map(|px| {
            let a = u16::from(px.a);
            let blend = |c: u8| (255 - ((255 - u16::from(c)) * a / 255) / 3) as u8;
            [blend(px.r), blend(px.g), blend(px.b)]
        })
        .collect::<Vec<u8>>();
    let mut rgb = RgbImage::from_raw(w, h, faded).context("constructing overlay image")?;

    for (set, color) in [
        (&outcome.reference_polylines, Rgb([64, 96, 255])),
        (&outcome.user_polylines, Rgb([32, 176, 64])),
    ] {
        for p in set.iter_points() {
            let (x, y) = (p.x as u32, p.y as u32);
            if x < w && y < h {
                rgb.put_pixel(x, y, color);
            }
        }
    }

    let unmatched = outcome
        .comparison
        .user
        .unmatched
        .iter()
        .chain(&outcome.comparison.reference.unmatched);
    for m in unmatched {
        draw_dot(&mut rgb, m.query.x, m.query.y, Rgb([255, 64, 64]));
    }

    Ok(rgb)
}

fn draw_dot(img: &mut RgbImage, x: f32, y: f32, color: Rgb<u8>) {
    let xi = x.round() as i32;
    let yi = y.round() as i32;

    for dy in -1..=1 {
        for dx in -1..=1 {
            let nx = xi + dx;
            let ny = yi + dy;
            if nx < 0 || ny < 0 {
                continue;
            }
            let (ux, uy) = (nx as u32, ny as u32);
            if ux >= img.width() || uy >= img.height() {
                continue;
            }
            img.put_pixel(ux, uy, color);
        }
    }
}

fn node_kind_name(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::End => "End",
        NodeKind::Junction => "Junction",
        NodeKind::Isolated => "Isolated",
        NodeKind::LoopAnchor => "LoopAnchor",
    }
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}

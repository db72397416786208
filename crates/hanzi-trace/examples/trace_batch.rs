//! Example: score a folder of traced drawings against one glyph.
//!
//! Every `*.svg` in `--drawings` is compared against the `--glyph` image in
//! file-name order. Feedback timers are disabled so each comparison returns
//! as soon as matching finishes; per-drawing verdicts and timings are printed
//! and written to a JSON file.
//!
//! Run from the workspace root:
//!   cargo run -p hanzi-trace --example trace_batch -- --help
//!   cargo run -p hanzi-trace --example trace_batch -- --glyph data/yong.png --drawings data/yong

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use hanzi_trace::{
    Comparator, CompareConfig, CompareError, PracticeSession, RecordingRenderer, ReferenceGlyph,
    SvgDrawing,
};
use serde::Serialize;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Compare a folder of SVG tracings against a reference glyph")]
struct Args {
    /// Reference glyph image (GIF, JPEG or PNG)
    #[arg(long)]
    glyph: PathBuf,

    /// Directory holding the user drawings as .svg files
    #[arg(long)]
    drawings: PathBuf,

    /// Side of the square comparison canvas
    #[arg(long, default_value_t = 256)]
    size: usize,

    /// Distance at which a skeleton point counts as unmatched
    #[arg(long, default_value_t = 20.0)]
    threshold: f32,

    /// Output JSON path (default: <drawings>/results.json)
    #[arg(long)]
    out: Option<PathBuf>,
}

// ── JSON DTOs ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct DrawingResult {
    drawing: String,
    verdict: Option<bool>,
    unmatched: usize,
    user_points: usize,
    reference_points: usize,
    elapsed_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

// ── Main ──────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if !args.drawings.is_dir() {
        bail!("{} is not a directory", args.drawings.display());
    }
    let out_path = args
        .out
        .clone()
        .unwrap_or_else(|| args.drawings.join("results.json"));

    let bytes =
        fs::read(&args.glyph).with_context(|| format!("reading {}", args.glyph.display()))?;
    let mut session = PracticeSession::new();
    session.load_reference(ReferenceGlyph::new(args.glyph.display().to_string(), bytes));

    let cfg = CompareConfig {
        canvas_size: args.size,
        threshold: args.threshold,
        verdict_delay_ms: 0,
        mismatch_marker_ms: 0,
        success_marker_ms: 0,
        ..CompareConfig::default()
    };
    let comparator = Comparator::with_tokio(cfg, Arc::new(RecordingRenderer::new()));

    let mut paths = fs::read_dir(&args.drawings)
        .with_context(|| format!("listing {}", args.drawings.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "svg"))
        .collect::<Vec<_>>();
    paths.sort();

    println!(
        "comparing {} drawings against {} at {}x{}, threshold {:.1}",
        paths.len(),
        args.glyph.display(),
        args.size,
        args.size,
        args.threshold
    );

    let mut results = Vec::with_capacity(paths.len());
    let mut passed = 0usize;
    let total_start = Instant::now();

    for path in &paths {
        let markup =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned();

        let t0 = Instant::now();
        let res = session
            .compare_drawing(&comparator, Some(SvgDrawing::new(markup)))
            .await;
        let elapsed_ms = t0.elapsed().as_secs_f64() * 1e3;

        let result = match res {
            Ok(outcome) => {
                let unmatched = outcome.comparison.num_unmatched();
                println!(
                    "  {name}: {}  ({unmatched} unmatched, {elapsed_ms:.2} ms)",
                    if outcome.verdict { "pass" } else { "fail" }
                );
                passed += usize::from(outcome.verdict);
                DrawingResult {
                    drawing: name,
                    verdict: Some(outcome.verdict),
                    unmatched,
                    user_points: outcome.user_polylines.num_points(),
                    reference_points: outcome.reference_polylines.num_points(),
                    elapsed_ms,
                    error: None,
                }
            }
            Err(err @ CompareError::Render { .. }) => {
                println!("  {name}: skipped ({err})");
                DrawingResult {
                    drawing: name,
                    verdict: None,
                    unmatched: 0,
                    user_points: 0,
                    reference_points: 0,
                    elapsed_ms,
                    error: Some(err.to_string()),
                }
            }
            Err(err) => return Err(err).context("comparison aborted"),
        };
        results.push(result);
    }

    let total_ms = total_start.elapsed().as_secs_f64() * 1e3;
    println!("{passed}/{} passed in {total_ms:.2} ms", results.len());

    let json = serde_json::to_vec_pretty(&results).context("serializing results")?;
    fs::write(&out_path, json).with_context(|| format!("writing {}", out_path.display()))?;
    println!("results written to {}", out_path.display());

    Ok(())
}

//! CLI binary for edgequake-svg2path.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ImportConfig` and prints the imported document as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_svg2path::{
    write_json_atomic, ColorResolution, ImportConfig, ImportError, ImportEvent, ImportedDocument,
    Importer,
};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── Stage spinner ────────────────────────────────────────────────────────────

fn stage_spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICKS);
    bar.set_style(style);
    bar.set_prefix("Importing");
    bar.set_message("reading…");
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

fn describe(event: &ImportEvent) -> String {
    match event {
        ImportEvent::Sanitize => "sanitized".to_string(),
        ImportEvent::Parse {
            total_bytes: Some(total),
            ..
        } => format!("parsed {total} bytes"),
        ImportEvent::Parse { .. } => "parsed".to_string(),
        ImportEvent::Extract { elements_seen } => format!("extracted {elements_seen} elements"),
        ImportEvent::Flatten { resolved_uses } => {
            format!("flattened ({resolved_uses} <use> resolved)")
        }
        ImportEvent::Validate { paths } => format!("validated {paths} path(s)"),
        ImportEvent::Normalize { paths } => format!("normalized {paths} path(s)"),
        ImportEvent::Done => "done".to_string(),
        ImportEvent::Error { message } => format!("failed: {message}"),
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Import to stdout as pretty JSON
  svg2path drawing.svg

  # Write to a file
  svg2path drawing.svg -o drawing.json

  # Scale every resolved length by 2
  svg2path --unit-px 2 plan.svg

  # Tighter limits for a constrained renderer
  svg2path --max-elements 5000 --max-commands-per-path 2000 icon.svg

  # Load limits from a JSON config, override one from the command line
  svg2path --config limits.json --basic-colors logo.svg

CONFIG FILE (camelCase keys, all optional):
  {
    "flattenTransforms": true,
    "unitPx": 1.0,
    "maxElements": 100000,
    "maxCommandsPerPath": 100000,
    "skipTinySegmentsPx": 0.25,
    "colorResolution": "full"
  }

ENVIRONMENT VARIABLES:
  SVG2PATH_OUTPUT        Default output path
  SVG2PATH_CONFIG        Default JSON config file
  SVG2PATH_UNIT_PX       Scale applied to every resolved length
  SVG2PATH_MAX_ELEMENTS  Element ceiling
  RUST_LOG               Overrides the log filter (e.g. edgequake_svg2path=debug)

EXIT STATUS:
  0    success (warnings are printed to stderr)
  1    the document was rejected or could not be read/written
  130  interrupted with Ctrl-C
"#;

/// Import untrusted SVG files as sanitised, absolute path lists.
#[derive(Parser, Debug)]
#[command(
    name = "svg2path",
    version,
    about = "Import untrusted SVG files as sanitised, absolute path lists",
    long_about = "Strip scripts and external references from an SVG document, bake every \
transform and <use> reference into absolute coordinates, convert primitive shapes and arcs to \
cubic Béziers, and emit the bounded result as JSON.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// SVG file to import.
    input: PathBuf,

    /// Write JSON to this file instead of stdout.
    #[arg(short, long, env = "SVG2PATH_OUTPUT")]
    output: Option<PathBuf>,

    /// JSON file with an `ImportConfig`; flags below override its values.
    #[arg(long, env = "SVG2PATH_CONFIG")]
    config: Option<PathBuf>,

    /// Scale applied to every resolved length.
    #[arg(long, env = "SVG2PATH_UNIT_PX")]
    unit_px: Option<f64>,

    /// Reject documents with more elements than this.
    #[arg(long, env = "SVG2PATH_MAX_ELEMENTS")]
    max_elements: Option<usize>,

    /// Drop paths with more drawing commands than this.
    #[arg(long, env = "SVG2PATH_MAX_COMMANDS_PER_PATH")]
    max_commands_per_path: Option<usize>,

    /// Suppress segments shorter than this many pixels.
    #[arg(long, env = "SVG2PATH_SKIP_TINY_SEGMENTS_PX")]
    skip_tiny_segments_px: Option<f64>,

    /// Keep the flatten stage from baking deferred transforms.
    #[arg(long)]
    no_flatten_transforms: bool,

    /// Resolve only black/white/red/green/blue; other colours pass through.
    #[arg(long, env = "SVG2PATH_BASIC_COLORS")]
    basic_colors: bool,

    /// Print compact JSON instead of pretty-printed.
    #[arg(long)]
    compact: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "SVG2PATH_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SVG2PATH_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "SVG2PATH_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // INFO logs would fight with the spinner for the terminal.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config and read input ──────────────────────────────────────
    let config = build_config(&cli).await?;
    let text = tokio::fs::read_to_string(&cli.input)
        .await
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;

    // ── Run import ───────────────────────────────────────────────────────
    let started = Instant::now();
    let importer = Importer::new();
    let mut handle = importer.start(text, config);

    let canceller = handle.canceller();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            canceller.cancel();
        }
    });

    let spinner = show_progress.then(stage_spinner);
    let progress = handle.events().map(|mut events| {
        let bar = spinner.clone();
        tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Some(bar) = &bar {
                    bar.set_message(describe(&event));
                }
            }
        })
    });

    let result = handle.finish().await;
    interrupt.abort();
    if let Some(task) = progress {
        let _ = task.await;
    }
    if let Some(bar) = &spinner {
        bar.finish_and_clear();
    }

    let doc = match result {
        Ok(doc) => doc,
        Err(ImportError::Cancelled) => {
            if !cli.quiet {
                eprintln!("{} {}", yellow("⚠"), bold("Import cancelled"));
            }
            std::process::exit(130);
        }
        Err(e) => {
            if !cli.quiet {
                eprintln!("{} {}", red("✘"), bold("Import failed"));
            }
            return Err(e.into());
        }
    };

    if !cli.quiet {
        for warning in &doc.warnings {
            eprintln!("  {} {}", yellow("⚠"), warning);
        }
    }

    // ── Write output ─────────────────────────────────────────────────────
    let json = if cli.compact {
        serde_json::to_string(&doc)
    } else {
        serde_json::to_string_pretty(&doc)
    }
    .context("Failed to serialise output")?;

    if let Some(ref output_path) = cli.output {
        write_json_atomic(output_path, json.as_bytes())
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
    } else {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        out.write_all(json.as_bytes())
            .context("Failed to write to stdout")?;
        out.write_all(b"\n").ok();
    }

    if !cli.quiet {
        print_summary(&doc, cli.output.as_deref(), started.elapsed());
    }

    Ok(())
}

/// Map CLI args to `ImportConfig`.
async fn build_config(cli: &Cli) -> Result<ImportConfig> {
    let base = if let Some(ref path) = cli.config {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        ImportConfig::from_json(&json).context("Invalid config file")?
    } else {
        ImportConfig::default()
    };

    let mut builder = base.into_builder();
    if let Some(px) = cli.unit_px {
        builder = builder.unit_px(px);
    }
    if let Some(n) = cli.max_elements {
        builder = builder.max_elements(n);
    }
    if let Some(n) = cli.max_commands_per_path {
        builder = builder.max_commands_per_path(n);
    }
    if let Some(px) = cli.skip_tiny_segments_px {
        builder = builder.skip_tiny_segments_px(px);
    }
    if cli.no_flatten_transforms {
        builder = builder.flatten_transforms(false);
    }
    if cli.basic_colors {
        builder = builder.color_resolution(ColorResolution::Basic);
    }

    builder.build().context("Invalid configuration")
}

fn print_summary(doc: &ImportedDocument, output: Option<&Path>, elapsed: Duration) {
    let warnings = if doc.warnings.is_empty() {
        String::new()
    } else {
        format!("  ({} warning(s))", doc.warnings.len())
    };
    let target = output
        .map(|p| format!("  →  {}", bold(&p.display().to_string())))
        .unwrap_or_default();
    eprintln!(
        "{} {} path(s)  {}{}{}",
        green("✔"),
        bold(&doc.paths.len().to_string()),
        dim(&format!(
            "{}×{}  {}ms",
            doc.width,
            doc.height,
            elapsed.as_millis()
        )),
        warnings,
        target,
    );
}

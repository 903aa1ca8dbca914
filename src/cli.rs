use crate::{
    config::{Config, PdfEngine},
    convert::{ConversionOutcome, ConversionRequest, Converter, FailureReason},
    demo,
    engine::{Runner, SystemRunner, process::interrupt},
    fonts::select_font_config,
    hints,
    probe::{self, FontCategory},
    report::{CheckReport, ConversionSummary},
    util::{ensure_dir, file_size, now_rfc3339},
};
use anyhow::{Context, Result, anyhow, bail};
use clap::{CommandFactory, Parser};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "mdpdf-ja", version)]
#[command(about = "Convert Markdown to PDF with Japanese (CJK) font support via pandoc")]
#[command(after_help = "Examples:
  mdpdf-ja sample.md sample.pdf
  mdpdf-ja input.md output.pdf --engine lualatex
  mdpdf-ja input.md output.pdf --options --toc
  mdpdf-ja --demo
  mdpdf-ja --check

Japanese fonts:
  Noto CJK (recommended): sudo apt install fonts-noto-cjk
  IPA:                    sudo apt install fonts-ipafont")]
pub struct Args {
    /// Input Markdown file.
    pub input_file: Option<PathBuf>,

    /// Output PDF file.
    pub output_file: Option<PathBuf>,

    /// Typesetting engine (default: [convert].engine, xelatex).
    #[arg(long, value_enum)]
    pub engine: Option<PdfEngine>,

    /// Write a Japanese sample document and convert it.
    #[arg(long)]
    pub demo: bool,

    /// Check pandoc, the typesetting engine and Japanese fonts.
    #[arg(long)]
    pub check: bool,

    /// Extra flags passed verbatim to pandoc. Must come last.
    #[arg(long, num_args = 0.., allow_hyphen_values = true, value_name = "FLAG")]
    pub options: Vec<String>,

    /// Debug-level logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config TOML. If omitted, uses ./mdpdf-ja.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg = Config::resolve(args.config.as_deref())?;
    let _guard = init_logging(&args, &cfg)?;
    interrupt::install();

    run(&args, &cfg, &SystemRunner::new())
}

/// Check, demo or convert, with every external process going through `runner`.
pub fn run(args: &Args, cfg: &Config, runner: &dyn Runner) -> Result<()> {
    let engine = args.engine.unwrap_or(cfg.convert.engine);

    if args.verbose || args.demo || args.check {
        info!("mdpdf-ja {} (engine={engine})", env!("CARGO_PKG_VERSION"));
    }

    if args.check {
        return check(cfg, runner, engine);
    }
    if args.demo {
        return run_demo(args, cfg, runner, engine);
    }
    run_convert(args, cfg, runner, engine)
}

fn log_level<'a>(args: &'a Args, cfg: &'a Config) -> &'a str {
    if let Some(level) = args.log_level.as_deref() {
        level
    } else if args.verbose {
        "debug"
    } else {
        cfg.logging.level.as_str()
    }
}

fn init_logging(args: &Args, cfg: &Config) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level(args, cfg)));

    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed()
    };

    let (file_layer, guard) = if let Some(path) = resolve_log_path(cfg) {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
        let file = std::fs::File::create(&path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn resolve_log_path(cfg: &Config) -> Option<PathBuf> {
    if !cfg.logging.write_to_file || cfg.logging.file_path.is_empty() {
        return None;
    }
    Some(PathBuf::from(&cfg.logging.file_path))
}

fn check(cfg: &Config, runner: &dyn Runner, engine: PdfEngine) -> Result<()> {
    let env = probe::probe_environment(runner, cfg, engine);

    for tool in [&env.conversion, &env.typesetting] {
        if tool.present {
            info!(
                "ok: {} {}",
                tool.name,
                tool.version_line.as_deref().unwrap_or("")
            );
        } else {
            warn!("missing: {} ({})", tool.name, hints::install_hint(&tool.name));
        }
    }
    if env.fonts.is_cjk_family() {
        info!("{}", hints::font_quality(env.fonts));
    } else {
        warn!("{}", hints::font_quality(env.fonts));
    }

    let report = CheckReport {
        selected_fonts: select_font_config(env.fonts),
        ok: env.all_ok(),
        environment: env,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.ok {
        bail!("dependencies are missing");
    }
    info!("all dependencies are satisfied");
    Ok(())
}

fn run_demo(args: &Args, cfg: &Config, runner: &dyn Runner, engine: PdfEngine) -> Result<()> {
    require_pandoc(cfg, runner)?;

    let out_dir = PathBuf::from(&cfg.demo.out_dir);
    let sample_md = out_dir.join(&cfg.demo.markdown_filename);
    let sample_pdf = out_dir.join(&cfg.demo.pdf_filename);
    demo::write_sample(&sample_md)?;

    let fonts = detect_fonts(cfg, runner);
    convert_and_report(args, cfg, runner, engine, &sample_md, &sample_pdf, fonts)
        .with_context(|| "demo failed")
}

fn run_convert(args: &Args, cfg: &Config, runner: &dyn Runner, engine: PdfEngine) -> Result<()> {
    let (Some(input), Some(output)) = (args.input_file.as_deref(), args.output_file.as_deref())
    else {
        Args::command().print_help()?;
        eprintln!("\nHint: --demo converts a bundled Japanese sample document.");
        bail!("input_file and output_file are required");
    };

    if !input.is_file() {
        bail!("input file not found: {}", input.display());
    }

    require_pandoc(cfg, runner)?;
    let fonts = detect_fonts(cfg, runner);
    convert_and_report(args, cfg, runner, engine, input, output, fonts)
}

fn require_pandoc(cfg: &Config, runner: &dyn Runner) -> Result<()> {
    let t = &cfg.tools;
    let pandoc = probe::probe_tool(runner, &t.pandoc, &t.version_flag, t.probe_timeout_seconds);
    if !pandoc.present {
        bail!(
            "{} is not available. {}",
            pandoc.name,
            hints::install_hint(&pandoc.name)
        );
    }
    info!("ok: {}", pandoc.version_line.as_deref().unwrap_or(&pandoc.name));
    Ok(())
}

fn detect_fonts(cfg: &Config, runner: &dyn Runner) -> FontCategory {
    let t = &cfg.tools;
    let category = probe::probe_fonts(runner, &t.fc_list, &t.font_lang, t.probe_timeout_seconds);
    if category.is_cjk_family() {
        info!("Japanese fonts: {category}");
    } else {
        warn!(
            "no preferred Japanese font found ({category}); falling back to DejaVu. {}",
            hints::font_quality(category)
        );
    }
    category
}

fn convert_and_report(
    args: &Args,
    cfg: &Config,
    runner: &dyn Runner,
    engine: PdfEngine,
    input: &Path,
    output: &Path,
    category: FontCategory,
) -> Result<()> {
    let req = ConversionRequest {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        engine,
        extra_flags: args.options.clone(),
        fonts: select_font_config(category),
    };

    info!("converting {} -> {}", input.display(), output.display());
    let started = now_rfc3339();
    let outcome = Converter::new(cfg, runner).convert(&req);

    match outcome {
        ConversionOutcome::Success { output } => {
            let output_bytes = file_size(&output);
            info!(
                "done: {} ({} bytes, fonts={category})",
                output.display(),
                output_bytes.unwrap_or(0)
            );
            if cfg.output.print_summary {
                let summary = ConversionSummary {
                    input: req.input,
                    output,
                    engine,
                    font_category: category,
                    output_bytes,
                    started,
                    finished: now_rfc3339(),
                    status: "ok".into(),
                };
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            Ok(())
        }
        ConversionOutcome::Failure { reason, diagnostic } => {
            let headline = match reason {
                FailureReason::InputMissing => "input file not found",
                FailureReason::ToolMissing => "conversion tool not found",
                FailureReason::EngineExitNonzero => "conversion failed",
                FailureReason::Unexpected => "unexpected error",
            };
            error!("{headline}");
            for line in diagnostic.lines() {
                error!("  {line}");
            }
            Err(anyhow!("{headline}: {}", output.display()))
        }
    }
}

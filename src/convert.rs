use crate::{
    config::{Config, PdfEngine},
    engine::{Invocation, RunError, Runner},
    fonts::FontConfiguration,
    hints,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub engine: PdfEngine,
    /// Passed to pandoc verbatim, after every built-in flag.
    pub extra_flags: Vec<String>,
    pub fonts: FontConfiguration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    InputMissing,
    ToolMissing,
    EngineExitNonzero,
    Unexpected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionOutcome {
    Success {
        output: PathBuf,
    },
    Failure {
        reason: FailureReason,
        diagnostic: String,
    },
}

impl ConversionOutcome {
    fn failure(reason: FailureReason, diagnostic: impl Into<String>) -> Self {
        ConversionOutcome::Failure {
            reason,
            diagnostic: diagnostic.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ConversionOutcome::Success { .. })
    }
}

/// Drives one pandoc run per [`convert`](Converter::convert) call. Holds no
/// state between calls.
pub struct Converter<R: Runner> {
    cfg: Config,
    runner: R,
}

impl<R: Runner> Converter<R> {
    pub fn new(cfg: &Config, runner: R) -> Self {
        Self {
            cfg: cfg.clone(),
            runner,
        }
    }

    /// Base flags, layout, fonts, then caller extras. Order is fixed: pandoc
    /// applies repeated `--variable`s in sequence.
    pub fn build_invocation(&self, req: &ConversionRequest) -> Invocation {
        let layout = &self.cfg.layout;
        let conv = &self.cfg.convert;

        Invocation::new(&self.cfg.tools.pandoc)
            .arg(req.input.display().to_string())
            .arg("-o")
            .arg(req.output.display().to_string())
            .arg(format!("--pdf-engine={}", req.engine))
            .arg(format!("--from={}", conv.from))
            .arg(format!("--to={}", conv.to))
            .arg(format!("--variable=geometry:margin={}", layout.margin))
            .arg(format!("--variable=fontsize={}", layout.fontsize))
            .arg(format!("--variable=papersize={}", layout.papersize))
            .arg(format!("--variable=documentclass={}", layout.documentclass))
            .args(req.fonts.to_flags())
            .args(req.extra_flags.iter().cloned())
            .timeout_secs(conv.timeout_seconds)
    }

    pub fn convert(&self, req: &ConversionRequest) -> ConversionOutcome {
        if !req.input.is_file() {
            return ConversionOutcome::failure(
                FailureReason::InputMissing,
                format!("input file not found: {}", req.input.display()),
            );
        }

        if let Err(err) = ensure_parent_dir(&req.output) {
            return ConversionOutcome::failure(FailureReason::Unexpected, err.to_string());
        }

        let inv = self.build_invocation(req);
        info!("running: {}", inv.display_line());

        let out = match self.runner.run(&inv) {
            Ok(out) => out,
            Err(RunError::NotFound { program }) => {
                return ConversionOutcome::failure(
                    FailureReason::ToolMissing,
                    format!("command not found: {program}\n{}", hints::install_hint(&program)),
                );
            }
            // TimedOut and Io both land here; the message tells them apart.
            Err(err) => {
                return ConversionOutcome::failure(FailureReason::Unexpected, err.to_string());
            }
        };

        debug!("{} finished in {:?}", inv.program, out.duration);

        if out.success() {
            return ConversionOutcome::Success {
                output: req.output.clone(),
            };
        }

        warn!("{} exited with {:?}", inv.program, out.code);
        let mut diagnostic = if out.stderr.trim().is_empty() {
            out.stdout
        } else {
            out.stderr
        };
        if hints::mentions_font_problem(&diagnostic) {
            diagnostic.push_str("\n\n");
            diagnostic.push_str(hints::cjk_font_remediation());
        }
        ConversionOutcome::failure(FailureReason::EngineExitNonzero, diagnostic)
    }
}

fn ensure_parent_dir(output: &Path) -> anyhow::Result<()> {
    match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
            crate::util::ensure_dir(dir)?;
            info!("created output directory: {}", dir.display());
            Ok(())
        }
        _ => Ok(()),
    }
}

//! Host capability probes: external tools and installed CJK fonts.
//!
//! Probes never fail. A tool that cannot be started is reported absent and a
//! font listing that cannot be obtained degrades to [`FontCategory::NoneDetected`];
//! callers decide whether either is fatal.

use crate::{
    config::{Config, PdfEngine},
    engine::{Invocation, RunError, Runner},
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)+").expect("valid version regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolAvailability {
    pub name: String,
    pub present: bool,
    /// Dotted version number, when one could be read.
    pub version: Option<String>,
    /// First line of the `--version` output.
    pub version_line: Option<String>,
}

impl ToolAvailability {
    fn absent(name: &str) -> Self {
        Self {
            name: name.to_string(),
            present: false,
            version: None,
            version_line: None,
        }
    }
}

/// Best CJK font family found on the host, worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontCategory {
    NoneDetected,
    Basic,
    Ipa,
    Noto,
}

impl FontCategory {
    pub const ALL: [FontCategory; 4] = [
        FontCategory::NoneDetected,
        FontCategory::Basic,
        FontCategory::Ipa,
        FontCategory::Noto,
    ];

    pub fn is_cjk_family(self) -> bool {
        matches!(self, FontCategory::Ipa | FontCategory::Noto)
    }

    pub fn label(self) -> &'static str {
        match self {
            FontCategory::NoneDetected => "none",
            FontCategory::Basic => "basic",
            FontCategory::Ipa => "IPA",
            FontCategory::Noto => "Noto CJK",
        }
    }
}

impl fmt::Display for FontCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Runs `<name> <version_flag>`; the tool is present iff it starts and exits 0.
pub fn probe_tool(
    runner: &dyn Runner,
    name: &str,
    version_flag: &str,
    timeout_secs: u64,
) -> ToolAvailability {
    let inv = Invocation::new(name)
        .arg(version_flag)
        .timeout_secs(timeout_secs);

    let out = match runner.run(&inv) {
        Ok(out) => out,
        Err(RunError::NotFound { .. }) => {
            debug!("{name} not found");
            return ToolAvailability::absent(name);
        }
        Err(err) => {
            warn!("probing {name} failed: {err}");
            return ToolAvailability::absent(name);
        }
    };

    if !out.success() {
        debug!("{name} {version_flag} exited with {:?}", out.code);
        return ToolAvailability::absent(name);
    }

    let version_line = out
        .stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string);
    let version = version_line
        .as_deref()
        .and_then(|l| VERSION_RE.find(l))
        .map(|m| m.as_str().to_string());

    ToolAvailability {
        name: name.to_string(),
        present: true,
        version,
        version_line,
    }
}

/// Lists fonts for `lang` via fontconfig and classifies the best CJK family.
pub fn probe_fonts(
    runner: &dyn Runner,
    fc_list: &str,
    lang: &str,
    timeout_secs: u64,
) -> FontCategory {
    let inv = Invocation::new(fc_list)
        .arg(format!(":lang={lang}"))
        .timeout_secs(timeout_secs);

    let out = match runner.run(&inv) {
        Ok(out) => out,
        Err(err) => {
            warn!("font listing unavailable: {err}");
            return FontCategory::NoneDetected;
        }
    };

    if !out.success() || out.stdout.trim().is_empty() {
        debug!("{fc_list} returned no fonts for lang={lang}");
        return FontCategory::NoneDetected;
    }

    classify_font_listing(&out.stdout)
}

/// Noto takes precedence over IPA when both are installed.
pub fn classify_font_listing(listing: &str) -> FontCategory {
    if listing.contains("Noto") {
        FontCategory::Noto
    } else if listing.contains("IPA") {
        FontCategory::Ipa
    } else {
        FontCategory::Basic
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentReport {
    pub conversion: ToolAvailability,
    pub typesetting: ToolAvailability,
    pub fonts: FontCategory,
}

impl EnvironmentReport {
    pub fn all_ok(&self) -> bool {
        self.conversion.present && self.typesetting.present && self.fonts != FontCategory::NoneDetected
    }
}

pub fn probe_environment(runner: &dyn Runner, cfg: &Config, engine: PdfEngine) -> EnvironmentReport {
    let t = &cfg.tools;
    let conversion = probe_tool(runner, &t.pandoc, &t.version_flag, t.probe_timeout_seconds);
    let typesetting = probe_tool(
        runner,
        engine.as_str(),
        &t.version_flag,
        t.probe_timeout_seconds,
    );
    let fonts = probe_fonts(runner, &t.fc_list, &t.font_lang, t.probe_timeout_seconds);

    info!(
        "probe {}={} {}={} fonts={}",
        conversion.name, conversion.present, typesetting.name, typesetting.present, fonts
    );

    EnvironmentReport {
        conversion,
        typesetting,
        fonts,
    }
}

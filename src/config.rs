use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "mdpdf-ja.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tools: Tools,
    #[serde(default)]
    pub convert: Convert,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub demo: Demo,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }

    /// `--config` if given, else `./mdpdf-ja.toml` if present, else defaults.
    pub fn resolve(user: Option<&Path>) -> Result<Self> {
        if let Some(p) = user {
            return Self::load(p);
        }
        let default = PathBuf::from(DEFAULT_CONFIG_FILE);
        if default.exists() {
            Self::load(&default)
        } else {
            Ok(Self::default())
        }
    }
}

/// Typesetting engine handed to pandoc via `--pdf-engine`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PdfEngine {
    #[default]
    Xelatex,
    Pdflatex,
    Lualatex,
}

impl PdfEngine {
    pub fn as_str(self) -> &'static str {
        match self {
            PdfEngine::Xelatex => "xelatex",
            PdfEngine::Pdflatex => "pdflatex",
            PdfEngine::Lualatex => "lualatex",
        }
    }
}

impl fmt::Display for PdfEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tools {
    pub pandoc: String,
    pub fc_list: String,
    pub font_lang: String,
    pub version_flag: String,
    pub probe_timeout_seconds: u64,
}
impl Default for Tools {
    fn default() -> Self {
        Self {
            pandoc: "pandoc".into(),
            fc_list: "fc-list".into(),
            font_lang: "ja".into(),
            version_flag: "--version".into(),
            probe_timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Convert {
    pub engine: PdfEngine,
    pub from: String,
    pub to: String,
    /// `0` disables the bound.
    pub timeout_seconds: u64,
}
impl Default for Convert {
    fn default() -> Self {
        Self {
            engine: PdfEngine::Xelatex,
            from: "markdown".into(),
            to: "pdf".into(),
            timeout_seconds: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub margin: String,
    pub fontsize: String,
    pub papersize: String,
    pub documentclass: String,
}
impl Default for Layout {
    fn default() -> Self {
        Self {
            margin: "2cm".into(),
            fontsize: "12pt".into(),
            papersize: "a4".into(),
            documentclass: "article".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Demo {
    pub out_dir: String,
    pub markdown_filename: String,
    pub pdf_filename: String,
}
impl Default for Demo {
    fn default() -> Self {
        Self {
            out_dir: "output".into(),
            markdown_filename: "japanese_demo.md".into(),
            pdf_filename: "japanese_demo.pdf".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Output {
    pub print_summary: bool,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            print_summary: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "mdpdf-ja.log".into(),
        }
    }
}

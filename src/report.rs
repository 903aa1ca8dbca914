use crate::{
    config::PdfEngine,
    fonts::FontConfiguration,
    probe::{EnvironmentReport, FontCategory},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub environment: EnvironmentReport,
    pub selected_fonts: FontConfiguration,
    pub ok: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub engine: PdfEngine,
    pub font_category: FontCategory,
    pub output_bytes: Option<u64>,
    pub started: String,
    pub finished: String,
    pub status: String,
}

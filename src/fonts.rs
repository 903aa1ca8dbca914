//! Maps a detected [`FontCategory`] to the CJK font variables pandoc hands to LaTeX.

use crate::probe::FontCategory;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontRole {
    Main,
    Sans,
    Mono,
}

impl FontRole {
    /// Template variable read by pandoc's LaTeX template (xeCJK/luatexja).
    pub fn variable(self) -> &'static str {
        match self {
            FontRole::Main => "CJKmainfont",
            FontRole::Sans => "CJKsansfont",
            FontRole::Mono => "CJKmonofont",
        }
    }
}

/// Ordered role → family pairs. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFontConfiguration")]
pub struct FontConfiguration {
    entries: Vec<(FontRole, String)>,
}

#[derive(Deserialize)]
struct RawFontConfiguration {
    entries: Vec<(FontRole, String)>,
}

impl TryFrom<RawFontConfiguration> for FontConfiguration {
    type Error = String;

    fn try_from(raw: RawFontConfiguration) -> Result<Self, Self::Error> {
        if raw.entries.is_empty() {
            return Err("font configuration needs at least one entry".to_string());
        }
        Ok(Self {
            entries: raw.entries,
        })
    }
}

impl FontConfiguration {
    pub fn entries(&self) -> &[(FontRole, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn family(&self, role: FontRole) -> Option<&str> {
        self.entries
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, f)| f.as_str())
    }

    pub fn to_flags(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(role, family)| format!("--variable={}={}", role.variable(), family))
            .collect()
    }
}

const NOTO: &[(FontRole, &str)] = &[
    (FontRole::Main, "Noto Serif CJK JP"),
    (FontRole::Sans, "Noto Sans CJK JP"),
    (FontRole::Mono, "Noto Sans Mono CJK JP"),
];

const IPA: &[(FontRole, &str)] = &[
    (FontRole::Main, "IPAexMincho"),
    (FontRole::Sans, "IPAexGothic"),
    (FontRole::Mono, "IPAGothic"),
];

const FALLBACK: &[(FontRole, &str)] = &[
    (FontRole::Main, "DejaVu Serif"),
    (FontRole::Sans, "DejaVu Sans"),
];

pub fn select_font_config(category: FontCategory) -> FontConfiguration {
    let table = match category {
        FontCategory::Noto => NOTO,
        FontCategory::Ipa => IPA,
        FontCategory::Basic | FontCategory::NoneDetected => FALLBACK,
    };
    FontConfiguration {
        entries: table
            .iter()
            .map(|(role, family)| (*role, (*family).to_string()))
            .collect(),
    }
}

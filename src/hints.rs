//! Remediation text attached to failures and printed after probes.

pub const PANDOC_INSTALL_URL: &str = "https://pandoc.org/installing.html";

/// Appended to engine diagnostics that mention fonts or CJK.
pub fn cjk_font_remediation() -> &'static str {
    "Hint: this looks like a Japanese font problem. Install CJK fonts and refresh the cache:\n  \
     sudo apt install fonts-noto-cjk fonts-ipafont\n  \
     fc-cache -fv"
}

/// Case-insensitive "font" / "cjk" match.
pub fn mentions_font_problem(diagnostic: &str) -> bool {
    let lower = diagnostic.to_lowercase();
    lower.contains("font") || lower.contains("cjk")
}

pub fn install_hint(program: &str) -> String {
    match program {
        "pandoc" => format!("Install pandoc: {PANDOC_INSTALL_URL}"),
        "xelatex" => "Install XeLaTeX: sudo apt install texlive-xetex".to_string(),
        "lualatex" => "Install LuaLaTeX: sudo apt install texlive-luatex".to_string(),
        "pdflatex" => "Install pdfLaTeX: sudo apt install texlive-latex-base".to_string(),
        "fc-list" => "Install fontconfig: sudo apt install fontconfig".to_string(),
        other => format!("Make sure `{other}` is installed and on PATH."),
    }
}

/// One-line verdict on the detected fonts, shown after a dependency check.
pub fn font_quality(category: crate::probe::FontCategory) -> &'static str {
    use crate::probe::FontCategory;
    match category {
        FontCategory::Noto => "Noto CJK fonts available: best quality Japanese output.",
        FontCategory::Ipa => "IPA fonts available: good quality Japanese output.",
        FontCategory::Basic => {
            "Japanese text will render, but installing Noto CJK or IPA fonts is recommended."
        }
        FontCategory::NoneDetected => {
            "No Japanese fonts found: sudo apt install fonts-noto-cjk fonts-ipafont"
        }
    }
}

use mdpdf_ja::{demo, hints};

#[test]
fn font_problem_match_is_case_insensitive() {
    assert!(hints::mentions_font_problem("xdvipdfmx:fatal: Cannot proceed without the FONT"));
    assert!(hints::mentions_font_problem("Package xeCJK Error"));
    assert!(!hints::mentions_font_problem("! Undefined control sequence."));
}

#[test]
fn install_hint_names_tool() {
    assert!(hints::install_hint("pandoc").contains(hints::PANDOC_INSTALL_URL));
    assert!(hints::install_hint("xelatex").contains("texlive-xetex"));
    assert!(hints::install_hint("weasyprint").contains("weasyprint"));
}

#[test]
fn sample_is_written_with_parents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("output").join("japanese_demo.md");
    demo::write_sample(&path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, demo::SAMPLE_MARKDOWN);
    assert!(written.contains("ひらがな"));
}

use mdpdf_ja::config::{Config, PdfEngine};

#[test]
fn parse_example_config() {
    let raw = include_str!("../mdpdf-ja.example.toml");
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert_eq!(cfg.tools.pandoc, "pandoc");
    assert_eq!(cfg.convert.engine, PdfEngine::Xelatex);
    assert_eq!(cfg.convert.timeout_seconds, 120);
    assert_eq!(cfg.layout.papersize, "a4");
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let cfg: Config = toml::from_str("[convert]\nengine = \"lualatex\"\nfrom = \"gfm\"\nto = \"pdf\"\ntimeout_seconds = 0\n")
        .expect("parse TOML");
    assert_eq!(cfg.convert.engine, PdfEngine::Lualatex);
    assert_eq!(cfg.convert.timeout_seconds, 0);
    assert_eq!(cfg.tools.fc_list, "fc-list");
    assert_eq!(cfg.tools.font_lang, "ja");
    assert_eq!(cfg.demo.out_dir, "output");
    assert!(cfg.output.print_summary);
}

#[test]
fn unknown_engine_is_rejected() {
    let raw = "[convert]\nengine = \"context\"\nfrom = \"markdown\"\nto = \"pdf\"\ntimeout_seconds = 1\n";
    assert!(toml::from_str::<Config>(raw).is_err());
}

#[test]
fn load_reads_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mdpdf-ja.toml");
    std::fs::write(&path, "[layout]\nmargin = \"25mm\"\nfontsize = \"11pt\"\npapersize = \"b5\"\ndocumentclass = \"ltjsarticle\"\n").unwrap();

    let cfg = Config::resolve(Some(&path)).unwrap();
    assert_eq!(cfg.layout.margin, "25mm");
    assert_eq!(cfg.layout.documentclass, "ltjsarticle");

    assert!(Config::load(&dir.path().join("missing.toml")).is_err());
}

#[test]
fn partial_section_keeps_other_defaults() {
    let cfg: Config = toml::from_str("[convert]\nengine = \"lualatex\"\n").expect("parse TOML");
    assert_eq!(cfg.convert.engine, PdfEngine::Lualatex);
    assert_eq!(cfg.convert.from, "markdown");
    assert_eq!(cfg.convert.timeout_seconds, 120);

    let cfg: Config = toml::from_str("[layout]\npapersize = \"b5\"\n\n[logging]\njson = true\n")
        .expect("parse TOML");
    assert_eq!(cfg.layout.papersize, "b5");
    assert_eq!(cfg.layout.margin, "2cm");
    assert!(cfg.logging.json);
    assert_eq!(cfg.logging.level, "info");
}

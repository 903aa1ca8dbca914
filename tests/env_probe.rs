mod common;

use common::{StubRunner, exited, not_found, ok};
use mdpdf_ja::{
    config::{Config, PdfEngine},
    engine::RunError,
    probe::{FontCategory, classify_font_listing, probe_environment, probe_fonts, probe_tool},
};
use std::time::Duration;

const NOTO_AND_IPA: &str = "\
/usr/share/fonts/opentype/ipaexfont-gothic/ipaexg.ttf: IPAexGothic,IPAexゴシック:style=Regular
/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc: Noto Sans CJK JP:style=Regular
";

#[test]
fn tool_present_reports_version() {
    let runner = StubRunner::new().reply(ok("pandoc 3.1.11.1\nFeatures: +server +lua\n"));
    let tool = probe_tool(&runner, "pandoc", "--version", 10);

    assert!(tool.present);
    assert_eq!(tool.version.as_deref(), Some("3.1.11.1"));
    assert_eq!(tool.version_line.as_deref(), Some("pandoc 3.1.11.1"));

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "pandoc");
    assert_eq!(calls[0].args, vec!["--version"]);
    assert_eq!(calls[0].timeout, Some(Duration::from_secs(10)));
}

#[test]
fn tool_missing_is_absent_not_error() {
    let runner = StubRunner::new().reply(not_found("xelatex"));
    let tool = probe_tool(&runner, "xelatex", "--version", 10);
    assert!(!tool.present);
    assert!(tool.version.is_none());
}

#[test]
fn tool_nonzero_exit_is_absent() {
    let runner = StubRunner::new().reply(exited(1, "", "broken install"));
    assert!(!probe_tool(&runner, "lualatex", "--version", 10).present);
}

#[test]
fn tool_timeout_is_absent() {
    let runner = StubRunner::new().reply(Err(RunError::TimedOut {
        program: "pandoc".into(),
        timeout: Duration::from_secs(10),
    }));
    assert!(!probe_tool(&runner, "pandoc", "--version", 10).present);
}

#[test]
fn fonts_query_uses_language_tag() {
    let runner = StubRunner::new().reply(ok(NOTO_AND_IPA));
    probe_fonts(&runner, "fc-list", "ja", 5);
    let calls = runner.calls();
    assert_eq!(calls[0].program, "fc-list");
    assert_eq!(calls[0].args, vec![":lang=ja"]);
}

#[test]
fn noto_wins_over_ipa() {
    let runner = StubRunner::new().reply(ok(NOTO_AND_IPA));
    assert_eq!(probe_fonts(&runner, "fc-list", "ja", 5), FontCategory::Noto);
}

#[test]
fn classify_listing() {
    assert_eq!(
        classify_font_listing("/x/ipam.ttf: IPAMincho:style=Regular"),
        FontCategory::Ipa
    );
    assert_eq!(
        classify_font_listing("/x/takao.ttf: TakaoPGothic:style=Regular"),
        FontCategory::Basic
    );
}

#[test]
fn fonts_unavailable_degrade_to_none() {
    let missing = StubRunner::new().reply(not_found("fc-list"));
    assert_eq!(probe_fonts(&missing, "fc-list", "ja", 5), FontCategory::NoneDetected);

    let failed = StubRunner::new().reply(exited(1, "Noto Sans CJK JP", ""));
    assert_eq!(probe_fonts(&failed, "fc-list", "ja", 5), FontCategory::NoneDetected);

    let empty = StubRunner::new().reply(ok("  \n"));
    assert_eq!(probe_fonts(&empty, "fc-list", "ja", 5), FontCategory::NoneDetected);
}

#[test]
fn environment_probe_checks_selected_engine() {
    let cfg = Config::default();
    let runner = StubRunner::new()
        .reply(ok("pandoc 3.1.3"))
        .reply(ok("LuaHBTeX, Version 1.17.0 (TeX Live 2023)"))
        .reply(ok(NOTO_AND_IPA));

    let report = probe_environment(&runner, &cfg, PdfEngine::Lualatex);
    assert!(report.all_ok());
    assert_eq!(report.typesetting.name, "lualatex");
    assert_eq!(report.typesetting.version.as_deref(), Some("1.17.0"));
    assert_eq!(report.fonts, FontCategory::Noto);

    let programs: Vec<_> = runner.calls().into_iter().map(|c| c.program).collect();
    assert_eq!(programs, vec!["pandoc", "lualatex", "fc-list"]);
}

#[test]
fn environment_without_fonts_is_not_ok() {
    let cfg = Config::default();
    let runner = StubRunner::new()
        .reply(ok("pandoc 3.1.3"))
        .reply(ok("XeTeX 3.141592653-2.6-0.999995"));

    let report = probe_environment(&runner, &cfg, PdfEngine::Xelatex);
    assert!(report.conversion.present);
    assert!(report.typesetting.present);
    assert_eq!(report.fonts, FontCategory::NoneDetected);
    assert!(!report.all_ok());
}

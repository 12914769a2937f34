//! Runs of the manifest front end through the driver.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::mpsc,
};

use duet_codegen::{Driver, Error, GenerationConfig, OBJECTIVE_C, Result, RunReport};
use duet_manifest::{ManifestFrontend, substitutions};

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn run(config: GenerationConfig) -> Result<RunReport> {
    let (tx, rx) = mpsc::channel();
    Driver::new(config, &OBJECTIVE_C, substitutions())
        .spawn(ManifestFrontend::new(), move |result| {
            tx.send(result).unwrap();
        })
        .join()
        .unwrap();
    rx.recv().unwrap()
}

#[test]
fn test_run_writes_pairs() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "units.toml",
        "[units.widget]\ncolors = { tint = \"#112233\" }\n\n[units.gadget]\n",
    );
    let out = dir.path().join("Generated");

    let report = run(
        GenerationConfig::new(&input)
            .with_prefix("ACME")
            .with_output_dir(&out),
    )
    .unwrap();

    assert_eq!(report.units, vec!["ACMEWidget", "ACMEGadget"]);
    assert_eq!(report.outcome.written.len(), 4);
    for file in ["ACMEWidget.h", "ACMEWidget.m", "ACMEGadget.h", "ACMEGadget.m"] {
        assert!(out.join(file).is_file(), "{file}");
    }
}

#[test]
fn test_second_run_leaves_files_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "units.toml", "[units.widget]\n");
    let config = GenerationConfig::new(&input).with_output_dir(dir.path().join("out"));

    let first = run(config.clone()).unwrap();
    let second = run(config).unwrap();

    assert_eq!(first.outcome.written.len(), 2);
    assert!(second.outcome.written.is_empty());
    assert_eq!(second.outcome.unchanged, first.outcome.written);
}

#[test]
fn test_aggregate_spans_included_files() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "shared/palette.toml",
        "[units.palette]\ncolors = { brand = \"#FF0000\" }\n",
    );
    let input = write(
        dir.path(),
        "app/units.toml",
        "include = [\"palette.toml\"]\n[units.widget]\nidentifiers = { cell = \"Cell\" }\n",
    );
    let out = dir.path().join("out");

    let report = run(
        GenerationConfig::new(&input)
            .with_search_path(dir.path().join("shared"))
            .with_aggregate(true)
            .with_aggregate_name("AppStyle")
            .with_output_dir(&out),
    )
    .unwrap();

    assert_eq!(report.units, vec!["Widget", "Palette"]);
    let header = fs::read_to_string(out.join("AppStyle.h")).unwrap();
    assert!(header.contains("@interface Widget : NSObject"));
    assert!(header.contains("@interface Palette : NSObject"));
    assert!(header.contains("+ (UIColor *)brandColor;"));
}

#[test]
fn test_skip_declaration_writes_definitions_only() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "units.toml", "[units.widget]\n[units.gadget]\n");
    let out = dir.path().join("out");

    let report = run(
        GenerationConfig::new(&input)
            .with_skip_declaration(true)
            .with_output_dir(&out),
    )
    .unwrap();

    assert_eq!(
        report.artifacts,
        vec![out.join("Widget.m"), out.join("Gadget.m")]
    );
    assert!(!out.join("Widget.h").exists());
    let source = fs::read_to_string(out.join("Widget.m")).unwrap();
    assert!(source.contains("#import <Foundation/Foundation.h>"));
}

#[test]
fn test_duplicate_units_across_files_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "other.toml", "[units.\"Widget\"]\n");
    let input = write(
        dir.path(),
        "units.toml",
        "include = [\"other.toml\"]\n[units.widget]\n",
    );
    let out = dir.path().join("out");

    let err = run(GenerationConfig::new(&input).with_output_dir(&out)).unwrap_err();

    match *err {
        Error::DuplicateUnitName {
            name,
            first,
            second,
        } => {
            assert_eq!(name, "Widget");
            assert_eq!(first, "widget");
            assert_eq!(second, "Widget");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!out.exists());
}

#[test]
fn test_colliding_member_names() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "units.toml",
        "[units.widget.colors]\n\"primary tint\" = \"#000000\"\n\"primary-tint\" = \"#FFFFFF\"\n",
    );

    let err = run(GenerationConfig::new(&input).with_output_dir(dir.path().join("out"))).unwrap_err();
    assert_eq!(err.kind(), "duplicate-member-name");
    assert!(err.to_string().contains("'primary tint'"));
    assert!(err.to_string().contains("'primary-tint'"));
}

#[test]
fn test_constant_shared_across_units() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "units.toml",
        "[units.widget.identifiers]\n\"primary tint\" = \"A\"\n\n\
         [units.\"widget primary\".identifiers]\ntint = \"B\"\n",
    );

    for aggregate in [false, true] {
        let out = dir.path().join(format!("out-{aggregate}"));
        let err = run(GenerationConfig::new(&input)
            .with_aggregate(aggregate)
            .with_output_dir(&out))
        .unwrap_err();

        assert_eq!(err.kind(), "duplicate-symbol");
        assert!(err.to_string().contains("'WidgetPrimaryTint'"));
        assert!(!out.exists());
    }
}

#[test]
fn test_reserved_member_key() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "units.toml",
        "[units.widget.identifiers]\nself = \"x\"\n",
    );

    let err = run(GenerationConfig::new(&input).with_output_dir(dir.path().join("out"))).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid key 'self' in unit 'widget': 'self' is a reserved word"
    );
}

#[test]
fn test_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let err = run(GenerationConfig::new(dir.path().join("missing.toml"))).unwrap_err();
    assert_eq!(err.kind(), "input-unreadable");
}

#[test]
fn test_legacy_target_avoids_modern_syntax() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "units.toml",
        "[units.palette.colors]\nbrand = \"#FF0000\"\n",
    );
    let out = dir.path().join("out");

    run(GenerationConfig::new(&input)
        .with_legacy_target(true)
        .with_output_dir(&out))
    .unwrap();

    let header = fs::read_to_string(out.join("Palette.h")).unwrap();
    let source = fs::read_to_string(out.join("Palette.m")).unwrap();
    assert!(!header.contains("NSArray<"));
    assert!(!source.contains("DisplayP3"));
    assert!(source.contains("colorWithRed:1.000 green:0.000 blue:0.000 alpha:1.000"));
}

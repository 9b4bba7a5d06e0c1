//! CLI integration tests for the `mrq` binary.
//!
//! Runs the built binary against temporary directories and the fixtures under
//! `tests/fixtures`, covering every subcommand, exit codes and config discovery.

use std::path::{Path, PathBuf};
use std::process::Command;

use marquee::address::GridAddress;
use marquee::document::Document;
use marquee::glyph::Font;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

/// Run mrq in `dir` with the given arguments and return (stdout, stderr, exit code).
fn run_mrq(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_mrq"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", dir.join("no-xdg"))
        .args(args)
        .output()
        .expect("Failed to execute mrq");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.code().unwrap_or(-1))
}

/// Run mrq with the fixture config.
fn run_configured(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let config = fixture("marquee.toml");
    let mut full = vec!["--config", config.to_str().expect("utf-8 fixture path")];
    full.extend_from_slice(args);
    run_mrq(dir, &full)
}

fn read_document(path: &Path) -> Document {
    let text = std::fs::read_to_string(path).expect("document written");
    Document::from_json(&text).expect("document is valid")
}

#[test]
fn test_new_writes_blank_document() {
    let temp = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = run_configured(temp.path(), &["new", "sign.json"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("Saved:"));

    let document = read_document(&temp.path().join("sign.json"));
    assert_eq!((document.grid.width, document.grid.height), (16, 8));
    assert_eq!(document.layers.len(), 2);
    assert_eq!(document.layers.get(0).map(|l| l.len()), Some(16 * 8));
}

#[test]
fn test_new_honors_size_overrides() {
    let temp = tempfile::tempdir().unwrap();
    let (_, stderr, code) =
        run_configured(temp.path(), &["new", "wide.json", "--width", "40", "--height", "4"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    let document = read_document(&temp.path().join("wide.json"));
    assert_eq!((document.grid.width, document.grid.height), (40, 4));
}

#[test]
fn test_new_rejects_zero_width() {
    let temp = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_configured(temp.path(), &["new", "bad.json", "--width", "0"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("grid.width"));
    assert!(!temp.path().join("bad.json").exists());
}

#[test]
fn test_replay_script_and_render_preview() {
    let temp = tempfile::tempdir().unwrap();
    let script = fixture("scripts/smile.jsonl");
    let out = temp.path().join("smile.json");
    let png = temp.path().join("smile.png");
    let (_, stderr, code) = run_configured(
        temp.path(),
        &[
            "replay",
            script.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--png",
            png.to_str().unwrap(),
        ],
    );
    assert_eq!(code, 0, "stderr: {}", stderr);

    let document = read_document(&out);
    assert_eq!(document.layers.len(), 5);
    let eye = document.layers.get(2).expect("left eye");
    assert_eq!(eye.cells()[0].shape(), marquee::Shape::Circle);
    assert!(eye.has(GridAddress::new(4, 2)));
    let mouth = document.layers.get(4).expect("mouth");
    assert_eq!(mouth.len(), 3);

    let image = image::open(&png).expect("preview written").to_rgba8();
    assert_eq!(image.dimensions(), (160, 80));
}

#[test]
fn test_replay_reports_bad_command_line() {
    let temp = tempfile::tempdir().unwrap();
    let script = fixture("scripts/broken.jsonl");
    let out = temp.path().join("broken.json");
    let (_, stderr, code) =
        run_configured(temp.path(), &["replay", script.to_str().unwrap(), "-o", out.to_str().unwrap()]);
    assert_eq!(code, 2);
    assert!(stderr.contains(":2:"), "stderr: {}", stderr);
    assert!(!out.exists());
}

#[test]
fn test_type_with_configured_font() {
    let temp = tempfile::tempdir().unwrap();
    let (_, stderr, code) =
        run_configured(temp.path(), &["type", "HI", "--font", "block", "--color", "4", "-o", "hi.json"]);
    assert_eq!(code, 0, "stderr: {}", stderr);

    let document = read_document(&temp.path().join("hi.json"));
    assert_eq!(document.layers.len(), 4);
    let h = document.layers.get(2).expect("H layer");
    assert_eq!(h.name(), "H");
    // 16x8 grid, run of 5x5: origin (5, 1)
    assert!(h.has(GridAddress::new(5, 1)));
    assert_eq!(h.cells()[0].color().index(), 4);
}

#[test]
fn test_type_with_unknown_font_fails() {
    let temp = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_configured(temp.path(), &["type", "HI", "--font", "serif", "-o", "x.json"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("Unknown font 'serif'"));
}

#[test]
fn test_type_onto_existing_document_with_font_file() {
    let temp = tempfile::tempdir().unwrap();
    let (_, _, code) = run_configured(temp.path(), &["new", "base.json"]);
    assert_eq!(code, 0);

    let font = fixture("fonts/block.json");
    let (_, stderr, code) = run_mrq(
        temp.path(),
        &["type", "o", "--font-file", font.to_str().unwrap(), "-d", "base.json", "-o", "o.json"],
    );
    assert_eq!(code, 0, "stderr: {}", stderr);

    let document = read_document(&temp.path().join("o.json"));
    assert_eq!(document.grid.width, 16);
    let names: Vec<&str> = document.layers.iter().map(|l| l.name()).collect();
    assert_eq!(names, vec!["background", "border", "o.0", "o.1"]);
}

#[test]
fn test_render_scales_output() {
    let temp = tempfile::tempdir().unwrap();
    run_configured(temp.path(), &["new", "sign.json"]);
    let (stdout, stderr, code) = run_configured(temp.path(), &["render", "sign.json", "--scale", "2"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("sign.png"));

    let image = image::open(temp.path().join("sign.png")).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (320, 160));
}

#[test]
fn test_render_rejects_invalid_document() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("bad.json"), r#"{"grid": {"width": 2}}"#).unwrap();
    let (_, stderr, code) = run_configured(temp.path(), &["render", "bad.json"]);
    assert_eq!(code, 2);
    assert!(stderr.starts_with("Error:"));

    let (_, _, code) = run_configured(temp.path(), &["render", "missing.json"]);
    assert_eq!(code, 1);
}

#[test]
fn test_oversized_grids_are_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_configured(temp.path(), &["new", "huge.json", "--width", "4000000000"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("'grid'"), "stderr: {}", stderr);
    assert!(!temp.path().join("huge.json").exists());

    let document = r#"{"grid":{"width":200000,"height":1,"zoom":30000},"layers":[
        {"name":"background","locked":true,"cells":[]},
        {"name":"border","cells":[]}]}"#;
    std::fs::write(temp.path().join("huge.json"), document).unwrap();
    let (_, stderr, code) = run_configured(temp.path(), &["render", "huge.json"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("200000x1"), "stderr: {}", stderr);
    assert!(!temp.path().join("huge.png").exists());
}

#[test]
fn test_export_glyphs_round_trips_typed_text() {
    let temp = tempfile::tempdir().unwrap();
    run_configured(temp.path(), &["type", "HI", "-o", "hi.json"]);
    let (stdout, stderr, code) = run_configured(temp.path(), &["export-glyphs", "hi.json"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("2 glyph(s)"));

    let exported =
        Font::from_json(&std::fs::read_to_string(temp.path().join("hi.glyphs.json")).unwrap()).unwrap();
    let source = Font::from_json(&std::fs::read_to_string(fixture("fonts/block.json")).unwrap()).unwrap();
    assert_eq!(exported.get("H"), source.get("H"));
    assert_eq!(exported.get("I"), source.get("I"));
}

#[test]
fn test_config_is_discovered_from_working_directory() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("marquee.toml"), "[grid]\nwidth = 12\nheight = 3\n").unwrap();
    let nested = temp.path().join("signs");
    std::fs::create_dir_all(&nested).unwrap();

    let (_, stderr, code) = run_mrq(&nested, &["new", "found.json"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    let document = read_document(&nested.join("found.json"));
    assert_eq!((document.grid.width, document.grid.height), (12, 3));
}

#[test]
fn test_invalid_config_exits_with_invalid_args() {
    let temp = tempfile::tempdir().unwrap();
    let config = temp.path().join("bad.toml");
    std::fs::write(&config, "[palette]\ncolors = []\n").unwrap();
    let (_, stderr, code) = run_mrq(temp.path(), &["--config", config.to_str().unwrap(), "new", "x.json"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("palette.colors"));
}

#[test]
fn test_verbose_flag_enables_info_logs() {
    let temp = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_configured(temp.path(), &["-v", "new", "sign.json"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("loaded config"), "stderr: {}", stderr);
}

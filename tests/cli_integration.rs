//! CLI integration tests
//!
//! Runs the `crop-adjust` binary against synthetic page images.

use assert_cmd::Command;
use image::{Rgb, RgbImage};
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// White page with a black block at (20, 20, 40, 10)
fn write_page(dir: &Path) -> PathBuf {
    let mut img = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
    for y in 20..30 {
        for x in 20..60 {
            img.put_pixel(x, y, Rgb([0, 0, 0]));
        }
    }
    let path = dir.join("page.png");
    img.save(&path).unwrap();
    path
}

fn crop_adjust(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("crop-adjust").unwrap();
    // Keep user/local config files out of the run
    cmd.current_dir(dir.path()).env("XDG_CONFIG_HOME", dir.path().join("xdg"));
    cmd
}

// TC-CLI-001: rectangle list file
#[test]
fn test_refine_rect_list() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_page(dir.path());
    let rects = dir.path().join("page.txt");
    std::fs::write(&rects, "15,18,49,13\n25,22,10,4\n").unwrap();

    crop_adjust(&dir)
        .arg("refine")
        .arg(&image)
        .arg("--rects")
        .arg(&rects)
        .assert()
        .success()
        .stdout(
            "GIVEN:\t15,18,49,13\nFIXED:\t16,19,48,12\n\
             GIVEN:\t25,22,10,4\nFIXED:\t18,19,18,7\n\
             Processing Completed.\n",
        );
}

// TC-CLI-002: rectangles on the command line, options overridden
#[test]
fn test_refine_direct_rect_with_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_page(dir.path());

    crop_adjust(&dir)
        .arg("refine")
        .arg(&image)
        .args(["--rect", "15,18,49,13", "--expand-ratio", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FIXED:\t20,20,40,10"));
}

// TC-CLI-003: JSON report
#[test]
fn test_refine_json() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_page(dir.path());

    let output = crop_adjust(&dir)
        .arg("refine")
        .arg(&image)
        .args(["--rect", "15,18,49,13", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["entries"][0]["fixed"]["x"], 16);
    assert_eq!(value["entries"][0]["fixed"]["width"], 48);
    assert_eq!(value["image_size"][0], 100);
}

// TC-CLI-004: config file picked up from the working directory
#[test]
fn test_refine_local_config() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_page(dir.path());
    std::fs::write(dir.path().join("crop-adjust.toml"), "[refine]\nexpand_ratio = 0.0\n").unwrap();

    crop_adjust(&dir)
        .arg("refine")
        .arg(&image)
        .args(["--rect", "15,18,49,13"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FIXED:\t20,20,40,10"));
}

// TC-CLI-005: CLI flag beats config file
#[test]
fn test_cli_overrides_config() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_page(dir.path());
    let config = dir.path().join("custom.toml");
    std::fs::write(&config, "[refine]\nexpand_ratio = 0.5\n").unwrap();

    crop_adjust(&dir)
        .arg("refine")
        .arg(&image)
        .arg("--config")
        .arg(&config)
        .args(["--rect", "15,18,49,13", "--expand-ratio", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FIXED:\t20,20,40,10"));
}

// TC-CLI-006: missing image
#[test]
fn test_missing_image() {
    let dir = tempfile::tempdir().unwrap();

    crop_adjust(&dir)
        .args(["refine", "missing.png", "--rect", "1,1,5,5"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not found"));
}

// TC-CLI-007: malformed rectangle list
#[test]
fn test_invalid_rect_list() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_page(dir.path());
    let rects = dir.path().join("bad.txt");
    std::fs::write(&rects, "1,2,3,4\nx,2,3,4\n").unwrap();

    crop_adjust(&dir)
        .arg("refine")
        .arg(&image)
        .arg("--rects")
        .arg(&rects)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("line 2"));
}

// TC-CLI-008: bad config file
#[test]
fn test_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_page(dir.path());
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "[refine]\ntolerance = \"wide\"\n").unwrap();

    crop_adjust(&dir)
        .arg("refine")
        .arg(&image)
        .arg("--config")
        .arg(&config)
        .args(["--rect", "1,1,5,5"])
        .assert()
        .code(3);
}

// TC-CLI-009: info command
#[test]
fn test_info() {
    let dir = tempfile::tempdir().unwrap();

    crop_adjust(&dir)
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("crop-adjust v"))
        .stdout(predicate::str::contains("strict"))
        .stdout(predicate::str::contains("crop-adjust.toml"));
}

// TC-CLI-010: preset replaces config file values, flags still win
#[test]
fn test_refine_preset() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_page(dir.path());
    std::fs::write(
        dir.path().join("crop-adjust.toml"),
        "[refine]\ntolerance = 35\nexpand_ratio = 0.0\n",
    )
    .unwrap();

    let output = crop_adjust(&dir)
        .arg("refine")
        .arg(&image)
        .args(["--rect", "15,18,49,13", "--preset", "loose", "--threshold", "0.01", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["options"]["tolerance"], 40);
    assert_eq!(value["options"]["search_range"], 40);
    assert_eq!(value["options"]["expand_ratio"], 0.1);
    assert_eq!(value["options"]["threshold"], 0.01);
}

// TC-CLI-011: unknown preset is a usage error
#[test]
fn test_refine_unknown_preset() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_page(dir.path());

    crop_adjust(&dir)
        .arg("refine")
        .arg(&image)
        .args(["--rect", "15,18,49,13", "--preset", "medium"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("medium"));
}

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Cursor;
use tempfile::TempDir;

fn planscriber_cmd() -> Command {
    Command::cargo_bin("planscriber").expect("binary exists")
}

fn write_flat_png(path: &std::path::Path, width: u32, height: u32) {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([230, 230, 230, 255]));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, bytes).unwrap();
}

fn write_snapshot_json(path: &std::path::Path) {
    let json = r##"{
        "version": 1,
        "planName": "Cantiere Nord",
        "floor": "P2",
        "imageName": "plan.png",
        "rotation": 0,
        "markerScale": 1.0,
        "points": [
            {"id": "a6e8f2a4-9f0f-4a71-95a5-2b8a6d3c1e00", "number": 1,
             "typology": "7, 3", "x": 25.0, "y": 25.0,
             "targetX": 10.0, "targetY": 10.0,
             "description": "Fessura sul solaio", "createdAt": 1700000000000}
        ],
        "lines": [
            {"id": "9d0cd1c5-0f6a-4b54-a9c9-08f4f0a5f001",
             "startX": 40.0, "startY": 40.0, "endX": 60.0, "endY": 40.0,
             "color": "#2563eb"}
        ]
    }"##;
    std::fs::write(path, json).unwrap();
}

#[test]
fn help_prints_usage() {
    planscriber_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Floor-plan annotation engine with JPEG and PDF report export",
        ));
}

#[test]
fn list_on_empty_store_reports_no_projects() {
    let temp = TempDir::new().unwrap();
    planscriber_cmd()
        .args(["--store-dir"])
        .arg(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nessun progetto salvato"));
}

#[test]
fn import_then_list_show_delete_round_trip() {
    let temp = TempDir::new().unwrap();
    let json = temp.path().join("snapshot.json");
    let png = temp.path().join("plan.png");
    write_snapshot_json(&json);
    write_flat_png(&png, 120, 80);

    let output = planscriber_cmd()
        .args(["--store-dir"])
        .arg(temp.path().join("store"))
        .arg("import")
        .arg(&json)
        .args(["--image"])
        .arg(&png)
        .assert()
        .success()
        .stdout(predicate::str::contains("Progetto importato:"))
        .get_output()
        .stdout
        .clone();

    let id = String::from_utf8(output)
        .unwrap()
        .split(':')
        .nth(1)
        .unwrap()
        .trim()
        .to_string();

    planscriber_cmd()
        .args(["--store-dir"])
        .arg(temp.path().join("store"))
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cantiere Nord"));

    planscriber_cmd()
        .args(["--store-dir"])
        .arg(temp.path().join("store"))
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Punti:         1"));

    planscriber_cmd()
        .args(["--store-dir"])
        .arg(temp.path().join("store"))
        .args(["delete", &id])
        .assert()
        .success();

    planscriber_cmd()
        .args(["--store-dir"])
        .arg(temp.path().join("store"))
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nessun progetto salvato"));
}

#[test]
fn export_image_from_json_writes_jpeg() {
    let temp = TempDir::new().unwrap();
    let json = temp.path().join("snapshot.json");
    let png = temp.path().join("plan.png");
    let out = temp.path().join("flattened.jpg");
    write_snapshot_json(&json);
    write_flat_png(&png, 200, 100);

    planscriber_cmd()
        .args(["--store-dir"])
        .arg(temp.path())
        .arg("export-image")
        .args(["--json"])
        .arg(&json)
        .args(["--image"])
        .arg(&png)
        .args(["--output"])
        .arg(&out)
        .assert()
        .success();

    let bytes = std::fs::read(&out).unwrap();
    // JPEG SOI marker, supersampled dimensions are checked in unit tests
    assert_eq!(&bytes[..2], &[0xff, 0xd8]);
}

#[test]
fn export_pdf_from_json_writes_pdf() {
    let temp = TempDir::new().unwrap();
    let json = temp.path().join("snapshot.json");
    let png = temp.path().join("plan.png");
    let out = temp.path().join("report.pdf");
    write_snapshot_json(&json);
    write_flat_png(&png, 200, 100);

    planscriber_cmd()
        .args(["--store-dir"])
        .arg(temp.path())
        .arg("export-pdf")
        .args(["--json"])
        .arg(&json)
        .args(["--image"])
        .arg(&png)
        .args(["--output"])
        .arg(&out)
        .assert()
        .success();

    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(&bytes[..5], b"%PDF-");
}

#[test]
fn export_without_source_fails_with_usage_hint() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out.jpg");

    planscriber_cmd()
        .args(["--store-dir"])
        .arg(temp.path())
        .arg("export-image")
        .args(["--output"])
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--project"));
    assert!(!out.exists());
}

#[test]
fn export_with_corrupt_base_image_fails_without_artifact() {
    let temp = TempDir::new().unwrap();
    let json = temp.path().join("snapshot.json");
    let broken = temp.path().join("broken.png");
    let out = temp.path().join("out.jpg");
    write_snapshot_json(&json);
    std::fs::write(&broken, b"definitely not an image").unwrap();

    planscriber_cmd()
        .args(["--store-dir"])
        .arg(temp.path())
        .arg("export-image")
        .args(["--json"])
        .arg(&json)
        .args(["--image"])
        .arg(&broken)
        .args(["--output"])
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("decode"));
    assert!(!out.exists());
}

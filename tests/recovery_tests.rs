use clap::Parser;
use recoverjpeg::cli::Args;
use recoverjpeg::{restored_message, run};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn create_minimal_jpeg(fill: u8) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0x01, 0xFF, 0xE0, 0x00, 0x04, fill, fill];
    data.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
    data.extend_from_slice(&[fill, 0x34, 0xFF, 0x00, 0x56, 0xFF, 0xD5, fill]);
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

fn create_disk_image(dir: &Path, images: &[Vec<u8>]) -> PathBuf {
    let mut disk = vec![0u8; 512];
    for image in images {
        disk.extend_from_slice(image);
        let padded = disk.len().div_ceil(512) * 512;
        disk.resize(padded, 0xAA);
    }
    disk.extend_from_slice(&[0x00; 512]);

    let path = dir.join("disk.img");
    fs::write(&path, disk).unwrap();
    path
}

fn args(extra: &[&str], input: &Path, output: &Path) -> Args {
    let mut argv = vec![
        "recoverjpeg".to_string(),
        "-q".to_string(),
        "-o".to_string(),
        output.display().to_string(),
    ];
    argv.extend(extra.iter().map(|s| s.to_string()));
    argv.push(input.display().to_string());
    Args::try_parse_from(argv).unwrap()
}

fn sorted_entries(dir: &Path) -> Vec<(String, Vec<u8>)> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.is_file())
        .map(|p| {
            (
                p.file_name().unwrap().to_string_lossy().into_owned(),
                fs::read(&p).unwrap(),
            )
        })
        .collect();
    entries.sort();
    entries
}

#[test]
fn test_end_to_end_recovery() {
    let work = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let images = vec![create_minimal_jpeg(0x11), create_minimal_jpeg(0x22)];
    let disk = create_disk_image(work.path(), &images);

    let summary = run(&args(&[], &disk, out.path())).unwrap();

    assert_eq!(summary.recovered, 2);
    assert_eq!(
        sorted_entries(out.path()),
        vec![
            ("image00000.jpg".to_string(), images[0].clone()),
            ("image00001.jpg".to_string(), images[1].clone()),
        ]
    );
}

#[test]
fn test_start_index_and_directories() {
    let work = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let disk = create_disk_image(work.path(), &[create_minimal_jpeg(0x33)]);

    let summary = run(&args(&["-i", "199", "-d", "bucket%d"], &disk, out.path())).unwrap();

    assert_eq!(summary.recovered, 1);
    assert!(out.path().join("bucket1/image00199.jpg").is_file());
}

#[test]
fn test_cutoff_filters_small_pictures() {
    let work = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let disk = create_disk_image(work.path(), &[create_minimal_jpeg(0x44)]);

    let summary = run(&args(&["-s", "1k"], &disk, out.path())).unwrap();

    assert_eq!(summary.recovered, 0);
    assert_eq!(summary.undersized, 1);
    assert!(sorted_entries(out.path()).is_empty());
}

#[test]
fn test_custody_sidecars() {
    let work = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let disk = create_disk_image(work.path(), &[create_minimal_jpeg(0x55)]);

    run(&args(&["--custody"], &disk, out.path())).unwrap();

    let names: Vec<String> = sorted_entries(out.path())
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, vec!["image00000.jpg", "image00000.jpg.custody.json"]);
}

#[test]
fn test_empty_input() {
    let work = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let disk = work.path().join("empty.img");
    fs::write(&disk, b"").unwrap();

    let summary = run(&args(&[], &disk, out.path())).unwrap();
    assert_eq!(summary.recovered, 0);
}

#[test]
fn test_runs_are_identical() {
    let work = TempDir::new().unwrap();
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let images: Vec<_> = (1..=5u8).map(|i| create_minimal_jpeg(i * 0x10)).collect();
    let disk = create_disk_image(work.path(), &images);

    run(&args(&[], &disk, first.path())).unwrap();
    run(&args(&[], &disk, second.path())).unwrap();

    let recovered = sorted_entries(first.path());
    assert_eq!(recovered.len(), 5);
    assert_eq!(recovered, sorted_entries(second.path()));
}

#[test]
fn test_missing_input_is_an_error() {
    let work = TempDir::new().unwrap();
    let result = run(&args(&[], &work.path().join("nope.img"), work.path()));

    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("unable to open"), "{message}");
}

#[test]
fn test_invalid_file_format_is_rejected_before_scanning() {
    let work = TempDir::new().unwrap();
    let result = run(&args(&["-f", "image.jpg"], &work.path().join("nope.img"), work.path()));

    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("name template"), "{message}");
}

#[test]
fn test_conflicting_flags() {
    assert!(Args::try_parse_from(["recoverjpeg", "-q", "-v", "disk.img"]).is_err());
    assert!(Args::try_parse_from(["recoverjpeg", "-b", "0", "disk.img"]).is_err());
    assert!(Args::try_parse_from(["recoverjpeg", "-m", "lots", "disk.img"]).is_err());
}

#[test]
fn test_restored_message() {
    assert_eq!(restored_message(0), "Restored 0 picture");
    assert_eq!(restored_message(1), "Restored 1 picture");
    assert_eq!(restored_message(12), "Restored 12 pictures");
}

//! Round-trip tests against a real 7-Zip installation.
//!
//! Each test looks for `7zz` (then p7zip's `7z`) and returns early when
//! neither is installed.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;
use zzshim_core::ArchiveFormat;
use zzshim_core::Archiver;
use zzshim_core::ArchiverConfig;
use zzshim_core::ArchiverError;
use zzshim_core::ResolverConfig;

fn real_archiver() -> Option<Archiver> {
    ["7zz", "7z"].into_iter().find_map(|name| {
        let config = ArchiverConfig::default().with_resolver(ResolverConfig::new(name));
        Archiver::with_config(&config).ok()
    })
}

macro_rules! require_archiver {
    () => {
        match real_archiver() {
            Some(archiver) => archiver,
            None => {
                eprintln!("skipping: no 7-Zip binary available");
                return;
            }
        }
    };
}

/// Creates `{a.txt: "X", b.txt: "Y"}` and compresses it.
fn sample_archive(archiver: &Archiver, work: &Path) -> PathBuf {
    let source = work.join("source");
    fs::create_dir(&source).unwrap();
    fs::write(source.join("a.txt"), "X").unwrap();
    fs::write(source.join("b.txt"), "Y").unwrap();

    archiver
        .compress_dir(&source, work.join("sample.7z"), ArchiveFormat::SevenZ)
        .unwrap()
}

#[test]
fn test_compress_then_extract_round_trip() {
    let archiver = require_archiver!();
    let work = TempDir::new().unwrap();
    let archive = sample_archive(&archiver, work.path());
    assert!(archive.exists());

    let out = work.path().join("out");
    fs::create_dir(&out).unwrap();
    archiver.extract(&archive, &out, false).unwrap();

    assert_eq!(fs::read(out.join("a.txt")).unwrap(), b"X");
    assert_eq!(fs::read(out.join("b.txt")).unwrap(), b"Y");
}

#[test]
fn test_integrity_is_idempotent() {
    let archiver = require_archiver!();
    let work = TempDir::new().unwrap();
    let archive = sample_archive(&archiver, work.path());
    let before = fs::read(&archive).unwrap();

    archiver.test_integrity(&archive).unwrap();
    archiver.test_integrity(&archive).unwrap();

    assert_eq!(fs::read(&archive).unwrap(), before);
}

#[test]
fn test_corrupt_archive_fails_integrity() {
    let archiver = require_archiver!();
    let work = TempDir::new().unwrap();
    let bogus = work.path().join("bogus.7z");
    fs::write(&bogus, b"definitely not an archive").unwrap();

    let err = archiver.test_integrity(&bogus).unwrap_err();
    assert!(matches!(err, ArchiverError::ProcessFailed { .. }));
    assert!(err.exit_code().is_some_and(|code| code != 0));
}

#[test]
fn test_add_string_then_extract() {
    let archiver = require_archiver!();
    let work = TempDir::new().unwrap();
    let archive = sample_archive(&archiver, work.path());

    archiver
        .add_string(&archive, "Hello, World!", "added.txt")
        .unwrap();

    let out = work.path().join("extracted").join("here");
    archiver.extract(&archive, &out, true).unwrap();

    assert_eq!(
        fs::read_to_string(out.join("added.txt")).unwrap(),
        "Hello, World!"
    );
    assert!(out.join("a.txt").exists());
}

#[test]
fn test_add_files_and_empty_dir() {
    let archiver = require_archiver!();
    let work = TempDir::new().unwrap();
    let archive = sample_archive(&archiver, work.path());

    let extra = work.path().join("extra.txt");
    fs::write(&extra, "more").unwrap();
    archiver.add_files(&archive, &[&extra]).unwrap();
    archiver.add_empty_dir(&archive, "empty").unwrap();

    let out = work.path().join("out");
    archiver.extract(&archive, &out, true).unwrap();

    assert_eq!(fs::read_to_string(out.join("extra.txt")).unwrap(), "more");
    assert!(out.join("empty").is_dir());
    assert_eq!(fs::read_dir(out.join("empty")).unwrap().count(), 0);
}

#[test]
fn test_compress_refuses_existing_destination() {
    let archiver = require_archiver!();
    let work = TempDir::new().unwrap();
    let archive = sample_archive(&archiver, work.path());
    let before = fs::read(&archive).unwrap();

    let err = archiver
        .compress_dir(work.path().join("source"), &archive, ArchiveFormat::SevenZ)
        .unwrap_err();

    assert!(matches!(err, ArchiverError::Conflict { .. }));
    assert_eq!(fs::read(&archive).unwrap(), before);
}

#[test]
fn test_zip_format() {
    let archiver = require_archiver!();
    let work = TempDir::new().unwrap();
    let source = work.path().join("source");
    fs::create_dir(&source).unwrap();
    fs::write(source.join("z.txt"), "zip me").unwrap();

    let archive = archiver
        .compress_dir(&source, work.path().join("out.zip"), ArchiveFormat::Zip)
        .unwrap();
    let header = fs::read(&archive).unwrap();
    assert_eq!(&header[..2], b"PK");
}

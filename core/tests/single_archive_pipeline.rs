mod common;

use apk_models_core::archive::ArchiveHandle;
use apk_models_core::error::CoreError;
use apk_models_core::validator::manifest::fetch_versions_data;
use apk_models_core::validator::models::{
    fetch_in_use_model_files, find_in_use_model_files, model_sizes, validate_in_use_model_files,
};
use apk_models_core::validator::presence::check_mandatory_items;
use apk_models_core::validator::validate_archive;
use common::*;

#[test]
fn valid_archive_yields_model_version_map() {
    let tmp = tempfile::tempdir().unwrap();
    let p = build_valid_archive(
        tmp.path(),
        "ccu.apk",
        &[("m1", 1, 2, 0), ("m2", 0, 0, 7)],
        "p",
    );
    let versions = validate_archive(&p).unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(versions["m1"], "1.2.0");
    assert_eq!(versions["m2"], "0.0.7");
}

#[test]
fn presence_requires_both_mandatory_items() {
    let tmp = tempfile::tempdir().unwrap();

    let both = tmp.path().join("both.apk");
    write_zip(
        &both,
        &[
            ("assets/assets/75f/models/m1.json", b"{}".to_vec()),
            (MANIFEST, b"{}".to_vec()),
        ],
    );
    assert!(check_mandatory_items(&ArchiveHandle::open(&both).unwrap()));

    let no_models = tmp.path().join("no_models.apk");
    write_zip(&no_models, &[(MANIFEST, b"{}".to_vec())]);
    assert!(!check_mandatory_items(&ArchiveHandle::open(&no_models).unwrap()));

    let no_manifest = tmp.path().join("no_manifest.apk");
    write_zip(&no_manifest, &[(MODEL_DIR, Vec::new())]);
    assert!(!check_mandatory_items(&ArchiveHandle::open(&no_manifest).unwrap()));
}

#[test]
fn missing_manifest_stops_pipeline_at_presence() {
    let tmp = tempfile::tempdir().unwrap();
    let p = tmp.path().join("a.apk");
    write_zip(&p, &[(MODEL_DIR, Vec::new())]);
    match validate_archive(&p) {
        Err(CoreError::MandatoryAssetsMissing { missing }) => {
            assert_eq!(missing, vec![MANIFEST.to_string()])
        }
        other => panic!("expected MandatoryAssetsMissing, got {:?}", other),
    }
}

#[test]
fn record_without_patch_invalidates_whole_manifest() {
    let tmp = tempfile::tempdir().unwrap();
    let p = tmp.path().join("a.apk");
    let manifest = br#"{
        "a": {"id": "m1", "version": {"major": 1, "minor": 0, "patch": 0}},
        "b": {"id": "m2", "version": {"major": 1, "minor": 0}}
    }"#;
    write_zip(
        &p,
        &[
            (MANIFEST, manifest.to_vec()),
            ("assets/assets/75f/models/m1.json", b"{}".to_vec()),
            ("assets/assets/75f/models/m2.json", b"{}".to_vec()),
        ],
    );
    let mut archive = ArchiveHandle::open(&p).unwrap();
    assert!(matches!(
        fetch_versions_data(&mut archive),
        Err(CoreError::ManifestInvalid(_))
    ));
    assert_eq!(validate_archive(&p).unwrap_err().kind(), "MANIFEST_INVALID");
}

#[test]
fn malformed_manifest_json_is_manifest_invalid() {
    let tmp = tempfile::tempdir().unwrap();
    let p = tmp.path().join("a.apk");
    write_zip(
        &p,
        &[(MODEL_DIR, Vec::new()), (MANIFEST, b"{not json".to_vec())],
    );
    assert_eq!(validate_archive(&p).unwrap_err().kind(), "MANIFEST_INVALID");
}

#[test]
fn every_missing_model_file_is_reported() {
    let tmp = tempfile::tempdir().unwrap();
    let p = tmp.path().join("a.apk");
    write_zip(
        &p,
        &[
            (
                MANIFEST,
                manifest_json(&[("A", 1, 0, 0), ("B", 1, 0, 0), ("C", 1, 0, 0)]),
            ),
            ("assets/assets/75f/models/A.json", model_json("A", "x")),
        ],
    );
    let mut archive = ArchiveHandle::open(&p).unwrap();
    let versions = fetch_versions_data(&mut archive).unwrap();
    assert_eq!(
        find_in_use_model_files(&archive, &versions),
        vec!["B".to_string(), "C".to_string()]
    );

    match validate_archive(&p) {
        Err(CoreError::ModelFilesMissing { ids }) => {
            assert_eq!(ids, vec!["B".to_string(), "C".to_string()])
        }
        other => panic!("expected ModelFilesMissing, got {:?}", other),
    }
}

#[test]
fn every_malformed_model_file_is_checked() {
    let tmp = tempfile::tempdir().unwrap();
    let p = tmp.path().join("a.apk");
    write_zip(
        &p,
        &[
            (
                MANIFEST,
                manifest_json(&[("A", 1, 0, 0), ("B", 1, 0, 0), ("C", 1, 0, 0)]),
            ),
            ("assets/assets/75f/models/A.json", b"{broken".to_vec()),
            ("assets/assets/75f/models/B.json", model_json("B", "x")),
            ("assets/assets/75f/models/C.json", b"".to_vec()),
        ],
    );
    let mut archive = ArchiveHandle::open(&p).unwrap();
    let versions = fetch_versions_data(&mut archive).unwrap();
    assert_eq!(
        validate_in_use_model_files(&mut archive, &versions).unwrap(),
        vec!["A".to_string(), "C".to_string()]
    );
    match validate_archive(&p) {
        Err(CoreError::ModelFilesInvalid { ids }) => {
            assert_eq!(ids, vec!["A".to_string(), "C".to_string()])
        }
        other => panic!("expected ModelFilesInvalid, got {:?}", other),
    }
}

#[test]
fn corrupt_archive_aborts_before_any_stage() {
    let tmp = tempfile::tempdir().unwrap();
    let p = tmp.path().join("a.apk");
    std::fs::write(&p, b"PK\x03\x04 truncated").unwrap();
    assert_eq!(validate_archive(&p).unwrap_err().kind(), "ARCHIVE_CORRUPT");
}

#[test]
fn validating_twice_gives_identical_results() {
    let tmp = tempfile::tempdir().unwrap();
    let p = build_valid_archive(tmp.path(), "a.apk", &[("m1", 3, 1, 4)], "p");
    let before = std::fs::read(&p).unwrap();
    let a = validate_archive(&p).unwrap();
    let b = validate_archive(&p).unwrap();
    assert_eq!(a, b);
    assert_eq!(before, std::fs::read(&p).unwrap());
}

#[test]
fn loads_payloads_and_sizes_for_in_use_models() {
    let tmp = tempfile::tempdir().unwrap();
    let p = build_valid_archive(tmp.path(), "a.apk", &[("m1", 1, 0, 0)], "payload");
    let mut archive = ArchiveHandle::open(&p).unwrap();
    let versions = fetch_versions_data(&mut archive).unwrap();

    let payloads = fetch_in_use_model_files(&mut archive, &versions).unwrap();
    assert_eq!(payloads["m1"]["payload"], "payload");

    let sizes = model_sizes(&mut archive, &versions).unwrap();
    assert_eq!(sizes["m1"], model_json("m1", "payload").len() as u64);
}

#[test]
fn unreadable_model_entry_is_not_reported_as_invalid_json() {
    let tmp = tempfile::tempdir().unwrap();
    let p = tmp.path().join("a.apk");
    // Method 12 (bzip2) is not enabled in this build.
    write_zip_with_method(
        &p,
        &[
            (MANIFEST, manifest_json(&[("A", 1, 0, 0), ("B", 1, 0, 0)])),
            ("assets/assets/75f/models/A.json", model_json("A", "x")),
            ("assets/assets/75f/models/B.json", model_json("B", "x")),
        ],
        "assets/assets/75f/models/B.json",
        12,
    );

    let mut archive = ArchiveHandle::open(&p).unwrap();
    let versions = fetch_versions_data(&mut archive).unwrap();
    let err = validate_in_use_model_files(&mut archive, &versions).unwrap_err();
    assert!(
        matches!(err, CoreError::Zip(_) | CoreError::Io(_)),
        "unexpected error {:?}",
        err
    );

    let kind = validate_archive(&p).unwrap_err().kind();
    assert!(kind == "ZIP" || kind == "IO", "unexpected kind {}", kind);
}

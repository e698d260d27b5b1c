#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

pub const MODEL_DIR: &str = "assets/assets/75f/models/";
pub const MANIFEST: &str = "assets/assets/75f/versions.json";

pub fn write_zip(path: &Path, entries: &[(&str, Vec<u8>)]) {
    let f = File::create(path).unwrap();
    let mut zw = ZipWriter::new(f);
    let opts = FileOptions::<()>::default().compression_method(CompressionMethod::Deflated);
    for (name, bytes) in entries {
        if name.ends_with('/') {
            zw.add_directory(*name, opts).unwrap();
            continue;
        }
        zw.start_file(*name, opts).unwrap();
        zw.write_all(bytes).unwrap();
    }
    zw.finish().unwrap();
}

/// Manifest JSON for (id, major, minor, patch) records.
pub fn manifest_json(models: &[(&str, i64, i64, i64)]) -> Vec<u8> {
    let mut m = serde_json::Map::new();
    for (idx, (id, major, minor, patch)) in models.iter().enumerate() {
        m.insert(
            format!("group_{}", idx),
            serde_json::json!({
                "id": id,
                "version": {"major": major, "minor": minor, "patch": patch}
            }),
        );
    }
    serde_json::to_vec(&serde_json::Value::Object(m)).unwrap()
}

pub fn model_json(id: &str, payload: &str) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({"id": id, "payload": payload})).unwrap()
}

/// A well-formed archive where every manifest model has a valid file.
pub fn build_valid_archive(
    dir: &Path,
    name: &str,
    models: &[(&str, i64, i64, i64)],
    payload: &str,
) -> PathBuf {
    let path = dir.join(name);
    let mut entries: Vec<(String, Vec<u8>)> = vec![
        (MODEL_DIR.to_string(), Vec::new()),
        (MANIFEST.to_string(), manifest_json(models)),
        ("classes.dex".to_string(), b"dex".to_vec()),
    ];
    for (id, ..) in models {
        entries.push((format!("{}{}.json", MODEL_DIR, id), model_json(id, payload)));
    }
    let refs: Vec<(&str, Vec<u8>)> = entries
        .iter()
        .map(|(n, b)| (n.as_str(), b.clone()))
        .collect();
    write_zip(&path, &refs);
    path
}

/// Stored (uncompressed) zip with the compression method of `entry`
/// rewritten to `method` in both its local and central headers.
pub fn write_zip_with_method(path: &Path, entries: &[(&str, Vec<u8>)], entry: &str, method: u16) {
    let mut buf = std::io::Cursor::new(Vec::new());
    {
        let mut zw = ZipWriter::new(&mut buf);
        let opts = FileOptions::<()>::default().compression_method(CompressionMethod::Stored);
        for (name, bytes) in entries {
            zw.start_file(*name, opts).unwrap();
            zw.write_all(bytes).unwrap();
        }
        zw.finish().unwrap();
    }
    let mut bytes = buf.into_inner();
    let name = entry.as_bytes();
    let m = method.to_le_bytes();
    let mut i = 0;
    while i + 4 <= bytes.len() {
        let sig = &bytes[i..i + 4];
        let (name_len_at, name_at, method_at) = if sig == b"PK\x03\x04" {
            (i + 26, i + 30, i + 8)
        } else if sig == b"PK\x01\x02" {
            (i + 28, i + 46, i + 10)
        } else {
            i += 1;
            continue;
        };
        let name_len = u16::from_le_bytes([bytes[name_len_at], bytes[name_len_at + 1]]) as usize;
        if bytes.get(name_at..name_at + name_len) == Some(name) {
            bytes[method_at] = m[0];
            bytes[method_at + 1] = m[1];
        }
        i += 4;
    }
    std::fs::write(path, bytes).unwrap();
}

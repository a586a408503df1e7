// Each test binary uses a different subset of these fixtures.
#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

/// Builds an in-memory zip package from `(path, content)` pairs, in order.
pub fn build_package(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

pub fn manifest_with_title(title: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest identifier="cctd0001" xmlns="http://www.imsglobal.org/xsd/imsccv1p1/imscp_v1p1">
  <metadata>
    <schema>IMS Common Cartridge</schema>
    <lom><general><title>{}</title></general></lom>
  </metadata>
  <resources/>
</manifest>"#,
        title
    )
}

pub fn module_descriptor(title: &str, objectives: usize, assignments: usize, quizzes: usize) -> String {
    let mut xml = format!("<module>\n  <title>{}</title>\n", title);
    for i in 0..objectives {
        xml.push_str(&format!("  <learning_outcome id=\"lo{}\">Outcome</learning_outcome>\n", i));
    }
    for i in 0..assignments {
        xml.push_str(&format!("  <assignment id=\"a{}\">Task</assignment>\n", i));
    }
    for i in 0..quizzes {
        xml.push_str(&format!("  <quiz id=\"q{}\">Check</quiz>\n", i));
    }
    xml.push_str("</module>\n");
    xml
}

/// Like [`build_package`], but entries are stored uncompressed and one byte of
/// `damaged`'s content is flipped, so its checksum no longer matches.
pub fn build_damaged_package(entries: &[(&str, &str)], damaged: &str) -> Vec<u8> {
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        zip.start_file(*name, stored).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    let mut bytes = zip.finish().unwrap().into_inner();

    let (_, content) = entries.iter().find(|(name, _)| *name == damaged).unwrap();
    let payload = content.as_bytes();
    let offset = bytes
        .windows(payload.len())
        .position(|window| window == payload)
        .unwrap();
    bytes[offset + payload.len() / 2] ^= 0x20;
    bytes
}

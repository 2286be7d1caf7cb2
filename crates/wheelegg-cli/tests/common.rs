#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::Command;

use serde_json::Value;

pub fn write_wheel(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).expect("create wheel");
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::FileOptions::default();
    for (name, contents) in entries {
        writer.start_file(*name, options).expect("start entry");
        writer.write_all(contents.as_bytes()).expect("write entry");
    }
    writer.finish().expect("finish wheel");
}

pub fn find_python() -> Option<String> {
    for candidate in ["python3", "python"] {
        let ok = Command::new(candidate)
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false);
        if ok {
            return Some(candidate.to_string());
        }
    }
    None
}

pub fn parse_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).expect("json envelope")
}

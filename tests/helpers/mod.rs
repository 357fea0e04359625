#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Path to a checked-in capture under tests/fixtures
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn sample_capture() -> PathBuf {
    fixture_path("kismet-sample.netxml")
}

/// Wrap `body` in a detection-run root with the usual header
pub fn detection_run(body: &str) -> String {
    format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n",
            "<!DOCTYPE detection-run SYSTEM \"http://kismetwireless.net/kismet-3.1.0.dtd\">\n",
            "<detection-run kismet-version=\"2016.07.R1\" start-time=\"Tue May  5 05:15:05 2015\">\n",
            "{}\n",
            "</detection-run>\n"
        ),
        body
    )
}

/// Temporary directory holding generated captures
pub struct CaptureDir {
    pub temp_dir: TempDir,
}

impl CaptureDir {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            temp_dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `contents` to `name` inside the directory
    pub fn write(&self, name: &str, contents: &str) -> anyhow::Result<PathBuf> {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents)?;
        Ok(path)
    }
}

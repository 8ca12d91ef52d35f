#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const CATALOG: &str = r#"
[session]
rest_seconds = 90
stretch_seconds = 0

[storage]
data_dir = "data"

[[plate_set]]
id = "olympic"
bar_weight = 20.0
plates = [25.0, 20.0, 15.0, 10.0, 5.0, 2.5, 2.5, 1.25, 1.25]

[[exercise]]
id = "squat"
name = "Back squat"
equipment = "barbell"
reps = [5, 8]
base_increment = 5.0
rounding = 2.5
micro_step = 2.5
plate_set = "olympic"
start_weight = 95.0

[[exercise]]
id = "curl"
name = "Curl"
equipment = "dumbbell"
reps = [8, 12]
base_increment = 2.0
rounding = 1.0
start_weight = 12.0

[[workout]]
id = "lower"
exercises = [{ exercise = "squat", sets = 3 }, { exercise = "curl", sets = 2 }]
"#;

pub fn write_config(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("overload.toml");
    fs::write(&path, body).unwrap();
    path
}

/// `overload --config <catalog>` in a fresh temp dir.
pub fn overload(cfg: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("overload").unwrap();
    cmd.arg("--config").arg(cfg);
    cmd.env_remove("RUST_LOG");
    cmd
}

pub fn run_ok(cfg: &PathBuf, args: &[&str]) -> String {
    let out = overload(cfg).args(args).output().unwrap();
    assert!(
        out.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8(out.stdout).unwrap()
}

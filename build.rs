//! Stamps the commit and build time read by `src/build_info.rs`.
//!
//! Both values can be pinned from the environment for reproducible builds.

use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

const COMMIT_VAR: &str = "PANETRACK_BUILD_GIT_HASH";
const TIMESTAMP_VAR: &str = "PANETRACK_BUILD_TIMESTAMP";

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads");
    for var in [COMMIT_VAR, TIMESTAMP_VAR] {
        println!("cargo:rerun-if-env-changed={var}");
    }

    let commit = std::env::var(COMMIT_VAR)
        .ok()
        .or_else(|| stdout_of("git", &["rev-parse", "--short=12", "HEAD"]))
        .unwrap_or_else(|| "unknown".into());
    let built = std::env::var(TIMESTAMP_VAR)
        .ok()
        .or_else(|| stdout_of("date", &["-u", "+%Y-%m-%dT%H:%M:%SZ"]))
        .unwrap_or_else(unix_seconds);

    println!("cargo:rustc-env={COMMIT_VAR}={commit}");
    println!("cargo:rustc-env={TIMESTAMP_VAR}={built}");
}

fn stdout_of(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (output.status.success() && !text.is_empty()).then(|| text.to_string())
}

fn unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or_else(|_| "unknown".into(), |d| format!("unix:{}", d.as_secs()))
}

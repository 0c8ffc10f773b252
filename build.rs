use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

/// Exposes `LINKAPPS_VERSION` to the crate, taken from the nearest git tag.
fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    println!("cargo:rustc-env=LINKAPPS_VERSION={}", describe());
}

fn describe() -> String {
    let tag = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().trim_start_matches('v').to_string());

    match tag {
        Some(tag) if !tag.is_empty() && !tag.ends_with("-dirty") => tag,
        // Dirty trees carry the build timestamp
        Some(tag) if !tag.is_empty() => format!("{}-{}", tag, build_stamp()),
        _ => format!("0.0.0-unknown-{}", build_stamp()),
    }
}

fn build_stamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

use std::process::Command;

// Embeds `git describe` output as TASKER_VERSION, falling back to the package version.
fn main() {
    let version = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| {
            let described = String::from_utf8_lossy(&out.stdout).trim().to_string();
            let described = described.trim_start_matches('v').to_string();
            (!described.is_empty()).then_some(described)
        })
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").into());

    println!("cargo:rustc-env=TASKER_VERSION={version}");
}

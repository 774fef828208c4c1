use std::process::Command;

/// Exposes the latest release tag as `KAWADI_GIT_TAG` so the header can show it.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");

    let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--abbrev=0"])
        .output()
    else {
        return;
    };
    if !output.status.success() {
        return;
    }
    let tag = String::from_utf8_lossy(&output.stdout);
    let tag = tag.trim();
    if !tag.is_empty() {
        println!("cargo:rustc-env=KAWADI_GIT_TAG={tag}");
    }
}

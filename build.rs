use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");

    let commit = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|hash| hash.trim().to_string())
        .filter(|hash| !hash.is_empty());
    if let Some(commit) = commit {
        println!("cargo:rustc-env=FINANCE_STORE_COMMIT={commit}");
    }

    if let Ok(profile) = std::env::var("PROFILE") {
        println!("cargo:rustc-env=FINANCE_STORE_PROFILE={profile}");
    }
}

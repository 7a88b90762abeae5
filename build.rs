use std::process::Command;

fn git(args: &[&str]) -> String {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_default()
}

fn main() {
    // Exact tag on HEAD means a release build.
    let release = git(&["describe", "--tags", "--exact-match"]);
    let latest = git(&["describe", "--tags", "--abbrev=0"]);

    let version = if !release.is_empty() {
        format!("release {release}")
    } else if latest.is_empty() {
        "development".to_string()
    } else {
        match git(&["rev-list", "--count", &format!("{latest}..HEAD")]) {
            ahead if ahead.is_empty() => format!("development branch ahead of {latest}"),
            ahead => format!("development branch {ahead} commits ahead of {latest}"),
        }
    };

    println!("cargo:rustc-env=BUILD_VERSION={version}");
}

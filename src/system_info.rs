use git_version::git_version;

// include -modified if the working tree has uncommitted changes
const COMMIT: &str = git_version!(
    args = ["--abbrev=10", "--always", "--dirty=-modified"],
    fallback = "unknown"
);

/// One-line build description served by the info endpoint.
pub fn get_system_info() -> String {
    let profile = if cfg!(debug_assertions) {
        "Dev"
    } else {
        "Release"
    };
    let version = option_env!("BUILD_VERSION")
        .filter(|v| !v.is_empty())
        .unwrap_or("development");

    format!(
        "{} {} - {}\nCommit: {}\n{} build",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        version,
        COMMIT,
        profile
    )
}

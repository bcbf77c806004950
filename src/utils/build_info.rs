/// Version and build details embedded at compile time.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    /// Short commit hash, when built from a git checkout.
    pub commit: Option<&'static str>,
    pub profile: Option<&'static str>,
}

impl BuildMetadata {
    /// `0.1.0`, `0.1.0 (abc1234)` or `0.1.0 (abc1234, release)`.
    pub fn summary(&self) -> String {
        let details: Vec<&str> = [self.commit, self.profile].into_iter().flatten().collect();
        if details.is_empty() {
            self.version.to_string()
        } else {
            format!("{} ({})", self.version, details.join(", "))
        }
    }
}

pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        commit: option_env!("FINANCE_STORE_COMMIT"),
        profile: option_env!("FINANCE_STORE_PROFILE"),
    }
}

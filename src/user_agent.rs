//! User-Agent string sent with release metadata requests.
//!
//! Release APIs reject anonymous clients, so every request identifies the
//! app, its version and the platform it runs on.

/// Default User-Agent (`lampa-desktop/<version> (<os>; <arch>)`).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!(
        "lampa-desktop/{version} ({}; {})",
        platform_label(),
        std::env::consts::ARCH
    )
}

/// Human-readable OS label used in the User-Agent and reported over the bridge.
#[must_use]
pub(crate) fn platform_label() -> &'static str {
    match std::env::consts::OS {
        "linux" => "Linux",
        "macos" => "macOS",
        "windows" => "Windows",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_contains_crate_version() {
        let ua = default_user_agent();
        assert_eq!(
            env!("CARGO_PKG_VERSION"),
            ua.strip_prefix("lampa-desktop/")
                .and_then(|s| s.split(' ').next())
                .unwrap_or_default(),
            "UA must contain crate version: {ua}"
        );
    }

    #[test]
    fn test_user_agent_names_platform_and_arch() {
        let ua = default_user_agent();
        assert!(ua.contains(platform_label()), "UA must name the OS: {ua}");
        assert!(ua.contains(std::env::consts::ARCH), "UA must name the arch: {ua}");
    }
}

//! Hosting-platform detection from environment sentinels.

use std::fmt;

use crate::env::Environment;

/// Sentinel variables checked in priority order. The first present,
/// non-blank entry wins; platforms that inject several of these (proxied
/// builds) therefore resolve deterministically.
const SENTINELS: &[(&str, RuntimeProfile)] = &[
    ("RAILWAY_ENVIRONMENT", RuntimeProfile::Railway),
    ("RENDER", RuntimeProfile::Render),
    ("VERCEL", RuntimeProfile::Vercel),
];

/// Hosting platform the process is executing under, or [`RuntimeProfile::Generic`]
/// for local and unrecognised environments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeProfile {
    /// Railway managed deployment.
    Railway,
    /// Render managed deployment.
    Render,
    /// Vercel serverless deployment.
    Vercel,
    /// Local development or an unrecognised host.
    Generic,
}

impl RuntimeProfile {
    /// Derive the profile from the environment snapshot. Total: absence of
    /// every sentinel is the expected local/dev case, not a failure.
    #[must_use]
    pub fn detect(env: &Environment) -> Self {
        SENTINELS
            .iter()
            .find(|(name, _)| env.is_set(name))
            .map_or(Self::Generic, |(_, profile)| *profile)
    }

    /// Lowercase label used in logs and health payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Railway => "railway",
            Self::Render => "render",
            Self::Vercel => "vercel",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for RuntimeProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_falls_back_to_generic() {
        let env = Environment::from_pairs([("PATH", "/usr/bin")]);
        assert_eq!(RuntimeProfile::detect(&env), RuntimeProfile::Generic);
    }

    #[test]
    fn detect_matches_each_sentinel() {
        let railway = Environment::from_pairs([("RAILWAY_ENVIRONMENT", "production")]);
        assert_eq!(RuntimeProfile::detect(&railway), RuntimeProfile::Railway);

        let render = Environment::from_pairs([("RENDER", "1")]);
        assert_eq!(RuntimeProfile::detect(&render), RuntimeProfile::Render);

        let vercel = Environment::from_pairs([("VERCEL", "1")]);
        assert_eq!(RuntimeProfile::detect(&vercel), RuntimeProfile::Vercel);
    }

    #[test]
    fn detect_honours_priority_order() {
        let env = Environment::from_pairs([("VERCEL", "1"), ("RAILWAY_ENVIRONMENT", "production")]);
        assert_eq!(RuntimeProfile::detect(&env), RuntimeProfile::Railway);
    }

    #[test]
    fn blank_sentinel_is_ignored() {
        let env = Environment::from_pairs([("RENDER", ""), ("VERCEL", "1")]);
        assert_eq!(RuntimeProfile::detect(&env), RuntimeProfile::Vercel);
    }

    #[test]
    fn profile_labels_are_stable() {
        assert_eq!(RuntimeProfile::Railway.as_str(), "railway");
        assert_eq!(RuntimeProfile::Generic.to_string(), "generic");
    }
}

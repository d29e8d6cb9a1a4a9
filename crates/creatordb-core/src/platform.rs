use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the two social platforms this system ingests.
///
/// The lowercase string form (`"instagram"` / `"linkedin"`) is used in URLs,
/// API paths, and database columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Linkedin,
}

#[derive(Debug, Error)]
#[error("unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

impl Platform {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Linkedin => "linkedin",
        }
    }

    /// The platform's canonical web origin, used as a referer when fetching
    /// its CDN assets.
    #[must_use]
    pub const fn web_origin(self) -> &'static str {
        match self {
            Platform::Instagram => "https://www.instagram.com/",
            Platform::Linkedin => "https://www.linkedin.com/",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "instagram" => Ok(Platform::Instagram),
            "linkedin" => Ok(Platform::Linkedin),
            other => Err(UnknownPlatform(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_str_round_trips_through_from_str() {
        for platform in [Platform::Instagram, Platform::Linkedin] {
            assert_eq!(platform.as_str().parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!("Instagram".parse::<Platform>().unwrap(), Platform::Instagram);
        assert_eq!("LINKEDIN".parse::<Platform>().unwrap(), Platform::Linkedin);
    }

    #[test]
    fn from_str_rejects_unknown_platform() {
        assert!("facebook".parse::<Platform>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_form() {
        let json = serde_json::to_string(&Platform::Instagram).unwrap();
        assert_eq!(json, "\"instagram\"");
    }
}

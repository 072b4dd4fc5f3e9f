use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque Spotify artist identifier, extracted from a validated profile URL.
///
/// The identity is the key under which a roster record is stored, so it is
/// immutable once resolved and compares byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtistIdentity(String);

impl ArtistIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtistIdentity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A profile URL that has passed validation, together with the identity
/// segment extracted from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl {
    raw: String,
    identity: ArtistIdentity,
}

impl ValidatedUrl {
    pub fn identity(&self) -> &ArtistIdentity {
        &self.identity
    }

    /// The canonical web form of the profile URL, regardless of whether the
    /// user pasted the `spotify:artist:` URI form. This is what gets persisted.
    pub fn canonical_url(&self) -> String {
        format!("https://open.spotify.com/artist/{}", self.identity)
    }
}

/// Error returned when an input string is not a Spotify artist URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Malformed(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValidationError::Malformed(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validates a Spotify artist profile URL and extracts the artist identity.
///
/// Accepts both forms Spotify hands out:
/// - `https://open.spotify.com/artist/4iHNK0tOyZPYnBU7nGAgpQ` (an optional
///   `?si=...` query string is tolerated)
/// - `spotify:artist:4iHNK0tOyZPYnBU7nGAgpQ`
///
/// Pure and deterministic; performs no network or state access.
///
/// # Examples
///
/// ```
/// use talentbook::catalog::validate_artist_url;
///
/// let url = validate_artist_url("https://open.spotify.com/artist/abc123").unwrap();
/// assert_eq!(url.identity().as_str(), "abc123");
/// assert!(validate_artist_url("https://example.com/artist/abc123").is_err());
/// ```
pub fn validate_artist_url(input: &str) -> Result<ValidatedUrl, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Malformed(
            "Please enter a Spotify artist URL".to_string(),
        ));
    }

    let patterns = [
        r"^https://open\.spotify\.com/artist/([a-zA-Z0-9]+)(?:\?.*)?$",
        r"^spotify:artist:([a-zA-Z0-9]+)$",
    ];

    for pattern in patterns {
        let re = Regex::new(pattern).unwrap();
        if let Some(captures) = re.captures(trimmed) {
            let identity = ArtistIdentity(captures[1].to_string());
            return Ok(ValidatedUrl {
                raw: trimmed.to_string(),
                identity,
            });
        }
    }

    Err(ValidationError::Malformed(
        "Not a valid Spotify artist URL (expected https://open.spotify.com/artist/...)"
            .to_string(),
    ))
}

impl fmt::Display for ValidatedUrl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

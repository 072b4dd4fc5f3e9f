use crate::catalog::{ArtistIdentity, ArtistPreview, ValidatedUrl};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A committed roster entry.
///
/// Created exactly once per distinct identity by a successful commit and
/// never mutated or deleted afterwards.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ArtistRecord {
    pub identity: ArtistIdentity,
    pub display_name: String,
    pub profile_url: String,
    pub image_url: Option<String>,
    pub genres: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ArtistRecord {
    /// Builds the durable record from a confirmed preview. The persisted
    /// profile URL is always the canonical web form, even when the user
    /// pasted the `spotify:artist:` URI.
    pub fn from_preview(preview: &ArtistPreview, url: &ValidatedUrl) -> Self {
        Self {
            identity: preview.identity.clone(),
            display_name: preview.display_name.clone(),
            profile_url: url.canonical_url(),
            image_url: preview.image_url.clone(),
            genres: preview.genres.clone(),
            created_at: Utc::now(),
        }
    }
}

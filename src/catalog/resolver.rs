/// This module resolves a validated artist URL into previewable metadata.
///
/// Resolution combines two read-only lookups into a single round trip from
/// the caller's point of view: the catalog query for canonical metadata and
/// an advisory roster existence check. The existence flag only saves the
/// user a wasted confirmation; the authoritative duplicate check happens at
/// commit time inside the store.
use crate::catalog::{ArtistIdentity, ResolveError, ValidatedUrl};
use crate::configuration::CatalogSettings;
use crate::foundation::database::Roster;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::Arc;

/// Unconfirmed artist metadata shown to the user before persistence.
///
/// Ephemeral: scoped to one workflow run, discarded on abandon or commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistPreview {
    pub identity: ArtistIdentity,
    pub display_name: String,
    pub image_url: Option<String>,
    pub genres: Vec<String>,
    pub already_exists: bool,
}

/// Resolves a validated profile URL into an [`ArtistPreview`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    async fn resolve(&self, url: &ValidatedUrl) -> Result<ArtistPreview, ResolveError>;
}

/// Response from the Spotify token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Artist object as returned by the Spotify Web API.
#[derive(Debug, Deserialize)]
struct CatalogArtist {
    name: String,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default)]
    images: Vec<CatalogImage>,
}

#[derive(Debug, Deserialize)]
struct CatalogImage {
    url: String,
}

/// [`MetadataResolver`] backed by the Spotify Web API.
pub struct SpotifyResolver {
    client: Client,
    settings: CatalogSettings,
    roster: Arc<dyn Roster>,
}

impl SpotifyResolver {
    pub fn new(settings: CatalogSettings, roster: Arc<dyn Roster>) -> Self {
        Self {
            client: Client::new(),
            settings,
            roster,
        }
    }

    /// Obtains a short-lived bearer token via the client-credentials flow.
    async fn fetch_token(&self) -> Result<String, ResolveError> {
        let response = self
            .client
            .post(&self.settings.token_url)
            .basic_auth(&self.settings.client_id, Some(&self.settings.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ResolveError::Unavailable(format!(
                "token request failed with status {}",
                response.status()
            )));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    async fn fetch_artist(
        &self,
        token: &str,
        identity: &ArtistIdentity,
    ) -> Result<CatalogArtist, ResolveError> {
        let artist_url = format!("{}/artists/{}", self.settings.api_base_url, identity);

        let response = self
            .client
            .get(&artist_url)
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let body: serde_json::Value = response.json().await?;
                Ok(serde_json::from_value(body)?)
            }
            // the API answers 400 for syntactically off ids and 404 for
            // unknown ones; both mean "no such artist" to the user
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => Err(ResolveError::NotFound),
            status => Err(ResolveError::Unavailable(format!(
                "catalog request failed with status {}",
                status
            ))),
        }
    }
}

#[async_trait]
impl MetadataResolver for SpotifyResolver {
    async fn resolve(&self, url: &ValidatedUrl) -> Result<ArtistPreview, ResolveError> {
        let identity = url.identity().clone();

        let token = self.fetch_token().await?;
        let artist = self.fetch_artist(&token, &identity).await?;
        let already_exists = self.roster.exists(&identity).await?;

        Ok(ArtistPreview {
            identity,
            display_name: artist.name,
            image_url: artist.images.into_iter().next().map(|image| image.url),
            genres: artist.genres,
            already_exists,
        })
    }
}

mod resolve_error;
mod resolver;
mod url;

pub use resolve_error::ResolveError;
pub use resolver::{ArtistPreview, MetadataResolver, SpotifyResolver};
pub use url::{validate_artist_url, ArtistIdentity, ValidatedUrl, ValidationError};

#[cfg(test)]
pub use resolver::MockMetadataResolver;

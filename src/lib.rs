pub mod catalog;
pub mod configuration;
pub mod export;
pub mod foundation;
pub mod startup;
pub mod workflow;

pub use catalog::{validate_artist_url, ArtistPreview, MetadataResolver, SpotifyResolver};
pub use configuration::*;
pub use export::export_roster;
pub use foundation::database::*;
pub use workflow::{PreviewWorkflow, WorkflowState};

mod models;
mod roster;

pub use models::ArtistRecord;
pub use roster::{open_database, Roster, RosterError, SledRoster};

#[cfg(test)]
pub use roster::MockRoster;

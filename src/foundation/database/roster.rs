use crate::catalog::ArtistIdentity;
use crate::foundation::database::ArtistRecord;
use async_trait::async_trait;
use sled::Db;
use std::fmt;
use std::io;

/// Store-level failures surfaced by [`Roster`] operations.
#[derive(Debug)]
pub enum RosterError {
    /// A record with the same identity is already present.
    Conflict,
    /// The store could not be reached or the stored bytes were unreadable.
    Unavailable(String),
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RosterError::Conflict => write!(f, "Artist is already on the roster"),
            RosterError::Unavailable(msg) => write!(f, "Roster store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for RosterError {}

impl From<sled::Error> for RosterError {
    fn from(error: sled::Error) -> Self {
        RosterError::Unavailable(error.to_string())
    }
}

impl From<bincode::Error> for RosterError {
    fn from(error: bincode::Error) -> Self {
        RosterError::Unavailable(error.to_string())
    }
}

/// The persistent collection of committed artist records.
///
/// Append-only from the workflow's perspective: records are inserted once
/// per identity and never updated or removed. `insert_if_absent` is the
/// authoritative duplicate check and must be atomic; `exists` is only the
/// advisory pre-check shown alongside the preview.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Roster: Send + Sync {
    async fn exists(&self, identity: &ArtistIdentity) -> Result<bool, RosterError>;
    async fn insert_if_absent(&self, record: ArtistRecord) -> Result<(), RosterError>;
    async fn list_all(&self) -> Result<Vec<ArtistRecord>, RosterError>;
}

/// Opens a roster database at the specified path.
///
/// Creates a new database or opens an existing one. A friendly wrapper
/// around `sled::open` that converts the error to a standard IO error.
///
/// # Examples
///
/// ```no_run
/// use talentbook::open_database;
/// let db = open_database("/path/to/roster_db").unwrap();
/// ```
pub fn open_database(path: &str) -> io::Result<Db> {
    sled::open(path).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

/// [`Roster`] backed by a local sled database.
///
/// Records are keyed by artist identity and bincode-serialized, so one key
/// can hold at most one record and `compare_and_swap` against an absent key
/// gives the atomic insert-if-absent the workflow relies on.
pub struct SledRoster {
    db: Db,
}

impl SledRoster {
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Roster for SledRoster {
    async fn exists(&self, identity: &ArtistIdentity) -> Result<bool, RosterError> {
        Ok(self.db.contains_key(identity.as_str().as_bytes())?)
    }

    async fn insert_if_absent(&self, record: ArtistRecord) -> Result<(), RosterError> {
        let key = record.identity.as_str().as_bytes().to_vec();
        let serialized = bincode::serialize(&record)?;

        let swap = self
            .db
            .compare_and_swap(key, None::<&[u8]>, Some(serialized))?;

        match swap {
            Ok(()) => {
                self.db.flush_async().await?;
                Ok(())
            }
            Err(_) => Err(RosterError::Conflict),
        }
    }

    async fn list_all(&self) -> Result<Vec<ArtistRecord>, RosterError> {
        let mut records = Vec::new();
        for entry in self.db.iter() {
            let (_, value) = entry?;
            records.push(bincode::deserialize(&value)?);
        }
        // sled iterates in key order; present the roster oldest-first instead
        records.sort_by(|a: &ArtistRecord, b: &ArtistRecord| a.created_at.cmp(&b.created_at));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::validate_artist_url;
    use chrono::Utc;
    use tempfile::tempdir;

    fn record(id: &str, name: &str) -> ArtistRecord {
        let url = validate_artist_url(&format!("https://open.spotify.com/artist/{}", id)).unwrap();
        ArtistRecord {
            identity: url.identity().clone(),
            display_name: name.to_string(),
            profile_url: url.canonical_url(),
            image_url: None,
            genres: vec!["pop".to_string()],
            created_at: Utc::now(),
        }
    }

    fn open_test_roster(dir: &tempfile::TempDir) -> SledRoster {
        let binding = dir.path().join("test_db");
        let db = open_database(binding.to_str().unwrap()).unwrap();
        SledRoster::new(db)
    }

    #[test]
    fn test_open_database() {
        let temp_dir = tempdir().unwrap();
        let binding = temp_dir.path().join("test_db");
        let db_path = binding.to_str().unwrap();

        let result = open_database(db_path);
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_insert_and_list() {
        let temp_dir = tempdir().unwrap();
        let roster = open_test_roster(&temp_dir);

        let record = record("abc123", "Test Artist");
        roster.insert_if_absent(record.clone()).await.unwrap();

        let records = roster.list_all().await.unwrap();
        assert_eq!(records, vec![record]);
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_conflict() {
        let temp_dir = tempdir().unwrap();
        let roster = open_test_roster(&temp_dir);

        roster
            .insert_if_absent(record("abc123", "Test Artist"))
            .await
            .unwrap();

        let result = roster
            .insert_if_absent(record("abc123", "Same Artist Again"))
            .await;
        assert!(matches!(result, Err(RosterError::Conflict)));

        // the losing write must not have changed anything
        let records = roster.list_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].display_name, "Test Artist");
    }

    #[tokio::test]
    async fn test_exists() {
        let temp_dir = tempdir().unwrap();
        let roster = open_test_roster(&temp_dir);

        let record = record("abc123", "Test Artist");
        assert!(!roster.exists(&record.identity).await.unwrap());

        roster.insert_if_absent(record.clone()).await.unwrap();
        assert!(roster.exists(&record.identity).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_all_empty_roster() {
        let temp_dir = tempdir().unwrap();
        let roster = open_test_roster(&temp_dir);

        let records = roster.list_all().await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_distinct_identities_both_stored() {
        let temp_dir = tempdir().unwrap();
        let roster = open_test_roster(&temp_dir);

        roster
            .insert_if_absent(record("abc123", "First Artist"))
            .await
            .unwrap();
        roster
            .insert_if_absent(record("def456", "Second Artist"))
            .await
            .unwrap();

        let records = roster.list_all().await.unwrap();
        assert_eq!(records.len(), 2);
    }
}

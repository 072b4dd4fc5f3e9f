/// This module owns the preview/commit state machine.
///
/// One workflow instance drives one user session: validate a pasted URL,
/// resolve it against the catalog, show the preview, and persist the record
/// only after an explicit confirmation. The machine, not the caller, decides
/// which triggers are valid in which state, and it issues at most one
/// outstanding request at a time.
use crate::catalog::{
    validate_artist_url, ArtistPreview, MetadataResolver, ValidatedUrl, ValidationError,
};
use crate::foundation::database::{ArtistRecord, Roster};
use crate::workflow::WorkflowError;
use std::sync::{Arc, Mutex, MutexGuard};

/// Where a workflow run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// Waiting for a URL. The only state that accepts `submit_url`.
    Idle,
    /// A resolution round trip is in flight.
    Resolving,
    /// A preview is on display. Commit is only allowed when `exists` is false.
    Previewed { exists: bool },
    /// The artist was already on file; terminal for this run.
    Blocked,
    /// A commit round trip is in flight. Further confirms are ignored.
    Committing,
    /// The record was persisted; terminal for this run.
    Committed,
    /// The run failed; see `last_error`. Exit via `reset`.
    Failed,
}

struct Inner {
    state: WorkflowState,
    url: Option<ValidatedUrl>,
    preview: Option<ArtistPreview>,
    last_error: Option<WorkflowError>,
    // Bumped on every submit and reset. A response carrying a stale attempt
    // number must not apply a transition.
    attempt: u64,
}

/// The preview/commit workflow for a single user session.
///
/// Collaborators are injected so the machine can be driven against test
/// doubles; the store's `insert_if_absent` remains the authoritative
/// duplicate check even when the preview said the artist was new.
pub struct PreviewWorkflow {
    resolver: Arc<dyn MetadataResolver>,
    roster: Arc<dyn Roster>,
    inner: Mutex<Inner>,
}

impl PreviewWorkflow {
    pub fn new(resolver: Arc<dyn MetadataResolver>, roster: Arc<dyn Roster>) -> Self {
        Self {
            resolver,
            roster,
            inner: Mutex::new(Inner {
                state: WorkflowState::Idle,
                url: None,
                preview: None,
                last_error: None,
                attempt: 0,
            }),
        }
    }

    // The lock is never held across an await.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    pub fn state(&self) -> WorkflowState {
        self.lock().state
    }

    pub fn preview(&self) -> Option<ArtistPreview> {
        self.lock().preview.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.as_ref().map(ToString::to_string)
    }

    /// Validates the input and, from `Idle`, resolves it into a preview.
    ///
    /// A validation failure is returned to the caller and leaves the machine
    /// in `Idle`; the resolver is never invoked for malformed input. Outside
    /// `Idle` the trigger is ignored. Resolution failures land in `Failed`
    /// and are never retried here.
    pub async fn submit_url(&self, input: &str) -> Result<(), ValidationError> {
        let url = validate_artist_url(input)?;

        let attempt = {
            let mut inner = self.lock();
            if inner.state != WorkflowState::Idle {
                return Ok(());
            }
            inner.state = WorkflowState::Resolving;
            inner.url = Some(url.clone());
            inner.preview = None;
            inner.last_error = None;
            inner.attempt += 1;
            inner.attempt
        };

        let result = self.resolver.resolve(&url).await;

        let mut inner = self.lock();
        if inner.attempt != attempt || inner.state != WorkflowState::Resolving {
            // the session moved on while we were waiting; drop the result
            return Ok(());
        }
        match result {
            Ok(preview) => {
                inner.state = WorkflowState::Previewed {
                    exists: preview.already_exists,
                };
                inner.preview = Some(preview);
            }
            Err(e) => {
                inner.state = WorkflowState::Failed;
                inner.last_error = Some(WorkflowError::Resolve(e));
            }
        }
        Ok(())
    }

    /// Commits the current preview to the roster.
    ///
    /// Only valid in `Previewed { exists: false }`. When the preview said the
    /// artist is already on file, the run moves to `Blocked` without touching
    /// the store. Everywhere else, including while a commit is already in
    /// flight, the trigger is a no-op, so rapid repeated confirms produce at
    /// most one store write. A `Conflict` from the store wins over the
    /// advisory preview flag and fails the run.
    pub async fn confirm_commit(&self) {
        let (attempt, record) = {
            let mut inner = self.lock();
            match inner.state {
                WorkflowState::Previewed { exists: true } => {
                    inner.state = WorkflowState::Blocked;
                    return;
                }
                WorkflowState::Previewed { exists: false } => {}
                _ => return,
            }
            let (Some(preview), Some(url)) = (inner.preview.as_ref(), inner.url.as_ref()) else {
                return;
            };
            let record = ArtistRecord::from_preview(preview, url);
            inner.state = WorkflowState::Committing;
            (inner.attempt, record)
        };

        let result = self.roster.insert_if_absent(record).await;

        let mut inner = self.lock();
        if inner.attempt != attempt || inner.state != WorkflowState::Committing {
            return;
        }
        match result {
            Ok(()) => {
                inner.state = WorkflowState::Committed;
            }
            Err(e) => {
                inner.state = WorkflowState::Failed;
                inner.last_error = Some(WorkflowError::Commit(e.into()));
            }
        }
    }

    /// Discards the current run and returns to `Idle`.
    ///
    /// Any response still in flight for the abandoned run arrives with a
    /// stale attempt number and is dropped silently.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.state = WorkflowState::Idle;
        inner.url = None;
        inner.preview = None;
        inner.last_error = None;
        inner.attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ArtistIdentity, MockMetadataResolver, ResolveError};
    use crate::foundation::database::{MockRoster, RosterError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    const URL: &str = "https://open.spotify.com/artist/abc123";

    fn preview(exists: bool) -> ArtistPreview {
        let url = validate_artist_url(URL).unwrap();
        ArtistPreview {
            identity: url.identity().clone(),
            display_name: "Test Artist".to_string(),
            image_url: None,
            genres: vec!["pop".to_string(), "rock".to_string()],
            already_exists: exists,
        }
    }

    fn resolver_returning(result_preview: ArtistPreview) -> Arc<MockMetadataResolver> {
        let mut resolver = MockMetadataResolver::new();
        resolver
            .expect_resolve()
            .returning(move |_| Ok(result_preview.clone()));
        Arc::new(resolver)
    }

    #[tokio::test]
    async fn malformed_url_stays_idle_and_never_resolves() {
        // no expectations set: any call on either mock panics
        let workflow = PreviewWorkflow::new(
            Arc::new(MockMetadataResolver::new()),
            Arc::new(MockRoster::new()),
        );

        let result = workflow.submit_url("not a url").await;
        assert!(result.is_err());
        assert_eq!(workflow.state(), WorkflowState::Idle);
        assert!(workflow.preview().is_none());
    }

    #[tokio::test]
    async fn happy_path_commits_exactly_once() {
        let mut roster = MockRoster::new();
        roster
            .expect_insert_if_absent()
            .withf(|record| {
                record.identity.as_str() == "abc123"
                    && record.display_name == "Test Artist"
                    && record.profile_url == "https://open.spotify.com/artist/abc123"
                    && record.genres == vec!["pop".to_string(), "rock".to_string()]
            })
            .times(1)
            .returning(|_| Ok(()));

        let workflow = PreviewWorkflow::new(resolver_returning(preview(false)), Arc::new(roster));

        workflow.submit_url(URL).await.unwrap();
        assert_eq!(workflow.state(), WorkflowState::Previewed { exists: false });
        assert_eq!(workflow.preview().unwrap().display_name, "Test Artist");

        workflow.confirm_commit().await;
        assert_eq!(workflow.state(), WorkflowState::Committed);
        assert!(workflow.last_error().is_none());
    }

    #[tokio::test]
    async fn existing_artist_blocks_commit_without_store_write() {
        // MockRoster with no insert expectation: a write would panic the test
        let workflow = PreviewWorkflow::new(
            resolver_returning(preview(true)),
            Arc::new(MockRoster::new()),
        );

        workflow.submit_url(URL).await.unwrap();
        assert_eq!(workflow.state(), WorkflowState::Previewed { exists: true });

        workflow.confirm_commit().await;
        assert_eq!(workflow.state(), WorkflowState::Blocked);

        // further confirms stay put
        workflow.confirm_commit().await;
        assert_eq!(workflow.state(), WorkflowState::Blocked);
    }

    #[tokio::test]
    async fn resolve_failure_lands_in_failed_and_reset_recovers() {
        let mut resolver = MockMetadataResolver::new();
        resolver
            .expect_resolve()
            .times(1)
            .returning(|_| Err(ResolveError::NotFound));

        let workflow = PreviewWorkflow::new(Arc::new(resolver), Arc::new(MockRoster::new()));

        workflow.submit_url(URL).await.unwrap();
        assert_eq!(workflow.state(), WorkflowState::Failed);
        assert_eq!(workflow.last_error().unwrap(), "No artist found for that URL");

        workflow.reset();
        assert_eq!(workflow.state(), WorkflowState::Idle);
        assert!(workflow.last_error().is_none());
    }

    #[tokio::test]
    async fn store_conflict_beats_advisory_flag() {
        let mut roster = MockRoster::new();
        roster
            .expect_insert_if_absent()
            .times(1)
            .returning(|_| Err(RosterError::Conflict));

        let workflow = PreviewWorkflow::new(resolver_returning(preview(false)), Arc::new(roster));

        workflow.submit_url(URL).await.unwrap();
        workflow.confirm_commit().await;

        assert_eq!(workflow.state(), WorkflowState::Failed);
        assert_eq!(
            workflow.last_error().unwrap(),
            "Artist is already on the roster"
        );
    }

    #[tokio::test]
    async fn confirm_outside_previewed_is_a_no_op() {
        let workflow = PreviewWorkflow::new(
            Arc::new(MockMetadataResolver::new()),
            Arc::new(MockRoster::new()),
        );

        workflow.confirm_commit().await;
        assert_eq!(workflow.state(), WorkflowState::Idle);
    }

    #[tokio::test]
    async fn submit_outside_idle_is_a_no_op() {
        let mut resolver = MockMetadataResolver::new();
        resolver
            .expect_resolve()
            .times(1)
            .returning(|_| Ok(preview(false)));

        let workflow = PreviewWorkflow::new(Arc::new(resolver), Arc::new(MockRoster::new()));

        workflow.submit_url(URL).await.unwrap();
        assert_eq!(workflow.state(), WorkflowState::Previewed { exists: false });

        // second submit without reset: resolver would panic on a second call
        workflow.submit_url(URL).await.unwrap();
        assert_eq!(workflow.state(), WorkflowState::Previewed { exists: false });
    }

    /// Roster double that parks inside `insert_if_absent` until released, so
    /// a test can observe the machine mid-commit.
    struct GatedRoster {
        entered: Notify,
        release: Notify,
        calls: AtomicUsize,
    }

    impl GatedRoster {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                entered: Notify::new(),
                release: Notify::new(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Roster for GatedRoster {
        async fn exists(&self, _identity: &ArtistIdentity) -> Result<bool, RosterError> {
            Ok(false)
        }

        async fn insert_if_absent(&self, _record: ArtistRecord) -> Result<(), RosterError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entered.notify_one();
            self.release.notified().await;
            Ok(())
        }

        async fn list_all(&self) -> Result<Vec<ArtistRecord>, RosterError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn rapid_repeated_confirms_write_once() {
        let roster = GatedRoster::new();
        let workflow = Arc::new(PreviewWorkflow::new(
            resolver_returning(preview(false)),
            roster.clone(),
        ));

        workflow.submit_url(URL).await.unwrap();

        let committing = {
            let workflow = workflow.clone();
            tokio::spawn(async move { workflow.confirm_commit().await })
        };
        roster.entered.notified().await;
        assert_eq!(workflow.state(), WorkflowState::Committing);

        // second trigger while the first is still in flight
        workflow.confirm_commit().await;
        assert_eq!(roster.calls.load(Ordering::SeqCst), 1);

        roster.release.notify_one();
        committing.await.unwrap();

        assert_eq!(workflow.state(), WorkflowState::Committed);
        assert_eq!(roster.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stale_commit_after_reset_is_dropped() {
        let roster = GatedRoster::new();
        let workflow = Arc::new(PreviewWorkflow::new(
            resolver_returning(preview(false)),
            roster.clone(),
        ));

        workflow.submit_url(URL).await.unwrap();

        let committing = {
            let workflow = workflow.clone();
            tokio::spawn(async move { workflow.confirm_commit().await })
        };
        roster.entered.notified().await;
        assert_eq!(workflow.state(), WorkflowState::Committing);

        // user abandons the attempt while the write is still in flight
        workflow.reset();
        assert_eq!(workflow.state(), WorkflowState::Idle);

        roster.release.notify_one();
        committing.await.unwrap();

        // the late arrival must not have applied a transition
        assert_eq!(workflow.state(), WorkflowState::Idle);
        assert!(workflow.preview().is_none());
        assert!(workflow.last_error().is_none());
    }

    /// Resolver double that parks until released, for stale-response tests.
    struct GatedResolver {
        entered: Notify,
        release: Notify,
        result_preview: ArtistPreview,
    }

    #[async_trait]
    impl MetadataResolver for GatedResolver {
        async fn resolve(&self, _url: &ValidatedUrl) -> Result<ArtistPreview, ResolveError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(self.result_preview.clone())
        }
    }

    #[tokio::test]
    async fn stale_resolve_after_reset_is_dropped() {
        let resolver = Arc::new(GatedResolver {
            entered: Notify::new(),
            release: Notify::new(),
            result_preview: preview(false),
        });
        let workflow = Arc::new(PreviewWorkflow::new(
            resolver.clone(),
            Arc::new(MockRoster::new()),
        ));

        let resolving = {
            let workflow = workflow.clone();
            tokio::spawn(async move { workflow.submit_url(URL).await })
        };
        resolver.entered.notified().await;
        assert_eq!(workflow.state(), WorkflowState::Resolving);

        // user abandons the attempt while the round trip is still out
        workflow.reset();
        assert_eq!(workflow.state(), WorkflowState::Idle);

        resolver.release.notify_one();
        resolving.await.unwrap().unwrap();

        // the late arrival must not have applied a transition
        assert_eq!(workflow.state(), WorkflowState::Idle);
        assert!(workflow.preview().is_none());
        assert!(workflow.last_error().is_none());
    }
}

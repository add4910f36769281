//! Edit-then-send workflow for generated replies.
//!
//! A reply operation is split in two halves. [`ReplyWorkflow::begin`] runs on
//! the UI thread, checks every local precondition and claims the per-email
//! in-flight slot. [`execute`] runs on the background runtime and performs
//! the backend calls strictly in order: save (only when the draft differs from
//! the stored reply), then dispatch. [`ReplyWorkflow::finish`] releases the
//! slot and applies the result, unless the selection moved on meanwhile.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::api::Backend;
use crate::error::{AppError, Failure, Rejection};
use crate::model::{Email, EmailId, EmailUpdate};
use crate::selection::Selection;
use crate::store::EmailStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyAction {
    /// Persist the draft if edited, then dispatch.
    Send,
    /// Persist the draft only.
    Save,
}

/// A claimed reply operation, ready to run against the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyJob {
    pub ticket: u64,
    pub email_id: EmailId,
    pub selection_epoch: u64,
    pub action: ReplyAction,
    /// Text to persist before dispatching; `None` when the draft matches the
    /// stored reply.
    pub save: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    Sent { saved: bool, message: String },
    Saved,
    SaveFailed(AppError),
    DispatchFailed(AppError),
}

impl ReplyOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ReplyOutcome::Sent { .. } | ReplyOutcome::Saved)
    }

    pub fn failure(&self) -> Option<Failure> {
        match self {
            ReplyOutcome::SaveFailed(e) => Some(Failure::Save(e.clone())),
            ReplyOutcome::DispatchFailed(e) => Some(Failure::Dispatch(e.clone())),
            ReplyOutcome::Sent { .. } | ReplyOutcome::Saved => None,
        }
    }
}

/// What the caller should do after [`ReplyWorkflow::finish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// The collection must be reloaded to pick up backend-side changes.
    pub refresh: bool,
    /// The selection changed while the job ran; no local state was touched.
    pub stale: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Draft {
    email_id: EmailId,
    text: String,
}

#[derive(Debug, Clone, Default)]
pub struct ReplyWorkflow {
    draft: Option<Draft>,
    in_flight: HashMap<EmailId, u64>,
    next_ticket: u64,
}

impl ReplyWorkflow {
    /// Drops the working draft. Called whenever the selection changes.
    pub fn reset_draft(&mut self) {
        self.draft = None;
    }

    pub fn has_draft(&self, id: EmailId) -> bool {
        self.draft.as_ref().is_some_and(|d| d.email_id == id)
    }

    /// The text the editor shows: the operator's draft if there is one,
    /// otherwise the stored reply.
    pub fn draft_text<'a>(&'a self, email: &'a Email) -> &'a str {
        match &self.draft {
            Some(d) if d.email_id == email.id => &d.text,
            _ => email.ai_response.as_deref().unwrap_or_default(),
        }
    }

    pub fn edit_draft(&mut self, selection: &Selection, text: String) -> Result<(), Rejection> {
        let email_id = selection.current().ok_or(Rejection::NothingSelected)?;
        self.draft = Some(Draft { email_id, text });
        Ok(())
    }

    /// Drops the draft once the installed snapshot stores exactly its text.
    /// A saved draft is kept until then, so the editor never falls back to a
    /// reply the backend has already replaced.
    pub fn reconcile(&mut self, store: &EmailStore) {
        let settled = self.draft.as_ref().is_some_and(|d| {
            store.get(d.email_id).and_then(Email::generated_response) == Some(d.text.as_str())
        });
        if settled {
            self.draft = None;
        }
    }

    pub fn is_in_flight(&self, id: EmailId) -> bool {
        self.in_flight.contains_key(&id)
    }

    /// Checks preconditions for `action` on the selected email and claims its
    /// in-flight slot. No backend call happens here.
    pub fn begin(
        &mut self,
        action: ReplyAction,
        selection: &Selection,
        store: &EmailStore,
    ) -> Result<ReplyJob, Rejection> {
        let email = selection
            .resolve(store)
            .ok_or(Rejection::NothingSelected)?;
        let stored = email.generated_response();
        if action == ReplyAction::Send && stored.is_none() {
            return Err(Rejection::NotReady);
        }
        if self.is_in_flight(email.id) {
            return Err(Rejection::InFlight);
        }

        let text = self.draft_text(email);
        if text.trim().is_empty() {
            return Err(Rejection::EmptyDraft);
        }
        let save = (Some(text) != stored).then(|| text.to_string());
        if action == ReplyAction::Save && save.is_none() {
            return Err(Rejection::Unchanged);
        }

        self.next_ticket += 1;
        let job = ReplyJob {
            ticket: self.next_ticket,
            email_id: email.id,
            selection_epoch: selection.epoch(),
            action,
            save,
        };
        self.in_flight.insert(job.email_id, job.ticket);
        info!(
            "Starting {:?} for email {} (ticket {}, edited: {})",
            action,
            job.email_id,
            job.ticket,
            job.save.is_some()
        );
        Ok(job)
    }

    /// Releases the job's slot and applies its outcome to the draft. A draft
    /// that was saved stays until [`ReplyWorkflow::reconcile`] sees it stored.
    pub fn finish(
        &mut self,
        job: &ReplyJob,
        outcome: &ReplyOutcome,
        selection: &Selection,
    ) -> Completion {
        if self.in_flight.get(&job.email_id) == Some(&job.ticket) {
            self.in_flight.remove(&job.email_id);
        }

        let stale = selection.epoch() != job.selection_epoch;
        if stale {
            info!(
                "Ticket {} for email {} finished after selection changed, leaving local state alone",
                job.ticket, job.email_id
            );
        } else if outcome.is_success() && job.save.is_none() {
            self.reset_draft();
        }

        if let Some(failure) = outcome.failure() {
            warn!("Ticket {} for email {}: {}", job.ticket, job.email_id, failure);
        }

        Completion {
            refresh: outcome.is_success(),
            stale,
        }
    }
}

/// Runs a claimed job against the backend. The save call always completes
/// before dispatch starts, and a failed save means no dispatch. Never retries.
pub async fn execute(backend: &dyn Backend, job: &ReplyJob) -> ReplyOutcome {
    let saved = if let Some(text) = &job.save {
        let update = EmailUpdate {
            ai_response: text.clone(),
        };
        if let Err(e) = backend.update_email(job.email_id, update).await {
            return ReplyOutcome::SaveFailed(e);
        }
        true
    } else {
        false
    };

    match job.action {
        ReplyAction::Save => ReplyOutcome::Saved,
        ReplyAction::Send => match backend.dispatch_response(job.email_id).await {
            Ok(status) => ReplyOutcome::Sent {
                saved,
                message: status.message,
            },
            Err(e) => ReplyOutcome::DispatchFailed(e),
        },
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::MockBackend;
    use crate::model::fixtures::{email, with_reply};
    use crate::model::{
        AnalyticsSummary, KnowledgeItem, NewKnowledgeItem, StatusResponse,
    };
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Backend fake that records the order of reply-related calls.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingBackend {
        pub calls: Mutex<Vec<String>>,
        pub fail_save: bool,
        pub fail_dispatch: bool,
    }

    impl RecordingBackend {
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl Backend for RecordingBackend {
        async fn list_emails(&self, _limit: u32) -> Result<Vec<Email>, AppError> {
            self.record("list".to_string());
            Ok(Vec::new())
        }

        async fn update_email(&self, id: EmailId, update: EmailUpdate) -> Result<Email, AppError> {
            self.record(format!("save {id}: {}", update.ai_response));
            if self.fail_save {
                return Err(AppError::from_status(500, "db down"));
            }
            Ok(with_reply(id.0, &update.ai_response))
        }

        async fn dispatch_response(&self, id: EmailId) -> Result<StatusResponse, AppError> {
            self.record(format!("dispatch {id}"));
            if self.fail_dispatch {
                return Err(AppError::from_status(500, "smtp down"));
            }
            Ok(StatusResponse {
                status: "success".to_string(),
                message: "Response sent successfully".to_string(),
                count: None,
            })
        }

        async fn analytics(&self) -> Result<Option<AnalyticsSummary>, AppError> {
            Ok(None)
        }

        async fn list_knowledge(&self) -> Result<Vec<KnowledgeItem>, AppError> {
            Ok(Vec::new())
        }

        async fn create_knowledge(
            &self,
            _item: NewKnowledgeItem,
        ) -> Result<KnowledgeItem, AppError> {
            Err(AppError::Timeout)
        }

        async fn fetch_and_process(&self) -> Result<StatusResponse, AppError> {
            Err(AppError::Timeout)
        }
    }

    fn setup(emails: Vec<Email>, selected: Option<i64>) -> (EmailStore, Selection, ReplyWorkflow) {
        let mut store = EmailStore::default();
        store.replace(emails);
        let mut selection = Selection::default();
        if let Some(id) = selected {
            selection.select(EmailId(id));
        }
        (store, selection, ReplyWorkflow::default())
    }

    #[test]
    fn send_without_generated_reply_is_rejected() {
        let (store, selection, mut workflow) = setup(vec![email(1)], Some(1));
        assert_eq!(
            workflow.begin(ReplyAction::Send, &selection, &store),
            Err(Rejection::NotReady)
        );
        assert!(!workflow.is_in_flight(EmailId(1)));
    }

    #[test]
    fn send_without_selection_is_rejected() {
        let (store, selection, mut workflow) = setup(vec![with_reply(1, "Hi")], None);
        assert_eq!(
            workflow.begin(ReplyAction::Send, &selection, &store),
            Err(Rejection::NothingSelected)
        );
    }

    #[test]
    fn edit_requires_open_detail() {
        let (_, selection, mut workflow) = setup(vec![], None);
        assert_eq!(
            workflow.edit_draft(&selection, "text".to_string()),
            Err(Rejection::NothingSelected)
        );
    }

    #[test]
    fn unedited_draft_skips_save() {
        let (store, selection, mut workflow) = setup(vec![with_reply(1, "Hi")], Some(1));
        workflow.edit_draft(&selection, "Hi".to_string()).unwrap();
        let job = workflow.begin(ReplyAction::Send, &selection, &store).unwrap();
        assert_eq!(job.save, None);
    }

    #[test]
    fn second_begin_while_pending_is_rejected() {
        let (store, selection, mut workflow) = setup(vec![with_reply(1, "Hi")], Some(1));
        workflow.begin(ReplyAction::Send, &selection, &store).unwrap();
        assert_eq!(
            workflow.begin(ReplyAction::Send, &selection, &store),
            Err(Rejection::InFlight)
        );
        assert_eq!(
            workflow.begin(ReplyAction::Save, &selection, &store),
            Err(Rejection::InFlight)
        );
    }

    #[test]
    fn empty_draft_is_rejected() {
        let (store, selection, mut workflow) = setup(vec![with_reply(1, "Hi")], Some(1));
        workflow.edit_draft(&selection, "  ".to_string()).unwrap();
        assert_eq!(
            workflow.begin(ReplyAction::Send, &selection, &store),
            Err(Rejection::EmptyDraft)
        );
    }

    #[test]
    fn save_of_unchanged_draft_is_rejected() {
        let (store, selection, mut workflow) = setup(vec![with_reply(1, "Hi")], Some(1));
        assert_eq!(
            workflow.begin(ReplyAction::Save, &selection, &store),
            Err(Rejection::Unchanged)
        );
    }

    #[test]
    fn draft_belongs_to_one_email() {
        let (store, mut selection, mut workflow) =
            setup(vec![with_reply(1, "One"), with_reply(2, "Two")], Some(1));
        workflow.edit_draft(&selection, "Edited one".to_string()).unwrap();
        selection.select(EmailId(2));

        assert_eq!(workflow.draft_text(store.get(EmailId(2)).unwrap()), "Two");
        assert_eq!(workflow.draft_text(store.get(EmailId(1)).unwrap()), "Edited one");
    }

    #[tokio::test]
    async fn edited_draft_is_saved_before_dispatch() {
        let (store, selection, mut workflow) = setup(vec![with_reply(1, "Hi")], Some(1));
        workflow.edit_draft(&selection, "Hi there".to_string()).unwrap();
        let job = workflow.begin(ReplyAction::Send, &selection, &store).unwrap();

        let backend = RecordingBackend::default();
        let outcome = execute(&backend, &job).await;

        assert_eq!(backend.calls(), vec!["save 1: Hi there", "dispatch 1"]);
        assert_eq!(
            outcome,
            ReplyOutcome::Sent {
                saved: true,
                message: "Response sent successfully".to_string()
            }
        );
    }

    #[tokio::test]
    async fn unedited_draft_only_dispatches() {
        let (store, selection, mut workflow) = setup(vec![with_reply(1, "Hi")], Some(1));
        let job = workflow.begin(ReplyAction::Send, &selection, &store).unwrap();

        let backend = RecordingBackend::default();
        execute(&backend, &job).await;

        assert_eq!(backend.calls(), vec!["dispatch 1"]);
    }

    #[tokio::test]
    async fn failed_save_never_dispatches() {
        let (store, selection, mut workflow) = setup(vec![with_reply(1, "Hi")], Some(1));
        workflow.edit_draft(&selection, "Changed".to_string()).unwrap();
        let job = workflow.begin(ReplyAction::Send, &selection, &store).unwrap();

        let mut backend = MockBackend::new();
        backend
            .expect_update_email()
            .times(1)
            .returning(|_, _| Err(AppError::Timeout));
        backend.expect_dispatch_response().never();

        let outcome = execute(&backend, &job).await;
        assert_eq!(outcome, ReplyOutcome::SaveFailed(AppError::Timeout));
        assert_eq!(outcome.failure(), Some(Failure::Save(AppError::Timeout)));
    }

    #[tokio::test]
    async fn dispatch_failure_keeps_draft_and_selection() {
        let (store, selection, mut workflow) = setup(vec![with_reply(1, "Hi")], Some(1));
        workflow.edit_draft(&selection, "Changed".to_string()).unwrap();
        let job = workflow.begin(ReplyAction::Send, &selection, &store).unwrap();

        let backend = RecordingBackend {
            fail_dispatch: true,
            ..RecordingBackend::default()
        };
        let outcome = execute(&backend, &job).await;
        let completion = workflow.finish(&job, &outcome, &selection);

        assert!(matches!(outcome, ReplyOutcome::DispatchFailed(_)));
        assert!(!completion.refresh);
        assert_eq!(selection.current(), Some(EmailId(1)));
        assert_eq!(workflow.draft_text(store.get(EmailId(1)).unwrap()), "Changed");
        assert!(!workflow.is_in_flight(EmailId(1)));
    }

    #[tokio::test]
    async fn saved_draft_survives_until_snapshot_stores_it() {
        let (store, selection, mut workflow) = setup(vec![with_reply(1, "Hi")], Some(1));
        workflow.edit_draft(&selection, "Changed".to_string()).unwrap();
        let job = workflow.begin(ReplyAction::Send, &selection, &store).unwrap();

        let outcome = execute(&RecordingBackend::default(), &job).await;
        let completion = workflow.finish(&job, &outcome, &selection);

        assert_eq!(
            completion,
            Completion {
                refresh: true,
                stale: false
            }
        );
        assert!(workflow.has_draft(EmailId(1)));

        workflow.reconcile(&store);
        assert!(workflow.has_draft(EmailId(1)));

        let mut refreshed = EmailStore::default();
        refreshed.replace(vec![with_reply(1, "Changed")]);
        workflow.reconcile(&refreshed);
        assert!(!workflow.has_draft(EmailId(1)));
    }

    #[tokio::test]
    async fn unedited_send_discards_nothing_to_keep() {
        let (store, selection, mut workflow) = setup(vec![with_reply(1, "Hi")], Some(1));
        let job = workflow.begin(ReplyAction::Send, &selection, &store).unwrap();

        let outcome = execute(&RecordingBackend::default(), &job).await;
        workflow.finish(&job, &outcome, &selection);

        assert!(!workflow.has_draft(EmailId(1)));
        assert_eq!(workflow.draft_text(&store.emails()[0]), "Hi");
    }

    #[tokio::test]
    async fn late_result_leaves_new_selection_alone() {
        let (store, mut selection, mut workflow) =
            setup(vec![with_reply(1, "One"), with_reply(2, "Two")], Some(1));
        let job = workflow.begin(ReplyAction::Send, &selection, &store).unwrap();

        selection.select(EmailId(2));
        workflow.reset_draft();
        workflow.edit_draft(&selection, "Draft for two".to_string()).unwrap();

        let outcome = execute(&RecordingBackend::default(), &job).await;
        let completion = workflow.finish(&job, &outcome, &selection);

        assert!(completion.stale);
        assert!(workflow.has_draft(EmailId(2)));
        assert!(!workflow.is_in_flight(EmailId(1)));
    }

    #[tokio::test]
    async fn save_action_persists_without_dispatch() {
        let (store, selection, mut workflow) = setup(vec![email(1)], Some(1));
        workflow.edit_draft(&selection, "Typed by hand".to_string()).unwrap();
        let job = workflow.begin(ReplyAction::Save, &selection, &store).unwrap();

        let backend = RecordingBackend::default();
        let outcome = execute(&backend, &job).await;

        assert_eq!(outcome, ReplyOutcome::Saved);
        assert_eq!(backend.calls(), vec!["save 1: Typed by hand"]);
    }
}

use std::collections::VecDeque;

use tracing::{error, info, warn};

use crate::analytics::AnalyticsView;
use crate::bridge::{BackgroundEvent, UiCommand};
use crate::config::Config;
use crate::error::{Failure, Rejection};
use crate::filter::{self, FilterMode};
use crate::knowledge::{KnowledgeForm, KnowledgeList};
use crate::model::{Email, EmailId};
use crate::selection::Selection;
use crate::store::{EmailStore, LoadState};
use crate::workflow::{ReplyAction, ReplyOutcome, ReplyWorkflow};

const MAX_NOTICES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Emails,
    Analytics,
    KnowledgeBase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub text: String,
}

/// What the email list panel should say when it has no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyList {
    Loading,
    LoadFailed,
    NothingLoaded,
    NoMatches,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub tab: Tab,
    pub api_base: String,
    pub load_limit: u32,

    // Emails
    pub store: EmailStore,
    pub filter_mode: FilterMode,
    pub query: String,
    pub selection: Selection,
    pub replies: ReplyWorkflow,
    pub fetching: bool,
    refresh_generation: u64,

    // Other tabs
    pub analytics: AnalyticsView,
    pub knowledge: KnowledgeList,
    pub knowledge_form: KnowledgeForm,

    notices: VecDeque<Notice>,
    next_notice: u64,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            tab: Tab::Emails,
            api_base: config.api_base.to_string(),
            load_limit: config.load_limit,
            store: EmailStore::default(),
            filter_mode: FilterMode::All,
            query: String::new(),
            selection: Selection::default(),
            replies: ReplyWorkflow::default(),
            fetching: false,
            refresh_generation: 0,
            analytics: AnalyticsView::Loading,
            knowledge: KnowledgeList::Loading,
            knowledge_form: KnowledgeForm::default(),
            notices: VecDeque::new(),
            next_notice: 0,
        }
    }

    /// Requests issued once when the dashboard opens.
    pub fn startup_commands(&mut self) -> Vec<UiCommand> {
        vec![
            self.refresh_emails(),
            self.refresh_analytics(),
            self.refresh_knowledge(),
        ]
    }

    pub fn visible_emails(&self) -> Vec<&Email> {
        filter::visible(self.store.emails(), self.filter_mode, &self.query)
    }

    pub fn empty_list_reason(&self) -> EmptyList {
        if !self.store.is_empty() {
            return EmptyList::NoMatches;
        }
        match self.store.load_state() {
            LoadState::NotLoaded | LoadState::Loading => EmptyList::Loading,
            LoadState::Failed(_) => EmptyList::LoadFailed,
            LoadState::Loaded => EmptyList::NothingLoaded,
        }
    }

    pub fn selected_email(&self) -> Option<&Email> {
        self.selection.resolve(&self.store)
    }

    pub fn select(&mut self, id: EmailId) {
        self.selection.select(id);
        self.replies.reset_draft();
    }

    pub fn edit_draft(&mut self, text: String) {
        if let Err(rejection) = self.replies.edit_draft(&self.selection, text) {
            self.reject(rejection);
        }
    }

    pub fn draft_text(&self) -> Option<&str> {
        self.selected_email().map(|e| self.replies.draft_text(e))
    }

    pub fn reply_in_flight(&self) -> bool {
        self.selection
            .current()
            .is_some_and(|id| self.replies.is_in_flight(id))
    }

    pub fn refresh_emails(&mut self) -> UiCommand {
        self.store.mark_loading();
        self.refresh_generation += 1;
        UiCommand::LoadEmails {
            limit: self.load_limit,
            generation: self.refresh_generation,
        }
    }

    pub fn refresh_analytics(&mut self) -> UiCommand {
        self.analytics = AnalyticsView::Loading;
        UiCommand::LoadAnalytics
    }

    pub fn refresh_knowledge(&mut self) -> UiCommand {
        self.knowledge = KnowledgeList::Loading;
        UiCommand::LoadKnowledge
    }

    pub fn fetch_and_process(&mut self) -> Option<UiCommand> {
        if self.fetching {
            return None;
        }
        self.fetching = true;
        Some(UiCommand::FetchAndProcess)
    }

    /// Starts a send or save for the selected email, or explains why not.
    pub fn request_reply(&mut self, action: ReplyAction) -> Option<UiCommand> {
        match self.replies.begin(action, &self.selection, &self.store) {
            Ok(job) => Some(UiCommand::RunReply(job)),
            Err(rejection) => {
                self.reject(rejection);
                None
            }
        }
    }

    pub fn submit_knowledge(&mut self) -> Option<UiCommand> {
        match self.knowledge_form.submit() {
            Ok(item) => Some(UiCommand::CreateKnowledge(item)),
            Err(rejection) => {
                self.reject(rejection);
                None
            }
        }
    }

    /// Applies a finished background request. Returns follow-up commands.
    pub fn apply(&mut self, event: BackgroundEvent) -> Vec<UiCommand> {
        match event {
            BackgroundEvent::EmailsLoaded { generation, result } => {
                if generation != self.refresh_generation {
                    info!(
                        "Ignoring email list {} superseded by {}",
                        generation, self.refresh_generation
                    );
                    return Vec::new();
                }
                match result {
                    Ok(emails) => {
                        info!("Loaded {} emails", emails.len());
                        self.store.replace(emails);
                        if self.selection.collection_refreshed(&self.store) {
                            self.replies.reset_draft();
                        }
                        self.replies.reconcile(&self.store);
                    }
                    Err(e) => {
                        self.store.mark_failed(e.to_string());
                        self.fail(&Failure::Load(e));
                    }
                }
                Vec::new()
            }
            BackgroundEvent::FetchFinished(result) => {
                self.fetching = false;
                match result {
                    Ok(status) => {
                        info!(
                            "Fetch and process {}: {} ({} new)",
                            status.status,
                            status.message,
                            status.count.unwrap_or(0)
                        );
                        self.notify(NoticeLevel::Success, status.message);
                        vec![self.refresh_emails()]
                    }
                    Err(e) => {
                        self.fail(&Failure::Load(e));
                        Vec::new()
                    }
                }
            }
            BackgroundEvent::ReplyFinished { job, outcome } => {
                let completion = self.replies.finish(&job, &outcome, &self.selection);
                match &outcome {
                    ReplyOutcome::Sent { .. } => {
                        self.notify(NoticeLevel::Success, "Response sent successfully!".to_string());
                    }
                    ReplyOutcome::Saved => {
                        self.notify(NoticeLevel::Success, "AI response updated!".to_string());
                    }
                    ReplyOutcome::SaveFailed(_) | ReplyOutcome::DispatchFailed(_) => {
                        if let Some(failure) = outcome.failure() {
                            self.fail(&failure);
                        }
                    }
                }
                if completion.refresh {
                    vec![self.refresh_emails()]
                } else {
                    Vec::new()
                }
            }
            BackgroundEvent::Unavailable(e) => {
                self.store.mark_failed(e.to_string());
                self.fetching = false;
                self.analytics = AnalyticsView::NoData;
                self.knowledge = KnowledgeList::Failed;
                self.fail(&Failure::Load(e));
                Vec::new()
            }
            BackgroundEvent::AnalyticsLoaded(result) => {
                match result {
                    Ok(summary) => self.analytics = AnalyticsView::from_summary(summary),
                    Err(e) => {
                        self.analytics = AnalyticsView::NoData;
                        self.fail(&Failure::Load(e));
                    }
                }
                Vec::new()
            }
            BackgroundEvent::KnowledgeLoaded(result) => {
                match result {
                    Ok(items) => self.knowledge = KnowledgeList::Loaded(items),
                    Err(e) => {
                        self.knowledge = KnowledgeList::Failed;
                        self.fail(&Failure::Load(e));
                    }
                }
                Vec::new()
            }
            BackgroundEvent::KnowledgeCreated(result) => {
                match result {
                    Ok(item) => {
                        info!("Created knowledge base item {}", item.id);
                        self.knowledge.prepend(item);
                        self.knowledge_form.created();
                        self.notify(
                            NoticeLevel::Success,
                            "Knowledge base item created successfully!".to_string(),
                        );
                    }
                    Err(e) => {
                        self.knowledge_form.failed();
                        self.fail(&Failure::Create(e));
                    }
                }
                Vec::new()
            }
        }
    }

    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn dismiss(&mut self, id: u64) {
        self.notices.retain(|n| n.id != id);
    }

    fn reject(&mut self, rejection: Rejection) {
        warn!("Rejected: {}", rejection);
        self.notify(NoticeLevel::Warning, rejection.to_string());
    }

    fn fail(&mut self, failure: &Failure) {
        error!("{}", failure);
        self.notify(NoticeLevel::Error, failure.to_string());
    }

    fn notify(&mut self, level: NoticeLevel, text: String) {
        self.next_notice += 1;
        self.notices.push_back(Notice {
            id: self.next_notice,
            level,
            text,
        });
        while self.notices.len() > MAX_NOTICES {
            self.notices.pop_front();
        }
    }
}

use std::collections::HashSet;
use std::sync::Arc;

use crate::model::{Email, EmailId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loading,
    Loaded,
    Failed(String),
}

/// Holds one immutable snapshot of the email collection per refresh.
///
/// Refreshes replace the snapshot wholesale; nothing patches records in place.
#[derive(Debug, Clone)]
pub struct EmailStore {
    snapshot: Arc<[Email]>,
    load_state: LoadState,
}

impl Default for EmailStore {
    fn default() -> Self {
        Self {
            snapshot: Arc::from(Vec::new()),
            load_state: LoadState::NotLoaded,
        }
    }
}

impl EmailStore {
    pub fn emails(&self) -> &[Email] {
        &self.snapshot
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn get(&self, id: EmailId) -> Option<&Email> {
        self.snapshot.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: EmailId) -> bool {
        self.get(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn mark_loading(&mut self) {
        self.load_state = LoadState::Loading;
    }

    /// Installs a fresh snapshot. Later duplicates of an id are dropped so the
    /// collection never holds two records for one email.
    pub fn replace(&mut self, emails: Vec<Email>) {
        let mut seen = HashSet::with_capacity(emails.len());
        let total = emails.len();
        let unique: Vec<Email> = emails.into_iter().filter(|e| seen.insert(e.id)).collect();
        if unique.len() != total {
            tracing::warn!(
                "Dropped {} duplicate email records from refresh",
                total - unique.len()
            );
        }
        self.snapshot = Arc::from(unique);
        self.load_state = LoadState::Loaded;
    }

    /// Records a failed load. The previous snapshot stays visible.
    pub fn mark_failed(&mut self, reason: String) {
        self.load_state = LoadState::Failed(reason);
    }
}

use crate::model::{Email, EmailId};
use crate::store::EmailStore;

/// Which email the detail view shows.
///
/// Holds an id, never a record: the detail view resolves it against the
/// current snapshot on every frame. `epoch` increases on every `select` so
/// late results can tell whether the selection they were issued under is
/// still the active one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    current: Option<EmailId>,
    epoch: u64,
}

impl Selection {
    pub fn current(&self) -> Option<EmailId> {
        self.current
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_selected(&self, id: EmailId) -> bool {
        self.current == Some(id)
    }

    pub fn select(&mut self, id: EmailId) {
        self.current = Some(id);
        self.epoch += 1;
    }

    pub fn clear(&mut self) {
        if self.current.take().is_some() {
            self.epoch += 1;
        }
    }

    /// Re-checks the selection against a freshly installed snapshot. Returns
    /// `true` when the selected email disappeared and the selection was
    /// dropped.
    pub fn collection_refreshed(&mut self, store: &EmailStore) -> bool {
        match self.current {
            Some(id) if !store.contains(id) => {
                tracing::info!("Selected email {} no longer present, clearing selection", id);
                self.clear();
                true
            }
            _ => false,
        }
    }

    pub fn resolve<'a>(&self, store: &'a EmailStore) -> Option<&'a Email> {
        self.current.and_then(|id| store.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::email;

    #[test]
    fn starts_with_nothing_selected() {
        let selection = Selection::default();
        assert_eq!(selection.current(), None);
    }

    #[test]
    fn refresh_without_selected_id_clears() {
        let mut store = EmailStore::default();
        store.replace(vec![email(1), email(2)]);
        let mut selection = Selection::default();
        selection.select(EmailId(2));

        store.replace(vec![email(1)]);
        assert!(selection.collection_refreshed(&store));
        assert_eq!(selection.current(), None);
        assert!(selection.resolve(&store).is_none());
    }

    #[test]
    fn refresh_keeps_selection_and_resolves_new_record() {
        let mut store = EmailStore::default();
        store.replace(vec![email(1)]);
        let mut selection = Selection::default();
        selection.select(EmailId(1));
        let epoch = selection.epoch();

        let mut updated = email(1);
        updated.is_processed = true;
        store.replace(vec![updated]);

        assert!(!selection.collection_refreshed(&store));
        assert_eq!(selection.epoch(), epoch);
        assert!(selection.resolve(&store).unwrap().is_processed);
    }

    #[test]
    fn every_select_advances_epoch() {
        let mut selection = Selection::default();
        selection.select(EmailId(1));
        let first = selection.epoch();
        selection.select(EmailId(1));
        assert!(selection.epoch() > first);
    }

    #[test]
    fn selection_always_points_into_collection_after_refresh() {
        let mut store = EmailStore::default();
        let mut selection = Selection::default();
        for selected in 1..=4 {
            for kept in [vec![1, 2], vec![3], vec![], vec![1, 2, 3, 4]] {
                store.replace((1..=4).map(email).collect());
                selection.select(EmailId(selected));
                store.replace(kept.iter().copied().map(email).collect());
                selection.collection_refreshed(&store);
                if let Some(id) = selection.current() {
                    assert!(store.contains(id));
                }
            }
        }
    }
}

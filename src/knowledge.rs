use crate::error::Rejection;
use crate::model::{KnowledgeItem, NewKnowledgeItem};

pub const CATEGORIES: [&str; 5] = ["billing", "technical", "account", "feature", "general"];

/// Splits comma-separated tag input, trimming each tag and dropping empties.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeForm {
    pub open: bool,
    pub title: String,
    pub category: String,
    pub content: String,
    pub tags: String,
    pub submitting: bool,
}

impl Default for KnowledgeForm {
    fn default() -> Self {
        Self {
            open: false,
            title: String::new(),
            category: CATEGORIES[0].to_string(),
            content: String::new(),
            tags: String::new(),
            submitting: false,
        }
    }
}

impl KnowledgeForm {
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Validates the form and marks it as submitting.
    pub fn submit(&mut self) -> Result<NewKnowledgeItem, Rejection> {
        if self.submitting {
            return Err(Rejection::InFlight);
        }
        let title = self.title.trim();
        let category = self.category.trim();
        let content = self.content.trim();
        if title.is_empty() || category.is_empty() || content.is_empty() {
            return Err(Rejection::MissingFields);
        }
        let item = NewKnowledgeItem {
            title: title.to_string(),
            content: content.to_string(),
            category: category.to_string(),
            tags: parse_tags(&self.tags),
        };
        self.submitting = true;
        Ok(item)
    }

    /// Clears and closes the form after a successful create.
    pub fn created(&mut self) {
        *self = Self::default();
    }

    /// Re-enables the form after a failed create; entered values stay.
    pub fn failed(&mut self) {
        self.submitting = false;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum KnowledgeList {
    #[default]
    Loading,
    Loaded(Vec<KnowledgeItem>),
    Failed,
}

impl KnowledgeList {
    /// Puts a newly created item at the top of the list.
    pub fn prepend(&mut self, item: KnowledgeItem) {
        match self {
            KnowledgeList::Loaded(items) => {
                let mut next = Vec::with_capacity(items.len() + 1);
                next.push(item);
                next.append(items);
                *items = next;
            }
            KnowledgeList::Loading | KnowledgeList::Failed => {
                *self = KnowledgeList::Loaded(vec![item]);
            }
        }
    }
}

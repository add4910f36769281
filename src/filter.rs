use crate::model::Email;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    All,
    Unprocessed,
    Processed,
    Urgent,
}

impl FilterMode {
    pub const ALL: [FilterMode; 4] = [
        FilterMode::All,
        FilterMode::Unprocessed,
        FilterMode::Processed,
        FilterMode::Urgent,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterMode::All => "All Emails",
            FilterMode::Unprocessed => "Unprocessed",
            FilterMode::Processed => "Processed",
            FilterMode::Urgent => "Urgent",
        }
    }

    pub fn matches(self, email: &Email) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Unprocessed => !email.is_processed,
            FilterMode::Processed => email.is_processed,
            FilterMode::Urgent => email.is_urgent(),
        }
    }
}

/// Derives the visible list from a snapshot, preserving snapshot order.
///
/// A non-blank query replaces the mode filter instead of narrowing it: the
/// result is every email whose subject, sender or body contains the query,
/// case-insensitively, whatever `mode` is.
pub fn visible<'a>(emails: &'a [Email], mode: FilterMode, query: &str) -> Vec<&'a Email> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        emails.iter().filter(|e| mode.matches(e)).collect()
    } else {
        emails.iter().filter(|e| matches_text(e, &needle)).collect()
    }
}

fn matches_text(email: &Email, needle: &str) -> bool {
    [&email.subject, &email.sender, &email.body]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

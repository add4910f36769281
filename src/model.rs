//! Wire types shared with the triage backend.
//!
//! Classification fields (`sentiment`, `urgency`, `is_processed`,
//! `ai_response`) are only ever read from the backend. Display helpers supply
//! defaults for absent values without touching the record.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct EmailId(pub i64);

impl fmt::Display for EmailId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
}

impl UrgencyLevel {
    pub fn from_score(score: i64) -> Self {
        match score {
            i64::MIN..=1 => UrgencyLevel::Low,
            2..=3 => UrgencyLevel::Medium,
            _ => UrgencyLevel::High,
        }
    }
}

/// Urgency assumed when the backend has not scored an email.
pub const DEFAULT_URGENCY: i64 = 1;

/// Lowest urgency score the "urgent" filter keeps.
pub const URGENT_THRESHOLD: i64 = 4;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Email {
    pub id: EmailId,
    pub subject: String,
    pub sender: String,
    #[serde(default)]
    pub recipient: Option<String>,
    pub body: String,
    pub date: String,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
    #[serde(default)]
    pub sentiment_score: Option<f64>,
    #[serde(default)]
    pub urgency: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub extracted_info: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default)]
    pub ai_response: Option<String>,
    #[serde(default)]
    pub is_processed: bool,
    #[serde(default)]
    pub is_response_sent: bool,
}

impl Email {
    pub fn urgency_score(&self) -> i64 {
        self.urgency.unwrap_or(DEFAULT_URGENCY)
    }

    pub fn urgency_level(&self) -> UrgencyLevel {
        UrgencyLevel::from_score(self.urgency_score())
    }

    pub fn is_urgent(&self) -> bool {
        self.urgency_score() >= URGENT_THRESHOLD
    }

    /// Sentiment label for display; absent or unknown values show as neutral.
    pub fn sentiment_label(&self) -> &'static str {
        match self.sentiment {
            Some(Sentiment::Positive) => "positive",
            Some(Sentiment::Negative) => "negative",
            Some(Sentiment::Neutral | Sentiment::Unrecognized) | None => "neutral",
        }
    }

    /// The stored reply, if generation has finished. An empty string counts as
    /// absent, matching the backend's own send check.
    pub fn generated_response(&self) -> Option<&str> {
        self.ai_response.as_deref().filter(|r| !r.is_empty())
    }

    /// Extracted fields with at least one value, keys made human readable.
    pub fn extracted_fields(&self) -> Vec<(String, Vec<String>)> {
        let Some(info) = &self.extracted_info else {
            return Vec::new();
        };
        info.iter()
            .filter_map(|(key, value)| {
                let values: Vec<String> = value
                    .as_array()?
                    .iter()
                    .map(|v| match v {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect();
                (!values.is_empty()).then(|| (humanize_key(key), values))
            })
            .collect()
    }

    pub fn display_date(&self) -> String {
        format_timestamp(&self.date)
    }
}

fn humanize_key(key: &str) -> String {
    capitalize(&key.replace('_', " "))
}

/// Upper-cases the first character, leaving the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Renders backend timestamps as `YYYY-MM-DD HH:MM:SS`. The backend may send
/// either offset-aware or naive ISO 8601; anything else is shown verbatim.
pub fn format_timestamp(raw: &str) -> String {
    const DISPLAY: &str = "%Y-%m-%d %H:%M:%S";
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(DISPLAY).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(DISPLAY).to_string();
    }
    raw.to_string()
}

/// Partial update accepted by `PUT /emails/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailUpdate {
    pub ai_response: String,
}

/// Reply from `POST /fetch-emails/` and `POST /emails/{id}/send-response`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
    #[serde(default)]
    pub count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KnowledgeItem {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewKnowledgeItem {
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
}

/// Label → count pairs in the order the backend sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Distribution(pub Vec<(String, u64)>);

impl<'de> Deserialize<'de> for Distribution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedCounts;

        impl<'de> Visitor<'de> for OrderedCounts {
            type Value = Distribution;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of label to count")
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(Distribution::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((label, count)) = map.next_entry::<String, u64>()? {
                    entries.push((label, count));
                }
                Ok(Distribution(entries))
            }
        }

        deserializer.deserialize_any(OrderedCounts)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AnalyticsSummary {
    #[serde(default)]
    pub total_emails: u64,
    #[serde(default)]
    pub processed_emails: u64,
    #[serde(default)]
    pub pending_emails: u64,
    #[serde(default)]
    pub emails_last_24h: u64,
    #[serde(default)]
    pub sentiment_distribution: Distribution,
    #[serde(default)]
    pub urgency_distribution: Distribution,
    #[serde(default)]
    pub category_distribution: Distribution,
}


#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserializes_backend_email_with_nulls() {
        let json = r#"{
            "id": 7, "message_id": "<a@b>", "sender": "a@b.com", "recipient": "support@x.com",
            "subject": "Refund", "body": "Please help", "date": "2024-03-01T09:30:00",
            "sentiment": null, "sentiment_score": null, "urgency": null, "category": null,
            "extracted_info": null, "is_processed": false, "ai_response": null,
            "is_response_sent": false, "created_at": "2024-03-01T09:30:00",
            "updated_at": "2024-03-01T09:30:00"
        }"#;
        let email: Email = serde_json::from_str(json).unwrap();
        assert_eq!(email.id, EmailId(7));
        assert_eq!(email.sentiment_label(), "neutral");
        assert_eq!(email.urgency_score(), 1);
        assert_eq!(email.urgency_level(), UrgencyLevel::Low);
        assert!(email.generated_response().is_none());
    }

    #[test]
    fn unknown_sentiment_displays_neutral() {
        let email: Email = serde_json::from_str(
            r#"{"id":1,"subject":"s","sender":"x","body":"b","date":"d","sentiment":"mixed"}"#,
        )
        .unwrap();
        assert_eq!(email.sentiment, Some(Sentiment::Unrecognized));
        assert_eq!(email.sentiment_label(), "neutral");
    }

    #[test]
    fn urgency_buckets() {
        assert_eq!(UrgencyLevel::from_score(0), UrgencyLevel::Low);
        assert_eq!(UrgencyLevel::from_score(1), UrgencyLevel::Low);
        assert_eq!(UrgencyLevel::from_score(2), UrgencyLevel::Medium);
        assert_eq!(UrgencyLevel::from_score(3), UrgencyLevel::Medium);
        assert_eq!(UrgencyLevel::from_score(4), UrgencyLevel::High);
    }

    #[test]
    fn extracted_fields_skip_empty_and_non_list_values() {
        let mut email = fixtures::email(1);
        email.extracted_info = Some(
            serde_json::from_str(
                r#"{"order_numbers":["A-1","A-2"],"phone_numbers":[],"note":"x","amounts":[12]}"#,
            )
            .unwrap(),
        );
        assert_eq!(
            email.extracted_fields(),
            vec![
                ("Amounts".to_string(), vec!["12".to_string()]),
                (
                    "Order numbers".to_string(),
                    vec!["A-1".to_string(), "A-2".to_string()]
                ),
            ]
        );
    }

    #[test]
    fn timestamps_format_or_fall_back() {
        assert_eq!(format_timestamp("2024-03-01T09:30:00.123"), "2024-03-01 09:30:00");
        assert_eq!(format_timestamp("2024-03-01T09:30:00+02:00"), "2024-03-01 09:30:00");
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn distribution_keeps_backend_order() {
        let summary: AnalyticsSummary = serde_json::from_str(
            r#"{"total_emails":3,"processed_emails":1,"pending_emails":2,"emails_last_24h":3,
                "sentiment_distribution":{"positive":1,"negative":2},
                "urgency_distribution":{"5":1,"1":2},
                "category_distribution":null}"#,
        )
        .unwrap();
        assert_eq!(
            summary.urgency_distribution.0,
            vec![("5".to_string(), 1), ("1".to_string(), 2)]
        );
        assert!(summary.category_distribution.0.is_empty());
    }
}

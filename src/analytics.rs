use crate::model::{capitalize, AnalyticsSummary, Distribution};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPoint {
    pub label: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSeries {
    pub sentiment: Vec<SeriesPoint>,
    pub urgency: Vec<SeriesPoint>,
    pub category: Vec<SeriesPoint>,
}

impl ChartSeries {
    /// Reshapes the backend summary into chart input. Order is kept as sent;
    /// only sentiment labels are re-cased.
    pub fn from_summary(summary: &AnalyticsSummary) -> Self {
        Self {
            sentiment: points(&summary.sentiment_distribution, capitalize),
            urgency: points(&summary.urgency_distribution, str::to_string),
            category: points(&summary.category_distribution, str::to_string),
        }
    }
}

fn points(distribution: &Distribution, label: impl Fn(&str) -> String) -> Vec<SeriesPoint> {
    distribution
        .0
        .iter()
        .map(|(name, value)| SeriesPoint {
            label: label(name),
            value: *value,
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnalyticsView {
    #[default]
    Loading,
    NoData,
    Ready {
        summary: AnalyticsSummary,
        series: ChartSeries,
    },
}

impl AnalyticsView {
    pub fn from_summary(summary: Option<AnalyticsSummary>) -> Self {
        match summary {
            Some(summary) => {
                let series = ChartSeries::from_summary(&summary);
                AnalyticsView::Ready { summary, series }
            }
            None => AnalyticsView::NoData,
        }
    }
}

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive date range used to key report queries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

impl DateRange {
    /// Longest range a report may cover.
    pub const MAX_SPAN_DAYS: i64 = 366;

    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    /// The `months` calendar months ending with the month of `today`.
    pub fn trailing_months(today: NaiveDate, months: u32) -> Self {
        let first_of_month = today.with_day(1).unwrap_or(today);
        let start = first_of_month
            .checked_sub_months(Months::new(months.saturating_sub(1)))
            .unwrap_or(first_of_month);
        Self::new(
            start.format(DATE_FORMAT).to_string(),
            today.format(DATE_FORMAT).to_string(),
        )
    }

    /// Parse both bounds, rejecting inverted or oversized ranges.
    pub fn bounds(&self) -> Result<(NaiveDate, NaiveDate), AppError> {
        let start = parse_date("startDate", &self.start_date)?;
        let end = parse_date("endDate", &self.end_date)?;
        if end < start {
            return Err(AppError::bad_request("End date precedes start date"));
        }
        if (end - start).num_days() > Self::MAX_SPAN_DAYS {
            return Err(AppError::bad_request(format!(
                "Date range exceeds {} days",
                Self::MAX_SPAN_DAYS
            )));
        }
        Ok((start, end))
    }

    /// `YYYY-MM` label for every calendar month the range touches.
    pub fn month_labels(&self) -> Result<Vec<String>, AppError> {
        let (start, end) = self.bounds()?;
        let mut cursor = start.with_day(1).unwrap_or(start);
        let mut labels = Vec::new();
        while cursor <= end {
            labels.push(month_label(cursor));
            cursor = match cursor.checked_add_months(Months::new(1)) {
                Some(next) => next,
                None => break,
            };
        }
        Ok(labels)
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| AppError::bad_request(format!("{field} must be a YYYY-MM-DD date")))
}

/// Label of the calendar month containing `date`.
pub fn month_label(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Which report a chart shows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Contracts opened per month, split by status.
    Contracts,
    /// Premium volume per month.
    Premiums,
    /// Contracts signed per agent.
    AgentPerformance,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [
        ReportKind::Contracts,
        ReportKind::Premiums,
        ReportKind::AgentPerformance,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Contracts => "Contracts by status",
            ReportKind::Premiums => "Premium volume",
            ReportKind::AgentPerformance => "Agent performance",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
}

/// Chart-ready series: one value per label in every dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReportData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ReportData {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() || self.datasets.iter().all(|d| d.data.iter().all(|v| *v == 0.0))
    }

    /// Every dataset has exactly one value per label.
    pub fn is_aligned(&self) -> bool {
        self.datasets.iter().all(|d| d.data.len() == self.labels.len())
    }

    /// Largest value across datasets, `0.0` when empty.
    pub fn max_value(&self) -> f64 {
        self.datasets
            .iter()
            .flat_map(|d| d.data.iter().copied())
            .fold(0.0, f64::max)
    }
}

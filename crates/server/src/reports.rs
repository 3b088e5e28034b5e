//! Turns contract rows into chart series.
//!
//! Queries return raw rows; the functions here bucket them so that every
//! dataset has one value per label (months with no contracts are zero).

use chrono::NaiveDate;
use shared_types::{month_label, Dataset, ReportData};
use std::collections::BTreeMap;

/// Contract statuses shown as separate series, in display order.
pub const CONTRACT_STATUSES: [&str; 3] = ["active", "pending", "cancelled"];

fn month_index(labels: &[String]) -> BTreeMap<&str, usize> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| (label.as_str(), i))
        .collect()
}

/// Count contracts per month and status. Rows outside `labels` or with an
/// unknown status are skipped.
pub fn contracts_by_status(labels: Vec<String>, rows: &[(NaiveDate, String)]) -> ReportData {
    let index = month_index(&labels);
    let mut series = vec![vec![0.0; labels.len()]; CONTRACT_STATUSES.len()];

    for (signed_on, status) in rows {
        let Some(&month) = index.get(month_label(*signed_on).as_str()) else {
            continue;
        };
        match CONTRACT_STATUSES.iter().position(|s| s == status) {
            Some(status_idx) => series[status_idx][month] += 1.0,
            None => tracing::debug!(%status, "skipping contract with unknown status"),
        }
    }

    let datasets = CONTRACT_STATUSES
        .iter()
        .zip(series)
        .map(|(status, data)| Dataset {
            label: status.to_string(),
            data,
        })
        .collect();

    ReportData { labels, datasets }
}

/// Sum premiums per month.
pub fn premiums_by_month(labels: Vec<String>, rows: &[(NaiveDate, f64)]) -> ReportData {
    let index = month_index(&labels);
    let mut totals = vec![0.0; labels.len()];

    for (signed_on, premium) in rows {
        if let Some(&month) = index.get(month_label(*signed_on).as_str()) {
            totals[month] += premium;
        }
    }

    ReportData {
        labels,
        datasets: vec![Dataset {
            label: "Premium volume".to_string(),
            data: totals,
        }],
    }
}

/// One bar per agent, sorted by name. Duplicate names are merged.
pub fn contracts_per_agent(rows: Vec<(String, i64)>) -> ReportData {
    let mut per_agent: BTreeMap<String, i64> = BTreeMap::new();
    for (agent, count) in rows {
        *per_agent.entry(agent).or_default() += count;
    }

    let (labels, data): (Vec<String>, Vec<f64>) = per_agent
        .into_iter()
        .map(|(agent, count)| (agent, count as f64))
        .unzip();

    ReportData {
        labels,
        datasets: vec![Dataset {
            label: "Contracts signed".to_string(),
            data,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::DateRange;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn q1() -> Vec<String> {
        DateRange::new("2024-01-01", "2024-03-31")
            .month_labels()
            .unwrap()
    }

    #[test]
    fn statuses_are_bucketed_by_month_and_zero_filled() {
        let rows = vec![
            (day("2024-01-05"), "active".to_string()),
            (day("2024-01-20"), "active".to_string()),
            (day("2024-03-02"), "cancelled".to_string()),
            (day("2024-03-09"), "pending".to_string()),
        ];

        let report = contracts_by_status(q1(), &rows);

        assert!(report.is_aligned());
        assert_eq!(report.labels, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(report.datasets[0].label, "active");
        assert_eq!(report.datasets[0].data, vec![2.0, 0.0, 0.0]);
        assert_eq!(report.datasets[1].data, vec![0.0, 0.0, 1.0]);
        assert_eq!(report.datasets[2].data, vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn out_of_range_and_unknown_rows_are_ignored() {
        let rows = vec![
            (day("2023-12-31"), "active".to_string()),
            (day("2024-02-10"), "archived".to_string()),
        ];
        let report = contracts_by_status(q1(), &rows);
        assert!(report.is_empty());
        assert!(report.is_aligned());
    }

    #[test]
    fn premiums_are_summed_per_month() {
        let rows = vec![
            (day("2024-02-01"), 120.5),
            (day("2024-02-28"), 79.5),
            (day("2024-03-15"), 300.0),
        ];
        let report = premiums_by_month(q1(), &rows);
        assert_eq!(report.datasets.len(), 1);
        assert_eq!(report.datasets[0].data, vec![0.0, 200.0, 300.0]);
    }

    #[test]
    fn agents_are_sorted_and_merged() {
        let rows = vec![
            ("Zoe Hart".to_string(), 4),
            ("Ali Chen".to_string(), 2),
            ("Zoe Hart".to_string(), 1),
        ];
        let report = contracts_per_agent(rows);
        assert_eq!(report.labels, vec!["Ali Chen", "Zoe Hart"]);
        assert_eq!(report.datasets[0].data, vec![2.0, 5.0]);
        assert!(report.is_aligned());
    }

    #[test]
    fn no_agents_means_empty_report() {
        let report = contracts_per_agent(Vec::new());
        assert!(report.labels.is_empty());
        assert!(report.is_aligned());
    }
}

use chrono::Utc;
use dioxus::prelude::*;
use shared_types::{DateRange, ReportData, ReportKind};
use shared_ui::{
    Alert, AlertKind, BarChart, Button, ButtonVariant, Card, CardContent, CardDescription,
    CardHeader, CardTitle, ChartSeries, PageHeader, Skeleton,
};

use crate::hooks::use_report;

/// Trailing-month presets offered above the chart.
const PRESETS: [(u32, &str); 3] = [(3, "3 months"), (6, "6 months"), (12, "12 months")];

fn chart_series(data: &ReportData) -> Vec<ChartSeries> {
    data.datasets
        .iter()
        .map(|d| ChartSeries {
            label: d.label.clone(),
            values: d.data.clone(),
        })
        .collect()
}

/// One report as a chart card. Refetches when `range` changes.
#[component]
pub fn ReportPanel(kind: ReportKind, range: Signal<DateRange>) -> Element {
    let report = use_report(kind, range);
    let title = kind.title();
    let DateRange {
        start_date,
        end_date,
    } = range();

    let body = match (&report.error, &report.data) {
        (Some(message), _) => rsx! {
            Alert { kind: AlertKind::Error, "{message}" }
        },
        (None, Some(data)) if data.is_empty() => rsx! {
            p { class: "report-empty", "No contracts in this period." }
        },
        (None, Some(data)) => rsx! {
            BarChart { labels: data.labels.clone(), series: chart_series(data) }
        },
        (None, None) => rsx! {
            Skeleton { class: "report-skeleton" }
        },
    };

    rsx! {
        Card { class: "report-panel",
            CardHeader {
                CardTitle { "{title}" }
                CardDescription { "{start_date} to {end_date}" }
            }
            CardContent {
                {body}
                if report.loading && report.data.is_some() {
                    p { class: "report-refreshing", aria_live: "polite", "Updating…" }
                }
            }
        }
    }
}

/// Report browser: pick a report and a period.
#[component]
fn ReportsPage() -> Element {
    let today = Utc::now().date_naive();
    let mut kind = use_signal(|| ReportKind::Contracts);
    let mut range = use_signal(|| DateRange::trailing_months(today, 6));

    let current_kind = kind();
    let DateRange {
        start_date,
        end_date,
    } = range();

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./reports.css") }
        PageHeader {
            title: "Reports",
            subtitle: "Contract activity by month".to_string(),
        }

        div { class: "report-controls",
            div { class: "report-kinds", role: "tablist",
                for option in ReportKind::ALL {
                    Button {
                        key: "{option:?}",
                        variant: if option == current_kind { ButtonVariant::Primary } else { ButtonVariant::Secondary },
                        role: "tab",
                        aria_selected: option == current_kind,
                        onclick: move |_| kind.set(option),
                        {option.title()}
                    }
                }
            }
            div { class: "report-range",
                for (months, label) in PRESETS {
                    Button {
                        key: "{months}",
                        variant: ButtonVariant::Ghost,
                        onclick: move |_| range.set(DateRange::trailing_months(today, months)),
                        "{label}"
                    }
                }
                label { class: "report-date",
                    "From"
                    input {
                        r#type: "date",
                        value: "{start_date}",
                        onchange: move |e: FormEvent| range.with_mut(|r| r.start_date = e.value()),
                    }
                }
                label { class: "report-date",
                    "To"
                    input {
                        r#type: "date",
                        value: "{end_date}",
                        onchange: move |e: FormEvent| range.with_mut(|r| r.end_date = e.value()),
                    }
                }
            }
        }

        ReportPanel { key: "{current_kind:?}", kind: current_kind, range }
    }
}

#[component]
pub fn AdminReports() -> Element {
    rsx! { ReportsPage {} }
}

#[component]
pub fn ReviewerReports() -> Element {
    rsx! { ReportsPage {} }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::Dataset;

    #[test]
    fn every_dataset_becomes_a_series() {
        let data = ReportData {
            labels: vec!["2024-01".into(), "2024-02".into()],
            datasets: vec![
                Dataset {
                    label: "active".into(),
                    data: vec![3.0, 1.0],
                },
                Dataset {
                    label: "pending".into(),
                    data: vec![0.0, 2.0],
                },
            ],
        };
        let series = chart_series(&data);
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].label, "pending");
        assert_eq!(series[1].values, vec![0.0, 2.0]);
    }

    #[test]
    fn presets_fit_the_server_limit() {
        let today = chrono::NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        for (months, _) in PRESETS {
            let range = DateRange::trailing_months(today, months);
            assert!(range.bounds().is_ok(), "{months} months");
            assert_eq!(range.month_labels().unwrap().len(), months as usize);
        }
    }
}

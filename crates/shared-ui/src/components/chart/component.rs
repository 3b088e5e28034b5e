use dioxus::prelude::*;

/// One coloured series of a [`BarChart`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub values: Vec<f64>,
}

/// Bar height as a percentage of the tallest bar, rounded to one decimal.
/// Negative and non-finite values draw as empty bars.
pub fn bar_percent(value: f64, max: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 || !max.is_finite() || max <= 0.0 {
        return 0.0;
    }
    ((value / max).min(1.0) * 1000.0).round() / 10.0
}

fn chart_max(series: &[ChartSeries]) -> f64 {
    series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
}

/// Grouped bar chart: one group per label, one bar per series.
///
/// Series shorter than `labels` leave the missing bars empty.
#[component]
pub fn BarChart(
    labels: Vec<String>,
    series: Vec<ChartSeries>,
    #[props(default)] caption: String,
) -> Element {
    let max = chart_max(&series);

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        figure { class: "bar-chart",
            if !caption.is_empty() {
                figcaption { class: "bar-chart-caption", "{caption}" }
            }
            ul { class: "bar-chart-legend",
                for (i, s) in series.iter().enumerate() {
                    li { key: "{s.label}", "data-series": "{i}", "{s.label}" }
                }
            }
            div { class: "bar-chart-groups",
                for (col, label) in labels.iter().enumerate() {
                    div { key: "{label}", class: "bar-chart-group",
                        div { class: "bar-chart-bars",
                            for (i, s) in series.iter().enumerate() {
                                {
                                    let value = s.values.get(col).copied().unwrap_or(0.0);
                                    let pct = bar_percent(value, max);
                                    rsx! {
                                        div {
                                            key: "{i}",
                                            class: "bar",
                                            "data-series": "{i}",
                                            style: "height: {pct}%",
                                            title: "{s.label}: {value}",
                                        }
                                    }
                                }
                            }
                        }
                        span { class: "bar-chart-label", "{label}" }
                    }
                }
            }
        }
    }
}

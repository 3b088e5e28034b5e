use dioxus::prelude::*;
use shared_types::{DateRange, ReportKind};
use shared_ui::{PageHeader, StatCard};

use super::{stats_view, use_dashboard_stats, StatsError};
use crate::routes::reports::ReportPanel;

#[component]
pub fn ReviewerDashboard() -> Element {
    let stats = use_dashboard_stats();
    let (current, error) = stats_view(&stats);
    let range = use_signal(|| DateRange::trailing_months(chrono::Utc::now().date_naive(), 3));

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./dashboard.css") }
        PageHeader { title: "Review queue" }
        StatsError { message: error }
        div { class: "stats-grid",
            StatCard {
                label: "Awaiting review",
                value: current.as_ref().map(|s| s.pending_reviews),
            }
            StatCard {
                label: "Active contracts",
                value: current.as_ref().map(|s| s.active_contracts),
            }
        }
        ReportPanel { kind: ReportKind::Premiums, range }
    }
}

use dioxus::prelude::*;
use shared_ui::{PageHeader, StatCard};

use super::{stats_view, use_dashboard_stats, StatsError};
use crate::routes::Route;

/// Agents only see numbers for their own book of business.
#[component]
pub fn AgentDashboard() -> Element {
    let stats = use_dashboard_stats();
    let (current, error) = stats_view(&stats);

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./dashboard.css") }
        PageHeader { title: "My book",
            Link { to: Route::AgentClients {}, class: "button-link", "View clients" }
        }
        StatsError { message: error }
        div { class: "stats-grid",
            StatCard {
                label: "My clients",
                value: current.as_ref().map(|s| s.total_clients),
            }
            StatCard {
                label: "Active contracts",
                value: current.as_ref().map(|s| s.active_contracts),
            }
            StatCard {
                label: "Awaiting review",
                value: current.as_ref().map(|s| s.pending_reviews),
                hint: "Contracts a reviewer has not signed off yet",
            }
        }
    }
}

mod admin;
mod agent;
mod reviewer;

pub use admin::AdminDashboard;
pub use agent::AgentDashboard;
pub use reviewer::ReviewerDashboard;

use dioxus::prelude::*;
use shared_types::{AppError, DashboardStats};
use shared_ui::{Alert, AlertKind};

/// Counters for the signed-in role. `None` until the first response.
fn use_dashboard_stats() -> Resource<Result<DashboardStats, String>> {
    use_resource(|| async move {
        server::api::get_dashboard_stats()
            .await
            .map_err(|e| AppError::friendly_message(&e.to_string()))
    })
}

/// Split the resource into card values and an error banner.
fn stats_view(
    stats: &Resource<Result<DashboardStats, String>>,
) -> (Option<DashboardStats>, Option<String>) {
    match &*stats.read() {
        Some(Ok(current)) => (Some(current.clone()), None),
        Some(Err(message)) => (None, Some(message.clone())),
        None => (None, None),
    }
}

#[component]
fn StatsError(message: Option<String>) -> Element {
    match message {
        Some(message) => rsx! {
            Alert { kind: AlertKind::Error, "{message}" }
        },
        None => rsx! {},
    }
}

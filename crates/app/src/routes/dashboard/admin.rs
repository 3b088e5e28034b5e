use dioxus::prelude::*;
use shared_types::{AppError, DateRange, ReportKind};
use shared_ui::{
    Alert, AlertKind, Card, CardContent, CardHeader, CardTitle, PageHeader, Skeleton, StatCard,
};

use super::{stats_view, use_dashboard_stats, StatsError};
use crate::routes::reports::ReportPanel;
use crate::routes::users::{newest, UsersTable};
use crate::routes::Route;

const RECENT_USERS: usize = 5;

#[component]
pub fn AdminDashboard() -> Element {
    let stats = use_dashboard_stats();
    let (current, error) = stats_view(&stats);
    let range = use_signal(|| DateRange::trailing_months(chrono::Utc::now().date_naive(), 6));

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./dashboard.css") }
        PageHeader {
            title: "Administration",
            subtitle: "Accounts, clients and contracts across the agency".to_string(),
        }
        StatsError { message: error }
        div { class: "stats-grid",
            StatCard { label: "Users", value: current.as_ref().map(|s| s.total_users) }
            StatCard { label: "Clients", value: current.as_ref().map(|s| s.total_clients) }
            StatCard {
                label: "Active contracts",
                value: current.as_ref().map(|s| s.active_contracts),
            }
            StatCard {
                label: "Awaiting review",
                value: current.as_ref().map(|s| s.pending_reviews),
            }
        }
        div { class: "dashboard-panels",
            ReportPanel { kind: ReportKind::Contracts, range }
            RecentUsers {}
        }
    }
}

#[component]
fn RecentUsers() -> Element {
    let users = use_resource(|| async move {
        server::api::list_users()
            .await
            .map(|rows| newest(rows, RECENT_USERS))
            .map_err(|e| AppError::friendly_message(&e.to_string()))
    });

    let body = match &*users.read() {
        None => rsx! { Skeleton { class: "skeleton-row" } },
        Some(Err(message)) => rsx! {
            Alert { kind: AlertKind::Error, "{message}" }
        },
        Some(Ok(rows)) => rsx! { UsersTable { rows: rows.clone() } },
    };

    rsx! {
        Card { class: "recent-users",
            CardHeader {
                CardTitle { "Recent users" }
                Link { to: Route::AdminUsers {}, "All users" }
            }
            CardContent { {body} }
        }
    }
}

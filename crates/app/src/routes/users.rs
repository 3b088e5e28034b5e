use dioxus::prelude::*;
use shared_types::{AppError, Role, UserSummary};
use shared_ui::{
    Alert, AlertKind, Badge, BadgeTone, DataTable, DataTableCell, DataTableRow, PageHeader,
    PageSkeleton,
};

const COLUMNS: [&str; 5] = ["Name", "Username", "Email", "Role", "Joined"];

fn role_tone(role: &str) -> BadgeTone {
    match Role::parse(role) {
        Some(Role::Admin) => BadgeTone::Danger,
        Some(Role::Agent) => BadgeTone::Info,
        Some(Role::Reviewer) => BadgeTone::Warning,
        None => BadgeTone::Neutral,
    }
}

/// The `limit` most recently created accounts.
pub(crate) fn newest(mut rows: Vec<UserSummary>, limit: usize) -> Vec<UserSummary> {
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    rows.truncate(limit);
    rows
}

fn role_text(role: &str) -> String {
    Role::parse(role)
        .map(|r| r.label().to_string())
        .unwrap_or_else(|| role.to_string())
}

/// Every account, ordered by name.
#[component]
pub fn AdminUsers() -> Element {
    let users = use_resource(|| async move {
        server::api::list_users()
            .await
            .map_err(|e| AppError::friendly_message(&e.to_string()))
    });

    let body = match &*users.read() {
        None => rsx! { PageSkeleton { rows: 5 } },
        Some(Err(message)) => rsx! {
            Alert { kind: AlertKind::Error, "{message}" }
        },
        Some(Ok(rows)) => rsx! { UsersTable { rows: rows.clone() } },
    };

    rsx! {
        PageHeader {
            title: "Users",
            subtitle: "Everyone with access to the console".to_string(),
        }
        {body}
    }
}

#[component]
pub(crate) fn UsersTable(rows: Vec<UserSummary>) -> Element {
    let empty = rows.is_empty().then(|| "No users yet".to_string());

    rsx! {
        DataTable { columns: COLUMNS.to_vec(), empty,
            for user in rows {
                DataTableRow { key: "{user.id}",
                    DataTableCell { "{user.display_name}" }
                    DataTableCell { muted: true, "{user.username}" }
                    DataTableCell { "{user.email}" }
                    DataTableCell {
                        Badge { tone: role_tone(&user.role), {role_text(&user.role)} }
                    }
                    DataTableCell { muted: true, {user.created_at.format("%Y-%m-%d").to_string()} }
                }
            }
        }
    }
}

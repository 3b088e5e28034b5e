use dioxus::prelude::*;
use shared_types::{AppError, ClientSummary};
use shared_ui::{
    Alert, AlertKind, Badge, BadgeTone, DataTable, DataTableCell, DataTableRow, PageHeader,
    PageSkeleton,
};

const COLUMNS: [&str; 5] = ["Client", "Email", "Phone", "Policies", "Status"];

fn status_tone(status: &str) -> BadgeTone {
    match status {
        "active" => BadgeTone::Success,
        "inactive" => BadgeTone::Neutral,
        _ => BadgeTone::Warning,
    }
}

/// Clients assigned to the signed-in agent.
#[component]
pub fn AgentClients() -> Element {
    let clients = use_resource(|| async move {
        server::api::list_clients()
            .await
            .map_err(|e| AppError::friendly_message(&e.to_string()))
    });

    let body = match &*clients.read() {
        None => rsx! { PageSkeleton { rows: 4 } },
        Some(Err(message)) => rsx! {
            Alert { kind: AlertKind::Error, "{message}" }
        },
        Some(Ok(rows)) => rsx! { ClientsTable { rows: rows.clone() } },
    };

    rsx! {
        PageHeader { title: "My clients" }
        {body}
    }
}

#[component]
fn ClientsTable(rows: Vec<ClientSummary>) -> Element {
    let empty = rows
        .is_empty()
        .then(|| "No clients are assigned to you yet".to_string());

    rsx! {
        DataTable { columns: COLUMNS.to_vec(), empty,
            for client in rows {
                DataTableRow { key: "{client.id}",
                    DataTableCell { "{client.full_name}" }
                    DataTableCell { "{client.email}" }
                    DataTableCell { muted: client.phone.is_none(),
                        {client.phone.clone().unwrap_or_else(|| "None".to_string())}
                    }
                    DataTableCell { "{client.policy_count}" }
                    DataTableCell {
                        Badge { tone: status_tone(&client.status), "{client.status}" }
                    }
                }
            }
        }
    }
}

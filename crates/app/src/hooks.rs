use dioxus::prelude::*;
use shared_types::{AppError, DateRange, ReportData, ReportKind};

/// Snapshot of a report fetch.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ReportQuery {
    /// Last successful result. Kept while a newer range is loading.
    pub data: Option<ReportData>,
    pub loading: bool,
    /// Friendly message of the last failure.
    pub error: Option<String>,
}

/// Fetch `kind` for `range`, refetching whenever the range signal changes.
pub fn use_report(kind: ReportKind, range: Signal<DateRange>) -> ReportQuery {
    let resource = use_resource(move || {
        let range = range();
        async move {
            server::api::get_report(kind, range)
                .await
                .map_err(|e| {
                    tracing::warn!(?kind, error = %e, "report fetch failed");
                    AppError::friendly_message(&e.to_string())
                })
        }
    });

    let loading = !resource.finished();
    match &*resource.read() {
        Some(Ok(data)) => ReportQuery {
            data: Some(data.clone()),
            loading,
            error: None,
        },
        Some(Err(message)) => ReportQuery {
            data: None,
            loading,
            error: Some(message.clone()),
        },
        None => ReportQuery {
            loading: true,
            ..ReportQuery::default()
        },
    }
}

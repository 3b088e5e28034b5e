use dioxus::prelude::*;

/// Scrollable table with a fixed header row.
///
/// Rows are passed as children (`DataTableRow`s). With `empty` set and no
/// rows, a single full-width row shows the message instead.
#[component]
pub fn DataTable(
    columns: Vec<&'static str>,
    #[props(default)] empty: Option<String>,
    children: Element,
) -> Element {
    let span = columns.len().max(1);

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div { class: "data-table",
            table {
                thead {
                    tr {
                        for column in columns.iter() {
                            th { key: "{column}", scope: "col", "{column}" }
                        }
                    }
                }
                tbody {
                    if let Some(message) = empty {
                        tr { class: "data-table-empty",
                            td { colspan: "{span}", "{message}" }
                        }
                    } else {
                        {children}
                    }
                }
            }
        }
    }
}

#[component]
pub fn DataTableRow(children: Element) -> Element {
    rsx! {
        tr { class: "data-table-row", {children} }
    }
}

#[component]
pub fn DataTableCell(#[props(default)] muted: bool, children: Element) -> Element {
    rsx! {
        td { class: if muted { "muted" }, {children} }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_headers_and_rows() {
        let html = dioxus_ssr::render_element(rsx! {
            DataTable { columns: vec!["Name", "Email"],
                DataTableRow {
                    DataTableCell { "Ada" }
                    DataTableCell { muted: true, "ada@example.com" }
                }
            }
        });
        assert!(html.contains("<th scope=\"col\">Name</th>"));
        assert!(html.contains(">Ada</td>"));
        assert!(html.contains("class=\"muted\""));
    }

    #[test]
    fn empty_message_spans_all_columns() {
        let html = dioxus_ssr::render_element(rsx! {
            DataTable {
                columns: vec!["A", "B", "C"],
                empty: Some("No clients yet".to_string()),
            }
        });
        assert!(html.contains("colspan=\"3\""));
        assert!(html.contains("No clients yet"));
    }
}

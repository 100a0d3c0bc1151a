//! Table rendering for access and attack log pages.

#[cfg(test)]
#[path = "log_table_test.rs"]
mod log_table_test;

use leptos::prelude::*;

use crate::net::types::LogEntry;
use crate::util::format::{format_timestamp, truncate_path};

/// Result-count options offered by the log pages.
pub const LIMIT_CHOICES: [u32; 4] = [50, 100, 200, 500];

const PATH_DISPLAY_MAX: usize = 64;

/// CSS modifier for a row.
#[must_use]
pub fn row_class(entry: &LogEntry) -> &'static str {
    if entry.is_attack || entry.status.as_deref() == Some("blocked") {
        "log-row log-row--blocked"
    } else if entry.is_blacklisted {
        "log-row log-row--blacklisted"
    } else {
        "log-row"
    }
}

/// Newest entries first; the backend returns them oldest first.
#[must_use]
pub fn newest_first(mut logs: Vec<LogEntry>) -> Vec<LogEntry> {
    logs.reverse();
    logs
}

#[component]
pub fn LogTable(#[prop(into)] entries: Signal<Vec<LogEntry>>, show_reason: bool) -> impl IntoView {
    view! {
        <table class="log-table">
            <thead>
                <tr>
                    <th>"Time"</th>
                    <th>"Client"</th>
                    <th>"Location"</th>
                    <th>"Request"</th>
                    <th>"Status"</th>
                    {show_reason.then(|| view! { <th>"Reason"</th> })}
                </tr>
            </thead>
            <tbody>
                {move || {
                    newest_first(entries.get())
                        .into_iter()
                        .map(|entry| {
                            let class = row_class(&entry);
                            let family = if entry.is_ipv6 { "IPv6" } else { "IPv4" };
                            let location = entry.location_label().unwrap_or_else(|| "-".to_owned());
                            let status = entry.status.clone().unwrap_or_else(|| {
                                if entry.is_attack { "blocked".to_owned() } else { "allowed".to_owned() }
                            });
                            let reason = entry.attack_message.clone().unwrap_or_default();
                            let request = format!("{} {}", entry.method, truncate_path(&entry.path, PATH_DISPLAY_MAX));
                            view! {
                                <tr class=class>
                                    <td>{format_timestamp(entry.timestamp)}</td>
                                    <td>
                                        <span class="log-table__ip">{entry.ip}</span>
                                        <span class="log-table__family">{family}</span>
                                    </td>
                                    <td>{location}</td>
                                    <td title=entry.path>{request}</td>
                                    <td>{status}</td>
                                    {show_reason.then(|| view! { <td>{reason}</td> })}
                                </tr>
                            }
                        })
                        .collect_view()
                }}
            </tbody>
        </table>
    }
}

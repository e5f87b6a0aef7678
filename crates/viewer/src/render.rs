//! Plain-text rendering of queue snapshots.

use std::fmt::Write;

use tunely_core::types::Cents;
use tunely_core::viewer::ViewerRole;

use crate::client::QueueSnapshotView;

/// Shown once a session has ended or could not be found.
pub const CLOSED_MESSAGE: &str = "Not accepting requests right now.";

/// Format minor units as dollars, e.g. `1250` -> `$12.50`.
pub fn format_cents(amount: Cents) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{sign}${}.{:02}", abs / 100, abs % 100)
}

/// Render a snapshot for `role`.
///
/// The performer sees totals and requester names; the public display and
/// the requester page see only the ranked titles and tips.
pub fn render(role: ViewerRole, artist: &str, snapshot: &QueueSnapshotView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{artist} -- {role} view");

    if role == ViewerRole::Performer {
        let _ = writeln!(
            out,
            "{} queued, {} waiting",
            snapshot.queued_count,
            format_cents(snapshot.total_value)
        );
    }

    if snapshot.items.is_empty() {
        out.push_str("No requests yet.\n");
        return out;
    }

    for (rank, item) in snapshot.items.iter().enumerate() {
        let _ = write!(
            out,
            "{:>2}. {:<40} {:>9}",
            rank + 1,
            item.song_title,
            format_cents(item.tip_amount)
        );
        if role == ViewerRole::Performer {
            if let Some(name) = &item.requester_name {
                let _ = write!(out, "  ({name})");
            }
        }
        out.push('\n');
    }
    out
}

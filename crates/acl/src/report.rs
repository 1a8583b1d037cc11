//! Human-readable rendering of an ACL entry list for the CLI.

use waymark_core::PermissionEntry;

/// Renders the entry list of one resource as a formatted report.
pub fn render(resource_path: &str, entries: &[PermissionEntry]) -> String {
    let mut out = String::new();

    let everyone = entries.iter().filter(|e| e.is_everyone()).count();
    let agents: usize = entries
        .iter()
        .filter_map(|e| e.agents.as_ref())
        .map(Vec::len)
        .sum();

    out.push_str("\n");
    out.push_str("╔══════════════════════════════════════════════════════════════╗\n");
    out.push_str("║                      WAYMARK ACL REPORT                      ║\n");
    out.push_str("╠══════════════════════════════════════════════════════════════╣\n");
    out.push_str(&format!("║  Resource:        {:>43} ║\n", truncate(resource_path, 43)));
    out.push_str(&format!("║  Entries:         {:>43} ║\n", entries.len()));
    out.push_str(&format!("║  Everyone grants: {:>43} ║\n", everyone));
    out.push_str(&format!("║  Named agents:    {:>43} ║\n", agents));
    out.push_str("╠══════════════════════════════════════════════════════════════╣\n");

    if entries.is_empty() {
        out.push_str("║  No entries — the resource inherits its container ACL.       ║\n");
    } else {
        for (i, entry) in entries.iter().enumerate() {
            let modes = entry
                .modes
                .iter()
                .map(|m| m.to_string())
                .collect::<Vec<_>>()
                .join(", ");

            match &entry.agents {
                None => out.push_str(&format!("║  {}. everyone -> {}\n", i + 1, modes)),
                Some(agents) => {
                    let first = agents.first().map(String::as_str).unwrap_or("<empty>");
                    let rest = agents.len().saturating_sub(1);
                    if rest > 0 {
                        out.push_str(&format!(
                            "║  {}. {} (+{} more) -> {}\n",
                            i + 1,
                            truncate(first, 38),
                            rest,
                            modes
                        ));
                    } else {
                        out.push_str(&format!(
                            "║  {}. {} -> {}\n",
                            i + 1,
                            truncate(first, 38),
                            modes
                        ));
                    }
                }
            }
        }
    }

    out.push_str("╚══════════════════════════════════════════════════════════════╝\n");
    out
}

/// Keeps the tail of the path, which carries the distinguishing segment.
fn truncate(s: &str, max: usize) -> String {
    let count = s.chars().count();
    if count <= max {
        return s.to_string();
    }
    let tail: String = s.chars().skip(count - (max - 1)).collect();
    format!("…{tail}")
}

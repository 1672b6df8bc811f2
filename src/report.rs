use chrono::{DateTime, Local};

use crate::vault::model::DeletedItem;

const RULE_WIDTH: usize = 50;

/// Renders the deleted-items sequence as a human-readable text report.
pub fn render_deleted_report(deleted: &[DeletedItem]) -> String {
    render_at(deleted, Local::now())
}

fn render_at(deleted: &[DeletedItem], generated: DateTime<Local>) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("Deleted Items Report".to_string());
    lines.push("=".repeat(RULE_WIDTH));
    lines.push(format!("Generated: {}", generated.format("%Y-%m-%d %H:%M:%S")));
    lines.push(String::new());

    for (idx, record) in deleted.iter().enumerate() {
        let item = &record.item;
        lines.push(format!("Item {}: {}", idx + 1, item.name));
        lines.push(format!("  Reason for Deletion: {}", record.reason));

        let username = item
            .login
            .as_ref()
            .and_then(|login| login.username.as_deref())
            .unwrap_or("N/A");
        let password = item
            .login
            .as_ref()
            .and_then(|login| login.password.as_deref())
            .unwrap_or("N/A");
        lines.push(format!("  Username: {}", username));
        lines.push(format!("  Password: {}", password));

        let uris = item
            .login
            .as_ref()
            .and_then(|login| login.uris.as_deref())
            .unwrap_or(&[]);
        if uris.is_empty() {
            lines.push("  URIs: None".to_string());
        } else {
            lines.push("  URIs:".to_string());
            for entry in uris {
                lines.push(format!("    - {}", entry.uri.as_deref().unwrap_or("Unknown URI")));
            }
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample() -> Vec<DeletedItem> {
        serde_json::from_value(json!([
            {
                "name": "Dup",
                "reasonForDeletion": "Duplicate of Original",
                "login": {
                    "username": "u",
                    "password": "p",
                    "uris": [{"uri": "https://example.com/"}, {"uri": null}]
                }
            },
            {
                "name": "Bare",
                "reasonForDeletion": "Duplicate of Original",
                "login": {"username": null, "password": null, "uris": []}
            }
        ]))
        .unwrap()
    }

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn test_report_header() {
        let report = render_at(&[], fixed_time());
        let mut lines = report.lines();
        assert_eq!(lines.next(), Some("Deleted Items Report"));
        assert_eq!(lines.next(), Some("=".repeat(50).as_str()));
        assert_eq!(lines.next(), Some("Generated: 2024-01-02 03:04:05"));
    }

    #[test]
    fn test_report_lists_items_with_reasons() {
        let report = render_at(&sample(), fixed_time());

        assert!(report.contains("Item 1: Dup"));
        assert!(report.contains("  Reason for Deletion: Duplicate of Original"));
        assert!(report.contains("  Username: u"));
        assert!(report.contains("  Password: p"));
        assert!(report.contains("    - https://example.com/"));
        assert!(report.contains("    - Unknown URI"));
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let report = render_at(&sample(), fixed_time());

        assert!(report.contains("Item 2: Bare"));
        assert!(report.contains("  Username: N/A"));
        assert!(report.contains("  Password: N/A"));
        assert!(report.contains("  URIs: None"));
    }
}

//! Plain terminal rendering.
//!
//! Every function returns the full text so the binary decides where it
//! goes; nothing here prints.

use crate::cleanup::{CheckFailure, ConfigSetting, ConfigWarning, Edit, SettingSpec};
use crate::diff::{ChangeKind, ChangeRecord, ComparisonResult};
use crate::error::MalformedLine;
use crate::paginate::Page;
use crate::snapshot::Snapshot;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn snapshots(list: &[Snapshot]) -> String {
    if list.is_empty() {
        return String::from("No snapshots found.\n");
    }

    let mut output = format!(
        "{:<6} {:<7} {:<6} {:<19} {:<8} {:<10} {:<24} {}\n",
        "#", "Type", "Pre #", "Date", "User", "Cleanup", "Description", "Userdata"
    );
    output.push_str(&"-".repeat(96));
    output.push('\n');

    for s in list {
        let date = s
            .date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| "-".to_string());
        let pre = s
            .pre_number
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string());
        output.push_str(&format!(
            "{:<6} {:<7} {:<6} {:<19} {:<8} {:<10} {:<24} {}\n",
            s.number,
            s.kind.as_str(),
            pre,
            date,
            s.user,
            s.cleanup.as_deref().unwrap_or("-"),
            s.description,
            s.userdata.as_deref().unwrap_or("-"),
        ));
    }
    output
}

pub fn summary(result: &ComparisonResult) -> String {
    let summary = result.summary();
    let mut output = format!(
        "Snapshot comparison ({} -> {})\n",
        result.base(),
        result.target()
    );
    output.push_str(&"-".repeat(40));
    output.push('\n');

    for kind in ChangeKind::ALL {
        output.push_str(&format!("  {:<10} {:>8}\n", label(kind), summary.count(kind)));
    }
    output.push_str(&format!("  {:<10} {:>8}\n", "Total", summary.total));

    if result.is_empty() {
        output.push_str("\nNo changes to display.\n");
    }
    output.push_str(&malformed(result.malformed()));
    output
}

pub fn page(kind: ChangeKind, page: &Page<'_, ChangeRecord>) -> String {
    let mut output = format!(
        "{} files (page {}/{})\n",
        label(kind),
        page.index + 1,
        page.page_count
    );

    if page.items.is_empty() {
        output.push_str(&format!("No {} files.\n", kind.as_str()));
        return output;
    }

    for (offset, record) in page.items.iter().enumerate() {
        output.push_str(&format!("{:>5}  {}\n", page.start() + offset + 1, record.path));
    }

    let first = page.start() + 1;
    let last = page.start() + page.items.len();
    output.push_str(&format!("\nShowing {first}-{last} of {} files\n", page.total));

    // pages are 1-based on the command line
    if page.has_prev() {
        output.push_str(&format!("previous: --page {}\n", page.index));
    }
    if page.has_next() {
        output.push_str(&format!("next: --page {}\n", page.index + 2));
    }
    output
}

pub fn settings(name: &str, list: &[ConfigSetting], warnings: &[ConfigWarning]) -> String {
    let mut output = format!("Cleanup settings for {name}\n");
    output.push_str(&"-".repeat(40));
    output.push('\n');

    for setting in list {
        match &setting.value {
            Some(value) => output.push_str(&format!("  {:<24} {value}\n", setting.key)),
            None => output.push_str(&format!(
                "  {:<24} (unset, snapper default {})\n",
                setting.key, setting.default
            )),
        }
    }

    if !warnings.is_empty() {
        output.push('\n');
        for warning in warnings {
            output.push_str(&format!("[warning] {warning}\n"));
        }
    }
    output
}

pub fn keys(schema: &[SettingSpec]) -> String {
    let mut output = String::new();
    for spec in schema {
        output.push_str(&format!(
            "{:<24} {:<28} {}\n",
            spec.key,
            spec.value_type.describe(),
            spec.description
        ));
    }
    output
}

pub fn check(failures: &[CheckFailure]) -> String {
    if failures.is_empty() {
        return String::from("All cleanup settings are valid.\n");
    }
    let mut output = String::new();
    for f in failures {
        output.push_str(&format!("{}={:?}: {}\n", f.key, f.value, f.violation));
    }
    output
}

pub fn edit(edit: &Edit, path: &str) -> String {
    match &edit.old {
        Some(old) => format!("Updated {} from {old} to {} in {path}\n", edit.key, edit.new),
        None => format!("Added {}={} to {path}\n", edit.key, edit.new),
    }
}

fn malformed(lines: &[MalformedLine]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let mut output = format!("\n{} line(s) could not be classified:\n", lines.len());
    for line in lines {
        output.push_str(&format!("  {line}\n"));
    }
    output
}

fn label(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Added => "Added",
        ChangeKind::Removed => "Removed",
        ChangeKind::Modified => "Modified",
        ChangeKind::Other => "Other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::compare;
    use crate::paginate;
    use crate::snapshot::parse_list;

    #[test]
    fn summary_lists_counts() {
        let result = compare(4, 9, ["+ /a", "+ /b", "- /c", "oops"]);
        let text = summary(&result);
        assert!(text.starts_with("Snapshot comparison (4 -> 9)"));
        assert!(text.contains("Added             2"));
        assert!(text.contains("Total             3"));
        assert!(text.contains("1 line(s) could not be classified"));
    }

    #[test]
    fn page_shows_position_and_navigation() {
        let lines: Vec<String> = (0..45).map(|i| format!("+ /f{i}")).collect();
        let result = compare(1, 2, lines);
        let added = result.bucket(ChangeKind::Added);
        let second = paginate::page(added, 1).unwrap();
        let text = page(ChangeKind::Added, &second);
        assert!(text.starts_with("Added files (page 2/3)"));
        assert!(text.contains("   21  /f20"));
        assert!(text.contains("Showing 21-40 of 45 files"));
        assert!(text.contains("previous: --page 1"));
        assert!(text.contains("next: --page 3"));
    }

    #[test]
    fn empty_page_is_still_rendered() {
        let result = compare(1, 2, ["+ /a"]);
        let empty = paginate::page(result.bucket(ChangeKind::Other), 0).unwrap();
        assert_eq!(page(ChangeKind::Other, &empty), "Other files (page 1/1)\nNo other files.\n");
    }

    #[test]
    fn snapshot_table_shows_every_column() {
        let listing = parse_list(
            " # | Type | Pre # | Date                | User | Cleanup | Description | Userdata\n\
             ---+------+-------+---------------------+------+---------+-------------+---------\n\
             7  | pre  |       | 2024-10-01 10:00:00 | root | number  | zypp        | important=yes\n\
             8  | post | 7     | 2024-10-01 10:01:00 | alice|         | zypp        |\n",
        )
        .unwrap();
        let text = snapshots(&listing.snapshots);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].contains("Pre #"));
        assert!(lines[0].contains("User"));
        assert!(lines[0].ends_with("Userdata"));
        assert!(lines[2].starts_with("7      pre     -      2024-10-01 10:00:00 root     number"));
        assert!(lines[2].ends_with("important=yes"));
        assert!(lines[3].starts_with("8      post    7      2024-10-01 10:01:00 alice    -"));
        assert!(lines[3].ends_with(" -"));
    }

    #[test]
    fn no_snapshots() {
        assert_eq!(snapshots(&[]), "No snapshots found.\n");
    }
}

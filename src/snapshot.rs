//! Snapshot records as reported by `snapper --iso list`.
//!
//! The listing is a table whose columns are located by header name, so
//! both the classic layout and newer ones with extra columns (e.g. "Used
//! Space") parse. Rows that do not fit are collected, not fatal.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::{Error, MalformedLine, Result};

const ISO_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotType {
    Single,
    Pre,
    Post,
}

impl SnapshotType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotType::Single => "single",
            SnapshotType::Pre => "pre",
            SnapshotType::Post => "post",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub number: u32,
    #[serde(rename = "type")]
    pub kind: SnapshotType,
    /// pre snapshot a post snapshot belongs to
    pub pre_number: Option<u32>,
    /// None for snapshot 0, the live system
    pub date: Option<NaiveDateTime>,
    pub user: String,
    pub cleanup: Option<String>,
    pub description: String,
    pub userdata: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct SnapshotListing {
    pub snapshots: Vec<Snapshot>,
    pub malformed: Vec<MalformedLine>,
}

/// Anything that can list the snapshots of one snapper configuration.
pub trait SnapshotSource {
    fn snapshots(&self) -> Result<SnapshotListing>;
}

pub fn ensure_known(snapshots: &[Snapshot], number: u32) -> Result<()> {
    if snapshots.iter().any(|s| s.number == number) {
        Ok(())
    } else {
        Err(Error::UnknownSnapshot(number))
    }
}

struct Columns {
    number: usize,
    kind: usize,
    pre_number: Option<usize>,
    date: usize,
    user: usize,
    cleanup: Option<usize>,
    description: usize,
    userdata: Option<usize>,
    width: usize,
}

impl Columns {
    fn from_header(cells: &[&str]) -> Option<Self> {
        let find = |name: &str| cells.iter().position(|c| *c == name);
        Some(Columns {
            number: find("#")?,
            kind: find("Type")?,
            pre_number: find("Pre #"),
            date: find("Date")?,
            user: find("User")?,
            cleanup: find("Cleanup"),
            description: find("Description")?,
            userdata: find("Userdata"),
            width: cells.len(),
        })
    }
}

/// Parse the full text of `snapper --iso list`.
pub fn parse_list(text: &str) -> Result<SnapshotListing> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(|(_, l)| !l.trim().is_empty());

    let Some((header_no, header)) = lines.next() else {
        return Ok(SnapshotListing::default());
    };

    let separator = if header.contains('│') { '│' } else { '|' };
    let header_cells: Vec<&str> = header.split(separator).map(str::trim).collect();
    let columns = Columns::from_header(&header_cells).ok_or_else(|| {
        Error::MalformedLine(MalformedLine {
            line: header_no,
            raw: header.to_string(),
            reason: "unrecognized snapshot list header",
        })
    })?;

    let mut listing = SnapshotListing::default();

    for (line_no, line) in lines {
        if is_rule(line) {
            continue;
        }
        match parse_row(line, separator, &columns) {
            Ok(snapshot) => listing.snapshots.push(snapshot),
            Err(reason) => {
                let bad = MalformedLine {
                    line: line_no,
                    raw: line.to_string(),
                    reason,
                };
                tracing::warn!("skipping snapshot row {bad}");
                listing.malformed.push(bad);
            }
        }
    }

    Ok(listing)
}

/// The `---+----` (or box drawing) line under the header.
fn is_rule(line: &str) -> bool {
    line.chars()
        .all(|c| matches!(c, '-' | '+' | '─' | '┼' | '━' | '╪' | ' '))
}

fn parse_row(line: &str, separator: char, columns: &Columns) -> std::result::Result<Snapshot, &'static str> {
    let cells: Vec<&str> = line.split(separator).map(str::trim).collect();
    if cells.len() < columns.width {
        return Err("too few columns");
    }

    let optional = |idx: Option<usize>| {
        idx.map(|i| cells[i])
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    };

    // snapper marks the default/active snapshot with trailing *, + or -
    let number = cells[columns.number]
        .trim_end_matches(['*', '+', '-'])
        .parse::<u32>()
        .map_err(|_| "invalid snapshot number")?;

    let kind = match cells[columns.kind] {
        "single" => SnapshotType::Single,
        "pre" => SnapshotType::Pre,
        "post" => SnapshotType::Post,
        _ => return Err("unknown snapshot type"),
    };

    let pre_number = match optional(columns.pre_number) {
        Some(n) => Some(n.parse::<u32>().map_err(|_| "invalid pre number")?),
        None => None,
    };

    let date = match cells[columns.date] {
        "" => None,
        raw => Some(NaiveDateTime::parse_from_str(raw, ISO_FORMAT).map_err(|_| "unparseable date")?),
    };

    Ok(Snapshot {
        number,
        kind,
        pre_number,
        date,
        user: cells[columns.user].to_string(),
        cleanup: optional(columns.cleanup),
        description: cells[columns.description].to_string(),
        userdata: optional(columns.userdata),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNICODE_LIST: &str = "\
 # │ Type   │ Pre # │ Date                │ User │ Cleanup │ Description           │ Userdata
───┼────────┼───────┼─────────────────────┼──────┼─────────┼───────────────────────┼─────────
0  │ single │       │                     │ root │         │ current               │
1* │ single │       │ 2024-10-01 10:00:00 │ root │         │ first root filesystem │
2  │ pre    │       │ 2024-10-02 11:00:00 │ root │ number  │ pacman -Syu           │ important=yes
3  │ post   │     2 │ 2024-10-02 11:05:00 │ root │ number  │                       │
";

    #[test]
    fn parses_unicode_table() {
        let listing = parse_list(UNICODE_LIST).unwrap();
        assert!(listing.malformed.is_empty());
        assert_eq!(listing.snapshots.len(), 4);

        let current = &listing.snapshots[0];
        assert_eq!(current.number, 0);
        assert_eq!(current.date, None);

        let first = &listing.snapshots[1];
        assert_eq!(first.number, 1);
        assert_eq!(first.description, "first root filesystem");
        assert_eq!(first.cleanup, None);

        let pre = &listing.snapshots[2];
        assert_eq!(pre.kind, SnapshotType::Pre);
        assert_eq!(pre.cleanup.as_deref(), Some("number"));
        assert_eq!(pre.userdata.as_deref(), Some("important=yes"));

        let post = &listing.snapshots[3];
        assert_eq!(post.kind, SnapshotType::Post);
        assert_eq!(post.pre_number, Some(2));
        assert_eq!(
            post.date.unwrap().format(ISO_FORMAT).to_string(),
            "2024-10-02 11:05:00"
        );
    }

    #[test]
    fn parses_ascii_table_with_extra_column() {
        let text = "\
 # | Type   | Pre # | Date                | User | Used Space | Cleanup  | Description | Userdata
---+--------+-------+---------------------+------+------------+----------+-------------+---------
5  | single |       | 2024-11-01 08:00:00 | root |  16.00 KiB | timeline | timeline    |
";
        let listing = parse_list(text).unwrap();
        assert_eq!(listing.snapshots.len(), 1);
        assert_eq!(listing.snapshots[0].number, 5);
        assert_eq!(listing.snapshots[0].cleanup.as_deref(), Some("timeline"));
    }

    #[test]
    fn bad_rows_are_collected() {
        let text = "\
 # | Type   | Pre # | Date                | User | Cleanup | Description | Userdata
---+--------+-------+---------------------+------+---------+-------------+---------
x  | single |       | 2024-10-01 10:00:00 | root |         | bad number  |
4  | weird  |       | 2024-10-01 10:00:00 | root |         | bad type    |
6  | single |       | yesterday           | root |         | bad date    |
7  | single
8  | single |       | 2024-10-01 10:00:00 | root |         | fine        |
";
        let listing = parse_list(text).unwrap();
        assert_eq!(listing.snapshots.len(), 1);
        assert_eq!(listing.snapshots[0].number, 8);

        let reasons: Vec<_> = listing.malformed.iter().map(|m| m.reason).collect();
        assert_eq!(
            reasons,
            ["invalid snapshot number", "unknown snapshot type", "unparseable date", "too few columns"]
        );
        assert_eq!(listing.malformed[0].line, 3);
    }

    #[test]
    fn unknown_header_is_an_error() {
        let err = parse_list("Number Kind When\n1 single now\n").unwrap_err();
        assert!(matches!(err, Error::MalformedLine(MalformedLine { line: 1, .. })));
    }

    #[test]
    fn empty_output_lists_nothing() {
        let listing = parse_list("\n").unwrap();
        assert!(listing.snapshots.is_empty());
    }

    #[test]
    fn ensure_known_checks_numbers() {
        let listing = parse_list(UNICODE_LIST).unwrap();
        assert!(ensure_known(&listing.snapshots, 3).is_ok());
        assert!(matches!(
            ensure_known(&listing.snapshots, 42),
            Err(Error::UnknownSnapshot(42))
        ));
    }
}

//! Snapshot comparison engine.
//!
//! Turns the raw `snapper status` listing between two snapshots into a
//! structured report:
//! - Classifies every line into added, removed, modified or other
//! - Buckets records by kind, keeping the tool's emission order
//! - Keeps malformed lines next to the result instead of failing

pub mod classify;

use serde::Serialize;

use crate::error::{MalformedLine, Result};
use crate::snapshot::{self, Snapshot};
pub use classify::{classify_line, ChangeKind, ChangeRecord, Classified};

/// Anything that can produce the raw status lines for a snapshot pair.
pub trait DiffSource {
    fn status_lines(&self, base: u32, target: u32) -> Result<Vec<String>>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSummary {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub other: usize,
    pub total: usize,
}

impl ChangeSummary {
    pub fn count(&self, kind: ChangeKind) -> usize {
        match kind {
            ChangeKind::Added => self.added,
            ChangeKind::Removed => self.removed,
            ChangeKind::Modified => self.modified,
            ChangeKind::Other => self.other,
        }
    }
}

/// Fields are private so the summary can never drift from the buckets.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    base: u32,
    target: u32,
    summary: ChangeSummary,
    added: Vec<ChangeRecord>,
    removed: Vec<ChangeRecord>,
    modified: Vec<ChangeRecord>,
    other: Vec<ChangeRecord>,
    malformed: Vec<MalformedLine>,
}

impl ComparisonResult {
    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn summary(&self) -> ChangeSummary {
        self.summary
    }

    pub fn bucket(&self, kind: ChangeKind) -> &[ChangeRecord] {
        match kind {
            ChangeKind::Added => &self.added,
            ChangeKind::Removed => &self.removed,
            ChangeKind::Modified => &self.modified,
            ChangeKind::Other => &self.other,
        }
    }

    pub fn malformed(&self) -> &[MalformedLine] {
        &self.malformed
    }

    pub fn is_empty(&self) -> bool {
        self.summary.total == 0
    }
}

/// Classify and bucket a full status listing.
pub fn compare<I, S>(base: u32, target: u32, lines: I) -> ComparisonResult
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result = ComparisonResult {
        base,
        target,
        summary: ChangeSummary::default(),
        added: Vec::new(),
        removed: Vec::new(),
        modified: Vec::new(),
        other: Vec::new(),
        malformed: Vec::new(),
    };

    for (idx, line) in lines.into_iter().enumerate() {
        match classify_line(idx + 1, line.as_ref()) {
            Classified::Record(record) => {
                let (bucket, count) = match record.kind {
                    ChangeKind::Added => (&mut result.added, &mut result.summary.added),
                    ChangeKind::Removed => (&mut result.removed, &mut result.summary.removed),
                    ChangeKind::Modified => (&mut result.modified, &mut result.summary.modified),
                    ChangeKind::Other => (&mut result.other, &mut result.summary.other),
                };
                bucket.push(record);
                *count += 1;
                result.summary.total += 1;
            }
            Classified::Blank => {}
            Classified::Malformed(bad) => {
                tracing::warn!("skipping status {bad}");
                result.malformed.push(bad);
            }
        }
    }

    tracing::debug!(
        base,
        target,
        total = result.summary.total,
        malformed = result.malformed.len(),
        "comparison built"
    );

    result
}

/// Validate both identifiers against the listing, then fetch and compare.
pub fn compare_snapshots(
    source: &dyn DiffSource,
    snapshots: &[Snapshot],
    base: u32,
    target: u32,
) -> Result<ComparisonResult> {
    snapshot::ensure_known(snapshots, base)?;
    snapshot::ensure_known(snapshots, target)?;

    let lines = source.status_lines(base, target)?;
    Ok(compare(base, target, lines))
}

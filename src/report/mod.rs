pub mod json;
pub mod text;

use serde::Serialize;

use crate::diff::{ChangeKind, ChangeRecord, ChangeSummary, ComparisonResult};
use crate::error::MalformedLine;
use crate::paginate::Page;

/// One page of one bucket, with enough context to render it on its own.
#[derive(Serialize)]
pub struct PageView<'a> {
    pub base: u32,
    pub target: u32,
    pub kind: ChangeKind,
    pub summary: ChangeSummary,
    pub page: Page<'a, ChangeRecord>,
    pub malformed: &'a [MalformedLine],
}

impl<'a> PageView<'a> {
    pub fn new(result: &'a ComparisonResult, kind: ChangeKind, page: Page<'a, ChangeRecord>) -> Self {
        PageView {
            base: result.base(),
            target: result.target(),
            kind,
            summary: result.summary(),
            page,
            malformed: result.malformed(),
        }
    }
}

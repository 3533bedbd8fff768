//! Fixed-size pages over any ordered slice.
//!
//! Paging is a pure function of (items, index, size). Callers own the
//! current index; "next" and "previous" are just `index + 1` and
//! `index - 1` run through the same bounds check.

use std::num::NonZeroUsize;

use serde::Serialize;

use crate::error::{Error, Result};

pub const PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<'a, T> {
    pub index: usize,
    pub size: usize,
    pub total: usize,
    pub page_count: usize,
    pub items: &'a [T],
}

impl<T> Page<'_, T> {
    /// Position of the first item on this page within the whole sequence.
    pub fn start(&self) -> usize {
        self.index * self.size
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.page_count
    }

    pub fn has_prev(&self) -> bool {
        self.index > 0
    }
}

/// Number of pages needed for `total` items. An empty sequence still has one
/// (empty) page so that it can be viewed.
pub fn page_count(total: usize, size: NonZeroUsize) -> usize {
    total.div_ceil(size.get()).max(1)
}

const DEFAULT_SIZE: NonZeroUsize = NonZeroUsize::MIN.saturating_add(PAGE_SIZE - 1);

pub fn page<T>(items: &[T], index: i64) -> Result<Page<'_, T>> {
    page_sized(items, index, DEFAULT_SIZE)
}

/// Same as [`page`] for a 1-based page number as users type it.
pub fn page_numbered<T>(items: &[T], number: i64) -> Result<Page<'_, T>> {
    page(items, number.saturating_sub(1))
}

pub fn page_sized<T>(items: &[T], index: i64, size: NonZeroUsize) -> Result<Page<'_, T>> {
    let pages = page_count(items.len(), size);

    let idx = usize::try_from(index)
        .ok()
        .filter(|i| *i < pages)
        .ok_or(Error::OutOfRange { index, pages })?;

    let start = idx * size.get();
    let end = (start + size.get()).min(items.len());

    Ok(Page {
        index: idx,
        size: size.get(),
        total: items.len(),
        page_count: pages,
        items: &items[start..end],
    })
}

pub fn next<'a, T>(items: &'a [T], current: &Page<'_, T>) -> Result<Page<'a, T>> {
    step(items, current, 1)
}

pub fn prev<'a, T>(items: &'a [T], current: &Page<'_, T>) -> Result<Page<'a, T>> {
    step(items, current, -1)
}

fn step<'a, T>(items: &'a [T], current: &Page<'_, T>, delta: i64) -> Result<Page<'a, T>> {
    let index = current.index as i64 + delta;
    let size = NonZeroUsize::new(current.size).unwrap_or(DEFAULT_SIZE);
    page_sized(items, index, size)
}

//! Injected chapter-to-page lookup.
//!
//! The navigator never computes chapter boundaries itself; whoever loads the
//! document supplies a table (from a table of contents, bookmarks, whatever).
//! Without one, every chapter command behaves like an unrecognized phrase.

use std::collections::HashMap;

/// Maps a spoken chapter number to a zero-indexed page.
pub trait ChapterTable: Send + Sync {
    /// Returns the first page of `chapter`, or `None` when the chapter is
    /// unknown.
    fn page_for_chapter(&self, chapter: u32) -> Option<u32>;
}

/// Table backed by an explicit chapter → page map.
#[derive(Debug, Clone, Default)]
pub struct StaticChapterTable {
    pages: HashMap<u32, u32>,
}

impl StaticChapterTable {
    pub fn new(pages: HashMap<u32, u32>) -> Self {
        Self { pages }
    }

    /// Build from (chapter, page) pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (u32, u32)>) -> Self {
        Self {
            pages: pairs.into_iter().collect(),
        }
    }
}

impl ChapterTable for StaticChapterTable {
    fn page_for_chapter(&self, chapter: u32) -> Option<u32> {
        self.pages.get(&chapter).copied()
    }
}

/// Absent chapter table: every lookup misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoChapters;

impl ChapterTable for NoChapters {
    fn page_for_chapter(&self, _chapter: u32) -> Option<u32> {
        None
    }
}

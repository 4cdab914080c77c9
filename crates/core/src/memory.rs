//! Memory — the append-only conversational log of a run.
//!
//! The only mutation is [`Memory::add_memory`]; entries are never edited or
//! removed. A `Memory` belongs to the caller, not the agent, so the same
//! agent can run many tasks and a caller can restore an earlier history by
//! passing in a pre-populated instance.

use serde::{Deserialize, Serialize};

/// Who produced a memory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryRole {
    /// The task and environment feedback
    User,
    /// Model replies
    Assistant,
}

/// A single entry in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEntry {
    #[serde(rename = "type")]
    pub role: MemoryRole,
    pub content: String,
}

impl MemoryEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MemoryRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MemoryRole::Assistant,
            content: content.into(),
        }
    }
}

/// Chronological, append-only sequence of [`MemoryEntry`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Memory {
    items: Vec<MemoryEntry>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a log from previously captured entries.
    pub fn from_entries(entries: impl IntoIterator<Item = MemoryEntry>) -> Self {
        Self {
            items: entries.into_iter().collect(),
        }
    }

    /// Append an entry.
    pub fn add_memory(&mut self, entry: MemoryEntry) {
        self.items.push(entry);
    }

    /// Entries in chronological order, optionally restricted to one role.
    pub fn get_memories(&self, role: Option<MemoryRole>) -> Vec<&MemoryEntry> {
        self.items
            .iter()
            .filter(|m| role.is_none_or(|r| m.role == r))
            .collect()
    }

    /// The first `limit` entries, oldest first.
    pub fn get_memories_limited(&self, limit: usize) -> &[MemoryEntry] {
        &self.items[..limit.min(self.items.len())]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MemoryEntry> {
        self.items.iter()
    }

    /// An owned copy of every entry.
    pub fn snapshot(&self) -> Vec<MemoryEntry> {
        self.items.clone()
    }

    /// The most recent entry, if any.
    pub fn last(&self) -> Option<&MemoryEntry> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Memory {
    type Item = &'a MemoryEntry;
    type IntoIter = std::slice::Iter<'a, MemoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

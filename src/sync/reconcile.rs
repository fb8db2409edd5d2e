//! Merge of a remote snapshot into the local quote store.
//!
//! Quotes are joined on normalized text (trimmed, lower-cased). Remote
//! records with no local match are appended; matches whose category
//! differs take the remote category. Local-only quotes are left alone.
//!
//! The merge is pure: it does no I/O. Persisting the result is up to the
//! caller, guided by [`ReconciliationSummary::has_changes`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::quotes::QuoteStore;
use crate::storage::{normalize_category, normalize_text, Quote, QuoteRecord};

/// One change applied by a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    /// A remote-only quote was appended.
    Added { text: String, category: String },

    /// A local quote took the remote category.
    CategoryChanged {
        text: String,
        from: String,
        to: String,
    },
}

impl std::fmt::Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Change::Added { text, category } => write!(f, "+ \"{text}\" [{category}]"),
            Change::CategoryChanged { text, from, to } => {
                write!(f, "~ \"{text}\" [{from} -> {to}]")
            }
        }
    }
}

/// Result of one merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    /// Remote-only quotes appended.
    pub added: usize,
    /// Local quotes whose category changed.
    pub updated: usize,
    /// Conflicts settled in favour of the remote.
    pub conflicts_resolved: usize,
    /// Per-quote detail, in the order applied.
    pub changes: Vec<Change>,
}

impl ReconciliationSummary {
    /// True if the merge modified the store.
    pub fn has_changes(&self) -> bool {
        self.added + self.updated > 0
    }

    /// One-line description for notifications.
    pub fn headline(&self) -> String {
        if !self.has_changes() {
            return "Already up to date".to_string();
        }
        let mut parts = Vec::new();
        if self.added > 0 {
            parts.push(format!("{} added", self.added));
        }
        if self.updated > 0 {
            parts.push(format!("{} updated", self.updated));
        }
        if self.conflicts_resolved > 0 {
            parts.push(format!(
                "{} conflict{} resolved (server wins)",
                self.conflicts_resolved,
                if self.conflicts_resolved == 1 { "" } else { "s" }
            ));
        }
        parts.join(", ")
    }
}

/// Merges `snapshot` into `store`, remote winning every category conflict.
///
/// Records with blank text are skipped. When the snapshot names the same
/// normalized text more than once, its last record for that text is the
/// one merged, at the position of the first.
pub fn reconcile(store: &mut QuoteStore, snapshot: &[QuoteRecord]) -> ReconciliationSummary {
    let mut summary = ReconciliationSummary::default();

    // First local occurrence wins when the store already holds duplicates
    let mut index: HashMap<String, usize> = HashMap::new();
    for (i, quote) in store.iter().enumerate() {
        index.entry(quote.key()).or_insert(i);
    }

    for (key, record) in collapse_snapshot(snapshot) {
        let remote_category = normalize_category(record.category.as_deref());

        match index.get(&key) {
            None => {
                let Some(quote) = Quote::new(record.text.clone(), &remote_category) else {
                    continue;
                };
                index.insert(key, store.len());
                summary.changes.push(Change::Added {
                    text: quote.text.clone(),
                    category: quote.category.clone(),
                });
                store.add(quote);
                summary.added += 1;
            }
            Some(&i) => {
                let Some(local) = store.get_mut(i) else {
                    continue;
                };
                if local.category == remote_category {
                    continue;
                }
                summary.changes.push(Change::CategoryChanged {
                    text: local.text.clone(),
                    from: std::mem::replace(&mut local.category, remote_category.clone()),
                    to: remote_category,
                });
                summary.updated += 1;
                summary.conflicts_resolved += 1;
            }
        }
    }

    summary
}

/// Keys the snapshot by normalized text, dropping blank keys.
fn collapse_snapshot(snapshot: &[QuoteRecord]) -> Vec<(String, &QuoteRecord)> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut collapsed: Vec<(String, &QuoteRecord)> = Vec::with_capacity(snapshot.len());

    for record in snapshot {
        let key = normalize_text(&record.text);
        if key.is_empty() {
            tracing::debug!("Skipping remote record with empty text");
            continue;
        }
        match positions.get(&key) {
            Some(&pos) => collapsed[pos].1 = record,
            None => {
                positions.insert(key.clone(), collapsed.len());
                collapsed.push((key, record));
            }
        }
    }

    collapsed
}

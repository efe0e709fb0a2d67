//! A single k-bucket: the least-recently-seen eviction policy for one
//! XOR-distance range.

use crate::domain::errors::SimError;
use crate::domain::value_objects::Identifier;

/// Outcome of a [`Bucket::insert`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The identifier was new and the bucket had room.
    Inserted,
    /// The identifier was already present; it moved to the
    /// most-recently-seen position.
    Updated,
    /// The bucket was full, its least-recently-seen entry failed a liveness
    /// check, and was evicted in favor of the candidate.
    Replaced(Identifier),
    /// The bucket was full and its least-recently-seen entry is still
    /// alive; the candidate was dropped.
    Rejected,
}

/// Holds up to `k` peer identifiers ordered from least- to
/// most-recently-seen.
///
/// Entries live at the back when freshly seen and age toward the front.
/// The front entry is always the eviction candidate.
#[derive(Debug, Clone)]
pub struct Bucket {
    k: usize,
    entries: Vec<Identifier>,
}

impl Bucket {
    /// Creates an empty bucket with capacity `k`.
    pub fn new(k: usize) -> Result<Self, SimError> {
        if k == 0 {
            return Err(SimError::InvalidArgument(
                "bucket capacity k must be > 0".to_string(),
            ));
        }
        Ok(Self { k, entries: Vec::with_capacity(k) })
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the bucket holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `true` if the bucket is at capacity.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.k
    }

    /// `true` if `id` is already present.
    pub fn contains(&self, id: &Identifier) -> bool {
        self.entries.contains(id)
    }

    /// Iterates entries, least-recently-seen first.
    pub fn iter(&self) -> impl Iterator<Item = &Identifier> {
        self.entries.iter()
    }

    /// The least-recently-seen entry, if any.
    pub fn oldest(&self) -> Option<&Identifier> {
        self.entries.first()
    }

    /// Inserts or refreshes `id`.
    ///
    /// - If `id` is already present, it moves to the back (most recently
    ///   seen) and this returns [`InsertOutcome::Updated`].
    /// - If the bucket has room, `id` is appended and this returns
    ///   [`InsertOutcome::Inserted`].
    /// - If the bucket is full, `ping` is called against the
    ///   least-recently-seen entry. A live response (`true`) keeps that
    ///   entry and drops `id` ([`InsertOutcome::Rejected`]); a failed
    ///   response (`false`) evicts it in favor of `id`
    ///   ([`InsertOutcome::Replaced`]).
    pub fn insert<F>(&mut self, id: Identifier, mut ping: F) -> InsertOutcome
    where
        F: FnMut(&Identifier) -> bool,
    {
        if let Some(pos) = self.entries.iter().position(|e| *e == id) {
            let existing = self.entries.remove(pos);
            self.entries.push(existing);
            return InsertOutcome::Updated;
        }

        if !self.is_full() {
            self.entries.push(id);
            return InsertOutcome::Inserted;
        }

        let oldest = self.entries[0];
        if ping(&oldest) {
            self.entries.remove(0);
            self.entries.push(oldest);
            InsertOutcome::Rejected
        } else {
            self.entries.remove(0);
            self.entries.push(id);
            InsertOutcome::Replaced(oldest)
        }
    }
}

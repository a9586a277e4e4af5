//! Optimistic like/dislike tracking.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::model::TicketComment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteType {
    Like,
    Dislike,
}

/// Counters to write back after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteChange {
    pub comment_id: u64,
    pub likes: u32,
    pub dislikes: u32,
    /// The vote now held by this client, if any.
    pub vote: Option<VoteType>,
}

/// Remembers this client's vote per comment id.
///
/// State is in-memory only and starts empty; counters are derived from the
/// comment as last loaded.
#[derive(Debug, Default)]
pub struct VoteTracker {
    votes: Mutex<HashMap<u64, VoteType>>,
}

impl VoteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if this client currently holds `vote` on the comment.
    pub fn is_voted(&self, comment_id: Option<u64>, vote: VoteType) -> bool {
        let Some(id) = comment_id else {
            return false;
        };
        self.votes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            == Some(&vote)
    }

    /// Toggles `vote` on the comment and returns the new counters.
    ///
    /// Same vote again withdraws it; the opposite vote switches sides.
    /// Returns `None` for comments without an id.
    pub fn toggle(&self, comment: &TicketComment, vote: VoteType) -> Option<VoteChange> {
        let comment_id = comment.id?;
        let mut likes = comment.likes.unwrap_or(0);
        let mut dislikes = comment.dislikes.unwrap_or(0);

        let mut votes = self.votes.lock().unwrap_or_else(|e| e.into_inner());
        let previous = votes.get(&comment_id).copied();

        match previous {
            Some(VoteType::Like) => likes = likes.saturating_sub(1),
            Some(VoteType::Dislike) => dislikes = dislikes.saturating_sub(1),
            None => {}
        }

        let current = if previous == Some(vote) {
            votes.remove(&comment_id);
            None
        } else {
            match vote {
                VoteType::Like => likes += 1,
                VoteType::Dislike => dislikes += 1,
            }
            votes.insert(comment_id, vote);
            Some(vote)
        };

        tracing::debug!(comment_id, ?previous, ?current, "Toggled comment vote");

        Some(VoteChange {
            comment_id,
            likes,
            dislikes,
            vote: current,
        })
    }

    /// Restores the vote held before a failed write-back.
    pub fn revert(&self, comment_id: u64, previous: Option<VoteType>) {
        let mut votes = self.votes.lock().unwrap_or_else(|e| e.into_inner());
        match previous {
            Some(vote) => votes.insert(comment_id, vote),
            None => votes.remove(&comment_id),
        };
    }

    /// The vote currently held on a comment.
    pub fn current(&self, comment_id: u64) -> Option<VoteType> {
        self.votes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&comment_id)
            .copied()
    }

    /// Forgets every vote, e.g. on logout.
    pub fn clear(&self) {
        self.votes.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

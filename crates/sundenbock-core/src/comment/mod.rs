//! Ticket comment domain module.
//!
//! # Module Structure
//!
//! - `model`: Threaded comments (`TicketComment`, `CommentAuthor`)
//! - `votes`: Optimistic like/dislike bookkeeping (`VoteTracker`)
//!
//! Vote counts are tracked locally per comment id and written back with
//! last-write-wins semantics; concurrent votes by other users are not
//! reconciled until the comments are reloaded.

mod model;
mod votes;

pub use model::{CommentAuthor, NewComment, TicketComment};
pub use votes::{VoteChange, VoteTracker, VoteType};

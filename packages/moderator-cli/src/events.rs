//! Event plumbing for the interactive console.

/// Which queue an async outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueKind {
    Reviews,
    Aliases,
}

/// Messages sent back into the draw loop from spawned work.
/// Client notifications travel on their own channel as [`crate::notify::Notice`].
#[derive(Debug)]
pub enum AppEvent {
    /// A moderation dispatch settled; `ok` says whether to re-fetch.
    Settled { kind: QueueKind, id: i64, ok: bool },
    /// A queue re-fetch finished.
    Fetched { kind: QueueKind, payload: FetchPayload },
}

#[derive(Debug)]
pub enum FetchPayload {
    Reviews(Vec<mealboard_client::QueuedReview>),
    Aliases(Vec<mealboard_client::QueuedAlias>),
    /// Fetch failed; the table keeps rendering its empty/previous state.
    Failed,
}

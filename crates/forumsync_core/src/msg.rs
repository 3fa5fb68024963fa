use crate::{RenderedDocument, Thread, ThreadId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Kick off a run.
    Start,
    /// The latest-topics feed came back (empty on failure).
    LatestFetched(Vec<Thread>),
    /// First-post HTML for a thread; `None` means skip.
    ContentFetched {
        thread_id: ThreadId,
        content: Option<String>,
    },
    /// Rendering finished for a thread.
    Rendered {
        thread_id: ThreadId,
        result: Result<RenderedDocument, String>,
    },
    /// The sink wrote this many documents.
    Published { written: usize },
    /// The sink failed; the run still terminates.
    PublishFailed { reason: String },
}

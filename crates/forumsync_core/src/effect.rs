use crate::{RenderedDocument, Thread, ThreadId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchLatest,
    FetchContent { thread_id: ThreadId },
    Render { thread: Thread, html: String },
    Publish { documents: Vec<RenderedDocument> },
}

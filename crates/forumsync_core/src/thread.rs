pub type ThreadId = u64;

/// A discussion topic as listed by the forum's latest-topics feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thread {
    pub id: ThreadId,
    pub slug: String,
    pub title: String,
    /// Raw creation timestamp, `YYYY-MM-DDTHH:MM:SS.ffffffZ`. Parsed at render time.
    pub created_at: String,
    /// Author slug used for attribution.
    pub author: String,
    pub views: u64,
    /// Tags in the order the forum returned them.
    pub tags: Vec<String>,
}

/// A Markdown file ready to be written into the content repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub thread_id: ThreadId,
    pub filename: String,
    pub body: String,
}

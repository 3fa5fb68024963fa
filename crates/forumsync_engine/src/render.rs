use chrono::{DateTime, NaiveDateTime, Utc};
use forumsync_core::{RenderedDocument, Thread, ThreadId};

use crate::filename::document_filename;
use crate::frontmatter::{DiscourseMeta, FrontMatter};
use crate::{Converter, Html2MdConverter};

/// Discourse `created_at` format; the fraction may have 1 to 9 digits.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

const FORUM_CATEGORY: &str = "forum";
const META_OPEN: &str = "{{% discourse_meta %}}";
const META_CLOSE: &str = "{{% /discourse_meta %}}";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("thread {thread_id}: invalid creation timestamp {value:?}: {message}")]
    InvalidTimestamp {
        thread_id: ThreadId,
        value: String,
        message: String,
    },
    #[error("thread {thread_id}: first post is empty")]
    EmptyContent { thread_id: ThreadId },
}

pub fn parse_created_at(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, CREATED_AT_FORMAT).map(|naive| naive.and_utc())
}

/// Turns a thread and its first-post HTML into a Markdown page for the site.
pub struct MarkdownRenderer {
    forum_base_url: String,
    converter: Box<dyn Converter>,
}

impl MarkdownRenderer {
    pub fn new(forum_base_url: &str) -> Self {
        Self::with_converter(forum_base_url, Box::new(Html2MdConverter))
    }

    pub fn with_converter(forum_base_url: &str, converter: Box<dyn Converter>) -> Self {
        Self {
            forum_base_url: forum_base_url.trim_end_matches('/').to_string(),
            converter,
        }
    }

    /// Canonical thread URL, `{base}/t/{slug}/{id}`.
    pub fn thread_url(&self, thread: &Thread) -> String {
        format!("{}/t/{}/{}", self.forum_base_url, thread.slug, thread.id)
    }

    pub fn render(
        &self,
        thread: &Thread,
        content_html: &str,
    ) -> Result<RenderedDocument, RenderError> {
        if content_html.trim().is_empty() {
            return Err(RenderError::EmptyContent {
                thread_id: thread.id,
            });
        }
        let created =
            parse_created_at(&thread.created_at).map_err(|err| RenderError::InvalidTimestamp {
                thread_id: thread.id,
                value: thread.created_at.clone(),
                message: err.to_string(),
            })?;

        let url = self.thread_url(thread);
        let front_matter = FrontMatter {
            title: thread.title.clone(),
            date: created,
            author: thread.author.clone(),
            discourse: DiscourseMeta {
                url: url.clone(),
                id: thread.id,
                views: thread.views,
            },
            tags: thread.tags.clone(),
            categories: vec![FORUM_CATEGORY.to_string()],
        };
        let markdown = self.converter.to_markdown(content_html);
        let views = thread.views;

        let body = format!(
            "{front}\n\
             {META_OPEN}\n\
             **💬 Featured from the forum**: [Read on Discourse]({url})  \n\
             **👀 {views} Views**\n\
             {META_CLOSE}\n\
             \n\
             {markdown}\n\
             \n\
             [🔗 Continue reading on the forum]({url})\n",
            front = front_matter.to_block(),
        );

        Ok(RenderedDocument {
            thread_id: thread.id,
            filename: document_filename(created.date_naive(), &thread.slug),
            body,
        })
    }
}

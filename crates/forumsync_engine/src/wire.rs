//! Subset of the Discourse JSON API we read.
use forumsync_core::Thread;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct LatestResponse {
    pub topic_list: TopicList,
}

/// Topics stay raw here so one malformed entry cannot sink the whole page.
#[derive(Debug, Deserialize)]
pub(crate) struct TopicList {
    #[serde(default)]
    pub topics: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopicSummary {
    pub id: u64,
    pub slug: String,
    pub title: String,
    pub created_at: String,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub tags: Vec<TagRef>,
    #[serde(default)]
    pub poster_user_slug: Option<String>,
}

/// Older Discourse versions send tag names, newer ones send objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TagRef {
    Name(String),
    Object { name: String },
}

impl TagRef {
    fn into_name(self) -> String {
        match self {
            TagRef::Name(name) | TagRef::Object { name } => name,
        }
    }
}

impl From<TopicSummary> for Thread {
    fn from(topic: TopicSummary) -> Self {
        Thread {
            id: topic.id,
            slug: topic.slug,
            title: topic.title,
            created_at: topic.created_at,
            author: topic.poster_user_slug.unwrap_or_default(),
            views: topic.views,
            tags: topic.tags.into_iter().map(TagRef::into_name).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopicDetail {
    pub post_stream: PostStream,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostStream {
    #[serde(default)]
    pub posts: Vec<Post>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Post {
    #[serde(default)]
    pub cooked: Option<String>,
}

impl TopicDetail {
    pub(crate) fn first_post_html(self) -> Option<String> {
        self.post_stream
            .posts
            .into_iter()
            .next()
            .and_then(|post| post.cooked)
            .filter(|html| !html.trim().is_empty())
    }
}

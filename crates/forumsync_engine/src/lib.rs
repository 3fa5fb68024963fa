//! Forumsync engine: forum client, Markdown rendering, publishing and the effect runner.
mod convert;
mod fetch;
mod filename;
mod frontmatter;
mod git;
mod persist;
mod pipeline;
mod publish;
mod render;
mod sanitize;
mod types;
mod wire;

pub use convert::{Converter, Html2MdConverter};
pub use fetch::{ApiCredentials, DiscourseSource, FetchSettings, ThreadSource};
pub use filename::document_filename;
pub use frontmatter::{parse_front_matter, DiscourseMeta, FrontMatter, FrontMatterError};
pub use git::{redact_url, Git};
pub use persist::{ensure_output_dir, ContentWriter, PersistError};
pub use pipeline::{Pipeline, PipelineError};
pub use publish::{
    commit_message, CommitIdentity, GitPublishSink, GitTarget, LocalDirSink, PublishError,
    PublishSink,
};
pub use render::{parse_created_at, MarkdownRenderer, RenderError, CREATED_AT_FORMAT};
pub use sanitize::strip_forum_chrome;
pub use types::{FailureKind, FetchError};

use std::collections::BTreeSet;

use crate::Thread;

/// The set of tags that qualify a thread for publication.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagAllowList {
    tags: BTreeSet<String>,
}

impl TagAllowList {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// True when at least one of the thread's tags is allowed.
    pub fn matches(&self, thread: &Thread) -> bool {
        thread.tags.iter().any(|tag| self.tags.contains(tag))
    }

    /// Keeps matching threads, preserving input order.
    pub fn select(&self, threads: Vec<Thread>) -> Vec<Thread> {
        threads.into_iter().filter(|t| self.matches(t)).collect()
    }
}

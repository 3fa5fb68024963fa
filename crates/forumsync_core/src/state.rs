use std::collections::VecDeque;

use crate::{RenderedDocument, TagAllowList, Thread, ThreadId};

/// Pipeline stages. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Idle,
    Fetching,
    Filtering,
    Rendering,
    Publishing,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFailure {
    pub thread_id: ThreadId,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineState {
    stage: Stage,
    allowed: TagAllowList,
    fetched: usize,
    selected: usize,
    queue: VecDeque<Thread>,
    current: Option<Thread>,
    documents: Vec<RenderedDocument>,
    rendered: usize,
    skipped: Vec<ThreadId>,
    render_failures: Vec<RenderFailure>,
    written: usize,
    publish_failure: Option<String>,
}

/// Snapshot of a run, suitable for the final log line and for assertions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub stage: Stage,
    pub fetched: usize,
    pub selected: usize,
    pub rendered: usize,
    pub written: usize,
    /// Threads skipped because their first post was empty or unavailable.
    pub skipped: Vec<ThreadId>,
    pub render_failures: Vec<RenderFailure>,
    pub publish_failure: Option<String>,
}

impl PipelineState {
    pub fn new(allowed: TagAllowList) -> Self {
        Self {
            stage: Stage::Idle,
            allowed,
            fetched: 0,
            selected: 0,
            queue: VecDeque::new(),
            current: None,
            documents: Vec::new(),
            rendered: 0,
            skipped: Vec::new(),
            render_failures: Vec::new(),
            written: 0,
            publish_failure: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_done(&self) -> bool {
        self.stage == Stage::Done
    }

    /// Thread whose content is currently being fetched or rendered.
    pub fn current_thread(&self) -> Option<&Thread> {
        self.current.as_ref()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            stage: self.stage,
            fetched: self.fetched,
            selected: self.selected,
            rendered: self.rendered,
            written: self.written,
            skipped: self.skipped.clone(),
            render_failures: self.render_failures.clone(),
            publish_failure: self.publish_failure.clone(),
        }
    }

    pub(crate) fn set_stage(&mut self, stage: Stage) {
        self.stage = stage;
    }

    pub(crate) fn selected(&self) -> usize {
        self.selected
    }

    pub(crate) fn current_id(&self) -> Option<ThreadId> {
        self.current.as_ref().map(|t| t.id)
    }

    pub(crate) fn accept_feed(&mut self, threads: Vec<Thread>) {
        self.fetched = threads.len();
        let selected = self.allowed.select(threads);
        self.selected = selected.len();
        self.queue = selected.into();
    }

    /// Moves the next queued thread into `current` and returns its id.
    pub(crate) fn next_thread(&mut self) -> Option<ThreadId> {
        self.current = self.queue.pop_front();
        self.current_id()
    }

    pub(crate) fn skip_current(&mut self) {
        if let Some(thread) = self.current.take() {
            self.skipped.push(thread.id);
        }
    }

    pub(crate) fn fail_current(&mut self, reason: String) {
        if let Some(thread) = self.current.take() {
            self.render_failures.push(RenderFailure {
                thread_id: thread.id,
                reason,
            });
        }
    }

    pub(crate) fn push_document(&mut self, document: RenderedDocument) {
        self.current = None;
        self.rendered += 1;
        self.documents.push(document);
    }

    pub(crate) fn take_documents(&mut self) -> Vec<RenderedDocument> {
        std::mem::take(&mut self.documents)
    }

    pub(crate) fn finish_published(&mut self, written: usize) {
        self.written = written;
        self.stage = Stage::Done;
    }

    pub(crate) fn finish_failed(&mut self, reason: String) {
        self.publish_failure = Some(reason);
        self.stage = Stage::Done;
    }
}

use std::collections::VecDeque;

use forumsync_core::{update, Effect, Msg, PipelineState, RunSummary, Stage, TagAllowList};
use sync_logging::{sync_error, sync_info, sync_trace, sync_warn};

use crate::{MarkdownRenderer, PublishError, PublishSink, ThreadSource};

#[derive(Debug, thiserror::Error)]
#[error("publishing failed after rendering {} document(s): {source}", .summary.rendered)]
pub struct PipelineError {
    pub summary: RunSummary,
    #[source]
    pub source: PublishError,
}

/// Runs one fetch → filter → render → publish pass.
///
/// Effects from the core state machine are executed one at a time, in the
/// order they were produced, so threads are handled strictly in feed order.
pub struct Pipeline<'a> {
    source: &'a dyn ThreadSource,
    renderer: &'a MarkdownRenderer,
    sink: &'a mut dyn PublishSink,
    allowed_tags: TagAllowList,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        source: &'a dyn ThreadSource,
        renderer: &'a MarkdownRenderer,
        sink: &'a mut dyn PublishSink,
        allowed_tags: TagAllowList,
    ) -> Self {
        Self {
            source,
            renderer,
            sink,
            allowed_tags,
        }
    }

    pub async fn run(self) -> Result<RunSummary, PipelineError> {
        let Pipeline {
            source,
            renderer,
            sink,
            allowed_tags,
        } = self;
        sync_info!(
            "Looking for threads tagged: {}",
            allowed_tags.iter().collect::<Vec<_>>().join(", ")
        );

        let mut state = PipelineState::new(allowed_tags);
        let mut inbox = VecDeque::from([Msg::Start]);
        while let Some(msg) = inbox.pop_front() {
            let was_fetching = state.stage() == Stage::Fetching;
            let (next, effects) = update(state, msg);
            state = next;
            if was_fetching && state.stage() != Stage::Fetching {
                let selected = state.summary().selected;
                if selected > 0 {
                    sync_info!("Processing {selected} thread(s)");
                }
            }

            for effect in effects {
                sync_trace!("Executing {}", effect_name(&effect));
                let reply = match effect {
                    Effect::FetchLatest => {
                        let threads = source.fetch_latest().await;
                        sync_info!("Feed returned {} thread(s)", threads.len());
                        Msg::LatestFetched(threads)
                    }
                    Effect::FetchContent { thread_id } => Msg::ContentFetched {
                        thread_id,
                        content: source.fetch_content(thread_id).await,
                    },
                    Effect::Render { thread, html } => {
                        let result = renderer.render(&thread, &html).map_err(|err| {
                            sync_warn!("Skipping thread {}: {err}", thread.id);
                            err.to_string()
                        });
                        Msg::Rendered {
                            thread_id: thread.id,
                            result,
                        }
                    }
                    Effect::Publish { documents } => {
                        sync_info!("Publishing {} document(s)", documents.len());
                        match sink.publish(&documents) {
                            Ok(written) => Msg::Published { written },
                            Err(err) => {
                                sync_error!("Publishing failed: {err}");
                                let (failed, _) = update(
                                    state,
                                    Msg::PublishFailed {
                                        reason: err.to_string(),
                                    },
                                );
                                return Err(PipelineError {
                                    summary: failed.summary(),
                                    source: err,
                                });
                            }
                        }
                    }
                };
                inbox.push_back(reply);
            }
        }

        let summary = state.summary();
        if summary.selected == 0 {
            sync_info!("No matching threads found");
        }
        sync_info!(
            "Run finished: fetched={} selected={} written={} skipped={} render_failures={}",
            summary.fetched,
            summary.selected,
            summary.written,
            summary.skipped.len(),
            summary.render_failures.len()
        );
        Ok(summary)
    }
}

fn effect_name(effect: &Effect) -> String {
    match effect {
        Effect::FetchLatest => "FetchLatest".to_string(),
        Effect::FetchContent { thread_id } => format!("FetchContent({thread_id})"),
        Effect::Render { thread, .. } => format!("Render({})", thread.id),
        Effect::Publish { documents } => format!("Publish({} document(s))", documents.len()),
    }
}

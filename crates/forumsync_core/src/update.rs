use crate::{Effect, Msg, PipelineState, Stage};

/// Pure update function: applies a message to state and returns any effects.
///
/// Messages that do not belong to the current stage are ignored.
pub fn update(mut state: PipelineState, msg: Msg) -> (PipelineState, Vec<Effect>) {
    let effects = match msg {
        Msg::Start => {
            if state.stage() != Stage::Idle {
                return (state, Vec::new());
            }
            state.set_stage(Stage::Fetching);
            vec![Effect::FetchLatest]
        }
        Msg::LatestFetched(threads) => {
            if state.stage() != Stage::Fetching {
                return (state, Vec::new());
            }
            state.set_stage(Stage::Filtering);
            state.accept_feed(threads);
            advance(&mut state)
        }
        Msg::ContentFetched { thread_id, content } => {
            if !is_current(&state, thread_id) {
                return (state, Vec::new());
            }
            match content.filter(|html| !html.trim().is_empty()) {
                Some(html) => match state.current_thread().cloned() {
                    Some(thread) => vec![Effect::Render { thread, html }],
                    None => Vec::new(),
                },
                None => {
                    state.skip_current();
                    advance(&mut state)
                }
            }
        }
        Msg::Rendered { thread_id, result } => {
            if !is_current(&state, thread_id) {
                return (state, Vec::new());
            }
            match result {
                Ok(document) => state.push_document(document),
                Err(reason) => state.fail_current(reason),
            }
            advance(&mut state)
        }
        Msg::Published { written } => {
            if state.stage() == Stage::Publishing {
                state.finish_published(written);
            }
            Vec::new()
        }
        Msg::PublishFailed { reason } => {
            if state.stage() == Stage::Publishing {
                state.finish_failed(reason);
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn is_current(state: &PipelineState, thread_id: crate::ThreadId) -> bool {
    state.stage() == Stage::Rendering && state.current_id() == Some(thread_id)
}

/// Starts the next thread, or hands everything rendered so far to the sink.
fn advance(state: &mut PipelineState) -> Vec<Effect> {
    if let Some(thread_id) = state.next_thread() {
        state.set_stage(Stage::Rendering);
        return vec![Effect::FetchContent { thread_id }];
    }
    if state.selected() == 0 {
        state.set_stage(Stage::Done);
        return Vec::new();
    }
    state.set_stage(Stage::Publishing);
    vec![Effect::Publish {
        documents: state.take_documents(),
    }]
}

use forumsync_core::{
    update, Effect, Msg, PipelineState, RenderFailure, RenderedDocument, Stage, TagAllowList,
    Thread,
};
use pretty_assertions::assert_eq;

fn thread(id: u64, tags: &[&str]) -> Thread {
    Thread {
        id,
        slug: format!("thread-{id}"),
        title: format!("Thread {id}"),
        created_at: "2024-03-05T10:15:30.000000Z".to_string(),
        author: "alice".to_string(),
        views: 5,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

fn document(id: u64) -> RenderedDocument {
    RenderedDocument {
        thread_id: id,
        filename: format!("2024-03-05-thread-{id}.md"),
        body: "---\n---\nbody".to_string(),
    }
}

fn started() -> PipelineState {
    let state = PipelineState::new(TagAllowList::new(["blog", "news", "information", "feature"]));
    let (state, effects) = update(state, Msg::Start);
    assert_eq!(effects, vec![Effect::FetchLatest]);
    assert_eq!(state.stage(), Stage::Fetching);
    state
}

#[test]
fn empty_feed_finishes_without_publishing() {
    let (state, effects) = update(started(), Msg::LatestFetched(Vec::new()));

    assert!(effects.is_empty());
    assert_eq!(state.stage(), Stage::Done);
    assert_eq!(state.summary().written, 0);
}

#[test]
fn feed_with_no_matching_tags_finishes_without_publishing() {
    let (state, effects) = update(
        started(),
        Msg::LatestFetched(vec![thread(1, &["random"]), thread(2, &[])]),
    );

    assert!(effects.is_empty());
    assert!(state.is_done());
    let summary = state.summary();
    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.selected, 0);
}

#[test]
fn threads_are_processed_one_at_a_time_in_feed_order() {
    let (state, effects) = update(
        started(),
        Msg::LatestFetched(vec![
            thread(1, &["blog"]),
            thread(2, &["random"]),
            thread(3, &["news"]),
        ]),
    );
    assert_eq!(effects, vec![Effect::FetchContent { thread_id: 1 }]);
    assert_eq!(state.stage(), Stage::Rendering);

    let (state, effects) = update(
        state,
        Msg::ContentFetched {
            thread_id: 1,
            content: Some("<p>one</p>".to_string()),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::Render {
            thread: thread(1, &["blog"]),
            html: "<p>one</p>".to_string(),
        }]
    );

    let (state, effects) = update(
        state,
        Msg::Rendered {
            thread_id: 1,
            result: Ok(document(1)),
        },
    );
    assert_eq!(effects, vec![Effect::FetchContent { thread_id: 3 }]);

    let (state, effects) = update(
        state,
        Msg::ContentFetched {
            thread_id: 3,
            content: Some("<p>three</p>".to_string()),
        },
    );
    assert_eq!(effects.len(), 1);

    let (state, effects) = update(
        state,
        Msg::Rendered {
            thread_id: 3,
            result: Ok(document(3)),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::Publish {
            documents: vec![document(1), document(3)],
        }]
    );
    assert_eq!(state.stage(), Stage::Publishing);

    let (state, effects) = update(state, Msg::Published { written: 2 });
    assert!(effects.is_empty());
    let summary = state.summary();
    assert_eq!(summary.stage, Stage::Done);
    assert_eq!(summary.fetched, 3);
    assert_eq!(summary.selected, 2);
    assert_eq!(summary.rendered, 2);
    assert_eq!(summary.written, 2);
}

#[test]
fn empty_content_is_skipped_without_error() {
    let (state, _) = update(
        started(),
        Msg::LatestFetched(vec![thread(1, &["blog"]), thread(2, &["news"])]),
    );
    let (state, effects) = update(
        state,
        Msg::ContentFetched {
            thread_id: 1,
            content: None,
        },
    );
    assert_eq!(effects, vec![Effect::FetchContent { thread_id: 2 }]);

    let (state, effects) = update(
        state,
        Msg::ContentFetched {
            thread_id: 2,
            content: Some("   \n".to_string()),
        },
    );
    assert_eq!(effects, vec![Effect::Publish { documents: vec![] }]);

    let summary = state.summary();
    assert_eq!(summary.skipped, vec![1, 2]);
    assert_eq!(summary.rendered, 0);
    assert!(summary.render_failures.is_empty());
}

#[test]
fn render_failure_skips_only_that_thread() {
    let (state, _) = update(
        started(),
        Msg::LatestFetched(vec![thread(1, &["blog"]), thread(2, &["blog"])]),
    );
    let (state, _) = update(
        state,
        Msg::ContentFetched {
            thread_id: 1,
            content: Some("<p>a</p>".to_string()),
        },
    );
    let (state, effects) = update(
        state,
        Msg::Rendered {
            thread_id: 1,
            result: Err("invalid timestamp".to_string()),
        },
    );
    assert_eq!(effects, vec![Effect::FetchContent { thread_id: 2 }]);

    let (state, _) = update(
        state,
        Msg::ContentFetched {
            thread_id: 2,
            content: Some("<p>b</p>".to_string()),
        },
    );
    let (state, effects) = update(
        state,
        Msg::Rendered {
            thread_id: 2,
            result: Ok(document(2)),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::Publish {
            documents: vec![document(2)],
        }]
    );
    assert_eq!(
        state.summary().render_failures,
        vec![RenderFailure {
            thread_id: 1,
            reason: "invalid timestamp".to_string(),
        }]
    );
}

#[test]
fn content_for_a_different_thread_is_ignored() {
    let (state, _) = update(started(), Msg::LatestFetched(vec![thread(1, &["blog"])]));
    let (next, effects) = update(
        state.clone(),
        Msg::ContentFetched {
            thread_id: 99,
            content: Some("<p>stray</p>".to_string()),
        },
    );

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn publish_failure_still_terminates_and_is_recorded() {
    let (state, _) = update(started(), Msg::LatestFetched(vec![thread(1, &["blog"])]));
    let (state, _) = update(
        state,
        Msg::ContentFetched {
            thread_id: 1,
            content: None,
        },
    );
    assert_eq!(state.stage(), Stage::Publishing);

    let (state, effects) = update(
        state,
        Msg::PublishFailed {
            reason: "git push exited with 1".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert!(state.is_done());
    assert_eq!(
        state.summary().publish_failure.as_deref(),
        Some("git push exited with 1")
    );
}

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chatview::combine::Publisher;
use chatview::{
    BuildContext, Button, Config, DispatchOutcome, Message, MessageProvider, Observable,
    ObservableObject, Published, RenderError, RenderOutcome, StateCell, ViewTracker,
};
use common::{button_labels, MockInteraction, RecordingChannel};

fn config(namespace: &str) -> Config {
    let mut config = Config::default();
    config.tracker.id_namespace = Some(namespace.to_string());
    config
}

fn content_view(state: StateCell<i64>) -> impl Fn(&mut BuildContext) -> Message + Send + Sync {
    move |cx: &mut BuildContext| {
        cx.observe(&state);
        Message::new().content(format!("value={}", state.get()))
    }
}

fn content_of(message: &chatview::RenderedMessage) -> String {
    message.content.clone().unwrap_or_default()
}

#[tokio::test]
async fn test_initial_render_sends_once() {
    let channel = RecordingChannel::new();
    let state = StateCell::new(1);
    let tracker = ViewTracker::track(content_view(state.clone()), MessageProvider::new(channel.clone()))
        .await
        .unwrap();

    assert_eq!(channel.created().len(), 1);
    assert_eq!(channel.edit_count(), 0);
    assert_eq!(content_of(&channel.created()[0]), "value=1");
    assert_eq!(tracker.snapshot().unwrap(), channel.created()[0]);
    assert_eq!(state.publisher().subscriber_count(), 1);
}

#[tokio::test]
async fn test_unchanged_state_issues_no_edit() {
    let channel = RecordingChannel::new();
    let state = StateCell::new(1);
    let tracker = ViewTracker::track(content_view(state.clone()), MessageProvider::new(channel.clone()))
        .await
        .unwrap();

    assert_eq!(tracker.refresh().await.unwrap(), RenderOutcome::Unchanged);
    assert_eq!(tracker.refresh().await.unwrap(), RenderOutcome::Unchanged);

    state.set(1);
    tracker.flush().await.unwrap();
    assert_eq!(channel.edit_count(), 0);
}

#[tokio::test]
async fn test_label_change_edits_once_and_keeps_callback() {
    let channel = RecordingChannel::new();
    let label = StateCell::new(String::from("A"));
    let pressed = Arc::new(AtomicUsize::new(0));

    let view = {
        let label = label.clone();
        let pressed = pressed.clone();
        move |cx: &mut BuildContext| {
            cx.observe(&label);
            let pressed = pressed.clone();
            Message::new().item(Button::new(label.get()).on_click(move |_| {
                pressed.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            }))
        }
    };
    let tracker = ViewTracker::with_config(view, MessageProvider::new(channel.clone()), &config("t"))
        .await
        .unwrap();

    label.set("B".to_string());
    tracker.flush().await.unwrap();

    assert_eq!(channel.edit_count(), 1);
    assert_eq!(button_labels(&channel.last_edit().unwrap()), vec!["B"]);

    let outcome = tracker.dispatch(MockInteraction::press("t:0:0")).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::Handled);
    assert_eq!(pressed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_sequential_mutations_edit_in_order() {
    let channel = RecordingChannel::new();
    let state = StateCell::new(0);
    let tracker = ViewTracker::track(content_view(state.clone()), MessageProvider::new(channel.clone()))
        .await
        .unwrap();

    state.set(1);
    tracker.flush().await.unwrap();
    state.set(2);
    tracker.flush().await.unwrap();

    let contents: Vec<_> = channel.edits().iter().map(content_of).collect();
    assert_eq!(contents, vec!["value=1", "value=2"]);
}

#[tokio::test]
async fn test_back_to_back_mutations_edit_in_order() {
    let channel = RecordingChannel::new();
    let state = StateCell::new(0);
    let tracker = ViewTracker::track(content_view(state.clone()), MessageProvider::new(channel.clone()))
        .await
        .unwrap();

    state.set(1);
    state.set(2);
    tracker.flush().await.unwrap();

    let contents: Vec<_> = channel.edits().iter().map(content_of).collect();
    assert_eq!(contents, vec!["value=1", "value=2"]);
    assert_eq!(content_of(&tracker.snapshot().unwrap()), "value=2");
}

#[tokio::test]
async fn test_mutations_from_another_thread_edit_in_order() {
    let channel = RecordingChannel::new();
    let state = StateCell::new(0);
    let tracker = ViewTracker::track(content_view(state.clone()), MessageProvider::new(channel.clone()))
        .await
        .unwrap();

    let writer = {
        let state = state.clone();
        std::thread::spawn(move || {
            for n in 1..=5 {
                state.set(n);
            }
        })
    };
    writer.join().unwrap();
    tracker.flush().await.unwrap();

    let contents: Vec<_> = channel.edits().iter().map(content_of).collect();
    assert_eq!(
        contents,
        vec!["value=1", "value=2", "value=3", "value=4", "value=5"]
    );
}

#[tokio::test]
async fn test_edits_reuse_the_first_handle() {
    let channel = RecordingChannel::new();
    let state = StateCell::new(0);
    let tracker = ViewTracker::track(content_view(state.clone()), MessageProvider::new(channel.clone()))
        .await
        .unwrap();

    for n in 1..=3 {
        state.set(n);
        tracker.flush().await.unwrap();
    }

    let handles = channel.edit_handles();
    assert_eq!(handles.len(), 3);
    assert!(handles.iter().all(|h| h.message_id == "msg-1"));
}

#[tokio::test]
async fn test_subscriptions_follow_what_the_view_reads() {
    let channel = RecordingChannel::new();
    let show_detail = StateCell::new(true);
    let detail = StateCell::new(String::from("first"));

    let view = {
        let show_detail = show_detail.clone();
        let detail = detail.clone();
        move |cx: &mut BuildContext| {
            cx.observe(&show_detail);
            if show_detail.get() {
                cx.observe(&detail);
                Message::new().content(detail.get())
            } else {
                Message::new().content("hidden")
            }
        }
    };
    let tracker = ViewTracker::track(view, MessageProvider::new(channel.clone()))
        .await
        .unwrap();
    assert_eq!(detail.publisher().subscriber_count(), 1);

    show_detail.set(false);
    tracker.flush().await.unwrap();
    assert_eq!(detail.publisher().subscriber_count(), 0);

    detail.set("second".to_string());
    tracker.flush().await.unwrap();
    assert_eq!(channel.edit_count(), 1);

    show_detail.set(true);
    tracker.flush().await.unwrap();
    assert_eq!(detail.publisher().subscriber_count(), 1);
    assert_eq!(content_of(&channel.last_edit().unwrap()), "second");
}

#[tokio::test]
async fn test_transport_failure_still_advances_snapshot() {
    let channel = RecordingChannel::new();
    let state = StateCell::new(0);
    let tracker = ViewTracker::track(content_view(state.clone()), MessageProvider::new(channel.clone()))
        .await
        .unwrap();

    channel.set_fail_edits(true);
    state.set(1);
    tracker.flush().await.unwrap();
    assert_eq!(channel.edit_count(), 0);
    assert_eq!(content_of(&tracker.snapshot().unwrap()), "value=1");

    assert_eq!(tracker.refresh().await.unwrap(), RenderOutcome::Unchanged);

    channel.set_fail_edits(false);
    state.set(2);
    tracker.flush().await.unwrap();
    assert_eq!(channel.edit_count(), 1);
    assert_eq!(content_of(&channel.last_edit().unwrap()), "value=2");
}

#[tokio::test]
async fn test_refresh_reports_transport_error() {
    let channel = RecordingChannel::new();
    let state = StateCell::new(0);
    let view = {
        let state = state.clone();
        let renders = AtomicUsize::new(0);
        move |cx: &mut BuildContext| {
            cx.observe(&state);
            let n = renders.fetch_add(1, Ordering::SeqCst);
            Message::new().content(format!("render {}", n))
        }
    };
    let tracker = ViewTracker::track(view, MessageProvider::new(channel.clone()))
        .await
        .unwrap();

    channel.set_fail_edits(true);
    let result = tracker.refresh().await;
    assert!(matches!(result, Err(RenderError::Transport(_))));
    assert_eq!(content_of(&tracker.snapshot().unwrap()), "render 1");
}

#[tokio::test]
async fn test_layout_error_fails_construction() {
    let channel = RecordingChannel::new();
    let view = |_: &mut BuildContext| Message::new().item(Button::new("lost").row(7));
    let result = ViewTracker::track(view, MessageProvider::new(channel.clone())).await;

    assert!(matches!(result, Err(RenderError::Layout(_))));
    assert!(channel.created().is_empty());
}

#[tokio::test]
async fn test_stop_detaches_and_closes() {
    let channel = RecordingChannel::new();
    let state = StateCell::new(0);
    let tracker = ViewTracker::track(content_view(state.clone()), MessageProvider::new(channel.clone()))
        .await
        .unwrap();

    tracker.stop().await;
    assert_eq!(state.publisher().subscriber_count(), 0);
    assert!(matches!(tracker.refresh().await, Err(RenderError::TrackerClosed)));

    state.set(5);
    assert_eq!(channel.edit_count(), 0);
    tracker.stop().await;
}

#[tokio::test]
async fn test_dropping_tracker_detaches() {
    let channel = RecordingChannel::new();
    let state = StateCell::new(0);
    let tracker = ViewTracker::track(content_view(state.clone()), MessageProvider::new(channel.clone()))
        .await
        .unwrap();
    assert_eq!(state.publisher().subscriber_count(), 1);

    drop(tracker);
    assert_eq!(state.publisher().subscriber_count(), 0);
}

struct Settings {
    object: ObservableObject,
    theme: Published<String>,
}

impl Settings {
    fn new() -> Self {
        let object = ObservableObject::new();
        let theme = object.published("theme", "light".to_string());
        Self { object, theme }
    }
}

impl Observable for Settings {
    fn publisher(&self) -> &Publisher {
        self.object.publisher()
    }
}

#[tokio::test]
async fn test_nested_observable_triggers_parent_view() {
    let channel = RecordingChannel::new();
    let parent = Arc::new(ObservableObject::new());
    let settings = Arc::new(Settings::new());
    parent.nest(settings.as_ref());

    let view = {
        let parent = parent.clone();
        let settings = settings.clone();
        move |cx: &mut BuildContext| {
            cx.observe(&parent);
            Message::new().content(settings.theme.get())
        }
    };
    let tracker = ViewTracker::track(view, MessageProvider::new(channel.clone()))
        .await
        .unwrap();

    settings.theme.set("dark".to_string());
    tracker.flush().await.unwrap();

    assert_eq!(channel.edit_count(), 1);
    assert_eq!(content_of(&channel.last_edit().unwrap()), "dark");
}

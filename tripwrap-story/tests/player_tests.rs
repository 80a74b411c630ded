//! Autoplay player timing tests
//!
//! All tests run on tokio's paused clock, so sleeps advance virtual time
//! deterministically.

use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::sleep;
use tripwrap_common::events::{SlideKind, StoryEvent, TransitionCause};
use tripwrap_common::{PreviewRef, ResolvedLocation, TaggedImage};
use tripwrap_story::playback::{DurationPolicy, PlaybackEngine, PlayerOptions, StoryPlayer};
use tripwrap_story::{aggregate, compile};

const BASE: Duration = Duration::from_millis(1000);
const SETTLE: Duration = Duration::from_millis(300);

fn policy() -> DurationPolicy {
    DurationPolicy {
        base: BASE,
        per_image: Duration::from_millis(500),
        max_destination: Duration::from_millis(5000),
    }
}

fn options() -> PlayerOptions {
    PlayerOptions {
        tick_interval: Duration::from_millis(50),
        profile_name: "Tester".to_string(),
    }
}

/// intro, Q1 intro, Oslo (3 photos), totals, outro
fn player() -> StoryPlayer {
    let images: Vec<_> = (0..3)
        .map(|i| {
            TaggedImage::new(PreviewRef::new(format!("oslo-{}", i)))
                .captured_at(i)
                .resolved(ResolvedLocation::city("Oslo", "Norway").unwrap())
        })
        .collect();
    let slides = compile(&aggregate(&images));
    assert_eq!(slides.len(), 5);
    StoryPlayer::spawn(PlaybackEngine::new(slides, policy(), SETTLE), options())
}

/// Let the player task drain its command queue
async fn settle_task() {
    sleep(Duration::from_millis(1)).await;
}

fn drain_changes(
    rx: &mut broadcast::Receiver<StoryEvent>,
) -> Vec<(usize, SlideKind, TransitionCause)> {
    let mut changes = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let StoryEvent::SlideChanged {
            index, kind, cause, ..
        } = event
        {
            changes.push((index, kind, cause));
        }
    }
    changes
}

#[tokio::test(start_paused = true)]
async fn test_partial_progress_does_not_advance() {
    let player = player();

    sleep(Duration::from_millis(900)).await;
    let snapshot = player.snapshot();
    assert_eq!(snapshot.index, 0);
    assert!(snapshot.percent > 50.0 && snapshot.percent < 100.0);

    sleep(Duration::from_millis(150)).await;
    assert_eq!(player.snapshot().index, 1);

    player.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_manual_advance_discards_stale_progress() {
    let player = player();

    // Half-way through the intro
    sleep(Duration::from_millis(500)).await;
    player.next().await;
    settle_task().await;

    let snapshot = player.snapshot();
    assert_eq!(snapshot.index, 1);
    assert_eq!(snapshot.percent, 0.0);

    // Had the intro's 50% leaked over, the quarter intro would be gone by now
    sleep(Duration::from_millis(800)).await;
    assert_eq!(player.snapshot().index, 1);

    sleep(Duration::from_millis(250)).await;
    assert_eq!(player.snapshot().index, 2);

    player.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_retreat_after_settle_returns_with_zero_progress() {
    let player = player();

    player.next().await;
    settle_task().await;
    sleep(SETTLE + Duration::from_millis(100)).await;
    assert!(player.snapshot().percent > 0.0);

    player.prev().await;
    settle_task().await;

    let snapshot = player.snapshot();
    assert_eq!(snapshot.index, 0);
    assert_eq!(snapshot.percent, 0.0);

    player.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_rapid_taps_move_one_slide() {
    let player = player();

    player.tap(0.9).await;
    player.tap(0.9).await;
    player.tap(0.9).await;
    settle_task().await;
    assert_eq!(player.snapshot().index, 1);

    // After the settle window a tap goes through again
    sleep(SETTLE).await;
    player.tap(0.9).await;
    settle_task().await;
    assert_eq!(player.snapshot().index, 2);

    // Left third goes back
    sleep(SETTLE).await;
    player.tap(0.1).await;
    settle_task().await;
    assert_eq!(player.snapshot().index, 1);

    player.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_destination_slide_dwells_longer() {
    let player = player();

    // intro + quarter intro
    sleep(BASE * 2 + Duration::from_millis(10)).await;
    assert_eq!(player.snapshot().index, 2);

    // Three photos: 1000 + 2 * 500 ms
    sleep(Duration::from_millis(1500)).await;
    assert_eq!(player.snapshot().index, 2);
    sleep(Duration::from_millis(600)).await;
    assert_eq!(player.snapshot().index, 3);

    player.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_event_sequence_through_to_finish() {
    let player = player();
    let mut events = player.subscribe();

    let finished = player.wait_finished().await;
    assert_eq!(finished.index, 4);
    assert!(finished.finished);

    let changes = drain_changes(&mut events);
    assert_eq!(
        changes,
        vec![
            (0, SlideKind::Intro, TransitionCause::Manual),
            (1, SlideKind::QuarterIntro, TransitionCause::Timer),
            (2, SlideKind::Destination, TransitionCause::Timer),
            (3, SlideKind::Summary, TransitionCause::Timer),
            (4, SlideKind::Summary, TransitionCause::Timer),
        ]
    );

    // Terminal slide stays put, and next is absorbed
    sleep(Duration::from_secs(60)).await;
    player.next().await;
    settle_task().await;
    assert_eq!(player.snapshot().index, 4);

    player.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_retreat_from_terminal_resumes_autoplay() {
    let player = player();
    player.wait_finished().await;

    // The timer-driven move into the outro also opens a settle window
    sleep(SETTLE).await;
    player.prev().await;
    settle_task().await;
    assert_eq!(player.snapshot().index, 3);
    assert!(!player.snapshot().finished);

    sleep(BASE + Duration::from_millis(60)).await;
    assert_eq!(player.snapshot().index, 4);

    player.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_watch_outlives_player() {
    let player = player();
    let watch = player.watch();
    player.shutdown().await;
    assert_eq!(watch.borrow().index, 0);
}

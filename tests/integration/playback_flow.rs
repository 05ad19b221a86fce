//! Timer-driven playback over real traces

use std::time::Duration;

use super::common::fixtures;
use algotrace::algorithms::{graph, search};
use algotrace::playback::{PlaybackController, PlaybackUpdate};
use algotrace::{Step, Visualization};
use tokio::sync::mpsc;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_autoplay_walks_every_step_in_order() {
    let trace = graph::bfs(&fixtures::campus_graph(), 0);
    let len = trace.len();
    let mut vis = Visualization::new(trace, Duration::from_millis(800));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = vis.spawn_driver(tx);

    let started = Instant::now();
    handle.play();

    let mut seen = vec![vis.position()];
    while let Some(update) = rx.recv().await {
        assert!(vis.observe(update));
        if *seen.last().unwrap() != vis.position() {
            seen.push(vis.position());
        }
        if let PlaybackUpdate::Finished { .. } = update {
            break;
        }
    }

    assert_eq!(seen, (0..len).collect::<Vec<_>>());
    assert!(!vis.controller().is_playing());
    assert!(vis.current().unwrap().is_complete());
    assert!(started.elapsed() >= Duration::from_millis(800) * (len as u32 - 1));
    handle.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_pause_then_manual_steps() {
    let mut vis = Visualization::new(
        search::linear_search(&fixtures::SEARCH_SAMPLE, 23),
        Duration::from_millis(100),
    );
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = vis.spawn_driver(tx);

    handle.play();
    let _ = rx.recv().await; // play acknowledged at 0
    let _ = rx.recv().await; // first tick
    handle.pause();
    handle.step_forward();
    handle.step_forward();
    handle.step_backward();

    let mut last = None;
    for _ in 0..4 {
        let update = rx.recv().await.unwrap();
        assert!(vis.observe(update));
        last = Some(update);
    }
    assert_eq!(
        last,
        Some(PlaybackUpdate::PositionChanged {
            generation: 0,
            position: 2,
            playing: false,
        })
    );
    assert_eq!(vis.position(), 2);
    handle.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_speed_change_applies_to_next_advance() {
    let mut vis = Visualization::new(
        search::linear_search(&[1, 2, 3, 4], 4),
        Duration::from_secs(10),
    );
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = vis.spawn_driver(tx);

    handle.set_speed(Duration::from_millis(50));
    let started = Instant::now();
    handle.play();
    loop {
        let update = rx.recv().await.unwrap();
        assert!(vis.observe(update));
        if vis.position() == 1 {
            break;
        }
    }
    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(vis.controller().speed(), Duration::from_millis(50));
    handle.shutdown();
}

#[test]
fn test_controller_scrubbing_matches_trace_bounds() {
    let trace = graph::dijkstra(&fixtures::road_graph(), 0);
    let mut ctrl = PlaybackController::new(trace.len(), Duration::from_millis(10));
    ctrl.seek(usize::MAX);
    assert_eq!(ctrl.position(), trace.last_index());
    assert!(trace[ctrl.position()].is_complete());
    assert!(ctrl.step_backward());
    assert!(!trace[ctrl.position()].is_complete());
}

//! Capture loop end to end: flickering frames trigger recordings, clips go
//! to an in-process Analysis Service, and the loop ends on saturation.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use helpers::*;
use hoop_cc::capture_loop::{CaptureLoop, LoopExit};
use hoop_cc::flow::FlowStatus;
use hoop_cc::recorder::MotionRecorder;
use hoop_cc::FlowError;

fn capture_loop(
    frames: FlickerFrames,
    api: &Arc<InProcessApi>,
    dir: &std::path::Path,
) -> (CaptureLoop<FlickerFrames, FakeCamera>, Arc<CameraLog>) {
    let (camera, log) = FakeCamera::new(api.in_flight());
    let recorder = MotionRecorder::new(fast_recorder(), camera);
    (
        CaptureLoop::new(frames, recorder, flow(Arc::clone(api), dir)),
        log,
    )
}

#[tokio::test(start_paused = true)]
async fn test_loop_runs_until_session_saturates() {
    // Given
    let dir = tempfile::tempdir().unwrap();
    let service = service();
    let api = Arc::new(InProcessApi::new(Arc::clone(&service)));
    let (mut capture, camera) = capture_loop(FlickerFrames::new(), &api, dir.path());

    // When
    let exit = capture.run(std::future::pending()).await.unwrap();

    // Then: five recordings, five clips, one final assessment
    let outcome = match exit {
        LoopExit::Complete(outcome) => outcome,
        other => panic!("expected Complete, got {other:?}"),
    };
    assert_eq!(outcome.clip_number(), 5);
    assert!(outcome.consolidated().is_some());
    assert_eq!(camera.started(), 5);
    assert_eq!(api.calls(), 5);

    let session_id = capture.flow().session_id().unwrap().to_string();
    assert_eq!(server_clip_count(&service, &session_id).await, 5);
    assert!(matches!(capture.flow().status(), FlowStatus::Complete { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_no_recording_starts_while_submission_in_flight() {
    // Given: analysis takes longer than the recorder cooldown
    let dir = tempfile::tempdir().unwrap();
    let service = service();
    let api = Arc::new(InProcessApi::new(Arc::clone(&service)).with_delay(Duration::from_secs(3)));
    let (mut capture, camera) = capture_loop(FlickerFrames::new(), &api, dir.path());

    // When
    let exit = capture.run(std::future::pending()).await.unwrap();

    // Then
    assert!(matches!(exit, LoopExit::Complete(_)));
    assert_eq!(camera.started(), 5);
    assert_eq!(camera.started_while_busy(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_capture_unavailable_ends_loop() {
    let dir = tempfile::tempdir().unwrap();
    let api = Arc::new(InProcessApi::new(service()));
    let (mut capture, camera) = capture_loop(FlickerFrames::unavailable(), &api, dir.path());

    let result = capture.run(std::future::pending()).await;

    match result {
        Err(FlowError::CaptureUnavailable(reason)) => {
            assert!(reason.contains("permission denied"));
        }
        other => panic!("expected CaptureUnavailable, got {other:?}"),
    }
    match capture.flow().status() {
        FlowStatus::Failed { message } => assert!(message.contains("camera")),
        other => panic!("expected Failed, got {other:?}"),
    }
    assert_eq!(camera.started(), 0);
    assert_eq!(api.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_discards_recording_in_progress() {
    // Given: shutdown arrives mid-way through the first recording
    let dir = tempfile::tempdir().unwrap();
    let service = service();
    let api = Arc::new(InProcessApi::new(Arc::clone(&service)));
    let (mut capture, camera) = capture_loop(FlickerFrames::new(), &api, dir.path());

    // When
    let exit = capture
        .run(tokio::time::sleep(Duration::from_millis(350)))
        .await
        .unwrap();

    // Then: nothing was submitted
    assert!(matches!(exit, LoopExit::Shutdown));
    assert_eq!(camera.started(), 1);
    assert_eq!(api.calls(), 0);

    let session_id = capture.flow().session_id().unwrap().to_string();
    assert_eq!(server_clip_count(&service, &session_id).await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_failed_submission_resets_and_continues_same_session() {
    // Given: the first clip exhausts its retries
    let dir = tempfile::tempdir().unwrap();
    let service = service();
    let api = Arc::new(InProcessApi::new(Arc::clone(&service)).with_faults(&[
        Fault::BeforeDelivery,
        Fault::BeforeDelivery,
        Fault::BeforeDelivery,
    ]));
    let (mut capture, camera) = capture_loop(FlickerFrames::new(), &api, dir.path());

    // When
    let exit = capture.run(std::future::pending()).await.unwrap();

    // Then: the lost clip is re-recorded and the session still saturates at 5
    let outcome = match exit {
        LoopExit::Complete(outcome) => outcome,
        other => panic!("expected Complete, got {other:?}"),
    };
    assert_eq!(outcome.clip_number(), 5);
    assert_eq!(camera.started(), 6);
    assert_eq!(api.calls(), 8);

    let flow = capture.into_flow();
    let session_id = flow.session_id().unwrap().to_string();
    assert_eq!(server_clip_count(&service, &session_id).await, 5);
    assert_eq!(open_sessions(dir.path()).current(), Some(session_id.as_str()));
}

#[tokio::test(start_paused = true)]
async fn test_deleted_session_is_replaced_not_retried() {
    // Given: the stored session holds one clip and is then deleted server-side
    let dir = tempfile::tempdir().unwrap();
    let service = service();
    let api = Arc::new(InProcessApi::new(Arc::clone(&service)));
    let old_id = {
        let mut seed = flow(Arc::clone(&api), dir.path());
        let id = seed.enter().unwrap();
        seed.submit_clip(mp4_clip(2048)).await.unwrap();
        id
    };
    assert!(service.delete(&old_id).await);
    let calls_before = api.calls();
    let (mut capture, camera) = capture_loop(FlickerFrames::new(), &api, dir.path());

    // When
    let exit = tokio::time::timeout(
        Duration::from_secs(600),
        capture.run(std::future::pending()),
    )
    .await
    .expect("capture loop kept retrying a deleted session")
    .unwrap();

    // Then: one rejected clip, then a fresh session runs to saturation
    let outcome = match exit {
        LoopExit::Complete(outcome) => outcome,
        other => panic!("expected Complete, got {other:?}"),
    };
    assert_eq!(outcome.clip_number(), 5);
    assert_eq!(camera.started(), 6);
    assert_eq!(api.calls() - calls_before, 6);

    let new_id = capture.flow().session_id().unwrap().to_string();
    assert_ne!(new_id, old_id);
    assert_eq!(server_clip_count(&service, &new_id).await, 5);
    assert_eq!(open_sessions(dir.path()).current(), Some(new_id.as_str()));
}

#[tokio::test(start_paused = true)]
async fn test_full_session_is_replaced_not_retried() {
    // Given: a stored session already at the clip cap
    let dir = tempfile::tempdir().unwrap();
    let service = service();
    let api = Arc::new(InProcessApi::new(Arc::clone(&service)));
    let full_id = {
        let mut seed = flow(Arc::clone(&api), dir.path());
        let id = seed.enter().unwrap();
        for _ in 0..6 {
            seed.submit_clip(mp4_clip(2048)).await.unwrap();
        }
        id
    };
    let (mut capture, camera) = capture_loop(FlickerFrames::new(), &api, dir.path());

    // When
    let exit = tokio::time::timeout(
        Duration::from_secs(600),
        capture.run(std::future::pending()),
    )
    .await
    .expect("capture loop kept retrying a full session")
    .unwrap();

    // Then
    assert!(matches!(exit, LoopExit::Complete(_)));
    assert_eq!(camera.started(), 6);
    let new_id = capture.flow().session_id().unwrap().to_string();
    assert_ne!(new_id, full_id);
    assert_eq!(server_clip_count(&service, &full_id).await, 6);
    assert_eq!(server_clip_count(&service, &new_id).await, 5);
}

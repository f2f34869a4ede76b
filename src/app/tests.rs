use super::*;
use crate::classifier::Command;
use crate::config::GesturecamConfig;
use crate::events::GestureEvent;
use crate::landmarks::{ids, Finger, Point2};
use crate::publisher::RecordingPublisher;
use crate::source::{DetectedFrame, MockFrameSource};
use std::io::Write;
use std::time::Duration;

fn create_test_config() -> GesturecamConfig {
    let mut config = GesturecamConfig::default();
    config.system.keyboard_quit = false;
    config
}

/// Normalized landmarks for a hand with exactly `up` extended. The wrist to
/// thumb-CMC reference is 0.05, raised fingers sit at ratio 8 and lowered
/// ones at ratio 1.
fn hand_points(up: &[Finger]) -> Vec<Point2> {
    let mut points = vec![Point2::new(0.5, 0.85); ids::LANDMARK_COUNT];
    points[ids::WRIST] = Point2::new(0.5, 0.9);
    points[ids::THUMB_CMC] = Point2::new(0.55, 0.9);
    points[ids::THUMB_MCP] = Point2::new(0.6, 0.9);

    if up.contains(&Finger::Thumb) {
        points[ids::THUMB_IP] = Point2::new(0.65, 0.9);
        points[ids::THUMB_TIP] = Point2::new(0.7, 0.9);
    } else {
        points[ids::THUMB_IP] = Point2::new(0.55, 0.9);
        points[ids::THUMB_TIP] = Point2::new(0.5, 0.9);
    }

    for finger in &Finger::ALL[1..] {
        if up.contains(finger) {
            points[finger.tip()] = Point2::new(0.5, 0.5);
        }
    }

    points
}

fn gesture_frame(up: &[Finger]) -> DetectedFrame {
    DetectedFrame::with_hand(hand_points(up))
}

fn orchestrator(
    config: GesturecamConfig,
    frames: Vec<DetectedFrame>,
) -> (GesturecamOrchestrator, RecordingPublisher) {
    let publisher = RecordingPublisher::new();
    let orchestrator = GesturecamOrchestrator::new(
        config,
        Box::new(MockFrameSource::new(frames)),
        Box::new(publisher.clone()),
    );
    (orchestrator, publisher)
}

fn published(publisher: &RecordingPublisher) -> Vec<String> {
    publisher
        .messages()
        .into_iter()
        .map(|(topic, message)| {
            assert_eq!(topic, "home/central");
            message
        })
        .collect()
}

#[tokio::test]
async fn test_replayed_frames_publish_commands() {
    let frames = vec![
        gesture_frame(&[Finger::Index]),
        gesture_frame(&[Finger::Index]),
        DetectedFrame::no_hands(),
        gesture_frame(&[]),
        gesture_frame(&[]),
        gesture_frame(&[Finger::Index, Finger::Middle]),
    ];
    let (mut orchestrator, publisher) = orchestrator(create_test_config(), frames);

    let outcome = orchestrator.run().await.unwrap();

    assert_eq!(outcome.reason, ShutdownReason::EndOfStream);
    assert_eq!(outcome.exit_code, 0);
    assert_eq!(orchestrator.frames_processed(), 6);
    assert_eq!(published(&publisher), vec!["BL_ON", "BL_OFF", "GL_ON"]);
    assert!(publisher.is_closed());

    let stats = orchestrator.controller().tracker().stats();
    assert_eq!(stats.frames_skipped, 1);
    assert_eq!(stats.commands_emitted, 3);
}

#[tokio::test]
async fn test_frame_and_command_events() {
    let frames = vec![
        gesture_frame(&[Finger::Thumb]),
        gesture_frame(&[Finger::Thumb]),
        gesture_frame(&[Finger::Index, Finger::Pinky]),
    ];
    let (mut orchestrator, _publisher) = orchestrator(create_test_config(), frames);
    let mut events = orchestrator.event_bus().subscribe();

    orchestrator.run().await.unwrap();

    let mut processed = 0;
    let mut commands = Vec::new();
    let mut ended = None;
    while let Ok(event) = events.try_recv() {
        match event {
            GestureEvent::FrameProcessed { .. } => processed += 1,
            GestureEvent::CommandEmitted { command, .. } => commands.push(command),
            GestureEvent::SourceEnded { frames } => ended = Some(frames),
            other => panic!("Unexpected event: {:?}", other),
        }
    }

    assert_eq!(processed, 3);
    assert_eq!(
        commands,
        vec![Command::GarageDoorOpen, Command::GarageDoorClose]
    );
    assert_eq!(ended, Some(3));
}

#[tokio::test]
async fn test_configured_hand_index_is_used() {
    let mut config = create_test_config();
    config.source.hand_index = 1;

    let two_hands = DetectedFrame {
        hands: vec![hand_points(&[Finger::Index]), hand_points(&[Finger::Pinky])],
        ..DetectedFrame::default()
    };
    let (mut orchestrator, publisher) =
        orchestrator(config, vec![two_hands, gesture_frame(&[Finger::Index])]);

    orchestrator.run().await.unwrap();

    // The second frame has only one hand, so hand 1 is absent there
    assert_eq!(published(&publisher), vec!["GL_OFF"]);
}

#[tokio::test]
async fn test_shutdown_requested_on_event_bus() {
    let publisher = RecordingPublisher::new();
    let mut orchestrator = GesturecamOrchestrator::new(
        create_test_config(),
        Box::new(MockFrameSource::endless(Duration::from_millis(5))),
        Box::new(publisher.clone()),
    );

    let event_bus = orchestrator.event_bus();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        event_bus.publish(GestureEvent::ShutdownRequested {
            timestamp: std::time::SystemTime::now(),
            reason: "test".to_string(),
        });
    });

    let outcome = tokio::time::timeout(Duration::from_secs(5), orchestrator.run())
        .await
        .expect("orchestrator should stop")
        .unwrap();

    assert_eq!(outcome.reason, ShutdownReason::UserRequest);
    assert_eq!(outcome.exit_code, 0);
    assert!(orchestrator.frames_processed() > 0);
    assert_eq!(publisher.count(), 0);
    assert!(publisher.is_closed());
}

#[tokio::test]
async fn test_publish_failures_do_not_stop_the_loop() {
    let frames = vec![
        gesture_frame(&[Finger::Index]),
        gesture_frame(&[]),
        gesture_frame(&[]),
    ];
    let (mut orchestrator, publisher) = orchestrator(create_test_config(), frames);
    publisher.set_failing(true);

    let outcome = orchestrator.run().await.unwrap();

    assert_eq!(outcome.reason, ShutdownReason::EndOfStream);
    assert_eq!(outcome.exit_code, 0);
    assert_eq!(published(&publisher), vec!["BL_ON", "BL_OFF"]);
    assert_eq!(orchestrator.controller().publish_failures(), 2);
    assert_eq!(
        orchestrator.controller().tracker().previous_emitted_command(),
        Some(Command::BedroomLightOff)
    );
}

#[tokio::test]
async fn test_run_twice_is_an_error() {
    let (mut orchestrator, _publisher) = orchestrator(create_test_config(), Vec::new());

    assert_eq!(
        orchestrator.run().await.unwrap().reason,
        ShutdownReason::EndOfStream
    );
    assert!(orchestrator.run().await.is_err());
}

#[tokio::test]
async fn test_failed_publisher_close_exits_nonzero() {
    let (mut orchestrator, publisher) =
        orchestrator(create_test_config(), vec![gesture_frame(&[Finger::Index])]);
    publisher.set_close_failing(true);

    let outcome = orchestrator.run().await.unwrap();

    assert_eq!(outcome.reason, ShutdownReason::EndOfStream);
    assert_eq!(outcome.reason.exit_code(), 0);
    assert_eq!(outcome.exit_code, 1);
    assert!(publisher.is_closed());
    assert_eq!(published(&publisher), vec!["BL_ON"]);
}

#[tokio::test]
async fn test_from_config_replays_file_without_publishing() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for up in [&[Finger::Pinky][..], &[Finger::Pinky], &[Finger::Thumb]] {
        writeln!(file, "{}", serde_json::to_string(&gesture_frame(up)).unwrap()).unwrap();
    }

    let mut config = create_test_config();
    config.source.path = file.path().display().to_string();

    let options = RunOptions { no_publish: true };
    let mut orchestrator = GesturecamOrchestrator::from_config(config, options)
        .await
        .unwrap();

    let outcome = orchestrator.run().await.unwrap();

    assert_eq!(outcome.reason, ShutdownReason::EndOfStream);
    assert_eq!(orchestrator.frames_processed(), 3);
    assert_eq!(
        orchestrator.controller().tracker().current_command(),
        Some(Command::GarageDoorOpen)
    );
    assert_eq!(orchestrator.controller().tracker().stats().commands_emitted, 2);
}

#[tokio::test]
async fn test_from_config_missing_replay_file() {
    let mut config = create_test_config();
    config.source.path = "/nonexistent/frames.jsonl".to_string();

    let result = GesturecamOrchestrator::from_config(config, RunOptions { no_publish: true }).await;
    assert!(result.is_err());
}

#[test]
fn test_shutdown_reason_exit_codes() {
    assert_eq!(ShutdownReason::EndOfStream.exit_code(), 0);
    assert_eq!(ShutdownReason::UserRequest.exit_code(), 0);
    assert_eq!(ShutdownReason::Signal("SIGTERM".to_string()).exit_code(), 0);
    assert_eq!(ShutdownReason::Error("boom".to_string()).exit_code(), 1);
    assert_eq!(
        ShutdownReason::Signal("SIGINT".to_string()).to_string(),
        "received SIGINT"
    );
}

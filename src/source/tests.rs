use super::*;
use crate::landmarks::ids;
use std::io::Write;

fn hand_json(x: f64) -> String {
    let points: Vec<String> = (0..ids::LANDMARK_COUNT)
        .map(|i| format!(r#"{{"x":{},"y":{}}}"#, x, i as f64 * 0.01))
        .collect();
    format!("[{}]", points.join(","))
}

#[tokio::test]
async fn test_json_lines_source_reads_frames() {
    let data = format!(
        "{{\"hands\":[{}],\"width\":1280,\"height\":720}}\n\n{{\"hands\":[]}}\n",
        hand_json(0.25)
    );
    let mut source = JsonLinesSource::new(data.as_bytes(), "memory");

    let first = source.next_frame().await.unwrap().unwrap();
    assert_eq!(first.hands.len(), 1);
    assert_eq!(first.hands[0].len(), ids::LANDMARK_COUNT);
    assert_eq!(first.frame_size((640, 480)), (1280, 720));

    let hand = first.hand(0, (640, 480));
    assert_eq!(hand.pixel(ids::WRIST), Some((320, 0)));

    let second = source.next_frame().await.unwrap().unwrap();
    assert!(second.hands.is_empty());
    assert!(second.hand(0, (640, 480)).is_empty());

    assert!(source.next_frame().await.unwrap().is_none());
    assert_eq!(source.line_number(), 3);
    assert_eq!(source.name(), "memory");
}

#[tokio::test]
async fn test_json_lines_source_skips_malformed_lines() {
    let data = "not json\n{\"hands\": 3}\n{}\n";
    let mut source = JsonLinesSource::new(data.as_bytes(), "memory");

    let frame = source.next_frame().await.unwrap().unwrap();
    assert_eq!(frame, DetectedFrame::no_hands());
    assert!(source.next_frame().await.unwrap().is_none());
}

#[tokio::test]
async fn test_replay_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{{\"hands\":[{}]}}", hand_json(0.5)).unwrap();
    writeln!(file, "{{\"hands\":[{},{}]}}", hand_json(0.1), hand_json(0.9)).unwrap();

    let config = SourceConfig {
        path: file.path().display().to_string(),
        ..SourceConfig::default()
    };
    let mut source = open_source(&config).await.unwrap();

    let first = source.next_frame().await.unwrap().unwrap();
    assert_eq!(first.hands.len(), 1);

    // Only the configured hand index is used downstream
    let second = source.next_frame().await.unwrap().unwrap();
    assert_eq!(second.hands.len(), 2);
    assert_eq!(second.hand(0, (100, 100)).pixel(ids::WRIST), Some((10, 0)));
    assert_eq!(second.hand(1, (100, 100)).pixel(ids::WRIST), Some((90, 0)));
    assert!(second.hand(2, (100, 100)).is_empty());

    assert!(source.next_frame().await.unwrap().is_none());
}

#[tokio::test]
async fn test_missing_replay_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = JsonLinesSource::open(dir.path().join("missing.jsonl")).await;

    assert!(matches!(result, Err(crate::error::GesturecamError::Source { .. })));
}

#[tokio::test]
async fn test_mock_source() {
    let mut source = MockFrameSource::new(vec![
        DetectedFrame::no_hands(),
        DetectedFrame::with_hand(vec![Point2::new(0.5, 0.5)]),
    ]);
    assert_eq!(source.remaining(), 2);

    assert!(source.next_frame().await.unwrap().unwrap().hands.is_empty());
    assert_eq!(source.next_frame().await.unwrap().unwrap().hands.len(), 1);
    assert!(source.next_frame().await.unwrap().is_none());
}

#[test]
fn test_detector_args() {
    let config = SourceConfig {
        args: vec!["--camera".to_string(), "0".to_string()],
        max_hands: 1,
        ..SourceConfig::default()
    };

    let args = DetectorProcess::detector_args(&config);
    assert_eq!(&args[..2], &["--camera", "0"]);
    assert_eq!(&args[2..4], &["--max-hands", "1"]);
    assert!(args.contains(&"--model-complexity".to_string()));
}

#[cfg(unix)]
#[tokio::test]
async fn test_detector_process_streams_frames() {
    let config = SourceConfig {
        kind: crate::config::SourceKind::Detector,
        command: "sh".to_string(),
        args: vec![
            "-c".to_string(),
            r#"printf '%s\n' '{"hands":[]}' '{"hands":[],"width":320}'"#.to_string(),
        ],
        ..SourceConfig::default()
    };

    let mut source = open_source(&config).await.unwrap();
    let first = source.next_frame().await.unwrap().unwrap();
    assert!(first.hands.is_empty());
    let second = source.next_frame().await.unwrap().unwrap();
    assert_eq!(second.width, Some(320));
    assert!(source.next_frame().await.unwrap().is_none());
}

#[tokio::test]
async fn test_missing_detector_is_an_error() {
    let config = SourceConfig {
        command: "/nonexistent/hand-detector".to_string(),
        ..SourceConfig::default()
    };

    let result = DetectorProcess::spawn(&config);
    assert!(matches!(result, Err(crate::error::GesturecamError::Source { .. })));
}

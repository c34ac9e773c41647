use super::*;
use crate::parser::EveJsonParser;
use std::io::Write;
use tap_core::Source;
use tempfile::NamedTempFile;
use tokio::sync::mpsc;

fn line(sig: &str) -> String {
    format!(r#"{{"alert":{{"signature":"{sig}"}}}}"#) + "\n"
}

#[tokio::test]
async fn emits_complete_lines_and_retains_partial() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(line("first").as_bytes()).unwrap();
    write!(file, r#"{{"alert":{{"signature":"partial""#).unwrap(); // no closing brace/newline
    file.flush().unwrap();

    let parser: Arc<dyn LineParser> = Arc::new(EveJsonParser::new(Source::Suricata));
    let (tx, mut rx) = mpsc::channel(8);
    let mut state = FollowState { cursor: None, error_count: 0 };

    tick_once(file.path(), &mut state, &parser, &tx).await.unwrap();
    drop(tx);

    let first = rx.recv().await.unwrap();
    assert_eq!(first.signature, "first");
    assert!(rx.recv().await.is_none());
    assert!(state.cursor.as_ref().unwrap().offset > 0);
}

#[tokio::test]
async fn second_tick_picks_up_completed_partial_line() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(line("first").as_bytes()).unwrap();
    file.flush().unwrap();

    let parser: Arc<dyn LineParser> = Arc::new(EveJsonParser::new(Source::Suricata));
    let (tx, mut rx) = mpsc::channel(8);
    let mut state = FollowState { cursor: None, error_count: 0 };

    tick_once(file.path(), &mut state, &parser, &tx).await.unwrap();
    assert_eq!(rx.recv().await.unwrap().signature, "first");

    file.write_all(line("second").as_bytes()).unwrap();
    file.flush().unwrap();
    tick_once(file.path(), &mut state, &parser, &tx).await.unwrap();
    assert_eq!(rx.recv().await.unwrap().signature, "second");
}

#[tokio::test]
async fn truncation_is_treated_as_rotation() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(line("a").as_bytes()).unwrap();
    file.write_all(line("b").as_bytes()).unwrap();
    file.flush().unwrap();

    let parser: Arc<dyn LineParser> = Arc::new(EveJsonParser::new(Source::Suricata));
    let (tx, mut rx) = mpsc::channel(8);
    let mut state = FollowState { cursor: None, error_count: 0 };
    tick_once(file.path(), &mut state, &parser, &tx).await.unwrap();
    let _ = rx.recv().await;
    let _ = rx.recv().await;

    // Truncate and write a smaller payload: new inode isn't created for a
    // same-path truncate, but size shrinking below last_seen_size must
    // still be detected as rotation.
    file.as_file().set_len(0).unwrap();
    use std::io::Seek;
    file.as_file_mut().seek(std::io::SeekFrom::Start(0)).unwrap();
    file.write_all(line("c").as_bytes()).unwrap();
    file.flush().unwrap();

    tick_once(file.path(), &mut state, &parser, &tx).await.unwrap();
    let event = rx.recv().await.unwrap();
    assert_eq!(event.signature, "c");
}

#[tokio::test]
async fn missing_file_is_not_an_error() {
    let parser: Arc<dyn LineParser> = Arc::new(EveJsonParser::new(Source::Suricata));
    let (tx, _rx) = mpsc::channel(8);
    let mut state = FollowState { cursor: None, error_count: 0 };
    let result = tick_once(Path::new("/nonexistent/tap-tail-test.log"), &mut state, &parser, &tx).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn malformed_line_is_skipped_not_fatal() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"not json at all\n").unwrap();
    file.write_all(line("ok").as_bytes()).unwrap();
    file.flush().unwrap();

    let parser: Arc<dyn LineParser> = Arc::new(EveJsonParser::new(Source::Suricata));
    let (tx, mut rx) = mpsc::channel(8);
    let mut state = FollowState { cursor: None, error_count: 0 };
    tick_once(file.path(), &mut state, &parser, &tx).await.unwrap();
    drop(tx);

    let event = rx.recv().await.unwrap();
    assert_eq!(event.signature, "ok");
    assert!(rx.recv().await.is_none());
    assert_eq!(state.error_count, 1);
}

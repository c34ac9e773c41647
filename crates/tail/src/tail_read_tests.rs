use super::*;
use crate::parser::EveJsonParser;
use std::io::Write;
use tap_core::Source;
use tempfile::NamedTempFile;

fn line(sig: &str) -> String {
    format!(r#"{{"alert":{{"signature":"{sig}"}}}}"#) + "\n"
}

#[tokio::test]
async fn reads_last_bytes_and_skips_partial_first_line() {
    let mut file = NamedTempFile::new().unwrap();
    for sig in ["a", "b", "c", "d"] {
        file.write_all(line(sig).as_bytes()).unwrap();
    }
    file.flush().unwrap();

    let cache = TailCache::new();
    let parser = EveJsonParser::new(Source::Suricata);
    // Window lands mid-way through the third line; that partial fragment
    // must be dropped, leaving only the full last line.
    let result = cache.tail(file.path(), 32, &parser).await.unwrap();
    assert!(!result.cached);
    assert_eq!(result.events.len(), 1);
    assert_eq!(result.events.last().unwrap().signature, "d");
}

#[tokio::test]
async fn second_call_within_ttl_is_served_from_cache() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(line("only").as_bytes()).unwrap();
    file.flush().unwrap();

    let cache = TailCache::new();
    let parser = EveJsonParser::new(Source::Suricata);
    let first = cache.tail(file.path(), 4096, &parser).await.unwrap();
    assert!(!first.cached);
    let second = cache.tail(file.path(), 4096, &parser).await.unwrap();
    assert!(second.cached);
    assert!(Arc::ptr_eq(&first.events, &second.events));
}

#[tokio::test]
async fn size_change_invalidates_cache() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(line("first").as_bytes()).unwrap();
    file.flush().unwrap();

    let cache = TailCache::new();
    let parser = EveJsonParser::new(Source::Suricata);
    let first = cache.tail(file.path(), 4096, &parser).await.unwrap();
    assert_eq!(first.events.len(), 1);

    file.write_all(line("second").as_bytes()).unwrap();
    file.flush().unwrap();
    let second = cache.tail(file.path(), 4096, &parser).await.unwrap();
    assert!(!second.cached);
    assert_eq!(second.events.len(), 2);
}

#[tokio::test]
async fn missing_file_yields_empty_uncached_result() {
    let cache = TailCache::new();
    let parser = EveJsonParser::new(Source::Suricata);
    let result = cache.tail(Path::new("/nonexistent/tap-tail-cache.log"), 4096, &parser).await.unwrap();
    assert!(result.events.is_empty());
    assert!(!result.cached);
}

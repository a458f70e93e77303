//! With the default `LogSink`, every step must reach the log exactly once,
//! whether `debug` is on or off.

use std::sync::{Arc, Mutex, Once};

use log::{Level, LevelFilter, Log, Metadata, Record};
use ngscrape_engine::{
    Extractor, FailureKind, FetchError, FetchMetadata, FetchOutput, Fetcher, ScrapeConfig,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

struct CaptureLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.records
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};
static INIT: Once = Once::new();

fn capture() {
    INIT.call_once(|| {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(LevelFilter::Trace);
    });
}

/// Records mentioning `needle`. Tests run in parallel, so each uses its own URL.
fn records_with(needle: &str) -> Vec<(Level, String)> {
    LOGGER
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|(_, message)| message.contains(needle))
        .cloned()
        .collect()
}

/// Serves one page; every other URL fails with a network error.
struct OnePage {
    url: String,
    status: u16,
    body: Vec<u8>,
}

#[async_trait::async_trait]
impl Fetcher for OnePage {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        if url != self.url {
            return Err(FetchError::new(FailureKind::Network, "connection refused"));
        }
        Ok(FetchOutput {
            status: self.status,
            metadata: FetchMetadata {
                original_url: url.to_string(),
                final_url: url.to_string(),
                redirect_count: 0,
                content_type: Some("text/html; charset=utf-8".to_string()),
                byte_len: self.body.len() as u64,
            },
            bytes: self.body.clone(),
        })
    }
}

fn extractor(debug: bool, url: &str, status: u16, body: &str) -> Extractor {
    let config = ScrapeConfig {
        debug,
        ..ScrapeConfig::default()
    };
    let fetcher = OnePage {
        url: url.to_string(),
        status,
        body: body.as_bytes().to_vec(),
    };
    Extractor::new(config, Arc::new(fetcher))
}

#[tokio::test]
async fn failed_request_is_logged_once_with_debug() {
    capture();
    let url = "https://refused.example/debug";
    let extractor = extractor(true, "https://other.example/", 200, "");

    extractor.scrape_title(url).await.unwrap_err();
    let records = records_with(url);
    assert_eq!(records.len(), 1, "{records:?}");
    assert!(records[0].1.starts_with("NGScrape: Request to"));
}

#[tokio::test]
async fn failed_request_is_still_warned_without_debug() {
    capture();
    let url = "https://refused.example/quiet";
    let extractor = extractor(false, "https://other.example/", 200, "");

    extractor.scrape_title(url).await.unwrap_err();
    let records = records_with(url);
    assert_eq!(records.len(), 1, "{records:?}");
    assert_eq!(records[0].0, Level::Warn);
}

#[tokio::test]
async fn error_status_page_logs_one_line_per_step() {
    capture();
    let url = "https://status.example/404";
    let extractor = extractor(true, url, 404, "<title>Not Found</title>");

    assert_eq!(extractor.scrape_game(url).await.unwrap(), None);
    let records: Vec<String> = records_with(url).into_iter().map(|(_, m)| m).collect();
    assert_eq!(
        records,
        vec![
            format!("NGScrape: Made request to {url} and got status code 404"),
            format!("NGScrape: No flash game link found on {url}"),
        ]
    );
}

#[tokio::test]
async fn malformed_field_logs_one_line_with_debug() {
    capture();
    let url = "https://malformed.example/embed";
    let html = r#"<script>var embed_controller = new embedController([{"url":"</script>"#;
    let extractor = extractor(true, url, 200, html);

    extractor.scrape_game(url).await.unwrap_err();
    let records = records_with(url);
    assert_eq!(records.len(), 2, "{records:?}");
    assert!(records[1].1.starts_with("NGScrape: Could not extract flash game link"));
}

#[tokio::test]
async fn write_is_logged_once_with_debug() {
    capture();
    let temp = TempDir::new().unwrap();
    let url = "https://writes.example/page";
    let html = r#"<script>var embed_controller = new embedController([{"url":"https:\/\/writes.example\/page","is_published":true}]);</script>"#;
    let extractor = extractor(true, url, 200, html);

    extractor
        .download_game(url, temp.path(), "game.swf")
        .await
        .unwrap();
    let records = records_with(&temp.path().display().to_string());
    assert_eq!(records.len(), 1, "{records:?}");
    assert!(records[0].1.starts_with("NGScrape: Wrote "));
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ngscrape_logging::{scrape_debug, scrape_info, scrape_warn};

use crate::cache::DocumentCache;
use crate::config::ScrapeConfig;
use crate::document::Document;
use crate::extract::{
    image_extension, CardImageExtractor, DescriptionExtractor, ExtractError, FieldExtractor,
    MediaUrlExtractor, TitleExtractor,
};
use crate::fetch::Fetcher;
use crate::persist::{AtomicFileWriter, Persister};
use crate::sink::{DebugSink, LogSink};
use crate::types::{FailureKind, FetchError, Field, GamePage, ScrapeError};

/// Fetches game pages and pulls the media URL, card image, description and
/// title out of them.
///
/// An `Extractor` is `Send + Sync`; share it through `Arc` to let several
/// tasks use one document cache.
pub struct Extractor {
    config: ScrapeConfig,
    fetcher: Arc<dyn Fetcher>,
    persister: Arc<dyn Persister>,
    sink: Arc<dyn DebugSink>,
    cache: DocumentCache,
}

impl Extractor {
    pub fn new(config: ScrapeConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        let cache = DocumentCache::new(config.cache);
        Self {
            config,
            fetcher,
            persister: Arc::new(AtomicFileWriter),
            sink: Arc::new(LogSink),
            cache,
        }
    }

    pub fn with_persister(mut self, persister: Arc<dyn Persister>) -> Self {
        self.persister = persister;
        self
    }

    /// Replaces the debug sink. Lines are only emitted when `config.debug` is set.
    pub fn with_sink(mut self, sink: Arc<dyn DebugSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    /// Parsed page at `url`, served from the cache when caching is enabled.
    pub async fn document(&self, url: &str) -> Result<Arc<Document>, ScrapeError> {
        self.cache.get_or_fetch(url, || self.load(url)).await
    }

    /// Direct URL of the playable asset.
    pub async fn scrape_game(&self, url: &str) -> Result<Option<String>, ScrapeError> {
        let doc = self.document(url).await?;
        Ok(self.run(&MediaUrlExtractor, &doc, url)?)
    }

    pub async fn scrape_card(&self, url: &str) -> Result<Option<String>, ScrapeError> {
        let doc = self.document(url).await?;
        Ok(self.run(&CardImageExtractor, &doc, url)?)
    }

    pub async fn scrape_desc(&self, url: &str) -> Result<Option<String>, ScrapeError> {
        let doc = self.document(url).await?;
        Ok(self.run(&DescriptionExtractor, &doc, url)?)
    }

    /// Page title, or `url` itself when the page has no `<title>`.
    pub async fn scrape_title(&self, url: &str) -> Result<String, ScrapeError> {
        let doc = self.document(url).await?;
        Ok(self.title_of(&doc, url))
    }

    /// All four fields from a single fetch. A broken embed configuration only
    /// affects `media_url`.
    pub async fn scrape_page(&self, url: &str) -> Result<GamePage, ScrapeError> {
        let doc = self.document(url).await?;
        Ok(GamePage {
            url: url.to_string(),
            title: self.title_of(&doc, url),
            // Meta-tag lookups have no malformed form; a miss is `Ok(None)`.
            description: self.run(&DescriptionExtractor, &doc, url).ok().flatten(),
            card_url: self.run(&CardImageExtractor, &doc, url).ok().flatten(),
            media_url: self.run(&MediaUrlExtractor, &doc, url),
        })
    }

    /// Downloads the game asset of page `url` to `{dir}/{filename}`.
    pub async fn download_game(
        &self,
        url: &str,
        dir: &Path,
        filename: &str,
    ) -> Result<PathBuf, ScrapeError> {
        let media_url = self.scrape_game(url).await?.ok_or(ExtractError::NotFound {
            field: Field::MediaUrl,
        })?;
        let bytes = self.fetch_asset(&media_url).await?;
        self.write(dir, filename, &bytes)
    }

    /// Downloads the card image of page `url` to `{dir}/{base_filename}{ext}`,
    /// where `ext` is the first known image extension found in the card URL.
    pub async fn download_card(
        &self,
        url: &str,
        dir: &Path,
        base_filename: &str,
    ) -> Result<PathBuf, ScrapeError> {
        let card_url = self.scrape_card(url).await?.ok_or(ExtractError::NotFound {
            field: Field::CardImage,
        })?;
        let Some(extension) = image_extension(&card_url) else {
            self.emit(|| format!("No known image extension in {card_url}"));
            return Err(ScrapeError::UnknownImageExtension { url: card_url });
        };
        let bytes = self.fetch_asset(&card_url).await?;
        self.write(dir, &format!("{base_filename}{extension}"), &bytes)
    }

    async fn load(&self, url: &str) -> Result<Document, ScrapeError> {
        let output = match self.fetcher.fetch(url).await {
            Ok(output) => output,
            Err(err) => {
                if self.config.debug {
                    self.emit(|| format!("Request to {url} failed: {err}"));
                } else {
                    scrape_warn!("Request to {url} failed: {err}");
                }
                return Err(err.into());
            }
        };
        self.emit(|| format!("Made request to {url} and got status code {}", output.status));
        if !self.config.debug && !output.is_success() {
            scrape_debug!("{url} answered {}, extracting anyway", output.status);
        }
        let document = Document::parse(
            &output.bytes,
            output.metadata.content_type.as_deref(),
            self.config.parser,
        )?;
        Ok(document)
    }

    async fn fetch_asset(&self, url: &str) -> Result<Vec<u8>, ScrapeError> {
        let output = self.fetcher.fetch(url).await?;
        self.emit(|| format!("Made request to {url} and got status code {}", output.status));
        if !output.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(output.status),
                format!("asset {url} returned status {}", output.status),
            )
            .into());
        }
        Ok(output.bytes)
    }

    fn write(&self, dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, ScrapeError> {
        let path = self.persister.persist(dir, filename, bytes)?;
        if self.config.debug {
            self.emit(|| format!("Wrote {}", path.display()));
        } else {
            scrape_info!("Wrote {} bytes to {:?}", bytes.len(), path);
        }
        Ok(path)
    }

    fn run(
        &self,
        extractor: &dyn FieldExtractor,
        doc: &Document,
        url: &str,
    ) -> Result<Option<String>, ExtractError> {
        let field = extractor.field();
        let result = extractor.extract(doc);
        match &result {
            Ok(Some(value)) => self.emit(|| format!("Found {field} {value}")),
            Ok(None) => self.emit(|| format!("No {field} found on {url}")),
            Err(err) if self.config.debug => {
                self.emit(|| format!("Could not extract {field} from {url}: {err}"));
            }
            Err(err) => scrape_warn!("{url}: {err}"),
        }
        result
    }

    fn title_of(&self, doc: &Document, url: &str) -> String {
        match TitleExtractor.extract(doc) {
            Ok(Some(title)) => {
                self.emit(|| format!("Found {} \"{title}\"", Field::Title));
                title
            }
            _ => {
                self.emit(|| format!("No {} found on {url}, using the url", Field::Title));
                url.to_string()
            }
        }
    }

    fn emit(&self, line: impl FnOnce() -> String) {
        if self.config.debug {
            self.sink.line(&line());
        }
    }
}

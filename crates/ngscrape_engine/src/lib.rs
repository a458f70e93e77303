//! NGScrape engine: game page extraction, document cache and IO capabilities.
mod cache;
mod config;
mod decode;
mod document;
mod extract;
mod extractor;
mod fetch;
mod filename;
mod persist;
mod sink;
mod types;

pub use cache::DocumentCache;
pub use config::{ConfigError, ParserMode, ScrapeConfig};
pub use decode::{decode_html, DecodeError, DecodedHtml};
pub use document::{Document, Element, ParseError};
pub use extract::{
    image_extension, meta_property, CardImageExtractor, DescriptionExtractor, ExtractError,
    FieldExtractor, MediaUrlExtractor, TitleExtractor, EMBED_MARKER, IMAGE_EXTENSIONS,
};
pub use extractor::Extractor;
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use filename::{asset_basename, media_extension};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError, Persister};
pub use sink::{DebugSink, LogSink, MemorySink};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput, Field, GamePage, ScrapeError};

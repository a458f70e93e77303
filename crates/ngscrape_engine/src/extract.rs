
use crate::document::Document;
use crate::types::Field;

/// Literal that introduces the embedded player configuration inside a `<script>`.
///
/// Example:
/// `var embed_controller = new embedController([{"url":"https:\/\/uploads.ungrounded.net\/59000\/59593_alien_booya.swf?f1101313499","is_published":true, ...`
///
/// Split on `"` this gives `var embed_controller = ...([{`, `url`, `:`, then
/// the asset URL at index 3. The index depends on the upstream field order
/// (`url` first); if the site reorders the object this extractor breaks.
pub const EMBED_MARKER: &str = r#"var embed_controller = new embedController([{"url":""#;

const MEDIA_URL_TOKEN: usize = 3;

/// Checked in this order; the first one contained in the URL wins.
pub const IMAGE_EXTENSIONS: [&str; 9] = [
    ".png", ".jpg", ".jfif", ".webp", ".jpeg", ".jpe", ".jif", ".jfi", ".bmp",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("no {field} found")]
    NotFound { field: Field },
    #[error("malformed {field} source: {detail}")]
    MalformedSource { field: Field, detail: String },
}

/// One field recovered from a parsed page. `Ok(None)` means the signature
/// the extractor looks for is absent.
pub trait FieldExtractor: Send + Sync {
    fn field(&self) -> Field;
    fn extract(&self, doc: &Document) -> Result<Option<String>, ExtractError>;
}

/// Asset URL from the embedded player configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct MediaUrlExtractor;

impl FieldExtractor for MediaUrlExtractor {
    fn field(&self) -> Field {
        Field::MediaUrl
    }

    fn extract(&self, doc: &Document) -> Result<Option<String>, ExtractError> {
        let Some(script) = doc
            .find_all("script")
            .map(|script| script.text())
            .find(|text| text.contains(EMBED_MARKER))
        else {
            return Ok(None);
        };
        let Some(start) = script.find(EMBED_MARKER) else {
            return Ok(None);
        };

        let tokens: Vec<&str> = script[start..].split('"').collect();
        // The closing quote of the URL must be present too.
        if tokens.len() <= MEDIA_URL_TOKEN + 1 {
            return Err(malformed("unterminated url field in embed configuration"));
        }
        let url = tokens[MEDIA_URL_TOKEN].replace('\\', "");
        if url.is_empty() {
            return Err(malformed("empty url field in embed configuration"));
        }
        Ok(Some(url))
    }
}

fn malformed(detail: impl Into<String>) -> ExtractError {
    ExtractError::MalformedSource {
        field: Field::MediaUrl,
        detail: detail.into(),
    }
}

/// Social preview image (`og:image`).
#[derive(Debug, Default, Clone, Copy)]
pub struct CardImageExtractor;

impl FieldExtractor for CardImageExtractor {
    fn field(&self) -> Field {
        Field::CardImage
    }

    fn extract(&self, doc: &Document) -> Result<Option<String>, ExtractError> {
        Ok(meta_property(doc, "og:image"))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DescriptionExtractor;

impl FieldExtractor for DescriptionExtractor {
    fn field(&self) -> Field {
        Field::Description
    }

    fn extract(&self, doc: &Document) -> Result<Option<String>, ExtractError> {
        Ok(meta_property(doc, "og:description"))
    }
}

/// Text of the first `<title>`. Falling back to the page URL is up to the caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct TitleExtractor;

impl FieldExtractor for TitleExtractor {
    fn field(&self) -> Field {
        Field::Title
    }

    fn extract(&self, doc: &Document) -> Result<Option<String>, ExtractError> {
        Ok(doc.find("title").map(|title| title.text()))
    }
}

/// `content` of the first `<meta>` whose `property` equals `property`.
pub fn meta_property(doc: &Document, property: &str) -> Option<String> {
    doc.find_all_with_attr("meta", "property")
        .filter(|meta| meta.attr("property") == Some(property))
        .find_map(|meta| meta.attr("content"))
        .map(str::to_string)
}

pub fn image_extension(url: &str) -> Option<&'static str> {
    IMAGE_EXTENSIONS
        .iter()
        .copied()
        .find(|extension| url.contains(extension))
}

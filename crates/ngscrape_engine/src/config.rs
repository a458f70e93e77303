use std::fmt;
use std::str::FromStr;

/// Which parsing discipline [`Document::parse`](crate::Document::parse) applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserMode {
    /// Reject input the HTML parser reports errors for, and undecodable bytes.
    Strict,
    /// Recover from malformed markup; the target pages are not guaranteed well-formed.
    #[default]
    Lenient,
}

impl ParserMode {
    pub const STRICT_NAME: &'static str = "strict-xml-like";
    pub const LENIENT_NAME: &'static str = "lenient-html";

    pub fn name(self) -> &'static str {
        match self {
            ParserMode::Strict => Self::STRICT_NAME,
            ParserMode::Lenient => Self::LENIENT_NAME,
        }
    }
}

impl fmt::Display for ParserMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown parser `{0}` (expected `strict-xml-like` or `lenient-html`)")]
    UnknownParser(String),
}

impl FromStr for ParserMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.eq_ignore_ascii_case(Self::STRICT_NAME) {
            Ok(ParserMode::Strict)
        } else if name.eq_ignore_ascii_case(Self::LENIENT_NAME) {
            Ok(ParserMode::Lenient)
        } else {
            Err(ConfigError::UnknownParser(s.to_string()))
        }
    }
}

/// Per-instance settings of an [`Extractor`](crate::Extractor).
#[derive(Debug, Clone, Default)]
pub struct ScrapeConfig {
    /// Emit one line per step to the debug sink.
    pub debug: bool,
    /// Keep parsed documents keyed by URL for the lifetime of the extractor.
    pub cache: bool,
    pub parser: ParserMode,
}

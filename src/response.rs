//! Buffered responses and the decode step that turns their bytes into a
//! [`Payload`].
//!
//! Decoding never looks at the status code. A 404 page decodes the same way a
//! 200 page does.

use encoding_rs::{Encoding, UTF_8};
use http::header::CONTENT_TYPE;
use http::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::markup::Document;

/// A fully buffered HTTP response.
#[derive(Debug)]
pub struct HttpResponse {
    /// Final URL after redirects.
    pub url: reqwest::Url,
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Charset named by the `Content-Type` header, if any.
    pub fn charset(&self) -> Option<&str> {
        let content_type = self.headers.get(CONTENT_TYPE)?.to_str().ok()?;
        content_type.split(';').skip(1).find_map(|param| {
            let (name, value) = param.split_once('=')?;
            if name.trim().eq_ignore_ascii_case("charset") {
                Some(value.trim().trim_matches('"'))
            } else {
                None
            }
        })
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    #[default]
    Text,
    Markup,
    Structured,
}

impl std::str::FromStr for DecodeMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "text" => Ok(DecodeMode::Text),
            "markup" | "html" => Ok(DecodeMode::Markup),
            "structured" | "json" => Ok(DecodeMode::Structured),
            other => Err(format!("unknown decode mode {}", other)),
        }
    }
}

#[derive(Debug)]
pub enum Payload {
    Text(String),
    Markup { text: String, document: Document },
    Structured { text: String, value: serde_json::Value },
}

impl Payload {
    /// The decoded text the payload was built from. This is what gets
    /// persisted regardless of mode.
    pub fn text(&self) -> &str {
        match self {
            Payload::Text(text) => text,
            Payload::Markup { text, .. } => text,
            Payload::Structured { text, .. } => text,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Payload::Text(_) => "text",
            Payload::Markup { .. } => "markup",
            Payload::Structured { value, .. } => crate::structured::type_name(value),
        }
    }
}

/// Resolves an encoding label such as `utf-8` or `gbk`.
pub fn lookup_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| Error::UnknownEncoding(label.to_string()))
}

/// Decodes the body as text. An explicit label wins over the response charset,
/// which wins over UTF-8. Malformed sequences become U+FFFD.
pub fn decode_text(response: &HttpResponse, declared: Option<&str>) -> Result<String> {
    let encoding = match declared {
        Some(label) => lookup_encoding(label)?,
        None => response
            .charset()
            .and_then(|label| Encoding::for_label(label.as_bytes()))
            .unwrap_or(UTF_8),
    };

    let (text, used, had_errors) = encoding.decode(&response.body);
    if had_errors {
        tracing::warn!(
            "{} body contained sequences invalid in {}",
            response.url,
            used.name()
        );
    }
    Ok(text.into_owned())
}

pub fn decode(response: &HttpResponse, mode: DecodeMode, declared: Option<&str>) -> Result<Payload> {
    let text = decode_text(response, declared)?;
    let payload = match mode {
        DecodeMode::Text => Payload::Text(text),
        DecodeMode::Markup => {
            let document = Document::parse(&text);
            Payload::Markup { text, document }
        }
        DecodeMode::Structured => {
            let value = serde_json::from_str(&text)?;
            Payload::Structured { text, value }
        }
    };
    Ok(payload)
}

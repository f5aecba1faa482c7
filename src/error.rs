use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request to {address} failed: {source}")]
    Transport {
        address: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed structured payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("field `{field}` is not {expected}")]
    Shape {
        field: String,
        expected: &'static str,
    },

    #[error("missing field `{0}`")]
    MissingField(String),

    #[error("cannot write {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown character encoding `{0}`")]
    UnknownEncoding(String),

    #[error("invalid job `{job}`: {reason}")]
    InvalidJob { job: String, reason: String },

    #[error("invalid parameter `{0}`, expected KEY=VALUE")]
    InvalidParam(String),

    #[error("bad path expression at offset {offset}: {message}")]
    XPath { offset: usize, message: String },

    #[error("failed to read input: {0}")]
    Input(#[source] std::io::Error),

    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

use serde::{Deserialize, Serialize};

use crate::destination::{sanitize_file_stem, Destination};
use crate::error::{Error, Result};
use crate::request::RequestDescriptor;
use crate::response::{lookup_encoding, DecodeMode};
use crate::structured::Listing;

/// Placeholder in a destination path that is replaced by prompted input.
pub const INPUT_PLACEHOLDER: &str = "{input}";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Prompt {
    pub message: String,
    /// Request parameter that receives the answer, if any.
    pub param: Option<String>,
}

/// Inclusive page range walked by a paginated job.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Pages {
    pub param: String,
    #[serde(default = "first_page")]
    pub first: u32,
    pub last: u32,
}

fn first_page() -> u32 {
    1
}

/// A named Fetch-and-Persist run: the request to issue, how to decode the
/// answer and where to put it.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Job {
    pub name: String,
    #[serde(flatten)]
    pub request: RequestDescriptor,
    #[serde(default)]
    pub mode: DecodeMode,
    pub encoding: Option<String>,
    pub destination: Option<String>,
    pub preview: Option<usize>,
    /// Print the whole decoded payload before any listing lines.
    #[serde(default)]
    pub dump: bool,
    pub listing: Option<Listing>,
    #[serde(default)]
    pub queries: Vec<String>,
    pub prompt: Option<Prompt>,
    pub pages: Option<Pages>,
}

impl Job {
    pub fn new(name: impl Into<String>, request: RequestDescriptor) -> Self {
        Self {
            name: name.into(),
            request,
            mode: DecodeMode::Text,
            encoding: None,
            destination: None,
            preview: None,
            dump: false,
            listing: None,
            queries: Vec::new(),
            prompt: None,
            pages: None,
        }
    }

    pub fn mode(mut self, mode: DecodeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    pub fn destination(mut self, path: impl Into<String>) -> Self {
        self.destination = Some(path.into());
        self
    }

    pub fn preview(mut self, chars: usize) -> Self {
        self.preview = Some(chars);
        self
    }

    pub fn dump(mut self) -> Self {
        self.dump = true;
        self
    }

    pub fn listing(mut self, listing: Listing) -> Self {
        self.mode = DecodeMode::Structured;
        self.listing = Some(listing);
        self
    }

    pub fn query(mut self, expr: impl Into<String>) -> Self {
        self.mode = DecodeMode::Markup;
        self.queries.push(expr.into());
        self
    }

    pub fn prompt(mut self, message: impl Into<String>, param: Option<&str>) -> Self {
        self.prompt = Some(Prompt {
            message: message.into(),
            param: param.map(str::to_string),
        });
        self
    }

    pub fn pages(mut self, param: impl Into<String>, first: u32, last: u32) -> Self {
        self.pages = Some(Pages {
            param: param.into(),
            first,
            last,
        });
        self
    }

    /// Rejects combinations that cannot run, before any call is made.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| {
            Err(Error::InvalidJob {
                job: self.name.clone(),
                reason: reason.to_string(),
            })
        };

        if self.request.address.trim().is_empty() {
            return invalid("address is empty");
        }
        if let Some(label) = &self.encoding {
            lookup_encoding(label)?;
        }
        if self.listing.is_some() && self.mode != DecodeMode::Structured {
            return invalid("a listing needs structured mode");
        }
        if !self.queries.is_empty() && self.mode != DecodeMode::Markup {
            return invalid("path queries need markup mode");
        }
        if let Some(pages) = &self.pages {
            if pages.first > pages.last {
                return invalid("first page is after last page");
            }
            if self.destination.is_some() {
                return invalid("paginated jobs cannot write a destination");
            }
        }
        if let Some(dest) = &self.destination {
            if dest.contains(INPUT_PLACEHOLDER) && self.prompt.is_none() {
                return invalid("destination uses {input} but the job has no prompt");
            }
        }
        Ok(())
    }

    /// Resolves the destination, substituting sanitized input for the
    /// placeholder.
    pub fn resolve_destination(&self, input: Option<&str>) -> Option<Destination> {
        let raw = self.destination.as_deref()?;
        let resolved = match input {
            Some(answer) => raw.replace(INPUT_PLACEHOLDER, &sanitize_file_stem(answer)),
            None => raw.to_string(),
        };
        Some(Destination::parse(&resolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structured::Column;
    use std::path::PathBuf;

    fn courses() -> Job {
        Job::new(
            "courses",
            RequestDescriptor::get("https://example.com/course/list").query("pageSize", "15"),
        )
        .listing(Listing::new("rows", vec![Column::new("Course Name", "name")]))
    }

    #[test]
    fn builders_set_mode() {
        assert_eq!(courses().mode, DecodeMode::Structured);
        let job = Job::new("t", RequestDescriptor::get("http://x/")).query("//title");
        assert_eq!(job.mode, DecodeMode::Markup);
        assert!(job.validate().is_ok());
    }

    #[test]
    fn paginated_jobs_do_not_persist() {
        let job = courses().pages("pageNum", 1, 3).destination("out.json");
        assert!(matches!(job.validate(), Err(Error::InvalidJob { .. })));

        let job = courses().pages("pageNum", 4, 3);
        assert!(job.validate().is_err());

        assert!(courses().pages("pageNum", 1, 3).validate().is_ok());
    }

    #[test]
    fn listing_requires_structured() {
        let mut job = courses();
        job.mode = DecodeMode::Text;
        assert!(job.validate().is_err());
    }

    #[test]
    fn bad_encoding_label() {
        let job = courses().encoding("not-a-charset");
        assert!(matches!(job.validate(), Err(Error::UnknownEncoding(_))));
        assert!(courses().encoding("gbk").validate().is_ok());
    }

    #[test]
    fn placeholder_needs_prompt() {
        let job = Job::new("r", RequestDescriptor::get("http://x/")).destination("{input}.html");
        assert!(job.validate().is_err());

        let job = job.prompt("title: ", Some("keyword"));
        assert!(job.validate().is_ok());
        assert_eq!(
            job.resolve_destination(Some("a/b")),
            Some(Destination::File(PathBuf::from("a_b.html")))
        );
    }

    #[test]
    fn dash_destination_is_stdout() {
        let job = Job::new("s", RequestDescriptor::get("http://x/")).destination("-");
        assert_eq!(job.resolve_destination(None), Some(Destination::Stdout));
        assert_eq!(Job::new("n", RequestDescriptor::get("http://x/")).resolve_destination(None), None);
    }

    #[test]
    fn from_toml() {
        let job: Job = toml::from_str(
            r#"
            name = "kfc"
            address = "http://www.kfc.com.cn/kfccda/ashx/GetStoreList.ashx?op=keyword"
            method = "POST"
            mode = "structured"

            [form]
            keyword = "广州"
            pageIndex = "1"

            [headers]
            User-Agent = "Mozilla/5.0"

            [listing]
            field = "Table1"
            columns = [
                { label = "KFC Store Name", key = "storeName" },
                { label = "Address", key = "addressDetail" },
            ]
            "#,
        )
        .unwrap();

        assert_eq!(job.request.method, crate::request::Method::Post);
        assert_eq!(job.request.form.get("keyword").map(String::as_str), Some("广州"));
        assert_eq!(job.listing.as_ref().map(|l| l.columns.len()), Some(2));
        assert!(job.pages.is_none());
        assert!(job.validate().is_ok());
    }
}

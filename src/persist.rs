//! The Fetch-and-Persist operation.
//!
//! A run issues its calls strictly one after another and stops at the first
//! failure. Nothing is written to a destination until the response has been
//! decoded and every listing or query line has been built.

use std::io::Write;

use crate::client::Client;
use crate::destination::Destination;
use crate::error::{Error, Result};
use crate::input::InputSource;
use crate::job::{Job, Pages};
use crate::request::RequestDescriptor;
use crate::response::{decode, HttpResponse, Payload};

/// What a completed run did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Number of network calls issued.
    pub calls: usize,
    /// Lines printed from listings or path queries.
    pub lines: usize,
    pub written: Option<Destination>,
}

pub struct Runner<'a> {
    client: &'a Client,
    out: &'a mut dyn Write,
    input: &'a mut dyn InputSource,
}

macro_rules! emit {
    ($out:expr) => {
        writeln!($out).map_err(Error::Output)
    };
    ($out:expr, $($arg:tt)*) => {
        writeln!($out, $($arg)*).map_err(Error::Output)
    };
}

impl<'a> Runner<'a> {
    pub fn new(client: &'a Client, out: &'a mut dyn Write, input: &'a mut dyn InputSource) -> Self {
        Self { client, out, input }
    }

    #[tracing::instrument(level = "info", name = "job", skip_all, fields(name = %job.name))]
    pub async fn run(&mut self, job: &Job) -> Result<Outcome> {
        job.validate()?;

        let mut request = job.request.clone();
        let mut answer = None;
        if let Some(prompt) = &job.prompt {
            let line = self.input.read_line(&prompt.message).map_err(Error::Input)?;
            if let Some(param) = &prompt.param {
                request = request.with_param(param, line.clone());
            }
            answer = Some(line);
        }

        match &job.pages {
            Some(pages) => self.paginate(job, &request, pages).await,
            None => {
                let destination = job.resolve_destination(answer.as_deref());
                self.single(job, &request, destination).await
            }
        }
    }

    async fn single(
        &mut self,
        job: &Job,
        request: &RequestDescriptor,
        destination: Option<Destination>,
    ) -> Result<Outcome> {
        let response = self.client.send(request).await?;
        emit!(self.out, "Status Code: {}", response.status)?;
        emit!(self.out, "Content Length: {}", response.body.len())?;

        let (payload, lines) = build(job, &response)?;
        self.show(job, &payload, &lines)?;

        let mut outcome = Outcome {
            calls: 1,
            lines: lines.len(),
            written: None,
        };
        if let Some(destination) = destination {
            destination.write(payload.text(), &mut *self.out)?;
            match destination {
                // keep the trailer off the body's last line
                Destination::Stdout if !payload.text().ends_with('\n') => emit!(self.out)?,
                Destination::Stdout => {}
                Destination::File(_) => emit!(self.out, "Data written to {}", destination)?,
            }
            outcome.written = Some(destination);
        }
        emit!(self.out, "Request completed.")?;
        Ok(outcome)
    }

    async fn paginate(
        &mut self,
        job: &Job,
        request: &RequestDescriptor,
        pages: &Pages,
    ) -> Result<Outcome> {
        let mut outcome = Outcome::default();
        for page in pages.first..=pages.last {
            let paged = request.with_param(&pages.param, page.to_string());
            tracing::debug!("page {} of {}", page, pages.last);

            let response = self.client.send(&paged).await?;
            outcome.calls += 1;

            let (payload, lines) = build(job, &response)?;
            emit!(self.out, "--- Page {} ---", page)?;
            self.show(job, &payload, &lines)?;
            emit!(self.out)?;
            outcome.lines += lines.len();
        }
        emit!(self.out, "All requests completed.")?;
        Ok(outcome)
    }

    fn show(&mut self, job: &Job, payload: &Payload, lines: &[String]) -> Result<()> {
        emit!(self.out, "Data Type: {}", payload.type_name())?;
        if job.dump {
            match payload {
                Payload::Structured { value, .. } => emit!(self.out, "Data Content: {}", value)?,
                other => emit!(self.out, "Data Content: {}", other.text())?,
            }
        }
        if let Some(chars) = job.preview {
            emit!(
                self.out,
                "Content Preview (first {} chars): {}",
                chars,
                preview(payload.text(), chars)
            )?;
        }
        for line in lines {
            emit!(self.out, "{}", line)?;
        }
        Ok(())
    }
}

/// Decodes the response and renders every listing or query line up front.
fn build(job: &Job, response: &HttpResponse) -> Result<(Payload, Vec<String>)> {
    let payload = decode(response, job.mode, job.encoding.as_deref())?;
    let lines = match (&payload, &job.listing) {
        (Payload::Structured { value, .. }, Some(listing)) => listing.lines(value)?,
        (Payload::Markup { document, .. }, _) => {
            let mut lines = Vec::new();
            for expr in &job.queries {
                for text in document.select_text(expr)? {
                    lines.push(format!("{}: {}", expr, text.trim()));
                }
            }
            lines
        }
        _ => Vec::new(),
    };
    Ok((payload, lines))
}

/// The first `chars` characters of `text`.
pub fn preview(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_counts_characters() {
        assert_eq!(preview("东方财富网", 2), "东方");
        assert_eq!(preview("short", 100), "short");
        assert_eq!(preview("", 5), "");
        assert_eq!(preview("abc", 0), "");
    }
}

pub mod client;
pub mod config;
pub mod destination;
pub mod error;
pub mod input;
pub mod job;
pub mod mappings;
pub mod markup;
pub mod persist;
pub mod request;
pub mod response;
pub mod sites;
pub mod structured;

use std::io::Write;

pub use crate::client::Client;
pub use crate::config::Config;
pub use crate::destination::Destination;
pub use crate::error::{Error, Result};
pub use crate::input::InputSource;
pub use crate::job::Job;
pub use crate::persist::{Outcome, Runner};
pub use crate::request::{Method, RequestDescriptor};
pub use crate::response::{DecodeMode, Payload};

/// Runs one job to completion. See [`persist`] for the guarantees.
pub async fn fetch_and_persist(
    client: &Client,
    job: &Job,
    out: &mut dyn Write,
    input: &mut dyn InputSource,
) -> Result<Outcome> {
    Runner::new(client, out, input).run(job).await
}

/// Runs jobs in order and stops at the first failure.
pub async fn run_all(
    client: &Client,
    jobs: &[&Job],
    out: &mut dyn Write,
    input: &mut dyn InputSource,
) -> Result<Vec<Outcome>> {
    let mut runner = Runner::new(client, out, input);
    let mut outcomes = Vec::with_capacity(jobs.len());
    for job in jobs {
        outcomes.push(runner.run(job).await?);
    }
    Ok(outcomes)
}

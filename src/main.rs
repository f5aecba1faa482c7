use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snag::input::Stdin;
use snag::markup::Document;
use snag::request::{parse_header, parse_pair};
use snag::structured::{Column, Listing};
use snag::{Client, DecodeMode, Job, Method, RequestDescriptor};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file of jobs; the built-in presets are used without one
    #[arg(short, long = "config", alias = "config-path", value_name = "PATH")]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the configured jobs
    List,
    /// Run jobs by name, in the order given
    Run {
        #[arg(long, conflicts_with = "names")]
        all: bool,
        names: Vec<String>,
    },
    /// Fetch a single address
    Fetch(FetchArgs),
    /// Evaluate path queries against a local HTML file
    Query {
        file: PathBuf,
        #[arg(required = true)]
        exprs: Vec<String>,
    },
    /// Print the sample configuration mappings
    Mappings,
}

#[derive(clap::Args, Debug)]
struct FetchArgs {
    url: String,
    #[arg(short = 'X', long, default_value = "GET")]
    method: Method,
    #[arg(short, long = "query", value_name = "KEY=VALUE")]
    query: Vec<String>,
    #[arg(short = 'd', long = "data", value_name = "KEY=VALUE")]
    form: Vec<String>,
    #[arg(short = 'H', long = "header", value_name = "NAME:VALUE")]
    headers: Vec<String>,
    #[arg(short, long, default_value = "text")]
    mode: DecodeMode,
    #[arg(short, long)]
    encoding: Option<String>,
    /// File to write, or `-` for stdout
    #[arg(short, long)]
    output: Option<String>,
    /// Print the first N characters of the body
    #[arg(short, long, value_name = "N")]
    preview: Option<usize>,
    /// Top-level list field to print one line per element
    #[arg(long, value_name = "FIELD")]
    list: Option<String>,
    #[arg(long = "column", value_name = "LABEL=KEY", requires = "list")]
    columns: Vec<String>,
    #[arg(long = "xpath", value_name = "EXPR")]
    xpaths: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = match args.config_path {
        Some(path) => read_config(&path)?,
        None => snag::Config::default(),
    };
    config.validate()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::List => {
            for job in &config.jobs {
                writeln!(
                    out,
                    "{:<16} {:<5} {}",
                    job.name, job.request.method, job.request.address
                )?;
            }
        }
        Command::Run { all, names } => {
            let jobs: Vec<&Job> = if all {
                config.jobs.iter().collect()
            } else {
                names
                    .iter()
                    .map(|name| config.job(name).with_context(|| format!("no job named {}", name)))
                    .collect::<Result<_>>()?
            };
            if jobs.is_empty() {
                bail!("nothing to run, name a job or pass --all");
            }

            let client = Client::new(config.user_agent.as_deref())?;
            snag::run_all(&client, &jobs, &mut out, &mut Stdin).await?;
        }
        Command::Fetch(fetch) => {
            let job = fetch_job(fetch)?;
            let client = Client::new(config.user_agent.as_deref())?;
            snag::fetch_and_persist(&client, &job, &mut out, &mut Stdin).await?;
        }
        Command::Query { file, exprs } => {
            let document = Document::from_path(&file)?;
            for expr in &exprs {
                for found in document.select(expr)? {
                    writeln!(out, "{}", found)?;
                }
            }
        }
        Command::Mappings => snag::mappings::print(&mut out)?,
    }

    Ok(())
}

fn read_config(config_path: &str) -> Result<snag::Config> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("reading {}", config_path))?;
    Ok(toml::from_str(&content)?)
}

fn fetch_job(args: FetchArgs) -> Result<Job> {
    let mut request = RequestDescriptor {
        address: args.url,
        method: args.method,
        ..Default::default()
    };
    for raw in &args.query {
        let (key, value) = parse_pair(raw)?;
        request = request.query(key, value);
    }
    for raw in &args.form {
        let (key, value) = parse_pair(raw)?;
        request = request.form(key, value);
    }
    for raw in &args.headers {
        let (name, value) = parse_header(raw)?;
        request = request.header(name, value);
    }

    let mut job = Job::new("fetch", request).mode(args.mode);
    job.encoding = args.encoding;
    job.destination = args.output;
    job.preview = args.preview;
    if let Some(field) = args.list {
        let columns = args
            .columns
            .iter()
            .map(|raw| parse_pair(raw).map(|(label, key)| Column::new(label, key)))
            .collect::<snag::Result<Vec<_>>>()?;
        job = job.listing(Listing::new(field, columns));
    }
    for expr in args.xpaths {
        job = job.query(expr);
    }
    Ok(job)
}

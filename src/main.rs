mod archiver;
mod cli;
mod config;
mod error;
mod fetcher;
mod harvester;
mod items;
mod models;
mod parser;
mod report;

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Action, Args, Outcome, Session};
use crate::config::CrawlerConfig;
use crate::fetcher::HttpFetcher;
use crate::parser::PortalLayout;

fn main() -> Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let args = Args::parse();
    let started = Utc::now();

    let config = CrawlerConfig::default();
    let source = HttpFetcher::new()?;
    let layout = PortalLayout::new()?;
    let mut session = Session {
        config: &config,
        source: &source,
        layout: &layout,
        input: io::stdin().lock(),
        out: io::stdout(),
    };
    let outcome = session.run(&Action::parse(&args.action))?;

    let elapsed = Utc::now() - started;
    println!(
        "Total elapsed time = {:.3} seconds",
        elapsed.num_milliseconds() as f64 / 1000.0
    );

    Ok(match outcome {
        Outcome::Done => ExitCode::SUCCESS,
        Outcome::Aborted => ExitCode::FAILURE,
    })
}

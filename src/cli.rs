// File: cli.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::catalog::DEFAULT_CATALOG_PATH;
use crate::config::{ConnectionFailurePolicy, RunConfig, DEFAULT_RETRY, DEFAULT_TIMEOUT_SECS};
use crate::error::ConfigError;
use crate::report::ReportFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = env!("CARGO_PKG_DESCRIPTION"),
)]
pub struct Cli {
    #[arg(short = 'u', long = "url", default_value = "http://example.com")]
    pub url: String,

    #[arg(
        short = 't',
        long = "timeout",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        help = "Timing threshold in seconds (1-60)"
    )]
    pub timeout: u64,

    #[arg(
        short = 'r',
        long = "retry",
        default_value_t = DEFAULT_RETRY,
        help = "Retries per probe on transport failure (0-10)"
    )]
    pub retry: u32,

    #[arg(
        short = 'm',
        long = "method",
        default_value = "POST",
        help = "GET or POST"
    )]
    pub method: String,

    #[arg(short = 'p', long = "payloads", default_value = DEFAULT_CATALOG_PATH)]
    pub payloads: PathBuf,

    #[arg(short = 'f', long = "format", default_value = "text", help = "text or jsonl")]
    pub format: String,

    #[arg(
        short = 'c',
        long = "concurrency",
        default_value_t = 1,
        help = "Probes in flight at once; output order is kept"
    )]
    pub concurrency: usize,

    #[arg(
        long = "samples",
        default_value_t = 1,
        help = "Timing samples per probe; more than one classifies on the median"
    )]
    pub samples: usize,

    #[arg(
        long = "deadline",
        help = "Per-probe deadline in seconds (default: twice the timeout)"
    )]
    pub deadline: Option<u64>,

    #[arg(
        long = "continue-on-connect-error",
        help = "Report connection failures per probe instead of aborting"
    )]
    pub continue_on_connect_error: bool,

    #[arg(
        short = 's',
        long = "suppress-stats",
        help = "Suppress run configuration and summary"
    )]
    pub suppress_stats: bool,

    #[arg(long = "no-color", help = "Disable colored output")]
    pub no_color: bool,

    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    pub fn run_config(&self) -> Result<RunConfig, ConfigError> {
        let mut config = RunConfig::new(&self.url, &self.method, self.timeout, self.retry)?
            .with_concurrency(self.concurrency)?
            .with_samples(self.samples)?;
        if let Some(deadline) = self.deadline {
            config = config.with_deadline(deadline)?;
        }
        if self.continue_on_connect_error {
            config = config.with_connection_failure(ConnectionFailurePolicy::Continue);
        }
        Ok(config)
    }

    pub fn report_format(&self) -> Result<ReportFormat, ConfigError> {
        self.format.parse()
    }
}

// File: main.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use clap::Parser;
use colored::*;
use log::{warn, LevelFilter};
use rsmuggle::campaign::Campaign;
use rsmuggle::catalog::Catalog;
use rsmuggle::cli::Cli;
use rsmuggle::config::RunConfig;
use rsmuggle::report::ReportWriter;
use rsmuggle::transport::TcpTransport;
use simple_logger::SimpleLogger;
use std::str::FromStr;

fn init_logging(level: &str) {
    let level = LevelFilter::from_str(level).unwrap_or(LevelFilter::Warn);
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("Failed to initialize logger: {}", e);
    }
}

fn print_run_header(config: &RunConfig) {
    eprintln!("url : {}", config.target());
    eprintln!("timeout : {}", config.timeout());
    eprintln!("retry : {}", config.retry());
    eprintln!("method : {}", config.method());
    eprintln!("deadline : {}s", config.deadline().as_secs());
    eprintln!("{}", "-".repeat(50));
}

fn exit_with(message: String) -> ! {
    eprintln!("{}", message.red());
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }
    init_logging(&cli.log_level);

    let config = match cli.run_config() {
        Ok(config) => config,
        Err(e) => exit_with(format!("{}\nUsage: {} --help", e, env!("CARGO_PKG_NAME"))),
    };
    let format = match cli.report_format() {
        Ok(format) => format,
        Err(e) => exit_with(format!("{}\nUsage: {} --help", e, env!("CARGO_PKG_NAME"))),
    };

    if !cli.suppress_stats {
        print_run_header(&config);
    }

    let catalog = match Catalog::load(&cli.payloads) {
        Ok(catalog) => catalog,
        Err(e) => exit_with(e.to_string()),
    };

    let campaign = Campaign::new(config, TcpTransport::new());
    let stop = campaign.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing the current exchange (press Ctrl-C again to quit)");
            stop.stop();
        }
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("{}", "Interrupted twice, exiting".red());
            std::process::exit(130);
        }
    });

    let mut writer = ReportWriter::new(std::io::stdout(), format);
    match campaign.run(&catalog, |result| writer.write_result(result)).await {
        Ok(stats) => {
            if !cli.suppress_stats {
                eprintln!();
                eprintln!("{}", stats.summary());
            }
        }
        Err(e) => exit_with(e.to_string()),
    }
}

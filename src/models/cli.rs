use crate::{
    POLL_INTERVAL_MAX_SECS, TIMEOUT_MAX_MS, TIMEOUT_MIN_MS,
    commands::{settings::Settings, status::ProbeOptions},
};

use std::time::Duration;

use clap::{Args, Parser, Subcommand, value_parser};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub probe: ProbeArgs,

    /// Print results as json
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Ping the server once and print its status [Default]
    #[command(alias = "Status")]
    Status,

    /// Ping the server once and list the players it reports
    #[command(aliases(["Players", "list", "List"]))]
    Players,

    /// Keep pinging the server on a fixed interval
    #[command(aliases(["Watch", "poll", "Poll"]))]
    Watch {
        /// Seconds between pings [Default: 15]
        #[arg(short, long, value_name = "SECONDS", value_parser = value_parser!(u64).range(1..=POLL_INTERVAL_MAX_SECS))]
        interval: Option<u64>,

        /// Stop after this many pings [Default: run until ctrl-c]
        #[arg(short, long, value_parser = value_parser!(u32).range(1..))]
        count: Option<u32>,
    },
}

/// Overrides for the values found in settings.json
#[derive(Args, Debug, Clone, Default)]
pub struct ProbeArgs {
    /// Server host name or ip
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Server port [Default: 25565]
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// Milliseconds to wait for a response [Default: 5000]
    #[arg(short, long, global = true, value_name = "MILLIS", value_parser = value_parser!(u64).range(TIMEOUT_MIN_MS..=TIMEOUT_MAX_MS))]
    pub timeout: Option<u64>,

    /// Protocol version declared in the handshake [Default: 767]
    #[arg(long, global = true, value_name = "VERSION")]
    pub protocol_version: Option<i32>,
}

impl ProbeArgs {
    pub fn resolve(&self, settings: &Settings) -> ProbeOptions {
        let mut options = settings.probe_options();
        if let Some(ref host) = self.host {
            options.host = host.trim().to_string();
        }
        if let Some(port) = self.port {
            options.port = port;
        }
        if let Some(timeout) = self.timeout {
            options.timeout = Duration::from_millis(timeout);
        }
        if let Some(protocol_version) = self.protocol_version {
            options.protocol_version = protocol_version;
        }
        options
    }
}

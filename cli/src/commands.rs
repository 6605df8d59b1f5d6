use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;
use tadisc_common::config::DEFAULT_OPTIONS_FILE;

#[derive(Parser)]
#[command(name = "tadisc", version)]
#[command(about = "Discover NetAlly Test Accessories running iPerf3 servers on a network.")]
pub struct CommandLine {
    /// IPv4 network to scan (e.g. 192.168.1.0/24)
    pub network: String,

    /// Probe timeout in seconds, between 0.010 and 0.160 (default 0.010)
    #[arg(short, long, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// Read the probe timeout from the options file
    #[arg(short, long)]
    pub options: bool,

    /// Location of the options file
    #[arg(long, value_name = "PATH", default_value = DEFAULT_OPTIONS_FILE)]
    pub options_file: PathBuf,

    /// Accessory list written after the scan
    #[arg(long, value_name = "PATH", default_value = "iperfaccessory")]
    pub output: PathBuf,

    /// Debug log, overwritten on every run
    #[arg(long, value_name = "PATH", default_value = "iperfdiscovery.log")]
    pub log_file: PathBuf,

    /// Maximum number of hosts probed or queried at once (default 256)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<NonZeroUsize>,

    /// Mirror the log on the console
    #[arg(long)]
    pub verbose: bool,

    /// Do not print the summary
    #[arg(short, long)]
    pub quiet: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

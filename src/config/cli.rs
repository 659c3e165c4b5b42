use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "scan-transfer")]
#[command(about = "Replay GuardDuty malware scan events against local buckets")]
pub struct CliArgs {
    /// Path to the TOML replay configuration
    #[arg(short, long, default_value = "scan-transfer.toml")]
    pub config: PathBuf,

    /// Path to a saved EventBridge scan result event
    #[arg(short, long)]
    pub event: PathBuf,

    /// Show the routing decision without moving anything
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "realm-sources")]
#[command(author, version, about = "Inspect and poll per-realm remote sources")]
#[command(propagate_version = true)]
pub struct Cli {
    /// YAML file describing the sources
    #[arg(long, global = true, env = "REALM_SOURCES_CONFIG", default_value = "sources.yaml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List realms and their registered sources
    #[command(alias = "ls")]
    List,

    /// Show the allowed source values for a realm
    Choices {
        /// Realm name (e.g. vacancy)
        realm: String,
    },

    /// Fetch every active source of a realm once
    Fetch {
        /// Realm name (e.g. event)
        realm: String,
    },

    /// Poll sources on an interval and print what arrives
    Watch {
        /// Realms to watch; all configured realms when omitted
        realms: Vec<String>,

        /// Override the configured poll interval, in seconds
        #[arg(long)]
        interval: Option<u64>,
    },
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "docsift")]
#[command(about = "Extract and search static documentation sites", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Walk a static build output directory and write the search artifact.
    Extract {
        /// Root directory of the generated static site
        site_dir: PathBuf,
        /// Where to write the serialized page records
        #[arg(short, long, default_value = "searchIndex.json")]
        out: PathBuf,
        /// File extension of routed pages
        #[arg(long, default_value = "html")]
        ext: String,
    },
    /// Serve the search endpoint over a previously written artifact.
    Serve {
        /// Path to the artifact produced by `extract`
        artifact: PathBuf,
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

use std::sync::Arc;

use clap::Parser;

use docsift::cli::{Cli, Commands};
use docsift::search::IndexStore;
use docsift::{extract, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    docsift::tracing::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Extract { site_dir, out, ext } => {
            let pages = extract::extract_site(&site_dir, &ext)?;
            extract::write_artifact(&pages, &out)?;
        }
        Commands::Serve { artifact, port } => {
            let store = Arc::new(IndexStore::new(artifact));
            server::serve(store, port).await?;
        }
    }

    Ok(())
}

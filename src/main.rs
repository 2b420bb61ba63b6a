use anyhow::{Context, Result};
use clap::Parser;

use docs_mirror::{logging, MirrorCommand, WebsiteMirror};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args = MirrorCommand::parse();
    let config = args.into_config().context("invalid configuration")?;

    let mirror = WebsiteMirror::new(config)?;
    mirror
        .mirror_website()
        .await
        .context("mirroring aborted")?;

    Ok(())
}

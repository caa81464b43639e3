//! lcu-events update - Download and launch the latest installer

use std::path::PathBuf;

use clap::Args;

use crate::app::App;
use crate::error::Result;

use super::CommandContext;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Directory to download the installer into (default: system temp dir)
    #[arg(long)]
    pub download_dir: Option<PathBuf>,
}

pub fn run(ctx: &CommandContext, args: &UpdateArgs) -> Result<()> {
    let mut config = ctx.config.clone();
    if let Some(dir) = &args.download_dir {
        config.update.download_dir = Some(dir.clone());
    }

    let app = App::new(config, ctx.renderer.clone());
    tracing::info!(version = app.current_version(), "checking for update to apply");

    // Exits the process on success.
    app.updater()?.update_application()
}

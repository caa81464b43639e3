//! lcu-events check - Check for a newer release

use std::time::Duration;

use clap::Args;

use crate::app::App;
use crate::error::Result;
use crate::events;

use super::CommandContext;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Wait this many milliseconds before querying (default: no wait)
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

/// Unlike the startup check, failures here are returned to the user.
pub fn run(ctx: &CommandContext, args: &CheckArgs) -> Result<()> {
    let app = App::new(ctx.config.clone(), ctx.renderer.clone());
    let checker = app.checker()?;

    if let Some(delay) = args.delay_ms {
        std::thread::sleep(Duration::from_millis(delay));
    }

    let info = checker.fetch_version_info()?;
    events::emit_json(ctx.renderer.as_ref(), events::VERSION_INFO, &info);
    Ok(())
}

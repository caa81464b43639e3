//! lcu-events run - Start the shell headless

use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use crossbeam_channel::RecvTimeoutError;

use crate::app::App;
use crate::error::Result;
use crate::events::ChannelEmitter;

use super::CommandContext;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Skip the startup update check
    #[arg(long)]
    pub no_update_check: bool,
}

/// Drive the event loop until the startup check is done and nothing else
/// can produce events.
pub fn run(ctx: &CommandContext, args: &RunArgs) -> Result<()> {
    let mut config = ctx.config.clone();
    if args.no_update_check {
        config.update.auto_check = false;
    }

    let (emitter, rx) = ChannelEmitter::channel();
    let mut app = App::new(config, Arc::new(emitter));
    app.startup()?;

    loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(event) => ctx.renderer.render(&event),
            Err(RecvTimeoutError::Timeout) => {
                if app.check_finished() && !app.lcu_connected() && rx.is_empty() {
                    break;
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    app.wait_for_check();
    // Anything emitted between the last poll and the join.
    for event in rx.try_iter() {
        ctx.renderer.render(&event);
    }
    app.shutdown();
    Ok(())
}

//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use std::sync::Arc;

use crate::cli::progress::EventRenderer;
use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::error::Result;

pub mod check;
pub mod run;
pub mod update;

/// Shared state for command handlers.
pub struct CommandContext {
    pub config: Config,
    pub renderer: Arc<EventRenderer>,
}

impl CommandContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = Config::load(cli.config.as_deref())?;
        Ok(Self {
            config,
            renderer: Arc::new(EventRenderer::new(cli.robot, cli.quiet)),
        })
    }
}

pub fn run(ctx: &CommandContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Run(args) => run::run(ctx, args),
        Commands::Check(args) => check::run(ctx, args),
        Commands::Update(args) => update::run(ctx, args),
    }
}

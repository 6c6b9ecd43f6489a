//! CLI command implementations
//!
//! Each subcommand has its own module with an Args struct and a `run()`.

use clap::Subcommand;

pub mod check;
pub mod codes;
pub mod serve;

use crate::app::AppContext;
use crate::error::Result;

pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Serve(args) => serve::run(ctx, args),
        Commands::Check(args) => check::run(ctx, args),
        Commands::Codes(args) => codes::run(ctx, args),
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the language server on stdin/stdout
    Serve(serve::ServeArgs),

    /// Report diagnostics for a shell script
    Check(check::CheckArgs),

    /// List diagnostic codes
    Codes(codes::CodesArgs),
}

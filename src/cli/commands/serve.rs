//! q2lsp serve - run the language server

use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::error::Result;
use crate::lsp;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Command hierarchy JSON (overrides `signatures.cache_path`)
    #[arg(long, value_name = "PATH")]
    pub signatures: Option<PathBuf>,
}

pub fn run(ctx: &AppContext, args: &ServeArgs) -> Result<()> {
    let repository = ctx.load_repository(args.signatures.as_deref())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(lsp::serve(&ctx.config, repository))
}

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::cli::{Cli, OutputFormat};
use crate::config::{Config, PROJECT_CONFIG_FILE};
use crate::error::Result;
use crate::signatures::{SignatureRepository, hierarchy};

/// Resolved state shared by every subcommand.
pub struct AppContext {
    pub project_root: PathBuf,
    pub config: Config,
    pub output_format: OutputFormat,
    pub verbosity: u8,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let project_root = find_project_root(&cwd).unwrap_or(cwd);
        let config = Config::load(cli.config.as_deref(), &project_root)?;

        Ok(Self {
            project_root,
            config,
            output_format: cli.output_format(),
            verbosity: cli.verbose,
        })
    }

    /// Load signatures from `path`, else from `signatures.cache_path`.
    ///
    /// With neither set the repository stays unloaded and every action
    /// lookup reports that signatures are not loaded yet.
    pub fn load_repository(&self, path: Option<&Path>) -> Result<SignatureRepository> {
        let mut repository = SignatureRepository::new();
        let Some(path) = path.or(self.config.signatures.cache_path.as_deref()) else {
            warn!("no signature cache configured; actions cannot be validated");
            return Ok(repository);
        };

        let catalog = hierarchy::load_file(path)?;
        repository.load_catalog(catalog);
        info!(
            path = %path.display(),
            signatures = repository.len(),
            "signature repository ready"
        );
        Ok(repository)
    }
}

/// Nearest ancestor of `start` holding a project config file.
fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(PROJECT_CONFIG_FILE).is_file())
        .map(Path::to_path_buf)
}

//! In-memory signature repository.
//!
//! Filled in one bulk [`SignatureRepository::load`] call by whatever
//! discovered the signatures; afterwards it is only read. Lookups never
//! trigger discovery.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, warn};

use super::types::ActionSignature;

/// Why a lookup produced no signature.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LookupMiss {
    /// Discovery has not completed yet.
    NotLoaded,
    UnknownPlugin,
    UnknownAction,
}

/// Everything a discovery pass produces.
#[derive(Debug, Clone, Default)]
pub struct SignatureCatalog {
    pub signatures: Vec<ActionSignature>,
    /// Commands that take no action, such as `qiime info`.
    pub leaf_commands: Vec<String>,
    /// Commands built into the launcher rather than provided by a plugin.
    pub builtins: Vec<String>,
    /// Help for the launcher itself.
    pub root_help: Option<String>,
    /// Help per plugin or builtin command.
    pub command_help: Vec<(String, String)>,
}

#[derive(Debug, Default)]
pub struct SignatureRepository {
    loaded: bool,
    signatures: HashMap<(String, String), ActionSignature>,
    /// lowercase plugin -> lowercase action names
    actions: BTreeMap<String, BTreeSet<String>>,
    leaf_commands: BTreeSet<String>,
    builtins: BTreeSet<String>,
    root_help: Option<String>,
    command_help: HashMap<String, String>,
}

impl SignatureRepository {
    /// An empty repository that reports [`LookupMiss::NotLoaded`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a loaded repository in one step.
    #[must_use]
    pub fn from_signatures(signatures: impl IntoIterator<Item = ActionSignature>) -> Self {
        let mut repo = Self::new();
        repo.load(signatures);
        repo
    }

    /// Replace the repository's contents with `signatures`.
    pub fn load(&mut self, signatures: impl IntoIterator<Item = ActionSignature>) {
        self.load_catalog(SignatureCatalog {
            signatures: signatures.into_iter().collect(),
            ..SignatureCatalog::default()
        });
    }

    /// Replace the repository's contents with a discovery catalog.
    pub fn load_catalog(&mut self, catalog: SignatureCatalog) {
        self.signatures.clear();
        self.actions.clear();
        self.leaf_commands.clear();
        self.builtins.clear();
        self.command_help.clear();
        self.root_help = catalog.root_help;

        for signature in catalog.signatures {
            let plugin = signature.plugin().to_lowercase();
            let action = signature.action().to_lowercase();
            self.actions
                .entry(plugin.clone())
                .or_default()
                .insert(action.clone());
            if self
                .signatures
                .insert((plugin.clone(), action.clone()), signature)
                .is_some()
            {
                warn!(plugin = %plugin, action = %action, "duplicate signature replaced");
            }
        }
        for leaf in catalog.leaf_commands {
            self.leaf_commands.insert(leaf.to_lowercase());
        }
        for builtin in catalog.builtins {
            self.builtins.insert(builtin.to_lowercase());
        }
        for (command, help) in catalog.command_help {
            self.command_help.insert(command.to_lowercase(), help);
        }

        self.loaded = true;
        debug!(
            signatures = self.signatures.len(),
            plugins = self.actions.len(),
            leaf_commands = self.leaf_commands.len(),
            "signature repository loaded"
        );
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// Resolve `(plugin, action)`. Matching is case-insensitive.
    pub fn lookup(&self, plugin: &str, action: &str) -> Result<&ActionSignature, LookupMiss> {
        if !self.loaded {
            return Err(LookupMiss::NotLoaded);
        }
        let plugin = plugin.to_lowercase();
        if !self.knows_plugin_lower(&plugin) {
            return Err(LookupMiss::UnknownPlugin);
        }
        self.signatures
            .get(&(plugin, action.to_lowercase()))
            .ok_or(LookupMiss::UnknownAction)
    }

    /// Whether `plugin` names a plugin or a leaf command.
    #[must_use]
    pub fn knows_plugin(&self, plugin: &str) -> bool {
        self.knows_plugin_lower(&plugin.to_lowercase())
    }

    fn knows_plugin_lower(&self, plugin: &str) -> bool {
        self.actions.contains_key(plugin) || self.leaf_commands.contains(plugin)
    }

    /// Whether `plugin` is a command that takes no action.
    #[must_use]
    pub fn is_leaf_command(&self, plugin: &str) -> bool {
        self.leaf_commands.contains(&plugin.to_lowercase())
    }

    /// All plugin and leaf command names, sorted.
    #[must_use]
    pub fn plugin_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .actions
            .keys()
            .chain(self.leaf_commands.iter())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Whether `command` is built into the launcher.
    #[must_use]
    pub fn is_builtin(&self, command: &str) -> bool {
        self.builtins.contains(&command.to_lowercase())
    }

    #[must_use]
    pub fn root_help(&self) -> Option<&str> {
        self.root_help.as_deref()
    }

    /// Help for a plugin or builtin command.
    #[must_use]
    pub fn command_help(&self, command: &str) -> Option<&str> {
        self.command_help
            .get(&command.to_lowercase())
            .map(String::as_str)
    }

    /// Action names registered for `plugin`, sorted.
    #[must_use]
    pub fn action_names(&self, plugin: &str) -> Vec<&str> {
        self.actions
            .get(&plugin.to_lowercase())
            .map(|actions| actions.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

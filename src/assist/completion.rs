//! Completion candidates for the word under the cursor.

use std::collections::HashSet;

use crate::document::TextRange;
use crate::options::{is_help_name, negated_flag_target, normalize, option_label};
use crate::signatures::{SignatureParameter, SignatureRepository};

use super::context::{CursorContext, CursorSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    Plugin,
    Builtin,
    Action,
    Option,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionItem {
    pub label: String,
    pub detail: String,
    pub kind: CompletionKind,
    /// Text the label replaces.
    pub replace: TextRange,
}

/// Candidates for the cursor word. Nothing is offered for the launcher itself.
#[must_use]
pub fn complete(context: &CursorContext, repository: &SignatureRepository) -> Vec<CompletionItem> {
    let items = match context.slot {
        CursorSlot::Launcher => Vec::new(),
        CursorSlot::Plugin => commands(&context.prefix, repository),
        CursorSlot::Action => context
            .plugin()
            .map(|plugin| actions(plugin, &context.prefix, repository))
            .unwrap_or_default(),
        CursorSlot::Argument => options(context, repository),
    };
    items
        .into_iter()
        .map(|(label, detail, kind)| CompletionItem {
            label,
            detail,
            kind,
            replace: context.replace,
        })
        .collect()
}

type Candidate = (String, String, CompletionKind);

fn commands(prefix: &str, repository: &SignatureRepository) -> Vec<Candidate> {
    let prefix = prefix.to_lowercase();
    repository
        .plugin_names()
        .into_iter()
        .filter(|name| name.starts_with(&prefix))
        .map(|name| {
            let builtin = repository.is_builtin(name);
            let fallback = if builtin { "Built-in command" } else { "Plugin" };
            let detail = repository
                .command_help(name)
                .and_then(first_line)
                .unwrap_or(fallback);
            let kind = if builtin {
                CompletionKind::Builtin
            } else {
                CompletionKind::Plugin
            };
            (name.to_string(), detail.to_string(), kind)
        })
        .collect()
}

fn actions(plugin: &str, prefix: &str, repository: &SignatureRepository) -> Vec<Candidate> {
    let names = repository.action_names(plugin);
    if names.is_empty() {
        // Builtins without actions only take `--help`.
        if repository.is_builtin(plugin) && "--help".starts_with(prefix) {
            return vec![help_candidate()];
        }
        return Vec::new();
    }

    let prefix = prefix.to_lowercase();
    names
        .into_iter()
        .filter(|name| name.starts_with(&prefix))
        .map(|name| {
            let detail = repository
                .lookup(plugin, name)
                .ok()
                .and_then(|signature| signature.help())
                .and_then(first_line)
                .unwrap_or("Action");
            (name.to_string(), detail.to_string(), CompletionKind::Action)
        })
        .collect()
}

fn options(context: &CursorContext, repository: &SignatureRepository) -> Vec<Candidate> {
    let (Some(plugin), Some(action)) = (context.plugin(), context.action()) else {
        return Vec::new();
    };
    let Ok(signature) = repository.lookup(plugin, action) else {
        return Vec::new();
    };
    let used = used_names(context);
    let prefix = context.prefix.as_str();

    let mut found = Vec::new();
    for parameter in signature.parameters() {
        if used.contains(&parameter.name) {
            continue;
        }
        if matches_prefix(&parameter.name, prefix) {
            found.push((
                option_label(&parameter.name),
                option_detail(parameter),
                CompletionKind::Option,
            ));
        }
        if !parameter.flag {
            continue;
        }
        if let Some(rest) = parameter.name.strip_prefix("p-") {
            let negated = format!("p-no-{rest}");
            if matches_prefix(&negated, prefix) {
                found.push((
                    option_label(&negated),
                    format!("Disable {}", option_label(&parameter.name)),
                    CompletionKind::Option,
                ));
            }
        }
    }

    if !used.iter().any(|name| is_help_name(name)) && matches_prefix("help", prefix) {
        found.push(help_candidate());
    }
    found
}

fn help_candidate() -> Candidate {
    (
        "--help".to_string(),
        "Show help message".to_string(),
        CompletionKind::Option,
    )
}

/// Canonical names already on the command line. A negated flag uses up the
/// flag it negates.
fn used_names(context: &CursorContext) -> HashSet<String> {
    let mut used = HashSet::new();
    for word in context.other_arguments().filter(|w| w.starts_with('-')) {
        let canonical = normalize(word);
        if canonical.is_unrecognized() {
            continue;
        }
        if let Some(target) = negated_flag_target(&canonical.name) {
            used.insert(target);
        }
        used.insert(canonical.name);
    }
    used
}

/// Whether `name` fits what was typed, with or without its kind tag.
fn matches_prefix(name: &str, typed: &str) -> bool {
    if typed.is_empty() {
        return true;
    }
    // A word without dashes is a value, not an option.
    if !typed.starts_with('-') {
        return false;
    }
    let typed = normalize(typed).name;
    if name.starts_with(&typed) {
        return true;
    }
    let untagged = match name.as_bytes() {
        [_, b'-', ..] => &name[2..],
        _ => name,
    };
    untagged.starts_with(&typed)
}

fn option_detail(parameter: &SignatureParameter) -> String {
    let mut parts = Vec::new();
    if parameter.required {
        parts.push("(required)".to_string());
    }
    let kind = parameter.kind.to_string();
    let type_name = parameter.type_descriptor.as_deref().unwrap_or(&kind);
    parts.push(format!("[{type_name}]"));
    if let Some(description) = parameter.description.as_deref().and_then(first_line) {
        parts.push(description.to_string());
    }
    parts.join(" ")
}

fn first_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|line| !line.is_empty())
}

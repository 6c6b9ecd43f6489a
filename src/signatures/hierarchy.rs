//! Reader for the cached command hierarchy produced by signature discovery.
//!
//! The cache is the JSON dump of the toolkit's command tree:
//!
//! ```json
//! { "qiime": {
//!     "name": "qiime", "builtins": ["info", "tools"],
//!     "info":  { "type": "builtin" },
//!     "tools": { "type": "builtin", "import": { "signature": [ ... ] } },
//!     "demux": { "id": "demux", "summarize": { "signature": [ ... ] } } } }
//! ```
//!
//! Each signature entry is an object with at least a `name`; the parameter
//! kind comes from `signature_type` or `type`.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Q2Error, Result};
use crate::options::normalize;

use super::repository::SignatureCatalog;
use super::types::{ActionSignature, ParamKind, SignatureParameter};

/// Keys on the root node that are not plugins or builtins.
const ROOT_METADATA_KEYS: &[&str] = &["name", "help", "short_help", "builtins"];

/// Keys on a plugin or builtin node that are not actions.
const COMMAND_METADATA_KEYS: &[&str] = &[
    "id",
    "name",
    "version",
    "website",
    "user_support_text",
    "description",
    "short_description",
    "short_help",
    "help",
    "actions",
    "type",
    "builtins",
];

/// `type` values that name a QIIME kind rather than a click value type.
const QIIME_KINDS: &[&str] = &["input", "output", "parameter", "metadata", "artifact"];

/// Legacy dict-shaped signatures list parameters per section.
const LEGACY_SECTIONS: &[(&str, ParamKind)] = &[
    ("inputs", ParamKind::Input),
    ("parameters", ParamKind::Parameter),
    ("outputs", ParamKind::Output),
    ("metadata", ParamKind::Metadata),
];

/// Read and parse a hierarchy cache file.
pub fn load_file(path: &Path) -> Result<SignatureCatalog> {
    if !path.exists() {
        return Err(Q2Error::SignaturesNotFound(path.to_path_buf()));
    }
    let raw = std::fs::read_to_string(path)?;
    let catalog = parse_hierarchy(&raw)?;
    debug!(
        path = %path.display(),
        signatures = catalog.signatures.len(),
        "loaded signature cache"
    );
    Ok(catalog)
}

/// Parse hierarchy JSON into a catalog.
pub fn parse_hierarchy(raw: &str) -> Result<SignatureCatalog> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Object(top) = value else {
        return Err(Q2Error::InvalidSignature(
            "hierarchy root must be an object".to_string(),
        ));
    };
    let Some((_, Value::Object(root))) = top.into_iter().next() else {
        return Err(Q2Error::InvalidSignature(
            "hierarchy has no root command".to_string(),
        ));
    };

    let listed_builtins: Vec<&str> = root
        .get("builtins")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut catalog = SignatureCatalog {
        root_help: first_text(&root, &["help", "short_help"]),
        ..SignatureCatalog::default()
    };
    for (plugin, node) in &root {
        if plugin.is_empty() || ROOT_METADATA_KEYS.contains(&plugin.as_str()) {
            continue;
        }
        let Value::Object(plugin_node) = node else {
            continue;
        };

        let mut action_count = 0usize;
        for (action, action_node) in action_entries(plugin_node) {
            action_count += 1;
            let params = parse_parameters(action_node);
            match ActionSignature::new(plugin.as_str(), action.as_str(), params) {
                Ok(signature) => catalog.signatures.push(match action_help(action_node) {
                    Some(help) => signature.with_help(help),
                    None => signature,
                }),
                Err(err) => warn!(plugin = %plugin, action = %action, error = %err, "skipping action"),
            }
        }

        let builtin = is_builtin(plugin_node) || listed_builtins.contains(&plugin.as_str());
        if builtin {
            catalog.builtins.push(plugin.clone());
            if action_count == 0 {
                catalog.leaf_commands.push(plugin.clone());
            }
        }
        if let Some(help) = first_text(
            plugin_node,
            &["help", "short_help", "short_description", "description"],
        ) {
            catalog.command_help.push((plugin.clone(), help));
        }
    }

    Ok(catalog)
}

fn is_builtin(node: &Map<String, Value>) -> bool {
    node.get("type").and_then(Value::as_str) == Some("builtin")
}

/// The first non-empty string among `keys`.
fn first_text(node: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| node.get(*key).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

/// Description followed by any epilog lines.
fn action_help(node: &Map<String, Value>) -> Option<String> {
    let description = first_text(node, &["description", "help"])?;
    let epilog: Vec<String> = node
        .get("epilog")
        .and_then(Value::as_array)
        .map(|lines| {
            lines
                .iter()
                .map(|line| line.as_str().map_or_else(|| line.to_string(), str::to_string))
                .collect()
        })
        .unwrap_or_default();
    if epilog.is_empty() {
        Some(description)
    } else {
        Some(format!("{description}\n\n{}", epilog.join("\n")))
    }
}

fn action_entries(node: &Map<String, Value>) -> impl Iterator<Item = (&String, &Map<String, Value>)> {
    node.iter().filter_map(|(key, value)| {
        if key.is_empty() || COMMAND_METADATA_KEYS.contains(&key.as_str()) {
            return None;
        }
        value.as_object().map(|obj| (key, obj))
    })
}

fn parse_parameters(action_node: &Map<String, Value>) -> Vec<SignatureParameter> {
    let mut params = Vec::new();
    match action_node.get("signature") {
        Some(Value::Array(entries)) => {
            for entry in entries {
                push_parameter(&mut params, entry, None);
            }
        }
        Some(Value::Object(sections)) => {
            for (section, kind) in LEGACY_SECTIONS {
                if let Some(Value::Array(entries)) = sections.get(*section) {
                    for entry in entries {
                        push_parameter(&mut params, entry, Some(*kind));
                    }
                }
            }
        }
        _ => {}
    }
    params
}

fn push_parameter(params: &mut Vec<SignatureParameter>, entry: &Value, section_kind: Option<ParamKind>) {
    let Value::Object(entry) = entry else {
        debug!("skipping non-object signature entry");
        return;
    };
    let Some(name) = entry.get("name").and_then(Value::as_str).filter(|n| !n.is_empty()) else {
        debug!("skipping signature entry without a name");
        return;
    };

    // Any QIIME kind counts for required inference, but only the four
    // tagged kinds give the option a prefix.
    let signature_kind = signature_kind(entry);
    let declared_kind = signature_kind
        .as_deref()
        .and_then(ParamKind::from_signature_type)
        .or(section_kind);
    let is_qiime_param = signature_kind.is_some() || section_kind.is_some();

    let required = match entry.get("required") {
        Some(Value::Bool(explicit)) => *explicit,
        _ => is_qiime_param && !entry.contains_key("default"),
    };

    let type_descriptor = entry
        .get("repr")
        .or_else(|| entry.get("type"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let default = match entry.get("default") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    };

    let description = first_text(entry, &["description", "help"]);
    let flag = entry.get("is_bool_flag").and_then(Value::as_bool).unwrap_or(false);
    let multiple = !matches!(entry.get("multiple"), None | Some(Value::Null | Value::Bool(false)));

    let build = |spelled: &str, kind: ParamKind| {
        let mut param = SignatureParameter::new(normalize(spelled).name, kind);
        param.required = required;
        param.type_descriptor.clone_from(&type_descriptor);
        param.default.clone_from(&default);
        param.flag = flag;
        param.multiple = multiple;
        param.description.clone_from(&description);
        param
    };

    match declared_kind {
        Some(ParamKind::Metadata) => {
            let tag = ParamKind::Metadata.tag();
            match entry.get("metadata").and_then(Value::as_str) {
                Some("column") => {
                    params.push(build(&format!("{tag}-{name}-file"), ParamKind::Metadata));
                    params.push(build(&format!("{tag}-{name}-column"), ParamKind::Metadata));
                }
                Some("file") => {
                    params.push(build(&format!("{tag}-{name}-file"), ParamKind::Metadata));
                }
                _ => params.push(build(&format!("{tag}-{name}"), ParamKind::Metadata)),
            }
        }
        Some(kind) => params.push(build(&format!("{}-{name}", kind.tag()), kind)),
        // Click-native options and untagged kinds carry no tag in their spelling.
        None => params.push(build(name, ParamKind::Parameter)),
    }
}

/// The QIIME kind of a signature entry, lowercased.
///
/// `signature_type` is taken as written; `type` only when it names a kind,
/// since click-native options use it for `text`, `path` and the like.
fn signature_kind(entry: &Map<String, Value>) -> Option<String> {
    if let Some(Value::String(kind)) = entry.get("signature_type") {
        return Some(kind.to_ascii_lowercase());
    }
    entry
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_ascii_lowercase)
        .filter(|kind| QIIME_KINDS.contains(&kind.as_str()))
}

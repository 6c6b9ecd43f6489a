//! Help text for the word under the cursor.

use crate::document::TextRange;
use crate::options::{is_help_name, negated_flag_target, normalize, option_label};
use crate::signatures::{SignatureParameter, SignatureRepository};

use super::context::{CursorContext, CursorSlot};

/// Plain-text help and the word it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverInfo {
    pub contents: String,
    pub range: TextRange,
}

#[must_use]
pub fn hover(context: &CursorContext, repository: &SignatureRepository) -> Option<HoverInfo> {
    let word = context.current_word()?;
    let contents = match context.slot {
        CursorSlot::Launcher => repository.root_help().map(str::to_string),
        CursorSlot::Plugin => repository.command_help(&word.text).map(str::to_string),
        CursorSlot::Action => repository
            .lookup(context.plugin()?, &word.text)
            .ok()
            .and_then(|signature| signature.help())
            .map(str::to_string),
        CursorSlot::Argument => option_help(context, &word.text, repository),
    }?;
    Some(HoverInfo {
        contents,
        range: word.range,
    })
}

fn option_help(context: &CursorContext, word: &str, repository: &SignatureRepository) -> Option<String> {
    if !word.starts_with('-') {
        return None;
    }
    let canonical = normalize(word);
    if canonical.is_unrecognized() {
        return None;
    }
    if is_help_name(&canonical.name) {
        return Some(format!("{}\n\nShow help message and exit.", option_label(&canonical.name)));
    }

    let signature = repository
        .lookup(context.plugin()?, context.action()?)
        .ok()?;
    if let Some(parameter) = signature.parameter(&canonical.name) {
        return Some(describe(parameter, None));
    }
    let target = negated_flag_target(&canonical.name)?;
    let parameter = signature.parameter(&target).filter(|p| p.flag)?;
    Some(describe(parameter, Some(&canonical.name)))
}

fn describe(parameter: &SignatureParameter, negated: Option<&str>) -> String {
    let label = option_label(&parameter.name);
    let mut lines = Vec::new();
    if let Some(name) = negated {
        lines.push(format!("{} (disables {label})", option_label(name)));
    } else {
        let need = if parameter.required { "required" } else { "optional" };
        lines.push(format!("{label} ({}, {need})", parameter.kind));
    }

    if let Some(type_name) = &parameter.type_descriptor {
        lines.push(format!("Type: {type_name}"));
    }
    if let Some(default) = &parameter.default {
        lines.push(format!("Default: {default}"));
    }
    if parameter.flag && negated.is_none() {
        lines.push("Flag: takes no value.".to_string());
    }
    if parameter.multiple {
        lines.push("May be given more than once.".to_string());
    }
    if let Some(description) = &parameter.description {
        lines.push(String::new());
        lines.push(description.clone());
    }
    lines.join("\n")
}

//! The tree compiler: walks a source directory into an [`Instance`] tree.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

use crate::build::classify::{Classified, FileKind, classify};
use crate::build::codec::encode_leading_marker;
use crate::build::instance::{Instance, Property};
use crate::build::syntax;
use crate::config;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::helpers;

/// Split `content` into chunks of at most `max_len` characters.
///
/// Every chunk except the last is exactly `max_len` long and concatenating
/// the chunks in order reproduces `content`. Splitting counts characters, not
/// bytes, so a multi-byte sequence is never torn apart.
pub fn chunk_string(content: &str, max_len: usize) -> Vec<String> {
    assert!(max_len > 0, "chunk length must be positive");
    let mut chunks = Vec::new();
    let mut rest = content;
    while !rest.is_empty() {
        let split = rest
            .char_indices()
            .nth(max_len)
            .map(|(at, _)| at)
            .unwrap_or(rest.len());
        let (chunk, tail) = rest.split_at(split);
        chunks.push(chunk.to_string());
        rest = tail;
    }
    chunks
}

/// Attach `content` to `instance` under `property_name`, or split it into
/// chunk children when it would exceed the single-property ceiling.
///
/// A chunked node keeps its class and `Name`, gains the marker property, and
/// holds one `StringValue` child per chunk whose single string property is
/// named by the 1-based chunk index.
fn set_text_property(instance: &mut Instance, property_name: &str, content: Cow<'_, str>, protected: bool) {
    if content.chars().count() <= config::MAX_VALUE_LENGTH {
        let value = content.into_owned();
        let property = if protected {
            Property::ProtectedString(value)
        } else {
            Property::String(value)
        };
        instance.set_property(property_name, property);
        return;
    }

    instance.set_property(config::CHUNK_MARKER_PROPERTY, Property::Bool(true));
    for (index, chunk) in chunk_string(&content, config::MAX_VALUE_LENGTH).into_iter().enumerate() {
        let mut part = Instance::new("StringValue");
        part.set_property((index + 1).to_string(), Property::String(chunk));
        instance.add_child(part);
    }
}

fn script_instance(
    class: &str,
    name: &str,
    content: &str,
    path: &Path,
    check_syntax: bool,
    diagnostics: &mut Diagnostics,
) -> Instance {
    if check_syntax && let Err(issue) = syntax::check(content) {
        diagnostics.report(Diagnostic::SyntaxIssue {
            path: path.to_path_buf(),
            line: issue.line,
            message: issue.message,
        });
    }
    let mut script = Instance::named(class, name);
    set_text_property(&mut script, "Source", encode_leading_marker(content), true);
    script
}

fn asset_instance(name: &str, content: &str, path: &Path, diagnostics: &mut Diagnostics) -> Instance {
    let value = match content.trim().parse::<i64>() {
        Ok(id) => id,
        Err(_) => {
            diagnostics.report(Diagnostic::NonNumericAsset {
                path: path.to_path_buf(),
                content: preview(content),
            });
            0
        }
    };
    Instance::named("IntValue", name).with_property("Value", Property::Int(value))
}

/// Wrap unrecognized content in a disabled script so it survives the import
/// inert but inspectable. The long-comment level grows until the closing
/// token cannot occur in the content.
fn fallback_instance(name: &str, content: &str) -> Instance {
    let mut level = 1;
    while content.contains(&format!("]{}]", "=".repeat(level))) {
        level += 1;
    }
    let eq = "=".repeat(level);
    let source = format!("--[{eq}[\n{content}\n]{eq}]");

    let mut script = Instance::named("Script", name).with_property("Disabled", Property::Bool(true));
    set_text_property(&mut script, "Source", Cow::Owned(source), true);
    script
}

fn preview(content: &str) -> String {
    const MAX: usize = 40;
    let trimmed = content.trim();
    if trimmed.chars().count() <= MAX {
        trimmed.to_string()
    } else {
        format!("{}...", trimmed.chars().take(MAX).collect::<String>())
    }
}

/// Compile one file into its node. Unreadable files are fatal; everything
/// recoverable lands in `diagnostics`.
pub fn compile_file(
    path: &Path,
    file_name: &str,
    is_top_level: bool,
    check_syntax: bool,
    diagnostics: &mut Diagnostics,
) -> Result<Instance> {
    let bytes = fs::read(path).with_context(|| format!("Could not read {}", path.display()))?;
    let content = String::from_utf8_lossy(&bytes).into_owned();
    let Classified { kind, name } = classify(file_name, is_top_level);
    log::debug!("{} -> {kind:?} \"{name}\"", path.display());

    let instance = match kind {
        FileKind::ServerScript => script_instance("Script", &name, &content, path, check_syntax, diagnostics),
        FileKind::LocalScript => script_instance("LocalScript", &name, &content, path, check_syntax, diagnostics),
        FileKind::PlainValue => {
            let mut value = Instance::named("StringValue", &name);
            set_text_property(&mut value, "Value", encode_leading_marker(&content), false);
            value
        }
        FileKind::Asset => asset_instance(&name, &content, path, diagnostics),
        FileKind::Fallback => fallback_instance(&name, &content),
    };
    Ok(instance)
}

/// Compile `path` into a container node, recursing into subdirectories.
///
/// Entries are sorted by name before compilation so two runs over the same
/// tree emit the same document. Ignore-listed entries and files rejected by
/// `filter` are skipped.
pub fn compile_directory(
    path: &Path,
    is_top_level: bool,
    filter: Option<&Regex>,
    check_syntax: bool,
    diagnostics: &mut Diagnostics,
) -> Result<Instance> {
    let mut container = Instance::named(config::CONTAINER_CLASS, helpers::directory_name(path));

    let mut entries = Vec::new();
    for entry in fs::read_dir(path).with_context(|| format!("Could not read directory {}", path.display()))? {
        let entry = entry.with_context(|| format!("Could not list {}", path.display()))?;
        entries.push(entry.path());
    }
    entries.sort();

    for entry_path in entries {
        let file_name = match entry_path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };
        if helpers::is_ignored_entry(&file_name) {
            continue;
        }
        if entry_path.is_dir() {
            let child = compile_directory(&entry_path, false, filter, check_syntax, diagnostics)?;
            container.add_child(child);
        } else {
            if let Some(filter) = filter
                && !filter.is_match(&file_name)
            {
                log::debug!("filtered out {}", entry_path.display());
                continue;
            }
            let child = compile_file(&entry_path, &file_name, is_top_level, check_syntax, diagnostics)?;
            container.add_child(child);
        }
    }

    Ok(container)
}

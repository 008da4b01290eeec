//! Build orchestration: merge settings, compile the tree, assemble the
//! document and write it out.

pub mod classify;
pub mod codec;
pub mod compile;
pub mod instance;
pub mod serialize;
pub mod syntax;
pub mod writer;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use ahash::AHashSet;
use anyhow::{Context, Result};
use console::style;
use regex::Regex;

use crate::cli::BuildArgs;
use crate::config::{self, ProjectConfig};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::build::instance::Property;

/// Effective settings after layering CLI arguments over the project file.
#[derive(Debug, Clone)]
pub struct BuildSettings {
    /// Canonicalized source directory.
    pub source: PathBuf,
    pub outputs: Vec<PathBuf>,
    pub root_class: String,
    pub root_name: Option<String>,
    pub filter: Option<Regex>,
    pub check_syntax: bool,
}

impl BuildSettings {
    pub fn from_args(args: &BuildArgs) -> Result<BuildSettings> {
        let folder = Path::new(&args.folder);
        let project = ProjectConfig::load(folder)?;

        let source = match &project.source {
            Some(source) => folder.join(source),
            None => folder.to_path_buf(),
        };
        let source = source
            .canonicalize()
            .with_context(|| format!("Source directory {} is not readable", source.display()))?;

        let mut outputs: Vec<PathBuf> = if args.output.is_empty() {
            project.outputs.iter().map(|output| folder.join(output)).collect()
        } else {
            args.output.iter().map(PathBuf::from).collect()
        };
        if outputs.is_empty() {
            outputs.push(PathBuf::from(config::DEFAULT_OUTPUT));
        }

        let filter = match &args.filter {
            Some(pattern) => Some(
                Regex::new(pattern).with_context(|| format!("Invalid filter regex \"{pattern}\""))?,
            ),
            None => None,
        };

        Ok(BuildSettings {
            source,
            outputs,
            root_class: project.root_class.unwrap_or_else(|| config::CONTAINER_CLASS.to_string()),
            root_name: project.root_name,
            filter,
            check_syntax: project.check_syntax && !args.no_syntax_check,
        })
    }
}

/// Everything a finished build hands back to its caller.
#[derive(Debug)]
pub struct BuildResult {
    pub document: String,
    pub instance_count: usize,
    pub diagnostics: Vec<Diagnostic>,
    /// Destinations actually written, duplicates collapsed.
    pub written: Vec<PathBuf>,
}

/// Compile and assemble without touching any destination.
pub fn compile_document(settings: &BuildSettings) -> Result<(String, usize, Vec<Diagnostic>)> {
    let mut diagnostics = Diagnostics::new();
    let mut root = compile::compile_directory(
        &settings.source,
        true,
        settings.filter.as_ref(),
        settings.check_syntax,
        &mut diagnostics,
    )?;

    root.set_class_name(settings.root_class.as_str());
    if let Some(root_name) = &settings.root_name {
        root.set_property("Name", Property::String(root_name.clone()));
    }

    let document = serialize::assemble(&root);
    Ok((document, root.subtree_len(), diagnostics.into_items()))
}

/// Write `document` to every destination, skipping duplicates. Each write
/// goes through a temp file in the destination directory so a failure never
/// leaves a truncated document behind.
pub fn write_outputs(document: &str, outputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    let mut seen: AHashSet<&Path> = AHashSet::new();
    for destination in outputs {
        if !seen.insert(destination.as_path()) {
            continue;
        }
        write_output(document, destination)?;
        written.push(destination.clone());
    }
    Ok(written)
}

fn write_output(document: &str, destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).with_context(|| format!("Could not create {}", parent.display()))?;
    }
    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut staged = tempfile::NamedTempFile::new_in(&parent)
        .with_context(|| format!("Could not stage a write for {}", destination.display()))?;
    staged
        .write_all(document.as_bytes())
        .with_context(|| format!("Could not write {}", destination.display()))?;
    staged
        .persist(destination)
        .with_context(|| format!("Could not write {}", destination.display()))?;
    log::debug!("wrote {}", destination.display());
    Ok(())
}

/// Compile the source tree and write the assembled document to every
/// destination. `show_progress` gates the styled summary lines.
pub fn build(settings: &BuildSettings, show_progress: bool) -> Result<BuildResult> {
    let timing = Instant::now();
    let (document, instance_count, diagnostics) = compile_document(settings)?;
    let written = write_outputs(&document, &settings.outputs)?;

    if show_progress {
        println!(
            "{} Compiled {} instances to {} destination{} in {:.2}s",
            style("✓").green(),
            instance_count,
            written.len(),
            if written.len() == 1 { "" } else { "s" },
            timing.elapsed().as_secs_f64()
        );
        if !diagnostics.is_empty() {
            println!(
                "{} {} warning{}, see the log above",
                style("!").yellow(),
                diagnostics.len(),
                if diagnostics.len() == 1 { "" } else { "s" }
            );
        }
    }

    Ok(BuildResult {
        document,
        instance_count,
        diagnostics,
        written,
    })
}

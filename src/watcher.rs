//! Watch mode: recompile whenever the source tree changes.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use ahash::AHashSet;
use anyhow::{Context, Result, anyhow};
use console::style;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::build::{self, BuildSettings};
use crate::helpers;

/// How long to keep draining events after the first relevant change before
/// rebuilding. Editors tend to emit bursts of events per save.
const DEBOUNCE_WINDOW: Duration = Duration::from_millis(150);

/// How often the loop wakes up to check for ctrl-c while idle.
const IDLE_POLL: Duration = Duration::from_millis(200);

/// True when a filesystem event should trigger a rebuild.
fn is_relevant_change(settings: &BuildSettings, event: &Event) -> bool {
    if !matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) {
        return false;
    }
    event.paths.iter().any(|path| is_relevant_path(settings, path))
}

/// A path matters when it is not under an ignore-listed entry, is not one of
/// our own output destinations, and (for files) passes the name filter.
fn is_relevant_path(settings: &BuildSettings, path: &Path) -> bool {
    if path
        .components()
        .any(|component| helpers::is_ignored_entry(&component.as_os_str().to_string_lossy()))
    {
        return false;
    }
    if settings.outputs.iter().any(|output| path.ends_with(output)) {
        return false;
    }
    if path.is_dir() {
        return true;
    }
    let file_name = match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => return false,
    };
    match &settings.filter {
        Some(filter) => filter.is_match(&file_name),
        None => true,
    }
}

/// Build once, then keep rebuilding on relevant changes until ctrl-c.
///
/// A rebuild whose assembled document hashes identically to the previous one
/// skips the destination writes, which also keeps destinations inside the
/// watched tree from retriggering forever. Rebuild failures are logged and
/// watching continues; only setup failures are fatal.
pub fn start(settings: &BuildSettings, show_progress: bool) -> Result<()> {
    let (sender, receiver) = mpsc::channel();
    let mut watcher =
        RecommendedWatcher::new(sender, Config::default()).context("Could not create the filesystem watcher")?;
    watcher
        .watch(&settings.source, RecursiveMode::Recursive)
        .with_context(|| format!("Could not watch {}", settings.source.display()))?;

    let ctrlc_pressed = Arc::new(Mutex::new(false));
    let ctrlc_flag = Arc::clone(&ctrlc_pressed);
    ctrlc::set_handler(move || {
        *ctrlc_flag.lock().unwrap() = true;
    })
    .context("Could not install the ctrl-c handler")?;

    log::debug!("watching {}", settings.source.display());

    let mut last_hash = match build::build(settings, show_progress) {
        Ok(result) => Some(blake3::hash(result.document.as_bytes())),
        Err(error) => {
            log::error!("initial build failed: {error:#}");
            None
        }
    };

    loop {
        if *ctrlc_pressed.lock().unwrap() {
            if show_progress {
                println!("{} Stopped watching", style("✓").green());
            }
            return Ok(());
        }

        let event = match receiver.recv_timeout(IDLE_POLL) {
            Ok(Ok(event)) => event,
            Ok(Err(error)) => {
                log::warn!("watch error: {error}");
                continue;
            }
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => return Err(anyhow!("watcher channel closed")),
        };
        if !is_relevant_change(settings, &event) {
            continue;
        }

        let mut changed: AHashSet<PathBuf> = event.paths.iter().cloned().collect();
        let deadline = Instant::now() + DEBOUNCE_WINDOW;
        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            match receiver.recv_timeout(deadline - now) {
                Ok(Ok(event)) if is_relevant_change(settings, &event) => {
                    changed.extend(event.paths.iter().cloned());
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
        log::debug!("{} path(s) changed, rebuilding", changed.len());

        let timing = Instant::now();
        match build::compile_document(settings) {
            Ok((document, instance_count, diagnostics)) => {
                let hash = blake3::hash(document.as_bytes());
                if last_hash == Some(hash) {
                    log::debug!("document unchanged, skipping write");
                    continue;
                }
                match build::write_outputs(&document, &settings.outputs) {
                    Ok(_) => {
                        last_hash = Some(hash);
                        if show_progress {
                            println!(
                                "{} Rebuilt {} instances in {:.2}s{}",
                                style("✓").green(),
                                instance_count,
                                timing.elapsed().as_secs_f64(),
                                if diagnostics.is_empty() {
                                    String::new()
                                } else {
                                    format!(" ({} warnings)", diagnostics.len())
                                }
                            );
                        }
                    }
                    Err(error) => log::error!("rebuild failed: {error:#}"),
                }
            }
            Err(error) => log::error!("rebuild failed: {error:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, ModifyKind};

    fn settings() -> BuildSettings {
        BuildSettings {
            source: PathBuf::from("/project/src"),
            outputs: vec![PathBuf::from("model.rbxmx")],
            root_class: "Folder".to_string(),
            root_name: None,
            filter: None,
            check_syntax: true,
        }
    }

    fn modify(path: &str) -> Event {
        Event::new(EventKind::Modify(ModifyKind::Any)).add_path(PathBuf::from(path))
    }

    #[test]
    fn source_file_changes_are_relevant() {
        assert!(is_relevant_change(&settings(), &modify("/project/src/main.server.lua")));
    }

    #[test]
    fn access_events_are_not_relevant() {
        let event = Event::new(EventKind::Access(AccessKind::Any)).add_path(PathBuf::from("/project/src/a.lua"));
        assert!(!is_relevant_change(&settings(), &event));
    }

    #[test]
    fn ignore_listed_directories_are_not_relevant() {
        assert!(!is_relevant_change(&settings(), &modify("/project/src/.git/index")));
    }

    #[test]
    fn our_own_outputs_are_not_relevant() {
        assert!(!is_relevant_change(&settings(), &modify("/project/src/model.rbxmx")));
    }

    #[test]
    fn the_name_filter_applies_to_changed_files() {
        let mut filtered = settings();
        filtered.filter = Some(regex::Regex::new(r"\.lua$").unwrap());
        assert!(is_relevant_change(&filtered, &modify("/project/src/a.lua")));
        assert!(!is_relevant_change(&filtered, &modify("/project/src/notes.md")));
    }

    #[test]
    fn events_without_paths_are_not_relevant() {
        let event = Event::new(EventKind::Modify(ModifyKind::Any));
        assert!(!is_relevant_change(&settings(), &event));
    }
}

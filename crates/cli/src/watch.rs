//! `awsctx watch`: stream state changes and hot-reload the shared config profiles.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{broadcast::error::RecvError, mpsc};
use tracing::{info, warn};

use crate::context::Context;
use crate::terminal::Terminal;

/// Whether a filesystem event touches one of the watched files.
fn touches_watched(event: &Event, watched: &[PathBuf]) -> bool {
    let relevant_kind = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    relevant_kind
        && event
            .paths
            .iter()
            .any(|p| watched.iter().any(|w| p.file_name() == w.file_name()))
}

/// Watch the files' directories; the files themselves may not exist yet.
fn start_watcher(watched: &[PathBuf], tx: mpsc::UnboundedSender<()>) -> Result<RecommendedWatcher> {
    let targets = watched.to_vec();
    let mut watcher = notify::recommended_watcher(move |res: std::result::Result<Event, notify::Error>| {
        match res {
            Ok(event) if touches_watched(&event, &targets) => {
                let _ = tx.send(());
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "filesystem watcher error"),
        }
    })?;

    let dirs: BTreeSet<&Path> = watched.iter().filter_map(|p| p.parent()).collect();
    for dir in dirs {
        if !dir.is_dir() {
            warn!(path = %dir.display(), "config directory missing, not watching it");
            continue;
        }
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        info!(path = %dir.display(), "watching AWS config files for changes");
    }
    Ok(watcher)
}

pub async fn run(ctx: &Context, terminal: &Terminal, workspace: &str) -> Result<()> {
    let mut changes = ctx.manager.subscribe();
    ctx.load()?;

    let (tx, mut reloads) = mpsc::unbounded_channel();
    let _watcher = start_watcher(ctx.profiles.watched_paths(), tx)?;

    let state = ctx.manager.state();
    terminal.print_status(
        workspace,
        &state,
        &ctx.manager.recently_used_credentials(),
        &ctx.manager.recently_used_regions(),
    )?;
    terminal.print_info("Watching for changes, Ctrl+C to stop.")?;

    loop {
        tokio::select! {
            change = changes.recv() => match change {
                Ok(change) => {
                    terminal.print_change(&change)?;
                    if change.state.is_stable() {
                        ctx.save()?;
                    }
                }
                Err(RecvError::Lagged(missed)) => warn!(missed, "State change stream lagged"),
                Err(RecvError::Closed) => break,
            },
            Some(()) = reloads.recv() => {
                match ctx.reload_profiles().await {
                    Ok(changed) => info!(changed, "Reloaded shared config profiles"),
                    Err(e) => warn!(error = %e, "Failed to reload shared config profiles"),
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    ctx.save()?;
    terminal.print_info("Stopped.")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind};

    #[test]
    fn only_config_file_events_count() {
        let watched = vec![
            PathBuf::from("/home/me/.aws/config"),
            PathBuf::from("/home/me/.aws/credentials"),
        ];
        let modified = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/home/me/.aws/credentials"));
        assert!(touches_watched(&modified, &watched));

        let other = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/home/me/.aws/sso/cache/token.json"));
        assert!(!touches_watched(&other, &watched));

        let access = Event::new(EventKind::Access(notify::event::AccessKind::Any))
            .add_path(watched[0].clone());
        assert!(!touches_watched(&access, &watched));
    }
}

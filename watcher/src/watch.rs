//! Filesystem watcher with debounce/coalescing (spec §4.12). New crate,
//! not grounded in a specific teacher module — the rest of the corpus
//! targets one-shot analysis, not live updates — so this follows the
//! ambient `tracing`-instrumented, channel-driven task idiom used
//! throughout the teacher's async code instead of a specific file.

use crate::batch::ChangeBatch;
use crate::error::WatchError;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcherTrait};
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

pub struct FileWatcher {
    _inner: RecommendedWatcher,
    stop_tx: mpsc::Sender<()>,
    join: tokio::task::JoinHandle<()>,
}

impl FileWatcher {
    /// Starts watching `root` recursively, emitting a [`ChangeBatch`] on
    /// the returned receiver at most once per `debounce` window.
    pub fn start(root: &Path, debounce: Duration) -> Result<(Self, mpsc::Receiver<ChangeBatch>), WatchError> {
        let (raw_tx, mut raw_rx) = mpsc::unbounded_channel::<Event>();
        let (batch_tx, batch_rx) = mpsc::channel::<ChangeBatch>(16);
        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                let _ = raw_tx.send(event);
            }
            Err(e) => warn!(error = %e, "watcher: notify backend error"),
        })?;
        watcher.watch(root, RecursiveMode::Recursive)?;

        let join = tokio::spawn(async move {
            let mut pending = ChangeBatch::default();
            let mut stopping = false;
            loop {
                tokio::select! {
                    biased;
                    _ = stop_rx.recv() => {
                        stopping = true;
                        // Drain anything already queued before exiting
                        // (spec §5: "honors a stop signal and drains its
                        // debounce queue before exit").
                        while let Ok(event) = raw_rx.try_recv() {
                            apply_event(&mut pending, event);
                        }
                        if !pending.is_empty() {
                            let _ = batch_tx.send(std::mem::take(&mut pending)).await;
                        }
                        break;
                    }
                    maybe_event = raw_rx.recv() => {
                        match maybe_event {
                            Some(event) => apply_event(&mut pending, event),
                            None => break,
                        }
                        // Coalesce everything else that arrives within
                        // the debounce window before publishing.
                        let deadline = tokio::time::sleep(debounce);
                        tokio::pin!(deadline);
                        loop {
                            tokio::select! {
                                _ = &mut deadline => break,
                                maybe = raw_rx.recv() => match maybe {
                                    Some(event) => apply_event(&mut pending, event),
                                    None => break,
                                },
                                _ = stop_rx.recv() => { stopping = true; break; }
                            }
                        }
                        if !pending.is_empty() {
                            debug!(changed = pending.changed.len(), removed = pending.removed.len(), "watcher: publishing coalesced batch");
                            let _ = batch_tx.send(std::mem::take(&mut pending)).await;
                        }
                        if stopping {
                            break;
                        }
                    }
                }
            }
        });

        Ok((Self { _inner: watcher, stop_tx, join }, batch_rx))
    }

    /// Signals the watcher to stop, draining any queued events as a
    /// final batch before the background task exits.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(()).await;
        let _ = self.join.await;
    }
}

fn apply_event(batch: &mut ChangeBatch, event: Event) {
    match event.kind {
        EventKind::Remove(_) => {
            for path in event.paths {
                batch.mark_removed(path);
            }
        }
        EventKind::Create(_) | EventKind::Modify(_) => {
            for path in event.paths {
                batch.mark_changed(path);
            }
        }
        _ => {}
    }
}

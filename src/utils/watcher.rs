//! File change watcher used for config hot reload.
//!
//! The watcher runs on its own thread and never touches compositor state. It hands results over
//! through a channel that the compositor drains on the event dispatch thread.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};

use awm_config::Config;

pub struct Watcher {
    should_stop: Arc<AtomicBool>,
}

impl Drop for Watcher {
    fn drop(&mut self) {
        self.should_stop.store(true, Ordering::SeqCst);
    }
}

impl Watcher {
    /// Polls `path` every `interval` and sends `process(path)` whenever the file changes.
    ///
    /// A `None` from `process` is not sent. The thread exits when the watcher is dropped or the
    /// receiving end of `changed` goes away.
    pub fn new<T: Send + 'static>(
        path: PathBuf,
        interval: Duration,
        mut process: impl FnMut(&Path) -> Option<T> + Send + 'static,
        changed: mpsc::Sender<T>,
    ) -> Self {
        let should_stop = Arc::new(AtomicBool::new(false));

        {
            let should_stop = should_stop.clone();
            let res = thread::Builder::new()
                .name(format!("Filesystem Watcher for {}", path.to_string_lossy()))
                .spawn(move || {
                    let mut last_props = file_props(&path);

                    loop {
                        thread::sleep(interval);

                        if should_stop.load(Ordering::SeqCst) {
                            break;
                        }

                        let props = file_props(&path);
                        if props == last_props {
                            continue;
                        }
                        last_props = props;

                        // Removed; wait for it to come back.
                        if props.is_none() {
                            continue;
                        }

                        trace!("file changed: {}", path.to_string_lossy());

                        let Some(value) = process(&path) else {
                            continue;
                        };

                        if changed.send(value).is_err() {
                            break;
                        }
                    }

                    debug!("exiting watcher thread for {}", path.to_string_lossy());
                });

            if let Err(err) = res {
                warn!("error spawning the watcher thread: {err:?}");
            }
        }

        Self { should_stop }
    }
}

/// Starts watching the config file, returning the watcher and the stream of reloaded configs.
///
/// Configs that fail to parse are logged and skipped.
pub fn watch_config(path: PathBuf, interval: Duration) -> (Watcher, mpsc::Receiver<Config>) {
    let (tx, rx) = mpsc::channel();
    let watcher = Watcher::new(
        path,
        interval,
        |path| match Config::load(path) {
            Ok(config) => Some(config),
            Err(err) => {
                warn!("{err:?}");
                None
            }
        },
        tx,
    );
    (watcher, rx)
}

fn file_props(path: &Path) -> Option<(Option<SystemTime>, u64)> {
    let metadata = path.metadata().ok()?;
    Some((metadata.modified().ok(), metadata.len()))
}

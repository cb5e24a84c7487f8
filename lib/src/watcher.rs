pub(crate) use futures::channel::mpsc::Receiver;
use futures::{SinkExt, channel::mpsc::channel};
use notify::{Config, Event, RecursiveMode, Result};
pub(crate) use notify::{PollWatcher, Watcher};

use std::path::Path;
pub use std::time::Duration;

/// Watch a single brightness file for content changes.
pub fn brightness_file_watcher<P: AsRef<Path>>(
    path: P,
    poll_interval: Duration,
) -> Result<(PollWatcher, Receiver<Result<Event>>)> {
    let (mut tx, rx) = channel(1);

    let config = Config::default()
        .with_compare_contents(true) // crucial part for pseudo filesystems
        .with_poll_interval(poll_interval);

    // sysfs does not report kernel side writes through inotify, so poll
    let mut poll_watcher = PollWatcher::new(
        move |res: notify::Result<Event>| {
            futures::executor::block_on(async {
                // the receiver is gone once the session is dropped
                let _ = tx.send(res).await;
            });
        },
        config,
    )?;

    poll_watcher.watch(path.as_ref(), RecursiveMode::NonRecursive)?;

    Ok((poll_watcher, rx))
}

// src/app/prefetch.rs
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::app::cache::ThumbnailSource;
use crate::error::ThumbnailError;

pub type FetchResult = Result<RgbaImage, ThumbnailError>;

struct FetchJob {
    url: String,
    reply: Sender<FetchResult>,
}

/// Fixed set of threads that run thumbnail loads off the UI thread.
///
/// Each request gets its own reply channel. Dropping the returned receiver
/// detaches the request: the worker still finishes, but its send fails and the
/// result is discarded.
pub struct ThumbnailPool {
    work_tx: Sender<FetchJob>,
    source: Arc<dyn ThumbnailSource>,
}

impl ThumbnailPool {
    pub fn start(source: Arc<dyn ThumbnailSource>, workers: usize) -> Self {
        let (work_tx, work_rx) = mpsc::channel::<FetchJob>();
        let work_rx = Arc::new(Mutex::new(work_rx));
        let workers = workers.max(1);

        for n in 0..workers {
            let work_rx = Arc::clone(&work_rx);
            let source = Arc::clone(&source);

            let spawned = std::thread::Builder::new()
                .name(format!("thumb-worker-{n}"))
                .spawn(move || loop {
                    let job = {
                        let Ok(rx) = work_rx.lock() else {
                            break;
                        };
                        rx.recv()
                    };
                    let Ok(job) = job else {
                        break;
                    };

                    let result = source.fetch(&job.url);
                    if job.reply.send(result).is_err() {
                        debug!("thumbnail request for {} was detached", job.url);
                    }
                });
            if let Err(e) = spawned {
                warn!("failed to spawn thumbnail worker {n}: {e}");
            }
        }
        info!("thumbnail pool started with {workers} workers");

        Self { work_tx, source }
    }

    /// Queue a load; the outcome arrives on the returned receiver.
    pub fn submit(&self, url: String) -> Receiver<FetchResult> {
        let (reply, rx) = mpsc::channel();
        if let Err(mpsc::SendError(job)) = self.work_tx.send(FetchJob { url, reply }) {
            let _ = job.reply.send(Err(ThumbnailError::PoolClosed));
        }
        rx
    }

    /// Same load on the calling thread.
    pub fn fetch_blocking(&self, url: &str) -> FetchResult {
        self.source.fetch(url)
    }
}

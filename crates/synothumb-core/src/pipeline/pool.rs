//! The conversion worker pool: a fixed set of workers draining one shared
//! queue, with idempotency, output-directory setup, strategy dispatch, and
//! per-task failure isolation.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::error::{RenderError, RenderResult};
use crate::specs;

/// One unit of work: an absolute source path plus its lower-cased
/// extension. Consumed exactly once by exactly one worker.
#[derive(Debug, Clone)]
pub struct MediaTask {
    /// Absolute path to the source file
    pub path: PathBuf,
    /// Lower-cased extension without the dot ("" when absent)
    pub ext: String,
}

impl MediaTask {
    pub fn new(path: PathBuf) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        Self { path, ext }
    }
}

/// Media classification driving strategy dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// The pluggable render capability the pool dispatches to.
///
/// Production code uses [`super::processor::MediaRenderer`]; tests use
/// counting or faulting fakes.
pub trait Render: Send + Sync + 'static {
    /// Classify an extension, or `None` when neither strategy handles it.
    fn classify(&self, ext: &str) -> Option<MediaKind>;

    /// Produce the renditions for one task into its thumbnail directory.
    fn render(&self, kind: MediaKind, task: &MediaTask, thumb_dir: &Path) -> RenderResult<()>;
}

/// Why a task was abandoned without rendering.
#[derive(Debug)]
pub enum SkipReason {
    /// The XL marker already exists; a previous run completed this file
    AlreadyDone,
    /// Extension matches neither strategy (or the path has no file name)
    Unsupported,
    /// The thumbnail directory could not be created
    DirCreate(String),
}

/// Per-task completion signal emitted by the pool, one per submitted path.
#[derive(Debug)]
pub enum TaskOutcome {
    Completed(PathBuf),
    Skipped(PathBuf, SkipReason),
    Failed(PathBuf, RenderError),
}

impl TaskOutcome {
    pub fn path(&self) -> &Path {
        match self {
            TaskOutcome::Completed(p)
            | TaskOutcome::Skipped(p, _)
            | TaskOutcome::Failed(p, _) => p,
        }
    }
}

/// Run statistics returned by [`ConvertPool::wait_for_completion`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub completed: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl PoolStats {
    pub fn total(&self) -> u64 {
        self.completed + self.skipped + self.failed
    }
}

#[derive(Default)]
struct Counters {
    completed: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> PoolStats {
        PoolStats {
            completed: self.completed.load(Ordering::SeqCst),
            skipped: self.skipped.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
        }
    }
}

/// Fixed-size worker pool over one bounded submission queue.
///
/// Workers block while the queue is empty; submitters block while it is
/// full. Tasks have no ordering or priority; each path is processed by at
/// most one worker. Render work runs on the blocking thread pool so the
/// async workers never stall the runtime.
pub struct ConvertPool {
    tx: mpsc::Sender<MediaTask>,
    workers: Vec<JoinHandle<()>>,
    counters: Arc<Counters>,
}

impl ConvertPool {
    /// Spawn `workers` workers dispatching to `renderer`.
    ///
    /// Returns the pool plus the per-task outcome stream (unbounded, so
    /// workers never block on reporting).
    pub fn spawn(
        renderer: Arc<dyn Render>,
        workers: usize,
        queue_depth: usize,
    ) -> (Self, mpsc::UnboundedReceiver<TaskOutcome>) {
        let (tx, rx) = mpsc::channel::<MediaTask>(queue_depth);
        let rx = Arc::new(Mutex::new(rx));
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let counters = Arc::new(Counters::default());

        let handles = (0..workers.max(1))
            .map(|id| {
                tokio::spawn(worker_loop(
                    id,
                    Arc::clone(&rx),
                    Arc::clone(&renderer),
                    outcome_tx.clone(),
                    Arc::clone(&counters),
                ))
            })
            .collect();

        (
            Self {
                tx,
                workers: handles,
                counters,
            },
            outcome_rx,
        )
    }

    /// Enqueue one path; blocks while the queue is at capacity.
    pub async fn submit(&self, path: PathBuf) {
        if self.tx.send(MediaTask::new(path)).await.is_err() {
            // Unreachable while the pool holds live workers
            tracing::error!("submission queue closed; task dropped");
        }
    }

    /// Close the queue and block until every submitted task is accounted
    /// for, failed or not.
    pub async fn wait_for_completion(self) -> PoolStats {
        drop(self.tx);
        for handle in self.workers {
            let _ = handle.await;
        }
        self.counters.snapshot()
    }
}

async fn worker_loop(
    worker_id: usize,
    rx: Arc<Mutex<mpsc::Receiver<MediaTask>>>,
    renderer: Arc<dyn Render>,
    outcome_tx: mpsc::UnboundedSender<TaskOutcome>,
    counters: Arc<Counters>,
) {
    loop {
        // Hold the queue lock only to dequeue, never across render work
        let task = { rx.lock().await.recv().await };
        let Some(task) = task else { break };

        let renderer = Arc::clone(&renderer);
        let blocking_task = task.clone();
        let outcome =
            match tokio::task::spawn_blocking(move || process_task(&*renderer, &blocking_task))
                .await
            {
                Ok(outcome) => outcome,
                // A panicking render must not take the worker down with it
                Err(join_err) => TaskOutcome::Failed(
                    task.path.clone(),
                    RenderError::Aborted {
                        path: task.path.clone(),
                        message: join_err.to_string(),
                    },
                ),
            };

        match &outcome {
            TaskOutcome::Completed(path) => {
                counters.completed.fetch_add(1, Ordering::SeqCst);
                tracing::debug!(worker = worker_id, ?path, "completed");
            }
            TaskOutcome::Skipped(path, reason) => {
                counters.skipped.fetch_add(1, Ordering::SeqCst);
                tracing::debug!(worker = worker_id, ?path, ?reason, "skipped");
            }
            TaskOutcome::Failed(path, error) => {
                counters.failed.fetch_add(1, Ordering::SeqCst);
                tracing::error!(worker = worker_id, ?path, %error, "render failed");
            }
        }

        // Receiver may be gone if the caller ignores outcomes; counters
        // still account for the task
        let _ = outcome_tx.send(outcome);
    }
}

/// Per-task policy, strictly ordered: idempotency check, directory setup,
/// strategy dispatch. Every branch accounts for the task.
fn process_task(renderer: &dyn Render, task: &MediaTask) -> TaskOutcome {
    let Some(thumb_dir) = specs::thumb_dir(&task.path) else {
        return TaskOutcome::Skipped(task.path.clone(), SkipReason::Unsupported);
    };

    if thumb_dir.join(specs::marker_name()).is_file() {
        return TaskOutcome::Skipped(task.path.clone(), SkipReason::AlreadyDone);
    }

    // Races with a sibling worker materializing the same parent @eaDir are
    // fine; create_dir_all treats an existing directory as success. Real
    // failures (permissions, read-only media) abandon the task but are
    // logged with the concrete cause, not silently dropped.
    if let Err(e) = std::fs::create_dir_all(&thumb_dir) {
        tracing::warn!(
            path = ?task.path,
            kind = ?e.kind(),
            "cannot create thumbnail directory: {e}"
        );
        return TaskOutcome::Skipped(task.path.clone(), SkipReason::DirCreate(e.to_string()));
    }

    let Some(kind) = renderer.classify(&task.ext) else {
        return TaskOutcome::Skipped(task.path.clone(), SkipReason::Unsupported);
    };

    tracing::debug!(path = ?task.path, ?kind, "rendering");
    match renderer.render(kind, task, &thumb_dir) {
        Ok(()) => TaskOutcome::Completed(task.path.clone()),
        Err(e) => TaskOutcome::Failed(task.path.clone(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    /// Renderer that records calls and fails paths containing "corrupt".
    struct CountingRenderer {
        rendered: AtomicUsize,
    }

    impl CountingRenderer {
        fn new() -> Self {
            Self {
                rendered: AtomicUsize::new(0),
            }
        }
    }

    impl Render for CountingRenderer {
        fn classify(&self, ext: &str) -> Option<MediaKind> {
            match ext {
                "jpg" => Some(MediaKind::Image),
                "mp4" => Some(MediaKind::Video),
                _ => None,
            }
        }

        fn render(&self, _kind: MediaKind, task: &MediaTask, _dir: &Path) -> RenderResult<()> {
            self.rendered.fetch_add(1, Ordering::SeqCst);
            if task.path.to_string_lossy().contains("corrupt") {
                return Err(RenderError::Decode {
                    path: task.path.clone(),
                    message: "unreadable".to_string(),
                });
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_every_submission_yields_exactly_one_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Arc::new(CountingRenderer::new());
        let (pool, mut outcomes) = ConvertPool::spawn(renderer.clone(), 8, 64);

        let n = 1000;
        for i in 0..n {
            pool.submit(dir.path().join(format!("img_{i:04}.jpg"))).await;
        }
        let stats = pool.wait_for_completion().await;

        assert_eq!(stats.completed, n);
        assert_eq!(stats.failed, 0);
        assert_eq!(stats.skipped, 0);
        assert_eq!(renderer.rendered.load(Ordering::SeqCst), n as usize);

        let mut signals = 0;
        while outcomes.recv().await.is_some() {
            signals += 1;
        }
        assert_eq!(signals, n);
    }

    #[tokio::test]
    async fn test_one_corrupt_file_does_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Arc::new(CountingRenderer::new());
        let (pool, _outcomes) = ConvertPool::spawn(renderer, 4, 16);

        for i in 0..20 {
            pool.submit(dir.path().join(format!("ok_{i}.jpg"))).await;
        }
        pool.submit(dir.path().join("corrupt.jpg")).await;
        for i in 0..20 {
            pool.submit(dir.path().join(format!("more_{i}.jpg"))).await;
        }

        let stats = pool.wait_for_completion().await;
        assert_eq!(stats.completed, 40);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.total(), 41);
    }

    #[tokio::test]
    async fn test_existing_marker_skips_without_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("done.jpg");
        std::fs::write(&src, b"x").unwrap();
        let thumb_dir = specs::thumb_dir(&src).unwrap();
        std::fs::create_dir_all(&thumb_dir).unwrap();
        std::fs::write(thumb_dir.join(specs::marker_name()), b"jpeg").unwrap();

        let renderer = Arc::new(CountingRenderer::new());
        let (pool, mut outcomes) = ConvertPool::spawn(renderer.clone(), 2, 4);
        pool.submit(src).await;
        let stats = pool.wait_for_completion().await;

        assert_eq!(stats.skipped, 1);
        assert_eq!(renderer.rendered.load(Ordering::SeqCst), 0);
        assert!(matches!(
            outcomes.recv().await,
            Some(TaskOutcome::Skipped(_, SkipReason::AlreadyDone))
        ));
    }

    #[tokio::test]
    async fn test_unknown_extension_is_silently_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Arc::new(CountingRenderer::new());
        let (pool, mut outcomes) = ConvertPool::spawn(renderer.clone(), 2, 4);

        pool.submit(dir.path().join("notes.txt")).await;
        let stats = pool.wait_for_completion().await;

        assert_eq!(stats.skipped, 1);
        assert_eq!(renderer.rendered.load(Ordering::SeqCst), 0);
        assert!(matches!(
            outcomes.recv().await,
            Some(TaskOutcome::Skipped(_, SkipReason::Unsupported))
        ));
    }

    #[tokio::test]
    async fn test_panicking_render_is_contained() {
        struct PanickingRenderer;
        impl Render for PanickingRenderer {
            fn classify(&self, _ext: &str) -> Option<MediaKind> {
                Some(MediaKind::Image)
            }
            fn render(&self, _k: MediaKind, _t: &MediaTask, _d: &Path) -> RenderResult<()> {
                panic!("boom");
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let (pool, _outcomes) = ConvertPool::spawn(Arc::new(PanickingRenderer), 2, 4);
        pool.submit(dir.path().join("a.jpg")).await;
        pool.submit(dir.path().join("b.jpg")).await;
        let stats = pool.wait_for_completion().await;

        // Both tasks accounted for despite the panics
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.total(), 2);
    }

    #[test]
    fn test_media_task_extension_is_lowercased() {
        let task = MediaTask::new(PathBuf::from("/photos/IMG_0001.JPG"));
        assert_eq!(task.ext, "jpg");

        let task = MediaTask::new(PathBuf::from("/photos/noext"));
        assert_eq!(task.ext, "");
    }
}

//! UI-thread dispatchers.
//!
//! Observer callbacks must run on the single UI thread. The center only talks
//! to the [`UiDispatcher`] trait, so any event loop with a "run this on the UI
//! thread" primitive can be plugged in. Two implementations live here:
//!
//! - [`UiThread`]: a dedicated thread running a serial task loop, the stand-in
//!   for a toolkit's event thread.
//! - [`CurrentThreadDispatcher`]: a deterministic executor whose UI thread is
//!   the thread that created it; queued tasks run when `run_pending` is called.

use crate::config::UiThreadConfig;
use crate::core::error::{NotificationError, Result};
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc as std_mpsc;
use std::sync::{Mutex, PoisonError};
use std::thread::{JoinHandle, ThreadId};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// A unit of work scheduled onto the UI thread.
pub type UiTask = Box<dyn FnOnce() + Send + 'static>;

/// Serial executor bound to one UI thread.
pub trait UiDispatcher: Send + Sync {
    /// Whether the calling thread is the UI thread.
    fn is_ui_thread(&self) -> bool;

    /// Enqueue a task for the UI thread. Never runs the task inline.
    ///
    /// Tasks run in submission order.
    fn dispatch(&self, task: UiTask) -> Result<()>;

    /// Run a task on the UI thread: immediately when already on it,
    /// otherwise enqueue and return without waiting.
    fn run_on_ui_thread(&self, task: UiTask) -> Result<()> {
        if self.is_ui_thread() {
            run_task(task);
            Ok(())
        } else {
            self.dispatch(task)
        }
    }
}

/// Run a task, containing any panic it raises.
fn run_task(task: UiTask) {
    if let Err(panic) = panic::catch_unwind(AssertUnwindSafe(task)) {
        log::error!("UI task panicked: {}", panic_message(&panic));
    }
}

pub(crate) fn panic_message(panic: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// A dedicated UI thread with a serial task loop.
///
/// The loop runs on a current-thread tokio runtime owned by the spawned thread.
/// It stops on shutdown or when every sender is gone. Tasks accepted before
/// that point still run before the thread exits; later submissions are rejected.
pub struct UiThread {
    /// Channel feeding the task loop
    sender: mpsc::UnboundedSender<UiTask>,
    /// Identity of the spawned thread
    thread_id: ThreadId,
    /// Channel for sending shutdown signal
    shutdown_sender: Mutex<Option<oneshot::Sender<()>>>,
    /// Handle to the loop thread
    thread_handle: Mutex<Option<JoinHandle<()>>>,
}

impl UiThread {
    /// Spawn the UI thread and start its task loop.
    pub fn spawn(config: UiThreadConfig) -> Result<Self> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (shutdown_sender, shutdown_receiver) = oneshot::channel();
        let runtime = tokio::runtime::Builder::new_current_thread().build()?;

        let thread_handle = std::thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || {
                runtime.block_on(Self::run_task_loop(receiver, shutdown_receiver));
            })?;

        log::debug!("Spawned UI thread '{}'", config.thread_name);

        Ok(Self {
            sender,
            thread_id: thread_handle.thread().id(),
            shutdown_sender: Mutex::new(Some(shutdown_sender)),
            thread_handle: Mutex::new(Some(thread_handle)),
        })
    }

    /// Id of the UI thread, for affinity checks.
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Main task loop.
    async fn run_task_loop(
        mut receiver: mpsc::UnboundedReceiver<UiTask>,
        mut shutdown_receiver: oneshot::Receiver<()>,
    ) {
        loop {
            tokio::select! {
                _ = &mut shutdown_receiver => {
                    log::debug!("Received shutdown signal, stopping UI task loop");
                    break;
                }
                task = receiver.recv() => {
                    match task {
                        Some(task) => run_task(task),
                        None => {
                            log::debug!("All UI task senders dropped");
                            break;
                        }
                    }
                }
            }
        }

        // Every accepted task runs, whichever select branch won.
        receiver.close();
        let mut drained = 0usize;
        while let Ok(task) = receiver.try_recv() {
            run_task(task);
            drained += 1;
        }
        if drained > 0 {
            log::debug!("Drained {} queued UI tasks on shutdown", drained);
        }
    }

    /// Block until every task submitted before this call has run.
    ///
    /// Returns immediately when called on the UI thread itself.
    pub fn flush(&self, timeout: Duration) -> Result<()> {
        if self.is_ui_thread() {
            return Ok(());
        }

        let (done_sender, done_receiver) = std_mpsc::channel();
        self.dispatch(Box::new(move || {
            let _ = done_sender.send(());
        }))?;

        match done_receiver.recv_timeout(timeout) {
            Ok(()) => Ok(()),
            Err(std_mpsc::RecvTimeoutError::Timeout) => Err(NotificationError::Timeout(timeout)),
            Err(std_mpsc::RecvTimeoutError::Disconnected) => Err(NotificationError::DispatcherClosed),
        }
    }

    /// Stop the task loop and wait for the thread to finish.
    /// Called automatically on drop if not called explicitly.
    pub fn shutdown(&self) {
        let shutdown_sender = self
            .shutdown_sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(shutdown_sender) = shutdown_sender {
            log::debug!("Sending shutdown signal to UI thread");
            let _ = shutdown_sender.send(());
        }

        let thread_handle = self
            .thread_handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(thread_handle) = thread_handle {
            if thread_handle.thread().id() == std::thread::current().id() {
                // Joining ourselves would deadlock; the loop exits on its own.
                return;
            }
            let _ = thread_handle.join();
            log::debug!("UI thread shutdown completed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl UiDispatcher for UiThread {
    fn is_ui_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    fn dispatch(&self, task: UiTask) -> Result<()> {
        self.sender.send(task).map_err(|_| {
            log::warn!("Rejected UI task: dispatcher is closed");
            NotificationError::DispatcherClosed
        })
    }
}

impl Drop for UiThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Deterministic dispatcher for tests and embedding in foreign event loops.
///
/// The thread that creates it is the UI thread. Submissions from that thread
/// run inline through [`UiDispatcher::run_on_ui_thread`]; submissions from any
/// other thread wait in a queue until the UI thread calls [`run_pending`].
///
/// [`run_pending`]: CurrentThreadDispatcher::run_pending
pub struct CurrentThreadDispatcher {
    thread_id: ThreadId,
    queue: Mutex<VecDeque<UiTask>>,
}

impl CurrentThreadDispatcher {
    pub fn new() -> Self {
        Self {
            thread_id: std::thread::current().id(),
            queue: Mutex::new(VecDeque::new()),
        }
    }

    /// Number of queued tasks.
    pub fn pending(&self) -> usize {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Run queued tasks in FIFO order until the queue is empty, including
    /// tasks queued while draining. Returns how many ran.
    pub fn run_pending(&self) -> Result<usize> {
        if !self.is_ui_thread() {
            return Err(NotificationError::NotUiThread);
        }

        let mut ran = 0;
        loop {
            let task = self
                .queue
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front();
            match task {
                Some(task) => {
                    run_task(task);
                    ran += 1;
                }
                None => break,
            }
        }
        Ok(ran)
    }
}

impl Default for CurrentThreadDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl UiDispatcher for CurrentThreadDispatcher {
    fn is_ui_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    fn dispatch(&self, task: UiTask) -> Result<()> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(task);
        Ok(())
    }
}

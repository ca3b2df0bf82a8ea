use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

#[derive(Debug, Default)]
struct SignalState {
    dirty: bool,
    stop: bool,
}

/// Wake condition shared between the input context and the render thread.
/// Mutations mark it dirty; the render thread sleeps until the next mark
/// instead of spinning.
#[derive(Debug, Default)]
pub struct RenderSignal {
    state: Mutex<SignalState>,
    cond: Condvar,
}

impl RenderSignal {
    pub fn notify(&self) {
        self.state().dirty = true;
        self.cond.notify_all();
    }

    fn request_stop(&self) {
        self.state().stop = true;
        self.cond.notify_all();
    }

    fn reset(&self) {
        let mut state = self.state();
        state.stop = false;
        // render at least one frame right after starting
        state.dirty = true;
    }

    /// Block until there is work or a stop request. Returns false on stop.
    fn wait_for_work(&self) -> bool {
        let mut state = self.state();
        loop {
            // drain pending work before honoring a stop request, so the
            // frame that was signalled right before stop still lands
            if state.dirty {
                state.dirty = false;
                return true;
            }
            if state.stop {
                return false;
            }
            state = self
                .cond
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, SignalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Background render task whose lifetime is coupled to pointer gestures.
/// At most one task runs at a time; `stop` joins the thread, so a rapid
/// up/down pair can never leave two passes targeting the same surface.
#[derive(Debug, Default)]
pub struct RenderLoop {
    signal: Arc<RenderSignal>,
    handle: Option<JoinHandle<()>>,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signal(&self) -> &Arc<RenderSignal> {
        &self.signal
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Spawn the render thread. A no-op while already running.
    pub fn start<F>(&mut self, mut frame: F)
    where
        F: FnMut() + Send + 'static,
    {
        if self.handle.is_some() {
            return;
        }
        self.signal.reset();
        let signal = Arc::clone(&self.signal);
        self.handle = Some(thread::spawn(move || {
            debug!("render loop started");
            while signal.wait_for_work() {
                frame();
            }
            debug!("render loop stopped");
        }));
    }

    /// Signal the thread to stop and block until it has fully exited.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.signal.request_stop();
            if handle.join().is_err() {
                error!("render thread panicked");
            }
        }
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    #[test]
    fn renders_once_per_notification() {
        let frames = Arc::new(AtomicUsize::new(0));
        let mut rl = RenderLoop::new();
        let counter = Arc::clone(&frames);
        rl.start(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let deadline = Instant::now() + Duration::from_secs(5);
        while frames.load(Ordering::SeqCst) < 1 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(frames.load(Ordering::SeqCst) >= 1);

        rl.signal().notify();
        let deadline = Instant::now() + Duration::from_secs(5);
        while frames.load(Ordering::SeqCst) < 2 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(frames.load(Ordering::SeqCst) >= 2);
        rl.stop();
    }

    #[test]
    fn stop_joins_and_no_frames_run_afterwards() {
        let frames = Arc::new(AtomicUsize::new(0));
        let mut rl = RenderLoop::new();
        let counter = Arc::clone(&frames);
        rl.start(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        rl.stop();
        assert!(!rl.is_running());
        let after = frames.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(frames.load(Ordering::SeqCst), after);
    }

    #[test]
    fn start_while_running_is_a_no_op() {
        let frames = Arc::new(AtomicUsize::new(0));
        let mut rl = RenderLoop::new();
        let a = Arc::clone(&frames);
        rl.start(move || {
            a.fetch_add(1, Ordering::SeqCst);
        });
        // second start must not spawn a competing task
        rl.start(|| panic!("second render task started"));
        rl.signal().notify();
        rl.stop();
        assert!(frames.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn restart_after_stop_works() {
        let frames = Arc::new(AtomicUsize::new(0));
        let mut rl = RenderLoop::new();
        for _ in 0..3 {
            let counter = Arc::clone(&frames);
            rl.start(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
            rl.stop();
        }
        assert!(frames.load(Ordering::SeqCst) >= 3);
    }
}

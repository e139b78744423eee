//! Background redraw loop
//!
//! An [`Animator`] owns one drive thread that calls [`Drawable::display`] on
//! every registered drawable in a loop. The controlling thread and the drive
//! thread hand off lifecycle changes through a single state mutex and a
//! condition variable: each lifecycle call updates the requested state,
//! notifies, and then waits until the drive thread has acknowledged it.
//!
//! [`Drawable::display`]: super::Drawable::display

use super::drawable::{display_all, set_exclusive_context_all, DrawableRef};
use super::fps::{FpsCounter, FpsSnapshot};
use crate::core::errors::AnimatorError;
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound for each lifecycle handshake with the drive thread
const LIFECYCLE_TIMEOUT: Duration = Duration::from_millis(1000);

/// Observable lifecycle state of an [`Animator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorState {
    /// No drive thread exists
    Stopped,
    /// `start()` spawned the thread, which has not settled yet
    Starting,
    /// The drive thread is redrawing
    Animating,
    /// The drive thread is alive but waiting, either paused or without drawables
    Paused,
    /// `stop()` was issued and the thread has not exited yet
    Stopping,
}

/// Placement of the drive thread
///
/// Names the thread `<group>-Animator` and optionally sets its stack size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadGroup {
    name: String,
    stack_size: Option<usize>,
}

impl ThreadGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stack_size: None,
        }
    }

    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stack_size(&self) -> Option<usize> {
        self.stack_size
    }
}

/// State shared between the controlling threads and the drive thread.
/// Only ever touched with `Shared::state` locked.
struct LoopState {
    phase: AnimatorState,
    thread_alive: bool,
    thread_id: Option<ThreadId>,
    animating: bool,
    pause_issued: bool,
    stop_issued: bool,
    run_as_fast_as_possible: bool,
    exclusive_context: bool,
    drawables: Vec<DrawableRef>,
}

impl LoopState {
    fn new() -> Self {
        Self {
            phase: AnimatorState::Stopped,
            thread_alive: false,
            thread_id: None,
            animating: false,
            pause_issued: false,
            stop_issued: false,
            run_as_fast_as_possible: false,
            exclusive_context: false,
            drawables: Vec::new(),
        }
    }

    fn position_of(&self, drawable: &DrawableRef) -> Option<usize> {
        let target = Arc::as_ptr(drawable) as *const ();
        self.drawables
            .iter()
            .position(|d| Arc::as_ptr(d) as *const () == target)
    }
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:?}, started {}, animating {}, paused {}, drawables {}, exclusive {}]",
            self.phase,
            self.thread_alive,
            self.animating,
            self.pause_issued,
            self.drawables.len(),
            self.exclusive_context
        )
    }
}

struct Shared {
    state: Mutex<LoopState>,
    changed: Condvar,
    fps: Mutex<FpsCounter>,
}

/// Owned by the lifecycle lock, which serializes start/stop/pause/resume
struct Lifecycle {
    thread: Option<JoinHandle<()>>,
    thread_group: Option<ThreadGroup>,
}

/// Drives [`Drawable`](super::Drawable)s from a dedicated background thread
///
/// After each pass over the drawables the thread yields to avoid swamping the
/// CPU, unless [`set_run_as_fast_as_possible`](Self::set_run_as_fast_as_possible)
/// was enabled. Dropping the animator stops it.
pub struct Animator {
    shared: Arc<Shared>,
    lifecycle: Mutex<Lifecycle>,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new()
    }
}

impl Animator {
    /// Create a new, empty animator
    pub fn new() -> Self {
        debug!("Animator created");
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(LoopState::new()),
                changed: Condvar::new(),
                fps: Mutex::new(FpsCounter::default()),
            }),
            lifecycle: Mutex::new(Lifecycle {
                thread: None,
                thread_group: None,
            }),
        }
    }

    /// Create an animator driving a single drawable
    pub fn with_drawable(drawable: DrawableRef) -> Self {
        let animator = Self::new();
        animator.shared.state.lock().drawables.push(drawable);
        animator
    }

    /// Create an animator whose thread runs in the given group
    pub fn with_thread_group(group: ThreadGroup) -> Self {
        let animator = Self::new();
        animator.lifecycle.lock().thread_group = Some(group);
        animator
    }

    /// Set the group for the animation thread.
    ///
    /// Fails with [`AnimatorError::AlreadyStarted`] once the thread exists.
    pub fn set_thread_group(&self, group: ThreadGroup) -> Result<(), AnimatorError> {
        let Some(mut lifecycle) = self.lock_lifecycle() else {
            return Err(AnimatorError::AlreadyStarted);
        };
        if self.shared.state.lock().thread_alive {
            return Err(AnimatorError::AlreadyStarted);
        }
        lifecycle.thread_group = Some(group);
        Ok(())
    }

    pub fn thread_group(&self) -> Option<ThreadGroup> {
        self.lifecycle.lock().thread_group.clone()
    }

    /// Start the drive thread.
    ///
    /// Returns `Ok(false)` if already started. Otherwise blocks until the
    /// thread is animating, or idle because no drawable is registered.
    pub fn start(&self) -> Result<bool, AnimatorError> {
        let Some(mut lifecycle) = self.lock_lifecycle() else {
            return Ok(false);
        };
        if self.shared.state.lock().thread_alive {
            return Ok(false);
        }

        // A drive thread that died from a panicking drawable leaves its handle behind
        if let Some(stale) = lifecycle.thread.take() {
            if stale.join().is_err() {
                warn!("Previous animation thread terminated by a panic");
            }
        }

        {
            let mut st = self.shared.state.lock();
            st.phase = AnimatorState::Starting;
            st.stop_issued = false;
            st.pause_issued = false;
        }
        self.shared.fps.lock().reset();

        let base = match &lifecycle.thread_group {
            Some(group) => group.name().to_string(),
            None => thread::current().name().unwrap_or("unnamed").to_string(),
        };
        let mut builder = thread::Builder::new().name(format!("{base}-Animator"));
        if let Some(bytes) = lifecycle.thread_group.as_ref().and_then(|g| g.stack_size()) {
            builder = builder.stack_size(bytes);
        }

        let shared = Arc::clone(&self.shared);
        let handle = match builder.spawn(move || drive(shared)) {
            Ok(handle) => handle,
            Err(e) => {
                self.shared.state.lock().phase = AnimatorState::Stopped;
                return Err(AnimatorError::Spawn(e));
            }
        };
        debug!("Animator starting {:?}", handle.thread().name());
        lifecycle.thread = Some(handle);

        Ok(self.await_settled("start", |st| st.phase != AnimatorState::Starting))
    }

    /// Stop the drive thread and wait for it to exit.
    ///
    /// Returns `false` if the animator was not started. When called from a
    /// drawable on the drive thread itself, only requests the stop.
    pub fn stop(&self) -> bool {
        let lifecycle = self.lock_lifecycle();
        let issued = self.transition(
            "stop",
            |st| {
                if !st.thread_alive {
                    return false;
                }
                st.stop_issued = true;
                st.phase = AnimatorState::Stopping;
                true
            },
            |st| !st.thread_alive,
        );
        if issued.is_none() {
            return false;
        }
        // The drive thread only requests the stop, the next start() joins it
        let Some(mut lifecycle) = lifecycle else {
            return true;
        };
        if let Some(handle) = lifecycle.thread.take() {
            if handle.join().is_err() {
                warn!("Animation thread terminated by a panic");
            }
        }
        true
    }

    /// Suspend redraws without terminating the thread.
    ///
    /// Returns `false` if not started or already paused.
    pub fn pause(&self) -> bool {
        let _lifecycle = self.lock_lifecycle();
        self.pause_impl()
    }

    /// Resume redraws after [`pause`](Self::pause).
    ///
    /// Returns `false` if not started or not paused.
    pub fn resume(&self) -> bool {
        let _lifecycle = self.lock_lifecycle();
        self.resume_impl()
    }

    /// Register a drawable; registering the same drawable twice is a no-op
    pub fn add(&self, drawable: DrawableRef) {
        let _lifecycle = self.lock_lifecycle();
        let paused = self.pause_impl();
        {
            let mut st = self.shared.state.lock();
            if st.position_of(&drawable).is_none() {
                debug!("Animator add {}", drawable.name());
                st.drawables.push(drawable);
            }
        }
        if paused {
            self.resume_impl();
        }
        self.transition(
            "add",
            |st| st.thread_alive && !st.pause_issued,
            |st| !st.thread_alive || st.animating,
        );
    }

    /// Unregister a drawable, matched by identity.
    ///
    /// When this leaves no drawable, waits until the thread stopped animating.
    pub fn remove(&self, drawable: &DrawableRef) -> bool {
        let _lifecycle = self.lock_lifecycle();
        let paused = self.pause_impl();
        let removed = {
            let mut st = self.shared.state.lock();
            match st.position_of(drawable) {
                Some(index) => {
                    debug!("Animator remove {}", drawable.name());
                    st.drawables.remove(index);
                    true
                }
                None => false,
            }
        };
        if paused {
            self.resume_impl();
        }
        self.transition(
            "remove",
            |st| st.thread_alive && st.drawables.is_empty(),
            |st| !st.thread_alive || !st.animating,
        );
        removed
    }

    /// Skip the per-frame yield when `true`
    pub fn set_run_as_fast_as_possible(&self, run_fast: bool) {
        self.shared.state.lock().run_as_fast_as_possible = run_fast;
    }

    /// Enable or disable exclusive context ownership by the drive thread.
    ///
    /// A running animator pauses and resumes to propagate the change.
    pub fn set_exclusive_context(&self, enabled: bool) {
        let _lifecycle = self.lock_lifecycle();
        let propagate = {
            let mut st = self.shared.state.lock();
            let changed = st.exclusive_context != enabled;
            st.exclusive_context = enabled;
            changed && st.thread_alive && !st.pause_issued
        };
        if propagate && self.pause_impl() {
            self.resume_impl();
        }
    }

    pub fn exclusive_context(&self) -> bool {
        self.shared.state.lock().exclusive_context
    }

    pub fn state(&self) -> AnimatorState {
        self.shared.state.lock().phase
    }

    pub fn is_started(&self) -> bool {
        self.shared.state.lock().thread_alive
    }

    pub fn is_animating(&self) -> bool {
        let st = self.shared.state.lock();
        st.thread_alive && st.animating
    }

    pub fn is_paused(&self) -> bool {
        let st = self.shared.state.lock();
        st.thread_alive && st.pause_issued
    }

    pub fn drawable_count(&self) -> usize {
        self.shared.state.lock().drawables.len()
    }

    pub fn drawables(&self) -> Vec<DrawableRef> {
        self.shared.state.lock().drawables.clone()
    }

    /// Log the frame rate every `frames` frames; `0` disables reporting
    pub fn set_update_fps_frames(&self, frames: u32) {
        self.shared.fps.lock().set_update_frames(frames);
    }

    pub fn reset_fps_counter(&self) {
        self.shared.fps.lock().reset();
    }

    pub fn fps(&self) -> FpsSnapshot {
        self.shared.fps.lock().snapshot()
    }

    fn pause_impl(&self) -> bool {
        self.transition(
            "pause",
            |st| {
                if !st.thread_alive || st.pause_issued {
                    return false;
                }
                st.pause_issued = true;
                true
            },
            // also done once the thread is gone
            |st| !st.thread_alive || !st.animating,
        )
        .is_some()
    }

    fn resume_impl(&self) -> bool {
        self.transition(
            "resume",
            |st| {
                if !st.thread_alive || !st.pause_issued {
                    return false;
                }
                st.pause_issued = false;
                true
            },
            |st| !st.thread_alive || st.animating || st.drawables.is_empty(),
        )
        .is_some()
    }

    fn on_drive_thread(&self) -> bool {
        self.shared.state.lock().thread_id == Some(thread::current().id())
    }

    /// Serialize lifecycle calls from controlling threads.
    ///
    /// Returns `None` on the drive thread, which must never block here: a
    /// controller holding the lock waits for that very thread to acknowledge.
    fn lock_lifecycle(&self) -> Option<MutexGuard<'_, Lifecycle>> {
        if self.on_drive_thread() {
            None
        } else {
            Some(self.lifecycle.lock())
        }
    }

    /// Apply a state change and wait for the drive thread to settle.
    ///
    /// Returns `None` when `apply` rejected the change, otherwise whether the
    /// handshake completed in time.
    fn transition(
        &self,
        action: &str,
        apply: impl FnOnce(&mut LoopState) -> bool,
        settled: impl Fn(&LoopState) -> bool,
    ) -> Option<bool> {
        {
            let mut st = self.shared.state.lock();
            if !apply(&mut st) {
                return None;
            }
            self.shared.changed.notify_all();
        }
        Some(self.await_settled(action, settled))
    }

    fn await_settled(&self, action: &str, settled: impl Fn(&LoopState) -> bool) -> bool {
        let mut st = self.shared.state.lock();
        if st.thread_id == Some(thread::current().id()) {
            // The drive thread cannot wait for itself
            return true;
        }
        self.shared
            .changed
            .wait_while_for(&mut st, |st| !settled(st), LIFECYCLE_TIMEOUT);
        let done = settled(&st);
        if done {
            debug!("Animator {} done: {}", action, *st);
        } else {
            warn!(
                "Animator {} not settled after {:?}: {}",
                action, LIFECYCLE_TIMEOUT, *st
            );
        }
        done
    }
}

impl fmt::Debug for Animator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Animator{}", *self.shared.state.lock())
    }
}

impl Drop for Animator {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Resets the shared state when the drive thread exits, also on unwind
struct ExitGuard<'a> {
    shared: &'a Shared,
}

impl Drop for ExitGuard<'_> {
    fn drop(&mut self) {
        let mut st = self.shared.state.lock();
        st.stop_issued = false;
        st.pause_issued = false;
        st.animating = false;
        st.thread_alive = false;
        st.thread_id = None;
        st.phase = AnimatorState::Stopped;
        debug!("Animator stop {:?}: {}", thread::current().name(), *st);
        self.shared.changed.notify_all();
    }
}

/// Body of the animation thread
fn drive(shared: Arc<Shared>) {
    let _exit = ExitGuard { shared: &shared };
    let mut st = shared.state.lock();
    st.thread_alive = true;
    st.thread_id = Some(thread::current().id());
    st.animating = false;
    debug!("Animator start {:?}: {}", thread::current().name(), *st);

    while !st.stop_issued {
        // Idle while paused or without work
        let mut exclusive_cleared = false;
        while !st.stop_issued && (st.pause_issued || st.drawables.is_empty()) {
            let was_paused = st.pause_issued;
            if st.exclusive_context && !st.drawables.is_empty() && !exclusive_cleared {
                exclusive_cleared = true;
                let drawables = st.drawables.clone();
                MutexGuard::unlocked(&mut st, || {
                    set_exclusive_context_all(&drawables, false);
                    display_all(&drawables);
                });
                // state may have moved on while unlocked
                continue;
            }
            st.animating = false;
            st.phase = if st.stop_issued {
                AnimatorState::Stopping
            } else {
                AnimatorState::Paused
            };
            debug!("Animator pause: {}", *st);
            shared.changed.notify_all();
            shared.changed.wait(&mut st);
            if was_paused && !st.pause_issued {
                shared.fps.lock().reset();
                debug!("Animator resume: {}", *st);
            }
        }
        if st.stop_issued {
            break;
        }
        if !st.animating {
            // Started, resumed, or got its first drawable
            st.animating = true;
            st.phase = AnimatorState::Animating;
            set_exclusive_context_all(&st.drawables, st.exclusive_context);
            shared.changed.notify_all();
        }

        let drawables = st.drawables.clone();
        let run_fast = st.run_as_fast_as_possible;
        MutexGuard::unlocked(&mut st, || {
            display_all(&drawables);
            shared.fps.lock().tick();
            if !run_fast {
                thread::yield_now();
            }
        });
    }

    if st.exclusive_context && !st.drawables.is_empty() {
        let drawables = st.drawables.clone();
        MutexGuard::unlocked(&mut st, || {
            set_exclusive_context_all(&drawables, false);
            display_all(&drawables);
        });
    }
    drop(st);
}

//! Process-wide initialization
//!
//! The first `init_singleton` installs logging and records the settings it ran
//! with; later calls are no-ops until `shutdown`. Shutdown flushes the file
//! logger. The global `tracing` subscriber itself cannot be removed, so a
//! second init after shutdown keeps the subscriber installed by the first.

use crate::core::settings::Settings;
use crate::logging;
use parking_lot::Mutex;
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;

struct ToolkitState {
    settings: Settings,
    _log_guard: Option<WorkerGuard>,
}

static TOOLKIT: Mutex<Option<ToolkitState>> = parking_lot::const_mutex(None);

/// Initialize once per process. Returns `true` if this call did the work.
pub fn init_singleton(settings: &Settings) -> bool {
    let mut toolkit = TOOLKIT.lock();
    if toolkit.is_some() {
        return false;
    }

    let log_guard = match logging::init_tracing(settings) {
        Ok(guard) => guard,
        Err(e) => {
            // Typically a subscriber from an earlier init or an embedding app
            debug!("Keeping existing log subscriber: {}", e);
            None
        }
    };
    debug!("Toolkit initialized with {:?}", settings);
    *toolkit = Some(ToolkitState {
        settings: settings.clone(),
        _log_guard: log_guard,
    });
    true
}

/// Release process-wide state. Returns `false` if nothing was initialized.
pub fn shutdown() -> bool {
    let state = TOOLKIT.lock().take();
    match state {
        Some(state) => {
            debug!("Toolkit shutdown");
            // Dropping the guard flushes pending file output
            drop(state);
            true
        }
        None => false,
    }
}

pub fn is_initialized() -> bool {
    TOOLKIT.lock().is_some()
}

/// Settings of the current initialization
pub fn settings() -> Option<Settings> {
    TOOLKIT.lock().as_ref().map(|state| state.settings.clone())
}

//! Animation driver
//!
//! A background thread that keeps redrawing a set of drawables, with blocking
//! start/stop/pause/resume handshakes and frame rate accounting.

pub mod animator;
pub mod drawable;
pub mod fps;

pub use animator::{Animator, AnimatorState, ThreadGroup};
pub use drawable::{Drawable, DrawableRef, FnDrawable};
pub use fps::{FpsCounter, FpsSnapshot};

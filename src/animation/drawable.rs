//! Redraw targets driven by the animator

use std::sync::Arc;

/// A surface that accepts redraw requests from the animation thread
///
/// Implementations are shared between the controlling thread and the drive
/// thread, so all methods take `&self` and synchronize internally.
pub trait Drawable: Send + Sync {
    /// Redraw the surface once
    fn display(&self);

    /// Toggle exclusive context ownership by the animation thread.
    ///
    /// Called with `true` when animation (re)starts and with `false` before the
    /// animator pauses, idles or stops. The animator follows a `false` with one
    /// extra `display()` so the release takes effect.
    fn set_exclusive_context(&self, _enabled: bool) {}

    /// Name used in log output
    fn name(&self) -> &str {
        "drawable"
    }
}

/// Shared handle to a registered drawable
pub type DrawableRef = Arc<dyn Drawable>;

/// Adapts a closure into a [`Drawable`]
pub struct FnDrawable<F> {
    name: String,
    redraw: F,
}

impl<F> FnDrawable<F>
where
    F: Fn() + Send + Sync,
{
    pub fn new(name: impl Into<String>, redraw: F) -> Self {
        Self {
            name: name.into(),
            redraw,
        }
    }
}

impl<F> Drawable for FnDrawable<F>
where
    F: Fn() + Send + Sync,
{
    fn display(&self) {
        (self.redraw)()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

pub(crate) fn display_all(drawables: &[DrawableRef]) {
    for drawable in drawables {
        drawable.display();
    }
}

pub(crate) fn set_exclusive_context_all(drawables: &[DrawableRef], enabled: bool) {
    for drawable in drawables {
        drawable.set_exclusive_context(enabled);
    }
}

//! Glyph fill tessellation as an animation drawable
//!
//! Each redraw fills the glyph outline into a triangle mesh with lyon, the way
//! a GPU renderer would rebuild its vertex buffers every frame.

use crate::animation::Drawable;
use crate::font_source::Glyph;
use crate::geometry::{build_path, to_lyon_path};
use lyon::math::Point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, VertexBuffers,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use tracing::{trace, warn};

/// Flattening tolerance in font units
pub const DEFAULT_TOLERANCE: f32 = 0.5;

struct Mesh {
    tessellator: FillTessellator,
    buffers: VertexBuffers<Point, u32>,
}

pub struct OutlineFill {
    name: String,
    path: Path,
    options: FillOptions,
    mesh: Mutex<Mesh>,
    frames: AtomicU64,
    triangles: AtomicUsize,
    exclusive: AtomicBool,
}

impl OutlineFill {
    pub fn new(glyph: &Glyph) -> Self {
        Self {
            name: format!("fill:{}", glyph.name()),
            path: to_lyon_path(&build_path(glyph)),
            // TrueType outlines use the non-zero winding rule
            options: FillOptions::non_zero().with_tolerance(DEFAULT_TOLERANCE),
            mesh: Mutex::new(Mesh {
                tessellator: FillTessellator::new(),
                buffers: VertexBuffers::new(),
            }),
            frames: AtomicU64::new(0),
            triangles: AtomicUsize::new(0),
            exclusive: AtomicBool::new(false),
        }
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.options = self.options.with_tolerance(tolerance);
        self
    }

    /// Completed redraws
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }

    /// Triangle count of the last tessellation
    pub fn triangle_count(&self) -> usize {
        self.triangles.load(Ordering::Acquire)
    }

    pub fn has_exclusive_context(&self) -> bool {
        self.exclusive.load(Ordering::Acquire)
    }

    /// Tessellate once and return the triangle count
    pub fn tessellate(&self) -> usize {
        let mut mesh = self.mesh.lock();
        let Mesh {
            tessellator,
            buffers,
        } = &mut *mesh;
        buffers.vertices.clear();
        buffers.indices.clear();

        let result = tessellator.tessellate_path(
            &self.path,
            &self.options,
            &mut BuffersBuilder::new(buffers, |vertex: FillVertex| vertex.position()),
        );
        let triangles = match result {
            Ok(()) => buffers.indices.len() / 3,
            Err(e) => {
                warn!("Tessellation of {} failed: {:?}", self.name, e);
                0
            }
        };
        self.triangles.store(triangles, Ordering::Release);
        triangles
    }
}

impl Drawable for OutlineFill {
    fn display(&self) {
        let triangles = self.tessellate();
        let frame = self.frames.fetch_add(1, Ordering::AcqRel) + 1;
        trace!("{} frame {}: {} triangles", self.name, frame, triangles);
    }

    fn set_exclusive_context(&self, enabled: bool) {
        self.exclusive.store(enabled, Ordering::Release);
    }

    fn name(&self) -> &str {
        &self.name
    }
}

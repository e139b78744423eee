//! Vertex-list outlines
//!
//! Replays path commands into outlines of transformed vertices, keeping the
//! on/off-curve classification of every point. Consumers that triangulate or
//! stroke quadratic outlines directly work from this form.

use super::outline::build_path;
use super::path::{PathCommand, PathPoint};
use crate::font_source::Glyph;
use kurbo::{Affine, Point};

/// A transformed outline point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    pub on_curve: bool,
}

impl Vertex {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn same_position(&self, other: &Vertex) -> bool {
        self.x == other.x && self.y == other.y
    }
}

/// One contour worth of vertices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    vertices: Vec<Vertex>,
    closed: bool,
}

impl Outline {
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    fn push(&mut self, point: Point, on_curve: bool) {
        self.vertices.push(Vertex {
            x: point.x,
            y: point.y,
            on_curve,
        });
    }

    /// Close the outline, repeating the first vertex if the last one differs
    fn close(&mut self) {
        if self.closed {
            return;
        }
        if let (Some(first), Some(last)) = (self.vertices.first(), self.vertices.last()) {
            if !first.same_position(last) {
                let first = *first;
                self.vertices.push(first);
            }
        }
        self.closed = true;
    }
}

/// A list of outlines
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutlineShape {
    outlines: Vec<Outline>,
}

impl OutlineShape {
    /// Replay `commands` with `transform` applied to every point
    pub fn from_commands(commands: &[PathCommand], transform: Affine) -> Self {
        let mut shape = OutlineShape::default();
        let map = |p: PathPoint| transform * Point::from(p);

        for command in commands {
            match *command {
                PathCommand::MoveTo { to } => {
                    shape.close_last();
                    let mut outline = Outline::default();
                    outline.push(map(to), true);
                    shape.outlines.push(outline);
                }
                PathCommand::LineTo { to } => {
                    shape.current().push(map(to), true);
                }
                PathCommand::QuadTo { ctrl, to } => {
                    let outline = shape.current();
                    outline.push(map(ctrl), false);
                    outline.push(map(to), true);
                }
                PathCommand::Close => shape.close_last(),
            }
        }
        shape
    }

    /// Outline shape of a glyph in font units
    pub fn for_glyph(glyph: &Glyph) -> Self {
        Self::from_commands(&build_path(glyph), Affine::IDENTITY)
    }

    pub fn outlines(&self) -> &[Outline] {
        &self.outlines
    }

    pub fn vertex_count(&self) -> usize {
        self.outlines.iter().map(Outline::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.outlines.iter().all(Outline::is_empty)
    }

    // Segments without a preceding move start an implicit outline
    fn current(&mut self) -> &mut Outline {
        if self.outlines.last().map_or(true, |o| o.closed) {
            self.outlines.push(Outline::default());
        }
        let last = self.outlines.len() - 1;
        &mut self.outlines[last]
    }

    fn close_last(&mut self) {
        if let Some(outline) = self.outlines.last_mut() {
            outline.close();
        }
    }
}

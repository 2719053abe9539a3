use std::cmp::Reverse;
use std::collections::BinaryHeap;

use mapfile::MapFeatureData;

use crate::projection::Projection;
use crate::shape::{PlanarBounds, Shape};
use crate::tessellate::tessellate;

/// Shapes waiting to be drawn, plus the extent of everything pushed so far.
///
/// Shapes come back out lowest z-index first; shapes with the same z-index
/// come back in the order they were pushed.
#[derive(Debug, Default)]
pub struct Scene {
    bounds: PlanarBounds,
    shapes: Vec<Option<Shape>>,
    queue: BinaryHeap<Reverse<(i32, usize)>>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tessellate `feature` and queue the result. Returns the queued shape,
    /// or `None` when the feature has nothing to draw.
    pub fn tessellate<P>(&mut self, feature: &MapFeatureData<'_>, projection: &P) -> Option<&Shape>
    where
        P: Projection + ?Sized,
    {
        let shape = tessellate(feature, projection)?;
        self.push(shape);
        self.shapes.last()?.as_ref()
    }

    pub fn push(&mut self, shape: Shape) {
        for point in &shape.points {
            self.bounds.include(*point);
        }

        let seq = self.shapes.len();
        self.queue.push(Reverse((shape.z_index(), seq)));
        self.shapes.push(Some(shape));
    }

    /// Remove the next shape in drawing order.
    pub fn pop(&mut self) -> Option<Shape> {
        let Reverse((_, seq)) = self.queue.pop()?;
        let shape = self.shapes[seq].take();
        if self.queue.is_empty() {
            self.shapes.clear();
        }
        shape
    }

    /// Extent of every point pushed since the scene was created. Popping does
    /// not shrink it.
    pub fn bounds(&self) -> PlanarBounds {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Iterator for Scene {
    type Item = Shape;

    fn next(&mut self) -> Option<Shape> {
        self.pop()
    }
}

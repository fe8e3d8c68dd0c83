use glam::Vec3;

/// Axis-aligned bounding box over loaded mesh geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Build a box over a flat `[x, y, z, x, y, z, ...]` position array.
    /// Returns `None` when there is no complete point in the input.
    pub fn from_positions(positions: &[f32]) -> Option<Aabb> {
        let mut points = positions.chunks_exact(3);
        let first = points.next()?;
        let mut min = Vec3::new(first[0], first[1], first[2]);
        let mut max = min;
        for p in points {
            let v = Vec3::new(p[0], p[1], p[2]);
            min = min.min(v);
            max = max.max(v);
        }
        Some(Aabb { min, max })
    }

    /// Smallest box containing both boxes.
    pub fn merge(self, other: Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Edge lengths along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Corner-to-corner length: sqrt(x² + y² + z²) of the size vector.
    /// This is the measure the size normalizer compares against thresholds.
    pub fn diagonal(&self) -> f32 {
        self.size().length()
    }
}

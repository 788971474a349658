/// Axis-aligned bounding box.
///
/// Always satisfies `min_x <= max_x` and `min_y <= max_y`; constructors that
/// would break this return `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Creates a box from its edges, or `None` for an inverted or non-finite box.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Option<Self> {
        let finite = [min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite());
        if !finite || min_x > max_x || min_y > max_y {
            return None;
        }
        Some(Self { min_x, min_y, max_x, max_y })
    }

    /// Creates a box from an origin and a size.
    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Option<Self> {
        Self::new(x, y, x + width, y + height)
    }

    /// A zero-sized box at one point.
    pub fn from_point(x: f64, y: f64) -> Self {
        Self { min_x: x, min_y: y, max_x: x, max_y: y }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Grows the box to cover `(x, y)`.
    pub fn include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn union(self, other: BoundingBox) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// Merge two optional bounding boxes into one
pub fn merge_bounds(a: Option<BoundingBox>, b: Option<BoundingBox>) -> Option<BoundingBox> {
    match (a, b) {
        (Some(existing), Some(next)) => Some(existing.union(next)),
        (existing, None) => existing,
        (None, next) => next,
    }
}

/// Grows an optional box to cover a point, starting one if needed.
///
/// Non-finite points are skipped.
pub fn include_point(bounds: &mut Option<BoundingBox>, x: f64, y: f64) {
    if !x.is_finite() || !y.is_finite() {
        return;
    }
    match bounds {
        Some(b) => b.include(x, y),
        None => *bounds = Some(BoundingBox::from_point(x, y)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_boxes() {
        assert!(BoundingBox::new(0.0, 0.0, 1.0, 1.0).is_some());
        assert!(BoundingBox::new(2.0, 0.0, 1.0, 1.0).is_none());
        assert!(BoundingBox::from_rect(0.0, 0.0, 10.0, -1.0).is_none());
        assert!(BoundingBox::new(f64::NAN, 0.0, 1.0, 1.0).is_none());
    }

    #[test]
    fn test_merge_bounds() {
        let a = BoundingBox::from_rect(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::from_rect(-5.0, 5.0, 10.0, 10.0);
        let merged = merge_bounds(a, b).unwrap();
        assert_eq!(merged, BoundingBox::new(-5.0, 0.0, 10.0, 15.0).unwrap());
        assert_eq!(merge_bounds(None, a), a);
        assert_eq!(merge_bounds(a, None), a);
        assert_eq!(merge_bounds(None, None), None);
    }

    #[test]
    fn test_include_point() {
        let mut bounds = None;
        include_point(&mut bounds, 3.0, 4.0);
        include_point(&mut bounds, -1.0, 10.0);
        let b = bounds.unwrap();
        assert_eq!((b.width(), b.height()), (4.0, 6.0));
        assert!(b.contains(0.0, 5.0));
        assert!(!b.contains(0.0, 11.0));
    }

    #[test]
    fn test_include_point_skips_non_finite() {
        let mut bounds = None;
        include_point(&mut bounds, f64::INFINITY, 0.0);
        assert_eq!(bounds, None);

        include_point(&mut bounds, 1.0, 2.0);
        include_point(&mut bounds, 5.0, f64::NAN);
        include_point(&mut bounds, f64::NEG_INFINITY, 3.0);
        assert_eq!(bounds, BoundingBox::new(1.0, 2.0, 1.0, 2.0));
    }
}

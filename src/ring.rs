//! Temporary container for a simple connected polyline.
//!
//! A ring might be closed, in which case its winding tells whether it
//! is an exterior shell (clockwise) or a hole (counter-clockwise). A
//! closed ring stores its first coordinate again as its last. The ring
//! is assumed to contain distinct consecutive points only.

/// Growable ordered vertex list used during edge assembly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ring {
    points: Vec<(f64, f64)>,
}

impl Ring {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a ring from a single edge.
    pub fn from_edge(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { points: vec![(x1, y1), (x2, y2)] }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn first(&self) -> (f64, f64) {
        self.points[0]
    }

    pub fn last(&self) -> (f64, f64) {
        self.points[self.points.len() - 1]
    }

    pub fn closed(&self) -> bool {
        !self.points.is_empty() && self.first() == self.last()
    }

    /// Signed area by the shoelace formula in trapezoid form.
    /// Positive for clockwise rings when y grows upward.
    pub fn signed_area(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        let mut area = 0.0;
        for pair in self.points.windows(2) {
            let (x1, y1) = pair[0];
            let (x2, y2) = pair[1];
            area += (x2 - x1) * (y1 + y2);
        }
        area / 2.0
    }

    /// Treating zero-size holes as counter-clockwise leads to trouble,
    /// hence equality is included.
    pub fn is_clockwise(&self) -> bool {
        self.signed_area() >= 0.0
    }

    /// Append an edge at the end. Fails when the edge does not start at
    /// the current endpoint.
    pub fn extend_end(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> bool {
        if self.last() != (x1, y1) {
            return false;
        }
        self.points.push((x2, y2));
        true
    }

    /// Prepend another polyline whose end meets this ring's start. The
    /// other polyline is consumed; on mismatch it is handed back.
    pub fn extend_start(&mut self, other: Ring) -> Result<(), Ring> {
        if self.points.is_empty() || other.points.is_empty() || self.first() != other.last() {
            return Err(other);
        }
        let mut merged = other.points;
        merged.extend_from_slice(&self.points[1..]);
        self.points = merged;
        Ok(())
    }

    /// Direction of the final segment in degrees.
    pub fn end_angle(&self) -> f64 {
        let n = self.points.len();
        let (x1, y1) = self.points[n - 2];
        let (x2, y2) = self.points[n - 1];
        (y2 - y1).atan2(x2 - x1).to_degrees()
    }

    /// Extract the self-touching ring at the end: scanning backwards
    /// from the second-to-last vertex, find the previous occurrence of
    /// the endpoint and split the closed loop off, keeping the shared
    /// vertex in both parts. Returns `None` if no repeat exists, which
    /// means the caller misdetected a self-touch.
    pub fn remove_self_touch(&mut self) -> Option<Ring> {
        let (x, y) = self.last();
        let n = self.points.len();
        for i in (1..n - 1).rev() {
            if self.points[i] == (x, y) {
                let ring = Ring { points: self.points[i..].to_vec() };
                self.points.truncate(i + 1);
                return Some(ring);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_area_winding() {
        // Clockwise unit square when y grows upward.
        let mut ring = Ring::from_edge(0.0, 0.0, 0.0, 1.0);
        assert!(ring.extend_end(0.0, 1.0, 1.0, 1.0));
        assert!(ring.extend_end(1.0, 1.0, 1.0, 0.0));
        assert!(ring.extend_end(1.0, 0.0, 0.0, 0.0));
        assert!(ring.closed());
        assert_eq!(ring.signed_area(), 1.0);
        assert!(ring.is_clockwise());

        // The reverse walk is a hole.
        let mut hole = Ring::from_edge(0.0, 0.0, 1.0, 0.0);
        assert!(hole.extend_end(1.0, 0.0, 1.0, 1.0));
        assert!(hole.extend_end(1.0, 1.0, 0.0, 1.0));
        assert!(hole.extend_end(0.0, 1.0, 0.0, 0.0));
        assert_eq!(hole.signed_area(), -1.0);
        assert!(!hole.is_clockwise());
    }

    #[test]
    fn test_extend_end_rejects_mismatch() {
        let mut ring = Ring::from_edge(0.0, 0.0, 1.0, 0.0);
        assert!(!ring.extend_end(2.0, 2.0, 3.0, 3.0));
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn test_extend_start() {
        let mut ring = Ring::from_edge(1.0, 1.0, 2.0, 2.0);
        let other = Ring::from_edge(0.0, 0.0, 1.0, 1.0);
        ring.extend_start(other).unwrap();
        assert_eq!(ring.points(), &[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);

        let mismatched = Ring::from_edge(5.0, 5.0, 6.0, 6.0);
        let back = ring.extend_start(mismatched).unwrap_err();
        assert_eq!(back.points(), &[(5.0, 5.0), (6.0, 6.0)]);
    }

    #[test]
    fn test_remove_self_touch() {
        // Figure-eight through (1,0): a loop is pinched off the tail.
        let mut ring = Ring::from_edge(0.0, 0.0, 1.0, 0.0);
        ring.extend_end(1.0, 0.0, 2.0, 0.0);
        ring.extend_end(2.0, 0.0, 2.0, 1.0);
        ring.extend_end(2.0, 1.0, 1.0, 0.0);

        let cut = ring.remove_self_touch().unwrap();
        assert_eq!(cut.points(), &[(1.0, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 0.0)]);
        assert!(cut.closed());
        assert_eq!(ring.points(), &[(0.0, 0.0), (1.0, 0.0)]);
    }

    #[test]
    fn test_remove_self_touch_without_repeat() {
        let mut ring = Ring::from_edge(0.0, 0.0, 1.0, 0.0);
        ring.extend_end(1.0, 0.0, 2.0, 0.0);
        assert!(ring.remove_self_touch().is_none());
    }

    #[test]
    fn test_end_angle() {
        let ring = Ring::from_edge(0.0, 0.0, 1.0, 1.0);
        assert!((ring.end_angle() - 45.0).abs() < 1e-12);
    }
}

/// Number of samples in every generated sequence.
pub const SEQUENCE_LEN: usize = 50;
/// Model input length: every sample except the final target.
pub const WINDOW_LEN: usize = SEQUENCE_LEN - 1;

/// A single sample of a wave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Parameters drawn for one wave. Used transiently during generation; the
/// resulting sequence does not keep them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    pub amplitude: f64,
    pub period: f64,
    pub negative: bool,
}

/// An immutable generated wave: points with x ascending over [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    points: Vec<Point>,
}

impl Sequence {
    pub fn new(points: Vec<Point>) -> Self {
        Sequence { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Every point except the last (the part the model sees).
    pub fn window(&self) -> &[Point] {
        let end = self.points.len().saturating_sub(1);
        &self.points[..end]
    }

    /// The final point (the value the model predicts).
    pub fn target(&self) -> Option<Point> {
        self.points.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Sequence {
        let points = (0..n)
            .map(|j| Point {
                x: j as f64,
                y: j as f64 * 2.0,
            })
            .collect();
        Sequence::new(points)
    }

    #[test]
    fn test_window_excludes_target() {
        let seq = ramp(SEQUENCE_LEN);
        assert_eq!(seq.window().len(), WINDOW_LEN);
        assert_eq!(seq.target().unwrap().y, (SEQUENCE_LEN as f64 - 1.0) * 2.0);
        // Window ends one point before the target
        assert_eq!(seq.window().last().unwrap().y, (WINDOW_LEN as f64 - 1.0) * 2.0);
    }

    #[test]
    fn test_empty_sequence() {
        let seq = Sequence::new(vec![]);
        assert!(seq.is_empty());
        assert!(seq.window().is_empty());
        assert!(seq.target().is_none());
    }
}

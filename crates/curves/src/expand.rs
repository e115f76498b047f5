//! Lays curves out as "lines adjacency" index streams.
//!
//! Each segment of a curve is described by four indices: the point before the
//! segment, its two endpoints, and the point after it. The outer two are only
//! used to orient the joints. To give the first and last segments a
//! neighborhood, the curve is padded by repeating its first and last points,
//! which makes their joints square.
//!
//! ```text
//! curve:    a b c d
//! padded:   a a b c d d
//! windows:  [a a b c] [a b c d] [b c d d]
//! ```

use crate::{CurveError, PointIndex};

/// The four indices describing one segment: previous, start, end, next.
pub type Window = [PointIndex; 4];

/// Returns the curve with its first and last indices duplicated.
///
/// An empty curve stays empty.
pub fn padded(curve: &[PointIndex]) -> Vec<PointIndex> {
    let (first, last) = match (curve.first(), curve.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Vec::new(),
    };

    let mut result = Vec::with_capacity(curve.len() + 2);
    result.push(first);
    result.extend_from_slice(curve);
    result.push(last);

    result
}

/// Number of segments a curve produces.
#[inline]
pub fn num_segments(curve: &[PointIndex]) -> usize {
    curve.len().saturating_sub(1)
}

/// Iterates over the windows of a curve, without allocating the padded curve.
///
/// Curves with fewer than two points produce nothing.
pub fn segments(curve: &[PointIndex]) -> Segments<'_> {
    Segments {
        curve,
        current: 0,
        count: num_segments(curve),
    }
}

/// Iterator over the windows of a curve, see [segments](fn.segments.html).
#[derive(Clone, Debug)]
pub struct Segments<'l> {
    curve: &'l [PointIndex],
    current: usize,
    count: usize,
}

impl<'l> Iterator for Segments<'l> {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        if self.current >= self.count {
            return None;
        }

        let i = self.current;
        let last = self.curve.len() - 1;
        self.current += 1;

        Some([
            self.curve[i.saturating_sub(1)],
            self.curve[i],
            self.curve[i + 1],
            self.curve[(i + 2).min(last)],
        ])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.count - self.current;
        (n, Some(n))
    }
}

impl<'l> ExactSizeIterator for Segments<'l> {}

/// Concatenates the windows of all curves into a single index stream, four
/// indices per segment.
pub fn adjacency_indices<C: AsRef<[PointIndex]>>(curves: &[C]) -> Vec<PointIndex> {
    let num_indices = curves
        .iter()
        .map(|c| num_segments(c.as_ref()) * 4)
        .sum();

    let mut indices = Vec::with_capacity(num_indices);
    for curve in curves {
        for window in segments(curve.as_ref()) {
            indices.extend_from_slice(&window);
        }
    }

    indices
}

/// Checks that every index of every curve is below `num_points`.
pub fn validate_curves<C: AsRef<[PointIndex]>>(
    curves: &[C],
    num_points: usize,
) -> Result<(), CurveError> {
    for (curve_idx, curve) in curves.iter().enumerate() {
        if let Some(&index) = curve
            .as_ref()
            .iter()
            .find(|&&index| index as usize >= num_points)
        {
            return Err(CurveError::IndexOutOfRange {
                curve: curve_idx,
                index,
                len: num_points,
            });
        }
    }

    Ok(())
}

#[test]
fn padding() {
    assert_eq!(padded(&[1, 2, 3]), vec![1, 1, 2, 3, 3]);
    assert_eq!(padded(&[7]), vec![7, 7, 7]);
    assert!(padded(&[]).is_empty());
}

#[test]
fn windows_match_padded_curve() {
    let curve = [4, 8, 15, 16, 23];
    let expected: Vec<Window> = padded(&curve)
        .windows(4)
        .map(|w| [w[0], w[1], w[2], w[3]])
        .collect();
    let windows: Vec<Window> = segments(&curve).collect();

    assert_eq!(windows, expected);
    assert_eq!(windows.len(), 4);
    assert_eq!(windows[0], [4, 4, 8, 15]);
    assert_eq!(windows[3], [15, 16, 23, 23]);
    assert_eq!(segments(&curve).len(), 4);
}

#[test]
fn short_curves() {
    assert_eq!(segments(&[]).count(), 0);
    assert_eq!(segments(&[3]).count(), 0);
    assert_eq!(segments(&[3, 5]).collect::<Vec<_>>(), vec![[3, 3, 5, 5]]);
}

#[test]
fn index_stream() {
    let curves = vec![vec![0, 1, 2], vec![9], vec![], vec![3, 4]];
    assert_eq!(
        adjacency_indices(&curves),
        vec![0, 0, 1, 2, 0, 1, 2, 2, 3, 3, 4, 4]
    );

    let none: Vec<Vec<PointIndex>> = Vec::new();
    assert!(adjacency_indices(&none).is_empty());
}

#[test]
fn validation() {
    let curves = vec![vec![0, 1, 2], vec![2, 5]];
    assert_eq!(validate_curves(&curves, 6), Ok(()));
    assert_eq!(
        validate_curves(&curves, 5),
        Err(CurveError::IndexOutOfRange {
            curve: 1,
            index: 5,
            len: 5
        })
    );
}

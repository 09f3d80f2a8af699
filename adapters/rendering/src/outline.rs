use glam::Vec2;
use ridgeline_core::Rect;

/// Single drawing instruction of a closed silhouette outline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathSegment {
    /// Starts the outline at a point.
    MoveTo(Vec2),
    /// Straight line to a point.
    LineTo(Vec2),
    /// Quadratic Bézier curve to `to` bending towards `control`.
    QuadTo {
        /// Control point.
        control: Vec2,
        /// End point.
        to: Vec2,
    },
    /// Closes the outline back to its starting point.
    Close,
}

/// Closed outline of a silhouette in viewport coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OutlinePath {
    segments: Vec<PathSegment>,
}

impl OutlinePath {
    /// Drawing instructions in order.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Reports whether the outline draws nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Builds the filled outline below a projected ridge.
///
/// The ridge is traced from left to right, then closed along the bottom edge
/// of `rect`. Rounded outlines curve through the midpoints of consecutive
/// ridge points using the earlier point as control. Ridges with fewer than
/// two points produce an empty outline.
#[must_use]
pub fn outline_path(ridge: &[Vec2], rect: Rect, rounded: bool) -> OutlinePath {
    let [first, .., last] = ridge else {
        return OutlinePath::default();
    };

    let mut segments = Vec::with_capacity(ridge.len() + 4);
    segments.push(PathSegment::MoveTo(*first));

    if rounded {
        segments.extend(ridge.windows(2).map(|pair| PathSegment::QuadTo {
            control: pair[0],
            to: pair[0].lerp(pair[1], 0.5),
        }));
        segments.push(PathSegment::LineTo(*last));
    } else {
        segments.extend(ridge[1..].iter().copied().map(PathSegment::LineTo));
    }

    let bottom = rect.max_y() as f32;
    segments.push(PathSegment::LineTo(Vec2::new(rect.max_x() as f32, bottom)));
    segments.push(PathSegment::LineTo(Vec2::new(rect.min_x as f32, bottom)));
    segments.push(PathSegment::Close);

    OutlinePath { segments }
}

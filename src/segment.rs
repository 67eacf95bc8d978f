//! Path Segmentation Module
//!
//! Splits a day path into render-safe segments and projects them into
//! SVG-style path strings on an equirectangular viewport (azimuth on x,
//! altitude on y).
//!
//! Two rules decide where a segment ends:
//! - the grouping key changes (sun zone), or
//! - consecutive azimuths jump by more than the wrap threshold (359° -> 0°).
//!
//! At a wraparound the closing segment is extended to the viewport edge it
//! exits through and the next one starts from the opposite edge, both at the
//! linearly interpolated crossing altitude. No emitted line ever spans the
//! whole panorama.

use std::fmt::Write as _;

use serde::Serialize;

use crate::path::PathPoint;
use crate::zone::Zone;

/// Azimuth jump above which two consecutive samples are treated as a wraparound
pub const DEFAULT_WRAP_THRESHOLD_DEG: f64 = 300.0;

// ===================== VIEWPORT =====================

/// Pixel size of the panorama the paths are projected onto.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Azimuth 0..360 maps linearly onto 0..width.
    pub fn map_x(&self, azimuth_deg: f64) -> f64 {
        azimuth_deg / 360.0 * self.width
    }

    /// The horizon sits at mid-height; zenith at 0, nadir at `height`.
    pub fn map_y(&self, altitude_deg: f64) -> f64 {
        self.height / 2.0 - altitude_deg / 90.0 * self.height / 2.0
    }
}

// ===================== PATH STRINGS =====================

/// Incremental `M x y L x y ...` builder with one-decimal coordinates.
#[derive(Debug, Default)]
pub struct PathStringBuilder {
    d: String,
}

impl PathStringBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.command('M', x, y)
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.command('L', x, y)
    }

    pub fn is_empty(&self) -> bool {
        self.d.is_empty()
    }

    pub fn finish(self) -> String {
        self.d
    }

    fn command(&mut self, cmd: char, x: f64, y: f64) -> &mut Self {
        if !self.d.is_empty() {
            self.d.push(' ');
        }
        // Writing into a String cannot fail
        let _ = write!(self.d, "{} {:.1} {:.1}", cmd, x, y);
        self
    }
}

// ===================== WRAPAROUND =====================

/// Which side of the viewport a synthetic edge point sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    /// Azimuth 0°, x = 0
    Left,
    /// Azimuth 360°, x = width
    Right,
}

impl Edge {
    fn opposite(self) -> Edge {
        match self {
            Edge::Left => Edge::Right,
            Edge::Right => Edge::Left,
        }
    }

    fn x(self, viewport: &Viewport) -> f64 {
        match self {
            Edge::Left => 0.0,
            Edge::Right => viewport.width,
        }
    }
}

/// Synthetic point where a path meets the viewport edge at a wraparound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgePoint {
    pub edge: Edge,
    pub altitude_deg: f64,
    pub x: f64,
    pub y: f64,
}

impl EdgePoint {
    fn new(edge: Edge, altitude_deg: f64, viewport: &Viewport) -> Self {
        Self { edge, altitude_deg, x: edge.x(viewport), y: viewport.map_y(altitude_deg) }
    }
}

/// Where a path leaves the viewport between two samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapCrossing {
    /// Edge the outgoing line runs into
    pub exit: Edge,
    /// Interpolated altitude at the crossing
    pub altitude_deg: f64,
}

impl WrapCrossing {
    pub fn entry(&self) -> Edge {
        self.exit.opposite()
    }
}

/// Detect a wraparound between two consecutive samples.
///
/// An increasing crossing (350° -> 5°) exits on the right edge, a decreasing
/// one (5° -> 350°) on the left. The crossing altitude is interpolated over
/// the short way round the circle.
pub fn wrap_crossing(
    prev: &PathPoint,
    next: &PathPoint,
    threshold_deg: f64,
) -> Option<WrapCrossing> {
    let delta = next.azimuth_deg - prev.azimuth_deg;
    if delta.abs() <= threshold_deg {
        return None;
    }

    let (exit, to_edge, span) = if delta < 0.0 {
        let to_edge = 360.0 - prev.azimuth_deg;
        (Edge::Right, to_edge, to_edge + next.azimuth_deg)
    } else {
        let to_edge = prev.azimuth_deg;
        (Edge::Left, to_edge, to_edge + 360.0 - next.azimuth_deg)
    };
    let t = if span == 0.0 { 0.0 } else { to_edge / span };
    let altitude_deg = prev.altitude_deg + (next.altitude_deg - prev.altitude_deg) * t;

    Some(WrapCrossing { exit, altitude_deg })
}

/// Project an arbitrary run of points into one path string, breaking the
/// line at every wraparound.
pub fn safe_path(points: &[PathPoint], viewport: &Viewport, threshold_deg: f64) -> String {
    let mut b = PathStringBuilder::new();
    let mut prev: Option<&PathPoint> = None;

    for p in points {
        let (x, y) = (viewport.map_x(p.azimuth_deg), viewport.map_y(p.altitude_deg));
        match prev {
            None => {
                b.move_to(x, y);
            }
            Some(q) => {
                if let Some(c) = wrap_crossing(q, p, threshold_deg) {
                    let edge_y = viewport.map_y(c.altitude_deg);
                    b.line_to(c.exit.x(viewport), edge_y);
                    b.move_to(c.entry().x(viewport), edge_y);
                }
                b.line_to(x, y);
            }
        }
        prev = Some(p);
    }
    b.finish()
}

// ===================== SEGMENTS =====================

/// What a segment is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SegmentTag {
    Zone { zone: Zone },
    /// Mean illuminated fraction of the samples that carry one
    Phase { average_phase: Option<f64> },
}

/// A render-safe stretch of a day path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathSegment {
    pub tag: SegmentTag,
    /// Real samples only, in order
    pub points: Vec<PathPoint>,
    pub lead_in: Option<EdgePoint>,
    pub lead_out: Option<EdgePoint>,
    /// Projected `M ... L ...` string including edge points
    pub path: String,
}

impl PathSegment {
    /// Number of synthetic edge points (0, 1 or 2).
    pub fn edge_count(&self) -> usize {
        usize::from(self.lead_in.is_some()) + usize::from(self.lead_out.is_some())
    }
}

/// Segment a sun-like path by altitude zone and wraparound.
pub fn segment_by_zone(
    points: &[PathPoint],
    viewport: &Viewport,
    threshold_deg: f64,
) -> Vec<PathSegment> {
    split_segments(
        points,
        viewport,
        threshold_deg,
        |p| Zone::classify(p.altitude_deg),
        |zone, _| SegmentTag::Zone { zone: *zone },
    )
}

/// Segment a moon path. Splits only at wraparounds; each segment is tagged
/// with its average phase.
pub fn segment_by_phase(
    points: &[PathPoint],
    viewport: &Viewport,
    threshold_deg: f64,
) -> Vec<PathSegment> {
    split_segments(
        points,
        viewport,
        threshold_deg,
        |_| (),
        |_, run| SegmentTag::Phase { average_phase: average_phase(run) },
    )
}

fn average_phase(points: &[PathPoint]) -> Option<f64> {
    let (sum, n) = points
        .iter()
        .filter_map(|p| p.phase_fraction)
        .fold((0.0, 0usize), |(s, n), f| (s + f, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Core splitter: a new run starts whenever `key` changes between
/// consecutive points or a wraparound is detected.
fn split_segments<K, FK, FT>(
    points: &[PathPoint],
    viewport: &Viewport,
    threshold_deg: f64,
    key: FK,
    tag: FT,
) -> Vec<PathSegment>
where
    K: PartialEq,
    FK: Fn(&PathPoint) -> K,
    FT: Fn(&K, &[PathPoint]) -> SegmentTag,
{
    let mut segments = Vec::new();
    let Some(first) = points.first() else {
        return segments;
    };

    let mut run_key = key(first);
    let mut run: Vec<PathPoint> = vec![*first];
    let mut lead_in: Option<EdgePoint> = None;

    for pair in points.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        let next_key = key(next);
        let crossing = wrap_crossing(prev, next, threshold_deg);

        if crossing.is_none() && next_key == run_key {
            run.push(*next);
            continue;
        }

        let lead_out = crossing.map(|c| EdgePoint::new(c.exit, c.altitude_deg, viewport));
        let closed = std::mem::replace(&mut run, vec![*next]);
        let closed_tag = tag(&run_key, &closed);
        segments.push(finish_segment(closed_tag, closed, lead_in, lead_out, viewport));

        lead_in = crossing.map(|c| EdgePoint::new(c.entry(), c.altitude_deg, viewport));
        run_key = next_key;
    }

    let last_tag = tag(&run_key, &run);
    segments.push(finish_segment(last_tag, run, lead_in, None, viewport));
    segments
}

fn finish_segment(
    tag: SegmentTag,
    points: Vec<PathPoint>,
    lead_in: Option<EdgePoint>,
    lead_out: Option<EdgePoint>,
    viewport: &Viewport,
) -> PathSegment {
    let mut b = PathStringBuilder::new();
    if let Some(e) = lead_in {
        b.move_to(e.x, e.y);
    }
    for p in &points {
        let (x, y) = (viewport.map_x(p.azimuth_deg), viewport.map_y(p.altitude_deg));
        if b.is_empty() {
            b.move_to(x, y);
        } else {
            b.line_to(x, y);
        }
    }
    if let Some(e) = lead_out {
        b.line_to(e.x, e.y);
    }

    PathSegment { tag, points, lead_in, lead_out, path: b.finish() }
}

// ===================== TESTS =====================

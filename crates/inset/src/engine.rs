//! The inset pipeline.

use std::cmp::Ordering;

use toolpath_core::{
    distance, is_convex_vertex, same_same, Error, PlannerConfig, Result, Segment2, Vector2,
};

use crate::scad::ScadDump;

/// Miter rays are stretched by this multiple of the inset distance when
/// the caller does not override it.
pub const DEFAULT_ELONGATION_FACTOR: f64 = 100.0;

/// Unit normal of `seg` pointing into the material.
///
/// Material lies to the left of travel, so this is the segment direction
/// rotated a quarter turn counter-clockwise. Zero-length segments have no
/// normal and yield the zero vector.
fn inset_direction(seg: &Segment2) -> Vector2 {
    let d = seg.direction();
    Vector2::new(-d.y, d.x)
        .try_normalize(f64::EPSILON)
        .unwrap_or_else(Vector2::zeros)
}

/// Computes the inward bisector at the start vertex of every segment.
///
/// The bisector averages the inward normals of the two edges meeting at the
/// vertex. Consecutive segments must share their vertex within `tolerance`,
/// otherwise the polygon is open and the inset fails.
fn create_bisectors(segments: &[Segment2], tolerance: f64) -> Result<Vec<Vector2>> {
    let n = segments.len();
    let mut bisectors = Vec::with_capacity(n);
    for i in 0..n {
        let prev_id = (i + n - 1) % n;
        let prev = &segments[prev_id];
        let seg = &segments[i];
        if !same_same(&prev.b, &seg.a, tolerance) {
            return Err(Error::OpenPolygon {
                index: prev_id,
                gap: distance(&prev.b, &seg.a),
            });
        }
        let direction = inset_direction(seg);
        let bisector = (inset_direction(prev) + direction)
            .try_normalize(f64::EPSILON)
            // A fully reversed edge pair has opposite normals; fall back to
            // the outgoing edge's normal.
            .unwrap_or(direction);
        bisectors.push(bisector);
    }
    Ok(bisectors)
}

/// Extends `first` forward and `next` backward by `elongation`, then joins
/// both at their intersection. Returns false if they still do not meet.
fn attach(first: &mut Segment2, next: &mut Segment2, elongation: f64) -> bool {
    let stretched_first = first.elongated(elongation, false, true);
    let stretched_next = next.elongated(elongation, true, false);
    match stretched_first.intersection(&stretched_next) {
        Some(p) => {
            first.b = p;
            next.a = p;
            true
        }
        None => false,
    }
}

/// Altitude from the side of length `base` in the triangle with side
/// lengths `base`, `e0`, `e1`.
///
/// Uses Kahan's stable area formula so near-degenerate triangles do not
/// suffer catastrophic cancellation. Returns `None` when the side lengths
/// do not form a proper triangle; the caller treats that as non-collapsing.
fn triangle_altitude(base: f64, e0: f64, e1: f64) -> Option<f64> {
    if base <= 0.0 {
        return None;
    }
    let mut s = [base, e0, e1];
    s.sort_by(|x, y| y.partial_cmp(x).unwrap_or(Ordering::Equal));
    let [a, b, c] = s;
    let t = (a + (b + c)) * (c - (a - b)) * (c + (a - b)) * (a + (b - c));
    if t <= 0.0 {
        return None;
    }
    let area = 0.25 * t.sqrt();
    Some(2.0 * area / base)
}

/// Tests whether `segment` vanishes before the inset reaches
/// `inset_distance`.
///
/// The bisector rays at the segment's endpoints are intersected as
/// infinite lines (the apex usually lies well beyond the unit bisectors
/// themselves); the segment collapses when the altitude of the resulting
/// triangle is below the inset distance. Parallel bisectors never
/// converge, so the segment survives.
fn edge_collapses(
    segment: &Segment2,
    bisector_start: &Vector2,
    bisector_end: &Vector2,
    inset_distance: f64,
) -> bool {
    let ray_start = Segment2::new(segment.a, segment.a + bisector_start);
    let ray_end = Segment2::new(segment.b, segment.b + bisector_end);
    let Some(apex) = ray_start.line_intersection(&ray_end) else {
        return false;
    };
    match triangle_altitude(
        segment.length(),
        distance(&segment.a, &apex),
        distance(&segment.b, &apex),
    ) {
        Some(altitude) => altitude < inset_distance,
        None => false,
    }
}

/// Drops every segment that collapses at `inset_distance`.
fn remove_collapsed(
    segments: &[Segment2],
    bisectors: &[Vector2],
    inset_distance: f64,
) -> Vec<Segment2> {
    let n = segments.len();
    let mut survivors = Vec::with_capacity(n);
    for (i, seg) in segments.iter().enumerate() {
        if edge_collapses(
            seg,
            &bisectors[i],
            &bisectors[(i + 1) % n],
            inset_distance,
        ) {
            log::debug!("segment {i} collapses at inset distance {inset_distance}");
        } else {
            survivors.push(*seg);
        }
    }
    survivors
}

/// Convexity of the vertex at the start of each segment.
fn classify_convexity(segments: &[Segment2]) -> Vec<bool> {
    let n = segments.len();
    (0..n)
        .map(|i| {
            let prev = &segments[(i + n - 1) % n];
            let seg = &segments[i];
            is_convex_vertex(&prev.a, &seg.a, &seg.b)
        })
        .collect()
}

/// Translates every segment inward by `inset_distance`.
fn offset_segments(segments: &[Segment2], inset_distance: f64) -> Vec<Segment2> {
    segments
        .iter()
        .map(|seg| {
            let step = inset_direction(seg) * inset_distance;
            Segment2::new(seg.a + step, seg.b + step)
        })
        .collect()
}

/// Miters each convex vertex by elongating the two adjacent offsets and
/// trimming both to their intersection.
///
/// Reflex vertices are left untouched; [`add_reflex_bridges`] closes them
/// afterwards. A convex pair that still fails to meet is a soft error and
/// stays untrimmed.
fn trim_convex_vertices(segments: &mut [Segment2], elongation: f64, convex: &[bool]) {
    let n = segments.len();
    for i in 0..n {
        let prev_id = (i + n - 1) % n;
        if prev_id == i {
            break;
        }
        if !convex[i] {
            continue;
        }
        let mut prev = segments[prev_id];
        let mut cur = segments[i];
        if attach(&mut prev, &mut cur, elongation) {
            segments[prev_id] = prev;
            segments[i] = cur;
        } else {
            log::warn!("miter trim failed at convex vertex {i}; segment left untrimmed");
        }
    }
}

/// Closes the ring at each reflex vertex with a straight bridging segment
/// between the facing endpoints of the two untrimmed offsets.
fn add_reflex_bridges(segments: &[Segment2], convex: &[bool]) -> Vec<Segment2> {
    let n = segments.len();
    let mut bridged = Vec::with_capacity(n * 2);
    for i in 0..n {
        if !convex[i] {
            let prev_id = (i + n - 1) % n;
            bridged.push(Segment2::new(segments[prev_id].b, segments[i].a));
        }
        bridged.push(segments[i]);
    }
    bridged
}

/// Merges segments shorter than `cutoff` into their successors.
///
/// Single pass: after a merge the walk advances past the absorbed segment
/// and the merged result is not re-tested, so a chain of short segments
/// shrinks by half per call rather than disappearing entirely.
fn merge_short_segments(segments: &[Segment2], cutoff: f64) -> Vec<Segment2> {
    let cutoff2 = cutoff * cutoff;
    let mut merged = Vec::with_capacity(segments.len());
    let mut i = 0;
    while i < segments.len() {
        let seg = segments[i];
        if seg.squared_length() < cutoff2 && i + 1 < segments.len() {
            merged.push(Segment2::new(seg.a, segments[i + 1].b));
            i += 2;
        } else {
            merged.push(seg);
            i += 1;
        }
    }
    merged
}

/// Insets a closed polygon inward by `distance`.
///
/// `segments` is the polygon's oriented edge ring (material to the left of
/// travel). Output segments shorter than `cutoff` are merged into their
/// successors; `cutoff` also serves as the closed-polygon adjacency
/// tolerance.
///
/// # Errors
///
/// - [`Error::TooFewSegments`] for inputs with fewer than two segments.
/// - [`Error::OpenPolygon`] when consecutive segments do not share their
///   vertex within `cutoff`.
/// - [`Error::CollapsedPolygon`] when fewer than two segments survive
///   collapse removal; the region has vanished at this depth.
pub fn inset(segments: &[Segment2], distance: f64, cutoff: f64) -> Result<Vec<Segment2>> {
    Insetter::new().inset(segments, distance, cutoff)
}

/// Stateful inset driver.
///
/// Carries the elongation policy and an optional OpenSCAD trace across
/// calls; a slicer typically keeps one `Insetter` per layer and calls
/// [`inset`](Self::inset) once per shell.
#[derive(Debug, Default)]
pub struct Insetter {
    elongation_factor: Option<f64>,
    dump: Option<ScadDump>,
}

impl Insetter {
    /// Creates an insetter with the default elongation policy and no trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an insetter using the engine configuration's elongation
    /// policy.
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new().with_elongation_factor(config.elongation_factor)
    }

    /// Overrides the ray elongation factor (a multiple of the inset
    /// distance).
    pub fn with_elongation_factor(mut self, factor: f64) -> Self {
        self.elongation_factor = Some(factor);
        self
    }

    /// Attaches an OpenSCAD trace; every subsequent call records its
    /// pipeline stages.
    pub fn with_scad_dump(mut self, dump: ScadDump) -> Self {
        self.dump = Some(dump);
        self
    }

    /// Insets a closed polygon inward by `distance`; see the free
    /// [`inset`] function for the contract.
    pub fn inset(
        &mut self,
        segments: &[Segment2],
        distance: f64,
        cutoff: f64,
    ) -> Result<Vec<Segment2>> {
        if segments.len() < 2 {
            return Err(Error::TooFewSegments(segments.len()));
        }
        let elongation = distance * self.elongation_factor.unwrap_or(DEFAULT_ELONGATION_FACTOR);

        let bisectors = create_bisectors(segments, cutoff)?;
        let survivors = remove_collapsed(segments, &bisectors, distance);
        log::debug!(
            "collapse removal kept {} of {} segments",
            survivors.len(),
            segments.len()
        );
        if survivors.len() < 2 {
            self.record(segments, &bisectors, &survivors, &[])?;
            return Err(Error::CollapsedPolygon);
        }

        let convex = classify_convexity(&survivors);
        let mut offsets = offset_segments(&survivors, distance);
        trim_convex_vertices(&mut offsets, elongation, &convex);
        let bridged = add_reflex_bridges(&offsets, &convex);
        let finals = merge_short_segments(&bridged, cutoff);

        self.record(segments, &bisectors, &survivors, &finals)?;
        Ok(finals)
    }

    /// Finalizes the OpenSCAD trace, if one was attached.
    pub fn finish(mut self) -> Result<()> {
        match self.dump.take() {
            Some(dump) => dump.close(),
            None => Ok(()),
        }
    }

    fn record(
        &mut self,
        outline: &[Segment2],
        bisectors: &[Vector2],
        survivors: &[Segment2],
        finals: &[Segment2],
    ) -> Result<()> {
        let Some(dump) = self.dump.as_mut() else {
            return Ok(());
        };
        dump.write_segments("outline", [0.0, 0.0, 1.0], outline)?;
        let traces: Vec<Segment2> = outline
            .iter()
            .zip(bisectors)
            .map(|(seg, bis)| Segment2::new(seg.a, seg.a + *bis * 2.0))
            .collect();
        dump.write_segments("bisector", [0.75, 0.5, 0.2], &traces)?;
        dump.write_segments("survivor", [0.5, 0.5, 0.0], survivors)?;
        dump.write_segments("inset", [0.0, 0.5, 0.0], finals)?;
        Ok(())
    }
}

use std::collections::HashMap;

use ndarray::Array2;
use tracing::{debug, warn};

use crate::classify::PixelClass;
use crate::georef::GeoTransform;

use super::regions::label_regions;

/// Pixel corner as `(x, y) = (col, row)`.
type Vertex = (usize, usize);

/// Outline of one class region in map coordinates.
///
/// Rings are open (first vertex not repeated). Orientation is left to the
/// writer.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassPolygon {
    pub class: PixelClass,
    pub exterior: Vec<(f64, f64)>,
    pub holes: Vec<Vec<(f64, f64)>>,
    pub pixel_count: usize,
}

impl ClassPolygon {
    pub fn value(&self) -> u8 {
        self.class.value()
    }
}

#[derive(Clone, Copy, Debug)]
struct Edge {
    from: Vertex,
    to: Vertex,
}

impl Edge {
    fn heading(&self) -> (isize, isize) {
        (
            self.to.0 as isize - self.from.0 as isize,
            self.to.1 as isize - self.from.1 as isize,
        )
    }
}

/// A traced ring in pixel-corner space with twice its signed area.
/// Positive area (rows growing downward) means the region lies inside.
struct PixelRing {
    vertices: Vec<Vertex>,
    area2: i64,
    /// A point strictly inside a pixel of the region, next to the ring.
    probe: (f64, f64),
}

/// Trace the outline of every 4-connected class region.
///
/// Each region yields one polygon with its enclosed holes. Background
/// regions are skipped unless `include_background` is set.
pub fn polygonize(
    classified: &Array2<u8>,
    transform: &GeoTransform,
    include_background: bool,
) -> Vec<ClassPolygon> {
    let map = label_regions(classified);
    let (h, w) = classified.dim();

    // Every boundary edge keeps its region on the right when walking from
    // `from` to `to` (x right, y down).
    let mut edges: Vec<Vec<Edge>> = vec![Vec::new(); map.regions.len()];
    for ((row, col), &lbl) in map.labels.indexed_iter() {
        let differs = |r: Option<usize>, c: Option<usize>| match (r, c) {
            (Some(r), Some(c)) if r < h && c < w => map.labels[[r, c]] != lbl,
            _ => true,
        };
        let region_edges = &mut edges[lbl as usize];
        let (x, y) = (col, row);
        if differs(row.checked_sub(1), Some(col)) {
            region_edges.push(Edge { from: (x, y), to: (x + 1, y) });
        }
        if differs(Some(row), Some(col + 1)) {
            region_edges.push(Edge { from: (x + 1, y), to: (x + 1, y + 1) });
        }
        if differs(Some(row + 1), Some(col)) {
            region_edges.push(Edge { from: (x + 1, y + 1), to: (x, y + 1) });
        }
        if differs(Some(row), col.checked_sub(1)) {
            region_edges.push(Edge { from: (x, y + 1), to: (x, y) });
        }
    }

    let mut polygons = Vec::new();
    for (region, region_edges) in map.regions.iter().zip(&edges) {
        let class = match PixelClass::from_value(region.value) {
            Some(class) => class,
            None => {
                warn!(value = region.value, "Skipping region with unknown class value");
                continue;
            }
        };
        if class == PixelClass::Background && !include_background {
            continue;
        }

        let rings = trace_rings(region_edges);
        let (mut exteriors, holes): (Vec<PixelRing>, Vec<PixelRing>) =
            rings.into_iter().partition(|r| r.area2 > 0);
        if exteriors.len() > 1 {
            debug!(
                region = region.index,
                rings = exteriors.len(),
                "Region outline split into several exterior rings"
            );
        }
        // Smallest first so each hole lands in its tightest enclosing ring.
        exteriors.sort_by(|a, b| a.area2.cmp(&b.area2));

        let mut assigned: Vec<Vec<PixelRing>> = exteriors.iter().map(|_| Vec::new()).collect();
        for hole in holes {
            let owner = exteriors
                .iter()
                .position(|ext| contains(&ext.vertices, hole.probe))
                .unwrap_or(exteriors.len().saturating_sub(1));
            if let Some(slot) = assigned.get_mut(owner) {
                slot.push(hole);
            }
        }

        for (ext, ext_holes) in exteriors.into_iter().zip(assigned) {
            let hole_area2: i64 = ext_holes.iter().map(|r| -r.area2).sum();
            polygons.push(ClassPolygon {
                class,
                exterior: to_geo(&ext.vertices, transform),
                holes: ext_holes.iter().map(|r| to_geo(&r.vertices, transform)).collect(),
                pixel_count: ((ext.area2 - hole_area2) / 2) as usize,
            });
        }
    }
    polygons
}

/// Chain a region's boundary edges into closed rings.
///
/// Where the outline touches itself at a corner the walk takes the left
/// turn, so a hole meeting the exterior at a single point stays its own ring.
fn trace_rings(edges: &[Edge]) -> Vec<PixelRing> {
    let mut outgoing: HashMap<Vertex, Vec<usize>> = HashMap::with_capacity(edges.len());
    for (i, e) in edges.iter().enumerate() {
        outgoing.entry(e.from).or_default().push(i);
    }

    let mut used = vec![false; edges.len()];
    let mut rings = Vec::new();
    for start in 0..edges.len() {
        if used[start] {
            continue;
        }
        let mut vertices = Vec::new();
        let mut current = start;
        loop {
            used[current] = true;
            let edge = edges[current];
            vertices.push(edge.from);

            let heading = edge.heading();
            let candidates = outgoing.get(&edge.to).map(Vec::as_slice).unwrap_or(&[]);
            let next = candidates
                .iter()
                .copied()
                .filter(|&i| !used[i] || i == start)
                .min_by_key(|&i| turn_rank(heading, edges[i].heading()));
            match next {
                Some(i) if i != start => current = i,
                _ => break,
            }
        }

        let vertices = drop_collinear(vertices);
        let area2 = signed_area2(&vertices);
        let probe = probe_point(&edges[start]);
        rings.push(PixelRing {
            vertices,
            area2,
            probe,
        });
    }
    rings
}

/// 0 for a left turn, 1 straight on, 2 right, 3 reversing (x right, y down).
fn turn_rank(from: (isize, isize), to: (isize, isize)) -> u8 {
    let (dx, dy) = from;
    if to == (dy, -dx) {
        0
    } else if to == from {
        1
    } else if to == (-dy, dx) {
        2
    } else {
        3
    }
}

fn drop_collinear(vertices: Vec<Vertex>) -> Vec<Vertex> {
    let n = vertices.len();
    if n < 3 {
        return vertices;
    }
    (0..n)
        .filter(|&i| {
            let prev = vertices[(i + n - 1) % n];
            let cur = vertices[i];
            let next = vertices[(i + 1) % n];
            let a = (cur.0 as isize - prev.0 as isize, cur.1 as isize - prev.1 as isize);
            let b = (next.0 as isize - cur.0 as isize, next.1 as isize - cur.1 as isize);
            a.0 * b.1 - a.1 * b.0 != 0
        })
        .map(|i| vertices[i])
        .collect()
}

fn signed_area2(vertices: &[Vertex]) -> i64 {
    let n = vertices.len();
    (0..n)
        .map(|i| {
            let (x0, y0) = vertices[i];
            let (x1, y1) = vertices[(i + 1) % n];
            x0 as i64 * y1 as i64 - x1 as i64 * y0 as i64
        })
        .sum()
}

/// Midpoint of the edge nudged a quarter pixel into the region.
fn probe_point(edge: &Edge) -> (f64, f64) {
    let (dx, dy) = edge.heading();
    let mx = (edge.from.0 + edge.to.0) as f64 / 2.0;
    let my = (edge.from.1 + edge.to.1) as f64 / 2.0;
    (mx - dy as f64 * 0.25, my + dx as f64 * 0.25)
}

/// Even-odd point-in-polygon test in pixel space.
fn contains(ring: &[Vertex], (px, py): (f64, f64)) -> bool {
    let n = ring.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (xi, yi) = (ring[i].0 as f64, ring[i].1 as f64);
        let (xj, yj) = (ring[j].0 as f64, ring[j].1 as f64);
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn to_geo(vertices: &[Vertex], transform: &GeoTransform) -> Vec<(f64, f64)> {
    vertices
        .iter()
        .map(|&(x, y)| transform.corner_to_geo(x as f64, y as f64))
        .collect()
}

use ndarray::Array2;

/// A 4-connected run of pixels sharing one value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    /// Dense index into [`RegionMap::regions`].
    pub index: usize,
    pub value: u8,
    pub area: usize,
}

/// Per-pixel region labels plus per-region stats.
#[derive(Clone, Debug)]
pub struct RegionMap {
    pub labels: Array2<u32>,
    /// Ordered by the raster position of each region's first pixel.
    pub regions: Vec<Region>,
}

/// Label equal-valued 4-connected regions with two-pass union-find.
///
/// Unlike foreground-only component labeling, every pixel belongs to some
/// region, background included.
pub fn label_regions(grid: &Array2<u8>) -> RegionMap {
    let (h, w) = grid.dim();
    if h == 0 || w == 0 {
        return RegionMap {
            labels: Array2::zeros((h, w)),
            regions: Vec::new(),
        };
    }

    let mut labels = Array2::<u32>::zeros((h, w));
    // Index 0 unused; provisional labels start at 1.
    let mut parent: Vec<u32> = vec![0; 2];
    let mut next_label: u32 = 1;

    for row in 0..h {
        for col in 0..w {
            let v = grid[[row, col]];
            let up = if row > 0 && grid[[row - 1, col]] == v {
                labels[[row - 1, col]]
            } else {
                0
            };
            let left = if col > 0 && grid[[row, col - 1]] == v {
                labels[[row, col - 1]]
            } else {
                0
            };

            labels[[row, col]] = match (up > 0, left > 0) {
                (false, false) => {
                    if next_label as usize >= parent.len() {
                        parent.resize(parent.len() * 2, 0);
                    }
                    parent[next_label as usize] = next_label;
                    next_label += 1;
                    next_label - 1
                }
                (true, false) => up,
                (false, true) => left,
                (true, true) => {
                    if up != left {
                        union(&mut parent, up, left);
                    }
                    up.min(left)
                }
            };
        }
    }

    // Resolve roots and compact them into dense indices in scan order.
    let mut dense = vec![u32::MAX; next_label as usize];
    let mut regions: Vec<Region> = Vec::new();
    for ((row, col), lbl) in labels.indexed_iter_mut() {
        let root = find(&parent, *lbl) as usize;
        if dense[root] == u32::MAX {
            dense[root] = regions.len() as u32;
            regions.push(Region {
                index: regions.len(),
                value: grid[[row, col]],
                area: 0,
            });
        }
        *lbl = dense[root];
        regions[dense[root] as usize].area += 1;
    }

    RegionMap { labels, regions }
}

fn find(parent: &[u32], mut x: u32) -> u32 {
    while parent[x as usize] != x {
        x = parent[x as usize];
    }
    x
}

fn union(parent: &mut [u32], a: u32, b: u32) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        let (small, big) = if ra < rb { (ra, rb) } else { (rb, ra) };
        parent[big as usize] = small;
    }
}

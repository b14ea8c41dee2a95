//! Static 3-d tree for exact nearest-neighbour queries.

use super::metric::distance_squared;

/// A point with the position of its source in the seed list.
#[derive(Debug, Clone, Copy)]
struct Entry {
    point: [f32; 3],
    index: u32,
}

/// Implicit balanced k-d tree.
///
/// Entries are stored so that the median of every sub-range sits at its
/// midpoint, split on axis `depth % 3`. No child pointers are needed.
#[derive(Debug, Clone, Default)]
pub(crate) struct KdTree {
    entries: Vec<Entry>,
}

/// Current best candidate during a search.
#[derive(Clone, Copy)]
struct Best {
    index: u32,
    dist: f32,
}

impl Best {
    /// Closer wins; equal distance falls back to the lower seed index.
    #[inline]
    fn offer(&mut self, entry: &Entry, dist: f32) {
        if dist < self.dist || (dist == self.dist && entry.index < self.index) {
            self.dist = dist;
            self.index = entry.index;
        }
    }
}

impl KdTree {
    pub(crate) fn build(points: impl IntoIterator<Item = [f32; 3]>) -> Self {
        let mut entries: Vec<Entry> = points
            .into_iter()
            .enumerate()
            .map(|(i, point)| Entry {
                point,
                index: i as u32,
            })
            .collect();
        arrange(&mut entries, 0);
        Self { entries }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Seed index of the point closest to `query`, or `None` when empty.
    pub(crate) fn nearest(&self, query: [f32; 3]) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        let mut best = Best {
            index: u32::MAX,
            dist: f32::INFINITY,
        };
        search(&self.entries, 0, query, &mut best);
        Some(best.index as usize)
    }
}

fn arrange(entries: &mut [Entry], depth: usize) {
    if entries.len() <= 1 {
        return;
    }
    let axis = depth % 3;
    let mid = entries.len() / 2;
    entries.select_nth_unstable_by(mid, |a, b| {
        a.point[axis]
            .total_cmp(&b.point[axis])
            .then(a.index.cmp(&b.index))
    });
    let (left, rest) = entries.split_at_mut(mid);
    arrange(left, depth + 1);
    arrange(&mut rest[1..], depth + 1);
}

fn search(entries: &[Entry], depth: usize, query: [f32; 3], best: &mut Best) {
    if entries.is_empty() {
        return;
    }
    let mid = entries.len() / 2;
    let node = &entries[mid];
    best.offer(node, distance_squared(node.point, query));

    let axis = depth % 3;
    let delta = query[axis] - node.point[axis];
    let (near, far) = if delta < 0.0 {
        (&entries[..mid], &entries[mid + 1..])
    } else {
        (&entries[mid + 1..], &entries[..mid])
    };

    search(near, depth + 1, query, best);
    // Equal distance must still be explored so ties resolve to the lowest index.
    if delta * delta <= best.dist {
        search(far, depth + 1, query, best);
    }
}

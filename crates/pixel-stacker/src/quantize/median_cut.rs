//! Adaptive palette construction by recursive median cut.

use std::collections::HashMap;

/// A color with the number of opaque pixels that carry it.
type Weighted = ([u8; 3], u32);

struct ColorBox {
    colors: Vec<Weighted>,
}

impl ColorBox {
    /// Widest channel and its range.
    fn widest_channel(&self) -> (usize, u8) {
        let mut best = (0, 0);
        for channel in 0..3 {
            let (lo, hi) = self
                .colors
                .iter()
                .fold((u8::MAX, u8::MIN), |(lo, hi), (c, _)| {
                    (lo.min(c[channel]), hi.max(c[channel]))
                });
            let range = hi - lo;
            if range > best.1 {
                best = (channel, range);
            }
        }
        best
    }

    /// Split at the pixel-weighted median of `channel`.
    ///
    /// Both halves are non-empty because the box holds at least two colors.
    fn split(mut self, channel: usize) -> (ColorBox, ColorBox) {
        self.colors
            .sort_unstable_by_key(|(c, _)| (c[channel], *c));

        let total: u64 = self.colors.iter().map(|&(_, n)| n as u64).sum();
        let mut running = 0u64;
        let mut cut = 1;
        for (i, &(_, n)) in self.colors.iter().enumerate() {
            running += n as u64;
            if running * 2 >= total {
                cut = i + 1;
                break;
            }
        }
        let cut = cut.clamp(1, self.colors.len() - 1);
        let upper = self.colors.split_off(cut);
        (self, ColorBox { colors: upper })
    }

    /// Pixel-weighted mean, rounded.
    fn average(&self) -> [u8; 3] {
        let mut sum = [0u64; 3];
        let mut count = 0u64;
        for &(c, n) in &self.colors {
            for channel in 0..3 {
                sum[channel] += c[channel] as u64 * n as u64;
            }
            count += n as u64;
        }
        sum.map(|s| ((s + count / 2) / count.max(1)) as u8)
    }
}

/// Build a palette of at most `max_colors` entries from weighted colors.
///
/// When the input already holds few enough distinct colors they are
/// returned unchanged. The result only depends on the histogram, never on
/// hash iteration order.
pub(crate) fn build_palette(histogram: &HashMap<[u8; 3], u32>, max_colors: usize) -> Vec<[u8; 3]> {
    let max_colors = max_colors.max(1);
    let mut colors: Vec<Weighted> = histogram.iter().map(|(&c, &n)| (c, n)).collect();
    colors.sort_unstable();

    if colors.len() <= max_colors {
        return colors.into_iter().map(|(c, _)| c).collect();
    }

    let mut boxes = vec![ColorBox { colors }];
    while boxes.len() < max_colors {
        // Widest splittable box; first one wins ties.
        let candidate = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.colors.len() > 1)
            .map(|(i, b)| (i, b.widest_channel()))
            .fold(None, |best: Option<(usize, (usize, u8))>, item| match best {
                Some((_, (_, range))) if range >= item.1 .1 => best,
                _ => Some(item),
            });
        let Some((index, (channel, _))) = candidate else {
            break;
        };
        let (lower, upper) = boxes.swap_remove(index).split(channel);
        boxes.push(lower);
        boxes.push(upper);
    }

    let mut palette: Vec<[u8; 3]> = boxes.iter().map(ColorBox::average).collect();
    palette.sort_unstable();
    palette.dedup();
    palette
}

/// Index of the closest palette entry by squared RGB distance; lowest index
/// wins ties.
#[inline]
pub(crate) fn nearest(palette: &[[u8; 3]], color: [f32; 3]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (i, p) in palette.iter().enumerate() {
        let dr = p[0] as f32 - color[0];
        let dg = p[1] as f32 - color[1];
        let db = p[2] as f32 - color[2];
        let dist = dr * dr + dg * dg + db * db;
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn histogram(colors: &[([u8; 3], u32)]) -> HashMap<[u8; 3], u32> {
        colors.iter().copied().collect()
    }

    #[test]
    fn test_few_colors_pass_through() {
        let hist = histogram(&[([10, 20, 30], 5), ([200, 0, 0], 1)]);
        let palette = build_palette(&hist, 4);
        assert_eq!(palette, vec![[10, 20, 30], [200, 0, 0]]);
    }

    #[test]
    fn test_respects_max_colors() {
        let hist: HashMap<[u8; 3], u32> = (0..=255u8).map(|v| ([v, v / 2, 255 - v], 1)).collect();
        for max in [1, 2, 7, 16, 64] {
            let palette = build_palette(&hist, max);
            assert!(palette.len() <= max, "{} > {max}", palette.len());
            assert!(!palette.is_empty());
        }
    }

    #[test]
    fn test_zero_max_colors_means_one() {
        let hist = histogram(&[([0, 0, 0], 1), ([255, 255, 255], 1)]);
        assert_eq!(build_palette(&hist, 0).len(), 1);
    }

    #[test]
    fn test_splits_along_widest_channel() {
        // Two clusters far apart in red only.
        let hist = histogram(&[
            ([10, 100, 100], 3),
            ([12, 100, 100], 3),
            ([240, 100, 100], 3),
            ([244, 100, 100], 3),
        ]);
        let palette = build_palette(&hist, 2);
        assert_eq!(palette, vec![[11, 100, 100], [242, 100, 100]]);
    }

    #[test]
    fn test_is_deterministic() {
        let hist: HashMap<[u8; 3], u32> = (0..1000u32)
            .map(|i| {
                let v = i.wrapping_mul(2654435761) >> 8;
                ([v as u8, (v >> 8) as u8, (v >> 16) as u8], 1 + i % 5)
            })
            .collect();
        assert_eq!(build_palette(&hist, 32), build_palette(&hist, 32));
    }

    #[test]
    fn test_nearest_prefers_lowest_index_on_tie() {
        let palette = [[0, 0, 0], [20, 0, 0]];
        assert_eq!(nearest(&palette, [10.0, 0.0, 0.0]), 0);
        assert_eq!(nearest(&palette, [11.0, 0.0, 0.0]), 1);
    }
}

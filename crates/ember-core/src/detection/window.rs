//! Masked moving-window statistics.
//!
//! A separable uniform filter with "reflect" boundary extension
//! (`d c b a | a b c d | d c b a`). Near the border the window is
//! completed with mirrored samples, so the statistics there are biased
//! towards the pixels closest to the edge.

use ndarray::{Array1, Array2, ArrayView2, Axis, Zip};
use num_traits::Float;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Local statistics of one quantity over the valid pixels of each window.
///
/// `weight` is the fraction of the window occupied by valid pixels. Where it
/// is zero, `mean`, `variance` and `stddev` are `NaN`.
#[derive(Clone, Debug)]
pub struct WindowStatistics {
    pub weight: Array2<f64>,
    pub mean: Array2<f64>,
    pub variance: Array2<f64>,
    pub stddev: Array2<f64>,
}

/// Map an index on the extended axis back into `0..n` by mirroring about the
/// outer edge of the first and last samples.
fn reflect_index(i: isize, n: usize) -> usize {
    let n = n as isize;
    let period = 2 * n;
    let m = i.rem_euclid(period);
    if m < n {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}

/// Moving sum of width `size` centred on every sample of `src`.
///
/// Sums are left unscaled so that integer counts stay exact.
fn window_sum_1d(src: &[f64], size: usize, out: &mut [f64]) {
    let n = src.len();
    if n == 0 {
        return;
    }
    let before = (size / 2) as isize;
    let after = size as isize - before - 1;

    let mut sum = 0.0f64;
    for k in -before..=after {
        sum += src[reflect_index(k, n)];
    }
    out[0] = sum;

    for i in 1..n as isize {
        sum += src[reflect_index(i + after, n)];
        sum -= src[reflect_index(i - before - 1, n)];
        out[i as usize] = sum;
    }
}

/// Apply the 1-D window sum to every row of `data`.
fn sum_rows(data: ArrayView2<f64>, size: usize) -> Array2<f64> {
    let (h, w) = data.dim();
    let mut result = Array2::<f64>::zeros((h, w));

    let apply = |mut out_row: ndarray::ArrayViewMut1<f64>, in_row: ndarray::ArrayView1<f64>| {
        let src = in_row.to_vec();
        let mut buf = vec![0.0f64; src.len()];
        window_sum_1d(&src, size, &mut buf);
        out_row.assign(&Array1::from(buf));
    };

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        Zip::from(result.rows_mut())
            .and(data.rows())
            .par_for_each(apply);
    } else {
        Zip::from(result.rows_mut()).and(data.rows()).for_each(apply);
    }
    result
}

/// Separable `size` x `size` moving average with reflect boundaries.
///
/// Each output row is produced by a single task, so the result does not
/// depend on whether the work ran in parallel.
pub fn uniform_filter<T>(data: ArrayView2<T>, size: usize) -> Array2<f64>
where
    T: Float + Send + Sync,
{
    let scale = 1.0 / (size * size) as f64;
    window_sum(data, size).mapv_into(|v| v * scale)
}

/// Separable `size` x `size` moving sum with reflect boundaries.
fn window_sum<T>(data: ArrayView2<T>, size: usize) -> Array2<f64>
where
    T: Float + Send + Sync,
{
    let as_f64 = data.mapv(|v| v.to_f64().unwrap_or(f64::NAN));
    let rows_done = sum_rows(as_f64.view(), size);
    let cols_done = sum_rows(rows_done.view().reversed_axes(), size);
    cols_done.reversed_axes().as_standard_layout().into_owned()
}

/// Window statistics of `values` restricted to pixels where `valid` is true.
///
/// A valid pixel with a non-finite value is left out of the statistics, so a
/// single infinite ratio cannot turn a whole neighborhood into `NaN`.
pub fn masked_window_statistics(
    values: &Array2<f32>,
    valid: &Array2<bool>,
    size: usize,
) -> WindowStatistics {
    let indicator = Zip::from(values)
        .and(valid)
        .map_collect(|&v, &ok| if ok && v.is_finite() { 1.0f64 } else { 0.0 });
    let masked = Zip::from(values)
        .and(&indicator)
        .map_collect(|&v, &w| if w > 0.0 { v as f64 } else { 0.0 });
    let masked_sq = masked.mapv(|v| v * v);

    // Counts of 0/1 indicators are exact, so an empty window is exactly zero.
    let count = window_sum(indicator.view(), size);
    let per_valid = |sums: Array2<f64>| {
        Zip::from(&sums)
            .and(&count)
            .map_collect(|&s, &n| if n > 0.0 { s / n } else { f64::NAN })
    };
    let mean = per_valid(window_sum(masked.view(), size));
    let mean_sq = per_valid(window_sum(masked_sq.view(), size));
    let weight = count.mapv_into(|n| n / (size * size) as f64);

    let variance = Zip::from(&mean_sq).and(&mean).map_collect(|&sq, &m| {
        let var = sq - m * m;
        // Rounding can leave a flat window marginally negative; NaN passes through.
        if var < 0.0 {
            0.0
        } else {
            var
        }
    });
    let stddev = variance.mapv(f64::sqrt);

    WindowStatistics {
        weight,
        mean,
        variance,
        stddev,
    }
}

/// Clear a band of `width` pixels along every edge.
///
/// When the grid is narrower than two border widths the borders overlap and
/// the whole axis is cleared.
pub fn clear_border(mask: &mut Array2<bool>, width: usize) {
    let (h, w) = mask.dim();
    for axis in [Axis(0), Axis(1)] {
        let len = if axis == Axis(0) { h } else { w };
        let head = width.min(len);
        let tail = len.saturating_sub(width);
        for i in (0..head).chain(tail..len) {
            mask.index_axis_mut(axis, i).fill(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    /// Direct per-pixel window average, for checking the running-sum version.
    fn brute_force_mean(data: &Array2<f64>, size: usize) -> Array2<f64> {
        let (h, w) = data.dim();
        let before = (size / 2) as isize;
        let mut out = Array2::<f64>::zeros((h, w));
        for r in 0..h {
            for c in 0..w {
                let mut sum = 0.0;
                for dr in 0..size as isize {
                    for dc in 0..size as isize {
                        let rr = reflect_index(r as isize + dr - before, h);
                        let cc = reflect_index(c as isize + dc - before, w);
                        sum += data[[rr, cc]];
                    }
                }
                out[[r, c]] = sum / (size * size) as f64;
            }
        }
        out
    }

    #[test]
    fn test_reflect_repeats_edge_sample() {
        // n = 4: ... 1 0 | 0 1 2 3 | 3 2 ...
        assert_eq!(reflect_index(-1, 4), 0);
        assert_eq!(reflect_index(-2, 4), 1);
        assert_eq!(reflect_index(4, 4), 3);
        assert_eq!(reflect_index(5, 4), 2);
        // Windows wider than the axis reflect more than once.
        assert_eq!(reflect_index(8, 4), 0);
        assert_eq!(reflect_index(-5, 4), 3);
    }

    #[test]
    fn test_uniform_filter_matches_brute_force() {
        let data = Array2::from_shape_fn((7, 9), |(r, c)| ((r * 9 + c) % 5) as f64 * 0.3);
        let fast = uniform_filter(data.view(), 5);
        let slow = brute_force_mean(&data, 5);
        for (a, b) in fast.iter().zip(slow.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_uniform_filter_window_larger_than_grid() {
        let data = Array2::from_shape_fn((3, 4), |(r, c)| (r + c) as f64);
        let fast = uniform_filter(data.view(), 11);
        let slow = brute_force_mean(&data, 11);
        for (a, b) in fast.iter().zip(slow.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_masked_statistics_ignore_invalid_pixels() {
        let values = array![[1.0f32, 100.0, 3.0], [1.0, 3.0, 1.0], [3.0, 1.0, 3.0]];
        let mut valid = Array2::from_elem((3, 3), true);
        valid[[0, 1]] = false;
        let stats = masked_window_statistics(&values, &valid, 3);
        // Centre window covers the whole grid: four valid 1s and four valid 3s.
        assert_abs_diff_eq!(stats.mean[[1, 1]], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(stats.weight[[1, 1]], 8.0 / 9.0, epsilon = 1e-12);
        assert_abs_diff_eq!(stats.variance[[1, 1]], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_window_is_undefined() {
        let values = Array2::from_elem((3, 3), 0.5f32);
        let valid = Array2::from_elem((3, 3), false);
        let stats = masked_window_statistics(&values, &valid, 3);
        assert!(stats.weight.iter().all(|&w| w == 0.0));
        assert!(stats.mean.iter().all(|v| v.is_nan()));
        assert!(stats.stddev.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_non_finite_values_do_not_poison_window() {
        let mut values = Array2::from_elem((5, 5), 2.0f32);
        values[[2, 2]] = f32::INFINITY;
        let valid = Array2::from_elem((5, 5), true);
        let stats = masked_window_statistics(&values, &valid, 3);
        assert_abs_diff_eq!(stats.mean[[1, 1]], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(stats.stddev[[1, 1]], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_clear_border_small_and_large() {
        let mut mask = Array2::from_elem((10, 12), true);
        clear_border(&mut mask, 3);
        assert_eq!(mask.iter().filter(|&&v| v).count(), 4 * 6);
        assert!(mask[[3, 3]] && mask[[6, 8]]);
        assert!(!mask[[2, 5]] && !mask[[5, 9]]);

        let mut tiny = Array2::from_elem((4, 40), true);
        clear_border(&mut tiny, 3);
        assert!(tiny.iter().all(|&v| !v));
    }
}

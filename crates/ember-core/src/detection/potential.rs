use ndarray::{Array2, Zip};
use tracing::debug;

use crate::band::BandId;
use crate::consts::{
    BAND7_STDDEV_FLOOR, POTENTIAL_DIFF75_MIN, POTENTIAL_RATIO75_MIN, POTENTIAL_RATIO76_MIN,
    RATIO75_STDDEV_FLOOR, STDDEV_MULTIPLIER, WINDOW_RADIUS, WINDOW_SIZE,
};
use crate::scene::Scene;

use super::window::{clear_border, masked_window_statistics, WindowStatistics};

/// Fixed-threshold part of the potential fire test for a single pixel.
#[inline]
pub fn passes_direct_thresholds(ratio75: f32, diff75: f32, ratio76: f32) -> bool {
    ratio75 > POTENTIAL_RATIO75_MIN && diff75 > POTENTIAL_DIFF75_MIN && ratio76 > POTENTIAL_RATIO76_MIN
}

/// Scale a local standard deviation into an anomaly threshold.
///
/// `NaN` (an empty window) stays `NaN`, so the pixel fails the comparison
/// instead of being judged against the floor.
#[inline]
pub fn scaled_threshold(stddev: f64, floor: f64) -> f64 {
    let scaled = stddev * STDDEV_MULTIPLIER;
    if scaled < floor {
        floor
    } else {
        scaled
    }
}

/// Per-pixel thresholds the band 7 and ratio75 values must exceed.
#[derive(Clone, Debug)]
pub struct AdaptiveThresholds {
    pub band7: Array2<f64>,
    pub ratio75: Array2<f64>,
    pub band7_stats: WindowStatistics,
    pub ratio75_stats: WindowStatistics,
}

/// Local background statistics of band 7 and ratio75 over a
/// `WINDOW_SIZE` x `WINDOW_SIZE` window, turned into thresholds.
pub fn adaptive_thresholds(scene: &Scene, background: &Array2<bool>) -> AdaptiveThresholds {
    let band7_stats = masked_window_statistics(scene.band(BandId::B7), background, WINDOW_SIZE);
    let ratio75_stats =
        masked_window_statistics(&scene.metrics.ratio75, background, WINDOW_SIZE);

    AdaptiveThresholds {
        band7: band7_stats
            .stddev
            .mapv(|sd| scaled_threshold(sd, BAND7_STDDEV_FLOOR)),
        ratio75: ratio75_stats
            .stddev
            .mapv(|sd| scaled_threshold(sd, RATIO75_STDDEV_FLOOR)),
        band7_stats,
        ratio75_stats,
    }
}

/// Flag background pixels that pass the direct thresholds and stand out
/// from their local background in both band 7 and ratio75.
///
/// Non-background pixels are never flagged. With `mask_edges`, the outer
/// `WINDOW_RADIUS` pixels on every side are cleared because their windows
/// are completed by reflection.
pub fn potential_fire(scene: &Scene, background: &Array2<bool>, mask_edges: bool) -> Array2<bool> {
    let m = &scene.metrics;

    let direct = Zip::from(background)
        .and(&m.ratio75)
        .and(&m.diff75)
        .and(&m.ratio76)
        .map_collect(|&bg, &r75, &d75, &r76| bg && passes_direct_thresholds(r75, d75, r76));

    let thresholds = adaptive_thresholds(scene, background);

    let mut potential = Zip::from(&direct)
        .and(&m.ratio75)
        .and(scene.band(BandId::B7))
        .and(&thresholds.ratio75)
        .and(&thresholds.band7)
        .map_collect(|&ok, &r75, &b7, &r75_thr, &b7_thr| {
            ok && (r75 as f64) > r75_thr && (b7 as f64) > b7_thr
        });

    if mask_edges {
        clear_border(&mut potential, WINDOW_RADIUS);
    }

    debug!(
        direct = direct.iter().filter(|&&v| v).count(),
        flagged = potential.iter().filter(|&&v| v).count(),
        mask_edges,
        "Potential fire test complete"
    );
    potential
}

//! # K-ks Design Chart
//!
//! Tabulated design-chart method for slab sections: from the applied
//! moment and effective depth a dimensionless K is formed, the chart maps
//! K to a steel coefficient ks for the material pair, and the required
//! steel area follows as `As = ks * M * 1000 / d`.
//!
//! K values outside the tabulated range are clamped to the nearest
//! boundary - extrapolating the chart is not code-valid.

use crate::errors::{SlabError, SlabResult};
use crate::materials::{ConcreteGrade, SteelGrade};

/// Chart column for the C25 concrete K values
pub(crate) const COL_C25: usize = 0;
/// Chart column for the C30 concrete K values
pub(crate) const COL_C30: usize = 1;
/// Chart column for the C35 concrete K values
pub(crate) const COL_C35: usize = 2;
/// Chart column for the C40 concrete K values
pub(crate) const COL_C40: usize = 3;
/// Chart column for the S420 steel ks values
pub(crate) const COL_S420: usize = 6;
/// Chart column for the B500 steel ks values
pub(crate) const COL_B500: usize = 7;

/// K-ks chart rows: K per concrete column (C25, C30, C35, C40, C45, C50)
/// followed by ks per steel column (S420, B500). Rows run from very low
/// to high steel ratios; the C45/C50 columns are carried from the source
/// chart even though no current grade maps to them.
const K_KS_TABLE: [[f64; 8]; 51] = [
    [14263.0, 12123.0, 10542.0, 8980.0, 8082.0, 7274.4, 2.75, 2.31],
    [3675.3, 3124.0, 2716.6, 2314.0, 2082.0, 1874.4, 2.76, 2.31],
    [1683.9, 1431.3, 1244.7, 1060.0, 954.2, 858.8, 2.77, 2.32],
    [976.7, 830.2, 721.9, 614.9, 553.4, 498.1, 2.78, 2.33],
    [644.6, 547.9, 476.5, 405.9, 365.3, 328.8, 2.78, 2.34],
    [461.8, 392.5, 341.3, 290.7, 261.7, 235.5, 2.79, 2.34],
    [350.0, 297.5, 258.7, 220.4, 198.4, 178.5, 2.80, 2.35],
    [276.6, 235.1, 204.4, 174.1, 156.7, 141.1, 2.81, 2.36],
    [225.6, 191.8, 166.8, 142.0, 127.8, 115.1, 2.82, 2.37],
    [188.7, 160.4, 139.5, 118.8, 106.9, 96.2, 2.83, 2.37],
    [161.1, 136.9, 119.1, 101.4, 91.3, 82.2, 2.84, 2.38],
    [139.9, 118.9, 103.4, 88.1, 79.3, 71.3, 2.85, 2.39],
    [125.2, 104.7, 91.1, 77.6, 69.8, 62.8, 2.86, 2.40],
    [109.8, 93.4, 81.2, 69.2, 62.2, 56.0, 2.87, 2.40],
    [99.0, 84.1, 73.2, 62.3, 56.1, 50.5, 2.88, 2.41],
    [90.0, 76.5, 66.5, 56.7, 51.0, 45.9, 2.88, 2.42],
    [82.6, 70.2, 61.0, 52.0, 46.8, 42.1, 2.89, 2.43],
    [76.3, 64.9, 56.4, 48.0, 43.2, 38.9, 2.90, 2.44],
    [71.0, 60.3, 52.5, 44.7, 40.2, 36.2, 2.91, 2.44],
    [66.4, 56.5, 49.1, 41.8, 37.6, 33.9, 2.92, 2.45],
    [62.5, 53.1, 46.2, 39.4, 35.4, 31.9, 2.93, 2.46],
    [59.1, 50.3, 43.7, 37.2, 33.5, 30.2, 2.94, 2.47],
    [56.2, 47.7, 41.5, 35.4, 31.8, 28.6, 2.95, 2.48],
    [53.5, 45.5, 39.6, 33.7, 30.3, 27.3, 2.96, 2.49],
    [51.2, 43.5, 37.8, 32.2, 29.0, 26.1, 2.96, 2.49],
    [49.1, 41.7, 36.3, 30.9, 27.8, 25.0, 2.98, 2.50],
    [47.2, 40.1, 34.9, 29.7, 26.8, 24.1, 2.99, 2.51],
    [45.5, 38.7, 33.6, 28.6, 25.8, 23.2, 3.00, 2.52],
    [43.9, 37.4, 32.5, 27.7, 24.9, 22.4, 3.01, 2.53],
    [42.5, 36.1, 31.4, 26.8, 24.1, 21.7, 3.02, 2.54],
    [41.1, 34.9, 30.4, 25.9, 23.3, 20.9, 3.03, 2.55],
    [39.6, 33.7, 29.3, 24.9, 22.4, 20.2, 3.05, 2.56],
    [38.1, 32.4, 28.2, 24.0, 21.6, 19.4, 3.06, 2.57],
    [36.7, 31.2, 27.1, 23.1, 20.8, 18.7, 3.08, 2.58],
    [35.2, 29.9, 26.0, 22.2, 20.0, 18.0, 3.10, 2.60],
    [33.8, 28.7, 25.0, 21.3, 19.1, 17.2, 3.12, 2.62],
    [32.3, 27.5, 23.9, 20.3, 18.3, 16.5, 3.14, 2.64],
    [30.9, 26.2, 22.8, 19.4, 17.5, 15.7, 3.17, 2.66],
    [29.4, 25.0, 21.7, 18.5, 16.7, 15.0, 3.20, 2.68],
    [28.0, 23.8, 20.7, 17.6, 15.9, 14.3, 3.23, 2.71],
    [26.5, 22.6, 19.6, 16.7, 15.0, 13.5, 3.27, 2.74],
    [25.1, 21.4, 18.6, 15.8, 14.2, 12.8, 3.31, 2.78],
    [23.7, 20.2, 17.5, 14.9, 13.4, 12.1, 3.37, 2.83],
    [22.6, 19.2, 16.7, 14.2, 12.8, 11.5, 3.42, 2.87],
    [22.3, 19.0, 16.5, 14.0, 12.6, 11.4, 3.43, 2.88],
    [21.4, 18.2, 15.8, 13.5, 12.1, 10.9, 3.49, 2.92],
    [20.9, 17.8, 15.5, 13.2, 11.9, 10.7, 3.52, 2.95],
    [19.6, 16.6, 14.5, 12.3, 11.5, 10.0, 3.62, 3.04],
    [18.7, 15.9, 13.8, 11.8, 10.6, 9.5, 3.71, 3.11],
    [19.1, 16.3, 14.1, 12.0, 10.8, 9.8, 3.66, 3.07],
    [20.1, 17.0, 14.8, 12.6, 11.4, 10.2, 3.58, 3.00],
];

/// Linear interpolation between two points, constant when they coincide
pub(crate) fn lerp(x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> f64 {
    if x1 == x0 {
        return y0;
    }
    let t = (x - x0) / (x1 - x0);
    y0 + t * (y1 - y0)
}

/// Piecewise-linear interpolation over ascending breakpoints, clamped to
/// the nearest endpoint outside the tabulated range
pub(crate) fn interp_clamped(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[xs.len() - 1] {
        return ys[ys.len() - 1];
    }
    for i in 0..xs.len() - 1 {
        if xs[i] <= x && x <= xs[i + 1] {
            return lerp(xs[i], ys[i], xs[i + 1], ys[i + 1], x);
        }
    }
    ys[ys.len() - 1]
}

/// Interpolate ks from a computed K for a material pair.
///
/// The chart rows are sorted by descending K before bracketing; K beyond
/// either end of the chart is clamped.
pub fn interp_ks(k_calc: f64, concrete: ConcreteGrade, steel: SteelGrade) -> f64 {
    let k_col = concrete.chart_column();
    let ks_col = steel.chart_column();

    let mut pairs: Vec<(f64, f64)> = K_KS_TABLE
        .iter()
        .map(|row| (row[k_col], row[ks_col]))
        .collect();
    pairs.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let (k_max, ks_at_max) = pairs[0];
    let (k_min, ks_at_min) = pairs[pairs.len() - 1];
    if k_calc >= k_max {
        return ks_at_max;
    }
    if k_calc <= k_min {
        return ks_at_min;
    }

    for pair in pairs.windows(2) {
        let (k_hi, ks_hi) = pair[0];
        let (k_lo, ks_lo) = pair[1];
        if k_hi >= k_calc && k_calc >= k_lo {
            return lerp(k_hi, ks_hi, k_lo, ks_lo, k_calc);
        }
    }
    ks_at_min
}

/// Required steel area (mm2/m) for a moment per metre of strip.
///
/// `d_override_mm` replaces the nominal effective depth `h - cover` when
/// the bar mat sits deeper (layered mats). Returns 0 for non-positive
/// moments; fails with a geometry error when the effective depth is not
/// positive.
pub fn steel_area_for_moment(
    m_knm_per_m: f64,
    concrete: ConcreteGrade,
    steel: SteelGrade,
    h_mm: f64,
    cover_mm: f64,
    d_override_mm: Option<f64>,
) -> SlabResult<f64> {
    let d_nom = h_mm - cover_mm;
    let d = d_override_mm.unwrap_or(d_nom);
    if d <= 0.0 {
        return Err(SlabError::geometry(format!(
            "effective depth d = {d:.1} mm <= 0 (h = {h_mm:.1} mm, cover = {cover_mm:.1} mm)"
        )));
    }
    if m_knm_per_m <= 0.0 {
        return Ok(0.0);
    }

    let b_mm = 1000.0;
    let m_nmm = m_knm_per_m.abs() * 1e6;
    let k_calc = 100.0 * (b_mm * d * d) / m_nmm;
    let ks = interp_ks(k_calc, concrete, steel);
    Ok(ks * m_knm_per_m.abs() * 1000.0 / d)
}

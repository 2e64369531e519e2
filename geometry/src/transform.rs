use std::f64::consts::PI;

use crate::{Coordinate, Mercator};

// Northing breakpoints. The first band whose breakpoint is <= |y| wins.
const MC_BAND: [f64; 6] = [12890594.86, 8362377.87, 5591021.0, 3481989.83, 1678043.12, 0.0];

#[rustfmt::skip]
const MC_TO_LL: [[f64; 10]; 6] = [
    [1.410526172116255e-8, 0.00000898305509648872, -1.9939833816331, 200.9824383106796,
     -187.2403703815547, 91.6087516669843, -23.38765649603339, 2.57121317296198,
     -0.03801003308653, 17337981.2],
    [-7.435856389565537e-9, 0.000008983055097726239, -0.78625201886289, 96.32687599759846,
     -1.85204757529826, -59.36935905485877, 47.40033549296737, -16.50741931063887,
     2.28786674699375, 10260144.86],
    [-3.030883460898826e-8, 0.00000898305509983578, 0.30071316287616, 59.74293618442277,
     7.357984074871, -25.38371002664745, 13.45380521110908, -3.29883767235584,
     0.32710905363475, 6856817.37],
    [-1.981981304930552e-8, 0.000008983055099779535, 0.03278182852591, 40.31678527705744,
     0.65659298677277, -4.44255534477492, 0.85341911805263, 0.12923347998204,
     -0.04625736007561, 4482777.06],
    [3.09191371068437e-9, 0.000008983055096812155, 0.00006995724062, 23.10934304144901,
     -0.00023663490511, -0.6321817810242, -0.00663494467273, 0.03430082397953,
     -0.00466043876332, 2555164.4],
    [2.890871144776878e-9, 0.000008983055095805407, -3.068298e-8, 7.47137025468032,
     -0.00000353937994, -0.02145144861037, -0.00001234426596, 0.00010322952773,
     -0.00000323890364, 826088.5],
];

const X_PI: f64 = PI * 3000.0 / 180.0;

// Krasovsky 1940
const AXIS: f64 = 6378245.0;
const ECCENTRICITY_SQ: f64 = 0.00669342162296594323;

/// The provider's inverse Mercator projection, landing in BD-09.
pub fn mercator_to_bd09(pt: Mercator) -> Coordinate {
    let y_abs = pt.y.abs();
    let band = MC_BAND
        .iter()
        .position(|breakpoint| y_abs >= *breakpoint)
        .unwrap_or(MC_BAND.len() - 1);
    let c = &MC_TO_LL[band];

    let lng = c[0] + c[1] * pt.x.abs();
    let d = y_abs / c[9];
    let lat = c[2]
        + c[3] * d
        + c[4] * d.powi(2)
        + c[5] * d.powi(3)
        + c[6] * d.powi(4)
        + c[7] * d.powi(5)
        + c[8] * d.powi(6);

    Coordinate::new(lat * sign(pt.y), lng * sign(pt.x))
}

fn sign(x: f64) -> f64 {
    if x.is_sign_negative() {
        -1.0
    } else {
        1.0
    }
}

pub fn bd09_to_gcj02(pt: Coordinate) -> Coordinate {
    let x = pt.lng - 0.0065;
    let y = pt.lat - 0.006;
    let z = (x * x + y * y).sqrt() - 0.00002 * (y * X_PI).sin();
    let theta = y.atan2(x) - 0.000003 * (x * X_PI).cos();
    Coordinate::new(z * theta.sin(), z * theta.cos())
}

pub fn bd09_from_gcj02(pt: Coordinate) -> Coordinate {
    let x = pt.lng;
    let y = pt.lat;
    let z = (x * x + y * y).sqrt() + 0.00002 * (y * X_PI).sin();
    let theta = y.atan2(x) + 0.000003 * (x * X_PI).cos();
    Coordinate::new(z * theta.sin() + 0.006, z * theta.cos() + 0.0065)
}

/// GCJ-02 is only applied inside this box.
pub fn out_of_china(pt: Coordinate) -> bool {
    pt.lng < 72.004 || pt.lng > 137.8347 || pt.lat < 0.8293 || pt.lat > 55.8271
}

/// Not an exact inverse; the offset is evaluated at the GCJ-02 position. Applying this twice
/// moves the point twice.
pub fn gcj02_to_wgs84(pt: Coordinate) -> Coordinate {
    if out_of_china(pt) {
        return pt;
    }
    let (d_lat, d_lng) = gcj02_offset(pt);
    Coordinate::new(pt.lat - d_lat, pt.lng - d_lng)
}

pub fn gcj02_from_wgs84(pt: Coordinate) -> Coordinate {
    if out_of_china(pt) {
        return pt;
    }
    let (d_lat, d_lng) = gcj02_offset(pt);
    Coordinate::new(pt.lat + d_lat, pt.lng + d_lng)
}

/// The full pipeline for anything decoded from the provider's geometry strings.
pub fn mercator_to_wgs84(pt: Mercator) -> Coordinate {
    gcj02_to_wgs84(bd09_to_gcj02(mercator_to_bd09(pt)))
}

// Returns (d_lat, d_lng) in degrees
fn gcj02_offset(pt: Coordinate) -> (f64, f64) {
    let x = pt.lng - 105.0;
    let y = pt.lat - 35.0;
    let rad_lat = pt.lat / 180.0 * PI;
    let magic = 1.0 - ECCENTRICITY_SQ * rad_lat.sin().powi(2);
    let sqrt_magic = magic.sqrt();

    let d_lat = (offset_lat(x, y) * 180.0)
        / ((AXIS * (1.0 - ECCENTRICITY_SQ)) / (magic * sqrt_magic) * PI);
    let d_lng = (offset_lng(x, y) * 180.0) / (AXIS / sqrt_magic * rad_lat.cos() * PI);
    (d_lat, d_lng)
}

fn offset_lat(x: f64, y: f64) -> f64 {
    let mut ret = -100.0 + 2.0 * x + 3.0 * y + 0.2 * y * y + 0.1 * x * y + 0.2 * x.abs().sqrt();
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (y * PI).sin() + 40.0 * (y / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (160.0 * (y / 12.0 * PI).sin() + 320.0 * (y * PI / 30.0).sin()) * 2.0 / 3.0;
    ret
}

fn offset_lng(x: f64, y: f64) -> f64 {
    let mut ret = 300.0 + x + 2.0 * y + 0.1 * x * x + 0.1 * x * y + 0.1 * x.abs().sqrt();
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (x * PI).sin() + 40.0 * (x / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (150.0 * (x / 12.0 * PI).sin() + 300.0 * (x / 30.0 * PI).sin()) * 2.0 / 3.0;
    ret
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn outside_china_is_untouched() {
        for pt in [
            Coordinate::new(51.5074, -0.1278),
            Coordinate::new(40.7128, -74.006),
            Coordinate::new(-33.8688, 151.2093),
            // Just past each edge of the box
            Coordinate::new(30.0, 72.0039),
            Coordinate::new(30.0, 137.8348),
            Coordinate::new(0.8292, 100.0),
            Coordinate::new(55.8272, 100.0),
        ] {
            assert_eq!(gcj02_to_wgs84(pt), pt);
            assert_eq!(gcj02_from_wgs84(pt), pt);
            assert_eq!(gcj02_to_wgs84(gcj02_to_wgs84(pt)), pt);
        }
    }

    #[test]
    fn gcj02_shift_is_small_and_roughly_reversible() {
        let tiananmen = Coordinate::new(39.9087, 116.3975);
        let wgs = gcj02_to_wgs84(tiananmen);
        assert!(wgs != tiananmen);
        assert_abs_diff_eq!(wgs.lat, tiananmen.lat, epsilon = 0.01);
        assert_abs_diff_eq!(wgs.lng, tiananmen.lng, epsilon = 0.01);

        let back = gcj02_from_wgs84(wgs);
        assert_abs_diff_eq!(back.lat, tiananmen.lat, epsilon = 1e-4);
        assert_abs_diff_eq!(back.lng, tiananmen.lng, epsilon = 1e-4);

        // Not idempotent
        assert!(gcj02_to_wgs84(wgs) != wgs);
    }

    #[test]
    fn bd09_round_trip() {
        let pt = Coordinate::new(31.2304, 121.4737);
        let bd = bd09_from_gcj02(pt);
        assert_abs_diff_eq!(bd.lat - pt.lat, 0.006, epsilon = 0.002);
        assert_abs_diff_eq!(bd.lng - pt.lng, 0.0065, epsilon = 0.002);
        let back = bd09_to_gcj02(bd);
        assert_abs_diff_eq!(back.lat, pt.lat, epsilon = 1e-4);
        assert_abs_diff_eq!(back.lng, pt.lng, epsilon = 1e-4);
    }

    #[test]
    fn mercator_bands() {
        let origin = mercator_to_bd09(Mercator::new(0.0, 0.0));
        assert_abs_diff_eq!(origin.lat, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(origin.lng, 0.0, epsilon = 1e-6);

        // Central Beijing
        let beijing = mercator_to_bd09(Mercator::new(12958175.0, 4825923.0));
        assert_abs_diff_eq!(beijing.lng, 116.404, epsilon = 0.01);
        assert!(beijing.lat > 39.8 && beijing.lat < 40.0, "{:?}", beijing);

        // Mirrored in the southern and western hemispheres
        let mirrored = mercator_to_bd09(Mercator::new(-12958175.0, -4825923.0));
        assert_abs_diff_eq!(mirrored.lat, -beijing.lat, epsilon = 1e-9);
        assert_abs_diff_eq!(mirrored.lng, -beijing.lng, epsilon = 1e-9);

        let wgs = mercator_to_wgs84(Mercator::new(12958175.0, 4825923.0));
        assert_abs_diff_eq!(wgs.lat, beijing.lat, epsilon = 0.02);
        assert_abs_diff_eq!(wgs.lng, beijing.lng, epsilon = 0.02);
    }
}

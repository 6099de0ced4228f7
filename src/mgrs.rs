//! Military Grid Reference System conversion.
//!
//! Converts an MGRS string to WGS84 latitude/longitude by reconstructing
//! the underlying UTM coordinate (grid zone, 100 km square letters, and
//! in-square digits) and applying the Transverse Mercator inverse series.
//!
//! Reference: Snyder, "Map Projections: A Working Manual" (USGS PP 1395),
//! and NGA standard MGRS square-letter cycling.

use thiserror::Error;

const WGS84_A: f64 = 6_378_137.0;
const WGS84_F: f64 = 1.0 / 298.257_223_563;
const K0: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;
const SQUARE_SIZE: f64 = 100_000.0;
const ROW_CYCLE: f64 = 2_000_000.0;

/// Latitude band letters, 8 degrees each from 80S, skipping I and O.
const BAND_LETTERS: &str = "CDEFGHJKLMNPQRSTUVWX";
/// 100 km column letter sets, cycling with the zone number.
const COLUMN_SETS: [&str; 3] = ["ABCDEFGH", "JKLMNPQR", "STUVWXYZ"];
/// 100 km row letters, repeating every 2,000 km, skipping I and O.
const ROW_LETTERS: &str = "ABCDEFGHJKLMNPQRSTUV";

/// Errors from grid-reference parsing and conversion.
///
/// Any of these makes the resolver fall back to treating the input as a
/// place name, so the messages only ever reach the logs.
#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("grid reference does not match the expected shape: {0}")]
    Shape(String),
    #[error("grid zone must be between 1 and 60, got {0}")]
    Zone(u32),
    #[error("invalid latitude band letter '{0}'")]
    Band(char),
    #[error("column letter '{0}' is not valid for zone {1}")]
    Column(char, u32),
    #[error("invalid row letter '{0}'")]
    Row(char),
    #[error("in-square digits must come in an even count of 2 to 10, got {0}")]
    Digits(usize),
}

/// A reconstructed UTM coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
struct UtmCoordinate {
    zone: u32,
    southern: bool,
    easting: f64,
    northing: f64,
}

/// Convert an MGRS reference to (latitude, longitude) in decimal degrees.
pub fn to_lat_lon(reference: &str) -> Result<(f64, f64), GridError> {
    parse(reference).map(UtmCoordinate::to_lat_lon)
}

fn parse(reference: &str) -> Result<UtmCoordinate, GridError> {
    let text = reference.trim().to_ascii_uppercase();

    let zone_len = text.chars().take_while(char::is_ascii_digit).count();
    if zone_len == 0 || zone_len > 2 {
        return Err(GridError::Shape(text));
    }
    let zone: u32 = text[..zone_len]
        .parse()
        .map_err(|_| GridError::Shape(text.clone()))?;
    if !(1..=60).contains(&zone) {
        return Err(GridError::Zone(zone));
    }

    let mut letters = text[zone_len..].chars();
    let (Some(band), Some(column), Some(row)) = (letters.next(), letters.next(), letters.next())
    else {
        return Err(GridError::Shape(text.clone()));
    };
    let digits: String = letters.collect();
    if digits.is_empty()
        || digits.len() % 2 != 0
        || digits.len() > 10
        || !digits.chars().all(|c| c.is_ascii_digit())
    {
        return Err(GridError::Digits(digits.len()));
    }

    let band_index = BAND_LETTERS.find(band).ok_or(GridError::Band(band))?;
    let column_set = COLUMN_SETS[((zone - 1) % 3) as usize];
    let column_index = column_set
        .find(column)
        .ok_or(GridError::Column(column, zone))?;
    let mut row_index = ROW_LETTERS.find(row).ok_or(GridError::Row(row))?;
    // Even zones shift the row lettering forward by five positions.
    if zone % 2 == 0 {
        row_index = (row_index + 15) % 20;
    }

    let half = digits.len() / 2;
    let scale = 10f64.powi(5 - half as i32);
    let within_easting: f64 = digits[..half]
        .parse::<u32>()
        .map_err(|_| GridError::Shape(text.clone()))? as f64
        * scale;
    let within_northing: f64 = digits[half..]
        .parse::<u32>()
        .map_err(|_| GridError::Shape(text.clone()))? as f64
        * scale;

    let easting = (column_index as f64 + 1.0) * SQUARE_SIZE + within_easting;
    let grid_northing = row_index as f64 * SQUARE_SIZE + within_northing;

    // Row letters repeat every 2,000 km; anchor the cycle at the northing
    // of the latitude band's southern edge on the zone's central meridian.
    let south_latitude = -80.0 + 8.0 * band_index as f64;
    let (_, band_min_northing) = geographic_to_utm(south_latitude, central_meridian(zone), zone);
    let scaled_min = band_min_northing.rem_euclid(ROW_CYCLE);
    let mut northing = grid_northing;
    if northing < scaled_min {
        northing += ROW_CYCLE;
    }
    northing += band_min_northing - scaled_min;

    Ok(UtmCoordinate {
        zone,
        southern: band < 'N',
        easting,
        northing,
    })
}

fn central_meridian(zone: u32) -> f64 {
    f64::from(zone - 1) * 6.0 - 180.0 + 3.0
}

/// Meridional arc length from the equator to `latitude` (radians).
fn meridian_distance(latitude: f64) -> f64 {
    let e2 = WGS84_F * (2.0 - WGS84_F);
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    WGS84_A
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * latitude
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * latitude).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * latitude).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * latitude).sin())
}

/// Forward Transverse Mercator projection to UTM easting/northing.
///
/// Internal only: it anchors the latitude-band northing during parsing
/// and backs the round-trip checks in the tests.
fn geographic_to_utm(lat_deg: f64, lon_deg: f64, zone: u32) -> (f64, f64) {
    let e2 = WGS84_F * (2.0 - WGS84_F);
    let ep2 = e2 / (1.0 - e2);
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();
    let lon0 = central_meridian(zone).to_radians();

    let n = WGS84_A / (1.0 - e2 * lat.sin().powi(2)).sqrt();
    let t = lat.tan().powi(2);
    let c = ep2 * lat.cos().powi(2);
    let a = lat.cos() * (lon - lon0);
    let m = meridian_distance(lat);

    let easting = K0
        * n
        * (a + (1.0 - t + c) * a.powi(3) / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0)
        + FALSE_EASTING;
    let mut northing = K0
        * (m + n
            * lat.tan()
            * (a.powi(2) / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a.powi(6) / 720.0));
    if lat_deg < 0.0 {
        northing += FALSE_NORTHING_SOUTH;
    }
    (easting, northing)
}

impl UtmCoordinate {
    /// Inverse Transverse Mercator: UTM to geographic degrees.
    fn to_lat_lon(self) -> (f64, f64) {
        let e2 = WGS84_F * (2.0 - WGS84_F);
        let ep2 = e2 / (1.0 - e2);

        let x = self.easting - FALSE_EASTING;
        let y = if self.southern {
            self.northing - FALSE_NORTHING_SOUTH
        } else {
            self.northing
        };

        let m = y / K0;
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        let mu = m / (WGS84_A * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));
        let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        let c1 = ep2 * phi1.cos().powi(2);
        let t1 = phi1.tan().powi(2);
        let n1 = WGS84_A / (1.0 - e2 * phi1.sin().powi(2)).sqrt();
        let r1 = WGS84_A * (1.0 - e2) / (1.0 - e2 * phi1.sin().powi(2)).powf(1.5);
        let d = x / (n1 * K0);

        let latitude = phi1
            - (n1 * phi1.tan() / r1)
                * (d.powi(2) / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1
                        - 252.0 * ep2
                        - 3.0 * c1 * c1)
                        * d.powi(6)
                        / 720.0);

        let longitude = central_meridian(self.zone).to_radians()
            + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1)
                    * d.powi(5)
                    / 120.0)
                / phi1.cos();

        (latitude.to_degrees(), longitude.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: (f64, f64), expected: (f64, f64), tolerance: f64) {
        assert!(
            (actual.0 - expected.0).abs() < tolerance,
            "latitude {} vs {}",
            actual.0,
            expected.0
        );
        assert!(
            (actual.1 - expected.1).abs() < tolerance,
            "longitude {} vs {}",
            actual.1,
            expected.1
        );
    }

    #[test]
    fn central_meridian_reference_point() {
        // Square WN in zone 33 with zero offsets sits exactly on the 15 E
        // central meridian, near Graz, Austria.
        let (lat, lon) = to_lat_lon("33TWN0000000000").unwrap();
        assert!((lon - 15.0).abs() < 1e-9, "longitude {lon}");
        assert!((lat - 46.9535).abs() < 1e-3, "latitude {lat}");
    }

    #[test]
    fn honolulu_sample_grid() {
        let actual = to_lat_lon("4QFJ1234567890").unwrap();
        assert_close(actual, (21.409_797, -157.916_081), 1e-5);
    }

    #[test]
    fn washington_monument_grid() {
        let actual = to_lat_lon("18SUJ2339007393").unwrap();
        assert_close(actual, (38.897_675, -77.036_549), 1e-5);
    }

    #[test]
    fn low_precision_reference() {
        // Four digits resolve to 1 km precision.
        let actual = to_lat_lon("18TWL8040").unwrap();
        assert_close(actual, (41.0073, -74.0487), 1e-3);
    }

    #[test]
    fn southern_hemisphere_even_zone() {
        let actual = to_lat_lon("56HLH3436850948").unwrap();
        assert_close(actual, (-33.8688, 151.2093), 1e-4);
    }

    #[test]
    fn southern_hemisphere_odd_zone() {
        let actual = to_lat_lon("21HUB7331770036").unwrap();
        assert_close(actual, (-34.6037, -58.3816), 1e-4);
    }

    #[test]
    fn case_and_whitespace_insensitive() {
        let upper = to_lat_lon("18TWL8040").unwrap();
        let lower = to_lat_lon("  18twl8040 ").unwrap();
        assert_close(upper, lower, 1e-12);
    }

    #[test]
    fn rejects_odd_digit_count() {
        assert_eq!(to_lat_lon("33TWN123"), Err(GridError::Digits(3)));
    }

    #[test]
    fn rejects_excluded_letters() {
        assert_eq!(to_lat_lon("33IWN0000"), Err(GridError::Band('I')));
        assert_eq!(to_lat_lon("33TWI0000"), Err(GridError::Row('I')));
    }

    #[test]
    fn rejects_column_outside_zone_set() {
        // Zone 33 uses the S..Z column set, so A is invalid there.
        assert_eq!(to_lat_lon("33TAA0000"), Err(GridError::Column('A', 33)));
    }

    #[test]
    fn rejects_zone_zero() {
        assert_eq!(to_lat_lon("0CAA0000"), Err(GridError::Zone(0)));
    }

    #[test]
    fn rejects_missing_digits() {
        assert_eq!(to_lat_lon("33TWN"), Err(GridError::Digits(0)));
    }

    #[test]
    fn forward_inverse_round_trip() {
        for &(lat, lon, zone) in &[
            (40.7128, -74.0060, 18),
            (46.95, 15.0, 33),
            (-33.8688, 151.2093, 56),
            (63.5, 10.4, 32),
        ] {
            let (easting, northing) = geographic_to_utm(lat, lon, zone);
            let coordinate = UtmCoordinate {
                zone,
                southern: lat < 0.0,
                easting,
                northing,
            };
            assert_close(coordinate.to_lat_lon(), (lat, lon), 1e-7);
        }
    }
}

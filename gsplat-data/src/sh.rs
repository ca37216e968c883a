//! Spherical harmonic band bookkeeping.
//!
//! A PLY file stores the higher-order SH coefficients as `f_rest_*`
//! properties, three values (one per colour channel) for every coefficient.
//! Band count `b` carries `b * b` coefficients per channel.

use crate::ply::DecodeError;

/// Highest SH band count the decoder and renderer support.
pub const MAX_SH_BANDS: u8 = 3;

/// Number of SH coefficients per colour channel stored for `bands` bands.
pub fn coefficient_count_for_bands(bands: u8) -> usize {
    let bands = bands as usize;
    bands * bands
}

/// Infer the SH band count from the number of `f_rest_*` properties.
///
/// Fails with [`DecodeError::UnsupportedShLayout`] when the count does not
/// match a supported band count exactly.
pub fn bands_from_sh_property_count(sh_property_count: usize) -> Result<u8, DecodeError> {
    let coeffs = sh_property_count / 3;
    let bands = (0..=MAX_SH_BANDS)
        .find(|&bands| coefficient_count_for_bands(bands) >= coeffs)
        .ok_or(DecodeError::UnsupportedShLayout { sh_property_count })?;

    if coefficient_count_for_bands(bands) * 3 != sh_property_count {
        return Err(DecodeError::UnsupportedShLayout { sh_property_count });
    }
    Ok(bands)
}

/// SH degree actually used for drawing: the requested degree, limited by
/// what the asset stores.
pub fn effective_sh_degree(requested: u8, asset_bands: u8) -> u8 {
    requested.min(asset_bands).min(MAX_SH_BANDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficient_counts_increase() {
        let counts: Vec<usize> = (0..=MAX_SH_BANDS).map(coefficient_count_for_bands).collect();
        assert_eq!(counts, vec![0, 1, 4, 9]);
    }

    #[test]
    fn test_bands_from_property_count() {
        assert_eq!(bands_from_sh_property_count(0).unwrap(), 0);
        assert_eq!(bands_from_sh_property_count(3).unwrap(), 1);
        assert_eq!(bands_from_sh_property_count(12).unwrap(), 2);
        assert_eq!(bands_from_sh_property_count(27).unwrap(), 3);
    }

    #[test]
    fn test_unsupported_layouts() {
        for count in [4, 30, 1, 2, 6, 48] {
            match bands_from_sh_property_count(count) {
                Err(DecodeError::UnsupportedShLayout { sh_property_count }) => {
                    assert_eq!(sh_property_count, count)
                }
                other => panic!("count {count} should be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_effective_sh_degree() {
        assert_eq!(effective_sh_degree(3, 1), 1);
        assert_eq!(effective_sh_degree(0, 3), 0);
        assert_eq!(effective_sh_degree(7, 3), 3);
    }
}

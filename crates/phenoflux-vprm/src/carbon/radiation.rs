//! Hourly radiation partitioning.
//!
//! Clearness index against extraterrestrial radiation, the Erbs
//! diffuse-fraction correlation, and the shortwave→PAR conversion.

use phenoflux_core::FloatValue;

/// Fraction of shortwave radiation that is photosynthetically active.
pub const SHORTWAVE_TO_PAR_FRACTION: FloatValue = 0.505;

/// Conversion from PAR in W m⁻² to µmol m⁻² s⁻¹.
pub const PAR_WATT_TO_UMOL: FloatValue = 4.57;

/// Convert hourly shortwave radiation (W m⁻²) to PAR (µmol m⁻² s⁻¹).
pub fn shortwave_to_par(shortwave: FloatValue) -> FloatValue {
    shortwave.max(0.0) * SHORTWAVE_TO_PAR_FRACTION * PAR_WATT_TO_UMOL
}

/// Clearness index: measured over extraterrestrial shortwave, in [0, 1].
///
/// Dark hours (no extraterrestrial radiation) return 0; measured radiation
/// with no extraterrestrial counterpart indicates inconsistent inputs and
/// is logged, not propagated.
pub fn clearness_index(shortwave: FloatValue, extraterrestrial: FloatValue) -> FloatValue {
    if extraterrestrial <= 0.0 {
        if shortwave > 1.0 {
            log::warn!(
                "measured radiation {shortwave} W/m2 with no extraterrestrial radiation; treating as overcast"
            );
        }
        return 0.0;
    }
    (shortwave / extraterrestrial).clamp(0.0, 1.0)
}

/// Diffuse fraction of global radiation from the Erbs correlation.
///
/// Three regimes by clearness index: a linear segment for overcast skies
/// (kt ≤ 0.22), a quartic polynomial for intermediate skies (kt ≤ 0.80)
/// and a constant 0.165 for very clear skies.
pub fn diffuse_fraction(clearness: FloatValue) -> FloatValue {
    if clearness <= 0.22 {
        1.0 - 0.09 * clearness
    } else if clearness <= 0.80 {
        0.9511 - 0.1604 * clearness + 4.388 * clearness.powi(2) - 16.638 * clearness.powi(3)
            + 12.336 * clearness.powi(4)
    } else {
        0.165
    }
}

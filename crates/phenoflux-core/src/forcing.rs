//! Pure forcing and response functions.
//!
//! Every function in this module is deterministic and side-effect free;
//! they are the numeric vocabulary the phenology state machines and the
//! carbon flux engine are written in.
//!
//! Numerical edge cases are handled locally by clamping rather than by
//! returning errors: exponential arguments are clamped to ±50, the
//! Lloyd-Taylor response is floored to zero near its singularity, and the
//! sigmoid forms return exact 0/1 outside their transition band so that
//! downstream equality comparisons are well defined.

use crate::FloatValue;

/// Reference temperature of the Lloyd-Taylor response (K).
pub const LLOYD_TAYLOR_TREF: FloatValue = 288.15;

/// Lower asymptote temperature of the Lloyd-Taylor response (K).
pub const LLOYD_TAYLOR_T0: FloatValue = 227.13;

/// Largest magnitude allowed for an exponential argument.
pub const MAX_EXP_ARG: FloatValue = 50.0;

/// `exp` with its argument clamped to ±[`MAX_EXP_ARG`].
#[inline]
pub fn clamped_exp(x: FloatValue) -> FloatValue {
    x.clamp(-MAX_EXP_ARG, MAX_EXP_ARG).exp()
}

/// Asymmetric three-cardinal-temperature forcing response.
///
/// $$f(T) = \frac{T_{max}-T}{T_{max}-T_{opt}}
///          \left(\frac{T-T_{min}}{T_{opt}-T_{min}}\right)
///          ^{\frac{T_{opt}-T_{min}}{T_{max}-T_{opt}}}$$
///
/// Returns exactly 0 at and outside the `[tmin, tmax]` interval and its
/// maximum of 1 at `topt`.
///
/// Callers must supply strictly ordered cardinals (`tmin < topt < tmax`);
/// degenerate triples are rejected up front by parameter validation.
pub fn thermal_forcing(
    temperature: FloatValue,
    tmin: FloatValue,
    topt: FloatValue,
    tmax: FloatValue,
) -> FloatValue {
    debug_assert!(
        tmin < topt && topt < tmax,
        "cardinal temperatures must satisfy tmin < topt < tmax"
    );
    if temperature <= tmin || temperature >= tmax {
        return 0.0;
    }
    let descending = (tmax - temperature) / (tmax - topt);
    let ascending = (temperature - tmin) / (topt - tmin);
    let exponent = (topt - tmin) / (tmax - topt);
    descending * ascending.powf(exponent)
}

/// Two-threshold logistic limiting function.
///
/// Returns exactly 1 at and beyond the `not_limiting` bound, exactly 0 at
/// and beyond the `limiting` bound, and a logistic interpolation through
/// the midpoint with slope `10 / width` in between. The direction of the
/// response follows the ordering of the two bounds, so the same function
/// serves both "shorter promotes" and "warmer promotes" signals.
pub fn sigmoid_limiting(
    value: FloatValue,
    limiting: FloatValue,
    not_limiting: FloatValue,
) -> FloatValue {
    let width = (not_limiting - limiting).abs();
    debug_assert!(width > 0.0, "limiting thresholds must be distinct");
    let midpoint = 0.5 * (limiting + not_limiting);
    let slope = 10.0 / width;
    if not_limiting >= limiting {
        if value >= not_limiting {
            1.0
        } else if value <= limiting {
            0.0
        } else {
            1.0 / (1.0 + clamped_exp(-slope * (value - midpoint)))
        }
    } else if value <= not_limiting {
        1.0
    } else if value >= limiting {
        0.0
    } else {
        1.0 / (1.0 + clamped_exp(slope * (value - midpoint)))
    }
}

/// Four-segment chilling-efficiency curve.
///
/// Zero at and outside `[limiting_lower, limiting_upper]`, a logistic
/// ramp-up between `limiting_lower` and `not_limiting_lower`, a plateau of
/// 1 between the two inner bounds, and a logistic ramp-down between
/// `not_limiting_upper` and `limiting_upper`.
pub fn chilling_efficiency(
    temperature: FloatValue,
    limiting_lower: FloatValue,
    not_limiting_lower: FloatValue,
    not_limiting_upper: FloatValue,
    limiting_upper: FloatValue,
) -> FloatValue {
    if temperature <= limiting_lower || temperature >= limiting_upper {
        return 0.0;
    }
    let ramp_up = sigmoid_limiting(temperature, limiting_lower, not_limiting_lower);
    let ramp_down = sigmoid_limiting(temperature, limiting_upper, not_limiting_upper);
    ramp_up * ramp_down
}

/// Lloyd-Taylor exponential temperature response.
///
/// $$f(T) = \exp\left(E\left(\frac{1}{T_{ref}-T_0}
///            - \frac{1}{T_K-T_0}\right)\right)$$
///
/// with `Tref` = 288.15 K and `T0` = 227.13 K. Returns 0 when the Kelvin
/// temperature is within 0.5 K of `T0` (the response diverges there), and
/// clamps the result to `[0, 10]`.
pub fn lloyd_taylor(temp_c: FloatValue, activation_energy: FloatValue) -> FloatValue {
    let tk = temp_c + 273.15;
    if tk <= LLOYD_TAYLOR_T0 + 0.5 {
        return 0.0;
    }
    let arg = activation_energy
        * (1.0 / (LLOYD_TAYLOR_TREF - LLOYD_TAYLOR_T0) - 1.0 / (tk - LLOYD_TAYLOR_T0));
    clamped_exp(arg).clamp(0.0, 10.0)
}

/// Light-saturation scaler, `1 / (1 + PAR / half_saturation)`.
///
/// Decreasing in PAR: multiplied by the absorbed PAR itself it yields the
/// saturating light response `PAR / (1 + PAR / PAR_0)` used for GPP.
pub fn michaelis_menten(par: FloatValue, half_saturation: FloatValue) -> FloatValue {
    debug_assert!(half_saturation > 0.0, "half saturation must be positive");
    1.0 / (1.0 + par / half_saturation)
}

/// Vapour-pressure-deficit down-regulation scaler.
///
/// 1 at and below `vpd_min`; above it, a logistic decay centred on the
/// midpoint of `[vpd_min, vpd_max]` with the given sensitivity.
pub fn vpd_sigmoid(
    vpd: FloatValue,
    vpd_min: FloatValue,
    vpd_max: FloatValue,
    sensitivity: FloatValue,
) -> FloatValue {
    if vpd <= vpd_min {
        return 1.0;
    }
    let midpoint = 0.5 * (vpd_min + vpd_max);
    1.0 / (1.0 + clamped_exp(sensitivity * (vpd - midpoint)))
}

/// Increasing logistic aging response on a progress variable.
pub fn logistic_aging(
    progress: FloatValue,
    inflection: FloatValue,
    steepness: FloatValue,
) -> FloatValue {
    1.0 / (1.0 + clamped_exp(-steepness * (progress - inflection)))
}

/// Symmetric bell response, `exp(-(x - 50)^2 / 1000)`, peaking at x = 50.
pub fn symmetric_bell(x: FloatValue) -> FloatValue {
    clamped_exp(-(x - 50.0) * (x - 50.0) / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    #[test]
    fn thermal_forcing_is_zero_at_and_outside_cardinals() {
        assert_eq!(thermal_forcing(0.0, 0.0, 20.0, 35.0), 0.0);
        assert_eq!(thermal_forcing(35.0, 0.0, 20.0, 35.0), 0.0);
        assert_eq!(thermal_forcing(-10.0, 0.0, 20.0, 35.0), 0.0);
        assert_eq!(thermal_forcing(50.0, 0.0, 20.0, 35.0), 0.0);
    }

    #[test]
    fn thermal_forcing_peaks_at_optimum() {
        let at_opt = thermal_forcing(20.0, 0.0, 20.0, 35.0);
        assert!(is_close!(at_opt, 1.0));
        for t in [5.0, 10.0, 15.0, 25.0, 30.0] {
            assert!(
                thermal_forcing(t, 0.0, 20.0, 35.0) < at_opt,
                "response at {t} should be below the optimum"
            );
        }
    }

    #[test]
    fn thermal_forcing_is_asymmetric() {
        // Equidistant from the optimum, the warm side falls off faster
        // because tmax is closer to topt than tmin is.
        let cool = thermal_forcing(10.0, 0.0, 20.0, 30.0);
        let warm = thermal_forcing(28.0, 0.0, 20.0, 30.0);
        assert!(cool > 0.0 && warm > 0.0);
        assert!(warm < cool);
    }

    #[test]
    fn sigmoid_limiting_increasing_direction() {
        // not_limiting above limiting: warmer is less limiting.
        assert_eq!(sigmoid_limiting(25.0, 5.0, 20.0), 1.0);
        assert_eq!(sigmoid_limiting(2.0, 5.0, 20.0), 0.0);
        let mid = sigmoid_limiting(12.5, 5.0, 20.0);
        assert!(is_close!(mid, 0.5));
        assert!(sigmoid_limiting(15.0, 5.0, 20.0) > mid);
    }

    #[test]
    fn sigmoid_limiting_decreasing_direction() {
        // not_limiting below limiting: shorter days promote the signal.
        assert_eq!(sigmoid_limiting(9.0, 14.0, 10.5), 1.0);
        assert_eq!(sigmoid_limiting(15.0, 14.0, 10.5), 0.0);
        let mid = sigmoid_limiting(12.25, 14.0, 10.5);
        assert!(is_close!(mid, 0.5));
        assert!(sigmoid_limiting(11.0, 14.0, 10.5) > mid);
    }

    #[test]
    fn chilling_efficiency_segments() {
        let (ll, nl, nu, lu) = (-5.0, 0.0, 8.0, 12.0);
        assert_eq!(chilling_efficiency(-5.0, ll, nl, nu, lu), 0.0);
        assert_eq!(chilling_efficiency(12.0, ll, nl, nu, lu), 0.0);
        assert_eq!(chilling_efficiency(-20.0, ll, nl, nu, lu), 0.0);
        // Plateau between the inner bounds.
        assert_eq!(chilling_efficiency(4.0, ll, nl, nu, lu), 1.0);
        // Ramps are strictly between 0 and 1.
        let rising = chilling_efficiency(-2.5, ll, nl, nu, lu);
        let falling = chilling_efficiency(10.0, ll, nl, nu, lu);
        assert!(rising > 0.0 && rising < 1.0);
        assert!(falling > 0.0 && falling < 1.0);
    }

    #[test]
    fn lloyd_taylor_floors_to_zero_near_singularity() {
        // -50 C is below the T0 + 0.5 K guard (about -45.5 C).
        assert_eq!(lloyd_taylor(-50.0, 150.0), 0.0);
    }

    #[test]
    fn lloyd_taylor_is_one_at_reference_temperature() {
        // Tref = 288.15 K = 15 C.
        assert!(is_close!(lloyd_taylor(15.0, 308.56), 1.0));
    }

    #[test]
    fn lloyd_taylor_increases_with_temperature_and_is_capped() {
        let cold = lloyd_taylor(5.0, 308.56);
        let warm = lloyd_taylor(25.0, 308.56);
        assert!(warm > cold, "warmer should respire more: {warm} vs {cold}");
        assert!(lloyd_taylor(200.0, 2000.0) <= 10.0);
    }

    #[test]
    fn michaelis_menten_is_inverse_saturating() {
        assert!(is_close!(michaelis_menten(0.0, 570.0), 1.0));
        assert!(is_close!(michaelis_menten(570.0, 570.0), 0.5));
        assert!(michaelis_menten(2000.0, 570.0) < michaelis_menten(500.0, 570.0));
    }

    #[test]
    fn vpd_sigmoid_saturates_below_minimum() {
        assert_eq!(vpd_sigmoid(0.5, 0.9, 4.0, 2.0), 1.0);
        assert_eq!(vpd_sigmoid(0.9, 0.9, 4.0, 2.0), 1.0);
        let mid = vpd_sigmoid(2.45, 0.9, 4.0, 2.0);
        assert!(is_close!(mid, 0.5));
        assert!(vpd_sigmoid(4.0, 0.9, 4.0, 2.0) < mid);
    }

    #[test]
    fn logistic_aging_brackets() {
        assert!(logistic_aging(0.0, 50.0, 0.1) < 0.01);
        assert!(is_close!(logistic_aging(50.0, 50.0, 0.1), 0.5));
        assert!(logistic_aging(100.0, 50.0, 0.1) > 0.99);
    }

    #[test]
    fn symmetric_bell_peaks_at_midpoint() {
        assert!(is_close!(symmetric_bell(50.0), 1.0));
        assert!(is_close!(symmetric_bell(0.0), symmetric_bell(100.0)));
        assert!(symmetric_bell(0.0) < symmetric_bell(25.0));
        assert!(symmetric_bell(75.0) < symmetric_bell(50.0));
    }

    #[test]
    fn clamped_exp_never_overflows() {
        assert!(clamped_exp(1e6).is_finite());
        assert!(clamped_exp(-1e6) > 0.0);
    }
}

//! Two-layer canopy structure.
//!
//! Vegetation cover, the overstory/understory EVI–LAI split and the
//! Beer-Lambert gap fractions that partition light between the layers.
//!
//! The overstory carries the vegetation-index signal above the growth-start
//! baseline; the understory tracks the residual greenness the overstory
//! does not explain, evolving by the cover-weighted share of each day's
//! index change.

use phenoflux_core::state::{CanopyLayer, PhenoPhase};
use phenoflux_core::FloatValue;

/// Slope of the empirical overstory LAI fit against total VI.
pub const OVERSTORY_LAI_SLOPE: FloatValue = 9.41;
/// Intercept of the empirical overstory LAI fit.
pub const OVERSTORY_LAI_INTERCEPT: FloatValue = 1.67;
/// Slope of the empirical understory LAI fit against understory EVI.
pub const UNDERSTORY_LAI_SLOPE: FloatValue = 3.618;
/// Intercept of the empirical understory LAI fit.
pub const UNDERSTORY_LAI_INTERCEPT: FloatValue = 0.118;
/// Diffuse extinction relative to the direct-beam coefficient.
pub const DIFFUSE_EXTINCTION_RATIO: FloatValue = 0.8;

/// Fraction of the pixel covered by active overstory vegetation, [0, 1].
///
/// Ramps from the growth-start index to the asymptote during growth, holds
/// at 1 through greendown, and ramps back down from the decline-start
/// index during decline. Dormant phases have no overstory cover.
pub fn vegetation_cover(
    phase: PhenoPhase,
    vi_fraction: FloatValue,
    vi_at_growth: FloatValue,
    vi_at_greendown: FloatValue,
    maximum_vi: FloatValue,
) -> FloatValue {
    match phase {
        PhenoPhase::Growth => {
            let span = maximum_vi - vi_at_growth;
            if span > 0.0 {
                ((vi_fraction - vi_at_growth) / span).clamp(0.0, 1.0)
            } else {
                1.0
            }
        }
        PhenoPhase::Greendown => 1.0,
        PhenoPhase::Decline => {
            let span = vi_at_greendown - vi_at_growth;
            if span > 0.0 {
                ((vi_fraction - vi_at_growth) / span).clamp(0.0, 1.0)
            } else {
                0.0
            }
        }
        PhenoPhase::DormancyInduction | PhenoPhase::Dormancy => 0.0,
    }
}

/// Estimate today's overstory and understory EVI/LAI.
///
/// Before growth the overstory is fully dormant and the understory carries
/// the whole index. From growth onwards the overstory carries the index
/// above the growth-start baseline and the understory accumulates the
/// residual index change weighted by the uncovered fraction, capped at the
/// total index.
pub fn estimate_layers(
    phase: PhenoPhase,
    vi_fraction: FloatValue,
    previous_vi_fraction: FloatValue,
    vi_at_growth: FloatValue,
    vegetation_cover: FloatValue,
    previous_understory_evi: FloatValue,
) -> (CanopyLayer, CanopyLayer) {
    if !phase.is_growing_season() {
        let understory_evi = vi_fraction.max(0.0);
        let overstory = CanopyLayer { evi: 0.0, lai: 0.0 };
        let understory = CanopyLayer {
            evi: understory_evi,
            lai: understory_lai(understory_evi),
        };
        (overstory, understory)
    } else {
        let overstory_evi = (vi_fraction - vi_at_growth).max(0.0);
        let overstory_lai =
            (OVERSTORY_LAI_SLOPE * vi_fraction - OVERSTORY_LAI_INTERCEPT).max(0.0);
        let residual = (1.0 - vegetation_cover) * (vi_fraction - previous_vi_fraction);
        let understory_evi = (previous_understory_evi + residual).clamp(0.0, vi_fraction.max(0.0));
        let overstory = CanopyLayer {
            evi: overstory_evi,
            lai: overstory_lai,
        };
        let understory = CanopyLayer {
            evi: understory_evi,
            lai: understory_lai(understory_evi),
        };
        (overstory, understory)
    }
}

fn understory_lai(evi: FloatValue) -> FloatValue {
    (UNDERSTORY_LAI_SLOPE * evi - UNDERSTORY_LAI_INTERCEPT).max(0.0)
}

/// Beer-Lambert gap fractions through the overstory for direct and diffuse
/// beams. Diffuse radiation sees a shallower effective extinction.
#[derive(Debug, Clone, Copy)]
pub struct GapFractions {
    pub direct: FloatValue,
    pub diffuse: FloatValue,
}

impl GapFractions {
    pub fn new(overstory_lai: FloatValue, extinction_coefficient: FloatValue) -> Self {
        let lai = overstory_lai.max(0.0);
        Self {
            direct: (-extinction_coefficient * lai).exp(),
            diffuse: (-DIFFUSE_EXTINCTION_RATIO * extinction_coefficient * lai).exp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cover_ramps_up_through_growth() {
        let low = vegetation_cover(PhenoPhase::Growth, 0.25, 0.2, 0.8, 0.85);
        let high = vegetation_cover(PhenoPhase::Growth, 0.7, 0.2, 0.8, 0.85);
        assert!(low < high);
        assert_relative_eq!(
            vegetation_cover(PhenoPhase::Growth, 0.85, 0.2, 0.8, 0.85),
            1.0
        );
    }

    #[test]
    fn cover_is_full_during_greendown_and_zero_when_dormant() {
        assert_eq!(
            vegetation_cover(PhenoPhase::Greendown, 0.6, 0.2, 0.8, 0.85),
            1.0
        );
        assert_eq!(
            vegetation_cover(PhenoPhase::Dormancy, 0.6, 0.2, 0.8, 0.85),
            0.0
        );
        assert_eq!(
            vegetation_cover(PhenoPhase::DormancyInduction, 0.6, 0.2, 0.8, 0.85),
            0.0
        );
    }

    #[test]
    fn cover_ramps_down_through_decline_with_a_floor() {
        let early = vegetation_cover(PhenoPhase::Decline, 0.75, 0.2, 0.8, 0.85);
        let late = vegetation_cover(PhenoPhase::Decline, 0.3, 0.2, 0.8, 0.85);
        assert!(early > late);
        assert_eq!(vegetation_cover(PhenoPhase::Decline, 0.1, 0.2, 0.8, 0.85), 0.0);
    }

    #[test]
    fn dormant_overstory_has_no_leaf_area() {
        let (overstory, understory) =
            estimate_layers(PhenoPhase::Dormancy, 0.3, 0.3, 0.2, 0.0, 0.1);
        assert_eq!(overstory.evi, 0.0);
        assert_eq!(overstory.lai, 0.0);
        assert_relative_eq!(understory.evi, 0.3);
        assert!(understory.lai > 0.0);
    }

    #[test]
    fn growing_overstory_follows_the_index_above_baseline() {
        let (overstory, _) = estimate_layers(PhenoPhase::Growth, 0.6, 0.55, 0.2, 0.5, 0.1);
        assert_relative_eq!(overstory.evi, 0.4);
        assert_relative_eq!(overstory.lai, 9.41 * 0.6 - 1.67);
    }

    #[test]
    fn understory_accumulates_the_uncovered_residual() {
        // Half the index change is unexplained by the overstory cover.
        let (_, understory) = estimate_layers(PhenoPhase::Growth, 0.6, 0.5, 0.2, 0.5, 0.1);
        assert_relative_eq!(understory.evi, 0.1 + 0.5 * 0.1);
    }

    #[test]
    fn understory_is_capped_at_the_total_index() {
        let (_, understory) = estimate_layers(PhenoPhase::Growth, 0.3, 0.2, 0.2, 0.0, 0.35);
        assert_relative_eq!(understory.evi, 0.3);
    }

    #[test]
    fn lai_fits_are_floored_at_zero() {
        let (overstory, understory) =
            estimate_layers(PhenoPhase::Growth, 0.1, 0.1, 0.05, 0.5, 0.0);
        assert_eq!(overstory.lai, 0.0);
        assert_eq!(understory.lai, 0.0);
    }

    #[test]
    fn gaps_close_as_leaf_area_grows() {
        let bare = GapFractions::new(0.0, 0.5);
        assert_relative_eq!(bare.direct, 1.0);
        assert_relative_eq!(bare.diffuse, 1.0);

        let dense = GapFractions::new(4.0, 0.5);
        assert!(dense.direct < 0.2);
        // Diffuse light penetrates deeper than direct light.
        assert!(dense.diffuse > dense.direct);
    }
}

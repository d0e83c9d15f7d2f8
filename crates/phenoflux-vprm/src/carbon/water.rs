//! Rolling water-stress window.
//!
//! Each hour appends one precipitation and one reference-ET0 sample to a
//! pair of bounded memories. Until the window is full the point is assumed
//! unstressed; once full, the supply/demand ratio over the window is
//! blended with the vegetation index (denser canopies buffer shortfalls)
//! and mapped through a threshold-and-sensitivity linear response. The
//! oldest sample is evicted only once the window is exactly full, so the
//! memories never exceed their capacity.

use std::collections::VecDeque;

use phenoflux_core::FloatValue;

/// Append one hour of water-balance data and return the stress scaler.
#[allow(clippy::too_many_arguments)]
pub fn water_stress_update(
    precipitation_memory: &mut VecDeque<FloatValue>,
    et0_memory: &mut VecDeque<FloatValue>,
    capacity: usize,
    precipitation: FloatValue,
    et0: FloatValue,
    vi_fraction: FloatValue,
    threshold: FloatValue,
    sensitivity: FloatValue,
) -> FloatValue {
    precipitation_memory.push_back(precipitation.max(0.0));
    et0_memory.push_back(et0.max(0.0));
    if precipitation_memory.len() < capacity {
        // Not enough history yet: assume unstressed.
        return 1.0;
    }

    let precipitation_sum: FloatValue = precipitation_memory.iter().sum();
    // Demand floored at supply keeps the ratio in [0, 1] after wet spells.
    let demand = et0_memory.iter().sum::<FloatValue>().max(precipitation_sum);
    let ratio = if demand > 0.0 {
        (precipitation_sum / demand).clamp(0.0, 1.0)
    } else {
        1.0
    };

    let vi = vi_fraction.clamp(0.0, 1.0);
    let availability = vi + (1.0 - vi) * ratio;
    let stress = if availability >= threshold {
        1.0
    } else {
        (1.0 - sensitivity * (threshold - availability)).clamp(0.0, 1.0)
    };

    precipitation_memory.pop_front();
    et0_memory.pop_front();
    stress
}

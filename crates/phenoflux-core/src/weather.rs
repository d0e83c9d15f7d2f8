//! Daily weather and solar geometry input records.
//!
//! The model consumes one [`DailyWeather`] record per simulated day, with
//! the 24-element hourly arrays already populated by an external
//! disaggregation step, together with a [`SolarGeometry`] record for the
//! same date and latitude. [`SolarGeometry::for_day`] provides the minimal
//! day-length and extraterrestrial-radiation values the model needs when no
//! external solar dataset is available.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{PhenoError, PhenoResult};
use crate::FloatValue;

/// Number of hourly samples per day.
pub const HOURS_PER_DAY: usize = 24;

/// Latitude band where the day-length approximation holds.
pub const MIN_LATITUDE: FloatValue = -65.0;
pub const MAX_LATITUDE: FloatValue = 65.0;

/// Solar constant (W m⁻²).
pub const SOLAR_CONSTANT: FloatValue = 1367.0;

/// One day of weather forcing for a single point.
///
/// Daily aggregates plus hourly arrays. Hourly temperature is expected to
/// peak in the early afternoon and hourly solar radiation to follow the
/// extraterrestrial-radiation shape; how the arrays are produced (measured
/// or disaggregated from daily observations) is up to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyWeather {
    pub date: NaiveDate,
    /// Latitude of the point (degrees, positive north).
    pub latitude: FloatValue,
    /// Daily maximum air temperature (°C).
    pub temperature_max: FloatValue,
    /// Daily minimum air temperature (°C).
    pub temperature_min: FloatValue,
    /// Daily photosynthetically active radiation (MJ m⁻² d⁻¹).
    pub par: FloatValue,
    /// Daily shortwave radiation (MJ m⁻² d⁻¹).
    pub solar_radiation: FloatValue,
    /// Daily maximum relative humidity (%).
    pub relative_humidity_max: FloatValue,
    /// Daily minimum relative humidity (%).
    pub relative_humidity_min: FloatValue,
    /// Mean wind speed (m s⁻¹).
    pub wind_speed: FloatValue,
    /// Dew point temperature (°C).
    pub dew_point: FloatValue,
    /// Daily precipitation (mm).
    pub precipitation: FloatValue,
    /// Hourly air temperature (°C).
    pub hourly_temperature: [FloatValue; HOURS_PER_DAY],
    /// Hourly shortwave radiation (W m⁻²).
    pub hourly_solar: [FloatValue; HOURS_PER_DAY],
    /// Hourly precipitation (mm).
    pub hourly_precipitation: [FloatValue; HOURS_PER_DAY],
    /// Hourly relative humidity (%).
    pub hourly_relative_humidity: [FloatValue; HOURS_PER_DAY],
    /// Hourly vapour pressure deficit (kPa).
    pub hourly_vpd: [FloatValue; HOURS_PER_DAY],
    /// Hourly reference evapotranspiration (mm).
    pub hourly_et0: [FloatValue; HOURS_PER_DAY],
}

impl DailyWeather {
    /// Mean air temperature, `(tmax + tmin) / 2` (°C).
    pub fn mean_temperature(&self) -> FloatValue {
        0.5 * (self.temperature_max + self.temperature_min)
    }

    /// Check the record against the input contract.
    pub fn validate(&self) -> PhenoResult<()> {
        if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&self.latitude) {
            return Err(PhenoError::InvalidLatitude(self.latitude));
        }
        if self.temperature_max < self.temperature_min {
            return Err(PhenoError::Error(format!(
                "temperature_max ({}) below temperature_min ({}) on {}",
                self.temperature_max, self.temperature_min, self.date
            )));
        }
        if self.precipitation < 0.0 {
            return Err(PhenoError::Error(format!(
                "negative precipitation ({}) on {}",
                self.precipitation, self.date
            )));
        }
        Ok(())
    }
}

/// Day length, sunrise/sunset and the hourly extraterrestrial-radiation
/// profile for one date and latitude.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolarGeometry {
    /// Astronomical day length (h).
    pub day_length: FloatValue,
    /// Sunrise, in decimal hours of local solar time.
    pub sunrise_hour: FloatValue,
    /// Sunset, in decimal hours of local solar time.
    pub sunset_hour: FloatValue,
    /// Hourly extraterrestrial shortwave radiation (W m⁻²).
    pub hourly_extraterrestrial: [FloatValue; HOURS_PER_DAY],
}

impl SolarGeometry {
    /// Compute the record for a given latitude (degrees) and day of year.
    ///
    /// Solar declination follows the FAO-56 approximation
    /// `δ = 0.409 sin(2π J / 365 − 1.39)`; latitudes outside
    /// [[`MIN_LATITUDE`], [`MAX_LATITUDE`]] are rejected.
    pub fn for_day(latitude: FloatValue, day_of_year: u32) -> PhenoResult<Self> {
        if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
            return Err(PhenoError::InvalidLatitude(latitude));
        }
        let declination = solar_declination(day_of_year);
        let latitude_rad = latitude.to_radians();
        let sunset_angle = (-latitude_rad.tan() * declination.tan())
            .clamp(-1.0, 1.0)
            .acos();
        let day_length = sunset_angle * 24.0 / std::f64::consts::PI;
        let sunrise_hour = 12.0 - 0.5 * day_length;
        let sunset_hour = 12.0 + 0.5 * day_length;

        // Relative earth-sun distance correction.
        let dr = 1.0 + 0.033 * (2.0 * std::f64::consts::PI * day_of_year as FloatValue / 365.0).cos();

        let mut hourly_extraterrestrial = [0.0; HOURS_PER_DAY];
        for (hour, ra) in hourly_extraterrestrial.iter_mut().enumerate() {
            // Hour angle at the centre of the hourly interval.
            let omega = (hour as FloatValue + 0.5 - 12.0) * std::f64::consts::PI / 12.0;
            if omega.abs() < sunset_angle {
                let elevation = latitude_rad.sin() * declination.sin()
                    + latitude_rad.cos() * declination.cos() * omega.cos();
                *ra = (SOLAR_CONSTANT * dr * elevation).max(0.0);
            }
        }

        Ok(Self {
            day_length,
            sunrise_hour,
            sunset_hour,
            hourly_extraterrestrial,
        })
    }
}

/// Astronomical day length (h) for a latitude (degrees) and day of year.
pub fn day_length_hours(latitude: FloatValue, day_of_year: u32) -> FloatValue {
    let declination = solar_declination(day_of_year);
    let latitude_rad = latitude.to_radians();
    let sunset_angle = (-latitude_rad.tan() * declination.tan())
        .clamp(-1.0, 1.0)
        .acos();
    sunset_angle * 24.0 / std::f64::consts::PI
}

fn solar_declination(day_of_year: u32) -> FloatValue {
    0.409 * (2.0 * std::f64::consts::PI / 365.0 * day_of_year as FloatValue - 1.39).sin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    fn flat_weather(latitude: FloatValue) -> DailyWeather {
        DailyWeather {
            date: NaiveDate::from_ymd_opt(2018, 6, 21).unwrap(),
            latitude,
            temperature_max: 25.0,
            temperature_min: 12.0,
            par: 10.0,
            solar_radiation: 22.0,
            relative_humidity_max: 90.0,
            relative_humidity_min: 45.0,
            wind_speed: 2.0,
            dew_point: 10.0,
            precipitation: 0.0,
            hourly_temperature: [18.0; HOURS_PER_DAY],
            hourly_solar: [250.0; HOURS_PER_DAY],
            hourly_precipitation: [0.0; HOURS_PER_DAY],
            hourly_relative_humidity: [70.0; HOURS_PER_DAY],
            hourly_vpd: [1.0; HOURS_PER_DAY],
            hourly_et0: [0.1; HOURS_PER_DAY],
        }
    }

    #[test]
    fn mean_temperature_averages_extremes() {
        let weather = flat_weather(45.0);
        assert!(is_close!(weather.mean_temperature(), 18.5));
    }

    #[test]
    fn validate_rejects_out_of_band_latitude() {
        assert!(flat_weather(45.0).validate().is_ok());
        assert!(matches!(
            flat_weather(70.0).validate(),
            Err(PhenoError::InvalidLatitude(_))
        ));
        assert!(matches!(
            flat_weather(-66.0).validate(),
            Err(PhenoError::InvalidLatitude(_))
        ));
    }

    #[test]
    fn validate_rejects_inverted_temperatures() {
        let mut weather = flat_weather(45.0);
        weather.temperature_min = 30.0;
        assert!(weather.validate().is_err());
    }

    #[test]
    fn day_length_summer_longer_than_winter_in_the_north() {
        let summer = day_length_hours(45.0, 172);
        let winter = day_length_hours(45.0, 355);
        assert!(
            summer > 14.0 && summer < 16.5,
            "summer solstice day length at 45N should be ~15.5 h, got {summer}"
        );
        assert!(
            winter > 8.0 && winter < 10.0,
            "winter solstice day length at 45N should be ~8.7 h, got {winter}"
        );
    }

    #[test]
    fn day_length_near_twelve_hours_at_equator() {
        for doy in [1, 80, 172, 266, 355] {
            let dl = day_length_hours(0.0, doy);
            assert!(
                (dl - 12.0).abs() < 0.2,
                "equatorial day length should stay near 12 h, got {dl} on day {doy}"
            );
        }
    }

    #[test]
    fn solar_geometry_is_dark_outside_daylight() {
        let solar = SolarGeometry::for_day(45.0, 172).unwrap();
        assert_eq!(solar.hourly_extraterrestrial[0], 0.0);
        assert_eq!(solar.hourly_extraterrestrial[23], 0.0);
        assert!(solar.hourly_extraterrestrial[12] > 800.0);
        assert!(is_close!(
            solar.sunset_hour - solar.sunrise_hour,
            solar.day_length
        ));
    }

    #[test]
    fn solar_geometry_rejects_polar_latitudes() {
        assert!(SolarGeometry::for_day(70.0, 172).is_err());
    }

    #[test]
    fn weather_serializes_round_trip() {
        let weather = flat_weather(45.0);
        let json = serde_json::to_string(&weather).unwrap();
        let parsed: DailyWeather = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.date, weather.date);
        assert!(is_close!(parsed.hourly_vpd[3], weather.hourly_vpd[3]));
    }
}

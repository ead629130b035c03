//! Weather widget data.

use serde::{Deserialize, Serialize};

/// Sky condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Soleado,
    ParcialmenteNublado,
    Nublado,
    Lluvia,
    Tormenta,
}

/// Forecast for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Short day label (e.g., "Lun").
    pub day: String,

    pub min_c: f64,

    pub max_c: f64,

    pub condition: WeatherCondition,
}

/// Current weather at the farm plus a short forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    /// Location label.
    pub location: String,

    /// Temperature in Celsius.
    pub temperature_c: f64,

    /// Relative humidity in percent.
    pub humidity_pct: f64,

    /// Wind speed in km/h.
    pub wind_kmh: f64,

    /// Precipitation in the last 24h, in mm.
    pub precipitation_mm: f64,

    pub condition: WeatherCondition,

    pub forecast: Vec<DailyForecast>,
}

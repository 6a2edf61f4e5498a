use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, str::FromStr};

/// Unit system requested from the provider and shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl TemperatureUnit {
    /// Value of the provider's `units` query parameter; also the persisted form.
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Metric => "metric",
            TemperatureUnit::Imperial => "imperial",
            TemperatureUnit::Standard => "standard",
        }
    }

    pub const fn all() -> &'static [TemperatureUnit] {
        &[
            TemperatureUnit::Metric,
            TemperatureUnit::Imperial,
            TemperatureUnit::Standard,
        ]
    }

    /// Label used by the settings picker.
    pub fn display_label(&self) -> &'static str {
        match self {
            TemperatureUnit::Metric => "Metric (°C)",
            TemperatureUnit::Imperial => "Imperial (°F)",
            TemperatureUnit::Standard => "Standard (K)",
        }
    }

    /// Inverse of [`display_label`](Self::display_label). Unknown labels fall back to metric.
    pub fn from_display_label(label: &str) -> Self {
        Self::all()
            .iter()
            .copied()
            .find(|u| u.display_label() == label)
            .unwrap_or_default()
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Metric => "°C",
            TemperatureUnit::Imperial => "°F",
            TemperatureUnit::Standard => "K",
        }
    }

    pub fn wind_speed_label(&self) -> &'static str {
        match self {
            TemperatureUnit::Imperial => "mph",
            TemperatureUnit::Metric | TemperatureUnit::Standard => "m/s",
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TemperatureUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "metric" => Ok(TemperatureUnit::Metric),
            "imperial" => Ok(TemperatureUnit::Imperial),
            "standard" => Ok(TemperatureUnit::Standard),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported values: metric, imperial, standard."
            )),
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemperatureUnit::try_from(s)
    }
}

use forecast_core::{
    DayForecast, Favorite, Forecast, TemperatureUnit,
    model::{format_date, format_decimal, format_time},
};
use std::fmt::Write;

/// Today's panel followed by the day-by-day breakdown.
pub fn forecast(forecast: &Forecast, unit: TemperatureUnit) -> String {
    let mut out = String::new();
    let symbol = unit.temperature_symbol();

    let _ = writeln!(out, "{}, {}", forecast.city.name, forecast.city.country);

    if let Some(today) = forecast.today() {
        let _ = writeln!(out, "{}", format_date(today.timestamp));
        let _ = writeln!(out, "{}", today.icon_url());
        let _ = writeln!(
            out,
            "{}{symbol}  {} ({})",
            format_decimal(today.temperature.day),
            today.condition.main,
            today.condition.description,
        );
        let _ = writeln!(
            out,
            "Humidity {}%   Pressure {} hPa   Wind {} {}",
            today.humidity,
            today.pressure,
            format_decimal(today.wind_speed),
            unit.wind_speed_label(),
        );
        if let (Some(sunrise), Some(sunset)) = (today.sunrise, today.sunset) {
            let _ = writeln!(
                out,
                "Sunrise {}   Sunset {}",
                format_time(sunrise),
                format_time(sunset)
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}-Day Forecast", forecast.days.len());
    for day in &forecast.days {
        let _ = writeln!(out, "{}", day_row(day, symbol));
    }

    out
}

fn day_row(day: &DayForecast, symbol: &str) -> String {
    format!(
        "{:<12} {:<14} {:>5}{symbol} / {}{symbol}",
        format_date(day.timestamp),
        day.condition.description,
        format_decimal(day.temperature.min),
        format_decimal(day.temperature.max),
    )
}

pub fn favorites(list: &[Favorite]) -> String {
    if list.is_empty() {
        return "No favorite cities yet.\nHint: run `forecast show <city> --save`.\n".to_string();
    }

    let mut out = String::new();
    for fav in list {
        let _ = writeln!(out, "{:<24} {}", fav.city, fav.country);
    }
    out
}

pub fn settings(unit: TemperatureUnit) -> String {
    format!("Temperature unit: {}\n", unit.display_label())
}

pub fn about() -> String {
    format!(
        "forecast {}\n\
         A weather forecast client: look up a city, keep favorites, pick your units.\n\
         Weather data provided by the OpenWeather API (https://openweathermap.org).\n",
        env!("CARGO_PKG_VERSION")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use forecast_core::{City, Condition, Temperature};

    fn sample() -> Forecast {
        let day = |ts: i64, min: f64, max: f64| DayForecast {
            timestamp: ts,
            temperature: Temperature {
                day: 22.4,
                min,
                max,
                night: None,
                eve: None,
                morn: None,
            },
            humidity: 62,
            pressure: 1018,
            wind_speed: 5.1,
            condition: Condition {
                main: "Clouds".into(),
                description: "few clouds".into(),
                icon_id: "02d".into(),
            },
            sunrise: Some(ts - 21_600),
            sunset: Some(ts + 21_600),
        };

        Forecast {
            city: City {
                name: "Lisbon".into(),
                country: "PT".into(),
            },
            // 2024-06-01 12:00 UTC and the next two days
            days: vec![
                day(1_717_243_200, 16.0, 25.0),
                day(1_717_329_600, 15.2, 24.6),
                day(1_717_416_000, 14.0, 23.0),
            ],
        }
    }

    #[test]
    fn renders_today_panel_and_rows() {
        let text = forecast(&sample(), TemperatureUnit::Metric);

        assert!(text.starts_with("Lisbon, PT\n"));
        assert!(text.contains("Sat, Jun 1"));
        assert!(text.contains("https://openweathermap.org/img/wn/02d.png"));
        assert!(text.contains("22°C  Clouds (few clouds)"));
        assert!(text.contains("Humidity 62%   Pressure 1018 hPa   Wind 5 m/s"));
        assert!(text.contains("Sunrise 06:00 AM   Sunset 06:00 PM"));
        assert!(text.contains("3-Day Forecast"));
        assert!(text.contains("Mon, Jun 3"));
    }

    #[test]
    fn uses_unit_symbols() {
        let text = forecast(&sample(), TemperatureUnit::Imperial);
        assert!(text.contains("22°F"));
        assert!(text.contains("mph"));
    }

    #[test]
    fn empty_favorites_hint() {
        assert!(favorites(&[]).contains("No favorite cities yet"));
    }

    #[test]
    fn lists_favorites() {
        let text = favorites(&[Favorite::new("Seattle", "US"), Favorite::new("Lisbon", "PT")]);
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("Seattle"));
    }

    #[test]
    fn settings_shows_label() {
        assert_eq!(settings(TemperatureUnit::Standard), "Temperature unit: Standard (K)\n");
    }
}

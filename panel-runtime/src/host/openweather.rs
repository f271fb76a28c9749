//! OpenWeather current-conditions source
//!
//! Fetches `/data/2.5/weather` with `curl` and decodes the JSON body with
//! `serde_json`. Blocking; the weather task runs it on a worker thread.

use std::process::Command;

use serde::Deserialize;
use tracing::debug;

use panel_core::config::WeatherConfig;
use panel_core::traits::WeatherSource;
use panel_core::weather::{Units, WeatherError, WeatherReading};

const ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Seconds before curl gives up
const REQUEST_TIMEOUT_SECS: u32 = 10;

#[derive(Debug, Deserialize)]
struct Response {
    main: Main,
    weather: Vec<Condition>,
    wind: Wind,
    sys: Sys,
}

#[derive(Debug, Deserialize)]
struct Main {
    temp: f32,
}

#[derive(Debug, Deserialize)]
struct Condition {
    main: String,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f32,
    #[serde(default)]
    deg: f32,
}

#[derive(Debug, Deserialize)]
struct Sys {
    sunrise: i64,
    sunset: i64,
}

/// Decode a current-weather response body
pub fn decode(body: &str) -> Result<WeatherReading, WeatherError> {
    let response: Response = serde_json::from_str(body).map_err(|e| {
        debug!("weather decode failed: {}", e);
        WeatherError::Decode
    })?;

    let mut condition = heapless::String::new();
    if let Some(first) = response.weather.first() {
        for c in first.main.chars() {
            if condition.push(c).is_err() {
                break;
            }
        }
    }

    Ok(WeatherReading {
        temperature: response.main.temp,
        condition,
        wind_speed: response.wind.speed,
        wind_degrees: response.wind.deg,
        sunrise: response.sys.sunrise,
        sunset: response.sys.sunset,
    })
}

/// OpenWeather client
#[derive(Debug, Clone)]
pub struct OpenWeather {
    api_key: Option<String>,
    latitude: Option<f32>,
    longitude: Option<f32>,
    units: Units,
}

impl OpenWeather {
    pub fn new(config: &WeatherConfig) -> Self {
        Self {
            api_key: config.api_key.as_ref().map(|k| k.as_str().to_string()),
            latitude: config.latitude,
            longitude: config.longitude,
            units: config.units,
        }
    }

    /// Request URL, or `None` while the key or location is missing
    pub fn url(&self) -> Option<String> {
        let key = self.api_key.as_deref().filter(|k| !k.is_empty())?;
        let (lat, lon) = (self.latitude?, self.longitude?);
        Some(format!(
            "{}?lat={}&lon={}&appid={}&units={}",
            ENDPOINT,
            lat,
            lon,
            key,
            self.units.as_str()
        ))
    }
}

/// Split curl output into body and the status code appended by `--write-out`
fn split_status(output: &str) -> Result<(&str, u16), WeatherError> {
    let (body, code) = output.rsplit_once('\n').ok_or(WeatherError::Transport)?;
    let code = code.trim().parse().map_err(|_| WeatherError::Transport)?;
    Ok((body, code))
}

impl WeatherSource for OpenWeather {
    fn fetch(&mut self) -> Result<WeatherReading, WeatherError> {
        let url = self.url().ok_or(WeatherError::Misconfigured)?;
        let timeout = REQUEST_TIMEOUT_SECS.to_string();

        let output = Command::new("curl")
            .args(["--silent", "--show-error", "--max-time", &timeout])
            .args(["--write-out", "\n%{http_code}"])
            .arg(&url)
            .output()
            .map_err(|e| {
                debug!("cannot run curl: {}", e);
                WeatherError::Transport
            })?;
        if !output.status.success() {
            debug!("curl failed: {}", String::from_utf8_lossy(&output.stderr).trim());
            return Err(WeatherError::Transport);
        }

        let text = String::from_utf8_lossy(&output.stdout);
        let (body, code) = split_status(&text)?;
        if code != 200 {
            return Err(WeatherError::Status(code));
        }
        decode(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "coord": {"lon": -75.16, "lat": 39.95},
        "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
        "main": {"temp": 71.6, "feels_like": 71.2, "pressure": 1016, "humidity": 60},
        "wind": {"speed": 5.2, "deg": 30},
        "sys": {"country": "US", "sunrise": 1700000000, "sunset": 1700040000},
        "name": "Philadelphia",
        "cod": 200
    }"#;

    #[test]
    fn test_decode_sample() {
        let reading = decode(SAMPLE).unwrap();
        assert_eq!(reading.temperature, 71.6);
        assert_eq!(reading.condition.as_str(), "Clouds");
        assert_eq!(reading.wind_speed, 5.2);
        assert_eq!(reading.wind_degrees, 30.0);
        assert_eq!(reading.sunrise, 1_700_000_000);
        assert_eq!(reading.sunset, 1_700_040_000);
    }

    #[test]
    fn test_decode_calm_without_direction() {
        let body = r#"{"weather":[{"main":"Clear"}],"main":{"temp":-3},"wind":{"speed":0},"sys":{"sunrise":1,"sunset":2}}"#;
        let reading = decode(body).unwrap();
        assert_eq!(reading.wind_degrees, 0.0);
        assert_eq!(reading.temperature, -3.0);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(decode("not json"), Err(WeatherError::Decode));
        assert_eq!(decode(r#"{"cod": 401}"#), Err(WeatherError::Decode));
    }

    #[test]
    fn test_long_condition_truncated() {
        let body = r#"{"weather":[{"main":"Thunderstorm with heavy drizzle"}],"main":{"temp":60},"wind":{"speed":3,"deg":90},"sys":{"sunrise":1,"sunset":2}}"#;
        let reading = decode(body).unwrap();
        assert_eq!(reading.condition.as_str(), "Thunderstorm with heavy ");
    }

    #[test]
    fn test_url_requires_key_and_location() {
        let mut config = WeatherConfig::default();
        assert_eq!(OpenWeather::new(&config).url(), None);
        config.api_key = Some("k".try_into().unwrap());
        config.latitude = Some(40.0);
        config.longitude = Some(-75.5);
        assert_eq!(
            OpenWeather::new(&config).url().unwrap(),
            "https://api.openweathermap.org/data/2.5/weather?lat=40&lon=-75.5&appid=k&units=imperial"
        );
    }

    #[test]
    fn test_misconfigured_fetch() {
        let mut source = OpenWeather::new(&WeatherConfig::default());
        assert_eq!(source.fetch(), Err(WeatherError::Misconfigured));
    }

    #[test]
    fn test_split_status() {
        assert_eq!(split_status("{}\n404"), Ok(("{}", 404)));
        assert_eq!(split_status("no status"), Err(WeatherError::Transport));
    }
}

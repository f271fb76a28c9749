//! Weather page
//!
//! Formats current conditions for the 16x2 display:
//!
//! ```text
//! ┌────────────────┐
//! │9:41ᵃ  72℉ Clear│
//! │5mph NNE  ●7:58ᵖ│
//! └────────────────┘
//! ```
//!
//! Line one is the clock, temperature and conditions with the free space
//! split around the temperature. Line two is the wind and the next sun
//! event: sunset (moon glyph) during daylight, otherwise sunrise.
//!
//! The view is a small state machine driven by the controller:
//! `Loading` until the first fetch, then `Ready` or `Unavailable`; a view
//! without credentials stays `Misconfigured`. Every minute only the clock is
//! redrawn, on quarter hours a full refresh is requested instead.

use core::fmt::{self, Write};

use heapless::String;
use panel_protocol::{Align, Line, Message, Symbol, LINE_WIDTH};

use crate::clock::{is_quarter_hour, LocalTime};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum stored length of the conditions text
pub const MAX_CONDITION_LEN: usize = 24;

const DIRECTIONS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Measurement system used by the weather service and the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Units {
    /// Fahrenheit and mph
    #[default]
    Imperial,
    /// Celsius and m/s
    Metric,
}

impl Units {
    /// Name used in service queries
    pub fn as_str(self) -> &'static str {
        match self {
            Units::Imperial => "imperial",
            Units::Metric => "metric",
        }
    }

    pub fn temperature_symbol(self) -> Symbol {
        match self {
            Units::Imperial => Symbol::Fahrenheit,
            Units::Metric => Symbol::Celsius,
        }
    }

    pub fn speed_suffix(self) -> &'static str {
        match self {
            Units::Imperial => "mph",
            Units::Metric => "m/s",
        }
    }
}

/// Current conditions as reported by the weather service
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    /// Temperature in the configured units
    pub temperature: f32,
    /// Short conditions text, e.g. "Clouds"
    pub condition: String<MAX_CONDITION_LEN>,
    /// Wind speed in the configured units
    pub wind_speed: f32,
    /// Meteorological wind direction in degrees
    pub wind_degrees: f32,
    /// Unix timestamp of today's sunrise
    pub sunrise: i64,
    /// Unix timestamp of today's sunset
    pub sunset: i64,
}

/// Why a weather fetch failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherError {
    /// The request could not be made or timed out
    Transport,
    /// The service answered with a non-success status
    Status(u16),
    /// The response body was not understood
    Decode,
    /// API key or location missing
    Misconfigured,
}

impl fmt::Display for WeatherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherError::Transport => f.write_str("weather request failed"),
            WeatherError::Status(code) => write!(f, "weather service returned {}", code),
            WeatherError::Decode => f.write_str("weather response not understood"),
            WeatherError::Misconfigured => f.write_str("weather API key or location missing"),
        }
    }
}

/// Where the page is in its lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherState {
    Loading,
    Ready(WeatherReading),
    Unavailable,
    Misconfigured,
}

/// What the minute tick asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinuteAction {
    /// Only the clock changed; the message was updated in place
    ClockUpdated,
    /// Fetch new conditions
    Refresh,
    /// Nothing to redraw
    Idle,
}

/// What asked for a weather refresh
///
/// Ordered so that merging two pending requests keeps the scheduled one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RefreshReason {
    /// The weather page became the top of the stack
    Activation,
    /// Quarter-hour tick while the page was visible
    Schedule,
}

/// Compass sector for a wind direction
///
/// `floor(((deg + 11.25) mod 360) / 22.5)` over the sixteen points.
pub fn wind_direction(degrees: f32) -> &'static str {
    let mut d = libm::fmodf(degrees + 11.25, 360.0);
    if d < 0.0 {
        d += 360.0;
    }
    let index = libm::floorf(d / 22.5) as usize % DIRECTIONS.len();
    DIRECTIONS[index]
}

/// Weather page state and the message it currently shows
#[derive(Debug, Clone)]
pub struct WeatherView {
    state: WeatherState,
    units: Units,
    utc_offset_minutes: i16,
    message: Message,
}

impl WeatherView {
    /// New page; `configured` is false when credentials or location are
    /// missing
    pub fn new(units: Units, utc_offset_minutes: i16, configured: bool, now_unix: i64) -> Self {
        let state = if configured {
            WeatherState::Loading
        } else {
            WeatherState::Misconfigured
        };
        let mut view = Self {
            state,
            units,
            utc_offset_minutes,
            message: Message::default(),
        };
        view.redraw(now_unix);
        view
    }

    pub fn state(&self) -> &WeatherState {
        &self.state
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Whether a fetch can ever succeed
    pub fn is_configured(&self) -> bool {
        self.state != WeatherState::Misconfigured
    }

    /// Apply the outcome of a fetch
    pub fn apply(&mut self, result: Result<WeatherReading, WeatherError>, now_unix: i64) {
        self.state = match result {
            Ok(reading) => WeatherState::Ready(reading),
            Err(WeatherError::Misconfigured) => WeatherState::Misconfigured,
            Err(_) => WeatherState::Unavailable,
        };
        self.redraw(now_unix);
    }

    /// Minute boundary reached
    pub fn on_minute(&mut self, now_unix: i64) -> MinuteAction {
        let local = LocalTime::from_unix(now_unix, self.utc_offset_minutes);
        if is_quarter_hour(local.minute) && self.is_configured() {
            return MinuteAction::Refresh;
        }
        match self.state {
            WeatherState::Unavailable => MinuteAction::Idle,
            _ => {
                self.redraw(now_unix);
                MinuteAction::ClockUpdated
            }
        }
    }

    fn redraw(&mut self, now_unix: i64) {
        let clock = LocalTime::from_unix(now_unix, self.utc_offset_minutes).to_line();
        self.message = match &self.state {
            WeatherState::Loading => status_message(clock, "Weather Loading"),
            WeatherState::Misconfigured => status_message(clock, "Bad Weather Conf"),
            WeatherState::Unavailable => Message::aligned(
                "Failed to Pull",
                "Weather Data",
                Align::Center,
                Align::Center,
            ),
            WeatherState::Ready(reading) => Message::new(
                conditions_line(clock, reading, self.units),
                wind_line(reading, self.units, now_unix, self.utc_offset_minutes),
            ),
        };
    }
}

fn status_message(clock: Line, status: &str) -> Message {
    Message::new(
        clock.aligned(Align::Left),
        Line::from_text(status).aligned(Align::Right),
    )
}

fn conditions_line(clock: Line, reading: &WeatherReading, units: Units) -> Line {
    let mut temperature = Line::new();
    let _ = write!(temperature, "{}", libm::roundf(reading.temperature) as i32);
    temperature.push(units.temperature_symbol());
    let conditions = Line::from_text(&reading.condition);

    let used = clock.len() + temperature.len() + conditions.len();
    let spare = LINE_WIDTH.saturating_sub(used);

    let mut line = clock;
    line.push_spaces(spare / 2 + spare % 2);
    line.extend(&temperature);
    line.push_spaces(spare / 2);
    line.extend(&conditions);
    line
}

fn wind_line(reading: &WeatherReading, units: Units, now_unix: i64, offset: i16) -> Line {
    let speed = libm::roundf(reading.wind_speed) as i32;
    let mut wind = Line::new();
    let _ = write!(wind, "{}{}", speed, units.speed_suffix());
    let direction = if speed != 0 {
        wind_direction(reading.wind_degrees)
    } else {
        ""
    };

    let (sun_symbol, sun_ts) = if reading.sunrise < now_unix && now_unix < reading.sunset {
        (Symbol::Moon, reading.sunset)
    } else {
        (Symbol::Sun, reading.sunrise)
    };
    let mut sun = Line::new();
    sun.push(sun_symbol);
    sun.extend(&LocalTime::from_unix(sun_ts, offset).to_line());

    let used = wind.len() + direction.len() + sun.len();
    let spare = LINE_WIDTH.saturating_sub(used);
    let gap = usize::from(spare > 1);

    let mut line = wind;
    line.push_spaces(gap);
    line.push_str(direction);
    line.push_spaces(spare - gap);
    line.extend(&sun);
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-06-01T00:00:00Z
    const MIDNIGHT: i64 = 1_717_200_000;

    fn at(hour: i64, minute: i64) -> i64 {
        MIDNIGHT + hour * 3600 + minute * 60
    }

    fn reading() -> WeatherReading {
        WeatherReading {
            temperature: 71.6,
            condition: String::try_from("Clear").unwrap(),
            wind_speed: 4.6,
            wind_degrees: 20.0,
            sunrise: at(5, 30),
            sunset: at(20, 15),
        }
    }

    fn text(line: &Line) -> std::string::String {
        line.to_string()
    }

    #[test]
    fn test_wind_direction_sectors() {
        assert_eq!(wind_direction(0.0), "N");
        assert_eq!(wind_direction(11.24), "N");
        assert_eq!(wind_direction(11.25), "NNE");
        assert_eq!(wind_direction(90.0), "E");
        assert_eq!(wind_direction(348.75), "N");
        assert_eq!(wind_direction(348.7), "NNW");
        assert_eq!(wind_direction(720.0), "N");
        assert_eq!(wind_direction(-22.5), "NNW");
    }

    #[test]
    fn test_loading_message() {
        let view = WeatherView::new(Units::Imperial, 0, true, at(9, 41));
        assert_eq!(view.state(), &WeatherState::Loading);
        assert_eq!(text(&view.message().line_one), "9:41ᵃ");
        assert_eq!(text(&view.message().line_two), " Weather Loading");
    }

    #[test]
    fn test_misconfigured_message() {
        let view = WeatherView::new(Units::Imperial, 0, false, at(9, 41));
        assert!(!view.is_configured());
        assert_eq!(text(&view.message().line_two), "Bad Weather Conf");
    }

    #[test]
    fn test_ready_layout_daytime() {
        let mut view = WeatherView::new(Units::Imperial, 0, true, at(9, 41));
        view.apply(Ok(reading()), at(9, 41));
        let msg = view.message();
        // 5 + 3 + 5 = 13 used, 3 spare: 2 before, 1 after
        assert_eq!(text(&msg.line_one), "9:41ᵃ  72℉ Clear");
        assert_eq!(text(&msg.line_two), "5mph NNE  ●8:15ᵖ");
        assert_eq!(msg.line_one.len(), LINE_WIDTH);
        assert_eq!(msg.line_two.len(), LINE_WIDTH);
    }

    #[test]
    fn test_ready_layout_night_shows_sunrise() {
        let mut view = WeatherView::new(Units::Imperial, 0, true, at(22, 5));
        view.apply(Ok(reading()), at(22, 5));
        assert!(text(&view.message().line_two).ends_with("○5:30ᵃ"));
    }

    #[test]
    fn test_calm_wind_omits_direction() {
        let mut calm = reading();
        calm.wind_speed = 0.4;
        let mut view = WeatherView::new(Units::Metric, 0, true, at(9, 41));
        view.apply(Ok(calm), at(9, 41));
        let line = text(&view.message().line_two);
        assert!(line.starts_with("0m/s "));
        assert!(!line.contains("NNE"));
        assert!(text(&view.message().line_one).contains('℃'));
    }

    #[test]
    fn test_fetch_failure_degrades() {
        let mut view = WeatherView::new(Units::Imperial, 0, true, at(9, 41));
        view.apply(Err(WeatherError::Transport), at(9, 41));
        assert_eq!(view.state(), &WeatherState::Unavailable);
        assert_eq!(text(&view.message().line_one), " Failed to Pull ");
        assert_eq!(text(&view.message().line_two), "  Weather Data  ");
        assert_eq!(view.on_minute(at(9, 42)), MinuteAction::Idle);
    }

    #[test]
    fn test_minute_tick_updates_clock_only() {
        let mut view = WeatherView::new(Units::Imperial, 0, true, at(9, 41));
        view.apply(Ok(reading()), at(9, 41));
        assert_eq!(view.on_minute(at(9, 42)), MinuteAction::ClockUpdated);
        assert!(text(&view.message().line_one).starts_with("9:42ᵃ"));
        assert!(text(&view.message().line_one).ends_with("Clear"));
    }

    #[test]
    fn test_quarter_hour_requests_refresh() {
        let mut view = WeatherView::new(Units::Imperial, 0, true, at(9, 44));
        assert_eq!(view.on_minute(at(9, 45)), MinuteAction::Refresh);
        let mut bad = WeatherView::new(Units::Imperial, 0, false, at(9, 44));
        assert_eq!(bad.on_minute(at(9, 45)), MinuteAction::ClockUpdated);
    }

    #[test]
    fn test_utc_offset_applies() {
        let view = WeatherView::new(Units::Imperial, -300, true, at(14, 0));
        assert_eq!(text(&view.message().line_one), "9:00ᵃ");
    }
}

//! Built-in tool capabilities backed by public HTTP services.
//!
//! Tools are registered explicitly at startup with [`register_builtin_tools`]; nothing
//! is registered implicitly.
//!
//! ```rust
//! use ptooling::ToolRegistry;
//! use ptooling::builtin::{BuiltinToolsConfig, register_builtin_tools};
//!
//! let mut registry = ToolRegistry::new();
//! register_builtin_tools(&mut registry, &BuiltinToolsConfig::default())
//!     .expect("built-in names are unique");
//!
//! assert_eq!(
//!     registry.names(),
//!     vec![
//!         "get_current_weather",
//!         "get_weather_forecast",
//!         "get_exchange_rate",
//!         "get_holidays",
//!         "get_today_date",
//!     ]
//! );
//! ```

mod exchange;
mod holidays;
mod ics;
mod today;
mod weather;

use std::time::Duration;

use pprovider::SecretString;
use reqwest::{Client, RequestBuilder, StatusCode};

use crate::{ToolError, ToolRegistry};

pub use exchange::ExchangeRateTool;
pub use holidays::HolidaysTool;
pub use ics::{CalendarEvent, parse_calendar};
pub use today::TodayDateTool;
pub use weather::{CurrentWeatherTool, DailyForecast, WeatherForecastTool};

pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.weatherapi.com/v1";
pub const DEFAULT_EXCHANGE_BASE_URL: &str = "https://api.frankfurter.app";
pub const DEFAULT_HOLIDAY_CALENDAR_LINK: &str = "https://www.officeholidays.com/ics/spain/catalonia";

pub(crate) const WEATHER_TIMEOUT: Duration = Duration::from_secs(8);
pub(crate) const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(10);
pub(crate) const CALENDAR_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("parley/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct BuiltinToolsConfig {
    pub client: Client,
    pub weather_api_key: Option<SecretString>,
    pub weather_base_url: String,
    pub exchange_base_url: String,
    pub holiday_calendar_link: String,
}

impl Default for BuiltinToolsConfig {
    fn default() -> Self {
        Self {
            client: Client::new(),
            weather_api_key: None,
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            exchange_base_url: DEFAULT_EXCHANGE_BASE_URL.to_string(),
            holiday_calendar_link: DEFAULT_HOLIDAY_CALENDAR_LINK.to_string(),
        }
    }
}

impl BuiltinToolsConfig {
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Blank keys are treated as absent.
    pub fn with_weather_api_key(mut self, api_key: impl Into<SecretString>) -> Self {
        let api_key = api_key.into();
        self.weather_api_key = (!api_key.is_empty()).then_some(api_key);
        self
    }

    pub fn with_weather_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.weather_base_url = base_url.into();
        self
    }

    pub fn with_exchange_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.exchange_base_url = base_url.into();
        self
    }

    /// Blank links keep the default feed.
    pub fn with_holiday_calendar_link(mut self, link: impl Into<String>) -> Self {
        let link = link.into();
        if !link.trim().is_empty() {
            self.holiday_calendar_link = link.trim().to_string();
        }
        self
    }
}

/// Registers the five built-in tools in a fixed order.
pub fn register_builtin_tools(
    registry: &mut ToolRegistry,
    config: &BuiltinToolsConfig,
) -> Result<(), ToolError> {
    registry.register(CurrentWeatherTool::new(config))?;
    registry.register(WeatherForecastTool::new(config))?;
    registry.register(ExchangeRateTool::new(config))?;
    registry.register(HolidaysTool::new(config))?;
    registry.register(TodayDateTool)?;
    Ok(())
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

/// Sends a GET request and returns the status and body text.
pub(crate) async fn fetch_text(
    request: RequestBuilder,
    timeout: Duration,
) -> Result<(StatusCode, String), ToolError> {
    let response = request
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .timeout(timeout)
        .send()
        .await
        .map_err(map_reqwest_error)?;

    let status = response.status();
    let body = response.text().await.map_err(map_reqwest_error)?;
    Ok((status, body))
}

fn map_reqwest_error(err: reqwest::Error) -> ToolError {
    if err.is_timeout() {
        ToolError::timeout(err.to_string())
    } else {
        ToolError::execution(err.to_string())
    }
}

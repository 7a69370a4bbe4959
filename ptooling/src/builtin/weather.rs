//! Current conditions and multi-day forecast from weatherapi.com.

use pprovider::{SecretString, ToolDefinition};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{BuiltinToolsConfig, WEATHER_TIMEOUT, endpoint, fetch_text};
use crate::{
    Tool, ToolArgs, ToolError, ToolExecutionContext, ToolFuture, optional_i64, required_string,
};

const DEFAULT_FORECAST_DAYS: i64 = 3;
const MAX_FORECAST_DAYS: i64 = 7;

#[derive(Debug, Clone)]
pub struct CurrentWeatherTool {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl CurrentWeatherTool {
    pub fn new(config: &BuiltinToolsConfig) -> Self {
        Self {
            client: config.client.clone(),
            base_url: config.weather_base_url.clone(),
            api_key: config.weather_api_key.clone(),
        }
    }

    async fn lookup(&self, args: &ToolArgs) -> Result<String, ToolError> {
        let location = required_string(args, "location")?;
        let api_key = require_key(&self.api_key)?;

        let request = self
            .client
            .get(endpoint(&self.base_url, "current.json"))
            .query(&[("key", api_key.expose()), ("q", location.as_str()), ("aqi", "no")]);
        let body = fetch_weather(request).await?;

        let payload: CurrentPayload = serde_json::from_str(&body)
            .map_err(|err| ToolError::execution(format!("invalid weather payload: {err}")))?;

        let output = json!({
            "resolved_name": payload.location.resolved_name(),
            "coords": [payload.location.lat, payload.location.lon],
            "timezone": payload.location.tz_id,
            "temperature_c": payload.current.temp_c,
            "wind_kph": payload.current.wind_kph,
            "wind_dir": payload.current.wind_dir,
            "gust_kph": payload.current.gust_kph,
            "humidity": payload.current.humidity,
            "feelslike_c": payload.current.feelslike_c,
            "precip_mm": payload.current.precip_mm,
            "pressure_mb": payload.current.pressure_mb,
            "cloud": payload.current.cloud,
            "uv": payload.current.uv,
            "vis_km": payload.current.vis_km,
            "condition": payload.current.condition.text,
        });
        Ok(output.to_string())
    }
}

impl Tool for CurrentWeatherTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_current_weather".to_string(),
            description: "Get current weather for a given location. Returns temperature, wind, humidity, condition, etc.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "location": {
                        "type": "string",
                        "description": "City name or 'lat,lon' coordinates"
                    }
                },
                "required": ["location"]
            }),
        }
    }

    fn invoke<'a>(
        &'a self,
        args: &'a ToolArgs,
        _context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<String, ToolError>> {
        Box::pin(self.lookup(args))
    }
}

/// One day of a forecast as reported to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyForecast {
    pub date: String,
    pub max_temp_c: f64,
    pub min_temp_c: f64,
    pub condition: String,
    pub chance_of_rain: i64,
    pub total_precip_mm: f64,
    pub max_wind_kph: f64,
    pub uv: f64,
    pub sunrise: String,
    pub sunset: String,
}

#[derive(Debug, Clone)]
pub struct WeatherForecastTool {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl WeatherForecastTool {
    pub fn new(config: &BuiltinToolsConfig) -> Self {
        Self {
            client: config.client.clone(),
            base_url: config.weather_base_url.clone(),
            api_key: config.weather_api_key.clone(),
        }
    }

    async fn forecast(&self, args: &ToolArgs) -> Result<String, ToolError> {
        let location = required_string(args, "location")?;
        let days = forecast_days(optional_i64(args, "days"));
        let api_key = require_key(&self.api_key)?;

        let days_param = days.to_string();
        let request = self
            .client
            .get(endpoint(&self.base_url, "forecast.json"))
            .query(&[
                ("key", api_key.expose()),
                ("q", location.as_str()),
                ("days", days_param.as_str()),
                ("aqi", "no"),
                ("alerts", "no"),
            ]);
        let body = fetch_weather(request).await?;

        let payload: ForecastPayload = serde_json::from_str(&body)
            .map_err(|err| ToolError::execution(format!("invalid forecast payload: {err}")))?;

        let daily = payload
            .forecast
            .forecastday
            .into_iter()
            .map(|day| DailyForecast {
                date: day.date,
                max_temp_c: day.day.maxtemp_c,
                min_temp_c: day.day.mintemp_c,
                condition: day.day.condition.text,
                chance_of_rain: day.day.daily_chance_of_rain,
                total_precip_mm: day.day.totalprecip_mm,
                max_wind_kph: day.day.maxwind_kph,
                uv: day.day.uv,
                sunrise: day.astro.sunrise,
                sunset: day.astro.sunset,
            })
            .collect::<Vec<_>>();

        serde_json::to_string(&daily).map_err(|err| ToolError::execution(err.to_string()))
    }
}

impl Tool for WeatherForecastTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_weather_forecast".to_string(),
            description: "Provides a multi-day weather forecast (up to 7 days) for a given location.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "location": {
                        "type": "string",
                        "description": "City name or coordinates (lat,lon) to get the weather forecast for."
                    },
                    "days": {
                        "type": "integer",
                        "description": "Number of days to forecast (1-7).",
                        "minimum": 1,
                        "maximum": MAX_FORECAST_DAYS
                    }
                },
                "required": ["location"]
            }),
        }
    }

    fn invoke<'a>(
        &'a self,
        args: &'a ToolArgs,
        _context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<String, ToolError>> {
        Box::pin(self.forecast(args))
    }
}

/// Missing or non-positive values fall back to three days; larger values clamp to seven.
pub(crate) fn forecast_days(requested: Option<i64>) -> i64 {
    match requested {
        Some(days) if days > 0 => days.min(MAX_FORECAST_DAYS),
        _ => DEFAULT_FORECAST_DAYS,
    }
}

fn require_key(api_key: &Option<SecretString>) -> Result<&SecretString, ToolError> {
    api_key
        .as_ref()
        .ok_or_else(|| ToolError::unauthorized("missing WEATHER_API_KEY"))
}

async fn fetch_weather(request: reqwest::RequestBuilder) -> Result<String, ToolError> {
    let (status, body) = fetch_text(request, WEATHER_TIMEOUT).await?;
    if status.is_client_error() || status.is_server_error() {
        return Err(weather_error(status, &body));
    }
    Ok(body)
}

fn weather_error(status: StatusCode, body: &str) -> ToolError {
    match serde_json::from_str::<WeatherErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => ToolError::execution(format!(
            "weatherapi error: {} (code {})",
            envelope.error.message, envelope.error.code
        )),
        _ => ToolError::execution(format!("weatherapi http {}", status.as_u16())),
    }
}

#[derive(Debug, Deserialize)]
struct WeatherErrorEnvelope {
    error: WeatherApiError,
}

#[derive(Debug, Deserialize)]
struct WeatherApiError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct CurrentPayload {
    location: LocationPayload,
    current: CurrentConditions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LocationPayload {
    name: String,
    region: String,
    country: String,
    lat: f64,
    lon: f64,
    tz_id: String,
}

impl LocationPayload {
    fn resolved_name(&self) -> String {
        [&self.name, &self.region, &self.country]
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CurrentConditions {
    temp_c: f64,
    wind_kph: f64,
    wind_dir: String,
    gust_kph: f64,
    humidity: i64,
    feelslike_c: f64,
    precip_mm: f64,
    pressure_mb: f64,
    cloud: i64,
    uv: f64,
    vis_km: f64,
    condition: ConditionPayload,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConditionPayload {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ForecastPayload {
    forecast: ForecastDays,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ForecastDays {
    forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ForecastDay {
    date: String,
    day: DaySummary,
    astro: AstroPayload,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DaySummary {
    maxtemp_c: f64,
    mintemp_c: f64,
    condition: ConditionPayload,
    daily_chance_of_rain: i64,
    totalprecip_mm: f64,
    maxwind_kph: f64,
    uv: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AstroPayload {
    sunrise: String,
    sunset: String,
}

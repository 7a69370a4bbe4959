//! Public holidays from an iCalendar feed.

use chrono::{DateTime, NaiveDate, Utc};
use pprovider::ToolDefinition;
use reqwest::Client;
use serde_json::json;

use super::ics::{CalendarEvent, parse_calendar};
use super::{BuiltinToolsConfig, CALENDAR_TIMEOUT, fetch_text};
use crate::{
    Tool, ToolArgs, ToolError, ToolExecutionContext, ToolFuture, optional_i64, optional_string,
};

#[derive(Debug, Clone)]
pub struct HolidaysTool {
    client: Client,
    calendar_link: String,
}

impl HolidaysTool {
    pub fn new(config: &BuiltinToolsConfig) -> Self {
        Self {
            client: config.client.clone(),
            calendar_link: config.holiday_calendar_link.clone(),
        }
    }

    async fn list(&self, args: &ToolArgs) -> Result<String, ToolError> {
        let filter = HolidayFilter::from_args(args);

        let (status, body) =
            fetch_text(self.client.get(&self.calendar_link), CALENDAR_TIMEOUT).await?;
        if status.is_client_error() || status.is_server_error() {
            return Err(ToolError::execution(format!(
                "calendar http {}",
                status.as_u16()
            )));
        }

        Ok(filter.render(&parse_calendar(&body)?))
    }
}

impl Tool for HolidaysTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_holidays".to_string(),
            description: "Gets local bank and public holidays. Each line is 'YYYY-MM-DD: Holiday Name'.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "before_date": {
                        "type": "string",
                        "description": "Optional RFC3339 date. Return holidays before this date."
                    },
                    "after_date": {
                        "type": "string",
                        "description": "Optional RFC3339 date. Return holidays after this date."
                    },
                    "max_count": {
                        "type": "integer",
                        "description": "Optional maximum number of holidays."
                    }
                }
            }),
        }
    }

    fn invoke<'a>(
        &'a self,
        args: &'a ToolArgs,
        _context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<String, ToolError>> {
        Box::pin(self.list(args))
    }
}

/// Unparseable bounds are ignored rather than rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct HolidayFilter {
    before: Option<DateTime<Utc>>,
    after: Option<DateTime<Utc>>,
    max_count: Option<usize>,
}

impl HolidayFilter {
    pub(crate) fn from_args(args: &ToolArgs) -> Self {
        let bound = |key: &str| {
            optional_string(args, key)
                .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
                .map(|parsed| parsed.with_timezone(&Utc))
        };

        Self {
            before: bound("before_date"),
            after: bound("after_date"),
            max_count: optional_i64(args, "max_count")
                .filter(|count| *count > 0)
                .and_then(|count| usize::try_from(count).ok()),
        }
    }

    fn accepts(&self, date: NaiveDate) -> bool {
        let Some(start) = date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc()) else {
            return false;
        };
        if self.before.is_some_and(|before| start > before) {
            return false;
        }
        if self.after.is_some_and(|after| start < after) {
            return false;
        }
        true
    }

    pub(crate) fn render(&self, events: &[CalendarEvent]) -> String {
        events
            .iter()
            .filter(|event| self.accepts(event.date))
            .take(self.max_count.unwrap_or(usize::MAX))
            .map(|event| format!("{}: {}", event.date.format("%Y-%m-%d"), event.summary))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

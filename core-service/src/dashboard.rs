//! Dashboard statistics.
//!
//! Reads `GET /stats`. When the read fails for any reason the fixed
//! [`DashboardStats::fallback`] dataset is shown instead; the gateway has
//! already notified the user of the failure.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Weekday};
use core_gateway::HttpGateway;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

pub const STATS_PATH: &str = "/stats";

/// A labelled value for charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: f64,
}

impl ChartPoint {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub users: f64,
    pub products: f64,
    pub orders: f64,
    pub sales_today: f64,
    /// One point per day of sales
    pub chart: Vec<ChartPoint>,
    pub pie: Vec<ChartPoint>,
}

impl DashboardStats {
    /// Placeholder figures shown when statistics are unavailable.
    pub fn fallback() -> Self {
        Self {
            users: 0.0,
            products: 0.0,
            orders: 0.0,
            sales_today: 0.0,
            chart: fallback_chart(),
            pie: vec![
                ChartPoint::new("Electronics", 400.0),
                ChartPoint::new("Fashion", 300.0),
                ChartPoint::new("Home", 200.0),
                ChartPoint::new("Other", 100.0),
            ],
        }
    }

    /// Map a `/stats` body.
    ///
    /// Missing counts are zero. Without a `sales` array the chart falls back
    /// to the placeholder week.
    pub fn from_response(data: &Value) -> Self {
        let count = |key: &str| number(data.get(key));

        let sales = data.get("sales").and_then(Value::as_array);
        let sales_today = sales
            .and_then(|entries| entries.last())
            .map(|entry| number(entry.get("revenues")))
            .unwrap_or(0.0);
        let chart = match sales {
            Some(entries) => entries
                .iter()
                .map(|entry| {
                    ChartPoint::new(day_label(entry.get("date")), number(entry.get("revenue")))
                })
                .collect(),
            None => fallback_chart(),
        };

        Self {
            users: count("users"),
            products: count("products"),
            orders: count("orders"),
            sales_today,
            chart,
            pie: vec![
                ChartPoint::new("Products", count("products")),
                ChartPoint::new("Categories", count("categories")),
                ChartPoint::new("Orders", count("orders")),
            ],
        }
    }
}

fn fallback_chart() -> Vec<ChartPoint> {
    [
        ("Mon", 12.0),
        ("Tue", 18.0),
        ("Wed", 9.0),
        ("Thu", 23.0),
        ("Fri", 34.0),
        ("Sat", 28.0),
        ("Sun", 15.0),
    ]
    .into_iter()
    .map(|(name, value)| ChartPoint::new(name, value))
    .collect()
}

// Numbers may arrive as strings (decimal columns).
fn number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Short weekday name (`Mon`..`Sun`, UTC) of a date or timestamp.
/// Unparsable dates keep their raw text.
fn day_label(value: Option<&Value>) -> String {
    let Some(raw) = value.and_then(Value::as_str) else {
        return String::new();
    };
    parse_weekday(raw)
        .map(short_weekday)
        .map(str::to_string)
        .unwrap_or_else(|| raw.to_string())
}

fn parse_weekday(raw: &str) -> Option<Weekday> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.naive_utc().weekday());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(timestamp.weekday());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.weekday())
}

fn short_weekday(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

#[derive(Clone, Debug)]
pub struct DashboardService {
    gateway: HttpGateway,
}

impl DashboardService {
    pub fn new(gateway: HttpGateway) -> Self {
        Self { gateway }
    }

    /// Current statistics, or the fallback dataset when they cannot be read.
    pub async fn stats(&self) -> DashboardStats {
        match self.gateway.get(STATS_PATH).await {
            Ok(data) if data.is_object() => DashboardStats::from_response(&data),
            Ok(_) => {
                warn!("Stats response is not an object, using fallback");
                DashboardStats::fallback()
            }
            Err(e) => {
                warn!(error = %e, "Stats not available, using fallback");
                DashboardStats::fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_response() {
        let stats = DashboardStats::from_response(&json!({
            "users": 4,
            "products": 12,
            "orders": 7,
            "categories": 3,
            "sales": [
                {"date": "2024-05-06", "revenue": 100, "revenues": 100},
                {"date": "2024-05-07T10:00:00Z", "revenue": "250.5", "revenues": 350.5}
            ]
        }));

        assert_eq!(stats.users, 4.0);
        assert_eq!(stats.sales_today, 350.5);
        assert_eq!(
            stats.chart,
            vec![ChartPoint::new("Mon", 100.0), ChartPoint::new("Tue", 250.5)]
        );
        assert_eq!(
            stats.pie,
            vec![
                ChartPoint::new("Products", 12.0),
                ChartPoint::new("Categories", 3.0),
                ChartPoint::new("Orders", 7.0)
            ]
        );
    }

    #[test]
    fn test_missing_sales_uses_placeholder_week() {
        let stats = DashboardStats::from_response(&json!({"users": 1}));
        assert_eq!(stats.sales_today, 0.0);
        assert_eq!(stats.chart, DashboardStats::fallback().chart);
        assert_eq!(stats.products, 0.0);
    }

    #[test]
    fn test_empty_sales_gives_empty_chart() {
        let stats = DashboardStats::from_response(&json!({"sales": []}));
        assert!(stats.chart.is_empty());
        assert_eq!(stats.sales_today, 0.0);
    }

    #[test]
    fn test_unparsable_date_keeps_text() {
        let stats = DashboardStats::from_response(&json!({
            "sales": [{"date": "yesterday", "revenue": 1}]
        }));
        assert_eq!(stats.chart[0].name, "yesterday");
    }

    #[test]
    fn test_fallback_dataset() {
        let fallback = DashboardStats::fallback();
        let week: Vec<(&str, f64)> = fallback
            .chart
            .iter()
            .map(|p| (p.name.as_str(), p.value))
            .collect();
        assert_eq!(
            week,
            vec![
                ("Mon", 12.0),
                ("Tue", 18.0),
                ("Wed", 9.0),
                ("Thu", 23.0),
                ("Fri", 34.0),
                ("Sat", 28.0),
                ("Sun", 15.0)
            ]
        );
        assert_eq!(fallback.pie.len(), 4);
        assert_eq!(fallback.pie[0], ChartPoint::new("Electronics", 400.0));
    }
}

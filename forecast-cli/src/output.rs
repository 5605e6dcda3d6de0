//! Human-readable rendering of forecasts.

use chrono::NaiveDateTime;
use forecast_core::{BoardState, ForecastResponse};

/// Timestamp layouts the provider is known to use.
const PROVIDER_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// "Mon 01 Jan 00:00" when the text is a known timestamp layout,
/// otherwise the text as given.
pub fn display_time(date_text: &str) -> String {
    PROVIDER_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(date_text, fmt).ok())
        .map(|dt| dt.format("%a %d %b %H:%M").to_string())
        .unwrap_or_else(|| date_text.to_string())
}

pub fn render_table(title: &str, forecast: &ForecastResponse) -> String {
    let mut out = format!("Forecast for {title}\n");

    if forecast.is_empty() {
        out.push_str("  (no forecast entries)\n");
        return out;
    }

    out.push_str(&format!("  {:<17} {:<22} {:>8}  {}\n", "Time", "Condition", "Temp", "Icon"));
    for entry in forecast.entries() {
        let condition = entry.condition();
        let temp = format!("{:.1} °C", entry.main().temp());
        out.push_str(&format!(
            "  {:<17} {:<22} {:>8}  {}\n",
            display_time(entry.date_text()),
            condition.description(),
            temp,
            condition.icon_url(),
        ));
    }

    out
}

/// What to print when the board moves from `shown` to `current`, if anything.
///
/// Only a new delivery prints. Clearing the error on submit also notifies
/// subscribers; that alone prints nothing.
pub fn render_update(shown: &BoardState, current: &BoardState) -> Option<String> {
    if current.deliveries == shown.deliveries {
        return None;
    }

    if let Some(error) = &current.error {
        return Some(format!("error: {error}\n"));
    }

    let forecast = current.forecast.as_ref()?;
    let title = current.query.as_deref().unwrap_or("?");
    Some(render_table(title, forecast))
}

#[cfg(test)]
mod tests {
    use super::*;
    use forecast_core::{ForecastEntry, Weather};

    fn london() -> ForecastResponse {
        ForecastResponse::new(vec![ForecastEntry::new(
            "2024-01-01T00:00:00".into(),
            5.2,
            Weather::new("clear sky".into(), "01d".into()),
        )])
    }

    #[test]
    fn display_time_formats_provider_timestamps() {
        assert_eq!(display_time("2024-01-01T00:00:00"), "Mon 01 Jan 00:00");
        assert_eq!(display_time("2024-01-01 15:00:00"), "Mon 01 Jan 15:00");
    }

    #[test]
    fn display_time_falls_back_to_raw_text() {
        assert_eq!(display_time("tomorrow-ish"), "tomorrow-ish");
    }

    #[test]
    fn table_lists_every_entry() {
        let table = render_table("London,uk", &london());

        assert!(table.starts_with("Forecast for London,uk\n"));
        assert!(table.contains("clear sky"));
        assert!(table.contains("5.2 °C"));
        assert!(table.contains("https://openweathermap.org/img/w/01d.png"));
        assert_eq!(table.lines().count(), 3);
    }

    #[test]
    fn empty_forecast_says_so() {
        let table = render_table("Nowhere", &ForecastResponse::new(vec![]));
        assert!(table.contains("no forecast entries"));
    }

    #[test]
    fn new_error_is_rendered() {
        let current = BoardState {
            error: Some("No Internet connection".into()),
            deliveries: 1,
            ..BoardState::default()
        };

        assert_eq!(
            render_update(&BoardState::default(), &current).as_deref(),
            Some("error: No Internet connection\n")
        );
    }

    #[test]
    fn same_error_on_a_new_delivery_is_rendered_again() {
        let shown = BoardState {
            error: Some("No Internet connection".into()),
            deliveries: 1,
            ..BoardState::default()
        };
        let current = BoardState { deliveries: 2, ..shown.clone() };

        assert_eq!(
            render_update(&shown, &current).as_deref(),
            Some("error: No Internet connection\n")
        );
    }

    #[test]
    fn same_forecast_on_a_new_delivery_is_rendered_again() {
        let shown = BoardState {
            query: Some("London,uk".into()),
            forecast: Some(london()),
            error: None,
            deliveries: 3,
        };
        let current = BoardState { deliveries: 4, ..shown.clone() };

        let text = render_update(&shown, &current).expect("should render");
        assert!(text.starts_with("Forecast for London,uk"));
    }

    #[test]
    fn cleared_error_renders_nothing() {
        let shown = BoardState {
            query: Some("London,uk".into()),
            forecast: Some(london()),
            error: Some("No Internet connection".into()),
            deliveries: 1,
        };
        let current = BoardState { error: None, ..shown.clone() };

        assert_eq!(render_update(&shown, &current), None);
    }

    #[test]
    fn new_forecast_is_rendered() {
        let current = BoardState {
            query: Some("London,uk".into()),
            forecast: Some(london()),
            error: None,
            deliveries: 1,
        };

        let text = render_update(&BoardState::default(), &current).expect("should render");
        assert!(text.starts_with("Forecast for London,uk"));
    }
}

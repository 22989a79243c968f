//! Terminal rendering of session state.

use weather_alert_core::{
    Dropdown, RecentChips, Session, UiState,
    autocomplete::Span,
    render::{AlertLevel, ForecastCard, WeatherView, error_banner},
};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

pub fn print_session(session: &Session) {
    match session.state() {
        UiState::Idle => {}
        UiState::Loading => println!("Loading..."),
        UiState::Error(message) => eprintln!("{}", error_banner(message)),
        UiState::Showing { .. } => {
            if let Some(view) = session.weather_view() {
                print!("{}", weather(&view));
            }
            let cards = session.forecast_panel().cards();
            if !cards.is_empty() {
                println!();
                println!("5-Day Forecast");
                for card in cards {
                    println!("{}", forecast_card(card));
                }
            }
        }
    }
}

pub fn weather(view: &WeatherView) -> String {
    let mut out = String::new();

    if let Some(alert) = &view.alert {
        let tag = match alert.level {
            AlertLevel::High => "HIGH",
            AlertLevel::Low => "LOW",
        };
        out.push_str(&format!("[{tag}] {}\n", alert.text));
    }

    out.push_str(&format!("{BOLD}{}{RESET}\n", view.location));
    out.push_str(&format!("{}\n", view.updated));
    out.push_str(&format!("{}  {}\n", view.temperature, view.description));
    out.push_str(&format!("  Feels like: {}\n", view.feels_like));
    out.push_str(&format!("  Humidity:   {}\n", view.humidity));
    out.push_str(&format!("  Wind:       {}\n", view.wind_speed));
    out.push_str(&format!("  Pressure:   {}\n", view.pressure));
    out
}

pub fn forecast_card(card: &ForecastCard) -> String {
    format!(
        "  {:<10} {:<7} {:<14} {}  {}",
        card.day_name, card.date, card.condition, card.max_temp, card.min_temp
    )
}

pub fn spans(spans: &[Span]) -> String {
    spans
        .iter()
        .map(|s| {
            if s.emphasized { format!("{BOLD}{}{RESET}", s.text) } else { s.text.clone() }
        })
        .collect()
}

pub fn dropdown(dropdown: &Dropdown) -> String {
    match dropdown {
        Dropdown::Closed => String::new(),
        Dropdown::NoResults => format!("{}\n", Dropdown::NO_RESULTS_TEXT),
        Dropdown::Suggestions(items) => items
            .iter()
            .map(|item| {
                let marker = if item.selected { ">" } else { " " };
                format!("{marker} {}  {}\n", spans(&item.name), item.country)
            })
            .collect(),
    }
}

pub fn recent(chips: &RecentChips) -> String {
    match chips {
        RecentChips::Placeholder(text) => format!("{text}\n"),
        RecentChips::Cities(cities) => cities
            .iter()
            .enumerate()
            .map(|(i, city)| format!("{}. {city}\n", i + 1))
            .collect(),
    }
}

//! The single owner of all client-side UI state.
//!
//! A [`Session`] wires the autocomplete controller to the coordinator,
//! executes the coordinator's effects against the weather API and the recent
//! store, and keeps the forecast panel in step with the displayed state.

use anyhow::Result;
use std::{
    collections::VecDeque,
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::{debug, warn};

use crate::{
    Config,
    api::{HttpWeatherApi, WeatherApi},
    autocomplete::{AutocompleteAction, AutocompleteController, Dropdown, Key},
    catalog::Catalog,
    coordinator::{Coordinator, Effect, Event, UiState},
    model::LookupKind,
    recent::{FileStore, RecentChips, RecentCityStore},
    render::{ForecastPanel, WeatherView},
};

#[derive(Debug, Clone, Copy)]
struct PendingDismissal {
    generation: u64,
    deadline: Instant,
}

#[derive(Debug)]
pub struct Session {
    autocomplete: AutocompleteController,
    coordinator: Coordinator,
    api: Box<dyn WeatherApi>,
    recent: RecentCityStore,
    forecast: ForecastPanel,
    dismissal: Option<PendingDismissal>,
}

impl Session {
    pub fn new(api: Box<dyn WeatherApi>, recent: RecentCityStore, catalog: Arc<Catalog>) -> Self {
        Self {
            autocomplete: AutocompleteController::new(catalog),
            coordinator: Coordinator::new(),
            api,
            recent,
            forecast: ForecastPanel::default(),
            dismissal: None,
        }
    }

    /// Build a session talking HTTP to the configured backend, with recent
    /// searches persisted under the configured data directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api = HttpWeatherApi::from_config(config)?;
        let store = FileStore::new(config.data_dir()?);

        Ok(Self::new(
            Box::new(api),
            RecentCityStore::new(Box::new(store)),
            Arc::new(config.catalog()),
        ))
    }

    pub fn state(&self) -> &UiState {
        self.coordinator.state()
    }

    pub fn weather_view(&self) -> Option<WeatherView> {
        match self.state() {
            UiState::Showing { current, .. } => Some(WeatherView::from(current)),
            _ => None,
        }
    }

    pub fn forecast_panel(&self) -> &ForecastPanel {
        &self.forecast
    }

    pub fn dropdown(&self) -> Dropdown {
        self.autocomplete.dropdown()
    }

    pub fn autocomplete(&self) -> &AutocompleteController {
        &self.autocomplete
    }

    pub fn recent_cities(&self) -> Vec<String> {
        self.recent.list()
    }

    pub fn recent_chips(&self) -> RecentChips {
        self.recent.chips()
    }

    /// When the visible error banner is due to disappear. `None` while no
    /// error is shown.
    pub fn dismissal_deadline(&self) -> Option<Instant> {
        self.dismissal.map(|d| d.deadline)
    }

    /// Look up `city` and return the resulting state.
    pub async fn lookup(&mut self, kind: LookupKind, city: &str) -> &UiState {
        let effects = self.coordinator.handle(Event::Lookup { kind, city: city.to_string() });
        self.run(effects).await;
        self.coordinator.state()
    }

    pub fn input(&mut self, text: &str) {
        self.autocomplete.input(text);
    }

    pub fn focus(&mut self) {
        self.autocomplete.focus();
    }

    pub fn blur_outside(&mut self) {
        self.autocomplete.blur_outside();
    }

    /// Forward a key to the autocomplete controller, looking up the current
    /// weather when it asks for it.
    pub async fn key(&mut self, key: Key) -> AutocompleteAction {
        let action = self.autocomplete.key(key);
        self.follow(&action).await;
        action
    }

    pub async fn click(&mut self, index: usize) -> AutocompleteAction {
        let action = self.autocomplete.click(index);
        self.follow(&action).await;
        action
    }

    /// Look up the current weather for the `index`-th recent city.
    pub async fn select_recent(&mut self, index: usize) -> Option<&UiState> {
        let city = self.recent.list().into_iter().nth(index)?;
        self.autocomplete.set_text(city.clone());
        Some(self.lookup(LookupKind::Current, &city).await)
    }

    /// Clear the error banner if its display window has elapsed by `now`.
    pub fn expire_error(&mut self, now: Instant) {
        let Some(pending) = self.dismissal else {
            return;
        };
        if now < pending.deadline {
            return;
        }

        self.dismissal = None;
        let effects = self.coordinator.handle(Event::DismissElapsed {
            generation: pending.generation,
        });
        debug_assert!(effects.is_empty());
    }

    async fn follow(&mut self, action: &AutocompleteAction) {
        if let AutocompleteAction::Lookup(city) = action {
            self.lookup(LookupKind::Current, city).await;
        }
    }

    async fn run(&mut self, effects: Vec<Effect>) {
        let mut queue: VecDeque<Effect> = effects.into();

        while let Some(effect) = queue.pop_front() {
            let follow_up = match effect {
                Effect::FetchCurrent { request, city } => {
                    self.forecast.clear();
                    let result = self.api.current(&city).await;
                    self.coordinator.handle(Event::CurrentLoaded { request, result })
                }
                Effect::FetchForecast { request, city } => {
                    self.forecast.clear();
                    let result = self.api.forecast(&city).await;
                    self.coordinator.handle(Event::ForecastLoaded { request, result })
                }
                Effect::RecordRecent(city) => {
                    if let Err(err) = self.recent.record(&city) {
                        warn!(%city, error = %err, "failed to persist recent city");
                    }
                    Vec::new()
                }
                Effect::ScheduleDismiss { generation, after } => {
                    self.schedule_dismissal(generation, after);
                    Vec::new()
                }
            };
            queue.extend(follow_up);
        }

        if !matches!(self.coordinator.state(), UiState::Error(_)) {
            self.dismissal = None;
        }
        self.sync_forecast();
    }

    fn schedule_dismissal(&mut self, generation: u64, after: Duration) {
        debug!(generation, ?after, "error dismissal scheduled");
        self.dismissal = Some(PendingDismissal { generation, deadline: Instant::now() + after });
    }

    fn sync_forecast(&mut self) {
        match self.coordinator.state() {
            UiState::Showing { forecast: Some(days), .. } => self.forecast.render(days),
            _ => self.forecast.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        coordinator::ERROR_DISPLAY,
        error::LookupError,
        model::{City, ForecastDay, ForecastReport, WeatherSnapshot},
    };
    use async_trait::async_trait;

    #[derive(Debug, Default)]
    struct FakeApi;

    fn snapshot(city: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            city: city.to_string(),
            country: "XX".to_string(),
            timestamp: "2026-10-16T03:00:00".to_string(),
            temperature: 18.0,
            feels_like: 17.0,
            humidity: 70,
            wind_speed: 4.0,
            pressure: 1011,
            condition: "Clouds".to_string(),
            description: "few clouds".to_string(),
            icon: "02d".to_string(),
            alert: None,
        }
    }

    #[async_trait]
    impl WeatherApi for FakeApi {
        async fn current(&self, city: &str) -> Result<WeatherSnapshot, LookupError> {
            match city {
                "Atlantis" => {
                    Err(LookupError::Http { status: 404, message: "city not found".into() })
                }
                _ => Ok(snapshot(city)),
            }
        }

        async fn forecast(&self, city: &str) -> Result<ForecastReport, LookupError> {
            let forecast = (16..21)
                .map(|d| ForecastDay {
                    date: format!("2026-10-{d}"),
                    day_name: "Day".to_string(),
                    condition: "Rain".to_string(),
                    icon: "10d".to_string(),
                    max_temp: 20.0,
                    min_temp: 12.0,
                })
                .collect();
            Ok(ForecastReport {
                current: snapshot(city),
                forecast,
                city: None,
                country: None,
                timestamp: None,
            })
        }
    }

    fn session() -> Session {
        let catalog = Catalog::new(vec![
            City::new("Paris", "France"),
            City::new("Perth", "Australia"),
            City::new("Tokyo", "Japan"),
        ]);
        Session::new(Box::<FakeApi>::default(), RecentCityStore::in_memory(), Arc::new(catalog))
    }

    #[tokio::test]
    async fn current_lookup_shows_weather_and_records_city() {
        let mut s = session();
        let state = s.lookup(LookupKind::Current, " Tokyo ").await;

        assert!(matches!(state, UiState::Showing { forecast: None, .. }));
        assert_eq!(s.weather_view().unwrap().location, "Tokyo, XX");
        assert!(s.forecast_panel().cards().is_empty());
        assert_eq!(s.recent_cities(), vec!["Tokyo"]);
    }

    #[tokio::test]
    async fn forecast_lookup_renders_five_cards() {
        let mut s = session();
        s.lookup(LookupKind::Forecast, "Tokyo").await;

        let UiState::Showing { current, forecast } = s.state() else {
            panic!("expected Showing, got {:?}", s.state());
        };
        assert_eq!(current.city, "Tokyo");
        assert_eq!(forecast.as_ref().map(Vec::len), Some(5));
        assert_eq!(s.forecast_panel().cards().len(), 5);

        // A following current-only lookup drops the forecast cards.
        s.lookup(LookupKind::Current, "Paris").await;
        assert!(s.forecast_panel().cards().is_empty());
    }

    #[tokio::test]
    async fn failed_lookup_shows_error_then_expires() {
        let mut s = session();
        s.lookup(LookupKind::Current, "Atlantis").await;

        assert_eq!(s.state().error(), Some("city not found"));
        assert!(s.recent_cities().is_empty());

        let deadline = s.dismissal_deadline().unwrap();
        s.expire_error(deadline - Duration::from_millis(1));
        assert!(s.state().error().is_some());

        s.expire_error(deadline);
        assert_eq!(s.state(), &UiState::Idle);
        assert_eq!(s.dismissal_deadline(), None);
    }

    #[tokio::test]
    async fn new_lookup_invalidates_pending_dismissal() {
        let mut s = session();
        s.lookup(LookupKind::Current, "").await;
        assert!(s.dismissal_deadline().is_some());

        s.lookup(LookupKind::Current, "Paris").await;
        s.expire_error(Instant::now() + ERROR_DISPLAY * 2);
        assert!(matches!(s.state(), UiState::Showing { .. }));
    }

    #[tokio::test]
    async fn successful_lookup_clears_stale_dismissal() {
        let mut s = session();
        s.lookup(LookupKind::Current, "Atlantis").await;
        assert!(s.dismissal_deadline().is_some());

        s.lookup(LookupKind::Current, "Paris").await;
        assert!(matches!(s.state(), UiState::Showing { .. }));
        assert_eq!(s.dismissal_deadline(), None);
    }

    #[tokio::test]
    async fn recent_store_failure_does_not_block_lookup() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let recent = RecentCityStore::new(Box::new(FileStore::new(file.path())));
        let mut s = Session::new(Box::new(FakeApi), recent, Arc::new(Catalog::default()));

        let state = s.lookup(LookupKind::Current, "Tokyo").await;
        assert!(matches!(state, UiState::Showing { .. }));
        assert!(s.recent_cities().is_empty());
        assert_eq!(s.recent_chips(), RecentChips::Placeholder("No recent searches"));
    }

    #[tokio::test]
    async fn enter_on_selected_suggestion_looks_it_up() {
        let mut s = session();
        s.focus();
        s.input("p");
        s.key(Key::ArrowDown).await;
        s.key(Key::ArrowDown).await;

        let action = s.key(Key::Enter).await;
        assert_eq!(action, AutocompleteAction::Lookup("Perth".into()));
        assert_eq!(s.autocomplete().text(), "Perth");
        assert_eq!(s.dropdown(), Dropdown::Closed);
        assert_eq!(s.weather_view().unwrap().location, "Perth, XX");
    }

    #[tokio::test]
    async fn enter_without_selection_uses_raw_text() {
        let mut s = session();
        s.input("Springfield");
        s.key(Key::Enter).await;

        assert_eq!(s.recent_cities(), vec!["Springfield"]);
    }

    #[tokio::test]
    async fn click_on_suggestion_looks_it_up() {
        let mut s = session();
        s.input("to");
        s.click(0).await;
        assert_eq!(s.recent_cities(), vec!["Tokyo"]);
    }

    #[tokio::test]
    async fn selecting_a_recent_city_repeats_the_lookup() {
        let mut s = session();
        s.lookup(LookupKind::Current, "Paris").await;
        s.lookup(LookupKind::Current, "Tokyo").await;

        s.select_recent(1).await.unwrap();
        assert_eq!(s.autocomplete().text(), "Paris");
        assert_eq!(s.recent_cities(), vec!["Paris", "Tokyo"]);

        assert!(s.select_recent(9).await.is_none());
    }

    #[tokio::test]
    async fn blank_forecast_lookup_fails_validation() {
        let mut s = Session::new(
            Box::new(FakeApi),
            RecentCityStore::in_memory(),
            Arc::new(Catalog::default()),
        );

        s.lookup(LookupKind::Forecast, "   ").await;
        assert_eq!(s.state().error(), Some("Please enter a city name"));
        assert_eq!(s.recent_chips(), RecentChips::Placeholder("No recent searches"));
    }
}

//! Loading / error / result transitions around weather lookups.
//!
//! [`Coordinator::handle`] is a pure `(state, event) -> (state, effects)`
//! table: it never touches the network, storage, or a clock. The caller
//! executes the returned [`Effect`]s and feeds completions back in as
//! events.
//!
//! Every lookup is tagged with a [`RequestId`]. Only the most recently issued
//! request may complete; a completion for any older request is dropped, so an
//! overlapping lookup can never overwrite the result of a newer one.
//!
//! Each transition into Loading, Error, or Showing bumps a display
//! generation. A scheduled dismissal carries the generation it was issued
//! for and clears the error only if nothing has happened since.

use std::time::Duration;

use tracing::{debug, info};

use crate::{
    error::LookupError,
    model::{ForecastDay, ForecastReport, LookupKind, WeatherSnapshot},
};

/// How long an error banner stays visible.
pub const ERROR_DISPLAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiState {
    Idle,
    Loading,
    Error(String),
    Showing { current: WeatherSnapshot, forecast: Option<Vec<ForecastDay>> },
}

impl UiState {
    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            UiState::Error(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The user asked for a lookup.
    Lookup { kind: LookupKind, city: String },
    CurrentLoaded { request: RequestId, result: Result<WeatherSnapshot, LookupError> },
    ForecastLoaded { request: RequestId, result: Result<ForecastReport, LookupError> },
    /// A previously scheduled dismissal fired.
    DismissElapsed { generation: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchCurrent { request: RequestId, city: String },
    FetchForecast { request: RequestId, city: String },
    RecordRecent(String),
    ScheduleDismiss { generation: u64, after: Duration },
}

#[derive(Debug, Clone)]
struct InFlight {
    id: RequestId,
    kind: LookupKind,
    city: String,
}

#[derive(Debug)]
pub struct Coordinator {
    state: UiState,
    next_request: u64,
    in_flight: Option<InFlight>,
    generation: u64,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Coordinator {
    pub fn new() -> Self {
        Self { state: UiState::Idle, next_request: 0, in_flight: None, generation: 0 }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The request whose completion is currently awaited, if any.
    pub fn pending(&self) -> Option<RequestId> {
        self.in_flight.as_ref().map(|f| f.id)
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Lookup { kind, city } => self.start(kind, city),
            Event::CurrentLoaded { request, result } => {
                let Some(flight) = self.accept(request, LookupKind::Current) else {
                    return Vec::new();
                };
                match result {
                    Ok(current) => self.show(flight.city, current, None),
                    Err(err) => self.fail(&err),
                }
            }
            Event::ForecastLoaded { request, result } => {
                let Some(flight) = self.accept(request, LookupKind::Forecast) else {
                    return Vec::new();
                };
                match result {
                    Ok(report) => self.show(flight.city, report.current, Some(report.forecast)),
                    Err(err) => self.fail(&err),
                }
            }
            Event::DismissElapsed { generation } => {
                if generation == self.generation && matches!(self.state, UiState::Error(_)) {
                    debug!(generation, "error dismissed");
                    self.state = UiState::Idle;
                }
                Vec::new()
            }
        }
    }

    fn start(&mut self, kind: LookupKind, city: String) -> Vec<Effect> {
        let city = city.trim().to_string();
        if city.is_empty() {
            return self.fail(&LookupError::empty_city());
        }

        self.next_request += 1;
        let id = RequestId(self.next_request);

        if let Some(previous) = self.in_flight.as_ref() {
            debug!(previous = %previous.id, superseded_by = %id, "lookup superseded");
        }
        info!(request = %id, %kind, %city, "lookup started");

        self.in_flight = Some(InFlight { id, kind, city: city.clone() });
        self.transition(UiState::Loading);

        match kind {
            LookupKind::Current => vec![Effect::FetchCurrent { request: id, city }],
            LookupKind::Forecast => vec![Effect::FetchForecast { request: id, city }],
        }
    }

    fn accept(&mut self, request: RequestId, kind: LookupKind) -> Option<InFlight> {
        match self.in_flight.take() {
            Some(flight) if flight.id == request && flight.kind == kind => Some(flight),
            other => {
                debug!(request = %request, "discarding stale completion");
                self.in_flight = other;
                None
            }
        }
    }

    fn show(
        &mut self,
        city: String,
        current: WeatherSnapshot,
        forecast: Option<Vec<ForecastDay>>,
    ) -> Vec<Effect> {
        self.transition(UiState::Showing { current, forecast });
        vec![Effect::RecordRecent(city)]
    }

    fn fail(&mut self, err: &LookupError) -> Vec<Effect> {
        info!(error = %err, "lookup failed");
        self.transition(UiState::Error(err.to_string()));
        vec![Effect::ScheduleDismiss { generation: self.generation, after: ERROR_DISPLAY }]
    }

    fn transition(&mut self, next: UiState) {
        self.generation += 1;
        self.state = next;
    }
}

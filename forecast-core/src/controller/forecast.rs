use parking_lot::Mutex;
use std::sync::Arc;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, warn};

use crate::{
    FetchError, FetchErrorKind, Forecast, SettingsStore, provider::WeatherFetcher,
    provider::validate_city,
};

/// What a forecast screen shows. Exactly one case is active at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading {
        city: String,
    },
    Success(Forecast),
    Failure {
        city: String,
        kind: FetchErrorKind,
        message: String,
    },
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading { .. })
    }

    pub fn forecast(&self) -> Option<&Forecast> {
        match self {
            FetchState::Success(forecast) => Some(forecast),
            _ => None,
        }
    }

    fn failure(city: &str, err: &FetchError) -> Self {
        FetchState::Failure {
            city: city.to_string(),
            kind: err.kind(),
            message: err.user_message(),
        }
    }
}

#[derive(Debug, Default)]
struct Requests {
    /// Sequence number of the most recently issued request.
    latest: u64,
    in_flight: Option<JoinHandle<()>>,
}

#[derive(Debug)]
struct Inner {
    fetcher: Arc<dyn WeatherFetcher>,
    settings: Arc<SettingsStore>,
    state: watch::Sender<FetchState>,
    requests: Mutex<Requests>,
}

/// Drives one screen's forecast through `Idle → Loading → Success | Failure`.
///
/// At most one fetch is in flight per controller. Issuing a new request aborts the
/// previous one, and a resolution is applied only if it belongs to the latest request,
/// so a slow stale response can never overwrite newer state.
#[derive(Debug, Clone)]
pub struct ForecastController {
    inner: Arc<Inner>,
}

impl ForecastController {
    pub fn new(fetcher: Arc<dyn WeatherFetcher>, settings: Arc<SettingsStore>) -> Self {
        let (state, _) = watch::channel(FetchState::Idle);
        Self {
            inner: Arc::new(Inner {
                fetcher,
                settings,
                state,
                requests: Mutex::new(Requests::default()),
            }),
        }
    }

    /// Start loading `city`. Does nothing if that city is already loading.
    ///
    /// Returns whether a fetch was issued. Must be called from within a Tokio runtime.
    pub fn load(&self, city: &str) -> bool {
        self.issue(city, false)
    }

    /// Like [`load`](Self::load), but always issues a new fetch, superseding any in flight.
    pub fn refresh(&self, city: &str) -> bool {
        self.issue(city, true)
    }

    pub fn state(&self) -> FetchState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.inner.state.subscribe()
    }

    /// Wait until the controller is no longer loading and return that state.
    pub async fn wait_settled(&self) -> FetchState {
        let mut rx = self.subscribe();
        match rx.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    fn issue(&self, city: &str, force: bool) -> bool {
        let inner = &self.inner;
        let mut requests = inner.requests.lock();

        let already_loading = matches!(
            &*inner.state.borrow(),
            FetchState::Loading { city: current } if current == city
        );
        if already_loading && !force {
            debug!(city, "forecast already loading, ignoring load");
            return false;
        }

        requests.latest += 1;
        let seq = requests.latest;
        if let Some(previous) = requests.in_flight.take() {
            debug!(seq, "superseding in-flight forecast request");
            previous.abort();
        }

        if let Err(err) = validate_city(city) {
            inner.state.send_replace(FetchState::failure(city, &err));
            return false;
        }

        // Read on every request so a changed preference applies to the next load.
        let units = inner.settings.unit();
        inner.state.send_replace(FetchState::Loading {
            city: city.to_string(),
        });

        let task_inner = Arc::clone(inner);
        let city = city.to_string();
        requests.in_flight = Some(tokio::spawn(async move {
            let result = task_inner.fetcher.fetch(&city, units).await;
            task_inner.resolve(seq, &city, result);
        }));

        true
    }
}

impl Inner {
    fn resolve(&self, seq: u64, city: &str, result: Result<Forecast, FetchError>) {
        let mut requests = self.requests.lock();
        if seq != requests.latest {
            debug!(seq, latest = requests.latest, city, "discarding stale forecast result");
            return;
        }
        requests.in_flight = None;

        let next = match result {
            Ok(forecast) => FetchState::Success(forecast),
            Err(err) => {
                warn!(city, error = %err, "forecast fetch failed");
                FetchState::failure(city, &err)
            }
        };
        self.state.send_replace(next);
    }
}

use crate::events::AppEvent;
use async_channel::Sender;
use nearby::{Coordinate, PlacesClient, PlacesError, Restaurant};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchSnapshot {
    pub phase: FetchPhase,
    pub restaurants: Vec<Restaurant>,
    pub error: Option<String>,
}

impl FetchSnapshot {
    pub fn loading(&self) -> bool {
        self.phase == FetchPhase::Loading
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Places(#[from] PlacesError),
    #[error("Search superseded by a newer one")]
    Superseded,
}

/// Runs restaurant searches and holds the latest outcome.
///
/// Every call bumps a generation counter; when a response comes back for a generation that
/// is no longer current it is dropped, so an older, slower search cannot overwrite a newer
/// one.
pub struct FetchCoordinator {
    client: PlacesClient,
    state: RwLock<FetchSnapshot>,
    generation: AtomicU64,
    events: Option<Sender<AppEvent>>,
}

impl FetchCoordinator {
    pub fn new(client: PlacesClient) -> Self {
        Self {
            client,
            state: RwLock::new(FetchSnapshot::default()),
            generation: AtomicU64::new(0),
            events: None,
        }
    }

    pub fn with_events(mut self, tx: Sender<AppEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn snapshot(&self) -> FetchSnapshot {
        self.state.read().clone()
    }

    pub fn restaurants(&self) -> Vec<Restaurant> {
        self.state.read().restaurants.clone()
    }

    pub async fn fetch(
        &self,
        origin: Coordinate,
        radius_miles: f64,
    ) -> Result<Vec<Restaurant>, FetchError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.write();
            state.phase = FetchPhase::Loading;
            state.error = None;
        }
        self.emit(AppEvent::FetchStarted);

        let result = self.client.search_nearby(origin, radius_miles).await;

        let event = {
            let mut state = self.state.write();
            if self.generation.load(Ordering::SeqCst) != generation {
                log::debug!("Discarding stale search result (generation {})", generation);
                return Err(FetchError::Superseded);
            }

            match &result {
                Ok(restaurants) => {
                    state.phase = FetchPhase::Loaded;
                    state.restaurants = restaurants.clone();
                    log::info!("Loaded {} restaurants", restaurants.len());
                    AppEvent::RestaurantsLoaded(restaurants.len())
                }
                Err(e) => {
                    // previous results stay visible
                    let message = e.to_string();
                    log::error!("Restaurant search failed: {}", message);
                    state.phase = FetchPhase::Failed;
                    state.error = Some(message.clone());
                    AppEvent::FetchFailed(message)
                }
            }
        };
        self.emit(event);

        result.map_err(FetchError::from)
    }

    fn emit(&self, event: AppEvent) {
        if let Some(tx) = &self.events
            && let Err(e) = tx.try_send(event)
        {
            log::debug!("Dropped fetch event: {}", e);
        }
    }
}

use nearby::Restaurant;

#[derive(Debug, Clone)]
pub enum AppEvent {
    FetchStarted,
    RestaurantsLoaded(usize),
    FetchFailed(String),
    Frame {
        rotation: f64,
        pointer: Option<usize>,
    },
    SpinFinished(Restaurant),
}

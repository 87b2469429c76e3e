pub mod seats;
pub mod selection;
pub mod tracker;
pub mod train;

pub use seats::{generate_layout, Seat, SeatCategory, SeatPosition, SeatStatus};
pub use selection::{SeatSelection, SelectionError, Toggle};
pub use tracker::{LiveTrain, TrainTracker};
pub use train::{CatalogError, Train, TrainCatalog};

//! Direct and one-transfer itinerary search over a fixed bus network.
//!
//! ```no_run
//! use transtu::prelude::*;
//!
//! let network = Network::from_json_file("data/bus_routes.json").unwrap();
//! let repository = Repository::new().load_network(network).unwrap();
//! let router = repository.router();
//!
//! let from = Coordinate::new(36.7927, 10.0944);
//! let to = Coordinate::new(36.7181, 9.8944);
//! let direct = router.direct_routes(from, to);
//! let transfers = router.transfer_routes(from, to, 10);
//! ```

pub mod network;
pub mod repository;
pub mod router;
pub mod shared;

pub mod prelude {
    pub use crate::network::Network;
    pub use crate::repository::{Direction, Repository, Route, Stop};
    pub use crate::router::{
        DirectItinerary, Router, SearchConfig, Segment, TransferItinerary, TransferSearch,
    };
    pub use crate::shared::{Coordinate, Distance, Duration};
}

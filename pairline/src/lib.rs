pub use pairline_core::model::{ConnectionId, RoomKey};

pub mod model {
    pub use pairline_core::model::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use pairline_server::*;
}

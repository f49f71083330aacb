mod handshake;
mod room;
mod room_state;

pub use handshake::*;
pub use room::*;
pub use room_state::*;

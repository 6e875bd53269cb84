//! Pure data structures shared by the engine, the actor binding and the clients.

pub mod item;
pub mod order;
pub mod session;

pub use item::*;
pub use order::*;
pub use session::*;

// --- File: crates/cantacal_cantamen/src/lib.rs ---
pub mod client;
pub mod credentials;
pub mod doc;
pub mod error;
pub mod handlers;
pub mod ical;
pub mod logic;
pub mod models;
pub mod routes;

pub use error::CantamenError;
pub use routes::{routes, routes_with_state};

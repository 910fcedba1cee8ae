pub mod draw;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod names;
pub mod participants;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::router;
pub use state::{AppState, AppStateInner};

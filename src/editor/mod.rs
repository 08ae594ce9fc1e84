//! Text editor backend: open files for editing and save them back.
//!
//! `FileEditController` holds the request logic and talks to storage only
//! through the `View` trait. `routes` exposes it over HTTP.

pub mod controller;
pub mod model;
pub mod routes;

pub use controller::FileEditController;
pub use model::{LoadRequest, LoadedFile, OperationResult, Payload, SaveRequest, SavedFile};
pub use routes::{EditorRouteState, SaveBody, editor_routes};

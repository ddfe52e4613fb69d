pub mod router;
pub mod types;
pub mod handlers {
    pub mod cities;
    pub mod common;
    pub mod health;
    pub mod search;
}

pub use router::{create_router, ApiDoc};
pub use types::AppState;

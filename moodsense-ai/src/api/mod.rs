//! HTTP API handlers for moodsense-ai

pub mod analyze;
pub mod health;
pub mod mood;

pub use analyze::analyze_routes;
pub use health::health_routes;
pub use mood::mood_routes;

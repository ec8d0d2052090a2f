pub mod align;
pub mod config;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod risk;
pub mod scan;
pub mod schema;
pub mod service;
pub mod vocab;

pub use config::ServiceConfig;
pub use error::CoreError;
pub use schema::FeatureSchema;
pub use service::{ScoreResponse, ScoringService};

pub mod corpus;
pub mod features;
pub mod profile;
pub mod providers;
pub mod ranker;
pub mod recommendations;

pub use providers::{MetadataProvider, TmdbProvider};
pub use recommendations::{EngineSettings, RecommendationEngine, RunOutcome};

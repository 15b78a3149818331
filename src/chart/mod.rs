//! Chart enrichment: raw provider data joined against the registry

pub mod enrich;
pub mod raw;
pub mod subject;
pub mod summary;

pub use enrich::{enrich, EnrichedAspect, EnrichedChart, EnrichedHouse, EnrichedPlanet};
pub use raw::{RawAspect, RawChart, RawHouse, RawPlanet};
pub use subject::BirthSubject;
pub use summary::{summarize, AspectMood, ChartSummary};

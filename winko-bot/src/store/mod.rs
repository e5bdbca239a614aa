//! Identity stores. The traits are the persistence seam; the in-memory implementations hold
//! the single configured record and nothing is written to disk.

mod assistant;
mod user;

pub use assistant::{Assistant, AssistantStore, ConfiguredAssistantStore};
pub use user::{InMemoryUserStore, UserRecord, UserStore};

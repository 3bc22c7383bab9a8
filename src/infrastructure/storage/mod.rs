//! In-memory storage implementations

mod memory;

pub use memory::{InMemoryRepositoryProvider, ProvisioningStep};

// Adapters layer: concrete implementations for external systems.

pub mod storage;
pub mod worker_manager;

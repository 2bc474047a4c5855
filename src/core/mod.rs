pub mod aggregate;
pub mod collector;
pub mod datetime;
pub mod engine;
pub mod export;
pub mod flatten;
pub mod projector;
pub mod summary;

pub use crate::domain::model::{FlatRow, Page, Record, RecordKind, StatsReport};
pub use crate::domain::ports::{PagedSource, Pipeline, Storage, WorkerManager};
pub use crate::utils::error::Result;

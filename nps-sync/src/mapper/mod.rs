//! Mapper module.
//!
//! Turns survey records into external pages.

mod date;
mod record_mapper;

pub use date::{normalize_date, processing_instant};
pub use record_mapper::{MappingStrategy, RecordMapper, UNSPECIFIED_FALLBACK};

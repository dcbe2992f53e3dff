//! Trade log ingestion and normalization

pub mod ingest;
pub mod schema;

pub use ingest::{
    parse_date, IngestError, IngestOptions, TradeLog, TradeLogReader, DEFAULT_DATE_FORMATS,
};
pub use schema::TradeLogSchema;

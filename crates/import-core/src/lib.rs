//! Core types for csv-import.
//!
//! This crate holds the [`Record`] type that flows from the CSV source into
//! a record sink:
//!
//! ```text
//! import-core (this crate)
//!    │
//!    ├─── csv-import-source      (produces Records from CSV files)
//!    └─── csv-import-mysql-sink  (writes Records as MySQL rows)
//! ```

mod record;

pub use record::Record;

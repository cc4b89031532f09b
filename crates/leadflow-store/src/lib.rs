//! Leadflow Store: the lead table on disk.
//!
//! Loads a CSV of leads into typed `Lead` records and writes them back with
//! every input column preserved, plus the columns the pipeline fills in.

pub mod table;

pub use table::LeadTable;

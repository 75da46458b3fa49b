//! Evidence Adapters

mod file_evidence_source;

pub use file_evidence_source::{FileEvidenceSource, DEFAULT_MAX_FILE_BYTES};

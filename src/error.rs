use thiserror::Error;

/// Decode failures, from fatal volume-level conditions down to per-field
/// absences. Volume-level variants abort the session; record- and
/// attribute-level variants degrade to whatever was already decoded.
#[derive(Debug, Error)]
pub enum NtfsError {
    #[error("not an NTFS volume (bad OEM signature)")]
    NotNtfsVolume,

    #[error("$MFT record 0 has no usable $DATA attribute")]
    MftDataMissing,

    #[error("file record buffer is {0} bytes, expected at least 1024")]
    InvalidRecordSize(usize),

    #[error("malformed attribute at record offset {offset}: {reason}")]
    MalformedAttribute { offset: usize, reason: String },

    #[error("datarun stream truncated at byte {0}")]
    TruncatedDatarunStream(usize),

    #[error("short read from backing source at byte offset {offset}: wanted {wanted} bytes")]
    TruncatedSource { offset: u64, wanted: usize },

    #[error("empty integer field")]
    EmptyIntegerField,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

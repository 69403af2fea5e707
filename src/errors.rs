use crate::grades::EntryId;

/// Error type that can be returned by fallible operations in this crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error splitting purchase lines into fields
    #[error("Error processing CSV")]
    Load(#[from] csv::Error),
    /// Error reading the purchase stream itself
    #[error("Error reading input")]
    Read(#[from] std::io::Error),
    /// A gradebook action referred to an entry that does not exist, either because it was
    /// removed or because it was never added.
    #[error("No gradebook entry with id {0}")]
    UnknownEntry(EntryId),
    /// Error rendering chart data for the charting library
    #[error("Error serializing chart")]
    Serialize(#[from] serde_json::Error),
}

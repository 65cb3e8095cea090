//! Database row models.

#[derive(Debug, Clone)]
pub struct JournalEntry {
    pub id: i64,
    /// RFC 3339, local offset
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SourceKind {
    Food,
    Meal,
    Exercise,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Food => "food",
            SourceKind::Meal => "meal",
            SourceKind::Exercise => "exercise",
        }
    }
}

/// One source item whose definition changed after entries snapshotting it
/// were created. One row per item, not per entry.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewItem {
    pub source_kind: SourceKind,
    pub source_id: Uuid,
    pub name: String,
    pub source_updated_at: OffsetDateTime,
    pub entry_created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct ReviewCount {
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct AcceptResponse {
    pub updated: u64,
}

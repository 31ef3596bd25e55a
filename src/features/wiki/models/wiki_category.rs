use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::shared::hierarchy::TreeItem;

/// Database model for a wiki category
#[derive(Debug, Clone, FromRow)]
pub struct WikiCategory {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TreeItem for WikiCategory {
    fn id(&self) -> i64 {
        self.id
    }
    fn parent_id(&self) -> Option<i64> {
        self.parent_id
    }
    fn display_order(&self) -> i32 {
        self.display_order
    }
    fn sort_name(&self) -> &str {
        &self.name
    }
}

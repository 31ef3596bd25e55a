use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::wiki::models::WikiCategory;
use crate::shared::hierarchy::Tree;

/// Response DTO for a wiki category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WikiCategoryResponseDto {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub display_order: i32,
}

impl From<WikiCategory> for WikiCategoryResponseDto {
    fn from(c: WikiCategory) -> Self {
        Self {
            id: c.id,
            parent_id: c.parent_id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            icon: c.icon,
            color: c.color,
            display_order: c.display_order,
        }
    }
}

/// Response DTO for the wiki category tree
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct WikiCategoryTreeDto {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub display_order: i32,
    pub children: Vec<WikiCategoryTreeDto>,
}

impl WikiCategoryTreeDto {
    pub fn from_tree(tree: Tree<WikiCategory>) -> Self {
        let Tree { item, children } = tree;
        Self {
            id: item.id,
            parent_id: item.parent_id,
            name: item.name,
            slug: item.slug,
            description: item.description,
            icon: item.icon,
            color: item.color,
            display_order: item.display_order,
            children: children.into_iter().map(Self::from_tree).collect(),
        }
    }
}

/// Payload for creating a wiki category
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateWikiCategoryDto {
    #[validate(length(min = 1, max = 160, message = "name must be 1-160 characters"))]
    pub name: String,

    /// Derived from the name when omitted
    pub slug: Option<String>,

    pub description: Option<String>,

    /// Icon identifier shown in the wiki navigation
    pub icon: Option<String>,

    /// Accent color (CSS value) shown in the wiki navigation
    pub color: Option<String>,

    pub parent_id: Option<i64>,

    #[serde(default)]
    pub display_order: i32,
}

/// Payload for updating a wiki category. Omitted fields keep their value;
/// `parent_id` distinguishes "absent" (keep) from `null` (move to root).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateWikiCategoryDto {
    #[validate(length(min = 1, max = 160, message = "name must be 1-160 characters"))]
    pub name: Option<String>,

    pub slug: Option<String>,

    pub description: Option<String>,

    pub icon: Option<String>,

    pub color: Option<String>,

    #[serde(default, deserialize_with = "crate::shared::types::double_option")]
    #[schema(value_type = Option<i64>)]
    pub parent_id: Option<Option<i64>>,

    pub display_order: Option<i32>,
}

/// One node move inside a re-parent batch
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct WikiReparentUpdateDto {
    pub id: i64,
    /// New parent, or null to move the node to the root level
    pub parent_id: Option<i64>,
}

/// Batch of node moves, applied atomically
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct WikiReparentRequestDto {
    #[validate(length(min = 1, message = "at least one update is required"))]
    pub updates: Vec<WikiReparentUpdateDto>,
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::categories::models::Category;
use crate::shared::hierarchy::Tree;

/// Response DTO for a category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub display_order: i32,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            parent_id: c.parent_id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            display_order: c.display_order,
        }
    }
}

/// Response DTO for the category tree (hierarchical structure)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct CategoryTreeDto {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub children: Vec<CategoryTreeDto>,
}

impl CategoryTreeDto {
    pub fn from_tree(tree: Tree<Category>) -> Self {
        let Tree { item, children } = tree;
        Self {
            id: item.id,
            parent_id: item.parent_id,
            name: item.name,
            slug: item.slug,
            description: item.description,
            display_order: item.display_order,
            children: children.into_iter().map(Self::from_tree).collect(),
        }
    }
}

/// Payload for creating a category
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 160, message = "name must be 1-160 characters"))]
    pub name: String,

    /// Derived from the name when omitted
    pub slug: Option<String>,

    pub description: Option<String>,

    pub parent_id: Option<i64>,

    #[serde(default)]
    pub display_order: i32,
}

/// Payload for updating a category. Omitted fields keep their value;
/// `parent_id` distinguishes "absent" (keep) from `null` (move to root).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryDto {
    #[validate(length(min = 1, max = 160, message = "name must be 1-160 characters"))]
    pub name: Option<String>,

    pub slug: Option<String>,

    pub description: Option<String>,

    #[serde(default, deserialize_with = "crate::shared::types::double_option")]
    #[schema(value_type = Option<i64>)]
    pub parent_id: Option<Option<i64>>,

    pub display_order: Option<i32>,
}

/// One node move inside a re-parent batch
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ReparentUpdateDto {
    pub id: i64,
    /// New parent, or null to move the node to the root level
    pub parent_id: Option<i64>,
}

/// Batch of node moves, applied atomically
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReparentRequestDto {
    #[validate(length(min = 1, message = "at least one update is required"))]
    pub updates: Vec<ReparentUpdateDto>,
}

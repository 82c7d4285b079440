use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::{CatalogStatus, Category, Product, SubCategory, SuperSubCategory};
use crate::{
    error::ApiError,
    validation::{optional, required, slugify},
};

#[derive(Debug, Serialize)]
pub struct CategoryPage {
    pub category: Category,
    pub sub_categories: Vec<SubCategory>,
}

#[derive(Debug, Serialize)]
pub struct SubCategoryPage {
    pub category: Category,
    pub sub_category: SubCategory,
    pub super_sub_categories: Vec<SuperSubCategory>,
}

#[derive(Debug, Serialize)]
pub struct SuperSubCategoryPage {
    pub category: Category,
    pub sub_category: SubCategory,
    pub super_sub_category: SuperSubCategory,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct ProductPage {
    pub category: Category,
    pub sub_category: SubCategory,
    pub super_sub_category: SuperSubCategory,
    pub product: Product,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct SubCategoryFilter {
    pub category_id: Option<Uuid>,
}

/// Admin create/update body for a category.
#[derive(Debug, Deserialize)]
pub struct CategoryInput {
    #[serde(default)]
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<String>,
    pub sort_order: Option<i32>,
}

/// Admin create/update body for a sub-category.
#[derive(Debug, Deserialize)]
pub struct SubCategoryInput {
    pub category_id: Option<Uuid>,
    #[serde(flatten)]
    pub common: CategoryInput,
}

/// Validated, normalized column values.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFields {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub status: CatalogStatus,
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubCategoryFields {
    pub category_id: Uuid,
    pub common: CategoryFields,
}

impl CategoryInput {
    pub fn validate(self) -> Result<CategoryFields, ApiError> {
        let name = required("name", &self.name)?;
        let slug = match optional(self.slug) {
            Some(s) => slugify(&s),
            None => slugify(&name),
        };
        if slug.is_empty() {
            return Err(ApiError::BadRequest("slug is required".into()));
        }
        let status = match optional(self.status) {
            None => CatalogStatus::Active,
            Some(s) => CatalogStatus::parse(&s).ok_or_else(|| {
                ApiError::BadRequest("status must be 'active' or 'inactive'".into())
            })?,
        };
        Ok(CategoryFields {
            name,
            slug,
            description: optional(self.description),
            image_url: optional(self.image_url),
            status,
            sort_order: self.sort_order.unwrap_or(0),
        })
    }
}

impl SubCategoryInput {
    pub fn validate(self) -> Result<SubCategoryFields, ApiError> {
        let category_id = self
            .category_id
            .ok_or_else(|| ApiError::BadRequest("category_id is required".into()))?;
        Ok(SubCategoryFields {
            category_id,
            common: self.common.validate()?,
        })
    }
}

use std::fmt;

use tracing::debug;

use super::{
    repo::CatalogReader,
    repo_types::{Category, Product, SubCategory, SuperSubCategory},
};
use crate::error::ApiError;

/// Depth of the catalog hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Category,
    SubCategory,
    SuperSubCategory,
    Product,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Category => "Category",
            Level::SubCategory => "Sub-category",
            Level::SuperSubCategory => "Super-sub-category",
            Level::Product => "Product",
        })
    }
}

/// Slugs from the URL, outermost first. A level is only looked at when
/// every level above it is present.
#[derive(Debug, Clone, Default)]
pub struct SlugPath {
    pub category: String,
    pub sub_category: Option<String>,
    pub super_sub_category: Option<String>,
    pub product: Option<String>,
}

/// Entities resolved for a [`SlugPath`].
#[derive(Debug, Clone)]
pub struct Resolved {
    pub category: Category,
    pub sub_category: Option<SubCategory>,
    pub super_sub_category: Option<SuperSubCategory>,
    pub product: Option<Product>,
}

fn not_found(level: Level) -> ApiError {
    ApiError::NotFound(format!("{level} not found"))
}

/// Walks the hierarchy one lookup at a time, each scoped to the parent
/// found by the previous step. Stops at the first missing level.
pub async fn resolve(reader: &dyn CatalogReader, path: &SlugPath) -> Result<Resolved, ApiError> {
    let category = reader
        .category_by_slug(&path.category)
        .await?
        .ok_or_else(|| not_found(Level::Category))?;

    let mut resolved = Resolved {
        category,
        sub_category: None,
        super_sub_category: None,
        product: None,
    };

    let Some(sub_slug) = &path.sub_category else {
        return Ok(resolved);
    };
    let sub = reader
        .sub_category_by_slug(resolved.category.id, sub_slug)
        .await?
        .ok_or_else(|| not_found(Level::SubCategory))?;
    let sub_id = sub.id;
    resolved.sub_category = Some(sub);

    let Some(super_slug) = &path.super_sub_category else {
        return Ok(resolved);
    };
    let super_sub = reader
        .super_sub_category_by_slug(sub_id, super_slug)
        .await?
        .ok_or_else(|| not_found(Level::SuperSubCategory))?;
    let super_id = super_sub.id;
    resolved.super_sub_category = Some(super_sub);

    let Some(product_slug) = &path.product else {
        return Ok(resolved);
    };
    let product = reader
        .product_by_slug(super_id, product_slug)
        .await?
        .ok_or_else(|| not_found(Level::Product))?;
    resolved.product = Some(product);

    debug!(category = %path.category, product = %product_slug, "resolved full catalog path");
    Ok(resolved)
}


#[cfg(test)]
mod tests {
    use super::{fake::MemoryCatalog, *};

    fn path(parts: &[&str]) -> SlugPath {
        let get = |i: usize| parts.get(i).map(|s| s.to_string());
        SlugPath {
            category: parts[0].to_string(),
            sub_category: get(1),
            super_sub_category: get(2),
            product: get(3),
        }
    }

    #[tokio::test]
    async fn resolves_every_depth() {
        let catalog = MemoryCatalog::seeded();

        let r = resolve(&catalog, &path(&["tools"])).await.unwrap();
        assert_eq!(r.category.slug, "tools");
        assert!(r.sub_category.is_none());

        let r = resolve(&catalog, &path(&["tools", "hand-tools", "spanners"]))
            .await
            .unwrap();
        assert_eq!(r.super_sub_category.unwrap().slug, "spanners");
        assert!(r.product.is_none());

        let r = resolve(
            &catalog,
            &path(&["tools", "hand-tools", "spanners", "combination-spanner"]),
        )
        .await
        .unwrap();
        assert_eq!(r.product.unwrap().price, Some(12.5));
    }

    #[tokio::test]
    async fn reports_first_missing_level() {
        let catalog = MemoryCatalog::seeded();
        let cases = [
            (vec!["nope", "hand-tools"], "Category not found"),
            (vec!["tools", "nope", "spanners"], "Sub-category not found"),
            (vec!["tools", "hand-tools", "nope", "x"], "Super-sub-category not found"),
            (vec!["tools", "hand-tools", "spanners", "nope"], "Product not found"),
        ];
        for (parts, msg) in cases {
            let err = resolve(&catalog, &path(&parts)).await.unwrap_err();
            assert!(matches!(&err, ApiError::NotFound(m) if m == msg), "{parts:?}: {err}");
        }
    }

    #[tokio::test]
    async fn inactive_category_is_hidden() {
        let catalog = MemoryCatalog::seeded();
        let err = resolve(&catalog, &path(&["archive"])).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn child_slug_must_belong_to_parent() {
        let mut catalog = MemoryCatalog::seeded();
        let mut other = catalog.categories[0].clone();
        other.id = uuid::Uuid::new_v4();
        other.slug = "garden".into();
        catalog.categories.push(other);

        let err = resolve(&catalog, &path(&["garden", "hand-tools"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(m) if m == "Sub-category not found"));
    }
}

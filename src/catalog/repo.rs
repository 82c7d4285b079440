use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    dto::{CategoryFields, SubCategoryFields},
    repo_types::{Category, Product, SubCategory, SuperSubCategory},
};

const CATEGORY_COLUMNS: &str =
    "id, name, slug, description, image_url, status, sort_order, created_at";
const SUB_CATEGORY_COLUMNS: &str =
    "id, category_id, name, slug, description, image_url, status, sort_order, created_at";
const SUPER_SUB_CATEGORY_COLUMNS: &str =
    "id, sub_category_id, name, slug, description, image_url, status, sort_order, created_at";
const PRODUCT_COLUMNS: &str = "id, super_sub_category_id, name, slug, description, image_url, \
     price, specifications, status, created_at";

/// Storefront reads. Everything returned is `active`.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    async fn categories(&self) -> anyhow::Result<Vec<Category>>;
    async fn category_by_slug(&self, slug: &str) -> anyhow::Result<Option<Category>>;

    async fn sub_categories(&self, category_id: Uuid) -> anyhow::Result<Vec<SubCategory>>;
    async fn sub_category_by_slug(
        &self,
        category_id: Uuid,
        slug: &str,
    ) -> anyhow::Result<Option<SubCategory>>;

    async fn super_sub_categories(
        &self,
        sub_category_id: Uuid,
    ) -> anyhow::Result<Vec<SuperSubCategory>>;
    async fn super_sub_category_by_slug(
        &self,
        sub_category_id: Uuid,
        slug: &str,
    ) -> anyhow::Result<Option<SuperSubCategory>>;

    async fn products(&self, super_sub_category_id: Uuid) -> anyhow::Result<Vec<Product>>;
    async fn product_by_slug(
        &self,
        super_sub_category_id: Uuid,
        slug: &str,
    ) -> anyhow::Result<Option<Product>>;

    async fn search_products(&self, query: &str, limit: i64) -> anyhow::Result<Vec<Product>>;
}

/// [`CatalogReader`] backed by PostgreSQL.
#[derive(Clone)]
pub struct PgCatalog {
    db: PgPool,
}

impl PgCatalog {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogReader for PgCatalog {
    async fn categories(&self) -> anyhow::Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories \
             WHERE status = 'active' ORDER BY sort_order, name"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn category_by_slug(&self, slug: &str) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories \
             WHERE slug = $1 AND status = 'active'"
        ))
        .bind(slug)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn sub_categories(&self, category_id: Uuid) -> anyhow::Result<Vec<SubCategory>> {
        let rows = sqlx::query_as::<_, SubCategory>(&format!(
            "SELECT {SUB_CATEGORY_COLUMNS} FROM sub_categories \
             WHERE category_id = $1 AND status = 'active' ORDER BY sort_order, name"
        ))
        .bind(category_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn sub_category_by_slug(
        &self,
        category_id: Uuid,
        slug: &str,
    ) -> anyhow::Result<Option<SubCategory>> {
        let row = sqlx::query_as::<_, SubCategory>(&format!(
            "SELECT {SUB_CATEGORY_COLUMNS} FROM sub_categories \
             WHERE category_id = $1 AND slug = $2 AND status = 'active'"
        ))
        .bind(category_id)
        .bind(slug)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn super_sub_categories(
        &self,
        sub_category_id: Uuid,
    ) -> anyhow::Result<Vec<SuperSubCategory>> {
        let rows = sqlx::query_as::<_, SuperSubCategory>(&format!(
            "SELECT {SUPER_SUB_CATEGORY_COLUMNS} FROM super_sub_categories \
             WHERE sub_category_id = $1 AND status = 'active' ORDER BY sort_order, name"
        ))
        .bind(sub_category_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn super_sub_category_by_slug(
        &self,
        sub_category_id: Uuid,
        slug: &str,
    ) -> anyhow::Result<Option<SuperSubCategory>> {
        let row = sqlx::query_as::<_, SuperSubCategory>(&format!(
            "SELECT {SUPER_SUB_CATEGORY_COLUMNS} FROM super_sub_categories \
             WHERE sub_category_id = $1 AND slug = $2 AND status = 'active'"
        ))
        .bind(sub_category_id)
        .bind(slug)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn products(&self, super_sub_category_id: Uuid) -> anyhow::Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE super_sub_category_id = $1 AND status = 'active' ORDER BY name"
        ))
        .bind(super_sub_category_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn product_by_slug(
        &self,
        super_sub_category_id: Uuid,
        slug: &str,
    ) -> anyhow::Result<Option<Product>> {
        let row = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE super_sub_category_id = $1 AND slug = $2 AND status = 'active'"
        ))
        .bind(super_sub_category_id)
        .bind(slug)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn search_products(&self, query: &str, limit: i64) -> anyhow::Result<Vec<Product>> {
        let pattern = format!("%{}%", escape_like(query));
        let rows = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE status = 'active' AND name ILIKE $1 ESCAPE '\\' \
             ORDER BY name LIMIT $2"
        ))
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

// ---- admin writes ----

pub async fn list_all_categories(db: &PgPool) -> anyhow::Result<Vec<Category>> {
    let rows = sqlx::query_as::<_, Category>(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY sort_order, name"
    ))
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn count_categories(db: &PgPool) -> anyhow::Result<i64> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
        .fetch_one(db)
        .await?;
    Ok(n)
}

pub async fn insert_category(db: &PgPool, f: &CategoryFields) -> Result<Category, sqlx::Error> {
    sqlx::query_as::<_, Category>(&format!(
        "INSERT INTO categories (name, slug, description, image_url, status, sort_order) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {CATEGORY_COLUMNS}"
    ))
    .bind(&f.name)
    .bind(&f.slug)
    .bind(&f.description)
    .bind(&f.image_url)
    .bind(f.status.as_str())
    .bind(f.sort_order)
    .fetch_one(db)
    .await
}

pub async fn update_category(
    db: &PgPool,
    id: Uuid,
    f: &CategoryFields,
) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(&format!(
        "UPDATE categories SET name = $2, slug = $3, description = $4, image_url = $5, \
         status = $6, sort_order = $7 WHERE id = $1 RETURNING {CATEGORY_COLUMNS}"
    ))
    .bind(id)
    .bind(&f.name)
    .bind(&f.slug)
    .bind(&f.description)
    .bind(&f.image_url)
    .bind(f.status.as_str())
    .bind(f.sort_order)
    .fetch_optional(db)
    .await
}

/// Returns false when no row had this id.
pub async fn delete_category(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn list_all_sub_categories(
    db: &PgPool,
    category_id: Option<Uuid>,
) -> anyhow::Result<Vec<SubCategory>> {
    let rows = sqlx::query_as::<_, SubCategory>(&format!(
        "SELECT {SUB_CATEGORY_COLUMNS} FROM sub_categories \
         WHERE ($1::uuid IS NULL OR category_id = $1) ORDER BY sort_order, name"
    ))
    .bind(category_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn count_sub_categories(db: &PgPool) -> anyhow::Result<i64> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sub_categories")
        .fetch_one(db)
        .await?;
    Ok(n)
}

pub async fn insert_sub_category(
    db: &PgPool,
    f: &SubCategoryFields,
) -> Result<SubCategory, sqlx::Error> {
    sqlx::query_as::<_, SubCategory>(&format!(
        "INSERT INTO sub_categories \
         (category_id, name, slug, description, image_url, status, sort_order) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {SUB_CATEGORY_COLUMNS}"
    ))
    .bind(f.category_id)
    .bind(&f.common.name)
    .bind(&f.common.slug)
    .bind(&f.common.description)
    .bind(&f.common.image_url)
    .bind(f.common.status.as_str())
    .bind(f.common.sort_order)
    .fetch_one(db)
    .await
}

pub async fn update_sub_category(
    db: &PgPool,
    id: Uuid,
    f: &SubCategoryFields,
) -> Result<Option<SubCategory>, sqlx::Error> {
    sqlx::query_as::<_, SubCategory>(&format!(
        "UPDATE sub_categories SET category_id = $2, name = $3, slug = $4, description = $5, \
         image_url = $6, status = $7, sort_order = $8 WHERE id = $1 \
         RETURNING {SUB_CATEGORY_COLUMNS}"
    ))
    .bind(id)
    .bind(f.category_id)
    .bind(&f.common.name)
    .bind(&f.common.slug)
    .bind(&f.common.description)
    .bind(&f.common.image_url)
    .bind(f.common.status.as_str())
    .bind(f.common.sort_order)
    .fetch_optional(db)
    .await
}

pub async fn delete_sub_category(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM sub_categories WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}

use async_trait::async_trait;
use sqlx::types::Json;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{MenuRepo, RepoError},
    domain::menu::{MenuItemRecord, MenuOption, MenuTag, ModifierGroup, NewMenuItem},
};

use super::{PostgresRepositories, map_sqlx_error};

const MENU_ITEM_COLUMNS: &str =
    "id, item_name, description, category, options, modifiers, tags, image_key, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct MenuItemRow {
    id: Uuid,
    item_name: String,
    description: Option<String>,
    category: String,
    options: Json<Vec<MenuOption>>,
    modifiers: Json<ModifierGroup>,
    tags: Json<Vec<MenuTag>>,
    image_key: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<MenuItemRow> for MenuItemRecord {
    fn from(row: MenuItemRow) -> Self {
        Self {
            id: row.id,
            item_name: row.item_name,
            description: row.description,
            category: row.category,
            options: row.options.0,
            modifiers: row.modifiers.0,
            tags: row.tags.0,
            image_key: row.image_key,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl MenuRepo for PostgresRepositories {
    async fn find_all(&self) -> Result<Vec<MenuItemRecord>, RepoError> {
        let rows = sqlx::query_as::<_, MenuItemRow>(&format!(
            "SELECT {MENU_ITEM_COLUMNS} FROM menu_items ORDER BY category, item_name"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(MenuItemRecord::from).collect())
    }

    async fn distinct_categories(&self) -> Result<Vec<String>, RepoError> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM menu_items ORDER BY category",
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MenuItemRecord>, RepoError> {
        let row = sqlx::query_as::<_, MenuItemRow>(&format!(
            "SELECT {MENU_ITEM_COLUMNS} FROM menu_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(MenuItemRecord::from))
    }

    async fn insert(&self, item: NewMenuItem) -> Result<MenuItemRecord, RepoError> {
        let row = sqlx::query_as::<_, MenuItemRow>(&format!(
            "INSERT INTO menu_items \
                 (item_name, description, category, options, modifiers, tags, image_key) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {MENU_ITEM_COLUMNS}"
        ))
        .bind(item.item_name)
        .bind(item.description)
        .bind(item.category)
        .bind(Json(item.options))
        .bind(Json(item.modifiers))
        .bind(Json(item.tags))
        .bind(item.image_key)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(MenuItemRecord::from(row))
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        item: NewMenuItem,
    ) -> Result<Option<MenuItemRecord>, RepoError> {
        let row = sqlx::query_as::<_, MenuItemRow>(&format!(
            "UPDATE menu_items SET \
                 item_name = $2, description = $3, category = $4, options = $5, \
                 modifiers = $6, tags = $7, image_key = $8, updated_at = now() \
             WHERE id = $1 \
             RETURNING {MENU_ITEM_COLUMNS}"
        ))
        .bind(id)
        .bind(item.item_name)
        .bind(item.description)
        .bind(item.category)
        .bind(Json(item.options))
        .bind(Json(item.modifiers))
        .bind(Json(item.tags))
        .bind(item.image_key)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(MenuItemRecord::from))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<Option<MenuItemRecord>, RepoError> {
        let row = sqlx::query_as::<_, MenuItemRow>(&format!(
            "DELETE FROM menu_items WHERE id = $1 RETURNING {MENU_ITEM_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(MenuItemRecord::from))
    }
}

//! Menu service: the write path (validate → persist → invalidate) and the
//! cache-first read paths.

use std::sync::Arc;

use metrics::counter;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use crate::application::repos::{ImageStore, MenuRepo, RepoError};
use crate::cache::MenuCache;
use crate::domain::menu::{MenuItemRecord, NewMenuItem, has_valid_prices};

#[derive(Debug, Error)]
pub enum MenuServiceError {
    #[error("all prices must be at least $0.01")]
    InvalidPrices,
    #[error("menu item not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Orchestrates menu reads and writes.
///
/// Owns the write path: no other component mutates menu storage. Every
/// successful write drops the collection snapshot so the next read
/// repopulates from storage; the cache is never touched before a commit.
#[derive(Clone)]
pub struct MenuService {
    repo: Arc<dyn MenuRepo>,
    images: Arc<dyn ImageStore>,
    cache: Arc<MenuCache>,
}

impl MenuService {
    pub fn new(repo: Arc<dyn MenuRepo>, images: Arc<dyn ImageStore>, cache: Arc<MenuCache>) -> Self {
        Self {
            repo,
            images,
            cache,
        }
    }

    pub async fn menu_items(&self) -> Result<Vec<MenuItemRecord>, MenuServiceError> {
        if let Some(items) = self.cache.get_menu_items() {
            counter!("savora_cache_menu_hit_total").increment(1);
            return Ok(items);
        }
        counter!("savora_cache_menu_miss_total").increment(1);

        let items = self.repo.find_all().await.map_err(|err| {
            error!(error = %err, "menu collection query failed");
            err
        })?;
        self.cache.set_menu_items(items.clone());
        Ok(items)
    }

    pub async fn distinct_categories(&self) -> Result<Vec<String>, MenuServiceError> {
        if let Some(categories) = self.cache.get_categories() {
            counter!("savora_cache_categories_hit_total").increment(1);
            return Ok(categories);
        }
        counter!("savora_cache_categories_miss_total").increment(1);

        let categories = self.repo.distinct_categories().await.map_err(|err| {
            error!(error = %err, "category query failed");
            err
        })?;
        self.cache.set_categories(categories.clone());
        Ok(categories)
    }

    /// Point lookups go straight to storage; the collection snapshot is not
    /// consulted.
    pub async fn menu_item_by_id(&self, id: Uuid) -> Result<MenuItemRecord, MenuServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(MenuServiceError::NotFound)
    }

    pub async fn add_menu_item(
        &self,
        item: NewMenuItem,
    ) -> Result<MenuItemRecord, MenuServiceError> {
        if !has_valid_prices(&item.options) {
            return Err(MenuServiceError::InvalidPrices);
        }

        let record = self.repo.insert(item).await?;

        // The category snapshot keeps serving its cached copy even when the
        // insert introduced a brand-new category.
        self.cache.invalidate_menu_items();
        Ok(record)
    }

    pub async fn update_menu_item(
        &self,
        id: Uuid,
        item: NewMenuItem,
    ) -> Result<MenuItemRecord, MenuServiceError> {
        if !has_valid_prices(&item.options) {
            return Err(MenuServiceError::InvalidPrices);
        }

        let record = self
            .repo
            .update_by_id(id, item)
            .await?
            .ok_or(MenuServiceError::NotFound)?;

        self.cache.invalidate_menu_items();
        Ok(record)
    }

    pub async fn delete_menu_item(&self, id: Uuid) -> Result<(), MenuServiceError> {
        let removed = self
            .repo
            .delete_by_id(id)
            .await?
            .ok_or(MenuServiceError::NotFound)?;

        self.cache.invalidate_menu_items();

        // The record deletion is the operation of record; blob cleanup runs
        // detached and its failure reaches only the log.
        if let Some(key) = removed.image_key {
            let images = Arc::clone(&self.images);
            tokio::spawn(async move {
                if let Err(err) = images.delete(&key).await {
                    counter!("savora_image_cleanup_failure_total").increment(1);
                    warn!(image_key = %key, error = %err, "menu image cleanup failed");
                }
            });
        }

        Ok(())
    }
}

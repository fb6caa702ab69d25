//! Catalog and likes stores.
//!
//! The engine only sees the traits. `SledStore` keeps both in one sled
//! database; `MemoryLikesStore` is a process-local likes set.

use crate::normalize::fold_key;
use crate::{CatalogItem, ItemDetails, NO_DESCRIPTION};
use anyhow::Result;
use parking_lot::RwLock;
use sled::transaction::ConflictableTransactionError;
use sled::Transactional;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

pub trait CatalogStore: Send + Sync {
    /// Every item, in corpus order.
    fn items(&self) -> Result<Vec<CatalogItem>>;
    /// Enrichment data for a title, matched on its folded key.
    fn details(&self, title: &str) -> Result<Option<ItemDetails>>;
}

pub trait LikesStore: Send + Sync {
    /// Returns false if the title is already liked.
    fn add(&self, title: &str) -> Result<bool>;
    fn remove(&self, title: &str) -> Result<()>;
    fn list_all(&self) -> Result<BTreeSet<String>>;
}

pub struct SledStore {
    db: sled::Db,
    catalog: sled::Tree,
    by_title: sled::Tree,
    likes: sled::Tree,
}

impl SledStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_db(sled::open(path)?)
    }

    /// Store backed by a temporary directory, removed on drop.
    pub fn temporary() -> Result<Self> {
        Self::from_db(sled::Config::new().temporary(true).open()?)
    }

    fn from_db(db: sled::Db) -> Result<Self> {
        let catalog = db.open_tree("catalog")?;
        let by_title = db.open_tree("catalog_by_title")?;
        let likes = db.open_tree("likes")?;
        Ok(Self { db, catalog, by_title, likes })
    }

    /// Replace the catalog with `items`, in order. Both trees change in one
    /// transaction, so a failure leaves the previous catalog intact.
    pub fn replace_catalog(&self, items: &[CatalogItem]) -> Result<()> {
        let mut catalog = sled::Batch::default();
        let mut by_title = sled::Batch::default();
        for key in self.catalog.iter().keys() {
            catalog.remove(key?);
        }
        for key in self.by_title.iter().keys() {
            by_title.remove(key?);
        }
        for (pos, item) in items.iter().enumerate() {
            let key = (pos as u64).to_be_bytes();
            catalog.insert(&key[..], bincode::serialize(item)?);
            by_title.insert(fold_key(&item.title).as_bytes(), &key[..]);
        }

        (&self.catalog, &self.by_title)
            .transaction(|(tx_catalog, tx_by_title)| {
                tx_catalog.apply_batch(&catalog)?;
                tx_by_title.apply_batch(&by_title)?;
                Ok::<_, ConflictableTransactionError<()>>(())
            })
            .map_err(|e| anyhow::anyhow!("catalog replace failed: {e:?}"))?;
        self.db.flush()?;
        tracing::info!(items = items.len(), "catalog store replaced");
        Ok(())
    }

    pub fn item(&self, title: &str) -> Result<Option<CatalogItem>> {
        let Some(key) = self.by_title.get(fold_key(title).as_bytes())? else {
            return Ok(None);
        };
        match self.catalog.get(key)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Catalog spelling of `title`, if the catalog knows it.
    pub fn canonical_title(&self, title: &str) -> Result<Option<String>> {
        Ok(self.item(title)?.map(|item| item.title))
    }
}

impl CatalogStore for SledStore {
    fn items(&self) -> Result<Vec<CatalogItem>> {
        let mut items = Vec::new();
        for entry in self.catalog.iter() {
            let (_, bytes) = entry?;
            items.push(bincode::deserialize(&bytes)?);
        }
        Ok(items)
    }

    fn details(&self, title: &str) -> Result<Option<ItemDetails>> {
        Ok(self.item(title)?.map(|item| ItemDetails {
            description: item
                .synopsis
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            image_ref: item.image_ref,
        }))
    }
}

impl LikesStore for SledStore {
    fn add(&self, title: &str) -> Result<bool> {
        let swapped = self
            .likes
            .compare_and_swap(fold_key(title).as_bytes(), None::<&[u8]>, Some(title.as_bytes()))?;
        self.likes.flush()?;
        Ok(swapped.is_ok())
    }

    fn remove(&self, title: &str) -> Result<()> {
        self.likes.remove(fold_key(title).as_bytes())?;
        self.likes.flush()?;
        Ok(())
    }

    fn list_all(&self) -> Result<BTreeSet<String>> {
        let mut titles = BTreeSet::new();
        for entry in self.likes.iter() {
            let (_, value) = entry?;
            titles.insert(String::from_utf8(value.to_vec())?);
        }
        Ok(titles)
    }
}

/// Likes kept in memory, keyed by folded title.
#[derive(Default)]
pub struct MemoryLikesStore {
    likes: RwLock<BTreeMap<String, String>>,
}

impl MemoryLikesStore {
    pub fn new() -> Self { Self::default() }
}

impl LikesStore for MemoryLikesStore {
    fn add(&self, title: &str) -> Result<bool> {
        let mut likes = self.likes.write();
        let key = fold_key(title);
        if likes.contains_key(&key) {
            return Ok(false);
        }
        likes.insert(key, title.to_string());
        Ok(true)
    }

    fn remove(&self, title: &str) -> Result<()> {
        self.likes.write().remove(&fold_key(title));
        Ok(())
    }

    fn list_all(&self) -> Result<BTreeSet<String>> {
        Ok(self.likes.read().values().cloned().collect())
    }
}

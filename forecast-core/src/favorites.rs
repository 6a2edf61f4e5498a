use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tracing::info;

use crate::{
    Favorite, StoreError,
    persist::{read_optional, write_atomic},
};

pub const FAVORITES_FILE: &str = "favorites.json";

/// Durable, observable list of favorite cities keyed by city name.
///
/// Every mutation rewrites the whole file atomically while holding the write lock, then
/// publishes the new list to subscribers. A failed write leaves both untouched.
#[derive(Debug)]
pub struct FavoritesStore {
    path: PathBuf,
    write_lock: Mutex<()>,
    favorites: watch::Sender<Vec<Favorite>>,
}

impl FavoritesStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let favorites = match read_optional(&path)? {
            Some(contents) => serde_json::from_str::<Vec<Favorite>>(&contents).map_err(|e| {
                StoreError::Deserialize {
                    path: path.clone(),
                    message: e.to_string(),
                }
            })?,
            None => Vec::new(),
        };

        let (favorites, _) = watch::channel(favorites);

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
            favorites,
        })
    }

    pub fn in_dir(dir: &Path) -> Result<Self, StoreError> {
        Self::open(dir.join(FAVORITES_FILE))
    }

    /// Snapshot of the favorites in insertion order.
    pub fn list(&self) -> Vec<Favorite> {
        self.favorites.borrow().clone()
    }

    /// Live view: the receiver is notified after every successful mutation.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Favorite>> {
        self.favorites.subscribe()
    }

    pub fn find_by_city(&self, city: &str) -> Option<Favorite> {
        self.favorites
            .borrow()
            .iter()
            .find(|f| f.city == city)
            .cloned()
    }

    /// Upsert: an existing entry with the same city is replaced in place.
    pub fn insert(&self, favorite: Favorite) -> Result<(), StoreError> {
        let changed = self.mutate(|list| {
            match list.iter_mut().find(|f| f.city == favorite.city) {
                Some(existing) if *existing == favorite => return Ok(false),
                Some(existing) => *existing = favorite.clone(),
                None => list.push(favorite.clone()),
            }
            Ok(true)
        })?;
        if changed {
            info!(city = %favorite.city, country = %favorite.country, "favorite saved");
        }
        Ok(())
    }

    /// Replace the entry for `favorite.city`; fails with `NotFound` if there is none.
    pub fn update(&self, favorite: Favorite) -> Result<(), StoreError> {
        let changed = self.mutate(|list| {
            let existing = list
                .iter_mut()
                .find(|f| f.city == favorite.city)
                .ok_or_else(|| StoreError::NotFound(favorite.city.clone()))?;
            if *existing == favorite {
                return Ok(false);
            }
            *existing = favorite.clone();
            Ok(true)
        })?;
        if changed {
            info!(city = %favorite.city, "favorite updated");
        }
        Ok(())
    }

    /// Remove by city key; absent keys are ignored.
    pub fn delete(&self, favorite: &Favorite) -> Result<(), StoreError> {
        self.delete_city(&favorite.city)
    }

    pub fn delete_city(&self, city: &str) -> Result<(), StoreError> {
        let changed = self.mutate(|list| {
            let before = list.len();
            list.retain(|f| f.city != city);
            Ok(list.len() != before)
        })?;
        if changed {
            info!(city, "favorite removed");
        }
        Ok(())
    }

    pub fn delete_all(&self) -> Result<(), StoreError> {
        self.mutate(|list| {
            list.clear();
            // Rewrite even when already empty so a stale file never survives.
            Ok(true)
        })?;
        info!("all favorites removed");
        Ok(())
    }

    /// Apply `f` to a copy of the list; persist and publish only when it reports a change.
    fn mutate<F>(&self, f: F) -> Result<bool, StoreError>
    where
        F: FnOnce(&mut Vec<Favorite>) -> Result<bool, StoreError>,
    {
        let _guard = self.write_lock.lock();

        let mut next = self.favorites.borrow().clone();
        if !f(&mut next)? {
            return Ok(false);
        }

        let contents =
            serde_json::to_vec_pretty(&next).map_err(|e| StoreError::Serialize(e.to_string()))?;
        write_atomic(&self.path, &contents)?;

        self.favorites.send_replace(next);
        Ok(true)
    }
}

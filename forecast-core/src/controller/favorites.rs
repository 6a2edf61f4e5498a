use std::sync::Arc;
use tokio::sync::watch;

use crate::{Favorite, FavoritesStore, StoreError};

/// Live favorites list for the presentation layer; mutations go straight to the store.
#[derive(Debug, Clone)]
pub struct FavoritesController {
    store: Arc<FavoritesStore>,
}

impl FavoritesController {
    pub fn new(store: Arc<FavoritesStore>) -> Self {
        Self { store }
    }

    /// Receiver that observes every insert, update and delete.
    pub fn favorites(&self) -> watch::Receiver<Vec<Favorite>> {
        self.store.subscribe()
    }

    pub fn list(&self) -> Vec<Favorite> {
        self.store.list()
    }

    pub fn is_favorite(&self, city: &str) -> bool {
        self.store.find_by_city(city).is_some()
    }

    pub fn find(&self, city: &str) -> Option<Favorite> {
        self.store.find_by_city(city)
    }

    pub fn save(&self, favorite: Favorite) -> Result<(), StoreError> {
        self.store.insert(favorite)
    }

    pub fn update(&self, favorite: Favorite) -> Result<(), StoreError> {
        self.store.update(favorite)
    }

    pub fn remove(&self, city: &str) -> Result<(), StoreError> {
        self.store.delete_city(city)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.delete_all()
    }

    /// Save `favorite` unless its city is already saved, in which case remove it.
    /// Returns whether the city is a favorite afterwards.
    pub fn toggle(&self, favorite: Favorite) -> Result<bool, StoreError> {
        if self.is_favorite(&favorite.city) {
            self.store.delete(&favorite)?;
            Ok(false)
        } else {
            self.store.insert(favorite)?;
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> (tempfile::TempDir, FavoritesController) {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = Arc::new(FavoritesStore::in_dir(dir.path()).unwrap());
        (dir, FavoritesController::new(store))
    }

    #[test]
    fn toggle_adds_then_removes() {
        let (_dir, controller) = controller();
        let fav = Favorite::new("Seattle", "US");

        assert!(controller.toggle(fav.clone()).unwrap());
        assert!(controller.is_favorite("Seattle"));

        assert!(!controller.toggle(fav).unwrap());
        assert!(!controller.is_favorite("Seattle"));
    }

    #[tokio::test]
    async fn observers_see_mutations_without_refetching() {
        let (_dir, controller) = controller();
        let mut rx = controller.favorites();

        controller.save(Favorite::new("Lisbon", "PT")).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), vec![Favorite::new("Lisbon", "PT")]);

        controller.update(Favorite::new("Lisbon", "PRT")).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update()[0].country, "PRT");

        controller.remove("Lisbon").unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_empty());
    }

    #[test]
    fn clear_removes_everything() {
        let (_dir, controller) = controller();
        controller.save(Favorite::new("A", "X")).unwrap();
        controller.save(Favorite::new("B", "Y")).unwrap();

        controller.clear().unwrap();

        assert!(controller.list().is_empty());
        assert_eq!(controller.find("A"), None);
    }
}

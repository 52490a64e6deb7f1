//! [`Tracker`]: one collection session bound to one storage backend.
//!
//! The tracker owns the in-memory [`Collection`] and the [`CollectionStore`]
//! it is saved to. Edits go through [`Tracker::collection_mut`]; nothing
//! reaches storage until [`Tracker::save_all`].

use poptrack_core::Collection;

use crate::error::StorageError;
use crate::sync;
use crate::traits::CollectionStore;
use crate::types::SaveReport;

pub struct Tracker<S: CollectionStore> {
    collection: Collection,
    store: S,
}

impl<S: CollectionStore> Tracker<S> {
    /// Starts a session with an empty collection, ignoring what `store` holds.
    pub fn new(store: S) -> Self {
        Tracker {
            collection: Collection::new(),
            store,
        }
    }

    /// Starts a session with everything currently in `store` loaded.
    pub fn open(store: S) -> Result<Self, StorageError> {
        let collection = sync::load_all(&store)?;
        Ok(Tracker { collection, store })
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn collection_mut(&mut self) -> &mut Collection {
        &mut self.collection
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Writes pending edits to storage. See [`sync::save_all`].
    pub fn save_all(&mut self) -> Result<SaveReport, StorageError> {
        sync::save_all(&mut self.store, &mut self.collection)
    }

    /// Replaces the collection with a fresh load from storage.
    ///
    /// Unsaved edits, including the pending change log, are discarded. On
    /// error the current collection is left untouched.
    pub fn reload_all(&mut self) -> Result<(), StorageError> {
        self.collection = sync::load_all(&self.store)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use poptrack_core::{Figure, Set};

    #[test]
    fn reload_discards_unsaved_edits() {
        let mut tracker = Tracker::new(InMemoryStore::new());
        let key = tracker
            .collection_mut()
            .add_set(Set::new("Brand", "Series Name", 0.0));
        tracker
            .collection_mut()
            .add_figure_to_set(&key, Figure::new("name", 0.5, true, false))
            .unwrap();
        tracker.save_all().unwrap();

        tracker.collection_mut().delete_set("Brand", "Series Name").unwrap();
        tracker.reload_all().unwrap();

        let set = tracker.collection().get_set("Brand", "Series Name").unwrap();
        assert_eq!(set.find_figure("name").map(Figure::name), Some("name"));
        assert!(tracker.collection().changes().is_empty());
    }

    #[test]
    fn open_loads_existing_rows() {
        let mut store = InMemoryStore::new();
        store.insert_set("A", "B", 3.0).unwrap();
        let tracker = Tracker::open(store).unwrap();
        assert_eq!(tracker.collection().len(), 1);
        assert!(tracker.store().set_exists("a", "b").unwrap());
    }
}

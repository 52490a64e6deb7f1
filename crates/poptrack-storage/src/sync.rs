//! Reconciliation between an in-memory [`Collection`] and a [`CollectionStore`].
//!
//! [`load_all`] rebuilds a collection from storage. [`save_all`] writes only
//! what storage is missing and then drains the collection's change log.
//!
//! # Save order
//!
//! 1. Replaced entities: a pending set delete whose key, or any of whose
//!    figure names, is in the collection again is applied first and dropped
//!    from the log. The same goes for a pending figure delete whose name is
//!    back. Re-added or moved entities are then inserted fresh instead of
//!    colliding with the old rows or being deleted afterwards.
//! 2. Sets: unknown sets are inserted with all their figures. Known sets get
//!    a price update if it changed, plus every figure storage does not have.
//!    A figure name stored under a different set is a
//!    [`StorageError::DuplicateFigure`].
//! 3. Marked figures, then deleted sets, then deleted figures. Each list is
//!    cleared once its flush succeeds.
//!
//! Pending marks and deletes aimed at rows that were never written (added
//! and removed again before any save) are skipped, not treated as errors.
//! Any other storage failure aborts the call; rows written before the
//! failure stay written.

use poptrack_core::{Collection, Set};

use crate::error::StorageError;
use crate::traits::CollectionStore;
use crate::types::SaveReport;

/// Rebuilds a collection from every set and figure in `store`.
///
/// An empty store, or a set with no figures, yields empty results rather
/// than an error.
pub fn load_all<S: CollectionStore + ?Sized>(store: &S) -> Result<Collection, StorageError> {
    let records = or_empty(store.list_all_sets())?;
    let mut sets = Vec::with_capacity(records.len());

    for record in &records {
        let mut set = record.to_set();
        let figures = or_empty(store.list_figures_for_set(&record.brand, &record.series_name))?;
        for figure in figures {
            set.add_figure(figure)
                .map_err(|e| StorageError::Integrity {
                    reason: e.to_string(),
                })?;
        }
        sets.push(set);
    }

    tracing::info!(sets = sets.len(), "loaded collection from storage");
    Ok(Collection::from_sets(sets))
}

/// Writes `collection` to `store` and drains its change log.
///
/// Calling this twice without intervening edits writes nothing the second
/// time.
pub fn save_all<S: CollectionStore + ?Sized>(
    store: &mut S,
    collection: &mut Collection,
) -> Result<SaveReport, StorageError> {
    let mut report = SaveReport::default();

    retire_replaced(store, collection, &mut report)?;

    for set in collection.sets() {
        save_set(store, set, &mut report)?;
    }

    flush_marked_figures(store, collection, &mut report)?;
    flush_deleted_sets(store, collection, &mut report)?;
    flush_deleted_figures(store, collection, &mut report)?;

    tracing::info!(
        sets_inserted = report.sets_inserted,
        figures_inserted = report.figures_inserted,
        prices_updated = report.prices_updated,
        marks_flushed = report.marks_flushed,
        sets_deleted = report.sets_deleted,
        figures_deleted = report.figures_deleted,
        skipped = report.skipped,
        "saved collection"
    );
    Ok(report)
}

/// Treats "nothing to list" as an empty listing.
fn or_empty<T>(result: Result<Vec<T>, StorageError>) -> Result<Vec<T>, StorageError> {
    match result {
        Err(e) if e.is_empty_result() => Ok(Vec::new()),
        other => other,
    }
}

fn retire_replaced<S: CollectionStore + ?Sized>(
    store: &mut S,
    collection: &mut Collection,
    report: &mut SaveReport,
) -> Result<(), StorageError> {
    let replaced_sets: Vec<Set> = collection
        .changes()
        .deleted_sets()
        .iter()
        .filter(|set| {
            collection.contains_key(&set.key())
                || set
                    .figures()
                    .iter()
                    .any(|figure| collection.contains_figure(figure.name()))
        })
        .cloned()
        .collect();
    for set in &replaced_sets {
        if store.set_exists(set.brand(), set.series_name())? {
            tracing::debug!(brand = set.brand(), series = set.series_name(), "retiring replaced set");
            store.delete_set(set.brand(), set.series_name())?;
            report.sets_deleted += 1;
        }
        collection.changes_mut().forget_deleted_set(&set.key());
    }

    let replaced_figures: Vec<String> = collection
        .changes()
        .deleted_figures()
        .iter()
        .filter(|name| collection.contains_figure(name))
        .cloned()
        .collect();
    for name in &replaced_figures {
        if store.figure_exists(name)? {
            tracing::debug!(figure = %name, "retiring replaced figure");
            store.delete_figure(name)?;
            report.figures_deleted += 1;
        }
        collection.changes_mut().forget_deleted_figure(name);
    }

    Ok(())
}

fn save_set<S: CollectionStore + ?Sized>(
    store: &mut S,
    set: &Set,
    report: &mut SaveReport,
) -> Result<(), StorageError> {
    let brand = set.brand();
    let series = set.series_name();

    match store.try_get_set(brand, series)? {
        None => {
            tracing::debug!(brand, series, figures = set.figure_count(), "inserting new set");
            store.insert_set(brand, series, set.price())?;
            report.sets_inserted += 1;
            for figure in set.figures() {
                store.insert_figure(brand, series, figure)?;
                report.figures_inserted += 1;
            }
        }
        Some(record) => {
            if record.price != set.price() {
                store.update_set_price(brand, series, set.price())?;
                report.prices_updated += 1;
            }
            for figure in set.figures() {
                match store.try_get_figure(figure.name())? {
                    Some(stored) if stored.belongs_to(brand, series) => continue,
                    Some(stored) => {
                        tracing::debug!(
                            figure = figure.name(),
                            owner_brand = %stored.brand,
                            owner_series = %stored.series_name,
                            "figure name already stored under another set"
                        );
                        return Err(StorageError::DuplicateFigure {
                            name: figure.name().to_string(),
                        });
                    }
                    None => {}
                }
                tracing::debug!(brand, series, figure = figure.name(), "inserting new figure");
                store.insert_figure(brand, series, figure)?;
                report.figures_inserted += 1;
            }
        }
    }
    Ok(())
}

fn flush_marked_figures<S: CollectionStore + ?Sized>(
    store: &mut S,
    collection: &mut Collection,
    report: &mut SaveReport,
) -> Result<(), StorageError> {
    for name in collection.changes().marked_figures() {
        if store.figure_exists(name)? {
            store.mark_figure_collected(name)?;
            report.marks_flushed += 1;
        } else {
            tracing::debug!(figure = %name, "skipping mark for figure not in storage");
            report.skipped += 1;
        }
    }
    collection.changes_mut().clear_marked_figures();
    Ok(())
}

fn flush_deleted_sets<S: CollectionStore + ?Sized>(
    store: &mut S,
    collection: &mut Collection,
    report: &mut SaveReport,
) -> Result<(), StorageError> {
    for set in collection.changes().deleted_sets() {
        if store.set_exists(set.brand(), set.series_name())? {
            store.delete_set(set.brand(), set.series_name())?;
            report.sets_deleted += 1;
        } else {
            tracing::debug!(
                brand = set.brand(),
                series = set.series_name(),
                "skipping delete for set never saved"
            );
            report.skipped += 1;
        }
    }
    collection.changes_mut().clear_deleted_sets();
    Ok(())
}

fn flush_deleted_figures<S: CollectionStore + ?Sized>(
    store: &mut S,
    collection: &mut Collection,
    report: &mut SaveReport,
) -> Result<(), StorageError> {
    for name in collection.changes().deleted_figures() {
        if store.figure_exists(name)? {
            store.delete_figure(name)?;
            report.figures_deleted += 1;
        } else {
            tracing::debug!(figure = %name, "skipping delete for figure never saved");
            report.skipped += 1;
        }
    }
    collection.changes_mut().clear_deleted_figures();
    Ok(())
}

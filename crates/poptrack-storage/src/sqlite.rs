//! SQLite implementation of [`CollectionStore`].
//!
//! [`SqliteStore`] persists sets and figures in two tables with WAL mode,
//! a transaction around every write, and automatic schema migrations.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension, Row};

use poptrack_core::Figure;

use crate::error::StorageError;
use crate::traits::CollectionStore;
use crate::types::{FigureRecord, SetRecord};

/// SQLite-backed implementation of [`CollectionStore`].
///
/// Every write operation is wrapped in a transaction. Foreign keys cascade
/// figure rows when their set row is deleted.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path.as_ref())?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn set_not_found(brand: &str, series: &str) -> StorageError {
        StorageError::SetNotFound {
            brand: brand.to_string(),
            series: series.to_string(),
        }
    }

    fn figure_not_found(name: &str) -> StorageError {
        StorageError::FigureNotFound {
            name: name.to_string(),
        }
    }

    /// Reads `(probability, is_collected, is_secret)` columns starting at
    /// `offset` into a [`Figure`].
    fn row_to_figure(row: &Row<'_>, name: String, offset: usize) -> rusqlite::Result<Figure> {
        let probability: f64 = row.get(offset)?;
        let is_collected: i64 = row.get(offset + 1)?;
        let is_secret: i64 = row.get(offset + 2)?;
        Ok(Figure::new(name, probability, is_collected != 0, is_secret != 0))
    }
}

impl CollectionStore for SqliteStore {
    // -------------------------------------------------------------------
    // Existence queries
    // -------------------------------------------------------------------

    fn set_exists(&self, brand: &str, series: &str) -> Result<bool, StorageError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sets WHERE brand = ?1 AND series_name = ?2)",
            params![brand, series],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn figure_exists(&self, name: &str) -> Result<bool, StorageError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM figures WHERE figure_name = ?1)",
            params![name],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    // -------------------------------------------------------------------
    // Set rows
    // -------------------------------------------------------------------

    fn insert_set(&mut self, brand: &str, series: &str, price: f64) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        let exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM sets WHERE brand = ?1 AND series_name = ?2)",
            params![brand, series],
            |row| row.get(0),
        )?;
        if exists {
            return Err(StorageError::DuplicateSet {
                brand: brand.to_string(),
                series: series.to_string(),
            });
        }
        tx.execute(
            "INSERT INTO sets (brand, series_name, price) VALUES (?1, ?2, ?3)",
            params![brand, series, price],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn get_set(&self, brand: &str, series: &str) -> Result<SetRecord, StorageError> {
        let row = self
            .conn
            .query_row(
                "SELECT brand, series_name, price FROM sets WHERE brand = ?1 AND series_name = ?2",
                params![brand, series],
                |row| {
                    Ok(SetRecord {
                        brand: row.get(0)?,
                        series_name: row.get(1)?,
                        price: row.get(2)?,
                    })
                },
            )
            .optional()?;

        row.ok_or_else(|| Self::set_not_found(brand, series))
    }

    fn update_set_price(
        &mut self,
        brand: &str,
        series: &str,
        price: f64,
    ) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        let rows = tx.execute(
            "UPDATE sets SET price = ?3 WHERE brand = ?1 AND series_name = ?2",
            params![brand, series, price],
        )?;
        tx.commit()?;
        if rows == 0 {
            return Err(Self::set_not_found(brand, series));
        }
        Ok(())
    }

    fn delete_set(&mut self, brand: &str, series: &str) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        // Child rows first. CASCADE covers this too when foreign_keys is on.
        tx.execute(
            "DELETE FROM figures WHERE brand = ?1 AND series_name = ?2",
            params![brand, series],
        )?;
        let rows = tx.execute(
            "DELETE FROM sets WHERE brand = ?1 AND series_name = ?2",
            params![brand, series],
        )?;
        if rows == 0 {
            // Dropping the transaction rolls back the figure delete.
            return Err(Self::set_not_found(brand, series));
        }
        tx.commit()?;
        Ok(())
    }

    // -------------------------------------------------------------------
    // Figure rows
    // -------------------------------------------------------------------

    fn insert_figure(
        &mut self,
        brand: &str,
        series: &str,
        figure: &Figure,
    ) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        let set_exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM sets WHERE brand = ?1 AND series_name = ?2)",
            params![brand, series],
            |row| row.get(0),
        )?;
        if !set_exists {
            return Err(Self::set_not_found(brand, series));
        }
        let figure_exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM figures WHERE figure_name = ?1)",
            params![figure.name()],
            |row| row.get(0),
        )?;
        if figure_exists {
            return Err(StorageError::DuplicateFigure {
                name: figure.name().to_string(),
            });
        }
        tx.execute(
            "INSERT INTO figures (figure_name, probability, is_collected, is_secret, brand, series_name) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                figure.name(),
                figure.probability(),
                figure.is_collected() as i64,
                figure.is_secret() as i64,
                brand,
                series,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn get_figure(&self, name: &str) -> Result<FigureRecord, StorageError> {
        let row = self
            .conn
            .query_row(
                "SELECT brand, series_name, probability, is_collected, is_secret FROM figures WHERE figure_name = ?1",
                params![name],
                |row| {
                    Ok(FigureRecord {
                        brand: row.get(0)?,
                        series_name: row.get(1)?,
                        figure: Self::row_to_figure(row, name.to_string(), 2)?,
                    })
                },
            )
            .optional()?;

        row.ok_or_else(|| Self::figure_not_found(name))
    }

    fn delete_figure(&mut self, name: &str) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        let rows = tx.execute("DELETE FROM figures WHERE figure_name = ?1", params![name])?;
        tx.commit()?;
        if rows == 0 {
            return Err(Self::figure_not_found(name));
        }
        Ok(())
    }

    fn mark_figure_collected(&mut self, name: &str) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        let rows = tx.execute(
            "UPDATE figures SET is_collected = 1 WHERE figure_name = ?1",
            params![name],
        )?;
        tx.commit()?;
        if rows == 0 {
            return Err(Self::figure_not_found(name));
        }
        Ok(())
    }

    // -------------------------------------------------------------------
    // Listings
    // -------------------------------------------------------------------

    fn list_all_sets(&self) -> Result<Vec<SetRecord>, StorageError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT brand, series_name, price FROM sets ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok(SetRecord {
                brand: row.get(0)?,
                series_name: row.get(1)?,
                price: row.get(2)?,
            })
        })?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        if result.is_empty() {
            return Err(StorageError::EmptyStore);
        }
        Ok(result)
    }

    fn list_figures_for_set(
        &self,
        brand: &str,
        series: &str,
    ) -> Result<Vec<Figure>, StorageError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT figure_name, probability, is_collected, is_secret FROM figures WHERE brand = ?1 AND series_name = ?2 ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![brand, series], |row| {
            let name: String = row.get(0)?;
            Self::row_to_figure(row, name, 1)
        })?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        if result.is_empty() {
            return Err(StorageError::NoFigures {
                brand: brand.to_string(),
                series: series.to_string(),
            });
        }
        Ok(result)
    }
}

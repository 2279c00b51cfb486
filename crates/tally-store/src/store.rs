use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;
use uuid::Uuid;

use tally_model::{BudgetDocument, CostRecord, DocumentId};

use crate::schema;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document not found: {0}")]
    DocumentNotFound(DocumentId),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Listing entry for a stored document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMeta {
    pub id: DocumentId,
    pub name: String,
}

/// SQLite-backed document store.
#[derive(Debug, Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        schema::init(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.busy_timeout(Duration::from_secs(5))?;
        schema::init(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Persist a document and refresh its indexed leaf costs.
    ///
    /// The document must already be recalculated (derived fields populated);
    /// the store indexes leaf unit costs as-is without recomputing anything.
    /// Saving an existing id overwrites the previous payload and its cost
    /// records.
    pub fn save_document(&self, doc: &BudgetDocument) -> Result<()> {
        let payload = serde_json::to_string(doc)?;

        let mut conn = self.conn.lock().expect("store mutex poisoned");
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO documents (id, name, payload) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
               name = excluded.name,
               payload = excluded.payload,
               modified_at = CURRENT_TIMESTAMP",
            params![doc.id.to_string(), &doc.name, payload],
        )?;

        tx.execute(
            "DELETE FROM cost_records WHERE document_id = ?1",
            params![doc.id.to_string()],
        )?;

        // A line is a leaf when no other line claims it as parent.
        // Self-references don't count: such a line is its own (broken)
        // parent and still prices like a leaf.
        let parents: HashSet<&str> = doc
            .lines
            .iter()
            .filter_map(|l| l.parent_id.as_deref().filter(|pid| *pid != l.id))
            .collect();

        for line in &doc.lines {
            if parents.contains(line.id.as_str()) {
                continue;
            }
            tx.execute(
                "INSERT INTO cost_records
                   (document_id, line_id, description, category, unit,
                    unit_cost, currency, year, donor, sector)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    doc.id.to_string(),
                    &line.id,
                    &line.description,
                    &line.category,
                    &line.unit,
                    line.unit_cost,
                    &doc.metadata.base_currency,
                    doc.metadata.year,
                    &doc.metadata.donor,
                    &doc.metadata.sector,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Load a document by id.
    pub fn load_document(&self, id: DocumentId) -> Result<BudgetDocument> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM documents WHERE id = ?1",
                params![id.to_string()],
                |r| r.get(0),
            )
            .optional()?;

        let payload = payload.ok_or(StoreError::DocumentNotFound(id))?;
        Ok(serde_json::from_str(&payload)?)
    }

    /// List stored documents, most recently modified first.
    pub fn list_documents(&self) -> Result<Vec<DocumentMeta>> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        let mut stmt =
            conn.prepare("SELECT id, name FROM documents ORDER BY modified_at DESC, id")?;
        let rows = stmt.query_map([], |r| {
            let id: String = r.get(0)?;
            let name: String = r.get(1)?;
            Ok((id, name))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (id, name) = row?;
            let id = Uuid::parse_str(&id).map_err(|_| rusqlite::Error::InvalidQuery)?;
            out.push(DocumentMeta { id, name });
        }
        Ok(out)
    }

    /// Delete a document and its indexed costs. Returns `false` when no
    /// document with the given id exists.
    pub fn delete_document(&self, id: DocumentId) -> Result<bool> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        // ON DELETE CASCADE clears the document's cost_records rows.
        let deleted = conn.execute(
            "DELETE FROM documents WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(deleted > 0)
    }

    /// Search indexed leaf costs by description or category substring.
    ///
    /// Plain LIKE containment, newest budget years first; result ranking
    /// beyond that is the caller's business.
    pub fn search_costs(&self, query: &str) -> Result<Vec<CostRecord>> {
        let pattern = format!("%{}%", query.trim());

        let conn = self.conn.lock().expect("store mutex poisoned");
        let mut stmt = conn.prepare(
            "SELECT description, category, unit, unit_cost, currency, year, donor, sector
             FROM cost_records
             WHERE description LIKE ?1 OR category LIKE ?1
             ORDER BY year IS NULL, year DESC, description",
        )?;
        let rows = stmt.query_map(params![pattern], |r| {
            Ok(CostRecord {
                description: r.get(0)?,
                category: r.get(1)?,
                unit: r.get(2)?,
                unit_cost: r.get(3)?,
                currency: r.get(4)?,
                year: r.get(5)?,
                donor: r.get(6)?,
                sector: r.get(7)?,
            })
        })?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(StoreError::from)
    }
}

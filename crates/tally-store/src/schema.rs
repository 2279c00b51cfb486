use rusqlite::Connection;

pub(crate) fn init(conn: &Connection) -> rusqlite::Result<()> {
    // Ensure foreign keys are enforced (disabled by default in SQLite).
    conn.pragma_update(None, "foreign_keys", "ON")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
          id TEXT PRIMARY KEY,
          name TEXT NOT NULL,
          created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
          modified_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
          payload JSON NOT NULL
        );

        -- Leaf costs harvested at save time; the lookup surface reads from
        -- here without ever touching document payloads.
        CREATE TABLE IF NOT EXISTS cost_records (
          document_id TEXT REFERENCES documents(id) ON DELETE CASCADE,
          line_id TEXT,
          description TEXT,
          category TEXT,
          unit TEXT,
          unit_cost REAL,
          currency TEXT,
          year INTEGER,
          donor TEXT,
          sector TEXT,
          PRIMARY KEY (document_id, line_id)
        );

        CREATE INDEX IF NOT EXISTS idx_cost_records_description
          ON cost_records(description);
        CREATE INDEX IF NOT EXISTS idx_cost_records_category
          ON cost_records(category);
        "#,
    )
}

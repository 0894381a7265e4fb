use rusqlite::Connection;

use crate::Result;

// Schema version (increment when changing table definitions)
pub const SCHEMA_VERSION: i32 = 3;

// NOTE: Storage layout
//
// Catalog tables (models, model_fields, model_buttons, views,
// view_tree_optionals) mirror what the host framework owns. They are only
// written by catalog import and read by everything else.
//
// Lines are split into one table per concrete kind. Both draw their ids from
// `line_ids`, so the `lines` view can union them without id collisions and
// ordering by id follows insertion across kinds.
//
// The unique index on customizations folds NULL view/user to 0 so that
// "no base view" and "every user" take part in the uniqueness check.

pub fn init_schema(conn: &Connection) -> Result<()> {
    let current_version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if current_version != SCHEMA_VERSION {
        drop_all_tables(conn)?;
    }

    conn.execute_batch(
        r#"
        PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS models (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            description TEXT
        );

        CREATE TABLE IF NOT EXISTS model_fields (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            model_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            kind TEXT NOT NULL,
            relation TEXT,
            description TEXT,
            UNIQUE (model_id, name),
            FOREIGN KEY (model_id) REFERENCES models(id)
        );

        CREATE TABLE IF NOT EXISTS model_buttons (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            model_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            UNIQUE (model_id, name),
            FOREIGN KEY (model_id) REFERENCES models(id)
        );

        CREATE TABLE IF NOT EXISTS views (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            model_id INTEGER NOT NULL,
            view_type TEXT NOT NULL,
            name TEXT NOT NULL,
            priority INTEGER NOT NULL DEFAULT 16,
            arch TEXT NOT NULL,
            UNIQUE (model_id, name),
            FOREIGN KEY (model_id) REFERENCES models(id)
        );

        CREATE TABLE IF NOT EXISTS view_tree_optionals (
            view_id INTEGER NOT NULL,
            user_id INTEGER NOT NULL,
            field TEXT NOT NULL,
            value BOOLEAN NOT NULL,
            PRIMARY KEY (view_id, user_id, field),
            FOREIGN KEY (view_id) REFERENCES views(id)
        );

        CREATE TABLE IF NOT EXISTS customizations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            model_id INTEGER NOT NULL,
            view_id INTEGER,
            user_id INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (model_id) REFERENCES models(id),
            FOREIGN KEY (view_id) REFERENCES views(id)
        );

        CREATE TABLE IF NOT EXISTS line_ids (
            id INTEGER PRIMARY KEY AUTOINCREMENT
        );

        CREATE TABLE IF NOT EXISTS field_lines (
            id INTEGER PRIMARY KEY,
            customization_id INTEGER NOT NULL,
            field_id INTEGER NOT NULL,
            sequence INTEGER,
            expand INTEGER,
            optional TEXT,
            searchable BOOLEAN NOT NULL DEFAULT 0,
            "sum" BOOLEAN NOT NULL DEFAULT 0,
            FOREIGN KEY (id) REFERENCES line_ids(id),
            FOREIGN KEY (customization_id) REFERENCES customizations(id),
            FOREIGN KEY (field_id) REFERENCES model_fields(id)
        );

        CREATE TABLE IF NOT EXISTS button_lines (
            id INTEGER PRIMARY KEY,
            customization_id INTEGER NOT NULL,
            button_id INTEGER NOT NULL,
            sequence INTEGER,
            expand INTEGER,
            optional TEXT,
            searchable BOOLEAN NOT NULL DEFAULT 0,
            FOREIGN KEY (id) REFERENCES line_ids(id),
            FOREIGN KEY (customization_id) REFERENCES customizations(id),
            FOREIGN KEY (button_id) REFERENCES model_buttons(id)
        );

        CREATE VIEW IF NOT EXISTS lines AS
            SELECT id, customization_id, 'ir.model.field' AS kind, field_id, NULL AS button_id,
                   sequence, expand, optional, searchable, "sum"
            FROM field_lines
            UNION ALL
            SELECT id, customization_id, 'ir.model.button' AS kind, NULL AS field_id, button_id,
                   sequence, expand, optional, searchable, 0 AS "sum"
            FROM button_lines;

        CREATE TABLE IF NOT EXISTS snapshots (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            customization_id INTEGER NOT NULL,
            field_id INTEGER,
            button_id INTEGER,
            CHECK ((field_id IS NULL) <> (button_id IS NULL)),
            FOREIGN KEY (customization_id) REFERENCES customizations(id),
            FOREIGN KEY (field_id) REFERENCES model_fields(id),
            FOREIGN KEY (button_id) REFERENCES model_buttons(id)
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_customizations_key
            ON customizations(model_id, IFNULL(view_id, 0), IFNULL(user_id, 0));
        CREATE INDEX IF NOT EXISTS idx_fields_model ON model_fields(model_id);
        CREATE INDEX IF NOT EXISTS idx_buttons_model ON model_buttons(model_id);
        CREATE INDEX IF NOT EXISTS idx_views_model ON views(model_id, view_type, priority);
        CREATE INDEX IF NOT EXISTS idx_field_lines_customization ON field_lines(customization_id);
        CREATE INDEX IF NOT EXISTS idx_button_lines_customization ON button_lines(customization_id);
        CREATE INDEX IF NOT EXISTS idx_snapshots_customization ON snapshots(customization_id);
        "#,
    )?;

    conn.execute(&format!("PRAGMA user_version = {}", SCHEMA_VERSION), [])?;

    Ok(())
}

fn drop_all_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DROP VIEW IF EXISTS lines;
        DROP TABLE IF EXISTS snapshots;
        DROP TABLE IF EXISTS button_lines;
        DROP TABLE IF EXISTS field_lines;
        DROP TABLE IF EXISTS line_ids;
        DROP TABLE IF EXISTS customizations;
        DROP TABLE IF EXISTS view_tree_optionals;
        DROP TABLE IF EXISTS views;
        DROP TABLE IF EXISTS model_buttons;
        DROP TABLE IF EXISTS model_fields;
        DROP TABLE IF EXISTS models;
        "#,
    )?;
    Ok(())
}

pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS projects (
    id              TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    approved_amount TEXT NOT NULL DEFAULT '0',
    created_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS budget_items (
    id          TEXT NOT NULL,
    project_id  TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    position    INTEGER NOT NULL,
    category    TEXT NOT NULL DEFAULT 'personnel',
    name        TEXT NOT NULL DEFAULT '',
    quantity    TEXT NOT NULL DEFAULT '1',
    unit        TEXT NOT NULL DEFAULT '',
    unit_price  TEXT NOT NULL DEFAULT '0',
    total_price TEXT NOT NULL DEFAULT '0',
    description TEXT NOT NULL DEFAULT '',
    PRIMARY KEY (project_id, id)
);

CREATE INDEX IF NOT EXISTS idx_budget_items_project ON budget_items(project_id, position);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];

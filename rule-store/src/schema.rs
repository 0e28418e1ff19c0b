//! Table layout for `rules`/`rule_versions`, grounded in `original_source`'s
//! SQLAlchemy models (`models/rule.py`): the same two composite indexes,
//! the same columns, `group` renamed to `group_name` only because it is a
//! reserved word in SQL.

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS rules (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT NOT NULL UNIQUE,
    description     TEXT,
    group_name      TEXT,
    priority        INTEGER NOT NULL,
    enabled         INTEGER NOT NULL DEFAULT 1,
    condition_dsl   TEXT NOT NULL,
    action          TEXT NOT NULL,
    rule_metadata   TEXT NOT NULL DEFAULT '{}',
    current_version INTEGER NOT NULL DEFAULT 1,
    created_by      INTEGER,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS ix_rules_group_priority ON rules(group_name, priority);
CREATE INDEX IF NOT EXISTS ix_rules_enabled_group ON rules(enabled, group_name);

CREATE TABLE IF NOT EXISTS rule_versions (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    rule_id         INTEGER NOT NULL,
    version         INTEGER NOT NULL,
    name            TEXT NOT NULL,
    description     TEXT,
    group_name      TEXT,
    priority        INTEGER NOT NULL,
    enabled         INTEGER NOT NULL,
    condition_dsl   TEXT NOT NULL,
    action          TEXT NOT NULL,
    rule_metadata   TEXT NOT NULL,
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS ix_rule_versions_rule_id ON rule_versions(rule_id);
"#;

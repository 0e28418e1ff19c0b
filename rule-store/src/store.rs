//! Persistence for `rules`/`rule_versions` plus the rule lifecycle hook
//! (spec §4.8, §4.10), grounded in the teacher's `agent-core::event_log`
//! (`PRAGMA journal_mode=WAL`, one connection held for the store's
//! lifetime behind a single lock) and `original_source`'s
//! `rule_service.py` (transactional create/update/delete: mutate +
//! version row + commit, invalidation happens after).

use crate::error::StoreError;
use crate::mapping::{row_to_rule, row_to_version};
use crate::schema::SCHEMA;
use chrono::Utc;
use conditions::{self, Condition};
use parking_lot::Mutex;
use rule_model::{diff_versions, FieldDiff, Rule, RuleDraft, RuleLifecycleEvent, RuleVersion};
use rusqlite::{params, Connection};
use std::path::PathBuf;

/// One long-lived connection guarded by a single exclusive lock (spec §5:
/// one lock, short hold times). A fresh connection per call works for the
/// file-backed path but not for `open_in_memory` — an in-memory database
/// is destroyed the instant its last connection closes, so a
/// connect-per-call design would see an empty, schema-less database on
/// every call after the first. Holding one `Connection` for the store's
/// whole lifetime sidesteps that for both backends.
pub struct RuleStore {
    conn: Mutex<Connection>,
}

impl RuleStore {
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path.into())?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.execute_batch(SCHEMA)?;
        Ok(RuleStore {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(RuleStore {
            conn: Mutex::new(conn),
        })
    }

    pub fn create_rule(&self, draft: RuleDraft, created_by: Option<i64>) -> Result<(Rule, RuleLifecycleEvent), StoreError> {
        let name = draft.name.clone().ok_or(StoreError::MissingField("name"))?;
        let priority = draft.priority.ok_or(StoreError::MissingField("priority"))?;
        let condition_dsl = draft
            .condition_dsl
            .clone()
            .ok_or(StoreError::MissingField("condition_dsl"))?;
        let action = draft.action.clone().ok_or(StoreError::MissingField("action"))?;
        conditions::validate(&condition_dsl)?;
        let group = draft.group.clone().flatten();
        let description = draft.description.clone().flatten();
        let enabled = draft.enabled.unwrap_or(true);
        let rule_metadata = draft.rule_metadata.clone().unwrap_or_else(|| serde_json::json!({}));

        let now = Utc::now();
        let condition_json = serde_json::to_string(&condition_dsl).unwrap_or_default();
        let action_json = serde_json::to_string(&action).unwrap_or_default();
        let metadata_json = serde_json::to_string(&rule_metadata).unwrap_or_default();

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO rules (name, description, group_name, priority, enabled, condition_dsl, action, rule_metadata, current_version, created_by, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9, ?10, ?10)",
            params![
                name,
                description,
                group,
                priority,
                enabled as i64,
                condition_json,
                action_json,
                metadata_json,
                created_by,
                now.to_rfc3339(),
            ],
        ).map_err(|e| match e {
            rusqlite::Error::SqliteFailure(_, Some(ref msg)) if msg.contains("UNIQUE") => {
                StoreError::DuplicateName(name.clone())
            }
            other => StoreError::Sqlite(other),
        })?;
        let id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO rule_versions (rule_id, version, name, description, group_name, priority, enabled, condition_dsl, action, rule_metadata, created_at)
             VALUES (?1, 1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                id,
                name,
                description,
                group,
                priority,
                enabled as i64,
                condition_json,
                action_json,
                metadata_json,
                now.to_rfc3339(),
            ],
        )?;
        tx.commit()?;
        drop(conn);

        let rule = self.get_rule(id)?.ok_or(StoreError::RuleNotFound(id))?;
        let event = RuleLifecycleEvent::Created {
            rule_id: id,
            group: rule.group.clone(),
        };
        tracing::info!(rule_id = id, "rule created");
        Ok((rule, event))
    }

    pub fn update_rule(&self, id: i64, draft: RuleDraft) -> Result<(Rule, RuleLifecycleEvent), StoreError> {
        let mut rule = self.get_rule(id)?.ok_or(StoreError::RuleNotFound(id))?;
        let old_group = rule.group.clone();
        rule.apply_draft(draft);
        conditions::validate(&rule.condition_dsl)?;
        rule.current_version += 1;
        rule.updated_at = Utc::now();

        let condition_json = serde_json::to_string(&rule.condition_dsl).unwrap_or_default();
        let action_json = serde_json::to_string(&rule.action).unwrap_or_default();
        let metadata_json = serde_json::to_string(&rule.rule_metadata).unwrap_or_default();

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        tx.execute(
            "UPDATE rules SET name = ?1, description = ?2, group_name = ?3, priority = ?4, enabled = ?5,
             condition_dsl = ?6, action = ?7, rule_metadata = ?8, current_version = ?9, updated_at = ?10
             WHERE id = ?11",
            params![
                rule.name,
                rule.description,
                rule.group,
                rule.priority,
                rule.enabled as i64,
                condition_json,
                action_json,
                metadata_json,
                rule.current_version,
                rule.updated_at.to_rfc3339(),
                id,
            ],
        )?;
        tx.execute(
            "INSERT INTO rule_versions (rule_id, version, name, description, group_name, priority, enabled, condition_dsl, action, rule_metadata, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                id,
                rule.current_version,
                rule.name,
                rule.description,
                rule.group,
                rule.priority,
                rule.enabled as i64,
                condition_json,
                action_json,
                metadata_json,
                rule.updated_at.to_rfc3339(),
            ],
        )?;
        tx.commit()?;

        let event = RuleLifecycleEvent::Updated {
            rule_id: id,
            old_group,
            new_group: rule.group.clone(),
        };
        tracing::info!(rule_id = id, version = rule.current_version, "rule updated");
        Ok((rule, event))
    }

    pub fn delete_rule(&self, id: i64) -> Result<RuleLifecycleEvent, StoreError> {
        let rule = self.get_rule(id)?.ok_or(StoreError::RuleNotFound(id))?;
        let conn = self.conn.lock();
        conn.execute("DELETE FROM rule_versions WHERE rule_id = ?1", params![id])?;
        conn.execute("DELETE FROM rules WHERE id = ?1", params![id])?;
        tracing::info!(rule_id = id, "rule deleted");
        Ok(RuleLifecycleEvent::Deleted {
            rule_id: id,
            group: rule.group,
        })
    }

    pub fn get_rule(&self, id: i64) -> Result<Option<Rule>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT * FROM rules WHERE id = ?1")?;
        let mut rows = stmt.query(params![id])?;
        match rows.next()? {
            Some(row) => Ok(Some(row_to_rule(row)?)),
            None => Ok(None),
        }
    }

    pub fn list_rules(
        &self,
        skip: i64,
        limit: i64,
        group: Option<&str>,
        enabled: Option<bool>,
    ) -> Result<Vec<Rule>, StoreError> {
        let conn = self.conn.lock();
        let mut sql = String::from("SELECT * FROM rules WHERE 1 = 1");
        if group.is_some() {
            sql.push_str(" AND group_name = ?");
        }
        if enabled.is_some() {
            sql.push_str(" AND enabled = ?");
        }
        sql.push_str(" ORDER BY priority DESC LIMIT ? OFFSET ?");

        let mut stmt = conn.prepare(&sql)?;
        let mut params_dyn: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        if let Some(group) = group {
            params_dyn.push(Box::new(group.to_string()));
        }
        if let Some(enabled) = enabled {
            params_dyn.push(Box::new(enabled as i64));
        }
        params_dyn.push(Box::new(limit));
        params_dyn.push(Box::new(skip));

        let refs: Vec<&dyn rusqlite::ToSql> = params_dyn.iter().map(|p| p.as_ref()).collect();
        let rows = stmt.query_map(refs.as_slice(), row_to_rule)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }

    pub fn get_rule_versions(&self, rule_id: i64) -> Result<Vec<RuleVersion>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT * FROM rule_versions WHERE rule_id = ?1 ORDER BY version ASC",
        )?;
        let rows = stmt.query_map(params![rule_id], row_to_version)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }

    pub fn get_rule_version(&self, rule_id: i64, version: i32) -> Result<RuleVersion, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT * FROM rule_versions WHERE rule_id = ?1 AND version = ?2",
        )?;
        let mut rows = stmt.query(params![rule_id, version])?;
        match rows.next()? {
            Some(row) => Ok(row_to_version(row)?),
            None => Err(StoreError::VersionNotFound { rule_id, version }),
        }
    }

    pub fn get_version_diff(&self, rule_id: i64, from: i32, to: i32) -> Result<Vec<FieldDiff>, StoreError> {
        let from_version = self.get_rule_version(rule_id, from)?;
        let to_version = self.get_rule_version(rule_id, to)?;
        Ok(diff_versions(&from_version, &to_version))
    }

    /// All enabled rules, used by `rule-engine` to feed the cache loader
    /// and the RETE compiler. Mirrors `_load_rules_from_db`'s
    /// `enabled == True` filter and priority-descending order.
    pub fn load_enabled_rules(&self, group: Option<&str>) -> Result<Vec<Rule>, StoreError> {
        self.list_rules(0, i64::MAX, group, Some(true))
    }
}

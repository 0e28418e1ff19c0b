use crate::error::StoreError;
use chrono::{DateTime, Utc};
use rule_model::{Rule, RuleVersion};
use rusqlite::Row;

pub fn row_to_rule(row: &Row) -> rusqlite::Result<Rule> {
    let id: i64 = row.get("id")?;
    let condition_json: String = row.get("condition_dsl")?;
    let action_json: String = row.get("action")?;
    let metadata_json: String = row.get("rule_metadata")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(Rule {
        id,
        name: row.get("name")?,
        description: row.get("description")?,
        group: row.get("group_name")?,
        priority: row.get("priority")?,
        enabled: row.get::<_, i64>("enabled")? != 0,
        condition_dsl: parse_condition(id, &condition_json).map_err(to_sqlite_error)?,
        action: serde_json::from_str(&action_json).map_err(|e| to_sqlite_error(StoreError::MalformedCondition { rule_id: id, source: e }))?,
        rule_metadata: serde_json::from_str(&metadata_json).unwrap_or_default(),
        current_version: row.get("current_version")?,
        created_by: row.get("created_by")?,
        created_at: parse_timestamp(&created_at),
        updated_at: parse_timestamp(&updated_at),
    })
}

pub fn row_to_version(row: &Row) -> rusqlite::Result<RuleVersion> {
    let rule_id: i64 = row.get("rule_id")?;
    let condition_json: String = row.get("condition_dsl")?;
    let action_json: String = row.get("action")?;
    let metadata_json: String = row.get("rule_metadata")?;
    let created_at: String = row.get("created_at")?;

    Ok(RuleVersion {
        id: row.get("id")?,
        rule_id,
        version: row.get("version")?,
        name: row.get("name")?,
        description: row.get("description")?,
        group: row.get("group_name")?,
        priority: row.get("priority")?,
        enabled: row.get::<_, i64>("enabled")? != 0,
        condition_dsl: parse_condition(rule_id, &condition_json).map_err(to_sqlite_error)?,
        action: serde_json::from_str(&action_json).unwrap_or_default(),
        rule_metadata: serde_json::from_str(&metadata_json).unwrap_or_default(),
        created_at: parse_timestamp(&created_at),
    })
}

fn parse_condition(rule_id: i64, json: &str) -> Result<conditions::Condition, StoreError> {
    serde_json::from_str(json).map_err(|source| StoreError::MalformedCondition { rule_id, source })
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn to_sqlite_error(err: StoreError) -> rusqlite::Error {
    rusqlite::Error::ToSqlConversionFailure(Box::new(err))
}

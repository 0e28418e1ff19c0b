//! The thin HTTP veneer (spec SPEC_FULL.md §6.1), grounded in the
//! teacher's `agent_server::webhook::webhook_router` shape: one file, one
//! `Router` constructor, handlers that parse, delegate, and serialize.
//! No auth, no business logic beyond what `rule-engine` already exposes.

use crate::error::ApiError;
use crate::metrics::Metrics;
use action_exec::{ActionExecutor, LoggingExecutor};
use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use rule_engine::{EvaluateOptions, RuleEngine};
use rule_model::RuleDraft;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RuleEngine>,
    pub metrics: Arc<Metrics>,
    pub executor: Arc<dyn ActionExecutor>,
}

impl AppState {
    pub fn new(engine: Arc<RuleEngine>) -> Self {
        AppState {
            engine,
            metrics: Arc::new(Metrics::default()),
            executor: Arc::new(LoggingExecutor),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/rules", post(create_rule).get(list_rules))
        .route(
            "/rules/:id",
            get(get_rule).put(update_rule).delete(delete_rule),
        )
        .route("/rules/:id/versions", get(list_versions))
        .route("/evaluate", post(evaluate))
        .route("/conflicts", get(conflicts))
        .route("/dependency-graph", get(dependency_graph))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .with_state(state)
}

async fn create_rule(
    State(state): State<AppState>,
    Json(draft): Json<RuleDraft>,
) -> Result<Json<rule_model::Rule>, ApiError> {
    let created_by = None;
    let rule = tokio::task::spawn_blocking(move || state.engine.create_rule(draft, created_by))
        .await
        .expect("create_rule task panicked")?;
    Ok(Json(rule))
}

async fn get_rule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Option<rule_model::Rule>>, ApiError> {
    let rule = tokio::task::spawn_blocking(move || state.engine.get_rule(id))
        .await
        .expect("get_rule task panicked")?;
    Ok(Json(rule))
}

async fn update_rule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(draft): Json<RuleDraft>,
) -> Result<Json<rule_model::Rule>, ApiError> {
    let rule = tokio::task::spawn_blocking(move || state.engine.update_rule(id, draft))
        .await
        .expect("update_rule task panicked")?;
    Ok(Json(rule))
}

async fn delete_rule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<axum::http::StatusCode, ApiError> {
    tokio::task::spawn_blocking(move || state.engine.delete_rule(id))
        .await
        .expect("delete_rule task panicked")?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
struct ListParams {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
    group: Option<String>,
    enabled: Option<bool>,
}

fn default_limit() -> i64 {
    100
}

async fn list_rules(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<rule_model::Rule>>, ApiError> {
    let rules = tokio::task::spawn_blocking(move || {
        state
            .engine
            .list_rules(params.skip, params.limit, params.group.as_deref(), params.enabled)
    })
    .await
    .expect("list_rules task panicked")?;
    Ok(Json(rules))
}

async fn list_versions(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<rule_model::RuleVersion>>, ApiError> {
    let versions = tokio::task::spawn_blocking(move || state.engine.get_rule_versions(id))
        .await
        .expect("list_versions task panicked")?;
    Ok(Json(versions))
}

#[derive(Deserialize)]
struct EvaluateRequest {
    event: serde_json::Value,
    #[serde(default)]
    group: Option<String>,
    #[serde(default)]
    explain: bool,
    #[serde(default)]
    dry_run: bool,
}

async fn evaluate(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<rule_engine::MatchReport>, ApiError> {
    let options = EvaluateOptions {
        group: request.group,
        rule_ids: None,
        use_rete: None,
        explain: request.explain,
        dry_run: request.dry_run,
    };

    let engine = state.engine.clone();
    let event = request.event.clone();
    let report = tokio::task::spawn_blocking(move || engine.evaluate(&event, options))
        .await
        .expect("evaluate task panicked")?;

    state
        .metrics
        .record_evaluation(report.matched_rules.len(), report.stats.evaluation_time_ms / 1000.0);

    if !report.dry_run {
        for matched in &report.matched_rules {
            if let Ok(descriptor) =
                serde_json::from_value::<action_exec::ActionDescriptor>(matched.action.clone())
            {
                if let Err(error) = state.executor.execute(&descriptor, &request.event) {
                    tracing::warn!(rule_id = matched.rule_id, %error, "action execution failed");
                }
            }
        }
    }

    Ok(Json(report))
}

async fn conflicts(
    State(state): State<AppState>,
) -> Result<Json<Vec<conflict_detector::Conflict>>, ApiError> {
    let conflicts = tokio::task::spawn_blocking(move || state.engine.detect_all_conflicts())
        .await
        .expect("conflicts task panicked")?;
    Ok(Json(conflicts))
}

async fn dependency_graph(
    State(state): State<AppState>,
) -> Result<Json<dep_graph::DependencyGraph>, ApiError> {
    let graph = tokio::task::spawn_blocking(move || state.engine.dependency_graph())
        .await
        .expect("dependency_graph task panicked")?;
    Ok(Json(graph))
}

async fn health() -> &'static str {
    "ok"
}

async fn metrics(State(state): State<AppState>) -> Json<crate::metrics::MetricsSnapshot> {
    let cache_stats = state.engine.cache_stats();
    Json(state.metrics.snapshot(cache_stats))
}

use application::LedgerApp;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use chrono::NaiveDate;
use config::Config;
use domain::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
struct AppState {
    ledger_app: Arc<LedgerApp>,
}

#[derive(Debug, Deserialize)]
struct CreateUserRequest {
    username: String,
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct CreateGroupRequest {
    name: String,
    max_members: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct JoinGroupRequest {
    user_id: Uuid,
    joined_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct LeaveParams {
    left_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct RangeParams {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct RecordPurchaseRequest {
    user_id: Uuid,
    amount: Decimal,
    store: Option<String>,
    date: Option<NaiveDate>,
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DefineIncentiveRequest {
    name: String,
    amount: Decimal,
    effective_from: NaiveDate,
    effective_until: Option<NaiveDate>,
    on_purchase: bool,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecordRealizationRequest {
    user_id: Uuid,
    date: Option<NaiveDate>,
    notes: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    kind: &'static str,
    message: String,
}

/// Caller mistakes map to 404/422, system faults to 500; every response
/// carries the stable kind tag and the message.
fn error_response(error: DomainError) -> (StatusCode, Json<ErrorBody>) {
    let status = match &error {
        DomainError::GroupNotFound(_)
        | DomainError::UserNotFound(_)
        | DomainError::IncentiveNotFound(_) => StatusCode::NOT_FOUND,
        e if e.is_caller_error() => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorBody {
            kind: error.kind(),
            message: error.to_string(),
        }),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter("api_server=debug,tower_http=debug")
        .init();

    info!("Starting flatledger API server");

    let config = Config::from_env();

    info!("Using database: {}", config.database_path);
    info!("API server will bind to: {}", config.api_address());

    let ledger_app = Arc::new(LedgerApp::new(&config.database_path));
    let app_state = AppState { ledger_app };

    let app = Router::new()
        .route("/api/users", post(create_user))
        .route("/api/groups", post(create_group))
        .route("/api/groups/:id/members", post(join_group))
        .route("/api/groups/:id/members/:user_id", delete(leave_group))
        .route("/api/groups/:id/snapshot", get(group_snapshot))
        .route("/api/groups/:id/settlement", get(group_settlement))
        .route("/api/groups/:id/records", get(group_records))
        .route("/api/groups/:id/purchases", post(record_purchase))
        .route("/api/groups/:id/incentives", post(define_incentive))
        .route("/api/incentives/:id/realizations", post(record_realization))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(&config.api_address()).await?;
    info!("API server listening on http://{}", config.api_address());

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> impl IntoResponse {
    match state
        .ledger_app
        .ledger_service
        .create_user(payload.username, payload.display_name)
        .await
    {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

async fn create_group(
    State(state): State<AppState>,
    Json(payload): Json<CreateGroupRequest>,
) -> impl IntoResponse {
    match state
        .ledger_app
        .ledger_service
        .create_group(payload.name, payload.max_members)
        .await
    {
        Ok(group) => (StatusCode::CREATED, Json(group)).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

async fn join_group(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Json(payload): Json<JoinGroupRequest>,
) -> impl IntoResponse {
    match state
        .ledger_app
        .ledger_service
        .join_group(payload.user_id, group_id, payload.joined_on)
        .await
    {
        Ok(membership) => (StatusCode::CREATED, Json(membership)).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

async fn leave_group(
    State(state): State<AppState>,
    Path((group_id, user_id)): Path<(Uuid, Uuid)>,
    Query(params): Query<LeaveParams>,
) -> impl IntoResponse {
    match state
        .ledger_app
        .ledger_service
        .leave_group(user_id, group_id, params.left_on)
        .await
    {
        Ok(membership) => Json(membership).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

/// Current-month snapshot by default; an explicit from/to pair selects an
/// arbitrary range.
async fn group_snapshot(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Query(params): Query<RangeParams>,
) -> impl IntoResponse {
    let service = &state.ledger_app.ledger_service;
    let result = match (params.from, params.to) {
        (Some(from), Some(to)) => service.range_snapshot(group_id, from, to).await,
        _ => service.current_month_snapshot(group_id).await,
    };
    match result {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

async fn group_settlement(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Query(params): Query<RangeParams>,
) -> impl IntoResponse {
    let (from, to) = match (params.from, params.to) {
        (Some(from), Some(to)) => (from, to),
        _ => {
            return error_response(DomainError::ValidationError(
                "Both from and to are required".to_string(),
            ))
            .into_response()
        }
    };
    match state
        .ledger_app
        .ledger_service
        .settlement_calculator()
        .settlement(group_id, from, to)
        .await
    {
        Ok(report) => Json(report).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

async fn group_records(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Query(params): Query<RangeParams>,
) -> impl IntoResponse {
    let (from, to) = match (params.from, params.to) {
        (Some(from), Some(to)) => (from, to),
        _ => {
            return error_response(DomainError::ValidationError(
                "Both from and to are required".to_string(),
            ))
            .into_response()
        }
    };
    match state
        .ledger_app
        .ledger_service
        .expense_aggregator()
        .transaction_records(group_id, from, to)
        .await
    {
        Ok(records) => Json(records).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

async fn record_purchase(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Json(payload): Json<RecordPurchaseRequest>,
) -> impl IntoResponse {
    match state
        .ledger_app
        .ledger_service
        .record_purchase(
            payload.user_id,
            group_id,
            payload.amount,
            payload.store,
            payload.date,
            payload.notes,
        )
        .await
    {
        Ok(purchase) => (StatusCode::CREATED, Json(purchase)).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

async fn define_incentive(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Json(payload): Json<DefineIncentiveRequest>,
) -> impl IntoResponse {
    match state
        .ledger_app
        .ledger_service
        .record_incentive_definition(
            group_id,
            payload.name,
            payload.amount,
            payload.effective_from,
            payload.effective_until,
            payload.on_purchase,
            payload.description,
        )
        .await
    {
        Ok(definition) => (StatusCode::CREATED, Json(definition)).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

async fn record_realization(
    State(state): State<AppState>,
    Path(incentive_id): Path<Uuid>,
    Json(payload): Json<RecordRealizationRequest>,
) -> impl IntoResponse {
    match state
        .ledger_app
        .ledger_service
        .record_incentive_realization(payload.user_id, incentive_id, payload.date, payload.notes)
        .await
    {
        Ok(realization) => (StatusCode::CREATED, Json(realization)).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

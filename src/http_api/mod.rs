use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{Agenda, AgendaMetadata, Booking, NormalizeSummary};

#[derive(Clone)]
pub struct AppState {
    agenda: Arc<RwLock<Agenda>>,
}

impl AppState {
    pub fn new(agenda: Agenda) -> Self {
        Self {
            agenda: Arc::new(RwLock::new(agenda)),
        }
    }

    pub fn with_shared(agenda: Arc<RwLock<Agenda>>) -> Self {
        Self { agenda }
    }

    fn agenda(&self) -> Arc<RwLock<Agenda>> {
        self.agenda.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }

    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                let body = Json(ErrorBody {
                    error: "not_found",
                    message,
                });
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Conflict(message) => {
                let body = Json(ErrorBody {
                    error: "conflict",
                    message,
                });
                (StatusCode::CONFLICT, body).into_response()
            }
            ApiError::Invalid(message) => {
                let body = Json(ErrorBody {
                    error: "invalid_request",
                    message,
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::Internal(message) => {
                let body = Json(ErrorBody {
                    error: "internal_error",
                    message,
                });
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct TimestampPayload {
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct AdvancePayload {
    timestamp: DateTime<Utc>,
    days: u32,
}

#[derive(Debug, Serialize)]
struct AdjustedBody {
    timestamp: DateTime<Utc>,
    adjusted: DateTime<Utc>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metadata", get(get_metadata).put(update_metadata))
        .route("/bookings", get(list_bookings).post(create_booking))
        .route(
            "/bookings/:id",
            get(get_booking).put(update_booking).delete(delete_booking),
        )
        .route("/normalize", post(normalize_agenda))
        .route("/calendar/adjust", post(adjust_timestamp))
        .route("/calendar/next-period", post(next_period))
        .route("/calendar/advance", post(advance_days))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, agenda: Agenda) -> std::io::Result<()> {
    let state = AppState::new(agenda);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_metadata(State(state): State<AppState>) -> Json<AgendaMetadata> {
    let agenda = state.agenda();
    let metadata = {
        let guard = agenda.read();
        guard.metadata().clone()
    };
    Json(metadata)
}

async fn update_metadata(
    State(state): State<AppState>,
    Json(metadata): Json<AgendaMetadata>,
) -> Result<Json<AgendaMetadata>, ApiError> {
    metadata
        .hours
        .validate()
        .map_err(|err| ApiError::invalid(err.to_string()))?;
    let agenda = state.agenda();
    {
        let mut guard = agenda.write();
        guard.set_metadata(metadata);
        guard.normalize();
    }
    let current = {
        let guard = agenda.read();
        guard.metadata().clone()
    };
    Ok(Json(current))
}

async fn list_bookings(State(state): State<AppState>) -> Json<Vec<Booking>> {
    let agenda = state.agenda();
    let bookings = {
        let guard = agenda.read();
        guard.bookings().to_vec()
    };
    Json(bookings)
}

async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<i32>,
) -> Result<Json<Booking>, ApiError> {
    let agenda = state.agenda();
    let result = {
        let guard = agenda.read();
        guard.find_booking(booking_id)
    };
    match result {
        Some(booking) => Ok(Json(booking)),
        None => Err(ApiError::not_found(format!(
            "booking {booking_id} not found"
        ))),
    }
}

async fn create_booking(
    State(state): State<AppState>,
    Json(booking): Json<Booking>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    let agenda = state.agenda();
    let booking_id = booking.id;
    {
        let mut guard = agenda.write();
        if guard.find_booking(booking_id).is_some() {
            return Err(ApiError::Conflict(format!(
                "booking {booking_id} already exists"
            )));
        }
        guard.upsert_booking(booking);
        guard.normalize();
    }
    let created = {
        let guard = agenda.read();
        guard
            .find_booking(booking_id)
            .ok_or_else(|| ApiError::internal("booking not found after creation"))?
    };
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<i32>,
    Json(booking): Json<Booking>,
) -> Result<Json<Booking>, ApiError> {
    if booking.id != booking_id {
        return Err(ApiError::invalid(
            "booking id in payload does not match path parameter",
        ));
    }
    let agenda = state.agenda();
    {
        let mut guard = agenda.write();
        if guard.find_booking(booking_id).is_none() {
            return Err(ApiError::not_found(format!(
                "booking {booking_id} not found"
            )));
        }
        guard.upsert_booking(booking);
        guard.normalize();
    }
    let updated = {
        let guard = agenda.read();
        guard
            .find_booking(booking_id)
            .ok_or_else(|| ApiError::internal("booking not found after update"))?
    };
    Ok(Json(updated))
}

async fn delete_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let agenda = state.agenda();
    let removed = {
        let mut guard = agenda.write();
        guard.delete_booking(booking_id)
    };
    if !removed {
        return Err(ApiError::not_found(format!(
            "booking {booking_id} not found"
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn normalize_agenda(State(state): State<AppState>) -> Json<NormalizeSummary> {
    let agenda = state.agenda();
    let summary = {
        let mut guard = agenda.write();
        guard.normalize()
    };
    Json(summary)
}

async fn adjust_timestamp(
    State(state): State<AppState>,
    Json(payload): Json<TimestampPayload>,
) -> Json<AdjustedBody> {
    let agenda = state.agenda();
    let adjusted = {
        let guard = agenda.read();
        guard.calendar().adjust_to_business_hours(payload.timestamp)
    };
    Json(AdjustedBody {
        timestamp: payload.timestamp,
        adjusted,
    })
}

async fn next_period(
    State(state): State<AppState>,
    Json(payload): Json<TimestampPayload>,
) -> Json<AdjustedBody> {
    let agenda = state.agenda();
    let adjusted = {
        let guard = agenda.read();
        guard.calendar().next_business_period(payload.timestamp)
    };
    Json(AdjustedBody {
        timestamp: payload.timestamp,
        adjusted,
    })
}

async fn advance_days(
    State(state): State<AppState>,
    Json(payload): Json<AdvancePayload>,
) -> Json<AdjustedBody> {
    let agenda = state.agenda();
    let adjusted = {
        let guard = agenda.read();
        guard
            .calendar()
            .advance_business_days(payload.timestamp, payload.days)
    };
    Json(AdjustedBody {
        timestamp: payload.timestamp,
        adjusted,
    })
}

//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! provider's calendar aggregate; accepted mutations are persisted through
//! the repository after the in-memory decision.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use uuid::Uuid;

use super::dto::{
    BookSlotRequest, BookSlotResponse, DayCell, DayDetailQuery, DayDetailResponse, HealthResponse,
    MonthCalendarResponse, ReplaceHolidaysRequest, TransitionBookingRequest, UpsertWindowRequest,
    UpsertWindowResponse, WindowListResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{BookingId, ProviderId, WindowId};
use crate::calendar::BookingOutcome;
use crate::db::CalendarRepository;
use crate::models::AvailabilityWindow;
use crate::scheduler::BookingRequest;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Booking admission
// =============================================================================

/// POST /v1/providers/{provider_id}/bookings
///
/// Run the admission check and, on admit, append the booking atomically.
/// Rejections are 409 with a machine-readable reason; only malformed input
/// is an error status.
pub async fn book_slot(
    State(state): State<AppState>,
    Path(provider_id): Path<Uuid>,
    Json(request): Json<BookSlotRequest>,
) -> Result<(StatusCode, Json<BookSlotResponse>), AppError> {
    let provider = ProviderId(provider_id);
    let calendar = state.registry.calendar(provider);

    let booking_request = BookingRequest::new(
        request.date,
        request.start,
        request.end,
        request.service_tag,
    );
    let outcome = calendar.try_book(&booking_request)?;

    match outcome {
        BookingOutcome::Booked {
            booking_id,
            window_id,
        } => {
            if let Some(booking) = calendar.booking(booking_id) {
                state.repository.save_booking(provider, booking).await?;
            }
            Ok((
                StatusCode::CREATED,
                Json(BookSlotResponse {
                    admitted: true,
                    booking_id: Some(booking_id),
                    window_id: Some(window_id),
                    reason: None,
                }),
            ))
        }
        BookingOutcome::Rejected(reason) => Ok((
            StatusCode::CONFLICT,
            Json(BookSlotResponse {
                admitted: false,
                booking_id: None,
                window_id: None,
                reason: Some(reason),
            }),
        )),
    }
}

/// POST /v1/providers/{provider_id}/bookings/{booking_id}/transition
pub async fn transition_booking(
    State(state): State<AppState>,
    Path((provider_id, booking_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<TransitionBookingRequest>,
) -> Result<StatusCode, AppError> {
    let provider = ProviderId(provider_id);
    let booking_id = BookingId(booking_id);
    let calendar = state.registry.calendar(provider);

    calendar.transition_booking(booking_id, request.status)?;
    if let Some(booking) = calendar.booking(booking_id) {
        state.repository.save_booking(provider, booking).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Calendar views
// =============================================================================

/// GET /v1/providers/{provider_id}/calendar/{year}/{month}
pub async fn month_calendar(
    State(state): State<AppState>,
    Path((provider_id, year, month)): Path<(Uuid, i32, u32)>,
) -> HandlerResult<MonthCalendarResponse> {
    if !(1..=12).contains(&month) {
        return Err(AppError::BadRequest(format!("invalid month: {}", month)));
    }
    let calendar = state.registry.calendar(ProviderId(provider_id));

    let cells = calendar
        .month_statuses(year, month)
        .into_iter()
        .map(|cell| cell.map(|(date, status)| DayCell { date, status }))
        .collect();

    Ok(Json(MonthCalendarResponse { year, month, cells }))
}

/// GET /v1/providers/{provider_id}/days/{date}
pub async fn day_detail(
    State(state): State<AppState>,
    Path((provider_id, date)): Path<(Uuid, NaiveDate)>,
    Query(query): Query<DayDetailQuery>,
) -> HandlerResult<DayDetailResponse> {
    let calendar = state.registry.calendar(ProviderId(provider_id));

    Ok(Json(DayDetailResponse {
        date,
        status: calendar.day_status(date),
        windows: calendar.resolve_windows(date),
        bookings: calendar.bookings_on(date, query.include_cancelled),
    }))
}

// =============================================================================
// Window & holiday management
// =============================================================================

/// GET /v1/providers/{provider_id}/windows
pub async fn list_windows(
    State(state): State<AppState>,
    Path(provider_id): Path<Uuid>,
) -> HandlerResult<WindowListResponse> {
    let calendar = state.registry.calendar(ProviderId(provider_id));
    let windows = calendar.windows();
    let total = windows.len();
    Ok(Json(WindowListResponse { windows, total }))
}

/// PUT /v1/providers/{provider_id}/windows
pub async fn upsert_window(
    State(state): State<AppState>,
    Path(provider_id): Path<Uuid>,
    Json(request): Json<UpsertWindowRequest>,
) -> Result<(StatusCode, Json<UpsertWindowResponse>), AppError> {
    let provider = ProviderId(provider_id);
    let calendar = state.registry.calendar(provider);
    let policy = calendar.policy().clone();

    let range = crate::models::TimeRange::new(request.start, request.end)?;
    let window = AvailabilityWindow {
        id: request.id.unwrap_or_default(),
        scope: request.scope,
        range,
        max_concurrent_bookings: request
            .max_concurrent_bookings
            .unwrap_or(policy.default_max_concurrent_bookings),
        buffer_minutes: request
            .buffer_minutes
            .unwrap_or(policy.default_buffer_minutes),
        eligible_service_tags: request.eligible_service_tags.into_iter().collect(),
    };

    // A PUT may carry a client-generated id for a window that does not
    // exist yet; created-ness is whether the id was stored before.
    let created = calendar.window(window.id).is_none();
    calendar.upsert_window(window.clone())?;
    state.repository.save_window(provider, window.clone()).await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(UpsertWindowResponse { window })))
}

/// DELETE /v1/providers/{provider_id}/windows/{window_id}
///
/// Idempotent: deleting a missing window still answers 204 so UI retries
/// are safe.
pub async fn delete_window(
    State(state): State<AppState>,
    Path((provider_id, window_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let provider = ProviderId(provider_id);
    let window_id = WindowId(window_id);
    let calendar = state.registry.calendar(provider);

    calendar.remove_window(window_id)?;
    state.repository.delete_window(provider, window_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /v1/providers/{provider_id}/holidays
///
/// Replaces the provider's holiday set; effective immediately.
pub async fn replace_holidays(
    State(state): State<AppState>,
    Path(provider_id): Path<Uuid>,
    Json(request): Json<ReplaceHolidaysRequest>,
) -> Result<StatusCode, AppError> {
    let provider = ProviderId(provider_id);
    let calendar = state.registry.calendar(provider);

    calendar.replace_holidays(request.dates.iter().copied());
    state.repository.save_holidays(provider, request.dates).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::LocalRepository;
    use crate::models::WindowScope;
    use crate::settings::SettingsPolicy;
    use chrono::Weekday;
    use std::sync::Arc;

    fn test_state() -> AppState {
        AppState::new(
            Arc::new(LocalRepository::new()),
            SettingsPolicy::default(),
        )
    }

    fn window_request(id: Option<WindowId>) -> UpsertWindowRequest {
        UpsertWindowRequest {
            id,
            scope: WindowScope::Recurring {
                weekday: Weekday::Mon,
            },
            start: "09:00".parse().unwrap(),
            end: "17:00".parse().unwrap(),
            max_concurrent_bookings: Some(2),
            buffer_minutes: Some(0),
            eligible_service_tags: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_upsert_with_fresh_client_id_answers_created() {
        let state = test_state();
        let provider = uuid::Uuid::new_v4();
        let id = WindowId::new();

        let (status, _) = upsert_window(
            State(state.clone()),
            Path(provider),
            Json(window_request(Some(id))),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        // Same id again is a replacement, not a creation.
        let (status, _) = upsert_window(
            State(state),
            Path(provider),
            Json(window_request(Some(id))),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_upsert_without_id_answers_created() {
        let (status, response) = upsert_window(
            State(test_state()),
            Path(uuid::Uuid::new_v4()),
            Json(window_request(None)),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(response.window.max_concurrent_bookings, 2);
    }

    #[tokio::test]
    async fn test_replace_holidays_swaps_and_persists() {
        let state = test_state();
        let provider = uuid::Uuid::new_v4();
        let first = NaiveDate::from_ymd_opt(2027, 12, 24).unwrap();
        let second = NaiveDate::from_ymd_opt(2027, 12, 31).unwrap();

        let status = replace_holidays(
            State(state.clone()),
            Path(provider),
            Json(ReplaceHolidaysRequest { dates: vec![first] }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        replace_holidays(
            State(state.clone()),
            Path(provider),
            Json(ReplaceHolidaysRequest {
                dates: vec![second],
            }),
        )
        .await
        .unwrap();

        let calendar = state.registry.calendar(ProviderId(provider));
        assert_eq!(calendar.holidays(), vec![second]);
        assert_eq!(
            state
                .repository
                .load_holidays(ProviderId(provider))
                .await
                .unwrap(),
            vec![second]
        );
    }
}

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tokio::time::timeout;
use tracing::{debug, instrument};

use crate::cache::{CacheTier, SHADER_STATUS_HEADER};
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{SaveRequest, SaveResponse};
use crate::gateway::state::HandlerState;
use crate::ident::is_valid_id;

/// `POST /save`: stores `{"source": ..}` and answers `{"id": ..}`.
#[instrument(skip(state, payload), fields(id = tracing::field::Empty))]
pub async fn save_handler<C>(
    State(state): State<HandlerState<C>>,
    payload: Result<Json<SaveRequest>, JsonRejection>,
) -> Result<Json<SaveResponse>, GatewayError>
where
    C: CacheTier + 'static,
{
    let Json(request) = payload?;
    let source = validate_source(request)?;

    let (id, _record) = timeout(state.request_timeout, state.store.save(&source))
        .await
        .map_err(|_| GatewayError::Timeout(state.request_timeout))??;
    tracing::Span::current().record("id", tracing::field::display(&id));

    Ok(Json(SaveResponse { id }))
}

/// `GET /shader/{id}`: answers `{"source": .., "created": ..}` or a JSON 404.
///
/// Ids that [`generate_id`](crate::ident::generate_id) could not have produced are
/// answered 404 without touching either tier.
#[instrument(skip(state))]
pub async fn shader_handler<C>(
    State(state): State<HandlerState<C>>,
    Path(id): Path<String>,
) -> Result<Response, GatewayError>
where
    C: CacheTier + 'static,
{
    if !is_valid_id(&id) {
        debug!("Malformed id, not consulting storage");
        return Err(GatewayError::NotFound(id));
    }

    let lookup = timeout(state.request_timeout, state.store.get(&id))
        .await
        .map_err(|_| GatewayError::Timeout(state.request_timeout))?;

    let status = lookup.status();
    let record = lookup.into_record().ok_or(GatewayError::NotFound(id))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        SHADER_STATUS_HEADER,
        HeaderValue::from_static(status.as_header_value()),
    );

    Ok((StatusCode::OK, headers, Json(record)).into_response())
}

pub(crate) fn validate_source(request: SaveRequest) -> Result<String, GatewayError> {
    match request.source {
        Some(source) if !source.is_empty() => Ok(source),
        _ => Err(GatewayError::InvalidRequest(
            "No shader source".to_string(),
        )),
    }
}

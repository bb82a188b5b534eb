use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::{HealthResponse, PlayingResponse, SpeakResponse, VoicesResponse};
use crate::api::routes::AppState;
use crate::catalog::VoiceFilter;
use crate::error::AppError;
use crate::form::SpeakForm;
use crate::synth::{audio_data_uri, SynthesisRequest};

/// Validate the form and run one synthesis call. Only one call may be in
/// flight; a second concurrent request is refused with `Busy`.
async fn synthesize(
    state: &AppState,
    form: &SpeakForm,
) -> Result<(SynthesisRequest, Vec<u8>), AppError> {
    let request = form.prepare(&state.catalog)?;

    let _in_flight = state.in_flight.try_lock().map_err(|_| AppError::Busy)?;
    let audio = state.synth.synthesize(&request).await?;

    tracing::info!(
        "Synthesized {} bytes with {} (rate {}, pitch {})",
        audio.len(),
        request.voice_name,
        request.speaking_rate,
        request.pitch
    );

    Ok((request, audio))
}

pub async fn speak(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SpeakForm>,
) -> Result<Json<SpeakResponse>, AppError> {
    let (request, audio) = synthesize(&state, &form).await?;

    Ok(Json(SpeakResponse {
        audio: audio_data_uri(&audio),
        voice: request.voice_name,
        speaking_rate: request.speaking_rate,
        pitch: request.pitch,
    }))
}

pub async fn speak_audio(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SpeakForm>,
) -> Result<Response, AppError> {
    let (_, audio) = synthesize(&state, &form).await?;

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response())
}

#[cfg(feature = "audio-playback")]
pub async fn speak_aloud(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SpeakForm>,
) -> Result<Json<PlayingResponse>, AppError> {
    let (request, audio) = synthesize(&state, &form).await?;

    state.player.play(audio);

    Ok(Json(PlayingResponse {
        status: "playing".to_string(),
        voice: request.voice_name,
    }))
}

#[cfg(not(feature = "audio-playback"))]
pub async fn speak_aloud(
    State(_state): State<Arc<AppState>>,
    Json(_form): Json<SpeakForm>,
) -> Result<Json<PlayingResponse>, AppError> {
    Err(AppError::BadRequest(
        "Built without audio playback support".into(),
    ))
}

pub async fn list_voices(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<VoiceFilter>,
) -> Json<VoicesResponse> {
    Json(VoicesResponse {
        voices: state.catalog.filter(&filter).cloned().collect(),
        kinds: state.catalog.kinds().to_vec(),
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

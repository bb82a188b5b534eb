pub mod handlers;
pub mod routes;

use serde::Serialize;

use crate::catalog::VoiceDescriptor;

#[derive(Debug, Serialize)]
pub struct VoicesResponse {
    pub voices: Vec<VoiceDescriptor>,
    pub kinds: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakResponse {
    /// `data:audio/mp3;base64,...`
    pub audio: String,
    pub voice: String,
    pub speaking_rate: f64,
    pub pitch: f64,
}

#[derive(Debug, Serialize)]
pub struct PlayingResponse {
    pub status: String,
    pub voice: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

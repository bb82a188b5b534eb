//! Form handling for the play button: input trimming, rate/pitch clamping and
//! pitch suppression before anything reaches the synthesis client.

use serde::Deserialize;

use crate::catalog::{VoiceCatalog, VoiceDescriptor};
use crate::error::AppError;
use crate::synth::SynthesisRequest;

pub const MIN_SPEAKING_RATE: f64 = 0.25;
pub const MAX_SPEAKING_RATE: f64 = 2.0;
pub const MIN_PITCH: f64 = -20.0;
pub const MAX_PITCH: f64 = 20.0;

const DEFAULT_RATE_PERCENT: f64 = 100.0;

/// Speaking rate as a multiplier, from the slider's percentage.
pub fn speaking_rate_from_percent(percent: f64) -> f64 {
    let percent = if percent.is_finite() {
        percent
    } else {
        DEFAULT_RATE_PERCENT
    };
    (percent / 100.0).clamp(MIN_SPEAKING_RATE, MAX_SPEAKING_RATE)
}

/// Pitch in semitones, clamped.
pub fn clamp_pitch(pitch: f64) -> f64 {
    if !pitch.is_finite() {
        return 0.0;
    }
    pitch.clamp(MIN_PITCH, MAX_PITCH)
}

/// Pitch actually sent for `voice`: zero for kinds that ignore it.
pub fn effective_pitch(voice: &VoiceDescriptor, pitch: f64) -> f64 {
    if voice.supports_pitch() {
        clamp_pitch(pitch)
    } else {
        0.0
    }
}

fn default_rate_percent() -> f64 {
    DEFAULT_RATE_PERCENT
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakForm {
    #[serde(default)]
    pub credential: String,
    #[serde(default)]
    pub text: String,
    /// `fullname` of the selected voice.
    #[serde(default)]
    pub voice: String,
    /// Percent, 100 = normal speed.
    #[serde(default = "default_rate_percent")]
    pub speaking_rate: f64,
    #[serde(default)]
    pub pitch: f64,
}

impl SpeakForm {
    /// Validate against the catalog and build the request to send.
    pub fn prepare(&self, catalog: &VoiceCatalog) -> Result<SynthesisRequest, AppError> {
        let credential = self.credential.trim();
        if credential.is_empty() {
            return Err(AppError::BadRequest("API key cannot be empty".into()));
        }

        let text = self.text.trim();
        if text.is_empty() {
            return Err(AppError::BadRequest("Text cannot be empty".into()));
        }

        if self.voice.is_empty() {
            return Err(AppError::BadRequest("Voice cannot be empty".into()));
        }

        let voice = catalog
            .find(&self.voice)
            .ok_or_else(|| AppError::VoiceNotFound(self.voice.clone()))?;

        Ok(SynthesisRequest {
            credential: credential.to_string(),
            text: text.to_string(),
            language_code: voice.lang.clone(),
            voice_name: voice.fullname.clone(),
            pitch: effective_pitch(voice, self.pitch),
            speaking_rate: speaking_rate_from_percent(self.speaking_rate),
        })
    }
}

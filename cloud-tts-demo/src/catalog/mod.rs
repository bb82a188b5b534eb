pub mod google;

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub use google::{google_voices, PROVIDER};

/// Voice kind whose synthesis ignores pitch adjustment.
pub const PITCHLESS_KIND: &str = "Chirp3-HD";

lazy_static! {
    // <lang>-<kind>-<name>, where lang is two tokens (ja-JP) and kind may
    // itself contain hyphens (Chirp3-HD). Word characters are ASCII only.
    static ref VOICE_ID_REGEX: Regex =
        Regex::new(r"^((?-u:\w)+-(?-u:\w)+)-(.*)-((?-u:\w)+)$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

/// One entry of the hard-coded voice list, before parsing.
#[derive(Debug, Clone, Copy)]
pub struct RawVoice {
    pub id: &'static str,
    pub sex: Sex,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceDescriptor {
    pub provider: String,
    pub lang: String,
    pub fullname: String,
    pub kind: String,
    pub name: String,
    pub sex: Sex,
}

impl VoiceDescriptor {
    /// Parse a raw entry. Returns `None` when the identifier does not have
    /// the `<lang>-<kind>-<name>` shape.
    pub fn parse(raw: &RawVoice) -> Option<Self> {
        let cap = VOICE_ID_REGEX.captures(raw.id)?;

        Some(Self {
            provider: PROVIDER.to_string(),
            lang: cap[1].to_string(),
            fullname: raw.id.to_string(),
            kind: cap[2].to_string(),
            name: cap[3].to_string(),
            sex: raw.sex,
        })
    }

    pub fn supports_pitch(&self) -> bool {
        self.kind != PITCHLESS_KIND
    }
}

/// Exact-match predicates for the voice table. Empty values do not filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoiceFilter {
    pub kind: Option<String>,
    pub sex: Option<String>,
}

impl VoiceFilter {
    pub fn matches(&self, voice: &VoiceDescriptor) -> bool {
        if let Some(kind) = self.kind.as_deref().filter(|k| !k.is_empty()) {
            if voice.kind != kind {
                return false;
            }
        }
        if let Some(sex) = self.sex.as_deref().filter(|s| !s.is_empty()) {
            if voice.sex.as_str() != sex {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default)]
pub struct VoiceCatalog {
    voices: Vec<VoiceDescriptor>,
    kinds: Vec<String>,
}

impl VoiceCatalog {
    pub fn voices(&self) -> &[VoiceDescriptor] {
        &self.voices
    }

    /// Distinct kinds, sorted.
    pub fn kinds(&self) -> &[String] {
        &self.kinds
    }

    pub fn find(&self, fullname: &str) -> Option<&VoiceDescriptor> {
        self.voices.iter().find(|v| v.fullname == fullname)
    }

    pub fn filter<'a>(
        &'a self,
        filter: &'a VoiceFilter,
    ) -> impl Iterator<Item = &'a VoiceDescriptor> + 'a {
        self.voices.iter().filter(move |v| filter.matches(v))
    }
}

/// Build the catalog from raw entries, keeping input order.
///
/// Entries whose identifier does not parse are left out rather than
/// rejected. Later duplicates of a `fullname` are dropped so the name stays
/// a usable key.
pub fn build_catalog(raw: &[RawVoice]) -> VoiceCatalog {
    let mut voices: Vec<VoiceDescriptor> = Vec::with_capacity(raw.len());

    for entry in raw {
        let Some(voice) = VoiceDescriptor::parse(entry) else {
            tracing::trace!("Skipping voice with unrecognised id: {}", entry.id);
            continue;
        };
        if voices.iter().any(|v| v.fullname == voice.fullname) {
            continue;
        }
        voices.push(voice);
    }

    let kinds: BTreeSet<String> = voices.iter().map(|v| v.kind.clone()).collect();

    VoiceCatalog {
        voices,
        kinds: kinds.into_iter().collect(),
    }
}

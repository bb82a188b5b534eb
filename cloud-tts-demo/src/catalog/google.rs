use super::{RawVoice, Sex};

pub const PROVIDER: &str = "Google";

const fn female(id: &'static str) -> RawVoice {
    RawVoice {
        id,
        sex: Sex::Female,
    }
}

const fn male(id: &'static str) -> RawVoice {
    RawVoice { id, sex: Sex::Male }
}

// Japanese voices offered by the demo. The remaining Chirp3-HD voices and
// the A variants of Standard/Wavenet are left out on purpose.
static GOOGLE_VOICES: &[RawVoice] = &[
    female("ja-JP-Chirp3-HD-Aoede"),
    male("ja-JP-Chirp3-HD-Charon"),
    male("ja-JP-Chirp3-HD-Fenrir"),
    female("ja-JP-Chirp3-HD-Kore"),
    female("ja-JP-Chirp3-HD-Leda"),
    male("ja-JP-Chirp3-HD-Orus"),
    male("ja-JP-Chirp3-HD-Puck"),
    female("ja-JP-Chirp3-HD-Zephyr"),
    female("ja-JP-Neural2-B"),
    male("ja-JP-Neural2-C"),
    male("ja-JP-Neural2-D"),
    female("ja-JP-Standard-B"),
    male("ja-JP-Standard-C"),
    male("ja-JP-Standard-D"),
    female("ja-JP-Wavenet-B"),
    male("ja-JP-Wavenet-C"),
    male("ja-JP-Wavenet-D"),
];

pub fn google_voices() -> &'static [RawVoice] {
    GOOGLE_VOICES
}

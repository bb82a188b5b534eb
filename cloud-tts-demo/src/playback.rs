use std::io::Cursor;
use std::sync::{Arc, Mutex, PoisonError};

use rodio::{Decoder, OutputStream, Sink};

use crate::error::AppError;

/// Plays synthesized audio on the host's default output device.
///
/// Only one clip plays at a time: starting a new one stops the previous
/// clip, so every play starts from the beginning.
#[derive(Default)]
pub struct Player {
    current: Mutex<Option<Arc<Sink>>>,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start playing `audio` in the background.
    pub fn play(self: &Arc<Self>, audio: Vec<u8>) {
        let player = Arc::clone(self);
        tokio::task::spawn_blocking(move || {
            if let Err(e) = player.play_blocking(audio) {
                tracing::error!("Failed to play audio: {}", e);
            }
        });
    }

    fn play_blocking(&self, audio: Vec<u8>) -> Result<(), AppError> {
        // The stream must outlive the sink, so it stays on this thread.
        let (_stream, handle) =
            OutputStream::try_default().map_err(|e| AppError::Playback(e.to_string()))?;
        let sink = Arc::new(Sink::try_new(&handle).map_err(|e| AppError::Playback(e.to_string()))?);
        let source =
            Decoder::new(Cursor::new(audio)).map_err(|e| AppError::Playback(e.to_string()))?;

        if let Some(previous) = self.lock().replace(Arc::clone(&sink)) {
            previous.stop();
        }

        sink.append(source);
        sink.sleep_until_end();

        let mut current = self.lock();
        if current.as_ref().is_some_and(|s| Arc::ptr_eq(s, &sink)) {
            *current = None;
        }

        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Arc<Sink>>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

//! Text-to-speech sink interface.
//!
//! The backend is a collaborator, not part of this crate. It is assumed
//! synchronous and non-blocking from the caller's perspective, and it offers
//! no word-level completion callbacks, which is why the channel falls back
//! to a length-based heuristic for "is this still probably playing".

/// The minimal surface the narration channel needs from a TTS backend.
pub trait SpeechSink {
    /// Queue `text` behind whatever is currently playing.
    fn speak(&mut self, text: &str);

    /// Cut off the current utterance and drop the queue.
    fn stop(&mut self);

    fn is_speaking(&self) -> bool;
}

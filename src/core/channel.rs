//! Speech arbitration — priority/ambient ordering, deduplication, and the
//! length-based "probably still playing" window.
//!
//! The channel is the single gate in front of the TTS sink. Everything the
//! engine says goes through one of three entry points, ranked by caller
//! intent: `announce_priority` for user-initiated one-shot feedback,
//! `announce_ambient` for system-driven announcements that must not clobber
//! playback, and `say_if_new` for high-frequency navigation feedback.

use log::trace;

use crate::core::sanitize::Sanitizer;
use crate::schema::speech::SpeechSink;

/// How an utterance was admitted: pre-empting or queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtteranceClass {
    Priority,
    Ambient,
}

/// An utterance accepted by the channel, post-sanitization.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub class: UtteranceClass,
    pub issued_at: f64,
}

/// Default speech rate estimate used to size the priority window.
pub const DEFAULT_CHARS_PER_SECOND: f64 = 15.0;

/// Owns the priority/dedup/timing policy for all speech.
///
/// State is never persisted; a fresh channel forgets everything the previous
/// session said.
pub struct NarrationChannel {
    sanitizer: Sanitizer,
    chars_per_second: f64,
    /// Dedup key fed by priority and say-if-new acceptances.
    last_spoken: Option<String>,
    /// Dedup key fed by ambient acceptances only. Cleared by priority
    /// announcements so a following ambient re-announcement is never
    /// suppressed by them.
    last_ambient: Option<String>,
    /// Estimated end of in-flight speech. While `now` is before this,
    /// say-if-new queues behind instead of cancelling.
    priority_expires_at: f64,
    last_accepted: Option<Utterance>,
}

impl NarrationChannel {
    pub fn new(sanitizer: Sanitizer, chars_per_second: f64) -> Self {
        Self {
            sanitizer,
            chars_per_second,
            last_spoken: None,
            last_ambient: None,
            priority_expires_at: 0.0,
            last_accepted: None,
        }
    }

    /// Cancel in-flight speech and speak `text` immediately.
    pub fn announce_priority(&mut self, sink: &mut dyn SpeechSink, now: f64, text: &str) {
        let Some(text) = self.sanitizer.sanitize(text) else {
            return;
        };
        sink.stop();
        sink.speak(&text);
        self.priority_expires_at = now + self.duration_of(&text);
        self.last_spoken = Some(text.clone());
        self.last_ambient = None;
        self.last_accepted = Some(Utterance {
            text,
            class: UtteranceClass::Priority,
            issued_at: now,
        });
    }

    /// Queue `text` behind whatever is playing. Suppressed only when
    /// identical to the previous ambient utterance.
    pub fn announce_ambient(&mut self, sink: &mut dyn SpeechSink, now: f64, text: &str) {
        let Some(text) = self.sanitizer.sanitize(text) else {
            return;
        };
        if self.last_ambient.as_deref() == Some(text.as_str()) {
            trace!("ambient suppressed as duplicate: {}", text);
            return;
        }
        sink.speak(&text);
        self.priority_expires_at = self.priority_expires_at.max(now) + self.duration_of(&text);
        self.last_ambient = Some(text.clone());
        self.last_accepted = Some(Utterance {
            text,
            class: UtteranceClass::Ambient,
            issued_at: now,
        });
    }

    /// Speak only if `text` differs from the last value accepted through
    /// either dedup key. Queues behind a still-open priority window,
    /// otherwise cancels and replaces.
    pub fn say_if_new(&mut self, sink: &mut dyn SpeechSink, now: f64, text: &str) {
        let Some(text) = self.sanitizer.sanitize(text) else {
            return;
        };
        if self.last_spoken.as_deref() == Some(text.as_str())
            || self.last_ambient.as_deref() == Some(text.as_str())
        {
            trace!("say_if_new suppressed as duplicate: {}", text);
            return;
        }
        if now < self.priority_expires_at {
            sink.speak(&text);
            self.priority_expires_at += self.duration_of(&text);
            self.last_spoken = Some(text.clone());
            self.last_accepted = Some(Utterance {
                text,
                class: UtteranceClass::Ambient,
                issued_at: now,
            });
        } else {
            sink.stop();
            sink.speak(&text);
            self.priority_expires_at = now + self.duration_of(&text);
            self.last_spoken = Some(text.clone());
            self.last_ambient = None;
            self.last_accepted = Some(Utterance {
                text,
                class: UtteranceClass::Priority,
                issued_at: now,
            });
        }
    }

    /// Heuristic "is something still probably playing" test. The sink has no
    /// word-boundary callbacks, so this is estimated from text length.
    pub fn is_priority_window_open(&self, now: f64) -> bool {
        now < self.priority_expires_at
    }

    pub fn last_accepted(&self) -> Option<&Utterance> {
        self.last_accepted.as_ref()
    }

    fn duration_of(&self, text: &str) -> f64 {
        text.chars().count() as f64 / self.chars_per_second
    }
}

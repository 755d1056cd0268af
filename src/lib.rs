//! Gridspeak — narration coordination for audio-first play of grid games.
//!
//! Decides, every frame, what a non-visual player should hear, in what
//! order, and whether new information interrupts or queues behind what is
//! already playing. The text-to-speech backend, the world model, and the
//! per-screen UI adapters stay on the host side, behind the `SpeechSink`,
//! `WorldQuery`, and `Movement` traits.

pub mod core;
pub mod schema;

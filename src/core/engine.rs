//! Engine root — screen-mode state, per-frame dispatch, and the surface the
//! per-screen adapters call.
//!
//! One `NarrationEngine` value holds every piece of mutable narration state
//! (dedup keys, active mode, providers, scan cache), so the single-writer
//! rule is enforced by ownership rather than by convention: whoever holds
//! the engine is the one writer.

use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::core::aoe::AoeShape;
use crate::core::blocks::{ContentBlock, ContentBlockRegistry, ProviderFn};
use crate::core::channel::{NarrationChannel, DEFAULT_CHARS_PER_SECOND};
use crate::core::cursor::CursorTracker;
use crate::core::sanitize::Sanitizer;
use crate::core::scanner::{NearbyScanner, ScanCategory};
use crate::schema::bindings::{BindingsError, KeyBindings};
use crate::schema::geometry::CompassDir;
use crate::schema::speech::SpeechSink;
use crate::schema::world::{Movement, WorldQuery};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("bindings error: {0}")]
    Bindings(#[from] BindingsError),
}

/// The active narration mode. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenMode {
    Default,
    Look,
    PickTarget {
        shape: AoeShape,
        radius: i32,
        range: i32,
    },
}

/// Input state the host polls once per frame and forwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Analog stick direction, quantized to eight ways, for the idle
    /// directional indicator.
    pub pointer_direction: Option<CompassDir>,
}

/// The narration coordination engine. Built via `NarrationEngineBuilder`.
pub struct NarrationEngine<S: SpeechSink> {
    sink: S,
    channel: NarrationChannel,
    registry: ContentBlockRegistry,
    cursor: CursorTracker,
    scanner: NearbyScanner,
    mode: ScreenMode,
    now: f64,
}

/// Builder for constructing a `NarrationEngine`.
pub struct NarrationEngineBuilder {
    bindings: Option<KeyBindings>,
    bindings_path: Option<String>,
    chars_per_second: f64,
    default_provider: Option<ProviderFn>,
}

impl Default for NarrationEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NarrationEngineBuilder {
    pub fn new() -> Self {
        Self {
            bindings: None,
            bindings_path: None,
            chars_per_second: DEFAULT_CHARS_PER_SECOND,
            default_provider: None,
        }
    }

    /// Provide the binding table directly (for testing without files).
    pub fn bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = Some(bindings);
        self
    }

    pub fn bindings_path(mut self, path: &str) -> Self {
        self.bindings_path = Some(path.to_string());
        self
    }

    /// Speech rate estimate used to size the priority window.
    pub fn chars_per_second(mut self, rate: f64) -> Self {
        self.chars_per_second = rate;
        self
    }

    /// The tier-3 content provider, consulted when no screen provider or
    /// static block list is set.
    pub fn default_provider(mut self, provider: ProviderFn) -> Self {
        self.default_provider = Some(provider);
        self
    }

    pub fn build<S: SpeechSink>(self, sink: S) -> Result<NarrationEngine<S>, EngineError> {
        let bindings = match (self.bindings, self.bindings_path) {
            (Some(bindings), _) => bindings,
            (None, Some(path)) => KeyBindings::load_from_ron(Path::new(&path))?,
            (None, None) => KeyBindings::default(),
        };
        let mut registry = ContentBlockRegistry::new();
        if let Some(provider) = self.default_provider {
            registry.set_default_provider(provider);
        }
        Ok(NarrationEngine {
            sink,
            channel: NarrationChannel::new(Sanitizer::new(bindings), self.chars_per_second),
            registry,
            cursor: CursorTracker::new(),
            scanner: NearbyScanner::new(),
            mode: ScreenMode::Default,
            now: 0.0,
        })
    }
}

impl<S: SpeechSink> NarrationEngine<S> {
    pub fn mode(&self) -> ScreenMode {
        self.mode
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn scan_category(&self) -> ScanCategory {
        self.scanner.category()
    }

    /// Per-frame update. `now` is the host clock in seconds; it also stamps
    /// any announcements made between this frame and the next.
    pub fn frame(&mut self, now: f64, world: &dyn WorldQuery, input: FrameInput) {
        self.now = now;
        match self.mode {
            ScreenMode::Default => {
                self.cursor.frame_indicator(
                    world,
                    input.pointer_direction,
                    &mut self.channel,
                    &mut self.sink,
                    now,
                );
            }
            ScreenMode::Look => match world.cursor_position() {
                Some(cursor) => self.cursor.frame_look(
                    world,
                    cursor,
                    &mut self.channel,
                    &mut self.sink,
                    &mut self.registry,
                    now,
                ),
                None => self.recover_to_default("look cursor lost"),
            },
            ScreenMode::PickTarget {
                shape,
                radius,
                range,
            } => match world.cursor_position() {
                Some(cursor) => self.cursor.frame_pick_target(
                    world,
                    cursor,
                    shape,
                    radius,
                    range,
                    &mut self.channel,
                    &mut self.sink,
                    now,
                ),
                None => self.recover_to_default("targeting cursor lost"),
            },
        }
    }

    // --- mode transitions ---------------------------------------------
    //
    // Enter/exit pairing is enforced here rather than trusted to the call
    // sites: entering a mode implicitly exits the previous one, exiting a
    // mode that is not active is a logged no-op, and a frame that finds no
    // cursor falls back to Default.

    pub fn enter_look(&mut self) {
        if self.mode != ScreenMode::Look {
            self.cursor.reset();
        }
        debug!("mode: {:?} -> Look", self.mode);
        self.mode = ScreenMode::Look;
    }

    pub fn exit_look(&mut self) {
        if self.mode == ScreenMode::Look {
            self.recover_to_default("look exited");
        } else {
            debug!("exit_look ignored in mode {:?}", self.mode);
        }
    }

    pub fn enter_pick_target(&mut self, shape: AoeShape, radius: i32, range: i32) {
        self.cursor.reset();
        debug!("mode: {:?} -> PickTarget({:?})", self.mode, shape);
        self.mode = ScreenMode::PickTarget {
            shape,
            radius,
            range,
        };
    }

    pub fn exit_pick_target(&mut self) {
        if matches!(self.mode, ScreenMode::PickTarget { .. }) {
            self.recover_to_default("targeting exited");
        } else {
            debug!("exit_pick_target ignored in mode {:?}", self.mode);
        }
    }

    fn recover_to_default(&mut self, why: &str) {
        debug!("mode: {:?} -> Default ({})", self.mode, why);
        self.cursor.reset();
        self.mode = ScreenMode::Default;
    }

    // --- speech -------------------------------------------------------

    pub fn announce_priority(&mut self, text: &str) {
        self.channel.announce_priority(&mut self.sink, self.now, text);
    }

    pub fn announce_ambient(&mut self, text: &str) {
        self.channel.announce_ambient(&mut self.sink, self.now, text);
    }

    pub fn say_if_new(&mut self, text: &str) {
        self.channel.say_if_new(&mut self.sink, self.now, text);
    }

    // --- content blocks -----------------------------------------------

    pub fn register_provider(&mut self, provider: ProviderFn) {
        self.registry.set_provider(provider);
    }

    pub fn clear_provider(&mut self) {
        self.registry.clear_provider();
    }

    pub fn set_static_blocks(&mut self, blocks: Vec<ContentBlock>) {
        self.registry.set_static_blocks(blocks);
    }

    /// Page through the current screen summary and speak the landed block.
    pub fn navigate_blocks(&mut self, direction: i32) {
        let spoken = self
            .registry
            .resolve_for_navigation(direction)
            .and_then(|b| b.speakable());
        match spoken {
            Some(text) => self.channel.announce_priority(&mut self.sink, self.now, &text),
            None => self
                .channel
                .announce_priority(&mut self.sink, self.now, "nothing to read"),
        }
    }

    // --- scanner ------------------------------------------------------

    pub fn scan_cycle_category(&mut self, delta: i32, world: &dyn WorldQuery) {
        self.scanner
            .cycle_category(delta, world, &mut self.channel, &mut self.sink, self.now);
    }

    pub fn scan_cycle_result(&mut self, delta: i32, world: &dyn WorldQuery) {
        self.scanner
            .cycle_result(delta, world, &mut self.channel, &mut self.sink, self.now);
    }

    pub fn scan_reannounce(&mut self, world: &dyn WorldQuery) {
        self.scanner
            .reannounce_current(world, &mut self.channel, &mut self.sink, self.now);
    }

    pub fn scan_walk(&mut self, world: &dyn WorldQuery, movement: &mut dyn Movement) {
        self.scanner.walk_to_current(
            world,
            movement,
            &mut self.channel,
            &mut self.sink,
            self.now,
        );
    }
}

//! Cursor-driven narration — free-look inspection, targeting feedback, and
//! the idle-only directional indicator.
//!
//! All three paths run on frame cadence, so each keeps the minimal delta
//! state needed to announce only on change: cursor cell, targeted-object
//! identity, or polled direction. The announcements themselves go through
//! `say_if_new`, which keeps them from fighting a just-issued priority or
//! ambient utterance.

use crate::core::aoe::{self, AoeShape};
use crate::core::blocks::{ContentBlock, ContentBlockRegistry};
use crate::core::channel::NarrationChannel;
use crate::schema::geometry::{bearing, chebyshev, raster_line, CompassDir, Point};
use crate::schema::speech::SpeechSink;
use crate::schema::world::{Hostility, ObjectId, ObjectKind, WorldObject, WorldQuery};

/// Per-frame delta detection for the cursor-driven modes.
#[derive(Debug, Default)]
pub struct CursorTracker {
    /// Last announced (cell, top object) in Look mode.
    look_last: Option<(Point, Option<ObjectId>)>,
    /// Last evaluated cursor cell in PickTarget mode.
    target_last: Option<Point>,
    /// Last polled analog direction in Default mode.
    indicator_last: Option<CompassDir>,
}

impl CursorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all delta state. Called on every mode transition so a
    /// re-entered mode always announces its first cell.
    pub fn reset(&mut self) {
        self.look_last = None;
        self.target_last = None;
        self.indicator_last = None;
    }

    /// Look mode: announce on change of cursor cell or targeted-object
    /// identity. Object cycling at a fixed cell still re-announces.
    #[allow(clippy::too_many_arguments)]
    pub fn frame_look(
        &mut self,
        world: &dyn WorldQuery,
        cursor: Point,
        channel: &mut NarrationChannel,
        sink: &mut dyn SpeechSink,
        registry: &mut ContentBlockRegistry,
        now: f64,
    ) {
        let top = best_described(&world.objects_at(cursor));
        let key = (cursor, top.as_ref().map(|o| o.id));
        if self.look_last == Some(key) {
            return;
        }
        self.look_last = Some(key);
        match top {
            None => channel.say_if_new(sink, now, "empty"),
            Some(obj) => {
                channel.say_if_new(sink, now, &describe_object(&obj));
                if let Some(desc) = &obj.description {
                    // long-form description becomes pageable detail content
                    registry.set_static_blocks(vec![ContentBlock::titled(&obj.name, desc)]);
                }
            }
        }
    }

    /// PickTarget mode: re-evaluate only on cursor-cell change.
    #[allow(clippy::too_many_arguments)]
    pub fn frame_pick_target(
        &mut self,
        world: &dyn WorldQuery,
        cursor: Point,
        shape: AoeShape,
        radius: i32,
        range: i32,
        channel: &mut NarrationChannel,
        sink: &mut dyn SpeechSink,
        now: f64,
    ) {
        if self.target_last == Some(cursor) {
            return;
        }
        self.target_last = Some(cursor);
        let origin = world.player_position();
        let text = match shape {
            AoeShape::EmptyCell | AoeShape::Line => {
                direct_target_text(world, origin, cursor, range)
            }
            AoeShape::Cone | AoeShape::Circle | AoeShape::Burst => {
                area_target_text(world, origin, cursor, shape, radius, range)
            }
        };
        channel.say_if_new(sink, now, &text);
    }

    /// Default mode only: on change of the polled analog direction, announce
    /// the best-described content of the adjacent cell that way. Never
    /// touches block-navigation state.
    pub fn frame_indicator(
        &mut self,
        world: &dyn WorldQuery,
        direction: Option<CompassDir>,
        channel: &mut NarrationChannel,
        sink: &mut dyn SpeechSink,
        now: f64,
    ) {
        if direction == self.indicator_last {
            return;
        }
        self.indicator_last = direction;
        let Some(dir) = direction else {
            return;
        };
        let cell = world.player_position().step(dir);
        if !world.in_bounds(cell) {
            channel.say_if_new(sink, now, &format!("{}, edge of map", dir.label()));
            return;
        }
        let content = match best_described(&world.objects_at(cell)) {
            Some(obj) => obj.name,
            None => "empty".to_string(),
        };
        channel.say_if_new(sink, now, &format!("{}, {}", dir.label(), content));
    }
}

/// Pick the single object worth describing in a cell: creatures over loot,
/// loot over fixtures; within a rank, the topmost (last) wins.
pub(crate) fn best_described(objects: &[WorldObject]) -> Option<WorldObject> {
    fn rank(kind: ObjectKind) -> u8 {
        match kind {
            ObjectKind::Creature => 3,
            ObjectKind::Item | ObjectKind::Corpse => 2,
            ObjectKind::Door | ObjectKind::Container => 1,
            ObjectKind::Feature => 0,
        }
    }
    objects.iter().max_by_key(|o| rank(o.kind)).cloned()
}

/// Name plus contextual suffixes: open state, color, and when present the
/// feeling / difficulty / wound summary.
fn describe_object(obj: &WorldObject) -> String {
    let mut parts = vec![obj.name.clone()];
    if let Some(open) = obj.open {
        parts.push(if open { "open" } else { "closed" }.to_string());
    }
    if let Some(color) = &obj.color {
        parts.push(color.clone());
    }
    if let Some(feeling) = &obj.feeling {
        parts.push(feeling.clone());
    }
    if let Some(difficulty) = &obj.difficulty {
        parts.push(difficulty.clone());
    }
    if let Some(wounds) = &obj.wounds {
        parts.push(wounds.clone());
    }
    parts.join(", ")
}

/// Single-cell and line targeting: best-described object plus relative
/// bearing, then the ranged-safety readout — range check first (an
/// out-of-range cursor reports nothing further), then the cover estimate
/// and any non-hostile creature standing in the line of fire.
fn direct_target_text(world: &dyn WorldQuery, origin: Point, cursor: Point, range: i32) -> String {
    let mut parts: Vec<String> = Vec::new();
    match best_described(&world.objects_at(cursor)) {
        Some(obj) => parts.push(obj.name),
        None => parts.push("empty".to_string()),
    }
    let (dx, dy) = origin.offset_to(cursor);
    parts.push(bearing(dx, dy).to_string());

    if range > 0 && chebyshev(origin, cursor) > range {
        parts.push("out of range".to_string());
        return parts.join(", ");
    }

    let path = raster_line(origin, cursor);
    let inner: &[Point] = if path.len() > 2 {
        &path[1..path.len() - 1]
    } else {
        &[]
    };
    let cover = inner
        .iter()
        .map(|p| world.cover_percent(*p))
        .max()
        .unwrap_or(0);
    if cover > 0 {
        parts.push(format!("{} percent cover", cover));
    }
    if let Some(name) = bystander_in_path(world, inner) {
        parts.push(format!("warning: {} in the line of fire", name));
    }
    parts.join(", ")
}

fn bystander_in_path(world: &dyn WorldQuery, inner: &[Point]) -> Option<String> {
    let me = world.player();
    for p in inner {
        for obj in world.objects_at(*p) {
            if obj.kind == ObjectKind::Creature
                && obj.id != me
                && world.hostility(obj.id, me) != Hostility::Hostile
            {
                return Some(obj.name);
            }
        }
    }
    None
}

/// Area targeting: shape size plus the hostility-grouped creature summary.
fn area_target_text(
    world: &dyn WorldQuery,
    origin: Point,
    cursor: Point,
    shape: AoeShape,
    radius: i32,
    range: i32,
) -> String {
    let mut covered = aoe::cells(shape, radius, range, origin, cursor);
    covered.retain(|p| world.in_bounds(*p));
    format!(
        "{}, {} cells, {}",
        shape.describe(radius),
        covered.len(),
        creature_summary(world, &covered)
    )
}

/// Creatures under the shape, grouped by hostility toward the acting agent,
/// each with its bearing. "includes you" when the agent's own cell is
/// covered; "no creatures" when none. Never an empty string.
pub(crate) fn creature_summary(world: &dyn WorldQuery, covered: &[Point]) -> String {
    let me = world.player();
    let my_pos = world.player_position();
    let mut hostile = Vec::new();
    let mut friendly = Vec::new();
    let mut neutral = Vec::new();
    let mut includes_you = false;
    for p in covered {
        if *p == my_pos {
            includes_you = true;
        }
        for obj in world.objects_at(*p) {
            if obj.kind != ObjectKind::Creature || obj.id == me {
                continue;
            }
            let (dx, dy) = my_pos.offset_to(*p);
            let desc = format!("{} {}", obj.name, bearing(dx, dy));
            match world.hostility(obj.id, me) {
                Hostility::Hostile => hostile.push(desc),
                Hostility::Friendly => friendly.push(desc),
                Hostility::Neutral => neutral.push(desc),
            }
        }
    }
    let mut parts = Vec::new();
    if !hostile.is_empty() {
        parts.push(format!("{} hostile: {}", hostile.len(), hostile.join(", ")));
    }
    if !friendly.is_empty() {
        parts.push(format!(
            "{} friendly: {}",
            friendly.len(),
            friendly.join(", ")
        ));
    }
    if !neutral.is_empty() {
        parts.push(format!("{} neutral: {}", neutral.len(), neutral.join(", ")));
    }
    if parts.is_empty() {
        parts.push("no creatures".to_string());
    }
    if includes_you {
        parts.push("includes you".to_string());
    }
    parts.join("; ")
}

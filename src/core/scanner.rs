//! Spatial scanner — a categorized index of nearby world objects with a
//! sorted result cursor.
//!
//! Scans are on demand, never per frame: cycling the category always
//! rescans, cycling results rescans lazily only if no scan has run yet.
//! Results hold anchors, not live references, so a stale anchor degrades to
//! a spoken error instead of a fault.

use log::debug;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::channel::NarrationChannel;
use crate::schema::geometry::{bearing, chebyshev, Point};
use crate::schema::speech::SpeechSink;
use crate::schema::world::{Hostility, Movement, ObjectId, ObjectKind, WorldObject, WorldQuery};

/// What the scanner is currently looking for. Exactly one is active;
/// cycling wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanCategory {
    Hostile,
    Creature,
    Item,
    Corpse,
    Feature,
    Unexplored,
}

impl ScanCategory {
    pub const ALL: [ScanCategory; 6] = [
        Self::Hostile,
        Self::Creature,
        Self::Item,
        Self::Corpse,
        Self::Feature,
        Self::Unexplored,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hostile => "hostile",
            Self::Creature => "creature",
            Self::Item => "item",
            Self::Corpse => "corpse",
            Self::Feature => "feature",
            Self::Unexplored => "unexplored area",
        }
    }

    /// Creatures move, so they must be currently visible; static results
    /// only need the cell to have been explored at some point.
    pub fn requires_visible(&self) -> bool {
        matches!(self, Self::Hostile | Self::Creature)
    }

    pub fn cycled(&self, delta: i32) -> ScanCategory {
        let len = Self::ALL.len() as i32;
        let here = Self::ALL.iter().position(|c| c == self).unwrap_or(0) as i32;
        Self::ALL[(here + delta).rem_euclid(len) as usize]
    }

    fn matches(&self, world: &dyn WorldQuery, obj: &WorldObject) -> bool {
        let me = world.player();
        match self {
            Self::Hostile => {
                obj.kind == ObjectKind::Creature
                    && obj.id != me
                    && world.hostility(obj.id, me) == Hostility::Hostile
            }
            Self::Creature => obj.kind == ObjectKind::Creature && obj.id != me,
            Self::Item => obj.kind == ObjectKind::Item && obj.takeable,
            Self::Corpse => obj.kind == ObjectKind::Corpse,
            Self::Feature => matches!(
                obj.kind,
                ObjectKind::Feature | ObjectKind::Door | ObjectKind::Container
            ),
            // unexplored regions come from the flood fill, not objects
            Self::Unexplored => false,
        }
    }
}

impl Default for ScanCategory {
    fn default() -> Self {
        Self::Hostile
    }
}

/// What a scan result is pinned to. Object anchors go stale when the object
/// leaves the world; cell anchors cannot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Object(ObjectId),
    Cell(Point),
}

/// One scan result: an anchor, its position at scan time, and the label to
/// speak.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanEntry {
    pub anchor: Anchor,
    pub pos: Point,
    pub label: String,
}

/// Categorized world scan with a wrapping result cursor.
#[derive(Debug, Default)]
pub struct NearbyScanner {
    category: ScanCategory,
    results: Vec<ScanEntry>,
    index: Option<usize>,
    scanned: bool,
}

impl NearbyScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(&self) -> ScanCategory {
        self.category
    }

    pub fn results(&self) -> &[ScanEntry] {
        &self.results
    }

    /// Switch category, rescan, and announce the result count.
    pub fn cycle_category(
        &mut self,
        delta: i32,
        world: &dyn WorldQuery,
        channel: &mut NarrationChannel,
        sink: &mut dyn SpeechSink,
        now: f64,
    ) {
        self.category = self.category.cycled(delta);
        self.refresh(world);
        let text = count_phrase(self.results.len(), self.category.label());
        channel.announce_priority(sink, now, &text);
    }

    /// Step through results, scanning lazily if nothing has been scanned
    /// yet, and announce the landed entry.
    pub fn cycle_result(
        &mut self,
        delta: i32,
        world: &dyn WorldQuery,
        channel: &mut NarrationChannel,
        sink: &mut dyn SpeechSink,
        now: f64,
    ) {
        if !self.scanned {
            self.refresh(world);
        }
        if self.results.is_empty() {
            let text = count_phrase(0, self.category.label());
            channel.announce_priority(sink, now, &text);
            return;
        }
        let count = self.results.len() as i32;
        let next = match self.index {
            None if delta >= 0 => 0,
            None => (count - 1) as usize,
            Some(i) => (i as i32 + delta).rem_euclid(count) as usize,
        };
        self.index = Some(next);
        self.announce_entry(next, world, channel, sink, now);
    }

    /// Repeat the selected result, with bearing and distance recomputed
    /// against current positions.
    pub fn reannounce_current(
        &self,
        world: &dyn WorldQuery,
        channel: &mut NarrationChannel,
        sink: &mut dyn SpeechSink,
        now: f64,
    ) {
        match self.index {
            Some(i) => self.announce_entry(i, world, channel, sink, now),
            None => channel.announce_priority(sink, now, "nothing selected"),
        }
    }

    /// Hand the selected anchor to the movement collaborator. Degrades to a
    /// spoken error when nothing is selected or the anchor has gone stale.
    pub fn walk_to_current(
        &self,
        world: &dyn WorldQuery,
        movement: &mut dyn Movement,
        channel: &mut NarrationChannel,
        sink: &mut dyn SpeechSink,
        now: f64,
    ) {
        let Some(i) = self.index else {
            channel.announce_priority(sink, now, "nothing selected");
            return;
        };
        let entry = &self.results[i];
        let target = match entry.anchor {
            Anchor::Object(id) => match world.object_position(id) {
                Some(p) => p,
                None => {
                    channel.announce_priority(sink, now, "object no longer available");
                    return;
                }
            },
            Anchor::Cell(p) => p,
        };
        debug!("walk request to {:?} for {}", target, entry.label);
        movement.walk_to(target);
    }

    /// Rebuild results for the active category, sorted ascending by
    /// Chebyshev distance to the agent. The sort is stable, so ties keep
    /// discovery order.
    pub fn refresh(&mut self, world: &dyn WorldQuery) {
        self.results.clear();
        self.index = None;
        self.scanned = true;
        let agent = world.player_position();
        if self.category == ScanCategory::Unexplored {
            self.scan_unexplored(world, agent);
        } else {
            self.scan_objects(world);
        }
        self.results.sort_by_key(|e| chebyshev(agent, e.pos));
        debug!(
            "scan found {} results for {:?}",
            self.results.len(),
            self.category
        );
    }

    fn scan_objects(&mut self, world: &dyn WorldQuery) {
        let (w, h) = world.bounds();
        for y in 0..h {
            for x in 0..w {
                let p = Point::new(x, y);
                let seen = if self.category.requires_visible() {
                    world.is_visible(p)
                } else {
                    world.is_explored(p)
                };
                if !seen {
                    continue;
                }
                for obj in world.objects_at(p) {
                    if self.category.matches(world, &obj) {
                        self.results.push(ScanEntry {
                            anchor: Anchor::Object(obj.id),
                            pos: p,
                            label: obj.name.clone(),
                        });
                    }
                }
            }
        }
    }

    /// 8-connected flood fill over not-yet-explored, non-solid-rock cells.
    /// One result per connected component, labeled by cell count, anchored
    /// at the component cell nearest the agent (not its centroid).
    fn scan_unexplored(&mut self, world: &dyn WorldQuery, agent: Point) {
        let (w, h) = world.bounds();
        let open = |p: Point| !world.is_explored(p) && !world.is_solid_rock(p);
        let mut visited: FxHashSet<Point> = FxHashSet::default();
        for y in 0..h {
            for x in 0..w {
                let start = Point::new(x, y);
                if visited.contains(&start) || !open(start) {
                    continue;
                }
                let mut stack = vec![start];
                visited.insert(start);
                let mut size = 0usize;
                let mut nearest = start;
                let mut best = chebyshev(agent, start);
                while let Some(p) = stack.pop() {
                    size += 1;
                    let d = chebyshev(agent, p);
                    if d < best {
                        best = d;
                        nearest = p;
                    }
                    for dy in -1..=1 {
                        for dx in -1..=1 {
                            if dx == 0 && dy == 0 {
                                continue;
                            }
                            let q = Point::new(p.x + dx, p.y + dy);
                            if q.x < 0 || q.y < 0 || q.x >= w || q.y >= h {
                                continue;
                            }
                            if visited.contains(&q) || !open(q) {
                                continue;
                            }
                            visited.insert(q);
                            stack.push(q);
                        }
                    }
                }
                self.results.push(ScanEntry {
                    anchor: Anchor::Cell(nearest),
                    pos: nearest,
                    label: format!(
                        "unexplored area, {} {}",
                        size,
                        if size == 1 { "cell" } else { "cells" }
                    ),
                });
            }
        }
    }

    fn announce_entry(
        &self,
        idx: usize,
        world: &dyn WorldQuery,
        channel: &mut NarrationChannel,
        sink: &mut dyn SpeechSink,
        now: f64,
    ) {
        let entry = &self.results[idx];
        let agent = world.player_position();
        // object anchors track the live object while it still exists
        let pos = match entry.anchor {
            Anchor::Object(id) => world.object_position(id).unwrap_or(entry.pos),
            Anchor::Cell(p) => p,
        };
        let distance = chebyshev(agent, pos);
        let text = if distance == 0 {
            format!("{}, here", entry.label)
        } else {
            let (dx, dy) = agent.offset_to(pos);
            format!("{}, {}, {}", entry.label, bearing(dx, dy), distance)
        };
        channel.announce_priority(sink, now, &text);
    }
}

fn count_phrase(n: usize, label: &str) -> String {
    match n {
        0 => format!("no {}s found", label),
        1 => format!("1 {}", label),
        _ => format!("{} {}s", n, label),
    }
}

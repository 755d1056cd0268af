//! Read-only world collaborator interface.
//!
//! The engine never mutates the simulation. Everything it needs is a
//! point-in-time query against these traits; the host game implements them
//! over its own cell grid and object graph.

use serde::{Deserialize, Serialize};

use super::geometry::Point;

/// Opaque handle to a world object, stable for the object's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

/// Relation between two agents, as judged by the host's faction system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hostility {
    Hostile,
    Friendly,
    Neutral,
}

/// Broad classification used by scan predicates and cell descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Creature,
    Item,
    Corpse,
    Door,
    Container,
    Feature,
}

/// Snapshot of one world object as the narration engine sees it.
///
/// Optional fields are narration extras: hosts that do not track a feeling
/// or wound state simply leave them `None` and the suffixes are skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldObject {
    pub id: ObjectId,
    pub name: String,
    pub kind: ObjectKind,
    #[serde(default)]
    pub color: Option<String>,
    /// Open/closed state for doors and containers.
    #[serde(default)]
    pub open: Option<bool>,
    #[serde(default)]
    pub takeable: bool,
    #[serde(default)]
    pub feeling: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub wounds: Option<String>,
    /// Long-form description, fed to block navigation when inspected.
    #[serde(default)]
    pub description: Option<String>,
}

impl WorldObject {
    pub fn is_creature(&self) -> bool {
        self.kind == ObjectKind::Creature
    }
}

/// Read-only queries against the simulation. No mutation capability is
/// required by the engine.
pub trait WorldQuery {
    /// Map dimensions as `(width, height)`; valid cells are
    /// `0..width × 0..height`.
    fn bounds(&self) -> (i32, i32);

    fn in_bounds(&self, p: Point) -> bool {
        let (w, h) = self.bounds();
        p.x >= 0 && p.y >= 0 && p.x < w && p.y < h
    }

    fn is_visible(&self, p: Point) -> bool;

    fn is_explored(&self, p: Point) -> bool;

    /// Undiggable filler terrain, excluded from unexplored-region scans.
    fn is_solid_rock(&self, p: Point) -> bool;

    /// Per-cell cover contribution in percent, 0..=100.
    fn cover_percent(&self, _p: Point) -> u32 {
        0
    }

    /// Objects occupying a cell, bottom to top.
    fn objects_at(&self, p: Point) -> Vec<WorldObject>;

    /// Current position of an object, or `None` if it has left the world.
    fn object_position(&self, id: ObjectId) -> Option<Point>;

    /// The acting agent narration is oriented around.
    fn player(&self) -> ObjectId;

    fn player_position(&self) -> Point;

    /// The active free-look or targeting cursor, if one is on screen.
    fn cursor_position(&self) -> Option<Point>;

    fn hostility(&self, a: ObjectId, b: ObjectId) -> Hostility;
}

/// Movement/automation collaborator. Fire-and-forget: the engine does not
/// await completion or verify arrival.
pub trait Movement {
    fn walk_to(&mut self, target: Point);
}

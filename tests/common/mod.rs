//! Shared test doubles: a recording speech sink and a scriptable grid world.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use gridspeak::schema::geometry::Point;
use gridspeak::schema::speech::SpeechSink;
use gridspeak::schema::world::{
    Hostility, Movement, ObjectId, ObjectKind, WorldObject, WorldQuery,
};

#[derive(Default)]
pub struct FakeSink {
    pub spoken: Vec<String>,
    pub stops: usize,
}

impl SpeechSink for FakeSink {
    fn speak(&mut self, text: &str) {
        self.spoken.push(text.to_string());
    }
    fn stop(&mut self) {
        self.stops += 1;
    }
    fn is_speaking(&self) -> bool {
        false
    }
}

#[derive(Default)]
pub struct FakeMover {
    pub walked: Vec<Point>,
}

impl Movement for FakeMover {
    fn walk_to(&mut self, target: Point) {
        self.walked.push(target);
    }
}

/// A small scriptable world. Defaults to fully visible and explored;
/// `unexplored_map` flips both defaults off for flood-fill scenarios.
pub struct GridWorld {
    pub width: i32,
    pub height: i32,
    pub visible_default: bool,
    pub explored_default: bool,
    pub hidden: HashSet<Point>,
    pub unexplored: HashSet<Point>,
    pub rock: HashSet<Point>,
    pub cover: HashMap<Point, u32>,
    pub objects: Vec<(Point, WorldObject)>,
    pub hostility: HashMap<(ObjectId, ObjectId), Hostility>,
    pub player_id: ObjectId,
    pub player_pos: Point,
    pub cursor: Option<Point>,
}

impl GridWorld {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            visible_default: true,
            explored_default: true,
            hidden: HashSet::new(),
            unexplored: HashSet::new(),
            rock: HashSet::new(),
            cover: HashMap::new(),
            objects: Vec::new(),
            hostility: HashMap::new(),
            player_id: ObjectId(1),
            player_pos: Point::new(0, 0),
            cursor: None,
        }
    }

    pub fn unexplored_map(width: i32, height: i32) -> Self {
        let mut world = Self::new(width, height);
        world.visible_default = false;
        world.explored_default = false;
        world
    }

    pub fn add_object(&mut self, pos: Point, obj: WorldObject) {
        self.objects.push((pos, obj));
    }

    pub fn add_creature(
        &mut self,
        id: u64,
        name: &str,
        pos: Point,
        toward_player: Hostility,
    ) -> ObjectId {
        let oid = ObjectId(id);
        self.add_object(pos, object(id, name, ObjectKind::Creature));
        self.hostility.insert((oid, self.player_id), toward_player);
        oid
    }

    pub fn remove_object(&mut self, id: ObjectId) {
        self.objects.retain(|(_, o)| o.id != id);
    }
}

impl WorldQuery for GridWorld {
    fn bounds(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn is_visible(&self, p: Point) -> bool {
        self.visible_default && !self.hidden.contains(&p)
    }

    fn is_explored(&self, p: Point) -> bool {
        self.explored_default && !self.unexplored.contains(&p)
    }

    fn is_solid_rock(&self, p: Point) -> bool {
        self.rock.contains(&p)
    }

    fn cover_percent(&self, p: Point) -> u32 {
        self.cover.get(&p).copied().unwrap_or(0)
    }

    fn objects_at(&self, p: Point) -> Vec<WorldObject> {
        self.objects
            .iter()
            .filter(|(q, _)| *q == p)
            .map(|(_, o)| o.clone())
            .collect()
    }

    fn object_position(&self, id: ObjectId) -> Option<Point> {
        self.objects
            .iter()
            .find(|(_, o)| o.id == id)
            .map(|(p, _)| *p)
    }

    fn player(&self) -> ObjectId {
        self.player_id
    }

    fn player_position(&self) -> Point {
        self.player_pos
    }

    fn cursor_position(&self) -> Option<Point> {
        self.cursor
    }

    fn hostility(&self, a: ObjectId, b: ObjectId) -> Hostility {
        self.hostility
            .get(&(a, b))
            .or_else(|| self.hostility.get(&(b, a)))
            .copied()
            .unwrap_or(Hostility::Neutral)
    }
}

pub fn object(id: u64, name: &str, kind: ObjectKind) -> WorldObject {
    WorldObject {
        id: ObjectId(id),
        name: name.to_string(),
        kind,
        color: None,
        open: None,
        takeable: kind == ObjectKind::Item,
        feeling: None,
        difficulty: None,
        wounds: None,
        description: None,
    }
}

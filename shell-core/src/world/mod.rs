//! Text-adventure world types.
//!
//! Rooms form a directed graph keyed by [`RoomId`]. Items live in exactly one
//! place: a room's item list, the player's inventory, or (until revealed) a
//! container or concealing item's hidden set.

pub mod engine;
pub mod map;

pub use engine::Adventure;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

// ============================================================================
// ID Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(pub &'static str);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub &'static str);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Directions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Northeast,
    Northwest,
    Southeast,
    Southwest,
    Up,
    Down,
}

impl Direction {
    pub fn all() -> [Direction; 10] {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
            Direction::Northeast,
            Direction::Northwest,
            Direction::Southeast,
            Direction::Southwest,
            Direction::Up,
            Direction::Down,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
            Direction::Northeast => "northeast",
            Direction::Northwest => "northwest",
            Direction::Southeast => "southeast",
            Direction::Southwest => "southwest",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    pub fn alias(&self) -> &'static str {
        match self {
            Direction::North => "n",
            Direction::South => "s",
            Direction::East => "e",
            Direction::West => "w",
            Direction::Northeast => "ne",
            Direction::Northwest => "nw",
            Direction::Southeast => "se",
            Direction::Southwest => "sw",
            Direction::Up => "u",
            Direction::Down => "d",
        }
    }

    /// Parse a full direction name or its short alias.
    pub fn parse(word: &str) -> Option<Direction> {
        let word = word.trim().to_lowercase();
        Direction::all()
            .into_iter()
            .find(|d| d.name() == word || d.alias() == word)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Items
// ============================================================================

/// An exit inserted into the map when an item is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitLink {
    pub room: RoomId,
    pub direction: Direction,
    pub to: RoomId,
}

#[derive(Debug, Clone)]
pub struct Item {
    pub id: ItemId,
    pub name: &'static str,
    /// Extra nouns the item answers to.
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub takeable: bool,
    pub openable: bool,
    pub open: bool,
    pub moveable: bool,
    pub moved: bool,
    /// Spilled into the room the first time this item is opened.
    pub contains: Vec<ItemId>,
    /// Revealed in the room the first time this item is moved.
    pub concealed_under: Vec<ItemId>,
    pub light_source: bool,
    pub weapon: bool,
    /// Part of the room prose rather than listed as present.
    pub hidden: bool,
    /// Awarded the first time the item is taken.
    pub points: u32,
    pub opens_exits: Vec<ExitLink>,
}

impl Item {
    pub fn new(id: &'static str, name: &'static str, description: &'static str) -> Self {
        Self {
            id: ItemId(id),
            name,
            aliases: &[],
            description,
            takeable: false,
            openable: false,
            open: false,
            moveable: false,
            moved: false,
            contains: Vec::new(),
            concealed_under: Vec::new(),
            light_source: false,
            weapon: false,
            hidden: false,
            points: 0,
            opens_exits: Vec::new(),
        }
    }

    pub fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn takeable(mut self) -> Self {
        self.takeable = true;
        self
    }

    pub fn openable(mut self) -> Self {
        self.openable = true;
        self
    }

    pub fn moveable(mut self) -> Self {
        self.moveable = true;
        self
    }

    pub fn containing(mut self, items: &[&'static str]) -> Self {
        self.contains = items.iter().map(|&id| ItemId(id)).collect();
        self
    }

    pub fn concealing(mut self, items: &[&'static str]) -> Self {
        self.concealed_under = items.iter().map(|&id| ItemId(id)).collect();
        self
    }

    pub fn light_source(mut self) -> Self {
        self.light_source = true;
        self
    }

    pub fn weapon(mut self) -> Self {
        self.weapon = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn worth(mut self, points: u32) -> Self {
        self.points = points;
        self
    }

    pub fn opens_exit(mut self, room: RoomId, direction: Direction, to: RoomId) -> Self {
        self.opens_exits.push(ExitLink {
            room,
            direction,
            to,
        });
        self
    }

    /// Case-insensitive match against the name and aliases.
    pub fn answers_to(&self, noun: &str) -> bool {
        let noun = noun.trim().to_lowercase();
        !noun.is_empty()
            && (self.name.eq_ignore_ascii_case(&noun) || self.aliases.iter().any(|a| *a == noun))
    }
}

// ============================================================================
// Rooms
// ============================================================================

#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub name: &'static str,
    pub description: &'static str,
    pub exits: BTreeMap<Direction, RoomId>,
    pub items: Vec<ItemId>,
    pub dark: bool,
    pub visited: bool,
    /// Awarded on first visit.
    pub points: u32,
}

impl Room {
    pub fn new(id: RoomId, name: &'static str, description: &'static str) -> Self {
        Self {
            id,
            name,
            description,
            exits: BTreeMap::new(),
            items: Vec::new(),
            dark: false,
            visited: false,
            points: 0,
        }
    }

    pub fn exit(mut self, direction: Direction, to: RoomId) -> Self {
        self.exits.insert(direction, to);
        self
    }

    pub fn with_items(mut self, items: &[&'static str]) -> Self {
        self.items = items.iter().map(|&id| ItemId(id)).collect();
        self
    }

    pub fn dark(mut self) -> Self {
        self.dark = true;
        self
    }

    pub fn worth(mut self, points: u32) -> Self {
        self.points = points;
        self
    }

    pub fn has_item(&self, id: ItemId) -> bool {
        self.items.contains(&id)
    }

    /// Add an item unless it is already here.
    pub fn place(&mut self, id: ItemId) -> bool {
        if self.has_item(id) {
            return false;
        }
        self.items.push(id);
        true
    }

    pub fn remove(&mut self, id: ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|&i| i != id);
        self.items.len() != before
    }
}

// ============================================================================
// World
// ============================================================================

/// The room graph and item registry.
#[derive(Debug, Clone)]
pub struct World {
    pub start: RoomId,
    rooms: HashMap<RoomId, Room>,
    items: HashMap<ItemId, Item>,
}

impl World {
    pub fn new(start: RoomId) -> Self {
        Self {
            start,
            rooms: HashMap::new(),
            items: HashMap::new(),
        }
    }

    pub fn add_room(&mut self, room: Room) {
        self.rooms.insert(room.id, room);
    }

    pub fn add_item(&mut self, item: Item) {
        self.items.insert(item.id, item);
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(&id)
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    /// Insert an exit at runtime. Returns false if it already existed.
    pub fn add_exit(&mut self, link: ExitLink) -> bool {
        debug_assert!(self.rooms.contains_key(&link.to), "exit to unknown room {}", link.to);
        match self.rooms.get_mut(&link.room) {
            Some(room) => room.exits.insert(link.direction, link.to) != Some(link.to),
            None => {
                debug_assert!(false, "exit from unknown room {}", link.room);
                false
            }
        }
    }

    /// Total points available from rooms and items.
    pub fn max_score(&self) -> u32 {
        self.rooms.values().map(|r| r.points).sum::<u32>()
            + self.items.values().map(|i| i.points).sum::<u32>()
    }

    /// Every dangling reference in the map, as readable messages.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if !self.rooms.contains_key(&self.start) {
            problems.push(format!("start room {} does not exist", self.start));
        }

        for room in self.rooms.values() {
            for (direction, to) in &room.exits {
                if !self.rooms.contains_key(to) {
                    problems.push(format!("{}: exit {} leads to unknown room {}", room.id, direction, to));
                }
            }
            for item in &room.items {
                if !self.items.contains_key(item) {
                    problems.push(format!("{}: unknown item {}", room.id, item));
                }
            }
        }

        for item in self.items.values() {
            for inner in item.contains.iter().chain(&item.concealed_under) {
                if !self.items.contains_key(inner) {
                    problems.push(format!("{}: reveals unknown item {}", item.id, inner));
                }
            }
            for link in &item.opens_exits {
                for end in [link.room, link.to] {
                    if !self.rooms.contains_key(&end) {
                        problems.push(format!("{}: opens exit on unknown room {}", item.id, end));
                    }
                }
            }
        }

        problems.sort();
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse() {
        assert_eq!(Direction::parse("N"), Some(Direction::North));
        assert_eq!(Direction::parse("southwest"), Some(Direction::Southwest));
        assert_eq!(Direction::parse("d"), Some(Direction::Down));
        assert_eq!(Direction::parse("sideways"), None);
    }

    #[test]
    fn test_item_answers_to_name_and_alias() {
        let lamp = Item::new("lamp", "brass lantern", "A lamp.").with_aliases(&["lamp", "lantern"]);
        assert!(lamp.answers_to("Brass Lantern"));
        assert!(lamp.answers_to("lamp"));
        assert!(!lamp.answers_to("sword"));
        assert!(!lamp.answers_to(""));
    }

    #[test]
    fn test_room_place_is_idempotent() {
        let mut room = Room::new(RoomId("a"), "A", "Room A.");
        assert!(room.place(ItemId("x")));
        assert!(!room.place(ItemId("x")));
        assert_eq!(room.items.len(), 1);
    }

    #[test]
    fn test_validate_reports_dangling_exit() {
        let mut world = World::new(RoomId("a"));
        world.add_room(Room::new(RoomId("a"), "A", "Room A.").exit(Direction::North, RoomId("nowhere")));
        let problems = world.validate();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("nowhere"));
    }

    #[test]
    fn test_house_map_is_valid() {
        let world = map::house();
        assert!(world.validate().is_empty(), "{:?}", world.validate());
        assert_eq!(world.max_score(), 50);
    }
}

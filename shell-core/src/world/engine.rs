//! The adventure engine: parses a typed line and applies it to the world.

use std::collections::HashSet;
use tracing::debug;

use super::{map, Direction, Item, ItemId, RoomId, World};
use crate::output::{Line, Reply, Style};

const DARK_NOTICE: &str = "It is pitch black. You are likely to be eaten by a grue.";
const GRUE_WARNING: &str =
    "Moving around in the dark is dangerous. You might be eaten by a grue! Find a light first.";
const NOT_UNDERSTOOD: &str = "I don't understand that.";

/// Mutable player state. Darkness is derived, never stored.
#[derive(Debug, Clone)]
pub struct Player {
    pub location: RoomId,
    pub inventory: Vec<ItemId>,
    pub lamp_on: bool,
    pub moves: u32,
    pub score: u32,
    scored_items: HashSet<ItemId>,
}

impl Player {
    fn new(location: RoomId) -> Self {
        Self {
            location,
            inventory: Vec::new(),
            lamp_on: false,
            moves: 0,
            score: 0,
            scored_items: HashSet::new(),
        }
    }

    pub fn carries(&self, id: ItemId) -> bool {
        self.inventory.contains(&id)
    }
}

/// A parsed adventure command.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Go(Direction),
    Take(String),
    TakeAll,
    Drop(String),
    Open(String),
    Move(String),
    TurnOn(String),
    TurnOff(String),
    Inventory,
    Look,
    Examine(String),
    Score,
    Help,
    Quit,
    Restart,
    Empty,
    Unknown,
}

impl Command {
    fn parse(input: &str) -> Command {
        let lowered = input.to_lowercase();
        let words: Vec<&str> = lowered
            .split_whitespace()
            .filter(|w| !matches!(*w, "the" | "a" | "an"))
            .collect();

        let Some((&verb, rest)) = words.split_first() else {
            return Command::Empty;
        };
        let noun = rest.join(" ");

        if rest.is_empty() {
            if let Some(direction) = Direction::parse(verb) {
                return Command::Go(direction);
            }
        }

        match verb {
            "go" | "walk" => match Direction::parse(&noun) {
                Some(direction) => Command::Go(direction),
                None => Command::Unknown,
            },
            "take" | "get" if noun == "all" => Command::TakeAll,
            "take" | "get" => Command::Take(noun),
            "pick" => match rest.split_first() {
                Some((&"up", tail)) if tail.join(" ") == "all" => Command::TakeAll,
                Some((&"up", tail)) => Command::Take(tail.join(" ")),
                _ => Command::Unknown,
            },
            "drop" => Command::Drop(noun),
            "open" => Command::Open(noun),
            "move" | "push" | "pull" | "lift" => Command::Move(noun),
            "turn" | "switch" => match rest {
                [] => Command::Unknown,
                ["on", tail @ ..] => Command::TurnOn(tail.join(" ")),
                ["off", tail @ ..] => Command::TurnOff(tail.join(" ")),
                [head @ .., "on"] => Command::TurnOn(head.join(" ")),
                [head @ .., "off"] => Command::TurnOff(head.join(" ")),
                _ => Command::Unknown,
            },
            "light" => Command::TurnOn(noun),
            "extinguish" => Command::TurnOff(noun),
            "inventory" | "i" => Command::Inventory,
            "look" | "l" => match rest {
                [] => Command::Look,
                ["at", tail @ ..] => Command::Examine(tail.join(" ")),
                _ => Command::Examine(noun),
            },
            "examine" | "x" | "read" => Command::Examine(noun),
            "score" => Command::Score,
            "help" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            "restart" => Command::Restart,
            _ => Command::Unknown,
        }
    }

    /// Verbs that cost a move.
    fn is_action(&self) -> bool {
        matches!(
            self,
            Command::Go(_)
                | Command::Take(_)
                | Command::TakeAll
                | Command::Drop(_)
                | Command::Open(_)
                | Command::Move(_)
                | Command::TurnOn(_)
                | Command::TurnOff(_)
        )
    }
}

/// A running adventure: the world plus the player in it.
#[derive(Debug, Clone)]
pub struct Adventure {
    world: World,
    player: Player,
}

impl Default for Adventure {
    fn default() -> Self {
        Self::new()
    }
}

impl Adventure {
    /// Start a new game on the house map.
    pub fn new() -> Self {
        Self::with_world(map::house())
    }

    pub fn with_world(mut world: World) -> Self {
        debug_assert!(world.validate().is_empty(), "invalid world: {:?}", world.validate());
        let start = world.start;
        if let Some(room) = world.room_mut(start) {
            room.visited = true;
        }
        Self {
            world,
            player: Player::new(start),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Dark here, and no lit light source is being carried.
    pub fn is_dark(&self) -> bool {
        let dark = self
            .world
            .room(self.player.location)
            .map(|room| room.dark)
            .unwrap_or(false);
        dark && !self.has_light()
    }

    fn has_light(&self) -> bool {
        self.player.lamp_on
            && self
                .player
                .inventory
                .iter()
                .filter_map(|id| self.world.item(*id))
                .any(|item| item.light_source)
    }

    /// Lines shown when the game is entered or resumed.
    pub fn welcome(&self) -> Vec<Line> {
        let mut lines = vec![
            Line::heading("ZORK-ish: a very small adventure"),
            Line::muted("Type 'help' for commands or 'quit' to return to the shell."),
            Line::blank(),
        ];
        lines.extend(self.describe_room());
        lines
    }

    /// Handle one typed line.
    pub fn command(&mut self, input: &str) -> Reply {
        let command = Command::parse(input);
        debug!(?command, "adventure command");

        if command.is_action() {
            self.player.moves += 1;
        }

        match command {
            Command::Empty => Reply::default(),
            Command::Go(direction) => Reply::new(self.go(direction)),
            Command::Take(noun) => Reply::new(self.take(&noun)),
            Command::TakeAll => Reply::new(self.take_all()),
            Command::Drop(noun) => Reply::new(self.drop_item(&noun)),
            Command::Open(noun) => Reply::new(self.open(&noun)),
            Command::Move(noun) => Reply::new(self.move_item(&noun)),
            Command::TurnOn(noun) => Reply::new(self.turn(&noun, true)),
            Command::TurnOff(noun) => Reply::new(self.turn(&noun, false)),
            Command::Inventory => Reply::new(self.inventory()),
            Command::Look => Reply::new(self.describe_room()),
            Command::Examine(noun) => Reply::new(self.examine(&noun)),
            Command::Score => Reply::line(self.score_line()),
            Command::Help => Reply::new(help_lines()),
            Command::Quit => Reply::exit(vec![
                Line::info("You leave the adventure. Type 'zork' to pick up where you left off."),
                self.score_line(),
            ]),
            Command::Restart => {
                *self = Self::with_world(map::house());
                let mut lines = vec![Line::info("The world shimmers and resets.")];
                lines.extend(self.describe_room());
                Reply::new(lines)
            }
            Command::Unknown => Reply::error(NOT_UNDERSTOOD),
        }
    }

    // ========================================================================
    // Actions
    // ========================================================================

    fn go(&mut self, direction: Direction) -> Vec<Line> {
        let Some(here) = self.world.room(self.player.location) else {
            return vec![Line::error("You are nowhere.")];
        };
        let Some(&to) = here.exits.get(&direction) else {
            return vec![Line::error("You can't go that way.")];
        };
        // The room being left is what gates movement.
        if self.is_dark() {
            return vec![Line::error(GRUE_WARNING)];
        }
        debug_assert!(self.world.room(to).is_some(), "exit to unknown room {}", to);

        self.player.location = to;
        if let Some(room) = self.world.room_mut(to) {
            if !room.visited {
                room.visited = true;
                self.player.score += room.points;
            }
        }
        self.describe_room()
    }

    fn take(&mut self, noun: &str) -> Vec<Line> {
        if noun.is_empty() {
            return vec![Line::error("What do you want to take?")];
        }
        if let Some(id) = self.find_in_inventory(noun) {
            let name = self.item_name(id);
            return vec![Line::info(format!("You already have the {}.", name))];
        }
        if self.is_dark() {
            return vec![Line::error(DARK_NOTICE)];
        }
        let Some(id) = self.find_in_room(noun) else {
            return vec![Line::error("You don't see that here.")];
        };
        vec![self.pick_up(id)]
    }

    fn take_all(&mut self) -> Vec<Line> {
        if self.is_dark() {
            return vec![Line::error(DARK_NOTICE)];
        }
        let candidates: Vec<ItemId> = self
            .room_items()
            .filter(|item| item.takeable && !item.hidden)
            .map(|item| item.id)
            .collect();
        if candidates.is_empty() {
            return vec![Line::info("There is nothing here to take.")];
        }
        candidates
            .into_iter()
            .map(|id| {
                let name = self.item_name(id);
                let line = self.pick_up(id);
                let style = line.style().unwrap_or(Style::Info);
                Line::styled(format!("{}: {}", name, line.text()), style)
            })
            .collect()
    }

    fn pick_up(&mut self, id: ItemId) -> Line {
        let Some(item) = self.world.item(id) else {
            return Line::error("You don't see that here.");
        };
        if !item.takeable {
            return Line::error(format!("You can't take the {}.", item.name));
        }
        let points = item.points;

        if let Some(room) = self.world.room_mut(self.player.location) {
            room.remove(id);
        }
        self.player.inventory.push(id);
        if points > 0 && self.player.scored_items.insert(id) {
            self.player.score += points;
        }
        Line::success("Taken.")
    }

    fn drop_item(&mut self, noun: &str) -> Vec<Line> {
        if noun.is_empty() {
            return vec![Line::error("What do you want to drop?")];
        }
        let Some(id) = self.find_in_inventory(noun) else {
            return vec![Line::error("You don't have that.")];
        };
        self.player.inventory.retain(|&i| i != id);
        if let Some(room) = self.world.room_mut(self.player.location) {
            room.place(id);
        }
        vec![Line::success("Dropped.")]
    }

    fn open(&mut self, noun: &str) -> Vec<Line> {
        let id = match self.find_reachable(noun) {
            Ok(id) => id,
            Err(lines) => return lines,
        };
        let dark = self.is_dark();
        let Some(item) = self.world.item_mut(id) else {
            return vec![Line::error("You don't see that here.")];
        };
        if !item.openable {
            return vec![Line::error(format!("You can't open the {}.", item.name))];
        }
        if item.open {
            return vec![Line::info(format!("The {} is already open.", item.name))];
        }
        // Nothing is revealed or opened up in the dark, even from a carried item.
        if dark && (!item.contains.is_empty() || !item.opens_exits.is_empty()) {
            return vec![Line::error(DARK_NOTICE)];
        }

        item.open = true;
        let name = item.name;
        let contents = item.contains.clone();
        let exits = item.opens_exits.clone();
        debug!(item = %id, revealed = contents.len(), exits = exits.len(), "opened");

        let mut lines = vec![Line::success(format!("You open the {}.", name))];
        let revealed = self.reveal(&contents);
        if !revealed.is_empty() {
            lines.push(Line::info(format!(
                "Opening the {} reveals: {}.",
                name,
                revealed.join(", ")
            )));
        }
        for link in exits {
            if self.world.add_exit(link) && link.room == self.player.location {
                lines.push(Line::info(format!("A way {} has opened up.", link.direction)));
            }
        }
        lines
    }

    fn move_item(&mut self, noun: &str) -> Vec<Line> {
        let id = match self.find_reachable(noun) {
            Ok(id) => id,
            Err(lines) => return lines,
        };
        let dark = self.is_dark();
        let Some(item) = self.world.item_mut(id) else {
            return vec![Line::error("You don't see that here.")];
        };
        if !item.moveable {
            return vec![Line::error(format!("Moving the {} doesn't accomplish anything.", item.name))];
        }
        if item.moved {
            return vec![Line::info(format!("You've already moved the {}.", item.name))];
        }
        if dark && !item.concealed_under.is_empty() {
            return vec![Line::error(DARK_NOTICE)];
        }

        item.moved = true;
        let name = item.name;
        let concealed = item.concealed_under.clone();

        let mut lines = vec![Line::success(format!("You move the {}.", name))];
        let revealed = self.reveal(&concealed);
        if !revealed.is_empty() {
            lines.push(Line::info(format!(
                "Moving the {} reveals: {}.",
                name,
                revealed.join(", ")
            )));
        }
        lines
    }

    fn turn(&mut self, noun: &str, on: bool) -> Vec<Line> {
        if noun.is_empty() {
            return vec![Line::error(format!(
                "What do you want to turn {}?",
                if on { "on" } else { "off" }
            ))];
        }
        let Some(id) = self.find_in_inventory(noun) else {
            return match self.find_in_room(noun) {
                Some(_) if !self.is_dark() => {
                    vec![Line::error("You need to be holding it first.")]
                }
                _ => vec![Line::error("You don't have that.")],
            };
        };
        let Some(item) = self.world.item(id) else {
            return vec![Line::error("You don't have that.")];
        };
        if !item.light_source {
            return vec![Line::error(format!(
                "You can't turn the {} {}.",
                item.name,
                if on { "on" } else { "off" }
            ))];
        }
        let name = item.name;

        if self.player.lamp_on == on {
            return vec![Line::info(format!(
                "The {} is already {}.",
                name,
                if on { "on" } else { "off" }
            ))];
        }

        let was_dark = self.is_dark();
        self.player.lamp_on = on;
        let mut lines = vec![Line::success(format!(
            "The {} is now {}.",
            name,
            if on { "on" } else { "off" }
        ))];
        if was_dark && !self.is_dark() {
            lines.extend(self.describe_room());
        } else if !was_dark && self.is_dark() {
            lines.push(Line::error(DARK_NOTICE));
        }
        lines
    }

    fn inventory(&self) -> Vec<Line> {
        if self.player.inventory.is_empty() {
            return vec![Line::info("You are empty-handed.")];
        }
        let mut lines = vec![Line::info("You are carrying:")];
        for item in self.player.inventory.iter().filter_map(|id| self.world.item(*id)) {
            let lit = if item.light_source && self.player.lamp_on {
                " (providing light)"
            } else {
                ""
            };
            lines.push(Line::accent(format!("  {}{}", item.name, lit)));
        }
        lines
    }

    fn examine(&self, noun: &str) -> Vec<Line> {
        if noun.is_empty() {
            return vec![Line::error("What do you want to examine?")];
        }
        let id = match self.find_reachable(noun) {
            Ok(id) => id,
            Err(lines) => return lines,
        };
        let Some(item) = self.world.item(id) else {
            return vec![Line::error("You don't see that here.")];
        };

        let mut lines = vec![Line::plain(item.description)];
        if item.light_source {
            let state = if self.player.lamp_on && self.player.carries(id) {
                "on"
            } else {
                "off"
            };
            lines.push(Line::muted(format!("The {} is {}.", item.name, state)));
        }
        if item.weapon {
            lines.push(Line::muted("It would make a decent weapon."));
        }
        if item.openable {
            let state = if item.open { "open" } else { "closed" };
            lines.push(Line::muted(format!("The {} is {}.", item.name, state)));
        }
        lines
    }

    pub fn score_line(&self) -> Line {
        Line::info(format!(
            "Your score is {} out of {}, in {} moves.",
            self.player.score,
            self.world.max_score(),
            self.player.moves
        ))
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn describe_room(&self) -> Vec<Line> {
        let Some(room) = self.world.room(self.player.location) else {
            return vec![Line::error("You are nowhere.")];
        };
        if self.is_dark() {
            return vec![Line::heading(room.name), Line::error(DARK_NOTICE)];
        }

        let mut lines = vec![Line::heading(room.name), Line::plain(room.description)];
        for item in self.room_items().filter(|item| !item.hidden) {
            lines.push(Line::accent(format!("There is a {} here.", item.name)));
        }
        if !room.exits.is_empty() {
            let exits: Vec<&str> = room.exits.keys().map(Direction::name).collect();
            lines.push(Line::muted(format!("Exits: {}", exits.join(", "))));
        }
        lines
    }

    /// Move ids into the current room. Returns the names of newly placed items.
    fn reveal(&mut self, ids: &[ItemId]) -> Vec<&'static str> {
        let mut revealed = Vec::new();
        for &id in ids {
            if self.player.carries(id) {
                continue;
            }
            let placed = match self.world.room_mut(self.player.location) {
                Some(room) => room.place(id),
                None => false,
            };
            if placed {
                if let Some(item) = self.world.item_mut(id) {
                    item.hidden = false;
                    revealed.push(item.name);
                }
            }
        }
        revealed
    }

    fn room_items(&self) -> impl Iterator<Item = &Item> {
        self.world
            .room(self.player.location)
            .into_iter()
            .flat_map(|room| room.items.iter())
            .filter_map(|id| self.world.item(*id))
    }

    fn find_in_room(&self, noun: &str) -> Option<ItemId> {
        self.room_items().find(|i| i.answers_to(noun)).map(|i| i.id)
    }

    fn find_in_inventory(&self, noun: &str) -> Option<ItemId> {
        self.player
            .inventory
            .iter()
            .filter_map(|id| self.world.item(*id))
            .find(|i| i.answers_to(noun))
            .map(|i| i.id)
    }

    /// An item in hand, or in the room when there is light to see it.
    fn find_reachable(&self, noun: &str) -> Result<ItemId, Vec<Line>> {
        if noun.is_empty() {
            return Err(vec![Line::error("You need to say what.")]);
        }
        if let Some(id) = self.find_in_inventory(noun) {
            return Ok(id);
        }
        if self.is_dark() {
            return Err(vec![Line::error(DARK_NOTICE)]);
        }
        self.find_in_room(noun)
            .ok_or_else(|| vec![Line::error("You don't see that here.")])
    }

    fn item_name(&self, id: ItemId) -> &'static str {
        self.world.item(id).map(|i| i.name).unwrap_or("thing")
    }
}

fn help_lines() -> Vec<Line> {
    vec![
        Line::heading("Adventure commands"),
        Line::plain("  north, south, east, west, ne, nw, se, sw, up, down (or n, s, e, w, u, d)"),
        Line::plain("  take <item>, take all, drop <item>"),
        Line::plain("  open <item>, move <item>"),
        Line::plain("  turn on <item>, turn off <item>"),
        Line::plain("  look, examine <item>, inventory (i)"),
        Line::plain("  score, restart, quit"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::map::{ATTIC, BEHIND_HOUSE, KITCHEN, LIVING_ROOM, WEST_OF_HOUSE};

    fn texts(reply: &Reply) -> Vec<&str> {
        reply.lines.iter().map(Line::text).collect()
    }

    fn run(game: &mut Adventure, commands: &[&str]) {
        for c in commands {
            game.command(c);
        }
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!(Command::parse("n"), Command::Go(Direction::North));
        assert_eq!(Command::parse("go Up"), Command::Go(Direction::Up));
        assert_eq!(Command::parse("take the lamp"), Command::Take("lamp".to_string()));
        assert_eq!(Command::parse("pick up the brass lantern"), Command::Take("brass lantern".to_string()));
        assert_eq!(Command::parse("turn lamp on"), Command::TurnOn("lamp".to_string()));
        assert_eq!(Command::parse("turn off lamp"), Command::TurnOff("lamp".to_string()));
        assert_eq!(Command::parse("look at rug"), Command::Examine("rug".to_string()));
        assert_eq!(Command::parse("get all"), Command::TakeAll);
        assert_eq!(Command::parse("dance"), Command::Unknown);
    }

    #[test]
    fn test_cant_go_that_way() {
        let mut game = Adventure::new();
        let reply = game.command("east");
        assert_eq!(texts(&reply), vec!["You can't go that way."]);
        assert_eq!(game.player().location, WEST_OF_HOUSE);
    }

    #[test]
    fn test_unknown_verb() {
        let mut game = Adventure::new();
        let reply = game.command("xyzzy");
        assert_eq!(texts(&reply), vec![NOT_UNDERSTOOD]);
    }

    #[test]
    fn test_mailbox_reveal_is_one_shot() {
        let mut game = Adventure::new();
        let first = game.command("open mailbox");
        assert!(texts(&first).iter().any(|t| t.contains("leaflet")));

        let second = game.command("open mailbox");
        assert_eq!(texts(&second), vec!["The small mailbox is already open."]);

        let room = game.world().room(WEST_OF_HOUSE).unwrap();
        let leaflets = room.items.iter().filter(|i| i.0 == "leaflet").count();
        assert_eq!(leaflets, 1);
    }

    #[test]
    fn test_window_adds_exit() {
        let mut game = Adventure::new();
        run(&mut game, &["n", "e"]);
        assert_eq!(game.player().location, BEHIND_HOUSE);
        assert_eq!(texts(&game.command("w")), vec!["You can't go that way."]);

        game.command("open window");
        game.command("w");
        assert_eq!(game.player().location, KITCHEN);
        assert_eq!(game.player().score, 10);

        game.command("e");
        assert_eq!(game.player().location, BEHIND_HOUSE);
    }

    #[test]
    fn test_dark_room_blocks_leaving_without_light() {
        let mut game = Adventure::new();
        run(&mut game, &["n", "e", "open window", "w", "up"]);
        assert_eq!(game.player().location, ATTIC);
        assert!(game.is_dark());

        let look = game.command("look");
        assert!(texts(&look).contains(&DARK_NOTICE));
        assert_eq!(texts(&game.command("take rope")), vec![DARK_NOTICE]);

        let reply = game.command("down");
        assert_eq!(texts(&reply), vec![GRUE_WARNING]);
        assert_eq!(game.player().location, ATTIC);
    }

    #[test]
    fn test_lit_lamp_lets_player_leave_dark_room() {
        let mut game = Adventure::new();
        run(&mut game, &["n", "e", "open window", "w", "w", "take lamp", "e", "up"]);
        assert!(game.is_dark());

        game.command("turn on lamp");
        assert!(!game.is_dark());
        game.command("take knife");
        assert!(game.player().carries(ItemId("knife")));

        game.command("down");
        assert_eq!(game.player().location, KITCHEN);
    }

    #[test]
    fn test_carried_sack_stays_shut_in_the_dark() {
        let mut game = Adventure::new();
        run(&mut game, &["n", "e", "open window", "w", "take sack", "up"]);
        assert!(game.is_dark());

        let reply = game.command("open sack");
        assert_eq!(texts(&reply), vec![DARK_NOTICE]);
        assert!(!game.world().item(ItemId("sack")).unwrap().open);
        let attic = game.world().room(ATTIC).unwrap();
        assert!(!attic.has_item(ItemId("garlic")));
        assert!(!attic.has_item(ItemId("lunch")));
    }

    #[test]
    fn test_dropping_lit_lamp_in_dark_room_blocks_leaving() {
        let mut game = Adventure::new();
        run(&mut game, &["n", "e", "open window", "w", "w", "take lamp", "e", "up", "turn on lamp"]);
        assert!(!game.is_dark());

        game.command("drop lamp");
        assert!(game.is_dark());
        let reply = game.command("down");
        assert_eq!(texts(&reply), vec![GRUE_WARNING]);
        assert_eq!(game.player().location, ATTIC);
    }

    #[test]
    fn test_lamp_on_floor_is_unseen_in_the_dark() {
        let mut game = Adventure::new();
        run(&mut game, &["n", "e", "open window", "w", "w", "take lamp", "e", "up", "drop lamp"]);
        assert!(game.is_dark());

        let reply = game.command("turn on lamp");
        assert_eq!(texts(&reply), vec!["You don't have that."]);
        assert!(!game.player().lamp_on);
    }

    #[test]
    fn test_rug_and_trap_door() {
        let mut game = Adventure::new();
        run(&mut game, &["n", "e", "open window", "w", "w"]);
        assert_eq!(game.player().location, LIVING_ROOM);

        game.command("move rug");
        let again = game.command("move rug");
        assert_eq!(texts(&again), vec!["You've already moved the oriental rug."]);
        let doors = game
            .world()
            .room(LIVING_ROOM)
            .unwrap()
            .items
            .iter()
            .filter(|i| i.0 == "trap_door")
            .count();
        assert_eq!(doors, 1);

        game.command("open trap door");
        assert!(game.world().room(LIVING_ROOM).unwrap().exits.contains_key(&Direction::Down));
    }

    #[test]
    fn test_take_and_drop() {
        let mut game = Adventure::new();
        assert_eq!(texts(&game.command("take mailbox")), vec!["You can't take the small mailbox."]);
        assert_eq!(texts(&game.command("drop leaflet")), vec!["You don't have that."]);

        game.command("open mailbox");
        assert_eq!(texts(&game.command("take leaflet")), vec!["Taken."]);
        assert!(game.player().carries(ItemId("leaflet")));

        game.command("drop leaflet");
        assert!(!game.player().carries(ItemId("leaflet")));
        assert!(game.world().room(WEST_OF_HOUSE).unwrap().has_item(ItemId("leaflet")));
    }

    #[test]
    fn test_lamp_must_be_carried() {
        let mut game = Adventure::new();
        run(&mut game, &["n", "e", "open window", "w", "w"]);
        let reply = game.command("turn on lamp");
        assert_eq!(texts(&reply), vec!["You need to be holding it first."]);
        assert!(!game.player().lamp_on);
    }

    #[test]
    fn test_treasure_points_once() {
        let mut game = Adventure::new();
        run(&mut game, &["w", "up", "take egg", "drop egg", "take egg", "score"]);
        assert_eq!(game.player().score, 5);
        assert_eq!(game.player().moves, 5);
    }

    #[test]
    fn test_restart_resets_world() {
        let mut game = Adventure::new();
        run(&mut game, &["open mailbox", "take leaflet", "w"]);
        game.command("restart");
        assert_eq!(game.player().location, WEST_OF_HOUSE);
        assert!(game.player().inventory.is_empty());
        assert_eq!(game.player().moves, 0);
    }

    #[test]
    fn test_quit_exits() {
        let mut game = Adventure::new();
        assert!(game.command("quit").exit);
        assert!(!game.command("look").exit);
    }
}

//! The built-in house-and-forest map.

use super::{Direction, Item, Room, RoomId, World};

pub const WEST_OF_HOUSE: RoomId = RoomId("west_of_house");
pub const NORTH_OF_HOUSE: RoomId = RoomId("north_of_house");
pub const SOUTH_OF_HOUSE: RoomId = RoomId("south_of_house");
pub const BEHIND_HOUSE: RoomId = RoomId("behind_house");
pub const KITCHEN: RoomId = RoomId("kitchen");
pub const LIVING_ROOM: RoomId = RoomId("living_room");
pub const ATTIC: RoomId = RoomId("attic");
pub const CELLAR: RoomId = RoomId("cellar");
pub const GALLERY: RoomId = RoomId("gallery");
pub const FOREST_PATH: RoomId = RoomId("forest_path");
pub const UP_A_TREE: RoomId = RoomId("up_a_tree");

lazy_static::lazy_static! {
    static ref HOUSE: World = build_house();
}

/// A fresh copy of the house map.
pub fn house() -> World {
    HOUSE.clone()
}

fn build_house() -> World {
    use Direction::*;

    let mut world = World::new(WEST_OF_HOUSE);

    // Outside
    world.add_room(
        Room::new(
            WEST_OF_HOUSE,
            "West of House",
            "You are standing in an open field west of a white house, with a boarded front door.",
        )
        .exit(North, NORTH_OF_HOUSE)
        .exit(South, SOUTH_OF_HOUSE)
        .exit(West, FOREST_PATH)
        .with_items(&["mailbox"]),
    );
    world.add_room(
        Room::new(
            NORTH_OF_HOUSE,
            "North of House",
            "You are facing the north side of a white house. There is no door here, and all the windows are boarded up. A narrow path winds north into the trees.",
        )
        .exit(West, WEST_OF_HOUSE)
        .exit(East, BEHIND_HOUSE)
        .exit(North, FOREST_PATH),
    );
    world.add_room(
        Room::new(
            SOUTH_OF_HOUSE,
            "South of House",
            "You are facing the south side of a white house. There is no door here, and all the windows are boarded.",
        )
        .exit(West, WEST_OF_HOUSE)
        .exit(East, BEHIND_HOUSE),
    );
    world.add_room(
        Room::new(
            BEHIND_HOUSE,
            "Behind House",
            "You are behind the white house. In one corner of the house there is a small window which is slightly ajar.",
        )
        .exit(North, NORTH_OF_HOUSE)
        .exit(South, SOUTH_OF_HOUSE)
        .with_items(&["window"]),
    );
    world.add_room(
        Room::new(
            FOREST_PATH,
            "Forest Path",
            "This is a path winding through a dimly lit forest. One particularly large tree with some low branches stands at the edge of the path.",
        )
        .exit(East, WEST_OF_HOUSE)
        .exit(South, NORTH_OF_HOUSE)
        .exit(Up, UP_A_TREE),
    );
    world.add_room(
        Room::new(
            UP_A_TREE,
            "Up a Tree",
            "You are about ten feet above the ground nestled among some large branches.",
        )
        .exit(Down, FOREST_PATH)
        .with_items(&["egg"]),
    );

    // Inside
    world.add_room(
        Room::new(
            KITCHEN,
            "Kitchen",
            "You are in the kitchen of the white house. A table seems to have been used recently for the preparation of food. A passage leads to the west and a dark staircase can be seen leading upward.",
        )
        .exit(West, LIVING_ROOM)
        .exit(Up, ATTIC)
        .with_items(&["sack"])
        .worth(10),
    );
    world.add_room(
        Room::new(
            LIVING_ROOM,
            "Living Room",
            "You are in the living room. There is a doorway to the east and a large oriental rug in the center of the room.",
        )
        .exit(East, KITCHEN)
        .with_items(&["lamp", "sword", "rug"]),
    );
    world.add_room(
        Room::new(
            ATTIC,
            "Attic",
            "This is the attic. The only exit is a stairway leading down.",
        )
        .exit(Down, KITCHEN)
        .with_items(&["rope", "knife"])
        .dark(),
    );
    world.add_room(
        Room::new(
            CELLAR,
            "Cellar",
            "You are in a dark and damp cellar with a narrow passageway leading south.",
        )
        .exit(South, GALLERY)
        .dark()
        .worth(25),
    );
    world.add_room(
        Room::new(
            GALLERY,
            "Gallery",
            "This is an art gallery. Most of the paintings have been stolen by vandals with exceptional taste. Light filters in from a skylight far above.",
        )
        .exit(North, CELLAR)
        .with_items(&["painting"]),
    );

    world.add_item(
        Item::new("mailbox", "small mailbox", "It's a small mailbox.")
            .with_aliases(&["mailbox", "box"])
            .openable()
            .containing(&["leaflet"]),
    );
    world.add_item(
        Item::new(
            "leaflet",
            "leaflet",
            "\"WELCOME! This little adventure is hidden in the shell. Explore the house, find the treasures, and mind the dark.\"",
        )
        .with_aliases(&["pamphlet", "mail"])
        .takeable(),
    );
    world.add_item(
        Item::new("window", "window", "The window is slightly ajar, but not enough to climb through.")
            .hidden()
            .openable()
            .opens_exit(BEHIND_HOUSE, West, KITCHEN)
            .opens_exit(KITCHEN, East, BEHIND_HOUSE),
    );
    world.add_item(
        Item::new("sack", "brown sack", "An elongated brown sack, smelling of hot peppers.")
            .with_aliases(&["sack", "bag"])
            .takeable()
            .openable()
            .containing(&["garlic", "lunch"]),
    );
    world.add_item(
        Item::new("garlic", "clove of garlic", "It smells strongly of garlic.")
            .with_aliases(&["garlic", "clove"])
            .takeable(),
    );
    world.add_item(
        Item::new("lunch", "lunch", "A hot pepper sandwich.")
            .with_aliases(&["sandwich", "food"])
            .takeable(),
    );
    world.add_item(
        Item::new("lamp", "brass lantern", "A battery-powered brass lantern.")
            .with_aliases(&["lamp", "lantern", "light"])
            .takeable()
            .light_source(),
    );
    world.add_item(
        Item::new("sword", "elvish sword", "An elvish sword of great antiquity.")
            .with_aliases(&["sword", "blade"])
            .takeable()
            .weapon(),
    );
    world.add_item(
        Item::new("rug", "oriental rug", "A large, heavy oriental rug.")
            .with_aliases(&["rug", "carpet"])
            .moveable()
            .concealing(&["trap_door"]),
    );
    world.add_item(
        Item::new("trap_door", "trap door", "A dusty trap door set into the floor.")
            .with_aliases(&["trapdoor", "door", "trap"])
            .openable()
            .opens_exit(LIVING_ROOM, Down, CELLAR)
            .opens_exit(CELLAR, Up, LIVING_ROOM),
    );
    world.add_item(
        Item::new("rope", "rope", "A large coil of rope.")
            .with_aliases(&["coil"])
            .takeable(),
    );
    world.add_item(
        Item::new("knife", "nasty knife", "A nasty-looking knife.")
            .with_aliases(&["knife"])
            .takeable()
            .weapon(),
    );
    world.add_item(
        Item::new("painting", "painting", "A painting of unparalleled beauty.")
            .with_aliases(&["art", "canvas"])
            .takeable()
            .worth(10),
    );
    world.add_item(
        Item::new("egg", "jewel-encrusted egg", "A large egg encrusted with precious jewels.")
            .with_aliases(&["egg"])
            .takeable()
            .worth(5),
    );

    debug_assert!(world.validate().is_empty(), "house map: {:?}", world.validate());
    world
}

//! The shipped dungeon: item and monster templates plus the room graph.
//!
//! Only `START_ROOM_ID` and `EXIT_ROOM_ID` are structural requirements; the
//! remaining rooms are the stock campaign and can be rearranged freely as
//! long as every referenced id stays defined.

use crate::engine::catalog::{ItemKind, ItemTemplate, MonsterTemplate};
use crate::engine::types::{Chest, Direction, Room};

/// Where new characters wake up.
pub const START_ROOM_ID: &str = "gatehouse";

/// Reaching this room with sufficient treasure ends the game in victory.
pub const EXIT_ROOM_ID: &str = "sunlit_breach";

/// The monster the banishment scroll works against.
pub const BOSS_MONSTER_ID: &str = "ashen_tyrant";

/// Minimum single-item value that counts as "sufficient treasure" at the exit.
pub const WIN_TREASURE_VALUE: u32 = 150;

/// Weapon tiers from best to worst.
pub fn weapon_precedence() -> Vec<String> {
    ["enchanted_blade", "war_axe", "short_sword", "rusty_dagger"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn builtin_items() -> Vec<ItemTemplate> {
    vec![
        ItemTemplate::new(
            "rusty_dagger",
            "Rusty Dagger",
            "Pitted and dull, but it still finds the gaps.",
            3,
            5,
            ItemKind::Weapon { bonus: 2 },
        ),
        ItemTemplate::new(
            "short_sword",
            "Short Sword",
            "Standard garrison issue, recently sharpened.",
            6,
            20,
            ItemKind::Weapon { bonus: 4 },
        ),
        ItemTemplate::new(
            "war_axe",
            "War Axe",
            "A heavy double-bladed axe with a cracked leather grip.",
            10,
            45,
            ItemKind::Weapon { bonus: 6 },
        ),
        ItemTemplate::new(
            "enchanted_blade",
            "Enchanted Blade",
            "Faint runes crawl along the fuller when you hold it up to the light.",
            7,
            120,
            ItemKind::Weapon { bonus: 9 },
        ),
        ItemTemplate::new(
            "wooden_shield",
            "Wooden Shield",
            "Scarred planking banded with iron. It has stopped worse.",
            8,
            15,
            ItemKind::Shield { defense: 2 },
        ),
        ItemTemplate::new(
            "iron_shield",
            "Iron Shield",
            "Solid, heavy, and dented in the shape of something's jaw.",
            12,
            40,
            ItemKind::Shield { defense: 4 },
        ),
        ItemTemplate::new(
            "healing_potion",
            "Healing Potion",
            "A stoppered vial of red liquid that smells of summer herbs.",
            2,
            25,
            ItemKind::Potion { heal: 50 },
        ),
        ItemTemplate::new(
            "minor_tonic",
            "Minor Tonic",
            "Cloudy and bitter. Field medics swear by it.",
            1,
            10,
            ItemKind::Potion { heal: 20 },
        ),
        ItemTemplate::new(
            "fire_scroll",
            "Fire Scroll",
            "The parchment is warm to the touch and the ink smolders.",
            1,
            30,
            ItemKind::FireScroll { min: 8, max: 15 },
        ),
        ItemTemplate::new(
            "banishment_scroll",
            "Scroll of Banishment",
            "Dense script in a dead tongue. One word of it is underlined twice.",
            1,
            80,
            ItemKind::BanishScroll { min: 6, max: 10 },
        ),
        ItemTemplate::new(
            "bomb",
            "Clay Bomb",
            "A fist-sized sphere packed with blasting powder and bad intentions.",
            4,
            35,
            ItemKind::Bomb {
                min: 10,
                max: 18,
                splash_min: 2,
                splash_max: 5,
            },
        ),
        ItemTemplate::new(
            "silver_key",
            "Silver Key",
            "Finely worked, with a treasury stamp on the bow.",
            1,
            5,
            ItemKind::Key,
        ),
        ItemTemplate::new(
            "brass_key",
            "Brass Key",
            "Green with age. The wards are unusually long.",
            1,
            5,
            ItemKind::Key,
        ),
        ItemTemplate::new(
            "skeleton_key",
            "Skeleton Key",
            "A master key cut from black iron. Locks simply give up.",
            1,
            60,
            ItemKind::SkeletonKey,
        ),
        ItemTemplate::new(
            "lockpick",
            "Lockpick",
            "A sprung steel pick. Good for one careful attempt, maybe.",
            1,
            8,
            ItemKind::Lockpick,
        ),
        ItemTemplate::new(
            "torch",
            "Torch",
            "Pitch-soaked and ready to burn for hours.",
            2,
            3,
            ItemKind::Light,
        ),
        ItemTemplate::new(
            "lantern",
            "Storm Lantern",
            "Glass intact, wick trimmed. Sheds a steady circle of light.",
            3,
            12,
            ItemKind::Light,
        ),
        ItemTemplate::new(
            "ember_amulet",
            "Ember Amulet",
            "A dull red stone that stays cool even near open flame.",
            1,
            70,
            ItemKind::Amulet { fire_resist: 5 },
        ),
        ItemTemplate::new(
            "jeweled_crown",
            "Jeweled Crown",
            "Heavy with garnets. Whoever wore it ruled more than this keep.",
            5,
            200,
            ItemKind::Treasure,
        ),
        ItemTemplate::new(
            "golden_chalice",
            "Golden Chalice",
            "Chased gold, rim worn thin by generations of toasts.",
            4,
            160,
            ItemKind::Treasure,
        ),
        ItemTemplate::new(
            "dragon_hoard_gem",
            "Hoard Gem",
            "A flawless gem the size of a goose egg. It holds the light.",
            2,
            250,
            ItemKind::Treasure,
        ),
        ItemTemplate::new(
            "old_bone",
            "Old Bone",
            "A femur, gnawed. Probably not a collector's item.",
            1,
            1,
            ItemKind::Misc,
        ),
    ]
}

pub fn builtin_monsters() -> Vec<MonsterTemplate> {
    vec![
        MonsterTemplate::new(
            "giant_rat",
            "Giant Rat",
            "Dog-sized, mangy, and entirely unafraid of you.",
            10,
            (2, 5),
            0,
            5,
            0.8,
        )
        .with_loot("minor_tonic", 0.2),
        MonsterTemplate::new(
            "cave_bat",
            "Cave Bat",
            "A leathery blur that screams when cornered.",
            8,
            (1, 4),
            0,
            4,
            0.9,
        ),
        MonsterTemplate::new(
            "goblin_scout",
            "Goblin Scout",
            "Wiry and quick, armed with a notched blade.",
            18,
            (3, 8),
            1,
            12,
            0.7,
        )
        .with_loot("rusty_dagger", 0.3),
        MonsterTemplate::new(
            "skeleton_guard",
            "Skeleton Guard",
            "Still at its post after all these years, and still armed.",
            25,
            (5, 10),
            2,
            20,
            0.6,
        )
        .with_loot("old_bone", 0.5),
        MonsterTemplate::new(
            "venom_spider",
            "Venom Spider",
            "Chitin glistening, fangs dripping something you'd rather not touch.",
            16,
            (2, 6),
            1,
            15,
            0.75,
        ),
        MonsterTemplate::new(
            "moat_troll",
            "Moat Troll",
            "Wounds close on it even as you watch. It seems patient.",
            40,
            (6, 12),
            3,
            35,
            0.5,
        )
        .with_regeneration(3)
        .with_loot("war_axe", 0.25),
        MonsterTemplate::new(
            "wraith",
            "Wraith",
            "A cold absence in the shape of a man. It drinks warmth.",
            30,
            (4, 9),
            2,
            30,
            0.55,
        )
        .with_life_drain()
        .with_loot("ember_amulet", 0.2),
        MonsterTemplate::new(
            "fire_drake",
            "Fire Drake",
            "A cat-sized cousin of true dragons, all spite and sparks.",
            45,
            (5, 11),
            3,
            45,
            0.4,
        )
        .with_fire_breath(0.35, 10, 18)
        .with_loot("fire_scroll", 0.4),
        MonsterTemplate::new(
            BOSS_MONSTER_ID,
            "Ashen Tyrant",
            "The old wyrm of the keep. Its scales are scorched stone, its gaze a furnace.",
            80,
            (8, 16),
            4,
            100,
            0.25,
        )
        .with_fire_breath(0.3, 12, 20)
        .with_boss_hoard(&["dragon_hoard_gem", "jeweled_crown", "golden_chalice"]),
    ]
}

/// Build the stock sixteen-room keep.
pub fn builtin_world() -> Vec<Room> {
    let mut rooms = Vec::new();

    rooms.push(
        Room::new(
            START_ROOM_ID,
            "Ruined Gatehouse",
            "Rubble chokes the portcullis behind you; there is no way back out. \
             Ahead, the keep's great hall yawns open, its doors long since rotted \
             off their hinges.",
        )
        .with_exit(Direction::North, "great_hall")
        .with_item("torch")
        .with_item("rusty_dagger"),
    );

    rooms.push(
        Room::new(
            "great_hall",
            "Great Hall",
            "A vaulted hall with a collapsed banquet table and tapestries gone to \
             moth and ruin. Doorways lead off in every direction, and a cold \
             draft rises from a stairwell in the floor.",
        )
        .with_exit(Direction::South, START_ROOM_ID)
        .with_exit(Direction::North, "fountain_court")
        .with_exit(Direction::East, "armory")
        .with_exit(Direction::West, "kitchens")
        .with_exit(Direction::Down, "cellar"),
    );

    rooms.push(
        Room::new(
            "armory",
            "Armory",
            "Racks that once held a garrison's worth of steel stand mostly bare. \
             What remains is rust, except where someone kept a few pieces oiled.",
        )
        .with_exit(Direction::West, "great_hall")
        .with_item("short_sword")
        .with_item("wooden_shield")
        .with_chest(Chest::unlocked(&["bomb", "iron_shield"]))
        .with_spawn("skeleton_guard", 0.6),
    );

    rooms.push(
        Room::new(
            "kitchens",
            "Kitchens",
            "Great hearths full of cold ash. Something has been at the sacks of \
             grain, and recently.",
        )
        .with_exit(Direction::East, "great_hall")
        .with_exit(Direction::North, "larder")
        .with_item("minor_tonic")
        .with_spawn("giant_rat", 0.75),
    );

    rooms.push(
        Room::new(
            "larder",
            "Larder",
            "Shelves of swollen preserves and hanging hooks. The air is thick \
             and sweet with rot.",
        )
        .with_exit(Direction::South, "kitchens")
        .with_dark()
        .with_chest(Chest::unlocked(&["healing_potion", "old_bone"]))
        .with_spawn("giant_rat", 0.5),
    );

    rooms.push(
        Room::new(
            "cellar",
            "Cellar",
            "Barrel staves and broken racking litter the floor. The dark here is \
             older than the keep above it.",
        )
        .with_exit(Direction::Up, "great_hall")
        .with_exit(Direction::North, "crypt")
        .with_dark()
        .with_item("lockpick")
        .with_spawn("cave_bat", 0.8),
    );

    rooms.push(
        Room::new(
            "crypt",
            "Crypt",
            "Stone effigies lie on their biers with swords clasped to their \
             chests. One bier is empty, its lid shoved aside from within.",
        )
        .with_exit(Direction::South, "cellar")
        .with_exit(Direction::East, "ossuary")
        .with_dark()
        .with_chest(Chest::locked_with_key("brass_key", &["jeweled_crown", "ember_amulet"]))
        .with_spawn("wraith", 0.7),
    );

    rooms.push(
        Room::new(
            "ossuary",
            "Ossuary",
            "Bones stacked floor to ceiling in patterns that were once devotional \
             and are now merely unsettling.",
        )
        .with_exit(Direction::West, "crypt")
        .with_dark()
        .with_item("brass_key")
        .with_chest(Chest {
            locked: true,
            key: None,
            contents: vec!["enchanted_blade".to_string()],
        })
        .with_spawn("skeleton_guard", 0.9),
    );

    rooms.push(
        Room::new(
            "fountain_court",
            "Fountain Court",
            "An open courtyard around a dry fountain. Ivy has pulled down half \
             the colonnade, and birds nest in the rest.",
        )
        .with_exit(Direction::South, "great_hall")
        .with_exit(Direction::North, "overgrown_garden")
        .with_exit(Direction::East, "guard_post")
        .with_item("healing_potion"),
    );

    rooms.push(
        Room::new(
            "guard_post",
            "Guard Post",
            "A squat tower room with arrow slits and an overturned brazier. \
             Dice lie scattered mid-game on the table.",
        )
        .with_exit(Direction::West, "fountain_court")
        .with_exit(Direction::Up, "watchtower")
        .with_item("silver_key")
        .with_spawn("goblin_scout", 0.8),
    );

    rooms.push(
        Room::new(
            "watchtower",
            "Watchtower",
            "Wind hisses through the broken crenellations. From up here the whole \
             ruin spreads out below, and something has been nesting in the rafters.",
        )
        .with_exit(Direction::Down, "guard_post")
        .with_item("fire_scroll")
        .with_item("bomb")
        .with_spawn("fire_drake", 0.55),
    );

    rooms.push(
        Room::new(
            "overgrown_garden",
            "Overgrown Garden",
            "Hedges grown into walls, paths lost under a decade of bramble. Webs \
             the size of bedsheets sag between the topiary.",
        )
        .with_exit(Direction::South, "fountain_court")
        .with_exit(Direction::West, "chapel")
        .with_exit(Direction::North, "treasury")
        .with_spawn("venom_spider", 0.85),
    );

    rooms.push(
        Room::new(
            "chapel",
            "Chapel",
            "Candle stubs and a cracked altar. The silence here has a different \
             quality, as if something is still listening.",
        )
        .with_exit(Direction::East, "overgrown_garden")
        .with_item("banishment_scroll")
        .with_item("healing_potion"),
    );

    rooms.push(
        Room::new(
            "treasury",
            "Treasury",
            "The strongroom door hangs open on a silver lock. Empty coffers \
             everywhere, yet not quite everything was carried off.",
        )
        .with_exit(Direction::South, "overgrown_garden")
        .with_exit(Direction::East, "dragon_den")
        .with_door_key("silver_key")
        .with_item("golden_chalice")
        .with_item("skeleton_key")
        .with_spawn("moat_troll", 0.65),
    );

    rooms.push(
        Room::new(
            "dragon_den",
            "Dragon's Den",
            "The old throne room, walls fused to glass by ancient heat. Coins lie \
             melted into the floor in drifts, and the air tastes of cinders.",
        )
        .with_exit(Direction::West, "treasury")
        .with_exit(Direction::East, EXIT_ROOM_ID)
        .with_boss_lair(BOSS_MONSTER_ID),
    );

    rooms.push(
        Room::new(
            EXIT_ROOM_ID,
            "Sunlit Breach",
            "A whole section of wall has collapsed outward, and beyond the rubble \
             lies open moorland and morning light. The way out, at last.",
        )
        .with_exit(Direction::West, "dragon_den"),
    );

    rooms
}

// ═══════════════════════════════════════════════════════════════════════
// Static map data — the 42-territory world board.
// All territory properties that never change during a game.
// ═══════════════════════════════════════════════════════════════════════

use crate::types::{ContinentId, TerritoryId};

/// Static description of a territory (compile-time constant).
#[derive(Debug, Clone)]
pub struct TerritoryDef {
    pub id: TerritoryId,
    /// snake_case key used by fixtures and the control API
    pub key: &'static str,
    pub name: &'static str,
    pub continent: ContinentId,
    pub adjacent: &'static [TerritoryId],
}

/// Static description of a standard continent.
#[derive(Debug, Clone)]
pub struct ContinentDef {
    pub id: ContinentId,
    pub name: &'static str,
    pub bonus: u32,
    pub territories: &'static [TerritoryId],
}

// ── Territory ID constants ─────────────────────────────────────────────
// Ordered exactly like the fixture tables: North America (0–8),
// South America (9–12), Africa (13–18), Europe (19–25), Asia (26–37),
// Australia (38–41).

// NORTH AMERICA
pub const ALASKA: TerritoryId              = TerritoryId(0);
pub const GREENLAND: TerritoryId           = TerritoryId(1);
pub const NORTHWEST_TERRITORY: TerritoryId = TerritoryId(2);
pub const ALBERTA: TerritoryId             = TerritoryId(3);
pub const ONTARIO: TerritoryId             = TerritoryId(4);
pub const QUEBEC: TerritoryId              = TerritoryId(5);
pub const WESTERN_US: TerritoryId          = TerritoryId(6);
pub const EASTERN_US: TerritoryId          = TerritoryId(7);
pub const CENTRAL_AMERICA: TerritoryId     = TerritoryId(8);
// SOUTH AMERICA
pub const VENEZUELA: TerritoryId           = TerritoryId(9);
pub const PERU: TerritoryId                = TerritoryId(10);
pub const BRAZIL: TerritoryId              = TerritoryId(11);
pub const ARGENTINA: TerritoryId           = TerritoryId(12);
// AFRICA
pub const NORTH_AFRICA: TerritoryId        = TerritoryId(13);
pub const EGYPT: TerritoryId               = TerritoryId(14);
pub const EAST_AFRICA: TerritoryId         = TerritoryId(15);
pub const CONGO: TerritoryId               = TerritoryId(16);
pub const SOUTH_AFRICA: TerritoryId        = TerritoryId(17);
pub const MADAGASCAR: TerritoryId          = TerritoryId(18);
// EUROPE
pub const SCANDINAVIA: TerritoryId         = TerritoryId(19);
pub const WESTERN_EUROPE: TerritoryId      = TerritoryId(20);
pub const GREAT_BRITAIN: TerritoryId       = TerritoryId(21);
pub const SOUTHERN_EUROPE: TerritoryId     = TerritoryId(22);
pub const NORTHERN_EUROPE: TerritoryId     = TerritoryId(23);
pub const UKRAINE: TerritoryId             = TerritoryId(24);
pub const ICELAND: TerritoryId             = TerritoryId(25);
// ASIA
pub const URAL: TerritoryId                = TerritoryId(26);
pub const SIBERIA: TerritoryId             = TerritoryId(27);
pub const AFGHANISTAN: TerritoryId         = TerritoryId(28);
pub const MIDDLE_EAST: TerritoryId         = TerritoryId(29);
pub const IRKUTSK: TerritoryId             = TerritoryId(30);
pub const KAMCHATKA: TerritoryId           = TerritoryId(31);
pub const YAKUTSK: TerritoryId             = TerritoryId(32);
pub const JAPAN: TerritoryId               = TerritoryId(33);
pub const SIAM: TerritoryId                = TerritoryId(34);
pub const MONGOLIA: TerritoryId            = TerritoryId(35);
pub const CHINA: TerritoryId               = TerritoryId(36);
pub const INDIA: TerritoryId               = TerritoryId(37);
// AUSTRALIA
pub const INDONESIA: TerritoryId           = TerritoryId(38);
pub const NEW_GUINEA: TerritoryId          = TerritoryId(39);
pub const WESTERN_AUSTRALIA: TerritoryId   = TerritoryId(40);
pub const EASTERN_AUSTRALIA: TerritoryId   = TerritoryId(41);

pub const NUM_TERRITORIES: usize = 42;

// ── Continent ID constants ─────────────────────────────────────────────

pub const NORTH_AMERICA: ContinentId = ContinentId(0);
pub const SOUTH_AMERICA: ContinentId = ContinentId(1);
pub const AFRICA: ContinentId        = ContinentId(2);
pub const EUROPE: ContinentId        = ContinentId(3);
pub const ASIA: ContinentId          = ContinentId(4);
pub const AUSTRALIA: ContinentId     = ContinentId(5);

pub const NUM_CONTINENTS: usize = 6;

// ── Static territory definitions ───────────────────────────────────────

macro_rules! territory {
    ($key:expr, $name:expr, $id:expr, $cont:expr, adj: [$($a:expr),*]) => {
        TerritoryDef {
            id: $id, key: $key, name: $name, continent: $cont,
            adjacent: &[$($a),*],
        }
    };
}

pub static TERRITORIES: [TerritoryDef; NUM_TERRITORIES] = [
    // ═══ NORTH AMERICA ═══
    territory!("alaska", "Alaska", ALASKA, NORTH_AMERICA,
        adj: [NORTHWEST_TERRITORY, ALBERTA, KAMCHATKA]),
    territory!("greenland", "Greenland", GREENLAND, NORTH_AMERICA,
        adj: [NORTHWEST_TERRITORY, ONTARIO, QUEBEC, ICELAND]),
    territory!("northwest_territory", "Northwest Territory", NORTHWEST_TERRITORY, NORTH_AMERICA,
        adj: [ALASKA, GREENLAND, ALBERTA, ONTARIO]),
    territory!("alberta", "Alberta", ALBERTA, NORTH_AMERICA,
        adj: [ALASKA, NORTHWEST_TERRITORY, ONTARIO, WESTERN_US]),
    territory!("ontario", "Ontario", ONTARIO, NORTH_AMERICA,
        adj: [GREENLAND, NORTHWEST_TERRITORY, ALBERTA, QUEBEC, WESTERN_US, EASTERN_US]),
    territory!("quebec", "Quebec", QUEBEC, NORTH_AMERICA,
        adj: [GREENLAND, ONTARIO, EASTERN_US]),
    territory!("western_us", "Western United States", WESTERN_US, NORTH_AMERICA,
        adj: [ALBERTA, ONTARIO, EASTERN_US, CENTRAL_AMERICA]),
    territory!("eastern_us", "Eastern United States", EASTERN_US, NORTH_AMERICA,
        adj: [ONTARIO, QUEBEC, WESTERN_US, CENTRAL_AMERICA]),
    territory!("central_america", "Central America", CENTRAL_AMERICA, NORTH_AMERICA,
        adj: [WESTERN_US, EASTERN_US, VENEZUELA]),

    // ═══ SOUTH AMERICA ═══
    territory!("venezuela", "Venezuela", VENEZUELA, SOUTH_AMERICA,
        adj: [CENTRAL_AMERICA, PERU, BRAZIL]),
    territory!("peru", "Peru", PERU, SOUTH_AMERICA,
        adj: [VENEZUELA, BRAZIL, ARGENTINA]),
    territory!("brazil", "Brazil", BRAZIL, SOUTH_AMERICA,
        adj: [VENEZUELA, PERU, ARGENTINA, NORTH_AFRICA]),
    territory!("argentina", "Argentina", ARGENTINA, SOUTH_AMERICA,
        adj: [PERU, BRAZIL]),

    // ═══ AFRICA ═══
    territory!("north_africa", "North Africa", NORTH_AFRICA, AFRICA,
        adj: [BRAZIL, EGYPT, EAST_AFRICA, CONGO, WESTERN_EUROPE, SOUTHERN_EUROPE]),
    territory!("egypt", "Egypt", EGYPT, AFRICA,
        adj: [NORTH_AFRICA, EAST_AFRICA, SOUTHERN_EUROPE, MIDDLE_EAST]),
    territory!("east_africa", "East Africa", EAST_AFRICA, AFRICA,
        adj: [NORTH_AFRICA, EGYPT, CONGO, SOUTH_AFRICA, MADAGASCAR, MIDDLE_EAST]),
    territory!("congo", "Congo", CONGO, AFRICA,
        adj: [NORTH_AFRICA, EAST_AFRICA, SOUTH_AFRICA]),
    territory!("south_africa", "South Africa", SOUTH_AFRICA, AFRICA,
        adj: [EAST_AFRICA, CONGO, MADAGASCAR]),
    territory!("madagascar", "Madagascar", MADAGASCAR, AFRICA,
        adj: [EAST_AFRICA, SOUTH_AFRICA]),

    // ═══ EUROPE ═══
    territory!("scandinavia", "Scandinavia", SCANDINAVIA, EUROPE,
        adj: [GREAT_BRITAIN, NORTHERN_EUROPE, UKRAINE, ICELAND]),
    territory!("western_europe", "Western Europe", WESTERN_EUROPE, EUROPE,
        adj: [NORTH_AFRICA, GREAT_BRITAIN, SOUTHERN_EUROPE, NORTHERN_EUROPE]),
    territory!("great_britain", "Great Britain", GREAT_BRITAIN, EUROPE,
        adj: [SCANDINAVIA, WESTERN_EUROPE, NORTHERN_EUROPE, ICELAND]),
    territory!("southern_europe", "Southern Europe", SOUTHERN_EUROPE, EUROPE,
        adj: [NORTH_AFRICA, EGYPT, WESTERN_EUROPE, NORTHERN_EUROPE, UKRAINE, MIDDLE_EAST]),
    territory!("northern_europe", "Northern Europe", NORTHERN_EUROPE, EUROPE,
        adj: [SCANDINAVIA, WESTERN_EUROPE, GREAT_BRITAIN, SOUTHERN_EUROPE, UKRAINE]),
    territory!("ukraine", "Ukraine", UKRAINE, EUROPE,
        adj: [SCANDINAVIA, SOUTHERN_EUROPE, NORTHERN_EUROPE, URAL, AFGHANISTAN, MIDDLE_EAST]),
    territory!("iceland", "Iceland", ICELAND, EUROPE,
        adj: [GREENLAND, SCANDINAVIA, GREAT_BRITAIN]),

    // ═══ ASIA ═══
    territory!("ural", "Ural", URAL, ASIA,
        adj: [UKRAINE, SIBERIA, AFGHANISTAN, CHINA]),
    territory!("siberia", "Siberia", SIBERIA, ASIA,
        adj: [URAL, IRKUTSK, YAKUTSK, MONGOLIA, CHINA]),
    territory!("afghanistan", "Afghanistan", AFGHANISTAN, ASIA,
        adj: [UKRAINE, URAL, MIDDLE_EAST, CHINA, INDIA]),
    territory!("middle_east", "Middle East", MIDDLE_EAST, ASIA,
        adj: [EGYPT, EAST_AFRICA, SOUTHERN_EUROPE, UKRAINE, AFGHANISTAN, INDIA]),
    territory!("irkutsk", "Irkutsk", IRKUTSK, ASIA,
        adj: [SIBERIA, KAMCHATKA, YAKUTSK, MONGOLIA]),
    territory!("kamchatka", "Kamchatka", KAMCHATKA, ASIA,
        adj: [ALASKA, IRKUTSK, YAKUTSK, JAPAN, MONGOLIA]),
    territory!("yakutsk", "Yakutsk", YAKUTSK, ASIA,
        adj: [SIBERIA, IRKUTSK, KAMCHATKA]),
    territory!("japan", "Japan", JAPAN, ASIA,
        adj: [KAMCHATKA, MONGOLIA]),
    territory!("siam", "Siam", SIAM, ASIA,
        adj: [CHINA, INDIA, INDONESIA]),
    territory!("mongolia", "Mongolia", MONGOLIA, ASIA,
        adj: [SIBERIA, IRKUTSK, KAMCHATKA, JAPAN, CHINA]),
    territory!("china", "China", CHINA, ASIA,
        adj: [URAL, SIBERIA, AFGHANISTAN, SIAM, MONGOLIA, INDIA]),
    territory!("india", "India", INDIA, ASIA,
        adj: [AFGHANISTAN, MIDDLE_EAST, SIAM, CHINA]),

    // ═══ AUSTRALIA ═══
    territory!("indonesia", "Indonesia", INDONESIA, AUSTRALIA,
        adj: [SIAM, NEW_GUINEA, WESTERN_AUSTRALIA]),
    territory!("new_guinea", "New Guinea", NEW_GUINEA, AUSTRALIA,
        adj: [INDONESIA, WESTERN_AUSTRALIA, EASTERN_AUSTRALIA]),
    territory!("western_australia", "Western Australia", WESTERN_AUSTRALIA, AUSTRALIA,
        adj: [INDONESIA, NEW_GUINEA, EASTERN_AUSTRALIA]),
    territory!("eastern_australia", "Eastern Australia", EASTERN_AUSTRALIA, AUSTRALIA,
        adj: [NEW_GUINEA, WESTERN_AUSTRALIA]),
];

pub static CONTINENTS: [ContinentDef; NUM_CONTINENTS] = [
    ContinentDef {
        id: NORTH_AMERICA, name: "north_america", bonus: 5,
        territories: &[ALASKA, GREENLAND, NORTHWEST_TERRITORY, ALBERTA, ONTARIO,
                       QUEBEC, WESTERN_US, EASTERN_US, CENTRAL_AMERICA],
    },
    ContinentDef {
        id: SOUTH_AMERICA, name: "south_america", bonus: 2,
        territories: &[VENEZUELA, PERU, BRAZIL, ARGENTINA],
    },
    ContinentDef {
        id: AFRICA, name: "africa", bonus: 3,
        territories: &[NORTH_AFRICA, EGYPT, EAST_AFRICA, CONGO, SOUTH_AFRICA, MADAGASCAR],
    },
    ContinentDef {
        id: EUROPE, name: "europe", bonus: 5,
        territories: &[SCANDINAVIA, WESTERN_EUROPE, GREAT_BRITAIN, SOUTHERN_EUROPE,
                       NORTHERN_EUROPE, UKRAINE, ICELAND],
    },
    ContinentDef {
        id: ASIA, name: "asia", bonus: 7,
        territories: &[URAL, SIBERIA, AFGHANISTAN, MIDDLE_EAST, IRKUTSK, KAMCHATKA,
                       YAKUTSK, JAPAN, SIAM, MONGOLIA, CHINA, INDIA],
    },
    ContinentDef {
        id: AUSTRALIA, name: "australia", bonus: 2,
        territories: &[INDONESIA, NEW_GUINEA, WESTERN_AUSTRALIA, EASTERN_AUSTRALIA],
    },
];

// ── Graph queries ──────────────────────────────────────────────────────

/// Static definition of a territory.
pub fn territory(id: TerritoryId) -> &'static TerritoryDef {
    &TERRITORIES[id.index()]
}

/// Adjacent territories of `id`.
pub fn neighbors(id: TerritoryId) -> &'static [TerritoryId] {
    TERRITORIES[id.index()].adjacent
}

pub fn is_adjacent(a: TerritoryId, b: TerritoryId) -> bool {
    neighbors(a).contains(&b)
}

/// Standard continent a territory belongs to.
pub fn continent_of(id: TerritoryId) -> ContinentId {
    TERRITORIES[id.index()].continent
}

/// Every territory id, in enumeration order.
pub fn all_territories() -> impl Iterator<Item = TerritoryId> {
    (0..NUM_TERRITORIES as u8).map(TerritoryId)
}

/// Lookup by fixture key (`"central_america"`), case-insensitive.
pub fn territory_by_key(key: &str) -> Option<TerritoryId> {
    TERRITORIES.iter()
        .find(|t| t.key.eq_ignore_ascii_case(key))
        .map(|t| t.id)
}

pub fn territory_name(id: TerritoryId) -> &'static str {
    TERRITORIES[id.index()].name
}

// src/models/catalog.rs
//! Static reference data: the selectable maps and the civilization wiki.

use serde::Serialize;

pub const MAPS: &[&str] = &[
    "Arabia", "Arena", "Nomad", "Islands", "Migration", "4 Lakes", "Akropolis",
    "Archipelago", "Baltic", "Black Forest", "Coastal", "Continental", "Crater Lake",
    "El Dorado", "Fortress", "Ghost Lake", "Gold Rush", "Golden Pit", "Golden Swamp",
    "Hideout", "Highlands", "Land Madness", "Mediterranean", "Mongolia", "Oasis",
    "Rivers", "Salt Marsh", "Scandinavia", "Sokotra", "Team Islands", "Valley",
    "Yucatan", "Otro",
];

/// Canonical spelling of a map name, if it is one of [`MAPS`]
pub fn canonical_map(name: &str) -> Option<&'static str> {
    let name = name.trim();
    MAPS.iter().copied().find(|m| m.eq_ignore_ascii_case(name))
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum CivilizationCategory {
    Infantry,
    Cavalry,
    Archers,
    Naval,
    Defensive,
    Gunpowder,
}

#[derive(Debug, Serialize, Clone, Copy)]
pub struct Civilization {
    pub id: &'static str,
    pub name: &'static str,
    pub category: CivilizationCategory,
    pub unique_unit: &'static str,
}

const fn civ(
    id: &'static str,
    name: &'static str,
    category: CivilizationCategory,
    unique_unit: &'static str,
) -> Civilization {
    Civilization { id, name, category, unique_unit }
}

use CivilizationCategory::*;

pub const CIVILIZATIONS: &[Civilization] = &[
    civ("armenians", "Armenians", Infantry, "Composite Bowman"),
    civ("aztecs", "Aztecs", Infantry, "Jaguar Warrior"),
    civ("bengalis", "Bengalis", Archers, "Ratha"),
    civ("berbers", "Berbers", Cavalry, "Camel Archer"),
    civ("bohemians", "Bohemians", Gunpowder, "Hussite Wagon"),
    civ("britons", "Britons", Archers, "Longbowman"),
    civ("bulgarians", "Bulgarians", Infantry, "Konnik"),
    civ("burgundians", "Burgundians", Cavalry, "Coustillier"),
    civ("burmese", "Burmese", Cavalry, "Arambai"),
    civ("byzantines", "Byzantines", Defensive, "Cataphract"),
    civ("celts", "Celts", Infantry, "Woad Raider"),
    civ("chinese", "Chinese", Archers, "Chu Ko Nu"),
    civ("cumans", "Cumans", Cavalry, "Kipchak"),
    civ("dravidians", "Dravidians", Infantry, "Urumi Swordsman"),
    civ("ethiopians", "Ethiopians", Archers, "Shotel Warrior"),
    civ("franks", "Franks", Cavalry, "Throwing Axeman"),
    civ("georgians", "Georgians", Cavalry, "Monaspa"),
    civ("goths", "Goths", Infantry, "Huskarl"),
    civ("gurjaras", "Gurjaras", Cavalry, "Chakram Thrower"),
    civ("hindustanis", "Hindustanis", Cavalry, "Ghulam"),
    civ("huns", "Huns", Cavalry, "Tarkan"),
    civ("inca", "Inca", Infantry, "Kamayuk"),
    civ("italians", "Italians", Archers, "Genoese Crossbowman"),
    civ("japanese", "Japanese", Infantry, "Samurai"),
    civ("jurchens", "Jurchens", Cavalry, "Iron Pagoda"),
    civ("khitans", "Khitans", Cavalry, "Liao Dao"),
    civ("khmer", "Khmer", Cavalry, "Ballista Elephant"),
    civ("koreans", "Koreans", Defensive, "War Wagon"),
    civ("lithuanians", "Lithuanians", Cavalry, "Leitis"),
    civ("magyars", "Magyars", Cavalry, "Magyar Huszar"),
    civ("malay", "Malay", Naval, "Karambit Warrior"),
    civ("malians", "Malians", Infantry, "Gbeto"),
    civ("mapuche", "Mapuche", Infantry, "Kona"),
    civ("maya", "Maya", Archers, "Plumed Archer"),
    civ("mongols", "Mongols", Cavalry, "Mangudai"),
    civ("muisca", "Muisca", Archers, "Guecha Warrior"),
    civ("persians", "Persians", Cavalry, "War Elephant"),
    civ("poles", "Poles", Cavalry, "Obuch"),
    civ("portuguese", "Portuguese", Naval, "Organ Gun"),
    civ("romans", "Romans", Infantry, "Centurion"),
    civ("saracens", "Saracens", Cavalry, "Mameluke"),
    civ("shu", "Shu", Defensive, "War Chariot"),
    civ("sicilians", "Sicilians", Cavalry, "Serjeant"),
    civ("slavs", "Slavs", Infantry, "Boyar"),
    civ("spanish", "Spanish", Gunpowder, "Conquistador"),
    civ("tatars", "Tatars", Cavalry, "Keshik"),
    civ("teutons", "Teutons", Infantry, "Teutonic Knight"),
    civ("tupi", "Tupi", Infantry, "Blackwood Archer"),
    civ("turks", "Turks", Gunpowder, "Janissary"),
    civ("vietnamese", "Vietnamese", Archers, "Rattan Archer"),
    civ("vikings", "Vikings", Infantry, "Berserk"),
    civ("wei", "Wei", Cavalry, "Tiger Cavalry"),
    civ("wu", "Wu", Naval, "Lou Chuan"),
];

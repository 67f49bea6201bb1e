//! Item catalog
//!
//! Host-supplied facts about item kinds: equipment family, default attribute
//! values and maximum durability. The compositor reads base values from here,
//! so totals never depend on whatever is currently written on an item.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::item::{Attribute, EquipSlot, ItemKind};

/// Concrete equipment family of an item kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemFamily {
    Sword,
    Axe,
    Pickaxe,
    Shovel,
    Hoe,
    Trident,
    Bow,
    Crossbow,
    Helmet,
    Chestplate,
    Leggings,
    Boots,
    Shield,
    Other,
}

/// Coarse class that decides which bonuses apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemClass {
    Weapon,
    Armor,
    Other,
}

impl ItemFamily {
    /// Guess the family from the kind's name
    pub fn of(kind: &ItemKind) -> ItemFamily {
        let name = kind.as_str();
        match name {
            "TRIDENT" => return ItemFamily::Trident,
            "BOW" => return ItemFamily::Bow,
            "CROSSBOW" => return ItemFamily::Crossbow,
            "SHIELD" => return ItemFamily::Shield,
            _ => {}
        }
        let suffixes = [
            ("_SWORD", ItemFamily::Sword),
            ("_PICKAXE", ItemFamily::Pickaxe),
            ("_AXE", ItemFamily::Axe),
            ("_SHOVEL", ItemFamily::Shovel),
            ("_HOE", ItemFamily::Hoe),
            ("_HELMET", ItemFamily::Helmet),
            ("_CHESTPLATE", ItemFamily::Chestplate),
            ("_LEGGINGS", ItemFamily::Leggings),
            ("_BOOTS", ItemFamily::Boots),
        ];
        suffixes
            .iter()
            .find(|(suffix, _)| name.ends_with(suffix))
            .map(|(_, family)| *family)
            .unwrap_or(ItemFamily::Other)
    }

    /// Class of this family; hoes count as weapons only when enabled
    pub fn class(&self, include_hoes: bool) -> ItemClass {
        match self {
            ItemFamily::Sword
            | ItemFamily::Axe
            | ItemFamily::Pickaxe
            | ItemFamily::Shovel
            | ItemFamily::Trident
            | ItemFamily::Bow
            | ItemFamily::Crossbow => ItemClass::Weapon,
            ItemFamily::Hoe if include_hoes => ItemClass::Weapon,
            ItemFamily::Helmet
            | ItemFamily::Chestplate
            | ItemFamily::Leggings
            | ItemFamily::Boots
            | ItemFamily::Shield => ItemClass::Armor,
            ItemFamily::Hoe | ItemFamily::Other => ItemClass::Other,
        }
    }

    /// Slot the item's modifiers are active in
    pub fn slot(&self) -> EquipSlot {
        match self {
            ItemFamily::Helmet => EquipSlot::Head,
            ItemFamily::Chestplate => EquipSlot::Chest,
            ItemFamily::Leggings => EquipSlot::Legs,
            ItemFamily::Boots => EquipSlot::Feet,
            ItemFamily::Shield => EquipSlot::OffHand,
            _ => EquipSlot::MainHand,
        }
    }

    pub fn is_ranged(&self) -> bool {
        matches!(self, ItemFamily::Bow | ItemFamily::Crossbow)
    }
}

/// Everything the catalog knows about one kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub family: ItemFamily,
    #[serde(default)]
    pub base: BTreeMap<Attribute, f64>,
    /// 0 for items that never wear out
    #[serde(default)]
    pub max_durability: u32,
}

impl CatalogEntry {
    pub fn new(family: ItemFamily, max_durability: u32) -> Self {
        Self {
            family,
            base: BTreeMap::new(),
            max_durability,
        }
    }

    pub fn with_base(mut self, attribute: Attribute, value: f64) -> Self {
        self.base.insert(attribute, value);
        self
    }
}

/// Kind table with classification rules
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    entries: HashMap<ItemKind, CatalogEntry>,
    include_hoes: bool,
}

// (material prefix, durability) for tools and weapons
const TOOL_MATERIALS: [(&str, u32); 6] = [
    ("WOODEN", 59),
    ("STONE", 131),
    ("IRON", 250),
    ("GOLDEN", 32),
    ("DIAMOND", 1561),
    ("NETHERITE", 2031),
];

// (material, durability multiplier, [helmet, chest, legs, boots] armor, toughness)
const ARMOR_MATERIALS: [(&str, u32, [f64; 4], f64); 6] = [
    ("LEATHER", 5, [1.0, 3.0, 2.0, 1.0], 0.0),
    ("CHAINMAIL", 15, [2.0, 5.0, 4.0, 1.0], 0.0),
    ("IRON", 15, [2.0, 6.0, 5.0, 2.0], 0.0),
    ("GOLDEN", 7, [2.0, 5.0, 3.0, 1.0], 0.0),
    ("DIAMOND", 33, [3.0, 8.0, 6.0, 3.0], 2.0),
    ("NETHERITE", 37, [3.0, 8.0, 6.0, 3.0], 3.0),
];

impl ItemCatalog {
    /// Empty catalog; every kind is classified by name with zero base values
    pub fn new(include_hoes: bool) -> Self {
        Self {
            entries: HashMap::new(),
            include_hoes,
        }
    }

    /// Vanilla tools, weapons and armor
    pub fn vanilla(include_hoes: bool) -> Self {
        let mut catalog = Self::new(include_hoes);

        // Per-tool (damage, attack speed) for each material, in TOOL_MATERIALS order
        let swords = [(3.0, -2.4), (4.0, -2.4), (5.0, -2.4), (3.0, -2.4), (6.0, -2.4), (7.0, -2.4)];
        let axes = [(6.0, -3.2), (8.0, -3.2), (8.0, -3.1), (6.0, -3.0), (8.0, -3.0), (9.0, -3.0)];
        let pickaxes = [(1.0, -2.8), (2.0, -2.8), (3.0, -2.8), (1.0, -2.8), (4.0, -2.8), (5.0, -2.8)];
        let shovels = [(1.5, -3.0), (2.5, -3.0), (3.5, -3.0), (1.5, -3.0), (4.5, -3.0), (5.5, -3.0)];
        let hoes = [(0.0, -3.0), (0.0, -2.0), (0.0, -1.0), (0.0, -3.0), (0.0, 0.0), (0.0, 0.0)];

        for (i, (material, durability)) in TOOL_MATERIALS.iter().enumerate() {
            for (suffix, family, stats) in [
                ("SWORD", ItemFamily::Sword, swords[i]),
                ("AXE", ItemFamily::Axe, axes[i]),
                ("PICKAXE", ItemFamily::Pickaxe, pickaxes[i]),
                ("SHOVEL", ItemFamily::Shovel, shovels[i]),
                ("HOE", ItemFamily::Hoe, hoes[i]),
            ] {
                let entry = CatalogEntry::new(family, *durability)
                    .with_base(Attribute::AttackDamage, stats.0)
                    .with_base(Attribute::AttackSpeed, stats.1);
                catalog.insert(format!("{material}_{suffix}"), entry);
            }
        }

        let pieces = [
            ("HELMET", ItemFamily::Helmet, 11),
            ("CHESTPLATE", ItemFamily::Chestplate, 16),
            ("LEGGINGS", ItemFamily::Leggings, 15),
            ("BOOTS", ItemFamily::Boots, 13),
        ];
        for (material, multiplier, armor, toughness) in ARMOR_MATERIALS {
            for (i, (suffix, family, base_durability)) in pieces.iter().enumerate() {
                let mut entry = CatalogEntry::new(*family, base_durability * multiplier)
                    .with_base(Attribute::Armor, armor[i]);
                if toughness > 0.0 {
                    entry = entry.with_base(Attribute::ArmorToughness, toughness);
                }
                catalog.insert(format!("{material}_{suffix}"), entry);
            }
        }

        catalog.insert(
            "TURTLE_HELMET",
            CatalogEntry::new(ItemFamily::Helmet, 275).with_base(Attribute::Armor, 2.0),
        );
        catalog.insert(
            "TRIDENT",
            CatalogEntry::new(ItemFamily::Trident, 250)
                .with_base(Attribute::AttackDamage, 8.0)
                .with_base(Attribute::AttackSpeed, -2.9),
        );
        catalog.insert("BOW", CatalogEntry::new(ItemFamily::Bow, 384));
        catalog.insert("CROSSBOW", CatalogEntry::new(ItemFamily::Crossbow, 465));
        catalog.insert("SHIELD", CatalogEntry::new(ItemFamily::Shield, 336));

        catalog
    }

    pub fn insert(&mut self, kind: impl Into<ItemKind>, entry: CatalogEntry) {
        self.entries.insert(kind.into(), entry);
    }

    /// Copy of this catalog with a different hoe rule
    pub fn with_include_hoes(&self, include_hoes: bool) -> Self {
        Self {
            entries: self.entries.clone(),
            include_hoes,
        }
    }

    pub fn include_hoes(&self) -> bool {
        self.include_hoes
    }

    pub fn entry(&self, kind: &ItemKind) -> Option<&CatalogEntry> {
        self.entries.get(kind)
    }

    pub fn family(&self, kind: &ItemKind) -> ItemFamily {
        self.entry(kind)
            .map(|e| e.family)
            .unwrap_or_else(|| ItemFamily::of(kind))
    }

    pub fn class(&self, kind: &ItemKind) -> ItemClass {
        self.family(kind).class(self.include_hoes)
    }

    pub fn is_weapon(&self, kind: &ItemKind) -> bool {
        self.class(kind) == ItemClass::Weapon
    }

    pub fn is_armor(&self, kind: &ItemKind) -> bool {
        self.class(kind) == ItemClass::Armor
    }

    pub fn is_weapon_or_armor(&self, kind: &ItemKind) -> bool {
        self.class(kind) != ItemClass::Other
    }

    /// Default value of an attribute for a kind, 0 when unknown
    pub fn base(&self, kind: &ItemKind, attribute: Attribute) -> f64 {
        self.entry(kind)
            .and_then(|e| e.base.get(&attribute).copied())
            .unwrap_or(0.0)
    }

    pub fn max_durability(&self, kind: &ItemKind) -> u32 {
        self.entry(kind).map(|e| e.max_durability).unwrap_or(0)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &ItemKind> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Item records
//!
//! [`ItemStack`] is the crate's view of a host item: kind, wear, enchantments,
//! the rarity tag and the attribute modifiers carried in its metadata.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::rarity::TierId;

/// Metadata key under which the host stores the rarity tag
pub const RARITY_TAG_KEY: &str = "rareforge:rarity";

/// Item kind, e.g. `DIAMOND_SWORD`
///
/// Stored upper-case so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ItemKind(String);

impl ItemKind {
    pub fn new(kind: impl AsRef<str>) -> Self {
        Self(kind.as_ref().trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable name, e.g. `Diamond Sword`
    pub fn display_name(&self) -> String {
        self.0
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let lower = word.to_ascii_lowercase();
                let mut chars = lower.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemKind {
    fn from(kind: &str) -> Self {
        Self::new(kind)
    }
}

impl From<String> for ItemKind {
    fn from(kind: String) -> Self {
        Self::new(kind)
    }
}

impl From<ItemKind> for String {
    fn from(kind: ItemKind) -> Self {
        kind.0
    }
}

/// Attributes the compositor manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attribute {
    AttackDamage,
    AttackSpeed,
    Armor,
    ArmorToughness,
    MaxHealth,
    MovementSpeed,
    Luck,
}

impl Attribute {
    pub const ALL: [Attribute; 7] = [
        Attribute::AttackDamage,
        Attribute::AttackSpeed,
        Attribute::Armor,
        Attribute::ArmorToughness,
        Attribute::MaxHealth,
        Attribute::MovementSpeed,
        Attribute::Luck,
    ];

    /// Identifier of the modifier the compositor owns for this attribute
    pub fn modifier_id(&self) -> &'static str {
        match self {
            Attribute::AttackDamage => "rareforge:rarity/attack_damage",
            Attribute::AttackSpeed => "rareforge:rarity/attack_speed",
            Attribute::Armor => "rareforge:rarity/armor",
            Attribute::ArmorToughness => "rareforge:rarity/armor_toughness",
            Attribute::MaxHealth => "rareforge:rarity/max_health",
            Attribute::MovementSpeed => "rareforge:rarity/movement_speed",
            Attribute::Luck => "rareforge:rarity/luck",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Attribute::AttackDamage => "Attack Damage",
            Attribute::AttackSpeed => "Attack Speed",
            Attribute::Armor => "Armor",
            Attribute::ArmorToughness => "Armor Toughness",
            Attribute::MaxHealth => "Max Health",
            Attribute::MovementSpeed => "Movement Speed",
            Attribute::Luck => "Luck",
        }
    }

    /// How the host combines a modifier for this attribute
    pub fn operation(&self) -> Operation {
        match self {
            Attribute::MovementSpeed => Operation::MultiplyScalar,
            _ => Operation::AddNumber,
        }
    }
}

/// Modifier operation, mirroring the host's attribute model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    AddNumber,
    MultiplyScalar,
}

/// Equipment slot a modifier is active in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipSlot {
    MainHand,
    OffHand,
    Head,
    Chest,
    Legs,
    Feet,
}

/// One attribute modifier stored on an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeModifier {
    pub id: String,
    pub attribute: Attribute,
    pub amount: f64,
    pub operation: Operation,
    pub slot: EquipSlot,
}

impl AttributeModifier {
    /// Whether this modifier was written by the compositor
    pub fn is_rarity_owned(&self) -> bool {
        self.id == self.attribute.modifier_id()
    }
}

/// A host item as seen by the crate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    pub kind: ItemKind,
    pub amount: u32,
    /// Durability consumed so far
    #[serde(default)]
    pub damage: u32,
    #[serde(default)]
    pub enchantments: BTreeMap<String, u32>,
    #[serde(default)]
    pub custom_name: Option<String>,
    #[serde(default)]
    pub rarity_tag: Option<TierId>,
    /// `None` when the host cannot store modifiers on this item
    #[serde(default)]
    pub attributes: Option<Vec<AttributeModifier>>,
}

impl ItemStack {
    /// A single, undamaged item with empty attribute storage
    pub fn new(kind: impl Into<ItemKind>) -> Self {
        Self {
            kind: kind.into(),
            amount: 1,
            damage: 0,
            enchantments: BTreeMap::new(),
            custom_name: None,
            rarity_tag: None,
            attributes: Some(Vec::new()),
        }
    }

    /// An item whose metadata cannot carry attribute modifiers
    pub fn without_attribute_storage(kind: impl Into<ItemKind>) -> Self {
        Self {
            attributes: None,
            ..Self::new(kind)
        }
    }

    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_damage(mut self, damage: u32) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_enchantment(mut self, name: impl Into<String>, level: u32) -> Self {
        self.enchantments.insert(name.into(), level);
        self
    }

    pub fn with_custom_name(mut self, name: impl Into<String>) -> Self {
        self.custom_name = Some(name.into());
        self
    }

    pub fn with_tag(mut self, tier: impl Into<TierId>) -> Self {
        self.rarity_tag = Some(tier.into());
        self
    }

    pub fn with_modifier(mut self, modifier: AttributeModifier) -> Self {
        self.attributes.get_or_insert_with(Vec::new).push(modifier);
        self
    }

    pub fn has_tag(&self) -> bool {
        self.rarity_tag.is_some()
    }

    /// Whether the item carries any attribute modifiers at all
    pub fn has_modifiers(&self) -> bool {
        self.attributes.as_ref().is_some_and(|mods| !mods.is_empty())
    }

    /// Modifiers the compositor did not write
    pub fn foreign_modifiers(&self) -> impl Iterator<Item = &AttributeModifier> {
        self.attributes
            .iter()
            .flatten()
            .filter(|m| !m.is_rarity_owned())
    }

    /// The compositor's modifier for an attribute, if present
    pub fn rarity_modifier(&self, attribute: Attribute) -> Option<&AttributeModifier> {
        self.attributes
            .as_ref()?
            .iter()
            .find(|m| m.attribute == attribute && m.is_rarity_owned())
    }

    /// Host-visible total for an attribute
    ///
    /// Explicit modifiers replace the kind's default value; with none present
    /// the default `base` applies.
    pub fn attribute_total(&self, attribute: Attribute, base: f64) -> f64 {
        let mut present = false;
        let mut total = 0.0;
        for modifier in self.attributes.iter().flatten() {
            if modifier.attribute == attribute {
                present = true;
                total += modifier.amount;
            }
        }
        if present {
            total
        } else {
            base
        }
    }

    /// Fraction of durability left, in percent
    ///
    /// Items without durability always report 100.
    pub fn durability_percent(&self, max_durability: u32) -> f64 {
        if max_durability == 0 {
            return 100.0;
        }
        let left = max_durability.saturating_sub(self.damage);
        left as f64 / max_durability as f64 * 100.0
    }

    pub fn enchantment_count(&self) -> usize {
        self.enchantments.len()
    }
}

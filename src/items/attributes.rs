//! Attribute compositor
//!
//! Applies a tier's stat bonuses to an item. Each managed attribute has one
//! modifier with a fixed id; applying a tier first strips that modifier, so the
//! result only ever depends on the item's kind and the tier being applied.

use std::sync::Arc;

use crate::rarity::RarityTier;
use super::catalog::{ItemCatalog, ItemClass};
use super::item::{Attribute, AttributeModifier, ItemStack};

const WEAPON_ATTRIBUTES: [Attribute; 2] = [Attribute::AttackDamage, Attribute::AttackSpeed];
const ARMOR_ATTRIBUTES: [Attribute; 2] = [Attribute::Armor, Attribute::ArmorToughness];
const UNIVERSAL_ATTRIBUTES: [Attribute; 3] = [
    Attribute::MaxHealth,
    Attribute::MovementSpeed,
    Attribute::Luck,
];

/// Computes and writes rarity attribute totals
#[derive(Debug, Clone)]
pub struct AttributeCompositor {
    catalog: Arc<ItemCatalog>,
}

impl AttributeCompositor {
    pub fn new(catalog: Arc<ItemCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    /// Attributes a tier may touch on this item
    pub fn applicable(&self, item: &ItemStack) -> Vec<Attribute> {
        let mut out = Vec::with_capacity(7);
        match self.catalog.class(&item.kind) {
            ItemClass::Weapon => out.extend(WEAPON_ATTRIBUTES),
            ItemClass::Armor => out.extend(ARMOR_ATTRIBUTES),
            ItemClass::Other => {}
        }
        out.extend(UNIVERSAL_ATTRIBUTES);
        out
    }

    /// Total an attribute should reach on this kind under `tier`
    pub fn composed_total(&self, item: &ItemStack, tier: &RarityTier, attribute: Attribute) -> f64 {
        self.catalog.base(&item.kind, attribute) + tier.bonuses.get(attribute)
    }

    /// Apply `tier` to the item and tag it
    pub fn apply(&self, mut item: ItemStack, tier: &RarityTier) -> ItemStack {
        item.rarity_tag = Some(tier.id.clone());

        let applicable = self.applicable(&item);
        let slot = self.catalog.family(&item.kind).slot();
        let Some(modifiers) = item.attributes.as_mut() else {
            log::debug!("{} cannot carry modifiers, tagged {} only", item.kind, tier.id);
            return item;
        };

        modifiers.retain(|m| !m.is_rarity_owned());

        for attribute in applicable {
            let base = self.catalog.base(&item.kind, attribute);
            let bonus = tier.bonuses.get(attribute);
            // Nothing to write when the bare default already is the total
            if bonus == 0.0 && (base == 0.0 || !has_foreign(modifiers, attribute)) {
                continue;
            }
            modifiers.push(AttributeModifier {
                id: attribute.modifier_id().to_string(),
                attribute,
                amount: base + bonus,
                operation: attribute.operation(),
                slot,
            });
        }

        log::debug!(
            "Applied {} to {}: damage {:.1}, armor {:.1}",
            tier.id,
            item.kind,
            item.attribute_total(Attribute::AttackDamage, self.catalog.base(&item.kind, Attribute::AttackDamage)),
            item.attribute_total(Attribute::Armor, self.catalog.base(&item.kind, Attribute::Armor)),
        );
        item
    }

    /// Host-visible total, falling back to the kind's default
    pub fn total(&self, item: &ItemStack, attribute: Attribute) -> f64 {
        item.attribute_total(attribute, self.catalog.base(&item.kind, attribute))
    }
}

fn has_foreign(modifiers: &[AttributeModifier], attribute: Attribute) -> bool {
    modifiers.iter().any(|m| m.attribute == attribute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::item::{EquipSlot, Operation};
    use crate::rarity::AttributeSet;

    fn compositor() -> AttributeCompositor {
        AttributeCompositor::new(Arc::new(ItemCatalog::vanilla(false)))
    }

    fn tier(id: &str, bonuses: AttributeSet) -> RarityTier {
        RarityTier::new(id, id, 0).with_bonuses(bonuses)
    }

    #[test]
    fn test_weapon_gets_damage_not_armor() {
        let c = compositor();
        let t = tier("rare", AttributeSet { damage: 2.0, armor: 3.0, luck: 1.0, ..Default::default() });
        let item = c.apply(ItemStack::new("IRON_SWORD"), &t);

        assert_eq!(c.total(&item, Attribute::AttackDamage), 7.0);
        assert_eq!(c.total(&item, Attribute::Armor), 0.0);
        assert_eq!(c.total(&item, Attribute::Luck), 1.0);
        assert_eq!(item.rarity_tag.as_ref().map(|t| t.as_str()), Some("rare"));
    }

    #[test]
    fn test_armor_gets_armor_and_toughness() {
        let c = compositor();
        let t = tier("epic", AttributeSet { damage: 5.0, armor: 2.0, toughness: 1.0, ..Default::default() });
        let item = c.apply(ItemStack::new("DIAMOND_CHESTPLATE"), &t);

        assert_eq!(c.total(&item, Attribute::Armor), 10.0);
        assert_eq!(c.total(&item, Attribute::ArmorToughness), 3.0);
        assert_eq!(c.total(&item, Attribute::AttackDamage), 0.0);
        let armor = item.rarity_modifier(Attribute::Armor).unwrap();
        assert_eq!(armor.slot, EquipSlot::Chest);
    }

    #[test]
    fn test_reapply_is_idempotent() {
        let c = compositor();
        let t = tier("rare", AttributeSet { damage: 2.0, speed: 0.05, health: 2.0, ..Default::default() });
        let once = c.apply(ItemStack::new("IRON_AXE"), &t);
        let twice = c.apply(once.clone(), &t);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_retag_leaves_no_residue() {
        let c = compositor();
        let a = tier("legendary", AttributeSet { damage: 6.0, luck: 3.0, ..Default::default() });
        let b = tier("uncommon", AttributeSet { damage: 1.0, ..Default::default() });
        let item = c.apply(c.apply(ItemStack::new("STONE_SWORD"), &a), &b);

        assert_eq!(c.total(&item, Attribute::AttackDamage), 5.0);
        assert_eq!(c.total(&item, Attribute::Luck), 0.0);
        assert!(item.rarity_modifier(Attribute::Luck).is_none());
    }

    #[test]
    fn test_speed_is_multiplicative() {
        let c = compositor();
        let t = tier("mythic", AttributeSet { speed: 0.1, ..Default::default() });
        let item = c.apply(ItemStack::new("GOLDEN_BOOTS"), &t);
        let speed = item.rarity_modifier(Attribute::MovementSpeed).unwrap();
        assert_eq!(speed.operation, Operation::MultiplyScalar);
        assert_eq!(speed.amount, 0.1);
    }

    #[test]
    fn test_foreign_modifiers_untouched() {
        let c = compositor();
        let foreign = AttributeModifier {
            id: "other:plugin".into(),
            attribute: Attribute::Luck,
            amount: 4.0,
            operation: Operation::AddNumber,
            slot: EquipSlot::MainHand,
        };
        let t = tier("rare", AttributeSet { luck: 1.0, ..Default::default() });
        let item = c.apply(ItemStack::new("IRON_SWORD").with_modifier(foreign.clone()), &t);
        assert!(item.attributes.as_ref().unwrap().contains(&foreign));
        assert_eq!(c.total(&item, Attribute::Luck), 5.0);
    }

    #[test]
    fn test_no_storage_only_tags() {
        let c = compositor();
        let t = tier("rare", AttributeSet { damage: 2.0, ..Default::default() });
        let item = c.apply(ItemStack::without_attribute_storage("IRON_SWORD"), &t);
        assert!(item.attributes.is_none());
        assert!(item.has_tag());
        assert_eq!(c.total(&item, Attribute::AttackDamage), 5.0);
    }
}

//! Worn equipment perks
//!
//! Armor passives are refreshed on a periodic tick; boots perks fire on
//! movement. Both are looked up by `(tier_index, family)`.

use serde::{Deserialize, Serialize};

use crate::combat::status::{EffectSpec, StatusEffect};
use crate::combat::Millis;
use crate::rarity::{BootsAbility, TeleportAbility, TierTable};
use super::catalog::{ItemCatalog, ItemFamily};
use super::item::ItemStack;

/// Armor an actor is wearing
#[derive(Debug, Clone, Copy, Default)]
pub struct WornArmor<'i> {
    pub head: Option<&'i ItemStack>,
    pub chest: Option<&'i ItemStack>,
    pub legs: Option<&'i ItemStack>,
    pub feet: Option<&'i ItemStack>,
}

impl<'i> WornArmor<'i> {
    fn pieces(&self) -> [(ItemFamily, Option<&'i ItemStack>); 4] {
        [
            (ItemFamily::Helmet, self.head),
            (ItemFamily::Chestplate, self.chest),
            (ItemFamily::Leggings, self.legs),
            (ItemFamily::Boots, self.feet),
        ]
    }
}

/// Effects to (re)apply to a wearer on one refresh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassiveGrant {
    pub effects: Vec<EffectSpec>,
    /// Effects to strip from the wearer
    pub cleanse: Vec<StatusEffect>,
}

impl PassiveGrant {
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty() && self.cleanse.is_empty()
    }
}

/// Collect passives from every worn piece
///
/// A piece only counts in its own slot, and stale tags grant nothing.
pub fn passive_grants(
    table: &TierTable,
    catalog: &ItemCatalog,
    worn: &WornArmor<'_>,
    duration_ms: Millis,
) -> PassiveGrant {
    let mut grant = PassiveGrant::default();
    for (slot_family, piece) in worn.pieces() {
        let Some(item) = piece else { continue };
        if catalog.family(&item.kind) != slot_family {
            continue;
        }
        let Some(tier) = table.resolve(item.rarity_tag.as_ref()) else {
            continue;
        };
        if let Some(passive) = table.abilities().passive(tier.tier_index, slot_family) {
            grant.effects.extend(
                passive
                    .effects
                    .iter()
                    .map(|p| EffectSpec::new(p.effect, p.amplifier, duration_ms)),
            );
            for effect in &passive.cleanse {
                if !grant.cleanse.contains(effect) {
                    grant.cleanse.push(*effect);
                }
            }
        }
    }
    grant
}

/// Something the host should do to the world as the wearer moves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MovementPerk {
    /// Turn water below into ice within `radius`
    FreezeWater { radius: u8, revert_ms: Option<Millis> },
    /// Set nearby living entities on fire while on solid ground
    IgniteNearby { radius: f64, duration_ms: Millis },
    /// Turn lava below into obsidian, reverting later
    HardenLava { revert_ms: Millis },
    /// Put out the wearer
    Extinguish,
}

fn tagged_boots<'t>(table: &'t TierTable, catalog: &ItemCatalog, boots: &ItemStack) -> Option<&'t BootsAbility> {
    if catalog.family(&boots.kind) != ItemFamily::Boots {
        return None;
    }
    let tier = table.resolve(boots.rarity_tag.as_ref())?;
    table.abilities().boots(tier.tier_index)
}

/// Perks the worn boots trigger on movement
pub fn movement_perks(table: &TierTable, catalog: &ItemCatalog, boots: &ItemStack) -> Vec<MovementPerk> {
    let Some(ability) = tagged_boots(table, catalog, boots) else {
        return Vec::new();
    };
    let mut perks = Vec::new();
    if let Some(frost) = ability.frost_walk {
        perks.push(MovementPerk::FreezeWater {
            radius: frost.radius,
            revert_ms: frost.revert_ms,
        });
    }
    if let Some(trail) = ability.fire_trail {
        perks.push(MovementPerk::IgniteNearby {
            radius: trail.radius,
            duration_ms: trail.ignite_ms,
        });
    }
    if let Some(lava) = ability.lava_walk {
        perks.push(MovementPerk::HardenLava {
            revert_ms: lava.revert_ms,
        });
    }
    if ability.fire_immunity {
        perks.push(MovementPerk::Extinguish);
    }
    perks
}

/// Teleport granted by the worn boots, if any
pub fn teleport_ability(table: &TierTable, catalog: &ItemCatalog, boots: &ItemStack) -> Option<TeleportAbility> {
    tagged_boots(table, catalog, boots).and_then(|b| b.teleport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::defaults::default_tiers;

    fn fixtures() -> (TierTable, ItemCatalog) {
        (TierTable::build(default_tiers()).unwrap(), ItemCatalog::vanilla(false))
    }

    #[test]
    fn test_passives_stack_across_pieces() {
        let (table, catalog) = fixtures();
        let helmet = ItemStack::new("DIAMOND_HELMET").with_tag("epic");
        let legs = ItemStack::new("IRON_LEGGINGS").with_tag("legendary");
        let worn = WornArmor {
            head: Some(&helmet),
            legs: Some(&legs),
            ..Default::default()
        };
        let grant = passive_grants(&table, &catalog, &worn, 6000);
        let effects: Vec<StatusEffect> = grant.effects.iter().map(|e| e.effect).collect();
        assert_eq!(
            effects,
            [StatusEffect::NightVision, StatusEffect::Speed, StatusEffect::JumpBoost]
        );
        assert_eq!(grant.cleanse, [StatusEffect::Blindness]);
        assert!(grant.effects.iter().all(|e| e.duration_ms == 6000));
    }

    #[test]
    fn test_wrong_slot_grants_nothing() {
        let (table, catalog) = fixtures();
        let helmet = ItemStack::new("DIAMOND_HELMET").with_tag("mythic");
        let worn = WornArmor {
            chest: Some(&helmet),
            ..Default::default()
        };
        assert!(passive_grants(&table, &catalog, &worn, 6000).is_empty());
    }

    #[test]
    fn test_boots_perks_by_tier() {
        let (table, catalog) = fixtures();
        let rare = ItemStack::new("IRON_BOOTS").with_tag("rare");
        assert_eq!(
            movement_perks(&table, &catalog, &rare),
            [MovementPerk::FreezeWater {
                radius: 0,
                revert_ms: Some(5000)
            }]
        );

        let divine = ItemStack::new("IRON_BOOTS").with_tag("divine");
        let perks = movement_perks(&table, &catalog, &divine);
        assert!(perks.contains(&MovementPerk::Extinguish));
        assert!(perks.contains(&MovementPerk::HardenLava { revert_ms: 10_000 }));

        let celestial = ItemStack::new("IRON_BOOTS").with_tag("celestial");
        assert_eq!(teleport_ability(&table, &catalog, &celestial).map(|t| t.distance), Some(10.0));
        assert!(teleport_ability(&table, &catalog, &divine).is_none());
    }
}

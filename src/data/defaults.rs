//! Built-in tier table
//!
//! Eight tiers from common to celestial, used when no config file exists and
//! written out by `export-defaults`.

use crate::combat::status::StatusEffect;
use crate::rarity::{
    ArmorPassive, AttributeSet, AxeAbility, BootsAbility, BowAbility, FireTrail, FrostWalk,
    LavaWalk, PassiveEffect, RarityTier, SpecialAbilities, SwordAbility, TeleportAbility,
    TimedEffect, TridentAbility, Vortex,
};

/// Ids of the default chain, base first
pub const DEFAULT_CHAIN: [&str; 8] = [
    "common",
    "uncommon",
    "rare",
    "epic",
    "legendary",
    "mythic",
    "divine",
    "celestial",
];

fn bonuses(damage: f64, armor: f64, toughness: f64, health: f64, speed: f64, luck: f64) -> AttributeSet {
    AttributeSet {
        damage,
        armor,
        toughness,
        attack_speed: 0.0,
        health,
        speed,
        luck,
    }
}

fn slow(amplifier: u8, secs: u64) -> TimedEffect {
    TimedEffect::new(StatusEffect::Slowness, amplifier, secs * 1000)
}

fn weak(amplifier: u8, secs: u64) -> TimedEffect {
    TimedEffect::new(StatusEffect::Weakness, amplifier, secs * 1000)
}

fn bow(damage: f64, velocity: f64) -> BowAbility {
    BowAbility {
        damage_multiplier: damage,
        velocity_multiplier: velocity,
        ..Default::default()
    }
}

fn passive(effects: &[(StatusEffect, u8)]) -> ArmorPassive {
    ArmorPassive {
        effects: effects.iter().map(|(e, a)| PassiveEffect::new(*e, *a)).collect(),
        cleanse: Vec::new(),
    }
}

fn axe(rank: usize) -> AxeAbility {
    match rank {
        1 | 2 => AxeAbility {
            effects: vec![slow(0, 3)],
            halt_target: false,
        },
        3 | 4 => AxeAbility {
            effects: vec![slow(1, 4), weak(0, 2)],
            halt_target: false,
        },
        _ => AxeAbility {
            effects: vec![slow(2, 5), weak(1, 3)],
            halt_target: true,
        },
    }
}

fn trident(rank: usize) -> TridentAbility {
    match rank {
        1 | 2 => TridentAbility {
            effects: vec![slow(1, 4)],
            ..Default::default()
        },
        3 => TridentAbility {
            lightning_strikes: 1,
            ..Default::default()
        },
        4 | 5 => TridentAbility {
            vortex: Some(Vortex {
                radius: 5.0,
                strength: 0.5,
            }),
            ..Default::default()
        },
        _ => TridentAbility {
            lightning_strikes: 3,
            ..Default::default()
        },
    }
}

fn helmet(rank: usize) -> Option<ArmorPassive> {
    use StatusEffect::*;
    let mut p = match rank {
        2 | 3 => passive(&[(NightVision, 0)]),
        4 => passive(&[(NightVision, 0), (WaterBreathing, 0)]),
        r if r >= 5 => passive(&[(NightVision, 0), (WaterBreathing, 0), (FireResistance, 0)]),
        _ => return None,
    };
    if rank >= 3 {
        p.cleanse.push(Blindness);
    }
    Some(p)
}

fn chestplate(rank: usize) -> Option<ArmorPassive> {
    use StatusEffect::*;
    match rank {
        4 => Some(passive(&[(Regeneration, 0)])),
        5 => Some(passive(&[(Regeneration, 0), (Resistance, 0)])),
        r if r >= 6 => Some(passive(&[(Regeneration, 1), (Resistance, 1)])),
        _ => None,
    }
}

fn leggings(rank: usize) -> Option<ArmorPassive> {
    use StatusEffect::*;
    match rank {
        2 => Some(passive(&[(Speed, 0)])),
        3 => Some(passive(&[(Speed, 0), (JumpBoost, 0)])),
        4 => Some(passive(&[(Speed, 1), (JumpBoost, 1)])),
        r if r >= 5 => Some(passive(&[(Speed, 1), (JumpBoost, 2), (SlowFalling, 0)])),
        _ => None,
    }
}

fn boots(rank: usize) -> Option<BootsAbility> {
    let ability = match rank {
        2 => BootsAbility {
            frost_walk: Some(FrostWalk {
                radius: 0,
                revert_ms: Some(5000),
            }),
            ..Default::default()
        },
        3 => BootsAbility {
            frost_walk: Some(FrostWalk {
                radius: 1,
                revert_ms: None,
            }),
            ..Default::default()
        },
        4 => BootsAbility {
            fire_trail: Some(FireTrail {
                radius: 2.0,
                ignite_ms: 2000,
            }),
            ..Default::default()
        },
        6 => BootsAbility {
            lava_walk: Some(LavaWalk { revert_ms: 10_000 }),
            fire_immunity: true,
            ..Default::default()
        },
        7 => BootsAbility {
            teleport: Some(TeleportAbility { distance: 10.0 }),
            ..Default::default()
        },
        _ => return None,
    };
    Some(ability)
}

fn ranged(rank: usize) -> BowAbility {
    match rank {
        1 => bow(1.1, 1.1),
        2 => bow(1.2, 1.1),
        3 => bow(1.3, 1.2),
        4 => BowAbility {
            fire_ticks: 200,
            ..bow(1.5, 1.3)
        },
        5 => BowAbility {
            explosive: true,
            ..bow(1.7, 1.4)
        },
        6 => BowAbility {
            divine: true,
            ..bow(2.0, 1.5)
        },
        _ => BowAbility {
            divine: true,
            ..bow(2.5, 1.5)
        },
    }
}

/// Special abilities for a rank of the default chain
pub fn default_abilities(rank: usize) -> SpecialAbilities {
    if rank == 0 {
        return SpecialAbilities::default();
    }
    SpecialAbilities {
        sword: Some(SwordAbility {
            crit_chance: 5.0 * rank as f64,
        }),
        axe: Some(axe(rank)),
        trident: Some(trident(rank)),
        bow: Some(ranged(rank)),
        helmet: helmet(rank),
        chestplate: chestplate(rank),
        leggings: leggings(rank),
        boots: boots(rank),
    }
}

/// The built-in tiers
pub fn default_tiers() -> Vec<RarityTier> {
    use StatusEffect::*;

    // (display name, color, craft chance, bonuses)
    let rows = [
        ("Common", "white", 40.0, bonuses(0.5, 0.5, 0.0, 0.0, 0.0, 0.0)),
        ("Uncommon", "green", 15.0, bonuses(1.0, 1.0, 0.0, 0.0, 0.0, 0.0)),
        ("Rare", "blue", 7.0, bonuses(2.0, 1.5, 0.5, 1.0, 0.0, 0.0)),
        ("Epic", "dark_purple", 3.0, bonuses(3.0, 2.0, 1.0, 2.0, 0.02, 0.5)),
        ("Legendary", "gold", 1.0, bonuses(4.0, 3.0, 1.5, 4.0, 0.04, 1.0)),
        ("Mythic", "light_purple", 0.2, bonuses(5.5, 4.0, 2.0, 6.0, 0.06, 1.5)),
        ("Divine", "aqua", 0.05, bonuses(7.0, 5.0, 2.5, 8.0, 0.08, 2.0)),
        ("Celestial", "red", 0.01, bonuses(9.0, 6.0, 3.0, 10.0, 0.1, 3.0)),
    ];

    rows.iter()
        .enumerate()
        .map(|(rank, (name, color, chance, bonus))| {
            let mut tier = RarityTier::new(DEFAULT_CHAIN[rank], *name, rank as u32)
                .with_color(*color)
                .with_craft_chance(*chance)
                .with_bonuses(*bonus)
                .with_special(default_abilities(rank));
            if let Some(next) = DEFAULT_CHAIN.get(rank + 1) {
                tier = tier.with_upgrade_target(*next);
            }
            tier = match rank {
                0 | 1 => tier,
                2 => tier.with_on_hit(Slowness, 0).with_effect_gate(6000, 25.0),
                3 => tier.with_on_hit(Slowness, 0).with_on_hit(Weakness, 0).with_effect_gate(5000, 30.0),
                4 => tier.with_on_hit(Poison, 0).with_on_hit(Slowness, 1).with_effect_gate(5000, 35.0),
                5 => tier.with_on_hit(Wither, 0).with_on_hit(Slowness, 1).with_effect_gate(4000, 40.0),
                6 => tier.with_on_hit(Wither, 1).with_on_hit(Weakness, 1).with_effect_gate(4000, 45.0),
                _ => tier
                    .with_on_hit(Wither, 1)
                    .with_on_hit(Weakness, 1)
                    .with_on_hit(Glowing, 0)
                    .with_effect_gate(3000, 50.0),
            };
            tier
        })
        .collect()
}

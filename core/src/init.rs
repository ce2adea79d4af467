use crate::config::MatchConfig;
use crate::constants::*;
use crate::prng::Mulberry32;
use crate::seed::entity_seed;
use crate::types::*;

/// Id used for the stand-in participant when nobody is present.
pub const SYNTHETIC_PARTICIPANT: &str = "player0";

/// Draw position then velocity, in that order: x, z, vx, vz.
fn spawn(seed: Seed, config: &MatchConfig, speed: f64) -> (Vec2, Vec2) {
    let mut rng = Mulberry32::new(seed);
    let x = rng.symmetric(config.spawn_span);
    let z = rng.symmetric(config.spawn_span);
    let vx = rng.symmetric(speed);
    let vz = rng.symmetric(speed);
    (Vec2::new(x, z), Vec2::new(vx, vz))
}

/// Build the initial entity set for a match.
///
/// `participants` must already be in case-insensitive sorted order; the order
/// here is the spawn order and the index order of the pair scan. Generation
/// order is participants, then hostiles, then resources.
pub fn generate(match_digest_hex: &str, participants: &[String], config: &MatchConfig) -> Vec<Entity> {
    let synthetic = [SYNTHETIC_PARTICIPANT.to_string()];
    let roster: &[String] = if participants.is_empty() {
        &synthetic
    } else {
        participants
    };
    let player_count = roster.len();
    let hostiles = config.hostile_count(player_count);
    let resources = config.resource_count(player_count);

    let mut entities = Vec::with_capacity(player_count + hostiles + resources);

    for id in roster {
        let seed = entity_seed(match_digest_hex, PARTICIPANT_TAG, id);
        let (pos, vel) = spawn(seed, config, config.participant_speed);
        entities.push(Entity {
            id: id.clone(),
            role: Role::Participant { health: config.initial_health },
            pos,
            vel,
        });
    }

    for i in 0..hostiles {
        let seed = entity_seed(match_digest_hex, HOSTILE_TAG, &i.to_string());
        let (pos, vel) = spawn(seed, config, config.hostile_speed);
        entities.push(Entity {
            id: format!("foe{i}"),
            role: Role::Hostile,
            pos,
            vel,
        });
    }

    for i in 0..resources {
        let seed = entity_seed(match_digest_hex, RESOURCE_TAG, &i.to_string());
        let (pos, vel) = spawn(seed, config, config.resource_speed);
        entities.push(Entity {
            id: format!("food{i}"),
            role: Role::Resource,
            pos,
            vel,
        });
    }

    entities
}

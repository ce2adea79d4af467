use tracing::debug;

use crate::config::Elimination;
use crate::constants::*;
use crate::events::RemovalReason;
use crate::physics::*;
use crate::state::MatchState;
use crate::types::*;

/// Which side of a colliding pair the rule table removes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    A,
    B,
}

/// Health changes for one overlapping pair. Velocities are already swapped.
fn apply_rules(a: &mut Entity, b: &mut Entity) -> Option<(Side, RemovalReason)> {
    match (&mut a.role, &mut b.role) {
        (Role::Participant { health }, Role::Hostile) => {
            *health -= HOSTILE_DAMAGE;
            Some((Side::B, RemovalReason::KilledByParticipant))
        }
        (Role::Hostile, Role::Participant { health }) => {
            *health -= HOSTILE_DAMAGE;
            Some((Side::A, RemovalReason::KilledByParticipant))
        }
        (Role::Participant { health }, Role::Resource) => {
            *health += RESOURCE_HEAL;
            Some((Side::B, RemovalReason::Consumed))
        }
        (Role::Resource, Role::Participant { health }) => {
            *health += RESOURCE_HEAL;
            Some((Side::A, RemovalReason::Consumed))
        }
        (Role::Participant { health: ha }, Role::Participant { health: hb }) => {
            *ha -= BUMP_DAMAGE;
            *hb -= BUMP_DAMAGE;
            None
        }
        // Hostile/resource pairs just bounce. Ghost pairs never get here.
        (Role::Hostile | Role::Resource, Role::Hostile | Role::Resource) => None,
        (Role::Ghost { .. }, _) | (_, Role::Ghost { .. }) => None,
    }
}

/// Core deterministic transition function.
///
/// Sub-step order:
///  0. No-op if the match is already finished
///  1. Integrate positions
///  2. Pairwise interaction over the start-of-step sequence
///  3. Apply removals flagged during the scan
///  4. Boundary reflection
///  5. Elimination
///  6. Termination check (live count, tick cap)
pub fn step(state: &mut MatchState, tick: Tick) -> StepOutcome {
    // 0. Early return if match is already over
    if state.finished {
        return StepOutcome::Finished;
    }
    state.tick = tick;
    let dt = state.config.step_seconds;
    let half_size = state.config.entity_half_size;

    // 1. Integrate
    for e in state.entities.iter_mut() {
        integrate(e, dt);
    }

    // 2. Pairwise interaction. Removals are flagged by index and applied
    // after the scan so indices stay stable.
    let n = state.entities.len();
    let mut removed = vec![false; n];
    for i in 0..n {
        for j in (i + 1)..n {
            if removed[i] || state.entities[i].is_ghost() {
                break;
            }
            if removed[j] || state.entities[j].is_ghost() {
                continue;
            }
            let (head, tail) = state.entities.split_at_mut(j);
            let (a, b) = (&mut head[i], &mut tail[0]);
            if !overlaps(a, b, half_size) {
                continue;
            }

            state.log.collision(tick, a, b);
            swap_velocities(a, b);

            if let Some((side, reason)) = apply_rules(a, b) {
                let (idx, gone) = match side {
                    Side::A => (i, &*a),
                    Side::B => (j, &*b),
                };
                debug!(tick, id = %gone.id, ?reason, "removed");
                state.log.remove(tick, gone, reason);
                removed[idx] = true;
            }
        }
    }

    // 3. Apply removals
    if removed.iter().any(|&r| r) {
        let mut idx = 0;
        state.entities.retain(|_| {
            let keep = !removed[idx];
            idx += 1;
            keep
        });
    }

    // 4. Boundary reflection
    let half_extent = state.config.playfield_half_extent;
    for e in state.entities.iter_mut() {
        reflect_at_bounds(e, half_extent);
    }

    // 5. Elimination, ascending sequence order
    let elimination = state.config.elimination;
    let mut eliminated = Vec::new();
    for (idx, e) in state.entities.iter_mut().enumerate() {
        let Role::Participant { health } = e.role else {
            continue;
        };
        if health > 0 {
            continue;
        }
        debug!(tick, id = %e.id, health, "eliminated");
        state.log.remove(tick, e, RemovalReason::Eliminated);
        match elimination {
            Elimination::Remove => eliminated.push(idx),
            Elimination::Ghost => {
                e.role = Role::Ghost { health };
                e.vel = Vec2::ZERO;
            }
        }
    }
    for idx in eliminated.into_iter().rev() {
        state.entities.remove(idx);
    }

    // 6. Termination
    if state.live_count() <= 1 || tick >= state.config.max_ticks {
        state.finish();
        return StepOutcome::Finished;
    }
    StepOutcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchConfig;
    use crate::events::{EventData, RemoveData};

    fn entity(id: &str, role: Role, x: f64, z: f64, vx: f64, vz: f64) -> Entity {
        Entity {
            id: id.into(),
            role,
            pos: Vec2::new(x, z),
            vel: Vec2::new(vx, vz),
        }
    }

    fn player(id: &str, health: Health, x: f64, z: f64) -> Entity {
        entity(id, Role::Participant { health }, x, z, 0.0, 0.0)
    }

    /// State with a hand-placed world. The log starts empty so tests only see
    /// events from their own steps.
    fn world(entities: Vec<Entity>, config: MatchConfig) -> MatchState {
        MatchState::with_entities(entities, config)
    }

    /// Two far-away hostiles keep the live count above one.
    fn bystanders() -> Vec<Entity> {
        vec![
            entity("foe8", Role::Hostile, -30.0, -30.0, 0.0, 0.0),
            entity("foe9", Role::Hostile, 30.0, 30.0, 0.0, 0.0),
        ]
    }

    fn removes(state: &MatchState) -> Vec<RemoveData> {
        state
            .log
            .events()
            .iter()
            .filter_map(|e| match &e.data {
                EventData::Remove(r) => Some(r.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn participant_kills_hostile_and_takes_damage() {
        let mut entities = vec![
            player("Amy", 3, 0.0, 0.0),
            entity("foe0", Role::Hostile, 1.0, 0.0, -2.0, 0.0),
        ];
        entities.extend(bystanders());
        let mut state = world(entities, MatchConfig::default());

        assert_eq!(step(&mut state, 1), StepOutcome::Continue);
        assert!(state.entity("foe0").is_none());
        let amy = state.entity("Amy").unwrap();
        assert_eq!(amy.health(), Some(1));
        // Velocities were swapped before the hostile left.
        assert_eq!(amy.vel, Vec2::new(-2.0, 0.0));

        let events = state.log.events();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.tick == 1));
        match &events[0].data {
            EventData::Collision(c) => {
                assert_eq!((c.a.as_str(), c.b.as_str()), ("Amy", "foe0"));
                assert_eq!(c.a_health, Some(3));
                assert_eq!(c.b_health, None);
            }
            other => panic!("expected collision, got {other:?}"),
        }
        assert_eq!(removes(&state)[0].reason, RemovalReason::KilledByParticipant);
    }

    #[test]
    fn hostile_first_in_sequence_still_removed() {
        let mut entities = vec![
            entity("foe0", Role::Hostile, 0.0, 0.0, 0.0, 0.0),
            player("Amy", 3, 0.5, 0.5),
        ];
        entities.extend(bystanders());
        let mut state = world(entities, MatchConfig::default());
        step(&mut state, 1);
        assert!(state.entity("foe0").is_none());
        assert_eq!(state.entity("Amy").unwrap().health(), Some(1));
    }

    #[test]
    fn resource_heals() {
        let mut entities = vec![
            player("Amy", 3, 0.0, 0.0),
            entity("food0", Role::Resource, 0.0, 1.5, 0.0, 0.0),
        ];
        entities.extend(bystanders());
        let mut state = world(entities, MatchConfig::default());
        step(&mut state, 1);
        assert!(state.entity("food0").is_none());
        assert_eq!(state.entity("Amy").unwrap().health(), Some(4));
        assert_eq!(removes(&state)[0].reason, RemovalReason::Consumed);
    }

    #[test]
    fn participants_bump_each_other() {
        let mut entities = vec![player("Amy", 3, 0.0, 0.0), player("Bob", 3, 1.0, 1.0)];
        entities.extend(bystanders());
        let mut state = world(entities, MatchConfig::default());
        step(&mut state, 1);
        assert_eq!(state.entity("Amy").unwrap().health(), Some(2));
        assert_eq!(state.entity("Bob").unwrap().health(), Some(2));
        assert!(removes(&state).is_empty());
    }

    #[test]
    fn removed_hostile_is_not_revisited() {
        // Amy and Bob both overlap foe0. Amy is first in sequence and takes it.
        let mut entities = vec![
            player("Amy", 3, 0.0, 0.0),
            player("Bob", 3, 2.5, 0.0),
            entity("foe0", Role::Hostile, 1.0, 0.0, 0.0, 0.0),
        ];
        entities.extend(bystanders());
        let mut state = world(entities, MatchConfig::default());
        step(&mut state, 1);
        assert_eq!(state.entity("Amy").unwrap().health(), Some(1));
        // Bob only touched foe0, which was already gone.
        assert_eq!(state.entity("Bob").unwrap().health(), Some(3));
        assert_eq!(removes(&state).len(), 1);
    }

    #[test]
    fn hostile_pairs_only_bounce() {
        let mut entities = vec![
            entity("foe0", Role::Hostile, 0.0, 0.0, 1.0, 0.0),
            entity("food0", Role::Resource, 1.0, 0.0, -1.0, 0.0),
        ];
        entities.extend(bystanders());
        let mut state = world(entities, MatchConfig::default());
        step(&mut state, 1);
        assert_eq!(state.live_count(), 4);
        assert_eq!(state.entity("foe0").unwrap().vel, Vec2::new(-1.0, 0.0));
        assert_eq!(state.entity("food0").unwrap().vel, Vec2::new(1.0, 0.0));
        assert_eq!(state.log.len(), 1);
    }

    #[test]
    fn eliminated_participant_removed() {
        let mut entities = vec![
            player("Amy", 1, 0.0, 0.0),
            entity("foe0", Role::Hostile, 1.0, 0.0, 0.0, 0.0),
        ];
        entities.extend(bystanders());
        let mut state = world(entities, MatchConfig::default());
        step(&mut state, 1);
        assert!(state.entity("Amy").is_none());
        let reasons: Vec<RemovalReason> = removes(&state).iter().map(|r| r.reason).collect();
        assert_eq!(
            reasons,
            [RemovalReason::KilledByParticipant, RemovalReason::Eliminated]
        );
    }

    #[test]
    fn eliminated_participant_becomes_ghost() {
        let mut entities = vec![
            player("Amy", 1, 0.0, 0.0),
            entity("foe0", Role::Hostile, 1.0, 0.0, -3.0, 0.0),
        ];
        entities.extend(bystanders());
        let config = MatchConfig::default().with_elimination(Elimination::Ghost);
        let mut state = world(entities, config);
        step(&mut state, 1);

        let amy = state.entity("Amy").unwrap();
        assert!(amy.is_ghost());
        assert_eq!(amy.vel, Vec2::ZERO);
        assert_eq!(removes(&state)[1].kind, EntityKind::Participant);

        // Ghosts never collide: park a hostile on top of it.
        let pos = amy.pos;
        state.entities.push(entity("foe5", Role::Hostile, pos.x, pos.z, 0.0, 0.0));
        let before = state.log.len();
        step(&mut state, 2);
        assert_eq!(state.log.len(), before);
        assert_eq!(state.entity("Amy").unwrap().pos, pos);
    }

    #[test]
    fn ghost_counts_as_live() {
        let entities = vec![
            player("Amy", 1, 0.0, 0.0),
            entity("foe0", Role::Hostile, 1.0, 0.0, 0.0, 0.0),
            entity("foe9", Role::Hostile, 30.0, 30.0, 0.0, 0.0),
        ];
        let config = MatchConfig::default().with_elimination(Elimination::Ghost);
        let mut state = world(entities, config);
        // Ghost Amy plus foe9 remain: two live entities, so play goes on.
        assert_eq!(step(&mut state, 1), StepOutcome::Continue);
        assert_eq!(state.live_count(), 2);
    }

    #[test]
    fn last_entity_standing_finishes() {
        let entities = vec![
            player("Amy", 3, 0.0, 0.0),
            entity("food0", Role::Resource, 1.0, 0.0, 0.0, 0.0),
        ];
        let mut state = world(entities, MatchConfig::default());
        assert_eq!(step(&mut state, 7), StepOutcome::Finished);
        assert!(state.finished);
        match &state.log.last().unwrap().data {
            EventData::FinalSnapshot(snap) => {
                assert_eq!(snap.total_ticks, 7);
                assert_eq!(snap.snapshot.len(), 1);
                assert_eq!(snap.snapshot[0].id, "Amy");
                assert_eq!(snap.snapshot[0].health, Some(4));
            }
            other => panic!("expected final snapshot, got {other:?}"),
        }
        // Finished states do not move.
        let len = state.log.len();
        assert_eq!(step(&mut state, 8), StepOutcome::Finished);
        assert_eq!(state.log.len(), len);
        assert_eq!(state.tick, 7);
    }

    #[test]
    fn tick_cap_forces_finish() {
        let config = MatchConfig::default().with_max_ticks(3);
        let mut state = world(bystanders(), config);
        assert_eq!(step(&mut state, 1), StepOutcome::Continue);
        assert_eq!(step(&mut state, 2), StepOutcome::Continue);
        assert_eq!(step(&mut state, 3), StepOutcome::Finished);
    }

    #[test]
    fn boundary_reflects_without_event() {
        let mut entities = bystanders();
        entities.push(entity("food0", Role::Resource, 48.99, 0.0, 6.0, 0.0));
        let mut state = world(entities, MatchConfig::default());
        step(&mut state, 1);
        let food = state.entity("food0").unwrap();
        assert!(food.pos.x >= 49.0);
        assert_eq!(food.vel.x, -6.0);
        assert!(state.log.is_empty());
        step(&mut state, 2);
        assert_eq!(state.entity("food0").unwrap().vel.x, -6.0);
    }
}

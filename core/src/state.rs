use tracing::{debug, info};

use crate::config::MatchConfig;
use crate::error::ProofError;
use crate::events::EventLog;
use crate::init::generate;
use crate::proof::{finalize, Proof};
use crate::seed::MatchSeed;
use crate::types::*;

/// Everything one match owns. Built fresh for every match, so a new match
/// always starts with an empty log.
///
/// Only the step function and the match lifecycle write to it. Callers get
/// read access, so the log stays append-only.
#[derive(Clone, Debug)]
pub struct MatchState {
    pub(crate) inputs: MatchInputs,
    pub(crate) seed: MatchSeed,
    pub(crate) config: MatchConfig,
    pub(crate) entities: Vec<Entity>,
    pub(crate) log: EventLog,
    /// Tick of the last completed step. Spawns happen at tick 0.
    pub(crate) tick: Tick,
    pub(crate) finished: bool,
}

impl MatchState {
    /// Derive the seed, generate the world and record a spawn per entity.
    pub fn new(inputs: MatchInputs, config: MatchConfig) -> Self {
        let seed = MatchSeed::derive(&inputs.room, &inputs.seed_word);
        let entities = generate(&seed.digest_hex, &inputs.participants, &config);

        let mut log = EventLog::new();
        for e in &entities {
            debug!(id = %e.id, kind = e.kind().as_str(), x = e.pos.x, z = e.pos.z, "spawn");
            log.spawn(0, e);
        }

        info!(
            room = %inputs.room,
            seed = %inputs.seed_word,
            match_seed = seed.seed,
            participants = inputs.participants.len(),
            entities = entities.len(),
            "match started"
        );

        MatchState {
            inputs,
            seed,
            config,
            entities,
            log,
            tick: 0,
            finished: false,
        }
    }

    /// Hand-placed world with an empty log, for exercising single steps.
    #[cfg(test)]
    pub(crate) fn with_entities(entities: Vec<Entity>, config: MatchConfig) -> Self {
        let inputs = MatchInputs::new("test", "seed", vec![]);
        let seed = MatchSeed::derive(&inputs.room, &inputs.seed_word);
        MatchState {
            inputs,
            seed,
            config,
            entities,
            log: EventLog::new(),
            tick: 0,
            finished: false,
        }
    }

    pub fn inputs(&self) -> &MatchInputs {
        &self.inputs
    }

    pub fn seed(&self) -> &MatchSeed {
        &self.seed
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Entities still in the world. Ghosts count.
    pub fn live_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Record the final snapshot at the current tick. No-op once finished.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.log.final_snapshot(self.tick, &self.entities);
        self.finished = true;
        info!(
            tick = self.tick,
            live = self.live_count(),
            events = self.log.len(),
            "match finished"
        );
    }

    /// Proof over the log so far. Meaningful once the match has finished.
    pub fn proof(&self) -> Result<Proof, ProofError> {
        finalize(
            &self.inputs.room,
            &self.inputs.seed_word,
            &self.inputs.participants,
            &self.log,
        )
    }
}

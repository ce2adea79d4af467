pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod init;
pub mod physics;
pub mod prng;
pub mod proof;
pub mod roster;
pub mod seed;
pub mod session;
pub mod state;
pub mod step;
pub mod types;

pub use clock::{FixedSteps, SimulationClock};
pub use config::{Elimination, MatchConfig};
pub use constants::*;
pub use error::{ConfigError, ProofError};
pub use events::{Event, EventData, EventLog, RemovalReason};
pub use init::generate;
pub use prng::*;
pub use proof::{finalize, fingerprint, verify, verify_value, Proof, ProofDocument, ProofMeta};
pub use seed::{derive_seed, digest_hex, MatchSeed};
pub use session::{Match, MatchSession, StartOutcome};
pub use state::MatchState;
pub use step::step;
pub use types::*;

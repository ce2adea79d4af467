//! Prints conformance data for comparing other ports against this core.
//!
//! Usage:
//!   cargo run -p battletanks-core --example conformance -- [prng|spawns|match] [room] [seed] [users...] > vectors.json

use battletanks_core::*;
use serde_json::json;

fn main() {
    let mut args = std::env::args().skip(1);
    let mode = args.next().unwrap_or_else(|| "prng".to_string());
    let room = args.next().unwrap_or_else(|| "BLOGUS".to_string());
    let seed_word = args.next().unwrap_or_else(|| "alpha".to_string());
    let users = roster::sanitize(args);
    let users = if users.is_empty() {
        vec!["Amy".to_string(), "Bob".to_string()]
    } else {
        users
    };

    let output = match mode.as_str() {
        "prng" => {
            // Golden vector: first five outputs for seed 0
            let mut rng = Mulberry32::new(0);
            let values: Vec<f64> = (0..5).map(|_| rng.next_f64()).collect();
            let fixed: Vec<String> = values.iter().map(|v| format!("{v:.6}")).collect();
            json!({ "seed": 0, "values": values, "fixed6": fixed })
        }
        "spawns" => {
            let m = MatchSeed::derive(&room, &seed_word);
            let entities = generate(&m.digest_hex, &users, &MatchConfig::default());
            json!({
                "room": room,
                "seed": seed_word,
                "digest": m.digest_hex,
                "matchSeed": m.seed,
                "entities": entities
                    .iter()
                    .map(|e| json!({
                        "id": e.id,
                        "kind": e.kind(),
                        "x": e.pos.x,
                        "z": e.pos.z,
                        "vx": e.vel.x,
                        "vz": e.vel.z,
                    }))
                    .collect::<Vec<_>>(),
            })
        }
        "match" => {
            // Full match, run without a clock
            let mut m = Match::start(
                MatchInputs::new(room.as_str(), seed_word.as_str(), users),
                MatchConfig::default(),
            );
            m.run_to_end();
            match m.proof() {
                Ok(Some(proof)) => {
                    eprintln!("=== Match result ===");
                    eprintln!("Final tick: {}", m.tick());
                    eprintln!("Survivors: {}", m.entities().len());
                    eprintln!("Fingerprint: {}", proof.fingerprint);
                    json!({ "fingerprint": proof.fingerprint, "ticks": m.tick() })
                }
                Ok(None) => unreachable!("run_to_end always finishes"),
                Err(e) => {
                    eprintln!("Failed to build proof: {e}");
                    std::process::exit(1);
                }
            }
        }
        _ => {
            eprintln!("Unknown mode: {}. Use 'prng', 'spawns', or 'match'", mode);
            std::process::exit(1);
        }
    };

    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}

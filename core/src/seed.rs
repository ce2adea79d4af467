use sha2::{Digest, Sha256};

use crate::types::Seed;

/// SHA-256 of the UTF-8 bytes of `text`.
pub fn digest(text: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hasher.finalize().into()
}

/// Lowercase hex of [`digest`].
pub fn digest_hex(text: &str) -> String {
    hex::encode(digest(text))
}

/// First four digest bytes, big-endian. Total: the empty string is a valid input.
pub fn derive_seed(text: &str) -> Seed {
    let d = digest(text);
    u32::from_be_bytes([d[0], d[1], d[2], d[3]])
}

/// Seed material for a whole match, derived from `room:seed_word`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchSeed {
    pub digest_hex: String,
    pub seed: Seed,
}

impl MatchSeed {
    pub fn derive(room: &str, seed_word: &str) -> Self {
        let text = format!("{room}:{seed_word}");
        let d = digest(&text);
        MatchSeed {
            digest_hex: hex::encode(d),
            seed: u32::from_be_bytes([d[0], d[1], d[2], d[3]]),
        }
    }

    /// Seed for one entity: `digest_hex::tag::discriminator`.
    pub fn entity_seed(&self, tag: &str, discriminator: &str) -> Seed {
        entity_seed(&self.digest_hex, tag, discriminator)
    }
}

pub fn entity_seed(match_digest_hex: &str, tag: &str, discriminator: &str) -> Seed {
    derive_seed(&format!("{match_digest_hex}::{tag}::{discriminator}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_seed() {
        assert_eq!(derive_seed(""), 0xE3B0_C442);
        assert_eq!(
            digest_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn match_seed_vector() {
        let m = MatchSeed::derive("BLOGUS", "alpha");
        assert_eq!(
            m.digest_hex,
            "c765554296eedc5283db6c9fa47fb72417115bf5bdc5b8d5394c3254403cc19f"
        );
        assert_eq!(m.seed, 3_345_306_946);
        assert_eq!(m.seed, derive_seed("BLOGUS:alpha"));
    }

    #[test]
    fn entity_seeds_are_label_local() {
        let m = MatchSeed::derive("BLOGUS", "alpha");
        assert_eq!(m.entity_seed("user", "Amy"), m.entity_seed("user", "Amy"));
        assert_ne!(m.entity_seed("user", "Amy"), m.entity_seed("user", "Bob"));
        assert_ne!(m.entity_seed("foe", "0"), m.entity_seed("food", "0"));
        let text = format!("{}::user::Amy", m.digest_hex);
        assert_eq!(m.entity_seed("user", "Amy"), derive_seed(&text));
    }

    #[test]
    fn seed_word_changes_seed() {
        assert_ne!(
            MatchSeed::derive("BLOGUS", "alpha").seed,
            MatchSeed::derive("BLOGUS", "beta").seed
        );
    }
}

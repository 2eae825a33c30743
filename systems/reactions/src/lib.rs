#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure fusion rule engine mapping nuclide pairs to reaction outcomes.
//!
//! The table is loaded once from textual entries (`"a1,z1-a2,z2"` keys,
//! `"a,z[-tok]*"` outputs) and read-only thereafter. Lookup misses are the
//! normal "cannot merge" signal consumed by the board engine, never an error;
//! malformed entries fail fast at load time instead.

use std::{collections::HashMap, fmt};

use nuclear_synthesis_core::{canonical_pair, Byproduct, Nuclide, Particle};
use thiserror::Error;

/// Proton-proton chain reactions carried over from the original rule set.
///
/// Keys are canonicalized on load, so entries may list either reactant first.
/// The original electron-capture step (PPII, `"4,7-e"`) is not a nuclide pair
/// and is excluded from the pair-keyed table.
const BUILTIN_RULES: [(&str, &str); 6] = [
    ("1,1-1,1", "1,2-p-n"),
    ("1,1-1,2", "2,3-g"),
    ("2,3-2,3", "2,4-1,1-1,1"),
    ("2,3-2,4", "4,7-g"),
    ("3,7-1,1", "2,4-2,4"),
    ("4,7-1,1", "2,4-2,4"),
];

/// Canonical ordered pair of nuclides identifying a fusion rule.
///
/// Construction orders the pair by atomic number, tie-broken by mass number,
/// so the key is symmetric in its arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReactionKey {
    lower: Nuclide,
    higher: Nuclide,
}

impl ReactionKey {
    /// Creates the canonical key for an unordered nuclide pair.
    #[must_use]
    pub fn new(a: Nuclide, b: Nuclide) -> Self {
        let (lower, higher) = canonical_pair(a, b);
        Self { lower, higher }
    }

    /// Lighter reactant of the canonical pair.
    #[must_use]
    pub const fn lower(&self) -> Nuclide {
        self.lower
    }

    /// Heavier reactant of the canonical pair.
    #[must_use]
    pub const fn higher(&self) -> Nuclide {
        self.higher
    }
}

impl fmt::Display for ReactionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lower, self.higher)
    }
}

/// Outcome of a fusion reaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reaction {
    /// Nuclide carried by the merged tile.
    pub product: Nuclide,
    /// Emissions accompanying the product; informational only.
    pub byproducts: Vec<Byproduct>,
}

/// Static, read-only lookup table of fusion rules.
#[derive(Clone, Debug, Default)]
pub struct ReactionTable {
    rules: HashMap<ReactionKey, Reaction>,
}

impl ReactionTable {
    /// Loads the built-in proton-proton chain rule set.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_entries(&BUILTIN_RULES).expect("built-in reaction table is well-formed")
    }

    /// Parses a table from textual `(key, output)` entries, failing fast on
    /// the first malformed entry.
    pub fn from_entries(entries: &[(&str, &str)]) -> Result<Self, ReactionTableError> {
        let mut rules = HashMap::with_capacity(entries.len());
        for (key_text, output_text) in entries {
            let key = parse_key(key_text)?;
            let reaction = parse_output(output_text)?;
            if rules.insert(key, reaction).is_some() {
                return Err(ReactionTableError::DuplicateKey {
                    key: key.to_string(),
                });
            }
        }
        Ok(Self { rules })
    }

    /// Looks up the reaction for an unordered nuclide pair.
    ///
    /// `None` means the pair cannot merge; callers treat this as a normal
    /// refusal rather than an error.
    #[must_use]
    pub fn lookup(&self, a: Nuclide, b: Nuclide) -> Option<&Reaction> {
        self.rules.get(&ReactionKey::new(a, b))
    }

    /// Number of rules held by the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Reports whether the table holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Errors raised while loading a reaction table from text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReactionTableError {
    /// A rule key did not contain exactly two nuclide specifications.
    #[error("rule key {key:?} must name exactly two nuclides")]
    MalformedKey {
        /// Key text that failed validation.
        key: String,
    },
    /// A nuclide specification could not be parsed as `a,z`.
    #[error("nuclide spec {spec:?} is not of the form \"a,z\"")]
    MalformedNuclide {
        /// Nuclide text that failed validation.
        spec: String,
    },
    /// A reaction output was empty or its product was unreadable.
    #[error("rule output {output:?} must start with a product nuclide")]
    MalformedOutput {
        /// Output text that failed validation.
        output: String,
    },
    /// A byproduct token was neither a particle tag nor a nuclide spec.
    #[error("byproduct token {token:?} is neither a particle tag nor a nuclide")]
    MalformedByproduct {
        /// Byproduct token that failed validation.
        token: String,
    },
    /// Two entries canonicalized to the same key.
    #[error("duplicate rule for key {key}")]
    DuplicateKey {
        /// Canonical key text of the colliding entries.
        key: String,
    },
}

fn parse_key(text: &str) -> Result<ReactionKey, ReactionTableError> {
    let mut specs = text.split('-');
    let (Some(first), Some(second), None) = (specs.next(), specs.next(), specs.next()) else {
        return Err(ReactionTableError::MalformedKey {
            key: text.to_owned(),
        });
    };

    let a = parse_nuclide(first)?;
    let b = parse_nuclide(second)?;
    Ok(ReactionKey::new(a, b))
}

fn parse_nuclide(spec: &str) -> Result<Nuclide, ReactionTableError> {
    let malformed = || ReactionTableError::MalformedNuclide {
        spec: spec.to_owned(),
    };

    let (atomic, mass) = spec.split_once(',').ok_or_else(malformed)?;
    let atomic_number: u8 = atomic.trim().parse().map_err(|_| malformed())?;
    let mass_number: u16 = mass.trim().parse().map_err(|_| malformed())?;
    Ok(Nuclide::new(atomic_number, mass_number))
}

fn parse_output(text: &str) -> Result<Reaction, ReactionTableError> {
    let mut tokens = text.split('-');
    let product_spec = tokens
        .next()
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ReactionTableError::MalformedOutput {
            output: text.to_owned(),
        })?;
    let product = parse_nuclide(product_spec)?;

    let mut byproducts = Vec::new();
    for token in tokens {
        let byproduct = match Particle::from_tag(token) {
            Some(particle) => Byproduct::Particle(particle),
            None => Byproduct::Nucleus(parse_nuclide(token).map_err(|_| {
                ReactionTableError::MalformedByproduct {
                    token: token.to_owned(),
                }
            })?),
        };
        byproducts.push(byproduct);
    }

    Ok(Reaction {
        product,
        byproducts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaction_key_is_symmetric() {
        let pairs = [
            (Nuclide::new(1, 1), Nuclide::new(1, 2)),
            (Nuclide::new(2, 3), Nuclide::new(2, 4)),
            (Nuclide::new(3, 7), Nuclide::new(1, 1)),
            (Nuclide::new(4, 7), Nuclide::new(4, 7)),
        ];

        for (a, b) in pairs {
            assert_eq!(ReactionKey::new(a, b), ReactionKey::new(b, a));
            assert_eq!(
                ReactionKey::new(a, b).to_string(),
                ReactionKey::new(b, a).to_string()
            );
        }
    }

    #[test]
    fn equal_nuclides_serialize_repeated() {
        let key = ReactionKey::new(Nuclide::new(1, 1), Nuclide::new(1, 1));
        assert_eq!(key.to_string(), "1,1-1,1");
    }

    #[test]
    fn builtin_table_loads_and_covers_pp_chain() {
        let table = ReactionTable::builtin();
        assert_eq!(table.len(), 6);

        let reaction = table
            .lookup(Nuclide::PROTIUM, Nuclide::PROTIUM)
            .expect("protium pair fuses");
        assert_eq!(reaction.product, Nuclide::DEUTERIUM);
        assert_eq!(
            reaction.byproducts,
            vec![
                Byproduct::Particle(Particle::Positron),
                Byproduct::Particle(Particle::Neutrino),
            ]
        );
    }

    #[test]
    fn non_canonical_entries_are_reachable_from_either_order() {
        let table = ReactionTable::builtin();
        let lithium = Nuclide::new(3, 7);

        assert!(table.lookup(lithium, Nuclide::PROTIUM).is_some());
        assert!(table.lookup(Nuclide::PROTIUM, lithium).is_some());
    }

    #[test]
    fn ppi_byproducts_decode_as_nuclei() {
        let table = ReactionTable::builtin();
        let helium3 = Nuclide::new(2, 3);

        let reaction = table.lookup(helium3, helium3).expect("PPI step exists");
        assert_eq!(reaction.product, Nuclide::new(2, 4));
        assert_eq!(
            reaction.byproducts,
            vec![
                Byproduct::Nucleus(Nuclide::PROTIUM),
                Byproduct::Nucleus(Nuclide::PROTIUM),
            ]
        );
    }

    #[test]
    fn lookup_miss_is_not_an_error() {
        let table = ReactionTable::builtin();
        assert!(table
            .lookup(Nuclide::new(2, 4), Nuclide::new(2, 4))
            .is_none());
    }

    #[test]
    fn loader_rejects_particle_in_key() {
        let error = ReactionTable::from_entries(&[("4,7-e", "3,7-n")])
            .expect_err("electron capture is not a nuclide pair");
        assert_eq!(
            error,
            ReactionTableError::MalformedNuclide {
                spec: "e".to_owned()
            }
        );
    }

    #[test]
    fn loader_rejects_short_and_long_keys() {
        assert!(matches!(
            ReactionTable::from_entries(&[("1,1", "1,2")]),
            Err(ReactionTableError::MalformedKey { .. })
        ));
        assert!(matches!(
            ReactionTable::from_entries(&[("1,1-1,1-1,1", "1,2")]),
            Err(ReactionTableError::MalformedKey { .. })
        ));
    }

    #[test]
    fn loader_rejects_empty_output() {
        assert!(matches!(
            ReactionTable::from_entries(&[("1,1-1,1", "")]),
            Err(ReactionTableError::MalformedOutput { .. })
        ));
    }

    #[test]
    fn loader_rejects_unknown_byproduct_token() {
        assert!(matches!(
            ReactionTable::from_entries(&[("1,1-1,1", "1,2-q")]),
            Err(ReactionTableError::MalformedByproduct { .. })
        ));
    }

    #[test]
    fn loader_rejects_colliding_canonical_keys() {
        let error = ReactionTable::from_entries(&[("1,1-1,2", "2,3-g"), ("1,2-1,1", "2,3")])
            .expect_err("reordered duplicate must collide");
        assert_eq!(
            error,
            ReactionTableError::DuplicateKey {
                key: "1,1-1,2".to_owned()
            }
        );
    }
}

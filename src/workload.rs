//! A module for defining the [`Workload`] of key/value pairs a probe run
//! sweeps through its request phases.

use std::collections::HashMap;

use rand::distr::Alphanumeric;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

/// Characters random keys are drawn from.
const KEY_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// How keys and values are synthesized.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// The loop index serves as both key and value. Nothing is stored; every
    /// phase recomputes the sequence `0..count`.
    Sequential,
    /// Random alphabetic keys (length 5–10) mapped to random alphanumeric
    /// values (length 5–15), retained in an insertion-ordered mapping for the
    /// later phases.
    Random,
}

/// A builder for creating a [`Workload`].
#[derive(Debug)]
pub struct WorkloadBuilder {
    mode: Mode,
    count: usize,
    seed: u64,
}

impl WorkloadBuilder {
    /// The number of keys to generate.
    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Seeds the RNG driving random generation, for reproducible workloads.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Creates the workload instance, generating the retained pairs in
    /// random mode.
    pub fn build(self) -> Workload {
        let entries = match self.mode {
            Mode::Sequential => Vec::new(),
            Mode::Random => {
                let mut rng = SmallRng::seed_from_u64(self.seed);
                let mut entries = Vec::with_capacity(self.count);
                let mut index = HashMap::with_capacity(self.count);
                for _ in 0..self.count {
                    let key = random_key(&mut rng);
                    let value = random_value(&mut rng);
                    insert_pair(&mut entries, &mut index, key, value);
                }
                entries
            }
        };

        Workload {
            mode: self.mode,
            count: self.count,
            entries,
        }
    }
}

/// The set of key/value pairs driving one probe run.
///
/// The workload owns its entries for the duration of the run; each request
/// phase borrows them read-only via [`entries`](Self::entries) and visits
/// them in generation order.
#[derive(Debug)]
pub struct Workload {
    mode: Mode,
    count: usize,
    /// Retained pairs in insertion order; empty in sequential mode.
    entries: Vec<(String, String)>,
}

impl Workload {
    /// Constructs a new workload builder for the given mode.
    pub fn builder(mode: Mode) -> WorkloadBuilder {
        WorkloadBuilder {
            mode,
            count: 1000,
            seed: rand::random(),
        }
    }

    /// Creates a retained workload from explicit pairs.
    ///
    /// The pairs pass through the same insertion-ordered mapping as random
    /// generation: a repeated key overwrites the stored value in place and
    /// keeps its original position. The resulting workload behaves like
    /// random mode, including the post-delete verification pass.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries = Vec::new();
        let mut index = HashMap::new();
        for (key, value) in pairs {
            insert_pair(&mut entries, &mut index, key.into(), value.into());
        }

        Workload {
            mode: Mode::Random,
            count: entries.len(),
            entries,
        }
    }

    /// The generation mode of this workload.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The number of keys a single phase visits.
    ///
    /// In random mode this can be less than the requested count when a key
    /// collision overwrote an earlier pair.
    pub fn len(&self) -> usize {
        match self.mode {
            Mode::Sequential => self.count,
            Mode::Random => self.entries.len(),
        }
    }

    /// Whether the workload contains no keys at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the workload entries in generation order.
    ///
    /// Sequential workloads recompute their entries on every call, yielding
    /// the identical sequence each time.
    pub fn entries(&self) -> Entries<'_> {
        let repr = match self.mode {
            Mode::Sequential => EntriesRepr::Sequential {
                next: 0,
                count: self.count,
            },
            Mode::Random => EntriesRepr::Retained(self.entries.iter()),
        };
        Entries { repr }
    }
}

/// A generated (key, value) pair used as input to a request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WorkloadEntry {
    /// The key under which the value is stored.
    pub key: String,
    /// The payload associated with the key.
    pub value: String,
}

/// Iterator over the entries of a [`Workload`], in generation order.
#[derive(Debug)]
pub struct Entries<'a> {
    repr: EntriesRepr<'a>,
}

#[derive(Debug)]
enum EntriesRepr<'a> {
    Sequential { next: usize, count: usize },
    Retained(std::slice::Iter<'a, (String, String)>),
}

impl Iterator for Entries<'_> {
    type Item = WorkloadEntry;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.repr {
            EntriesRepr::Sequential { next, count } => {
                if next < count {
                    let index = next.to_string();
                    *next += 1;
                    Some(WorkloadEntry {
                        key: index.clone(),
                        value: index,
                    })
                } else {
                    None
                }
            }
            EntriesRepr::Retained(iter) => iter.next().map(|(key, value)| WorkloadEntry {
                key: key.clone(),
                value: value.clone(),
            }),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match &self.repr {
            EntriesRepr::Sequential { next, count } => count - next,
            EntriesRepr::Retained(iter) => iter.len(),
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Entries<'_> {}

/// Inserts a pair into the retained mapping.
///
/// A repeated key overwrites the stored value at its original insertion
/// position; no regeneration is attempted.
fn insert_pair(
    entries: &mut Vec<(String, String)>,
    index: &mut HashMap<String, usize>,
    key: String,
    value: String,
) {
    match index.get(&key) {
        Some(&at) => entries[at].1 = value,
        None => {
            index.insert(key.clone(), entries.len());
            entries.push((key, value));
        }
    }
}

fn random_key(rng: &mut SmallRng) -> String {
    let len = rng.random_range(5..=10);
    (0..len)
        .map(|_| KEY_ALPHABET[rng.random_range(0..KEY_ALPHABET.len())] as char)
        .collect()
}

fn random_value(rng: &mut SmallRng) -> String {
    let len = rng.random_range(5..=15);
    (0..len).map(|_| rng.sample(Alphanumeric) as char).collect()
}

use serde::{Deserialize, Serialize};

use crate::types::Intent;

pub const JOURNAL_FORMAT_VERSION: u16 = 1;

/// Seed plus every accepted intent, enough to rebuild a run exactly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputJournal {
    pub format_version: u16,
    pub seed: u64,
    pub intents: Vec<IntentRecord>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRecord {
    pub seq: u64,
    pub intent: Intent,
}

impl InputJournal {
    pub fn new(seed: u64) -> Self {
        Self { format_version: JOURNAL_FORMAT_VERSION, seed, intents: Vec::new() }
    }

    pub fn append_intent(&mut self, intent: Intent) {
        let seq = self.intents.len() as u64;
        self.intents.push(IntentRecord { seq, intent });
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

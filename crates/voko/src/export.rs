//! Output records and their JSON rendering.
//!
//! One extracted article becomes a mapping from headword to its numbered
//! senses. Headword insertion order and sense order are preserved all the
//! way into the JSON text, so identical input bytes always produce
//! identical output bytes.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::VokoError;
use crate::senses::Sense;

/// One numbered sense in an output record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SenseRecord {
    pub number: String,
    pub text: String,
}

impl From<Sense> for SenseRecord {
    fn from(sense: Sense) -> Self {
        Self {
            number: sense.number,
            text: sense.text,
        }
    }
}

/// Extracted senses of one article: headword to ordered senses.
pub type ArticleRecord = IndexMap<String, Vec<SenseRecord>>;

/// Serializes any record to compact JSON.
pub fn to_json<T: Serialize>(record: &T) -> Result<String, VokoError> {
    Ok(serde_json::to_string(record)?)
}

/// Serializes any record to pretty-printed JSON for file output.
pub fn to_json_pretty<T: Serialize>(record: &T) -> Result<String, VokoError> {
    Ok(serde_json::to_string_pretty(record)?)
}

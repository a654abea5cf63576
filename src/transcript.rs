//! Chat transcript: processed turns kept alongside the user's question.
//!
//! Each [`TranscriptEntry`] owns the directive produced for its turn. The
//! transcript is bounded; pushing past capacity evicts the oldest entry and
//! its directive with it. Stored history can be replayed through a
//! [`DirectiveEngine`] to rebuild the displayed conversation.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::pipeline::{AssistantTurn, DirectiveEngine};

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("history decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A chat message as stored by the query backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub dataset_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    pub user_message: String,
    /// Raw model text, directive payload included.
    pub ai_response: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub response_time_ms: Option<u64>,
}

/// One question/answer exchange after directive processing.
///
/// Serializes as a [`HistoryRecord`] with the processed `prose` and
/// `directive` alongside, so stored entries replay unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptEntry {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub user_message: String,
    pub ai_response: String,
    #[serde(flatten)]
    pub turn: AssistantTurn,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
}

impl TranscriptEntry {
    /// Process a stored record into an entry, keeping its id when present.
    pub fn from_record(engine: &DirectiveEngine, record: HistoryRecord) -> Self {
        Self {
            id: record.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            dataset_id: record.dataset_id,
            user_id: record.user_id,
            turn: engine.process(&record.ai_response),
            user_message: record.user_message,
            ai_response: record.ai_response,
            timestamp: record.timestamp,
            response_time_ms: record.response_time_ms,
        }
    }
}

/// Ordered, bounded list of transcript entries.
#[derive(Debug, Clone)]
pub struct Transcript {
    entries: VecDeque<TranscriptEntry>,
    capacity: usize,
}

impl Transcript {
    /// A zero capacity is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.history_capacity)
    }

    /// Rebuild a transcript from stored history, preserving record order.
    pub fn replay<I>(engine: &DirectiveEngine, records: I, capacity: usize) -> Self
    where
        I: IntoIterator<Item = HistoryRecord>,
    {
        let mut transcript = Self::new(capacity);
        for record in records {
            transcript.push(TranscriptEntry::from_record(engine, record));
        }
        log::debug!("replayed {} transcript entries", transcript.len());
        transcript
    }

    /// Decode a JSON array of stored records and replay it.
    pub fn from_json(
        engine: &DirectiveEngine,
        json: &str,
        capacity: usize,
    ) -> Result<Self, TranscriptError> {
        let records: Vec<HistoryRecord> = serde_json::from_str(json)?;
        Ok(Self::replay(engine, records, capacity))
    }

    /// Process a fresh assistant reply and append it.
    pub fn record(
        &mut self,
        engine: &DirectiveEngine,
        user_message: impl Into<String>,
        ai_response: &str,
        response_time_ms: Option<u64>,
    ) -> &TranscriptEntry {
        let entry = TranscriptEntry {
            id: Uuid::new_v4().to_string(),
            dataset_id: None,
            user_id: None,
            user_message: user_message.into(),
            ai_response: ai_response.to_string(),
            turn: engine.process(ai_response),
            timestamp: Utc::now(),
            response_time_ms,
        };
        self.push(entry);
        // push always leaves at least the new entry in place
        &self.entries[self.entries.len() - 1]
    }

    /// Append an entry, returning the evicted oldest one when full.
    pub fn push(&mut self, entry: TranscriptEntry) -> Option<TranscriptEntry> {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        if let Some(old) = &evicted {
            log::debug!("evicted transcript entry {}", old.id);
        }
        self.entries.push_back(entry);
        evicted
    }

    pub fn iter(&self) -> impl Iterator<Item = &TranscriptEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&TranscriptEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Serialize entries for the transcript store.
    pub fn to_json(&self) -> Result<String, TranscriptError> {
        Ok(serde_json::to_string(&self.entries)?)
    }
}

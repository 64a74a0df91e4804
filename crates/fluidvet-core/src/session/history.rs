//! Append-only reevaluation history with a SHA-256 record chain.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::{AdjustmentOutcome, RateSet, ReevalRecord, RiskLevel, VitalSigns};

use super::{SessionError, SessionResult};

/// Ordered reevaluation records for one clinical encounter.
///
/// Records can only be appended. Each record's hash covers its content and the
/// previous record's hash, so any edit to an exported history is detectable
/// with [`ReevalHistory::verify`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ReevalHistory {
    records: Vec<ReevalRecord>,
}

/// Hashed portion of a record.
#[derive(Serialize)]
struct RecordBody<'a> {
    sequence: u32,
    record_id: &'a str,
    recorded_at: &'a str,
    vitals: &'a VitalSigns,
    rates: &'a RateSet,
    adjustments: &'a [String],
    recommendation: &'a str,
    risk_level: RiskLevel,
}

impl<'a> From<&'a ReevalRecord> for RecordBody<'a> {
    fn from(record: &'a ReevalRecord) -> Self {
        Self {
            sequence: record.sequence,
            record_id: &record.record_id,
            recorded_at: &record.recorded_at,
            vitals: &record.vitals,
            rates: &record.rates,
            adjustments: &record.adjustments,
            recommendation: &record.recommendation,
            risk_level: record.risk_level,
        }
    }
}

impl ReevalHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[ReevalRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReevalRecord> {
        self.records.iter()
    }

    pub fn latest(&self) -> Option<&ReevalRecord> {
        self.records.last()
    }

    /// Hash of the newest record, if any.
    pub fn head_hash(&self) -> Option<&str> {
        self.records.last().map(|r| r.record_hash.as_str())
    }

    /// Highest risk level seen over the encounter.
    pub fn peak_risk(&self) -> RiskLevel {
        self.records
            .iter()
            .fold(RiskLevel::Normal, |acc, r| acc.escalate(r.risk_level))
    }

    /// Append a new record stamped with the current time.
    pub(crate) fn append(
        &mut self,
        vitals: VitalSigns,
        rates: RateSet,
        outcome: AdjustmentOutcome,
    ) -> SessionResult<&ReevalRecord> {
        let prev_hash = self.head_hash().unwrap_or_default().to_string();
        let recommendation = outcome.recommendation();

        let mut record = ReevalRecord {
            sequence: self.records.len() as u32 + 1,
            record_id: uuid::Uuid::new_v4().to_string(),
            recorded_at: chrono::Utc::now().to_rfc3339(),
            vitals,
            rates,
            adjustments: outcome.triggered,
            recommendation,
            risk_level: outcome.risk_level,
            prev_hash,
            record_hash: String::new(),
        };
        record.record_hash = record_hash(&record.prev_hash, &RecordBody::from(&record))?;

        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Check sequence numbers and the hash chain.
    pub fn verify(&self) -> SessionResult<()> {
        let mut prev_hash = String::new();

        for (index, record) in self.records.iter().enumerate() {
            let expected_sequence = index as u32 + 1;
            if record.sequence != expected_sequence {
                return Err(SessionError::SequenceGap {
                    expected: expected_sequence,
                    found: record.sequence,
                });
            }

            let computed = record_hash(&prev_hash, &RecordBody::from(record))?;
            if record.prev_hash != prev_hash || record.record_hash != computed {
                return Err(SessionError::Tampered {
                    sequence: record.sequence,
                });
            }

            prev_hash = computed;
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a ReevalHistory {
    type Item = &'a ReevalRecord;
    type IntoIter = std::slice::Iter<'a, ReevalRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Hash of a record body chained to the previous hash.
fn record_hash(prev_hash: &str, body: &RecordBody<'_>) -> Result<String, serde_json::Error> {
    let payload = serde_json::to_string(body)?;

    let mut hasher = Sha256::new();
    hasher.update(prev_hash.as_bytes());
    hasher.update(payload.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

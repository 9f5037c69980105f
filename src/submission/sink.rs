//! Record submission.
//!
//! Validated entries are handed to a [`RecordSink`]. The core never knows how
//! a sink stores records; the shipped [`LoggingSink`] only logs them.

use super::form::{BirthEntry, BirthForm, DeathEntry, DeathForm, ValidationErrors};
use crate::models::RegionCatalog;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// A form awaiting submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordCandidate {
    Birth(BirthForm),
    Death(DeathForm),
}

/// A candidate that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ValidatedRecord {
    Birth(BirthEntry),
    Death(DeathEntry),
}

impl ValidatedRecord {
    pub fn region(&self) -> &str {
        match self {
            ValidatedRecord::Birth(entry) => &entry.region,
            ValidatedRecord::Death(entry) => &entry.region,
        }
    }

    /// `"birth"` or `"death"`.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidatedRecord::Birth(_) => "birth",
            ValidatedRecord::Death(_) => "death",
        }
    }
}

/// Raised by a sink that refuses a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SinkError(pub String);

/// Why a submission did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Submission has invalid fields: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error("Record was not accepted: {0}")]
    Rejected(#[from] SinkError),
}

/// Destination for validated records.
pub trait RecordSink {
    fn submit(&mut self, record: &ValidatedRecord) -> Result<(), SinkError>;
}

/// Sink that logs each record and keeps nothing.
#[derive(Debug, Default)]
pub struct LoggingSink {
    accepted: usize,
}

impl LoggingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records accepted so far.
    pub fn accepted(&self) -> usize {
        self.accepted
    }
}

impl RecordSink for LoggingSink {
    fn submit(&mut self, record: &ValidatedRecord) -> Result<(), SinkError> {
        match record {
            ValidatedRecord::Birth(entry) => info!(
                region = %entry.region,
                gender = %entry.gender,
                date_of_birth = %entry.date_of_birth,
                "Birth record submitted"
            ),
            ValidatedRecord::Death(entry) => info!(
                region = %entry.region,
                age = entry.age,
                date_of_death = %entry.date_of_death,
                "Death record submitted"
            ),
        }
        self.accepted += 1;
        Ok(())
    }
}

/// Confirmation shown after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionNotice {
    pub title: String,
    pub description: String,
}

impl SubmissionNotice {
    fn for_record(record: &ValidatedRecord) -> Self {
        let title = match record {
            ValidatedRecord::Birth(_) => "Birth Record Submitted",
            ValidatedRecord::Death(_) => "Death Record Submitted",
        };
        Self {
            title: title.to_string(),
            description: format!(
                "A new {} record for {} has been logged.",
                record.kind(),
                record.region()
            ),
        }
    }
}

/// Validate a candidate and pass it to `sink`.
pub fn submit_record<S: RecordSink + ?Sized>(
    candidate: &RecordCandidate,
    catalog: &RegionCatalog,
    today: NaiveDate,
    sink: &mut S,
) -> Result<SubmissionNotice, SubmissionError> {
    let record = match candidate {
        RecordCandidate::Birth(form) => ValidatedRecord::Birth(form.validate(catalog, today)?),
        RecordCandidate::Death(form) => ValidatedRecord::Death(form.validate(catalog, today)?),
    };

    sink.submit(&record)?;
    Ok(SubmissionNotice::for_record(&record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::form::{Field, Gender};

    #[derive(Default)]
    struct MemorySink {
        records: Vec<ValidatedRecord>,
    }

    impl RecordSink for MemorySink {
        fn submit(&mut self, record: &ValidatedRecord) -> Result<(), SinkError> {
            self.records.push(record.clone());
            Ok(())
        }
    }

    struct ClosedSink;

    impl RecordSink for ClosedSink {
        fn submit(&mut self, _record: &ValidatedRecord) -> Result<(), SinkError> {
            Err(SinkError("registry is closed".to_string()))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn birth_candidate() -> RecordCandidate {
        RecordCandidate::Birth(BirthForm {
            region: Some("Lagos".to_string()),
            gender: Some("Male".to_string()),
            date_of_birth: Some("2024-05-01".to_string()),
        })
    }

    #[test]
    fn test_submit_birth() {
        let mut sink = MemorySink::default();
        let notice =
            submit_record(&birth_candidate(), &RegionCatalog::nigeria(), today(), &mut sink)
                .unwrap();

        assert_eq!(notice.title, "Birth Record Submitted");
        assert_eq!(
            notice.description,
            "A new birth record for Lagos has been logged."
        );
        assert_eq!(sink.records.len(), 1);
        match &sink.records[0] {
            ValidatedRecord::Birth(entry) => assert_eq!(entry.gender, Gender::Male),
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn test_submit_death_with_logging_sink() {
        let candidate = RecordCandidate::Death(DeathForm {
            region: Some("Kano".to_string()),
            age: Some("71".to_string()),
            date_of_death: Some("2024-06-01".to_string()),
        });
        let mut sink = LoggingSink::new();
        let notice =
            submit_record(&candidate, &RegionCatalog::nigeria(), today(), &mut sink).unwrap();

        assert_eq!(notice.title, "Death Record Submitted");
        assert_eq!(
            notice.description,
            "A new death record for Kano has been logged."
        );
        assert_eq!(sink.accepted(), 1);
    }

    #[test]
    fn test_invalid_candidate_never_reaches_sink() {
        let candidate = RecordCandidate::Birth(BirthForm::default());
        let mut sink = MemorySink::default();
        let err =
            submit_record(&candidate, &RegionCatalog::nigeria(), today(), &mut sink).unwrap_err();

        match err {
            SubmissionError::Invalid(errors) => {
                assert!(errors.for_field(Field::Region).is_some());
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(sink.records.is_empty());
    }

    #[test]
    fn test_sink_rejection_is_reported() {
        let err = submit_record(
            &birth_candidate(),
            &RegionCatalog::nigeria(),
            today(),
            &mut ClosedSink,
        )
        .unwrap_err();

        assert_eq!(
            err,
            SubmissionError::Rejected(SinkError("registry is closed".to_string()))
        );
        assert_eq!(err.to_string(), "Record was not accepted: registry is closed");
    }

    #[test]
    fn test_validated_record_serializes_with_kind_tag() {
        let record = ValidatedRecord::Death(DeathEntry {
            region: "Oyo".to_string(),
            age: 50,
            date_of_death: today(),
        });
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "death");
        assert_eq!(json["date_of_death"], "2024-06-15");
    }
}

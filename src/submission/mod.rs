//! Data entry: form validation and record submission.

pub mod form;
pub mod sink;

pub use form::{
    earliest_allowed_date, BirthEntry, BirthForm, DeathEntry, DeathForm, Field, FieldError,
    Gender, ValidationErrors, DATE_FORMAT,
};
pub use sink::{
    submit_record, LoggingSink, RecordCandidate, RecordSink, SinkError, SubmissionError,
    SubmissionNotice, ValidatedRecord,
};

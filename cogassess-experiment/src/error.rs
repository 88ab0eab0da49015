use std::path::PathBuf;

use cogassess_core::{ConsentError, Stage, SubTestKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssessmentError {
    #[error(transparent)]
    ConsentRejected(#[from] ConsentError),

    #[error("{subtest} trial pool has {pool} entries but {required} trials are configured")]
    InsufficientPool {
        subtest: SubTestKind,
        pool: usize,
        required: usize,
    },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("no trial has been presented yet")]
    TrialNotPresented,

    #[error("{subtest} question {question} is no longer awaiting a response")]
    StaleResponse { subtest: SubTestKind, question: usize },

    #[error("stage {stage} does not accept {input}")]
    NotAccepting { stage: Stage, input: &'static str },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AssessmentError>;

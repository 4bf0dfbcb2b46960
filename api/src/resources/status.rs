use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Processing state of a resource, as reported under `status.code`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    Waiting,
    Queued,
    Started,
    InProgress,
    Summarized,
    Finished,
    Faulty,
    Unknown,
    Runnable,
}

impl Status {
    pub fn from_code(code: i64) -> Option<Status> {
        Some(match code {
            0 => Status::Waiting,
            1 => Status::Queued,
            2 => Status::Started,
            3 => Status::InProgress,
            4 => Status::Summarized,
            5 => Status::Finished,
            -1 => Status::Faulty,
            -2 => Status::Unknown,
            -3 => Status::Runnable,
            _ => return None,
        })
    }

    pub fn code(&self) -> i64 {
        match self {
            Status::Waiting => 0,
            Status::Queued => 1,
            Status::Started => 2,
            Status::InProgress => 3,
            Status::Summarized => 4,
            Status::Finished => 5,
            Status::Faulty => -1,
            Status::Unknown => -2,
            Status::Runnable => -3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Status::Waiting => "WAITING",
            Status::Queued => "QUEUED",
            Status::Started => "STARTED",
            Status::InProgress => "IN_PROGRESS",
            Status::Summarized => "SUMMARIZED",
            Status::Finished => "FINISHED",
            Status::Faulty => "FAULTY",
            Status::Unknown => "UNKNOWN",
            Status::Runnable => "RUNNABLE",
        }
    }

    /// Finished and faulty resources never change status again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Finished | Status::Faulty)
    }
}

impl Display for Status {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        write!(formatter, "{}", self.name())
    }
}

/// Name of a raw status code; codes outside the table map to `"UNKNOWN"`.
pub fn status_name(code: i64) -> &'static str {
    Status::from_code(code).unwrap_or(Status::Unknown).name()
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ResourceStatus {
    pub code: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl ResourceStatus {
    pub fn status(&self) -> Status {
        Status::from_code(self.code).unwrap_or(Status::Unknown)
    }

    pub fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }
}

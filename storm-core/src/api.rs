//! Wire models for the Storm on Demand API
//!
//! Requests carry their parameters as a JSON object under a single `params`
//! key; responses are arbitrary JSON objects. Failures are reported inside
//! an otherwise successful (HTTP 200) response body as an object carrying
//! an `error_class` key.

use crate::error::StormError;
use crate::params::ParamBag;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded response body: a generic associative structure
pub type ResponseData = Map<String, Value>;

/// JSON request body wrapping the parameter bag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// Method parameters
    pub params: ParamBag,
}

impl RequestEnvelope {
    /// Wrap a parameter bag for transmission
    pub fn new(params: ParamBag) -> Self {
        Self { params }
    }
}

/// An API-level fault embedded in a response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFault {
    /// The vendor's exception class, e.g. `LW::Exception::Authorization`
    pub class: String,
    /// Human-readable fault description
    pub message: String,
}

impl ApiFault {
    /// Detect a fault in a decoded response body.
    ///
    /// The API signals failure with an `error_class` key; the accompanying
    /// message lives in `full_message` or `error_message` depending on the
    /// fault type.
    pub fn from_response(data: &ResponseData) -> Option<Self> {
        let class = data.get("error_class")?.as_str()?.to_string();
        let message = data
            .get("full_message")
            .or_else(|| data.get("error_message"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Some(Self { class, message })
    }
}

impl From<ApiFault> for StormError {
    fn from(fault: ApiFault) -> Self {
        StormError::Api {
            class: fault.class,
            message: fault.message,
        }
    }
}

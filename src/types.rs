use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::FieldError;

/// A pre-assessment notification as stored by the receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookRecord {
    pub organization_id: String,
    pub preassessment_id: String,
    pub regulation_id: String,
    pub received_at: DateTime<Utc>,
}

impl WebhookRecord {
    pub fn new(payload: PreassessmentPayload, received_at: DateTime<Utc>) -> Self {
        Self {
            organization_id: payload.organization_id,
            preassessment_id: payload.preassessment_id,
            regulation_id: payload.regulation_id,
            received_at,
        }
    }

    pub fn payload(&self) -> PreassessmentPayload {
        PreassessmentPayload {
            organization_id: self.organization_id.clone(),
            preassessment_id: self.preassessment_id.clone(),
            regulation_id: self.regulation_id.clone(),
        }
    }
}

/// Validated body of `POST /webhook/preassessment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreassessmentPayload {
    pub organization_id: String,
    pub preassessment_id: String,
    pub regulation_id: String,
}

impl PreassessmentPayload {
    /// Check a decoded JSON object against the payload schema.
    ///
    /// Returns every failing field, in declaration order. Unknown keys are
    /// ignored.
    pub fn from_object(mut object: Map<String, Value>) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        let organization_id =
            required_string("organization_id", object.remove("organization_id"), &mut errors);
        let preassessment_id =
            required_string("preassessment_id", object.remove("preassessment_id"), &mut errors);
        let regulation_id =
            required_string("regulation_id", object.remove("regulation_id"), &mut errors);

        match (organization_id, preassessment_id, regulation_id) {
            (Some(organization_id), Some(preassessment_id), Some(regulation_id)) => Ok(Self {
                organization_id,
                preassessment_id,
                regulation_id,
            }),
            _ => Err(errors),
        }
    }
}

fn required_string(
    field: &'static str,
    value: Option<Value>,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match value {
        None => {
            errors.push(FieldError::new(field, "field required"));
            None
        }
        Some(Value::String(s)) if s.is_empty() => {
            errors.push(FieldError::new(field, "must not be empty"));
            None
        }
        Some(Value::String(s)) => Some(s),
        Some(_) => {
            errors.push(FieldError::new(field, "must be a string"));
            None
        }
    }
}

// ─── Response bodies ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoint: &'static str,
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub received_at: DateTime<Utc>,
    pub payload: PreassessmentPayload,
}

#[derive(Debug, Serialize)]
pub struct ReceivedList {
    pub total_received: usize,
    pub webhooks: Vec<WebhookRecord>,
}

#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub status: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub webhooks_received: usize,
}

use actix_web::{http::StatusCode, HttpResponse, HttpResponseBuilder};
use rp_error::Error;
use rp_mirror::SyncState;
use serde::Serialize;
use serde_json::Value;

pub mod document;
pub mod resource;

#[derive(Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(rename = "localApplied", skip_serializing_if = "Option::is_none")]
    local_applied: Option<bool>,
    #[serde(rename = "remoteApplied", skip_serializing_if = "Option::is_none")]
    remote_applied: Option<bool>,
}

impl Response {
    /// `{"status": "Ok"}`
    pub fn ok(status_code: &StatusCode) -> HttpResponse {
        HttpResponseBuilder::new(*status_code).json(Self {
            status: Some("Ok"),
            error: None,
            local_applied: None,
            remote_applied: None,
        })
    }

    pub fn data<T: Serialize>(status_code: &StatusCode, data: T) -> HttpResponse {
        match serde_json::to_value(data) {
            Ok(data) => HttpResponseBuilder::new(*status_code).json(data),
            Err(err) => Self::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
        }
    }

    /// Sends a backend reply on unchanged.
    pub fn relay(status_code: &u16, body: &Value) -> HttpResponse {
        let status_code = StatusCode::from_u16(*status_code).unwrap_or(StatusCode::BAD_GATEWAY);
        HttpResponseBuilder::new(status_code).json(body)
    }

    pub fn error(err: &Error) -> HttpResponse {
        if let Error::BackendError { status, body } = err {
            rp_log::warn(None, format!("Relaying backend error: {err}"));
            return Self::relay(status, body);
        }

        Self::error_raw(&status_code_of(err), &err.to_string())
    }

    /// Like [`Response::error`], but tells the client which phase of a
    /// two-phase operation stuck when only one of them did.
    pub fn sync_error(state: &SyncState, err: &Error) -> HttpResponse {
        if !state.is_drifted() {
            return Self::error(err);
        }

        let message = err.to_string();
        rp_log::error(None, &message);
        HttpResponseBuilder::new(status_code_of(err)).json(Self {
            status: None,
            error: Some(message),
            local_applied: Some(*state.local_applied()),
            remote_applied: Some(*state.remote_applied()),
        })
    }

    pub fn error_raw(status_code: &StatusCode, message: &str) -> HttpResponse {
        rp_log::error(None, message);

        HttpResponseBuilder::new(*status_code).json(Self {
            status: None,
            error: Some(message.to_owned()),
            local_applied: None,
            remote_applied: None,
        })
    }
}

pub fn status_code_of(err: &Error) -> StatusCode {
    match err {
        Error::NotFound(_) | Error::PropertyNotFound { .. } => StatusCode::NOT_FOUND,
        Error::AlreadyExists(_) | Error::Corrupt { .. } | Error::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::BackendUnreachable(_) => StatusCode::BAD_GATEWAY,
        Error::BackendError { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
    }
}

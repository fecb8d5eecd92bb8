//! HTTP response envelope
//!
//! Every API response carries the same `{ code, message, data }` shape so
//! clients can branch on the numeric code without inspecting the HTTP status
//! first.

use actix_web::{HttpResponse, HttpResponseBuilder, http::StatusCode};
use serde::{Deserialize, Serialize};

use veita_common::{VeitaError, error};

/// Generic result wrapper for API responses
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Result<T> {
    pub code: i32,
    pub message: String,
    pub data: T,
}

impl<T> Result<T> {
    pub fn new(code: i32, message: String, data: T) -> Self {
        Result::<T> {
            code,
            message,
            data,
        }
    }

    pub fn success(data: T) -> Result<T> {
        Result::<T> {
            code: error::SUCCESS.code,
            message: "success".to_string(),
            data,
        }
    }

    pub fn http_success(data: impl Serialize) -> HttpResponse {
        HttpResponse::Ok().json(Result::success(data))
    }

    pub fn http_response(
        status: u16,
        code: i32,
        message: String,
        data: impl Serialize,
    ) -> HttpResponse {
        HttpResponseBuilder::new(StatusCode::from_u16(status).unwrap_or_default())
            .json(Result::new(code, message, data))
    }
}

/// Map a service error to its HTTP status and envelope code
pub fn error_response(err: &VeitaError) -> HttpResponse {
    let (status, code) = match err {
        VeitaError::InvalidAddress(_) => (400, error::NODE_ADDRESS_ERROR.code),
        VeitaError::InvalidUsercount(_) => (400, error::USERCOUNT_ERROR.code),
        VeitaError::InvalidUptimeFormat(_) => (400, error::UPTIME_FORMAT_ERROR.code),
        VeitaError::NodeAlreadyExists(_) => (409, error::NODE_ALREADY_EXIST.code),
        VeitaError::NodeNotFound(_) => (404, error::NODE_NOT_FOUND.code),
        VeitaError::AuthenticationFailed(_) => (401, error::ACCESS_DENIED.code),
        VeitaError::Storage(_) => (500, error::DATA_ACCESS_ERROR.code),
    };
    Result::<String>::http_response(status, code, err.to_string(), String::new())
}

/// Error response for telemetry and other key-authenticated endpoints
///
/// Collapses "bad key" and "unknown node" into the same 401 so callers
/// cannot probe which node names exist.
pub fn authenticated_error_response(err: &VeitaError) -> HttpResponse {
    match err {
        VeitaError::AuthenticationFailed(_) | VeitaError::NodeNotFound(_) => {
            Result::<String>::http_response(
                401,
                error::ACCESS_DENIED.code,
                "authentication failed".to_string(),
                String::new(),
            )
        }
        other => error_response(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let result = Result::success("ok".to_string());
        assert_eq!(result.code, 0);
        assert_eq!(result.message, "success");
        assert_eq!(result.data, "ok");
    }

    #[test]
    fn test_envelope_serializes_all_fields() {
        let json = serde_json::to_value(Result::success(41)).unwrap();
        assert_eq!(json["code"], 0);
        assert_eq!(json["message"], "success");
        assert_eq!(json["data"], 41);
    }

    #[actix_rt::test]
    async fn test_error_response_statuses() {
        let cases = [
            (VeitaError::InvalidAddress("x".into()), 400),
            (VeitaError::InvalidUsercount(-1), 400),
            (VeitaError::InvalidUptimeFormat("x".into()), 400),
            (VeitaError::NodeAlreadyExists("n".into()), 409),
            (VeitaError::NodeNotFound("n".into()), 404),
            (VeitaError::AuthenticationFailed("n".into()), 401),
        ];
        for (err, status) in cases {
            assert_eq!(error_response(&err).status().as_u16(), status);
        }
    }

    #[actix_rt::test]
    async fn test_authenticated_error_hides_node_existence() {
        let missing = VeitaError::NodeNotFound("ghost".into());
        let bad_key = VeitaError::AuthenticationFailed("vpn1".into());
        assert_eq!(authenticated_error_response(&missing).status().as_u16(), 401);
        assert_eq!(authenticated_error_response(&bad_key).status().as_u16(), 401);
    }
}

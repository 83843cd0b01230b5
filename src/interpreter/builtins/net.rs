//! Outbound HTTP built-ins. Both share the interpreter's agent so
//! connections are pooled across calls within one run.

use crate::convert::{json_to_value, value_to_json};
use crate::value::Value;
use super::super::error::RuntimeError;
use super::failure;

pub fn builtin_http_get(agent: &ureq::Agent, args: &[Value]) -> Result<Value, RuntimeError> {
    let Some(url) = args.first() else {
        return Ok(failure("http_get expects a URL"));
    };
    Ok(decode_response(agent.get(&url.to_string()).call()))
}

/// Posts the second argument as a JSON document. Without one the request
/// goes out with an empty body.
pub fn builtin_http_post(agent: &ureq::Agent, args: &[Value]) -> Result<Value, RuntimeError> {
    let Some(url) = args.first() else {
        return Ok(failure("http_post expects a URL"));
    };
    let request = agent.post(&url.to_string());
    let response = match args.get(1) {
        Some(body) => request
            .set("Content-Type", "application/json")
            .send_string(&value_to_json(body).to_string()),
        None => request.call(),
    };
    Ok(decode_response(response))
}

/// Error statuses still carry a body, which is decoded like any other.
/// Only transport failures become error strings.
fn decode_response(response: Result<ureq::Response, ureq::Error>) -> Value {
    let response = match response {
        Ok(response) | Err(ureq::Error::Status(_, response)) => response,
        Err(e) => return failure(e),
    };
    match response.into_string() {
        Ok(body) => match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(json) => json_to_value(json),
            Err(_) => Value::str(body),
        },
        Err(e) => failure(e),
    }
}

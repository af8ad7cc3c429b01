//! Request body decoding.
//!
//! A body that is empty or not declared as JSON decodes to an empty object, so
//! it reaches validation and fails there with one message per missing field.
//! Only a declared JSON body that does not parse, or whose top level is not an
//! object or array, is a malformed payload.

use axum::{
    body::Bytes,
    http::{header::CONTENT_TYPE, HeaderMap},
};
use serde_json::{Map, Value};

use crate::error::AppError;

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

pub fn decode(headers: &HeaderMap, body: &Bytes) -> Result<Value, AppError> {
    if !is_json(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }

    match serde_json::from_slice(body) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Ok(value),
        _ => Err(AppError::MalformedPayload),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use serde_json::json;

    use super::*;

    fn json_headers(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn missing_content_type_decodes_to_empty_object() {
        let body = Bytes::from_static(br#"{"username":"alice"}"#);
        assert_eq!(decode(&HeaderMap::new(), &body).unwrap(), json!({}));
    }

    #[test]
    fn empty_json_body_decodes_to_empty_object() {
        let headers = json_headers("application/json");
        assert_eq!(decode(&headers, &Bytes::new()).unwrap(), json!({}));
        assert_eq!(decode(&headers, &Bytes::from_static(b" \n")).unwrap(), json!({}));
    }

    #[test]
    fn decodes_objects_and_arrays() {
        let headers = json_headers("application/json; charset=utf-8");
        let body = Bytes::from_static(br#"{"tweet":"hi"}"#);
        assert_eq!(decode(&headers, &body).unwrap(), json!({ "tweet": "hi" }));
        assert_eq!(decode(&headers, &Bytes::from_static(b"[1]")).unwrap(), json!([1]));
    }

    #[test]
    fn unparseable_or_scalar_json_is_malformed() {
        let headers = json_headers("application/json");
        let bodies: [&[u8]; 3] = [b"{not json", b"\"just a string\"", b"42"];
        for body in bodies {
            let body = Bytes::copy_from_slice(body);
            assert!(matches!(decode(&headers, &body), Err(AppError::MalformedPayload)));
        }
    }
}

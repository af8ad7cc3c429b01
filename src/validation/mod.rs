//! Field-level payload validation.
//!
//! Every field of a schema is checked and every violation is reported, in
//! schema field order, with at most one message per field.

use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, Clone, Copy)]
pub enum Rule {
    MinLength(usize),
    Uri,
}

impl Rule {
    fn check(&self, name: &str, value: &str) -> Option<String> {
        match self {
            Rule::MinLength(min) if value.chars().count() < *min => Some(format!(
                "\"{name}\" length must be at least {min} characters long"
            )),
            Rule::Uri if !is_uri(value) => Some(format!("\"{name}\" must be a valid uri")),
            _ => None,
        }
    }
}

/// RFC 3986 allows only unreserved and reserved characters plus `%XX`
/// escapes. `Url::parse` would repair anything else, so it is checked first.
fn is_uri(value: &str) -> bool {
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let escaped = bytes
                    .get(i + 1..i + 3)
                    .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
                if !escaped {
                    return false;
                }
                i += 3;
            }
            b if b.is_ascii_alphanumeric() || b"-._~:/?#[]@!$&'()*+,;=".contains(&b) => i += 1,
            _ => return false,
        }
    }
    url::Url::parse(value).is_ok()
}

/// A required string field and the rules its value must satisfy.
#[derive(Debug)]
pub struct Field {
    pub name: &'static str,
    pub rules: &'static [Rule],
}

impl Field {
    fn check(&self, value: Option<&Value>) -> Option<String> {
        match value {
            None => Some(format!("\"{}\" is required", self.name)),
            Some(Value::String(s)) if s.is_empty() => {
                Some(format!("\"{}\" is not allowed to be empty", self.name))
            }
            Some(Value::String(s)) => self.rules.iter().find_map(|rule| rule.check(self.name, s)),
            Some(_) => Some(format!("\"{}\" must be a string", self.name)),
        }
    }
}

#[derive(Debug)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

pub const USER_SCHEMA: Schema = Schema {
    name: "user",
    fields: &[
        Field {
            name: "username",
            rules: &[Rule::MinLength(3)],
        },
        Field {
            name: "avatar",
            rules: &[Rule::Uri],
        },
    ],
};

pub const TWEET_SCHEMA: Schema = Schema {
    name: "tweet",
    fields: &[
        Field {
            name: "username",
            rules: &[],
        },
        Field {
            name: "tweet",
            rules: &[],
        },
    ],
};

/// A payload that is not an object has none of the schema's fields.
pub fn validate(schema: &Schema, payload: &Value) -> Result<(), Vec<String>> {
    let object = payload.as_object();
    let errors: Vec<String> = schema
        .fields
        .iter()
        .filter_map(|field| field.check(object.and_then(|o| o.get(field.name))))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates `payload` and converts it into `T` once it passes.
pub fn validated<T: DeserializeOwned>(schema: &Schema, payload: Value) -> Result<T, Vec<String>> {
    validate(schema, &payload)?;
    serde_json::from_value(payload)
        .map_err(|err| vec![format!("invalid {} payload: {}", schema.name, err)])
}

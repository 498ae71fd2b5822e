use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header,
};
use serde_json::{Map, Value};
use service_core::error::AppError;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

pub const GENRE_REQUIRED: &str = "\"genre\" is required";
pub const GENRE_TOO_SHORT: &str = "\"genre\" length must be at least 5 characters long";
pub const GENRE_NOT_A_STRING: &str = "\"genre\" must be a string";
pub const BODY_NOT_AN_OBJECT: &str = "\"value\" must be an object";

/// Body of create and update requests.
#[derive(Debug, Clone, Default, Validate)]
pub struct GenreRequest {
    #[validate(
        required(message = "\"genre\" is required"),
        length(min = 5, message = "\"genre\" length must be at least 5 characters long")
    )]
    pub genre: Option<String>,
    /// Keys other than `genre`, sorted.
    pub unknown_fields: Vec<String>,
}

impl GenreRequest {
    /// Reads a decoded body. Only objects are accepted and `genre`, when
    /// present, must be a string.
    pub fn from_value(value: Value) -> Result<Self, AppError> {
        let Value::Object(mut fields) = value else {
            return Err(violation("value", "object", BODY_NOT_AN_OBJECT));
        };

        let genre = match fields.remove("genre") {
            None => None,
            Some(Value::String(genre)) => Some(genre),
            Some(_) => return Err(violation("genre", "string", GENRE_NOT_A_STRING)),
        };

        Ok(Self {
            genre,
            unknown_fields: fields.into_iter().map(|(key, _)| key).collect(),
        })
    }

    /// Validated genre text, or the first violated rule. Rules on `genre`
    /// are reported before unknown keys.
    pub fn into_genre(self) -> Result<String, AppError> {
        self.validate()?;

        if let Some(key) = self.unknown_fields.first() {
            return Err(violation(
                "value",
                "unknown",
                format!("\"{}\" is not allowed", key),
            ));
        }

        self.genre
            .ok_or_else(|| violation("genre", "required", GENRE_REQUIRED))
    }
}

fn violation(
    field: &'static str,
    code: &'static str,
    message: impl Into<Cow<'static, str>>,
) -> AppError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());

    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    AppError::ValidationError(errors)
}

/// Decodes a [`GenreRequest`] from a JSON or URL-encoded form body.
///
/// An empty body, or one in any other format, reads as `{}` so that
/// validation reports the missing field.
#[derive(Debug)]
pub struct GenrePayload(pub GenreRequest);

#[async_trait]
impl<S> FromRequest<S> for GenrePayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(media_type)
            .unwrap_or_default();

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        if body.is_empty() {
            return Ok(GenrePayload(GenreRequest::default()));
        }

        let value = if content_type == "application/json" || content_type.ends_with("+json") {
            serde_json::from_slice(&body).map_err(|e| AppError::BadRequest(e.to_string()))?
        } else if content_type == "application/x-www-form-urlencoded" {
            let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(&body)
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            Value::Object(
                pairs
                    .into_iter()
                    .map(|(key, value)| (key, Value::String(value)))
                    .collect::<Map<_, _>>(),
            )
        } else {
            tracing::debug!(content_type = %content_type, "Ignoring body in unsupported format");
            Value::Object(Map::new())
        };

        Ok(GenrePayload(GenreRequest::from_value(value)?))
    }
}

fn media_type(value: &str) -> String {
    value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Reads an id the lenient way: optional leading whitespace and sign, then as
/// many digits as are present. A `0x` prefix switches to hexadecimal.
/// `"2abc"` is 2, `"0x1f"` is 31, `"abc"` is no id at all.
pub fn parse_id(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, digits) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let digits_end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    let magnitude = i64::from_str_radix(&digits[..digits_end], radix).ok()?;

    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(genre: Option<&str>) -> GenreRequest {
        GenreRequest {
            genre: genre.map(str::to_string),
            unknown_fields: Vec::new(),
        }
    }

    #[test]
    fn accepts_genre_of_five_characters() {
        assert_eq!(request(Some("drama")).into_genre().unwrap(), "drama");
    }

    #[test]
    fn rejects_short_genre() {
        let err = request(Some("ab")).validate().unwrap_err();

        assert_eq!(service_core::error::first_violation(&err), GENRE_TOO_SHORT);
    }

    #[test]
    fn rejects_missing_genre() {
        let err = request(None).validate().unwrap_err();

        assert_eq!(service_core::error::first_violation(&err), GENRE_REQUIRED);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert!(request(Some("ñandú")).validate().is_ok());
        assert!(request(Some("ñañá")).validate().is_err());
    }

    fn message(err: AppError) -> String {
        match err {
            AppError::ValidationError(errors) => service_core::error::first_violation(&errors),
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn unknown_fields_are_rejected_after_genre_rules() {
        let parsed = GenreRequest::from_value(json!({"genre": "comedy", "rating": 5})).unwrap();
        assert_eq!(message(parsed.into_genre().unwrap_err()), "\"rating\" is not allowed");

        let parsed = GenreRequest::from_value(json!({"genre": "ab", "rating": 5})).unwrap();
        assert_eq!(message(parsed.into_genre().unwrap_err()), GENRE_TOO_SHORT);
    }

    #[test]
    fn non_string_genre_is_a_validation_error() {
        for genre in [json!(12345), json!(null), json!(["comedy"]), json!({"x": 1})] {
            let err = GenreRequest::from_value(json!({ "genre": genre })).unwrap_err();
            assert_eq!(message(err), GENRE_NOT_A_STRING);
        }
    }

    #[test]
    fn body_must_be_an_object() {
        for body in [json!(["comedy"]), json!("comedy"), json!(null), json!(42)] {
            let err = GenreRequest::from_value(body).unwrap_err();
            assert_eq!(message(err), BODY_NOT_AN_OBJECT);
        }
    }

    #[test]
    fn parse_id_reads_leading_digits() {
        assert_eq!(parse_id("2"), Some(2));
        assert_eq!(parse_id("  42"), Some(42));
        assert_eq!(parse_id("2abc"), Some(2));
        assert_eq!(parse_id("-7"), Some(-7));
        assert_eq!(parse_id("+3"), Some(3));
        assert_eq!(parse_id("3.9"), Some(3));
    }

    #[test]
    fn parse_id_reads_hex_prefix() {
        assert_eq!(parse_id("0x2"), Some(2));
        assert_eq!(parse_id("0X1f"), Some(31));
        assert_eq!(parse_id("-0x3"), Some(-3));
        assert_eq!(parse_id("0x2g"), Some(2));
        assert_eq!(parse_id("0x"), None);
        assert_eq!(parse_id("0xzz"), None);
        assert_eq!(parse_id("012"), Some(12));
    }

    #[test]
    fn parse_id_rejects_non_numeric() {
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id(""), None);
        assert_eq!(parse_id("-"), None);
        assert_eq!(parse_id("99999999999999999999"), None);
    }
}

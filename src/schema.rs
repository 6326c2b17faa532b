//! Request validation.
//!
//! Bodies are parsed into a raw `Json` value first and then checked field by
//! field, so a single request reports every problem at once. Each problem is
//! a `FieldError` shaped like `{type, loc, msg, input[, ctx]}`.

use std::collections::BTreeMap;

use rustc_serialize::json::{Json, ToJson};

use crate::model::NewPost;

#[derive(Clone, Debug, PartialEq)]
pub struct FieldError {
    pub kind: &'static str,
    pub loc: Vec<String>,
    pub msg: String,
    pub input: Json,
    pub ctx: Option<(&'static str, Json)>,
}

impl FieldError {
    fn new(kind: &'static str, loc: &[&str], msg: &str, input: Json) -> FieldError {
        FieldError {
            kind: kind,
            loc: loc.iter().map(|part| part.to_string()).collect(),
            msg: msg.to_string(),
            input: input,
            ctx: None,
        }
    }

    fn with_ctx(mut self, key: &'static str, value: Json) -> FieldError {
        self.ctx = Some((key, value));
        self
    }
}

impl ToJson for FieldError {
    fn to_json(&self) -> Json {
        let mut object = BTreeMap::new();
        object.insert("type".to_string(), self.kind.to_json());
        object.insert("loc".to_string(), self.loc.to_json());
        object.insert("msg".to_string(), self.msg.to_json());
        object.insert("input".to_string(), self.input.clone());
        if let Some((key, ref value)) = self.ctx {
            let mut ctx = BTreeMap::new();
            ctx.insert(key.to_string(), value.clone());
            object.insert("ctx".to_string(), Json::Object(ctx));
        }
        Json::Object(object)
    }
}

fn json_invalid(reason: String) -> Vec<FieldError> {
    vec![FieldError::new(
        "json_invalid",
        &["body"],
        "JSON decode error",
        Json::Object(BTreeMap::new()),
    )
    .with_ctx("error", reason.to_json())]
}

/// Validate a post-creation body, given as the raw request bytes.
pub fn parse_new_post(payload: &[u8]) -> Result<NewPost, Vec<FieldError>> {
    let payload = std::str::from_utf8(payload).map_err(|err| json_invalid(err.to_string()))?;
    if payload.trim().is_empty() {
        return Err(vec![FieldError::new("missing", &["body"], "Field required", Json::Null)]);
    }

    let body = Json::from_str(payload).map_err(|err| json_invalid(err.to_string()))?;

    let object = match body.as_object() {
        Some(object) => object,
        None => {
            return Err(vec![FieldError::new(
                "model_attributes_type",
                &["body"],
                "Input should be a valid dictionary or object to extract fields from",
                body.clone(),
            )]);
        }
    };

    let author = required_string(&body, object.get("author"), "author");
    let title = required_string(&body, object.get("title"), "title");
    let content = required_string(&body, object.get("content"), "content");

    match (author, title, content) {
        (Ok(author), Ok(title), Ok(content)) => Ok(NewPost {
            author: author,
            title: title,
            content: content,
        }),
        (author, title, content) => {
            let mut errors = Vec::new();
            errors.extend(author.err());
            errors.extend(title.err());
            errors.extend(content.err());
            Err(errors)
        }
    }
}

fn required_string(body: &Json, value: Option<&Json>, field: &str) -> Result<String, FieldError> {
    let loc = ["body", field];
    let value = match value {
        Some(value) => value,
        None => return Err(FieldError::new("missing", &loc, "Field required", body.clone())),
    };
    let text = match value.as_string() {
        Some(text) => text,
        None => {
            return Err(FieldError::new(
                "string_type",
                &loc,
                "Input should be a valid string",
                value.clone(),
            ));
        }
    };

    if text.is_empty() {
        return Err(FieldError::new(
            "string_too_short",
            &loc,
            "String should have at least 1 character",
            value.clone(),
        )
        .with_ctx("min_length", Json::U64(1)));
    }
    Ok(text.to_string())
}

/// Parse the `:id` path segment.
///
/// Any integer is accepted. One that no post can carry (negative, or past
/// `u64::MAX`) comes back as `None` so the lookup simply misses.
pub fn parse_post_id(raw: &str) -> Result<Option<u64>, Vec<FieldError>> {
    let digits = raw.strip_prefix('-').or_else(|| raw.strip_prefix('+')).unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(vec![FieldError::new(
            "int_parsing",
            &["path", "post_id"],
            "Input should be a valid integer, unable to parse string as an integer",
            raw.to_json(),
        )]);
    }
    if raw.starts_with('-') {
        return Ok(None);
    }
    Ok(digits.parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<NewPost, Vec<FieldError>> {
        parse_new_post(body.as_bytes())
    }

    fn kinds_and_fields(errors: &[FieldError]) -> Vec<(&str, String)> {
        errors
            .iter()
            .map(|error| (error.kind, error.loc.join(".")))
            .collect()
    }

    #[test]
    fn accepts_complete_body() {
        let post = parse(r#"{"author": "Mathieu", "title": "First post", "content": "Hello"}"#).unwrap();
        assert_eq!(post, NewPost::new("Mathieu", "First post", "Hello"));
    }

    #[test]
    fn ignores_unknown_fields() {
        let post = parse(r#"{"author": "a", "title": "b", "content": "c", "id": 99}"#).unwrap();
        assert_eq!(post.title, "b");
    }

    #[test]
    fn empty_title_is_too_short() {
        let errors = parse(r#"{"author": "a", "title": "", "content": "c"}"#).unwrap_err();
        assert_eq!(
            kinds_and_fields(&errors),
            vec![("string_too_short", "body.title".to_string())]
        );
        assert_eq!(errors[0].input, Json::String(String::new()));
        assert_eq!(errors[0].ctx, Some(("min_length", Json::U64(1))));
    }

    #[test]
    fn reports_every_failing_field() {
        let errors = parse(r#"{"title": 5, "content": ""}"#).unwrap_err();
        assert_eq!(
            kinds_and_fields(&errors),
            vec![
                ("missing", "body.author".to_string()),
                ("string_type", "body.title".to_string()),
                ("string_too_short", "body.content".to_string()),
            ]
        );
    }

    #[test]
    fn long_fields_are_accepted() {
        let author = "é".repeat(80);
        let title = "x".repeat(300);
        let body = format!(
            r#"{{"author": "{}", "title": "{}", "content": "c"}}"#,
            author, title
        );
        let post = parse(&body).unwrap();
        assert_eq!(post.author, author);
        assert_eq!(post.title, title);
    }

    #[test]
    fn rejects_malformed_and_non_object_bodies() {
        let errors = parse("{not json").unwrap_err();
        assert_eq!(kinds_and_fields(&errors), vec![("json_invalid", "body".to_string())]);

        let errors = parse("[1, 2]").unwrap_err();
        assert_eq!(
            kinds_and_fields(&errors),
            vec![("model_attributes_type", "body".to_string())]
        );
    }

    #[test]
    fn empty_body_is_missing() {
        for body in &["", "  \n\t"] {
            let errors = parse(body).unwrap_err();
            assert_eq!(kinds_and_fields(&errors), vec![("missing", "body".to_string())]);
            assert_eq!(errors[0].msg, "Field required");
            assert_eq!(errors[0].input, Json::Null);
        }
    }

    #[test]
    fn non_utf8_body_is_rejected_not_rewritten() {
        let mut body = br#"{"author": "a", "title": ""#.to_vec();
        body.extend_from_slice(&[0xff, 0xfe]);
        body.extend_from_slice(br#"", "content": "c"}"#);

        let errors = parse_new_post(&body).unwrap_err();
        assert_eq!(kinds_and_fields(&errors), vec![("json_invalid", "body".to_string())]);
    }

    #[test]
    fn post_id_must_be_an_integer() {
        assert_eq!(parse_post_id("12"), Ok(Some(12)));
        assert_eq!(parse_post_id("+7"), Ok(Some(7)));

        for raw in &["abc", "", "-", "1.5", "12a"] {
            let errors = parse_post_id(raw).unwrap_err();
            assert_eq!(errors[0].kind, "int_parsing");
            assert_eq!(errors[0].loc, vec!["path", "post_id"]);
            assert_eq!(errors[0].input, Json::String(raw.to_string()));
        }
    }

    #[test]
    fn out_of_range_post_ids_name_no_post() {
        assert_eq!(parse_post_id("-1"), Ok(None));
        assert_eq!(parse_post_id("-0"), Ok(None));
        assert_eq!(parse_post_id("12345678901234567890123"), Ok(None));
    }

    #[test]
    fn field_error_json_shape() {
        let json = parse_post_id("abc").unwrap_err()[0].to_json();
        assert_eq!(
            json.to_string(),
            r#"{"input":"abc","loc":["path","post_id"],"msg":"Input should be a valid integer, unable to parse string as an integer","type":"int_parsing"}"#
        );
    }
}

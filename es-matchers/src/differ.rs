//! Structural diffs between expected and actual payloads.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::{DiffConfig, Result};

/// Renders the difference between an expected and an actual value.
///
/// The returned text is appended right after a `data diff:` or
/// `metadata diff:` label, so implementations usually start each line with a
/// newline. Errors are handed back to the caller of
/// [`HavePublished`](crate::HavePublished) unchanged.
///
/// Any `Fn(&Value, &Value) -> Result<String>` is a differ, which is handy
/// for test doubles:
///
/// ```
/// use es_matchers::{Differ, Result};
/// use serde_json::{Value, json};
///
/// let fixed = |_: &Value, _: &Value| -> Result<String> { Ok(" <diff>".into()) };
/// assert_eq!(fixed.diff(&json!(1), &json!(2)).unwrap(), " <diff>");
/// ```
pub trait Differ {
    fn diff(&self, expected: &Value, actual: &Value) -> Result<String>;
}

impl<F> Differ for F
where
    F: Fn(&Value, &Value) -> Result<String>,
{
    fn diff(&self, expected: &Value, actual: &Value) -> Result<String> {
        self(expected, actual)
    }
}

/// Default [`Differ`]: walks both values in parallel and lists the changed
/// paths.
///
/// ```text
/// -$.amount = 10
/// +$.amount = 20
/// +$.currency = "EUR"
/// ```
///
/// Object keys are visited in sorted order and array elements by index, so
/// the output is stable for equal inputs. Identical values produce an empty
/// diff.
#[derive(Debug, Clone, Default)]
pub struct StructuralDiffer {
    config: DiffConfig,
}

impl StructuralDiffer {
    pub fn new(config: DiffConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    fn walk(&self, path: &str, expected: &Value, actual: &Value, depth: usize, out: &mut String) {
        if expected == actual {
            if self.config.show_unchanged() {
                line(out, ' ', path, expected);
            }
            return;
        }

        let nested = depth < self.config.max_depth();
        match (expected, actual) {
            (Value::Object(expected), Value::Object(actual)) if nested => {
                let keys: BTreeSet<&String> = expected.keys().chain(actual.keys()).collect();
                for key in keys {
                    let child = key_path(path, key);
                    self.walk_pair(&child, expected.get(key), actual.get(key), depth, out);
                }
            }
            (Value::Array(expected), Value::Array(actual)) if nested => {
                for index in 0..expected.len().max(actual.len()) {
                    let child = format!("{path}[{index}]");
                    self.walk_pair(&child, expected.get(index), actual.get(index), depth, out);
                }
            }
            _ => {
                line(out, '-', path, expected);
                line(out, '+', path, actual);
            }
        }
    }

    fn walk_pair(
        &self,
        path: &str,
        expected: Option<&Value>,
        actual: Option<&Value>,
        depth: usize,
        out: &mut String,
    ) {
        match (expected, actual) {
            (Some(expected), Some(actual)) => self.walk(path, expected, actual, depth + 1, out),
            (Some(expected), None) => line(out, '-', path, expected),
            (None, Some(actual)) => line(out, '+', path, actual),
            (None, None) => {}
        }
    }
}

impl Differ for StructuralDiffer {
    fn diff(&self, expected: &Value, actual: &Value) -> Result<String> {
        let mut out = String::new();
        self.walk(self.config.root_label(), expected, actual, 0, &mut out);
        Ok(out)
    }
}

fn line(out: &mut String, sign: char, path: &str, value: &Value) {
    out.push('\n');
    out.push(sign);
    out.push_str(path);
    out.push_str(" = ");
    out.push_str(&value.to_string());
}

fn key_path(parent: &str, key: &str) -> String {
    let mut chars = key.chars();
    let plain = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        format!("{parent}.{key}")
    } else {
        format!("{parent}[{}]", Value::from(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::json;

    fn diff(expected: Value, actual: Value) -> String {
        StructuralDiffer::default().diff(&expected, &actual).unwrap()
    }

    #[test]
    fn equal_values_have_no_diff() {
        assert_eq!(diff(json!({"a": [1, {"b": 2}]}), json!({"a": [1, {"b": 2}]})), "");
    }

    #[test]
    fn changed_field() {
        assert_eq!(
            diff(json!({"amount": 10}), json!({"amount": 20})),
            "\n-$.amount = 10\n+$.amount = 20"
        );
    }

    #[test]
    fn missing_and_extra_fields() {
        assert_eq!(
            diff(json!({"a": 1, "b": 2}), json!({"b": 2, "c": "x"})),
            "\n-$.a = 1\n+$.c = \"x\""
        );
    }

    #[test]
    fn nested_paths_and_arrays() {
        assert_eq!(
            diff(
                json!({"order": {"items": [1, 2]}}),
                json!({"order": {"items": [1, 3, 4]}})
            ),
            "\n-$.order.items[1] = 2\n+$.order.items[1] = 3\n+$.order.items[2] = 4"
        );
    }

    #[test]
    fn type_change_replaces_whole_value() {
        assert_eq!(diff(json!(1), json!("1")), "\n-$ = 1\n+$ = \"1\"");
        assert_eq!(
            diff(json!({"a": {"b": 1}}), json!({"a": [1]})),
            "\n-$.a = {\"b\":1}\n+$.a = [1]"
        );
    }

    #[test]
    fn unusual_keys_are_quoted() {
        assert_eq!(
            diff(json!({"first name": 1}), json!({"first name": 2})),
            "\n-$[\"first name\"] = 1\n+$[\"first name\"] = 2"
        );
    }

    #[test]
    fn max_depth_limits_the_walk() {
        let differ = StructuralDiffer::new(DiffConfig::default().with_max_depth(0));
        let out = differ.diff(&json!({"a": 1}), &json!({"a": 2})).unwrap();
        assert_eq!(out, "\n-$ = {\"a\":1}\n+$ = {\"a\":2}");
    }

    #[test]
    fn unchanged_fields_as_context() {
        let differ = StructuralDiffer::new(
            DiffConfig::default()
                .with_show_unchanged(true)
                .with_root_label("data"),
        );
        let out = differ
            .diff(&json!({"a": 1, "b": 2}), &json!({"a": 1, "b": 3}))
            .unwrap();
        assert_eq!(out, "\n data.a = 1\n-data.b = 2\n+data.b = 3");
    }

    #[test]
    fn closures_are_differs() {
        #[derive(Debug, thiserror::Error)]
        #[error("differ offline")]
        struct Offline;

        let failing = |_: &Value, _: &Value| -> Result<String> { Err(Error::differ(Offline)) };
        let err = failing.diff(&json!(1), &json!(2)).unwrap_err();
        assert_eq!(err.to_string(), "Differ error: differ offline");
    }
}

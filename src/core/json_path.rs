// src/core/json_path.rs

//! Property paths into `serde_json::Value` documents.
//!
//! Supports dotted keys and bracket segments: `alexaSkill.nlu`,
//! `stages["dev"].endpoint`, `intents[0].name`.

use serde_json::{Map, Value};

/// One step of a property path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// An object key.
    Key(String),
    /// An array index (or a numeric object key).
    Index(usize),
}

/// Splits a property path into its segments.
///
/// Parsing is lenient: an unterminated bracket swallows the rest of the path
/// as a single key instead of failing.
pub fn parse(path: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if !current.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut current)));
                }
            }
            '[' => {
                if !current.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut current)));
                }
                let quote = match chars.peek() {
                    Some(&q) if q == '"' || q == '\'' => {
                        chars.next();
                        Some(q)
                    }
                    _ => None,
                };
                let mut inner = String::new();
                let mut closed = false;
                while let Some(ic) = chars.next() {
                    if let Some(q) = quote {
                        if ic == q && chars.peek() == Some(&']') {
                            chars.next();
                            closed = true;
                            break;
                        }
                    } else if ic == ']' {
                        closed = true;
                        break;
                    }
                    inner.push(ic);
                }
                if !closed || quote.is_some() {
                    segments.push(Segment::Key(inner));
                } else {
                    match inner.trim().parse::<usize>() {
                        Ok(i) => segments.push(Segment::Index(i)),
                        Err(_) => segments.push(Segment::Key(inner)),
                    }
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        segments.push(Segment::Key(current));
    }
    segments
}

fn step<'a>(value: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match (value, segment) {
        (Value::Object(map), Segment::Key(k)) => map.get(k),
        (Value::Object(map), Segment::Index(i)) => map.get(&i.to_string()),
        (Value::Array(items), Segment::Index(i)) => items.get(*i),
        _ => None,
    }
}

/// Looks up `path` in `root`.
pub fn get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    parse(path)
        .iter()
        .try_fold(root, |value, segment| step(value, segment))
}

/// Writes `new_value` at `path`, creating intermediate objects as needed.
///
/// Intermediate values that are neither objects nor arrays are replaced by
/// empty objects. Array indices past the end pad the array with `null`.
pub fn set(root: &mut Value, path: &str, new_value: Value) {
    let segments = parse(path);
    let Some((last, parents)) = segments.split_last() else {
        *root = new_value;
        return;
    };

    let mut value = root;
    for segment in parents {
        let Some(child) = child_or_insert(value, segment) else {
            return;
        };
        value = child;
    }

    match (value, last) {
        (Value::Array(items), Segment::Index(i)) => {
            if items.len() <= *i {
                items.resize(*i + 1, Value::Null);
            }
            if let Some(slot) = items.get_mut(*i) {
                *slot = new_value;
            }
        }
        (value, segment) => {
            if !value.is_object() {
                *value = Value::Object(Map::new());
            }
            if let Value::Object(map) = value {
                map.insert(segment_key(segment), new_value);
            }
        }
    }
}

/// Removes the value at `path` from its parent object, returning it.
pub fn remove(root: &mut Value, path: &str) -> Option<Value> {
    let segments = parse(path);
    let (last, parents) = segments.split_last()?;

    let mut value = root;
    for segment in parents {
        value = match (value, segment) {
            (Value::Object(map), Segment::Key(k)) => map.get_mut(k)?,
            (Value::Array(items), Segment::Index(i)) => items.get_mut(*i)?,
            _ => return None,
        };
    }
    match value {
        Value::Object(map) => map.remove(&segment_key(last)),
        _ => None,
    }
}

fn segment_key(segment: &Segment) -> String {
    match segment {
        Segment::Key(k) => k.clone(),
        Segment::Index(i) => i.to_string(),
    }
}

fn child_or_insert<'a>(value: &'a mut Value, segment: &Segment) -> Option<&'a mut Value> {
    let array_slot = matches!((&*value, segment), (Value::Array(_), Segment::Index(_)));
    if !array_slot && !value.is_object() {
        *value = Value::Object(Map::new());
    }

    let child = match (value, segment) {
        (Value::Array(items), Segment::Index(i)) => {
            if items.len() <= *i {
                items.resize(*i + 1, Value::Null);
            }
            items.get_mut(*i)?
        }
        (Value::Object(map), segment) => map
            .entry(segment_key(segment))
            .or_insert_with(|| Value::Object(Map::new())),
        _ => return None,
    };
    if !child.is_object() && !child.is_array() {
        *child = Value::Object(Map::new());
    }
    Some(child)
}

/// JavaScript-style truthiness: `null`, `false`, `0` and `""` are falsy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_mixed_segments() {
        assert_eq!(
            parse(r#"stages["dev"].intents[2].name"#),
            vec![
                Segment::Key("stages".into()),
                Segment::Key("dev".into()),
                Segment::Key("intents".into()),
                Segment::Index(2),
                Segment::Key("name".into()),
            ]
        );
    }

    #[test]
    fn test_parse_quoted_key_with_dots() {
        assert_eq!(
            parse("stages['my.stage']"),
            vec![Segment::Key("stages".into()), Segment::Key("my.stage".into())]
        );
    }

    #[test]
    fn test_get_nested() {
        let doc = json!({ "googleAction": { "nlu": { "name": "dialogflow" } }, "list": [1, 2] });
        assert_eq!(get(&doc, "googleAction.nlu.name"), Some(&json!("dialogflow")));
        assert_eq!(get(&doc, "list[1]"), Some(&json!(2)));
        assert_eq!(get(&doc, "list[5]"), None);
        assert_eq!(get(&doc, "missing.path"), None);
    }

    #[test]
    fn test_set_creates_intermediate_objects() {
        let mut doc = json!({});
        set(&mut doc, "alexa.interactionModel.languageModel.intents", json!([]));
        assert_eq!(
            doc,
            json!({ "alexa": { "interactionModel": { "languageModel": { "intents": [] } } } })
        );
    }

    #[test]
    fn test_set_overwrites_scalar_parent() {
        let mut doc = json!({ "webhook": "legacy" });
        set(&mut doc, "webhook.uuid", json!("abc"));
        assert_eq!(doc, json!({ "webhook": { "uuid": "abc" } }));
    }

    #[test]
    fn test_remove_returns_value() {
        let mut doc = json!({ "a": { "b": 1, "c": 2 } });
        assert_eq!(remove(&mut doc, "a.b"), Some(json!(1)));
        assert_eq!(doc, json!({ "a": { "c": 2 } }));
        assert_eq!(remove(&mut doc, "a.zzz"), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(false))));
        assert!(is_truthy(Some(&json!("x"))));
        assert!(is_truthy(Some(&json!([]))));
    }
}

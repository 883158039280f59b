// src/extraction/normalize.rs

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::config::OPTION_COUNT;
use crate::models::question::Question;

const QUESTION_KEYS: [&str; 3] = ["question", "q", "prompt"];
const OPTION_KEYS: [&str; 3] = ["options", "choices", "answers"];
/// `correct_answer` wins over `answer`, which wins over `correct`.
const ANSWER_KEYS: [&str; 3] = ["correct_answer", "answer", "correct"];

/// Finds the candidate list: a bare array, or an object's `questions` array.
/// Any other shape yields `None`.
pub fn locate_questions(parsed: &Value) -> Option<&Vec<Value>> {
    match parsed {
        Value::Array(items) => Some(items),
        Value::Object(obj) => obj.get("questions").and_then(Value::as_array),
        _ => None,
    }
}

/// Turns one candidate entry into a `Question`, or `None` if any part is unusable.
pub fn normalize_entry(entry: &Value) -> Option<Question> {
    let obj = entry.as_object()?;

    let question = first_present(obj, &QUESTION_KEYS)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|q| !q.is_empty())?
        .to_string();

    let options = normalize_options(first_present(obj, &OPTION_KEYS)?)?;
    let correct_answer = resolve_answer(first_present(obj, &ANSWER_KEYS)?, &options)?;

    Some(Question {
        question,
        options,
        correct_answer,
    })
}

/// First key in `keys` whose value carries something: null, blank strings,
/// empty arrays and empty objects fall through to the next alias.
fn first_present<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !is_blank(v))
}

fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Scalar to trimmed text. Objects, arrays and null are rejected.
fn scalar_text(v: &Value) -> Option<String> {
    let text = match v {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.is_empty() { None } else { Some(text) }
}

fn normalize_options(raw: &Value) -> Option<Vec<String>> {
    let items = raw.as_array()?;
    if items.len() != OPTION_COUNT {
        return None;
    }

    let options: Vec<String> = items.iter().map(scalar_text).collect::<Option<_>>()?;

    let mut seen = HashSet::new();
    if !options.iter().all(|o| seen.insert(o.to_lowercase())) {
        return None;
    }
    Some(options)
}

/// Resolves the model's answer to the full text of one option.
///
/// Accepted forms, in order: the option text (exact, then ignoring case),
/// a zero-based option index given as a JSON number, or an option label
/// `A`..`D` (optionally followed by `)` or `.`).
fn resolve_answer(raw: &Value, options: &[String]) -> Option<String> {
    let answer = scalar_text(raw)?;

    if let Some(exact) = options.iter().find(|o| **o == answer) {
        return Some(exact.clone());
    }

    let lowered = answer.to_lowercase();
    if let Some(found) = options.iter().find(|o| o.to_lowercase() == lowered) {
        return Some(found.clone());
    }

    if let Some(idx) = raw.as_u64() {
        return options.get(usize::try_from(idx).ok()?).cloned();
    }

    let label = lowered.trim_end_matches([')', '.']);
    let mut chars = label.chars();
    match (chars.next(), chars.next()) {
        (Some(c @ 'a'..='z'), None) => options.get((c as u8 - b'a') as usize).cloned(),
        _ => None,
    }
}

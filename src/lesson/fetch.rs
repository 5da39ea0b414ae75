use anyhow::Context;
use serde_json::Value;
use std::{fs, path::Path, str::FromStr};
use thiserror::Error;

use super::{Lesson, Slide};

/// Fetches a lesson from a CMS endpoint.
pub fn fetch_lesson(url: &str) -> anyhow::Result<Lesson> {
    let response = ureq::get(url)
        .call()
        .map_err(|e| match e {
            ureq::Error::Status(code, _) => RequestError::ServerError { status: code },
            other => RequestError::HttpError(other),
        })
        .context("Failed to send request")?;

    let body: Value = response
        .into_json()
        .context("Failed to read response body")?;

    lesson_from_value(body)
}

/// Reads a lesson file, YAML for `.yaml`/`.yml`, JSON otherwise.
pub fn read_lesson(path: &Path) -> anyhow::Result<Lesson> {
    let content = fs::read_to_string(path)
        .context(format!("failed to read lesson file {}", path.display()))?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => parse_lesson_yaml(&content),
        _ => parse_lesson_json(&content),
    }
}

pub fn parse_lesson_yaml(content: &str) -> anyhow::Result<Lesson> {
    serde_yaml_ng::from_str(content).context("lesson YAML is malformed")
}

/// Accepts a bare lesson object or the CMS envelope
/// `{ "data": { "attributes": { "Title", "Slug", "Slides" } } }`.
pub fn parse_lesson_json(content: &str) -> anyhow::Result<Lesson> {
    let value: Value = serde_json::from_str(content).context("lesson JSON is malformed")?;
    lesson_from_value(value)
}

fn lesson_from_value(value: Value) -> anyhow::Result<Lesson> {
    if value.get("data").is_none() {
        return serde_json::from_value(value).context("lesson JSON does not describe a lesson");
    }

    let data = value.get("data").context("no data in lesson response")?;
    let attributes = data.get("attributes").context("lesson has no attributes")?;
    let title: String = get_attribute(attributes, "Title").context("lesson must set title")?;
    let slug: String = get_attribute(attributes, "Slug").unwrap_or_default();

    let slides = attributes
        .get("Slides")
        .and_then(|s| s.as_array())
        .context(format!("lesson '{}' has no slides", &title))?
        .iter()
        .enumerate()
        .map(|(index, slide)| {
            serde_json::from_value::<Slide>(slide.clone())
                .context(format!("slide '{}' in lesson '{}' is malformed", index, &title))
        })
        .collect::<anyhow::Result<Vec<Slide>>>()?;

    Ok(Lesson {
        title,
        slug,
        slides,
    })
}

fn get_attribute<T>(value: &Value, attribute: &str) -> Option<T>
where
    T: FromStr,
{
    value.get(attribute).and_then(|v| match v {
        Value::String(s) => T::from_str(s).ok(),
        Value::Number(n) => T::from_str(&n.to_string()).ok(),
        Value::Bool(b) => T::from_str(&b.to_string()).ok(),
        _ => None,
    })
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] ureq::Error),

    #[error("Server returned an error: {status}")]
    ServerError { status: u16 },
}

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::Error;
use crate::model::{FieldValue, Record, Report, Screenshot};

fn field_value(v: &Value) -> FieldValue {
    match v {
        Value::Null => FieldValue::Missing,
        Value::Bool(b) => FieldValue::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                FieldValue::Integer(i)
            } else if let Some(u) = n.as_u64() {
                u.into()
            } else {
                FieldValue::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => FieldValue::Text(s.clone()),
        other => FieldValue::Text(other.to_string()),
    }
}

fn record_from(map: &Map<String, Value>) -> Record {
    let mut record = Record::new();
    for (name, value) in map {
        record.push(name.as_str(), field_value(value));
    }
    record
}

fn object<'a>(root: &'a Map<String, Value>, keys: &[&str]) -> Result<&'a Map<String, Value>, Error> {
    let Some(value) = keys.iter().find_map(|k| root.get(*k)) else {
        return Err(Error::MissingField {
            record: "report".into(),
            field: keys[0].into(),
        });
    };
    value
        .as_object()
        .ok_or_else(|| Error::InvalidInput(format!("'{}' must be an object", keys[0])))
}

/// Parse a report document. A relative screenshot path is resolved against
/// `base_dir`.
pub fn parse_str(json: &str, base_dir: &Path) -> Result<Report, Error> {
    let root: Value = serde_json::from_str(json)?;
    let root = root
        .as_object()
        .ok_or_else(|| Error::InvalidInput("top level must be an object".into()))?;

    let channel = record_from(object(root, &["channel"])?);
    let video = record_from(object(root, &["video", "item"])?);

    let comments = match root.get("comments") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_object().map(record_from).ok_or_else(|| {
                    Error::InvalidInput(format!("comment #{} is not an object", i + 1))
                })
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(Error::InvalidInput("'comments' must be an array".into())),
    };

    let screenshot = match root.get("screenshot") {
        Some(Value::String(p)) if !p.trim().is_empty() => {
            let path = Path::new(p);
            if path.is_absolute() {
                Screenshot::Path(path.to_path_buf())
            } else {
                Screenshot::Path(base_dir.join(path))
            }
        }
        Some(Value::String(_)) | None | Some(Value::Null) => {
            return Err(Error::MissingField {
                record: "report".into(),
                field: "screenshot".into(),
            });
        }
        Some(_) => return Err(Error::InvalidInput("'screenshot' must be a path string".into())),
    };

    let report = Report {
        channel,
        video,
        comments,
        screenshot,
    };
    report.validate()?;
    log::debug!(
        "parsed report: channel {} fields, video {} fields, {} comments",
        report.channel.len(),
        report.video.len(),
        report.comments.len(),
    );
    Ok(report)
}

pub fn parse(path: &Path) -> Result<Report, Error> {
    let json = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
        ),
        _ => Error::Io(e),
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_str(&json, base_dir)
}

/// `"<video title>.pdf"`, safe to use as a single path component.
pub fn output_file_name(report: &Report) -> String {
    let cleaned: String = report
        .title()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim().trim_matches('.');
    if trimmed.is_empty() {
        "report.pdf".to_string()
    } else {
        format!("{trimmed}.pdf")
    }
}

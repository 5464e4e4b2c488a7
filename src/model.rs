use std::path::PathBuf;

use crate::error::Error;

/// A field value as handed over by a provider. Formatting for display happens
/// once, when the value is pushed into a [`Record`].
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Missing,
}

impl FieldValue {
    pub fn to_display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Integer(n) => n.to_string(),
            FieldValue::Float(x) if x.fract() == 0.0 && x.abs() < 1e15 => format!("{}", *x as i64),
            FieldValue::Float(x) => x.to_string(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Missing => String::new(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

impl From<u64> for FieldValue {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(n) => FieldValue::Integer(n),
            Err(_) => FieldValue::Text(n.to_string()),
        }
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Integer(n as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        FieldValue::Float(x)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(FieldValue::Missing)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: String,
    /// Display-formatted value.
    pub value: String,
}

/// Ordered named-field collection. Insertion order is rendering order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: Vec<Field>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.push(Field {
            name: name.into(),
            value: value.into().to_display(),
        });
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.push(name, value);
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// Fail with `MissingField` on the first name in `names` this record lacks.
    pub fn require(&self, record: &str, names: &[&str]) -> Result<(), Error> {
        for name in names {
            if !self.fields.iter().any(|f| f.name == *name) {
                return Err(Error::MissingField {
                    record: record.to_string(),
                    field: (*name).to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Where the screenshot comes from. The layout engine never looks inside it;
/// decoding happens when the PDF is assembled.
#[derive(Clone, Debug)]
pub enum Screenshot {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl Screenshot {
    pub(crate) fn describe(&self) -> String {
        match self {
            Screenshot::Path(p) => p.display().to_string(),
            Screenshot::Bytes(b) => format!("<{} bytes in memory>", b.len()),
        }
    }
}

/// Everything one report is built from.
#[derive(Clone, Debug)]
pub struct Report {
    pub channel: Record,
    pub video: Record,
    pub comments: Vec<Record>,
    pub screenshot: Screenshot,
}

pub(crate) const CHANNEL_REQUIRED: &[&str] = &["title"];
pub(crate) const VIDEO_REQUIRED: &[&str] = &["title"];
pub(crate) const COMMENT_REQUIRED: &[&str] = &["author", "text", "likeCount", "publishedAt"];

impl Report {
    /// Check every record against the fields its provider must supply.
    pub fn validate(&self) -> Result<(), Error> {
        self.channel.require("channel", CHANNEL_REQUIRED)?;
        self.video.require("video", VIDEO_REQUIRED)?;
        for (i, comment) in self.comments.iter().enumerate() {
            comment.require(&format!("comment #{}", i + 1), COMMENT_REQUIRED)?;
        }
        Ok(())
    }

    pub fn title(&self) -> &str {
        self.video.get("title").unwrap_or("")
    }
}

/// A titled group of records rendered together. `list` sections (comments)
/// put a record gap after every record; `figure` is drawn right after the
/// title, before the first field.
#[derive(Clone, Debug)]
pub struct Section<'a> {
    pub title: &'a str,
    pub records: &'a [Record],
    pub list: bool,
    pub figure: bool,
}

impl<'a> Section<'a> {
    pub fn single(title: &'a str, record: &'a Record) -> Self {
        Section {
            title,
            records: std::slice::from_ref(record),
            list: false,
            figure: false,
        }
    }

    pub fn list(title: &'a str, records: &'a [Record]) -> Self {
        Section {
            title,
            records,
            list: true,
            figure: false,
        }
    }

    pub fn with_figure(mut self) -> Self {
        self.figure = true;
        self
    }
}

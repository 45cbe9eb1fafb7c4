use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{GalleryError, GalleryResult};

/// Colour the gallery client falls back to when a graph carries none.
pub const DEFAULT_LINE_COLOR: &str = "#2196F3";

/// Kind of plotting surface a graph is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphType {
    #[serde(rename = "2D")]
    TwoD,
    #[serde(rename = "3D")]
    ThreeD,
}

impl FromStr for GraphType {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2D" => Ok(GraphType::TwoD),
            "3D" => Ok(GraphType::ThreeD),
            other => Err(GalleryError::Validation(format!(
                "type must be '2D' or '3D', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for GraphType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphType::TwoD => write!(f, "2D"),
            GraphType::ThreeD => write!(f, "3D"),
        }
    }
}

/// One saved graph definition
///
/// Fields the gallery does not know about are kept in `extra` so that
/// whatever a client stored comes back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphRecord {
    /// Unique, immutable identifier
    pub id: String,

    /// Display name, required and non-blank on create
    pub title: String,

    /// Expression or equation handed to the plotting widget as-is
    pub formula: String,

    /// Whether the graph is drawn on the 2D or the 3D surface
    #[serde(rename = "type")]
    pub graph_type: GraphType,

    /// Free-form author name, empty when not given
    #[serde(default)]
    pub author: String,

    /// Expected to be a `#RRGGBB` hex colour
    #[serde(default = "default_line_color")]
    pub line_color: String,

    /// Labels used for browsing; duplicates are not filtered here
    #[serde(default)]
    pub tags: Vec<String>,

    /// ISO-8601 creation timestamp
    pub created_at: String,

    /// Any other fields the client sent, stored verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_line_color() -> String {
    DEFAULT_LINE_COLOR.to_string()
}

/// Candidate record received on create
///
/// Every field is optional here; `into_record` decides what is required.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphDraft {
    pub id: Option<String>,
    pub title: Option<String>,
    pub formula: Option<String>,
    #[serde(rename = "type")]
    pub graph_type: Option<String>,
    pub author: Option<String>,
    pub line_color: Option<String>,
    pub tags: Option<Vec<String>>,
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GraphDraft {
    /// Validate the draft and turn it into a storable record.
    ///
    /// `title` and `formula` must be non-blank and `type` must be `2D` or
    /// `3D`. A missing `id` becomes the epoch milliseconds of `now`, a
    /// missing `createdAt` becomes `now` in ISO-8601.
    pub fn into_record(self, now: DateTime<Utc>) -> GalleryResult<GraphRecord> {
        let title = required("title", self.title)?;
        let formula = required("formula", self.formula)?;
        let graph_type: GraphType = required("type", self.graph_type)?.parse()?;

        let id = self
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| now.timestamp_millis().to_string());
        let created_at = self
            .created_at
            .filter(|ts| !ts.is_empty())
            .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true));

        Ok(GraphRecord {
            id,
            title,
            formula,
            graph_type,
            author: self.author.unwrap_or_default(),
            line_color: self.line_color.unwrap_or_else(default_line_color),
            tags: self.tags.unwrap_or_default(),
            created_at,
            extra: self.extra,
        })
    }
}

fn required(field: &str, value: Option<String>) -> GalleryResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(GalleryError::Validation(format!("{} is required", field))),
    }
}

/// Partial update received on PUT
///
/// Only the fields present in the request are applied. An `id` in the
/// payload is dropped since ids never change.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphPatch {
    pub title: Option<String>,
    pub formula: Option<String>,
    #[serde(rename = "type")]
    pub graph_type: Option<GraphType>,
    pub author: Option<String>,
    pub line_color: Option<String>,
    pub tags: Option<Vec<String>>,
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GraphRecord {
    /// Shallow-merge `patch` onto this record.
    ///
    /// Required-field emptiness is not re-checked here.
    pub fn apply(&mut self, patch: GraphPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(formula) = patch.formula {
            self.formula = formula;
        }
        if let Some(graph_type) = patch.graph_type {
            self.graph_type = graph_type;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(line_color) = patch.line_color {
            self.line_color = line_color;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(created_at) = patch.created_at {
            self.created_at = created_at;
        }
        for (key, value) in patch.extra {
            if key != "id" {
                self.extra.insert(key, value);
            }
        }
    }
}

//! Serialization and deserialization for project files.
//!
//! Projects are JSON documents with camelCase keys:
//!
//! ```text
//! { version, metadata, geometry { innerDiameter, wireDiameter, centerSpacing, angleIn, angleOut },
//!   rings: [{ row, col, cluster, color }], paletteAssignment?, nextCluster? }
//! ```
//!
//! Older (version 1) documents used several spellings for ring fields and kept
//! geometry at the top level. They are migrated once, as raw JSON, before the
//! typed decode, so nothing past this module ever sees the old schema. Any
//! problem rejects the whole document.

use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use chainweave_core::ProjectError;

use crate::color::HexColor;
use crate::geometry::RingGeometry;
use crate::lattice::CellKey;
use crate::palette::{Palette, PaletteEntry};
use crate::ring_store::{Ring, RingStore};

/// Newest project format version this build writes and reads.
pub const PROJECT_FORMAT_VERSION: u32 = 2;

/// Complete project file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    pub version: u32,
    pub metadata: ProjectMetadata,
    pub geometry: RingGeometry,
    pub rings: Vec<RingRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette_assignment: Option<PaletteAssignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cluster: Option<u64>,
}

/// Project metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub name: String,
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
}

impl ProjectMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            created: now,
            modified: now,
            author: String::new(),
            description: String::new(),
        }
    }
}

/// One persisted ring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingRecord {
    pub row: i32,
    pub col: i32,
    pub cluster: u64,
    pub color: HexColor,
}

/// Palette the project was designed against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteAssignment {
    pub name: String,
    pub colors: Vec<PaletteEntry>,
}

impl PaletteAssignment {
    pub fn from_palette(palette: &Palette) -> Self {
        Self {
            name: palette.name().to_string(),
            colors: palette.entries().to_vec(),
        }
    }

    pub fn to_palette(&self) -> Result<Palette, ProjectError> {
        Palette::new(self.name.clone(), self.colors.clone()).map_err(|e| {
            ProjectError::InvalidField {
                field: "paletteAssignment".to_string(),
                context: "project".to_string(),
                reason: e.to_string(),
            }
        })
    }
}

/// Validated contents of a project, ready to install into a session.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub metadata: ProjectMetadata,
    pub geometry: RingGeometry,
    pub store: RingStore,
    pub palette: Option<Palette>,
}

impl ProjectFile {
    /// Builds a document from session state. Rings are written in row-major order.
    pub fn new(
        metadata: ProjectMetadata,
        geometry: RingGeometry,
        store: &RingStore,
        palette: Option<&Palette>,
    ) -> Self {
        let rings = store
            .snapshot()
            .into_iter()
            .map(|(key, ring)| RingRecord {
                row: key.row,
                col: key.col,
                cluster: ring.cluster,
                color: ring.color,
            })
            .collect();
        Self {
            version: PROJECT_FORMAT_VERSION,
            metadata,
            geometry,
            rings,
            palette_assignment: palette.map(PaletteAssignment::from_palette),
            next_cluster: Some(store.next_cluster()),
        }
    }

    pub fn to_json(&self) -> Result<String, ProjectError> {
        serde_json::to_string_pretty(self).map_err(|e| ProjectError::Malformed {
            reason: e.to_string(),
        })
    }

    /// Parses and migrates a document without validating ring contents.
    pub fn from_json(json: &str) -> Result<Self, ProjectError> {
        let value: Value = serde_json::from_str(json).map_err(|e| ProjectError::Malformed {
            reason: e.to_string(),
        })?;
        let value = migrate(value)?;
        serde_json::from_value(value).map_err(|e| ProjectError::Malformed {
            reason: e.to_string(),
        })
    }

    /// Validates the document and turns it into session state.
    pub fn into_loaded(self) -> Result<LoadedProject, ProjectError> {
        self.geometry.validate()?;
        let mut seen = HashSet::with_capacity(self.rings.len());
        let mut rings = Vec::with_capacity(self.rings.len());
        for record in &self.rings {
            let key = CellKey::new(record.row, record.col);
            if !seen.insert(key) {
                return Err(ProjectError::DuplicateCell {
                    row: record.row,
                    col: record.col,
                });
            }
            rings.push((
                key,
                Ring {
                    color: record.color,
                    cluster: record.cluster,
                },
            ));
        }
        let palette = self
            .palette_assignment
            .as_ref()
            .map(PaletteAssignment::to_palette)
            .transpose()?;
        Ok(LoadedProject {
            metadata: self.metadata,
            geometry: self.geometry,
            store: RingStore::from_rings(rings, self.next_cluster.unwrap_or(1))?,
            palette,
        })
    }

    /// Parse, migrate and validate in one step.
    pub fn load_str(json: &str) -> Result<LoadedProject, ProjectError> {
        Self::from_json(json)?.into_loaded()
    }

    /// Save project to file. The document is written to a temporary file in
    /// the target's directory and persisted over it, so a failed write never
    /// truncates an existing project.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json().context("Failed to serialize project")?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
        tmp.write_all(json.as_bytes())
            .context("Failed to write project file")?;
        tmp.as_file().sync_all().context("Failed to flush project file")?;
        tmp.persist(path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }

    /// Load project from file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<LoadedProject> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read project file")?;
        let loaded = Self::load_str(&content).context("Failed to parse project file")?;
        Ok(loaded)
    }
}

/// Brings any supported document version up to the current schema.
fn migrate(value: Value) -> Result<Value, ProjectError> {
    let Value::Object(map) = value else {
        return Err(ProjectError::Malformed {
            reason: "project must be a JSON object".to_string(),
        });
    };
    let version = match map.get("version") {
        None | Some(Value::Null) => 1,
        Some(v) => parse_version(v)?,
    };
    if version > PROJECT_FORMAT_VERSION {
        return Err(ProjectError::UnsupportedVersion {
            found: version,
            supported: PROJECT_FORMAT_VERSION,
        });
    }
    if version == PROJECT_FORMAT_VERSION {
        return Ok(Value::Object(map));
    }
    migrate_v1(map).map(Value::Object)
}

fn parse_version(v: &Value) -> Result<u32, ProjectError> {
    let invalid = || ProjectError::InvalidField {
        field: "version".to_string(),
        context: "project".to_string(),
        reason: format!("expected a version number, got {}", v),
    };
    match v {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u64))
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(invalid),
        // "1.0" style strings from the first releases.
        Value::String(s) => s
            .split('.')
            .next()
            .and_then(|major| major.trim().parse::<u32>().ok())
            .ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

/// First value present under any of `names`.
fn first_of<'a>(obj: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|n| obj.get(*n).filter(|v| !v.is_null()))
}

fn integer_field(
    obj: &Map<String, Value>,
    names: &[&str],
    context: &str,
) -> Result<Option<i64>, ProjectError> {
    let Some(v) = first_of(obj, names) else {
        return Ok(None);
    };
    let n = v
        .as_i64()
        .or_else(|| v.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
        .or_else(|| v.as_str().and_then(|s| s.trim().parse::<i64>().ok()));
    n.map(Some).ok_or_else(|| ProjectError::InvalidField {
        field: names[0].to_string(),
        context: context.to_string(),
        reason: format!("expected an integer, got {}", v),
    })
}

fn cell_coord(obj: &Map<String, Value>, names: &[&str], context: &str) -> Result<i32, ProjectError> {
    let n = integer_field(obj, names, context)?.ok_or_else(|| ProjectError::MissingField {
        field: names[0].to_string(),
        context: context.to_string(),
    })?;
    i32::try_from(n).map_err(|_| ProjectError::InvalidField {
        field: names[0].to_string(),
        context: context.to_string(),
        reason: format!("{} is out of range", n),
    })
}

/// Rewrites a version 1 document into the version 2 layout.
fn migrate_v1(mut doc: Map<String, Value>) -> Result<Map<String, Value>, ProjectError> {
    let rings = match doc.remove("rings") {
        Some(Value::Array(rings)) => rings,
        Some(other) => {
            return Err(ProjectError::InvalidField {
                field: "rings".to_string(),
                context: "project".to_string(),
                reason: format!("expected an array, got {}", other),
            })
        }
        None => {
            return Err(ProjectError::MissingField {
                field: "rings".to_string(),
                context: "project".to_string(),
            })
        }
    };

    let mut records: Vec<(i32, i32, Option<u64>, HexColor)> = Vec::with_capacity(rings.len());
    for (i, ring) in rings.iter().enumerate() {
        let context = format!("ring {}", i);
        let Value::Object(obj) = ring else {
            return Err(ProjectError::InvalidField {
                field: "rings".to_string(),
                context,
                reason: "expected an object".to_string(),
            });
        };
        let row = cell_coord(obj, &["row", "r"], &context)?;
        let col = cell_coord(obj, &["col", "c"], &context)?;
        let color_value =
            first_of(obj, &["color", "colour", "hex"]).ok_or_else(|| ProjectError::MissingField {
                field: "color".to_string(),
                context: context.clone(),
            })?;
        let color = color_value
            .as_str()
            .and_then(|s| s.parse::<HexColor>().ok())
            .ok_or_else(|| ProjectError::InvalidField {
                field: "color".to_string(),
                context: context.clone(),
                reason: format!("not a hex color: {}", color_value),
            })?;
        let cluster = integer_field(obj, &["cluster", "group"], &context)?
            .map(|c| {
                u64::try_from(c).map_err(|_| ProjectError::InvalidField {
                    field: "cluster".to_string(),
                    context: context.clone(),
                    reason: format!("{} is negative", c),
                })
            })
            .transpose()?;
        records.push((row, col, cluster, color));
    }

    // Rings without a cluster get fresh ids in row-major order, after every id in use.
    records.sort_by_key(|(row, col, _, _)| (*row, *col));
    let mut next = match records.iter().filter_map(|(_, _, c, _)| *c).max() {
        None => 1,
        Some(max) => max.checked_add(1).ok_or_else(|| ProjectError::InvalidField {
            field: "cluster".to_string(),
            context: "project".to_string(),
            reason: format!("{} leaves no id for rings without a cluster", max),
        })?,
    };
    let migrated_rings: Vec<Value> = records
        .into_iter()
        .map(|(row, col, cluster, color)| {
            let cluster = cluster.unwrap_or_else(|| {
                let id = next;
                next = next.saturating_add(1);
                id
            });
            serde_json::json!({
                "row": row,
                "col": col,
                "cluster": cluster,
                "color": color.to_string(),
            })
        })
        .collect();

    let geometry = match doc.remove("geometry") {
        Some(Value::Object(g)) => g,
        _ => Map::new(),
    };
    let defaults = RingGeometry::default();
    let mut geometry_out = Map::new();
    let geometry_fields: [(&str, &[&str], f64); 5] = [
        ("innerDiameter", &["innerDiameter", "id", "inner"][..], defaults.inner_diameter),
        ("wireDiameter", &["wireDiameter", "wd", "wire"][..], defaults.wire_diameter),
        ("centerSpacing", &["centerSpacing", "spacing", "spacingX"][..], defaults.center_spacing),
        ("angleIn", &["angleIn"][..], defaults.angle_in),
        ("angleOut", &["angleOut"][..], defaults.angle_out),
    ];
    for (field, names, default) in geometry_fields {
        let value = first_of(&geometry, names).or_else(|| first_of(&doc, names));
        let number = match value {
            Some(v) => v.as_f64().ok_or_else(|| ProjectError::InvalidField {
                field: field.to_string(),
                context: "geometry".to_string(),
                reason: format!("expected a number, got {}", v),
            })?,
            None => default,
        };
        geometry_out.insert(field.to_string(), Value::from(number));
    }

    let metadata = match doc.remove("metadata") {
        Some(Value::Object(m)) => Value::Object(m),
        _ => {
            let name = doc
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("Untitled")
                .to_string();
            serde_json::to_value(ProjectMetadata::new(name)).map_err(|e| ProjectError::Malformed {
                reason: e.to_string(),
            })?
        }
    };

    let mut out = Map::new();
    out.insert("version".to_string(), Value::from(PROJECT_FORMAT_VERSION));
    out.insert("metadata".to_string(), metadata);
    out.insert("geometry".to_string(), Value::Object(geometry_out));
    out.insert("rings".to_string(), Value::Array(migrated_rings));
    if let Some(palette) = first_of(&doc, &["paletteAssignment", "palette"]) {
        out.insert("paletteAssignment".to_string(), palette.clone());
    }
    if let Some(next_cluster) = first_of(&doc, &["nextCluster", "clusterCounter"]) {
        out.insert("nextCluster".to_string(), next_cluster.clone());
    }
    Ok(out)
}

//! Ship-design persistence.
//!
//! Designs are saved as versioned TOML snapshots in a designs folder, one
//! file per save, with timestamp-prefixed filenames
//! (`<unix-seconds>_<slug>.toml`) so a directory listing is already a
//! history.  Loading migrates snapshots from older layouts by inserting
//! missing keys before decode and rejects versions newer than this build.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::editor::ShipDesign;

const DESIGN_VERSION: u32 = 1;

/// Default designs folder, relative to the working directory.
pub fn designs_dir() -> PathBuf {
    PathBuf::from("designs")
}

/// On-disk snapshot: version header plus the design payload.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DesignSnapshot {
    pub version: u32,
    pub saved_at_unix: u64,
    pub design: ShipDesign,
}

/// What the load screen shows for one file in the designs folder.
#[derive(Debug, Clone)]
pub struct DesignFileMetadata {
    pub path: PathBuf,
    pub loadable: bool,
    pub name: Option<String>,
    pub part_count: usize,
    pub saved_at_unix: Option<u64>,
    pub status: String,
}

fn current_unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Lowercase the design name into a filesystem-safe slug.
fn slugify(name: &str) -> String {
    let slug: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if slug.is_empty() {
        "design".to_string()
    } else {
        slug
    }
}

/// Save `design` into `dir`, returning the path written.
///
/// The design is validated first; the filename is prefixed with the save
/// timestamp so repeated saves of the same design never collide within the
/// same second granularity the original used.
pub fn save_design(dir: &Path, design: &ShipDesign) -> Result<PathBuf, String> {
    design
        .validate()
        .map_err(|err| format!("refusing to save: {err}"))?;

    fs::create_dir_all(dir)
        .map_err(|err| format!("failed to create {}: {err}", dir.display()))?;

    let snapshot = DesignSnapshot {
        version: DESIGN_VERSION,
        saved_at_unix: current_unix_timestamp(),
        design: design.clone(),
    };

    let serialized = toml::to_string_pretty(&snapshot)
        .map_err(|err| format!("failed to serialize design TOML: {err}"))?;

    let filename = format!("{}_{}.toml", snapshot.saved_at_unix, slugify(&design.name));
    let path = dir.join(filename);
    fs::write(&path, serialized)
        .map_err(|err| format!("failed to write {}: {err}", path.display()))?;
    Ok(path)
}

/// Load a design snapshot from `path`, migrating older layouts.
pub fn load_design(path: &Path) -> Result<DesignSnapshot, String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    parse_snapshot_with_migration(&contents)
}

fn parse_snapshot_with_migration(contents: &str) -> Result<DesignSnapshot, String> {
    let mut value: toml::Value =
        toml::from_str(contents).map_err(|err| format!("failed to parse design TOML: {err}"))?;

    migrate_snapshot_value(&mut value)?;

    value
        .try_into::<DesignSnapshot>()
        .map_err(|err| format!("failed to decode migrated design snapshot: {err}"))
}

fn migrate_snapshot_value(value: &mut toml::Value) -> Result<(), String> {
    let table = value
        .as_table_mut()
        .ok_or_else(|| "design file root must be a TOML table".to_string())?;

    // Pre-versioning files carried the design fields at the root.
    if !table.contains_key("design") {
        let mut design = toml::value::Table::new();
        for key in ["name", "parts"] {
            if let Some(v) = table.remove(key) {
                design.insert(key.to_string(), v);
            }
        }
        table.insert("design".to_string(), toml::Value::Table(design));
    }

    if !table.contains_key("version") {
        table.insert(
            "version".to_string(),
            toml::Value::Integer(DESIGN_VERSION as i64),
        );
    }

    if !table.contains_key("saved_at_unix") {
        table.insert("saved_at_unix".to_string(), toml::Value::Integer(0));
    }

    let version = table
        .get("version")
        .and_then(toml::Value::as_integer)
        .ok_or_else(|| "design version is missing or invalid".to_string())?;

    if version != DESIGN_VERSION as i64 {
        return Err(format!(
            "unsupported design version {} (expected {})",
            version, DESIGN_VERSION
        ));
    }

    Ok(())
}

/// Metadata for every `.toml` file in `dir`, newest first.
///
/// Corrupt files are reported with `loadable: false` rather than failing
/// the whole listing; a missing directory is an empty list.
pub fn list_designs(dir: &Path) -> Vec<DesignFileMetadata> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut metadata: Vec<DesignFileMetadata> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .map(|path| match load_design(&path) {
            Ok(snapshot) => DesignFileMetadata {
                path,
                loadable: true,
                name: Some(snapshot.design.name),
                part_count: snapshot.design.parts.len(),
                saved_at_unix: Some(snapshot.saved_at_unix),
                status: "READY".to_string(),
            },
            Err(_) => DesignFileMetadata {
                path,
                loadable: false,
                name: None,
                part_count: 0,
                saved_at_unix: None,
                status: "CORRUPT".to_string(),
            },
        })
        .collect();

    metadata.sort_by(|a, b| b.saved_at_unix.cmp(&a.saved_at_unix));
    metadata
}

/// Load the most recent loadable design in `dir`, if any.
pub fn load_latest_design(dir: &Path) -> Option<DesignSnapshot> {
    list_designs(dir)
        .into_iter()
        .filter(|meta| meta.loadable)
        .find_map(|meta| load_design(&meta.path).ok())
}

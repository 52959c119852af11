//! Value types returned by the resolver
//!
//! All snapshots are computed fresh per call. JSON field names are
//! camelCase to match what existing MCP clients of this service expect.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use compdoc_fs::NormalizedPath;
use compdoc_fs::io::{file_name_of, file_type_of};
use serde::{Deserialize, Serialize};

/// Metadata for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub file_name: String,
    /// Lower-cased extension without the dot.
    pub file_type: String,
    /// Forward-slash path relative to the repository root.
    pub path: String,
}

impl FileDescriptor {
    /// Describe `path`, expressed relative to `root`.
    pub fn from_path(root: &Path, path: &Path) -> Self {
        Self {
            file_name: file_name_of(path),
            file_type: file_type_of(path),
            path: NormalizedPath::relative_to(root, path).to_string(),
        }
    }
}

/// One entry of the component catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub name: String,
    pub description: String,
    pub files: Vec<FileDescriptor>,
    pub example_files: Vec<FileDescriptor>,
    pub documentation_files: Vec<FileDescriptor>,
}

/// Source and example listing for one component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentFiles {
    pub component_name: String,
    pub source_files: Vec<FileDescriptor>,
    pub example_files: Vec<FileDescriptor>,
}

impl ComponentFiles {
    pub fn empty(component_name: &str) -> Self {
        Self {
            component_name: component_name.to_string(),
            ..Default::default()
        }
    }
}

/// Text of one file, read on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileContent {
    pub component_name: String,
    pub file_name: String,
    pub content: String,
    pub file_type: String,
}

/// A file with its content attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFile {
    pub file_name: String,
    pub file_type: String,
    pub content: String,
}

/// Full source and example text for one component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDocumentation {
    pub component_name: String,
    pub source_files: Vec<DocumentFile>,
    pub example_files: Vec<DocumentFile>,
}

impl ComponentDocumentation {
    pub fn empty(component_name: &str) -> Self {
        Self {
            component_name: component_name.to_string(),
            ..Default::default()
        }
    }
}

/// Which search policy resolves a single file.
///
/// Accepts the numeric form (`0` = source, `1` = example) as well as the
/// names, case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "CategoryRepr")]
pub enum FileCategory {
    Source,
    Example,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryRepr {
    Index(u64),
    Name(String),
}

impl TryFrom<CategoryRepr> for FileCategory {
    type Error = String;

    fn try_from(repr: CategoryRepr) -> Result<Self, Self::Error> {
        match repr {
            CategoryRepr::Index(0) => Ok(Self::Source),
            CategoryRepr::Index(1) => Ok(Self::Example),
            CategoryRepr::Index(other) => Err(format!("unknown file category {other}")),
            CategoryRepr::Name(name) => name.parse(),
        }
    }
}

impl FromStr for FileCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "source" | "0" => Ok(Self::Source),
            "example" | "1" => Ok(Self::Example),
            _ => Err(format!("unknown file category '{s}'")),
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Example => write!(f, "example"),
        }
    }
}

/// Arguments of a single-file content request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileContentRequest {
    pub component_name: String,
    pub file_name: String,
    pub category: FileCategory,
}

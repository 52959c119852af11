//! [`ComponentTree`] builder for resolver test scenarios.
//!
//! Lays out files the way the default configuration expects them:
//!
//! ```text
//! src/BootstrapBlazor/Components/<Component>/*
//! src/BootstrapBlazor.Server/Components/<Component>/*.md
//! src/BootstrapBlazor.Server/Components/Samples/<Plural>.razor[.cs]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Components root, relative to the repository root.
pub const COMPONENTS_DIR: &str = "src/BootstrapBlazor/Components";
/// Documentation root, relative to the repository root.
pub const DOCS_DIR: &str = "src/BootstrapBlazor.Server/Components";
/// Samples root, relative to the repository root.
pub const SAMPLES_DIR: &str = "src/BootstrapBlazor.Server/Components/Samples";

/// A temporary repository root with helpers for writing component files.
///
/// # Example
///
/// ```rust,no_run
/// use compdoc_test_utils::tree::ComponentTree;
///
/// let tree = ComponentTree::new();
/// tree.source("Button", "Button.razor", "<div></div>")
///     .sample("Buttons.razor", "<Button />");
/// ```
pub struct ComponentTree {
    temp_dir: TempDir,
}

impl Default for ComponentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentTree {
    /// Create an empty temporary root (no layout directories yet).
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Create an empty temporary root with the three layout roots present.
    pub fn with_layout() -> Self {
        let tree = Self::new();
        for dir in [COMPONENTS_DIR, DOCS_DIR, SAMPLES_DIR] {
            fs::create_dir_all(tree.root().join(dir)).unwrap();
        }
        tree
    }

    /// Return the repository root.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn component_dir(&self, component: &str) -> PathBuf {
        self.root().join(COMPONENTS_DIR).join(component)
    }

    pub fn sample_path(&self, file_name: &str) -> PathBuf {
        self.root().join(SAMPLES_DIR).join(file_name)
    }

    /// Write a source file directly inside the component's directory.
    pub fn source(&self, component: &str, file_name: &str, content: &str) -> &Self {
        self.write(&self.component_dir(component).join(file_name), content);
        self
    }

    /// Create an empty component directory.
    pub fn empty_component(&self, component: &str) -> &Self {
        fs::create_dir_all(self.component_dir(component)).unwrap();
        self
    }

    /// Write a documentation file under the docs root.
    pub fn doc(&self, component: &str, file_name: &str, content: &str) -> &Self {
        self.write(
            &self.root().join(DOCS_DIR).join(component).join(file_name),
            content,
        );
        self
    }

    /// Write a file under the samples root.
    pub fn sample(&self, file_name: &str, content: &str) -> &Self {
        self.write(&self.sample_path(file_name), content);
        self
    }

    /// Write an arbitrary file relative to the root.
    pub fn file(&self, relative: &str, content: &str) -> &Self {
        self.write(&self.root().join(relative), content);
        self
    }

    fn write(&self, path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
}

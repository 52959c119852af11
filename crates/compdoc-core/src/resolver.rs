//! Component file resolution
//!
//! Maps a component name onto the mirror's three directory conventions:
//!
//! - sources: every file directly inside `<components_dir>/<name>/`
//! - docs: `.md` files directly inside `<docs_dir>/<name>/`
//! - examples: `<samples_dir>/<plural>.<ext>` for each sample extension
//!
//! Each public operation holds the handle's read guard for its whole run, so
//! it sees one tree even if a sync swaps in a new clone meanwhile. Missing
//! directories and files become warnings; I/O errors stop that part of the
//! walk and are reported as the outcome's error.

use std::path::{Path, PathBuf};

use compdoc_fs::io::{file_type_of, list_dirs, list_files, read_text_bounded};
use compdoc_fs::{RepositoryHandle, validate_path_identifier};

use crate::config::LayoutConfig;
use crate::description::{default_description, describe};
use crate::error::Error;
use crate::models::{
    Component, ComponentDocumentation, ComponentFiles, DocumentFile, FileCategory, FileContent,
    FileDescriptor,
};
use crate::naming::sample_file_names;
use crate::outcome::{Diagnostics, Outcome};

/// Resolves component names to files under the current mirror root.
#[derive(Debug, Clone)]
pub struct FileResolver {
    handle: RepositoryHandle,
    layout: LayoutConfig,
}

impl FileResolver {
    pub fn new(handle: RepositoryHandle, layout: LayoutConfig) -> Self {
        Self { handle, layout }
    }

    pub fn handle(&self) -> &RepositoryHandle {
        &self.handle
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Catalog of every component directory holding at least one file.
    pub fn list_components(&self) -> Outcome<Vec<Component>> {
        let root = self.handle.read();
        let mut diag = Diagnostics::default();
        let components_root = root.join(&self.layout.components_dir);

        if let Err(error) = self.check_components_root(&components_root, &mut diag) {
            return Outcome::Failed {
                partial: Vec::new(),
                error,
            };
        }
        if !components_root.is_dir() {
            return diag.finish(Vec::new());
        }

        let dirs = match list_dirs(&components_root) {
            Ok(dirs) => dirs,
            Err(e) => {
                tracing::error!(path = %components_root.display(), error = %e, "Failed to list components");
                diag.fail(e.into());
                return diag.finish(Vec::new());
            }
        };

        let mut components = Vec::new();
        for dir in dirs {
            let name = compdoc_fs::io::file_name_of(&dir);
            if self.is_excluded(&name) {
                tracing::debug!(component = %name, "Skipping excluded directory");
                continue;
            }

            let files = match list_files(&dir) {
                Ok(files) => files,
                Err(e) => {
                    tracing::error!(component = %name, error = %e, "Failed to list component files");
                    diag.fail(e.into());
                    continue;
                }
            };
            if files.is_empty() {
                tracing::debug!(component = %name, "Skipping component without files");
                continue;
            }

            let description = describe(
                &files,
                &self.layout.description_extensions,
                self.layout.max_file_size,
            )
            .unwrap_or_else(|| default_description(&name));

            components.push(Component {
                files: files
                    .iter()
                    .map(|f| FileDescriptor::from_path(&root, f))
                    .collect(),
                example_files: self.example_descriptors(&root, &name),
                documentation_files: self.documentation_descriptors(&root, &name, &mut diag),
                description,
                name,
            });
        }

        tracing::debug!(count = components.len(), "Listed components");
        diag.finish(components)
    }

    /// Source and example descriptors for one component.
    pub fn get_component_files(&self, component: &str) -> Outcome<ComponentFiles> {
        let mut result = ComponentFiles::empty(component);
        if let Err(error) = validate_path_identifier(component) {
            return Outcome::Failed {
                partial: result,
                error: Error::from_identifier(error),
            };
        }

        let root = self.handle.read();
        let mut diag = Diagnostics::default();
        if let Err(error) = self.check_components_root(&root.join(&self.layout.components_dir), &mut diag) {
            return Outcome::Failed {
                partial: result,
                error,
            };
        }

        result.source_files = self
            .source_paths(&root, component, &mut diag)
            .iter()
            .map(|f| FileDescriptor::from_path(&root, f))
            .collect();
        result.example_files = self.example_descriptors(&root, component);

        diag.finish(result)
    }

    /// Text of one file, located by `category`.
    ///
    /// Example files resolve only when `file_name` is one of the component's
    /// plural sample names (compared case-insensitively); anything else
    /// yields empty content and a warning.
    pub fn get_file_content(
        &self,
        component: &str,
        file_name: &str,
        category: FileCategory,
    ) -> Outcome<FileContent> {
        let mut result = FileContent {
            component_name: component.to_string(),
            file_name: file_name.to_string(),
            content: String::new(),
            file_type: file_type_of(Path::new(file_name)),
        };
        if let Err(error) = validate_path_identifier(component)
            .and_then(|()| validate_path_identifier(file_name))
        {
            return Outcome::Failed {
                partial: result,
                error: Error::from_identifier(error),
            };
        }

        let root = self.handle.read();
        let mut diag = Diagnostics::default();
        if let Err(error) = self.check_components_root(&root.join(&self.layout.components_dir), &mut diag) {
            return Outcome::Failed {
                partial: result,
                error,
            };
        }

        let path = match category {
            FileCategory::Source => Some(
                root.join(&self.layout.components_dir)
                    .join(component)
                    .join(file_name),
            ),
            FileCategory::Example => self.example_path(&root, component, file_name),
        };

        match path.filter(|p| p.is_file()) {
            Some(path) => {
                result.file_type = file_type_of(&path);
                match read_text_bounded(&path, self.layout.max_file_size) {
                    Ok(content) => result.content = content,
                    Err(e) => {
                        tracing::error!(component = %component, file = %file_name, error = %e, "Failed to read file");
                        diag.fail(e.into());
                    }
                }
            }
            None => {
                tracing::warn!(component = %component, file = %file_name, %category, "File not found");
                diag.warn(format!(
                    "{category} file '{file_name}' not found for component '{component}'"
                ));
            }
        }

        diag.finish(result)
    }

    /// Source and example files of one component with their text attached.
    pub fn get_component_documentation(&self, component: &str) -> Outcome<ComponentDocumentation> {
        let mut result = ComponentDocumentation::empty(component);
        if let Err(error) = validate_path_identifier(component) {
            return Outcome::Failed {
                partial: result,
                error: Error::from_identifier(error),
            };
        }

        let root = self.handle.read();
        let mut diag = Diagnostics::default();
        if let Err(error) = self.check_components_root(&root.join(&self.layout.components_dir), &mut diag) {
            return Outcome::Failed {
                partial: result,
                error,
            };
        }

        let sources = self.source_paths(&root, component, &mut diag);
        result.source_files = self.read_documents(&sources, component, &mut diag);

        let examples: Vec<PathBuf> = self
            .example_descriptors(&root, component)
            .iter()
            .map(|d| self.samples_root(&root).join(&d.file_name))
            .collect();
        if examples.is_empty() {
            tracing::warn!(component = %component, "No example files found");
            diag.warn(format!("no example files found for component '{component}'"));
        }
        result.example_files = self.read_documents(&examples, component, &mut diag);

        diag.finish(result)
    }

    /// Fail when there is nothing to read because no sync ever succeeded;
    /// otherwise a missing root is only a warning.
    fn check_components_root(&self, components_root: &Path, diag: &mut Diagnostics) -> Result<(), Error> {
        if components_root.is_dir() {
            return Ok(());
        }
        if !self.handle.sync_state().has_succeeded() {
            tracing::warn!(path = %components_root.display(), "Repository has not been synchronized");
            return Err(Error::NotSynchronized {
                path: components_root.to_path_buf(),
            });
        }
        tracing::warn!(path = %components_root.display(), "Components directory not found");
        diag.warn(format!(
            "components directory {} not found",
            components_root.display()
        ));
        Ok(())
    }

    fn is_excluded(&self, name: &str) -> bool {
        let reserved = &self.layout.reserved_prefix;
        (!reserved.is_empty() && name.starts_with(reserved.as_str()))
            || self.layout.excluded_dirs.iter().any(|d| d == name)
    }

    fn samples_root(&self, root: &Path) -> PathBuf {
        root.join(&self.layout.samples_dir)
    }

    /// Files directly inside the component's source directory.
    fn source_paths(&self, root: &Path, component: &str, diag: &mut Diagnostics) -> Vec<PathBuf> {
        let dir = root.join(&self.layout.components_dir).join(component);
        if !dir.is_dir() {
            tracing::warn!(component = %component, path = %dir.display(), "Component directory not found");
            diag.warn(format!("component directory for '{component}' not found"));
            return Vec::new();
        }
        match list_files(&dir) {
            Ok(files) => files,
            Err(e) => {
                tracing::error!(component = %component, error = %e, "Failed to list component files");
                diag.fail(e.into());
                Vec::new()
            }
        }
    }

    /// Existing `<plural>.<ext>` files under the samples root.
    fn example_descriptors(&self, root: &Path, component: &str) -> Vec<FileDescriptor> {
        let samples = self.samples_root(root);
        sample_file_names(component, &self.layout.sample_extensions)
            .into_iter()
            .map(|name| samples.join(name))
            .filter(|path| path.is_file())
            .map(|path| FileDescriptor::from_path(root, &path))
            .collect()
    }

    /// Sample path when `file_name` names one of the component's sample files.
    fn example_path(&self, root: &Path, component: &str, file_name: &str) -> Option<PathBuf> {
        sample_file_names(component, &self.layout.sample_extensions)
            .into_iter()
            .find(|candidate| candidate.eq_ignore_ascii_case(file_name))
            .map(|candidate| self.samples_root(root).join(candidate))
    }

    /// Markdown files in the component's docs directory.
    fn documentation_descriptors(
        &self,
        root: &Path,
        component: &str,
        diag: &mut Diagnostics,
    ) -> Vec<FileDescriptor> {
        let dir = root.join(&self.layout.docs_dir).join(component);
        if !dir.is_dir() {
            return Vec::new();
        }
        match list_files(&dir) {
            Ok(files) => files
                .iter()
                .filter(|f| file_type_of(f) == "md")
                .map(|f| FileDescriptor::from_path(root, f))
                .collect(),
            Err(e) => {
                tracing::error!(component = %component, error = %e, "Failed to list documentation files");
                diag.fail(e.into());
                Vec::new()
            }
        }
    }

    fn read_documents(
        &self,
        paths: &[PathBuf],
        component: &str,
        diag: &mut Diagnostics,
    ) -> Vec<DocumentFile> {
        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let file_name = compdoc_fs::io::file_name_of(path);
            match read_text_bounded(path, self.layout.max_file_size) {
                Ok(content) => documents.push(DocumentFile {
                    file_type: file_type_of(path),
                    file_name,
                    content,
                }),
                Err(e) => {
                    tracing::error!(component = %component, file = %file_name, error = %e, "Failed to read file");
                    diag.fail(e.into());
                }
            }
        }
        documents
    }
}

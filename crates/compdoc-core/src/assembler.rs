//! Stable boundary between the protocol layer and the resolver

use crate::models::{
    Component, ComponentDocumentation, ComponentFiles, FileContent, FileContentRequest,
};
use crate::outcome::Outcome;
use crate::resolver::FileResolver;

/// Presents resolver operations under the names the tools use.
#[derive(Debug, Clone)]
pub struct DocumentationAssembler {
    resolver: FileResolver,
}

impl DocumentationAssembler {
    pub fn new(resolver: FileResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &FileResolver {
        &self.resolver
    }

    pub fn list_components(&self) -> Outcome<Vec<Component>> {
        self.resolver.list_components()
    }

    pub fn get_component_files(&self, component_name: &str) -> Outcome<ComponentFiles> {
        self.resolver.get_component_files(component_name)
    }

    pub fn get_file_content(&self, request: &FileContentRequest) -> Outcome<FileContent> {
        self.resolver
            .get_file_content(&request.component_name, &request.file_name, request.category)
    }

    pub fn get_document(&self, component_name: &str) -> Outcome<ComponentDocumentation> {
        self.resolver.get_component_documentation(component_name)
    }
}

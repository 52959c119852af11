//! Integration tests for FileResolver over a temporary component tree

use std::fs;

use compdoc_core::{
    DocumentationAssembler, Error, FileCategory, FileContentRequest, FileResolver, LayoutConfig,
    Outcome,
};
use compdoc_fs::RepositoryHandle;
use compdoc_test_utils::tree::ComponentTree;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn synced_resolver(tree: &ComponentTree) -> FileResolver {
    let handle = RepositoryHandle::new(tree.root());
    handle.mark_synced("0000000000000000000000000000000000000000");
    FileResolver::new(handle, LayoutConfig::default())
}

fn names(outcome: &Outcome<Vec<compdoc_core::Component>>) -> Vec<String> {
    outcome.value().iter().map(|c| c.name.clone()).collect()
}

#[test]
fn lists_one_entry_per_component_directory() {
    let tree = ComponentTree::with_layout();
    tree.source("Button", "Button.razor", "<button />")
        .source("Button", "Button.razor.cs", "class Button {}")
        .source("Table", "Table.razor", "<table />");

    let outcome = synced_resolver(&tree).list_components();

    assert!(outcome.is_ok());
    assert_eq!(names(&outcome), vec!["Button", "Table"]);
}

#[rstest]
#[case::reserved_prefix(".vs")]
#[case::locales("Locales")]
#[case::base_components("BaseComponents")]
fn excluded_directories_are_not_components(#[case] dir: &str) {
    let tree = ComponentTree::with_layout();
    tree.source("Button", "Button.razor", "<button />")
        .source(dir, "Shared.cs", "class Shared {}");

    let outcome = synced_resolver(&tree).list_components();

    assert_eq!(names(&outcome), vec!["Button"]);
}

#[test]
fn empty_component_directory_is_skipped() {
    let tree = ComponentTree::with_layout();
    tree.source("Button", "Button.razor", "<button />")
        .empty_component("Placeholder");

    let outcome = synced_resolver(&tree).list_components();

    assert!(outcome.is_ok());
    assert_eq!(names(&outcome), vec!["Button"]);
}

#[test]
fn nested_directories_are_not_source_files() {
    let tree = ComponentTree::with_layout();
    tree.source("Select", "Select.razor", "<select />")
        .file(
            "src/BootstrapBlazor/Components/Select/Parts/Option.razor",
            "<option />",
        );

    let outcome = synced_resolver(&tree).list_components();
    let select = &outcome.value()[0];

    let files: Vec<_> = select.files.iter().map(|f| f.file_name.as_str()).collect();
    assert_eq!(files, vec!["Select.razor"]);
}

#[test]
fn description_comes_from_first_summary() {
    let tree = ComponentTree::with_layout();
    tree.source(
        "Button",
        "Button.razor.cs",
        "/// <SUMMARY>\n///   Hello World\n/// </summary>\npublic partial class Button {}",
    )
    .source("Button", "Button.md", "<summary>Not scanned</summary>");

    let outcome = synced_resolver(&tree).list_components();

    assert_eq!(outcome.value()[0].description, "Hello World");
}

#[test]
fn empty_first_summary_falls_back_to_component_name() {
    let tree = ComponentTree::with_layout();
    tree.source("Button", "A.cs", "/// <summary>\n/// </summary>")
        .source("Button", "B.cs", "/// <summary>Other class</summary>");

    let outcome = synced_resolver(&tree).list_components();

    assert_eq!(outcome.value()[0].description, "Button component");
}

#[test]
fn description_defaults_to_component_name() {
    let tree = ComponentTree::with_layout();
    tree.source("Table", "Table.razor", "<table />");

    let outcome = synced_resolver(&tree).list_components();

    assert_eq!(outcome.value()[0].description, "Table component");
}

#[test]
fn catalog_entry_carries_examples_and_docs() {
    let tree = ComponentTree::with_layout();
    tree.source("Button", "Button.razor", "<button />")
        .sample("Buttons.razor", "<Button />")
        .doc("Button", "Button.md", "# Button")
        .doc("Button", "notes.txt", "ignored");

    let outcome = synced_resolver(&tree).list_components();
    let button = &outcome.value()[0];

    assert_eq!(button.example_files.len(), 1);
    assert_eq!(
        button.example_files[0].path,
        "src/BootstrapBlazor.Server/Components/Samples/Buttons.razor"
    );
    let docs: Vec<_> = button
        .documentation_files
        .iter()
        .map(|f| f.file_name.as_str())
        .collect();
    assert_eq!(docs, vec!["Button.md"]);
}

#[test]
fn source_descriptors_have_type_and_relative_path() {
    let tree = ComponentTree::with_layout();
    tree.source("Button", "Button.razor.cs", "class Button {}");

    let outcome = synced_resolver(&tree).get_component_files("Button");
    let file = &outcome.value().source_files[0];

    assert_eq!(file.file_name, "Button.razor.cs");
    assert_eq!(file.file_type, "cs");
    assert_eq!(file.path, "src/BootstrapBlazor/Components/Button/Button.razor.cs");
}

#[test]
fn both_sample_files_are_examples() {
    let tree = ComponentTree::with_layout();
    tree.source("Button", "Button.razor", "<button />")
        .sample("Buttons.razor", "<Button />")
        .sample("Buttons.razor.cs", "partial class Buttons {}");

    let outcome = synced_resolver(&tree).get_component_files("Button");
    let examples: Vec<_> = outcome
        .value()
        .example_files
        .iter()
        .map(|f| (f.file_name.as_str(), f.file_type.as_str()))
        .collect();

    assert_eq!(
        examples,
        vec![("Buttons.razor", "razor"), ("Buttons.razor.cs", "cs")]
    );
}

#[test]
fn only_present_sample_file_is_returned() {
    let tree = ComponentTree::with_layout();
    tree.source("Button", "Button.razor", "<button />")
        .sample("Buttons.razor.cs", "partial class Buttons {}");

    let outcome = synced_resolver(&tree).get_component_files("Button");
    let examples = &outcome.value().example_files;

    assert_eq!(examples.len(), 1);
    assert_eq!(examples[0].file_name, "Buttons.razor.cs");
}

#[test]
fn already_plural_component_keeps_its_name() {
    let tree = ComponentTree::with_layout();
    tree.source("Tabs", "Tabs.razor", "<tabs />")
        .sample("Tabs.razor", "<Tabs />");

    let outcome = synced_resolver(&tree).get_component_files("Tabs");

    assert_eq!(outcome.value().example_files[0].file_name, "Tabs.razor");
}

#[test]
fn missing_component_directory_is_a_warning() {
    let tree = ComponentTree::with_layout();

    let outcome = synced_resolver(&tree).get_component_files("Ghost");

    assert!(!outcome.is_failed());
    assert_eq!(outcome.warnings().len(), 1);
    assert!(outcome.value().source_files.is_empty());
    assert_eq!(outcome.value().component_name, "Ghost");
}

#[test]
fn example_content_is_exact_text() {
    let tree = ComponentTree::with_layout();
    let text = "@page \"/buttons\"\r\n<Button Text=\"Ünïcode\" />\n";
    tree.source("Button", "Button.razor", "<button />")
        .sample("Buttons.razor", text);

    let outcome = synced_resolver(&tree).get_file_content("Button", "Buttons.razor", FileCategory::Example);

    assert!(outcome.is_ok());
    let content = outcome.into_value();
    assert_eq!(content.content, text);
    assert_eq!(content.file_type, "razor");
    assert_eq!(content.component_name, "Button");
}

#[test]
fn example_name_match_is_case_insensitive() {
    let tree = ComponentTree::with_layout();
    tree.sample("Buttons.razor.cs", "partial class Buttons {}");

    let outcome =
        synced_resolver(&tree).get_file_content("Button", "buttons.RAZOR.cs", FileCategory::Example);

    assert_eq!(outcome.value().content, "partial class Buttons {}");
    assert_eq!(outcome.value().file_type, "cs");
}

#[test]
fn unmatched_example_name_yields_empty_content() {
    let tree = ComponentTree::with_layout();
    tree.sample("Buttons.razor", "<Button />")
        .sample("NotAMatch.razor", "<Other />");

    let outcome =
        synced_resolver(&tree).get_file_content("Button", "NotAMatch.razor", FileCategory::Example);

    assert!(!outcome.is_failed());
    assert_eq!(outcome.warnings().len(), 1);
    assert_eq!(outcome.value().content, "");
}

#[test]
fn source_content_is_read_directly() {
    let tree = ComponentTree::with_layout();
    tree.source("Button", "Button.razor.cs", "public partial class Button {}");

    let outcome =
        synced_resolver(&tree).get_file_content("Button", "Button.razor.cs", FileCategory::Source);

    assert_eq!(outcome.value().content, "public partial class Button {}");
    assert_eq!(outcome.value().file_type, "cs");
}

#[test]
fn listed_files_round_trip_to_content() {
    let tree = ComponentTree::with_layout();
    tree.source("Button", "Button.razor", "<button />")
        .source("Button", "Button.razor.cs", "class Button {}")
        .sample("Buttons.razor", "<Button />")
        .sample("Buttons.razor.cs", "partial class Buttons {}");
    let resolver = synced_resolver(&tree);

    let files = resolver.get_component_files("Button").into_value();
    let listed = files
        .source_files
        .iter()
        .map(|f| (f, FileCategory::Source))
        .chain(files.example_files.iter().map(|f| (f, FileCategory::Example)));

    for (descriptor, category) in listed {
        let content = resolver.get_file_content("Button", &descriptor.file_name, category);
        assert!(!content.value().content.is_empty(), "{descriptor:?}");
    }

    fs::remove_file(tree.component_dir("Button").join("Button.razor")).unwrap();
    fs::remove_file(tree.sample_path("Buttons.razor")).unwrap();

    let source = resolver.get_file_content("Button", "Button.razor", FileCategory::Source);
    let example = resolver.get_file_content("Button", "Buttons.razor", FileCategory::Example);
    assert_eq!(source.value().content, "");
    assert_eq!(example.value().content, "");
}

#[rstest]
#[case::parent_component("..", "Button.razor")]
#[case::traversal_file("Button", "../Table/Table.razor")]
#[case::empty_file("Button", "")]
#[case::backslash("Button", "..\\Table.razor")]
fn path_traversal_is_rejected(#[case] component: &str, #[case] file: &str) {
    let tree = ComponentTree::with_layout();
    tree.source("Button", "Button.razor", "<button />")
        .source("Table", "Table.razor", "<table />");

    let outcome = synced_resolver(&tree).get_file_content(component, file, FileCategory::Source);

    assert!(matches!(outcome.error(), Some(Error::InvalidName { .. })));
    assert_eq!(outcome.value().content, "");
}

#[test]
fn oversized_file_is_a_failure_with_empty_content() {
    let tree = ComponentTree::with_layout();
    tree.source("Button", "Button.razor", &"x".repeat(64));
    let handle = RepositoryHandle::new(tree.root());
    handle.mark_synced("abc");
    let layout = LayoutConfig {
        max_file_size: 16,
        ..LayoutConfig::default()
    };

    let outcome = FileResolver::new(handle, layout).get_file_content(
        "Button",
        "Button.razor",
        FileCategory::Source,
    );

    assert!(matches!(
        outcome.error(),
        Some(Error::Fs(compdoc_fs::Error::FileTooLarge { .. }))
    ));
    assert_eq!(outcome.value().content, "");
}

#[test]
fn documentation_bundle_attaches_content() {
    let tree = ComponentTree::with_layout();
    tree.source("Button", "Button.razor", "<button />")
        .sample("Buttons.razor", "<Button />");

    let outcome = synced_resolver(&tree).get_component_documentation("Button");

    assert!(outcome.is_ok());
    let doc = outcome.into_value();
    assert_eq!(doc.source_files[0].content, "<button />");
    assert_eq!(doc.example_files[0].file_name, "Buttons.razor");
    assert_eq!(doc.example_files[0].content, "<Button />");
}

#[test]
fn documentation_without_examples_warns() {
    let tree = ComponentTree::with_layout();
    tree.source("Table", "Table.razor", "<table />");

    let outcome = synced_resolver(&tree).get_component_documentation("Table");

    assert!(!outcome.is_failed());
    assert_eq!(outcome.warnings().len(), 1);
    assert_eq!(outcome.value().source_files.len(), 1);
    assert!(outcome.value().example_files.is_empty());
}

#[test]
fn never_synchronized_mirror_is_reported() {
    let tree = ComponentTree::new();
    let resolver = FileResolver::new(RepositoryHandle::new(tree.root()), LayoutConfig::default());

    let outcome = resolver.list_components();

    assert!(matches!(outcome.error(), Some(Error::NotSynchronized { .. })));
    assert!(outcome.into_value().is_empty());
    assert!(resolver.get_component_files("Button").is_failed());
}

#[test]
fn synchronized_mirror_without_components_is_empty_with_warning() {
    let tree = ComponentTree::new();

    let outcome = synced_resolver(&tree).list_components();

    assert!(!outcome.is_failed());
    assert_eq!(outcome.warnings().len(), 1);
    assert!(outcome.value().is_empty());
}

#[test]
fn existing_tree_is_served_before_first_sync() {
    let tree = ComponentTree::with_layout();
    tree.source("Button", "Button.razor", "<button />");
    let resolver = FileResolver::new(RepositoryHandle::new(tree.root()), LayoutConfig::default());

    assert_eq!(names(&resolver.list_components()), vec!["Button"]);
}

#[test]
fn assembler_delegates_file_content_request() {
    let tree = ComponentTree::with_layout();
    tree.sample("Buttons.razor", "<Button />");
    let assembler = DocumentationAssembler::new(synced_resolver(&tree));

    let request = FileContentRequest {
        component_name: "Button".to_string(),
        file_name: "Buttons.razor".to_string(),
        category: FileCategory::Example,
    };

    assert_eq!(assembler.get_file_content(&request).value().content, "<Button />");
}

//! Component-to-sample naming
//!
//! The plural form is purely syntactic: append `s` unless the name already
//! ends in `s`. Irregular plurals are not handled; a component whose sample
//! file does not follow this rule simply has no examples.

/// Plural used to name a component's sample files.
pub fn plural_name(name: &str) -> String {
    if name.ends_with('s') {
        name.to_string()
    } else {
        format!("{name}s")
    }
}

/// Candidate sample file names, one per configured suffix, in suffix order.
pub fn sample_file_names(component: &str, extensions: &[String]) -> Vec<String> {
    let plural = plural_name(component);
    extensions
        .iter()
        .map(|ext| format!("{plural}.{ext}"))
        .collect()
}

use std::collections::HashMap;
use std::path::Path;
use tokio::fs;
use crate::utils::{OptimizerError, OptimizerResult};

/// Reads a whole file as UTF-8 text
pub async fn read_text(path: impl AsRef<Path>) -> OptimizerResult<String> {
    fs::read_to_string(path.as_ref())
        .await
        .map_err(|e| OptimizerError::io(format!(
            "Failed to read {}: {}", path.as_ref().display(), e
        )))
}

/// Writes `contents` to `path`, creating parent directories as needed
pub async fn write_text(path: impl AsRef<Path>, contents: &str) -> OptimizerResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    fs::write(path, contents)
        .await
        .map_err(|e| OptimizerError::io(format!("Failed to write {}: {}", path.display(), e)))
}

/// Returns the final path component, or the whole input if there is none
pub fn extract_filename(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
}

/// Assigns unique output names, inserting `-1`, `-2`, … before the extension
/// of repeated names.
///
/// `["a.svg", "a.svg", "b"]` becomes `["a.svg", "a-1.svg", "b"]`.
pub fn unique_output_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut used: HashMap<&str, usize> = HashMap::new();

    names.into_iter().map(|name| {
        match used.get_mut(name) {
            Some(count) => {
                *count += 1;
                match name.rfind('.') {
                    Some(dot) if dot > 0 => format!("{}-{}{}", &name[..dot], count, &name[dot..]),
                    _ => format!("{name}-{count}"),
                }
            }
            None => {
                used.insert(name, 0);
                name.to_string()
            }
        }
    }).collect()
}

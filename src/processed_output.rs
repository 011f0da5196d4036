use std::{
    fs,
    path::{Component, Path, PathBuf},
};

/// Location of the mirrored copy of `shader_path` under `output_dir`.
///
/// Root and `.` components are dropped and `..` removes the previous component, so distinct
/// files get distinct copies. A `..` that would climb above `output_dir` is ignored.
pub fn processed_output_path(output_dir: &Path, shader_path: &str) -> PathBuf {
    let mut parts = Vec::new();
    for component in Path::new(shader_path).components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::ParentDir => {
                parts.pop();
            }
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
        }
    }

    let mut path = output_dir.to_path_buf();
    path.extend(parts);
    path
}

/// Writes the expanded shader next to its siblings under `output_dir` for debugging.
/// Failing to do so is not an error, it is only logged.
pub fn write_processed_output(output_dir: &Path, shader_path: &str, text: &str) -> Option<PathBuf> {
    let target_file = processed_output_path(output_dir, shader_path);

    if let Some(parent) = target_file.parent() {
        if let Err(error) = fs::create_dir_all(parent) {
            log::warn!("Failed to create directory {:?}: {}", parent, error);
            return None;
        }
    }

    match fs::write(&target_file, text) {
        Ok(()) => {
            log::info!("Saved processed shader into {:?}", target_file);
            Some(target_file)
        }
        Err(error) => {
            log::warn!("Failed to save processed shader {:?}: {}", target_file, error);
            None
        }
    }
}

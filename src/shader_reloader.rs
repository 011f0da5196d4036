use std::{fs, time::SystemTime};

use crate::{
    config::Config,
    shader_loader::{load_and_preprocess_shader, ShaderSource},
};

#[derive(Debug, PartialEq, Eq)]
pub enum ReloadResult {
    AlreadyUpToDate,
    Reloaded(ShaderSource),
}

/// Re-runs the preprocessor whenever a file of the shader's include graph changes on disk
pub struct ShaderReloader {
    shader_path: String,
    watched_files: Vec<String>,
    // `None` until the first load
    last_write_times: Option<Vec<Option<SystemTime>>>,
}

impl ShaderReloader {
    pub fn new(shader_path: String) -> Self {
        Self {
            watched_files: vec![shader_path.clone()],
            shader_path,
            last_write_times: None,
        }
    }

    pub fn watched_files(&self) -> &[String] {
        &self.watched_files
    }

    pub fn reload_if_needed(&mut self, config: &Config) -> ReloadResult {
        let current_write_times = write_times(&self.watched_files);
        if self.last_write_times.as_ref() == Some(&current_write_times) {
            return ReloadResult::AlreadyUpToDate;
        }

        log::info!("Reloading shader \"{}\"", self.shader_path);
        let loaded = load_and_preprocess_shader(&self.shader_path, config);

        // Holds the root even on failure, plus the file that failed to load
        self.watched_files = loaded.included_files;

        // Taken after loading, so edits made during the load trigger another reload
        self.last_write_times = Some(write_times(&self.watched_files));

        ReloadResult::Reloaded(loaded.source)
    }
}

/// If we can't get a write time, `None` takes its place, so a file appearing or
/// disappearing still counts as a change
fn write_times(files: &[String]) -> Vec<Option<SystemTime>> {
    files
        .iter()
        .map(|file| {
            fs::metadata(file)
                .and_then(|metadata| metadata.modified())
                .ok()
        })
        .collect()
}

use shader_processor::{FileSystemLoader, IncludeResolver};

use crate::{config::Config, processed_output::write_processed_output};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderSource {
    Preprocessed(String),
    /// Preprocessing failed, the default shader should be used instead
    Fallback,
}

impl ShaderSource {
    /// Pass-through fragment shader: samples the bound texture and tints it
    pub const DEFAULT_FRAGMENT: &'static str = "#version 330
in vec2 fragTexCoord;
in vec4 fragColor;
out vec4 finalColor;
uniform sampler2D texture0;
uniform vec4 colDiffuse;
void main()
{
    finalColor = texture(texture0, fragTexCoord) * colDiffuse * fragColor;
}
";

    pub fn text(&self) -> &str {
        match self {
            ShaderSource::Preprocessed(text) => text,
            ShaderSource::Fallback => Self::DEFAULT_FRAGMENT,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ShaderSource::Fallback)
    }
}

pub struct LoadedShader {
    pub source: ShaderSource,
    /// Files that took part in the expansion. After a failure, the files read before it
    /// followed by the one that failed, so a watcher can see the problem get fixed.
    pub included_files: Vec<String>,
}

/// Resolves the includes of a fragment shader, falling back to the default shader on failure
pub fn load_and_preprocess_shader(shader_path: &str, config: &Config) -> LoadedShader {
    let mut resolver = IncludeResolver::with_options(FileSystemLoader, config.resolver_options());

    let result = resolver.preprocess_file(shader_path);
    let mut included_files = resolver.included_files().to_vec();

    let text = match result {
        Ok(text) => text.into_string().ok().or_else(|| {
            log::error!("Shader \"{}\" is not valid UTF-8", shader_path);
            None
        }),
        Err(error) => {
            if !included_files.iter().any(|file| file == error.path()) {
                included_files.push(error.path().to_owned());
            }
            None
        }
    };

    let Some(text) = text else {
        log::warn!(
            "Shader file \"{}\" is not valid, using default shader",
            shader_path
        );
        return LoadedShader {
            source: ShaderSource::Fallback,
            included_files,
        };
    };

    if config.write_processed_output {
        write_processed_output(&config.processed_output_dir, shader_path, &text);
    }

    LoadedShader {
        source: ShaderSource::Preprocessed(text),
        included_files,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        env, fs,
        path::{Path, PathBuf},
    };

    fn test_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("shader_loader_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn forward_slashes(path: &Path) -> String {
        path.to_string_lossy().replace('\\', "/")
    }

    #[test]
    fn preprocesses_and_mirrors() {
        let dir = test_dir("mirror");
        fs::write(dir.join("main.glsl"), "#include \"lib.glsl\"\nvoid main() {}").unwrap();
        fs::write(dir.join("lib.glsl"), "float lib;").unwrap();
        let config = Config {
            processed_output_dir: dir.join("processed"),
            ..Default::default()
        };
        let shader_path = forward_slashes(&dir.join("main.glsl"));

        let loaded = load_and_preprocess_shader(&shader_path, &config);

        assert!(!loaded.source.is_fallback());
        assert!(loaded.source.text().contains("float lib;"));
        assert_eq!(loaded.included_files.len(), 2);

        let mirror = crate::processed_output::processed_output_path(
            &config.processed_output_dir,
            &shader_path,
        );
        assert_eq!(fs::read_to_string(mirror).unwrap(), loaded.source.text());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn failure_falls_back_to_default_shader() {
        let dir = test_dir("fallback");
        fs::write(dir.join("broken.glsl"), "#include missing_quotes.glsl").unwrap();
        let config = Config {
            processed_output_dir: dir.join("processed"),
            ..Default::default()
        };

        let shader_path = forward_slashes(&dir.join("broken.glsl"));

        let loaded = load_and_preprocess_shader(&shader_path, &config);

        assert_eq!(loaded.source, ShaderSource::Fallback);
        assert_eq!(loaded.source.text(), ShaderSource::DEFAULT_FRAGMENT);
        assert_eq!(loaded.included_files, vec![shader_path]);
        assert!(!config.processed_output_dir.exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_include_is_reported_as_included() {
        let dir = test_dir("missing_include");
        fs::write(dir.join("main.glsl"), "#include \"new.glsl\"").unwrap();
        let config = Config {
            write_processed_output: false,
            ..Default::default()
        };
        let shader_path = forward_slashes(&dir.join("main.glsl"));

        let loaded = load_and_preprocess_shader(&shader_path, &config);

        assert!(loaded.source.is_fallback());
        assert_eq!(
            loaded.included_files,
            vec![shader_path, forward_slashes(&dir.join("new.glsl"))]
        );
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn invalid_utf8_falls_back_to_default_shader() {
        let dir = test_dir("invalid_utf8");
        fs::write(dir.join("main.glsl"), b"float x; // caf\xff\n").unwrap();
        let config = Config {
            processed_output_dir: dir.join("processed"),
            ..Default::default()
        };
        let shader_path = forward_slashes(&dir.join("main.glsl"));

        let loaded = load_and_preprocess_shader(&shader_path, &config);

        assert_eq!(loaded.source, ShaderSource::Fallback);
        assert_eq!(loaded.included_files, vec![shader_path]);
        assert!(!config.processed_output_dir.exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn mirror_can_be_disabled() {
        let dir = test_dir("no_mirror");
        fs::write(dir.join("main.glsl"), "void main() {}").unwrap();
        let config = Config {
            processed_output_dir: dir.join("processed"),
            write_processed_output: false,
            ..Default::default()
        };

        let loaded = load_and_preprocess_shader(&forward_slashes(&dir.join("main.glsl")), &config);

        assert!(!loaded.source.is_fallback());
        assert!(!config.processed_output_dir.exists());
        let _ = fs::remove_dir_all(&dir);
    }
}

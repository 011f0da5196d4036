use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use anyhow::{anyhow, bail, Context};
use clap::Parser;

use config::Config;
use shader_loader::{load_and_preprocess_shader, ShaderSource};
use shader_reloader::{ReloadResult, ShaderReloader};

mod config;
mod processed_output;
mod shader_loader;
mod shader_reloader;

#[derive(Parser)]
#[command(name = "autostereogram")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Resolves #include directives of the autostereogram shaders", long_about = None)]
struct Cli {
    /// Fragment shader to preprocess, forward slash separated
    shader: String,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the expanded shader here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep running and re-emit the shader whenever one of its files changes
    #[arg(short, long)]
    watch: bool,

    /// Log everything down to debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let log_level = if cli.verbose {
        log::Level::Debug
    } else {
        config.log_level()?
    };
    simple_logger::init_with_level(log_level)
        .map_err(|error| anyhow!("Failed to initialize logger: {error}"))?;

    if cli.watch {
        watch_shader(&cli, &config)
    } else {
        let loaded = load_and_preprocess_shader(&cli.shader, &config);
        if loaded.source.is_fallback() {
            bail!("Failed to preprocess \"{}\"", cli.shader);
        }
        emit(&loaded.source, cli.output.as_deref())
    }
}

fn watch_shader(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let mut reloader = ShaderReloader::new(cli.shader.clone());
    let interval = Duration::from_millis(config.watch_interval_ms);

    loop {
        if let ReloadResult::Reloaded(source) = reloader.reload_if_needed(config) {
            // The default shader is emitted too, like the renderer would switch to it
            emit(&source, cli.output.as_deref())?;
            log::info!("Watching {} files", reloader.watched_files().len());
        }
        thread::sleep(interval);
    }
}

fn emit(source: &ShaderSource, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => fs::write(path, source.text())
            .with_context(|| format!("Failed to write {:?}", path)),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(source.text().as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub output: Option<OutputFormat>,
    #[serde(default)]
    pub soft_break: Option<SoftBreak>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Html,
    Json,
    Tree,
}

/// How a line ending inside inline content is written to HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SoftBreak {
    #[default]
    Newline,
    Space,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn output(mut self, output: OutputFormat) -> Self {
        self.config.output = Some(output);
        self
    }

    pub fn soft_break(mut self, soft_break: SoftBreak) -> Self {
        self.config.soft_break = Some(soft_break);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

const CANDIDATE_NAMES: &[&str] = &[".emphasize.toml", "emphasize.toml"];

fn parse_config_str(s: &str, path: &Path) -> io::Result<Config> {
    toml::from_str::<Config>(s).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid config {}: {e}", path.display()),
        )
    })
}

fn read_config(path: &Path) -> io::Result<Config> {
    let s = fs::read_to_string(path)?;
    parse_config_str(&s, path)
}

/// Directories that may hold a user-level `emphasize/config.toml`, most
/// specific first.
fn user_config_dirs() -> Vec<PathBuf> {
    let xdg = env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
    let home = env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"));
    xdg.into_iter().chain(home).collect()
}

/// Existing config files in lookup order: project files from `start_dir`
/// upwards, then user-level files.
fn discover<'a>(
    start_dir: &'a Path,
    user_dirs: &'a [PathBuf],
) -> impl Iterator<Item = PathBuf> + 'a {
    let project = start_dir
        .ancestors()
        .flat_map(|dir| CANDIDATE_NAMES.iter().map(move |name| dir.join(name)));
    let user = user_dirs
        .iter()
        .map(|dir| dir.join("emphasize").join("config.toml"));
    project.chain(user).filter(|path| path.is_file())
}

fn load_discovered(start_dir: &Path, user_dirs: &[PathBuf]) -> (Config, Option<PathBuf>) {
    for path in discover(start_dir, user_dirs) {
        match read_config(&path) {
            Ok(cfg) => return (cfg, Some(path)),
            Err(e) => log::warn!("Ignoring {}: {e}", path.display()),
        }
    }
    (Config::default(), None)
}

/// Loads configuration. An explicit path must be readable and valid. Without
/// one, the first valid file wins among `.emphasize.toml` and
/// `emphasize.toml` in `start_dir` and its ancestors, then
/// `$XDG_CONFIG_HOME/emphasize/config.toml` and
/// `~/.config/emphasize/config.toml`. Invalid discovered files are skipped
/// with a warning.
pub fn load(explicit: Option<&Path>, start_dir: &Path) -> io::Result<(Config, Option<PathBuf>)> {
    if let Some(path) = explicit {
        let cfg = read_config(path)?;
        return Ok((cfg, Some(path.to_path_buf())));
    }
    Ok(load_discovered(start_dir, &user_config_dirs()))
}

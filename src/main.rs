//! lugat - terminal bilingual dictionary lookup
//!
//! Type a prefix to get matching headwords, pick one to read its articles, follow
//! cross-references between entries.

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use lugat::config::{Config, ConfigOverrides};
use lugat::store::load_dictionary;
use lugat::ui::{ColorTheme, TerminalUI, ThemeName};
use lugat::Application;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn cli() -> Command {
    Command::new("lugat")
        .version(lugat::VERSION)
        .about("Incremental-search bilingual dictionary for the terminal")
        .long_about(
            "lugat looks up headwords by prefix as you type and shows their articles with \
             styled abbreviations, sense breaks and followable cross-references.",
        )
        .arg(
            Arg::new("dictionary")
                .help("Dictionary dump (JSON, optionally gzip/bzip2/xz/zstd compressed)")
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("PATH")
                .help("Configuration file (default: <config dir>/lugat/config.toml)"),
        )
        .arg(
            Arg::new("theme")
                .long("theme")
                .value_name("NAME")
                .value_parser(["default", "monochrome", "high_contrast"])
                .help("Color theme"),
        )
        .arg(
            Arg::new("styled-dictionary")
                .long("styled-dictionary")
                .value_name("DICT")
                .help("Dictionary id whose entries get abbreviation styling"),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("PATH")
                .help("Write log output to this file instead of stderr"),
        )
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        // The UI owns the terminal; stderr logging only when explicitly requested.
        None => env_logger::init(),
    }
    Ok(())
}

fn overrides(matches: &ArgMatches) -> Result<ConfigOverrides> {
    let theme = matches
        .get_one::<String>("theme")
        .map(|name| name.parse::<ThemeName>())
        .transpose()
        .map_err(anyhow::Error::msg)?;

    Ok(ConfigOverrides {
        dictionary: matches.get_one::<String>("dictionary").map(PathBuf::from),
        styled_dictionary: matches.get_one::<String>("styled-dictionary").cloned(),
        theme,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    init_logging(matches.get_one::<String>("log-file").map(Path::new))?;

    let config_path = matches.get_one::<String>("config").map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?.apply_overrides(overrides(&matches)?);

    let Some(dictionary) = config.dictionary.clone() else {
        anyhow::bail!(
            "no dictionary given: pass a path or set `dictionary` in {}",
            Config::default_path()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "the config file".to_string())
        );
    };

    let store = load_dictionary(&dictionary).await?;
    let source_name = dictionary
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| dictionary.display().to_string());

    let ui_renderer = Box::new(TerminalUI::with_theme(ColorTheme::from_name(config.theme))?);
    let mut app = Application::new(Arc::new(store), ui_renderer, &config, source_name);

    app.run().await?;

    Ok(())
}

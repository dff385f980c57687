use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

use crate::settings::Settings;

/// Everything one render run needs. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct Config {
    /// File or directory to render.
    pub input: PathBuf,
    /// Explicit output file. When unset the output goes to `output_dir`.
    pub output_path: Option<PathBuf>,
    /// Where `<name><suffix>` is written; the working directory for the CLI.
    pub output_dir: PathBuf,
    pub ignore_file: Option<PathBuf>,
    pub settings: Settings,
    pub verbosity: u8,
}

impl Config {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_path: None,
            output_dir: output_dir.into(),
            ignore_file: None,
            settings: Settings::default(),
            verbosity: 0,
        }
    }
}

pub fn command() -> Command {
    Command::new("src2html")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Renders a source file or directory into one syntax-highlighted HTML listing")
        .arg(
            Arg::new("input")
                .value_name("PATH")
                .help("File or directory to render")
                .required(true)
                .num_args(1),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Sets the output .html file path (default: ./<name><suffix>)")
                .num_args(1),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Reads settings from a TOML file")
                .num_args(1),
        )
        .arg(
            Arg::new("ext")
                .short('e')
                .long("ext")
                .value_name("EXT")
                .help("Extensions to include when scanning a directory (replaces the default list)")
                .num_args(1..)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("suffix")
                .short('s')
                .long("suffix")
                .value_name("SUFFIX")
                .help("Suffix appended to the input name to form the output file name")
                .allow_hyphen_values(true)
                .num_args(1),
        )
        .arg(
            Arg::new("templates")
                .short('t')
                .long("templates")
                .value_name("DIR")
                .help("Directory with replacement document.html, section.html and toc.html")
                .num_args(1),
        )
        .arg(
            Arg::new("ignore")
                .short('i')
                .long("ignore")
                .value_name("FILE")
                .help("Sets a gitignore-style file of paths to skip while scanning")
                .num_args(1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increases log output (-v, -vv, -vvv)")
                .action(ArgAction::Count),
        )
}

/// Parses the process arguments. Exits with a usage message on bad input.
pub fn parse_args() -> Result<Config> {
    let matches = command().get_matches();
    config_from_matches(&matches)
}

pub fn config_from_matches(matches: &ArgMatches) -> Result<Config> {
    let output_dir = std::env::current_dir()?;

    let input = matches
        .get_one::<String>("input")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow::anyhow!("Please provide an input file or directory path"))?;

    let mut settings = match matches.get_one::<String>("config") {
        Some(path) => Settings::from_file(&PathBuf::from(path))?,
        None => Settings::default(),
    };

    if let Some(exts) = matches.get_many::<String>("ext") {
        settings.extensions = exts.cloned().collect();
    }
    if let Some(suffix) = matches.get_one::<String>("suffix") {
        settings.output_suffix = suffix.clone();
    }
    if let Some(dir) = matches.get_one::<String>("templates") {
        settings.template_dir = Some(PathBuf::from(dir));
    }

    Ok(Config {
        input,
        output_path: matches.get_one::<String>("output").map(PathBuf::from),
        output_dir,
        ignore_file: matches.get_one::<String>("ignore").map(PathBuf::from),
        settings,
        verbosity: matches.get_count("verbose"),
    })
}

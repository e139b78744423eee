//! Command line interface for glyphloop
//!
//! Handles parsing command line arguments and provides
//! validation for user inputs. Many CLI options are documented with
//! examples to help users understand the expected format.

use crate::core::config_file::ConfigFile;
use crate::core::settings::Settings;
use crate::data::is_ufo_directory;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;

/// glyphloop CLI arguments
///
/// Examples:
///   glyphloop outline --source MyFont.ufo a         # Path commands of glyph "a"
///   glyphloop outline --source glyphs.json a --json # Same, as JSON
///   glyphloop text --source MyFont.ufo "Hi there"   # SVG path per glyph
///   glyphloop animate --drawables 3 --time 2000     # Drive three drawables for 2s
///   glyphloop animate --source MyFont.ufo --glyph a # Tessellate "a" every frame
///   glyphloop convert MyFont.ufo glyphs.json        # UFO to JSON glyph set
///   glyphloop --new-config                          # Create ~/.config/glyphloop
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "glyphloop",
    version,
    about = "Glyph outlines and a background animation loop",
    long_about = "glyphloop converts TrueType-style glyph contours into path commands, lays out text as glyph paths, and drives redraw loops from a background animation thread."
)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Option<Command>,

    /// Initialize user configuration directory with settings
    ///
    /// This creates the ~/.config/glyphloop directory with:
    /// - settings.json: log level, file logging and animation defaults
    /// - logs/: where log files go when file logging is enabled
    #[clap(
        long = "new-config",
        help = "Initialize user config directory with settings",
        long_help = "Initialize the ~/.config/glyphloop directory with a settings.json file and a logs directory. Settings in that file apply to every run unless overridden on the command line."
    )]
    pub new_config: bool,

    /// Log level or filter directive
    #[clap(
        long = "log-level",
        global = true,
        help = "Log level (error, warn, info, debug, trace) or a filter directive",
        long_help = "Log level for glyphloop output, or a full tracing filter directive such as 'glyphloop::animation=debug'. Overrides the config file. The RUST_LOG environment variable overrides both."
    )]
    pub log_level: Option<String>,

    /// Also write logs to ~/.config/glyphloop/logs/
    #[clap(
        long = "log-file",
        global = true,
        help = "Also write logs to ~/.config/glyphloop/logs/"
    )]
    pub log_file: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the path commands of one glyph
    Outline(OutlineArgs),
    /// Lay out text and print one SVG path per glyph
    Text(TextArgs),
    /// Run the animation loop for a while and report the frame rate
    Animate(AnimateArgs),
    /// Convert a glyph set between UFO and JSON
    Convert(ConvertArgs),
    /// Play a stream on the null media backend
    Media(MediaArgs),
}

#[derive(Args, Debug, Clone)]
pub struct OutlineArgs {
    /// Font source (UFO directory or JSON glyph set)
    #[clap(long, short)]
    pub source: PathBuf,

    /// Glyph name, or a single character to look up in the character map
    pub glyph: String,

    /// Print JSON instead of SVG path notation
    #[clap(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct TextArgs {
    /// Font source (UFO directory or JSON glyph set)
    #[clap(long, short)]
    pub source: PathBuf,

    /// Pixel size
    #[clap(long, default_value_t = 100.0)]
    pub size: f64,

    pub text: String,
}

#[derive(Args, Debug, Clone)]
pub struct AnimateArgs {
    /// Number of counting drawables to register
    #[clap(long, default_value_t = 1)]
    pub drawables: usize,

    /// Run time per loop in milliseconds
    #[clap(long, default_value_t = 1000)]
    pub time: u64,

    /// Number of pause/resume cycles
    #[clap(long, default_value_t = 1)]
    pub loops: u32,

    /// Skip the per-frame yield
    #[clap(long)]
    pub fast: bool,

    /// Hand exclusive context to the drawables while animating
    #[clap(long)]
    pub exclusive: bool,

    /// Frames between FPS reports
    #[clap(long = "fps-frames")]
    pub fps_frames: Option<u32>,

    /// Font source for a tessellating drawable
    #[clap(long, short, requires = "glyph")]
    pub source: Option<PathBuf>,

    /// Glyph to tessellate every frame
    #[clap(long, short, requires = "source")]
    pub glyph: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Source glyph set (UFO directory or .json)
    pub input: PathBuf,

    /// Destination; a .json extension writes JSON, anything else a UFO
    pub output: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct MediaArgs {
    /// Stream URL
    pub url: String,

    /// Play time in milliseconds
    #[clap(long, default_value_t = 100)]
    pub time: u64,

    /// Seek here before playing
    #[clap(long)]
    pub seek: Option<i64>,
}

impl CliArgs {
    /// Validate the CLI arguments after parsing
    ///
    /// This ensures that all paths exist and are valid before the application starts,
    /// providing clear error messages for common mistakes.
    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Some(Command::Outline(args)) => validate_font_source(&args.source),
            Some(Command::Text(args)) => {
                if !(args.size.is_finite() && args.size > 0.0) {
                    return Err(format!("Invalid pixel size: {}", args.size));
                }
                validate_font_source(&args.source)
            }
            Some(Command::Animate(args)) => match &args.source {
                Some(source) => validate_font_source(source),
                None => Ok(()),
            },
            Some(Command::Convert(args)) => validate_font_source(&args.input),
            Some(Command::Media(_)) | None => Ok(()),
        }
    }

    /// Resolve runtime settings
    ///
    /// Priority order:
    /// 1. CLI arguments (--log-level, --log-file, animate flags)
    /// 2. Config file setting (~/.config/glyphloop/settings.json)
    /// 3. Built-in defaults
    pub fn resolve_settings(&self, config: Option<&ConfigFile>) -> Settings {
        let mut settings = Settings::from_config(config);

        if let Some(level) = &self.log_level {
            debug!("Using log level from CLI: {}", level);
            settings.log_level = level.clone();
        }
        if self.log_file {
            settings.log_to_file = true;
        }
        if let Some(Command::Animate(args)) = &self.command {
            if args.fast {
                settings.run_as_fast_as_possible = true;
            }
            if let Some(frames) = args.fps_frames {
                settings.update_fps_frames = frames;
            }
        }
        settings
    }

    /// Settings from the CLI and the user config file
    pub fn get_settings(&self) -> Settings {
        self.resolve_settings(ConfigFile::load().as_ref())
    }
}

/// A font source must be a UFO directory or a JSON glyph set
pub fn validate_font_source(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!(
            "Font source does not exist: {}\nMake sure the path is correct and the file exists.",
            path.display()
        ));
    }

    if path.is_dir() {
        if !is_ufo_directory(path) {
            return Err(format!(
                "Not a valid UFO directory: missing metainfo.plist in {}\nMake sure this is a valid UFO directory.",
                path.display()
            ));
        }
        Ok(())
    } else if path.is_file() {
        match path.extension() {
            Some(extension) if extension == "json" => Ok(()),
            Some(_) => Err(format!(
                "Unsupported file type: {}\nOnly .json glyph sets are supported for non-directory sources.",
                path.display()
            )),
            None => Err(format!(
                "File has no extension: {}\nExpected a .json glyph set.",
                path.display()
            )),
        }
    } else {
        Err(format!(
            "Path is neither a file nor a directory: {}\nPath must be either a UFO directory or a .json file.",
            path.display()
        ))
    }
}

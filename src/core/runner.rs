//! Application runner logic
//!
//! Dispatches the CLI subcommands. Commands that print take a writer so they
//! can run against a buffer as well as stdout.

use crate::animation::{Animator, Drawable, DrawableRef};
use crate::core::cli::{
    AnimateArgs, CliArgs, Command, ConvertArgs, MediaArgs, OutlineArgs, TextArgs,
};
use crate::core::config_file::ConfigFile;
use crate::core::settings::Settings;
use crate::core::toolkit;
use crate::data::save_ufo_to_path;
use crate::font_source::{Glyph, GlyphSet};
use crate::geometry::{build_path, layout_text};
use crate::media::{MediaPlayer, NullBackend};
use crate::rendering::{FrameCounter, OutlineFill};
use anyhow::{anyhow, Context, Result};
use clap::CommandFactory;
use kurbo::Affine;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::info;

/// Create and run the application with the given CLI arguments.
/// Handles special CLI flags and delegates to the subcommand runners.
pub fn run_app(cli_args: CliArgs) -> Result<()> {
    // Handle --new-config flag specially
    if cli_args.new_config {
        return ConfigFile::initialize_config_directory()
            .context("Failed to initialize config directory");
    }

    cli_args.validate().map_err(|e| anyhow!(e))?;

    let Some(command) = &cli_args.command else {
        CliArgs::command().print_help()?;
        return Ok(());
    };

    let settings = cli_args.get_settings();
    toolkit::init_singleton(&settings);
    let result = run_command(command, &settings, &mut io::stdout().lock());
    toolkit::shutdown();
    result
}

pub fn run_command(command: &Command, settings: &Settings, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Outline(args) => run_outline(args, out),
        Command::Text(args) => run_text(args, out),
        Command::Animate(args) => run_animate(args, settings, out),
        Command::Convert(args) => run_convert(args, out),
        Command::Media(args) => run_media(args, out),
    }
}

fn load_source(path: &Path) -> Result<GlyphSet> {
    GlyphSet::load(path).with_context(|| format!("Failed to load font source {}", path.display()))
}

fn find_glyph<'a>(set: &'a GlyphSet, query: &str, source: &Path) -> Result<&'a Glyph> {
    set.find(query)
        .ok_or_else(|| anyhow!("Glyph '{}' not found in {}", query, source.display()))
}

pub fn run_outline(args: &OutlineArgs, out: &mut impl Write) -> Result<()> {
    let set = load_source(&args.source)?;
    let glyph = find_glyph(&set, &args.glyph, &args.source)?;
    let commands = build_path(glyph);

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &commands)?;
        writeln!(out)?;
    } else {
        for command in &commands {
            writeln!(out, "{command}")?;
        }
    }
    Ok(())
}

/// One SVG path per rendered glyph, in a y-down space with the first
/// baseline one ascent below the top
pub fn run_text(args: &TextArgs, out: &mut impl Write) -> Result<()> {
    let set = load_source(&args.source)?;
    let ascent = set.metrics().ascent(args.size);
    let transform = Affine::translate((0.0, ascent)) * Affine::FLIP_Y;

    for path in layout_text(&set, &args.text, args.size, transform) {
        writeln!(out, "{}", path.to_svg())?;
    }
    Ok(())
}

pub fn run_animate(args: &AnimateArgs, settings: &Settings, out: &mut impl Write) -> Result<()> {
    let animator = Animator::new();
    animator.set_run_as_fast_as_possible(settings.run_as_fast_as_possible);
    animator.set_update_fps_frames(settings.update_fps_frames);
    animator.set_exclusive_context(args.exclusive);

    let counters: Vec<Arc<FrameCounter>> = (0..args.drawables)
        .map(|i| Arc::new(FrameCounter::new(format!("counter-{i}"))))
        .collect();
    for counter in &counters {
        animator.add(Arc::clone(counter) as DrawableRef);
    }

    let fill = match (&args.source, &args.glyph) {
        (Some(source), Some(name)) => {
            let set = load_source(source)?;
            let fill = Arc::new(OutlineFill::new(find_glyph(&set, name, source)?));
            animator.add(Arc::clone(&fill) as DrawableRef);
            Some(fill)
        }
        _ => None,
    };

    animator.start()?;
    let run_time = Duration::from_millis(args.time);
    for cycle in 0..args.loops {
        thread::sleep(run_time);
        if cycle + 1 < args.loops {
            animator.pause();
            info!("Animation cycle {} done, {} frames", cycle + 1, animator.fps().total_frames);
            animator.resume();
        }
    }
    animator.stop();

    let fps = animator.fps();
    writeln!(
        out,
        "{} frames in {:.2?} ({:.1} fps)",
        fps.total_frames, fps.total_duration, fps.total_fps
    )?;
    for counter in &counters {
        writeln!(out, "{}: {} frames", counter.name(), counter.frames())?;
    }
    if let Some(fill) = fill {
        writeln!(
            out,
            "{}: {} frames, {} triangles",
            fill.name(),
            fill.frames(),
            fill.triangle_count()
        )?;
    }
    Ok(())
}

pub fn run_convert(args: &ConvertArgs, out: &mut impl Write) -> Result<()> {
    let set = load_source(&args.input)?;
    let to_json = args.output.extension().is_some_and(|ext| ext == "json");
    if to_json {
        fs::write(&args.output, set.to_json()?)?;
    } else {
        save_ufo_to_path(&set.to_norad_font(), &args.output)?;
    }
    writeln!(
        out,
        "Wrote {} glyphs to {}",
        set.len(),
        args.output.display()
    )?;
    Ok(())
}

pub fn run_media(args: &MediaArgs, out: &mut impl Write) -> Result<()> {
    let mut player = MediaPlayer::new(NullBackend::new());
    player.set_stream_str(&args.url)?;
    if let Some(position) = args.seek {
        player.seek(position);
    }
    player.start();
    thread::sleep(Duration::from_millis(args.time));
    let frame = player.next_frame();
    let position = player.current_position();
    let state = player.pause();

    let info = player.stream_info();
    writeln!(
        out,
        "{}: {}x{} @ {} fps, {} ms",
        args.url, info.width, info.height, info.fps, info.duration_ms
    )?;
    match frame {
        Some(frame) => writeln!(out, "frame {} at {} ms, {}", frame.index, position, state)?,
        None => writeln!(out, "no frame at {} ms, {}", position, state)?,
    }
    Ok(())
}

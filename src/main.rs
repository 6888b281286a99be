//! `waveedit` command-line front end.
//!
//! ```bash
//! waveedit info take1.wav
//! waveedit edit take1.wav out.wav select:0.5-1.0 cut paste:2.0 fade-in:1 normalize
//! waveedit edit take1.wav out.wav eq:3,0,-2 lowpass:8000
//! waveedit save-project take1.wav session.json --select 1.0-2.5 --zoom 70
//! waveedit load-project session.json restored.wav
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};

use waveedit::audio::analysis::{calculate_levels, detect_silence, to_db};
use waveedit::timefmt::{format_time, format_time_simple};
use waveedit::{EditSession, EditorConfig, Effect};

const RENDER_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Parser)]
#[command(
    name = "waveedit",
    about = "Edit WAV audio from the command line",
    version
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Editor settings (TOML). Missing file means defaults.
    #[arg(long, global = true, default_value = "waveedit.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show format, duration, peak level and silent regions of a WAV file
    Info {
        input: PathBuf,

        /// Print the per-segment level envelope
        #[arg(long)]
        levels: bool,
    },

    /// Apply a sequence of operations and write the result as WAV
    ///
    /// Operations run in order: select:A-B, clear, cut, copy, trim,
    /// paste:T, fade-in[:S], fade-out[:S], amplify:G, normalize, reverse,
    /// eq:BASS,MID,TREBLE, lowpass:HZ, highpass:HZ, seek:T, zoom:N.
    Edit {
        input: PathBuf,
        output: PathBuf,

        #[arg(required = true)]
        ops: Vec<String>,
    },

    /// Load a WAV file and store it as a project
    SaveProject {
        input: PathBuf,
        output: PathBuf,

        /// Selection to store, as START-END in seconds
        #[arg(long)]
        select: Option<String>,

        #[arg(long)]
        zoom: Option<u8>,

        /// Playhead position in seconds
        #[arg(long)]
        at: Option<f64>,
    },

    /// Restore a project and export its audio as WAV
    LoadProject { input: PathBuf, output: PathBuf },
}

/// One step of an `edit` run.
#[derive(Debug, Clone, PartialEq)]
enum Op {
    Select(f64, f64),
    Clear,
    Cut,
    Copy,
    Trim,
    Paste(f64),
    FadeIn(Option<f64>),
    FadeOut(Option<f64>),
    Seek(f64),
    Zoom(u8),
    Effect(Effect),
}

impl FromStr for Op {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };
        let need = || arg.ok_or_else(|| anyhow!("operation '{}' needs an argument", name));

        let op = match name {
            "select" => {
                let (start, end) = parse_range(need()?)?;
                Op::Select(start, end)
            }
            "clear" => Op::Clear,
            "cut" => Op::Cut,
            "copy" => Op::Copy,
            "trim" => Op::Trim,
            "paste" => Op::Paste(parse_num(need()?)?),
            "fade-in" => Op::FadeIn(arg.map(parse_num::<f64>).transpose()?),
            "fade-out" => Op::FadeOut(arg.map(parse_num::<f64>).transpose()?),
            "seek" => Op::Seek(parse_num(need()?)?),
            "zoom" => Op::Zoom(parse_num(need()?)?),
            "amplify" => Op::Effect(Effect::Amplify {
                gain: parse_num(need()?)?,
            }),
            "normalize" => Op::Effect(Effect::Normalize),
            "reverse" => Op::Effect(Effect::Reverse),
            "eq" => {
                let bands: Vec<f64> = need()?
                    .split(',')
                    .map(parse_num::<f64>)
                    .collect::<Result<_>>()?;
                let &[bass_db, mid_db, treble_db] = bands.as_slice() else {
                    bail!("eq takes three gains: eq:BASS,MID,TREBLE");
                };
                Op::Effect(Effect::Equalize {
                    bass_db,
                    mid_db,
                    treble_db,
                })
            }
            "lowpass" => Op::Effect(Effect::LowPass {
                cutoff_hz: parse_num(need()?)?,
            }),
            "highpass" => Op::Effect(Effect::HighPass {
                cutoff_hz: parse_num(need()?)?,
            }),
            other => bail!("unknown operation '{}'", other),
        };
        Ok(op)
    }
}

fn parse_num<T>(s: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    s.trim()
        .parse()
        .with_context(|| format!("invalid number '{}'", s))
}

/// `START-END`; the separator is the last `-`, so a negative start works.
fn parse_range(s: &str) -> Result<(f64, f64)> {
    let (start, end) = s
        .rsplit_once('-')
        .with_context(|| format!("expected START-END, got '{}'", s))?;
    Ok((parse_num(start)?, parse_num(end)?))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = EditorConfig::load(&cli.config)
        .with_context(|| format!("Failed to read config {}", cli.config.display()))?;

    match cli.command {
        Commands::Info { input, levels } => cmd_info(&config, &input, levels),
        Commands::Edit { input, output, ops } => cmd_edit(config, &input, &output, &ops),
        Commands::SaveProject {
            input,
            output,
            select,
            zoom,
            at,
        } => cmd_save_project(config, &input, &output, select.as_deref(), zoom, at),
        Commands::LoadProject { input, output } => cmd_load_project(config, &input, &output),
    }
}

fn open_session(config: EditorConfig, input: &Path) -> Result<EditSession> {
    let mut session = EditSession::new(config);
    session
        .load_file(input)
        .with_context(|| format!("Failed to load {}", input.display()))?;
    Ok(session)
}

fn cmd_info(config: &EditorConfig, input: &Path, show_levels: bool) -> Result<()> {
    let buffer = waveedit::audio::import_wav(input)
        .with_context(|| format!("Failed to load {}", input.display()))?;

    println!("File:        {}", input.display());
    println!("Channels:    {}", buffer.num_channels());
    println!("Sample rate: {} Hz", buffer.sample_rate());
    println!("Frames:      {}", buffer.len());
    println!("Duration:    {}", format_time(buffer.duration_seconds()));
    println!("Peak:        {:.1} dBFS", to_db(buffer.peak()));

    let silence = detect_silence(
        &buffer,
        config.silence_threshold,
        config.silence_min_seconds,
    );
    if silence.is_empty() {
        println!("Silence:     none");
    } else {
        println!("Silence:");
        for region in &silence {
            println!(
                "  {} - {}",
                format_time(region.start),
                format_time(region.end)
            );
        }
    }

    if show_levels {
        let segments = config.level_segments;
        let seconds_per_segment = buffer.duration_seconds() / segments.max(1) as f64;
        println!("Levels:");
        for (i, level) in calculate_levels(&buffer, segments).iter().enumerate() {
            println!(
                "  {}  {:6.1} dB",
                format_time_simple(i as f64 * seconds_per_segment),
                to_db(*level)
            );
        }
    }
    Ok(())
}

fn cmd_edit(config: EditorConfig, input: &Path, output: &Path, ops: &[String]) -> Result<()> {
    let ops = ops
        .iter()
        .map(|s| s.parse::<Op>())
        .collect::<Result<Vec<_>>>()?;

    let fade_seconds = config.fade_seconds;
    let mut session = open_session(config, input)?;

    for (index, op) in ops.iter().enumerate() {
        tracing::debug!(index, ?op, "Running operation");
        let applied = match *op {
            Op::Select(start, end) => session.create_selection(start, end)?,
            Op::Clear => {
                session.clear_selection();
                true
            }
            Op::Cut => session.cut()?,
            Op::Copy => session.copy()?,
            Op::Trim => session.trim()?,
            Op::Paste(at) => session.paste(at)?,
            Op::FadeIn(seconds) => session.fade_in(seconds.unwrap_or(fade_seconds))?,
            Op::FadeOut(seconds) => session.fade_out(seconds.unwrap_or(fade_seconds))?,
            Op::Seek(at) => {
                session.set_current_time(at);
                true
            }
            Op::Zoom(zoom) => {
                session.set_zoom(zoom);
                true
            }
            Op::Effect(effect) => session.apply_effect(effect)?,
        };
        if !applied {
            tracing::warn!(index, ?op, "Operation had nothing to act on");
        }
        if session.render_pending() {
            session
                .wait_for_render(RENDER_TIMEOUT)
                .with_context(|| format!("Operation {} failed", index + 1))?;
            if session.render_pending() {
                bail!("Operation {} timed out", index + 1);
            }
        }
    }

    session
        .export_to_file(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    if let Some(buffer) = session.buffer() {
        println!(
            "Wrote {} ({})",
            output.display(),
            format_time(buffer.duration_seconds())
        );
    }
    Ok(())
}

fn cmd_save_project(
    config: EditorConfig,
    input: &Path,
    output: &Path,
    select: Option<&str>,
    zoom: Option<u8>,
    at: Option<f64>,
) -> Result<()> {
    let mut session = open_session(config, input)?;
    if let Some(range) = select {
        let (start, end) = parse_range(range)?;
        session.create_selection(start, end)?;
    }
    if let Some(zoom) = zoom {
        session.set_zoom(zoom);
    }
    if let Some(at) = at {
        session.set_current_time(at);
    }

    let bytes = session.save_project()?;
    std::fs::write(output, &bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Saved project {} ({} bytes)", output.display(), bytes.len());
    Ok(())
}

fn cmd_load_project(config: EditorConfig, input: &Path, output: &Path) -> Result<()> {
    let bytes =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let mut session = EditSession::new(config);
    session
        .load_project(&bytes)
        .with_context(|| format!("Failed to load project {}", input.display()))?;

    if let Some(selection) = session.selection() {
        println!(
            "Selection: {} - {}",
            format_time(selection.start),
            format_time(selection.end)
        );
    }
    println!(
        "Zoom: {} ({} px/s), playhead {}",
        session.zoom(),
        session.pixels_per_second(),
        format_time(session.current_time())
    );

    session
        .export_to_file(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote {}", output.display());
    Ok(())
}

//! Replays recorded tracker output through the keyframe mapping layer.
//!
//! Input is JSON lines, one tracked frame per line (`null` for frames the
//! tracker lost); output is JSON lines of per-frame keyframes.

use anyhow::{Context, Result};
use clap::Parser;
use face_keyframes::{assembler::FrameAssembler, config::Config, tracking::FrameInput};
use log::info;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Recorded tracker output (JSON lines); reads stdin when omitted
    #[arg(short, long)]
    input: Option<String>,

    /// Keyframe output (JSON lines); writes stdout when omitted
    #[arg(short, long)]
    output: Option<String>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    let config = match &args.config {
        Some(config_path) => {
            info!("Loading configuration from: {}", config_path);
            Config::from_file(config_path).with_context(|| format!("Failed to load config {config_path}"))?
        }
        None => Config::default(),
    };
    let assembler = FrameAssembler::new(&config)?;

    let reader: Box<dyn Read> = match &args.input {
        Some(path) => {
            info!("Reading tracker output from: {}", path);
            Box::new(File::open(path).with_context(|| format!("Failed to open {path}"))?)
        }
        None => Box::new(io::stdin().lock()),
    };
    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path).with_context(|| format!("Failed to create {path}"))?),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = BufWriter::new(writer);

    let records = serde_json::Deserializer::from_reader(BufReader::new(reader)).into_iter::<Option<FrameInput>>();

    // The first unreadable record ends the stream and fails the run
    let mut failure = None;
    let frames = records.map_while(|record| match record {
        Ok(frame) => Some(frame),
        Err(e) => {
            failure = Some(e);
            None
        }
    });

    let mut emitted = 0usize;
    let mut keyframes = 0usize;
    for output in assembler.stream(frames) {
        serde_json::to_writer(&mut writer, &output)?;
        writer.write_all(b"\n")?;
        emitted += 1;
        keyframes += output.len();
    }
    writer.flush()?;

    if let Some(e) = failure {
        return Err(e).with_context(|| format!("Unreadable record after {emitted} emitted frames"));
    }

    info!("Emitted {} keyframes over {} frames", keyframes, emitted);
    Ok(())
}

//! retrofy CLI. Renders a WAV file into its lo-fi version.

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use retrofy::dsp::CrushMode;
use retrofy::engine::Playback;
use retrofy::playback::PlaybackEngine;
use retrofy::wav::DEFAULT_OUTPUT;
use retrofy::{OfflineEngine, RetroConfig, RetroError, RetroPipeline, Session, Ticket};

#[derive(Parser)]
#[command(name = "retrofy", version, about = "Render audio into a retro, lo-fi WAV")]
struct Cli {
    /// Input WAV file
    input: PathBuf,

    /// Output WAV file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// YAML config file (default: ~/.retrofy/config.yaml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Quantization depth, 1-16
    #[arg(long)]
    bit_depth: Option<u8>,

    /// Sample-and-hold ratio, 0.1-1 (1 = no decimation)
    #[arg(long)]
    frequency_reduction: Option<f32>,

    /// Distortion amount, >= 0
    #[arg(long)]
    distortion: Option<f32>,

    /// Output sample rate in Hz
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Crusher state per channel, or shared across channels
    #[arg(long, value_enum)]
    crush_mode: Option<CrushMode>,

    /// Play the result on the default output device
    #[arg(long)]
    play: bool,

    /// Playback volume, 0-1
    #[arg(long, default_value_t = 1.0, requires = "play")]
    volume: f32,
}

impl Cli {
    fn resolve_config(&self) -> retrofy::Result<RetroConfig> {
        let mut config = match &self.config {
            Some(path) => RetroConfig::from_path(path)?,
            None => RetroConfig::load().unwrap_or_default(),
        };
        if let Some(v) = self.bit_depth {
            config.bit_depth = v;
        }
        if let Some(v) = self.frequency_reduction {
            config.frequency_reduction = v;
        }
        if let Some(v) = self.distortion {
            config.distortion_amount = v;
        }
        if let Some(v) = self.sample_rate {
            config.target_sample_rate = v;
        }
        if let Some(v) = self.crush_mode {
            config.crush_mode = v;
        }
        Ok(config)
    }
}

fn run(cli: &Cli, session: &Session) -> retrofy::Result<()> {
    let config = cli.resolve_config()?;
    let pipeline = RetroPipeline::new(OfflineEngine::new(), config)?;

    let ticket = session.begin();
    let bytes = std::fs::read(&cli.input)?;
    let output = pipeline.process(&bytes, &ticket)?;

    std::fs::write(&cli.output, &output.wav)?;
    log::info!("wrote {}", cli.output.display());

    if cli.play {
        play(&output.buffer, cli.volume, &ticket)?;
    }
    Ok(())
}

/// Play until the buffer has drained or the ticket is superseded.
fn play(buffer: &retrofy::SampleBuffer, volume: f32, ticket: &Ticket) -> retrofy::Result<()> {
    if buffer.is_empty() {
        log::warn!("nothing to play: output is silent");
        return Ok(());
    }
    let mut engine = PlaybackEngine::new()?;
    engine.set_volume(volume)?;
    engine.play(buffer)?;

    let duration = Duration::from_secs_f64(buffer.duration_secs());
    let started = Instant::now();
    while ticket.is_current() {
        if started.elapsed() >= duration && !engine.is_playing() {
            break;
        }
        thread::sleep(Duration::from_millis(50));
    }
    engine.stop()?;
    // Let the device drain its last block.
    thread::sleep(Duration::from_millis(200));
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let session = Session::new();
    {
        let session = session.clone();
        if let Err(e) = ctrlc::set_handler(move || session.cancel()) {
            log::warn!("could not install Ctrl-C handler: {e}");
        }
    }

    match run(&cli, &session) {
        Ok(()) => {}
        Err(RetroError::Superseded) => {
            log::info!("cancelled");
            std::process::exit(130);
        }
        Err(e) => {
            log::error!("failed to process {}: {e}", cli.input.display());
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_defaults_to_full_scale() {
        let cli = Cli::try_parse_from(["retrofy", "in.wav", "--play"]).unwrap();
        assert!(cli.play);
        assert_eq!(cli.volume, 1.0);
    }

    #[test]
    fn volume_is_parsed_with_play() {
        let cli = Cli::try_parse_from(["retrofy", "in.wav", "--play", "--volume", "0.25"]).unwrap();
        assert_eq!(cli.volume, 0.25);
    }

    #[test]
    fn volume_without_play_is_rejected() {
        assert!(Cli::try_parse_from(["retrofy", "in.wav", "--volume", "0.5"]).is_err());
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "bit_depth: 6\ndistortion_amount: 120\n").unwrap();

        let cli = Cli::try_parse_from([
            "retrofy",
            "in.wav",
            "--config",
            path.to_str().unwrap(),
            "--bit-depth",
            "8",
            "--crush-mode",
            "shared",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.bit_depth, 8);
        assert_eq!(config.distortion_amount, 120.0);
        assert_eq!(config.crush_mode, CrushMode::Shared);
    }
}

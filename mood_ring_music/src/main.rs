// Mood Ring Music Generator: CLI entry point.
//
// Builds one arrangement for an hour of the day and writes it as WAV audio
// and a MIDI file. The pipeline: mood (energy, alignment, tempo) -> key +
// melody -> sample library -> audio render -> MIDI export.
//
// Usage:
//   cargo run -p mood_ring_music --bin generate -- [--hour H] [--activity A]
//     [--energy E] [--strategy markov|motif] [--length N] [--duration SECS]
//     [--seed N] [--samples DIR] [--config FILE] [--wav OUT] [--midi OUT]
//
// Without --activity the default daily schedule is used; without --energy the
// diurnal energy curve decides. Log verbosity follows RUST_LOG (default info).

use clap::Parser;
use mood_ring_music::config::GeneratorConfig;
use mood_ring_music::error::Result;
use mood_ring_music::melody::MelodyStrategyKind;
use mood_ring_music::midi::{serialize_arrangement, write_midi};
use mood_ring_music::pitch::pitch_name;
use mood_ring_music::render::ArrangementAudioRenderer;
use mood_ring_music::samples::SampleLibrary;
use mood_ring_music::Arrangement;
use mood_ring_schedule::{Activity, DEFAULT_SCHEDULE, EnergyLevel, HourProfile, energy_for_hour};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "generate")]
#[command(about = "Generate a mood-matched arrangement as WAV and MIDI", long_about = None)]
struct Cli {
    /// Hour of the day, 0-23
    #[arg(long, default_value = "9")]
    hour: usize,

    /// Activity for the hour (work, sleep, free, play, family)
    #[arg(short, long)]
    activity: Option<Activity>,

    /// Energy level override (lowest, low, rising, moderate, high, decreasing)
    #[arg(short, long)]
    energy: Option<EnergyLevel>,

    /// Melody strategy (markov or motif)
    #[arg(long)]
    strategy: Option<MelodyStrategyKind>,

    /// Melody length in notes
    #[arg(short, long)]
    length: Option<usize>,

    /// Requested audio duration in seconds
    #[arg(short, long)]
    duration: Option<f64>,

    /// RNG seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Directory of WAV samples (kick.wav, snare.wav, C4.wav, ...)
    #[arg(long)]
    samples: Option<PathBuf>,

    /// JSON config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output WAV path
    #[arg(long, default_value = "mood.wav")]
    wav: PathBuf,

    /// Output MIDI path
    #[arg(long, default_value = "mood.mid")]
    midi: PathBuf,
}

impl Cli {
    /// The config file (or defaults) with command-line overrides applied.
    fn config(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::load(path)?,
            None => GeneratorConfig::default(),
        };
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(length) = self.length {
            config.melody_length = length;
        }
        if let Some(duration) = self.duration {
            config.duration_seconds = duration;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(dir) = &self.samples {
            config.sample_dir = Some(dir.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.config()?;

    println!("=== Mood Ring Music Generator ===");

    // Mood
    println!("[1/5] Reading the mood...");
    let diurnal = energy_for_hour(cli.hour)?;
    let activity = cli.activity.unwrap_or(DEFAULT_SCHEDULE[cli.hour]);
    let energy = cli.energy.unwrap_or(diurnal);
    let profile = HourProfile::with_energy(cli.hour, activity, energy);
    println!(
        "  Hour {:02}:00, activity {}, energy {} -> {} at {} BPM",
        profile.hour, profile.activity, profile.energy, profile.alignment, profile.bpm
    );

    let mut rng = match config.seed {
        Some(seed) => {
            println!("  Seed: {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };

    // Key + melody
    println!("[2/5] Composing ({} strategy)...", config.strategy);
    let arrangement = Arrangement::from_mood(
        profile.alignment,
        profile.energy,
        profile.bpm,
        config.strategy,
        config.melody_length,
        config.duration_seconds,
        &mut rng,
    )?;
    let notes: Vec<String> = arrangement.melody.iter().map(|&p| pitch_name(p)).collect();
    println!("  Key: {}", arrangement.key);
    println!("  Progression degrees: {:?}", arrangement.progression.degrees);
    println!("  Melody: {}", notes.join(" "));

    // Samples
    println!("[3/5] Loading samples...");
    let renderer = match &config.sample_dir {
        Some(dir) => {
            let library = SampleLibrary::load_dir(dir)?;
            println!("  {} samples from {}", library.len(), dir.display());
            ArrangementAudioRenderer::with_library(config.sample_rate, Arc::new(library))
        }
        None => {
            println!("  No sample directory; synthesizing all layers.");
            ArrangementAudioRenderer::new(config.sample_rate)
        }
    };

    // Audio
    println!("[4/5] Rendering audio to {}...", cli.wav.display());
    let audio = renderer.render_arrangement(&arrangement, &mut rng);
    audio.write_wav(&cli.wav)?;
    println!(
        "  {} samples, {:.2}s at {} Hz",
        audio.len(),
        audio.duration_seconds(),
        audio.sample_rate
    );

    // MIDI
    println!("[5/5] Writing MIDI to {}...", cli.midi.display());
    let smf = serialize_arrangement(&arrangement);
    write_midi(&smf, &cli.midi)?;
    println!("  {} tracks.", smf.tracks.len());

    println!();
    println!("Done.");
    Ok(())
}

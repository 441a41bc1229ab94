//! ACS character utility.
//!
//! Provides four subcommands:
//! - `info`: print the character summary and the animation report
//! - `images`: decode every image and write the sprite sheet cache
//! - `sounds`: extract the embedded sounds into the sound cache
//! - `play`: play an animation through a recording backend
//!
//! # Usage
//!
//! ```bash
//! cargo run --example acs_tool -- info KAIRU.ACS --report kairu.txt
//! cargo run --example acs_tool -- images KAIRU.ACS -o cache/kairu
//! cargo run --example acs_tool -- sounds KAIRU.ACS -o cache/kairu
//! cargo run --example acs_tool -- play KAIRU.ACS "#GREETING" --config player.toml
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use acs_rs::acs_types::file::{Atlas, ImageCache};
use acs_rs::prelude::*;
use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use log::info;

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Command::Info(args) => run_info(args),
		Command::Images(args) => run_images(args),
		Command::Sounds(args) => run_sounds(args),
		Command::Play(args) => run_play(args),
	}
}

#[derive(Parser)]
#[command(name = "acs_tool")]
#[command(author = "acs-rs project")]
#[command(version)]
#[command(about = "Inspect, extract and play ACS characters", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Print the character summary and its animation report
	Info(InfoArgs),
	/// Decode the images into a sprite sheet and its JSON sidecar
	Images(ImagesArgs),
	/// Extract the embedded sounds
	Sounds(SoundsArgs),
	/// Play an animation and print the frames it shows
	Play(PlayArgs),
}

#[derive(Args)]
struct InfoArgs {
	/// Path to the .ACS file
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Locale of the name and description, the system locale by default
	#[arg(short, long, value_name = "LOCALE")]
	locale: Option<String>,

	/// Write the animation report to a file instead of stdout
	#[arg(short, long, value_name = "PATH")]
	report: Option<PathBuf>,
}

#[derive(Args)]
struct ImagesArgs {
	/// Path to the .ACS file
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Cache directory, `<FILE stem>_cache` next to the file by default
	#[arg(short, long, value_name = "DIR")]
	output: Option<PathBuf>,

	/// Override the extra row width derived from the character GUID
	#[arg(long, value_name = "PIXELS")]
	extra_width: Option<usize>,
}

#[derive(Args)]
struct SoundsArgs {
	/// Path to the .ACS file
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Cache directory, `<FILE stem>_cache` next to the file by default
	#[arg(short, long, value_name = "DIR")]
	output: Option<PathBuf>,
}

#[derive(Args)]
struct PlayArgs {
	/// Path to the .ACS file
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Animation name, or `#STATE` for a random animation of a state
	#[arg(value_name = "ANIMATION")]
	animation: String,

	/// Player settings file, overridden by `ACS_PLAYER_*` variables
	#[arg(short, long, value_name = "PATH", default_value = "player.toml")]
	config: PathBuf,

	/// Request an exit after this many milliseconds
	#[arg(short, long, value_name = "MS")]
	exit_after: Option<u64>,

	/// Keep playing idle animations for this many milliseconds afterwards
	#[arg(long, value_name = "MS", default_value_t = 0)]
	linger: u64,
}

fn open(path: &Path) -> Result<AcsFile> {
	AcsFile::open(path).with_context(|| format!("Failed to open {}", path.display()))
}

fn cache_dir(file: &Path, output: Option<PathBuf>) -> PathBuf {
	output.unwrap_or_else(|| {
		let stem = file.file_stem().map_or_else(String::new, |stem| stem.to_string_lossy().into_owned());
		file.with_file_name(format!("{stem}_cache"))
	})
}

fn run_info(args: InfoArgs) -> Result<()> {
	let acs = open(&args.file)?;
	let character = acs.character();

	println!("{}", acs.localized_info(args.locale.as_deref()));
	println!("GUID:       {}", character.guid);
	println!("Size:       {}x{}", character.width, character.height);
	println!("Palette:    {} colors, transparent index {}", character.palette.len(), character.transparency_index());
	println!("Locales:    {}", character.localized.keys().cloned().collect::<Vec<_>>().join(", "));
	println!("Animations: {}", acs.animations().len());
	println!("Images:     {}", acs.image_records()?.len());
	println!("Sounds:     {}", acs.sounds().len());
	if acs.extra_width() > 0 {
		println!("Rows carry {} extra padding columns", acs.extra_width());
	}

	match args.report {
		Some(path) => acs.write_report(&path).with_context(|| format!("Failed to write {}", path.display()))?,
		None => println!("\n{}", acs.report()),
	}
	Ok(())
}

fn run_images(args: ImagesArgs) -> Result<()> {
	let acs = open(&args.file)?;
	let dir = cache_dir(&args.file, args.output);
	let progress = |done: usize, total: usize| {
		if done == total || done % 50 == 0 {
			println!("Decoded {done}/{total} images");
		}
	};

	let metadata = match args.extra_width {
		Some(extra_width) => {
			let images = acs.decode_images_with(extra_width, None, progress)?;
			let atlas = Atlas::build(&images, &acs.character().palette);
			atlas.save(&dir)?;
			atlas.metadata
		}
		None => acs.ensure_image_cache(&dir, None, progress)?,
	};

	let cache = ImageCache::new(&dir);
	println!(
		"{} sprites of at most {}x{} in {}",
		metadata.subimages.len(),
		metadata.max_size[0],
		metadata.max_size[1],
		cache.sheet_path().display()
	);
	Ok(())
}

fn run_sounds(args: SoundsArgs) -> Result<()> {
	let acs = open(&args.file)?;
	let dir = cache_dir(&args.file, args.output);

	let paths = acs.sounds().write_cache(&dir)?;
	for ((index, clip), path) in acs.sounds().iter().enumerate().zip(paths) {
		let Some(path) = path else {
			println!("{index:4}: not written");
			continue;
		};
		match (clip.wav_spec(), clip.duration_ms()) {
			(Some(spec), Some(duration)) => println!(
				"{index:4}: {} ({} Hz, {} channels, {duration} ms)",
				path.display(),
				spec.sample_rate,
				spec.channels
			),
			_ => println!("{index:4}: {} ({} bytes, needs transcoding)", path.display(), clip.len()),
		}
	}
	Ok(())
}

fn run_play(args: PlayArgs) -> Result<()> {
	let acs = open(&args.file)?;
	let config = PlayerConfig::load(&args.config)
		.with_context(|| format!("Failed to load {}", args.config.display()))?;
	info!("Player settings: {config:?}");

	let worker = Worker::new()?;
	let timeline = Timeline::new();
	let controller = AnimController::new(timeline.clone(), AnimationGraph::from_acs(&acs), config, worker.spawner());

	let handle = controller.play_animation(args.animation.as_str(), PlayOptions::default());
	let Some(name) = handle.name().map(str::to_string) else {
		bail!("No animation matches {}", args.animation);
	};

	let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build()?;
	let finished = runtime.block_on(async {
		if let Some(ms) = args.exit_after {
			tokio::time::sleep(Duration::from_millis(ms)).await;
			controller.request_exit();
		}
		let finished = handle.await;
		tokio::time::sleep(Duration::from_millis(args.linger)).await;
		controller.interrupt().await;
		finished
	})?;

	println!("{name} {}", if finished { "played to the end" } else { "was stopped" });
	for (animation, index) in timeline.frames() {
		println!("  {animation} frame {index}");
	}
	Ok(())
}

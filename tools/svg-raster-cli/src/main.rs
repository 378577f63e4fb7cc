use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use fern::colors::{Color, ColoredLevelConfig};
use scanline_raster::{RasterContext, fitted_size};
use std::path::PathBuf;
use std::time::Instant;
use vector_document::{Document, LengthUnit, ParseOptions};

#[derive(Parser)]
#[command(name = "svg-raster")]
#[command(about = "Render an SVG document to a PNG image")]
struct Args {
	/// Document to render
	input: PathBuf,

	/// PNG file to write
	output: PathBuf,

	/// Output width in pixels (follows the document's aspect ratio when omitted)
	#[arg(long, default_value_t = 0)]
	width: usize,

	/// Output height in pixels (follows the document's aspect ratio when omitted)
	#[arg(long, default_value_t = 0)]
	height: usize,

	/// Resolution used to convert physical units
	#[arg(long, default_value_t = 96.)]
	dpi: f64,

	/// Unit that document coordinates are converted to
	#[arg(long, default_value = "px", value_parser = parse_unit)]
	units: LengthUnit,

	/// Log more detail (repeat for more)
	#[arg(short, long, action = ArgAction::Count)]
	verbose: u8,
}

fn parse_unit(text: &str) -> Result<LengthUnit, String> {
	text.parse().map_err(|error| format!("{error}"))
}

fn init_logging(verbosity: u8) -> Result<()> {
	let level = match verbosity {
		0 => log::LevelFilter::Warn,
		1 => log::LevelFilter::Info,
		2 => log::LevelFilter::Debug,
		_ => log::LevelFilter::Trace,
	};
	let colors = ColoredLevelConfig::new().debug(Color::Magenta).info(Color::Green).error(Color::Red);

	fern::Dispatch::new()
		.chain(std::io::stderr())
		.level(level)
		.format(move |out, message, record| {
			out.finish(format_args!(
				"[{}]{} {}",
				// Only the level is colored.
				colors.color(record.level()),
				chrono::Local::now().format("[%H:%M:%S%.3f]"),
				message
			))
		})
		.apply()
		.context("Failed to install the logger")
}

fn main() -> Result<()> {
	let args = Args::parse();
	init_logging(args.verbose)?;

	let bytes = std::fs::read(&args.input).with_context(|| format!("Failed to read {}", args.input.display()))?;
	let options = ParseOptions {
		units: args.units,
		dpi: args.dpi,
		..ParseOptions::default()
	};

	let start = Instant::now();
	let document = Document::parse_bytes(&bytes, &options).with_context(|| format!("Failed to parse {}", args.input.display()))?;
	log::info!(
		"Parsed {} shapes in {:.2?}, intrinsic size {}x{}",
		document.shapes().len(),
		start.elapsed(),
		document.width(),
		document.height()
	);

	let (width, height) = fitted_size(&document, args.width, args.height);
	if width == 0 || height == 0 {
		bail!("{} has no size to render at; pass --width or --height", args.input.display());
	}

	let start = Instant::now();
	let pixels = RasterContext::new().render_to_vec(&document, width, height).context("Failed to rasterize the document")?;
	log::info!("Rasterized {width}x{height} pixels in {:.2?}", start.elapsed());

	let (width, height) = (u32::try_from(width)?, u32::try_from(height)?);
	let image = image::RgbaImage::from_raw(width, height, pixels).context("Rendered pixel buffer does not match the image size")?;
	image.save(&args.output).with_context(|| format!("Failed to write {}", args.output.display()))?;
	log::info!("Wrote {}", args.output.display());

	Ok(())
}

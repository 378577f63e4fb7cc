use criterion::{Criterion, criterion_group, criterion_main};
use scanline_raster::{PixelBufferMut, RasterContext, RasterOptions};
use std::hint::black_box;
use vector_document::{Document, ParseOptions};

const ICON: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64" width="64" height="64">
	<defs>
		<linearGradient id="body" x1="0" y1="0" x2="0" y2="1">
			<stop offset="0" stop-color="#7fb3ff"/>
			<stop offset="1" stop-color="#1d4ed8"/>
		</linearGradient>
		<radialGradient id="shine" cx="0.35" cy="0.3" r="0.6">
			<stop offset="0" stop-color="white" stop-opacity="0.8"/>
			<stop offset="1" stop-color="white" stop-opacity="0"/>
		</radialGradient>
	</defs>
	<rect x="4" y="4" width="56" height="56" rx="12" fill="url(#body)"/>
	<circle cx="32" cy="32" r="22" fill="url(#shine)"/>
	<path d="M20 34 l8 8 l16 -18" fill="none" stroke="white" stroke-width="4"/>
	<path d="M16 48 C 24 40, 40 56, 48 48 S 56 32, 32 28 Z" fill="black" fill-opacity="0.25"/>
	<polygon points="32,8 36,20 48,20 38,28 42,40 32,32 22,40 26,28 16,20 28,20" fill="gold"/>
</svg>"##;

pub fn criterion_benchmark(crit: &mut Criterion) {
	crit.bench_function("parse icon", |bench| bench.iter(|| Document::parse(black_box(ICON), &ParseOptions::default())));

	let Ok(document) = Document::parse(ICON, &ParseOptions::default()) else { return };
	let mut context = RasterContext::new();
	for size in [64, 256, 1024] {
		let mut data = vec![0; size * size * 4];
		let options = RasterOptions {
			scale: size as f64 / 64.,
			..RasterOptions::default()
		};
		crit.bench_function(&format!("rasterize icon {size}px"), |bench| {
			bench.iter(|| context.rasterize(black_box(&document), &options, &mut PixelBufferMut::new(&mut data, size, size)))
		});
	}
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

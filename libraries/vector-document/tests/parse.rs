use glam::DVec2;
use pretty_assertions::assert_eq;
use vector_document::{Color, Document, GradientKind, LengthUnit, Paint, ParseError, ParseOptions, Rect, SpreadMethod};

fn parse(text: &str) -> Document {
	Document::parse(text, &ParseOptions::default()).expect("parse should succeed")
}

fn assert_near(actual: f64, expected: f64) {
	assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
}

#[test]
fn plain_rect() {
	let document = parse(r#"<svg width="10" height="10"><rect x="0" y="0" width="10" height="10" fill="black"/></svg>"#);
	assert_eq!((document.width(), document.height()), (10., 10.));

	let [shape] = document.shapes() else { panic!("expected one shape") };
	assert_eq!(shape.fill(), &Paint::Color(Color::BLACK));
	assert_eq!(shape.paths().len(), 1);
	assert!(shape.paths()[0].is_closed());
	assert_eq!(shape.paths()[0].segment_count(), 4);
	assert_eq!(shape.bounds(), Rect([DVec2::ZERO, DVec2::splat(10.)]));
}

#[test]
fn shapes_keep_document_order_and_ids() {
	let document = parse(
		r##"<?xml version="1.0"?>
		<!-- drawing -->
		<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
			<title>Ignored</title>
			<circle id="first" cx="50" cy="50" r="10" fill="#f00"/>
			<ellipse id="second" cx="50" cy="50" rx="20" ry="5"/>
			<line x1="0" y1="0" x2="10" y2="10" stroke="black"/>
			<polyline points="0,0 10,0 10,10"/>
			<polygon points="0 0 10 0 10 10"/>
			<path d="M 0 0 L 10 0 L 10 10 Z M 20 20 h 5 v 5 z"/>
		</svg>"##,
	);
	let ids: Vec<_> = document.shapes().iter().map(|shape| shape.id()).collect();
	assert_eq!(ids, [Some("first"), Some("second"), None, None, None, None]);

	let circle = &document.shapes()[0];
	assert_eq!(circle.fill(), &Paint::Color(Color::from_rgb8(255, 0, 0)));
	let bounds = circle.bounds();
	assert_near(bounds.min().x, 40.);
	assert_near(bounds.max().y, 60.);

	assert!(!document.shapes()[3].paths()[0].is_closed());
	assert!(document.shapes()[4].paths()[0].is_closed());
	assert_eq!(document.shapes()[5].paths().len(), 2);
}

#[test]
fn view_box_scales_geometry_and_stroke() {
	let document = parse(r#"<svg width="10" height="10" viewBox="0 0 20 20"><rect width="20" height="20" stroke="red" stroke-width="2"/></svg>"#);
	assert_eq!(document.shapes()[0].bounds(), Rect([DVec2::ZERO, DVec2::splat(10.)]));
	assert_eq!(document.shapes()[0].stroke_width(), 1.);
}

#[test]
fn percentages_resolve_against_view_box() {
	let document = parse(r#"<svg viewBox="0 0 200 100"><rect width="50%" height="50%"/></svg>"#);
	assert_eq!((document.width(), document.height()), (200., 100.));
	assert_eq!(document.shapes()[0].bounds(), Rect([DVec2::ZERO, DVec2::new(100., 50.)]));
}

#[test]
fn size_is_inferred_from_content() {
	let document = parse(r#"<svg><rect x="5" y="5" width="25" height="7"/></svg>"#);
	assert_eq!((document.width(), document.height()), (30., 12.));
}

#[test]
fn output_units() {
	let options = ParseOptions {
		units: LengthUnit::In,
		..ParseOptions::default()
	};
	let document = Document::parse(r#"<svg width="2in" height="1in"><rect width="96" height="96"/></svg>"#, &options).unwrap();
	assert_near(document.width(), 2.);
	assert_near(document.height(), 1.);
	assert_near(document.shapes()[0].bounds().max().x, 1.);
}

#[test]
fn fill_opacity_and_group_opacity() {
	let document = parse(r#"<svg width="10" height="10"><g opacity="0.5"><rect width="1" height="1" fill="red" fill-opacity="0.5"/></g></svg>"#);
	let shape = &document.shapes()[0];
	assert_eq!(shape.fill(), &Paint::Color(Color::from_rgba8(255, 0, 0, 127)));
	assert_eq!(shape.opacity(), 0.5);
}

#[test]
fn linear_gradient_in_bounding_box_units() {
	let document = parse(
		r##"<svg width="10" height="10">
			<defs>
				<linearGradient id="fade" spreadMethod="reflect">
					<stop offset="1" stop-color="white"/>
					<stop offset="0" stop-color="black"/>
				</linearGradient>
			</defs>
			<rect width="10" height="10" fill="url(#fade)"/>
		</svg>"##,
	);
	let Paint::Gradient(gradient) = document.shapes()[0].fill() else {
		panic!("expected a gradient fill")
	};
	assert_eq!(gradient.kind, GradientKind::Linear);
	assert_eq!(gradient.spread, SpreadMethod::Reflect);
	// Stops are sorted by offset as they are inserted.
	assert_eq!(gradient.stops.iter().map(|stop| stop.offset).collect::<Vec<_>>(), [0., 1.]);
	assert_eq!(gradient.stops[0].color, Color::BLACK);

	assert_near(gradient.transform.transform_point2(DVec2::new(0., 5.)).y, 0.);
	assert_near(gradient.transform.transform_point2(DVec2::new(5., 5.)).y, 0.5);
	assert_near(gradient.transform.transform_point2(DVec2::new(10., 5.)).y, 1.);
}

#[test]
fn radial_gradient_inherits_stops_through_href() {
	let document = parse(
		r##"<svg width="20" height="20">
			<linearGradient id="stops"><stop offset="0" stop-color="red"/><stop offset="1" stop-color="blue"/></linearGradient>
			<radialGradient id="glow" xlink:href="#stops" gradientUnits="userSpaceOnUse" cx="10" cy="10" r="10"/>
			<rect width="20" height="20" fill="url(#glow)"/>
		</svg>"##,
	);
	let Paint::Gradient(gradient) = document.shapes()[0].fill() else {
		panic!("expected a gradient fill")
	};
	assert!(matches!(gradient.kind, GradientKind::Radial { .. }));
	assert_eq!(gradient.stops.len(), 2);
	assert_eq!(gradient.stops[1].color, Color::from_rgb8(0, 0, 255));
	assert_near(gradient.transform.transform_point2(DVec2::new(10., 10.)).length(), 0.);
	assert_near(gradient.transform.transform_point2(DVec2::new(20., 10.)).length(), 1.);
}

#[test]
fn gradients_may_be_defined_after_use() {
	let document = parse(
		r##"<svg width="10" height="10">
			<rect width="10" height="10" fill="url(#late)"/>
			<linearGradient id="late"><stop offset="0" stop-color="red"/><stop offset="1" stop-color="lime"/></linearGradient>
		</svg>"##,
	);
	assert!(matches!(document.shapes()[0].fill(), Paint::Gradient(_)));
}

#[test]
fn unresolved_and_single_stop_gradients() {
	let document = parse(
		r##"<svg width="10" height="10">
			<linearGradient id="solid"><stop offset="0.5" stop-color="#00ff00" stop-opacity="0.5"/></linearGradient>
			<rect width="10" height="10" fill="url(#missing)"/>
			<rect width="10" height="10" fill="url(#solid)"/>
		</svg>"##,
	);
	assert_eq!(document.shapes()[0].fill(), &Paint::None);
	assert_eq!(document.shapes()[1].fill(), &Paint::Color(Color::from_rgba8(0, 255, 0, 127)));
}

#[test]
fn nesting_limit_is_an_error() {
	let text = format!("<svg>{}</svg>", "<g>".repeat(300));
	assert_eq!(parse_error(&text), ParseError::DepthExceeded { limit: 256 });
}

fn parse_error(text: &str) -> ParseError {
	Document::parse(text, &ParseOptions::default()).expect_err("parse should fail")
}

#[test]
fn elements_after_malformed_attributes_survive() {
	let document = parse(
		r#"<svg width="10" height="10">
			<rect fill=red width="4" height="4"/>
			<rect bare width="3" height="3"/>
			<rect fill="red/>
			<rect width="2" height="2"/>
			<circle r="1"/>
		</svg>"#,
	);
	assert_eq!(document.shapes().len(), 4);
	for (shape, size) in document.shapes().iter().zip([4., 3., 2., 2.]) {
		assert_near(shape.bounds().size().x, size);
		assert_near(shape.bounds().size().y, size);
	}
	assert_eq!(document.shapes()[0].fill(), &Paint::Color(Color::BLACK));
}

#[test]
fn malformed_input_is_tolerated() {
	let document = parse(r#"<svg width="10" height="10"><rect width="5" height="5" fill="nonsense" <g></rect><path d="M 0 0 L 5 0 L x 5"/></svg"#);
	let [rect, path] = document.shapes() else { panic!("expected two shapes, got {}", document.shapes().len()) };
	assert_eq!(rect.fill(), &Paint::Color(Color::from_rgb8(128, 128, 128)));
	assert_eq!(path.paths()[0].segment_count(), 1);

	let bytes = b"<svg width=\"4\" height=\"4\"><rect width=\"4\" height=\"4\"/>\xff</svg>";
	let document = Document::parse_bytes(bytes, &ParseOptions::default()).unwrap();
	assert_eq!(document.shapes().len(), 1);

	assert_eq!(parse("").shapes().len(), 0);
	assert_eq!(parse("not markup at all").bounds(), None);
}

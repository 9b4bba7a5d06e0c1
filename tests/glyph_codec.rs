//! Glyph import, text layout and export against the fixture font.

use std::path::Path;

use marquee::address::{GridAddress, GridGeometry};
use marquee::cell::{Cell, Shape};
use marquee::codec::{export_layer, export_stack, import_glyph, layout_text, typeset};
use marquee::glyph::{Font, Glyph, GlyphError};
use marquee::layer::Layer;
use marquee::palette::{ColorIndex, Palette};
use marquee::tool::EditorState;

fn block_font() -> Font {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/fonts/block.json");
    let text = std::fs::read_to_string(path).expect("fixture font exists");
    Font::from_json(&text).expect("fixture font is valid")
}

#[test]
fn test_import_then_export_is_lossless() {
    let glyph = Glyph::single(0, vec![vec![1, 0], vec![0, 2]]);
    let layers = import_glyph(&glyph, GridAddress::new(0, 0), ColorIndex(3), &Palette::default(), "g");

    assert_eq!(layers.len(), 1);
    let layer = &layers[0];
    assert_eq!(layer.len(), 2);
    let square = layer.get(GridAddress::new(0, 0)).expect("square pixel");
    assert_eq!((square.shape(), square.color()), (Shape::Square, ColorIndex(3)));
    let circle = layer.get(GridAddress::new(1, 1)).expect("circle pixel");
    assert_eq!((circle.shape(), circle.color()), (Shape::Circle, ColorIndex(3)));

    assert_eq!(export_layer(layer), glyph);
}

#[test]
fn test_layered_glyph_uses_consecutive_colors() {
    let font = block_font();
    let glyph = font.get("o").expect("fixture has o");
    let palette = Palette::default();
    let layers = import_glyph(glyph, GridAddress::new(10, 0), ColorIndex(6), &palette, "o");

    assert_eq!(layers.iter().map(Layer::name).collect::<Vec<_>>(), vec!["o.0", "o.1"]);
    // offset 3 shifts every row down
    let top = layers[0].get(GridAddress::new(10, 3)).expect("top-left pixel");
    assert_eq!((top.shape(), top.color()), (Shape::CornerNw, ColorIndex(6)));
    let bottom = layers[1].get(GridAddress::new(11, 4)).expect("bottom-right pixel");
    // 6 + 1 wraps around the seven-color palette
    assert_eq!((bottom.shape(), bottom.color()), (Shape::CornerSe, ColorIndex(0)));
}

#[test]
fn test_layout_measures_and_centers_text() {
    let font = block_font();
    let layout = layout_text(&font, "HI");
    assert_eq!((layout.width, layout.height), (5, 5));
    assert_eq!(layout.centered_origin(&GridGeometry::default()), GridAddress::new(29, 5));

    let layout = layout_text(&font, "h i");
    assert_eq!(layout.width, 3 + 1 + 0 + 1 + 1);
    assert!(layout.skipped.is_empty());
}

#[test]
fn test_unknown_characters_take_no_space() {
    let font = block_font();
    let with_unknown = layout_text(&font, "H?I");
    let without = layout_text(&font, "HI");
    assert_eq!(with_unknown.skipped, vec!['?']);
    assert_eq!(with_unknown.width, without.width);

    let origin = GridAddress::new(0, 0);
    let palette = Palette::default();
    let a = typeset(&with_unknown, origin, ColorIndex(1), &palette);
    let b = typeset(&without, origin, ColorIndex(1), &palette);
    assert_eq!(a, b);
}

#[test]
fn test_typed_text_exports_back_to_the_font() {
    let font = block_font();
    let mut state =
        EditorState::blank(GridGeometry::default(), Palette::default(), ColorIndex(0), ColorIndex(1), 1)
            .expect("default palette");
    assert_eq!(state.on_submit_text(&font, "HI."), 3);

    let exported = export_stack(state.stack());
    assert_eq!(exported.len(), 3);
    assert_eq!(exported.get("H"), font.get("H"));
    assert_eq!(exported.get("I"), font.get("I"));
    // Export always writes offset 0
    assert_eq!(exported.get("."), Some(&Glyph::single(0, vec![vec![2]])));
}

#[test]
fn test_export_names_collide_with_index_suffix() {
    let font = block_font();
    let mut state =
        EditorState::blank(GridGeometry::default(), Palette::default(), ColorIndex(0), ColorIndex(1), 1)
            .expect("default palette");
    state.on_submit_text(&font, "II");

    let exported = export_stack(state.stack());
    let keys: Vec<&String> = exported.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["I", "I#3"]);
}

#[test]
fn test_multi_color_layer_exports_planes_in_color_order() {
    let layer = Layer::from_cells(
        "two-tone",
        [
            Cell::new(GridAddress::new(4, 4), ColorIndex(5), Shape::CornerNe),
            Cell::new(GridAddress::new(3, 4), ColorIndex(2), Shape::Square),
        ],
    );
    let glyph = export_layer(&layer);
    assert_eq!(glyph.layers, Some(2));
    let expected: Vec<Vec<Vec<u8>>> = vec![vec![vec![1, 0]], vec![vec![0, 3]]];
    assert_eq!(glyph.planes(), expected.as_slice());
}

#[test]
fn test_malformed_fonts_are_rejected() {
    let bad_code = Font::from_json(r#"{A: {pixels: [[1, 7]]}}"#).unwrap_err();
    assert!(matches!(
        bad_code,
        GlyphError::InFont { ref key, ref source } if key == "A"
            && matches!(**source, GlyphError::InvalidCode { code: 7, .. })
    ));

    let ragged = Font::from_json(r#"{B: {pixels: [[1, 1], [1]]}}"#).unwrap_err();
    assert!(ragged.to_string().starts_with("glyph 'B'"));

    let miscounted = Font::from_json(r#"{C: {layers: 3, pixels: [[[1]], [[1]]]}}"#).unwrap_err();
    assert!(matches!(
        miscounted,
        GlyphError::InFont { ref source, .. }
            if matches!(**source, GlyphError::LayerCountMismatch { declared: 3, found: 2 })
    ));
}

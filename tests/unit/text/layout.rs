use super::*;

#[test]
fn builtin_block_size_scales_with_face() {
    let plan = layout_builtin("HI", BuiltinFace::for_size(40));
    assert_eq!(plan.size(), (80.0, 40.0));

    let plan = layout_builtin("ab\nc", BuiltinFace::for_size(8));
    assert_eq!(plan.size(), (16.0, 16.0));
}

#[test]
fn builtin_cells_follow_glyph_bitmaps() {
    let GlyphPlan::Cells { cells, scale, .. } = layout_builtin("H", BuiltinFace::for_size(8))
    else {
        panic!("expected builtin cells");
    };
    assert_eq!(scale, 1);
    // 'H' has two 2-wide stems on 7 rows plus a 2-wide crossbar between them.
    assert_eq!(cells.len(), 4 * 7 + 2);
    assert!(cells.contains(&(0, 0)));
    assert!(cells.contains(&(5, 6)));
    assert!(cells.contains(&(2, 3)));
    assert!(!cells.contains(&(2, 0)));
    assert!(!cells.iter().any(|&(_, row)| row == 7));
}

#[test]
fn builtin_short_lines_are_centered() {
    let GlyphPlan::Cells { cells, .. } = layout_builtin("HH\nI", BuiltinFace::for_size(8)) else {
        panic!("expected builtin cells");
    };
    // 'I' spans columns 1..=4 of its glyph; centered under two glyphs it shifts by 4 units.
    let second_row: Vec<u32> = cells
        .iter()
        .filter(|&&(_, row)| row >= 8)
        .map(|&(col, _)| col)
        .collect();
    assert_eq!(second_row.iter().min(), Some(&5));
    assert_eq!(second_row.iter().max(), Some(&8));
}

#[test]
fn blank_text_produces_blank_plan() {
    assert!(layout_builtin("", BuiltinFace::for_size(16)).is_blank());
    assert!(layout_builtin("   ", BuiltinFace::for_size(16)).is_blank());
    assert!(!layout_builtin("x", BuiltinFace::for_size(16)).is_blank());
}

#[test]
fn unparseable_outline_bytes_are_not_an_error() {
    let mut engine = TextLayoutEngine::new();
    let face = OutlineFace::new(std::sync::Arc::new(b"definitely not a font".to_vec()), 32.0);
    let plan = engine.layout_outline("hi", &face).unwrap();
    assert!(plan.is_none());
}

#[test]
fn outline_rejects_non_positive_size() {
    let mut engine = TextLayoutEngine::new();
    let face = OutlineFace::new(std::sync::Arc::new(vec![0u8; 4]), 0.0);
    assert!(engine.layout_outline("hi", &face).is_err());
}

#[test]
fn huge_builtin_scale_keeps_exact_block_size() {
    let face = BuiltinFace::for_size(u32::MAX);
    assert_eq!(face.cell_px(), u32::MAX);
    let plan = layout_builtin("HI\nx", face);
    let unit = 8.0 * f64::from(face.scale());
    assert_eq!(plan.size(), (2.0 * unit, 2.0 * unit));
}

fn face_from(path: &str, size_px: f32) -> OutlineFace {
    OutlineFace::new(std::sync::Arc::new(std::fs::read(path).unwrap()), size_px)
}

fn outline_glyphs(plan: &GlyphPlan) -> &[vello_cpu::Glyph] {
    match plan {
        GlyphPlan::Outline { glyphs, .. } => glyphs,
        GlyphPlan::Cells { .. } => panic!("expected outline glyphs"),
    }
}

#[test]
fn outline_layout_shapes_real_font_bytes() {
    let mut engine = TextLayoutEngine::new();
    let face = face_from("tests/data/fonts/DejaVuSans.ttf", 32.0);
    let plan = engine.layout_outline("HI", &face).unwrap().unwrap();

    assert_eq!(outline_glyphs(&plan).len(), 2);
    let (w, h) = plan.size();
    assert!(w > 20.0 && w < 64.0, "width {w}");
    assert!(h >= 32.0 && h < 48.0, "height {h}");

    engine.layout_outline("again", &face).unwrap().unwrap();
    assert_eq!(engine.slots.len(), 1);
}

#[test]
fn fonts_sharing_a_family_name_shape_independently() {
    let regular = face_from("tests/data/fonts/DejaVuSans.ttf", 40.0);
    let bold = face_from("tests/data/fonts/DejaVuSans-Bold.ttf", 40.0);

    let mut shared = TextLayoutEngine::new();
    let plain = shared.layout_outline("Heavy", &regular).unwrap().unwrap();
    let heavy = shared.layout_outline("Heavy", &bold).unwrap().unwrap();
    assert_eq!(shared.slots.len(), 2);

    let mut fresh = TextLayoutEngine::new();
    let heavy_alone = fresh.layout_outline("Heavy", &bold).unwrap().unwrap();

    assert_eq!(heavy.size(), heavy_alone.size());
    assert!(heavy.size().0 > plain.size().0);
}

#[test]
fn outline_lines_are_centered_within_the_block() {
    let mut engine = TextLayoutEngine::new();
    let face = face_from("tests/data/fonts/DejaVuSans.ttf", 32.0);
    let plan = engine.layout_outline("HHHH\nI", &face).unwrap().unwrap();
    let glyphs = outline_glyphs(&plan);
    let (width, _) = plan.size();

    let first_line_y = glyphs[0].y;
    let i_glyph = glyphs
        .iter()
        .find(|g| g.y > first_line_y)
        .expect("second line glyph");
    // The lone glyph starts near the middle rather than at the left edge.
    assert!(f64::from(i_glyph.x) > width / 2.0 - 16.0, "x = {}", i_glyph.x);
}

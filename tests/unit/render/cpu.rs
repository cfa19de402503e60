use super::*;
use crate::assets::fonts::BuiltinFace;
use crate::text::layout::layout_builtin;

fn px(buf: &[u8], size: CanvasSize, x: u32, y: u32) -> [u8; 4] {
    let idx = ((y * size.width + x) * 4) as usize;
    [buf[idx], buf[idx + 1], buf[idx + 2], buf[idx + 3]]
}

#[test]
fn cells_land_on_whole_pixels() {
    let size = CanvasSize::new(20, 20);
    let plan = GlyphPlan::Cells {
        cells: vec![(0, 0), (1, 1)],
        scale: 3,
        width: 6.0,
        height: 6.0,
    };
    let buf = paint_plan(size, &plan, Point::new(4.4, 5.6), Ink::solid([10, 20, 30])).unwrap();

    // Origin rounds to (4, 6).
    assert_eq!(px(&buf, size, 4, 6), [10, 20, 30, 255]);
    assert_eq!(px(&buf, size, 6, 8), [10, 20, 30, 255]);
    assert_eq!(px(&buf, size, 7, 9), [10, 20, 30, 255]);
    assert_eq!(px(&buf, size, 7, 6), [0, 0, 0, 0]);
    assert_eq!(px(&buf, size, 3, 6), [0, 0, 0, 0]);
    let inked = buf.chunks_exact(4).filter(|p| p[3] != 0).count();
    assert_eq!(inked, 18);
}

#[test]
fn cell_stroke_surrounds_fill() {
    let size = CanvasSize::new(12, 12);
    let plan = GlyphPlan::Cells {
        cells: vec![(0, 0)],
        scale: 2,
        width: 2.0,
        height: 2.0,
    };
    let ink = Ink {
        fill: [255, 255, 255],
        stroke: Some((2, [255, 0, 0])),
    };
    let buf = paint_plan(size, &plan, Point::new(5.0, 5.0), ink).unwrap();

    assert_eq!(px(&buf, size, 5, 5), [255, 255, 255, 255]);
    assert_eq!(px(&buf, size, 6, 6), [255, 255, 255, 255]);
    assert_eq!(px(&buf, size, 3, 3), [255, 0, 0, 255]);
    assert_eq!(px(&buf, size, 8, 5), [255, 0, 0, 255]);
    assert_eq!(px(&buf, size, 9, 5), [0, 0, 0, 0]);
    assert_eq!(px(&buf, size, 2, 5), [0, 0, 0, 0]);
}

#[test]
fn cells_outside_canvas_are_clipped() {
    let size = CanvasSize::new(16, 16);
    let plan = layout_builtin("H", BuiltinFace::for_size(16));
    let buf = paint_plan(size, &plan, Point::new(-12.0, 10.0), Ink::solid([0, 0, 0])).unwrap();
    assert_eq!(buf.len(), 16 * 16 * 4);

    let on_canvas = paint_plan(size, &plan, Point::new(0.0, 0.0), Ink::solid([0, 0, 0])).unwrap();
    let count = |b: &[u8]| b.chunks_exact(4).filter(|p| p[3] != 0).count();
    assert!(count(&buf) < count(&on_canvas));
}

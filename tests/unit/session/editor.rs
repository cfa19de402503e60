use super::*;

#[test]
fn defaults_match_upload_limits() {
    let opts = EditorOpts::default();
    assert_eq!(opts.max_upload_bytes, 5 * 1024 * 1024);
    assert_eq!(opts.max_side, 1024);
    assert_eq!(opts.compositor, CompositorOpts::default());
}

#[test]
fn builders_override_fields() {
    let opts = EditorOpts::default()
        .with_max_upload_bytes(10)
        .with_max_side(0)
        .with_compositor(CompositorOpts::default().with_shadow_follows_opacity(true));
    assert_eq!(opts.max_upload_bytes, 10);
    assert_eq!(opts.max_side, 0);
    assert!(opts.compositor.shadow_follows_opacity);
    assert_eq!(Editor::new(opts).opts(), opts);
}

#[test]
fn flags_parse_common_spellings() {
    assert_eq!(parse_flag("1"), Some(true));
    assert_eq!(parse_flag(" TRUE "), Some(true));
    assert_eq!(parse_flag("off"), Some(false));
    assert_eq!(parse_flag("maybe"), None);
}

#[test]
fn process_image_downscales_before_segmentation() {
    let mut editor = Editor::new(EditorOpts::default().with_max_side(50));
    let remover = |img: &RgbaImage| -> LayerResult<RgbaImage> {
        assert_eq!(img.dimensions(), (50, 25));
        Ok(RgbaImage::new(img.width(), img.height()))
    };
    let out = editor
        .process_image(RgbaImage::new(200, 100), &remover, &TextSet::new())
        .unwrap();
    assert_eq!(out.original.dimensions(), (50, 25));
    assert_eq!(out.composite.dimensions(), (50, 25));
}

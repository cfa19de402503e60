use super::*;

#[test]
fn case_transforms() {
    assert_eq!(TextTransform::Uppercase.apply("Hello"), "HELLO");
    assert_eq!(TextTransform::Lowercase.apply("HeLLo"), "hello");
    assert_eq!(TextTransform::None.apply("HeLLo"), "HeLLo");
}

#[test]
fn capitalize_is_whole_string_not_per_word() {
    assert_eq!(TextTransform::Capitalize.apply("hello world"), "Hello world");
    assert_eq!(TextTransform::Capitalize.apply("hELLO WORLD"), "Hello world");
    assert_eq!(TextTransform::Capitalize.apply(""), "");
}

#[test]
fn case_transforms_use_full_unicode_mapping() {
    assert_eq!(TextTransform::Uppercase.apply("straße"), "STRASSE");
    assert_eq!(TextTransform::Capitalize.apply("ßa"), "SSa");
    assert_eq!(TextTransform::Lowercase.apply("ÀÉÎ"), "àéî");
}

#[test]
fn colors_fold_opacity_into_alpha() {
    let ann = TextAnnotation {
        fill: Rgb8::new(255, 0, 0),
        stroke_color: Rgb8::new(0, 0, 255),
        opacity: 0.5,
        ..TextAnnotation::new("x")
    };
    assert_eq!(ann.fill_rgba(), [255, 0, 0, 128]);
    assert_eq!(ann.stroke_rgba(), [0, 0, 255, 128]);
}

#[test]
fn validate_rejects_bad_numbers() {
    let ok = TextAnnotation::new("x");
    assert!(ok.validate().is_ok());

    let bad_opacity = TextAnnotation {
        opacity: 1.5,
        ..ok.clone()
    };
    assert!(matches!(
        bad_opacity.validate(),
        Err(LayerError::Validation(_))
    ));

    let nan_rotation = TextAnnotation {
        rotation_deg: f32::NAN,
        ..ok.clone()
    };
    assert!(nan_rotation.validate().is_err());

    let bad_blur = TextAnnotation {
        shadow: Some(Shadow {
            blur_radius: -1.0,
            ..Shadow::default()
        }),
        ..ok.clone()
    };
    assert!(bad_blur.validate().is_err());

    let disabled_bad_blur = TextAnnotation {
        shadow: Some(Shadow {
            enabled: false,
            blur_radius: -1.0,
            ..Shadow::default()
        }),
        ..ok
    };
    assert!(disabled_bad_blur.validate().is_ok());
}

#[test]
fn validate_bounds_font_size() {
    let mut ann = TextAnnotation::new("x");
    ann.font.size_pt = FontRef::MAX_SIZE_PT;
    assert!(ann.validate().is_ok());

    ann.font.size_pt = u32::MAX;
    assert!(matches!(ann.validate(), Err(LayerError::Validation(_))));
}

#[test]
fn text_set_json_uses_editor_defaults() {
    let set = TextSet::from_json_str(
        r##"[
            {"content": "HI", "font": {"family": "Anton", "size_pt": 40}, "fill": "#000000"},
            {"content": "behind", "transform": "uppercase", "offset": [10, -20],
             "shadow": {"color": "#333333", "blur_radius": 2.0}}
        ]"##,
    )
    .unwrap();

    assert_eq!(set.len(), 2);
    let first = &set.as_slice()[0];
    assert_eq!(first.font.size_pt, 40);
    assert_eq!(first.fill, Rgb8::BLACK);
    assert_eq!(first.opacity, 1.0);
    assert_eq!(first.stroke_width, 0);
    assert!(first.shadow.is_none());

    let second = &set.as_slice()[1];
    assert_eq!(second.rendered_text(), "BEHIND");
    assert_eq!(second.font, FontRef::default());
    assert_eq!(second.offset, Offset::new(10, -20));
    let shadow = second.active_shadow().unwrap();
    assert_eq!(shadow.color, Rgb8::new(0x33, 0x33, 0x33));
    assert_eq!(shadow.blur_radius, 2.0);
}

#[test]
fn text_set_rejects_malformed_json() {
    let err = TextSet::from_json_str(r##"[{"fill": "#12"}]"##).unwrap_err();
    assert!(matches!(err, LayerError::Serde(_)));
}

#[test]
fn text_set_preserves_paint_order() {
    let set: TextSet = ["a", "b", "c"].into_iter().map(TextAnnotation::new).collect();
    let order: Vec<&str> = set.iter().map(|a| a.content.as_str()).collect();
    assert_eq!(order, ["a", "b", "c"]);

    let json = set.to_json_string().unwrap();
    assert_eq!(TextSet::from_json_str(&json).unwrap(), set);
}

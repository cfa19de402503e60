use image::Rgba;

use super::*;

#[test]
fn closure_remover_is_called() {
    let remover = |img: &RgbaImage| -> LayerResult<RgbaImage> {
        Ok(RgbaImage::from_pixel(img.width(), img.height(), Rgba([1, 2, 3, 4])))
    };
    let out = extract_subject(&remover, &RgbaImage::new(3, 2)).unwrap();
    assert_eq!(out.dimensions(), (3, 2));
    assert_eq!(out.get_pixel(0, 0).0, [1, 2, 3, 4]);
}

#[test]
fn wrong_size_cutout_is_rejected() {
    let remover = |_: &RgbaImage| -> LayerResult<RgbaImage> { Ok(RgbaImage::new(4, 4)) };
    let err = extract_subject(&remover, &RgbaImage::new(3, 2)).unwrap_err();
    assert!(matches!(
        err,
        LayerError::DimensionMismatch {
            what: "subject cutout",
            expected: (3, 2),
            actual: (4, 4),
        }
    ));
}

#[test]
fn remover_failures_become_segmentation_errors() {
    let remover = |_: &RgbaImage| -> LayerResult<RgbaImage> {
        Err(LayerError::render("model crashed"))
    };
    let err = extract_subject(&remover, &RgbaImage::new(1, 1)).unwrap_err();
    match err {
        LayerError::Segmentation(msg) => assert!(msg.contains("model crashed")),
        other => panic!("unexpected error: {other}"),
    }

    let remover = |_: &RgbaImage| -> LayerResult<RgbaImage> {
        Err(LayerError::segmentation("service unavailable"))
    };
    let err = extract_subject(&remover, &RgbaImage::new(1, 1)).unwrap_err();
    assert_eq!(err.to_string(), "segmentation error: service unavailable");
}

#[test]
fn precomputed_cutout_matches_same_size() {
    let cut = RgbaImage::from_pixel(4, 2, Rgba([9, 9, 9, 255]));
    let remover = PrecomputedCutout::from_image(cut.clone());
    assert_eq!(remover.remove_background(&RgbaImage::new(4, 2)).unwrap(), cut);
}

#[test]
fn precomputed_cutout_follows_uniform_downscale() {
    let remover = PrecomputedCutout::from_image(RgbaImage::new(300, 200));
    let out = remover.remove_background(&RgbaImage::new(150, 100)).unwrap();
    assert_eq!(out.dimensions(), (150, 100));

    let out = remover.remove_background(&RgbaImage::new(100, 67)).unwrap();
    assert_eq!(out.dimensions(), (100, 67));

    let err = remover.remove_background(&RgbaImage::new(100, 100)).unwrap_err();
    assert!(matches!(err, LayerError::Segmentation(_)));
}

#[test]
fn precomputed_cutout_missing_file_is_decode_error() {
    let err = PrecomputedCutout::from_path("target/definitely/missing/cutout.png").unwrap_err();
    assert!(matches!(err, LayerError::Decode(_)));
}

use super::*;

#[test]
fn builtin_scale_tracks_requested_size() {
    assert_eq!(BuiltinFace::for_size(40).scale(), 5);
    assert_eq!(BuiltinFace::for_size(40).cell_px(), 40);
    assert_eq!(BuiltinFace::for_size(50).scale(), 6);
    assert_eq!(BuiltinFace::for_size(3).scale(), 1);
    assert_eq!(BuiltinFace::for_size(0).scale(), 1);
}

#[test]
fn builtin_glyphs_cover_ascii_and_fall_back_to_question_mark() {
    let h = BuiltinFace::glyph_rows('H');
    assert_eq!(h[0], 0x33);
    assert_eq!(h[3], 0x3F);
    assert_eq!(BuiltinFace::glyph_rows(' '), [0; 8]);

    let unknown = BuiltinFace::glyph_rows('\u{4e2d}');
    assert_eq!(unknown, BuiltinFace::glyph_rows('?'));
}

#[test]
fn registry_matches_family_case_insensitively() {
    let mut reg = FontRegistry::new();
    reg.register("Roboto Slab", vec![1, 2, 3]).unwrap();

    let face = reg.resolve("roboto slab", 32).unwrap();
    let FontFace::Outline(face) = face else {
        panic!("expected outline face");
    };
    assert_eq!(face.size_px(), 32.0);
    assert_eq!(face.data().as_slice(), &[1, 2, 3]);

    assert!(reg.resolve("Lobster", 32).is_none());
    assert!(reg.resolve("Roboto Slab", 0).is_none());
    assert_eq!(reg.families(), vec!["roboto slab".to_string()]);
}

#[test]
fn registry_rejects_empty_names_and_data() {
    let mut reg = FontRegistry::new();
    assert!(reg.register("  ", vec![1]).is_err());
    assert!(reg.register("Inter", Vec::new()).is_err());
    assert!(reg.is_empty());
}

#[test]
fn closures_act_as_resolvers() {
    let resolver = |family: &str, size: u32| {
        (family == "pixel").then(|| FontFace::Builtin(BuiltinFace::for_size(size)))
    };
    assert!(matches!(
        resolver.resolve("pixel", 16),
        Some(FontFace::Builtin(_))
    ));
    assert!(resolver.resolve("other", 16).is_none());
}

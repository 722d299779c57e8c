use super::*;

#[test]
fn normalize_path_slash_normalization() {
    assert_eq!(normalize_rel_path("a/b.webp").unwrap(), "a/b.webp");
    assert_eq!(normalize_rel_path("a\\b.webp").unwrap(), "a/b.webp");
    assert_eq!(normalize_rel_path("./a//b.webp").unwrap(), "a/b.webp");
    assert!(normalize_rel_path("../x.webp").is_err());
    assert!(normalize_rel_path("/abs.webp").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn default_template_is_one_based_and_zero_padded() {
    let t = FramePathTemplate::default();
    assert_eq!(t.path_for(0), "frames/frame_0001.webp");
    assert_eq!(t.path_for(89), "frames/frame_0090.webp");
    assert_eq!(t.path_for(179), "frames/frame_0180.webp");
}

#[test]
fn numbers_wider_than_padding_are_not_truncated() {
    let t = FramePathTemplate {
        digits: 2,
        ..FramePathTemplate::default()
    };
    assert_eq!(t.path_for(122), "frames/frame_123.webp");
}

#[test]
fn empty_dir_yields_bare_file_name() {
    let t = FramePathTemplate {
        dir: String::new(),
        extension: "png".to_owned(),
        ..FramePathTemplate::default()
    };
    assert_eq!(t.path_for(0), "frame_0001.png");
    t.validate().unwrap();
}

#[test]
fn validate_rejects_bad_templates() {
    let bad_dir = FramePathTemplate {
        dir: "../frames".to_owned(),
        ..FramePathTemplate::default()
    };
    assert!(bad_dir.validate().is_err());

    let bad_digits = FramePathTemplate {
        digits: 0,
        ..FramePathTemplate::default()
    };
    assert!(bad_digits.validate().is_err());

    let bad_ext = FramePathTemplate {
        extension: String::new(),
        ..FramePathTemplate::default()
    };
    assert!(bad_ext.validate().is_err());

    FramePathTemplate::default().validate().unwrap();
}

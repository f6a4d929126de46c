use super::*;

#[test]
fn opaque_source_replaces_destination() {
    assert_eq!(over([1, 2, 3, 255], [200, 100, 50, 255], 1.0), [200, 100, 50, 255]);
}

#[test]
fn transparent_source_or_zero_opacity_keeps_destination() {
    let dst = [9, 8, 7, 255];
    assert_eq!(over(dst, [0, 0, 0, 0], 1.0), dst);
    assert_eq!(over(dst, [255, 255, 255, 255], 0.0), dst);
}

#[test]
fn half_opacity_blends_over_opaque() {
    let out = over([0, 0, 0, 255], [255, 255, 255, 255], 0.5);
    assert_eq!(out[3], 255);
    assert!((127..=129).contains(&out[0]), "{out:?}");
}

#[test]
fn over_in_place_checks_lengths() {
    let mut dst = vec![0u8; 8];
    let err = over_in_place(&mut dst, &[0u8; 4], 1.0).expect_err("length mismatch");
    assert!(err.to_string().starts_with("paint error:"), "{err}");

    let src = [255u8, 0, 0, 255, 0, 0, 0, 0];
    over_in_place(&mut dst, &src, 1.0).expect("over");
    assert_eq!(dst, vec![255, 0, 0, 255, 0, 0, 0, 0]);
}

#[test]
fn premultiply_scales_color_by_alpha() {
    let mut px = vec![100u8, 50, 200, 128, 9, 9, 9, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(
        px,
        vec![
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128,
            0,
            0,
            0,
            0
        ]
    );
}

#[test]
fn flatten_onto_background_makes_frames_opaque() {
    let src = [0, 0, 0, 0, 1, 2, 3, 255, 128, 0, 0, 128];
    let mut dst = [0u8; 12];
    flatten_onto_background(&mut dst, &src, [10, 20, 30]).expect("flatten");
    assert_eq!(&dst[..4], &[10, 20, 30, 255]);
    assert_eq!(&dst[4..8], &[1, 2, 3, 255]);
    assert_eq!(dst[11], 255);
    assert!((128..=134).contains(&dst[8]), "{dst:?}");

    let mut black = [0u8; 4];
    flatten_onto_background(&mut black, &[128, 0, 0, 128], [0, 0, 0]).expect("flatten");
    assert_eq!(black, [128, 0, 0, 255]);

    assert!(flatten_onto_background(&mut [0u8; 4], &[0u8; 8], [0, 0, 0]).is_err());
}

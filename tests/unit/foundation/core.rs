use super::*;

#[test]
fn hex_colors_parse_with_and_without_alpha() {
    assert_eq!(Rgba8::from_hex("#4A6FA5").unwrap(), Rgba8::rgb(0x4a, 0x6f, 0xa5));
    assert_eq!(
        Rgba8::from_hex("#ffffff80").unwrap(),
        Rgba8::rgb(255, 255, 255).with_alpha(0x80)
    );
}

#[test]
fn hex_colors_reject_malformed_input() {
    assert!(Rgba8::from_hex("4A6FA5").is_err());
    assert!(Rgba8::from_hex("#4A6").is_err());
    assert!(Rgba8::from_hex("#zzzzzz").is_err());
}

#[test]
fn surface_size_to_u16_bounds() {
    assert_eq!(SurfaceSize::new(100, 50).to_u16().unwrap(), (100, 50));
    assert!(SurfaceSize::new(0, 50).to_u16().is_err());
    assert!(SurfaceSize::new(70_000, 50).to_u16().is_err());
    assert_eq!(SurfaceSize::new(320, 180).min_side(), 180);
}

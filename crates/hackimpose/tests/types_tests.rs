use hackimpose::*;

#[test]
fn test_rgb_parsing() {
    assert_eq!("255,0,128".parse::<Rgb>().unwrap(), Rgb(255, 0, 128));
    assert_eq!(" 1, 2 ,3 ".parse::<Rgb>().unwrap(), Rgb(1, 2, 3));

    for invalid in ["1,2", "1,2,3,4", "256,0,0", "a,b,c", "", "-1,0,0"] {
        assert!(
            matches!(invalid.parse::<Rgb>(), Err(ImposeError::Config(_))),
            "'{}' should not parse",
            invalid
        );
    }
}

#[test]
fn test_rgb_display_parses_back() {
    let color = Rgb(126, 126, 0);
    assert_eq!(color.to_string(), "126,126,0");
    assert_eq!(color.to_string().parse::<Rgb>().unwrap(), color);
}

#[test]
fn test_rgb_unit_components() {
    assert_eq!(Rgb::BLACK.unit(), (0.0, 0.0, 0.0));
    assert_eq!(Rgb::BLUE.unit(), (0.0, 0.0, 1.0));
    let (r, g, b) = Rgb(51, 102, 204).unit();
    assert!((r - 0.2).abs() < 1e-6);
    assert!((g - 0.4).abs() < 1e-6);
    assert!((b - 0.8).abs() < 1e-6);
}

#[test]
fn test_grid_slots() {
    assert_eq!(Grid::SIGNATURE.page_columns(), 4);
    assert_eq!(Grid::SIGNATURE.pages_per_sheet(), 8);
    assert_eq!(Grid::new(3, 1).pages_per_sheet(), 6);
}

#[test]
fn test_page_size() {
    assert!(PageSize::new(595.0, 842.0).is_usable());
    assert!(!PageSize::new(0.0, 842.0).is_usable());
    assert!(!PageSize::new(595.0, f32::INFINITY).is_usable());

    let a4 = PageSize::new(595.276, 841.89);
    assert!(a4.approx_eq(PageSize::new(595.28, 841.89), 0.01));
    assert!(!a4.approx_eq(PageSize::new(595.0, 841.89), 0.01));
    assert_eq!(PageSize::new(100.0, 200.0).to_string(), "100x200 pt");
}

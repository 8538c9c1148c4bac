use hackimpose::*;
use std::path::{Path, PathBuf};

#[test]
fn test_default_sheet_settings() {
    let settings = SheetSettings::default();
    assert_eq!(settings.global_w, 1190.7);
    assert_eq!(settings.global_h, 842.0);
    assert!((settings.int_margin - 14.173).abs() < 1e-2);
    assert!((settings.ext_margin - 8.504).abs() < 1e-2);
    assert!((settings.dec_margin - 14.173).abs() < 1e-2);
    assert_eq!(settings.dec_line_coef, 0.8);
    assert_eq!(settings.dec_color, Rgb::BLACK);
    assert!(settings.dec_keep_overflow);
    assert_eq!((settings.nb_w, settings.nb_h), (2, 2));
    assert!(!settings.debug);

    let config = settings.validate().unwrap();
    assert_eq!(config, SheetConfig::default());
    assert_eq!(config.grid(), Grid::SIGNATURE);
}

#[test]
fn test_validation_no_input_file() {
    let options = ImpositionOptions::default();
    let result = options.validate();
    assert!(result.is_err());
    match result {
        Err(ImposeError::Config(msg)) => {
            assert!(msg.contains("No input file"));
        }
        _ => panic!("Expected Config error"),
    }
}

#[test]
fn test_validation_output_overwrites_input() {
    let mut options = ImpositionOptions::new("book.pdf");
    options.output = Some(PathBuf::from("book.pdf"));
    assert!(matches!(options.validate(), Err(ImposeError::Config(_))));

    options.output = None;
    assert!(options.validate().is_ok());
}

#[test]
fn test_validation_checks_sheet_settings() {
    let mut options = ImpositionOptions::new("book.pdf");
    options.sheet.dec_line_coef = -0.1;
    assert!(matches!(options.validate(), Err(ImposeError::Config(_))));
}

#[test]
fn test_default_output_path() {
    assert_eq!(
        default_output_path(Path::new("book.pdf")),
        PathBuf::from("book-impose.pdf")
    );
    assert_eq!(
        default_output_path(Path::new("/tmp/out/novel.PDF")),
        PathBuf::from("/tmp/out/novel-impose.PDF")
    );
    assert_eq!(
        default_output_path(Path::new("notes")),
        PathBuf::from("notes-impose.pdf")
    );

    let mut options = ImpositionOptions::new("book.pdf");
    assert_eq!(options.output_path(), PathBuf::from("book-impose.pdf"));
    options.output = Some(PathBuf::from("print.pdf"));
    assert_eq!(options.output_path(), PathBuf::from("print.pdf"));
}

#[test]
fn test_overrides_only_touch_set_fields() {
    let base = SheetSettings {
        int_margin: 3.0,
        ..Default::default()
    };
    let overrides = SheetOverrides {
        global_w: Some(842.0),
        global_h: Some(595.0),
        dec_color: Some(Rgb::BLUE),
        dec_keep_overflow: Some(false),
        debug: Some(true),
        ..Default::default()
    };

    let settings = base.with_overrides(&overrides);
    assert_eq!(settings.global_w, 842.0);
    assert_eq!(settings.global_h, 595.0);
    assert_eq!(settings.dec_color, Rgb::BLUE);
    assert!(!settings.dec_keep_overflow);
    assert!(settings.debug);
    assert_eq!(settings.int_margin, 3.0);
    assert_eq!(settings.dec_margin, base.dec_margin);

    assert_eq!(base.with_overrides(&SheetOverrides::default()), base);
}

#[test]
fn test_config_accessors_follow_settings() {
    let config = SheetSettings {
        global_w: 600.0,
        ext_margin: 1.0,
        dec_line_coef: 0.5,
        ..Default::default()
    }
    .validate()
    .unwrap();

    assert_eq!(config.global_w(), 600.0);
    assert_eq!(config.sheet_size(), PageSize::new(600.0, 842.0));
    assert_eq!(config.ext_margin(), 1.0);
    assert_eq!(config.dec_line_coef(), 0.5);
    assert_eq!(config.settings().global_w, 600.0);
    assert!(SheetConfig::try_from(SheetSettings {
        nb_h: 0,
        ..Default::default()
    })
    .is_err());
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_save_and_load_options() {
    use tempfile::NamedTempFile;

    let mut options = ImpositionOptions::new("input.pdf");
    options.output = Some(PathBuf::from("output.pdf"));
    options.keep_last = 1;
    options.folding = FoldingScheme::Alternate;
    options.sheet.dec_color = Rgb(200, 10, 10);
    options.sheet.debug = true;
    options.template_output = Some(PathBuf::from("template.pdf"));

    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    // Save
    options.save(path).await.unwrap();

    // Load
    let loaded = ImpositionOptions::load(path).await.unwrap();
    assert_eq!(loaded, options);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_partial_config_uses_defaults() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(
        temp_file.path(),
        r#"{ "input": "book.pdf", "sheet": { "global_w": 842.0 } }"#,
    )
    .unwrap();

    let loaded = ImpositionOptions::load(temp_file.path()).await.unwrap();
    assert_eq!(loaded.input, PathBuf::from("book.pdf"));
    assert_eq!(loaded.keep_last, 0);
    assert_eq!(loaded.folding, FoldingScheme::NaturalOrder);
    assert_eq!(loaded.sheet.global_w, 842.0);
    assert_eq!(loaded.sheet.global_h, SheetSettings::default().global_h);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_load_invalid_json() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), "{ not json").unwrap();

    let result = ImpositionOptions::load(temp_file.path()).await;
    assert!(matches!(result, Err(ImposeError::Config(_))));
}

use crate::constants::*;
use crate::layout::FoldingScheme;
use crate::types::*;
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// User-facing sheet settings, all lengths in points.
///
/// This is the raw, editable form; call [`SheetSettings::validate`] to obtain
/// the immutable [`SheetConfig`] the layout engine works from.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SheetSettings {
    /// Output sheet width
    pub global_w: f32,
    /// Output sheet height
    pub global_h: f32,
    /// Internal margin framing each page-pair
    pub int_margin: f32,
    /// External margin at the sheet edge
    pub ext_margin: f32,
    /// Crop-mark band between cells and along the outer edges
    pub dec_margin: f32,
    /// Fraction of each crop-mark stroke left blank at both ends
    pub dec_line_coef: f32,
    /// Crop-mark colour
    pub dec_color: Rgb,
    /// Fold the fitting slack into the margin framed by the crop marks
    pub dec_keep_overflow: bool,
    /// Page-pair columns per sheet
    pub nb_w: usize,
    /// Rows per sheet
    pub nb_h: usize,
    /// Draw alignment guides on the template
    pub debug: bool,
}

impl Default for SheetSettings {
    fn default() -> Self {
        Self {
            global_w: DEFAULT_SHEET_WIDTH_PT,
            global_h: DEFAULT_SHEET_HEIGHT_PT,
            int_margin: mm_to_pt(DEFAULT_INT_MARGIN_MM),
            ext_margin: mm_to_pt(DEFAULT_EXT_MARGIN_MM),
            dec_margin: mm_to_pt(DEFAULT_DEC_MARGIN_MM),
            dec_line_coef: DEFAULT_DEC_LINE_COEF,
            dec_color: Rgb::BLACK,
            dec_keep_overflow: true,
            nb_w: DEFAULT_GRID_COLUMNS,
            nb_h: DEFAULT_GRID_ROWS,
            debug: false,
        }
    }
}

impl SheetSettings {
    /// Check the settings and freeze them into a [`SheetConfig`]
    pub fn validate(&self) -> Result<SheetConfig> {
        for (name, value) in [("global_w", self.global_w), ("global_h", self.global_h)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ImposeError::Config(format!(
                    "{} must be a positive length, got {}",
                    name, value
                )));
            }
        }

        for (name, value) in [
            ("int_margin", self.int_margin),
            ("ext_margin", self.ext_margin),
            ("dec_margin", self.dec_margin),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ImposeError::Config(format!(
                    "{} must be a non-negative length, got {}",
                    name, value
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.dec_line_coef) {
            return Err(ImposeError::Config(format!(
                "dec_line_coef must be within [0, 1], got {}",
                self.dec_line_coef
            )));
        }

        if self.nb_w == 0 || self.nb_h == 0 {
            return Err(ImposeError::Config(format!(
                "Grid must have at least one cell, got {}x{}",
                self.nb_w, self.nb_h
            )));
        }

        Ok(SheetConfig { settings: *self })
    }

    /// Apply the overrides that are set, leaving the other fields untouched
    pub fn with_overrides(mut self, overrides: &SheetOverrides) -> Self {
        if let Some(v) = overrides.global_w {
            self.global_w = v;
        }
        if let Some(v) = overrides.global_h {
            self.global_h = v;
        }
        if let Some(v) = overrides.int_margin {
            self.int_margin = v;
        }
        if let Some(v) = overrides.ext_margin {
            self.ext_margin = v;
        }
        if let Some(v) = overrides.dec_margin {
            self.dec_margin = v;
        }
        if let Some(v) = overrides.dec_line_coef {
            self.dec_line_coef = v;
        }
        if let Some(v) = overrides.dec_color {
            self.dec_color = v;
        }
        if let Some(v) = overrides.dec_keep_overflow {
            self.dec_keep_overflow = v;
        }
        if let Some(v) = overrides.debug {
            self.debug = v;
        }
        self
    }
}

/// Optional replacements for [`SheetSettings`] fields, typically from the command line
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SheetOverrides {
    pub global_w: Option<f32>,
    pub global_h: Option<f32>,
    pub int_margin: Option<f32>,
    pub ext_margin: Option<f32>,
    pub dec_margin: Option<f32>,
    pub dec_line_coef: Option<f32>,
    pub dec_color: Option<Rgb>,
    pub dec_keep_overflow: Option<bool>,
    pub debug: Option<bool>,
}

/// Validated, immutable sheet configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetConfig {
    settings: SheetSettings,
}

impl SheetConfig {
    pub fn global_w(&self) -> f32 {
        self.settings.global_w
    }

    pub fn global_h(&self) -> f32 {
        self.settings.global_h
    }

    pub fn sheet_size(&self) -> PageSize {
        PageSize::new(self.settings.global_w, self.settings.global_h)
    }

    pub fn int_margin(&self) -> f32 {
        self.settings.int_margin
    }

    pub fn ext_margin(&self) -> f32 {
        self.settings.ext_margin
    }

    pub fn dec_margin(&self) -> f32 {
        self.settings.dec_margin
    }

    pub fn dec_line_coef(&self) -> f32 {
        self.settings.dec_line_coef
    }

    pub fn dec_color(&self) -> Rgb {
        self.settings.dec_color
    }

    pub fn dec_keep_overflow(&self) -> bool {
        self.settings.dec_keep_overflow
    }

    pub fn nb_w(&self) -> usize {
        self.settings.nb_w
    }

    pub fn nb_h(&self) -> usize {
        self.settings.nb_h
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.settings.nb_w, self.settings.nb_h)
    }

    pub fn debug(&self) -> bool {
        self.settings.debug
    }

    /// The settings this configuration was validated from
    pub fn settings(&self) -> &SheetSettings {
        &self.settings
    }

    /// Dump the configuration at debug level
    pub fn log(&self) {
        log::debug!(
            "Sheet      : {} x {} pt",
            self.global_w(),
            self.global_h()
        );
        log::debug!("Margin INT : {} pt", self.int_margin());
        log::debug!(
            "Margin DEC : {} pt @ {}/100",
            self.dec_margin(),
            self.dec_line_coef() * 100.0
        );
        log::debug!("Margin EXT : {} pt", self.ext_margin());
        log::debug!("Grid       : {} x {}", self.nb_w(), self.nb_h());
        log::debug!("Overflow   : {}", self.dec_keep_overflow());
        log::debug!("Debug      : {}", self.debug());
    }
}

impl TryFrom<SheetSettings> for SheetConfig {
    type Error = ImposeError;

    fn try_from(settings: SheetSettings) -> Result<Self> {
        settings.validate()
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            settings: SheetSettings::default(),
        }
    }
}

/// Complete configuration of one imposition run
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ImpositionOptions {
    // Input
    pub input: PathBuf,

    // Output; derived from the input when unset
    pub output: Option<PathBuf>,

    // Number of source pages kept as the last pages of the book
    pub keep_last: usize,

    // Folding table
    pub folding: FoldingScheme,

    // Sheet geometry and marks
    pub sheet: SheetSettings,

    // Where to also write the rendered template sheet
    pub template_output: Option<PathBuf>,
}

impl ImpositionOptions {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..Default::default()
        }
    }

    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| ImposeError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ImposeError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// The output file: explicit, or the input with `-impose` before the extension
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input))
    }

    /// Validate the options, returning the frozen sheet configuration
    pub fn validate(&self) -> Result<SheetConfig> {
        if self.input.as_os_str().is_empty() {
            return Err(ImposeError::Config("No input file specified".to_string()));
        }

        if self.output_path() == self.input {
            return Err(ImposeError::Config(format!(
                "Output would overwrite the input file {}",
                self.input.display()
            )));
        }

        self.sheet.validate()
    }
}

/// `book.pdf` -> `book-impose.pdf`; an input without extension gets `.pdf`
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pdf".to_string());
    input.with_file_name(format!("{}-impose.{}", stem, extension))
}

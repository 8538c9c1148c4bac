use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use hackimpose::{FoldingScheme, ImpositionOptions, ImpositionStatistics, Rgb, SheetOverrides};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "hackimposition",
    about = "Impose a PDF into 16-page signatures, 4 page-pairs per sheet",
    version
)]
struct Cli {
    /// PDF file to process
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output file (default: input with -impose before the extension)
    #[arg(short = 'o', long = "outfile", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Number of pages to keep as last pages, e.g. to keep the back cover last
    #[arg(short = 'l', long = "last", value_name = "N")]
    last: Option<usize>,

    /// Output sheet width in points
    #[arg(short = 'W', long)]
    global_w: Option<f32>,

    /// Output sheet height in points
    #[arg(short = 'H', long)]
    global_h: Option<f32>,

    /// Internal margin in points
    #[arg(short = 'I', long)]
    int_margin: Option<f32>,

    /// External margin in points
    #[arg(short = 'E', long)]
    ext_margin: Option<f32>,

    /// Margin for the cutting guides in points
    #[arg(short = 'd', long)]
    dec_margin: Option<f32>,

    /// Fraction of each cutting guide left blank at both ends, in [0, 1]
    #[arg(long)]
    dec_line_coef: Option<f32>,

    /// Cutting guide colour as R,G,B
    #[arg(long, value_name = "R,G,B")]
    dec_color: Option<Rgb>,

    /// Add the surplus margin to the internal margin
    #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
    dec_keep_overflow: Option<bool>,

    /// Draw the layout guides in the template
    #[arg(long)]
    display_debug: bool,

    /// Folding table
    #[arg(long, value_enum)]
    folding: Option<FoldingArg>,

    /// Read options from a JSON file; command line flags take precedence
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the effective options to a JSON file
    #[arg(long, value_name = "FILE")]
    save_config: Option<PathBuf>,

    /// Also write the template sheet as a one-page PDF
    #[arg(long, value_name = "FILE")]
    template: Option<PathBuf>,

    /// Show statistics only, don't generate PDF
    #[arg(long)]
    stats_only: bool,

    /// Verbose mode (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum FoldingArg {
    Natural,
    Alternate,
}

impl From<FoldingArg> for FoldingScheme {
    fn from(arg: FoldingArg) -> Self {
        match arg {
            FoldingArg::Natural => Self::NaturalOrder,
            FoldingArg::Alternate => Self::Alternate,
        }
    }
}

impl Cli {
    fn overrides(&self) -> SheetOverrides {
        SheetOverrides {
            global_w: self.global_w,
            global_h: self.global_h,
            int_margin: self.int_margin,
            ext_margin: self.ext_margin,
            dec_margin: self.dec_margin,
            dec_line_coef: self.dec_line_coef,
            dec_color: self.dec_color,
            dec_keep_overflow: self.dec_keep_overflow,
            debug: self.display_debug.then_some(true),
        }
    }

    /// Options from the config file (or defaults) with the flags applied
    async fn options(&self) -> Result<ImpositionOptions> {
        let mut options = match &self.config {
            Some(path) => ImpositionOptions::load(path)
                .await
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => ImpositionOptions::default(),
        };

        options.input = self.input.clone();
        if let Some(output) = &self.output {
            options.output = Some(output.clone());
        }
        if let Some(last) = self.last {
            options.keep_last = last;
        }
        if let Some(folding) = self.folding {
            options.folding = folding.into();
        }
        if let Some(template) = &self.template {
            options.template_output = Some(template.clone());
        }
        options.sheet = options.sheet.with_overrides(&self.overrides());

        Ok(options)
    }
}

fn print_statistics(stats: &ImpositionStatistics) {
    println!("Imposition Statistics:");
    println!("  Source pages: {}", stats.source_pages);
    println!("  Logical pages: {}", stats.logical_pages);
    println!("  Blank pages added: {}", stats.blank_pages_added);
    println!("  Signatures: {}", stats.signatures);
    println!("  Output sheets: {}", stats.output_sheets);
    println!("  Empty slots: {}", stats.empty_slots);
    println!("  Scale: {:.4}", stats.scale);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    let options = cli.options().await?;
    options.validate().context("Invalid options")?;

    if let Some(path) = &cli.save_config {
        options
            .save(path)
            .await
            .with_context(|| format!("Failed to save config: {}", path.display()))?;
        log::info!("Saved options to {}", path.display());
    }

    if cli.stats_only {
        let source = hackimpose::load_pdf(&options.input)
            .await
            .with_context(|| format!("Failed to read input file: {}", options.input.display()))?;
        let stats = hackimpose::calculate_statistics(&source, &options)?;
        print_statistics(&stats);
        return Ok(());
    }

    let report = hackimpose::impose_file(&options)
        .await
        .with_context(|| format!("Failed to impose {}", options.input.display()))?;

    print_statistics(&report.statistics);
    println!("Imposed → {}", report.output.display());
    if let Some(template) = &report.template_output {
        println!("Template → {}", template.display());
    }

    Ok(())
}

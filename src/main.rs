//! mediasheet - compile media-query style sheets for a viewport

use std::fs;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::filter::LevelFilter;

use mediasheet::style::Specificity;
use mediasheet::{
    MediaContext, PropertyDictionary, StyleSheet, StyleSheetContainer, ToCss, ViewportSize,
};

#[derive(Parser)]
#[command(name = "mediasheet")]
#[command(version, about = "Compile media-query style sheets for a viewport", long_about = None)]
#[command(after_help = "EXAMPLES:
    mediasheet style.css --width 1280 --height 800             Rules for a desktop window
    mediasheet style.css --width 360 --height 640 --dp-ratio 3 Rules for a phone
    mediasheet style.css --override user.css -W 800 -H 600     Apply user overrides")]
struct Cli {
    /// Style sheets, loaded in order
    #[arg(value_name = "FILE", required = true)]
    files: Vec<String>,

    /// Style sheet layered on top of the loaded ones
    #[arg(long = "override", value_name = "FILE")]
    override_file: Option<String>,

    /// Viewport width in pixels
    #[arg(short = 'W', long)]
    width: f32,

    /// Viewport height in pixels
    #[arg(short = 'H', long)]
    height: f32,

    /// Device pixels per CSS pixel
    #[arg(short, long, default_value_t = 1.0)]
    dp_ratio: f32,

    /// Print the compiled rules as JSON
    #[arg(long)]
    json: bool,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct Output<'a> {
    context: MediaContext,
    media_blocks: usize,
    rules: Vec<RuleOutput<'a>>,
}

#[derive(Serialize)]
struct RuleOutput<'a> {
    selector: &'a str,
    specificity: Specificity,
    properties: &'a PropertyDictionary,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let mut container = StyleSheetContainer::new();
    for path in &cli.files {
        load(&mut container, path)?;
    }

    let mut container = match &cli.override_file {
        Some(path) => {
            let mut overrides = StyleSheetContainer::new();
            load(&mut overrides, path)?;
            container.combine(&overrides)
        }
        None => container,
    };

    let media_blocks = container.media_blocks().len();
    let viewport = ViewportSize::new(cli.width, cli.height);
    let sheet = container.compiled_style_sheet(viewport, cli.dp_ratio);

    if cli.json {
        let output = Output {
            context: MediaContext::new(viewport, cli.dp_ratio),
            media_blocks,
            rules: rule_outputs(sheet),
        };
        let json = serde_json::to_string_pretty(&output).map_err(|e| e.to_string())?;
        println!("{json}");
    } else {
        print!("{}", sheet.to_css_string());
    }

    Ok(())
}

fn load(container: &mut StyleSheetContainer, path: &str) -> Result<(), String> {
    let source = fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
    container
        .load_style_sheet_container(&source, 1)
        .map_err(|e| format!("{path}: {e}"))?;
    Ok(())
}

fn rule_outputs(sheet: &StyleSheet) -> Vec<RuleOutput<'_>> {
    sheet
        .rules()
        .iter()
        .map(|rule| RuleOutput {
            selector: rule.selector_text(),
            specificity: rule.specificity(),
            properties: rule.properties(),
        })
        .collect()
}

//! # TextFill CLI
//!
//! Usage:
//!   textfill scene.json -o report.json
//!   echo '{ ... }' | textfill
//!   textfill --example > scene.json
//!   textfill scene.json --debug

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use textfill::{fit_scene, FitError, Scene};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print!("{}", example_scene_json());
        return;
    }

    let debug = args.iter().any(|a| a == "--debug");
    let level = if debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), level))),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let input = match read_input(&args) {
        Ok(input) => input,
        Err(e) => {
            error!("failed to read input: {e}");
            process::exit(1);
        }
    };

    let output_path = args
        .windows(2)
        .find(|w| w[0] == "-o")
        .map(|w| w[1].clone());

    let report = match run(&input, debug) {
        Ok(report) => report,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(&path, &report) {
                error!("failed to write {path}: {e}");
                process::exit(1);
            }
            info!("written {} bytes to {path}", report.len());
        }
        None => println!("{report}"),
    }
}

/// Input file from the first positional argument, else stdin.
fn read_input(args: &[String]) -> io::Result<String> {
    match args.get(1).filter(|a| !a.starts_with('-')) {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn run(input: &str, debug: bool) -> Result<String, FitError> {
    let mut scene: Scene = serde_json::from_str(input)?;
    if debug {
        scene.options.debug = Some(true);
    }
    let report = fit_scene(&scene)?;
    info!(
        fitted = report.fit.fitted().count(),
        failed = report.fit.failed().count(),
        "fit complete"
    );
    serde_json::to_string_pretty(&report).map_err(FitError::Report)
}

fn example_scene_json() -> &'static str {
    r##"{
  "viewport": { "width": 800, "height": 600 },
  "body": [
    {
      "tag": "div",
      "attributes": { "class": "headline" },
      "style": { "width": "600px", "height": "120px" },
      "children": [
        { "tag": "span", "children": [{ "text": "Quarterly results beat expectations" }] }
      ]
    },
    {
      "tag": "div",
      "attributes": { "class": "headline" },
      "style": { "width": "240px", "height": "60px" },
      "children": [
        {
          "tag": "span",
          "style": { "line-height": "1.5", "letter-spacing": "1px" },
          "children": [{ "text": "Markets rally" }]
        }
      ]
    },
    {
      "tag": "div",
      "attributes": { "class": "headline" },
      "style": { "height": "80px" },
      "children": [
        { "tag": "span", "children": [{ "text": "Full width banner" }] }
      ]
    }
  ],
  "target": ".headline",
  "options": {
    "minFontPixels": 8,
    "maxFontPixels": 0,
    "changeLineHeight": true,
    "autoResize": true
  },
  "resizeTo": { "width": 400, "height": 600 }
}"##
}

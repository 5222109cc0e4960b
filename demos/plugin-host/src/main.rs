//! Plugin Host Example
//!
//! Loads the validators configured in a Weft configuration file and runs
//! each input through them.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package weft-plugin-host -- --config demos/plugin-host/weft.yaml "hello" "buy spam"
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use weft::prelude::*;
use weft_demo_validators::{Validator, word_service};

#[derive(Parser, Debug)]
#[command(author, version, about = "Load validator plugins and check input")]
struct Args {
    /// Configuration file (TOML or YAML).
    #[arg(short, long, default_value = "weft.yaml")]
    config: PathBuf,

    /// Configuration profile.
    #[arg(short, long)]
    profile: Option<String>,

    /// Words rejected by the blocklist validator.
    #[arg(long = "block", default_values_t = ["spam".to_string(), "scam".to_string()])]
    blocked: Vec<String>,

    /// Inputs to validate.
    inputs: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut builder = PluginRuntime::builder()
        .config_file(&args.config)
        .service(word_service(args.blocked.iter().cloned()));
    if let Some(profile) = &args.profile {
        builder = builder.profile(profile);
    }
    let runtime = builder.build()?;

    let validators = runtime.load::<dyn Validator>();
    info!(stats = %validators.report.stats(), "Validators loaded");

    println!("Loaded validators:");
    for plugin in &validators.plugins {
        println!("  {:<12} {} ({})", plugin.name(), plugin.type_name(), plugin.origin());
    }
    if !validators.report.is_clean() {
        println!("Failures:");
        for failure in validators.report.failures() {
            println!("  {failure}");
        }
    }
    println!("{}", validators.report.stats());

    let validators = validators.into_plugins();
    for input in &args.inputs {
        let rejections: Vec<String> = validators
            .iter()
            .filter_map(|v| v.validate(input).err().map(|why| format!("{}: {why}", v.name())))
            .collect();

        if rejections.is_empty() {
            println!("ok      {input:?}");
        } else {
            println!("reject  {input:?}");
            for rejection in rejections {
                println!("          {rejection}");
            }
        }
    }

    Ok(())
}

#[cfg(dummy)] // Needed for IntelliJ autocomplete
extern crate tater_meta as meta;
#[cfg(dummy)]
extern crate tater_muxins as muxins;
#[macro_use]
extern crate clap;
extern crate failure;
extern crate serde_json;
extern crate env_logger;

use std::fs::File;
use std::path::Path;

use failure::{Error, format_err};
use log::info;

use meta::Snapshot;
use muxins::{Muxins, MuxinsConfig, MixinClass, TransformReport};

fn app() -> clap::App<'static, 'static> {
    clap_app!(muxins =>
        (version: crate_version!())
        (author: crate_authors!())
        (about: crate_description!())
        (@arg env: --env +takes_value +required "The environment snapshot to evaluate constraints against")
        (@arg config: --config +takes_value "The muxins config, listing mixin packages and disabled mixins")
        (@arg verbose: -v --verbose "Log every skipped mixin and failed constraint")
        (@arg json: --json "Print the transform reports as JSON")
        (@arg classes: +required +multiple "Files containing the mixin classes to check")
    )
}

/// A file holds either a single mixin class or an array of them
fn load_mixins(path: &Path) -> Result<Vec<MixinClass>, Error> {
    let value: serde_json::Value = serde_json::from_reader(File::open(path)?)?;
    Ok(if value.is_array() {
        serde_json::from_value(value)?
    } else {
        vec![serde_json::from_value(value)?]
    })
}

fn main() -> Result<(), Error> {
    ::env_logger::init();
    let matches = app().get_matches();
    let environment = Snapshot::load(Path::new(matches.value_of("env").unwrap()))?;
    let mut config = match matches.value_of("config") {
        Some(path) => MuxinsConfig::load(Path::new(path))?,
        None => MuxinsConfig::default()
    };
    if matches.is_present("verbose") {
        config.verbose = true;
    }
    let mut mixins = Vec::new();
    for path in matches.values_of("classes").unwrap() {
        mixins.extend(load_mixins(Path::new(path))?);
    }
    meta::install(environment)?;
    let muxins = Muxins::global(config)?;
    if muxins.config().mixin_packages.is_empty() {
        for mixin in &mixins {
            muxins.bootstrap(&mixin.mixin_package, muxins.config().verbose);
        }
    }
    let mut applied = Vec::with_capacity(mixins.len());
    let mut skipped = Vec::new();
    for mixin in mixins {
        if muxins.should_apply_mixin(&mixin.node)? {
            applied.push(mixin);
        } else {
            skipped.push(mixin.node.class_name());
        }
    }
    info!("Applying {} mixins, skipping {}", applied.len(), skipped.len());
    let mut reports = Vec::new();
    let mut failed = 0;
    for result in muxins.pre_apply(&mut applied) {
        match result {
            Ok(report) => reports.push(report),
            Err(error) => {
                eprintln!("{}", error);
                failed += 1;
            }
        }
    }
    if matches.is_present("json") {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for name in &skipped {
            println!("skipped {}", name);
        }
        for report in &reports {
            print_report(report);
        }
    }
    if failed > 0 {
        return Err(format_err!("{} mixins failed to transform", failed))
    }
    Ok(())
}

fn print_report(report: &TransformReport) {
    if report.applied {
        println!("applied {}", report.class_name);
    } else {
        println!("skipped {}", report.class_name);
    }
    for member in &report.removed {
        println!("  stripped {}", member);
    }
}

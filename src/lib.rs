// src/lib.rs

pub mod cli;
pub mod config;
pub mod digest;
pub mod errors;
pub mod format;
pub mod fs;
pub mod logging;
pub mod plan;
pub mod preset;
pub mod role;
pub mod types;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, error, info, warn};

use crate::cli::{CliArgs, Command, EnvArgs, RenderArgs, ValidateArgs};
use crate::config::{DescriptorSet, discover, load_and_validate};
use crate::format::Format;
use crate::fs::{FileSystem, RealFileSystem};
use crate::plan::LaunchPlan;
use crate::preset::PresetOptions;

/// High-level entry point used by `main.rs`.
pub fn run(args: CliArgs) -> Result<()> {
    match args.command {
        Command::Validate(v) => run_validate(&v),
        Command::Show { path } => run_show(&path),
        Command::Render(r) => run_render(&r),
        Command::Env(e) => run_env(&e),
        Command::Digest { path } => {
            let set = load_and_validate(&path)?;
            println!("{}", digest::digest(&set)?);
            Ok(())
        }
    }
}

fn run_validate(args: &ValidateArgs) -> Result<()> {
    let mut paths: Vec<PathBuf> = args.paths.clone();
    if let Some(dir) = &args.dir {
        let found = discover(&RealFileSystem, dir, &args.pattern)?;
        info!(dir = %dir.display(), count = found.len(), "discovered descriptor files");
        paths.extend(found);
    }

    if paths.is_empty() {
        bail!("nothing to validate: pass descriptor paths or --dir");
    }

    let mut failed = 0usize;
    for path in &paths {
        match load_and_validate(path) {
            Ok(set) => println!("ok    {} ({} apps)", path.display(), set.len()),
            Err(err) => {
                failed += 1;
                error!(path = %path.display(), error = %err, "descriptor failed validation");
                println!("FAIL  {}: {err}", path.display());
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} descriptor files failed validation", paths.len());
    }
    Ok(())
}

fn run_show(path: &Path) -> Result<()> {
    let set = load_and_validate(path)?;
    let plan = LaunchPlan::new(&set, &BTreeMap::new())?;
    print_summary(path, &set, &plan)?;
    Ok(())
}

fn run_render(args: &RenderArgs) -> Result<()> {
    let set = match (&args.preset, &args.from) {
        (Some(preset), _) => {
            let mut options = PresetOptions::default();
            if let Some(entry_point) = &args.entry_point {
                options.entry_point = entry_point.clone();
            }
            if let Some(tier) = &args.tier {
                options.tier = tier.clone();
            }
            options.build(*preset)?
        }
        (None, Some(from)) => load_and_validate(from)?,
        (None, None) => bail!("pass --preset or --from"),
    };

    let format = match (args.format, &args.output) {
        (Some(format), _) => format,
        (None, Some(output)) => Format::from_path(output)?,
        (None, None) => Format::Js,
    };
    let text = format.render(&set.into_raw())?;

    match &args.output {
        Some(output) => {
            RealFileSystem.write(output, text.as_bytes())?;
            info!(path = %output.display(), %format, "wrote descriptor set");
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn run_env(args: &EnvArgs) -> Result<()> {
    let set = load_and_validate(&args.path)?;
    let spec = set.app(&args.app)?;

    let base = if args.inherit {
        inherited_env()
    } else {
        BTreeMap::new()
    };

    let plan = LaunchPlan::new(&set, &base)?;
    let process = plan
        .for_app(&args.app)
        .find(|p| p.instance == args.instance)
        .ok_or_else(|| {
            anyhow!(
                "app '{}' has {} instance(s); --instance {} is out of range",
                args.app,
                spec.instances,
                args.instance
            )
        })
        .with_context(|| format!("resolving environment in {}", args.path.display()))?;

    for (key, value) in &process.env {
        println!("{key}={value}");
    }
    Ok(())
}

/// The caller's environment, minus variables that are not valid UTF-8.
fn inherited_env() -> BTreeMap<String, String> {
    std::env::vars_os()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                let key = key.unwrap_or_else(|raw| raw.to_string_lossy().into_owned());
                warn!(%key, "skipping inherited variable that is not valid UTF-8");
                None
            }
        })
        .collect()
}

fn print_summary(path: &Path, set: &DescriptorSet, plan: &LaunchPlan) -> Result<()> {
    println!("launchset show");
    println!("  path = {}", path.display());
    println!("  entry_point = {}", set.entry_point().display());
    println!();

    println!("apps ({}):", set.len());
    for app in set.apps() {
        println!("  - {}", app.name);
        println!("      role: {}", app.role()?);
        println!("      exec_mode: {}", app.exec_mode);
        println!("      instances: {}", app.instances);
        if let Some(ceiling) = &app.max_memory_restart {
            println!("      max_memory_restart: {ceiling} ({} bytes)", ceiling.bytes());
        }
        if app.watch {
            println!("      watch: true");
        }
        if !app.env.is_empty() {
            println!("      env:");
            for (key, value) in &app.env {
                println!("        {key}={value}");
            }
        }
    }
    println!();
    println!(
        "plan: {} processes, memory budget {} bytes",
        plan.process_count(),
        plan.memory_budget()
    );

    debug!("show complete");
    Ok(())
}

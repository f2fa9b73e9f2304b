//! Command-line interface for asset model generation.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use assetgen_core::config::{self, defaults};
use assetgen_core::{
    generate_all, load_tag_groups_from_dir, load_thing_classes_from_dir, project, ExportOptions,
    IotType, MapperConfig, RetryPolicy, TagGroupRegistry, ThingClassRegistry, ThingMapper,
    UnsupportedTagPolicy,
};
use clap::{Args as ClapArgs, Parser, Subcommand};

/// Assetgen - Generate asset models from IoT thing classes.
#[derive(Parser, Debug)]
#[command(name = "assetgen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Action to perform.
    #[command(subcommand)]
    command: Command,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    log_json: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one asset model file per thing class.
    Generate {
        #[command(flatten)]
        sources: Sources,
        /// Output root directory; files land in <output>/<context>/<name>.json.
        #[arg(short, long, default_value = defaults::OUTPUT_DIR)]
        output: PathBuf,
        /// Pretty-print the JSON documents.
        #[arg(long)]
        pretty: bool,
        #[command(flatten)]
        mapping: MappingArgs,
    },
    /// Print the asset model of a single thing class.
    Show {
        #[command(flatten)]
        sources: Sources,
        /// Thing class name.
        #[arg(short, long)]
        thing: String,
        #[command(flatten)]
        mapping: MappingArgs,
    },
    /// Print the output data type of a native tag kind.
    Project {
        /// Native kind, e.g. FLOAT32 or INT16_SEQ.
        kind: String,
    },
}

/// Definition directories.
#[derive(ClapArgs, Debug)]
struct Sources {
    /// Directory of tag group JSON files.
    #[arg(long = "tag-groups", visible_alias = "tg")]
    tag_groups: PathBuf,
    /// Directory of thing class JSON files.
    #[arg(long = "thing-classes", visible_alias = "tc")]
    thing_classes: PathBuf,
}

/// Mapping overrides (fall back to ASSETGEN_* environment variables).
#[derive(ClapArgs, Debug)]
struct MappingArgs {
    /// Keep tags with unsupported types (emitted with a null dataType).
    #[arg(long)]
    keep_unsupported: bool,
    /// Lookup attempts per tag group.
    #[arg(long)]
    retry_attempts: Option<u32>,
    /// Delay between lookup attempts in milliseconds.
    #[arg(long)]
    retry_delay_ms: Option<u64>,
}

impl MappingArgs {
    fn mapper_config(&self) -> MapperConfig {
        let env = config::mapper_config_from_env();
        let retry = RetryPolicy::new(
            self.retry_attempts.unwrap_or(env.retry.max_attempts),
            self.retry_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(env.retry.delay),
        );
        let unsupported = if self.keep_unsupported {
            UnsupportedTagPolicy::Keep
        } else {
            env.unsupported
        };
        MapperConfig { retry, unsupported }
    }
}

fn init_logging(verbose: bool, json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            tracing_subscriber::EnvFilter::new("assetgen=debug")
        } else {
            tracing_subscriber::EnvFilter::new(defaults::LOG_FILTER)
                .add_directive(tracing::Level::WARN.into())
        }
    });

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.log_json || config::log_json());

    let result = match args.command {
        Command::Generate {
            sources,
            output,
            pretty,
            mapping,
        } => run_generate(&sources, &output, pretty, &mapping),
        Command::Show {
            sources,
            thing,
            mapping,
        } => run_show(&sources, &thing, &mapping),
        Command::Project { kind } => run_project(&kind),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Load both definition directories into fresh registries.
fn load_sources(sources: &Sources) -> Result<(TagGroupRegistry, ThingClassRegistry)> {
    let tag_groups = TagGroupRegistry::new();
    let report = load_tag_groups_from_dir(&tag_groups, &sources.tag_groups)
        .with_context(|| format!("Failed to load tag groups from {}", sources.tag_groups.display()))?;
    tracing::info!(
        "Loaded {} tag groups ({} files skipped)",
        report.loaded,
        report.failed.len()
    );

    let thing_classes = ThingClassRegistry::new();
    let report = load_thing_classes_from_dir(&thing_classes, &sources.thing_classes)
        .with_context(|| {
            format!(
                "Failed to load thing classes from {}",
                sources.thing_classes.display()
            )
        })?;
    tracing::info!(
        "Loaded {} thing classes ({} files skipped)",
        report.loaded,
        report.failed.len()
    );

    Ok((tag_groups, thing_classes))
}

fn run_generate(
    sources: &Sources,
    output: &Path,
    pretty: bool,
    mapping: &MappingArgs,
) -> Result<ExitCode> {
    let (tag_groups, thing_classes) = load_sources(sources)?;
    let options = ExportOptions {
        mapper: mapping.mapper_config(),
        pretty,
    };

    let summary = generate_all(&thing_classes, &tag_groups, output, &options);

    println!("Thing Classes");
    println!("_____________");
    for outcome in &summary.outcomes {
        match &outcome.result {
            Ok(path) => println!("    {} -> {}", outcome.thing, path.display()),
            Err(e) => println!("    {} FAILED: {}", outcome.thing, e),
        }
    }

    if summary.has_failures() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn run_show(sources: &Sources, thing_name: &str, mapping: &MappingArgs) -> Result<ExitCode> {
    let (tag_groups, thing_classes) = load_sources(sources)?;
    let thing = thing_classes
        .find(thing_name)
        .with_context(|| format!("Thing class not found: {}", thing_name))?;

    let model = ThingMapper::with_config(&tag_groups, mapping.mapper_config())
        .map_thing(&thing)
        .with_context(|| format!("Failed to map thing class {}", thing_name))?;
    println!("{}", model.to_json(true)?);
    Ok(ExitCode::SUCCESS)
}

fn run_project(kind: &str) -> Result<ExitCode> {
    let native = IotType::from_name(kind);
    match project(native) {
        Some(output) => println!("{} -> {}", native, output),
        None => println!("{} -> unsupported", native),
    }
    Ok(ExitCode::SUCCESS)
}

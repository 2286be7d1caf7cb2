use atty::Stream;
use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use serde_json::Value;
use wheelegg_core::{
    format_status_message, to_json_response, Config, ConvertRequest, ExecutionOutcome,
    GlobalOptions, InspectRequest,
};

mod cli;
mod style;

use cli::{CommandGroupCli, WheelEggCli};
use style::Style;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = WheelEggCli::parse();
    init_tracing(cli.trace, cli.verbose);

    let global = GlobalOptions {
        python: cli.python.clone(),
        platform: cli.platform.clone(),
    };
    let config = Config::from_env(&global);

    let outcome = match &cli.command {
        CommandGroupCli::Inspect(args) => wheelegg_core::inspect(
            &config,
            &InspectRequest {
                wheel: args.wheel.clone(),
                check: args.check,
            },
        ),
        CommandGroupCli::Convert(args) => wheelegg_core::convert(
            &config,
            &ConvertRequest {
                wheel: args.wheel.clone(),
                dest: args.dest.clone(),
                ignore_compat: args.ignore_compat,
            },
        ),
    }
    .map_err(|err| eyre!("{err:?}"))?;
    let code = emit_output(&cli, &outcome)?;

    if code == 0 {
        Ok(())
    } else {
        std::process::exit(code);
    }
}

fn init_tracing(trace: bool, verbose: u8) {
    let level = if trace {
        "trace"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = format!("wheelegg_core={level},wheelegg_domain={level},wheelegg={level}");
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn emit_output(cli: &WheelEggCli, outcome: &ExecutionOutcome) -> Result<i32> {
    let command = cli.command.name();
    if cli.json {
        let payload = to_json_response(command, outcome);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(outcome.exit_code());
    }
    if cli.quiet && outcome.exit_code() == 0 {
        return Ok(0);
    }

    let style = Style::new(cli.no_color, atty::is(Stream::Stdout));
    let message = format_status_message(command, &outcome.message);
    println!("{}", style.status(outcome.status, &message));
    for line in summary_lines(&outcome.details) {
        println!("  {line}");
    }
    if let Some(hint) = outcome.details.get("hint").and_then(Value::as_str) {
        println!("{}", style.info(&format!("Hint: {hint}")));
    }
    Ok(outcome.exit_code())
}

fn summary_lines(details: &Value) -> Vec<String> {
    let mut lines = Vec::new();
    for key in ["egg_name", "egg_dir", "compatible", "wheel_version"] {
        if let Some(value) = details.get(key) {
            let rendered = value
                .as_str()
                .map_or_else(|| value.to_string(), ToString::to_string);
            lines.push(format!("{key}: {rendered}"));
        }
    }
    if let Some(tags) = details.get("tags").and_then(Value::as_array) {
        let tags = tags.iter().filter_map(Value::as_str).collect::<Vec<_>>();
        lines.push(format!("tags: {}", tags.join(", ")));
    }
    if let Some(scripts) = details.get("scripts").and_then(Value::as_array) {
        if !scripts.is_empty() {
            lines.push(format!("scripts: {}", scripts.len()));
        }
    }
    lines
}

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "wheelegg",
    author,
    version,
    about = "Convert Python wheels into egg directories",
    disable_help_subcommand = true
)]
pub struct WheelEggCli {
    #[arg(
        short,
        long,
        help = "Suppress human output for successful commands",
        global = true
    )]
    pub quiet: bool,
    #[arg(short, long, action = ArgAction::Count, help = "Increase logging (-vv reaches trace)", global = true)]
    pub verbose: u8,
    #[arg(long, help = "Force trace logging regardless of -v/-q", global = true)]
    pub trace: bool,
    #[arg(
        long,
        help = "Emit {status,message,details} JSON envelopes",
        global = true
    )]
    pub json: bool,
    #[arg(long, help = "Disable colored human output", global = true)]
    pub no_color: bool,
    #[arg(
        long,
        value_name = "PATH",
        help = "Interpreter to probe for tags and markers (env: WHEELEGG_PYTHON)",
        global = true
    )]
    pub python: Option<String>,
    #[arg(
        long,
        value_name = "PLATFORM",
        help = "Platform descriptor stamped into egg names (env: WHEELEGG_PLATFORM)",
        global = true
    )]
    pub platform: Option<String>,
    #[command(subcommand)]
    pub command: CommandGroupCli,
}

#[derive(Subcommand, Debug)]
pub enum CommandGroupCli {
    #[command(about = "Show what a wheel filename declares")]
    Inspect(InspectArgs),
    #[command(about = "Unpack a wheel into an egg directory")]
    Convert(ConvertArgs),
}

impl CommandGroupCli {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Inspect(_) => "inspect",
            Self::Convert(_) => "convert",
        }
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    #[arg(value_name = "WHEEL")]
    pub wheel: PathBuf,
    #[arg(long, help = "Probe the interpreter and report whether it accepts the wheel")]
    pub check: bool,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    #[arg(value_name = "WHEEL")]
    pub wheel: PathBuf,
    #[arg(
        long,
        value_name = "DIR",
        help = "Egg directory to create (default: next to the wheel, named after the egg)"
    )]
    pub dest: Option<PathBuf>,
    #[arg(long, help = "Convert even when the interpreter does not support the wheel's tags")]
    pub ignore_compat: bool,
}

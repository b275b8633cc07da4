use anyhow::Result;
use clap::Parser as ClapParser;

use cli::command::{Cli, Commands, LogFormat};

mod cli;
mod input;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut env_builder = env_logger::Builder::from_default_env();
    env_builder.filter_level(cli.loglevel.to_level_filter());
    match cli.log_format {
        LogFormat::Plain => {
            env_builder.format_timestamp_secs();
        }
        LogFormat::Json => {
            env_builder.format(|buf, record| {
                use std::io::Write;
                writeln!(
                    buf,
                    "{{\"ts\":{},\"lvl\":\"{}\",\"msg\":\"{}\"}}",
                    buf.timestamp(),
                    record.level(),
                    record.args()
                )
            });
        }
    }
    env_builder.try_init()?;

    match cli.command {
        Commands::Wav2Raw(ref args) => cli::wav2raw::run(args, cli.progress)?,
        Commands::Frame(ref args) => cli::frame::run(args, cli.progress)?,
        Commands::Fftr(ref args) => cli::fftr::run(args, cli.progress)?,
        Commands::Mfcc(ref args) => cli::mfcc::run(args, cli.progress)?,
    }

    Ok(())
}

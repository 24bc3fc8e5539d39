use anyhow::Result;
use clap::Parser;

use ups::cli::{Args, Command};
use ups::commands;
use ups::config::Config;
use ups::logging;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_tracing(args.verbose, args.quiet);

    let config = Config::from_args(&args)?;
    colored::control::set_override(config.show_colors);

    match args.command.clone().unwrap_or_default() {
        Command::List(list_args) => commands::list(&config, &list_args, args.quiet).await,
        Command::Insert {
            name,
            script,
            force,
        } => commands::insert(&config, &name, &script, force),
        Command::Snapshot { names, all } => commands::snapshot(&config, &names, all).await,
        Command::Get { name } => commands::get(&config, &name).await,
        Command::Remove { name } => commands::remove(&config, &name),
    }
}

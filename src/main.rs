use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use colored::Colorize;
use std::path::PathBuf;

// Use modules from the library
use sentinel::commands::{self, Paths};
use sentinel::ui::stats_tui::MAX_WINDOW_MINUTES;

fn build_cli() -> Command {
    Command::new("sentinel")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Watches CPU, RAM, temperature and disk space, alerting on thresholds")
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("Configuration file (defaults to $SENTINEL_CONFIG or the user config dir)")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("history")
                .long("history")
                .value_name("FILE")
                .help("History log (defaults to $SENTINEL_HISTORY or the user data dir)")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("run")
                .about("Start monitoring in the foreground until Ctrl+C")
                .arg(
                    Arg::new("no-notify")
                        .long("no-notify")
                        .help("Log alerts instead of showing desktop notifications")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("now").about("Print a one-shot reading of every metric"))
        .subcommand(
            Command::new("stats")
                .about("Show recorded history as an interactive chart")
                .arg(
                    Arg::new("summary")
                        .short('s')
                        .long("summary")
                        .help("Print min/avg/max per metric instead of the chart")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("minutes")
                        .short('m')
                        .long("minutes")
                        .value_name("N")
                        .help("Window length in minutes")
                        .value_parser(clap::value_parser!(i64).range(1..=MAX_WINDOW_MINUTES))
                        .default_value("60"),
                )
                .arg(
                    Arg::new("metric")
                        .long("metric")
                        .value_name("METRIC")
                        .help("Initial series to show")
                        .value_parser(["cpu", "ram", "temp", "disk"]),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Manage configuration (use 'sentinel config --help' for subcommands)")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("show").about("Print the effective configuration"))
                .subcommand(Command::new("path").about("Print the configuration file path"))
                .subcommand(
                    Command::new("reset")
                        .about("Restore default settings")
                        .arg(
                            Arg::new("yes")
                                .short('y')
                                .long("yes")
                                .help("Skip confirmation")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(
                    Command::new("set")
                        .about("Set a single configuration key")
                        .arg(Arg::new("key").help("Setting name").required(true).index(1))
                        .arg(Arg::new("value").help("New value").required(true).index(2)),
                ),
        )
        .subcommand(
            Command::new("power")
                .about("Sleep, shut down, reboot or log out")
                .arg(
                    Arg::new("action")
                        .help("Action to perform")
                        .required(true)
                        .value_parser(["sleep", "shutdown", "reboot", "logout"])
                        .index(1),
                )
                .arg(
                    Arg::new("yes")
                        .short('y')
                        .long("yes")
                        .help("Skip confirmation")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("touchscreen")
                .about("Enable or disable the touchscreen")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("enable").about("Enable the touchscreen"))
                .subcommand(Command::new("disable").about("Disable the touchscreen")),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(
                    Arg::new("shell")
                        .help("Shell to generate for (bash, zsh, fish, powershell, elvish)")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(Command::new("version").about("Shows version information"))
}

fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    sentinel::init_logging(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("completions", sub_matches)) => {
            let mut cli = build_cli();
            return commands::completions::execute(sub_matches, &mut cli);
        }
        Some(("version", _)) => return commands::version(),
        Some(("power", sub_matches)) => return commands::power::execute(sub_matches),
        _ => {}
    }

    let paths = Paths::from_matches(&matches)?;

    match matches.subcommand() {
        Some(("run", sub_matches)) => commands::run::execute(sub_matches, &paths),
        Some(("now", _)) => commands::now::execute(&paths),
        Some(("stats", sub_matches)) => commands::stats::execute(sub_matches, &paths),
        Some(("config", sub_matches)) => commands::config::handle_config(sub_matches, &paths),
        Some(("touchscreen", sub_matches)) => commands::touchscreen::execute(sub_matches, &paths),
        _ => {
            println!("{}", "Welcome to Sentinel!".cyan().bold());
            println!("Use 'sentinel --help' for more information.");
            Ok(())
        }
    }
}

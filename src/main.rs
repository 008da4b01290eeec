use anyhow::Result;
use clap::{Parser, error::ErrorKind};
use log::LevelFilter;
use std::{env, io::Write};

use rbxbuild::{build, cli, watcher};

fn main() -> Result<()> {
    let raw_args: Vec<String> = env::args().collect();
    let cli = parse_cli(raw_args).unwrap_or_else(|err| err.exit());

    let log_level_filter = cli.verbose.log_level_filter();

    env_logger::Builder::new()
        .format(|buf, record| writeln!(buf, "{}:\n{}", record.level(), record.args()))
        .filter_level(log_level_filter)
        .target(env_logger::fmt::Target::Stdout)
        .init();

    // The 'normal run' mode shows the styled summary lines. If the log level
    // was turned down, never show them.
    let show_progress = log_level_filter == LevelFilter::Info;

    match cli.command {
        cli::Command::Build(build_args) => {
            let settings = build::BuildSettings::from_args(&build_args)?;
            match build::build(&settings, show_progress) {
                Err(e) => {
                    println!("{e:#}");
                    std::process::exit(1)
                }
                Ok(_) => std::process::exit(0),
            }
        }
        cli::Command::Watch(build_args) => {
            let settings = build::BuildSettings::from_args(&build_args)?;
            watcher::start(&settings, show_progress)
        }
    }
}

fn parse_cli(raw_args: Vec<String>) -> Result<cli::Cli, clap::Error> {
    match cli::Cli::try_parse_from(&raw_args) {
        Ok(cli) => Ok(cli),
        Err(err) => {
            if should_default_to_build(&err, &raw_args) {
                let mut fallback_args = raw_args.clone();
                let insert_at = index_after_global_flags(&fallback_args);
                fallback_args.insert(insert_at, "build".into());

                match cli::Cli::try_parse_from(&fallback_args) {
                    Ok(cli) => Ok(cli),
                    Err(fallback_err) => Err(fallback_err),
                }
            } else {
                Err(err)
            }
        }
    }
}

fn should_default_to_build(err: &clap::Error, args: &[String]) -> bool {
    match err.kind() {
        ErrorKind::MissingSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => true,
        ErrorKind::UnknownArgument | ErrorKind::InvalidSubcommand => {
            args.iter().skip(1).any(|arg| !is_global_flag(arg))
        }
        _ => false,
    }
}

fn index_after_global_flags(args: &[String]) -> usize {
    let mut idx = 1;
    while let Some(arg) = args.get(idx) {
        if is_global_flag(arg) {
            idx += 1;
        } else {
            break;
        }
    }
    idx.min(args.len())
}

fn is_global_flag(arg: &str) -> bool {
    matches!(
        arg,
        "-v" | "-vv"
            | "-vvv"
            | "-vvvv"
            | "-q"
            | "-qq"
            | "-qqq"
            | "-qqqq"
            | "--verbose"
            | "--quiet"
            | "-h"
            | "--help"
            | "-V"
            | "--version"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<cli::Cli, clap::Error> {
        parse_cli(args.iter().map(|arg| arg.to_string()).collect())
    }

    #[test]
    fn defaults_to_build_without_args() {
        let cli = parse(&["rbxbuild"]).expect("expected default build command");

        match cli.command {
            cli::Command::Build(build_args) => assert_eq!(build_args.folder, "."),
            other => panic!("expected build command, got {other:?}"),
        }
    }

    #[test]
    fn defaults_to_build_with_folder_shortcut() {
        let cli = parse(&["rbxbuild", "someFolder"]).expect("expected build command");

        match cli.command {
            cli::Command::Build(build_args) => assert_eq!(build_args.folder, "someFolder"),
            other => panic!("expected build command, got {other:?}"),
        }
    }

    #[test]
    fn respects_global_flag_before_subcommand() {
        let cli = parse(&["rbxbuild", "-v", "watch"]).expect("expected watch command");

        assert!(matches!(cli.command, cli::Command::Watch(_)));
    }

    #[test]
    fn help_flag_does_not_default_to_build() {
        let err = parse(&["rbxbuild", "--help"]).expect_err("expected clap help error");
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn version_flag_does_not_default_to_build() {
        let err = parse(&["rbxbuild", "--version"]).expect_err("expected clap version error");
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }
}

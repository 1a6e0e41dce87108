use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use quarry::domain::entities::ROOT_MANIFEST_NAME;

/// Quarry - assemble repositories from versioned template modules
#[derive(Parser, Debug)]
#[command(name = "quarry")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of the project and user configs
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve every module of the manifest and print the result
    Resolve(ResolveArgs),

    /// Resolve and write the lockfile (same as `resolve --write-lock`)
    Lock(ResolveArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Root manifest
    #[arg(short, long, default_value = ROOT_MANIFEST_NAME)]
    pub manifest: PathBuf,

    /// Local module registry directory
    #[arg(long, value_name = "DIR")]
    pub registry: Option<PathBuf>,

    /// Reproduce the lockfile exactly; fail if it is missing or incomplete
    #[arg(long)]
    pub frozen_lockfile: bool,

    /// Accept major version upgrades without asking
    #[arg(long)]
    pub allow_major_version_upgrades: bool,

    /// Number of resolver workers
    #[arg(short = 'j', long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Write the lockfile next to the manifest
    #[arg(long)]
    pub write_lock: bool,

    /// List the files of every resolved module
    #[arg(long)]
    pub files: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_resolve_flags() {
        let cli = Cli::try_parse_from([
            "quarry",
            "resolve",
            "--json",
            "-vv",
            "--registry",
            "/srv/modules",
            "--frozen-lockfile",
            "-j",
            "3",
        ])
        .unwrap();

        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        let Commands::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(args.manifest, PathBuf::from("quarry.yaml"));
        assert_eq!(args.registry, Some(PathBuf::from("/srv/modules")));
        assert!(args.frozen_lockfile);
        assert_eq!(args.concurrency, Some(3));
        assert!(!args.write_lock);
    }

    #[test]
    fn lock_accepts_resolve_flags() {
        let cli = Cli::try_parse_from([
            "quarry",
            "--config",
            "ci.toml",
            "lock",
            "--allow-major-version-upgrades",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("ci.toml")));
        assert!(matches!(
            cli.command,
            Commands::Lock(ResolveArgs {
                allow_major_version_upgrades: true,
                ..
            })
        ));
    }
}

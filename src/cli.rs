use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// rankdeploy - deploy the crypto-rank-tracker function and its scheduler job
#[derive(Parser, Debug)]
#[command(name = "rankdeploy")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Secrets are read from the environment: WORKLOAD_IDENTITY_PROVIDER, \
SERVICE_ACCOUNT, WEBHOOK_URL, GCS_BUCKET_NAME.")]
pub struct Cli {
    /// Emit NDJSON events instead of human output
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (default: rankdeploy.toml in the project root)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Project root (default: discovered from the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export requirements, deploy the function and re-create the scheduler job
    Deploy {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Print the cloud commands without running anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the cloud commands a deploy would run
    Plan,

    /// Export requirements.txt from uv.lock or poetry.lock
    Requirements {
        /// Lockfile, relative to the function source directory (default: uv.lock, then poetry.lock)
        #[arg(long, value_name = "PATH")]
        lockfile: Option<PathBuf>,

        /// Output file, relative to the function source directory
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Optional dependency groups to include
        #[arg(long, value_delimiter = ',')]
        extras: Vec<String>,
    },

    /// Re-create the scheduler job for the deployed function
    Schedule {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the deployed function URI and scheduler job
    Status,

    /// Check configuration, credentials and the lockfile
    Check {
        /// Fail on warnings too (CI mode)
        #[arg(long)]
        strict_warnings: bool,
    },

    /// Render the GitHub Actions workflow that runs `rankdeploy deploy`
    Workflow {
        /// Branch whose pushes and pull requests trigger a deploy
        #[arg(long, default_value = "main")]
        branch: String,

        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_deploy() {
        let cli = Cli::try_parse_from(["rankdeploy", "deploy"]).unwrap();
        if let Commands::Deploy { yes, dry_run } = cli.command {
            assert!(!yes);
            assert!(!dry_run);
        } else {
            panic!("Expected Deploy command");
        }
    }

    #[test]
    fn test_cli_parse_deploy_yes_short_flag() {
        let cli = Cli::try_parse_from(["rankdeploy", "deploy", "-y", "--dry-run"]).unwrap();
        if let Commands::Deploy { yes, dry_run } = cli.command {
            assert!(yes);
            assert!(dry_run);
        } else {
            panic!("Expected Deploy command");
        }
    }

    #[test]
    fn test_cli_parse_requirements_with_args() {
        let cli = Cli::try_parse_from([
            "rankdeploy",
            "requirements",
            "--lockfile",
            "poetry.lock",
            "-o",
            "reqs.txt",
            "--extras",
            "gcs,fast",
        ])
        .unwrap();

        if let Commands::Requirements {
            lockfile,
            output,
            extras,
        } = cli.command
        {
            assert_eq!(lockfile, Some(PathBuf::from("poetry.lock")));
            assert_eq!(output, Some(PathBuf::from("reqs.txt")));
            assert_eq!(extras, vec!["gcs".to_string(), "fast".to_string()]);
        } else {
            panic!("Expected Requirements command");
        }
    }

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::try_parse_from(["rankdeploy", "check", "--strict-warnings"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Check {
                strict_warnings: true
            }
        ));
    }

    #[test]
    fn test_cli_parse_workflow_default_branch() {
        let cli = Cli::try_parse_from(["rankdeploy", "workflow"]).unwrap();
        if let Commands::Workflow { branch, output } = cli.command {
            assert_eq!(branch, "main");
            assert_eq!(output, None);
        } else {
            panic!("Expected Workflow command");
        }
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "rankdeploy",
            "status",
            "--json",
            "-vv",
            "--config",
            "ci/rankdeploy.toml",
            "--project-root",
            "/work",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("ci/rankdeploy.toml")));
        assert_eq!(cli.project_root, Some(PathBuf::from("/work")));
        assert!(matches!(cli.command, Commands::Status));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["rankdeploy"]).is_err());
    }
}

// src/main.rs

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use pkgsetcomp::packages::DpkgStatusProvider;
use pkgsetcomp::{Config, report, repository};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "pkgsetcomp")]
#[command(author, version, about = "Compare installed packages with a distribution manifest", long_about = None)]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare installed packages with a manifest and write package lists and scripts
    Compare(CompareArgs),
    /// Print shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Args, Debug, Default)]
struct CompareArgs {
    /// Path or URL to a Debian/Ubuntu .manifest
    #[arg(short, long, env = "PKGSETCOMP_MANIFEST")]
    manifest: Option<String>,

    /// Directory in which to store package lists and scripts (default: .)
    #[arg(short, long, env = "PKGSETCOMP_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Reuse manifest.pkgs.txt and installed.pkgs.txt from a previous run
    #[arg(long)]
    cache: bool,

    /// Read installed package names from a file instead of running a command
    #[arg(long, value_name = "PATH")]
    installed_file: Option<PathBuf>,

    /// Command printing installed package names
    #[arg(long, value_name = "CMD")]
    installed_command: Option<String>,

    /// dpkg status database (default: /var/lib/dpkg/status)
    #[arg(long, value_name = "PATH", env = "PKGSETCOMP_STATUS_FILE")]
    status_file: Option<PathBuf>,

    /// Installer program used in generated scripts (default: apt-get)
    #[arg(long, value_name = "CMD")]
    installer: Option<String>,

    /// JSON configuration file
    #[arg(short, long, value_name = "PATH", env = "PKGSETCOMP_CONFIG")]
    config: Option<PathBuf>,
}

impl CompareArgs {
    /// Merge command line flags over the configuration file
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?,
            None => Config::default(),
        };

        if self.manifest.is_some() {
            config.manifest = self.manifest;
        }
        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }
        if self.cache {
            config.cache = true;
        }
        if self.installed_file.is_some() {
            config.installed_file = self.installed_file;
        }
        if let Some(command) = self.installed_command {
            config.installed_command = command;
        }
        if let Some(status_file) = self.status_file {
            config.status_file = status_file;
        }
        if let Some(installer) = self.installer {
            config.installer = installer;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else if quiet {
        tracing_subscriber::EnvFilter::new("error")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run_compare(config: &Config) -> Result<()> {
    let (installed, manifest) =
        repository::get_package_lists(config).context("Failed to load package lists")?;

    let provider = DpkgStatusProvider::open(&config.status_file).with_context(|| {
        format!(
            "Failed to read dpkg status database {}",
            config.status_file.display()
        )
    })?;

    let comparison = pkgsetcomp::compare(manifest, installed, &provider);

    for line in comparison.render() {
        println!("{}", line);
    }

    report::write_all(&comparison, &config.output_dir, &config.installer)
        .context("Failed to write reports")?;

    info!(
        "Minimal install set: {} of {} extra packages",
        comparison.minimal().len(),
        comparison.also_installed().len()
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Some(Commands::Compare(args)) => {
            let config = args.into_config()?;
            info!(
                "Comparing against manifest: {}",
                config.manifest.as_deref().unwrap_or("<none>")
            );
            run_compare(&config)
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "pkgsetcomp", &mut std::io::stdout());
            Ok(())
        }
        None => {
            // No command provided, show help
            println!("pkgsetcomp v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'pkgsetcomp --help' for usage information");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compare_flags() {
        let cli = Cli::try_parse_from([
            "pkgsetcomp",
            "compare",
            "-m",
            "ubuntu.manifest",
            "-o",
            "out",
            "--cache",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);

        let Some(Commands::Compare(args)) = cli.command else {
            panic!("expected compare subcommand");
        };
        assert_eq!(args.manifest.as_deref(), Some("ubuntu.manifest"));
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
        assert!(args.cache);
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["pkgsetcomp", "-v", "-q", "compare"]).is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            br#"{ "manifest": "from-file.manifest", "installer": "aptitude", "cache": true }"#,
        )
        .unwrap();

        let args = CompareArgs {
            manifest: Some("from-cli.manifest".to_string()),
            config: Some(file.path().to_path_buf()),
            ..CompareArgs::default()
        };
        let config = args.into_config().unwrap();
        assert_eq!(config.manifest.as_deref(), Some("from-cli.manifest"));
        assert_eq!(config.installer, "aptitude");
        assert!(config.cache);
    }

    #[test]
    fn test_empty_installer_flag_rejected() {
        let args = CompareArgs {
            installer: Some(String::new()),
            ..CompareArgs::default()
        };
        assert!(args.into_config().is_err());
    }
}

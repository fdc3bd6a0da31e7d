// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn build_cli() -> Command {
    Command::new("pkgsetcomp")
        .version(env!("CARGO_PKG_VERSION"))
        .author("pkgsetcomp Contributors")
        .about("Compare installed packages with a distribution manifest")
        .subcommand_required(false)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(clap::ArgAction::SetTrue)
                .help("Show debug output"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(clap::ArgAction::SetTrue)
                .help("Only log errors"),
        )
        .subcommand(
            Command::new("compare")
                .about("Compare installed packages with a manifest and write package lists and scripts")
                .arg(
                    Arg::new("manifest")
                        .short('m')
                        .long("manifest")
                        .value_name("PATH|URL")
                        .help("Path or URL to a Debian/Ubuntu .manifest"),
                )
                .arg(
                    Arg::new("output_dir")
                        .short('o')
                        .long("output-dir")
                        .value_name("DIR")
                        .default_value(".")
                        .help("Directory in which to store package lists and scripts"),
                )
                .arg(
                    Arg::new("cache")
                        .long("cache")
                        .action(clap::ArgAction::SetTrue)
                        .help("Reuse manifest.pkgs.txt and installed.pkgs.txt from a previous run"),
                )
                .arg(
                    Arg::new("installed_file")
                        .long("installed-file")
                        .value_name("PATH")
                        .help("Read installed package names from a file"),
                )
                .arg(
                    Arg::new("installed_command")
                        .long("installed-command")
                        .value_name("CMD")
                        .help("Command printing installed package names"),
                )
                .arg(
                    Arg::new("status_file")
                        .long("status-file")
                        .value_name("PATH")
                        .default_value("/var/lib/dpkg/status")
                        .help("dpkg status database"),
                )
                .arg(
                    Arg::new("installer")
                        .long("installer")
                        .value_name("CMD")
                        .default_value("apt-get")
                        .help("Installer program used in generated scripts"),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .value_name("PATH")
                        .help("JSON configuration file"),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Print shell completions")
                .arg(Arg::new("shell").required(true).help("Target shell")),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory
    let out_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).expect("Failed to create man directory");

    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();
    man.render(&mut buffer)
        .expect("Failed to render man page");

    let man_path = man_dir.join("pkgsetcomp.1");
    fs::write(&man_path, buffer).expect("Failed to write man page");
}

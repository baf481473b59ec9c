// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: package or virtual name
fn package_arg() -> Arg {
    Arg::new("package")
        .required(true)
        .help("Package or virtual name")
}

fn build_cli() -> Command {
    Command::new("feedfetch")
        .version(env!("CARGO_PKG_VERSION"))
        .author("feedfetch Contributors")
        .about("Mirror opkg packages and their dependencies from package feeds")
        .subcommand_required(false)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Settings file (TOML)"),
        )
        .arg(
            Arg::new("feeds")
                .long("feeds")
                .value_name("PATH")
                .help("Feed list file (default: distfeeds.conf)"),
        )
        .arg(
            Arg::new("packages")
                .long("packages")
                .value_name("PATH")
                .help("Request list file (default: packages.txt)"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Root of the local mirror tree (default: downloads)"),
        )
        .arg(
            Arg::new("release_marker")
                .long("release-marker")
                .help("Path segment after which feed URLs mirror the upstream layout"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(
            Command::new("fetch")
                .about("Resolve every requested package and download the archives (default)")
                .arg(
                    Arg::new("progress")
                        .long("progress")
                        .action(ArgAction::SetTrue)
                        .help("Show a progress bar per download"),
                )
                .arg(
                    Arg::new("probe_timeout")
                        .long("probe-timeout")
                        .help("Existence probe timeout in seconds"),
                )
                .arg(
                    Arg::new("transfer_timeout")
                        .long("transfer-timeout")
                        .help("Index and archive transfer timeout in seconds"),
                ),
        )
        .subcommand(
            Command::new("deps")
                .about("Show the dependency closure of a package without downloading")
                .arg(package_arg()),
        )
        .subcommand(
            Command::new("show")
                .about("Show the index entry of a package")
                .arg(package_arg()),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "elvish", "fish", "powershell", "zsh"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use OUT_DIR so the source tree stays clean
    let out_dir = match env::var("OUT_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=OUT_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = out_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("feedfetch.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}

use anyhow::Result;
use clap::Parser;
use linkapps::commands::link_apps;
use std::path::PathBuf;

/// linkapps - expose installed .app bundles to the desktop
///
/// Links every application bundle found in installed kegs into the applinks
/// directory and creates a Finder alias for it in /Applications.
///
/// Examples:
///   linkapps link               # Every package's current keg
///   linkapps link foo@1.2.0     # Just this keg
///   linkapps link --local       # Aliases go to ~/Applications
#[derive(Parser, Debug)]
#[command(author, version = env!("LINKAPPS_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Install prefix holding the Cellar (defaults to /usr/local; also via LINKAPPS_PREFIX)
    #[arg(
        long = "prefix",
        env = "LINKAPPS_PREFIX",
        value_name = "PATH",
        global = true
    )]
    prefix: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Link .app bundles of installed kegs into the applications directory
    Link(LinkArgs),
}

#[derive(clap::Args, Debug)]
struct LinkArgs {
    /// Kegs to publish, as "name" or "name@version" (default: all installed)
    #[arg(value_name = "KEG")]
    kegs: Vec<String>,

    /// Create aliases in ~/Applications instead of /Applications
    #[arg(long)]
    local: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = linkapps::runtime::RealRuntime;

    match cli.command {
        Commands::Link(args) => link_apps(runtime, &args.kegs, cli.prefix, args.local)?,
    }
    Ok(())
}

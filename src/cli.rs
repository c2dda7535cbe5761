use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path to the handbook source repository
    #[clap(short, long, default_value = ".")]
    pub repo_path: PathBuf,

    /// Where to write the EPUB
    #[clap(short, long, default_value = "posthog-handbook.epub")]
    pub output: PathBuf,

    /// Use this image as the cover instead of the bundled or generated one
    #[clap(long)]
    pub cover: Option<PathBuf>,

    /// Configuration file; defaults to handbook-epub.toml when it exists
    #[clap(short, long, env = "HANDBOOK_EPUB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Edition label, instead of the current "<Month Year> Edition"
    #[clap(long)]
    pub edition: Option<String>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Where to write the configuration
    #[clap(short, long, default_value = crate::config::DEFAULT_CONFIG_FILE)]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[clap(short, long)]
    pub force: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Converts the handbook into an EPUB
    Build(BuildArgs),
    /// Writes a configuration file with every default filled in
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    /// Log more; repeat for more detail. RUST_LOG takes precedence
    #[clap(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[clap(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn build_has_defaults() {
        let cli = Cli::parse_from(["handbook-epub", "build"]);
        match cli.command {
            Commands::Build(args) => {
                assert_eq!(args.repo_path, PathBuf::from("."));
                assert_eq!(args.output, PathBuf::from("posthog-handbook.epub"));
                assert!(args.cover.is_none());
                assert!(args.edition.is_none());
            }
            other => panic!("expected build, got {other:?}"),
        }
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::parse_from([
            "handbook-epub",
            "build",
            "-vv",
            "--repo-path",
            "site",
            "--cover",
            "cover.jpg",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Build(args) => {
                assert_eq!(args.repo_path, PathBuf::from("site"));
                assert_eq!(args.cover, Some(PathBuf::from("cover.jpg")));
            }
            other => panic!("expected build, got {other:?}"),
        }
    }
}

use std::future::Future;

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand};

use skpkg::actions::broadcast::BroadcastArgs;
use skpkg::actions::create::ProjectKind;
use skpkg::actions::news::{NewsEntry, NewsKind};
use skpkg::actions::{api_doc, broadcast, conda_forge, create, news};
use skpkg::config::{UserConfig, load_project_config, load_user_config};

#[derive(Parser)]
#[command(
    name = "package",
    version,
    about = "Reduce effort for maintaining and developing packages."
)]
struct Cli {
    /// Enable debug logging to stderr.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new package from a scikit-package template.
    Create {
        #[arg(value_enum)]
        kind: ProjectKind,
    },
    /// Add a new file like a news item.
    Add {
        #[command(subcommand)]
        what: AddCommand,
    },
    /// Update an existing package.
    Update {
        #[command(subcommand)]
        what: UpdateCommand,
    },
    /// Build documentation artifacts.
    Build {
        #[command(subcommand)]
        what: BuildCommand,
    },
    /// Broadcast an issue to a list of GitHub repositories.
    ///
    /// Target names come from groups.(json|yaml) and repos.(json|yaml),
    /// located by --url-to-repo-info, the current directory or the
    /// url_to_repo_info entry of ~/.skpkgrc.
    Broadcast(BroadcastCli),
}

#[derive(Subcommand)]
enum AddCommand {
    /// Add a news item under the news directory.
    News(NewsCli),
}

#[derive(Subcommand)]
enum UpdateCommand {
    /// Bump a conda-forge feedstock to the latest PyPI release.
    CondaForge,
}

#[derive(Subcommand)]
enum BuildCommand {
    /// Generate doc/source/api for the package in the current directory.
    ApiDoc,
}

#[derive(Args)]
#[command(group(ArgGroup::new("kind").required(true)))]
struct NewsCli {
    /// Added news item.
    #[arg(short = 'a', long = "add", num_args = 1.., value_name = "MESSAGE", group = "kind")]
    added: Option<Vec<String>>,
    /// Changed news item.
    #[arg(short = 'c', long = "change", num_args = 1.., value_name = "MESSAGE", group = "kind")]
    changed: Option<Vec<String>>,
    /// Deprecated news item.
    #[arg(short = 'd', long = "deprecate", num_args = 1.., value_name = "MESSAGE", group = "kind")]
    deprecated: Option<Vec<String>>,
    /// Removed news item.
    #[arg(short = 'r', long = "remove", num_args = 1.., value_name = "MESSAGE", group = "kind")]
    removed: Option<Vec<String>>,
    /// Fixed news item.
    #[arg(short = 'f', long = "fix", num_args = 1.., value_name = "MESSAGE", group = "kind")]
    fixed: Option<Vec<String>>,
    /// Security news item.
    #[arg(short = 's', long = "security", num_args = 1.., value_name = "MESSAGE", group = "kind")]
    security: Option<Vec<String>>,
    /// Brief reason why no news item is needed.
    #[arg(short = 'n', long = "no-news", num_args = 1.., value_name = "MESSAGE", group = "kind")]
    no_news: Option<Vec<String>>,
}

impl NewsCli {
    fn into_entry(self) -> Option<NewsEntry> {
        let item = |kind: NewsKind, words: Vec<String>| NewsEntry::Item {
            kind,
            message: words.join(" "),
        };
        if let Some(words) = self.no_news {
            return Some(NewsEntry::NoNews {
                message: words.join(" "),
            });
        }
        [
            (NewsKind::Added, self.added),
            (NewsKind::Changed, self.changed),
            (NewsKind::Deprecated, self.deprecated),
            (NewsKind::Removed, self.removed),
            (NewsKind::Fixed, self.fixed),
            (NewsKind::Security, self.security),
        ]
        .into_iter()
        .find_map(|(kind, words)| words.map(|w| item(kind, w)))
    }
}

#[derive(Args)]
struct BroadcastCli {
    /// URL of the issue to broadcast.
    issue_url: String,
    /// Comma-separated group names to broadcast to.
    selection: String,
    /// Path or GitHub URL of the directory holding the repository info files.
    #[arg(long)]
    url_to_repo_info: Option<String>,
    /// Simulate without creating issues (y/n).
    #[arg(
        long,
        value_name = "Y/N",
        default_value = "y",
        value_parser = BoolishValueParser::new(),
        action = ArgAction::Set
    )]
    dry_run: bool,
    /// Resolve names against the broadcast candidate databases instead.
    #[arg(long)]
    candidates: bool,
    /// Create issues without asking for each repository.
    #[arg(short, long)]
    yes: bool,
}

impl From<BroadcastCli> for BroadcastArgs {
    fn from(cli: BroadcastCli) -> Self {
        Self {
            issue_url: cli.issue_url,
            selection: cli.selection,
            url_to_repo_info: cli.url_to_repo_info,
            dry_run: cli.dry_run,
            candidates: cli.candidates,
            yes: cli.yes,
        }
    }
}

/// Drive one async command to completion on a single-threaded runtime.
fn block_on<F: Future<Output = Result<()>>>(future: F) -> Result<()> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?
        .block_on(future)
}

fn run(command: Commands, config: &UserConfig) -> Result<()> {
    let cwd = std::env::current_dir().context("cannot determine the current directory")?;
    match command {
        Commands::Create { kind } => {
            let project = load_project_config(&cwd)?;
            create::run(kind, project.as_ref(), config, &cwd)
        }
        Commands::Add {
            what: AddCommand::News(args),
        } => {
            let entry = args
                .into_entry()
                .context("one of -a, -c, -d, -r, -f, -s or -n is required")?;
            let branch = skpkg::git::current_branch(&cwd)?;
            let path = news::add_news(&cwd, &branch, &entry)?;
            println!("Updated {}", path.display());
            Ok(())
        }
        Commands::Update {
            what: UpdateCommand::CondaForge,
        } => block_on(conda_forge::run(config)),
        Commands::Build {
            what: BuildCommand::ApiDoc,
        } => {
            let written = api_doc::build(&cwd)?;
            println!("Wrote {} file(s) to {}", written.len(), api_doc::API_DIR);
            Ok(())
        }
        Commands::Broadcast(args) => {
            let args = BroadcastArgs::from(args);
            block_on(broadcast::run(&args, config))
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up tracing.
    if cli.debug {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
    }

    // Install the rustls CryptoProvider before any TLS client is constructed.
    skpkg::github::client::install_crypto_provider();

    let config = load_user_config()?;
    tracing::debug!("user config: {:?}", config.source);

    run(cli.command, &config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("package").chain(args.iter().copied()))
    }

    #[test]
    fn cli_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn news_message_words_are_joined() {
        let cli = parse(&["add", "news", "-a", "Support", "dark", "mode."]).unwrap();
        let Commands::Add {
            what: AddCommand::News(args),
        } = cli.command
        else {
            panic!("expected add news");
        };
        assert_eq!(
            args.into_entry(),
            Some(NewsEntry::Item {
                kind: NewsKind::Added,
                message: "Support dark mode.".to_owned(),
            })
        );
    }

    #[test]
    fn news_requires_exactly_one_kind() {
        assert!(parse(&["add", "news"]).is_err());
        assert!(parse(&["add", "news", "-a", "x", "-f", "y"]).is_err());
    }

    #[test]
    fn dry_run_defaults_on_and_accepts_yes_no() {
        let dry = |extra: &[&str]| {
            let mut args = vec!["broadcast", "https://github.com/o/r/issues/1", "odd"];
            args.extend_from_slice(extra);
            match parse(&args).unwrap().command {
                Commands::Broadcast(b) => b.dry_run,
                _ => panic!("expected broadcast"),
            }
        };
        assert!(dry(&[]));
        assert!(!dry(&["--dry-run", "n"]));
        assert!(!dry(&["--dry-run", "false"]));
        assert!(dry(&["--dry-run", "yes"]));
    }
}

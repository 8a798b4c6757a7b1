use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use path_replay::codec::{self, ShareLink, ShareToken};
use path_replay::journey;
use precog::logging::{self, LogTarget};
use precog::{app, AppConfig, KeyMap, Osc52Clipboard, Session, SessionSettings, Theme, ViewError};
use scenario_tree::{open_source, NodeId, ScenarioTree, Tree, TreeError};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Walk a tree of possible futures and share the path you took
#[derive(Parser, Debug)]
#[command(name = "precog", version, about)]
struct Cli {
    /// Config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Tree document: file path or http(s) URL
    #[arg(long, global = true, env = "PRECOG_DATA")]
    data: Option<String>,

    /// Origin for share URLs
    #[arg(long, global = true)]
    origin: Option<String>,

    /// Log file for the interactive views
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// More logging (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Explore the tree interactively (default)
    Explore,
    /// Play back a shared path
    Replay {
        /// Share token or share URL
        token: String,
    },
    /// Print the share URL for a path of node ids
    Encode {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Print the node ids in a share token
    Decode {
        /// Share token or share URL
        token: String,
    },
    /// Print the path from the root to a node
    Path { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::discover(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        config = config.data(data);
    }
    if let Some(origin) = cli.origin {
        config = config.share_origin(origin);
    }
    if let Some(log_file) = cli.log_file {
        config = config.log_file(log_file);
    }

    match cli.command.unwrap_or(Command::Explore) {
        Command::Explore => {
            logging::init(LogTarget::File(config.log_path()), cli.verbose)?;
            explore(&config)
        }
        Command::Replay { token } => {
            logging::init(LogTarget::File(config.log_path()), cli.verbose)?;
            replay(&config, &token)
        }
        Command::Encode { ids } => {
            logging::init(LogTarget::Stderr, cli.verbose)?;
            let path: Vec<NodeId> = ids.into_iter().map(NodeId::from).collect();
            println!("{}", ShareLink::for_path(&config.share_origin, &path));
            Ok(())
        }
        Command::Decode { token } => {
            logging::init(LogTarget::Stderr, cli.verbose)?;
            decode(&config, &token)
        }
        Command::Path { id } => {
            logging::init(LogTarget::Stderr, cli.verbose)?;
            print_path(&config, &id)
        }
    }
}

fn load_tree(config: &AppConfig) -> Result<ScenarioTree, TreeError> {
    let source = open_source(&config.data)?;
    ScenarioTree::load(source.as_ref())
}

fn explore(config: &AppConfig) -> Result<()> {
    let theme = Theme::from_choice(config.theme);
    let keys = KeyMap::from_bindings(&config.keys)?;

    let tree = match load_tree(config) {
        Ok(tree) => Arc::new(tree),
        Err(e) => return app::run_error(&ViewError::from(e), &theme, &keys),
    };

    info!("Starting explore view");
    let session = Session::explore(tree, SessionSettings::from(config));
    app::run(session, &theme, &keys, &mut Osc52Clipboard::stdout())
}

fn replay(config: &AppConfig, input: &str) -> Result<()> {
    let theme = Theme::from_choice(config.theme);
    let keys = KeyMap::from_bindings(&config.keys)?;

    let opened = load_tree(config)
        .map_err(ViewError::from)
        .and_then(|tree| {
            let (token, ids) = ShareToken::parse(ShareLink::token_from_input(input))?;
            Ok((Arc::new(tree), token, ids))
        });

    let (tree, token, ids) = match opened {
        Ok(opened) => opened,
        Err(e) => return app::run_error(&e, &theme, &keys),
    };

    info!("Starting replay view");
    let session = Session::shared(tree, ids, SessionSettings::from(config), Instant::now())
        .with_share_token(token);
    app::run(session, &theme, &keys, &mut Osc52Clipboard::stdout())
}

fn decode(config: &AppConfig, input: &str) -> Result<()> {
    let ids = codec::decode(ShareLink::token_from_input(input))?;
    let tree = load_tree(config).with_context(|| format!("Failed to load {}", config.data))?;

    for id in &ids {
        match tree.node_by_id(id) {
            Some(node) => println!("{id}\t{}\t{}", node.branch_type, node.title),
            None => println!("{id}\t(not in this tree)"),
        }
    }
    println!("{}", journey::numeric_path(&tree, &ids));
    Ok(())
}

fn print_path(config: &AppConfig, id: &str) -> Result<()> {
    let tree = load_tree(config).with_context(|| format!("Failed to load {}", config.data))?;
    let path = tree.path_from_root(id);
    if path.is_empty() {
        anyhow::bail!("{id} is not a node below the root of this tree");
    }

    println!("{}", journey::titled_path(&tree, &path));
    println!("{}", journey::numeric_path(&tree, &path));
    println!("{}", ShareLink::for_path(&config.share_origin, &path));
    Ok(())
}

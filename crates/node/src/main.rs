use edgefed_node::Result;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = cli::run().await {
        edgefed_cli_helpers::messages::fail(e.to_string());
        std::process::exit(1);
    }

    Ok(())
}

mod cli {
    use clap::{CommandFactory, Parser, Subcommand};
    use edgefed_cli_helpers::CommandTree;
    use edgefed_node::{Neighbor, Result};
    use std::path::PathBuf;

    #[derive(Parser, Debug)]
    #[clap(name = "edgefed-node", author, version, about, long_about = None)]
    pub struct EdgefedNode {
        #[clap(subcommand)]
        cmd: Command,
    }

    #[derive(Debug, Subcommand)]
    pub enum Command {
        /// Create a configuration file.
        Init {
            /// Node name to write.
            #[clap(short, long)]
            name: Option<String>,

            /// Config file to write.
            config: PathBuf,
        },
        /// Start a node.
        Start {
            /// Bind to host:port.
            #[clap(short, long)]
            bind: Option<String>,

            /// Node name, overrides the config file.
            #[clap(short, long, env = "NODE_NAME")]
            name: Option<String>,

            /// Comma separated neighbor addresses, overrides the
            /// config file.
            #[clap(long, env = "NEIGHBORS", value_delimiter = ',')]
            neighbors: Option<Vec<String>>,

            /// Config file to load.
            config: PathBuf,
        },
        /// Print the audit trail of a node.
        Events {
            /// Newest events first.
            #[clap(short, long)]
            reverse: bool,

            /// Maximum number of events to print.
            #[clap(short, long)]
            count: Option<usize>,

            /// Print events as JSON.
            #[clap(long)]
            json: bool,

            /// Config file to load.
            config: PathBuf,
        },
    }

    pub async fn run() -> Result<()> {
        // Support JSON output of command tree
        if std::env::var("EDGEFED_CLI_JSON").ok().is_some() {
            let cmd = EdgefedNode::command();
            let tree: CommandTree = (&cmd).into();
            serde_json::to_writer_pretty(std::io::stdout(), &tree)?;
            std::process::exit(0);
        }

        let args = EdgefedNode::parse();

        match args.cmd {
            Command::Init { config, name } => {
                service::init(config, name).await?;
            }
            Command::Start {
                bind,
                name,
                neighbors,
                config,
            } => {
                let neighbors = neighbors.map(parse_neighbors).transpose()?;
                service::start(bind, name, neighbors, config).await?;
            }
            Command::Events {
                reverse,
                count,
                json,
                config,
            } => {
                service::events(config, reverse, count, json).await?;
            }
        }

        Ok(())
    }

    /// Blank entries are ignored so a trailing comma is harmless.
    fn parse_neighbors(values: Vec<String>) -> Result<Vec<Neighbor>> {
        let mut neighbors = Vec::new();
        for value in values {
            let value = value.trim();
            if !value.is_empty() {
                neighbors.push(value.parse()?);
            }
        }
        Ok(neighbors)
    }

    mod service {
        use axum_server::Handle;
        use edgefed_audit::fs::AuditLogFile;
        use edgefed_cli_helpers::messages::{info, success};
        use edgefed_logs::Logger;
        use edgefed_node::{
            Error, Neighbor, Node, NodeConfig, Result, Server,
        };
        use std::{
            net::SocketAddr, path::PathBuf, str::FromStr, sync::Arc,
        };

        /// Initialize default node configuration.
        pub async fn init(
            output: PathBuf,
            name: Option<String>,
        ) -> Result<()> {
            if tokio::fs::try_exists(&output).await? {
                return Err(Error::FileExists(output));
            }

            let mut config: NodeConfig = Default::default();
            if let Some(name) = name {
                config.node.name = name;
            }

            let content = toml::to_string_pretty(&config)?;
            tokio::fs::write(&output, content.as_bytes()).await?;
            success(format!("Wrote {}", output.display()));
            Ok(())
        }

        /// Start a node server.
        pub async fn start(
            bind: Option<String>,
            name: Option<String>,
            neighbors: Option<Vec<Neighbor>>,
            config: PathBuf,
        ) -> Result<()> {
            let mut config = NodeConfig::load(&config).await?;

            if let Some(bind) = bind {
                let addr = SocketAddr::from_str(&bind)?;
                config.set_bind_address(addr);
            }
            if let Some(name) = name {
                config.node.name = name;
            }
            if let Some(neighbors) = neighbors {
                config.federation.neighbors = neighbors;
            }
            config.validate()?;

            let logger =
                Logger::new(config.storage.logs_dir(), "edgefed-node");
            let _guard = logger.init_file_subscriber(None)?;

            let node = Node::open(config)?;
            node.boot().await?;

            let handle = Handle::new();
            let server = Server::new();
            server.start(Arc::new(node), handle).await?;
            Ok(())
        }

        /// Print the audit trail.
        pub async fn events(
            config: PathBuf,
            reverse: bool,
            count: Option<usize>,
            json: bool,
        ) -> Result<()> {
            let config = NodeConfig::load(&config).await?;
            let log_file = AuditLogFile::new(&config.storage.log)?;
            let events = log_file.events(reverse, count)?;
            if events.is_empty() {
                info(format!(
                    "No audit events in {}",
                    log_file.file_path().display()
                ));
            }
            for event in events {
                if json {
                    println!("{}", serde_json::to_string(&event)?);
                } else {
                    println!("{}", event.encode_line()?);
                }
            }
            Ok(())
        }
    }
}

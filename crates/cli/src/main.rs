//! Discovery Runtime CLI
//!
//! Command-line interface for exploring APIs described by discovery documents.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use discovery_runtime_client::{
    Discovery, DiscoveryOptions, Endpoint, GlobalOptions, Namespace, Node, DEFAULT_DISCOVERY_URL,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "discovery-runtime")]
#[command(version, about = "Build API clients at runtime from discovery documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Options file (YAML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Include private APIs in the catalog
    #[arg(long, global = true)]
    include_private: bool,

    /// Trace every document fetched or read
    #[arg(long, global = true)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List every API and version of a discovery list
    #[command(after_help = "EXAMPLES:\n  \
        # List all public Google APIs\n  \
        discovery-runtime list\n\n  \
        # Use another discovery service\n  \
        discovery-runtime list --url https://discovery.example.com/discovery/v1/apis")]
    List {
        /// Discovery list URL
        #[arg(long, default_value = DEFAULT_DISCOVERY_URL)]
        url: String,
    },

    /// Select one API version from the catalog and print its endpoint tree
    #[command(after_help = "EXAMPLES:\n  \
        # Show Drive v3\n  \
        discovery-runtime show --api drive --version v3\n\n  \
        # Show methods with HTTP verbs and URLs\n  \
        discovery-runtime show --api storage --version v1 --verbose")]
    Show {
        /// API name
        #[arg(long)]
        api: String,

        /// API version
        #[arg(long)]
        version: String,

        /// Discovery list URL
        #[arg(long, default_value = DEFAULT_DISCOVERY_URL)]
        url: String,

        /// Endpoint option as key=value (repeatable)
        #[arg(short, long = "option", value_parser = parse_option)]
        options: Vec<(String, Value)>,
    },

    /// Resolve a single discovery document and print its endpoint tree
    #[command(after_help = "EXAMPLES:\n  \
        # Inspect a remote document\n  \
        discovery-runtime inspect --source 'https://storage.googleapis.com/$discovery/rest?version=v1'\n\n  \
        # Inspect a local document\n  \
        discovery-runtime inspect --source ./storage-v1.json")]
    Inspect {
        /// Discovery document URL or local path
        #[arg(short, long)]
        source: String,

        /// Endpoint option as key=value (repeatable)
        #[arg(short, long = "option", value_parser = parse_option)]
        options: Vec<(String, Value)>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.debug);

    let options = resolve_options(cli.config.as_deref(), cli.include_private, cli.debug)?;
    if cli.verbose {
        println!("{} Verbose mode enabled", "→".cyan());
        println!("  Include private: {}", options.include_private);
        println!("  Debug: {}", options.debug);
    }

    let discovery = Discovery::new(options).context("Failed to initialize discovery")?;

    match cli.command {
        Commands::List { url } => list_command(&discovery, &url, cli.verbose).await?,
        Commands::Show {
            api,
            version,
            url,
            options,
        } => {
            show_command(&discovery, &url, &api, &version, to_options(options), cli.verbose).await?
        }
        Commands::Inspect { source, options } => {
            inspect_command(&discovery, &source, to_options(options), cli.verbose).await?
        }
    }

    Ok(())
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Options file values, overridden by command-line flags
fn resolve_options(
    config: Option<&Path>,
    include_private: bool,
    debug: bool,
) -> Result<DiscoveryOptions> {
    let options = match config {
        Some(path) => DiscoveryOptions::load(path)
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => DiscoveryOptions::default(),
    };

    Ok(options
        .with_include_private(options.include_private || include_private)
        .with_debug(options.debug || debug))
}

async fn list_command(discovery: &Discovery, url: &str, verbose: bool) -> Result<()> {
    println!("{} Discovering APIs from: {}", "→".cyan(), url);

    let apis = discovery
        .discover_all_apis(url)
        .await
        .context("Failed to discover APIs")?;

    println!(
        "\n{}",
        format!("✓ Discovered {} APIs", apis.len()).green().bold()
    );

    for (name, selector) in apis.iter() {
        println!("  • {} ({})", name.cyan(), selector.versions().join(", "));
        if verbose {
            for version in selector.versions() {
                if let Some(creator) = selector.creator(version) {
                    let schema = creator.schema();
                    println!(
                        "    {} {}: {} resources, {} methods",
                        version.yellow(),
                        schema.title.as_deref().unwrap_or(""),
                        schema.resource_count(),
                        schema.method_count()
                    );
                }
            }
        }
    }

    Ok(())
}

async fn show_command(
    discovery: &Discovery,
    url: &str,
    api: &str,
    version: &str,
    mut options: GlobalOptions,
    verbose: bool,
) -> Result<()> {
    println!("{} Discovering APIs from: {}", "→".cyan(), url);

    let apis = discovery
        .discover_all_apis(url)
        .await
        .context("Failed to discover APIs")?;

    options.insert("version".to_string(), Value::String(version.to_string()));
    let endpoint = apis.select(api, options)?;

    print_endpoint(&endpoint, verbose);
    Ok(())
}

async fn inspect_command(
    discovery: &Discovery,
    source: &str,
    options: GlobalOptions,
    verbose: bool,
) -> Result<()> {
    println!("{} Resolving: {}", "→".cyan(), source);

    let creator = discovery
        .discover_api(source)
        .await
        .with_context(|| format!("Failed to resolve {}", source))?;
    let endpoint = creator.create(options)?;

    print_endpoint(&endpoint, verbose);
    Ok(())
}

fn print_endpoint(endpoint: &Endpoint, verbose: bool) {
    println!("\n{}", "✓ Endpoint ready!".green().bold());
    println!("\n{}", "Endpoint:".bold());
    println!("  Name: {}", endpoint.name().yellow());
    println!("  Version: {}", endpoint.version().yellow());
    println!("  Resources: {}", endpoint.namespaces().len());
    println!("  Methods: {}", endpoint.methods().len());

    println!("\n{}", "Tree:".bold());
    print_namespace(endpoint.root(), 1, verbose);
}

fn print_namespace(namespace: &Namespace, depth: usize, verbose: bool) {
    let indent = "  ".repeat(depth);
    for (name, node) in namespace.children() {
        match node {
            Node::Namespace(child) => {
                println!("{}{}", indent, name.cyan());
                print_namespace(child, depth + 1, verbose);
            }
            Node::Method(method) if verbose => {
                println!(
                    "{}{} {} {}",
                    indent,
                    name,
                    method.http_method().yellow(),
                    method.url()
                );
            }
            Node::Method(_) => println!("{}{}", indent, name),
        }
    }
}

/// Parse `key=value`; the value is read as JSON when it parses, else as a string
fn parse_option(s: &str) -> std::result::Result<(String, Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;

    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn to_options(pairs: Vec<(String, Value)>) -> GlobalOptions {
    pairs.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_option() {
        assert_eq!(
            parse_option("quotaUser=me").unwrap(),
            ("quotaUser".to_string(), Value::String("me".to_string()))
        );
        assert_eq!(
            parse_option("timeout=30").unwrap(),
            ("timeout".to_string(), Value::from(30))
        );
        assert_eq!(
            parse_option("filter=a=b").unwrap(),
            ("filter".to_string(), Value::String("a=b".to_string()))
        );
        assert!(parse_option("novalue").is_err());
        assert!(parse_option("=x").is_err());
    }

    #[test]
    fn test_resolve_options_flags() {
        let options = resolve_options(None, true, false).unwrap();
        assert!(options.include_private);
        assert!(!options.debug);
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

//! The `sitepilot` command-line interface
//!
//! Glue only: argument parsing and wiring of the mapper crates. Map
//! builds replay a recorded site document; `map show` reads a saved map.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use site_mapper::{MapError, SiteMapBuilder, SiteMapStore};
use sitepilot_core_types::{MenuNode, SiteMap};

use crate::config::SitepilotConfig;
use crate::errors::SitepilotError;
use crate::replay::RecordedSite;

#[derive(Debug, Parser)]
#[command(
    name = "sitepilot",
    version,
    about = "Site map discovery and element location for web test automation"
)]
pub struct Cli {
    /// JSON config document; env vars override it.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Site map operations.
    #[command(subcommand)]
    Map(MapCommand),
}

#[derive(Debug, Subcommand)]
pub enum MapCommand {
    /// Capture the starting page's menu structure and features.
    Build {
        /// Recorded site document to replay.
        #[arg(long)]
        snapshot: PathBuf,
        /// Base url override; defaults to the recording's start url.
        #[arg(long)]
        url: Option<String>,
        /// Output document; defaults to the configured map path.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Build, then crawl discovered menu links breadth-first.
    Crawl {
        #[arg(long)]
        snapshot: PathBuf,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
        /// Depth bound; defaults to the configured depth.
        #[arg(long)]
        depth: Option<u32>,
    },
    /// Print a saved site map.
    Show {
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

pub async fn run(command: Commands, config: SitepilotConfig) -> Result<(), SitepilotError> {
    match command {
        Commands::Map(map) => run_map(map, config).await,
    }
}

async fn run_map(command: MapCommand, config: SitepilotConfig) -> Result<(), SitepilotError> {
    match command {
        MapCommand::Build { snapshot, url, out } => {
            let site = RecordedSite::load(&snapshot)?;
            let base = url.unwrap_or_else(|| site.start.clone());
            let builder = SiteMapBuilder::new(site.into_driver(), config.builder_config(base))?;
            let map = builder.build().await?;
            persist(&map, out.unwrap_or(config.map_path))?;
        }
        MapCommand::Crawl {
            snapshot,
            url,
            out,
            depth,
        } => {
            let site = RecordedSite::load(&snapshot)?;
            let base = url.unwrap_or_else(|| site.start.clone());
            let builder = SiteMapBuilder::new(site.into_driver(), config.builder_config(base))?;
            let mut map = builder.build().await?;
            for page in builder.crawl_menus(depth.unwrap_or(config.max_depth)).await? {
                map.push_page(page);
            }
            persist(&map, out.unwrap_or(config.map_path))?;
        }
        MapCommand::Show { path } => {
            let path = path.unwrap_or(config.map_path);
            let store = SiteMapStore::new(&path);
            let map = store
                .load()
                .ok_or_else(|| MapError::MapMissing(path.display().to_string()))?;
            print_map(&map);
        }
    }
    Ok(())
}

fn persist(map: &SiteMap, path: PathBuf) -> Result<(), SitepilotError> {
    let store = SiteMapStore::new(&path);
    store.save(map)?;
    info!("site map written to {}", path.display());
    println!(
        "{}: {} menu nodes, {} pages -> {}",
        map.base_url,
        map.node_count(),
        map.pages.len(),
        path.display()
    );
    Ok(())
}

fn print_map(map: &SiteMap) {
    println!("{} (captured {})", map.base_url, map.captured_at);
    for (section, nodes) in &map.sections {
        println!("[{}]", section.as_str());
        for node in nodes {
            print_node(node, 1);
        }
    }
    for page in &map.pages {
        let features: Vec<&str> = page.features.iter().map(|f| f.kind.as_str()).collect();
        println!("page {} ({})", page.url, features.join(", "));
    }
}

fn print_node(node: &MenuNode, indent: usize) {
    let pad = "  ".repeat(indent);
    match &node.path {
        Some(path) => println!("{pad}{} -> {path}", node.label),
        None => println!("{pad}{}", node.label),
    }
    for child in &node.children {
        print_node(child, indent + 1);
    }
}

mod cache;
mod chart;
mod config;
mod logging;
mod nba;
mod server;
mod service;
mod shots;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::{path::PathBuf, sync::Arc};
use tabled::Table;

use crate::cache::ShotCache;
use crate::config::Config;
use crate::logging::{init_logging, Verbosity};
use crate::nba::db::Directory;
use crate::nba::endpoints::UreqTransport;
use crate::nba::static_data;
use crate::server::AppState;
use crate::service::{ChartRequest, ChartView, ShotChartService};
use crate::shots::ZoneSplit;

#[derive(Parser, Debug)]
#[clap(author, version, about = "NBA shot chart dashboard", long_about = None)]
struct NBACli {
    /// Config file (defaults to ./nbashotchart.toml when present)
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,

    #[clap(short, long, global = true, parse(from_occurrences))]
    verbose: u64,

    #[clap(short, long, global = true)]
    quiet: bool,

    #[clap(subcommand)]
    cmd: Commands
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the web dashboard
    Serve {
        #[clap(short, long)]
        port: Option<u16>,

        #[clap(short, long)]
        open: bool,
    },
    /// Write a shot chart to an SVG file
    Chart {
        #[clap(short, long)]
        player: String,

        #[clap(short, long)]
        team: String,

        #[clap(short, long)]
        season: Option<String>,

        #[clap(short, long, default_value = "shot_chart.svg")]
        out: PathBuf,
    },
    /// Print attempts and makes per zone
    Zones {
        #[clap(short, long)]
        player: String,

        #[clap(short, long)]
        team: String,

        #[clap(short, long)]
        season: Option<String>,
    },
    /// Search players or franchises by name
    Lookup {
        #[clap(short, long)]
        team: Option<String>,

        #[clap(short, long)]
        player: Option<String>,
    },
    /// Refresh the player directory from stats.nba.com
    Sync,
    ClearCache,
}

fn build_service(config: &Config) -> Result<ShotChartService> {
    let transport = UreqTransport::new(
        config.api_timeout(),
        &config.api.user_agent,
        config.api.max_retries,
        config.retry_backoff(),
    );
    let directory = Directory::open(&config.directory.database_path)
        .with_context(|| format!("opening player directory {}", config.directory.database_path.display()))?;
    let cache = ShotCache::new(&config.cache.dir, config.cache_max_age())?;
    Ok(ShotChartService::new(Arc::new(transport), directory, cache, config.dashboard.clone()))
}

fn chart_for(service: &ShotChartService, player: String, team: String, season: Option<String>) -> ChartView {
    let season = season.unwrap_or_else(|| service.dashboard().default_season.clone());
    service.chart_view(&ChartRequest::new(&player, &team, &season))
}

fn lookup(service: &ShotChartService, team: Option<String>, player: Option<String>) -> Result<()> {
    match (player, team) {
        (Some(p), _) => {
            let res = service.directory().search_players(&p)?;
            if res.is_empty() {
                println!("No players found for {}", p);
            }
            for player in res {
                let status = if player.is_active { "active" } else { "inactive" };
                println!("{} ({}) {}", player.full_name, player.person_id, status);
            }
        }
        (_, Some(t)) => {
            let res = static_data::search_teams(&t);
            if res.is_empty() {
                println!("No teams found for {}", t);
            }
            for team in res {
                println!("{} ({}) {}", team.full_name, team.abbreviation, team.id);
            }
        }
        (None, None) => bail!("pass --player or --team"),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = NBACli::parse();
    init_logging(Verbosity::from_flags(args.verbose, args.quiet));

    let mut config = Config::load(args.config)?;
    let service = build_service(&config)?;

    match args.cmd {
        Commands::Serve { port, open } => {
            if let Some(p) = port {
                config.server.port = p;
            }
            let service = Arc::new(service);
            if service.directory().player_count()? == 0 {
                let syncing = service.clone();
                std::thread::spawn(move || {
                    if let Err(e) = syncing.sync_directory() {
                        warn!("player directory sync failed, using bundled list: {:#}", e);
                    }
                });
            }
            let state = AppState { service };
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(state, &config.listen_addr(), open || config.server.open_browser))?;
        }
        Commands::Chart { player, team, season, out } => {
            let view = chart_for(&service, player, team, season);
            if let ChartView::Error(msg) = &view {
                bail!("{}", msg);
            }
            std::fs::write(&out, chart::render(&view)?).with_context(|| format!("writing {}", out.display()))?;
            info!("chart written to {}", out.display());
            println!("{}", out.display());
        }
        Commands::Zones { player, team, season } => {
            match chart_for(&service, player, team, season) {
                ChartView::Chart(chart) => {
                    println!("{} ({:?}, {} shots)", chart.title, chart.source, chart.shots.len());
                    println!("{}", Table::new(ZoneSplit::from_shots(&chart.shots)));
                }
                ChartView::Error(msg) => bail!("{}", msg),
                other => println!("{}", other.message().unwrap_or_default()),
            }
        }
        Commands::Lookup { team, player } => {
            lookup(&service, team, player)?;
        }
        Commands::Sync => {
            let count = service.sync_directory()?;
            println!("Saved {} players", count);
        }
        Commands::ClearCache => {
            let removed = service.cache().clear()?;
            println!("Removed {} cached queries from {}", removed, service.cache().dir().display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_takes_player_and_team() {
        let args = NBACli::try_parse_from(["nbashotchart", "lookup", "--player", "curry"]).unwrap();
        match args.cmd {
            Commands::Lookup { player, team } => {
                assert_eq!(player.as_deref(), Some("curry"));
                assert!(team.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }

        let args = NBACli::try_parse_from(["nbashotchart", "-vv", "lookup", "-t", "DAL"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert!(matches!(args.cmd, Commands::Lookup { team: Some(ref t), player: None } if t == "DAL"));
        assert!(NBACli::try_parse_from(["nbashotchart", "lookup", "--player-name", "curry"]).is_err());
    }

    #[test]
    fn chart_defaults_output_path() {
        let args = NBACli::try_parse_from(["nbashotchart", "chart", "-p", "Luka Dončić", "-t", "DAL"]).unwrap();
        match args.cmd {
            Commands::Chart { out, season, .. } => {
                assert_eq!(out, PathBuf::from("shot_chart.svg"));
                assert!(season.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}

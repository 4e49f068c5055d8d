//! Turns a (player, team, season) selection into something to draw: resolves
//! names to ids, reads the cache, calls the stats API and falls back to
//! synthetic shots when the API can't be reached.

use anyhow::Result;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::cache::{cache_key, ShotCache};
use crate::config::DashboardConfig;
use crate::nba::db::Directory;
use crate::nba::endpoints::{ShotChartDetail, StatsTransport};
use crate::nba::params::Season;
use crate::nba::static_data;
use crate::shots::{synthetic, Shot, ShotSource, Zone, ZoneCounts, ZoneSplit};

pub const DEMO_SUFFIX: &str = " (Demo data)";

/// The three dropdown values. Empty strings count as unset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartRequest {
    pub player: Option<String>,
    pub team: Option<String>,
    pub season: Option<String>,
}

impl ChartRequest {
    pub fn new(player: &str, team: &str, season: &str) -> Self {
        ChartRequest {
            player: Some(player.to_string()),
            team: Some(team.to_string()),
            season: Some(season.to_string()),
        }
    }

    fn fields(&self) -> [Option<&str>; 3] {
        fn clean(v: &Option<String>) -> Option<&str> {
            v.as_deref().map(str::trim).filter(|s| !s.is_empty())
        }
        [clean(&self.player), clean(&self.team), clean(&self.season)]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartView {
    /// Nothing selected yet.
    Prompt,
    MissingSelection,
    NoData { player: String, season: String },
    Error(String),
    Chart(ShotChart),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShotChart {
    pub title: String,
    pub player: String,
    pub team: String,
    pub season: String,
    pub source: ShotSource,
    pub shots: Vec<Shot>,
    pub zones: ZoneCounts,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShotSummary {
    pub title: String,
    pub player: String,
    pub team: String,
    pub season: String,
    pub source: ShotSource,
    pub total: usize,
    pub zones: ZoneCounts,
    pub splits: Vec<ZoneSplit>,
    pub shots: Vec<PlottedShot>,
}

/// A shot as the JSON summary lists it, with its zone and distance.
#[derive(Debug, Clone, Serialize)]
pub struct PlottedShot {
    #[serde(flatten)]
    pub shot: Shot,
    pub zone: Zone,
    pub distance_ft: f64,
}

impl From<&Shot> for PlottedShot {
    fn from(shot: &Shot) -> Self {
        PlottedShot {
            shot: shot.clone(),
            zone: shot.zone(),
            distance_ft: (shot.distance_ft() * 10.0).round() / 10.0,
        }
    }
}

impl ShotChart {
    fn new(player: &str, team: &str, season: &Season, source: ShotSource, shots: Vec<Shot>) -> Self {
        let mut title = format!("{} - {}", player, season.as_str());
        if source.is_synthetic() {
            title.push_str(DEMO_SUFFIX);
        }
        ShotChart {
            title,
            player: player.to_string(),
            team: team.to_string(),
            season: season.as_str().to_string(),
            source,
            zones: ZoneCounts::from_shots(&shots),
            shots,
        }
    }

    pub fn summary(&self) -> ShotSummary {
        ShotSummary {
            title: self.title.clone(),
            player: self.player.clone(),
            team: self.team.clone(),
            season: self.season.clone(),
            source: self.source,
            total: self.shots.len(),
            zones: self.zones,
            splits: ZoneSplit::from_shots(&self.shots),
            shots: self.shots.iter().map(PlottedShot::from).collect(),
        }
    }
}

impl ChartView {
    pub fn message(&self) -> Option<String> {
        match self {
            ChartView::Prompt => Some("🏀 Click 'Generate chart' to start".to_string()),
            ChartView::MissingSelection => Some("⚠️ Please select a player, team and season".to_string()),
            ChartView::NoData { player, season } => {
                Some(format!("ℹ️ No shot data for {} in the {} season", player, season))
            }
            ChartView::Error(msg) => Some(msg.clone()),
            ChartView::Chart(_) => None,
        }
    }
}

pub struct ShotChartService {
    transport: Arc<dyn StatsTransport>,
    directory: Directory,
    cache: ShotCache,
    dashboard: DashboardConfig,
}

impl ShotChartService {
    pub fn new(transport: Arc<dyn StatsTransport>, directory: Directory, cache: ShotCache, dashboard: DashboardConfig) -> Self {
        ShotChartService { transport, directory, cache, dashboard }
    }

    pub fn dashboard(&self) -> &DashboardConfig {
        &self.dashboard
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn cache(&self) -> &ShotCache {
        &self.cache
    }

    pub fn players_list(&self) -> Result<Vec<String>> {
        self.directory.active_players()
    }

    pub fn teams_list(&self) -> Vec<String> {
        static_data::teams_list()
    }

    /// Refresh the player directory from the API.
    pub fn sync_directory(&self) -> Result<usize> {
        let season = self.dashboard.default_season.parse::<Season>()?;
        let count = self.directory.sync(self.transport.as_ref(), &season)?;
        info!("player directory synced ({} players)", count);
        Ok(count)
    }

    pub fn chart_view(&self, request: &ChartRequest) -> ChartView {
        let (player, team, season) = match request.fields() {
            [None, None, None] => return ChartView::Prompt,
            [Some(p), Some(t), Some(s)] => (p, t, s),
            _ => return ChartView::MissingSelection,
        };
        match self.load_chart(player, team, season) {
            Ok(view) => view,
            Err(e) => {
                error!("could not build chart for {} / {} / {}: {:#}", player, team, season, e);
                ChartView::Error(e.to_string())
            }
        }
    }

    fn load_chart(&self, player: &str, team: &str, season: &str) -> Result<ChartView> {
        let season: Season = season.parse()?;
        let player_id = self
            .directory
            .find_player_id(player)?
            .ok_or_else(|| anyhow::anyhow!("Unknown player: {}", player))?;
        let team_id = static_data::find_team_id(team).ok_or_else(|| anyhow::anyhow!("Unknown team: {}", team))?;

        let (source, shots) = self.load_shots(player_id, team_id, &season);
        if shots.is_empty() {
            return Ok(ChartView::NoData { player: player.to_string(), season: season.as_str().to_string() });
        }
        Ok(ChartView::Chart(ShotChart::new(player, team, &season, source, shots)))
    }

    fn load_shots(&self, player_id: i64, team_id: i64, season: &Season) -> (ShotSource, Vec<Shot>) {
        if let Some(shots) = self.cache.get(player_id, team_id, season) {
            return (ShotSource::Cache, shots);
        }
        let endpoint = ShotChartDetail::new(player_id, team_id, season.clone());
        match endpoint.fetch_shots(self.transport.as_ref()) {
            Ok(shots) => {
                if let Err(e) = self.cache.save(player_id, team_id, season, &shots) {
                    warn!("error saving to cache: {:#}", e);
                }
                (ShotSource::Live, shots)
            }
            Err(e) => {
                warn!("stats API unavailable, showing demo data: {:#}", e);
                let seed = synthetic::seed_from_key(&cache_key(player_id, team_id, season));
                (ShotSource::Synthetic, synthetic::generate(self.dashboard.synthetic_shots, seed))
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::cache::tests::scratch_dir;
    use crate::nba::endpoints::tests::{shot_chart_json, StubTransport};
    use serde_json::json;
    use std::time::Duration;

    pub(crate) fn service_with(transport: Arc<StubTransport>, tag: &str) -> ShotChartService {
        let cache = ShotCache::new(scratch_dir(tag), Duration::from_secs(3600)).unwrap();
        ShotChartService::new(transport, Directory::open_in_memory().unwrap(), cache, DashboardConfig::default())
    }

    fn live_rows() -> Vec<serde_json::Value> {
        vec![
            json!(["Shot Chart Detail", "0022400061", 1629029, "Driving Layup Shot", 2, 5, 1]),
            json!(["Shot Chart Detail", "0022400061", 1629029, "Step Back Jump shot", -30, 250, 0]),
            json!(["Shot Chart Detail", "0022400061", 1629029, "Pullup Jump shot", 120, 150, 1]),
        ]
    }

    #[test]
    fn empty_request_prompts() {
        let service = service_with(Arc::new(StubTransport::failing()), "svc-prompt");
        assert_eq!(service.chart_view(&ChartRequest::default()), ChartView::Prompt);
        let blank = ChartRequest { player: Some("  ".into()), team: None, season: Some(String::new()) };
        assert_eq!(service.chart_view(&blank), ChartView::Prompt);
    }

    #[test]
    fn padded_selections_are_trimmed() {
        let request = ChartRequest::new("  Luka Dončić ", "Dallas Mavericks\t", " 2024-25");
        assert_eq!(request.fields(), [Some("Luka Dončić"), Some("Dallas Mavericks"), Some("2024-25")]);

        let transport = Arc::new(StubTransport::new(vec![Ok(shot_chart_json(live_rows()))]));
        let service = service_with(transport, "svc-trim");
        assert!(matches!(service.chart_view(&request), ChartView::Chart(_)));
    }

    #[test]
    fn partial_request_asks_for_all_fields() {
        let service = service_with(Arc::new(StubTransport::failing()), "svc-missing");
        let request = ChartRequest { player: Some("Luka Dončić".into()), team: None, season: Some("2024-25".into()) };
        assert_eq!(service.chart_view(&request), ChartView::MissingSelection);
    }

    #[test]
    fn unknown_names_and_bad_seasons_are_errors() {
        let transport = Arc::new(StubTransport::failing());
        let service = service_with(transport.clone(), "svc-errors");
        let view = service.chart_view(&ChartRequest::new("Nobody Atall", "Dallas Mavericks", "2024-25"));
        assert_eq!(view, ChartView::Error("Unknown player: Nobody Atall".into()));
        let view = service.chart_view(&ChartRequest::new("Luka Dončić", "Seattle SuperSonics", "2024-25"));
        assert_eq!(view, ChartView::Error("Unknown team: Seattle SuperSonics".into()));
        assert!(matches!(
            service.chart_view(&ChartRequest::new("Luka Dončić", "Dallas Mavericks", "2024")),
            ChartView::Error(_)
        ));
        assert_eq!(transport.call_count(), 0);
    }

    #[test]
    fn live_shots_are_charted_and_cached() {
        let transport = Arc::new(StubTransport::new(vec![Ok(shot_chart_json(live_rows()))]));
        let service = service_with(transport.clone(), "svc-live");
        let request = ChartRequest::new("Luka Dončić", "Dallas Mavericks", "2024-25");

        let chart = match service.chart_view(&request) {
            ChartView::Chart(chart) => chart,
            other => panic!("expected chart, got {:?}", other),
        };
        assert_eq!(chart.source, ShotSource::Live);
        assert_eq!(chart.title, "Luka Dončić - 2024-25");
        assert_eq!(chart.shots.len(), 3);
        assert_eq!(chart.zones, ZoneCounts { paint: 1, free_throw: 1, three_point: 1, mid_range: 0 });
        assert!(transport.urls.lock().unwrap()[0].contains("PlayerID=1629029"));

        let again = match service.chart_view(&request) {
            ChartView::Chart(chart) => chart,
            other => panic!("expected chart, got {:?}", other),
        };
        assert_eq!(again.source, ShotSource::Cache);
        assert_eq!(again.shots, chart.shots);
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn api_failure_falls_back_to_demo_data() {
        let transport = Arc::new(StubTransport::failing());
        let service = service_with(transport.clone(), "svc-demo");
        let request = ChartRequest::new("Stephen Curry", "Golden State Warriors", "2023-24");

        let chart = match service.chart_view(&request) {
            ChartView::Chart(chart) => chart,
            other => panic!("expected chart, got {:?}", other),
        };
        assert_eq!(chart.source, ShotSource::Synthetic);
        assert_eq!(chart.title, "Stephen Curry - 2023-24 (Demo data)");
        assert_eq!(chart.shots.len(), DashboardConfig::default().synthetic_shots);
        assert_eq!(chart.zones.total(), chart.shots.len());

        // demo data is never cached, and the same query draws the same picture
        let again = match service.chart_view(&request) {
            ChartView::Chart(chart) => chart,
            other => panic!("expected chart, got {:?}", other),
        };
        assert_eq!(again.source, ShotSource::Synthetic);
        assert_eq!(again.shots, chart.shots);
        assert_eq!(transport.call_count(), 2);
    }

    #[test]
    fn empty_live_result_reports_no_data() {
        let transport = Arc::new(StubTransport::new(vec![Ok(shot_chart_json(vec![]))]));
        let service = service_with(transport, "svc-empty");
        let view = service.chart_view(&ChartRequest::new("Luka Dončić", "Dallas Mavericks", "2024-25"));
        assert_eq!(view, ChartView::NoData { player: "Luka Dončić".into(), season: "2024-25".into() });
        assert!(view.message().unwrap().contains("No shot data for Luka Dončić"));
    }

    #[test]
    fn summary_carries_splits() {
        let transport = Arc::new(StubTransport::new(vec![Ok(shot_chart_json(live_rows()))]));
        let service = service_with(transport, "svc-summary");
        let view = service.chart_view(&ChartRequest::new("Luka Dončić", "Dallas Mavericks", "2024-25"));
        let ChartView::Chart(chart) = view else { panic!("expected chart") };
        let summary = chart.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.splits.len(), 4);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["source"], "live");
        assert_eq!(json["zones"]["paint"], 1);
        assert_eq!(json["shots"][0]["LOC_X"], 2.0);
        assert_eq!(json["shots"][0]["zone"], "paint");
        assert_eq!(json["shots"][0]["ACTION_TYPE"], "Driving Layup Shot");
        assert_eq!(json["shots"][1]["zone"], "three_point");
        assert_eq!(json["shots"][1]["distance_ft"], 25.2);
    }
}

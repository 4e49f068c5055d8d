use crate::nba::db::PlayerRow;
use crate::nba::params::*;
use crate::shots::Shot;
use polars::prelude::*;
use serde_json::Value;
use std::{collections::HashMap, thread, time::{Duration, Instant}};
use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info, warn};

const NBA_BASE_URL: &str = "https://stats.nba.com/stats";

pub const SHOT_CHART_RESULT_SET: &str = "Shot_Chart_Detail";
pub const ALL_PLAYERS_RESULT_SET: &str = "CommonAllPlayers";

/// Something that can GET a stats.nba.com URL and hand back the JSON body.
pub trait StatsTransport: Send + Sync {
    fn get_json(&self, url: &str) -> Result<Value>;
}

pub struct UreqTransport {
    agent: ureq::Agent,
    user_agent: String,
    max_retries: u32,
    retry_backoff: Duration,
}

impl UreqTransport {
    pub fn new(timeout: Duration, user_agent: &str, max_retries: u32, retry_backoff: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        UreqTransport {
            agent,
            user_agent: user_agent.to_string(),
            max_retries,
            retry_backoff,
        }
    }

    fn fetch_once(&self, url: &str) -> Result<Value> {
        let r = self.agent.get(url)
            .set("Host", "stats.nba.com")
            .set("User-Agent", &self.user_agent)
            .set("Accept", "application/json, text/plain, */*")
            .set("Accept-Language", "en-US,en;q=0.5")
            .set("Connection", "keep-alive")
            .set("Referer", "https://stats.nba.com/")
            .set("Origin", "https://www.nba.com")
            .set("Pragma", "no-cache")
            .set("Cache-Control", "no-cache")
            .call()?;
        Ok(r.into_json()?)
    }
}

impl StatsTransport for UreqTransport {
    fn get_json(&self, url: &str) -> Result<Value> {
        debug!("GET {}", url);
        with_retries(self.max_retries, self.retry_backoff, |_| self.fetch_once(url))
            .with_context(|| format!("failed to fetch data from nba server ({})", url))
    }
}

/// Run `op` up to `max_retries` times, waiting `attempt * backoff` between
/// attempts. The closure gets the 1-based attempt number.
pub fn with_retries<T>(max_retries: u32, backoff: Duration, op: impl FnMut(u32) -> Result<T>) -> Result<T> {
    retry_with_sleep(max_retries, backoff, thread::sleep, op)
}

fn retry_with_sleep<T>(
    max_retries: u32,
    backoff: Duration,
    mut sleep: impl FnMut(Duration),
    mut op: impl FnMut(u32) -> Result<T>,
) -> Result<T> {
    let max_retries = max_retries.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt) {
            Ok(v) => return Ok(v),
            Err(e) if attempt >= max_retries => {
                return Err(e.context(format!("giving up after {} attempts", attempt)));
            }
            Err(e) => {
                warn!("attempt {} failed: {:#}", attempt, e);
                let wait = backoff * attempt;
                if !wait.is_zero() {
                    info!("retrying in {:?}", wait);
                    sleep(wait);
                }
                attempt += 1;
            }
        }
    }
}

pub trait NBAEndpoint {
    fn endpoint_url(&self) -> String;

    fn send_request(&self, transport: &dyn StatsTransport) -> Result<Value> {
        transport.get_json(&self.endpoint_url())
    }
}

pub trait SaveToDataframe: NBAEndpoint {
    fn load_dataframes(&self, transport: &dyn StatsTransport) -> Result<HashMap<String, DataFrame>> {
        let endpoint_json = self.send_request(transport)?;
        frames_from_json(&endpoint_json)
    }
}

pub struct ShotChartDetail {
    pub player_id: PlayerID,
    pub team_id: TeamID,
    pub season: Season,
    pub season_type: SeasonType,
    pub context_measure: ContextMeasure,
}

pub struct CommonAllPlayers {
    pub league_id: LeagueID,
    pub season: Season,
}

impl SaveToDataframe for ShotChartDetail {
}

impl SaveToDataframe for CommonAllPlayers {
}

impl NBAEndpoint for ShotChartDetail {
    fn endpoint_url(&self) -> String {
        format!(
            "{}/shotchartdetail?AheadBehind=&ClutchTime=&ContextFilter=&{}&DateFrom=&DateTo=&EndPeriod=&EndRange=&GameID=&GameSegment=&{}&{}&Location=&{}&{}&Outcome=&{}&{}&PlayerPosition=&RangeType=&RookieYear=&{}&SeasonSegment=&{}&StartPeriod=&StartRange=&{}&VsConference=&VsDivision=",
            NBA_BASE_URL,
            self.context_measure,
            LastNGames::default(),
            LeagueID::default(),
            Month::default(),
            OpponentTeamID::default(),
            Period::default(),
            self.player_id,
            self.season,
            self.season_type,
            self.team_id,
        )
    }
}

impl NBAEndpoint for CommonAllPlayers {
    fn endpoint_url(&self) -> String {
        format!("{}/commonallplayers?{}&{}&IsOnlyCurrentSeason=0", NBA_BASE_URL, self.league_id, self.season)
    }
}

impl ShotChartDetail {
    pub fn new(player_id: i64, team_id: i64, season: Season) -> Self {
        ShotChartDetail {
            player_id: PlayerID(player_id),
            team_id: TeamID(team_id),
            season,
            season_type: Default::default(),
            context_measure: Default::default(),
        }
    }

    pub fn fetch_shots(&self, transport: &dyn StatsTransport) -> Result<Vec<Shot>> {
        let frames = self.load_dataframes(transport)?;
        let shot_df = frames
            .get(SHOT_CHART_RESULT_SET)
            .ok_or_else(|| anyhow!("response has no {} result set", SHOT_CHART_RESULT_SET))?;
        let shots = shots_from_frame(shot_df)?;
        info!("fetched {} shots for {} {}", shots.len(), self.player_id, self.season);
        Ok(shots)
    }
}

impl CommonAllPlayers {
    pub fn fetch_players(&self, transport: &dyn StatsTransport) -> Result<Vec<PlayerRow>> {
        let frames = self.load_dataframes(transport)?;
        let players_df = frames
            .get(ALL_PLAYERS_RESULT_SET)
            .ok_or_else(|| anyhow!("response has no {} result set", ALL_PLAYERS_RESULT_SET))?;
        players_from_frame(players_df)
    }
}

/// Turn every `resultSets` entry (headers + rowSet) into a DataFrame keyed by
/// its name. Column types follow the first non-null value.
pub fn frames_from_json(endpoint_json: &Value) -> Result<HashMap<String, DataFrame>> {
    let load_start = Instant::now();
    let result_sets = endpoint_json["resultSets"]
        .as_array()
        .ok_or_else(|| anyhow!("response has no resultSets array"))?;
    let mut stats_dataframes: HashMap<String, DataFrame> = HashMap::new();
    for data_set in result_sets {
        let data_set_name = data_set["name"].as_str().ok_or_else(|| anyhow!("result set without a name"))?;
        let data_set_headers = data_set["headers"].as_array().ok_or_else(|| anyhow!("{} has no headers", data_set_name))?;
        let data_set_values = data_set["rowSet"].as_array().ok_or_else(|| anyhow!("{} has no rowSet", data_set_name))?;

        let mut headers_to_values: Vec<(&str, Vec<&Value>)> = Vec::with_capacity(data_set_headers.len());
        for header in data_set_headers {
            let col_name = header.as_str().ok_or_else(|| anyhow!("{} has a non-string header", data_set_name))?;
            headers_to_values.push((col_name, Vec::with_capacity(data_set_values.len())));
        }
        for row in data_set_values {
            insert_row_values(&mut headers_to_values, row)?;
        }

        let mut df_series: Vec<Series> = Vec::new();
        if !data_set_values.is_empty() {
            for (col_name, json_values) in headers_to_values {
                df_series.push(column_series(col_name, &json_values));
            }
        }
        stats_dataframes.insert(data_set_name.to_string(), DataFrame::new(df_series)?);
    }
    debug!("dataframe loading took {:?}", load_start.elapsed());
    Ok(stats_dataframes)
}

fn insert_row_values<'a>(headers_to_values: &mut [(&'a str, Vec<&'a Value>)], row: &'a Value) -> Result<()> {
    let row_array = row.as_array().ok_or_else(|| anyhow!("rowSet entry is not an array"))?;
    if row_array.len() != headers_to_values.len() {
        bail!("row has {} values for {} headers", row_array.len(), headers_to_values.len());
    }
    for (pos, col_val) in row_array.iter().enumerate() {
        headers_to_values[pos].1.push(col_val);
    }
    Ok(())
}

fn column_series(col_name: &str, json_values: &[&Value]) -> Series {
    match json_values.iter().find(|v| !v.is_null()) {
        Some(v) if v.is_i64() || v.is_u64() => {
            let typed_data = json_values.iter().map(|v| v.as_i64()).collect::<Vec<Option<i64>>>();
            Series::new(col_name, typed_data)
        }
        Some(v) if v.is_f64() => {
            let typed_data = json_values.iter().map(|v| v.as_f64()).collect::<Vec<Option<f64>>>();
            Series::new(col_name, typed_data)
        }
        _ => {
            let typed_data = json_values.iter().map(|v| v.as_str()).collect::<Vec<Option<&str>>>();
            Series::new(col_name, typed_data)
        }
    }
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let col = df.column(name)?.cast(&DataType::Float64)?;
    let values = col.f64()?.into_iter().collect();
    Ok(values)
}

fn int_column(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let col = df.column(name)?.cast(&DataType::Int64)?;
    let values = col.i64()?.into_iter().collect();
    Ok(values)
}

fn str_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let col = df.column(name)?.cast(&DataType::Utf8)?;
    let values = col.utf8()?.into_iter().map(|v| v.map(str::to_string)).collect();
    Ok(values)
}

/// Pull shots out of a `Shot_Chart_Detail` frame. Rows without a location
/// are dropped.
pub fn shots_from_frame(df: &DataFrame) -> Result<Vec<Shot>> {
    if df.height() == 0 {
        return Ok(Vec::new());
    }
    let xs = float_column(df, "LOC_X")?;
    let ys = float_column(df, "LOC_Y")?;
    let made = int_column(df, "SHOT_MADE_FLAG")?;
    let actions = if df.get_column_names().contains(&"ACTION_TYPE") {
        str_column(df, "ACTION_TYPE")?
    } else {
        vec![None; df.height()]
    };

    let shots = xs
        .into_iter()
        .zip(ys)
        .zip(made)
        .zip(actions)
        .filter_map(|(((x, y), made), action_type)| {
            Some(Shot {
                loc_x: x?,
                loc_y: y?,
                made: made.unwrap_or(0) != 0,
                action_type,
            })
        })
        .collect();
    Ok(shots)
}

pub fn players_from_frame(df: &DataFrame) -> Result<Vec<PlayerRow>> {
    if df.height() == 0 {
        return Ok(Vec::new());
    }
    let ids = int_column(df, "PERSON_ID")?;
    let names = str_column(df, "DISPLAY_FIRST_LAST")?;
    let roster = int_column(df, "ROSTERSTATUS")?;
    let teams = int_column(df, "TEAM_ID")?;

    let players = ids
        .into_iter()
        .zip(names)
        .zip(roster)
        .zip(teams)
        .filter_map(|(((id, name), roster), team)| {
            Some(PlayerRow {
                person_id: id?,
                full_name: name?,
                is_active: roster.unwrap_or(0) == 1,
                team_id: team.unwrap_or(0),
            })
        })
        .collect();
    Ok(players)
}

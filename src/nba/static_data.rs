//! Franchise list and a short list of active players, bundled so the
//! dashboard works before the player directory has been synced.

pub struct TeamInfo {
    pub id: i64,
    pub full_name: &'static str,
    pub abbreviation: &'static str,
}

pub struct PlayerInfo {
    pub id: i64,
    pub full_name: &'static str,
    pub team_id: i64,
}

pub static TEAMS: [TeamInfo; 30] = [
    TeamInfo { id: 1610612737, full_name: "Atlanta Hawks", abbreviation: "ATL" },
    TeamInfo { id: 1610612738, full_name: "Boston Celtics", abbreviation: "BOS" },
    TeamInfo { id: 1610612739, full_name: "Cleveland Cavaliers", abbreviation: "CLE" },
    TeamInfo { id: 1610612740, full_name: "New Orleans Pelicans", abbreviation: "NOP" },
    TeamInfo { id: 1610612741, full_name: "Chicago Bulls", abbreviation: "CHI" },
    TeamInfo { id: 1610612742, full_name: "Dallas Mavericks", abbreviation: "DAL" },
    TeamInfo { id: 1610612743, full_name: "Denver Nuggets", abbreviation: "DEN" },
    TeamInfo { id: 1610612744, full_name: "Golden State Warriors", abbreviation: "GSW" },
    TeamInfo { id: 1610612745, full_name: "Houston Rockets", abbreviation: "HOU" },
    TeamInfo { id: 1610612746, full_name: "Los Angeles Clippers", abbreviation: "LAC" },
    TeamInfo { id: 1610612747, full_name: "Los Angeles Lakers", abbreviation: "LAL" },
    TeamInfo { id: 1610612748, full_name: "Miami Heat", abbreviation: "MIA" },
    TeamInfo { id: 1610612749, full_name: "Milwaukee Bucks", abbreviation: "MIL" },
    TeamInfo { id: 1610612750, full_name: "Minnesota Timberwolves", abbreviation: "MIN" },
    TeamInfo { id: 1610612751, full_name: "Brooklyn Nets", abbreviation: "BKN" },
    TeamInfo { id: 1610612752, full_name: "New York Knicks", abbreviation: "NYK" },
    TeamInfo { id: 1610612753, full_name: "Orlando Magic", abbreviation: "ORL" },
    TeamInfo { id: 1610612754, full_name: "Indiana Pacers", abbreviation: "IND" },
    TeamInfo { id: 1610612755, full_name: "Philadelphia 76ers", abbreviation: "PHI" },
    TeamInfo { id: 1610612756, full_name: "Phoenix Suns", abbreviation: "PHX" },
    TeamInfo { id: 1610612757, full_name: "Portland Trail Blazers", abbreviation: "POR" },
    TeamInfo { id: 1610612758, full_name: "Sacramento Kings", abbreviation: "SAC" },
    TeamInfo { id: 1610612759, full_name: "San Antonio Spurs", abbreviation: "SAS" },
    TeamInfo { id: 1610612760, full_name: "Oklahoma City Thunder", abbreviation: "OKC" },
    TeamInfo { id: 1610612761, full_name: "Toronto Raptors", abbreviation: "TOR" },
    TeamInfo { id: 1610612762, full_name: "Utah Jazz", abbreviation: "UTA" },
    TeamInfo { id: 1610612763, full_name: "Memphis Grizzlies", abbreviation: "MEM" },
    TeamInfo { id: 1610612764, full_name: "Washington Wizards", abbreviation: "WAS" },
    TeamInfo { id: 1610612765, full_name: "Detroit Pistons", abbreviation: "DET" },
    TeamInfo { id: 1610612766, full_name: "Charlotte Hornets", abbreviation: "CHA" },
];

pub static PLAYERS: [PlayerInfo; 30] = [
    PlayerInfo { id: 1629029, full_name: "Luka Dončić", team_id: 1610612747 },
    PlayerInfo { id: 2544, full_name: "LeBron James", team_id: 1610612747 },
    PlayerInfo { id: 201939, full_name: "Stephen Curry", team_id: 1610612744 },
    PlayerInfo { id: 201142, full_name: "Kevin Durant", team_id: 1610612745 },
    PlayerInfo { id: 203507, full_name: "Giannis Antetokounmpo", team_id: 1610612749 },
    PlayerInfo { id: 203999, full_name: "Nikola Jokić", team_id: 1610612743 },
    PlayerInfo { id: 203954, full_name: "Joel Embiid", team_id: 1610612755 },
    PlayerInfo { id: 1628369, full_name: "Jayson Tatum", team_id: 1610612738 },
    PlayerInfo { id: 1628983, full_name: "Shai Gilgeous-Alexander", team_id: 1610612760 },
    PlayerInfo { id: 1630162, full_name: "Anthony Edwards", team_id: 1610612750 },
    PlayerInfo { id: 202681, full_name: "Kyrie Irving", team_id: 1610612742 },
    PlayerInfo { id: 1626164, full_name: "Devin Booker", team_id: 1610612756 },
    PlayerInfo { id: 1628973, full_name: "Jalen Brunson", team_id: 1610612752 },
    PlayerInfo { id: 1628378, full_name: "Donovan Mitchell", team_id: 1610612739 },
    PlayerInfo { id: 1641705, full_name: "Victor Wembanyama", team_id: 1610612759 },
    PlayerInfo { id: 1629630, full_name: "Ja Morant", team_id: 1610612763 },
    PlayerInfo { id: 1629027, full_name: "Trae Young", team_id: 1610612737 },
    PlayerInfo { id: 203081, full_name: "Damian Lillard", team_id: 1610612749 },
    PlayerInfo { id: 202710, full_name: "Jimmy Butler", team_id: 1610612744 },
    PlayerInfo { id: 203076, full_name: "Anthony Davis", team_id: 1610612742 },
    PlayerInfo { id: 1630169, full_name: "Tyrese Haliburton", team_id: 1610612754 },
    PlayerInfo { id: 1629627, full_name: "Zion Williamson", team_id: 1610612740 },
    PlayerInfo { id: 1628368, full_name: "De'Aaron Fox", team_id: 1610612759 },
    PlayerInfo { id: 1631094, full_name: "Paolo Banchero", team_id: 1610612753 },
    PlayerInfo { id: 1630595, full_name: "Cade Cunningham", team_id: 1610612765 },
    PlayerInfo { id: 1630163, full_name: "LaMelo Ball", team_id: 1610612766 },
    PlayerInfo { id: 1627734, full_name: "Domantas Sabonis", team_id: 1610612758 },
    PlayerInfo { id: 202695, full_name: "Kawhi Leonard", team_id: 1610612746 },
    PlayerInfo { id: 1630567, full_name: "Scottie Barnes", team_id: 1610612761 },
    PlayerInfo { id: 1628374, full_name: "Lauri Markkanen", team_id: 1610612762 },
];

/// Franchise names in the order the dropdown shows them.
pub fn teams_list() -> Vec<String> {
    TEAMS.iter().map(|t| t.full_name.to_string()).collect()
}

pub fn find_team_id(full_name: &str) -> Option<i64> {
    let full_name = full_name.trim();
    TEAMS
        .iter()
        .find(|t| t.full_name.eq_ignore_ascii_case(full_name) || t.abbreviation.eq_ignore_ascii_case(full_name))
        .map(|t| t.id)
}

pub fn search_teams(keyword: &str) -> Vec<&'static TeamInfo> {
    let needle = keyword.trim().to_lowercase();
    TEAMS
        .iter()
        .filter(|t| t.full_name.to_lowercase().contains(&needle) || t.abbreviation.to_lowercase() == needle)
        .collect()
}

pub fn active_player_names() -> Vec<String> {
    let mut names: Vec<String> = PLAYERS.iter().map(|p| p.full_name.to_string()).collect();
    names.sort();
    names
}

pub fn find_player_id(full_name: &str) -> Option<i64> {
    let needle = full_name.trim().to_lowercase();
    PLAYERS.iter().find(|p| p.full_name.to_lowercase() == needle).map(|p| p.id)
}

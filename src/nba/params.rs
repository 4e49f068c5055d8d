    use core::fmt;
    use std::{fmt::Display, str::FromStr};
    use chrono::Datelike;
    use anyhow::{anyhow, Result};
    use serde::{Serialize, Deserialize};


    pub enum LeagueID {
        NBA,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(try_from = "String", into = "String")]
    pub struct Season(String);

    pub enum SeasonType {
        RegularSeason,
    }

    pub enum ContextMeasure {
        FGA,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PlayerID(pub i64);

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TeamID(pub i64);

    pub enum LastNGames {
        N(i32)
    }

    pub enum Period {
        P(i8)
    }

    pub enum Month {
        M(i8)
    }

    pub struct OpponentTeamID(pub i64);

    impl Season {
        pub fn as_str(&self) -> &str {
            &self.0
        }

        /// Season that contains `date`. A season starts in October.
        pub fn containing(date: chrono::NaiveDate) -> Self {
            let first_year = if date.month() >= 10 { date.year() } else { date.year() - 1 };
            Season(format!("{}-{:02}", first_year, (first_year + 1) % 100))
        }
    }

    impl FromStr for Season {
        type Err = anyhow::Error;

        fn from_str(s: &str) -> Result<Self> {
            let s = s.trim();
            let (first, second) = s
                .split_once('-')
                .ok_or_else(|| anyhow!("season {:?} is not in YYYY-YY form", s))?;
            if first.len() != 4 || second.len() != 2 {
                return Err(anyhow!("season {:?} is not in YYYY-YY form", s));
            }
            let first_year: i32 = first.parse().map_err(|_| anyhow!("bad season year in {:?}", s))?;
            let second_year: i32 = second.parse().map_err(|_| anyhow!("bad season year in {:?}", s))?;
            if (first_year + 1) % 100 != second_year {
                return Err(anyhow!("season {:?} does not span consecutive years", s));
            }
            Ok(Season(s.to_string()))
        }
    }

    impl TryFrom<String> for Season {
        type Error = anyhow::Error;

        fn try_from(s: String) -> Result<Self> {
            s.parse()
        }
    }

    impl From<Season> for String {
        fn from(season: Season) -> String {
            season.0
        }
    }

    impl Display for LeagueID {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self {
                LeagueID::NBA => write!(f, "LeagueID=00")
            }
        }
    }

    impl Display for Season {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "Season={}", self.0)
        }
    }

    impl Display for SeasonType {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self {
                SeasonType::RegularSeason => write!(f, "SeasonType=Regular%20Season"),
            }
        }
    }

    impl Display for ContextMeasure {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self {
                ContextMeasure::FGA => write!(f, "ContextMeasure=FGA"),
            }
        }
    }

    impl Display for PlayerID {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "PlayerID={}", self.0)
        }
    }

    impl Display for TeamID {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "TeamID={}", self.0)
        }
    }

    impl Display for LastNGames {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self {
                LastNGames::N(n) => write!(f, "LastNGames={}", n)
            }
        }
    }

    impl Display for Period {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self {
                Period::P(period_num) => write!(f, "Period={}", period_num)
            }
        }
    }

    impl Display for Month {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self {
                Month::M(month) => write!(f, "Month={}", month)
            }
        }
    }

    impl Display for OpponentTeamID {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "OpponentTeamID={}", self.0)
        }
    }

    impl Default for LeagueID {
        fn default() -> Self { LeagueID::NBA }
    }

    impl Default for Season {
        fn default() -> Self {
            Season::containing(chrono::Local::now().date_naive())
        }
    }

    impl Default for SeasonType {
        fn default() -> Self { SeasonType::RegularSeason }
    }

    impl Default for ContextMeasure {
        fn default() -> Self { ContextMeasure::FGA }
    }

    impl Default for LastNGames {
        fn default() -> Self { LastNGames::N(0) }
    }

    impl Default for Period {
        fn default() -> Self { Period::P(0) }
    }

    impl Default for Month {
        fn default() -> Self { Month::M(0) }
    }

    impl Default for OpponentTeamID {
        fn default() -> Self { OpponentTeamID(0) }
    }

//! Shot records and what we know about them: where they were taken, whether
//! they went in, and which zone of the floor they belong to.

pub mod synthetic;
pub mod zones;

use serde::{Deserialize, Serialize};

pub use zones::{classify, Zone, ZoneCounts, ZoneSplit};

/// A single field goal attempt, in stats API court coordinates
/// (tenths of a foot, hoop at the origin).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    #[serde(rename = "LOC_X")]
    pub loc_x: f64,
    #[serde(rename = "LOC_Y")]
    pub loc_y: f64,
    #[serde(rename = "SHOT_MADE_FLAG", with = "made_flag")]
    pub made: bool,
    #[serde(rename = "ACTION_TYPE", default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
}

impl Shot {
    pub fn new(loc_x: f64, loc_y: f64, made: bool) -> Self {
        Shot { loc_x, loc_y, made, action_type: None }
    }

    /// Distance from the hoop in tenths of a foot.
    pub fn distance(&self) -> f64 {
        self.loc_x.hypot(self.loc_y)
    }

    pub fn distance_ft(&self) -> f64 {
        self.distance() / 10.0
    }

    pub fn zone(&self) -> Zone {
        classify(self.loc_x, self.loc_y)
    }
}

/// Where a set of shots came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShotSource {
    Live,
    Cache,
    Synthetic,
}

impl ShotSource {
    pub fn is_synthetic(&self) -> bool {
        matches!(self, ShotSource::Synthetic)
    }
}

// The stats API and the cache files store SHOT_MADE_FLAG as 0/1.
mod made_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(made: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(u8::from(*made))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(u8::deserialize(d)? != 0)
    }
}

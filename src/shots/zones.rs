use serde::Serialize;
use tabled::Tabled;

use super::Shot;

pub const PAINT_HALF_WIDTH: f64 = 80.0;
pub const PAINT_TOP: f64 = 142.5;
pub const FREE_THROW_BAND_TOP: f64 = 200.0;
pub const THREE_POINT_RADIUS: f64 = 237.5;
pub const CORNER_THREE_X: f64 = 220.0;
pub const CORNER_THREE_TOP: f64 = 92.5;
pub const COURT_HALF_WIDTH: f64 = 250.0;
pub const BASELINE_Y: f64 = -47.5;
pub const HALF_COURT_Y: f64 = 422.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Paint,
    FreeThrow,
    ThreePoint,
    MidRange,
}

/// The series a shot is plotted in. The free-throw band has no series of
/// its own and plots with mid-range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerGroup {
    Paint,
    MidRange,
    ThreePoint,
}

/// Bucket a shot location into a zone. Checks run in order, so a shot inside
/// the paint rectangle is paint even beyond the arc radius.
pub fn classify(x: f64, y: f64) -> Zone {
    if x.abs() <= PAINT_HALF_WIDTH && y <= PAINT_TOP {
        Zone::Paint
    } else if x.hypot(y) > THREE_POINT_RADIUS {
        Zone::ThreePoint
    } else if y > PAINT_TOP && y < FREE_THROW_BAND_TOP {
        Zone::FreeThrow
    } else {
        Zone::MidRange
    }
}

impl Zone {
    pub const ALL: [Zone; 4] = [Zone::Paint, Zone::FreeThrow, Zone::ThreePoint, Zone::MidRange];

    pub fn marker_group(&self) -> MarkerGroup {
        match self {
            Zone::Paint => MarkerGroup::Paint,
            Zone::ThreePoint => MarkerGroup::ThreePoint,
            Zone::FreeThrow | Zone::MidRange => MarkerGroup::MidRange,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Zone::Paint => "Paint",
            Zone::FreeThrow => "Free-throw area",
            Zone::ThreePoint => "Three-point",
            Zone::MidRange => "Mid-range",
        }
    }
}

impl MarkerGroup {
    pub const ALL: [MarkerGroup; 3] = [MarkerGroup::Paint, MarkerGroup::ThreePoint, MarkerGroup::MidRange];

    pub fn label(&self) -> &'static str {
        match self {
            MarkerGroup::Paint => "Paint",
            MarkerGroup::MidRange => "Mid-range",
            MarkerGroup::ThreePoint => "Threes",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ZoneCounts {
    pub paint: usize,
    pub free_throw: usize,
    pub three_point: usize,
    pub mid_range: usize,
}

impl ZoneCounts {
    pub fn from_shots(shots: &[Shot]) -> Self {
        let mut counts = ZoneCounts::default();
        for shot in shots {
            *counts.slot(shot.zone()) += 1;
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.paint + self.free_throw + self.three_point + self.mid_range
    }

    /// Count as plotted: free-throw band shots fold into mid-range.
    pub fn plotted(&self, group: MarkerGroup) -> usize {
        match group {
            MarkerGroup::Paint => self.paint,
            MarkerGroup::ThreePoint => self.three_point,
            MarkerGroup::MidRange => self.mid_range + self.free_throw,
        }
    }

    fn slot(&mut self, zone: Zone) -> &mut usize {
        match zone {
            Zone::Paint => &mut self.paint,
            Zone::FreeThrow => &mut self.free_throw,
            Zone::ThreePoint => &mut self.three_point,
            Zone::MidRange => &mut self.mid_range,
        }
    }
}

/// Attempts and makes for one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct ZoneSplit {
    pub zone: &'static str,
    pub attempts: usize,
    pub makes: usize,
    #[tabled(display_with = "display_pct")]
    pub fg_pct: Option<f64>,
}

impl ZoneSplit {
    pub fn from_shots(shots: &[Shot]) -> Vec<ZoneSplit> {
        Zone::ALL
            .iter()
            .map(|&zone| {
                let in_zone = shots.iter().filter(|s| s.zone() == zone);
                let (attempts, makes) = in_zone.fold((0, 0), |(a, m), s| (a + 1, m + usize::from(s.made)));
                let fg_pct = if attempts > 0 {
                    Some(makes as f64 * 100.0 / attempts as f64)
                } else {
                    None
                };
                ZoneSplit { zone: zone.label(), attempts, makes, fg_pct }
            })
            .collect()
    }
}

fn display_pct(pct: &Option<f64>) -> String {
    match pct {
        Some(p) => format!("{:.1}%", p),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_rectangle_wins_first() {
        assert_eq!(classify(0.0, 0.0), Zone::Paint);
        assert_eq!(classify(80.0, 142.5), Zone::Paint);
        assert_eq!(classify(-80.0, -47.5), Zone::Paint);
        assert_eq!(classify(80.1, 0.0), Zone::MidRange);
        assert_eq!(classify(0.0, 142.6), Zone::FreeThrow);
    }

    #[test]
    fn three_point_is_strictly_beyond_the_arc() {
        assert_eq!(classify(0.0, 237.5), Zone::MidRange);
        assert_eq!(classify(0.0, 237.6), Zone::ThreePoint);
        assert_eq!(classify(-150.0, 200.0), Zone::ThreePoint);
        // corner spot inside the arc radius stays mid-range
        assert_eq!(classify(225.0, 0.0), Zone::MidRange);
        assert_eq!(classify(240.0, 0.0), Zone::ThreePoint);
    }

    #[test]
    fn free_throw_band_is_open_on_both_ends() {
        assert_eq!(classify(100.0, 150.0), Zone::FreeThrow);
        assert_eq!(classify(100.0, 199.9), Zone::FreeThrow);
        assert_eq!(classify(100.0, 200.0), Zone::MidRange);
        assert_eq!(classify(100.0, 142.5), Zone::MidRange);
    }

    #[test]
    fn free_throw_plots_with_mid_range() {
        assert_eq!(Zone::FreeThrow.marker_group(), MarkerGroup::MidRange);
        assert_eq!(Zone::MidRange.marker_group(), MarkerGroup::MidRange);
        assert_eq!(Zone::Paint.marker_group(), MarkerGroup::Paint);
        assert_eq!(Zone::ThreePoint.marker_group(), MarkerGroup::ThreePoint);
    }

    #[test]
    fn counts_sum_to_shot_total() {
        let shots = vec![
            Shot::new(0.0, 10.0, true),
            Shot::new(10.0, 100.0, false),
            Shot::new(0.0, 250.0, true),
            Shot::new(100.0, 160.0, false),
            Shot::new(-150.0, 60.0, true),
        ];
        let counts = ZoneCounts::from_shots(&shots);
        assert_eq!(counts, ZoneCounts { paint: 2, free_throw: 1, three_point: 1, mid_range: 1 });
        assert_eq!(counts.total(), shots.len());
        assert_eq!(counts.plotted(MarkerGroup::MidRange), 2);
    }

    #[test]
    fn splits_report_percentages_per_zone() {
        let shots = vec![
            Shot::new(0.0, 10.0, true),
            Shot::new(5.0, 20.0, false),
            Shot::new(0.0, 260.0, true),
        ];
        let splits = ZoneSplit::from_shots(&shots);
        assert_eq!(splits.len(), 4);
        assert_eq!(splits[0].zone, "Paint");
        assert_eq!(splits[0].attempts, 2);
        assert_eq!(splits[0].makes, 1);
        assert_eq!(splits[0].fg_pct, Some(50.0));
        assert_eq!(splits[1].fg_pct, None);
        assert_eq!(splits[2].fg_pct, Some(100.0));
    }
}

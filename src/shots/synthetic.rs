//! Plausible stand-in shots for when the stats API can't be reached.
//!
//! Each shot first picks a zone from a fixed mix, then draws a location from
//! that zone's own distribution. Candidates are redrawn until [`classify`]
//! agrees with the intended zone, so the generated picture always matches the
//! zone counts shown next to it.

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f64::consts::PI;

use super::zones::*;
use super::Shot;

const MAX_DRAWS: usize = 1_000;

struct ZoneProfile {
    zone: Zone,
    weight: f64,
    make_prob: f64,
    anchor: (f64, f64),
}

static PROFILES: [ZoneProfile; 4] = [
    ZoneProfile { zone: Zone::Paint, weight: 0.38, make_prob: 0.58, anchor: (0.0, 10.0) },
    ZoneProfile { zone: Zone::MidRange, weight: 0.20, make_prob: 0.41, anchor: (-150.0, 60.0) },
    ZoneProfile { zone: Zone::FreeThrow, weight: 0.07, make_prob: 0.43, anchor: (100.0, 170.0) },
    ZoneProfile { zone: Zone::ThreePoint, weight: 0.35, make_prob: 0.36, anchor: (0.0, 255.0) },
];

/// Generate `count` shots. The same seed always gives the same shots.
pub fn generate(count: usize, seed: u64) -> Vec<Shot> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| draw_shot(&mut rng)).collect()
}

/// Seed from a hex cache key: its first 16 digits. Anything that isn't hex
/// seeds with 0.
pub fn seed_from_key(key: &str) -> u64 {
    key.get(..16)
        .and_then(|digits| u64::from_str_radix(digits, 16).ok())
        .unwrap_or(0)
}

fn draw_shot<R: Rng>(rng: &mut R) -> Shot {
    let profile = pick_profile(rng);
    let (x, y) = draw_location(rng, profile);
    let made = rng.gen_bool(profile.make_prob);
    Shot::new(round1(x), round1(y), made)
}

fn pick_profile<R: Rng>(rng: &mut R) -> &'static ZoneProfile {
    let mut roll: f64 = rng.gen();
    for profile in PROFILES.iter() {
        if roll < profile.weight {
            return profile;
        }
        roll -= profile.weight;
    }
    &PROFILES[PROFILES.len() - 1]
}

fn draw_location<R: Rng>(rng: &mut R, profile: &ZoneProfile) -> (f64, f64) {
    for _ in 0..MAX_DRAWS {
        let (x, y) = candidate(rng, profile.zone);
        let (x, y) = (round1(x), round1(y));
        if in_half_court(x, y) && classify(x, y) == profile.zone {
            return (x, y);
        }
    }
    profile.anchor
}

fn candidate<R: Rng>(rng: &mut R, zone: Zone) -> (f64, f64) {
    match zone {
        Zone::Paint => {
            // squash toward the rim
            let x = rng.gen_range(-PAINT_HALF_WIDTH..=PAINT_HALF_WIDTH) * rng.gen::<f64>();
            let depth = PAINT_TOP - BASELINE_Y;
            let y = BASELINE_Y + depth * rng.gen::<f64>().powi(2);
            (x, y)
        }
        Zone::MidRange => polar(rng.gen_range(80.0..THREE_POINT_RADIUS), rng.gen_range(0.0..PI)),
        Zone::FreeThrow => (rng.gen_range(-120.0..120.0), rng.gen_range(PAINT_TOP + 0.5..FREE_THROW_BAND_TOP)),
        Zone::ThreePoint => {
            let r = THREE_POINT_RADIUS + rng.gen_range(1.0..40.0);
            // a little below the hoop line reaches the corners
            polar(r, rng.gen_range(-0.15..PI + 0.15))
        }
    }
}

fn polar(r: f64, theta: f64) -> (f64, f64) {
    (r * theta.cos(), r * theta.sin())
}

fn in_half_court(x: f64, y: f64) -> bool {
    x.abs() <= COURT_HALF_WIDTH - 5.0 && y >= BASELINE_Y && y <= HALF_COURT_Y
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

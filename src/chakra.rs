//! Chakra-balance analyzer
//!
//! Turns a seven-score assessment into the strongest center, the primary
//! imbalance, and a 0-100 balance percentage. No profile means no insight;
//! the optional stays absent rather than getting zero-filled, so "no
//! assessment yet" never looks like "perfectly average".

use crate::db::ChakraProfile;
use serde::{Deserialize, Serialize};

/// The seven energy centers, in canonical order. Ties in the analyzer break
/// toward the earlier entry in this list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chakra {
    Root,
    Sacral,
    SolarPlexus,
    Heart,
    Throat,
    ThirdEye,
    Crown,
}

impl Chakra {
    /// All centers, canonical order
    pub fn all() -> &'static [Chakra] {
        &[
            Chakra::Root,
            Chakra::Sacral,
            Chakra::SolarPlexus,
            Chakra::Heart,
            Chakra::Throat,
            Chakra::ThirdEye,
            Chakra::Crown,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Chakra::Root => "root",
            Chakra::Sacral => "sacral",
            Chakra::SolarPlexus => "solar_plexus",
            Chakra::Heart => "heart",
            Chakra::Throat => "throat",
            Chakra::ThirdEye => "third_eye",
            Chakra::Crown => "crown",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Chakra::Root => "Root Chakra",
            Chakra::Sacral => "Sacral Chakra",
            Chakra::SolarPlexus => "Solar Plexus Chakra",
            Chakra::Heart => "Heart Chakra",
            Chakra::Throat => "Throat Chakra",
            Chakra::ThirdEye => "Third Eye Chakra",
            Chakra::Crown => "Crown Chakra",
        }
    }

    pub fn score_in(&self, profile: &ChakraProfile) -> f64 {
        match self {
            Chakra::Root => profile.root,
            Chakra::Sacral => profile.sacral,
            Chakra::SolarPlexus => profile.solar_plexus,
            Chakra::Heart => profile.heart,
            Chakra::Throat => profile.throat,
            Chakra::ThirdEye => profile.third_eye,
            Chakra::Crown => profile.crown,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChakraInsights {
    pub primary_imbalance: String,
    pub strongest_chakra: String,
    pub overall_balance: u8, // 0-100
}

/// Derive insights from a single assessment.
pub fn analyze_profile(profile: &ChakraProfile) -> ChakraInsights {
    let mut strongest = Chakra::Root;
    let mut weakest = Chakra::Root;
    let mut sum = 0.0;

    // Strict comparisons keep the first-encountered center on ties
    for &chakra in Chakra::all() {
        let score = chakra.score_in(profile);
        sum += score;
        if score > strongest.score_in(profile) {
            strongest = chakra;
        }
        if score < weakest.score_in(profile) {
            weakest = chakra;
        }
    }

    let mean = sum / Chakra::all().len() as f64;

    ChakraInsights {
        primary_imbalance: weakest.display_name().to_string(),
        strongest_chakra: strongest.display_name().to_string(),
        overall_balance: (mean * 10.0).round().clamp(0.0, 100.0) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(scores: [f64; 7]) -> ChakraProfile {
        ChakraProfile {
            root: scores[0],
            sacral: scores[1],
            solar_plexus: scores[2],
            heart: scores[3],
            throat: scores[4],
            third_eye: scores[5],
            crown: scores[6],
        }
    }

    #[test]
    fn test_strongest_and_weakest() {
        let insights = analyze_profile(&profile([5.0, 3.0, 9.0, 7.0, 2.0, 6.0, 4.0]));
        assert_eq!(insights.strongest_chakra, "Solar Plexus Chakra");
        assert_eq!(insights.primary_imbalance, "Throat Chakra");
    }

    #[test]
    fn test_all_equal_ties_break_to_root() {
        let insights = analyze_profile(&profile([6.0; 7]));
        assert_eq!(insights.strongest_chakra, "Root Chakra");
        assert_eq!(insights.primary_imbalance, "Root Chakra");
        assert_eq!(insights.overall_balance, 60);
    }

    #[test]
    fn test_overall_balance_rounds_mean() {
        // mean = (1+2+3+4+5+6+7)/7 = 4.0 -> 40
        let insights = analyze_profile(&profile([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]));
        assert_eq!(insights.overall_balance, 40);

        // mean = 6.5 -> 65
        let insights = analyze_profile(&profile([6.5; 7]));
        assert_eq!(insights.overall_balance, 65);
    }

    #[test]
    fn test_tie_between_two_later_centers() {
        // heart and throat both 9: heart comes first in canonical order
        let insights = analyze_profile(&profile([5.0, 5.0, 5.0, 9.0, 9.0, 5.0, 5.0]));
        assert_eq!(insights.strongest_chakra, "Heart Chakra");
    }
}

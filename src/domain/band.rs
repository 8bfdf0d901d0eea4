//! Frequency to amateur band classification.
//!
//! Integer inputs are treated as kHz and matched against an ordered table of
//! inclusive ranges, except for a short list of legacy bare-MHz values
//! (`50`, `144`, `432`, ...) that older logs write instead of a kHz figure.
//! Anything else is looked up as a band token such as `"20M"`.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use super::models::Band;

/// Values below this that match no range are labelled as MHz.
const MHZ_FALLBACK_LIMIT: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandRange {
    pub label: String,
    pub low_khz: u64,
    pub high_khz: u64,
}

impl BandRange {
    fn new(label: &str, low_khz: u64, high_khz: u64) -> Self {
        Self { label: label.to_string(), low_khz, high_khz }
    }

    pub fn contains(&self, khz: u64) -> bool {
        self.low_khz <= khz && khz <= self.high_khz
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MhzAlias {
    pub mhz: u64,
    pub label: String,
}

/// The lookup tables driving [`BandClassifier`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandPlan {
    pub ranges: Vec<BandRange>,
    pub mhz_aliases: Vec<MhzAlias>,
    /// Uppercase band token to canonical label.
    pub tokens: BTreeMap<String, String>,
}

impl Default for BandPlan {
    fn default() -> Self {
        let ranges = vec![
            BandRange::new("630m", 472, 479),
            BandRange::new("160m", 1_800, 2_000),
            BandRange::new("80m", 3_500, 4_000),
            BandRange::new("60m", 5_330, 5_405),
            BandRange::new("40m", 7_000, 7_300),
            BandRange::new("30m", 10_100, 10_150),
            BandRange::new("20m", 14_000, 14_350),
            BandRange::new("17m", 18_068, 18_168),
            BandRange::new("15m", 21_000, 21_450),
            BandRange::new("12m", 24_890, 24_990),
            BandRange::new("10m", 28_000, 29_700),
            BandRange::new("6m", 50_000, 54_000),
            BandRange::new("2m", 144_000, 148_000),
            BandRange::new("1.25m", 222_000, 225_000),
            BandRange::new("70cm", 420_000, 450_000),
            BandRange::new("33cm", 902_000, 928_000),
            BandRange::new("23cm", 1_240_000, 1_300_000),
            BandRange::new("13cm", 2_300_000, 2_450_000),
            BandRange::new("9cm", 3_300_000, 3_500_000),
            BandRange::new("6cm", 5_650_000, 5_925_000),
            BandRange::new("3cm", 10_000_000, 10_500_000),
            BandRange::new("1.25cm", 24_000_000, 24_250_000),
            BandRange::new("6mm", 47_000_000, 47_200_000),
            BandRange::new("4mm", 75_500_000, 81_000_000),
            BandRange::new("2.5mm", 119_980_000, 120_020_000),
            BandRange::new("2mm", 142_000_000, 149_000_000),
            BandRange::new("1mm", 241_000_000, 250_000_000),
        ];

        let mhz_aliases = [
            (50, "6m"),
            (144, "2m"),
            (222, "1.25m"),
            (432, "70cm"),
            (902, "33cm"),
            (903, "33cm"),
            (1296, "23cm"),
        ]
        .into_iter()
        .map(|(mhz, label)| MhzAlias { mhz, label: label.to_string() })
        .collect();

        let tokens = ranges
            .iter()
            .map(|range| (range.label.to_ascii_uppercase(), range.label.clone()))
            .collect();

        Self { ranges, mhz_aliases, tokens }
    }
}

/// Maps raw frequencies or band tokens to canonical band labels.
///
/// Classification is a pure function of the input and the plan the
/// classifier was built with.
///
/// # Examples
///
/// ```
/// use maidenhead_map::domain::BandClassifier;
///
/// let bands = BandClassifier::default();
/// assert_eq!(bands.classify("14070").as_str(), "20m");
/// assert_eq!(bands.classify("50").as_str(), "6m");
/// assert_eq!(bands.classify("70cm").as_str(), "70cm");
/// assert_eq!(bands.classify("160000").as_str(), "160000kHz");
/// ```
#[derive(Debug, Clone, Default)]
pub struct BandClassifier {
    plan: BandPlan,
}

impl BandClassifier {
    pub fn new(plan: BandPlan) -> Self {
        Self { plan }
    }

    /// Classifies a raw frequency or band token.
    ///
    /// Blank input yields [`Band::unknown`]. Unknown textual tokens are
    /// returned trimmed and uppercased.
    pub fn classify(&self, raw: &str) -> Band {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Band::unknown();
        }

        match trimmed.parse::<i64>() {
            Ok(freq) => self.classify_frequency(freq),
            Err(_) => self.classify_token(trimmed),
        }
    }

    /// Classifies an integer frequency, kHz unless it is a legacy MHz alias.
    pub fn classify_frequency(&self, freq: i64) -> Band {
        if let Ok(value) = u64::try_from(freq) {
            if let Some(alias) = self.plan.mhz_aliases.iter().find(|alias| alias.mhz == value) {
                return Band::new(alias.label.clone());
            }
            if let Some(range) = self.plan.ranges.iter().find(|range| range.contains(value)) {
                return Band::new(range.label.clone());
            }
        }

        if freq < MHZ_FALLBACK_LIMIT as i64 {
            Band::new(format!("{freq}MHz"))
        } else {
            Band::new(format!("{freq}kHz"))
        }
    }

    fn classify_token(&self, token: &str) -> Band {
        let upper = token.to_ascii_uppercase();
        match self.plan.tokens.get(&upper) {
            Some(label) => Band::new(label.clone()),
            None => Band::new(upper),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(raw: &str) -> String {
        BandClassifier::default().classify(raw).as_str().to_string()
    }

    #[test]
    fn test_hf_frequencies_in_khz() {
        assert_eq!(classify("475"), "630m");
        assert_eq!(classify("1830"), "160m");
        assert_eq!(classify("3573"), "80m");
        assert_eq!(classify("5357"), "60m");
        assert_eq!(classify("7030"), "40m");
        assert_eq!(classify("10136"), "30m");
        assert_eq!(classify("14070"), "20m");
        assert_eq!(classify("18100"), "17m");
        assert_eq!(classify("21074"), "15m");
        assert_eq!(classify("24915"), "12m");
        assert_eq!(classify("28074"), "10m");
    }

    #[test]
    fn test_range_edges_are_inclusive() {
        assert_eq!(classify("14000"), "20m");
        assert_eq!(classify("14350"), "20m");
        assert_eq!(classify("13999"), "13999kHz");
        assert_eq!(classify("14351"), "14351kHz");
    }

    #[test]
    fn test_vhf_and_uhf_in_khz() {
        assert_eq!(classify("50313"), "6m");
        assert_eq!(classify("144174"), "2m");
        assert_eq!(classify("146520"), "2m");
        assert_eq!(classify("223500"), "1.25m");
        assert_eq!(classify("432100"), "70cm");
        assert_eq!(classify("903100"), "33cm");
        assert_eq!(classify("1296100"), "23cm");
    }

    #[test]
    fn test_microwave_in_khz() {
        assert_eq!(classify("2304100"), "13cm");
        assert_eq!(classify("3400100"), "9cm");
        assert_eq!(classify("5760100"), "6cm");
        assert_eq!(classify("10368100"), "3cm");
        assert_eq!(classify("24192100"), "1.25cm");
        assert_eq!(classify("47088100"), "6mm");
        assert_eq!(classify("76032100"), "4mm");
        assert_eq!(classify("120000000"), "2.5mm");
        assert_eq!(classify("144000000"), "2mm");
        assert_eq!(classify("248000000"), "1mm");
    }

    #[test]
    fn test_legacy_bare_mhz_values() {
        assert_eq!(classify("50"), "6m");
        assert_eq!(classify("144"), "2m");
        assert_eq!(classify("222"), "1.25m");
        assert_eq!(classify("432"), "70cm");
        assert_eq!(classify("902"), "33cm");
        assert_eq!(classify("903"), "33cm");
        assert_eq!(classify("1296"), "23cm");
    }

    #[test]
    fn test_unmatched_values_get_unit_suffix() {
        assert_eq!(classify("99"), "99MHz");
        assert_eq!(classify("0"), "0MHz");
        assert_eq!(classify("-5"), "-5MHz");
        assert_eq!(classify("160000"), "160000kHz");
        assert_eq!(classify("300000000"), "300000000kHz");
        assert_eq!(classify("1000"), "1000kHz");
    }

    #[test]
    fn test_band_tokens() {
        assert_eq!(classify("20M"), "20m");
        assert_eq!(classify("20m"), "20m");
        assert_eq!(classify("70CM"), "70cm");
        assert_eq!(classify(" 1.25m "), "1.25m");
        assert_eq!(classify("2.5MM"), "2.5mm");
    }

    #[test]
    fn test_unknown_tokens_are_uppercased() {
        assert_eq!(classify("light"), "LIGHT");
        assert_eq!(classify(" 14.070 "), "14.070");
    }

    #[test]
    fn test_blank_input_is_unknown() {
        assert_eq!(classify(""), "Unknown");
        assert_eq!(classify("   "), "Unknown");
    }

    #[test]
    fn test_custom_plan() {
        let plan = BandPlan {
            ranges: vec![BandRange::new("40m", 7000, 7200)],
            mhz_aliases: Vec::new(),
            tokens: BTreeMap::new(),
        };
        let bands = BandClassifier::new(plan);
        assert_eq!(bands.classify("7100").as_str(), "40m");
        assert_eq!(bands.classify("7250").as_str(), "7250kHz");
        assert_eq!(bands.classify("50").as_str(), "50MHz");
        assert_eq!(bands.classify("20m").as_str(), "20M");
    }

    #[test]
    fn test_classification_is_repeatable() {
        let bands = BandClassifier::default();
        let first = bands.classify("14070");
        let second = bands.classify("14070");
        assert_eq!(first, second);
    }
}

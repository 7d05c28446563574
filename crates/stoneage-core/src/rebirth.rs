//! Rebirth (환포) stat engine.
//!
//! A character goes through five rebirth tiers. Each tier has its own level
//! and point allocation across four stats, and the value credited by one tier
//! feeds the point budget of the next:
//!
//! ```text
//! available[0] = 20 + 3 × (level[0] − 1)
//! available[i] = final[i−1] + 3 × (level[i] − 1)
//! final[i]     = Σ floor(stat × rate[i]) + BONUSES[i]
//! ```
//!
//! `rate[i]` maps a full allocation at level 140 (with every earlier tier at
//! its maximum) onto the published maximum for that tier, so the chain of
//! all-in allocations reproduces [`MAX_REBIRTH`] exactly.
//!
//! Everything here is recomputed from scratch on each call: [`compute`] is a
//! left-to-right fold over the five tiers and holds no state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CompanionError, Result};

/// Number of rebirth tiers.
pub const TIER_COUNT: usize = 5;

/// Flat bonus credited per tier.
pub const BONUSES: [u32; TIER_COUNT] = [10, 20, 30, 40, 50];

/// Highest achievable final value per tier.
pub const MAX_REBIRTH: [u32; TIER_COUNT] = [66, 98, 130, 161, 192];

/// Points granted by the rebirth-point quests (assumed all completed).
pub const QUEST_POINTS: u32 = 20;

/// Points gained per level after the first.
pub const POINTS_PER_LEVEL: u32 = 3;

pub const MIN_LEVEL: u32 = 1;
pub const MAX_LEVEL: u32 = 140;

/// Budget of each tier at level 140 when every earlier tier reached its max.
const REFERENCE_POINTS: [u32; TIER_COUNT] = [437, 483, 515, 547, 578];

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// One of the four allocatable stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    /// 체력
    Con,
    /// 완력
    Wis,
    /// 건강
    Dex,
    /// 순발
    Agi,
}

impl Stat {
    pub const ALL: [Stat; 4] = [Stat::Con, Stat::Wis, Stat::Dex, Stat::Agi];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stat::Con => "con",
            Stat::Wis => "wis",
            Stat::Dex => "dex",
            Stat::Agi => "agi",
        }
    }

    /// Korean label used by the game UI.
    pub fn label(&self) -> &'static str {
        match self {
            Stat::Con => "체력",
            Stat::Wis => "완력",
            Stat::Dex => "건강",
            Stat::Agi => "순발",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stat {
    type Err = CompanionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "con" | "체력" => Ok(Stat::Con),
            "wis" | "완력" => Ok(Stat::Wis),
            "dex" | "건강" => Ok(Stat::Dex),
            "agi" | "순발" => Ok(Stat::Agi),
            other => Err(CompanionError::UnknownStat(other.to_string())),
        }
    }
}

/// Points allocated to each stat for one tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct StatInput {
    pub con: u32,
    pub wis: u32,
    pub dex: u32,
    pub agi: u32,
}

impl StatInput {
    pub fn new(con: u32, wis: u32, dex: u32, agi: u32) -> Self {
        Self { con, wis, dex, agi }
    }

    /// Everything in `con`.
    pub fn con_only(con: u32) -> Self {
        Self {
            con,
            ..Self::default()
        }
    }

    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Con => self.con,
            Stat::Wis => self.wis,
            Stat::Dex => self.dex,
            Stat::Agi => self.agi,
        }
    }

    pub fn set(&mut self, stat: Stat, value: u32) {
        match stat {
            Stat::Con => self.con = value,
            Stat::Wis => self.wis = value,
            Stat::Dex => self.dex = value,
            Stat::Agi => self.agi = value,
        }
    }

    pub fn total(&self) -> u32 {
        self.con
            .saturating_add(self.wis)
            .saturating_add(self.dex)
            .saturating_add(self.agi)
    }
}

/// Real-valued per-stat contribution before flooring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatDecimal {
    pub con: f64,
    pub wis: f64,
    pub dex: f64,
    pub agi: f64,
}

impl StatDecimal {
    pub fn get(&self, stat: Stat) -> f64 {
        match stat {
            Stat::Con => self.con,
            Stat::Wis => self.wis,
            Stat::Dex => self.dex,
            Stat::Agi => self.agi,
        }
    }

    pub fn total(&self) -> f64 {
        self.con + self.wis + self.dex + self.agi
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Derived values for one tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierResult {
    pub tier: usize,
    pub level: u32,
    pub available_points: u32,
    /// Allocation after clamping to `available_points`.
    pub stats: StatInput,
    pub applied_rebirth: StatInput,
    pub applied_rebirth_decimal: StatDecimal,
    pub bonus: u32,
    pub final_rebirth_value: u32,
}

impl TierResult {
    /// Sum of the applied values, without the bonus.
    pub fn applied_total(&self) -> u32 {
        self.applied_rebirth.total()
    }

    /// Decimal sum plus the bonus ("actual" value before flooring).
    pub fn decimal_total(&self) -> f64 {
        self.applied_rebirth_decimal.total() + self.bonus as f64
    }

    /// Points left unallocated in this tier.
    pub fn unallocated(&self) -> u32 {
        self.available_points.saturating_sub(self.stats.total())
    }

    pub fn is_max(&self) -> bool {
        self.final_rebirth_value >= MAX_REBIRTH[self.tier]
    }
}

// ---------------------------------------------------------------------------
// Formula
// ---------------------------------------------------------------------------

pub fn clamp_level(level: u32) -> u32 {
    level.clamp(MIN_LEVEL, MAX_LEVEL)
}

/// Point budget of `tier` at `level`, given the previous tier's final value.
///
/// `previous_final` is ignored for tier 0.
pub fn available_points(tier: usize, level: u32, previous_final: u32) -> u32 {
    let level_points = POINTS_PER_LEVEL * (clamp_level(level) - 1);
    if tier == 0 {
        QUEST_POINTS + level_points
    } else {
        previous_final.saturating_add(level_points)
    }
}

/// Clamp an allocation to `available` points.
///
/// Overflow is taken from `con` first, then `agi`, `dex` and finally `wis`.
/// The sum is taken in `u64`, so arbitrarily large inputs still end up
/// within the budget.
pub fn normalize(stats: StatInput, available: u32) -> StatInput {
    let mut out = stats;
    let total: u64 = Stat::ALL.iter().map(|s| u64::from(stats.get(*s))).sum();
    let mut overflow = total.saturating_sub(u64::from(available));
    for stat in [Stat::Con, Stat::Agi, Stat::Dex, Stat::Wis] {
        if overflow == 0 {
            break;
        }
        let current = out.get(stat);
        let taken = u64::from(current).min(overflow);
        // taken <= current, so the narrowing is lossless
        out.set(stat, current - taken as u32);
        overflow -= taken;
    }
    out
}

fn applied_decimal(tier: usize, raw: u32) -> f64 {
    let cap = (MAX_REBIRTH[tier] - BONUSES[tier]) as f64;
    raw as f64 * cap / REFERENCE_POINTS[tier] as f64
}

fn applied_value(tier: usize, raw: u32) -> u32 {
    let cap = (MAX_REBIRTH[tier] - BONUSES[tier]) as u64;
    (raw as u64 * cap / REFERENCE_POINTS[tier] as u64) as u32
}

/// Evaluate a single tier.
///
/// # Panics
///
/// Panics if `tier >= TIER_COUNT`.
pub fn apply_tier(tier: usize, level: u32, stats: StatInput, previous_final: u32) -> TierResult {
    let level = clamp_level(level);
    let available = available_points(tier, level, previous_final);
    let stats = normalize(stats, available);

    let applied_rebirth = StatInput {
        con: applied_value(tier, stats.con),
        wis: applied_value(tier, stats.wis),
        dex: applied_value(tier, stats.dex),
        agi: applied_value(tier, stats.agi),
    };
    let applied_rebirth_decimal = StatDecimal {
        con: applied_decimal(tier, stats.con),
        wis: applied_decimal(tier, stats.wis),
        dex: applied_decimal(tier, stats.dex),
        agi: applied_decimal(tier, stats.agi),
    };
    let bonus = BONUSES[tier];

    TierResult {
        tier,
        level,
        available_points: available,
        stats,
        applied_rebirth,
        applied_rebirth_decimal,
        bonus,
        final_rebirth_value: applied_rebirth.total() + bonus,
    }
}

/// Evaluate all five tiers, left to right.
pub fn compute(inputs: &RebirthInputs) -> [TierResult; TIER_COUNT] {
    let mut results = [TierResult::default(); TIER_COUNT];
    let mut previous_final = 0;
    for tier in 0..TIER_COUNT {
        let result = apply_tier(tier, inputs.levels[tier], inputs.stats[tier], previous_final);
        tracing::trace!(
            tier,
            available = result.available_points,
            final_value = result.final_rebirth_value,
            "tier evaluated"
        );
        previous_final = result.final_rebirth_value;
        results[tier] = result;
    }
    results
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The complete calculator form: a level and allocation per tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebirthInputs {
    pub levels: [u32; TIER_COUNT],
    pub stats: [StatInput; TIER_COUNT],
}

impl Default for RebirthInputs {
    /// Level 140 everywhere with the whole budget in `con`.
    fn default() -> Self {
        Self {
            levels: [MAX_LEVEL; TIER_COUNT],
            stats: REFERENCE_POINTS.map(StatInput::con_only),
        }
    }
}

impl RebirthInputs {
    /// All tiers at `level` with nothing allocated.
    pub fn empty(level: u32) -> Self {
        Self {
            levels: [clamp_level(level); TIER_COUNT],
            stats: [StatInput::default(); TIER_COUNT],
        }
    }

    pub fn compute(&self) -> [TierResult; TIER_COUNT] {
        compute(self)
    }

    /// Current point budget of `tier`.
    pub fn available_points(&self, tier: usize) -> Result<u32> {
        check_tier(tier)?;
        let previous_final = if tier == 0 {
            0
        } else {
            self.compute()[tier - 1].final_rebirth_value
        };
        Ok(available_points(tier, self.levels[tier], previous_final))
    }

    /// Change one stat of one tier.
    ///
    /// Setting `con` clamps it to what the other stats leave over. Setting any
    /// other stat clamps that stat to the budget left by the remaining
    /// non-`con` stats, then hands everything left to `con`.
    pub fn set_stat(&mut self, tier: usize, stat: Stat, value: u32) -> Result<()> {
        let available = self.available_points(tier)?;
        let current = normalize(self.stats[tier], available);
        let mut next = current;

        match stat {
            Stat::Con => {
                let others = current
                    .wis
                    .saturating_add(current.dex)
                    .saturating_add(current.agi);
                next.con = value.min(available.saturating_sub(others));
            }
            _ => {
                let others = [Stat::Wis, Stat::Dex, Stat::Agi]
                    .into_iter()
                    .filter(|s| *s != stat)
                    .fold(0u32, |acc, s| acc.saturating_add(current.get(s)));
                let adjusted = value.min(available.saturating_sub(others));
                next.set(stat, adjusted);
                next.con = available.saturating_sub(adjusted.saturating_add(others));
            }
        }

        self.stats[tier] = next;
        Ok(())
    }

    /// [`set_stat`](Self::set_stat) from raw form text; unparsable input is 0.
    pub fn set_stat_text(&mut self, tier: usize, stat: Stat, raw: &str) -> Result<()> {
        self.set_stat(tier, stat, parse_stat_value(raw))
    }

    pub fn set_level(&mut self, tier: usize, level: u32) -> Result<()> {
        check_tier(tier)?;
        self.levels[tier] = clamp_level(level);
        Ok(())
    }

    /// [`set_level`](Self::set_level) from raw form text; unparsable input is 1.
    pub fn set_level_text(&mut self, tier: usize, raw: &str) -> Result<()> {
        self.set_level(tier, parse_level(raw))
    }
}

fn check_tier(tier: usize) -> Result<()> {
    if tier < TIER_COUNT {
        Ok(())
    } else {
        Err(CompanionError::TierOutOfRange(tier))
    }
}

// ---------------------------------------------------------------------------
// Form text parsing
// ---------------------------------------------------------------------------

/// Leading integer of `raw`, like a lenient form field: `" 12abc"` is 12.
fn leading_integer(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude = digits[..end]
        .bytes()
        .fold(0i64, |acc, b| acc.saturating_mul(10).saturating_add((b - b'0') as i64));
    Some(if negative { -magnitude } else { magnitude })
}

/// Stat field value. Unparsable or negative input is 0.
pub fn parse_stat_value(raw: &str) -> u32 {
    leading_integer(raw)
        .map(|n| n.clamp(0, u32::MAX as i64) as u32)
        .unwrap_or(0)
}

/// Level field value, clamped to `[1, 140]`. Unparsable input or 0 is 1.
pub fn parse_level(raw: &str) -> u32 {
    match leading_integer(raw) {
        Some(n) if n != 0 => n.clamp(MIN_LEVEL as i64, MAX_LEVEL as i64) as u32,
        _ => MIN_LEVEL,
    }
}

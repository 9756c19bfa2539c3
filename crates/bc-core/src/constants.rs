//! `EngineConstants` -- the single configuration block threaded through the
//! world instead of scattered global `const`s, so embedders and tests can
//! vary tunables without a recompile.

use serde::{Deserialize, Serialize};

/// What happens to a zombie-spawn-schedule entry when every tile adjacent
/// to its den is blocked.
///
/// Left as an open question by the source material; made pluggable and
/// testable here rather than hard-coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZombieOverflowPolicy {
    /// Drop the unplaced spawns and log a warning (the conservative default).
    Discard,
    /// Carry the unplaced spawns forward to be retried next round.
    Requeue,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConstants {
    pub broadcast_max_channels: u32,
    pub basic_signals_per_turn: u32,
    pub message_signals_per_turn: u32,
    pub signal_queue_max_size: usize,
    pub flash_movement_delay: f64,
    pub mining_loading_delay: f64,
    pub mining_movement_delay: f64,
    pub supply_transfer_radius_squared: i64,
    pub number_of_indicator_strings: u32,
    pub rubble_clear_percentage: f64,
    pub rubble_clear_flat_amount: f64,
    pub rubble_obstruction_thresh: f64,
    pub rubble_from_turret_factor: f64,
    pub archon_part_income: f64,
    pub part_income_unit_penalty: f64,
    pub parts_initial_amount: f64,
    pub den_part_reward: f64,
    pub guard_damage_reduction: f64,
    pub archon_repair_amount: f64,
    pub broadcast_base_delay_increase: f64,
    pub broadcast_additional_delay_increase: f64,
    /// Rubble level above which movement delay doubles (Open Question in
    /// the source material; pinned to 50.0 per the test suite's observed
    /// doubled-at-51/undoubled-at-49 boundary).
    pub slow_threshold: f64,
    /// Mining rate: ore removed from (and credited from) a tile per `mine()`
    /// call, capped by remaining tile ore.
    pub mining_rate: f64,
    pub zombie_overflow_policy: ZombieOverflowPolicy,
    /// Missiles a `LAUNCHER` accrues per round it is active, capped at this
    /// total. Regeneration rate/cap are unspecified in the source material;
    /// pinned to a flat +1/round so `launchMissile` has something to fire.
    pub missile_count_max: u32,
    /// XP credited to a living `COMMANDER` for every non-commander death that
    /// occurs within its sensor range, regardless of which team dealt the
    /// killing blow. The source material's commander leveling curve is not
    /// reproduced here; only enough to make `castFlash`'s skill gate testable.
    pub commander_xp_per_nearby_death: u32,
    /// Extra core/weapon delay per unit of squared-radius a signal cast
    /// requests beyond the sender's own `sensorRadiusSquared`. The source
    /// material specifies this scaling exists but not its rate; pinned small
    /// enough that in-range casts (the common case) pay nothing extra.
    pub signal_excess_radius_delay_per_unit: f64,
    /// Extra squared sensor radius granted to every unit on a team that has
    /// researched `Upgrade::Vision`.
    pub vision_upgrade_bonus_radius_squared: i64,
    /// Extra flat archon part income per round for a team that has
    /// researched `Upgrade::Fusion`, on top of `archon_part_income`.
    pub fusion_income_bonus: f64,
}

impl Default for EngineConstants {
    fn default() -> Self {
        Self {
            broadcast_max_channels: 10_000,
            basic_signals_per_turn: 10,
            message_signals_per_turn: 5,
            signal_queue_max_size: 1000,
            flash_movement_delay: 2.0,
            mining_loading_delay: 1.0,
            mining_movement_delay: 1.0,
            supply_transfer_radius_squared: 2,
            number_of_indicator_strings: 3,
            rubble_clear_percentage: 0.1,
            rubble_clear_flat_amount: 10.0,
            rubble_obstruction_thresh: 100.0,
            rubble_from_turret_factor: 1.0 / 3.0,
            archon_part_income: 2.0,
            part_income_unit_penalty: 0.05,
            parts_initial_amount: 100.0,
            den_part_reward: 20.0,
            guard_damage_reduction: 0.5,
            archon_repair_amount: 2.0,
            broadcast_base_delay_increase: 0.2,
            broadcast_additional_delay_increase: 0.1,
            slow_threshold: 50.0,
            mining_rate: 1.0,
            zombie_overflow_policy: ZombieOverflowPolicy::Discard,
            missile_count_max: 5,
            commander_xp_per_nearby_death: 1,
            signal_excess_radius_delay_per_unit: 0.001,
            vision_upgrade_bonus_radius_squared: 10,
            fusion_income_bonus: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_slow_threshold_matches_decided_open_question() {
        assert_eq!(EngineConstants::default().slow_threshold, 50.0);
    }

    #[test]
    fn default_zombie_overflow_policy_is_discard() {
        assert_eq!(
            EngineConstants::default().zombie_overflow_policy,
            ZombieOverflowPolicy::Discard
        );
    }
}

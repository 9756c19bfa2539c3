//! Commander skill unlock thresholds.
//!
//! The source material's leveling curve isn't reproduced; these thresholds
//! exist only so `castFlash`'s "requires learned FLASH skill" gate has a
//! concrete, testable trigger.

use bc_core::prelude::CommanderSkillType;

const THRESHOLDS: [(u32, CommanderSkillType); 3] = [
    (1, CommanderSkillType::Leadership),
    (5, CommanderSkillType::Regeneration),
    (10, CommanderSkillType::Flash),
];

/// Skills a commander with `xp` experience should have learned by now, in
/// threshold order.
pub fn unlocked_at(xp: u32) -> impl Iterator<Item = CommanderSkillType> {
    THRESHOLDS.into_iter().filter(move |(needed, _)| xp >= *needed).map(|(_, skill)| skill)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_skills_unlocked_at_zero_xp() {
        assert_eq!(unlocked_at(0).count(), 0);
    }

    #[test]
    fn flash_requires_the_highest_threshold() {
        let at_nine: Vec<_> = unlocked_at(9).collect();
        assert!(!at_nine.contains(&CommanderSkillType::Flash));
        let at_ten: Vec<_> = unlocked_at(10).collect();
        assert!(at_ten.contains(&CommanderSkillType::Flash));
    }
}

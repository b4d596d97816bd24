//! Strife - stacks gained by killing mid-attack

use super::{BuffBehavior, BuffChange, BuffContext, BuffStackState};
use crate::config::StrifeConstants;
use crate::stat_table::StatTable;
use types_core::{LinkedBuff, StatType};

/// Kill-chain buff
///
/// Each kill during a linked attack adds a stack (capped), refreshes the
/// cooldown of every linked skill and grants MoveSpeed and PierceAttack in
/// proportion to the stack count. A linked attack that ends without a kill
/// drops all stacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct KillChain;

impl KillChain {
    /// Replace the applied bonuses with ones sized for the current stacks
    ///
    /// Bonuses are computed from stat values read after reverting, so they
    /// never compound on themselves.
    fn reapply(state: &mut BuffStackState, stats: &mut StatTable, constants: &StrifeConstants) {
        state.revert(stats);

        let stacks = state.stacks as f64;
        let move_speed = stats.stat_value(StatType::MoveSpeed) * constants.move_speed_per_stack * stacks;
        let pierce = stats.stat_value(StatType::PierceAttack) * constants.pierce_per_stack * stacks;

        state.apply(stats, StatType::MoveSpeed, move_speed);
        state.apply(stats, StatType::PierceAttack, pierce);
    }
}

impl BuffBehavior for KillChain {
    fn kind(&self) -> LinkedBuff {
        LinkedBuff::Strife
    }

    fn on_attack_start(&self, state: &mut BuffStackState, _ctx: &mut BuffContext<'_>) -> Option<BuffChange> {
        state.kill_confirmed = false;
        None
    }

    fn on_target_killed(&self, state: &mut BuffStackState, ctx: &mut BuffContext<'_>) -> Option<BuffChange> {
        let constants = &ctx.constants.strife;
        state.kill_confirmed = true;
        if state.stacks < constants.max_stacks {
            state.stacks += 1;
        }

        let cooldowns_reset = ctx.actions.reset_linked_cooldowns(LinkedBuff::Strife);
        Self::reapply(state, ctx.stats, constants);

        tracing::debug!(
            "Strife stack confirmed: {} stacks, move speed +{:.3}, pierce +{:.3}",
            state.stacks,
            state.applied.get(StatType::MoveSpeed),
            state.applied.get(StatType::PierceAttack)
        );

        Some(BuffChange::Stacked {
            buff: LinkedBuff::Strife,
            stacks: state.stacks,
            cooldowns_reset,
        })
    }

    fn on_attack_end(&self, state: &mut BuffStackState, ctx: &mut BuffContext<'_>) -> Option<BuffChange> {
        if state.kill_confirmed {
            return None;
        }

        let from = state.stacks;
        state.revert(ctx.stats);
        state.stacks = 0;

        if from > 0 {
            tracing::debug!("Strife reset from {} stacks", from);
            Some(BuffChange::Reset {
                buff: LinkedBuff::Strife,
                from,
            })
        } else {
            None
        }
    }
}

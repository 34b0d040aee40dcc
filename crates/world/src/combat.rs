//! Area attacks and death handling shared by enemies and animals.

use crate::inventory::ItemSink;
use crate::mob::DropTable;
use glam::Vec2;
use mdsandbox_core::ItemStack;
use mdsandbox_physics::Body;
use rand::rngs::StdRng;
use tracing::debug;

/// Something the player can hit.
pub trait Combatant {
    /// Physics body; its centre is the hit position.
    fn body(&self) -> &Body;

    /// Current health.
    fn health(&self) -> f32;

    /// Health has run out.
    fn is_dead(&self) -> bool {
        self.health() <= 0.0
    }

    /// Apply damage with knockback. `direction` is `1.0` when the attacker is to the
    /// left and `-1.0` when it is to the right. Returns whether damage landed.
    fn take_hit(&mut self, damage: f32, direction: f32) -> bool;

    /// Loot rolled once on death.
    fn drop_table(&self) -> DropTable;

    /// Stable kind label for logs and events.
    fn label(&self) -> &'static str;
}

/// A target removed after dying.
#[derive(Debug, Clone, PartialEq)]
pub struct Kill {
    /// Kind label.
    pub label: &'static str,
    /// Body centre at death.
    pub position: Vec2,
    /// Rolled loot.
    pub drops: Vec<ItemStack>,
    /// Items that did not fit into the sink.
    pub lost: u32,
}

/// Outcome of [`CombatResolver::attack_area`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttackReport {
    /// Targets within the radius.
    pub hit: usize,
    /// Targets that actually took damage.
    pub damaged: usize,
    /// Targets that died and were removed.
    pub kills: Vec<Kill>,
}

/// Resolves attacks against a collection of [`Combatant`]s.
pub struct CombatResolver;

impl CombatResolver {
    /// Damage every target whose centre is within `radius` of `center` (inclusive),
    /// then remove the dead and credit their drops to `sink`.
    pub fn attack_area<T: Combatant>(
        targets: &mut Vec<T>,
        center: Vec2,
        damage: f32,
        radius: f32,
        rng: &mut StdRng,
        sink: &mut dyn ItemSink,
    ) -> AttackReport {
        let mut report = AttackReport::default();
        for target in targets.iter_mut() {
            let offset = target.body().center() - center;
            if offset.length() > radius {
                continue;
            }
            report.hit += 1;
            let direction = if offset.x > 0.0 { 1.0 } else { -1.0 };
            if target.take_hit(damage, direction) {
                report.damaged += 1;
            }
        }
        report.kills = Self::collect_dead(targets, rng, sink);
        report
    }

    /// Remove every dead target, rolling each one's drops exactly once.
    ///
    /// Survivors keep their relative order.
    pub fn collect_dead<T: Combatant>(
        targets: &mut Vec<T>,
        rng: &mut StdRng,
        sink: &mut dyn ItemSink,
    ) -> Vec<Kill> {
        if !targets.iter().any(T::is_dead) {
            return Vec::new();
        }
        let (dead, alive): (Vec<T>, Vec<T>) =
            std::mem::take(targets).into_iter().partition(T::is_dead);
        *targets = alive;

        dead.into_iter()
            .map(|target| {
                let drops = target.drop_table().roll(rng);
                let lost: u32 = drops
                    .iter()
                    .map(|stack| sink.add_item(stack.item_type, stack.count))
                    .sum();
                let position = target.body().center();
                debug!(
                    kind = target.label(),
                    x = position.x,
                    y = position.y,
                    drops = drops.len(),
                    "Combatant died"
                );
                Kill {
                    label: target.label(),
                    position,
                    drops,
                    lost,
                }
            })
            .collect()
    }
}

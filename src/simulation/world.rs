//! A small headless host
//!
//! Flat square platform at y = 0 centred on the origin, a handful of enemies
//! with health, and a player whose attack cooldown recharges over ticks.
//! Position packets are logged and update the server-side position only;
//! the client-side player never moves.

use crate::combat::host::{CombatHost, EnemySnapshot};
use crate::core::types::{EntityId, Vec3};
use crate::events::{DirectionalInput, PlayerView};

/// Blocks per tick while walking
const WALK_SPEED: f64 = 0.2;
/// Blocks per tick while sprinting
const SPRINT_SPEED: f64 = 0.28;
/// Vertical speed gained per tick in free fall
const GRAVITY: f64 = 0.08;

#[derive(Debug, Clone)]
pub struct SimEnemy {
    pub id: EntityId,
    pub position: Vec3,
    pub health: f32,
    pub attackable: bool,
}

impl SimEnemy {
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

#[derive(Debug, Clone)]
pub struct SimWorld {
    pub player: Vec3,
    pub on_ground: bool,
    pub sneaking: bool,
    pub sprinting: bool,
    /// Half the side length of the platform
    pub platform_half_extent: f64,
    /// Damage dealt by a fully charged attack
    pub attack_damage: f32,
    /// Ticks for the attack cooldown to recharge from 0 to 1
    pub attack_recharge_ticks: u32,
    enemies: Vec<SimEnemy>,
    server_position: Vec3,
    ticks_since_attack: u32,
    packets: Vec<Vec3>,
    attacks: u32,
}

impl SimWorld {
    pub fn new(player: Vec3) -> Self {
        Self {
            player,
            on_ground: true,
            sneaking: false,
            sprinting: false,
            platform_half_extent: 32.0,
            attack_damage: 4.0,
            attack_recharge_ticks: 12,
            enemies: Vec::new(),
            server_position: player,
            ticks_since_attack: u32::MAX,
            packets: Vec::new(),
            attacks: 0,
        }
    }

    pub fn spawn_enemy(&mut self, position: Vec3, health: f32) -> EntityId {
        let id = EntityId::new();
        self.enemies.push(SimEnemy {
            id,
            position,
            health,
            attackable: true,
        });
        id
    }

    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut SimEnemy> {
        self.enemies.iter_mut().find(|enemy| enemy.id == id)
    }

    pub fn sim_enemies(&self) -> &[SimEnemy] {
        &self.enemies
    }

    /// Advance host-side state by one tick
    pub fn tick(&mut self) {
        self.ticks_since_attack = self.ticks_since_attack.saturating_add(1);
    }

    /// Every position packet sent so far
    pub fn packets(&self) -> &[Vec3] {
        &self.packets
    }

    pub fn server_position(&self) -> Vec3 {
        self.server_position
    }

    pub fn attacks(&self) -> u32 {
        self.attacks
    }

    pub fn kills(&self) -> usize {
        self.enemies.iter().filter(|enemy| !enemy.is_alive()).count()
    }

    fn on_platform(&self, position: Vec3) -> bool {
        position.x.abs() <= self.platform_half_extent && position.z.abs() <= self.platform_half_extent
    }

    fn speed(&self) -> f64 {
        if self.sprinting {
            SPRINT_SPEED
        } else {
            WALK_SPEED
        }
    }
}

/// Unit horizontal direction for `input`, facing +z
fn heading(input: DirectionalInput) -> Vec3 {
    let mut direction = Vec3::ZERO;
    if input.forwards {
        direction.z += 1.0;
    }
    if input.backwards {
        direction.z -= 1.0;
    }
    if input.left {
        direction.x -= 1.0;
    }
    if input.right {
        direction.x += 1.0;
    }
    direction.normalize_or_zero()
}

impl CombatHost for SimWorld {
    fn player_position(&self) -> Vec3 {
        self.player
    }

    fn enemies(&self) -> Vec<EnemySnapshot> {
        self.enemies
            .iter()
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                position: enemy.position,
                alive: enemy.is_alive(),
                attackable: enemy.attackable,
            })
            .collect()
    }

    fn attack_cooldown_progress(&self) -> f32 {
        if self.attack_recharge_ticks == 0 {
            return 1.0;
        }
        (self.ticks_since_attack as f32 / self.attack_recharge_ticks as f32).min(1.0)
    }

    fn send_position(&mut self, position: Vec3, _on_ground: bool) {
        self.server_position = position;
        self.packets.push(position);
    }

    fn attack(&mut self, target: EntityId) {
        let scale = self.attack_cooldown_progress();
        let damage = self.attack_damage * scale.max(0.2);
        if let Some(enemy) = self.enemy_mut(target) {
            if enemy.is_alive() {
                enemy.health = (enemy.health - damage).max(0.0);
                if !enemy.is_alive() {
                    tracing::info!(entity = ?target, "enemy defeated");
                }
            }
        }
        self.ticks_since_attack = 0;
        self.attacks += 1;
    }
}

impl PlayerView for SimWorld {
    fn is_on_ground(&self) -> bool {
        self.on_ground
    }

    fn is_sneaking(&self) -> bool {
        self.sneaking
    }

    fn is_sprinting(&self) -> bool {
        self.sprinting
    }

    fn is_close_to_edge(&self, input: DirectionalInput, distance: f64) -> bool {
        let direction = heading(input);
        if direction == Vec3::ZERO {
            return false;
        }
        !self.on_platform(self.player + direction * distance)
    }

    fn predicted_fall_distance(&self, input: DirectionalInput, _jumping: bool, ticks: u32) -> f64 {
        let step = heading(input) * self.speed();
        let mut position = self.player;
        let mut fall_speed = 0.0;
        let mut fallen = 0.0;

        for _ in 0..ticks {
            position += step;
            if !self.on_platform(position) {
                fall_speed += GRAVITY;
                fallen += fall_speed;
            }
        }
        fallen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_recharges_over_ticks() {
        let mut world = SimWorld::new(Vec3::ZERO);
        let enemy = world.spawn_enemy(Vec3::new(3.0, 0.0, 0.0), 20.0);
        assert_eq!(world.attack_cooldown_progress(), 1.0);

        world.attack(enemy);
        assert_eq!(world.attack_cooldown_progress(), 0.0);
        for _ in 0..6 {
            world.tick();
        }
        assert!((world.attack_cooldown_progress() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_attack_damages_until_dead() {
        let mut world = SimWorld::new(Vec3::ZERO);
        let enemy = world.spawn_enemy(Vec3::new(3.0, 0.0, 0.0), 6.0);

        world.attack(enemy);
        assert!(world.enemies()[0].alive);
        for _ in 0..12 {
            world.tick();
        }
        world.attack(enemy);
        assert_eq!(world.kills(), 1);
        assert!(!world.enemy(enemy).unwrap().alive);
    }

    #[test]
    fn test_packets_move_server_position_only() {
        let mut world = SimWorld::new(Vec3::ZERO);
        world.send_position(Vec3::new(1.0, 0.0, 0.0), true);
        assert_eq!(world.player_position(), Vec3::ZERO);
        assert_eq!(world.server_position(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(world.packets().len(), 1);
    }

    #[test]
    fn test_edge_queries() {
        let mut world = SimWorld::new(Vec3::new(0.0, 0.0, 31.995));
        assert!(world.is_close_to_edge(DirectionalInput::FORWARDS, 0.01));
        assert!(!world.is_close_to_edge(DirectionalInput::NONE, 0.01));

        world.player = Vec3::new(0.0, 0.0, 31.5);
        assert!(!world.is_close_to_edge(DirectionalInput::FORWARDS, 0.01));
        assert!(world.predicted_fall_distance(DirectionalInput::FORWARDS, false, 5) > 0.0);
        assert_eq!(world.predicted_fall_distance(DirectionalInput::FORWARDS, false, 2), 0.0);
    }
}

//! The injured soldier and the rescue loop.
//!
//! Exactly one soldier exists at a time, either waiting at the bottom of the
//! channel or carried by the medic. The soldier bleeds out linearly from the
//! moment they appear, carried or not. The loop:
//!
//! ```text
//!   spawn ──▶ Waiting ──(medic contact)──▶ Carried ──(medic in hospital)──▶ rescued
//!               │                            │                               │
//!               └──────(bleed-out)───────────┴──(bleed-out / medic hit)──▶ lost
//!                                                                            │
//!   spawn ◀──────────── celebration delay (rescued) / mourning delay (lost) ◀┘
//! ```

use glam::Vec2;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clock::Millis;
use crate::config::{GameConfig, SoldierConfig};
use crate::event::{GameEvent, LossCause};
use crate::player::Player;
use crate::profiles::{ProfileProvider, SoldierProfile};

/// Where the soldier is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoldierState {
    /// Lying at the pickup point.
    Waiting,
    /// On the medic's back.
    Carried,
    /// Bled out.
    Dead,
}

/// Result of advancing the bleed-out timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BleedTick {
    /// Still bleeding.
    Bleeding,
    /// Crossed the critical threshold this tick.
    Critical,
    /// Died this tick.
    Died,
}

/// A soldier waiting for, or receiving, rescue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjuredSoldier {
    /// Body center.
    pub position: Vec2,
    size: f32,
    spawned_at: Millis,
    bleed_out_ms: Millis,
    remaining_ms: Millis,
    critical_fraction: f32,
    critical_announced: bool,
    state: SoldierState,
    profile: SoldierProfile,
}

impl InjuredSoldier {
    /// Creates a soldier at `position` who starts bleeding at `now`.
    #[must_use]
    pub fn new(position: Vec2, now: Millis, config: &SoldierConfig, profile: SoldierProfile) -> Self {
        Self {
            position,
            size: config.size,
            spawned_at: now,
            bleed_out_ms: config.bleed_out_ms,
            remaining_ms: config.bleed_out_ms,
            critical_fraction: config.critical_fraction,
            critical_announced: false,
            state: SoldierState::Waiting,
            profile,
        }
    }

    /// Advances the bleed-out timer.
    ///
    /// The critical threshold is only announced while carried.
    pub fn update(&mut self, now: Millis) -> BleedTick {
        if self.state == SoldierState::Dead {
            return BleedTick::Bleeding;
        }
        let elapsed = now.saturating_sub(self.spawned_at);
        self.remaining_ms = self.bleed_out_ms.saturating_sub(elapsed);
        if self.remaining_ms == 0 {
            self.state = SoldierState::Dead;
            return BleedTick::Died;
        }
        if self.state == SoldierState::Carried
            && !self.critical_announced
            && self.bleed_fraction() < self.critical_fraction
        {
            self.critical_announced = true;
            return BleedTick::Critical;
        }
        BleedTick::Bleeding
    }

    /// Remaining life as a fraction of the full bleed-out time.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn bleed_fraction(&self) -> f32 {
        self.remaining_ms as f32 / self.bleed_out_ms.max(1) as f32
    }

    /// Milliseconds left before bleeding out.
    #[must_use]
    pub const fn remaining_ms(&self) -> Millis {
        self.remaining_ms
    }

    /// True once bled out.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.state == SoldierState::Dead
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> SoldierState {
        self.state
    }

    /// Body diameter.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Who this is.
    #[must_use]
    pub const fn profile(&self) -> &SoldierProfile {
        &self.profile
    }

    /// Contact test against a body of diameter `size` at `center`.
    #[must_use]
    pub fn touches(&self, center: Vec2, size: f32) -> bool {
        self.position.distance(center) < (self.size + size) / 2.0
    }

    fn carry(&mut self) {
        self.state = SoldierState::Carried;
    }
}

/// Why the next soldier is delayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interlude {
    /// After a rescue.
    Celebrating {
        /// When the rescue completed.
        since: Millis,
    },
    /// After a loss.
    Mourning {
        /// When the soldier was lost.
        since: Millis,
    },
}

/// Owns the current soldier and the rescue cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RescueFlow {
    soldier: Option<InjuredSoldier>,
    interlude: Option<Interlude>,
    rescues: u32,
    last_profile: Option<SoldierProfile>,
}

impl RescueFlow {
    /// Starts the loop with a soldier already waiting.
    pub fn new(
        now: Millis,
        config: &GameConfig,
        provider: &dyn ProfileProvider,
        rng: &mut dyn RngCore,
    ) -> Self {
        Self {
            soldier: Some(Self::spawn_soldier(now, config, provider, rng)),
            interlude: None,
            rescues: 0,
            last_profile: None,
        }
    }

    fn spawn_soldier(
        now: Millis,
        config: &GameConfig,
        provider: &dyn ProfileProvider,
        rng: &mut dyn RngCore,
    ) -> InjuredSoldier {
        let position = Vec2::new(
            config.arena.width / 2.0,
            config.arena.height - config.soldier.bottom_offset,
        );
        InjuredSoldier::new(position, now, &config.soldier, provider.next_profile(rng))
    }

    /// Advances bleed-out, pickup, delivery and respawn for one tick.
    pub fn update(
        &mut self,
        now: Millis,
        player: &mut Player,
        config: &GameConfig,
        provider: &dyn ProfileProvider,
        rng: &mut dyn RngCore,
    ) -> Vec<GameEvent> {
        let mut events = Vec::new();

        if let Some(soldier) = self.soldier.as_mut() {
            let name = soldier.profile().display_name();

            if soldier.state() == SoldierState::Waiting
                && !player.is_carrying()
                && soldier.touches(player.position, player.size())
            {
                soldier.carry();
                player.pick_up();
                info!(soldier = %name, "soldier picked up");
                events.push(GameEvent::SoldierPickedUp { name: name.clone() });
            }
            if soldier.state() == SoldierState::Carried {
                soldier.position = player.position;
            }

            match soldier.update(now) {
                BleedTick::Died => {
                    player.drop_soldier();
                    info!(soldier = %name, "soldier bled out");
                    self.lose(now);
                    events.push(GameEvent::SoldierDied {
                        name,
                        cause: LossCause::BledOut,
                    });
                    return events;
                }
                BleedTick::Critical => {
                    events.push(GameEvent::SoldierCritical { name: name.clone() });
                }
                BleedTick::Bleeding => {}
            }

            if soldier.state() == SoldierState::Carried
                && config.arena.in_safe_zone(player.position)
            {
                player.drop_soldier();
                self.rescues += 1;
                self.last_profile = self.soldier.take().map(|s| s.profile);
                self.interlude = Some(Interlude::Celebrating { since: now });
                info!(soldier = %name, rescues = self.rescues, "soldier rescued");
                events.push(GameEvent::SoldierRescued {
                    name,
                    rescues: self.rescues,
                });
            }
            return events;
        }

        let ready = match self.interlude {
            Some(Interlude::Celebrating { since }) => {
                now.saturating_sub(since) >= config.rescue.celebration_ms
            }
            Some(Interlude::Mourning { since }) => {
                now.saturating_sub(since) >= config.rescue.mourning_ms
            }
            None => true,
        };
        if ready {
            let soldier = Self::spawn_soldier(now, config, provider, rng);
            let name = soldier.profile().display_name();
            info!(soldier = %name, "soldier needs rescue");
            events.push(GameEvent::SoldierSpawned { name });
            self.soldier = Some(soldier);
            self.interlude = None;
        }
        events
    }

    /// The medic was hit while carrying: the soldier is lost.
    pub fn lose_carried(&mut self, now: Millis) -> Option<GameEvent> {
        let carried = self
            .soldier
            .as_ref()
            .is_some_and(|s| s.state() == SoldierState::Carried);
        if !carried {
            return None;
        }
        let name = self.soldier.as_ref().map(|s| s.profile().display_name())?;
        info!(soldier = %name, "soldier killed in action");
        self.lose(now);
        Some(GameEvent::SoldierDied {
            name,
            cause: LossCause::KilledInAction,
        })
    }

    fn lose(&mut self, now: Millis) {
        self.last_profile = self.soldier.take().map(|s| s.profile);
        self.interlude = Some(Interlude::Mourning { since: now });
    }

    /// The current soldier, waiting or carried.
    #[must_use]
    pub const fn soldier(&self) -> Option<&InjuredSoldier> {
        self.soldier.as_ref()
    }

    /// Pending delay before the next soldier.
    #[must_use]
    pub const fn interlude(&self) -> Option<Interlude> {
        self.interlude
    }

    /// Rescues completed.
    #[must_use]
    pub const fn rescues(&self) -> u32 {
        self.rescues
    }

    /// Profile of the last soldier rescued or lost.
    #[must_use]
    pub const fn last_profile(&self) -> Option<&SoldierProfile> {
        self.last_profile.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::BuiltinProfiles;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn profile() -> SoldierProfile {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        BuiltinProfiles.next_profile(&mut rng)
    }

    mod bleed_tests {
        use super::*;

        #[test]
        fn dies_exactly_at_bleed_out() {
            let config = SoldierConfig::default();
            let mut soldier = InjuredSoldier::new(Vec2::ZERO, 1000, &config, profile());
            for now in (1000..31_000).step_by(16) {
                assert_ne!(soldier.update(now), BleedTick::Died, "died early at {now}");
                assert!(!soldier.is_dead());
            }
            assert_eq!(soldier.update(30_999), BleedTick::Bleeding);
            assert_eq!(soldier.update(31_000), BleedTick::Died);
            assert!(soldier.is_dead());
        }

        #[test]
        fn fraction_drains_linearly() {
            let config = SoldierConfig::default();
            let mut soldier = InjuredSoldier::new(Vec2::ZERO, 0, &config, profile());
            soldier.update(15_000);
            assert!((soldier.bleed_fraction() - 0.5).abs() < 0.0001);
            assert_eq!(soldier.remaining_ms(), 15_000);
        }

        #[test]
        fn critical_announced_once_while_carried() {
            let config = SoldierConfig::default();
            let mut soldier = InjuredSoldier::new(Vec2::ZERO, 0, &config, profile());
            assert_eq!(soldier.update(25_000), BleedTick::Bleeding);
            soldier.carry();
            assert_eq!(soldier.update(25_016), BleedTick::Critical);
            assert_eq!(soldier.update(25_032), BleedTick::Bleeding);
        }
    }

    mod flow_tests {
        use super::*;

        fn setup() -> (RescueFlow, Player, GameConfig, ChaCha8Rng) {
            let config = GameConfig::default();
            let mut rng = ChaCha8Rng::seed_from_u64(3);
            let flow = RescueFlow::new(0, &config, &BuiltinProfiles, &mut rng);
            let player = Player::new(&config);
            (flow, player, config, rng)
        }

        #[test]
        fn full_rescue_loop() {
            let (mut flow, mut player, config, mut rng) = setup();
            let soldier_pos = flow.soldier().unwrap().position;

            player.position = soldier_pos;
            let events = flow.update(100, &mut player, &config, &BuiltinProfiles, &mut rng);
            assert!(matches!(events[0], GameEvent::SoldierPickedUp { .. }));
            assert!(player.is_carrying());

            player.position.y = 40.0;
            let events = flow.update(200, &mut player, &config, &BuiltinProfiles, &mut rng);
            assert!(matches!(events[0], GameEvent::SoldierRescued { rescues: 1, .. }));
            assert!(!player.is_carrying());
            assert!(flow.soldier().is_none());
            assert!(flow.last_profile().is_some());

            assert!(flow.update(2199, &mut player, &config, &BuiltinProfiles, &mut rng).is_empty());
            let events = flow.update(2200, &mut player, &config, &BuiltinProfiles, &mut rng);
            assert!(matches!(events[0], GameEvent::SoldierSpawned { .. }));
            assert_eq!(flow.soldier().unwrap().state(), SoldierState::Waiting);
        }

        #[test]
        fn bleed_out_starts_mourning() {
            let (mut flow, mut player, config, mut rng) = setup();
            let events = flow.update(30_000, &mut player, &config, &BuiltinProfiles, &mut rng);
            assert!(matches!(
                events[0],
                GameEvent::SoldierDied {
                    cause: LossCause::BledOut,
                    ..
                }
            ));
            assert_eq!(flow.interlude(), Some(Interlude::Mourning { since: 30_000 }));
            assert!(flow.update(32_999, &mut player, &config, &BuiltinProfiles, &mut rng).is_empty());
            assert_eq!(flow.update(33_000, &mut player, &config, &BuiltinProfiles, &mut rng).len(), 1);
        }

        #[test]
        fn carried_soldier_keeps_bleeding() {
            let (mut flow, mut player, config, mut rng) = setup();
            player.position = flow.soldier().unwrap().position;
            flow.update(10, &mut player, &config, &BuiltinProfiles, &mut rng);
            player.position.y = 300.0;
            let events = flow.update(30_000, &mut player, &config, &BuiltinProfiles, &mut rng);
            assert!(events
                .iter()
                .any(|e| matches!(e, GameEvent::SoldierDied { .. })));
            assert!(!player.is_carrying());
        }

        #[test]
        fn hit_while_carrying_loses_soldier() {
            let (mut flow, mut player, config, mut rng) = setup();
            assert!(flow.lose_carried(5).is_none());
            player.position = flow.soldier().unwrap().position;
            flow.update(10, &mut player, &config, &BuiltinProfiles, &mut rng);
            let event = flow.lose_carried(20).unwrap();
            assert!(matches!(
                event,
                GameEvent::SoldierDied {
                    cause: LossCause::KilledInAction,
                    ..
                }
            ));
            assert!(flow.soldier().is_none());
            assert_eq!(flow.rescues(), 0);
        }
    }
}

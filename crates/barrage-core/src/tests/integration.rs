//! End-to-end tests of the simulation loop.
//!
//! Each test builds a small battlefield, drives the full tick and checks what
//! the host would observe: events, the snapshot and the HUD.

use std::sync::{Arc, Mutex};

use glam::Vec2;

use crate::audio::AudioSink;
use crate::config::GameConfig;
use crate::entity::{Entity, EntityId, EntityTag, Team};
use crate::event::{GameEvent, LossCause, SoundCue};
use crate::hud::{HudSink, HudSummary};
use crate::personality::Personality;
use crate::player::{InputKeys, InputState};
use crate::shell::{Shell, Whistle};
use crate::simulation::Phase;
use crate::soldier::SoldierState;

use super::helpers::{
    empty_battlefield, first_time, flatten, quiet_config, run_idle, running_sim, spawn_shell,
    spawn_tank, step_frame, FRAME_MS,
};

// =============================================================================
// Rescue loop
// =============================================================================

#[test]
fn soldier_bleeds_out_at_thirty_seconds() {
    let mut sim = running_sim(GameConfig::default(), 11);
    let frames = run_idle(&mut sim, 30_000 / FRAME_MS + 5);

    let died_at = first_time(&frames, |e| {
        matches!(
            e,
            GameEvent::SoldierDied {
                cause: LossCause::BledOut,
                ..
            }
        )
    });
    assert_eq!(died_at, Some(30_000));
    assert!(sim.rescue().soldier().is_none());
}

#[test]
fn carry_to_hospital_completes_rescue() {
    let mut sim = empty_battlefield(4);
    let soldier_at = sim.rescue().soldier().map(|s| s.position).expect("soldier");
    sim.player_mut().position = soldier_at;
    let events = step_frame(&mut sim, &InputState::idle());
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::SoldierPickedUp { .. })));
    assert!(sim.player().is_carrying());

    let mut rescued = false;
    for _ in 0..400 {
        let events = step_frame(&mut sim, &InputState::holding(InputKeys::MOVE_UP));
        if events
            .iter()
            .any(|e| matches!(e, GameEvent::SoldierRescued { rescues: 1, .. }))
        {
            rescued = true;
            break;
        }
        let carried = sim.rescue().soldier().map(|s| (s.state(), s.position));
        assert_eq!(carried, Some((SoldierState::Carried, sim.player().position)));
    }
    assert!(rescued);
    assert_eq!(sim.rescue().rescues(), 1);
    assert!(!sim.player().is_carrying());
}

// =============================================================================
// Freeze grenades
// =============================================================================

#[test]
fn freeze_holds_tank_until_expiry() {
    let mut sim = empty_battlefield(8);
    let near = spawn_tank(&mut sim, Team::Left, Personality::Aggressive, Vec2::new(440.0, 100.0));
    let far = spawn_tank(&mut sim, Team::Left, Personality::Sniper, Vec2::new(200.0, 500.0));

    step_frame(&mut sim, &InputState::pressing(InputKeys::THROW_DOWN));
    let events = step_frame(&mut sim, &InputState::pressing(InputKeys::THROW_DOWN));
    let detonated_at = sim.now_ms();
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::GrenadeDetonated {
            frozen: 1,
            duration_ms: 5000,
            ..
        }
    )));

    let tank = sim.arena().tank(near).expect("near tank");
    assert!(tank.is_frozen());
    assert_eq!(tank.frozen_until(), detonated_at + 5000);
    let held = (tank.position, tank.heading);
    assert!(!sim.arena().tank(far).is_some_and(|t| t.is_frozen()));
    sim.arena_mut().despawn(far);

    let thawed_at = loop {
        let events = step_frame(&mut sim, &InputState::idle());
        let now = sim.now_ms();
        if events.contains(&GameEvent::TankUnfrozen { tank: near }) {
            break now;
        }
        assert!(now < detonated_at + 5000, "no thaw by {now}");
        assert_eq!(sim.arena().tank(near).map(|t| (t.position, t.heading)), Some(held));
    };
    assert!(thawed_at >= detonated_at + 5000);
    assert!(thawed_at < detonated_at + 5000 + FRAME_MS);
    assert!(!sim.arena().tank(near).is_some_and(|t| t.is_frozen()));
}

#[test]
fn frozen_tank_does_not_move() {
    let mut sim = empty_battlefield(8);
    let tank = spawn_tank(&mut sim, Team::Right, Personality::Flanker, Vec2::new(700.0, 300.0));
    let now = sim.now_ms();
    let until = sim
        .arena_mut()
        .tank_mut(tank)
        .map(|t| t.freeze(now, Some(2000)))
        .expect("tank");
    let before = sim.arena().tank(tank).map(|t| (t.position, t.heading));

    while sim.now_ms() + FRAME_MS < until {
        step_frame(&mut sim, &InputState::idle());
        assert_eq!(sim.arena().tank(tank).map(|t| (t.position, t.heading)), before);
    }
}

// =============================================================================
// Combat
// =============================================================================

#[test]
fn each_tank_keeps_at_most_one_shell() {
    let mut sim = empty_battlefield(21);
    let left = spawn_tank(&mut sim, Team::Left, Personality::Defensive, Vec2::new(300.0, 300.0));
    let right = spawn_tank(&mut sim, Team::Right, Personality::Defensive, Vec2::new(700.0, 300.0));

    let mut shots = 0;
    for _ in 0..400 {
        let events = step_frame(&mut sim, &InputState::idle());
        shots += events
            .iter()
            .filter(|e| matches!(e, GameEvent::TankShot { .. }))
            .count();

        for owner in [left, right] {
            let in_flight = sim
                .arena()
                .entities_sorted()
                .filter_map(Entity::as_shell)
                .filter(|s| s.owner() == owner)
                .count();
            assert!(in_flight <= 1, "tank {owner} has {in_flight} shells");
            if in_flight == 1 {
                assert!(sim.arena().tank(owner).is_some_and(|t| t.has_active_shell()));
            }
        }
    }
    assert!(shots >= 1);
}

#[test]
fn whistle_stops_once_per_shell() {
    let mut sim = running_sim(GameConfig::default(), 13);
    let events = flatten(&run_idle(&mut sim, 900));

    let started: Vec<EntityId> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::WhistleStarted { shell } => Some(*shell),
            _ => None,
        })
        .collect();
    let stopped: Vec<EntityId> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::WhistleStopped { shell } => Some(*shell),
            _ => None,
        })
        .collect();

    for shell in &stopped {
        assert_eq!(stopped.iter().filter(|s| *s == shell).count(), 1);
        assert!(started.contains(shell));
    }
    let live = sim.arena().ids_with_tag(EntityTag::Shell);
    for shell in &started {
        assert!(stopped.contains(shell) || live.contains(shell));
    }
}

#[test]
fn shell_hit_on_medic_costs_a_life_and_the_soldier() {
    let mut sim = empty_battlefield(6);
    let soldier_at = sim.rescue().soldier().map(|s| s.position).expect("soldier");
    sim.player_mut().position = soldier_at;
    step_frame(&mut sim, &InputState::idle());
    assert!(sim.player().is_carrying());

    let origin = soldier_at - Vec2::new(20.0, 0.0);
    spawn_shell(&mut sim, EntityId::new(999), Team::Left, origin, 0.0, 400.0);
    let events = step_frame(&mut sim, &InputState::idle());

    assert!(events.contains(&GameEvent::PlayerHit { lives: 2 }));
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::SoldierDied {
            cause: LossCause::KilledInAction,
            ..
        }
    )));
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::WhistleStopped { .. })));
    assert!(!sim.player().is_carrying());
    assert!((sim.player().position.y - 30.0).abs() < 0.0001);
}

#[test]
fn medic_in_hospital_is_safe() {
    let mut sim = empty_battlefield(6);
    let at = sim.player().position;
    spawn_shell(&mut sim, EntityId::new(999), Team::Right, at + Vec2::new(20.0, 0.0), std::f32::consts::PI, 400.0);
    let events = step_frame(&mut sim, &InputState::idle());
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::PlayerHit { .. })));
    assert_eq!(sim.lives(), 3);
}

#[test]
fn three_hits_end_the_game() {
    let mut sim = empty_battlefield(6);
    let mut events = Vec::new();
    for _ in 0..3 {
        sim.player_mut().position.y = 300.0;
        let origin = Vec2::new(480.0, 300.0);
        spawn_shell(&mut sim, EntityId::new(999), Team::Left, origin, 0.0, 400.0);
        events.extend(step_frame(&mut sim, &InputState::idle()));
    }
    assert!(events.contains(&GameEvent::GameOver { rescues: 0 }));
    assert_eq!(sim.phase(), Phase::GameOver);
    assert_eq!(sim.lives(), 0);

    let tick = sim.tick();
    assert!(step_frame(&mut sim, &InputState::idle()).is_empty());
    assert_eq!(sim.tick(), tick);
}

// =============================================================================
// Reinforcements and pickups
// =============================================================================

#[test]
fn wiped_team_reinforces_after_two_seconds() {
    let mut sim = running_sim(GameConfig::default(), 17);
    let right: Vec<EntityId> = sim.arena().team_tanks(Team::Right).map(|(id, _)| id).collect();
    for id in right {
        sim.arena_mut().despawn(id);
    }

    let frames = run_idle(&mut sim, 2200 / FRAME_MS);
    let spawned_at = first_time(&frames, |e| {
        matches!(e, GameEvent::TankSpawned { team: Team::Right, .. })
    });
    assert_eq!(spawned_at, Some(2000));
    assert_eq!(sim.arena().tank_count(Team::Right), 1);
    assert_eq!(sim.arena().tank_count(Team::Left), 5);
}

#[test]
fn pickups_spawn_in_channel_and_can_be_collected() {
    let mut sim = empty_battlefield(12);
    let frames = run_idle(&mut sim, 20_100 / FRAME_MS);
    let (pickup, position) = flatten(&frames)
        .into_iter()
        .find_map(|e| match e {
            GameEvent::PickupSpawned { pickup, position } => Some((pickup, position)),
            _ => None,
        })
        .expect("a pickup within the longest interval");

    let config = quiet_config();
    assert!((position.x - config.arena.channel_center()).abs() < 0.0001);
    assert!(position.y >= 80.0 && position.y <= 520.0);

    if sim.arena().contains(pickup) {
        sim.player_mut().position = position;
        let events = step_frame(&mut sim, &InputState::idle());
        assert!(events.contains(&GameEvent::PickupCollected { pickup, grenades: 4 }));
        assert!(!sim.arena().contains(pickup));
    }
}

// =============================================================================
// Host boundaries
// =============================================================================

#[derive(Clone, Default)]
struct SharedAudio(Arc<Mutex<Vec<SoundCue>>>);

impl AudioSink for SharedAudio {
    fn play(&mut self, cue: SoundCue) {
        if let Ok(mut cues) = self.0.lock() {
            cues.push(cue);
        }
    }
    fn start_whistle(&mut self, _shell: EntityId) {}
    fn stop_whistle(&mut self, _shell: EntityId) {}
}

#[derive(Clone, Default)]
struct SharedHud(Arc<Mutex<Option<HudSummary>>>);

impl HudSink for SharedHud {
    fn update(&mut self, summary: &HudSummary) {
        if let Ok(mut last) = self.0.lock() {
            *last = Some(*summary);
        }
    }
}

#[test]
fn sinks_receive_cues_and_summary() {
    let mut sim = empty_battlefield(6);
    let audio = SharedAudio::default();
    let hud = SharedHud::default();
    sim.set_audio_sink(Box::new(audio.clone()));
    sim.set_hud_sink(Box::new(hud.clone()));

    sim.player_mut().position.y = 300.0;
    spawn_shell(&mut sim, EntityId::new(999), Team::Left, Vec2::new(480.0, 300.0), 0.0, 400.0);
    step_frame(&mut sim, &InputState::idle());

    let cues = audio.0.lock().expect("audio lock").clone();
    assert_eq!(cues, vec![SoundCue::Explosion, SoundCue::PlayerHit]);
    let summary = hud.0.lock().expect("hud lock").expect("summary pushed");
    assert_eq!(summary.lives, 2);
    assert_eq!(summary.tanks, [0, 0]);
}

#[test]
fn snapshot_tracks_shake_after_explosion() {
    let mut sim = empty_battlefield(6);
    spawn_shell(&mut sim, EntityId::new(999), Team::Left, Vec2::new(200.0, 300.0), 0.0, 8.0);
    step_frame(&mut sim, &InputState::idle());
    let frame = sim.snapshot();
    assert!((frame.shake - 8.0 * 0.9).abs() < 0.0001);
    assert_eq!(frame.effects.len(), 1);
    assert!(frame.shells.is_empty());
}

// =============================================================================
// Whistles of cleared shells
// =============================================================================

#[derive(Clone, Default)]
struct SharedWhistles {
    started: Arc<Mutex<Vec<EntityId>>>,
    stopped: Arc<Mutex<Vec<EntityId>>>,
}

impl AudioSink for SharedWhistles {
    fn play(&mut self, _cue: SoundCue) {}
    fn start_whistle(&mut self, shell: EntityId) {
        if let Ok(mut started) = self.started.lock() {
            started.push(shell);
        }
    }
    fn stop_whistle(&mut self, shell: EntityId) {
        if let Ok(mut stopped) = self.stopped.lock() {
            stopped.push(shell);
        }
    }
}

/// Every whistle the sink heard start was stopped once, unless its shell is
/// still in `live`.
fn assert_whistles_stopped_once(whistles: &SharedWhistles, live: &[EntityId]) {
    let started = whistles.started.lock().expect("whistle lock").clone();
    let stopped = whistles.stopped.lock().expect("whistle lock").clone();
    for shell in &started {
        let stops = stopped.iter().filter(|s| *s == shell).count();
        let expected = usize::from(!live.contains(shell));
        assert_eq!(stops, expected, "whistle of {shell:?} stopped {stops} times");
    }
    for shell in &stopped {
        assert!(started.contains(shell));
    }
}

#[test]
fn restart_stops_every_live_whistle() {
    let mut sim = running_sim(GameConfig::default(), 13);
    let whistles = SharedWhistles::default();
    sim.set_audio_sink(Box::new(whistles.clone()));

    for _ in 0..2000 {
        if !sim.arena().ids_with_tag(EntityTag::Shell).is_empty() {
            break;
        }
        step_frame(&mut sim, &InputState::idle());
    }
    let live = sim.arena().ids_with_tag(EntityTag::Shell);
    assert!(!live.is_empty());

    let events = sim.restart();
    for shell in &live {
        assert!(events.contains(&GameEvent::WhistleStopped { shell: *shell }));
    }

    run_idle(&mut sim, 5);
    assert_whistles_stopped_once(&whistles, &sim.arena().ids_with_tag(EntityTag::Shell));
}

#[test]
fn game_over_stops_every_live_whistle() {
    let mut config = quiet_config();
    config.rescue.lives = 1;
    let mut sim = running_sim(config, 6);
    sim.arena_mut().clear();
    let whistles = SharedWhistles::default();
    sim.set_audio_sink(Box::new(whistles.clone()));

    let far = spawn_shell(&mut sim, EntityId::new(999), Team::Left, Vec2::new(100.0, 500.0), 0.0, 300.0);
    assert!(sim.arena_mut().shell_mut(far).is_some_and(|shell| shell.start_whistle()));

    sim.player_mut().position.y = 300.0;
    spawn_shell(&mut sim, EntityId::new(999), Team::Left, Vec2::new(480.0, 300.0), 0.0, 400.0);
    let events = step_frame(&mut sim, &InputState::idle());

    assert_eq!(sim.phase(), Phase::GameOver);
    let stops = events
        .iter()
        .filter(|e| **e == GameEvent::WhistleStopped { shell: far })
        .count();
    assert_eq!(stops, 1);
    let whistle = sim.arena().get(far).and_then(Entity::as_shell).map(Shell::whistle);
    assert_eq!(whistle, Some(Whistle::Stopped));

    step_frame(&mut sim, &InputState::idle());
    assert_eq!(*whistles.stopped.lock().expect("whistle lock"), vec![far]);
}

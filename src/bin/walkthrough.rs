//! Walkthrough - Headless Play-in-Editor Demo
//!
//! Run with: `cargo run --bin walkthrough`
//!
//! Builds a pair of tiny levels in a temp directory, possesses the avatar
//! in the first one, walks it onto the exit trigger and follows the full
//! transition into the second level, logging phase changes and the fade as
//! they happen. Set `RUST_LOG=debug` for the per-trigger detail.

use std::path::PathBuf;
use std::sync::Arc;

use glam::Vec3;
use log::info;

use mapwalk_engine::config::PlaySettings;
use mapwalk_engine::input::{KeyCode, MovementKeys};
use mapwalk_engine::level::{
    Collider, ExitTrigger, JsonLevelSource, Level, LevelSource, Marker,
};
use mapwalk_engine::physics::{Aabb, AabbProbe};
use mapwalk_engine::session::PlaySession;
use mapwalk_engine::transition::{TransitionHost, TransitionPhase};

/// Host standing in for the editor GUI: every prompt auto-confirms.
#[derive(Default)]
struct HeadlessHost {
    save_pending: Option<bool>,
    backup_pending: Option<Level>,
}

impl TransitionHost for HeadlessHost {
    fn request_save_confirmation(&mut self) {
        info!("save prompt: auto-confirming");
        self.save_pending = Some(true);
    }

    fn poll_save_confirmation(&mut self) -> Option<bool> {
        self.save_pending.take()
    }

    fn request_backup_check(&mut self, level: Level) {
        info!("backup check on `{}`: clean", level.name);
        self.backup_pending = Some(level);
    }

    fn poll_backup_check(&mut self) -> Option<Level> {
        self.backup_pending.take()
    }

    fn level_opened(&mut self, level: &mut Level) {
        info!("opened `{}`, syncing visibility", level.name);
    }
}

fn floor(name: &str, min: Vec3, max: Vec3) -> Collider {
    Collider {
        name: name.into(),
        hidden: false,
        ignore_player: false,
        shape: Some(Aabb::new(min, max)),
    }
}

/// Starting level: a walkway heading -Z ending on an exit pad.
fn make_town() -> Level {
    Level {
        name: "town_w".into(),
        colliders: vec![
            floor(
                "walkway",
                Vec3::new(-60.0, -10.0, -300.0),
                Vec3::new(60.0, 0.0, 60.0),
            ),
            floor(
                "exit_pad",
                Vec3::new(-60.0, -10.0, -420.0),
                Vec3::new(60.0, 0.0, -300.0),
            ),
        ],
        markers: vec![Marker {
            name: "exit_s".into(),
            position: Vec3::new(0.0, 0.0, -360.0),
            yaw: 180.0,
            hitbox: None,
        }],
        exits: vec![ExitTrigger {
            collider_name: Some("exit_pad".into()),
            dest_level: Some("field_01".into()),
            dest_marker: Some("entry_n".into()),
            exit_marker: Some("exit_s".into()),
        }],
        modified: false,
    }
}

/// Destination level written to disk for the background loader.
fn make_field() -> Level {
    Level {
        name: "field_01".into(),
        colliders: vec![floor(
            "meadow",
            Vec3::new(-500.0, -10.0, -500.0),
            Vec3::new(500.0, 0.0, 500.0),
        )],
        markers: vec![Marker {
            name: "entry_n".into(),
            position: Vec3::new(0.0, 0.0, -400.0),
            yaw: 0.0,
            hitbox: None,
        }],
        exits: Vec::new(),
        modified: false,
    }
}

fn write_levels(dir: &PathBuf) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    for level in [make_town(), make_field()] {
        let path = dir.join(&level.name).with_extension("json");
        std::fs::write(&path, serde_json::to_string_pretty(&level)?)?;
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let dir = std::env::temp_dir().join(format!("mapwalk_walkthrough_{}", std::process::id()));
    if let Err(err) = write_levels(&dir) {
        eprintln!("cannot write demo levels: {err}");
        std::process::exit(1);
    }
    let source_impl = JsonLevelSource::new(&dir);
    let town = match source_impl.load_by_name("town_w") {
        Ok(level) => level,
        Err(err) => {
            eprintln!("cannot load starting level: {err}");
            std::process::exit(1);
        }
    };
    let source: Arc<dyn LevelSource> = Arc::new(source_impl);

    let mut session = PlaySession::new(town, PlaySettings::default(), Vec3::new(0.0, 0.0, 30.0));
    session.enter_play();
    info!("possessed avatar in `{}`", session.level.name);

    let mut host = HeadlessHost::default();
    let mut keys = MovementKeys::new();
    keys.handle_key(KeyCode::W, true); // walk camera-forward (-Z) toward the pad
    keys.handle_key(KeyCode::ShiftLeft, true); // sprint

    let dt = 1.0 / 60.0;
    let mut last_phase = TransitionPhase::None;
    let mut transitioned = false;

    for frame in 0..3600 {
        session.update(&AabbProbe, &source, &mut host, &keys, 0.0, dt, true);

        let phase = session.transition.phase();
        if phase != last_phase {
            info!(
                "[{frame:4}] {:?} -> {:?} (fade {:.2})",
                last_phase,
                phase,
                session.transition.fade_amount()
            );
            if last_phase == TransitionPhase::Entering && phase == TransitionPhase::None {
                transitioned = true;
            }
            last_phase = phase;
        }

        // Stop steering once the controller owns the heading.
        if !session.transition.allows_input() {
            keys.handle_key(KeyCode::W, false);
            keys.handle_key(KeyCode::ShiftLeft, false);
        }

        if transitioned {
            break;
        }

        // Pace the loop loosely; the editor would be frame-locked here.
        std::thread::sleep(std::time::Duration::from_micros(500));
    }

    let pos = session.sim.position();
    info!(
        "finished in `{}` at ({:.1}, {:.1}, {:.1})",
        session.level.name, pos.x, pos.y, pos.z
    );
    session.leave_play();

    if !transitioned {
        eprintln!("walkthrough never completed the transition");
        std::process::exit(1);
    }
}

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chicken_shooter::assets::*;
use chicken_shooter::config::*;
use chicken_shooter::error::StartupError;

use glam::Vec2;
use log::LevelFilter;

/// Fresh, empty directory under the system temp dir, unique per test and process.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("chicken_shooter_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_sprite(dir: &Path, id: SpriteId, art: &str) {
    fs::write(dir.join(format!("{}.txt", id.name())), art).unwrap();
}

// ── Config ────────────────────────────────────────────────────────────────────

#[test]
fn default_config_values() {
    let c = GameConfig::default();
    assert_eq!(c.playfield, Playfield { width: 1200.0, height: 800.0 });
    assert_eq!(c.timing.frame_rate, 60);
    assert_eq!(c.timing.fire_cooldown(), Duration::from_millis(250));
    assert_eq!(c.timing.enemy_spawn_interval(), Duration::from_millis(1000));
    assert_eq!(c.timing.obstacle_spawn_interval(), Duration::from_millis(2000));
    assert!(!c.boss.enabled);
    assert_eq!(c.boss.score_threshold, 200);
    assert_eq!(c.boss.spawn_one_in, 50);
    assert_eq!(c.assets.dir, None);
    assert_eq!(c.logging.file, PathBuf::from("chicken_shooter.log"));
    assert_eq!(c.logging.level_filter().unwrap(), LevelFilter::Info);
    assert!(c.validate().is_ok());
}

#[test]
fn frame_duration_from_rate() {
    let timing = Timing { frame_rate: 50, ..Timing::default() };
    assert_eq!(timing.frame(), Duration::from_millis(20));
    assert_eq!(Timing::default().frame(), Duration::from_micros(16_666));
}

#[test]
fn empty_toml_gives_defaults() {
    assert_eq!(GameConfig::from_toml_str("").unwrap(), GameConfig::default());
}

#[test]
fn partial_toml_overrides_only_named_fields() {
    let c = GameConfig::from_toml_str(
        r#"
        [timing]
        fire_cooldown_ms = 100

        [boss]
        enabled = true
        "#,
    )
    .unwrap();
    assert_eq!(c.timing.fire_cooldown_ms, 100);
    assert_eq!(c.timing.enemy_spawn_interval_ms, 1000);
    assert!(c.boss.enabled);
    assert_eq!(c.boss.score_threshold, 200);
    assert_eq!(c.playfield, Playfield::default());
}

#[test]
fn full_toml_parses_every_section() {
    let c = GameConfig::from_toml_str(
        r#"
        [playfield]
        width = 900.0
        height = 600.0

        [timing]
        frame_rate = 30
        fire_cooldown_ms = 300
        enemy_spawn_interval_ms = 800
        obstacle_spawn_interval_ms = 1500

        [boss]
        enabled = true
        score_threshold = 50
        spawn_one_in = 10

        [assets]
        dir = "sprites"

        [logging]
        file = "game.log"
        level = "debug"
        "#,
    )
    .unwrap();
    assert_eq!(c.playfield, Playfield { width: 900.0, height: 600.0 });
    assert_eq!(c.timing.frame_rate, 30);
    assert_eq!(c.timing.obstacle_spawn_interval_ms, 1500);
    assert_eq!(c.boss.spawn_one_in, 10);
    assert_eq!(c.assets.dir, Some(PathBuf::from("sprites")));
    assert_eq!(c.logging.file, PathBuf::from("game.log"));
    assert_eq!(c.logging.level_filter().unwrap(), LevelFilter::Debug);
}

#[test]
fn rejects_non_positive_playfield() {
    let err = GameConfig::from_toml_str("[playfield]\nwidth = 0.0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "playfield.width", .. }));
    let err = GameConfig::from_toml_str("[playfield]\nheight = -10.0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "playfield.height", .. }));
}

#[test]
fn rejects_oversized_playfield() {
    let err = GameConfig::from_toml_str("[playfield]\nwidth = 1e9\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "playfield.width", .. }));
    let err = GameConfig::from_toml_str("[playfield]\nheight = 200000.0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "playfield.height", .. }));

    let text = format!("[playfield]\nwidth = {:.1}\n", MAX_PLAYFIELD_EXTENT);
    assert!(GameConfig::from_toml_str(&text).is_ok());
}

#[test]
fn rejects_zero_frame_rate_and_escort_odds() {
    let err = GameConfig::from_toml_str("[timing]\nframe_rate = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "timing.frame_rate", .. }));
    let err = GameConfig::from_toml_str("[boss]\nspawn_one_in = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "boss.spawn_one_in", .. }));
}

#[test]
fn rejects_unknown_log_level() {
    let err = GameConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "logging.level", .. }));
    assert!(err.to_string().contains("loud"));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    assert!(matches!(
        GameConfig::from_toml_str("[timing\nframe_rate = 60"),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        GameConfig::from_toml_str("[timing]\nframe_rate = \"fast\"\n"),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn missing_config_file_gives_defaults() {
    let dir = scratch_dir("missing_config");
    let c = GameConfig::load(&dir.join(DEFAULT_CONFIG_FILE)).unwrap();
    assert_eq!(c, GameConfig::default());
}

#[test]
fn config_file_is_loaded_from_disk() {
    let dir = scratch_dir("config_file");
    let path = dir.join(DEFAULT_CONFIG_FILE);
    fs::write(&path, "[boss]\nscore_threshold = 30\n").unwrap();
    let c = GameConfig::load(&path).unwrap();
    assert_eq!(c.boss.score_threshold, 30);
}

#[test]
fn config_errors_surface_through_startup_error() {
    let err: StartupError = GameConfig::from_toml_str("[timing]\nframe_rate = 0\n")
        .unwrap_err()
        .into();
    assert!(matches!(err, StartupError::Config(_)));
    assert!(err.to_string().contains("timing.frame_rate"));
}

// ── Assets ────────────────────────────────────────────────────────────────────

#[test]
fn builtin_sprite_sizes() {
    let sizes = SpriteSizes::default();
    assert_eq!(sizes.ship, Vec2::new(45.0, 64.0));
    assert_eq!(sizes.bullet, Vec2::new(15.0, 32.0));
    assert_eq!(sizes.chicken, Vec2::new(45.0, 64.0));
    assert_eq!(sizes.chicken2, Vec2::new(45.0, 64.0));
    assert_eq!(sizes.boss, Vec2::new(105.0, 96.0));
    assert_eq!(sizes.obstacle, Vec2::new(45.0, 64.0));
}

#[test]
fn sprite_names_resolve() {
    for id in SpriteId::ALL {
        assert_eq!(SpriteId::from_name(id.name()).unwrap(), id);
    }
    let sheet = SpriteSheet::builtin();
    assert_eq!(sheet.by_name("boss").unwrap().rows.len(), 3);
}

#[test]
fn unknown_sprite_name_is_an_error() {
    let sheet = SpriteSheet::builtin();
    let err = sheet.by_name("dragon").unwrap_err();
    assert!(matches!(err, AssetError::Unknown(ref name) if name == "dragon"));
}

#[test]
fn load_without_dir_uses_builtin_art() {
    let sheet = SpriteSheet::load(None).unwrap();
    assert_eq!(sheet.sizes(), SpriteSizes::default());
}

#[test]
fn load_from_dir_reads_every_sprite() {
    let dir = scratch_dir("sprites_ok");
    for id in SpriteId::ALL {
        write_sprite(&dir, id, "##\n##\n##\n");
    }
    write_sprite(&dir, SpriteId::Bullet, "!\n");

    let sheet = SpriteSheet::load(Some(&dir)).unwrap();
    let sizes = sheet.sizes();
    assert_eq!(sizes.ship, Vec2::new(30.0, 96.0));
    assert_eq!(sizes.bullet, Vec2::new(15.0, 32.0));
    assert_eq!(sheet.get(SpriteId::Boss).rows, vec!["##", "##", "##"]);
}

#[test]
fn load_fails_on_missing_sprite() {
    let dir = scratch_dir("sprites_missing");
    for id in SpriteId::ALL.into_iter().filter(|id| *id != SpriteId::Boss) {
        write_sprite(&dir, id, "x");
    }
    let err = SpriteSheet::load(Some(&dir)).unwrap_err();
    assert!(matches!(err, AssetError::Read { name: "boss", .. }));
}

#[test]
fn load_fails_on_blank_sprite() {
    let dir = scratch_dir("sprites_blank");
    for id in SpriteId::ALL {
        write_sprite(&dir, id, "x");
    }
    write_sprite(&dir, SpriteId::Bullet, "   \n\n");
    let err = SpriteSheet::load(Some(&dir)).unwrap_err();
    assert!(matches!(err, AssetError::Empty { name: "bullet" }));

    let startup: StartupError = err.into();
    assert!(startup.to_string().contains("bullet"));
}

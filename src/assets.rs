/// Named sprite resources.
///
/// Every entity is drawn from a block of glyph art.  The art also defines
/// the entity's extent in playfield units, so what the player sees is
/// exactly the box that collides.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use log::info;
use thiserror::Error;

/// Playfield units covered by one terminal column.
pub const CELL_WIDTH: f32 = 15.0;
/// Playfield units covered by one terminal row.
pub const CELL_HEIGHT: f32 = 32.0;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load sprite `{name}` from {}: {source}", .path.display())]
    Read {
        name: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("sprite `{name}` has no glyph art")]
    Empty { name: &'static str },
    #[error("unknown sprite `{0}`")]
    Unknown(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteId {
    Ship,
    Bullet,
    Chicken,
    Chicken2,
    Boss,
    Obstacle,
}

impl SpriteId {
    pub const ALL: [SpriteId; 6] = [
        SpriteId::Ship,
        SpriteId::Bullet,
        SpriteId::Chicken,
        SpriteId::Chicken2,
        SpriteId::Boss,
        SpriteId::Obstacle,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SpriteId::Ship => "ship",
            SpriteId::Bullet => "bullet",
            SpriteId::Chicken => "chicken",
            SpriteId::Chicken2 => "chicken2",
            SpriteId::Boss => "boss",
            SpriteId::Obstacle => "obstacle",
        }
    }

    pub fn from_name(name: &str) -> Result<SpriteId, AssetError> {
        SpriteId::ALL
            .into_iter()
            .find(|id| id.name() == name)
            .ok_or_else(|| AssetError::Unknown(name.to_string()))
    }

    fn builtin_art(&self) -> &'static str {
        match self {
            SpriteId::Ship => " ^ \n/#\\",
            SpriteId::Bullet => "|",
            SpriteId::Chicken => "<o>\n/W\\",
            SpriteId::Chicken2 => "{@}\n/V\\",
            SpriteId::Boss => " _/^\\_ \n<(O_O)>\n /VVV\\ ",
            SpriteId::Obstacle => "[#]\n[#]",
        }
    }
}

/// Glyph art for one sprite, one string per terminal row.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub rows: Vec<String>,
}

impl Sprite {
    fn parse(name: &'static str, art: &str) -> Result<Sprite, AssetError> {
        let rows: Vec<String> = art.lines().map(str::to_string).collect();
        if rows.iter().all(|row| row.trim().is_empty()) {
            return Err(AssetError::Empty { name });
        }
        Ok(Sprite { rows })
    }

    pub fn columns(&self) -> usize {
        self.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0)
    }

    /// Extent in playfield units.
    pub fn size(&self) -> Vec2 {
        Vec2::new(
            self.columns() as f32 * CELL_WIDTH,
            self.rows.len() as f32 * CELL_HEIGHT,
        )
    }
}

/// Extents of every entity type, copied into the game session so the
/// simulation never needs the art itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteSizes {
    pub ship: Vec2,
    pub bullet: Vec2,
    pub chicken: Vec2,
    pub chicken2: Vec2,
    pub boss: Vec2,
    pub obstacle: Vec2,
}

impl Default for SpriteSizes {
    fn default() -> Self {
        SpriteSheet::builtin().sizes()
    }
}

#[derive(Clone, Debug)]
pub struct SpriteSheet {
    ship: Sprite,
    bullet: Sprite,
    chicken: Sprite,
    chicken2: Sprite,
    boss: Sprite,
    obstacle: Sprite,
}

impl SpriteSheet {
    /// The art compiled into the binary.
    pub fn builtin() -> SpriteSheet {
        let art = |id: SpriteId| Sprite {
            rows: id.builtin_art().lines().map(str::to_string).collect(),
        };
        SpriteSheet {
            ship: art(SpriteId::Ship),
            bullet: art(SpriteId::Bullet),
            chicken: art(SpriteId::Chicken),
            chicken2: art(SpriteId::Chicken2),
            boss: art(SpriteId::Boss),
            obstacle: art(SpriteId::Obstacle),
        }
    }

    /// Load every sprite, reading `<dir>/<name>.txt` when an override
    /// directory is given.  Any missing or empty sprite aborts the load.
    pub fn load(dir: Option<&Path>) -> Result<SpriteSheet, AssetError> {
        let Some(dir) = dir else {
            info!("Using built-in sprites");
            return Ok(SpriteSheet::builtin());
        };

        let read = |id: SpriteId| -> Result<Sprite, AssetError> {
            let path = dir.join(format!("{}.txt", id.name()));
            let art = fs::read_to_string(&path).map_err(|source| AssetError::Read {
                name: id.name(),
                path: path.clone(),
                source,
            })?;
            let sprite = Sprite::parse(id.name(), &art)?;
            info!(
                "Loaded sprite `{}` ({} rows) from {}",
                id.name(),
                sprite.rows.len(),
                path.display()
            );
            Ok(sprite)
        };

        Ok(SpriteSheet {
            ship: read(SpriteId::Ship)?,
            bullet: read(SpriteId::Bullet)?,
            chicken: read(SpriteId::Chicken)?,
            chicken2: read(SpriteId::Chicken2)?,
            boss: read(SpriteId::Boss)?,
            obstacle: read(SpriteId::Obstacle)?,
        })
    }

    pub fn get(&self, id: SpriteId) -> &Sprite {
        match id {
            SpriteId::Ship => &self.ship,
            SpriteId::Bullet => &self.bullet,
            SpriteId::Chicken => &self.chicken,
            SpriteId::Chicken2 => &self.chicken2,
            SpriteId::Boss => &self.boss,
            SpriteId::Obstacle => &self.obstacle,
        }
    }

    /// Look a sprite up by its resource name.
    pub fn by_name(&self, name: &str) -> Result<&Sprite, AssetError> {
        SpriteId::from_name(name).map(|id| self.get(id))
    }

    pub fn sizes(&self) -> SpriteSizes {
        SpriteSizes {
            ship: self.ship.size(),
            bullet: self.bullet.size(),
            chicken: self.chicken.size(),
            chicken2: self.chicken2.size(),
            boss: self.boss.size(),
            obstacle: self.obstacle.size(),
        }
    }
}

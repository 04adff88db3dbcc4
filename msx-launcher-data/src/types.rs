//! Data model types for the launcher catalog.
//!
//! These types mirror the persisted shape of the embedded store: games grouped
//! into named databases, database backups, and the external extra-data records
//! used to refresh derived game fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Game ────────────────────────────────────────────────────────────────────

/// A single MSX title as stored in a launcher database.
///
/// A game is identified by its name within one database; the same name may
/// appear in several databases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub name: String,
    #[serde(default)]
    pub info: Option<String>,
    pub machine: String,
    #[serde(default)]
    pub rom_a: Option<String>,
    #[serde(default)]
    pub rom_b: Option<String>,
    /// openMSX extension ROM name (e.g. `"scc+"`), not a file path.
    #[serde(default)]
    pub extension_rom: Option<String>,
    #[serde(default)]
    pub disk_a: Option<String>,
    #[serde(default)]
    pub disk_b: Option<String>,
    #[serde(default)]
    pub tape: Option<String>,
    #[serde(default)]
    pub harddisk: Option<String>,
    #[serde(default)]
    pub laserdisc: Option<String>,
    #[serde(default)]
    pub tcl_script: Option<String>,
    #[serde(default)]
    pub generations: Generations,
    #[serde(default)]
    pub sound_chips: SoundChips,
    #[serde(default)]
    pub genre1: u32,
    #[serde(default)]
    pub genre2: u32,
    /// Identifier of the title on generation-msx.nl (0 when unknown).
    #[serde(default)]
    pub msx_gen_id: u32,
    #[serde(default)]
    pub screenshot_suffix: Option<String>,
    #[serde(default)]
    pub sha1: Option<String>,
    /// Size in bytes of the main media file. Signed to match the store's
    /// integer column.
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub fdd_mode: FddMode,
    #[serde(default = "default_true")]
    pub tcl_script_override: bool,
    #[serde(default)]
    pub input_device: InputDevice,
    #[serde(default)]
    pub connect_gfx9000: bool,
}

fn default_true() -> bool {
    true
}

impl Game {
    /// Start a game with the given name and machine; everything else empty.
    pub fn new(name: impl Into<String>, machine: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            info: None,
            machine: machine.into(),
            rom_a: None,
            rom_b: None,
            extension_rom: None,
            disk_a: None,
            disk_b: None,
            tape: None,
            harddisk: None,
            laserdisc: None,
            tcl_script: None,
            generations: Generations::default(),
            sound_chips: SoundChips::default(),
            genre1: 0,
            genre2: 0,
            msx_gen_id: 0,
            screenshot_suffix: None,
            sha1: None,
            size: 0,
            fdd_mode: FddMode::default(),
            tcl_script_override: true,
            input_device: InputDevice::default(),
            connect_gfx9000: false,
        }
    }

    /// True when at least one launchable medium (or a script) is set.
    pub fn has_media(&self) -> bool {
        [
            &self.rom_a,
            &self.rom_b,
            &self.disk_a,
            &self.disk_b,
            &self.tape,
            &self.harddisk,
            &self.laserdisc,
            &self.tcl_script,
        ]
        .into_iter()
        .any(|field| !is_blank(field.as_deref()))
    }

    /// Compare only the fields derived from extra data.
    pub fn is_extra_data_equal(&self, other: &Game) -> bool {
        self.generations == other.generations
            && self.sound_chips == other.sound_chips
            && self.genre1 == other.genre1
            && self.genre2 == other.genre2
            && self.msx_gen_id == other.msx_gen_id
            && self.screenshot_suffix == other.screenshot_suffix
    }
}

/// `None` and `Some("")` are both treated as empty.
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(str::is_empty)
}

/// MSX generations a title runs on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Generations {
    pub msx: bool,
    pub msx2: bool,
    pub msx2plus: bool,
    pub turbo_r: bool,
}

/// Sound hardware a title makes use of.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoundChips {
    pub psg: bool,
    pub scc: bool,
    pub scc_i: bool,
    pub pcm: bool,
    pub msx_music: bool,
    pub msx_audio: bool,
    pub moonsound: bool,
    pub midi: bool,
}

/// Floppy drive configuration used when launching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FddMode {
    #[default]
    EnableBoth,
    DisableSecond,
    DisableBoth,
}

impl FddMode {
    pub fn as_value(self) -> u8 {
        match self {
            Self::EnableBoth => 0,
            Self::DisableSecond => 1,
            Self::DisableBoth => 2,
        }
    }

    /// Unknown values fall back to [`FddMode::EnableBoth`].
    pub fn from_value(value: i64) -> Self {
        match value {
            1 => Self::DisableSecond,
            2 => Self::DisableBoth,
            _ => Self::EnableBoth,
        }
    }
}

/// Input device plugged into the emulated machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputDevice {
    #[default]
    None,
    Joystick,
    JoystickKeyboard,
    Mouse,
    ArkanoidPad,
    Trackball,
    Touchpad,
}

impl InputDevice {
    pub fn as_value(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Joystick => 1,
            Self::JoystickKeyboard => 2,
            Self::Mouse => 3,
            Self::ArkanoidPad => 4,
            Self::Trackball => 5,
            Self::Touchpad => 6,
        }
    }

    /// Unknown values fall back to [`InputDevice::None`].
    pub fn from_value(value: i64) -> Self {
        match value {
            1 => Self::Joystick,
            2 => Self::JoystickKeyboard,
            3 => Self::Mouse,
            4 => Self::ArkanoidPad,
            5 => Self::Trackball,
            6 => Self::Touchpad,
            _ => Self::None,
        }
    }
}

// ── Backup ──────────────────────────────────────────────────────────────────

/// A point-in-time snapshot of a database's games.
///
/// Backups are addressed by database name and creation time only; the store's
/// internal backup id never leaves the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DatabaseBackup {
    pub database: String,
    pub timestamp: DateTime<Utc>,
}

impl DatabaseBackup {
    pub fn new(database: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            database: database.into(),
            timestamp,
        }
    }
}

// ── Extra Data ──────────────────────────────────────────────────────────────

/// Per-title metadata keyed by content hash in the extra-data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraData {
    pub msx_gen_id: u32,
    /// Bit field: bit 0 MSX, bit 1 MSX2, bit 2 MSX2+, bit 3 turbo R.
    pub generations: u32,
    /// Bit field: PSG, SCC, SCC-I, PCM, MSX-MUSIC, MSX-AUDIO, Moonsound, MIDI (bits 0-7).
    pub sound_chips: u32,
    pub genre1: u32,
    pub genre2: u32,
    pub suffix: Option<String>,
}

impl ExtraData {
    pub fn decoded_generations(&self) -> Generations {
        let bits = self.generations;
        Generations {
            msx: bit(bits, 0),
            msx2: bit(bits, 1),
            msx2plus: bit(bits, 2),
            turbo_r: bit(bits, 3),
        }
    }

    pub fn decoded_sound_chips(&self) -> SoundChips {
        let bits = self.sound_chips;
        SoundChips {
            psg: bit(bits, 0),
            scc: bit(bits, 1),
            scc_i: bit(bits, 2),
            pcm: bit(bits, 3),
            msx_music: bit(bits, 4),
            msx_audio: bit(bits, 5),
            moonsound: bit(bits, 6),
            midi: bit(bits, 7),
        }
    }
}

fn bit(bits: u32, index: u32) -> bool {
    bits & (1 << index) != 0
}

// ── Related Games ───────────────────────────────────────────────────────────

/// Location of a game inside a launcher database.
///
/// Also the shape of favorites and search hits. Ordered by game name, then
/// database name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DatabaseItem {
    pub game_name: String,
    pub database_name: String,
}

/// A title related to another one (same series, remake, ...).
///
/// `launcher_link` is filled in when a game with the same generation-msx id
/// exists in one of the launcher databases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedGame {
    pub game_name: String,
    pub company: String,
    pub year: String,
    pub msx_gen_id: u32,
    #[serde(default)]
    pub launcher_link: Option<DatabaseItem>,
}

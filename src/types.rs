use std::fmt;

/// Play an effect forever when passed as an iteration count (or used as an
/// effect length).
pub const HAPTIC_INFINITY: u32 = u32::MAX;

bitflags::bitflags! {
    /// Feature bitmap reported by `SDL_HapticQuery`.
    ///
    /// The low twelve bits double as the effect type tags stored in the
    /// first two bytes of a [`HapticEffect`](crate::HapticEffect).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[repr(transparent)]
    pub struct HapticFeatures: u32 {
        const CONSTANT      = 1 << 0;
        const SINE          = 1 << 1;
        const LEFTRIGHT     = 1 << 2;
        const TRIANGLE      = 1 << 3;
        const SAWTOOTHUP    = 1 << 4;
        const SAWTOOTHDOWN  = 1 << 5;
        const RAMP          = 1 << 6;
        const SPRING        = 1 << 7;
        const DAMPER        = 1 << 8;
        const INERTIA       = 1 << 9;
        const FRICTION      = 1 << 10;
        const CUSTOM        = 1 << 11;
        /// Device supports setting the global gain.
        const GAIN          = 1 << 12;
        /// Device supports setting autocenter.
        const AUTOCENTER    = 1 << 13;
        /// Device can be queried for effect status.
        const STATUS        = 1 << 14;
        /// Device can be paused.
        const PAUSE         = 1 << 15;
    }
}

/// Effect type tag, as stored in the leading `type` field of every effect.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Constant = 1 << 0,
    Sine = 1 << 1,
    LeftRight = 1 << 2,
    Triangle = 1 << 3,
    SawtoothUp = 1 << 4,
    SawtoothDown = 1 << 5,
    Ramp = 1 << 6,
    Spring = 1 << 7,
    Damper = 1 << 8,
    Inertia = 1 << 9,
    Friction = 1 << 10,
    Custom = 1 << 11,
}

impl EffectKind {
    pub const ALL: [EffectKind; 12] = [
        EffectKind::Constant,
        EffectKind::Sine,
        EffectKind::LeftRight,
        EffectKind::Triangle,
        EffectKind::SawtoothUp,
        EffectKind::SawtoothDown,
        EffectKind::Ramp,
        EffectKind::Spring,
        EffectKind::Damper,
        EffectKind::Inertia,
        EffectKind::Friction,
        EffectKind::Custom,
    ];

    /// Raw tag value.
    pub fn tag(self) -> u16 {
        self as u16
    }

    /// The capability bit a device reports for this kind.
    pub fn feature(self) -> HapticFeatures {
        HapticFeatures::from_bits_truncate(self.tag() as u32)
    }

    /// Which record layout this kind is stored as.
    pub fn view(self) -> EffectView {
        match self {
            EffectKind::Constant => EffectView::Constant,
            EffectKind::Sine
            | EffectKind::Triangle
            | EffectKind::SawtoothUp
            | EffectKind::SawtoothDown => EffectView::Periodic,
            EffectKind::Spring | EffectKind::Damper | EffectKind::Inertia | EffectKind::Friction => {
                EffectView::Condition
            }
            EffectKind::Ramp => EffectView::Ramp,
            EffectKind::LeftRight => EffectView::LeftRight,
            EffectKind::Custom => EffectView::Custom,
        }
    }
}

impl TryFrom<u16> for EffectKind {
    type Error = crate::HapticError;

    fn try_from(tag: u16) -> crate::Result<Self> {
        EffectKind::ALL
            .into_iter()
            .find(|k| k.tag() == tag)
            .ok_or(crate::HapticError::UnknownEffectType(tag))
    }
}

/// The six record layouts an effect's storage can be read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectView {
    Constant,
    Periodic,
    Condition,
    Ramp,
    LeftRight,
    Custom,
}

impl fmt::Display for EffectView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EffectView::Constant => "constant",
            EffectView::Periodic => "periodic",
            EffectView::Condition => "condition",
            EffectView::Ramp => "ramp",
            EffectView::LeftRight => "left/right",
            EffectView::Custom => "custom",
        })
    }
}

/// Waveform of a periodic effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    SawtoothUp,
    SawtoothDown,
}

impl From<Waveform> for EffectKind {
    fn from(w: Waveform) -> Self {
        match w {
            Waveform::Sine => EffectKind::Sine,
            Waveform::Triangle => EffectKind::Triangle,
            Waveform::SawtoothUp => EffectKind::SawtoothUp,
            Waveform::SawtoothDown => EffectKind::SawtoothDown,
        }
    }
}

/// Kind of a condition effect. Each one reacts to a different axis quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionKind {
    /// Based on axis position.
    Spring,
    /// Based on axis velocity.
    Damper,
    /// Based on axis acceleration.
    Inertia,
    /// Based on axis movement.
    Friction,
}

impl From<ConditionKind> for EffectKind {
    fn from(c: ConditionKind) -> Self {
        match c {
            ConditionKind::Spring => EffectKind::Spring,
            ConditionKind::Damper => EffectKind::Damper,
            ConditionKind::Inertia => EffectKind::Inertia,
            ConditionKind::Friction => EffectKind::Friction,
        }
    }
}

/// How the three components of a [`HapticDirection`](crate::HapticDirection)
/// are interpreted.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionEncoding {
    Polar = 0,
    Cartesian = 1,
    Spherical = 2,
}

impl TryFrom<u8> for DirectionEncoding {
    type Error = u8;

    fn try_from(raw: u8) -> std::result::Result<Self, u8> {
        match raw {
            0 => Ok(DirectionEncoding::Polar),
            1 => Ok(DirectionEncoding::Cartesian),
            2 => Ok(DirectionEncoding::Spherical),
            other => Err(other),
        }
    }
}

/// Repeat count for `run_effect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Iterations {
    /// A finite count. `u32::MAX` is SDL's infinity value, so
    /// `Count(u32::MAX)` plays the same as [`Iterations::Infinite`];
    /// converting `u32::MAX` with `From<u32>` yields `Infinite`.
    Count(u32),
    Infinite,
}

impl Iterations {
    pub fn raw(self) -> u32 {
        match self {
            Iterations::Count(n) => n,
            Iterations::Infinite => HAPTIC_INFINITY,
        }
    }
}

impl From<u32> for Iterations {
    fn from(n: u32) -> Self {
        if n == HAPTIC_INFINITY {
            Iterations::Infinite
        } else {
            Iterations::Count(n)
        }
    }
}

/// Identifier of an effect uploaded to a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectId(pub(crate) i32);

impl EffectId {
    pub fn raw(self) -> i32 {
        self.0
    }
}

/// Playback state reported by `SDL_HapticGetEffectStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectStatus {
    Stopped,
    Playing,
}

/// Haptic device identification from enumeration.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub index: usize,
    pub name: String,
    pub opened: bool,
}

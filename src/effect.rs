//! Haptic effect encoding.
//!
//! [`HapticEffect`] is a byte-compatible mirror of SDL2's `SDL_HapticEffect`
//! union: one fixed-size block of storage whose first two bytes are the effect
//! type tag, readable as any of the six effect records. The views returned by
//! [`HapticEffect::constant_mut`] and friends point into that storage, so a
//! write through one view is visible through every other view and in
//! [`HapticEffect::as_bytes`].
//!
//! Every record spells its padding out as private zeroed fields. Combined with
//! zeroed construction this keeps every byte of the union initialized.
//!
//! [`Effect`] is the safe sum type over the same records; convert with
//! `From`/`TryFrom` when handing an effect to a [`Device`](crate::Device).

use crate::types::{ConditionKind, DirectionEncoding, EffectKind, EffectView, Waveform};
use crate::{HapticError, Result};
use static_assertions::const_assert_eq;
use std::fmt;
use std::marker::PhantomData;
use std::mem::{align_of, size_of};

/// Direction of a force.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HapticDirection {
    /// Raw [`DirectionEncoding`].
    pub encoding: u8,
    _pad: [u8; 3],
    /// Hundredths of a degree for polar/spherical, axis magnitudes for cartesian.
    pub components: [i32; 3],
}

impl HapticDirection {
    pub fn new(encoding: DirectionEncoding, components: [i32; 3]) -> Self {
        Self {
            encoding: encoding as u8,
            _pad: [0; 3],
            components,
        }
    }

    /// Polar direction in hundredths of a degree (0 = north, 9000 = east).
    pub fn polar(angle: i32) -> Self {
        Self::new(DirectionEncoding::Polar, [angle, 0, 0])
    }

    pub fn cartesian(x: i32, y: i32, z: i32) -> Self {
        Self::new(DirectionEncoding::Cartesian, [x, y, z])
    }

    /// Spherical direction: rotation from +x and elevation, both in hundredths of a degree.
    pub fn spherical(rotation: i32, elevation: i32) -> Self {
        Self::new(DirectionEncoding::Spherical, [rotation, elevation, 0])
    }

    pub fn encoding(&self) -> Option<DirectionEncoding> {
        DirectionEncoding::try_from(self.encoding).ok()
    }
}

/// Attack/fade shaping shared by the timed effects.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HapticEnvelope {
    pub attack_length: u16,
    pub attack_level: u16,
    pub fade_length: u16,
    pub fade_level: u16,
}

impl HapticEnvelope {
    /// Whether attack and fade both fit inside an effect of `length` ms.
    ///
    /// Recommended, not enforced: SDL accepts effects that fail this check.
    pub fn fits_within(&self, length: u32) -> bool {
        self.attack_length as u32 + self.fade_length as u32 <= length
    }
}

/// Constant force in one direction.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HapticConstant {
    pub type_: u16,
    _pad0: [u8; 2],
    pub direction: HapticDirection,
    pub length: u32,
    pub delay: u16,
    pub button: u16,
    pub interval: u16,
    pub level: i16,
    pub envelope: HapticEnvelope,
}

impl HapticConstant {
    pub fn new(direction: HapticDirection, length: u32, level: i16) -> Self {
        Self {
            type_: EffectKind::Constant.tag(),
            direction,
            length,
            level,
            ..Default::default()
        }
    }
}

/// Periodic wave; the waveform is selected by the tag.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HapticPeriodic {
    pub type_: u16,
    _pad0: [u8; 2],
    pub direction: HapticDirection,
    pub length: u32,
    pub delay: u16,
    pub button: u16,
    pub interval: u16,
    /// Period of the wave in ms.
    pub period: u16,
    /// Peak value. Negative means an extra 180 degree phase shift.
    pub magnitude: i16,
    /// Mean value of the wave.
    pub offset: i16,
    /// Phase shift in hundredths of a degree.
    pub phase: u16,
    pub envelope: HapticEnvelope,
    _pad1: [u8; 2],
}

impl HapticPeriodic {
    pub fn new(
        waveform: Waveform,
        direction: HapticDirection,
        length: u32,
        period: u16,
        magnitude: i16,
    ) -> Self {
        Self {
            type_: EffectKind::from(waveform).tag(),
            direction,
            length,
            period,
            magnitude,
            ..Default::default()
        }
    }
}

/// Spring, damper, inertia or friction, with up to three independent axes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HapticCondition {
    pub type_: u16,
    _pad0: [u8; 2],
    /// Not used by SDL at the moment.
    pub direction: HapticDirection,
    pub length: u32,
    pub delay: u16,
    pub button: u16,
    pub interval: u16,
    pub right_sat: [u16; 3],
    pub left_sat: [u16; 3],
    pub right_coeff: [i16; 3],
    pub left_coeff: [i16; 3],
    pub deadband: [u16; 3],
    pub center: [i16; 3],
    _pad1: [u8; 2],
}

impl HapticCondition {
    pub fn new(kind: ConditionKind, length: u32) -> Self {
        Self {
            type_: EffectKind::from(kind).tag(),
            length,
            ..Default::default()
        }
    }
}

/// Linear ramp between two strength levels over `length`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HapticRamp {
    pub type_: u16,
    _pad0: [u8; 2],
    pub direction: HapticDirection,
    pub length: u32,
    pub delay: u16,
    pub button: u16,
    pub interval: u16,
    pub start: i16,
    pub end: i16,
    pub envelope: HapticEnvelope,
    _pad1: [u8; 2],
}

impl HapticRamp {
    pub fn new(direction: HapticDirection, length: u32, start: i16, end: i16) -> Self {
        Self {
            type_: EffectKind::Ramp.tag(),
            direction,
            length,
            start,
            end,
            ..Default::default()
        }
    }
}

/// Direct control of the two rumble motors found on gamepads.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HapticLeftRight {
    pub type_: u16,
    _pad0: [u8; 2],
    pub length: u32,
    pub large_magnitude: u16,
    pub small_magnitude: u16,
}

impl HapticLeftRight {
    pub fn new(length: u32, large_magnitude: u16, small_magnitude: u16) -> Self {
        Self {
            type_: EffectKind::LeftRight.tag(),
            length,
            large_magnitude,
            small_magnitude,
            ..Default::default()
        }
    }
}

/// User-defined waveform read from a caller-owned sample buffer.
///
/// The effect only references the buffer: it must outlive the effect for as
/// long as it is registered with a device. [`HapticCustom::set_samples`] is
/// the only way to point the record at a buffer and ties that buffer to the
/// `'a` lifetime.
///
/// A record read back out of a [`HapticEffect`] may carry any bit pattern in
/// its pointer, so uploading custom effects goes through
/// [`Device::new_effect_raw`](crate::Device::new_effect_raw).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HapticCustom<'a> {
    pub type_: u16,
    _pad0: [u8; 2],
    pub direction: HapticDirection,
    pub length: u32,
    pub delay: u16,
    pub button: u16,
    pub interval: u16,
    channels: u8,
    _pad1: u8,
    /// Sample period in ms.
    pub period: u16,
    sample_count: u16,
    #[cfg(target_pointer_width = "64")]
    _pad2: [u8; 4],
    data: *const u16,
    pub envelope: HapticEnvelope,
    _samples: PhantomData<&'a [u16]>,
}

impl Default for HapticCustom<'_> {
    fn default() -> Self {
        Self {
            type_: 0,
            _pad0: [0; 2],
            direction: HapticDirection::default(),
            length: 0,
            delay: 0,
            button: 0,
            interval: 0,
            channels: 0,
            _pad1: 0,
            period: 0,
            sample_count: 0,
            #[cfg(target_pointer_width = "64")]
            _pad2: [0; 4],
            data: std::ptr::null(),
            envelope: HapticEnvelope::default(),
            _samples: PhantomData,
        }
    }
}

impl<'a> HapticCustom<'a> {
    pub fn new(
        direction: HapticDirection,
        length: u32,
        period: u16,
        channels: u8,
        samples: &'a [u16],
    ) -> Result<Self> {
        let mut custom = Self {
            type_: EffectKind::Custom.tag(),
            direction,
            length,
            period,
            ..Default::default()
        };
        custom.set_samples(channels, samples)?;
        Ok(custom)
    }

    /// Point the effect at `samples`, interleaved across `channels`.
    pub fn set_samples(&mut self, channels: u8, samples: &'a [u16]) -> Result<()> {
        if channels == 0 {
            return Err(HapticError::InvalidSamples(
                "at least one channel is required".into(),
            ));
        }
        if samples.len() % channels as usize != 0 {
            return Err(HapticError::InvalidSamples(format!(
                "{} samples do not split evenly into {} channels",
                samples.len(),
                channels
            )));
        }
        let per_channel = samples.len() / channels as usize;
        self.sample_count = u16::try_from(per_channel).map_err(|_| {
            HapticError::InvalidSamples(format!(
                "{} samples per channel exceeds {}",
                per_channel,
                u16::MAX
            ))
        })?;
        self.channels = channels;
        self.data = samples.as_ptr();
        Ok(())
    }

    /// Axes to use, at least 1 once samples are set.
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Samples per channel.
    pub fn sample_count(&self) -> u16 {
        self.sample_count
    }

    /// Address of the interleaved samples, `channels * sample_count` of them.
    pub fn data(&self) -> *const u16 {
        self.data
    }

    /// The referenced sample buffer.
    ///
    /// # Safety
    /// `data` must be null or point to at least `channels * sample_count`
    /// live samples. This holds when the record was filled through
    /// [`set_samples`](Self::set_samples) and its bytes were not rewritten
    /// since (through [`HapticEffect::from_bytes`], another view of the same
    /// union, or an unchecked view).
    pub unsafe fn samples(&self) -> &[u16] {
        if self.data.is_null() {
            return &[];
        }
        std::slice::from_raw_parts(
            self.data,
            self.channels as usize * self.sample_count as usize,
        )
    }
}

const fn max(a: usize, b: usize) -> usize {
    if a > b {
        a
    } else {
        b
    }
}

/// Size of the effect union: the largest record rounded up to the strictest
/// alignment (72 bytes on 64-bit targets).
pub const HAPTIC_EFFECT_SIZE: usize = {
    let largest = max(
        max(
            max(size_of::<HapticConstant>(), size_of::<HapticPeriodic>()),
            max(size_of::<HapticCondition>(), size_of::<HapticRamp>()),
        ),
        max(
            size_of::<HapticLeftRight>(),
            size_of::<HapticCustom<'static>>(),
        ),
    );
    let align = align_of::<HapticCustom<'static>>();
    (largest + align - 1) / align * align
};

/// Any haptic effect, laid out exactly like SDL2's `SDL_HapticEffect`.
///
/// The leading `u16` is the effect type and selects which record is live.
/// Checked views fail with [`HapticError::TypeMismatch`] when the tag belongs
/// to another record; the `*_unchecked` views skip that check.
#[repr(C)]
#[derive(Clone, Copy)]
pub union HapticEffect<'a> {
    type_: u16,
    constant: HapticConstant,
    periodic: HapticPeriodic,
    condition: HapticCondition,
    ramp: HapticRamp,
    left_right: HapticLeftRight,
    custom: HapticCustom<'a>,
    bytes: [u8; HAPTIC_EFFECT_SIZE],
}

const_assert_eq!(size_of::<HapticDirection>(), 16);
const_assert_eq!(size_of::<HapticEnvelope>(), 8);
const_assert_eq!(size_of::<HapticConstant>(), 40);
const_assert_eq!(size_of::<HapticPeriodic>(), 48);
const_assert_eq!(size_of::<HapticCondition>(), 68);
const_assert_eq!(size_of::<HapticRamp>(), 44);
const_assert_eq!(size_of::<HapticLeftRight>(), 12);
#[cfg(target_pointer_width = "64")]
const_assert_eq!(size_of::<HapticCustom<'static>>(), 56);
#[cfg(target_pointer_width = "32")]
const_assert_eq!(size_of::<HapticCustom<'static>>(), 48);
const_assert_eq!(size_of::<HapticEffect<'static>>(), HAPTIC_EFFECT_SIZE);

macro_rules! views {
    ($($view:ident, $field:ident: $ty:ty, $get:ident, $get_mut:ident, $unchecked:ident;)*) => {
        $(
            #[doc = concat!("The ", stringify!($field), " record, if the tag selects it.")]
            pub fn $get(&self) -> Result<&$ty> {
                self.expect(EffectView::$view)?;
                // SAFETY: all bytes are initialized and every bit pattern is a valid record.
                Ok(unsafe { &self.$field })
            }

            #[doc = concat!("Mutable ", stringify!($field), " record, if the tag selects it.")]
            pub fn $get_mut(&mut self) -> Result<&mut $ty> {
                self.expect(EffectView::$view)?;
                // SAFETY: as above.
                Ok(unsafe { &mut self.$field })
            }

            #[doc = concat!("The storage read as a ", stringify!($field), " record regardless of the tag.")]
            ///
            /// # Safety
            /// Fields of a record that does not match the tag hold whatever the
            /// previous variant left behind. Custom's `data` pointer in
            /// particular must not be dereferenced unless it was set deliberately.
            pub unsafe fn $unchecked(&mut self) -> &mut $ty {
                &mut self.$field
            }
        )*
    };
}

impl<'a> HapticEffect<'a> {
    /// All-zero effect. The tag is 0, which matches no effect kind.
    pub const fn zeroed() -> Self {
        HapticEffect {
            bytes: [0; HAPTIC_EFFECT_SIZE],
        }
    }

    /// Zeroed effect with the tag set to `kind`.
    pub fn new(kind: EffectKind) -> Self {
        let mut effect = Self::zeroed();
        effect.set_type(kind.tag());
        effect
    }

    /// Rebuild an effect from its raw bytes.
    pub fn from_bytes(bytes: [u8; HAPTIC_EFFECT_SIZE]) -> Self {
        HapticEffect { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; HAPTIC_EFFECT_SIZE] {
        // SAFETY: constructors start from zeroed bytes and no record has implicit padding.
        unsafe { &self.bytes }
    }

    /// The raw type tag.
    pub fn effect_type(&self) -> u16 {
        // SAFETY: the first two bytes are always initialized.
        unsafe { self.type_ }
    }

    /// Overwrite the type tag. All other bytes are left as they were, so the
    /// fields of the new variant must be filled in afterwards.
    pub fn set_type(&mut self, tag: u16) {
        self.type_ = tag;
    }

    pub fn kind(&self) -> Option<EffectKind> {
        EffectKind::try_from(self.effect_type()).ok()
    }

    fn expect(&self, requested: EffectView) -> Result<()> {
        let tag = self.effect_type();
        match EffectKind::try_from(tag) {
            Ok(kind) if kind.view() == requested => Ok(()),
            _ => Err(HapticError::TypeMismatch { requested, tag }),
        }
    }

    views! {
        Constant, constant: HapticConstant, constant, constant_mut, constant_unchecked;
        Periodic, periodic: HapticPeriodic, periodic, periodic_mut, periodic_unchecked;
        Condition, condition: HapticCondition, condition, condition_mut, condition_unchecked;
        Ramp, ramp: HapticRamp, ramp, ramp_mut, ramp_unchecked;
        LeftRight, left_right: HapticLeftRight, left_right, left_right_mut, left_right_unchecked;
        Custom, custom: HapticCustom<'a>, custom, custom_mut, custom_unchecked;
    }

    /// Envelope of the live record and the length it should fit into.
    /// `None` for condition and left/right effects, which have no envelope.
    pub fn envelope(&self) -> Option<(&HapticEnvelope, u32)> {
        let kind = self.kind()?;
        // SAFETY: the tag selects the record being read.
        unsafe {
            match kind.view() {
                EffectView::Constant => Some((&self.constant.envelope, self.constant.length)),
                EffectView::Periodic => Some((&self.periodic.envelope, self.periodic.length)),
                EffectView::Ramp => Some((&self.ramp.envelope, self.ramp.length)),
                EffectView::Custom => Some((&self.custom.envelope, self.custom.length)),
                EffectView::Condition | EffectView::LeftRight => None,
            }
        }
    }
}

impl Default for HapticEffect<'_> {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Effects with a known tag compare by their live record, so bytes past the
/// record left over from an earlier variant do not count. Unknown tags fall
/// back to comparing every byte.
impl PartialEq for HapticEffect<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (Effect::try_from(self), Effect::try_from(other)) {
            (Ok(a), Ok(b)) => a == b,
            _ => self.as_bytes() == other.as_bytes(),
        }
    }
}

impl Eq for HapticEffect<'_> {}

impl fmt::Debug for HapticEffect<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Effect::try_from(self) {
            Ok(effect) => fmt::Debug::fmt(&effect, f),
            Err(_) => f
                .debug_struct("HapticEffect")
                .field("type_", &self.effect_type())
                .finish_non_exhaustive(),
        }
    }
}

/// A haptic effect as a sum type. The tag lives in each record's `type_`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect<'a> {
    Constant(HapticConstant),
    Periodic(HapticPeriodic),
    Condition(HapticCondition),
    Ramp(HapticRamp),
    LeftRight(HapticLeftRight),
    Custom(HapticCustom<'a>),
}

impl Effect<'_> {
    pub fn effect_type(&self) -> u16 {
        match self {
            Effect::Constant(e) => e.type_,
            Effect::Periodic(e) => e.type_,
            Effect::Condition(e) => e.type_,
            Effect::Ramp(e) => e.type_,
            Effect::LeftRight(e) => e.type_,
            Effect::Custom(e) => e.type_,
        }
    }

    pub fn kind(&self) -> Option<EffectKind> {
        EffectKind::try_from(self.effect_type()).ok()
    }
}

impl<'a> From<Effect<'a>> for HapticEffect<'a> {
    fn from(effect: Effect<'a>) -> Self {
        let mut raw = HapticEffect::zeroed();
        match effect {
            Effect::Constant(e) => raw.constant = e,
            Effect::Periodic(e) => raw.periodic = e,
            Effect::Condition(e) => raw.condition = e,
            Effect::Ramp(e) => raw.ramp = e,
            Effect::LeftRight(e) => raw.left_right = e,
            Effect::Custom(e) => raw.custom = e,
        }
        raw
    }
}

impl<'a> TryFrom<&HapticEffect<'a>> for Effect<'a> {
    type Error = HapticError;

    fn try_from(raw: &HapticEffect<'a>) -> Result<Self> {
        let kind = EffectKind::try_from(raw.effect_type())?;
        Ok(match kind.view() {
            EffectView::Constant => Effect::Constant(*raw.constant()?),
            EffectView::Periodic => Effect::Periodic(*raw.periodic()?),
            EffectView::Condition => Effect::Condition(*raw.condition()?),
            EffectView::Ramp => Effect::Ramp(*raw.ramp()?),
            EffectView::LeftRight => Effect::LeftRight(*raw.left_right()?),
            EffectView::Custom => Effect::Custom(*raw.custom()?),
        })
    }
}

impl From<HapticConstant> for HapticEffect<'_> {
    fn from(e: HapticConstant) -> Self {
        Effect::Constant(e).into()
    }
}

impl From<HapticPeriodic> for HapticEffect<'_> {
    fn from(e: HapticPeriodic) -> Self {
        Effect::Periodic(e).into()
    }
}

impl From<HapticCondition> for HapticEffect<'_> {
    fn from(e: HapticCondition) -> Self {
        Effect::Condition(e).into()
    }
}

impl From<HapticRamp> for HapticEffect<'_> {
    fn from(e: HapticRamp) -> Self {
        Effect::Ramp(e).into()
    }
}

impl From<HapticLeftRight> for HapticEffect<'_> {
    fn from(e: HapticLeftRight) -> Self {
        Effect::LeftRight(e).into()
    }
}

impl<'a> From<HapticCustom<'a>> for HapticEffect<'a> {
    fn from(e: HapticCustom<'a>) -> Self {
        Effect::Custom(e).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of_val};

    fn sample_effects(samples: &[u16]) -> Vec<HapticEffect<'_>> {
        vec![
            HapticEffect::zeroed(),
            HapticConstant::new(HapticDirection::polar(9000), 250, -300).into(),
            HapticPeriodic::new(Waveform::Sine, HapticDirection::polar(0), 500, 40, 12000).into(),
            HapticCondition::new(ConditionKind::Spring, 1000).into(),
            HapticRamp::new(HapticDirection::cartesian(0, 1, 0), 800, -100, 100).into(),
            HapticLeftRight::new(300, 0xFFFF, 0x4000).into(),
            HapticCustom::new(HapticDirection::polar(0), 600, 5, 2, samples)
                .unwrap()
                .into(),
        ]
    }

    #[test]
    fn test_layout_matches_sdl() {
        assert_eq!(offset_of!(HapticDirection, components), 4);

        assert_eq!(offset_of!(HapticConstant, direction), 4);
        assert_eq!(offset_of!(HapticConstant, length), 20);
        assert_eq!(offset_of!(HapticConstant, interval), 28);
        assert_eq!(offset_of!(HapticConstant, level), 30);
        assert_eq!(offset_of!(HapticConstant, envelope), 32);

        assert_eq!(offset_of!(HapticPeriodic, period), 30);
        assert_eq!(offset_of!(HapticPeriodic, magnitude), 32);
        assert_eq!(offset_of!(HapticPeriodic, phase), 36);
        assert_eq!(offset_of!(HapticPeriodic, envelope), 38);

        assert_eq!(offset_of!(HapticCondition, right_sat), 30);
        assert_eq!(offset_of!(HapticCondition, left_coeff), 48);
        assert_eq!(offset_of!(HapticCondition, center), 60);

        assert_eq!(offset_of!(HapticRamp, start), 30);
        assert_eq!(offset_of!(HapticRamp, envelope), 34);

        assert_eq!(offset_of!(HapticLeftRight, length), 4);
        assert_eq!(offset_of!(HapticLeftRight, small_magnitude), 10);

        assert_eq!(offset_of!(HapticCustom<'static>, channels), 30);
        assert_eq!(offset_of!(HapticCustom<'static>, sample_count), 34);
        #[cfg(target_pointer_width = "64")]
        {
            assert_eq!(offset_of!(HapticCustom<'static>, data), 40);
            assert_eq!(offset_of!(HapticCustom<'static>, envelope), 48);
            assert_eq!(HAPTIC_EFFECT_SIZE, 72);
        }
    }

    #[test]
    fn test_footprint_is_independent_of_variant() {
        let samples = [0u16; 4];
        for effect in sample_effects(&samples) {
            assert_eq!(effect.as_bytes().len(), HAPTIC_EFFECT_SIZE);
            assert_eq!(size_of_val(&effect), HAPTIC_EFFECT_SIZE);
        }
    }

    #[test]
    fn test_constant_survives_serialization() {
        let mut constant = HapticConstant::new(HapticDirection::cartesian(1, 0, 0), 1000, 200);
        constant.envelope.attack_length = 100;
        constant.envelope.fade_level = 7;
        let effect = HapticEffect::from(constant);

        let bytes = *effect.as_bytes();
        let decoded = HapticEffect::from_bytes(bytes);

        assert_eq!(decoded.effect_type(), EffectKind::Constant.tag());
        let c = decoded.constant().unwrap();
        assert_eq!(c.direction.encoding(), Some(DirectionEncoding::Cartesian));
        assert_eq!(c.direction.components, [1, 0, 0]);
        assert_eq!(c.length, 1000);
        assert_eq!(c.level, 200);
        assert_eq!(c.envelope.attack_length, 100);
        assert_eq!(c.envelope.fade_level, 7);
        assert_eq!(*c, constant);
    }

    #[test]
    fn test_write_then_read_through_same_view() {
        let mut effect = HapticEffect::new(EffectKind::Damper);
        {
            let c = effect.condition_mut().unwrap();
            c.length = 5000;
            c.delay = 10;
            c.button = 2;
            c.interval = 300;
            c.right_sat = [0xFFFF, 0x8000, 1];
            c.left_sat = [0x1234, 0, 0xFFFF];
            c.right_coeff = [i16::MAX, -1, 0];
            c.left_coeff = [i16::MIN, 1, 2];
            c.deadband = [100, 200, 300];
            c.center = [-5, 0, 5];
        }
        let c = effect.condition().unwrap();
        assert_eq!(c.type_, EffectKind::Damper.tag());
        assert_eq!((c.length, c.delay, c.button, c.interval), (5000, 10, 2, 300));
        assert_eq!(c.right_sat, [0xFFFF, 0x8000, 1]);
        assert_eq!(c.left_sat, [0x1234, 0, 0xFFFF]);
        assert_eq!(c.right_coeff, [i16::MAX, -1, 0]);
        assert_eq!(c.left_coeff, [i16::MIN, 1, 2]);
        assert_eq!(c.deadband, [100, 200, 300]);
        assert_eq!(c.center, [-5, 0, 5]);
    }

    #[test]
    fn test_set_type_only_touches_tag() {
        let mut effect = HapticEffect::from(HapticRamp::new(
            HapticDirection::spherical(4500, 1000),
            2000,
            -32768,
            32767,
        ));
        let before = *effect.as_bytes();

        effect.set_type(0xBEEF);

        assert_eq!(effect.effect_type(), 0xBEEF);
        assert_eq!(&effect.as_bytes()[..2], &0xBEEFu16.to_ne_bytes());
        assert_eq!(&effect.as_bytes()[2..], &before[2..]);
        assert_eq!(effect.kind(), None);
    }

    #[test]
    fn test_views_alias_the_same_bytes() {
        let mut effect = HapticEffect::new(EffectKind::Constant);
        effect.constant_mut().unwrap().level = -1234;
        assert_eq!(&effect.as_bytes()[30..32], &(-1234i16).to_ne_bytes());

        effect.set_type(EffectKind::Spring.tag());
        effect.condition_mut().unwrap().center[2] = 77;
        assert_eq!(&effect.as_bytes()[64..66], &77i16.to_ne_bytes());

        // right_sat[0] and level share offset 30
        effect.condition_mut().unwrap().right_sat[0] = 0xFFFE;
        effect.set_type(EffectKind::Constant.tag());
        assert_eq!(effect.constant().unwrap().level, -2);

        // both rumble magnitudes overlap the direction's first component
        effect.set_type(EffectKind::LeftRight.tag());
        {
            let lr = effect.left_right_mut().unwrap();
            lr.large_magnitude = 0x1111;
            lr.small_magnitude = 0x2222;
        }
        effect.set_type(EffectKind::Ramp.tag());
        let mut expected = [0u8; 4];
        expected[..2].copy_from_slice(&0x1111u16.to_ne_bytes());
        expected[2..].copy_from_slice(&0x2222u16.to_ne_bytes());
        assert_eq!(
            effect.ramp().unwrap().direction.components[0],
            i32::from_ne_bytes(expected)
        );
    }

    #[test]
    fn test_mismatched_view_is_rejected() {
        let mut effect = HapticEffect::from(HapticConstant::new(HapticDirection::polar(0), 10, 1));
        assert!(matches!(
            effect.ramp(),
            Err(HapticError::TypeMismatch {
                requested: EffectView::Ramp,
                tag: 0x0001
            })
        ));
        assert!(effect.periodic_mut().is_err());
        assert!(HapticEffect::zeroed().constant().is_err());

        // the escape hatch still hands out the aliased view
        let ramp = unsafe { effect.ramp_unchecked() };
        assert_eq!(ramp.length, 10);
        assert_eq!(ramp.start, 1);
    }

    #[test]
    fn test_periodic_views_accept_every_waveform() {
        for waveform in [
            Waveform::Sine,
            Waveform::Triangle,
            Waveform::SawtoothUp,
            Waveform::SawtoothDown,
        ] {
            let effect =
                HapticEffect::from(HapticPeriodic::new(waveform, HapticDirection::polar(0), 1, 2, 3));
            assert_eq!(effect.periodic().unwrap().period, 2);
            assert_eq!(effect.kind(), Some(EffectKind::from(waveform)));
        }
    }

    #[test]
    fn test_negative_magnitude_is_kept_raw() {
        let mut negative =
            HapticPeriodic::new(Waveform::Sine, HapticDirection::polar(0), 1000, 100, -8000);
        negative.phase = 4500;
        let mut shifted = negative;
        shifted.magnitude = 8000;
        shifted.phase = 4500 + 18000;

        let a = HapticEffect::from(negative);
        let b = HapticEffect::from(shifted);

        assert_ne!(a, b);
        let p = a.periodic().unwrap();
        assert_eq!((p.magnitude, p.phase), (-8000, 4500));
        let p = b.periodic().unwrap();
        assert_eq!((p.magnitude, p.phase), (8000, 22500));
    }

    #[test]
    fn test_custom_stores_buffer_reference() {
        let samples = [10u16, 20, 30, 40, 50, 60];
        let custom = HapticCustom::new(HapticDirection::polar(0), 600, 5, 3, &samples).unwrap();
        assert_eq!(custom.data(), samples.as_ptr());
        assert_eq!((custom.channels(), custom.sample_count()), (3, 2));

        let effect = HapticEffect::from(custom);
        let stored = effect.custom().unwrap();
        assert_eq!(stored.data(), samples.as_ptr());
        assert_eq!(unsafe { stored.samples() }, &samples);
    }

    #[test]
    fn test_custom_sees_buffer_mutation() {
        let mut buffer = vec![0u16; 6];
        let ptr = buffer.as_mut_ptr();
        let mut effect = HapticEffect::new(EffectKind::Custom);
        {
            let custom = effect.custom_mut().unwrap();
            custom.channels = 2;
            custom.sample_count = 3;
            custom.data = ptr;
        }

        unsafe { ptr.add(4).write(0x7FFF) };

        let seen = unsafe { effect.custom().unwrap().samples() };
        assert_eq!(seen, &[0u16, 0, 0, 0, 0x7FFF, 0]);
        drop(buffer);
    }

    #[test]
    fn test_custom_rejects_bad_sample_shapes() {
        let samples = [0u16; 5];
        let mut custom = HapticCustom::default();
        assert!(matches!(
            custom.set_samples(0, &samples),
            Err(HapticError::InvalidSamples(_))
        ));
        assert!(custom.set_samples(2, &samples).is_err());
        assert!(custom.data().is_null());
        assert_eq!(unsafe { custom.samples() }, &[] as &[u16]);

        let big = vec![0u16; u16::MAX as usize + 1];
        assert!(custom.set_samples(1, &big).is_err());
        custom.set_samples(5, &samples).unwrap();
        assert_eq!(custom.sample_count(), 1);
    }

    #[test]
    fn test_equality_ignores_bytes_past_live_record() {
        let constant = HapticConstant::new(HapticDirection::polar(9000), 1000, 200);
        let mut reused = HapticEffect::from(constant);
        reused.set_type(EffectKind::Spring.tag());
        reused.condition_mut().unwrap().center = [1, 2, 3];
        reused.set_type(EffectKind::Constant.tag());

        assert_ne!(reused.as_bytes(), HapticEffect::from(constant).as_bytes());
        assert_eq!(reused, HapticEffect::from(constant));
        assert_eq!(HapticEffect::from(Effect::try_from(&reused).unwrap()), reused);

        // unknown tags still compare byte for byte
        let mut a = HapticEffect::zeroed();
        let mut b = HapticEffect::zeroed();
        a.set_type(0xBEEF);
        b.set_type(0xBEEF);
        assert_eq!(a, b);
        b.set_type(0xBEEE);
        assert_ne!(a, b);
    }

    #[test]
    fn test_sum_type_round_trip() {
        let samples = [1u16, 2, 3, 4];
        for raw in sample_effects(&samples).into_iter().skip(1) {
            let effect = Effect::try_from(&raw).unwrap();
            assert_eq!(effect.effect_type(), raw.effect_type());
            assert_eq!(HapticEffect::from(effect), raw);
        }
        assert!(matches!(
            Effect::try_from(&HapticEffect::zeroed()),
            Err(HapticError::UnknownEffectType(0))
        ));
    }

    #[test]
    fn test_envelope_lookup() {
        let mut ramp = HapticRamp::new(HapticDirection::polar(0), 1000, 0, 100);
        ramp.envelope.attack_length = 600;
        ramp.envelope.fade_length = 500;
        let effect = HapticEffect::from(ramp);
        let (envelope, length) = effect.envelope().unwrap();
        assert_eq!(length, 1000);
        assert!(!envelope.fits_within(length));
        assert!(envelope.fits_within(crate::HAPTIC_INFINITY));

        let condition = HapticEffect::from(HapticCondition::new(ConditionKind::Friction, 1000));
        assert!(condition.envelope().is_none());
        assert!(HapticEffect::zeroed().envelope().is_none());
    }

    #[test]
    fn test_debug_shows_live_record() {
        let effect = HapticEffect::from(HapticLeftRight::new(300, 1, 2));
        let text = format!("{:?}", effect);
        assert!(text.starts_with("LeftRight(HapticLeftRight"));
        assert!(format!("{:?}", HapticEffect::zeroed()).contains("type_: 0"));
    }
}

use crate::effect::HapticEffect;
use crate::ffi::{self, RawEffect, RawHaptic, RawJoystick, Sdl};
use crate::types::{DeviceInfo, EffectId, EffectKind, EffectStatus, HapticFeatures, Iterations};
use crate::{HapticError, Result};
use std::ffi::c_int;
use std::ptr::NonNull;

/// Number of haptic devices attached to the system.
pub fn num_haptics() -> Result<usize> {
    let sdl = ffi::sdl()?;
    // SAFETY: no arguments.
    let n = sdl.check("SDL_NumHaptics", unsafe { (sdl.num_haptics)() })?;
    Ok(n as usize)
}

/// Implementation-dependent name of the haptic device at `index`.
pub fn haptic_name(index: usize) -> Result<String> {
    let sdl = ffi::sdl()?;
    // SAFETY: SDL validates the index and returns null when it is out of range.
    let ptr = unsafe { (sdl.haptic_name)(to_c_index(index)) };
    if ptr.is_null() {
        return Err(HapticError::Null {
            op: "SDL_HapticName",
            message: sdl.last_error(),
        });
    }
    // SAFETY: non-null names are NUL-terminated strings owned by SDL.
    Ok(unsafe { ffi::c_str_to_string(ptr) })
}

/// Whether the device at `index` has already been opened.
pub fn haptic_opened(index: usize) -> Result<bool> {
    let sdl = ffi::sdl()?;
    // SAFETY: SDL validates the index.
    sdl.check_bool("SDL_HapticOpened", unsafe {
        (sdl.haptic_opened)(to_c_index(index))
    })
}

/// Whether the current mouse has haptic capabilities.
pub fn mouse_is_haptic() -> Result<bool> {
    let sdl = ffi::sdl()?;
    // SAFETY: no arguments.
    sdl.check_bool("SDL_MouseIsHaptic", unsafe { (sdl.mouse_is_haptic)() })
}

/// Whether a joystick has haptic features.
pub fn joystick_is_haptic(joystick: &Joystick) -> Result<bool> {
    let sdl = ffi::sdl()?;
    // SAFETY: `Joystick` only wraps handles the caller vouched for.
    sdl.check_bool("SDL_JoystickIsHaptic", unsafe {
        (sdl.joystick_is_haptic)(joystick.0.as_ptr())
    })
}

/// List all haptic devices with their names.
///
/// Devices whose name or open state cannot be read are skipped with a warning.
pub fn list_devices() -> Result<Vec<DeviceInfo>> {
    Ok(collect_devices(num_haptics()?, |index| {
        Ok((haptic_name(index)?, haptic_opened(index)?))
    }))
}

fn collect_devices(
    count: usize,
    mut query: impl FnMut(usize) -> Result<(String, bool)>,
) -> Vec<DeviceInfo> {
    let mut devices = Vec::new();

    for index in 0..count {
        match query(index) {
            Ok((name, opened)) => devices.push(DeviceInfo {
                index,
                name,
                opened,
            }),
            Err(e) => {
                log::warn!("Failed to query haptic device {}: {}", index, e);
            }
        }
    }

    devices
}

fn to_c_index(index: usize) -> c_int {
    c_int::try_from(index).unwrap_or(c_int::MAX)
}

/// Borrowed `SDL_Joystick` handle, owned by the host's joystick code.
#[derive(Debug, Clone, Copy)]
pub struct Joystick(NonNull<RawJoystick>);

impl Joystick {
    /// Wrap a raw `SDL_Joystick*`. Returns `None` for null.
    ///
    /// # Safety
    /// `ptr` must be an open joystick from the same SDL2 library instance
    /// and stay open while this value is used.
    pub unsafe fn from_raw(ptr: *mut RawJoystick) -> Option<Joystick> {
        NonNull::new(ptr).map(Joystick)
    }
}

/// An opened haptic device. Closed on drop.
///
/// Calls that change device state take `&mut self`; share a `Device` between
/// threads behind a `Mutex`.
pub struct Device {
    sdl: &'static Sdl,
    raw: NonNull<RawHaptic>,
}

// SAFETY: SDL haptic handles may be used from any thread, one caller at a time;
// `Device` is not `Sync`, so that is all safe code can do.
unsafe impl Send for Device {}

impl Device {
    /// Open the haptic device at `index`.
    pub fn open(index: usize) -> Result<Device> {
        let sdl = ffi::sdl()?;
        // SAFETY: SDL validates the index.
        let raw = unsafe { (sdl.haptic_open)(to_c_index(index)) };
        Self::from_opened(sdl, raw, "SDL_HapticOpen")
    }

    /// Open the haptic device behind the current mouse.
    pub fn open_from_mouse() -> Result<Device> {
        let sdl = ffi::sdl()?;
        // SAFETY: no arguments.
        let raw = unsafe { (sdl.haptic_open_from_mouse)() };
        Self::from_opened(sdl, raw, "SDL_HapticOpenFromMouse")
    }

    /// Open the haptic side of a joystick.
    pub fn open_from_joystick(joystick: &Joystick) -> Result<Device> {
        let sdl = ffi::sdl()?;
        // SAFETY: `Joystick` only wraps handles the caller vouched for.
        let raw = unsafe { (sdl.haptic_open_from_joystick)(joystick.0.as_ptr()) };
        Self::from_opened(sdl, raw, "SDL_HapticOpenFromJoystick")
    }

    fn from_opened(sdl: &'static Sdl, raw: *mut RawHaptic, op: &'static str) -> Result<Device> {
        let raw = NonNull::new(raw).ok_or_else(|| HapticError::Null {
            op,
            message: sdl.last_error(),
        })?;
        let device = Device { sdl, raw };

        log::info!(
            "Opened haptic device: index={:?} axes={:?} effects={:?} features={:?}",
            device.index().ok(),
            device.num_axes().ok(),
            device.num_effects().ok(),
            device.query().ok()
        );

        Ok(device)
    }

    fn ptr(&self) -> *mut RawHaptic {
        self.raw.as_ptr()
    }

    fn effect_ptr(effect: &HapticEffect<'_>) -> *mut RawEffect {
        // SDL2 takes a mutable pointer but only reads the effect.
        (effect as *const HapticEffect<'_>).cast::<RawEffect>().cast_mut()
    }

    /// Close the device. Equivalent to dropping it.
    pub fn close(self) {
        drop(self);
    }

    /// Index of the device in the enumeration order.
    pub fn index(&self) -> Result<usize> {
        // SAFETY: `raw` is an open handle for as long as `self` lives.
        let index = self
            .sdl
            .check("SDL_HapticIndex", unsafe { (self.sdl.haptic_index)(self.ptr()) })?;
        Ok(index as usize)
    }

    /// Supported effect kinds and device features.
    pub fn query(&self) -> Result<HapticFeatures> {
        // SAFETY: open handle.
        let bits = unsafe { (self.sdl.haptic_query)(self.ptr()) };
        if bits == 0 {
            return Err(HapticError::Sdl {
                op: "SDL_HapticQuery",
                code: 0,
                message: self.sdl.last_error(),
            });
        }
        Ok(HapticFeatures::from_bits_truncate(bits))
    }

    pub fn num_axes(&self) -> Result<usize> {
        // SAFETY: open handle.
        let n = self
            .sdl
            .check("SDL_HapticNumAxes", unsafe { (self.sdl.haptic_num_axes)(self.ptr()) })?;
        Ok(n as usize)
    }

    /// Number of effects the device can store.
    pub fn num_effects(&self) -> Result<usize> {
        // SAFETY: open handle.
        let n = self.sdl.check("SDL_HapticNumEffects", unsafe {
            (self.sdl.haptic_num_effects)(self.ptr())
        })?;
        Ok(n as usize)
    }

    /// Number of effects the device can play at the same time.
    pub fn num_effects_playing(&self) -> Result<usize> {
        // SAFETY: open handle.
        let n = self.sdl.check("SDL_HapticNumEffectsPlaying", unsafe {
            (self.sdl.haptic_num_effects_playing)(self.ptr())
        })?;
        Ok(n as usize)
    }

    pub fn effect_supported(&self, effect: &HapticEffect<'_>) -> Result<bool> {
        // SAFETY: open handle; SDL only reads the effect.
        self.sdl.check_bool("SDL_HapticEffectSupported", unsafe {
            (self.sdl.haptic_effect_supported)(self.ptr(), Self::effect_ptr(effect))
        })
    }

    /// Upload an effect and return its identifier.
    ///
    /// Custom effects are refused with [`HapticError::UnverifiedSamples`]:
    /// nothing guarantees that a union's sample pointer came from
    /// [`HapticCustom::set_samples`](crate::HapticCustom::set_samples). Use
    /// [`new_effect_raw`](Self::new_effect_raw) for those.
    pub fn new_effect(&mut self, effect: &HapticEffect<'_>) -> Result<EffectId> {
        reject_custom("SDL_HapticNewEffect", effect)?;
        // SAFETY: not a custom effect, so SDL reads nothing outside the union.
        unsafe { self.new_effect_raw(effect) }
    }

    /// Upload any effect, including custom ones.
    ///
    /// # Safety
    /// For a custom effect, `data` must point to `channels * sample_count`
    /// samples that stay alive until the effect is destroyed or the device is
    /// closed. Filling the record through
    /// [`HapticCustom::set_samples`](crate::HapticCustom::set_samples) and
    /// keeping that buffer alive satisfies this.
    pub unsafe fn new_effect_raw(&mut self, effect: &HapticEffect<'_>) -> Result<EffectId> {
        warn_envelope(effect);
        // SAFETY: open handle; SDL only reads the effect and the caller
        // vouches for the sample buffer.
        let id = self.sdl.check("SDL_HapticNewEffect", unsafe {
            (self.sdl.haptic_new_effect)(self.ptr(), Self::effect_ptr(effect))
        })?;
        log::debug!("Uploaded effect {} as {:?}", id, effect.kind());
        Ok(EffectId(id))
    }

    /// Replace the parameters of an uploaded effect. The effect type cannot change.
    ///
    /// Custom effects are refused as in [`new_effect`](Self::new_effect).
    pub fn update_effect(&mut self, id: EffectId, effect: &HapticEffect<'_>) -> Result<()> {
        reject_custom("SDL_HapticUpdateEffect", effect)?;
        // SAFETY: not a custom effect.
        unsafe { self.update_effect_raw(id, effect) }
    }

    /// [`update_effect`](Self::update_effect) for any effect, including custom ones.
    ///
    /// # Safety
    /// Same contract as [`new_effect_raw`](Self::new_effect_raw).
    pub unsafe fn update_effect_raw(
        &mut self,
        id: EffectId,
        effect: &HapticEffect<'_>,
    ) -> Result<()> {
        warn_envelope(effect);
        // SAFETY: open handle; the caller vouches for the sample buffer.
        self.sdl.check("SDL_HapticUpdateEffect", unsafe {
            (self.sdl.haptic_update_effect)(self.ptr(), id.0, Self::effect_ptr(effect))
        })?;
        log::debug!("Updated effect {}", id.0);
        Ok(())
    }

    pub fn run_effect(&mut self, id: EffectId, iterations: Iterations) -> Result<()> {
        // SAFETY: open handle; SDL validates the effect id.
        self.sdl.check("SDL_HapticRunEffect", unsafe {
            (self.sdl.haptic_run_effect)(self.ptr(), id.0, iterations.raw())
        })?;
        log::debug!("Running effect {} ({:?})", id.0, iterations);
        Ok(())
    }

    pub fn stop_effect(&mut self, id: EffectId) -> Result<()> {
        // SAFETY: open handle; SDL validates the effect id.
        self.sdl.check("SDL_HapticStopEffect", unsafe {
            (self.sdl.haptic_stop_effect)(self.ptr(), id.0)
        })?;
        Ok(())
    }

    /// Remove an effect from the device. SDL reports nothing back.
    pub fn destroy_effect(&mut self, id: EffectId) {
        // SAFETY: open handle; SDL validates the effect id.
        unsafe { (self.sdl.haptic_destroy_effect)(self.ptr(), id.0) };
        log::debug!("Destroyed effect {}", id.0);
    }

    /// Needs [`HapticFeatures::STATUS`].
    pub fn effect_status(&self, id: EffectId) -> Result<EffectStatus> {
        // SAFETY: open handle; SDL validates the effect id.
        let playing = self.sdl.check_bool("SDL_HapticGetEffectStatus", unsafe {
            (self.sdl.haptic_get_effect_status)(self.ptr(), id.0)
        })?;
        Ok(if playing {
            EffectStatus::Playing
        } else {
            EffectStatus::Stopped
        })
    }

    /// Global gain, 0 to 100. Needs [`HapticFeatures::GAIN`].
    pub fn set_gain(&mut self, gain: i32) -> Result<()> {
        // SAFETY: open handle; SDL range-checks the gain.
        self.sdl.check("SDL_HapticSetGain", unsafe {
            (self.sdl.haptic_set_gain)(self.ptr(), gain)
        })?;
        Ok(())
    }

    /// Autocenter strength, 0 (off) to 100. Needs [`HapticFeatures::AUTOCENTER`].
    pub fn set_autocenter(&mut self, autocenter: i32) -> Result<()> {
        // SAFETY: open handle; SDL range-checks the value.
        self.sdl.check("SDL_HapticSetAutocenter", unsafe {
            (self.sdl.haptic_set_autocenter)(self.ptr(), autocenter)
        })?;
        Ok(())
    }

    /// Needs [`HapticFeatures::PAUSE`].
    pub fn pause(&mut self) -> Result<()> {
        // SAFETY: open handle.
        self.sdl
            .check("SDL_HapticPause", unsafe { (self.sdl.haptic_pause)(self.ptr()) })?;
        Ok(())
    }

    pub fn unpause(&mut self) -> Result<()> {
        // SAFETY: open handle.
        self.sdl
            .check("SDL_HapticUnpause", unsafe { (self.sdl.haptic_unpause)(self.ptr()) })?;
        Ok(())
    }

    pub fn stop_all(&mut self) -> Result<()> {
        // SAFETY: open handle.
        self.sdl
            .check("SDL_HapticStopAll", unsafe { (self.sdl.haptic_stop_all)(self.ptr()) })?;
        Ok(())
    }

    pub fn rumble_supported(&self) -> Result<bool> {
        // SAFETY: open handle.
        self.sdl.check_bool("SDL_HapticRumbleSupported", unsafe {
            (self.sdl.haptic_rumble_supported)(self.ptr())
        })
    }

    /// Prepare the device for [`rumble_play`](Self::rumble_play).
    pub fn rumble_init(&mut self) -> Result<()> {
        // SAFETY: open handle.
        self.sdl.check("SDL_HapticRumbleInit", unsafe {
            (self.sdl.haptic_rumble_init)(self.ptr())
        })?;
        Ok(())
    }

    /// Rumble at `strength` (0.0 to 1.0) for `length` ms.
    pub fn rumble_play(&mut self, strength: f32, length: u32) -> Result<()> {
        // SAFETY: open handle; SDL clamps the strength.
        self.sdl.check("SDL_HapticRumblePlay", unsafe {
            (self.sdl.haptic_rumble_play)(self.ptr(), strength, length)
        })?;
        Ok(())
    }

    pub fn rumble_stop(&mut self) -> Result<()> {
        // SAFETY: open handle.
        self.sdl.check("SDL_HapticRumbleStop", unsafe {
            (self.sdl.haptic_rumble_stop)(self.ptr())
        })?;
        Ok(())
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        // SAFETY: the handle is open and never used again.
        unsafe { (self.sdl.haptic_close)(self.ptr()) };
        log::info!("Closed haptic device");
    }
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device").field("raw", &self.raw).finish()
    }
}

fn reject_custom(op: &'static str, effect: &HapticEffect<'_>) -> Result<()> {
    if effect.kind() == Some(EffectKind::Custom) {
        return Err(HapticError::UnverifiedSamples { op });
    }
    Ok(())
}

fn warn_envelope(effect: &HapticEffect<'_>) {
    if let Some((envelope, length)) = effect.envelope() {
        if !envelope.fits_within(length) {
            log::warn!(
                "Effect {:?}: attack {} ms + fade {} ms exceed length {} ms",
                effect.kind(),
                envelope.attack_length,
                envelope.fade_length,
                length
            );
        }
    }
}

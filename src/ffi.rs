//! Raw SDL2 haptic entry points.
//!
//! SDL2 is loaded at runtime with `libloading` instead of being linked, so the
//! crate builds and tests on machines without SDL2 installed. The library is
//! looked up once per process and every function pointer is resolved up
//! front; a missing symbol fails the whole load.
//!
//! Initializing SDL (`SDL_Init(SDL_INIT_HAPTIC)`) is the host's job. Loading
//! the same path through [`library_candidates`] yields the same library
//! instance the host already has.

use crate::effect::HapticEffect;
use crate::{HapticError, Result};
use libloading::Library;
use std::ffi::{c_char, c_float, c_int, c_uint, CStr};
use std::sync::OnceLock;

/// Environment variable that overrides the SDL2 library path.
pub const LIBRARY_ENV: &str = "SDL_HAPTIC_LIBRARY";

/// Opaque `SDL_Haptic`.
#[repr(C)]
pub(crate) struct RawHaptic {
    _private: [u8; 0],
}

/// Opaque `SDL_Joystick`.
#[repr(C)]
pub struct RawJoystick {
    _private: [u8; 0],
}

/// `SDL_HapticEffect` as seen by SDL; the lifetime only matters on our side.
pub(crate) type RawEffect = HapticEffect<'static>;

#[cfg(any(target_os = "linux", target_os = "freebsd", target_os = "openbsd", target_os = "netbsd"))]
const DEFAULT_LIBRARIES: &[&str] = &["libSDL2-2.0.so.0", "libSDL2.so"];
#[cfg(target_os = "macos")]
const DEFAULT_LIBRARIES: &[&str] = &["libSDL2-2.0.0.dylib", "libSDL2.dylib"];
#[cfg(windows)]
const DEFAULT_LIBRARIES: &[&str] = &["SDL2.dll"];
#[cfg(not(any(
    target_os = "linux",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd",
    target_os = "macos",
    windows
)))]
const DEFAULT_LIBRARIES: &[&str] = &["libSDL2.so"];

/// SDL2 library names to try, in order: the `SDL_HAPTIC_LIBRARY` override
/// first, then the platform defaults.
pub fn library_candidates() -> Vec<String> {
    candidates_with(std::env::var(LIBRARY_ENV).ok())
}

fn candidates_with(env_override: Option<String>) -> Vec<String> {
    env_override
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .into_iter()
        .chain(DEFAULT_LIBRARIES.iter().map(|s| s.to_string()))
        .collect()
}

/// Function table resolved from the SDL2 library.
pub(crate) struct Sdl {
    pub num_haptics: unsafe extern "C" fn() -> c_int,
    pub haptic_name: unsafe extern "C" fn(c_int) -> *const c_char,
    pub haptic_open: unsafe extern "C" fn(c_int) -> *mut RawHaptic,
    pub haptic_opened: unsafe extern "C" fn(c_int) -> c_int,
    pub haptic_index: unsafe extern "C" fn(*mut RawHaptic) -> c_int,
    pub mouse_is_haptic: unsafe extern "C" fn() -> c_int,
    pub haptic_open_from_mouse: unsafe extern "C" fn() -> *mut RawHaptic,
    pub joystick_is_haptic: unsafe extern "C" fn(*mut RawJoystick) -> c_int,
    pub haptic_open_from_joystick: unsafe extern "C" fn(*mut RawJoystick) -> *mut RawHaptic,
    pub haptic_close: unsafe extern "C" fn(*mut RawHaptic),
    pub haptic_num_effects: unsafe extern "C" fn(*mut RawHaptic) -> c_int,
    pub haptic_num_effects_playing: unsafe extern "C" fn(*mut RawHaptic) -> c_int,
    pub haptic_query: unsafe extern "C" fn(*mut RawHaptic) -> c_uint,
    pub haptic_num_axes: unsafe extern "C" fn(*mut RawHaptic) -> c_int,
    pub haptic_effect_supported: unsafe extern "C" fn(*mut RawHaptic, *mut RawEffect) -> c_int,
    pub haptic_new_effect: unsafe extern "C" fn(*mut RawHaptic, *mut RawEffect) -> c_int,
    pub haptic_update_effect:
        unsafe extern "C" fn(*mut RawHaptic, c_int, *mut RawEffect) -> c_int,
    pub haptic_run_effect: unsafe extern "C" fn(*mut RawHaptic, c_int, u32) -> c_int,
    pub haptic_stop_effect: unsafe extern "C" fn(*mut RawHaptic, c_int) -> c_int,
    pub haptic_destroy_effect: unsafe extern "C" fn(*mut RawHaptic, c_int),
    pub haptic_get_effect_status: unsafe extern "C" fn(*mut RawHaptic, c_int) -> c_int,
    pub haptic_set_gain: unsafe extern "C" fn(*mut RawHaptic, c_int) -> c_int,
    pub haptic_set_autocenter: unsafe extern "C" fn(*mut RawHaptic, c_int) -> c_int,
    pub haptic_pause: unsafe extern "C" fn(*mut RawHaptic) -> c_int,
    pub haptic_unpause: unsafe extern "C" fn(*mut RawHaptic) -> c_int,
    pub haptic_stop_all: unsafe extern "C" fn(*mut RawHaptic) -> c_int,
    pub haptic_rumble_supported: unsafe extern "C" fn(*mut RawHaptic) -> c_int,
    pub haptic_rumble_init: unsafe extern "C" fn(*mut RawHaptic) -> c_int,
    pub haptic_rumble_play: unsafe extern "C" fn(*mut RawHaptic, c_float, u32) -> c_int,
    pub haptic_rumble_stop: unsafe extern "C" fn(*mut RawHaptic) -> c_int,
    pub get_error: unsafe extern "C" fn() -> *const c_char,
    /// Keeps the function pointers above valid.
    _library: Library,
}

/// Resolve one symbol and copy the function pointer out of it.
///
/// # Safety
/// `T` must match the C signature of `name`.
unsafe fn sym<T: Copy>(library: &Library, name: &[u8]) -> std::result::Result<T, libloading::Error> {
    Ok(*library.get::<T>(name)?)
}

impl Sdl {
    /// # Safety
    /// `library` must be SDL2, whose exported signatures match the table.
    unsafe fn resolve(library: Library) -> std::result::Result<Sdl, libloading::Error> {
        let l = &library;
        Ok(Sdl {
            num_haptics: sym(l, b"SDL_NumHaptics\0")?,
            haptic_name: sym(l, b"SDL_HapticName\0")?,
            haptic_open: sym(l, b"SDL_HapticOpen\0")?,
            haptic_opened: sym(l, b"SDL_HapticOpened\0")?,
            haptic_index: sym(l, b"SDL_HapticIndex\0")?,
            mouse_is_haptic: sym(l, b"SDL_MouseIsHaptic\0")?,
            haptic_open_from_mouse: sym(l, b"SDL_HapticOpenFromMouse\0")?,
            joystick_is_haptic: sym(l, b"SDL_JoystickIsHaptic\0")?,
            haptic_open_from_joystick: sym(l, b"SDL_HapticOpenFromJoystick\0")?,
            haptic_close: sym(l, b"SDL_HapticClose\0")?,
            haptic_num_effects: sym(l, b"SDL_HapticNumEffects\0")?,
            haptic_num_effects_playing: sym(l, b"SDL_HapticNumEffectsPlaying\0")?,
            haptic_query: sym(l, b"SDL_HapticQuery\0")?,
            haptic_num_axes: sym(l, b"SDL_HapticNumAxes\0")?,
            haptic_effect_supported: sym(l, b"SDL_HapticEffectSupported\0")?,
            haptic_new_effect: sym(l, b"SDL_HapticNewEffect\0")?,
            haptic_update_effect: sym(l, b"SDL_HapticUpdateEffect\0")?,
            haptic_run_effect: sym(l, b"SDL_HapticRunEffect\0")?,
            haptic_stop_effect: sym(l, b"SDL_HapticStopEffect\0")?,
            haptic_destroy_effect: sym(l, b"SDL_HapticDestroyEffect\0")?,
            haptic_get_effect_status: sym(l, b"SDL_HapticGetEffectStatus\0")?,
            haptic_set_gain: sym(l, b"SDL_HapticSetGain\0")?,
            haptic_set_autocenter: sym(l, b"SDL_HapticSetAutocenter\0")?,
            haptic_pause: sym(l, b"SDL_HapticPause\0")?,
            haptic_unpause: sym(l, b"SDL_HapticUnpause\0")?,
            haptic_stop_all: sym(l, b"SDL_HapticStopAll\0")?,
            haptic_rumble_supported: sym(l, b"SDL_HapticRumbleSupported\0")?,
            haptic_rumble_init: sym(l, b"SDL_HapticRumbleInit\0")?,
            haptic_rumble_play: sym(l, b"SDL_HapticRumblePlay\0")?,
            haptic_rumble_stop: sym(l, b"SDL_HapticRumbleStop\0")?,
            get_error: sym(l, b"SDL_GetError\0")?,
            _library: library,
        })
    }

    fn load() -> std::result::Result<Sdl, String> {
        let mut failures = Vec::new();
        for name in library_candidates() {
            // SAFETY: loading SDL2 runs no initialization code with preconditions.
            let attempt = unsafe { Library::new(&name).and_then(|lib| Sdl::resolve(lib)) };
            match attempt {
                Ok(sdl) => {
                    log::info!("Loaded SDL2 haptic API from {}", name);
                    return Ok(sdl);
                }
                Err(e) => {
                    log::debug!("Could not use {}: {}", name, e);
                    failures.push(format!("{}: {}", name, e));
                }
            }
        }
        Err(failures.join("; "))
    }

    /// SDL's last error message for the calling thread.
    pub fn last_error(&self) -> String {
        // SAFETY: SDL_GetError never returns null and the string is NUL-terminated.
        unsafe { c_str_to_string((self.get_error)()) }
    }

    /// `check_status` with SDL's error message attached on failure.
    pub fn check(&self, op: &'static str, code: c_int) -> Result<i32> {
        crate::error::check_status(op, code, || self.last_error())
    }

    /// Map an SDL_bool-or-negative result.
    pub fn check_bool(&self, op: &'static str, code: c_int) -> Result<bool> {
        self.check(op, code).map(|c| c != 0)
    }
}

static SDL: OnceLock<std::result::Result<Sdl, String>> = OnceLock::new();

/// The process-wide SDL2 function table, loading it on first use.
pub(crate) fn sdl() -> Result<&'static Sdl> {
    SDL.get_or_init(Sdl::load)
        .as_ref()
        .map_err(|e| HapticError::LibraryUnavailable(e.clone()))
}

/// Copy a C string owned by SDL. Null becomes an empty string.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string.
pub(crate) unsafe fn c_str_to_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    CStr::from_ptr(ptr).to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_without_override() {
        let names = candidates_with(None);
        assert_eq!(names.len(), DEFAULT_LIBRARIES.len());
        assert_eq!(names[0], DEFAULT_LIBRARIES[0]);
    }

    #[test]
    fn test_candidates_override_comes_first() {
        let names = candidates_with(Some("  /opt/sdl/libSDL2.so \n".into()));
        assert_eq!(names[0], "/opt/sdl/libSDL2.so");
        assert_eq!(names.len(), DEFAULT_LIBRARIES.len() + 1);
    }

    #[test]
    fn test_blank_override_is_ignored() {
        assert_eq!(candidates_with(Some("   ".into())).len(), DEFAULT_LIBRARIES.len());
    }

    #[test]
    fn test_c_str_to_string() {
        let text = b"Haptic: There are 0 haptic devices available\0";
        let s = unsafe { c_str_to_string(text.as_ptr() as *const c_char) };
        assert_eq!(s, "Haptic: There are 0 haptic devices available");
        assert_eq!(unsafe { c_str_to_string(std::ptr::null()) }, "");
    }
}

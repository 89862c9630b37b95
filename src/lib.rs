//! # sdl-haptic - Rust bindings for the SDL2 force-feedback subsystem
//!
//! Thin, runtime-loaded bindings to SDL2's haptic API. Provides:
//! - Byte-compatible effect encoding (`SDL_HapticEffect`) with checked views
//! - Device enumeration, open/close and capability queries
//! - Effect upload, playback control, gain/autocenter and simple rumble
//!
//! SDL2 must already be initialized with `SDL_INIT_HAPTIC` by the host.
//!
//! ## Quick Start
//! ```no_run
//! use sdl_haptic::{Device, HapticDirection, HapticPeriodic, HapticEffect, Iterations, Waveform};
//!
//! let mut device = Device::open(0).unwrap();
//! println!("features: {:?}", device.query().unwrap());
//!
//! let sine = HapticPeriodic::new(Waveform::Sine, HapticDirection::polar(0), 1000, 50, 20000);
//! let id = device.new_effect(&HapticEffect::from(sine)).unwrap();
//! device.run_effect(id, Iterations::Count(1)).unwrap();
//! ```

pub mod error;
pub mod types;
pub mod effect;
pub mod ffi;
pub mod device;

pub use error::HapticError;
pub use types::*;
pub use effect::{
    Effect, HapticCondition, HapticConstant, HapticCustom, HapticDirection, HapticEffect,
    HapticEnvelope, HapticLeftRight, HapticPeriodic, HapticRamp, HAPTIC_EFFECT_SIZE,
};
pub use device::{
    haptic_name, haptic_opened, joystick_is_haptic, list_devices, mouse_is_haptic, num_haptics,
    Device, Joystick,
};
pub use ffi::library_candidates;

/// Result type alias for haptic operations.
pub type Result<T> = std::result::Result<T, HapticError>;

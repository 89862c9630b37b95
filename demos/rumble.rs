//! List haptic devices, then rumble the first one and play a short sine wave.
//!
//! Usage: cargo run --example rumble [device-index]
//!
//! Plays the host's role of initializing SDL's haptic subsystem first.

use sdl_haptic::{
    Device, HapticDirection, HapticEffect, HapticFeatures, HapticPeriodic, Iterations, Waveform,
};
use std::time::Duration;

const SDL_INIT_HAPTIC: u32 = 0x0000_1000;

fn init_sdl() -> Result<libloading::Library, String> {
    for name in sdl_haptic::library_candidates() {
        // SAFETY: SDL_Init has the C signature `int SDL_Init(Uint32)`.
        let result = unsafe {
            libloading::Library::new(&name).and_then(|lib| {
                let code = {
                    let init: libloading::Symbol<unsafe extern "C" fn(u32) -> i32> =
                        lib.get(b"SDL_Init\0")?;
                    init(SDL_INIT_HAPTIC)
                };
                Ok((lib, code))
            })
        };
        match result {
            Ok((lib, 0)) => return Ok(lib),
            Ok((_, code)) => return Err(format!("SDL_Init failed with code {}", code)),
            Err(e) => log::debug!("Skipping {}: {}", name, e),
        }
    }
    Err("SDL2 not found".into())
}

fn main() {
    env_logger::init();

    let _sdl = match init_sdl() {
        Ok(lib) => lib,
        Err(e) => {
            eprintln!("Failed to initialize SDL: {}", e);
            std::process::exit(1);
        }
    };

    let devices = match sdl_haptic::list_devices() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Failed to list haptic devices: {}", e);
            std::process::exit(1);
        }
    };
    for d in &devices {
        println!("[{}] {}{}", d.index, d.name, if d.opened { " (open)" } else { "" });
    }

    let index = std::env::args()
        .nth(1)
        .and_then(|a| a.parse().ok())
        .unwrap_or(0);

    let mut device = match Device::open(index) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Failed to open haptic device {}: {}", index, e);
            std::process::exit(1);
        }
    };

    let features = device.query().unwrap_or(HapticFeatures::empty());
    println!("Features: {:?}", features);

    if device.rumble_supported().unwrap_or(false) {
        println!("Rumble at 50% for 500 ms");
        if let Err(e) = device
            .rumble_init()
            .and_then(|_| device.rumble_play(0.5, 500))
        {
            eprintln!("Rumble failed: {}", e);
        }
        std::thread::sleep(Duration::from_millis(600));
    }

    if features.contains(HapticFeatures::SINE) {
        let mut sine =
            HapticPeriodic::new(Waveform::Sine, HapticDirection::polar(0), 1000, 100, 16000);
        sine.envelope.attack_length = 200;
        sine.envelope.fade_length = 200;
        let effect = HapticEffect::from(sine);

        match device.new_effect(&effect) {
            Ok(id) => {
                println!("Playing sine wave (effect {})", id.raw());
                if let Err(e) = device.run_effect(id, Iterations::Count(2)) {
                    eprintln!("Run failed: {}", e);
                }
                std::thread::sleep(Duration::from_millis(2100));
                device.destroy_effect(id);
            }
            Err(e) => eprintln!("Upload failed: {}", e),
        }
    }

    device.close();
}

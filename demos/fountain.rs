//! # Fountain
//!
//! Free particles shoot up out of a line emitter, fall back under gravity,
//! bounce off the floor and the sphere, and respawn when their lifetime ends.
//!
//! Headless: prints a few sample positions once per simulated second.
//!
//! Run with: `RUST_LOG=debug cargo run --example fountain`

use springbox::prelude::*;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SystemConfig::default().with_seed(7);
    let mut system = ParticleSystem::new(config)?;
    system.initialize(2_000, Topology::fountain())?;

    let dt = 0.01;
    for tick in 1..=1_000 {
        system.step(dt, Integrator::EulerSemiImplicit)?;

        if tick % 100 == 0 {
            let lowest = system
                .positions()
                .map(|p| p.y)
                .fold(f32::INFINITY, f32::min);
            log::info!(
                "t = {:>5.2}s  lowest y = {:>6.3}  p[0] = {:?}",
                tick as f32 * dt,
                lowest,
                system.particle(0)?.position
            );
        }
    }

    Ok(())
}

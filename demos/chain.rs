//! # Chain
//!
//! A spring chain anchored at one end drops under gravity and swings
//! across the sphere. Spring parameters can be passed on the command line:
//!
//! Run with: `cargo run --example chain -- [integrator] [k_e] [k_d] [L]`
//!
//! e.g. `cargo run --example chain -- verlet -120 8 0.4`

use springbox::prelude::*;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let method: Integrator = match args.next() {
        Some(name) => name.parse()?,
        None => Integrator::EulerSemiImplicit,
    };
    let defaults = SpringParams::default();
    let mut next_f32 = |fallback: f32| {
        args.next()
            .and_then(|s| s.parse::<f32>().ok())
            .unwrap_or(fallback)
    };
    let spring = SpringParams::new(
        next_f32(defaults.stiffness),
        next_f32(defaults.damping),
        next_f32(defaults.rest_length),
    );

    let mut system = ParticleSystem::new(SystemConfig::default())?;
    system.initialize(15, Topology::chain(spring))?;
    log::info!("{} with {:?}", method, spring);

    let dt = 0.01;
    for tick in 1..=600 {
        system.step(dt, method)?;

        if tick % 60 == 0 {
            let tail = system.particle(system.len() - 1)?;
            let tension = system.spring_force(0)?.length();
            log::info!(
                "t = {:>4.1}s  tail = ({:>6.3}, {:>6.3}, {:>6.3})  anchor tension = {:.3}",
                tick as f32 * dt,
                tail.position.x,
                tail.position.y,
                tail.position.z,
                tension
            );
        }
    }

    Ok(())
}

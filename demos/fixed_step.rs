//! # Fixed Step
//!
//! Drives a waterfall from irregular "frame" deltas through a
//! [`FixedTimestep`], the way a render loop would. The simulation always
//! advances in identical steps regardless of frame timing.
//!
//! Run with: `cargo run --example fixed_step`

use springbox::prelude::*;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut system = ParticleSystem::new(SystemConfig::default().with_seed(11))?;
    system.initialize(500, Topology::waterfall())?;

    let mut clock = FixedTimestep::new(1.0 / 120.0)?.with_max_substeps(4);

    // A jittery 60 Hz loop with the odd long stall.
    let frames = [0.016, 0.017, 0.015, 0.050, 0.016, 0.016, 0.200, 0.016];
    for (frame, &delta) in frames.iter().cycle().take(240).enumerate() {
        let steps = system.advance(&mut clock, delta, Integrator::Verlet)?;

        if frame % 30 == 0 {
            let instances = system.instances();
            let bytes: &[u8] = springbox::bytemuck::cast_slice(&instances);
            log::info!(
                "frame {:>3}: {} steps, {:.3}s simulated, alpha {:.2}, {} instance bytes",
                frame,
                steps,
                clock.elapsed(),
                clock.alpha(),
                bytes.len()
            );
        }
    }

    println!(
        "{} fixed steps over {:.2}s",
        clock.steps_taken(),
        clock.elapsed()
    );
    Ok(())
}

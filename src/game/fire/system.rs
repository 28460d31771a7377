use super::particle::{FireParticle, FireParticleFactory};
use crate::config::PhoenixFlameConfig;
use crate::sprite::sheet::frame_index;
use crate::sprite::WHITE;
use log::debug;
use rand::rngs::StdRng;

const YELLOW: u32 = 0xFFDD88;
const RED: u32 = 0xFF6622;

/// Tint ramp keyed on normalised age.
pub fn tint_for(t: f64) -> u32 {
    if t < 0.2 {
        WHITE
    } else if t < 0.5 {
        YELLOW
    } else {
        RED
    }
}

/// Quick fade in over the first tenth of life, then an accelerating fade out.
pub fn alpha_for(t: f64) -> f64 {
    if t < 0.1 {
        t * 10.0
    } else {
        1.0 - t * t
    }
}

/// Fixed pool of flame particles recycled in place.
pub struct FireParticleSystem {
    particles: Vec<FireParticle>,
    factory: FireParticleFactory,
    frame_count: usize,
    global_speed: f64,
    running: bool,
    rng: StdRng,
}

impl FireParticleSystem {
    pub fn new(config: &PhoenixFlameConfig, mut rng: StdRng) -> Self {
        let factory = FireParticleFactory::new(config.particle.clone());
        let particles = (0..config.max_particles)
            .map(|_| factory.create(&mut rng))
            .collect();
        FireParticleSystem {
            particles,
            factory,
            frame_count: (config.sheet_columns.max(1) * config.sheet_rows.max(1)) as usize,
            global_speed: config.global_speed,
            running: false,
            rng,
        }
    }

    /// Replaces every particle with a freshly prewarmed spawn.
    pub fn reset(&mut self) {
        for particle in &mut self.particles {
            *particle = self.factory.create(&mut self.rng);
        }
    }

    pub fn start(&mut self) {
        debug!("FireParticleSystem: start {} particles", self.particles.len());
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn update(&mut self, delta_s: f64) {
        if !self.running {
            return;
        }
        let delta = delta_s * self.global_speed;
        for particle in &mut self.particles {
            particle.age += delta;
            if particle.age >= particle.max_life {
                self.factory.reset(particle, &mut self.rng);
                continue;
            }
            Self::animate(particle, delta, self.frame_count);
        }
    }

    fn animate(particle: &mut FireParticle, delta: f64, frame_count: usize) {
        let sway = (particle.age * 0.15 + particle.wave_offset).sin() * 0.3;
        particle.sprite.position.x += (particle.vx + sway) * delta;
        particle.sprite.position.y += particle.vy * delta;

        let t = particle.progress();
        particle.frame = frame_index(t, frame_count);
        particle.sprite.set_scale(particle.initial_scale * (1.2 - t * 0.4));
        particle.sprite.alpha = alpha_for(t);
        particle.sprite.tint = tint_for(t);
        particle.sprite.rotation = particle.sprite.position.x * 0.01;
    }

    pub fn particles(&self) -> &[FireParticle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

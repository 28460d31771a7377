use crate::config::ParticleConfig;
use crate::engine::random;
use crate::sprite::{Sprite, WHITE};
use rand::Rng;
use std::f64::consts::TAU;

/// Upper bound (exclusive) of frames a new particle is aged before its first
/// draw, so a fresh pool does not pulse in lockstep.
const PREWARM_FRAMES: u32 = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct FireParticle {
    pub sprite: Sprite,
    pub vx: f64,
    pub vy: f64,
    /// frames at 60 fps
    pub age: f64,
    pub max_life: f64,
    pub initial_scale: f64,
    /// sway phase
    pub wave_offset: f64,
    pub frame: usize,
}

impl FireParticle {
    /// Normalised age in [0, 1).
    pub fn progress(&self) -> f64 {
        if self.max_life > 0.0 {
            self.age / self.max_life
        } else {
            1.0
        }
    }
}

pub struct FireParticleFactory {
    config: ParticleConfig,
}

impl FireParticleFactory {
    pub fn new(config: ParticleConfig) -> Self {
        FireParticleFactory { config }
    }

    pub fn create<R: Rng>(&self, rng: &mut R) -> FireParticle {
        let mut particle = FireParticle {
            sprite: Sprite::default().with_anchor(0.5, 0.7),
            vx: 0.0,
            vy: 0.0,
            age: 0.0,
            max_life: 0.0,
            initial_scale: 0.0,
            wave_offset: 0.0,
            frame: 0,
        };
        self.reset(&mut particle, rng);
        self.prewarm(&mut particle, rng);
        particle
    }

    /// Back to a fresh spawn at the base of the flame.
    pub fn reset<R: Rng>(&self, particle: &mut FireParticle, rng: &mut R) {
        let config = &self.config;
        particle.sprite.position.x = random::jitter(rng, 0.0, config.spawn_width);
        particle.sprite.position.y = 0.0;
        particle.vx = random::jitter(rng, 0.0, 0.5);
        particle.vy = random::range(rng, config.speed_y_min, config.speed_y_max);
        particle.max_life = random::range(rng, config.lifetime_min, config.lifetime_max);
        particle.age = 0.0;
        particle.wave_offset = random::range(rng, 0.0, TAU);
        particle.sprite.alpha = 0.0;
        particle.initial_scale = random::range(rng, config.scale_min, config.scale_max);
        particle.sprite.set_scale(particle.initial_scale);
        particle.sprite.rotation = 0.0;
        particle.sprite.tint = WHITE;
        particle.frame = 0;
    }

    fn prewarm<R: Rng>(&self, particle: &mut FireParticle, rng: &mut R) {
        for _ in 0..random::range_int(rng, 0, PREWARM_FRAMES) {
            particle.age += 1.0;
            if particle.age >= particle.max_life {
                particle.age = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn reset_draws_inside_the_configured_ranges() {
        let factory = FireParticleFactory::new(ParticleConfig::default());
        let mut rng = StdRng::seed_from_u64(3);
        let mut particle = factory.create(&mut rng);
        for _ in 0..200 {
            factory.reset(&mut particle, &mut rng);
            assert!(particle.sprite.position.x.abs() <= 4.0);
            assert_eq!(particle.sprite.position.y, 0.0);
            assert!(particle.vx.abs() <= 0.5);
            assert!((-5.0..-3.0).contains(&particle.vy));
            assert!((30.0..50.0).contains(&particle.max_life));
            assert!((0.0..TAU).contains(&particle.wave_offset));
            assert!((0.2..0.5).contains(&particle.initial_scale));
            assert_eq!(particle.sprite.scale.x, particle.initial_scale);
            assert_eq!(particle.age, 0.0);
            assert_eq!(particle.sprite.alpha, 0.0);
            assert_eq!(particle.sprite.rotation, 0.0);
            assert_eq!(particle.sprite.tint, WHITE);
        }
    }

    #[test]
    fn prewarmed_age_stays_below_max_life() {
        let factory = FireParticleFactory::new(ParticleConfig::default());
        let mut rng = StdRng::seed_from_u64(11);
        let particles: Vec<FireParticle> = (0..100).map(|_| factory.create(&mut rng)).collect();
        assert!(particles.iter().all(|p| p.age < p.max_life));
        assert!(particles.iter().any(|p| p.age > 0.0));
    }
}

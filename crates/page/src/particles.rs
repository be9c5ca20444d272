use async_trait::async_trait;
use curtain_core::DocumentError;
use rand::Rng;
use serde::Serialize;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

pub const DEFAULT_PARTICLE_COUNT: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Particle {
    pub left_percent: f64,
    pub animation_delay: Duration,
    pub animation_duration: Duration,
}

impl Particle {
    /// Inline style for the particle's `<div class="particle">`.
    pub fn style(&self) -> String {
        format!(
            "left: {}%; animation-delay: {}s; animation-duration: {}s",
            self.left_percent,
            self.animation_delay.as_secs_f64(),
            self.animation_duration.as_secs_f64()
        )
    }
}

/// The `#particles` container that receives one `div.particle` per particle.
#[async_trait]
pub trait ParticleHost: Send + Sync {
    async fn append_particles(&self, particles: &[Particle]) -> Result<(), DocumentError>;
}

/// In-memory container for documents without a live DOM.
#[derive(Debug, Default)]
pub struct ParticleBuffer {
    particles: Mutex<Vec<Particle>>,
}

impl ParticleBuffer {
    pub fn particles(&self) -> Vec<Particle> {
        self.particles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ParticleHost for ParticleBuffer {
    async fn append_particles(&self, particles: &[Particle]) -> Result<(), DocumentError> {
        self.particles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(particles);
        Ok(())
    }
}

/// Floating particles over the hero section.
#[derive(Debug, Clone, Copy)]
pub struct ParticleField {
    pub count: usize,
}

impl Default for ParticleField {
    fn default() -> Self {
        Self {
            count: DEFAULT_PARTICLE_COUNT,
        }
    }
}

impl ParticleField {
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Particle> {
        (0..self.count)
            .map(|_| Particle {
                left_percent: rng.random_range(0.0..100.0),
                animation_delay: Duration::from_secs_f64(rng.random_range(0.0..20.0)),
                animation_duration: Duration::from_secs_f64(20.0 + rng.random_range(0.0..20.0)),
            })
            .collect()
    }

    /// Generates a fresh field and appends it to `host`.
    pub async fn populate(&self, host: &dyn ParticleHost) -> Result<usize, DocumentError> {
        let particles = {
            let mut rng = rand::rng();
            self.generate(&mut rng)
        };
        host.append_particles(&particles).await?;
        tracing::info!(count = particles.len(), "particles created");
        Ok(particles.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn particles_stay_within_their_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let particles = ParticleField::default().generate(&mut rng);

        assert_eq!(particles.len(), 50);
        for p in &particles {
            assert!((0.0..100.0).contains(&p.left_percent));
            assert!(p.animation_delay < Duration::from_secs(20));
            assert!(p.animation_duration >= Duration::from_secs(20));
            assert!(p.animation_duration < Duration::from_secs(40));
        }
    }

    #[test]
    fn same_seed_same_field() {
        let field = ParticleField { count: 5 };
        let a = field.generate(&mut StdRng::seed_from_u64(42));
        let b = field.generate(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn populate_lands_every_particle_in_the_host() {
        let host = ParticleBuffer::default();

        let count = ParticleField::default().populate(&host).await.unwrap();

        assert_eq!(count, 50);
        assert_eq!(host.particles().len(), 50);
    }

    #[test]
    fn style_uses_percent_and_seconds() {
        let particle = Particle {
            left_percent: 12.5,
            animation_delay: Duration::from_millis(1500),
            animation_duration: Duration::from_secs(25),
        };
        assert_eq!(
            particle.style(),
            "left: 12.5%; animation-delay: 1.5s; animation-duration: 25s"
        );
    }
}

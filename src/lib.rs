pub mod config;
pub mod error;
pub mod frame_loop;
pub mod surface;

use cgmath::{InnerSpace, Vector2, vec2};
use rand::Rng;
use rand::distributions::{Distribution, Standard};

pub use config::FieldConfig;
pub use frame_loop::{FrameLoop, FrameStatus, StopHandle};
pub use surface::{DrawSurface, NullSurface, Rgba};

/// The four fixed particle colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Palette {
    Blue,
    Teal,
    Orange,
    Purple,
}

impl Palette {
    pub const ALL: [Palette; 4] = [
        Palette::Blue,
        Palette::Teal,
        Palette::Orange,
        Palette::Purple,
    ];

    /// Uniform choice among the four colors.
    pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub const fn rgba(self) -> Rgba {
        match self {
            Palette::Blue => Rgba::new(59, 130, 246, 0.5),
            Palette::Teal => Rgba::new(20, 184, 166, 0.5),
            Palette::Orange => Rgba::new(249, 115, 22, 0.5),
            Palette::Purple => Rgba::new(139, 92, 246, 0.5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vector2<f64>,
    pub velocity: Vector2<f64>,
    pub radius: f64,
    pub color: Palette,
    /// Ticks left to live. Drops by one every update.
    pub age_remaining: f64,
    max_age: f64,
}

// [0, 1)
fn unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    Standard.sample(rng)
}

impl Particle {
    pub fn new(
        position: Vector2<f64>,
        velocity: Vector2<f64>,
        radius: f64,
        color: Palette,
        lifetime: f64,
    ) -> Self {
        Self {
            position,
            velocity,
            radius,
            color,
            age_remaining: lifetime,
            max_age: lifetime,
        }
    }

    /// Radius in `[1, 4)`, each velocity component in `[-1.5, 1.5)`,
    /// lifetime in `[50, 250)`.
    pub fn spawn<R: Rng + ?Sized>(position: Vector2<f64>, rng: &mut R) -> Self {
        let radius = unit(rng) * 3.0 + 1.0;
        let velocity = vec2(unit(rng) * 3.0 - 1.5, unit(rng) * 3.0 - 1.5);
        let color = Palette::pick(rng);
        let lifetime = unit(rng) * 200.0 + 50.0;

        Self::new(position, velocity, radius, color, lifetime)
    }

    pub fn max_age(&self) -> f64 {
        self.max_age
    }

    /// Remaining fraction of the lifetime. Not clamped.
    pub fn opacity(&self) -> f64 {
        self.age_remaining / self.max_age
    }

    pub fn is_expired(&self, min_radius: f64) -> bool {
        self.age_remaining <= 0.0 || self.radius <= min_radius
    }

    /// Advance one tick: integrate, get pushed by the pointer, shrink, age.
    pub fn update(&mut self, pointer: Option<Vector2<f64>>, config: &FieldConfig) {
        self.position += self.velocity;

        if let Some(pointer) = pointer {
            let delta = pointer - self.position;
            let distance = delta.magnitude();

            if distance < config.influence_radius {
                let force = (config.influence_radius - distance) / config.influence_radius;
                let angle = delta.y.atan2(delta.x);
                self.velocity.x -= angle.cos() * force * config.repulsion_strength;
                self.velocity.y -= angle.sin() * force * config.repulsion_strength;
            }
        }

        if self.radius > config.min_radius {
            self.radius -= config.shrink_rate;
        }
        self.age_remaining -= 1.0;
    }

    /// Physics runs in `f64`; the surface gets `f32`.
    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        surface.fill_circle(
            vec2(self.position.x as f32, self.position.y as f32),
            self.radius as f32,
            self.color.rgba(),
            self.opacity() as f32,
        );
    }
}

/// A bounded set of short-lived particles drifting over a 2D surface and
/// fleeing the pointer.
#[derive(Debug, Clone)]
pub struct ParticleField {
    config: FieldConfig,
    particles: Vec<Particle>,
    pointer: Option<Vector2<f64>>,
    width: f64,
    height: f64,
}

impl ParticleField {
    /// An empty field with zero-sized bounds. Call [`resize`](Self::resize)
    /// before the first tick to get spawns spread over the surface.
    pub fn new(config: FieldConfig) -> Self {
        Self {
            config,
            particles: Vec::new(),
            pointer: None,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn pointer(&self) -> Option<Vector2<f64>> {
        self.pointer
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// `Some` on pointer move, `None` once the pointer leaves the surface.
    pub fn set_pointer(&mut self, pointer: Option<Vector2<f64>>) {
        match (self.pointer.is_some(), pointer.is_some()) {
            (false, true) => log::debug!("pointer entered field"),
            (true, false) => log::debug!("pointer left field"),
            _ => {}
        }
        self.pointer = pointer;
    }

    /// New spawn bounds. Live particles are left where they are.
    pub fn resize(&mut self, width: f64, height: f64) {
        if (width, height) != (self.width, self.height) {
            log::debug!("field resized to {width}x{height}");
        }
        self.width = width;
        self.height = height;
    }

    /// Adds a particle if the field is below capacity.
    pub fn insert(&mut self, particle: Particle) -> bool {
        if self.particles.len() >= self.config.capacity {
            return false;
        }
        self.particles.push(particle);
        true
    }

    /// Repaint the live set as it stands, without advancing it.
    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        surface.clear();
        for particle in &self.particles {
            particle.draw(surface);
        }
    }

    pub fn tick<S, R>(&mut self, surface: &mut S, rng: &mut R)
    where
        S: DrawSurface + ?Sized,
        R: Rng + ?Sized,
    {
        surface.clear();

        for particle in &mut self.particles {
            particle.update(self.pointer, &self.config);
            particle.draw(surface);
        }

        let before = self.particles.len();
        let min_radius = self.config.min_radius;
        self.particles.retain(|particle| !particle.is_expired(min_radius));
        let removed = before - self.particles.len();

        let spawned = self.spawn(rng);

        log::trace!(
            "tick: {} live, {removed} removed, {} spawned",
            self.particles.len(),
            usize::from(spawned)
        );
    }

    // At most one per tick, wherever the population stands.
    fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.particles.len() >= self.config.capacity {
            return false;
        }

        let position = vec2(unit(rng) * self.width, unit(rng) * self.height);
        self.particles.push(Particle::spawn(position, rng));
        true
    }
}

impl Default for ParticleField {
    fn default() -> Self {
        Self::new(FieldConfig::default())
    }
}

use crate::particle::{Color, Particle, ParticleId};
use glam::DVec3;
use std::collections::VecDeque;

/// Bounded storage of [`Particle`]s with first-in first-out eviction.
///
/// Inserting into a full store evicts the oldest particle first, so the number of stored particles
/// never exceeds the capacity and the cost of a frame stays bounded. Particles are never removed
/// individually; the only other removal is [`clear`](ParticleStore::clear).
///
/// ```
/// # use swarm3d::prelude::*;
/// # use glam::DVec3;
/// let mut store = ParticleStore::new(2, 0.2);
///
/// let first = store.spawn(DVec3::ZERO, 10.0);
/// store.spawn(DVec3::X, 10.0);
/// store.spawn(DVec3::Y, 10.0);
///
/// assert_eq!(store.len(), 2);
/// assert!(store.get(first).is_none());
/// ```
#[derive(Clone, Debug)]
pub struct ParticleStore {
    particles: VecDeque<Particle>,
    capacity: usize,
    mass_per_radius: f64,
    next_id: u64,
}

impl ParticleStore {
    /// Creates a new empty [`ParticleStore`] holding at most `capacity` particles, spawning
    /// particles with `mass = mass_per_radius * radius`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or `mass_per_radius` is not strictly positive.
    #[inline]
    pub fn new(capacity: usize, mass_per_radius: f64) -> Self {
        assert!(capacity > 0, "particle store capacity must be at least 1");
        assert!(
            mass_per_radius > 0.0,
            "mass per radius must be positive, got {mass_per_radius}"
        );

        Self {
            particles: VecDeque::with_capacity(capacity),
            capacity,
            mass_per_radius,
            next_id: 0,
        }
    }

    /// Returns the maximum number of stored particles.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of stored particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Returns `true` if the store contains no particles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Returns the mass given to a particle of the given radius by [`spawn`](Self::spawn).
    #[inline]
    pub fn mass_for(&self, radius: f64) -> f64 {
        self.mass_per_radius * radius
    }

    /// Spawns a white particle at rest with a mass derived from its radius.
    #[inline]
    pub fn spawn(&mut self, position: DVec3, radius: f64) -> ParticleId {
        let mass = self.mass_for(radius);
        self.insert(Particle::new(position, radius, mass, Color::WHITE))
    }

    /// Inserts a particle, evicting the oldest one if the store is full, and returns the identifier
    /// assigned to it.
    #[inline]
    pub fn insert(&mut self, mut particle: Particle) -> ParticleId {
        if self.particles.len() == self.capacity {
            if let Some(evicted) = self.particles.pop_front() {
                log::debug!("evicting particle {:?} at capacity {}", evicted.id, self.capacity);
            }
        }

        let id = ParticleId(self.next_id);
        self.next_id += 1;

        particle.id = id;
        self.particles.push_back(particle);

        id
    }

    /// Removes every particle. Identifiers keep increasing afterwards.
    #[inline]
    pub fn clear(&mut self) {
        log::debug!("clearing {} particles", self.particles.len());
        self.particles.clear();
    }

    /// Returns the index of the particle with the given identifier, if it is still stored.
    #[inline]
    pub fn index_of(&self, id: ParticleId) -> Option<usize> {
        // Identifiers are contiguous from the front because removal only happens there.
        let front = self.particles.front()?.id.0;
        let index = id.0.checked_sub(front)? as usize;

        (index < self.particles.len()).then_some(index)
    }

    /// Returns a reference to the particle with the given identifier, if it is still stored.
    #[inline]
    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.index_of(id).map(|index| &self.particles[index])
    }

    /// Returns a mutable reference to the particle with the given identifier, if it is still
    /// stored.
    #[inline]
    pub fn get_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        self.index_of(id).map(|index| &mut self.particles[index])
    }

    /// Iterates over the particles, oldest first.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Particle> + DoubleEndedIterator {
        self.particles.iter()
    }

    /// Mutably iterates over the particles, oldest first.
    #[inline]
    pub fn iter_mut(&mut self) -> impl ExactSizeIterator<Item = &mut Particle> + DoubleEndedIterator {
        self.particles.iter_mut()
    }

    /// Returns the particles as one mutable slice, oldest first.
    ///
    /// Indices into this slice match the indices used by [`pairs`](Self::pairs) and by
    /// [`Index`](std::ops::Index).
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        self.particles.make_contiguous()
    }

    /// Returns the sequence of every unique unordered pair of indices `(i, j)` with `i < j`.
    #[inline]
    pub fn pairs(&self) -> Pairs {
        Pairs::new(self.particles.len())
    }
}

impl std::ops::Index<usize> for ParticleStore {
    type Output = Particle;

    #[inline]
    fn index(&self, index: usize) -> &Particle {
        &self.particles[index]
    }
}

impl<'a> IntoIterator for &'a ParticleStore {
    type Item = &'a Particle;
    type IntoIter = std::collections::vec_deque::Iter<'a, Particle>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.particles.iter()
    }
}

/// A lazy iterator over every unique unordered pair of indices `(i, j)` with `i < j < len`.
///
/// Pairs are yielded row by row, `(0, 1), (0, 2), .., (1, 2), ..`. The iterator is cheap to clone,
/// so cloning it before consumption restarts the sequence.
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pairs {
    len: usize,
    i: usize,
    j: usize,
}

impl Pairs {
    /// Creates a new [`Pairs`] iterator over indices in `0..len`.
    #[inline]
    pub const fn new(len: usize) -> Self {
        Self { len, i: 0, j: 1 }
    }

    #[inline]
    const fn remaining(&self) -> usize {
        if self.i >= self.len {
            return 0;
        }

        // Rest of the current row, then every full row below it.
        let rest = self.len.saturating_sub(self.j);
        let below = self.len - self.i - 1;

        rest + below * below.saturating_sub(1) / 2
    }
}

impl Iterator for Pairs {
    type Item = (usize, usize);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        while self.i < self.len {
            if self.j < self.len {
                let pair = (self.i, self.j);
                self.j += 1;
                return Some(pair);
            }

            self.i += 1;
            self.j = self.i + 1;
        }

        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Pairs {}

impl std::iter::FusedIterator for Pairs {}

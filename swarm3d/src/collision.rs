use crate::{particle::Particle, sequential::BruteForcePairsMut, Between, Interaction};
use std::ops::{Add, AddAssign};

/// Summary of the contacts resolved over a set of pairs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Number of overlapping pairs that were pushed apart.
    pub contacts: usize,
    /// Number of those pairs that were approaching and received an impulse.
    pub impulses: usize,
}

impl Add for Resolution {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            contacts: self.contacts + rhs.contacts,
            impulses: self.impulses + rhs.impulses,
        }
    }
}

impl AddAssign for Resolution {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Instantaneous pairwise collision response with positional correction and a restitution
/// impulse along the contact normal.
///
/// Overlapping particles are pushed apart along the normal, each by the share of the overlap
/// given by the other particle's mass fraction, so heavier particles move less. If they are still
/// approaching, an impulse `j = -(1 + e) * v_n / (1 / m_i + 1 / m_j)` is exchanged. Particles
/// already separating keep their momentum. Coincident centres have no normal and are skipped.
///
/// Contacts are resolved one pair at a time; simultaneous contacts between several particles are
/// not solved globally.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElasticCollision {
    /// Restitution coefficient, from `0` (fully inelastic) to `1` (perfectly elastic).
    pub restitution: f64,
}

impl Interaction<Between<&mut Particle, &mut Particle>> for ElasticCollision {
    type Output = Resolution;

    fn compute(&mut self, Between(p1, p2): Between<&mut Particle, &mut Particle>) -> Resolution {
        let dir = p2.position - p1.position;
        let mag_2 = dir.length_squared();
        let min_distance = p1.radius + p2.radius;

        if mag_2 <= 0.0 || mag_2 >= min_distance * min_distance {
            return Resolution::default();
        }

        let mag = mag_2.sqrt();
        let normal = dir / mag;
        let overlap = min_distance - mag;

        let total_mass = p1.mass + p2.mass;
        p1.position -= normal * overlap * (p2.mass / total_mass);
        p2.position += normal * overlap * (p1.mass / total_mass);

        let along_normal = (p2.velocity() - p1.velocity()).dot(normal);
        if along_normal >= 0.0 {
            return Resolution {
                contacts: 1,
                impulses: 0,
            };
        }

        let j = -(1.0 + self.restitution) * along_normal / (1.0 / p1.mass + 1.0 / p2.mass);
        let impulse = normal * j;

        p1.momentum -= impulse;
        p2.momentum += impulse;

        Resolution {
            contacts: 1,
            impulses: 1,
        }
    }
}

/// Resolves every overlapping unique pair of particles, in pair order.
#[inline]
pub fn resolve(particles: &mut [Particle], restitution: f64) -> Resolution {
    BruteForcePairsMut(ElasticCollision { restitution }).compute(particles)
}

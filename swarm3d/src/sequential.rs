use crate::{storage::Pairs, Between, Interaction};
use std::ops::{Add, AddAssign};

/// Trait to implement optimised pair computation of an interaction. Such implementations are used
/// by the [`BruteForcePairs`] algorithm.
pub trait InteractionPair<P> {
    /// The computed interaction.
    type Output;

    /// Returns the computed interactions between two distinct particles, for the affected and the
    /// affecting particle respectively.
    fn compute_pair(&mut self, pair: Between<P, P>) -> (Self::Output, Self::Output);
}

/// Brute-force algorithm using one CPU thread.
///
/// Each affected particle is computed against every affecting particle and the results are
/// summed. Used when the affecting side is a distinguished body rather than the particles
/// themselves.
///
/// To use particles `P1` and `P2` with this algorithm, the interaction `T` should implement
/// [`Interaction<Between<&P1, &P2>>`].
#[derive(Clone, Copy, Default, Debug)]
pub struct BruteForce<T>(pub T);

impl<P1, P2, U, T> Interaction<Between<&P1, &[P2]>> for BruteForce<T>
where
    U: Add<Output = U> + Default,
    T: for<'a> Interaction<Between<&'a P1, &'a P2>, Output = U>,
{
    type Output = U;

    #[inline]
    fn compute(&mut self, Between(affected, affecting): Between<&P1, &[P2]>) -> Self::Output {
        affecting.iter().fold(U::default(), |interaction, p2| {
            interaction + self.0.compute(Between(affected, p2))
        })
    }
}

impl<P1, P2, U, T> Interaction<Between<&[P1], &[P2]>> for BruteForce<T>
where
    U: Add<Output = U> + Default,
    T: for<'a> Interaction<Between<&'a P1, &'a P2>, Output = U>,
{
    type Output = Vec<U>;

    #[inline]
    fn compute(&mut self, Between(affected, affecting): Between<&[P1], &[P2]>) -> Self::Output {
        affected
            .iter()
            .map(|p1| Interaction::<Between<&P1, &[P2]>>::compute(self, Between(p1, affecting)))
            .collect()
    }
}

/// Brute-force algorithm over the combination of pairs using one CPU thread.
///
/// Every unordered pair is computed once and both particles are credited with their side of the
/// interaction, which halves the work of [`BruteForce`] for symmetric interactions.
///
/// To use particles `P` with this algorithm, the interaction `T` should implement
/// [`InteractionPair<&P>`].
#[derive(Clone, Copy, Default, Debug)]
pub struct BruteForcePairs<T>(pub T);

impl<P, U, T> Interaction<&[P]> for BruteForcePairs<T>
where
    U: AddAssign + Default,
    T: for<'a> InteractionPair<&'a P, Output = U>,
{
    type Output = Vec<U>;

    #[inline]
    fn compute(&mut self, slice: &[P]) -> Self::Output {
        let len = slice.len();
        let mut output: Vec<_> = std::iter::repeat_with(Default::default).take(len).collect();

        for i in 0..len {
            let mut output_i = U::default();

            for j in (i + 1)..len {
                let computed = self.0.compute_pair(Between(&slice[i], &slice[j]));

                output_i += computed.0;
                output[j] += computed.1;
            }

            output[i] += output_i;
        }

        output
    }
}

/// Brute-force algorithm over the combination of pairs that lets the interaction mutate both
/// particles of each pair.
///
/// Pairs are visited in [`Pairs`] order and each pair sees the effects of the pairs computed
/// before it. The outputs of every pair are summed.
///
/// To use particles `P` with this algorithm, the interaction `T` should implement
/// [`Interaction<Between<&mut P, &mut P>>`].
#[derive(Clone, Copy, Default, Debug)]
pub struct BruteForcePairsMut<T>(pub T);

impl<P, U, T> Interaction<&mut [P]> for BruteForcePairsMut<T>
where
    U: AddAssign + Default,
    T: for<'a> Interaction<Between<&'a mut P, &'a mut P>, Output = U>,
{
    type Output = U;

    #[inline]
    fn compute(&mut self, slice: &mut [P]) -> Self::Output {
        let mut output = U::default();

        for (i, j) in Pairs::new(slice.len()) {
            let (head, tail) = slice.split_at_mut(j);
            output += self.0.compute(Between(&mut head[i], &mut tail[0]));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy)]
    struct Difference;

    impl InteractionPair<&f64> for Difference {
        type Output = f64;

        fn compute_pair(&mut self, Between(a, b): Between<&f64, &f64>) -> (f64, f64) {
            (b - a, a - b)
        }
    }

    impl Interaction<Between<&f64, &f64>> for Difference {
        type Output = f64;

        fn compute(&mut self, Between(a, b): Between<&f64, &f64>) -> f64 {
            b - a
        }
    }

    struct Swap;

    impl Interaction<Between<&mut f64, &mut f64>> for Swap {
        type Output = usize;

        fn compute(&mut self, Between(a, b): Between<&mut f64, &mut f64>) -> usize {
            std::mem::swap(a, b);
            1
        }
    }

    #[test]
    fn pairs_match_brute_force() {
        let values = [1.0, 4.0, -2.0, 8.0];

        let pairs = BruteForcePairs(Difference).compute(&values[..]);
        let brute = BruteForce(Difference).compute(Between(&values[..], &values[..]));

        for (p, b) in pairs.iter().zip(&brute) {
            assert!((p - b).abs() < 1e-12);
        }
    }

    #[test]
    fn pairs_mut_visits_every_pair_in_order() {
        let mut values = [0.0, 1.0, 2.0];

        // (0, 1): [1, 0, 2], (0, 2): [2, 0, 1], (1, 2): [2, 1, 0]
        let visited = BruteForcePairsMut(Swap).compute(&mut values[..]);

        assert_eq!(visited, 3);
        assert_eq!(values, [2.0, 1.0, 0.0]);
    }
}

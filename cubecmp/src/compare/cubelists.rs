use tracing::debug;

use crate::{errors::Result, helpers::fmt_summaries, tolerance::Tolerance, traits::Cube};

use super::{cubes::compare_cubes, Comparison};

/// Pair up the cubes of two collections, greedily.
///
/// Each reference cube takes the first candidate cube still available that compares equal to it.
/// This isn't guaranteed to find a pairing whenever one exists: if a reference cube tolerantly
/// matches two candidates, it may take the one a later reference cube needed. In practice cubes
/// from the same file are told apart by their names and coordinates, so we accept the risk.
///
pub(crate) fn compare_cubelists<C: Cube>(
    reference: &[C],
    candidate: &[C],
    tolerance: &Tolerance,
) -> Result<Comparison> {
    if reference.len() != candidate.len() {
        debug!(
            reference = reference.len(),
            candidate = candidate.len(),
            "cubelists of different lengths"
        );
        return Ok(Comparison::mismatch("cubelists of different lengths"));
    }

    let mut pool: Vec<&C> = candidate.iter().collect();
    let mut notes = vec![];
    for ref_cube in reference {
        let mut found = None;
        for (i, cand_cube) in pool.iter().enumerate() {
            let comparison = compare_cubes(ref_cube, *cand_cube, tolerance)?;
            if comparison.equal {
                found = Some((i, comparison));
                break;
            }
        }

        match found {
            Some((i, comparison)) => {
                pool.remove(i);
                if !comparison.diagnostic.is_empty() {
                    notes.push(comparison.diagnostic);
                }
            }
            None => {
                debug!(cube = %ref_cube, "no match");
                return Ok(Comparison::mismatch(format!(
                    "cube#1:\n{}\n\n.. not found in ..\n\n{}",
                    ref_cube,
                    fmt_summaries(candidate)
                )));
            }
        }
    }
    assert!(
        pool.is_empty(),
        "every reference cube was matched but {} candidate cubes are left over",
        pool.len()
    );

    Ok(Comparison::soft(notes))
}

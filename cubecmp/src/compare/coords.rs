use ndarray::{ArrayD, ArrayViewD, Axis, CowArray, IxDyn};
use tracing::{debug, trace};

use crate::{
    errors::{Error, Result},
    helpers::fmt_shape,
    tolerance::Tolerance,
    traits::Coord,
};

use super::Comparison;

/// What is left of a coordinate once its values are thrown away.
///
/// Equivalent to collapsing every dimension to length one, setting the only point to zero and any
/// bounds to a zero width cell at zero. All that can still differ is the metadata and whether the
/// coordinate has bounds at all. Storage type and coordinate kind are already gone, since
/// `Coord::points` and `Coord::bounds` promote everything to `f64`.
///
#[derive(Debug, PartialEq)]
struct Reduced<M> {
    metadata: M,
    bounded: bool,
}

fn reduced<C: Coord>(coord: &C) -> Reduced<C::Metadata> {
    Reduced {
        metadata: coord.metadata(),
        bounded: coord.has_bounds(),
    }
}

/// The sorted values at every combination of first and last index along each axis.
///
/// That's `2^ndim` values, regardless of the size of the array. An axis of length one contributes
/// its only index twice. An axis of length zero has no end points, which is an error.
///
pub fn corner_values(array: ArrayViewD<f64>) -> Result<Vec<f64>> {
    let ndim = array.ndim();
    let mut corners: CowArray<f64, IxDyn> = array.into();
    for axis in 0..ndim {
        let len = corners.len_of(Axis(axis));
        if len == 0 {
            return Err(Error::EmptyAxis { axis });
        }
        corners = corners.select(Axis(axis), &[0, len - 1]).into();
    }

    let mut values: Vec<f64> = corners.iter().copied().collect();
    values.sort_by(|a, b| a.total_cmp(b));

    Ok(values)
}

/// Corner values of a coordinate's points, followed by the corner values of its bounds, if any.
pub fn endpoint_values<C: Coord>(coord: &C) -> Result<Vec<f64>> {
    let mut values = corner_values(coord.points().view())?;
    if let Some(bounds) = coord.bounds() {
        values.extend(corner_values(bounds.view())?);
    }

    Ok(values)
}

pub(crate) fn compare_coords<C: Coord>(
    reference: &C,
    candidate: &C,
    tolerance: &Tolerance,
) -> Comparison {
    let name = candidate.name();
    if reduced(candidate) != reduced(reference) {
        debug!(coord = %name, "metadata differs");
        return Comparison::mismatch(format!("Coords '{name}' have different metadata."));
    }

    let close = endpoint_values(reference).and_then(|reference| {
        let candidate = endpoint_values(candidate)?;
        tolerance.allclose(&candidate, &reference)
    });
    match close {
        Ok(true) => {}
        Ok(false) => {
            debug!(coord = %name, "end point values differ");
            return Comparison::mismatch(format!(
                "Coords '{name}' have significantly different values."
            ));
        }
        Err(err) => {
            debug!(coord = %name, error = %err, "end point values not comparable");
            return Comparison::mismatch(format!("Coords '{name}' could not be compared: {err}."));
        }
    }

    let (notes, alignment) = soft_check(reference, candidate);
    if !notes.is_empty() {
        trace!(coord = %name, ?notes, "soft differences");
        return Comparison::soft(notes);
    }

    // With no soft differences there is always an alignment. Orient the candidate like the
    // reference and let the container have the final say.
    let aligned = alignment
        .unwrap_or_default()
        .into_iter()
        .fold(candidate.clone(), |coord, axis| coord.reversed(axis));
    if aligned != *reference {
        trace!(coord = %name, "native equality disagrees");
        return Comparison::soft(vec![String::from("Unidentified difference?")]);
    }

    Comparison::matched()
}

/// Differences between two coordinates that don't stop them representing the same thing.
///
/// Points (or bounds) only count as different when no combination of axis inversions makes the
/// candidate match the reference exactly.
///
pub fn soft_differences<C: Coord>(reference: &C, candidate: &C) -> Vec<String> {
    soft_check(reference, candidate).0
}

/// Returns the soft differences, and the axes along which the candidate must be inverted to line
/// up with the reference, if there are any such axes.
///
fn soft_check<C: Coord>(reference: &C, candidate: &C) -> (Vec<String>, Option<Vec<usize>>) {
    let name = candidate.name();
    let mut notes = vec![];

    let (ref_shape, cand_shape) = (reference.shape(), candidate.shape());
    if ref_shape != cand_shape {
        notes.push(format!(
            "Coord '{name}' shapes differ: {} vs {}.",
            fmt_shape(&ref_shape),
            fmt_shape(&cand_shape)
        ));
    }

    let (ref_bounds, cand_bounds) = (reference.bounds(), candidate.bounds());
    if ref_bounds.is_some() != cand_bounds.is_some() {
        notes.push(format!("Coord '{name}' has bounds on only one side."));
    }

    if ref_shape != cand_shape {
        return (notes, None);
    }

    // Bounds are inverted along the points axes, so they must have those axes and one more.
    let fits = |bounds: &ArrayD<f64>| {
        bounds.ndim() == ref_shape.len() + 1 && bounds.shape()[..ref_shape.len()] == ref_shape[..]
    };
    if ref_bounds.iter().chain(&cand_bounds).any(|bounds| !fits(bounds)) {
        notes.push(format!("Coord '{name}' bounds don't fit its points."));
        return (notes, None);
    }

    let ref_points = reference.points();
    let cand_points = candidate.points();
    let aligned: Vec<Vec<usize>> = inversions(ref_shape.len())
        .filter(|axes| inverted(&cand_points, axes) == ref_points.view())
        .collect();
    if aligned.is_empty() {
        notes.push(format!("Coord '{name}' points differ beyond their end points."));
        return (notes, None);
    }

    let alignment = match (&ref_bounds, &cand_bounds) {
        (Some(ref_bounds), Some(cand_bounds)) => {
            let found = aligned
                .iter()
                .find(|axes| inverted(cand_bounds, axes) == ref_bounds.view());
            if found.is_none() {
                notes.push(format!("Coord '{name}' bounds differ beyond their end points."));
            }
            found.cloned()
        }
        _ => aligned.into_iter().next(),
    };

    (notes, alignment)
}

/// Every subset of the axes `0..ndim`, starting with the empty one.
fn inversions(ndim: usize) -> impl Iterator<Item = Vec<usize>> {
    (0_u64..1 << ndim).map(move |mask| {
        (0..ndim)
            .filter(|&axis| mask & (1 << axis) != 0)
            .collect()
    })
}

fn inverted<'a>(array: &'a ArrayD<f64>, axes: &[usize]) -> ArrayViewD<'a, f64> {
    let mut view = array.view();
    for &axis in axes {
        view.invert_axis(Axis(axis));
    }

    view
}

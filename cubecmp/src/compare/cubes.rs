use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::{
    errors::{Error, Result},
    helpers::{fmt_names, fmt_shape},
    tolerance::Tolerance,
    traits::{Coord, Cube},
};

use super::{coords::compare_coords, Comparison};

pub(crate) fn compare_cubes<C: Cube>(
    reference: &C,
    candidate: &C,
    tolerance: &Tolerance,
) -> Result<Comparison> {
    let mut notes = vec![];

    // Sorted shapes, so that dimensions may come in any order
    let (ref_shape, cand_shape) = (reference.shape(), candidate.shape());
    if sorted(&ref_shape) != sorted(&cand_shape) {
        debug!(cube = %reference.name(), "shapes are incompatible");
        return Ok(Comparison::mismatch("Cube shapes are incompatible."));
    }
    if ref_shape != cand_shape {
        notes.push(format!(
            "Cube shapes differ in dimension order: {} vs {}.",
            fmt_shape(&ref_shape),
            fmt_shape(&cand_shape)
        ));
    }

    if reference.metadata() != candidate.metadata() {
        debug!(cube = %reference.name(), "metadata differs");
        return Ok(Comparison::mismatch(format!(
            "Cubes '{}' have different metadata.",
            reference.name()
        )));
    }

    let ref_names = coord_names(reference)?;
    let cand_names = coord_names(candidate)?;
    if ref_names != cand_names {
        debug!(cube = %reference.name(), "coords differ");
        return Ok(Comparison::mismatch(coord_sets_message(
            reference, &ref_names, &cand_names,
        )));
    }

    let ref_dims = dimension_coords(reference)?;
    let cand_dims = dimension_coords(candidate)?;
    let ref_groups: BTreeSet<&BTreeSet<String>> = ref_dims.iter().collect();
    let cand_groups: BTreeSet<&BTreeSet<String>> = cand_dims.iter().collect();
    if ref_groups != cand_groups {
        debug!(cube = %reference.name(), "dimension mappings are incompatible");
        return Ok(Comparison::mismatch(
            "Cubes have incompatible dimension mappings.",
        ));
    }
    if ref_dims != cand_dims {
        notes.push(String::from("Cube dimension order differs."));
    }

    // Compare the coords themselves, allowing for inverted dimensions
    for name in &ref_names {
        let ref_coord = lookup(reference, name)?;
        let cand_coord = lookup(candidate, name)?;
        let comparison = compare_coords(ref_coord, cand_coord, tolerance);
        if !comparison.equal {
            return Ok(comparison);
        }
        if !comparison.diagnostic.is_empty() {
            notes.push(comparison.diagnostic);
        }
    }

    // The tolerant checks found nothing at all. Make sure a strict comparison agrees.
    if notes.is_empty() {
        for name in &ref_names {
            if lookup(reference, name)? != lookup(candidate, name)? {
                notes.push(format!("Coord '{name}' differs under exact comparison."));
            }
        }
    }

    if !notes.is_empty() {
        trace!(cube = %reference.name(), ?notes, "soft differences");
    }

    Ok(Comparison::soft(notes))
}

fn sorted(shape: &[usize]) -> Vec<usize> {
    let mut shape = shape.to_vec();
    shape.sort_unstable();

    shape
}

/// Sorted names of all the coordinates on `cube`.
///
/// Coordinates are identified by name alone, so a cube with two coordinates of the same name is an
/// error.
///
fn coord_names<C: Cube>(cube: &C) -> Result<Vec<String>> {
    let mut names: Vec<String> = cube.coords().iter().map(|coord| coord.name()).collect();
    names.sort();
    for pair in names.windows(2) {
        if pair[0] == pair[1] {
            return Err(Error::DuplicateCoordName {
                cube: cube.name(),
                name: pair[0].clone(),
            });
        }
    }

    Ok(names)
}

fn coord_sets_message<C: Cube>(
    reference: &C,
    ref_names: &[String],
    cand_names: &[String],
) -> String {
    let missing: Vec<String> = ref_names
        .iter()
        .filter(|name| !cand_names.contains(name))
        .cloned()
        .collect();
    let extra: Vec<String> = cand_names
        .iter()
        .filter(|name| !ref_names.contains(name))
        .cloned()
        .collect();

    let mut message = String::from("Cubes have different sets of coords: ");
    if !missing.is_empty() {
        message += &format!("coords {} not found", fmt_names(&missing));
    }
    if !extra.is_empty() {
        if !missing.is_empty() {
            message += " and ";
        }
        message += &format!("additional coords {}", fmt_names(&extra));
    }
    message += &format!(" in second \"{}\" cube.", reference.name());

    message
}

/// For each dimension of `cube`, the names of the coordinates that span it.
fn dimension_coords<C: Cube>(cube: &C) -> Result<Vec<BTreeSet<String>>> {
    let ndim = cube.ndim();
    let mut per_dim = vec![BTreeSet::new(); ndim];
    for coord in cube.coords() {
        for dim in cube.coord_dims(coord) {
            let names = per_dim
                .get_mut(dim)
                .ok_or(Error::DimOutOfRange { dim, ndim })?;
            names.insert(coord.name());
        }
    }

    Ok(per_dim)
}

fn lookup<'a, C: Cube>(cube: &'a C, name: &str) -> Result<&'a C::Coord> {
    cube.coord(name).ok_or_else(|| Error::MissingCoord {
        cube: cube.name(),
        name: name.to_string(),
    })
}

use ndarray::{arr1, arr2, arr3, Array, Array3};

use crate::{coord::MemCoord, cube::MemCube, metadata::Metadata};

/// A 1-d coordinate, "a", with points 1 to 4.
pub(crate) fn coord_1d() -> MemCoord {
    MemCoord::dim(arr1(&[1_i32, 2, 3, 4])).with_long_name("a")
}

/// `coord_1d` with contiguous bounds.
pub(crate) fn coord_1d_bounded() -> MemCoord {
    let mut coord = coord_1d();
    coord
        .guess_bounds()
        .expect("four points is enough to guess bounds");

    coord
}

/// A 3-d auxiliary coordinate, "b", whose corner values are all different.
pub(crate) fn coord_3d() -> MemCoord {
    MemCoord::aux(arr3(&[[[1_i32, 2, 3], [6, 5, 4]], [[0, 0, 1], [9, 9, 9]]])).with_long_name("b")
}

/// The 2x3 cube "a" with dimension coordinates "y" (21, 22) and "x" (11, 12, 13).
pub(crate) fn cube_yx() -> MemCube {
    let mut cube = MemCube::new(
        arr2(&[[1_i32, 2, 3], [4, 5, 6]]),
        Metadata::new().with_long_name("a"),
    );
    let x = MemCoord::dim(arr1(&[11_i32, 12, 13])).with_long_name("x");
    let y = MemCoord::dim(arr1(&[21_i32, 22])).with_long_name("y");
    cube.add_dim_coord(x, 1).expect("x fits dimension 1");
    cube.add_dim_coord(y, 0).expect("y fits dimension 0");

    cube
}

/// A 4x2x3 cube of air temperature with bounded dimension coordinates on every dimension and a
/// 2-d auxiliary coordinate spanning the last two.
pub(crate) fn cube_zyx() -> MemCube {
    let data: Array3<f32> = Array::from_shape_fn((4, 2, 3), |(z, y, x)| (z * 6 + y * 3 + x) as f32);
    let mut cube = MemCube::new(
        data,
        Metadata::new()
            .with_standard_name("air_temperature")
            .with_units("K")
            .with_attribute("source", "Data from Met Office Unified Model"),
    );

    let mut z = MemCoord::dim(arr1(&[1000.0_f32, 850.0, 500.0, 250.0]))
        .with_standard_name("pressure")
        .with_units("hPa");
    let mut y = MemCoord::dim(arr1(&[-45.0_f64, 45.0]))
        .with_standard_name("latitude")
        .with_units("degrees");
    let mut x = MemCoord::dim(arr1(&[0.0_f64, 120.0, 240.0]))
        .with_standard_name("longitude")
        .with_units("degrees");
    for coord in [&mut z, &mut y, &mut x] {
        coord
            .guess_bounds()
            .expect("every coordinate has at least two points");
    }
    let area = MemCoord::aux(arr2(&[[1_i64, 2, 3], [4, 5, 6]])).with_long_name("area_index");

    cube.add_dim_coord(z, 0).expect("z fits dimension 0");
    cube.add_dim_coord(y, 1).expect("y fits dimension 1");
    cube.add_dim_coord(x, 2).expect("x fits dimension 2");
    cube.add_aux_coord(area, &[1, 2])
        .expect("area fits dimensions 1 and 2");

    cube
}

use std::fs;
use std::path::Path;

use ndarray::{arr0, arr1};

use cubecmp::{CubeList, MemCoord, MemCube, Metadata, Values};

pub(crate) fn cube(name: &str) -> MemCube {
    let mut cube = MemCube::new(
        arr1(&[1.5_f32, 2.5, 3.5]),
        Metadata::new().with_long_name(name),
    );
    let x = MemCoord::dim(arr1(&[10_i32, 20, 30])).with_long_name("x");
    cube.add_dim_coord(x, 0).expect("coord fits");

    cube
}

/// The same cube with its only dimension running the other way.
pub(crate) fn inverted(name: &str) -> MemCube {
    cube(name).reversed(0).expect("dimension exists")
}

pub(crate) fn write_cubes(path: &Path, cubes: &CubeList) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("make parent dirs");
    }
    let json = serde_json::to_string(cubes).expect("serialize cubes");
    fs::write(path, json).expect("write cubes");
}

/// `cube(name)` written with a single scalar bound on its 3-point coordinate.
pub(crate) fn write_misshapen_bounds(path: &Path, name: &str) {
    let mut json = serde_json::to_value(CubeList::from(vec![cube(name)])).expect("serialize");
    json[0]["coords"][0]["coord"]["bounds"] =
        serde_json::to_value(Values::from(arr0(5.0_f64))).expect("serialize bounds");
    fs::write(path, json.to_string()).expect("write cubes");
}

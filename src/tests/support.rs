use crate::mesh::{Element, LandCover, Node, Soil};
use crate::model::ModelData;
use crate::timeseries::Timeseries;

pub fn constant_series(value: f64) -> Timeseries {
    let mut ts = Timeseries::new();
    ts.push(0.0, value);
    ts
}

pub fn node(index: usize, x: f64, y: f64, zmin: f64, zmax: f64) -> Node {
    Node {
        index,
        x,
        y,
        zmin,
        zmax,
    }
}

fn element(index: usize, nodes: [usize; 3], nabrs: [i32; 3]) -> Element {
    let mut ele = Element::default();
    ele.index = index;
    ele.node = nodes;
    ele.nabr = nabrs;
    ele.soil = 1;
    ele.lc = 1;
    ele.ic = 1;
    ele.bc = 0;
    ele.prep = 1;
    ele.temp = 1;
    ele.humidity = 1;
    ele.wind_vel = 1;
    ele.rn = 1;
    ele.g = 1;
    ele.pressure = 1;
    ele.lai = 1;
    ele.source = 0;
    ele
}

pub fn test_soil() -> Soil {
    Soil {
        index: 1,
        ksat: 1e-4,
        sita_s: 0.5,
        sita_r: 0.1,
        alpha: 2.0,
        beta: 1.5,
        macropore: 0,
        base: 1.0,
        gama: 1.5,
        sf: 0.0,
        rough: 0.05,
        inf: 1,
    }
}

pub fn test_land_cover() -> LandCover {
    LandCover {
        index: 1,
        lai_max: 24.0,
        rmin: 100.0,
        albedo: 0.23,
        veg_frac: 1.0,
    }
}

fn attach_quiet_forcing(md: &mut ModelData) {
    md.tsd_prep = vec![constant_series(0.0)];
    md.tsd_temp = vec![constant_series(20.0)];
    md.tsd_humidity = vec![constant_series(0.5)];
    md.tsd_wind_vel = vec![constant_series(0.0)];
    md.tsd_rn = vec![constant_series(0.0)];
    md.tsd_g = vec![constant_series(0.0)];
    md.tsd_pressure = vec![constant_series(101.325)];
    md.tsd_lai = vec![constant_series(0.0)];
    md.si_factor = vec![1.0];
    md.tsd_inc = vec![constant_series(0.0)];
}

/*
Two right triangles over the unit square, sharing the diagonal from (0,0)
to (1,1). Flat terrain, natural boundaries everywhere, quiet forcing.
 */
pub fn two_element_model() -> ModelData {
    let mut md = ModelData::new();
    md.node = vec![
        node(1, 0.0, 0.0, 0.0, 10.0),
        node(2, 1.0, 0.0, 0.0, 10.0),
        node(3, 1.0, 1.0, 0.0, 10.0),
        node(4, 0.0, 1.0, 0.0, 10.0),
    ];
    //edge 2 of the first element and edge 0 of the second are the diagonal
    md.ele = vec![element(1, [1, 2, 3], [0, 0, 2]), element(2, [1, 3, 4], [1, 0, 0])];
    md.soil = vec![test_soil()];
    md.land_cover = vec![test_land_cover()];
    attach_quiet_forcing(&mut md);

    md.derive_geometry();
    md.resolve_attributes().unwrap();
    md.allocate_scratch();
    md
}

/// A single triangle with natural boundaries on all three edges.
pub fn single_element_model() -> ModelData {
    let mut md = ModelData::new();
    md.node = vec![
        node(1, 0.0, 0.0, 0.0, 10.0),
        node(2, 1.0, 0.0, 0.0, 10.0),
        node(3, 0.0, 1.0, 0.0, 10.0),
    ];
    md.ele = vec![element(1, [1, 2, 3], [0, 0, 0])];
    md.soil = vec![test_soil()];
    md.land_cover = vec![test_land_cover()];
    attach_quiet_forcing(&mut md);

    md.derive_geometry();
    md.resolve_attributes().unwrap();
    md.allocate_scratch();
    md
}

use crate::mesh::{RiverMaterial, RiverSegment, RiverShape};

/*
The two-element square with a two-reach channel along the diagonal: node 1
-> midpoint -> node 3, element 1 on the left bank and element 2 on the
right, critical-depth outlet at the downstream end.
 */
pub fn river_model() -> ModelData {
    let mut md = two_element_model();
    md.node.push(node(5, 0.5, 0.5, 0.0, 10.0));

    let mut up = RiverSegment::default();
    up.index = 1;
    up.from_node = 1;
    up.to_node = 5;
    up.down = 2;
    up.left_ele = 1;
    up.right_ele = 2;
    up.shape = 1;
    up.material = 1;
    up.ic = 1;
    up.bc = 0;

    let mut down = RiverSegment::default();
    down.index = 2;
    down.from_node = 5;
    down.to_node = 3;
    down.down = -4;
    down.left_ele = 1;
    down.right_ele = 2;
    down.shape = 1;
    down.material = 1;
    down.ic = 1;
    down.bc = 0;

    md.riv = vec![up, down];
    md.riv_shape = vec![RiverShape {
        index: 1,
        width: 2.0,
        depth: 1.5,
        bed: 0.0,
    }];
    md.riv_mat = vec![RiverMaterial {
        index: 1,
        rough: 0.03,
        cwr: 0.6,
        sf: 0.0,
    }];

    md.derive_geometry();
    md.allocate_scratch();
    md
}

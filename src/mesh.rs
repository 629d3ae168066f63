// Mesh tables for the triangulated watershed and the 1-D channel network.
// All cross-references are plain one-based indices into the owning vectors;
// a neighbour/downstream value <= 0 marks a boundary and carries the
// boundary-condition code.

#[derive(Debug)]
#[derive(Default)]
#[derive(Clone)]
pub struct Node {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub zmin: f64,              //bedrock elevation
    pub zmax: f64,              //surface elevation
}

#[derive(Debug)]
#[derive(Default)]
#[derive(Clone)]
pub struct Element {
    pub index: usize,
    pub node: [usize; 3],       //anti-clock-wise
    pub nabr: [i32; 3],         //neighbour i shares edge i (<= 0: on boundary)

    pub edge: [f64; 3],         //edge i runs from node i to node i+1
    pub area: f64,
    pub x: f64,                 //x of centroid (or circumcenter)
    pub y: f64,
    pub zmin: f64,              //mean bedrock elevation
    pub zmax: f64,              //mean surface elevation

    //Hydraulic attributes resolved from the soil class
    pub ksat: f64,
    pub porosity: f64,          //theta_s - theta_r
    pub alpha: f64,
    pub beta: f64,
    pub sf: f64,                //friction slope threshold
    pub rough: f64,             //Manning roughness

    //Land-cover attributes resolved from the land-cover class
    pub lai_max: f64,
    pub rmin: f64,              //minimum stomatal resistance
    pub albedo: f64,
    pub veg_frac: f64,

    //Classes and forcing series selectors (one-based)
    pub soil: usize,
    pub lc: usize,
    pub ic: usize,
    pub bc: i32,                //0: natural; >0: Dirichlet; <0: Neumann
    pub prep: usize,
    pub temp: usize,
    pub humidity: usize,
    pub wind_vel: usize,
    pub rn: usize,
    pub g: usize,
    pub pressure: usize,
    pub lai: usize,
    pub source: usize,
}

impl Element {
    /// Available column for saturated storage.
    pub fn aquifer_depth(&self) -> f64 {
        self.zmax - self.zmin
    }
}

#[derive(Debug)]
#[derive(Default)]
#[derive(Clone)]
pub struct ElementIc {
    pub index: usize,
    pub interception: f64,
    pub surf: f64,
    pub unsat: f64,
    pub sat: f64,
}

#[derive(Debug)]
#[derive(Default)]
#[derive(Clone)]
pub struct Soil {
    pub index: usize,
    pub ksat: f64,
    pub sita_s: f64,            //porosity
    pub sita_r: f64,            //residual moisture
    pub alpha: f64,
    pub beta: f64,
    pub macropore: i32,         //1: macropore soil; 0: regular
    pub base: f64,              //saturation above which macropores respond
    pub gama: f64,              //macropore amplifier exponent
    pub sf: f64,
    pub rough: f64,
    pub inf: usize,             //infiltration-capacity series (one-based)
}

#[derive(Debug)]
#[derive(Default)]
#[derive(Clone)]
pub struct LandCover {
    pub index: usize,
    pub lai_max: f64,
    pub rmin: f64,
    pub albedo: f64,
    pub veg_frac: f64,
}

#[derive(Debug)]
#[derive(Default)]
#[derive(Clone)]
pub struct RiverSegment {
    pub index: usize,

    pub x: f64,                 //midpoint of the segment
    pub y: f64,
    pub zmin: f64,              //bed elevation
    pub zmax: f64,              //bank elevation
    pub depth: f64,             //max depth from the shape table
    pub length: f64,

    pub from_node: usize,
    pub to_node: usize,
    pub down: i32,              //downstream segment; <= 0: outlet with BC code
    pub left_ele: usize,        //0 if absent
    pub right_ele: usize,       //0 if absent
    pub shape: usize,
    pub material: usize,
    pub ic: usize,
    pub bc: usize,
    pub reservoir: usize,
}

#[derive(Debug)]
#[derive(Default)]
#[derive(Clone)]
pub struct RiverShape {
    pub index: usize,
    pub width: f64,             //rectangular section assumed
    pub depth: f64,
    pub bed: f64,
}

#[derive(Debug)]
#[derive(Default)]
#[derive(Clone)]
pub struct RiverMaterial {
    pub index: usize,
    pub rough: f64,
    pub cwr: f64,               //weir discharge coefficient
    pub sf: f64,
}

#[derive(Debug)]
#[derive(Default)]
#[derive(Clone)]
pub struct RiverIc {
    pub index: usize,
    pub value: f64,
}

/// Which point stands in for the element in neighbour distances. Both
/// variants exist in the field; centroid is the default.
#[derive(Debug)]
#[derive(Clone, Copy)]
#[derive(PartialEq)]
pub enum GeomMode {
    Centroid,
    Circumcenter,
}

impl Default for GeomMode {
    fn default() -> GeomMode {
        GeomMode::Centroid
    }
}

/*
Derives area, mean elevations, edge lengths and the representative (x, y)
for one element from its node coordinates. The circumcenter expression
consumes the squared edge lengths, so those are formed first and rooted at
the end.
 */
pub fn derive_element_geometry(ele: &mut Element, nodes: &[Node], mode: GeomMode) {
    let a = &nodes[ele.node[0] - 1];
    let b = &nodes[ele.node[1] - 1];
    let c = &nodes[ele.node[2] - 1];

    ele.area = 0.5 * ((b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x));
    ele.zmin = (a.zmin + b.zmin + c.zmin) / 3.0;
    ele.zmax = (a.zmax + b.zmax + c.zmax) / 3.0;

    let e2 = [
        (a.x - b.x) * (a.x - b.x) + (a.y - b.y) * (a.y - b.y),
        (b.x - c.x) * (b.x - c.x) + (b.y - c.y) * (b.y - c.y),
        (c.x - a.x) * (c.x - a.x) + (c.y - a.y) * (c.y - a.y),
    ];

    match mode {
        GeomMode::Centroid => {
            ele.x = (a.x + b.x + c.x) / 3.0;
            ele.y = (a.y + b.y + c.y) / 3.0;
        }
        GeomMode::Circumcenter => {
            ele.x = a.x - ((b.y - a.y) * e2[2] - (c.y - a.y) * e2[0]) / (4.0 * ele.area);
            ele.y = a.y + ((b.x - a.x) * e2[2] - (c.x - a.x) * e2[0]) / (4.0 * ele.area);
        }
    }

    ele.edge[0] = e2[0].sqrt();
    ele.edge[1] = e2[1].sqrt();
    ele.edge[2] = e2[2].sqrt();
}

/*
Derives the midpoint, bank/bed elevations and length of one river segment.
The bed sits one shape-depth below the mean bank elevation.
 */
pub fn derive_river_geometry(riv: &mut RiverSegment, nodes: &[Node], shapes: &[RiverShape]) {
    let from = &nodes[riv.from_node - 1];
    let to = &nodes[riv.to_node - 1];

    riv.x = (from.x + to.x) / 2.0;
    riv.y = (from.y + to.y) / 2.0;
    riv.zmax = (from.zmax + to.zmax) / 2.0;
    riv.depth = shapes[riv.shape - 1].depth;
    riv.zmin = riv.zmax - riv.depth;
    riv.length = ((from.x - to.x) * (from.x - to.x) + (from.y - to.y) * (from.y - to.y)).sqrt();
}

/// Euclidean distance between two stored representative points.
pub fn point_distance(x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
    ((x0 - x1) * (x0 - x1) + (y0 - y1) * (y0 - y1)).sqrt()
}

/// Distance used for a Dirichlet boundary edge. The expression keeps the
/// historical inradius-style form sqrt((e0*e1*e2/4A)^2 - (e_j/2)^2) for
/// bit-reproducibility; it is not the perpendicular from the centroid.
pub fn boundary_edge_distance(ele: &Element, j: usize) -> f64 {
    let r = ele.edge[0] * ele.edge[1] * ele.edge[2] / (4.0 * ele.area);
    let half = ele.edge[j] / 2.0;
    (r * r - half * half).sqrt()
}

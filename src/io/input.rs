use std::fs;

use crate::hydrology::balance::UnsatMode;
use crate::hydrology::channel::ChannelMode;
use crate::hydrology::overland::SurfaceMode;
use crate::mesh::{
    Element, ElementIc, GeomMode, LandCover, Node, RiverIc, RiverMaterial, RiverSegment,
    RiverShape, Soil,
};
use crate::misc::configuration::{Control, SolverChoice};
use crate::model::ModelData;
use crate::timeseries::Timeseries;

// All decks are plain whitespace-separated text sharing one filename stem.
// Loading is strictly one pass per file; every error names the file and the
// field that broke.

struct DeckReader {
    file: String,
    tokens: Vec<String>,
    pos: usize,
}

impl DeckReader {
    fn open(path: &str) -> Result<DeckReader, String> {
        let content = fs::read_to_string(path)
            .map_err(|_| format!("Fatal error: {} is in use or does not exist", path))?;
        Ok(DeckReader {
            file: path.to_string(),
            tokens: content.split_whitespace().map(|s| s.to_string()).collect(),
            pos: 0,
        })
    }

    fn has_more(&self) -> bool {
        self.pos < self.tokens.len()
    }

    fn next_token(&mut self, field: &str) -> Result<String, String> {
        if self.pos >= self.tokens.len() {
            return Err(format!("{}: file truncated while reading {}", self.file, field));
        }
        self.pos += 1;
        Ok(self.tokens[self.pos - 1].clone())
    }

    fn next_f64(&mut self, field: &str) -> Result<f64, String> {
        let tok = self.next_token(field)?;
        tok.parse()
            .map_err(|_| format!("{}: field {} has invalid value '{}'", self.file, field, tok))
    }

    fn next_i32(&mut self, field: &str) -> Result<i32, String> {
        let tok = self.next_token(field)?;
        tok.parse()
            .map_err(|_| format!("{}: field {} has invalid value '{}'", self.file, field, tok))
    }

    fn next_usize(&mut self, field: &str) -> Result<usize, String> {
        let tok = self.next_token(field)?;
        tok.parse()
            .map_err(|_| format!("{}: field {} has invalid value '{}'", self.file, field, tok))
    }

    /// name, index, length and the tabulated pairs of one time series.
    fn next_series(&mut self) -> Result<Timeseries, String> {
        let name = self.next_token("series name")?;
        let _index = self.next_usize("series index")?;
        let length = self.next_usize("series length")?;
        let mut ts = Timeseries::with_name(&name);
        for _ in 0..length {
            let t = self.next_f64("series time")?;
            let v = self.next_f64("series value")?;
            ts.push(t, v);
        }
        Ok(ts)
    }

    /// Same, with the canopy capacity factor wedged after the length (the
    /// layout used by the LAI section of the .forc deck).
    fn next_series_with_factor(&mut self) -> Result<(Timeseries, f64), String> {
        let name = self.next_token("series name")?;
        let _index = self.next_usize("series index")?;
        let length = self.next_usize("series length")?;
        let factor = self.next_f64("series SIFactor")?;
        let mut ts = Timeseries::with_name(&name);
        for _ in 0..length {
            let t = self.next_f64("series time")?;
            let v = self.next_f64("series value")?;
            ts.push(t, v);
        }
        Ok((ts, factor))
    }
}

/*
Reads the eight input decks sharing `stem` and assembles the raw model and
control records. Geometry derivation, attribute resolution and validation
happen afterwards, on the assembled model.
 */
pub fn read_model(stem: &str) -> Result<(ModelData, Control), String> {
    let mut md = ModelData::new();

    println!("\nReading input decks for '{}' ...", stem);
    read_mesh(&format!("{}.mesh", stem), &mut md)?;
    read_att(&format!("{}.att", stem), &mut md)?;
    read_soil(&format!("{}.soil", stem), &mut md)?;
    read_lc(&format!("{}.lc", stem), &mut md)?;
    read_riv(&format!("{}.riv", stem), &mut md)?;
    read_forc(&format!("{}.forc", stem), &mut md)?;
    read_ibc(&format!("{}.ibc", stem), &mut md)?;
    let control = read_para(&format!("{}.para", stem), &mut md)?;
    println!("  done.");

    Ok((md, control))
}

fn read_mesh(path: &str, md: &mut ModelData) -> Result<(), String> {
    let mut r = DeckReader::open(path)?;
    let num_ele = r.next_usize("NumEle")?;
    let num_node = r.next_usize("NumNode")?;

    md.ele = Vec::with_capacity(num_ele);
    for _ in 0..num_ele {
        let mut ele = Element::default();
        ele.index = r.next_usize("element id")?;
        for k in 0..3 {
            ele.node[k] = r.next_usize("element node id")?;
        }
        for k in 0..3 {
            ele.nabr[k] = r.next_i32("element neighbour id")?;
        }
        md.ele.push(ele);
    }

    md.node = Vec::with_capacity(num_node);
    for _ in 0..num_node {
        let mut node = Node::default();
        node.index = r.next_usize("node id")?;
        node.x = r.next_f64("node x")?;
        node.y = r.next_f64("node y")?;
        node.zmin = r.next_f64("node zmin")?;
        node.zmax = r.next_f64("node zmax")?;
        md.node.push(node);
    }
    Ok(())
}

fn read_att(path: &str, md: &mut ModelData) -> Result<(), String> {
    let mut r = DeckReader::open(path)?;
    for i in 0..md.ele.len() {
        let _id = r.next_usize("attribute row id")?;
        let ele = &mut md.ele[i];
        ele.soil = r.next_usize("soil class")?;
        ele.lc = r.next_usize("land-cover class")?;
        ele.ic = r.next_usize("IC index")?;
        ele.bc = r.next_i32("BC code")?;
        ele.prep = r.next_usize("precipitation series")?;
        ele.temp = r.next_usize("temperature series")?;
        ele.humidity = r.next_usize("humidity series")?;
        ele.wind_vel = r.next_usize("wind velocity series")?;
        ele.rn = r.next_usize("net radiation series")?;
        ele.g = r.next_usize("ground heat series")?;
        ele.pressure = r.next_usize("pressure series")?;
        ele.lai = r.next_usize("LAI series")?;
        ele.source = r.next_usize("source series")?;
    }
    Ok(())
}

fn read_soil(path: &str, md: &mut ModelData) -> Result<(), String> {
    let mut r = DeckReader::open(path)?;
    let num_soil = r.next_usize("NumSoil")?;
    md.soil = Vec::with_capacity(num_soil);
    for _ in 0..num_soil {
        let mut soil = Soil::default();
        soil.index = r.next_usize("soil id")?;
        soil.ksat = r.next_f64("Ksat")?;
        soil.sita_s = r.next_f64("SitaS")?;
        soil.sita_r = r.next_f64("SitaR")?;
        soil.alpha = r.next_f64("Alpha")?;
        soil.beta = r.next_f64("Beta")?;
        soil.macropore = r.next_i32("Macropore")?;
        soil.base = r.next_f64("base")?;
        soil.gama = r.next_f64("gama")?;
        soil.sf = r.next_f64("Sf")?;
        soil.rough = r.next_f64("Rough")?;
        soil.inf = r.next_usize("Inf")?;
        md.soil.push(soil);
    }

    let num_inc = r.next_usize("NumInc")?;
    md.tsd_inc = Vec::with_capacity(num_inc);
    for _ in 0..num_inc {
        md.tsd_inc.push(r.next_series()?);
    }
    Ok(())
}

fn read_lc(path: &str, md: &mut ModelData) -> Result<(), String> {
    let mut r = DeckReader::open(path)?;
    let num_lc = r.next_usize("NumLC")?;
    md.land_cover = Vec::with_capacity(num_lc);
    for _ in 0..num_lc {
        let mut lc = LandCover::default();
        lc.index = r.next_usize("land-cover id")?;
        lc.lai_max = r.next_f64("LAImax")?;
        lc.rmin = r.next_f64("Rmin")?;
        lc.albedo = r.next_f64("Albedo")?;
        lc.veg_frac = r.next_f64("VegFrac")?;
        md.land_cover.push(lc);
    }
    Ok(())
}

fn read_riv(path: &str, md: &mut ModelData) -> Result<(), String> {
    let mut r = DeckReader::open(path)?;
    let num_riv = r.next_usize("NumRiv")?;
    md.riv = Vec::with_capacity(num_riv);
    for _ in 0..num_riv {
        let mut riv = RiverSegment::default();
        riv.index = r.next_usize("river id")?;
        riv.from_node = r.next_usize("river from node")?;
        riv.to_node = r.next_usize("river to node")?;
        riv.down = r.next_i32("river down segment")?;
        riv.left_ele = r.next_usize("river left element")?;
        riv.right_ele = r.next_usize("river right element")?;
        riv.shape = r.next_usize("river shape")?;
        riv.material = r.next_usize("river material")?;
        riv.ic = r.next_usize("river IC")?;
        riv.bc = r.next_usize("river BC")?;
        riv.reservoir = r.next_usize("river reservoir")?;
        md.riv.push(riv);
    }

    let _label = r.next_token("Shape label")?;
    let num_shape = r.next_usize("NumRivShape")?;
    md.riv_shape = Vec::with_capacity(num_shape);
    for _ in 0..num_shape {
        let mut shape = RiverShape::default();
        shape.index = r.next_usize("shape id")?;
        shape.width = r.next_f64("shape width")?;
        shape.depth = r.next_f64("shape depth")?;
        shape.bed = r.next_f64("shape bed")?;
        md.riv_shape.push(shape);
    }

    let _label = r.next_token("Material label")?;
    let num_mat = r.next_usize("NumRivMaterial")?;
    md.riv_mat = Vec::with_capacity(num_mat);
    for _ in 0..num_mat {
        let mut mat = RiverMaterial::default();
        mat.index = r.next_usize("material id")?;
        mat.rough = r.next_f64("material Rough")?;
        mat.cwr = r.next_f64("material Cwr")?;
        mat.sf = r.next_f64("material Sf")?;
        md.riv_mat.push(mat);
    }

    let _label = r.next_token("IC label")?;
    let num_ic = r.next_usize("NumRivIC")?;
    md.riv_ic = Vec::with_capacity(num_ic);
    for _ in 0..num_ic {
        let mut ic = RiverIc::default();
        ic.index = r.next_usize("river IC id")?;
        ic.value = r.next_f64("river IC value")?;
        md.riv_ic.push(ic);
    }

    let _label = r.next_token("BC label")?;
    let num_bc = r.next_usize("NumRivBC")?;
    md.tsd_riv = Vec::with_capacity(num_bc);
    for _ in 0..num_bc {
        md.tsd_riv.push(r.next_series()?);
    }

    //Reservoirs are counted but not modelled
    let _label = r.next_token("Res label")?;
    md.num_res = r.next_usize("NumRes")?;

    Ok(())
}

fn read_forc(path: &str, md: &mut ModelData) -> Result<(), String> {
    let mut r = DeckReader::open(path)?;
    let num_prep = r.next_usize("NumPrep")?;
    let num_temp = r.next_usize("NumTemp")?;
    let num_humidity = r.next_usize("NumHumidity")?;
    let num_wind = r.next_usize("NumWindVel")?;
    let num_rn = r.next_usize("NumRn")?;
    let num_g = r.next_usize("NumG")?;
    let num_p = r.next_usize("NumP")?;
    let num_lai = r.next_usize("NumLAI")?;
    let num_source = r.next_usize("NumSource")?;

    for _ in 0..num_prep {
        md.tsd_prep.push(r.next_series()?);
    }
    for _ in 0..num_temp {
        md.tsd_temp.push(r.next_series()?);
    }
    for _ in 0..num_humidity {
        md.tsd_humidity.push(r.next_series()?);
    }
    for _ in 0..num_wind {
        md.tsd_wind_vel.push(r.next_series()?);
    }
    for _ in 0..num_rn {
        md.tsd_rn.push(r.next_series()?);
    }
    for _ in 0..num_g {
        md.tsd_g.push(r.next_series()?);
    }
    for _ in 0..num_p {
        md.tsd_pressure.push(r.next_series()?);
    }
    for _ in 0..num_lai {
        let (ts, factor) = r.next_series_with_factor()?;
        md.tsd_lai.push(ts);
        md.si_factor.push(factor);
    }
    for _ in 0..num_source {
        md.tsd_source.push(r.next_series()?);
    }
    Ok(())
}

fn read_ibc(path: &str, md: &mut ModelData) -> Result<(), String> {
    let mut r = DeckReader::open(path)?;
    md.num_1bc = r.next_usize("Num1BC")?;
    md.num_2bc = r.next_usize("Num2BC")?;

    //Dirichlet series first, then Neumann, in one table
    for _ in 0..(md.num_1bc + md.num_2bc) {
        md.tsd_ele_bc.push(r.next_series()?);
    }

    let num_ele_ic = r.next_usize("NumEleIC")?;
    md.ele_ic = Vec::with_capacity(num_ele_ic);
    for _ in 0..num_ele_ic {
        let mut ic = ElementIc::default();
        ic.index = r.next_usize("element IC id")?;
        ic.interception = r.next_f64("element IC interception")?;
        ic.surf = r.next_f64("element IC surf")?;
        ic.unsat = r.next_f64("element IC unsat")?;
        ic.sat = r.next_f64("element IC sat")?;
        md.ele_ic.push(ic);
    }
    Ok(())
}

fn read_para(path: &str, md: &mut ModelData) -> Result<Control, String> {
    let mut r = DeckReader::open(path)?;
    let mut control = Control::new();

    control.verbose = r.next_i32("Verbose")? == 1;
    control.debug = r.next_i32("Debug")? == 1;
    control.int_type = r.next_i32("int_type")?;
    control.res_out = r.next_i32("res_out")? == 1;
    control.flux_out = r.next_i32("flux_out")? == 1;
    control.q_out = r.next_i32("q_out")? == 1;
    control.etis_out = r.next_i32("etis_out")? == 1;

    md.unsat_mode = UnsatMode::from_code(r.next_i32("UnsatMode")?)?;
    md.surf_mode = SurfaceMode::from_code(r.next_i32("SurfMode")?)?;
    md.riv_mode = ChannelMode::from_code(r.next_i32("RivMode")?)?;

    let solver = r.next_i32("Solver")?;
    control.solver = match solver {
        1 => SolverChoice::Dense,
        2 => SolverChoice::Gmres {
            gs_type: r.next_i32("GSType")?,
            max_k: r.next_usize("MaxK")?,
            delt: r.next_f64("delt")?,
        },
        _ => return Err(format!("{}: solver type {} is wrong", path, solver)),
    };

    control.abstol = r.next_f64("abstol")?;
    control.reltol = r.next_f64("reltol")?;
    control.init_step = r.next_f64("InitStep")?;
    control.max_step = r.next_f64("MaxStep")?;
    control.et_step = r.next_f64("ETStep")?;
    control.start_time = r.next_f64("StartTime")?;
    control.end_time = r.next_f64("EndTime")?;
    control.outtype = r.next_i32("outtype")?;

    if control.outtype == 0 {
        control.a = r.next_f64("a")?;
        control.b = r.next_f64("b")?;
    } else {
        control.a = 1.0;
        control.b = control.et_step;
    }

    //optional trailing geometry flag: 1 selects the circumcenter variant
    md.geom_mode = if r.has_more() && r.next_i32("GeomFlag")? == 1 {
        GeomMode::Circumcenter
    } else {
        GeomMode::Centroid
    };

    control.build_output_grid();
    Ok(control)
}

/*
Restart snapshot: the unsaturated block then the saturated block, one value
per line, as written at the end of a previous run.
 */
pub fn read_restart(path: &str, num_ele: usize) -> Result<(Vec<f64>, Vec<f64>), String> {
    let mut r = DeckReader::open(path)?;
    let mut unsat = Vec::with_capacity(num_ele);
    let mut sat = Vec::with_capacity(num_ele);
    for _ in 0..num_ele {
        unsat.push(r.next_f64("restart unsat")?);
    }
    for _ in 0..num_ele {
        sat.push(r.next_f64("restart sat")?);
    }
    Ok((unsat, sat))
}

use std::fs::File;
use std::io::{BufWriter, Write};

use crate::misc::configuration::Control;
use crate::model::ModelData;
use crate::numerical::bdf::SolverStats;

// Text writers for the .res, .flux and .etis outputs plus the console
// reporting. Layouts follow the historical column-block format: a time line,
// then labelled blocks of ten values per row.

pub struct OutputFiles {
    res: Option<BufWriter<File>>,
    flux: Option<BufWriter<File>>,
    etis: Option<BufWriter<File>>,
}

fn create(path: &str) -> Result<BufWriter<File>, String> {
    let file = File::create(path).map_err(|e| format!("Could not create {}: {}", path, e))?;
    Ok(BufWriter::new(file))
}

impl OutputFiles {
    pub fn open(stem: &str, control: &Control) -> Result<OutputFiles, String> {
        Ok(OutputFiles {
            res: if control.res_out {
                Some(create(&format!("{}.res", stem))?)
            } else {
                None
            },
            flux: if control.flux_out {
                Some(create(&format!("{}.flux", stem))?)
            } else {
                None
            },
            etis: if control.etis_out {
                Some(create(&format!("{}.etis", stem))?)
            } else {
                None
            },
        })
    }

    pub fn write_headers(&mut self, md: &ModelData) -> Result<(), String> {
        let ne = md.num_ele();
        let nr = md.num_riv();
        let n = md.system_size();

        if let Some(w) = self.res.as_mut() {
            write!(w, "\nBarwon state variables result: \n").and_then(|_| {
                write!(w, "\nNumEle = {:8}  NumRiv = {:8}\nProblem Size N = {:8}\n\n", ne, nr, n)
            })
            .map_err(|e| format!("Write error on .res: {}", e))?;
        }
        if let Some(w) = self.etis.as_mut() {
            write!(w, "\nBarwon ET and interception result: \n").and_then(|_| {
                write!(w, "\nNumEle = {:8}  NumRiv = {:8}\nProblem Size N = {:8}\n", ne, nr, n)
            })
            .map_err(|e| format!("Write error on .etis: {}", e))?;
        }
        Ok(())
    }

    /// One output instant: state blocks, flux blocks, ET/interception
    /// blocks, flushed so an aborted run keeps everything up to the last
    /// emitted step.
    pub fn emit(&mut self, md: &ModelData, y: &[f64], t: f64) -> Result<(), String> {
        if self.res.is_some() {
            let w = self.res.as_mut().unwrap();
            write_state(w, md, y, t).map_err(|e| format!("Write error on .res: {}", e))?;
        }
        if self.flux.is_some() {
            let w = self.flux.as_mut().unwrap();
            write_flux(w, md, t).map_err(|e| format!("Write error on .flux: {}", e))?;
        }
        if self.etis.is_some() {
            let w = self.etis.as_mut().unwrap();
            write_etis(w, md, t).map_err(|e| format!("Write error on .etis: {}", e))?;
        }
        Ok(())
    }
}

fn write_block<W: Write>(
    w: &mut W,
    label: &str,
    count: usize,
    value: impl Fn(usize) -> f64,
    precision: usize,
) -> std::io::Result<()> {
    write!(w, "\n\n  {} (1 :{:8}):\n", label, count)?;
    write!(w, "\n       ")?;
    for i in 0..10 {
        write!(w, "{:16}", i + 1)?;
    }
    write!(w, "\n       ")?;
    for i in 0..count {
        if i % 10 == 0 {
            write!(w, "\n {:5} ", i / 10)?;
        }
        write!(w, "{:16.*}", precision, value(i))?;
    }
    Ok(())
}

fn write_state<W: Write>(w: &mut W, md: &ModelData, y: &[f64], t: f64) -> std::io::Result<()> {
    let ne = md.num_ele();
    let nr = md.num_riv();

    write!(w, "Current time = {:10.4}", t)?;
    if ne > 0 {
        write_block(w, "Overland Flow Depth", ne, |i| y[i], 8)?;
        write_block(w, "Unsaturated Soil Moisture Equivalent Depth", ne, |i| y[i + ne], 8)?;
        write_block(w, "Saturated Groundwater Depth", ne, |i| y[i + 2 * ne], 8)?;
    }
    if nr > 0 {
        write_block(w, "Channel Flow Depth", nr, |i| y[i + 3 * ne], 8)?;
    }
    write!(w, "\n\n  Discharge at outlet = {:16.8}\n\n", md.q)?;
    w.flush()
}

fn write_flux<W: Write>(w: &mut W, md: &ModelData, t: f64) -> std::io::Result<()> {
    write!(w, "t = {:10.4}\n\n", t)?;

    if md.num_ele() > 0 {
        write!(w, "  FluxSurf = \n")?;
        for (i, f) in md.flux_surf.iter().enumerate() {
            write!(w, "{:6}", i + 1)?;
            for v in f.iter() {
                write!(w, "{:16.8}", v)?;
            }
            writeln!(w)?;
        }
        write!(w, "\n  FluxSub = \n")?;
        for (i, f) in md.flux_sub.iter().enumerate() {
            write!(w, "{:6}", i + 1)?;
            for v in f.iter() {
                write!(w, "{:16.8}", v)?;
            }
            writeln!(w)?;
        }
    }

    if md.num_riv() > 0 {
        write!(w, "\n  FluxRiv = \n")?;
        for (i, f) in md.flux_riv.iter().enumerate() {
            write!(w, "{:6}", i + 1)?;
            for v in f.iter() {
                write!(w, "{:16.8}", v)?;
            }
            writeln!(w)?;
        }
    }

    write!(w, "\nQ at outlet = {:16.8}\n\n", md.q)?;
    w.flush()
}

fn write_etis<W: Write>(w: &mut W, md: &ModelData, t: f64) -> std::io::Result<()> {
    let ne = md.num_ele();
    write!(w, "\nCurrent time = {:10.4}", t)?;

    if ne > 0 {
        write_block(w, "Interception Storage", ne, |i| md.ele_is[i], 10)?;

        write!(w, "\n\n  Evapotranspiration (1 :{:8}):\n", ne)?;
        write!(w, "\n       ")?;
        for i in 0..10 {
            for j in 0..4 {
                write!(w, "{:14}_{:1}", i + 1, j)?;
            }
        }
        write!(w, "\n       ")?;
        for i in 0..ne {
            if i % 10 == 0 {
                write!(w, "\n {:5} ", i / 10)?;
            }
            for j in 0..4 {
                write!(w, "{:16.10}", md.ele_et[i][j])?;
            }
        }
    }
    writeln!(w)?;
    w.flush()
}

/*
Final state persisted in the restart layout: the unsaturated block then the
saturated block, one value per line.
 */
pub fn write_restart_out(path: &str, md: &ModelData, y: &[f64]) -> Result<(), String> {
    let ne = md.num_ele();
    let mut out = String::new();
    for i in 0..ne {
        out.push_str(&format!("{:.8}\n", y[i + ne]));
    }
    for i in 0..ne {
        out.push_str(&format!("{:.8}\n", y[i + 2 * ne]));
    }
    std::fs::write(path, out).map_err(|e| format!("Could not write {}: {}", path, e))
}

/// Per-output-step solver report for verbose runs.
pub fn print_verbose(step: usize, t: f64, stats: &SolverStats) {
    println!(
        "  Step {:5}: t ={:10.4}  DeltT ={:8.4}  Order = {:1}  InterStep ={:6}  RHS Eval ={:6}",
        step + 1,
        t,
        stats.last_step,
        stats.last_order,
        stats.steps,
        stats.rhs_evals
    );
}

pub fn print_farewell(control: &Control, load_secs: f64, solve_secs: f64) {
    println!("\nCongratulations! Simulation finishes successfully. \n");
    match control.solver {
        crate::misc::configuration::SolverChoice::Dense => println!("Full dense direct solver."),
        crate::misc::configuration::SolverChoice::Gmres { .. } => println!("Iterative GMRES solver."),
    }
    println!("Time taken to read in files    = {:10.4} seconds. ", load_secs);
    println!("Time taken to solve ODE system = {:10.4} seconds. ", solve_secs);
}

/*
Debug dump of the derived model, element and river tables first.
 */
pub fn print_model_data(md: &ModelData) {
    println!("\nElements information: \n");
    println!("   Index     N-1     N-2     N-3    Nr-1    Nr-2    Nr-3      Edge-1      Edge-2      Edge-3           X           Y       Z_MIN       Z_MAX        AREA");
    for ele in md.ele.iter() {
        println!(
            "{:8}{:8}{:8}{:8}{:8}{:8}{:8}{:12.5}{:12.5}{:12.5}{:12.5}{:12.5}{:12.5}{:12.5}{:12.5}",
            ele.index,
            ele.node[0],
            ele.node[1],
            ele.node[2],
            ele.nabr[0],
            ele.nabr[1],
            ele.nabr[2],
            ele.edge[0],
            ele.edge[1],
            ele.edge[2],
            ele.x,
            ele.y,
            ele.zmin,
            ele.zmax,
            ele.area
        );
    }

    println!("\nElement attribute information: \n");
    println!(" Index  Soil    LC    IC    BC  Prep  Temp Humid  WVel    Rn     G     P   LAI   Src");
    for (i, ele) in md.ele.iter().enumerate() {
        println!(
            "{:6}{:6}{:6}{:6}{:6}{:6}{:6}{:6}{:6}{:6}{:6}{:6}{:6}{:6}",
            i + 1,
            ele.soil,
            ele.lc,
            ele.ic,
            ele.bc,
            ele.prep,
            ele.temp,
            ele.humidity,
            ele.wind_vel,
            ele.rn,
            ele.g,
            ele.pressure,
            ele.lai,
            ele.source
        );
    }

    println!("\nNode information: \n");
    println!("  Index       X       Y   Z_min   Z_max");
    for node in md.node.iter() {
        println!(
            "{:7}{:8.3}{:8.3}{:8.3}{:8.3}",
            node.index, node.x, node.y, node.zmin, node.zmax
        );
    }

    println!("\nSoil information: \n");
    println!("  Index    Ksat   SitaS   SitaR   Alpha    Beta      Sf Inc_type");
    for soil in md.soil.iter() {
        println!(
            "{:7}{:8.4}{:8.4}{:8.4}{:8.4}{:8.4}{:8.4}{:9}",
            soil.index, soil.ksat, soil.sita_s, soil.sita_r, soil.alpha, soil.beta, soil.sf, soil.inf
        );
    }

    println!("\nLand-cover information: \n");
    println!("  Index  LAImax    Rmin  Albedo VegFrac");
    for lc in md.land_cover.iter() {
        println!(
            "{:7}{:8.3}{:8.3}{:8.3}{:8.3}",
            lc.index, lc.lai_max, lc.rmin, lc.albedo, lc.veg_frac
        );
    }

    println!("\nRiver segments information: \n");
    println!("  Index           X           Y           Z       Depth      Length F_node T_node Down L_ele R_ele Shape Mat  IC  BC RES");
    for riv in md.riv.iter() {
        println!(
            "{:7}{:12.4}{:12.4}{:12.4}{:12.4}{:12.4}{:7}{:7}{:5}{:6}{:6}{:6}{:4}{:4}{:4}{:4}",
            riv.index,
            riv.x,
            riv.y,
            riv.zmin,
            riv.depth,
            riv.length,
            riv.from_node,
            riv.to_node,
            riv.down,
            riv.left_ele,
            riv.right_ele,
            riv.shape,
            riv.material,
            riv.ic,
            riv.bc,
            riv.reservoir
        );
    }

    println!("\nForcing summary: \n");
    let groups: [(&str, &Vec<crate::timeseries::Timeseries>); 12] = [
        ("Prep", &md.tsd_prep),
        ("Temp", &md.tsd_temp),
        ("Humidity", &md.tsd_humidity),
        ("WindVel", &md.tsd_wind_vel),
        ("Rn", &md.tsd_rn),
        ("G", &md.tsd_g),
        ("Pressure", &md.tsd_pressure),
        ("LAI", &md.tsd_lai),
        ("Source", &md.tsd_source),
        ("Inc", &md.tsd_inc),
        ("EleBC", &md.tsd_ele_bc),
        ("RivBC", &md.tsd_riv),
    ];
    for (label, group) in groups.iter() {
        for (i, ts) in group.iter().enumerate() {
            println!("{:>9} {:3}: {:5} points  ({})", label, i + 1, ts.len(), ts.name);
        }
    }
}

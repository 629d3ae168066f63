use libm::pow;

/*
Macropore conductivity amplifier for one element. Unity for regular soil or
while the water table sits below the activation base; above it the factor
grows as 10^(gama*(sat/base - 1)).
 */
pub fn macropore_factor(macropore: i32, y_sat: f64, base: f64, gama: f64) -> f64 {
    if macropore != 1 {
        return 1.0;
    }
    if y_sat > base {
        pow(10.0, gama * (y_sat / base - 1.0))
    } else {
        1.0
    }
}

/// Lateral Darcy discharge across a shared edge, in m^3/min with the
/// conductivity already carrying the per-minute units.
pub fn darcy_edge_flux(mp_factor: f64, avg_ksat: f64, grad: f64, avg_y: f64, edge: f64) -> f64 {
    mp_factor * avg_ksat * grad * avg_y * edge
}

/// Seepage between a channel and the saturated store of a bank element,
/// positive river -> element. The wetted exchange face is half the top width
/// plus the stage.
pub fn bank_seepage(
    mp_factor: f64,
    length: f64,
    wid: f64,
    y_riv: f64,
    ksat: f64,
    total_y_riv: f64,
    ele_head: f64,
    distance: f64,
) -> f64 {
    mp_factor * length * (0.5 * wid + y_riv) * ksat * (total_y_riv - ele_head) / distance
}

/// Effective moisture capacity of the unsaturated column (the "G" factor);
/// the small offset keeps the saturated balance well conditioned as the
/// deficit vanishes.
pub fn storage_capacity(porosity: f64, alpha: f64, beta: f64, deficit: f64) -> f64 {
    1e-4 + porosity * (1.0 - storage_fraction(alpha, beta, deficit))
}

/// Sensitivity of the equivalent unsaturated depth to the water-table
/// movement (the "GI" factor, always <= 0).
pub fn storage_slope(alpha: f64, beta: f64, deficit: f64) -> f64 {
    -storage_fraction(alpha, beta, deficit)
}

fn storage_fraction(alpha: f64, beta: f64, deficit: f64) -> f64 {
    pow(1.0 + pow(alpha * deficit, beta), -(beta + 1.0) / beta)
}

use crate::hydrology::channel::critical_depth_flux;
use crate::hydrology::groundwater::macropore_factor;
use crate::tests::support::{river_model, two_element_model};

/// Shared-edge fluxes are equal and opposite on the two sides (P2).
#[test]
fn test_pairwise_antisymmetry() {
    let mut md = two_element_model();
    let mut y = vec![0.5, 0.2, 0.0, 0.0, 2.0, 1.0];

    md.assemble_fluxes(0.0, &mut y);

    //the diagonal is edge 2 of element 1 and edge 0 of element 2
    assert!(md.flux_surf[0][2] != 0.0);
    assert!((md.flux_surf[0][2] + md.flux_surf[1][0]).abs() < 1e-9);
    assert!(md.flux_sub[0][2] != 0.0);
    assert!((md.flux_sub[0][2] + md.flux_sub[1][0]).abs() < 1e-9);

    //natural boundary edges pass nothing
    assert_eq!(md.flux_surf[0][0], 0.0);
    assert_eq!(md.flux_surf[0][1], 0.0);
    assert_eq!(md.flux_sub[1][1], 0.0);
    assert_eq!(md.flux_sub[1][2], 0.0);
}

/// A donor with no stored water sends nothing, whatever the gradient says.
#[test]
fn test_source_availability_clamp() {
    let mut md = two_element_model();
    //raise the first element's bedrock so its dry column still has the
    //higher total head
    md.ele[0].zmin = 5.0;
    let mut y = vec![0.0, 0.0, 0.0, 0.0, 0.0, 3.0];

    md.assemble_fluxes(0.0, &mut y);
    assert_eq!(md.flux_sub[0][2], 0.0);
    assert_eq!(md.flux_sub[1][0], 0.0);
}

/// Macropore soils amplify the Darcy flux by the mean of the two factors.
#[test]
fn test_macropore_amplifier() {
    let mut md = two_element_model();
    let mut y = vec![0.0, 0.0, 0.0, 0.0, 1.5, 1.0];
    md.assemble_fluxes(0.0, &mut y);
    let plain = md.flux_sub[0][2];

    md.soil[0].macropore = 1;
    let mut y = vec![0.0, 0.0, 0.0, 0.0, 1.5, 1.0];
    md.assemble_fluxes(0.0, &mut y);
    let amplified = md.flux_sub[0][2];

    let expected = (macropore_factor(1, 1.5, 1.0, 1.5) + macropore_factor(1, 1.0, 1.0, 1.5)) / 2.0;
    assert!((amplified / plain - expected).abs() < 1e-9);
}

#[test]
fn test_macropore_factor_values() {
    assert_eq!(macropore_factor(0, 5.0, 1.0, 1.5), 1.0);
    assert_eq!(macropore_factor(1, 0.5, 1.0, 1.5), 1.0);
    assert!((macropore_factor(1, 1.5, 1.0, 1.5) - 5.623413251903491).abs() < 1e-12);
}

/// Saturated depth beyond the aquifer column (plus slack) bleeds back onto
/// the surface and zeroes the unsaturated store.
#[test]
fn test_unconfined_overflow_bleeds_to_surface() {
    let mut md = two_element_model();
    let mut y = vec![0.0, 0.0, 0.3, 0.0, 10.3, 5.0];

    md.assemble_fluxes(0.0, &mut y);
    assert!((y[4] - 10.1).abs() < 1e-12);
    assert_eq!(y[2], 0.0);
    assert!((y[0] - 0.4 * 0.2).abs() < 1e-12);
}

/// Upstream routing accumulates into the downstream inflow slot, and the
/// outlet discharge lands in Q.
#[test]
fn test_river_routing_and_outlet() {
    let mut md = river_model();
    let ne = md.num_ele();
    let mut y = vec![0.0; md.system_size()];
    y[3 * ne] = 0.8;      //upstream stage
    y[3 * ne + 1] = 0.4;  //downstream stage

    md.assemble_fluxes(0.0, &mut y);

    assert!(md.flux_riv[0][1] > 0.0);
    assert!((md.flux_riv[1][0] - md.flux_riv[0][1]).abs() < 1e-12);

    let expected_q = critical_depth_flux(2.0, 0.4);
    assert!((md.flux_riv[1][1] - expected_q).abs() < 1e-9);
    assert!((md.q - expected_q).abs() < 1e-9);
}

/// The bank weir exchange overwrites the element edge facing the channel,
/// so the pair stays mass-balanced.
#[test]
fn test_river_bank_exchange_overrides_element_edge() {
    let mut md = river_model();
    let ne = md.num_ele();
    let mut y = vec![0.0; md.system_size()];
    y[0] = 0.3;           //ponded water on the left-bank element
    y[1] = 0.3;
    y[3 * ne] = 0.5;
    y[3 * ne + 1] = 0.5;

    md.assemble_fluxes(0.0, &mut y);

    //water spills from the elements into the channel
    assert!(md.flux_riv[0][2] < 0.0);
    assert!(md.flux_riv[0][3] < 0.0);
    //the shared edge carries exactly the opposite of the weir flux
    assert!((md.flux_surf[0][2] + md.flux_riv[0][2]).abs() < 1e-12);
    assert!((md.flux_surf[1][0] + md.flux_riv[0][3]).abs() < 1e-12);
}

/// Bank seepage follows the head difference between stage and water table.
#[test]
fn test_river_bank_seepage() {
    let mut md = river_model();
    let ne = md.num_ele();
    let mut y = vec![0.0; md.system_size()];
    y[2 * ne] = 2.0;      //left water table low
    y[2 * ne + 1] = 2.0;
    y[3 * ne] = 0.5;      //river head 0.5 + 8.5 = 9.0, well above
    y[3 * ne + 1] = 0.5;

    md.assemble_fluxes(0.0, &mut y);
    assert!(md.flux_riv[0][4] > 0.0);
    assert!(md.flux_riv[0][5] > 0.0);

    //a dry channel cannot lose water to the banks
    let mut y2 = vec![0.0; md.system_size()];
    y2[2 * ne] = 2.0;
    y2[2 * ne + 1] = 2.0;
    md.assemble_fluxes(0.0, &mut y2);
    assert_eq!(md.flux_riv[0][4], 0.0);
    assert_eq!(md.flux_riv[0][5], 0.0);
}

use crate::hydrology::overland::SurfaceMode;

/*
Kinematic Manning flux for a 1 m head difference over 5 m, friction-free,
n = 0.05, unit average depth, 10 m edge:
60*sqrt(0.2)*1^(2/3)*(1*10)/0.05.
 */
#[test]
fn test_kinematic_reference_flux() {
    let flux = SurfaceMode::Kinematic.edge_flux(1.0, 0.2, 0.0, 0.05, 10.0);
    assert!((flux - 5366.563145999495).abs() < 1e-6);
}

/// The same setup reversed drives the same magnitude the other way.
#[test]
fn test_kinematic_flux_is_odd_in_gradient() {
    let forward = SurfaceMode::Kinematic.edge_flux(1.0, 0.2, 0.0, 0.05, 10.0);
    let backward = SurfaceMode::Kinematic.edge_flux(1.0, -0.2, 0.0, 0.05, 10.0);
    assert!((forward + backward).abs() < 1e-9);
}

/// No flow while friction dominates the total-head gradient.
#[test]
fn test_friction_threshold_suppresses_flow() {
    for mode in [SurfaceMode::Kinematic, SurfaceMode::Diffusion] {
        assert_eq!(mode.edge_flux(1.0, 0.01, 0.02, 0.05, 10.0), 0.0);
        assert_eq!(mode.edge_flux(1.0, -0.02, 0.02, 0.05, 10.0), 0.0);
        assert_eq!(mode.edge_flux(1.0, 0.02, 0.02, 0.05, 10.0), 0.0);
    }
}

#[test]
fn test_diffusion_flux_signs() {
    let forward = SurfaceMode::Diffusion.edge_flux(1.0, 0.2, 0.0, 0.05, 10.0);
    let backward = SurfaceMode::Diffusion.edge_flux(1.0, -0.2, 0.0, 0.05, 10.0);
    assert!(forward > 0.0);
    assert!(backward < 0.0);
    assert!((forward + backward).abs() < 1e-9);
}

#[test]
fn test_mode_codes() {
    assert!(SurfaceMode::from_code(1).is_ok());
    assert!(SurfaceMode::from_code(2).is_ok());
    assert!(SurfaceMode::from_code(3).is_err());
    assert!(SurfaceMode::from_code(0).is_err());
}

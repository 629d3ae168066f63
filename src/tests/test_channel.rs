use crate::hydrology::channel::{
    critical_depth_flux, weir_exchange, zero_depth_gradient_flux, ChannelMode,
};

/*
Kinematic reach discharge pinned for stage 1 m, width 2 m, slope 0.005,
n = 0.03: alfa = sqrt(0.005)/(0.03*(2+2)^(2/3)), Q = 60*alfa*A^(5/3).
 */
#[test]
fn test_kinematic_reach_reference() {
    let flux = ChannelMode::Kinematic.reach_flux(1.0, 2.0, 0.005, 0.0, 0.03, 2.0);
    assert!((flux - 178.17974362806785).abs() < 1e-9);
}

#[test]
fn test_reach_friction_threshold() {
    for mode in [ChannelMode::Kinematic, ChannelMode::Diffusion] {
        assert_eq!(mode.reach_flux(1.0, 2.0, 0.004, 0.005, 0.03, 2.0), 0.0);
        assert_eq!(mode.reach_flux(1.0, 2.0, -0.005, 0.005, 0.03, 2.0), 0.0);
    }
}

#[test]
fn test_reach_flux_reverses_with_gradient() {
    let down = ChannelMode::Kinematic.reach_flux(1.0, 2.0, 0.005, 0.0, 0.03, 2.0);
    let up = ChannelMode::Kinematic.reach_flux(1.0, 2.0, -0.005, 0.0, 0.03, 2.0);
    assert!((down + up).abs() < 1e-9);
}

#[test]
fn test_critical_depth_outlet() {
    let flux = critical_depth_flux(2.0, 0.5);
    assert!((flux - 132.8834075421006).abs() < 1e-9);
}

#[test]
fn test_zero_depth_gradient_outlet() {
    let flux = zero_depth_gradient_flux(2.0, 0.5, 0.001, 0.03);
    assert!((flux - 39.84220189658448).abs() < 1e-9);
    //an adverse bed slope passes nothing rather than a NaN
    assert_eq!(zero_depth_gradient_flux(2.0, 0.5, -0.001, 0.03), 0.0);
}

/*
Weir cases: river well above the element surface and both above the bank
(pinned), and the dry-weir cases where neither side overtops.
 */
#[test]
fn test_weir_exchange_cases() {
    //river stage above element surface, element surface above the bank
    let f = weir_exchange(2.0, 1.5, 1.0, 0.6, 100.0);
    assert!((f - 7517.020686415596).abs() < 1e-6);

    //element surface above river, river above the bank: element -> river
    let f = weir_exchange(1.5, 2.0, 1.0, 0.6, 100.0);
    assert!(f < 0.0);

    //neither surface above the bank: a dry weir passes nothing
    assert_eq!(weir_exchange(0.8, 0.5, 1.0, 0.6, 100.0), 0.0);
    assert_eq!(weir_exchange(0.5, 0.8, 1.0, 0.6, 100.0), 0.0);
}

#[test]
fn test_channel_mode_codes() {
    assert!(ChannelMode::from_code(1).is_ok());
    assert!(ChannelMode::from_code(2).is_ok());
    assert!(ChannelMode::from_code(5).is_err());
}

pub mod balance;
pub mod channel;
pub mod evapotranspiration;
pub mod flux;
pub mod groundwater;
pub mod interception;
pub mod overland;

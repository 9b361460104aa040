pub mod epw_service;
pub mod et0_engine;
pub mod weather_service;

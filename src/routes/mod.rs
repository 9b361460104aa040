pub mod et0_routes;

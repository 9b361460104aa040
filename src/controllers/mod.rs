pub mod et0_controller;

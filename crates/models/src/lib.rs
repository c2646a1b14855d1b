pub mod errors;
pub mod clock;
pub mod db;
pub mod patch;
pub mod validate;
pub mod restaurant;
pub mod menu;
pub mod dining_table;
pub mod staff;
pub mod reservation;

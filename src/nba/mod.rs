pub mod db;
pub mod endpoints;
pub mod params;
pub mod static_data;

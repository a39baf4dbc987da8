//! Simulation input structures and scenario loading

mod data;
pub mod loader;

pub use data::{SimulationInputs, MAX_SIMULATION_YEARS};
pub use loader::{load_inputs_json, load_scenarios_csv, load_scenarios_from_reader, NamedScenario};

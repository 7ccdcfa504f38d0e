//! Load cases, combinations, nodal loads and element loads

mod element_load;
mod load_case;
mod load_combo;
mod node_load;

pub use element_load::{ElementLoad, LoadDirection};
pub use load_case::{LoadCase, LoadType};
pub use load_combo::LoadCombination;
pub use node_load::NodalLoad;

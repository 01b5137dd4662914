//! analysis of DRT / PT intermodality in agent-based transport simulation
//! outputs: how trips chain demand-responsive transit with fixed-route public
//! transit, and where public transit stops lie relative to the DRT service area.
pub mod model;
pub mod reader;
pub mod report;
pub mod stop;
pub mod trip;
pub mod zone;

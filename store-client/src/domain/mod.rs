pub mod reading;
pub mod scope;
pub mod simulation;
pub mod tariff;

pub use reading::ConsumptionReading;
pub use scope::{Scope, ScopeKind};
pub use simulation::Simulation;
pub use tariff::{TariffFlag, TariffProfile};

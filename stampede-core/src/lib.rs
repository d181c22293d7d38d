//! Scenario engine for the stampede load-testing suite
//!
//! The pieces fit together like this: a profile declares its scenarios
//! as a [`ScenarioKey`] enum and registers weights and behaviors in a
//! [`ScenarioCatalog`], validated at startup. Each [`VirtualUser`] then
//! loops: draw a scenario by effective weight (static, dynamic or
//! shifted by a [`PhaseWindow`]), run its behavior against the store,
//! pause for think time, repeat until stopped. Every request outcome
//! and iteration verdict lands in the shared [`MetricsRegistry`], which
//! freezes into a [`RunSummary`] with threshold verdicts at the end.

pub mod catalog;
pub mod driver;
pub mod error;
pub mod metrics;
pub mod phase;
pub mod run;
pub mod scenario;

pub use catalog::{CatalogBuilder, CatalogEntry, ScenarioCatalog};
pub use driver::{RunClock, VirtualUser, VuReport, VuState};
pub use error::{CoreError, CoreResult};
pub use metrics::{
    LatencySummary, MetricsRegistry, OperationSummary, RunSummary, ScenarioSummary,
    ThresholdVerdict,
};
pub use phase::PhaseWindow;
pub use run::{RunContext, RunId};
pub use scenario::{BehaviorFn, DynamicWeight, IterationInfo, ScenarioKey, ScenarioSpec};

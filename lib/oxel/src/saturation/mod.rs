//! Concurrent consequence-based saturation.
//!
//! Each indexed class expression that needs to be saturated gets a [`Context`]
//! holding the conclusions derived for it. Workers drain the to-do queues of
//! active contexts by applying the [`rules`] to each queued conclusion, which
//! produces conclusions in the same or other contexts. The
//! [`ClassExpressionSaturationFactory`] drives the workers and detects when
//! submitted roots are saturated.

mod completion;
mod conclusion;
mod context;
mod deapplication;
mod engine;
mod factory;
pub mod rules;
mod state;

pub use crate::saturation::completion::{ContextCompletion, LocalWriter};
pub use crate::saturation::conclusion::{
    Conclusion, ConclusionKind, Inference, Premise, PremiseKind,
};
pub use crate::saturation::context::{Context, ContextData};
pub use crate::saturation::deapplication::RuleDeapplication;
pub use crate::saturation::engine::{ApplicationMode, RuleApplication};
pub use crate::saturation::factory::{ClassExpressionSaturationFactory, SaturationJob};
pub use crate::saturation::state::{DeletionWriter, MainWriter, SaturationState};

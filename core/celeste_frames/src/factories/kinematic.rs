use crate::epoch::Epoch;
use crate::factory::TransformFactory;
use crate::parameters::TransformationParameters;
use std::fmt;

type ParameterFn = dyn Fn(&Epoch) -> TransformationParameters + Send + Sync;

/// Factory backed by any function producing kinematic parameters.
///
/// This is the family for relationships whose physics lives elsewhere
/// (precession/nutation models, body rotation models, ...): the model is
/// wrapped as a closure and the graph only sees its parameters.
pub struct KinematicFactory {
    cost: f64,
    label: Option<String>,
    source: Box<ParameterFn>,
}

impl KinematicFactory {
    pub const DEFAULT_COST: f64 = 30.0;

    pub fn new<F>(cost: f64, source: F) -> Self
    where
        F: Fn(&Epoch) -> TransformationParameters + Send + Sync + 'static,
    {
        Self {
            cost,
            label: None,
            source: Box::new(source),
        }
    }

    /// The same parameters at every epoch.
    pub fn constant(parameters: TransformationParameters) -> Self {
        Self::new(Self::DEFAULT_COST, move |epoch: &Epoch| {
            parameters.at_epoch(*epoch)
        })
    }

    pub fn with_name(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl fmt::Debug for KinematicFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KinematicFactory")
            .field("cost", &self.cost)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl TransformFactory for KinematicFactory {
    fn cost(&self, _epoch: &Epoch) -> f64 {
        self.cost
    }

    fn parameters(&self, epoch: &Epoch) -> TransformationParameters {
        (self.source)(epoch).at_epoch(*epoch)
    }

    fn name(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| "KinematicFactory".to_string())
    }
}

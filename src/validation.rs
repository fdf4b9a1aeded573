use crate::{StoppingCriterion, WardError, WardHyperParams};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DataValidator<'a> {
    n_inputs: usize,
    hp: &'a WardHyperParams,
}

impl<'a> DataValidator<'a> {
    pub(crate) fn new(n_inputs: usize, hp: &'a WardHyperParams) -> Self {
        Self { n_inputs, hp }
    }

    pub(crate) fn validate_input_data(&self) -> Result<(), WardError> {
        if self.n_inputs == 0 {
            return Err(WardError::EmptyDataset);
        }
        if let StoppingCriterion::TargetSize(target_size) = self.hp.stopping {
            if target_size > self.n_inputs {
                tracing::warn!(
                    target_size,
                    n_inputs = self.n_inputs,
                    "target size exceeds the number of inputs, no merges will be performed"
                );
            }
        }
        Ok(())
    }
}

use std::sync::Arc;
use uuid::Uuid;

use crate::{
    codegen::{AggregateUnit, CodegenConfig, CodegenError},
    context::{Accumulator, AggContext, SizingHint},
    expression::{Block, BlockBuilder, ExprRef, Local, Statement},
    implementor::WinAggImplementor,
};

/// One code-generation pass. Owns the single block builder every context of
/// the pass appends to; contexts only ever borrow it.
pub struct GenerationPass {
    id: Uuid,
    config: CodegenConfig,
    block: BlockBuilder,
    bindings: usize,
}

impl GenerationPass {
    pub fn new(config: CodegenConfig) -> Self {
        let id = Uuid::new_v4();
        tracing::debug!(pass = %id, "starting generation pass");
        Self { id, config, block: BlockBuilder::new(), bindings: 0 }
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn config(&self) -> &CodegenConfig { &self.config }
    pub fn block(&mut self) -> &mut BlockBuilder { &mut self.block }
    pub fn block_len(&self) -> usize { self.block.len() }

    pub(crate) fn emitted_since(&self, mark: usize) -> &[Statement] { self.block.statements_since(mark) }

    /// Creates an evaluation unit with a freshly allocated accumulator.
    pub fn instantiate(&mut self, info: AggContext, implementor: Arc<dyn WinAggImplementor>) -> AggregateUnit {
        let slots = implementor
            .state_types(&info)
            .into_iter()
            .map(|ty| self.block.allocate_slot(ty))
            .collect();
        let accumulator = Accumulator::new(info.name(), slots);
        tracing::debug!(pass = %self.id, agg = info.name(), slots = accumulator.len(), "instantiated aggregate");
        AggregateUnit::new(info, implementor, accumulator)
    }

    /// Issues the single warm-up reset for every unit of a window.
    pub fn warm_up_all(&mut self, units: &mut [AggregateUnit], hint: &SizingHint) -> Result<(), CodegenError> {
        for unit in units.iter_mut() {
            unit.warm_up(self, hint.clone())?;
        }
        Ok(())
    }

    /// Stores `value` in a fresh local named after `name`.
    pub fn bind(&mut self, name: &str, value: ExprRef) -> Result<Local, CodegenError> {
        let local = format!("{}_{}_{}", self.config.local_prefix, name, self.bindings);
        self.bindings += 1;
        self.block.declare(&local, value)
    }

    pub fn finish(self) -> Block {
        tracing::debug!(pass = %self.id, statements = self.block.len(), "finished generation pass");
        self.block.finish()
    }
}

impl Default for GenerationPass {
    fn default() -> Self { Self::new(CodegenConfig::default()) }
}

use std::sync::Arc;

use crate::{
    codegen::{CodegenError, GenerationPass},
    context::{
        Accumulator, AggAddContext, AggContext, AggMergeContext, AggResetContext, AggResultContext, PartitionFrame,
        ResetMode, RowTranslator, SizingHint, WinAggAddContext, WinAggResetContext, WinAggResultContext,
    },
    expression::{ExprRef, SlotId},
    implementor::WinAggImplementor,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    Uninitialized,
    Ready,
}

impl UnitState {
    fn describe(&self) -> &'static str {
        match self {
            UnitState::Uninitialized => "uninitialized",
            UnitState::Ready => "ready",
        }
    }
}

/// One aggregate call over one group or one partition.
///
/// Owns the accumulator for its lifetime and drives the implementor through
/// `reset -> add* -> result*`, handing every phase the same slot list.
pub struct AggregateUnit {
    info: AggContext,
    implementor: Arc<dyn WinAggImplementor>,
    accumulator: Accumulator,
    state: UnitState,
    warmed_up: bool,
    partition_seen: bool,
}

impl AggregateUnit {
    pub(crate) fn new(info: AggContext, implementor: Arc<dyn WinAggImplementor>, accumulator: Accumulator) -> Self {
        Self {
            info,
            implementor,
            accumulator,
            state: UnitState::Uninitialized,
            warmed_up: false,
            partition_seen: false,
        }
    }

    pub fn info(&self) -> &AggContext { &self.info }
    pub fn accumulator(&self) -> &Accumulator { &self.accumulator }
    pub fn state(&self) -> UnitState { self.state }

    pub fn reset(&mut self, pass: &mut GenerationPass) -> Result<(), CodegenError> {
        self.reject_window_only()?;
        let mark = self.enter(pass, "reset");
        let mut ctx = AggResetContext::new(pass.block(), self.accumulator.clone());
        self.implementor.implement_reset(&self.info, &mut ctx)?;
        self.check_reset(pass, mark)?;
        self.state = UnitState::Ready;
        Ok(())
    }

    pub fn add(&mut self, pass: &mut GenerationPass, arguments: Vec<ExprRef>) -> Result<(), CodegenError> {
        self.reject_window_only()?;
        self.require_ready("add")?;
        self.check_arity(arguments.len())?;
        let mark = self.enter(pass, "add");
        let mut ctx = AggAddContext::new(pass.block(), self.accumulator.clone(), arguments);
        self.implementor.implement_add(&self.info, &mut ctx)?;
        self.check_slots(pass, mark, None)
    }

    /// Folds `other`'s state into this unit. Both must run the same aggregate.
    pub fn merge(&mut self, pass: &mut GenerationPass, other: &AggregateUnit) -> Result<(), CodegenError> {
        self.reject_window_only()?;
        self.require_ready("merge")?;
        if other.state != UnitState::Ready {
            return Err(CodegenError::PhaseOrder {
                name: self.info.name().into(),
                phase: "merge",
                state: "other unit uninitialized",
            });
        }
        if other.info != self.info {
            return Err(CodegenError::MergeMismatch {
                name: self.info.name().into(),
                other: format!("{}({:?})", other.info.name(), other.info.arg_types()),
            });
        }
        if other.accumulator.len() != self.accumulator.len() {
            return Err(CodegenError::AccumulatorArity {
                name: self.info.name().into(),
                expected: self.accumulator.len(),
                got: other.accumulator.len(),
            });
        }
        let mark = self.enter(pass, "merge");
        let mut ctx = AggMergeContext::new(pass.block(), self.accumulator.clone(), other.accumulator.view());
        self.implementor.implement_merge(&self.info, &mut ctx)?;
        self.check_slots(pass, mark, Some(&other.accumulator))
    }

    /// Re-enterable; never writes accumulator state.
    pub fn result(&mut self, pass: &mut GenerationPass) -> Result<ExprRef, CodegenError> {
        self.reject_window_only()?;
        self.require_ready("result")?;
        let mark = self.enter(pass, "result");
        let mut ctx = AggResultContext::new(pass.block(), self.accumulator.view());
        let value = self.implementor.implement_result(&self.info, &mut ctx)?;
        self.check_result(pass, mark, &value)?;
        Ok(value)
    }

    /// The single engine-wide reset issued before any partition is known.
    pub fn warm_up(&mut self, pass: &mut GenerationPass, hint: SizingHint) -> Result<(), CodegenError> {
        if self.warmed_up || self.partition_seen {
            return Err(CodegenError::PhaseOrder {
                name: self.info.name().into(),
                phase: "warm-up reset",
                state: if self.warmed_up { "already warmed up" } else { "partitions already reset" },
            });
        }
        self.win_reset(pass, ResetMode::WarmUp(hint))?;
        self.warmed_up = true;
        Ok(())
    }

    pub fn reset_partition(&mut self, pass: &mut GenerationPass, frame: PartitionFrame) -> Result<(), CodegenError> {
        self.check_frame(pass, &frame)?;
        self.win_reset(pass, ResetMode::Partition(frame))?;
        self.partition_seen = true;
        Ok(())
    }

    pub fn add_windowed(
        &mut self,
        pass: &mut GenerationPass,
        frame: &PartitionFrame,
        translator: &dyn RowTranslator,
    ) -> Result<(), CodegenError> {
        self.require_ready("add")?;
        self.check_frame(pass, frame)?;
        let mark = self.enter(pass, "add");
        let mut ctx = WinAggAddContext::new(
            pass.block(),
            self.accumulator.clone(),
            frame,
            translator,
            self.info.name(),
            self.info.arity(),
        )?;
        self.implementor.implement_win_add(&self.info, &mut ctx)?;
        self.check_slots(pass, mark, None)
    }

    pub fn result_windowed(
        &mut self,
        pass: &mut GenerationPass,
        frame: &PartitionFrame,
        translator: &dyn RowTranslator,
    ) -> Result<ExprRef, CodegenError> {
        self.require_ready("result")?;
        self.check_frame(pass, frame)?;
        let mark = self.enter(pass, "result");
        let mut ctx = WinAggResultContext::new(
            pass.block(),
            self.accumulator.view(),
            frame,
            translator,
            self.info.name(),
            self.info.arity(),
        );
        let value = self.implementor.implement_win_result(&self.info, &mut ctx)?;
        self.check_result(pass, mark, &value)?;
        Ok(value)
    }

    fn win_reset(&mut self, pass: &mut GenerationPass, mode: ResetMode) -> Result<(), CodegenError> {
        let mark = self.enter(pass, "reset");
        let mut ctx = WinAggResetContext::new(pass.block(), self.accumulator.clone(), mode);
        self.implementor.implement_win_reset(&self.info, &mut ctx)?;
        self.check_reset(pass, mark)?;
        self.state = UnitState::Ready;
        Ok(())
    }

    fn enter(&self, pass: &GenerationPass, phase: &'static str) -> usize {
        tracing::debug!(pass = %pass.id(), agg = self.info.name(), phase, "entering phase");
        pass.block_len()
    }

    fn reject_window_only(&self) -> Result<(), CodegenError> {
        if self.implementor.window_only() {
            return Err(CodegenError::WindowOnly(self.info.name().into()));
        }
        Ok(())
    }

    fn require_ready(&self, phase: &'static str) -> Result<(), CodegenError> {
        if self.state != UnitState::Ready {
            return Err(CodegenError::PhaseOrder { name: self.info.name().into(), phase, state: self.state.describe() });
        }
        Ok(())
    }

    fn check_arity(&self, got: usize) -> Result<(), CodegenError> {
        if got != self.info.arity() {
            return Err(CodegenError::ArgumentArity { name: self.info.name().into(), expected: self.info.arity(), got });
        }
        Ok(())
    }

    fn check_frame(&self, pass: &GenerationPass, frame: &PartitionFrame) -> Result<(), CodegenError> {
        if pass.config().check_frame_bounds {
            frame.check_constant_bounds()?;
        }
        Ok(())
    }

    // Reset must assign every slot and touch nothing else. Runs with the ownership check.
    fn check_reset(&self, pass: &GenerationPass, mark: usize) -> Result<(), CodegenError> {
        self.check_slots(pass, mark, None)?;
        if !pass.config().check_slot_ownership {
            return Ok(());
        }
        let mut written: Vec<SlotId> = pass
            .emitted_since(mark)
            .iter()
            .flat_map(|s| s.assigned_slots())
            .collect();
        written.sort();
        written.dedup();
        if written.len() != self.accumulator.len() {
            return Err(CodegenError::AccumulatorArity {
                name: self.info.name().into(),
                expected: self.accumulator.len(),
                got: written.len(),
            });
        }
        Ok(())
    }

    // Results are re-enterable, so the phase may not write any slot, its own included.
    fn check_result(&self, pass: &GenerationPass, mark: usize, value: &ExprRef) -> Result<(), CodegenError> {
        let written = pass.emitted_since(mark).iter().flat_map(|s| s.written_slots()).next();
        if let Some(slot) = written {
            return Err(CodegenError::ResultWritesState { name: self.info.name().into(), slot });
        }
        self.check_slots(pass, mark, None)?;
        if pass.config().check_slot_ownership {
            let mut read = Vec::new();
            value.collect_slots(&mut read);
            self.check_owned(read, None)?;
        }
        Ok(())
    }

    fn check_slots(&self, pass: &GenerationPass, mark: usize, other: Option<&Accumulator>) -> Result<(), CodegenError> {
        let emitted = pass.emitted_since(mark);
        tracing::trace!(pass = %pass.id(), agg = self.info.name(), statements = emitted.len(), "phase emitted");
        if !pass.config().check_slot_ownership {
            return Ok(());
        }
        self.check_owned(emitted.iter().flat_map(|s| s.referenced_slots()).collect(), other)
    }

    fn check_owned(&self, slots: Vec<SlotId>, other: Option<&Accumulator>) -> Result<(), CodegenError> {
        let foreign = slots
            .into_iter()
            .find(|s| !self.accumulator.owns(*s) && !other.is_some_and(|o| o.owns(*s)));
        match foreign {
            Some(slot) => Err(CodegenError::ForeignSlot { name: self.info.name().into(), slot }),
            None => Ok(()),
        }
    }
}

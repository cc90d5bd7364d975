use std::sync::Arc;

use crate::{
    codegen::CodegenError,
    expression::{DataType, ExprRef, Slot, SlotId},
};

/// Ordered accumulator slots of one evaluation unit.
///
/// Cloning shares the same slot list; every phase context of a unit receives
/// a clone of the one list allocated when the unit was created.
#[derive(Debug, Clone)]
pub struct Accumulator {
    owner: Arc<str>,
    slots: Arc<[Slot]>,
}

impl Accumulator {
    pub(crate) fn new(owner: &str, slots: Vec<Slot>) -> Self {
        Self { owner: Arc::from(owner), slots: Arc::from(slots) }
    }

    pub fn slots(&self) -> &[Slot] { &self.slots }
    pub fn len(&self) -> usize { self.slots.len() }
    pub fn is_empty(&self) -> bool { self.slots.is_empty() }

    /// Slot `index`, or an arity error naming the owning aggregate.
    pub fn slot(&self, index: usize) -> Result<&Slot, CodegenError> {
        self.slots.get(index).ok_or_else(|| CodegenError::AccumulatorArity {
            name: self.owner.to_string(),
            expected: index + 1,
            got: self.slots.len(),
        })
    }

    pub fn owns(&self, slot: SlotId) -> bool {
        self.slots.iter().any(|s| s.id() == slot)
    }

    /// True when both handles share the same slot list.
    pub fn same_as(&self, other: &Accumulator) -> bool {
        Arc::ptr_eq(&self.slots, &other.slots)
    }

    pub fn view(&self) -> AccumulatorView {
        AccumulatorView { owner: Arc::clone(&self.owner), slots: Arc::clone(&self.slots) }
    }
}

/// Read-only view of an accumulator. Hands out slot reads, never `Slot`
/// handles, so code built from it cannot assign accumulator state.
#[derive(Debug, Clone)]
pub struct AccumulatorView {
    owner: Arc<str>,
    slots: Arc<[Slot]>,
}

impl AccumulatorView {
    pub fn len(&self) -> usize { self.slots.len() }
    pub fn is_empty(&self) -> bool { self.slots.is_empty() }

    pub fn get(&self, index: usize) -> Result<&ExprRef, CodegenError> {
        self.slots.get(index).map(Slot::expr).ok_or_else(|| CodegenError::AccumulatorArity {
            name: self.owner.to_string(),
            expected: index + 1,
            got: self.slots.len(),
        })
    }

    pub fn data_type(&self, index: usize) -> Option<DataType> {
        self.slots.get(index).map(Slot::data_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExprRef> {
        self.slots.iter().map(Slot::expr)
    }

    pub fn exprs(&self) -> Vec<ExprRef> {
        self.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::BlockBuilder;

    #[test]
    fn view_shares_slot_identities() {
        let mut b = BlockBuilder::new();
        let slots = vec![b.allocate_slot(DataType::Int), b.allocate_slot(DataType::Float)];
        let acc = Accumulator::new("avg", slots);
        let copy = acc.clone();
        assert!(acc.same_as(&copy));

        let view = acc.view();
        assert_eq!(view.len(), 2);
        for (slot, read) in acc.slots().iter().zip(view.iter()) {
            assert!(Arc::ptr_eq(slot.expr(), read));
        }
        assert_eq!(view.data_type(1), Some(DataType::Float));
    }

    #[test]
    fn out_of_range_slot_is_arity_error() {
        let mut b = BlockBuilder::new();
        let acc = Accumulator::new("count", vec![b.allocate_slot(DataType::Int)]);
        assert_eq!(
            acc.slot(2).unwrap_err(),
            CodegenError::AccumulatorArity { name: "count".into(), expected: 3, got: 1 }
        );
        assert!(acc.view().get(1).is_err());
    }
}

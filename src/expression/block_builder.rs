use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::{
    codegen::CodegenError,
    expression::{Block, DataType, Expr, ExprRef, LocalId, SlotId, Statement},
};

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

/// Write handle to one accumulator slot.
///
/// Only the crate can mint slots, so the only way to emit a write into
/// accumulator state is through a context that hands one out.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    id: SlotId,
    ty: DataType,
    read: ExprRef,
}

impl Slot {
    pub fn id(&self) -> SlotId { self.id }
    pub fn data_type(&self) -> DataType { self.ty }

    /// Expression reading the slot's current contents.
    pub fn expr(&self) -> &ExprRef { &self.read }
}

/// Handle to a local declared in the block.
#[derive(Debug, Clone, PartialEq)]
pub struct Local {
    id: LocalId,
    name: String,
    read: ExprRef,
}

impl Local {
    pub fn id(&self) -> LocalId { self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn expr(&self) -> &ExprRef { &self.read }
}

#[derive(Debug, Default)]
struct IdAllocator {
    next_slot: u32,
    next_local: u32,
}

/// Append-only statement sink shared by every context of one generation pass.
#[derive(Debug, Default)]
pub struct BlockBuilder {
    statements: Vec<Statement>,
    ids: IdAllocator,
}

impl BlockBuilder {
    pub fn new() -> Self { Self::default() }

    /// Append position; statements are never removed, so a mark stays valid.
    pub fn len(&self) -> usize { self.statements.len() }

    pub fn is_empty(&self) -> bool { self.statements.is_empty() }

    pub fn statements_since(&self, mark: usize) -> &[Statement] {
        &self.statements[mark.min(self.statements.len())..]
    }

    pub fn finish(self) -> Block { Block::new(self.statements) }

    pub(crate) fn allocate_slot(&mut self, ty: DataType) -> Slot {
        let id = SlotId(self.ids.next_slot);
        self.ids.next_slot += 1;
        Slot { id, ty, read: Arc::new(Expr::Slot(id)) }
    }

    pub fn declare(&mut self, name: &str, init: ExprRef) -> Result<Local, CodegenError> {
        if !IDENTIFIER.is_match(name) {
            return Err(CodegenError::InvalidIdentifier(name.to_string()));
        }
        let id = LocalId(self.ids.next_local);
        self.ids.next_local += 1;
        self.statements.push(Statement::Declare { local: id, name: name.to_string(), init });
        Ok(Local { id, name: name.to_string(), read: Arc::new(Expr::Local(id)) })
    }

    pub fn assign_local(&mut self, local: &Local, value: ExprRef) {
        self.statements.push(Statement::AssignLocal { local: local.id, value });
    }

    pub fn assign(&mut self, slot: &Slot, value: ExprRef) {
        self.statements.push(Statement::AssignSlot { slot: slot.id, value });
    }

    pub fn push(&mut self, slot: &Slot, value: ExprRef) {
        self.statements.push(Statement::Push { slot: slot.id, value });
    }

    pub fn reserve(&mut self, slot: &Slot, capacity: ExprRef) {
        self.statements.push(Statement::Reserve { slot: slot.id, capacity });
    }

    pub fn if_then<F>(&mut self, cond: ExprRef, then: F) -> Result<(), CodegenError>
    where
        F: FnOnce(&mut BlockBuilder) -> Result<(), CodegenError>,
    {
        self.if_then_else(cond, then, |_| Ok(()))
    }

    pub fn if_then_else<F, G>(&mut self, cond: ExprRef, then: F, otherwise: G) -> Result<(), CodegenError>
    where
        F: FnOnce(&mut BlockBuilder) -> Result<(), CodegenError>,
        G: FnOnce(&mut BlockBuilder) -> Result<(), CodegenError>,
    {
        let then = self.branch(then)?;
        let otherwise = self.branch(otherwise)?;
        self.statements.push(Statement::If { cond, then, otherwise });
        Ok(())
    }

    // Child builders borrow the id allocator so ids stay unique across the pass.
    fn branch<F>(&mut self, f: F) -> Result<Vec<Statement>, CodegenError>
    where
        F: FnOnce(&mut BlockBuilder) -> Result<(), CodegenError>,
    {
        let mut child = BlockBuilder { statements: Vec::new(), ids: std::mem::take(&mut self.ids) };
        let res = f(&mut child);
        self.ids = child.ids;
        res.map(|_| child.statements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_rejects_bad_identifiers() {
        let mut b = BlockBuilder::new();
        assert!(b.declare("ok_name1", Expr::int(1)).is_ok());
        let err = b.declare("1bad", Expr::int(1)).unwrap_err();
        assert_eq!(err, CodegenError::InvalidIdentifier("1bad".into()));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn branch_ids_stay_unique() {
        let mut b = BlockBuilder::new();
        let outer = b.declare("a", Expr::int(0)).unwrap();
        let mut inner_id = None;
        b.if_then(Expr::bool(true), |child| {
            inner_id = Some(child.declare("b", Expr::int(1))?.id());
            Ok(())
        }).unwrap();
        let after = b.declare("c", Expr::int(2)).unwrap();
        let inner = inner_id.unwrap();
        assert_ne!(outer.id(), inner);
        assert_ne!(inner, after.id());
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn failed_branch_appends_nothing() {
        let mut b = BlockBuilder::new();
        let res = b.if_then(Expr::bool(true), |_| Err(CodegenError::Other("boom".into())));
        assert!(res.is_err());
        assert!(b.is_empty());
    }

    #[test]
    fn statements_since_mark() {
        let mut b = BlockBuilder::new();
        let slot = b.allocate_slot(DataType::Int);
        b.assign(&slot, Expr::int(0));
        let mark = b.len();
        b.assign(&slot, Expr::int(1));
        assert_eq!(b.statements_since(mark).len(), 1);
        assert_eq!(b.statements_since(mark)[0].written_slots(), vec![slot.id()]);
        assert_eq!(b.finish().to_string(), "acc$0 = 0;\nacc$0 = 1;\n");
    }
}

use std::fmt;

use crate::expression::{ExprRef, LocalId, SlotId};

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Declare { local: LocalId, name: String, init: ExprRef },
    AssignLocal { local: LocalId, value: ExprRef },
    AssignSlot { slot: SlotId, value: ExprRef },
    /// Append `value` to the list held in `slot`.
    Push { slot: SlotId, value: ExprRef },
    /// Pre-size the list held in `slot`; `capacity` is a hint, never a bound.
    Reserve { slot: SlotId, capacity: ExprRef },
    If { cond: ExprRef, then: Vec<Statement>, otherwise: Vec<Statement> },
}

impl Statement {
    /// Every slot this statement reads or writes, nested branches included.
    pub fn referenced_slots(&self) -> Vec<SlotId> {
        let mut out = Vec::new();
        self.collect_referenced(&mut out);
        out
    }

    /// Slots this statement may overwrite or grow.
    pub fn written_slots(&self) -> Vec<SlotId> {
        let mut out = Vec::new();
        self.collect_written(&mut out);
        out
    }

    /// Slots this statement definitely assigns. Pushes and reserves do not
    /// count; a branch counts only for slots assigned on both sides.
    pub fn assigned_slots(&self) -> Vec<SlotId> {
        match self {
            Statement::AssignSlot { slot, .. } => vec![*slot],
            Statement::If { then, otherwise, .. } => {
                let other: Vec<SlotId> = otherwise.iter().flat_map(Statement::assigned_slots).collect();
                then.iter()
                    .flat_map(Statement::assigned_slots)
                    .filter(|s| other.contains(s))
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    fn collect_referenced(&self, out: &mut Vec<SlotId>) {
        match self {
            Statement::Declare { init, .. } => init.collect_slots(out),
            Statement::AssignLocal { value, .. } => value.collect_slots(out),
            Statement::AssignSlot { slot, value } | Statement::Push { slot, value } => {
                out.push(*slot);
                value.collect_slots(out);
            }
            Statement::Reserve { slot, capacity } => {
                out.push(*slot);
                capacity.collect_slots(out);
            }
            Statement::If { cond, then, otherwise } => {
                cond.collect_slots(out);
                then.iter().chain(otherwise).for_each(|s| s.collect_referenced(out));
            }
        }
    }

    fn collect_written(&self, out: &mut Vec<SlotId>) {
        match self {
            Statement::AssignSlot { slot, .. } | Statement::Push { slot, .. } | Statement::Reserve { slot, .. } =>
                out.push(*slot),
            Statement::If { then, otherwise, .. } =>
                then.iter().chain(otherwise).for_each(|s| s.collect_written(out)),
            Statement::Declare { .. } | Statement::AssignLocal { .. } => {}
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        match self {
            Statement::Declare { local, name, init } =>
                writeln!(f, "{pad}let {name}${} = {init};", local.index()),
            Statement::AssignLocal { local, value } =>
                writeln!(f, "{pad}local${} = {value};", local.index()),
            Statement::AssignSlot { slot, value } =>
                writeln!(f, "{pad}acc${} = {value};", slot.index()),
            Statement::Push { slot, value } =>
                writeln!(f, "{pad}acc${}.push({value});", slot.index()),
            Statement::Reserve { slot, capacity } =>
                writeln!(f, "{pad}acc${}.reserve({capacity});", slot.index()),
            Statement::If { cond, then, otherwise } => {
                writeln!(f, "{pad}if {cond} {{")?;
                for s in then { s.fmt_indented(f, depth + 1)?; }
                if !otherwise.is_empty() {
                    writeln!(f, "{pad}}} else {{")?;
                    for s in otherwise { s.fmt_indented(f, depth + 1)?; }
                }
                writeln!(f, "{pad}}}")
            }
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

/// Finished, immutable sequence of statements produced by one generation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    statements: Vec<Statement>,
}

impl Block {
    pub(crate) fn new(statements: Vec<Statement>) -> Self { Self { statements } }
    pub fn statements(&self) -> &[Statement] { &self.statements }
    pub fn len(&self) -> usize { self.statements.len() }
    pub fn is_empty(&self) -> bool { self.statements.is_empty() }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.statements {
            s.fmt_indented(f, 0)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Expr;

    #[test]
    fn assigned_slots_ignore_sizing_and_one_sided_branches() {
        let (a, b) = (SlotId(0), SlotId(1));
        let reserve = Statement::Reserve { slot: a, capacity: Expr::int(4) };
        assert_eq!(reserve.written_slots(), vec![a]);
        assert!(reserve.assigned_slots().is_empty());

        let branch = Statement::If {
            cond: Expr::bool(true),
            then: vec![
                Statement::AssignSlot { slot: a, value: Expr::int(1) },
                Statement::AssignSlot { slot: b, value: Expr::int(1) },
            ],
            otherwise: vec![Statement::AssignSlot { slot: b, value: Expr::int(0) }],
        };
        assert_eq!(branch.assigned_slots(), vec![b]);
        assert_eq!(branch.written_slots(), vec![a, b, b]);
    }
}

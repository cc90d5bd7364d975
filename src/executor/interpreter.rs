use std::{cmp::Ordering, collections::HashMap};

use serde_json::Value;

use crate::{
    executor::EvalError,
    expression::{BinaryOp, Block, Expr, FrameInput, LocalId, SlotId, Statement, UnaryOp},
};

// Reserve is a hint; never let it allocate unbounded memory.
const MAX_RESERVE: usize = 1 << 16;

/// Concrete frame facts for one row of a partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    pub current_row: Option<i64>,
    pub frame_start: Option<i64>,
    pub frame_end: Option<i64>,
    pub has_rows: bool,
    pub row_count: i64,
}

impl FrameState {
    pub fn new(current_row: i64, frame_start: i64, frame_end: i64, row_count: i64) -> Self {
        Self {
            current_row: Some(current_row),
            frame_start: Some(frame_start),
            frame_end: Some(frame_end),
            has_rows: row_count > 0,
            row_count,
        }
    }

    pub fn empty() -> Self {
        Self { current_row: None, frame_start: None, frame_end: None, has_rows: false, row_count: 0 }
    }
}

/// Reference interpreter for emitted blocks, run against one in-memory partition.
///
/// Each partition row holds the aggregate's argument values in declaration order.
pub struct Interpreter<'a> {
    partition: &'a [Vec<Value>],
    frame: Option<FrameState>,
    slots: HashMap<SlotId, Value>,
    locals: HashMap<LocalId, Value>,
}

impl<'a> Interpreter<'a> {
    pub fn new(partition: &'a [Vec<Value>]) -> Self {
        Self { partition, frame: None, slots: HashMap::new(), locals: HashMap::new() }
    }

    pub fn with_frame(mut self, frame: FrameState) -> Self {
        self.frame = Some(frame);
        self
    }

    pub fn set_frame(&mut self, frame: Option<FrameState>) {
        self.frame = frame;
    }

    pub fn slot(&self, slot: SlotId) -> Option<&Value> { self.slots.get(&slot) }
    pub fn local(&self, local: LocalId) -> Option<&Value> { self.locals.get(&local) }

    pub fn run(&mut self, block: &Block) -> Result<(), EvalError> {
        self.run_statements(block.statements())
    }

    pub fn run_statements(&mut self, statements: &[Statement]) -> Result<(), EvalError> {
        for stmt in statements {
            self.run_statement(stmt)?;
        }
        Ok(())
    }

    fn run_statement(&mut self, stmt: &Statement) -> Result<(), EvalError> {
        match stmt {
            Statement::Declare { local, init: value, .. } | Statement::AssignLocal { local, value } => {
                let v = self.eval(value)?;
                self.locals.insert(*local, v);
            }
            Statement::AssignSlot { slot, value } => {
                let v = self.eval(value)?;
                self.slots.insert(*slot, v);
            }
            Statement::Push { slot, value } => {
                let v = self.eval(value)?;
                self.list_mut(*slot)?.push(v);
            }
            Statement::Reserve { slot, capacity } => {
                // unusable hints are ignored
                let n = self.eval(capacity).ok().and_then(|c| c.as_u64()).unwrap_or(0) as usize;
                self.list_mut(*slot)?.reserve(n.min(MAX_RESERVE));
            }
            Statement::If { cond, then, otherwise } => {
                if self.eval_truth(cond)? == Some(true) {
                    self.run_statements(then)?;
                } else {
                    self.run_statements(otherwise)?;
                }
            }
        }
        Ok(())
    }

    fn list_mut(&mut self, slot: SlotId) -> Result<&mut Vec<Value>, EvalError> {
        match self.slots.get_mut(&slot) {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(EvalError::TypeMismatch(format!("acc${} holds {} not a list", slot.index(), other))),
            None => Err(EvalError::UnsetSlot(slot)),
        }
    }

    pub fn eval(&self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Literal(l) => Ok(l.to_value()),
            Expr::Slot(id) => self.slots.get(id).cloned().ok_or(EvalError::UnsetSlot(*id)),
            Expr::Local(id) => self.locals.get(id).cloned().ok_or(EvalError::UnsetLocal(*id)),
            Expr::Input(input) => self.eval_input(*input),
            Expr::Argument { index, row } => self.eval_argument(*index, row),
            Expr::Unary { op, operand } => self.eval_unary(*op, operand),
            Expr::Binary { op, left, right } => self.eval_binary(*op, left, right),
            Expr::Conditional { cond, then, otherwise } => {
                if self.eval_truth(cond)? == Some(true) { self.eval(then) } else { self.eval(otherwise) }
            }
            Expr::EmptyList => Ok(Value::Array(Vec::new())),
        }
    }

    fn eval_input(&self, input: FrameInput) -> Result<Value, EvalError> {
        let frame = self.frame.ok_or(EvalError::UnboundInput(input))?;
        let pos = |p: Option<i64>| p.map(json_i).unwrap_or(Value::Null);
        Ok(match input {
            FrameInput::CurrentRow => pos(frame.current_row),
            FrameInput::FrameStart => pos(frame.frame_start),
            FrameInput::FrameEnd => pos(frame.frame_end),
            FrameInput::HasRows => Value::Bool(frame.has_rows),
            FrameInput::PartitionRowCount => json_i(frame.row_count),
        })
    }

    fn eval_argument(&self, index: usize, row: &Expr) -> Result<Value, EvalError> {
        let at = self.eval(row)?;
        let out_of_partition = || EvalError::RowOutOfPartition { row: at.to_string(), rows: self.partition.len() };
        let pos = at.as_i64().ok_or_else(out_of_partition)?;
        let values = usize::try_from(pos)
            .ok()
            .and_then(|p| self.partition.get(p))
            .ok_or_else(out_of_partition)?;
        values.get(index).cloned().ok_or(EvalError::ArgumentOutOfRange { index, arity: values.len() })
    }

    /// Three-valued truth: `None` is SQL UNKNOWN.
    fn eval_truth(&self, expr: &Expr) -> Result<Option<bool>, EvalError> {
        match self.eval(expr)? {
            Value::Bool(b) => Ok(Some(b)),
            Value::Null => Ok(None),
            other => Err(EvalError::TypeMismatch(format!("expected boolean, got {}", other))),
        }
    }

    fn eval_unary(&self, op: UnaryOp, operand: &Expr) -> Result<Value, EvalError> {
        let v = self.eval(operand)?;
        match (op, v) {
            (UnaryOp::IsNull, v) => Ok(Value::Bool(v.is_null())),
            (UnaryOp::IsNotNull, v) => Ok(Value::Bool(!v.is_null())),
            (_, Value::Null) => Ok(Value::Null),
            (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
            (UnaryOp::Neg, Value::Number(n)) => match n.as_i64() {
                Some(i) => i.checked_neg().map(json_i).ok_or_else(|| overflow("negation")),
                None => Ok(json_f(-n.as_f64().unwrap_or(0.0))),
            },
            (op, v) => Err(EvalError::TypeMismatch(format!("{:?} on {}", op, v))),
        }
    }

    fn eval_binary(&self, op: BinaryOp, left: &Expr, right: &Expr) -> Result<Value, EvalError> {
        match op {
            BinaryOp::And => {
                let l = self.eval_truth(left)?;
                if l == Some(false) { return Ok(Value::Bool(false)); }
                let r = self.eval_truth(right)?;
                Ok(match (l, r) {
                    (_, Some(false)) => Value::Bool(false),
                    (Some(true), Some(true)) => Value::Bool(true),
                    _ => Value::Null,
                })
            }
            BinaryOp::Or => {
                let l = self.eval_truth(left)?;
                if l == Some(true) { return Ok(Value::Bool(true)); }
                let r = self.eval_truth(right)?;
                Ok(match (l, r) {
                    (_, Some(true)) => Value::Bool(true),
                    (Some(false), Some(false)) => Value::Bool(false),
                    _ => Value::Null,
                })
            }
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
                let (l, r) = (self.eval(left)?, self.eval(right)?);
                Self::arith(op, &l, &r)
            }
            _ => {
                let (l, r) = (self.eval(left)?, self.eval(right)?);
                Self::compare(op, &l, &r)
            }
        }
    }

    // Int op Int stays Int; anything with a Float promotes; NULL propagates.
    fn arith(op: BinaryOp, l: &Value, r: &Value) -> Result<Value, EvalError> {
        let (a, b) = match (l, r) {
            (Value::Null, _) | (_, Value::Null) => return Ok(Value::Null),
            (Value::Number(a), Value::Number(b)) => (a, b),
            _ => return Err(EvalError::TypeMismatch(format!("{} {:?} {}", l, op, r))),
        };
        if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
            let res = match op {
                BinaryOp::Add => x.checked_add(y),
                BinaryOp::Sub => x.checked_sub(y),
                BinaryOp::Mul => x.checked_mul(y),
                _ => {
                    if y == 0 { return Err(EvalError::DivisionByZero); }
                    x.checked_div(y)
                }
            };
            return res.map(json_i).ok_or_else(|| overflow("integer arithmetic"));
        }
        let (x, y) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
        Ok(json_f(match op {
            BinaryOp::Add => x + y,
            BinaryOp::Sub => x - y,
            BinaryOp::Mul => x * y,
            _ => {
                if y == 0.0 { return Err(EvalError::DivisionByZero); }
                x / y
            }
        }))
    }

    fn compare(op: BinaryOp, l: &Value, r: &Value) -> Result<Value, EvalError> {
        let ord = match (l, r) {
            (Value::Null, _) | (_, Value::Null) => return Ok(Value::Null),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => {
                    let (x, y) = (a.as_f64().unwrap_or(f64::NAN), b.as_f64().unwrap_or(f64::NAN));
                    x.partial_cmp(&y).ok_or_else(|| EvalError::TypeMismatch("NaN in comparison".into()))?
                }
            },
            (Value::String(a), Value::String(b)) => a.cmp(b),
            _ => return Err(EvalError::TypeMismatch(format!("cannot compare {} with {}", l, r))),
        };
        let truth = match op {
            BinaryOp::Eq => ord == Ordering::Equal,
            BinaryOp::NotEq => ord != Ordering::Equal,
            BinaryOp::Lt => ord == Ordering::Less,
            BinaryOp::LtEq => ord != Ordering::Greater,
            BinaryOp::Gt => ord == Ordering::Greater,
            _ => ord != Ordering::Less,
        };
        Ok(Value::Bool(truth))
    }
}

fn json_i(i: i64) -> Value { Value::Number(serde_json::Number::from(i)) }
fn json_f(f: f64) -> Value { serde_json::Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null) }
fn overflow(what: &str) -> EvalError { EvalError::TypeMismatch(format!("overflow in {}", what)) }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::BlockBuilder;
    use serde_json::json;

    fn bin(op: BinaryOp, l: crate::expression::ExprRef, r: crate::expression::ExprRef) -> crate::expression::ExprRef {
        Expr::binary(op, l, r)
    }

    #[test]
    fn arithmetic_keeps_int_and_promotes_float() {
        let it = Interpreter::new(&[]);
        assert_eq!(it.eval(&bin(BinaryOp::Add, Expr::int(2), Expr::int(3))).unwrap(), json!(5));
        assert_eq!(it.eval(&bin(BinaryOp::Add, Expr::float(1.5), Expr::int(1))).unwrap(), json!(2.5));
        assert_eq!(it.eval(&bin(BinaryOp::Div, Expr::float(5.0), Expr::int(2))).unwrap(), json!(2.5));
        assert_eq!(it.eval(&bin(BinaryOp::Sub, Expr::null(), Expr::int(1))).unwrap(), Value::Null);
        assert_eq!(it.eval(&bin(BinaryOp::Div, Expr::int(1), Expr::int(0))).unwrap_err(), EvalError::DivisionByZero);
    }

    #[test]
    fn three_valued_logic_short_circuits() {
        let it = Interpreter::new(&[]);
        // right side would fail: unbound input
        let unbound = Expr::input(FrameInput::HasRows);
        assert_eq!(it.eval(&bin(BinaryOp::And, Expr::bool(false), unbound.clone())).unwrap(), json!(false));
        assert_eq!(it.eval(&bin(BinaryOp::Or, Expr::bool(true), unbound)).unwrap(), json!(true));
        assert_eq!(it.eval(&bin(BinaryOp::And, Expr::bool(true), Expr::null())).unwrap(), Value::Null);
        assert_eq!(it.eval(&bin(BinaryOp::Lt, Expr::null(), Expr::int(1))).unwrap(), Value::Null);
        assert_eq!(it.eval(&bin(BinaryOp::Lt, Expr::string("apple"), Expr::string("pear"))).unwrap(), json!(true));
    }

    #[test]
    fn conditional_evaluates_only_the_taken_branch() {
        let rows = vec![vec![json!(10)]];
        let it = Interpreter::new(&rows);
        let e = Expr::conditional(Expr::bool(false), Expr::argument(0, Expr::int(7)), Expr::int(0));
        assert_eq!(it.eval(&e).unwrap(), json!(0));
        assert!(matches!(
            it.eval(&Expr::argument(0, Expr::int(7))),
            Err(EvalError::RowOutOfPartition { rows: 1, .. })
        ));
        assert_eq!(it.eval(&Expr::argument(0, Expr::int(0))).unwrap(), json!(10));
    }

    #[test]
    fn inputs_need_a_frame() {
        let it = Interpreter::new(&[]);
        assert_eq!(
            it.eval(&Expr::input(FrameInput::FrameStart)).unwrap_err(),
            EvalError::UnboundInput(FrameInput::FrameStart)
        );
        let it = Interpreter::new(&[]).with_frame(FrameState::empty());
        assert_eq!(it.eval(&Expr::input(FrameInput::FrameStart)).unwrap(), Value::Null);
        assert_eq!(it.eval(&Expr::input(FrameInput::HasRows)).unwrap(), json!(false));
    }

    #[test]
    fn statements_update_slots_and_lists() {
        let mut b = BlockBuilder::new();
        let list = b.allocate_slot(crate::expression::DataType::Array);
        b.assign(&list, Expr::empty_list());
        b.reserve(&list, Expr::input(FrameInput::PartitionRowCount));
        b.push(&list, Expr::int(1));
        b.if_then_else(Expr::null(), |b| { b.push(&list, Expr::int(2)); Ok(()) }, |b| { b.push(&list, Expr::int(3)); Ok(()) }).unwrap();
        let out = b.declare("out", list.expr().clone()).unwrap();
        let block = b.finish();

        // no frame bound: the reserve hint is unusable and ignored
        let mut it = Interpreter::new(&[]);
        it.run(&block).unwrap();
        assert_eq!(it.slot(list.id()), Some(&json!([1, 3])));
        assert_eq!(it.local(out.id()), Some(&json!([1, 3])));
    }
}

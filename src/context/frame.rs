use crate::{
    codegen::CodegenError,
    expression::{Expr, ExprRef, FrameInput, Literal},
};

/// Frame facts visible to windowed phases. All values are expressions the
/// generated code evaluates at runtime.
pub trait WindowFrame {
    /// Position of the row being evaluated within the partition.
    fn current_row(&self) -> &ExprRef;
    /// First row of the frame (inclusive).
    fn frame_start(&self) -> &ExprRef;
    /// Last row of the frame (inclusive).
    fn frame_end(&self) -> &ExprRef;
    /// Boolean: the partition has at least one row. When false the numeric
    /// bounds carry no meaning and must not be dereferenced.
    fn has_rows(&self) -> &ExprRef;
    /// Number of rows in the partition, 0 when empty.
    fn partition_row_count(&self) -> &ExprRef;
}

/// Ability to evaluate the aggregate's arguments at another row.
pub trait WindowFrameResult {
    /// Declared arguments as they evaluate at `row`. The returned list always
    /// has the declared arity. `row` is not checked against the partition;
    /// callers bound it by the frame first.
    fn arguments_at(&self, row: &ExprRef) -> Result<Vec<ExprRef>, CodegenError>;
}

/// Frame facts of one concrete partition.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionFrame {
    current_row: ExprRef,
    frame_start: ExprRef,
    frame_end: ExprRef,
    has_rows: ExprRef,
    partition_row_count: ExprRef,
}

impl PartitionFrame {
    pub fn new(
        current_row: ExprRef,
        frame_start: ExprRef,
        frame_end: ExprRef,
        has_rows: ExprRef,
        partition_row_count: ExprRef,
    ) -> Self {
        Self { current_row, frame_start, frame_end, has_rows, partition_row_count }
    }

    /// Facts bound by the row-iteration engine while the generated code runs.
    pub fn symbolic() -> Self {
        Self::new(
            Expr::input(FrameInput::CurrentRow),
            Expr::input(FrameInput::FrameStart),
            Expr::input(FrameInput::FrameEnd),
            Expr::input(FrameInput::HasRows),
            Expr::input(FrameInput::PartitionRowCount),
        )
    }

    /// Facts known while generating, e.g. for an unrolled partition.
    pub fn constant(current_row: i64, frame_start: i64, frame_end: i64, row_count: i64) -> Self {
        Self::new(
            Expr::int(current_row),
            Expr::int(frame_start),
            Expr::int(frame_end),
            Expr::bool(row_count > 0),
            Expr::int(row_count),
        )
    }

    /// Empty partition; positions are NULL because nothing may read them.
    pub fn empty() -> Self {
        Self::new(Expr::null(), Expr::null(), Expr::null(), Expr::bool(false), Expr::int(0))
    }

    /// Checks `frame_start <= current_row <= frame_end` (and the partition
    /// range) for the facts that are literals. Symbolic facts are not checked.
    pub fn check_constant_bounds(&self) -> Result<(), CodegenError> {
        if self.has_rows.as_literal().and_then(Literal::as_bool) != Some(true) {
            return Ok(());
        }
        let int = |e: &ExprRef| e.as_literal().and_then(Literal::as_int);
        let (start, end) = (int(&self.frame_start), int(&self.frame_end));

        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(CodegenError::InvalidFrame(format!("frame start {} is after frame end {}", s, e)));
            }
        }
        if let Some(cur) = int(&self.current_row) {
            if start.is_some_and(|s| cur < s) || end.is_some_and(|e| cur > e) {
                return Err(CodegenError::InvalidFrame(format!(
                    "current row {} outside frame [{}, {}]",
                    cur,
                    self.frame_start,
                    self.frame_end
                )));
            }
        }
        if let Some(count) = int(&self.partition_row_count) {
            if count <= 0 {
                return Err(CodegenError::InvalidFrame("has_rows is true but the partition is empty".into()));
            }
            if start.is_some_and(|s| s < 0) || end.is_some_and(|e| e >= count) {
                return Err(CodegenError::InvalidFrame(format!(
                    "frame [{}, {}] outside partition of {} row(s)",
                    self.frame_start,
                    self.frame_end,
                    count
                )));
            }
        }
        Ok(())
    }
}

impl WindowFrame for PartitionFrame {
    fn current_row(&self) -> &ExprRef { &self.current_row }
    fn frame_start(&self) -> &ExprRef { &self.frame_start }
    fn frame_end(&self) -> &ExprRef { &self.frame_end }
    fn has_rows(&self) -> &ExprRef { &self.has_rows }
    fn partition_row_count(&self) -> &ExprRef { &self.partition_row_count }
}

/// Row-count hint for the warm-up reset. Only usable to pre-size collections.
#[derive(Debug, Clone, PartialEq)]
pub struct SizingHint {
    row_count: ExprRef,
}

impl SizingHint {
    pub fn new(row_count: ExprRef) -> Self { Self { row_count } }

    /// No estimate at all.
    pub fn unknown() -> Self { Self::new(Expr::int(0)) }

    pub fn row_count(&self) -> &ExprRef { &self.row_count }
}

/// The two reset scenarios of a windowed aggregate.
#[derive(Debug, Clone, PartialEq)]
pub enum ResetMode {
    /// Engine-wide warm-up issued once before any partition is known.
    WarmUp(SizingHint),
    /// Reset at the start of a concrete partition.
    Partition(PartitionFrame),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_constant_frame_passes() {
        assert!(PartitionFrame::constant(1, 0, 2, 3).check_constant_bounds().is_ok());
        assert!(PartitionFrame::constant(0, 0, 0, 1).check_constant_bounds().is_ok());
    }

    #[test]
    fn inverted_frame_is_rejected() {
        let err = PartitionFrame::constant(1, 2, 1, 3).check_constant_bounds().unwrap_err();
        assert!(matches!(err, CodegenError::InvalidFrame(msg) if msg.contains("after frame end")));
    }

    #[test]
    fn current_row_outside_frame_is_rejected() {
        assert!(PartitionFrame::constant(3, 0, 2, 5).check_constant_bounds().is_err());
        assert!(PartitionFrame::constant(0, 1, 2, 5).check_constant_bounds().is_err());
    }

    #[test]
    fn frame_past_partition_end_is_rejected() {
        assert!(PartitionFrame::constant(1, 0, 3, 3).check_constant_bounds().is_err());
    }

    #[test]
    fn empty_and_symbolic_frames_are_not_checked() {
        assert!(PartitionFrame::empty().check_constant_bounds().is_ok());
        assert!(PartitionFrame::symbolic().check_constant_bounds().is_ok());
        // bounds meaningless without rows
        let f = PartitionFrame::new(Expr::int(9), Expr::int(5), Expr::int(1), Expr::bool(false), Expr::int(0));
        assert!(f.check_constant_bounds().is_ok());
    }
}

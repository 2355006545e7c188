//! Nested-loop join.
//!
//! For every row of the outer (left) child the inner (right) child is scanned
//! from the start; matching pairs are emitted as `left ++ right` in outer
//! order, then inner order. The inner child is rewound once per outer row.

use std::sync::Arc;

use tessera_core::schema::TupleDesc;
use tessera_core::tuple::Tuple;

use crate::predicate::JoinPredicate;
use crate::traits::{take_children, BoxedOp, OpIterator, Producer, Result};

pub struct Join {
    predicate: JoinPredicate,
    left: BoxedOp,
    right: BoxedOp,
    desc: Arc<TupleDesc>,
    outer: Option<Tuple>,
}

impl Join {
    pub fn new(predicate: JoinPredicate, left: BoxedOp, right: BoxedOp) -> Result<Self> {
        let desc = Arc::new(join_desc(&predicate, &left, &right)?);
        Ok(Self {
            predicate,
            left,
            right,
            desc,
            outer: None,
        })
    }

    pub fn predicate(&self) -> &JoinPredicate {
        &self.predicate
    }

    fn merge(&self, left: &Tuple, right: &Tuple) -> Result<Tuple> {
        let mut out = Tuple::new(Arc::clone(&self.desc));
        for (i, value) in left.fields().chain(right.fields()).enumerate() {
            if let Some(v) = value {
                out.set_field(i, v.clone())?;
            }
        }
        Ok(out)
    }
}

fn join_desc(predicate: &JoinPredicate, left: &BoxedOp, right: &BoxedOp) -> Result<TupleDesc> {
    left.tuple_desc().field_type(predicate.left_field)?;
    right.tuple_desc().field_type(predicate.right_field)?;
    Ok(TupleDesc::merge(left.tuple_desc(), right.tuple_desc()))
}

impl Producer for Join {
    fn name(&self) -> &'static str {
        "nested_loop_join"
    }

    fn tuple_desc(&self) -> &Arc<TupleDesc> {
        &self.desc
    }

    fn open(&mut self) -> Result<()> {
        self.outer = None;
        self.left.open()?;
        self.right.open()
    }

    fn close(&mut self) {
        self.outer = None;
        self.left.close();
        self.right.close();
    }

    fn produce_next(&mut self) -> Result<Option<Tuple>> {
        loop {
            let outer = match self.outer.take() {
                Some(t) => t,
                None if self.left.has_next()? => self.left.next()?,
                None => return Ok(None),
            };

            while self.right.has_next()? {
                let inner = self.right.next()?;
                if self.predicate.filter(&outer, &inner)? {
                    let joined = self.merge(&outer, &inner)?;
                    self.outer = Some(outer);
                    return Ok(Some(joined));
                }
            }
            self.right.rewind()?;
        }
    }

    fn children(&self) -> Vec<&dyn OpIterator> {
        vec![self.left.as_ref(), self.right.as_ref()]
    }

    fn set_children(&mut self, children: Vec<BoxedOp>) -> Result<()> {
        let [left, right] = take_children::<2>(self.name(), children)?;
        self.desc = Arc::new(join_desc(&self.predicate, &left, &right)?);
        self.left = left;
        self.right = right;
        self.outer = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::TupleScan;
    use crate::traits::OpError;
    use tessera_core::types::{Field, Op, Type};

    fn scan(name: &str, rows: &[(i32, &str)]) -> BoxedOp {
        let desc = Arc::new(
            TupleDesc::new(
                vec![Type::Int, Type::String],
                vec![Some(format!("{name}.id")), Some(format!("{name}.s"))],
            )
            .unwrap(),
        );
        let rows = rows
            .iter()
            .map(|(i, s)| {
                let fields = vec![Field::Int(*i), Field::from(*s)];
                Tuple::from_fields(Arc::clone(&desc), fields).unwrap()
            })
            .collect();
        TupleScan::new(desc, rows).unwrap().boxed()
    }

    fn pairs(op: &mut dyn OpIterator) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        while op.has_next().unwrap() {
            let t = op.next().unwrap();
            let l = t.get_field(0).unwrap().and_then(Field::as_int).unwrap();
            let r = t.get_field(2).unwrap().and_then(Field::as_int).unwrap();
            out.push((l, r));
        }
        out
    }

    #[test]
    fn equi_join_emits_matches_in_outer_then_inner_order() {
        let left = scan("a", &[(1, "x"), (2, "y"), (3, "z")]);
        let right = scan("b", &[(3, "p"), (1, "q"), (1, "r"), (4, "s")]);
        let mut op = Join::new(JoinPredicate::new(0, Op::Equals, 0), left, right)
            .unwrap()
            .into_operator();

        assert_eq!(op.tuple_desc().num_fields(), 4);
        assert_eq!(op.tuple_desc().field_name(2).unwrap(), Some("b.id"));

        op.open().unwrap();
        assert_eq!(pairs(&mut op), vec![(1, 1), (1, 1), (3, 3)]);
        op.rewind().unwrap();
        assert_eq!(pairs(&mut op), vec![(1, 1), (1, 1), (3, 3)]);
        op.close();
    }

    #[test]
    fn merged_row_carries_both_sides() {
        let mut op = Join::new(
            JoinPredicate::new(0, Op::LessThan, 0),
            scan("a", &[(1, "x")]),
            scan("b", &[(2, "y")]),
        )
        .unwrap()
        .into_operator();
        op.open().unwrap();
        let t = op.next().unwrap();
        assert_eq!(t.to_string(), "1\tx\t2\ty");
        assert!(matches!(op.next(), Err(OpError::NoSuchElement)));
    }

    #[test]
    fn empty_side_yields_nothing() {
        let mut op = Join::new(
            JoinPredicate::new(0, Op::Equals, 0),
            scan("a", &[(1, "x")]),
            scan("b", &[]),
        )
        .unwrap()
        .into_operator();
        op.open().unwrap();
        assert!(!op.has_next().unwrap());
    }

    #[test]
    fn predicate_fields_are_checked() {
        let err = Join::new(
            JoinPredicate::new(0, Op::Equals, 5),
            scan("a", &[]),
            scan("b", &[]),
        )
        .err()
        .unwrap();
        assert!(matches!(err, OpError::Core(_)));
    }

    #[test]
    fn set_children_recomputes_desc() {
        let mut op = Join::new(
            JoinPredicate::new(0, Op::Equals, 0),
            scan("a", &[]),
            scan("b", &[]),
        )
        .unwrap()
        .into_operator();
        op.set_children(vec![scan("c", &[(1, "x")]), scan("d", &[(1, "y")])])
            .unwrap();
        assert_eq!(op.tuple_desc().field_name(0).unwrap(), Some("c.id"));
        assert_eq!(op.children().len(), 2);

        op.open().unwrap();
        assert_eq!(pairs(&mut op), vec![(1, 1)]);
        assert!(op.set_children(vec![scan("e", &[])]).is_err());
    }
}

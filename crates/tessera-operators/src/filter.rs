//! Filter operator: passes through the child rows that satisfy a `Predicate`.

use std::sync::Arc;

use tessera_core::schema::TupleDesc;
use tessera_core::tuple::Tuple;

use crate::predicate::Predicate;
use crate::traits::{take_children, BoxedOp, OpIterator, Producer, Result};

pub struct Filter {
    predicate: Predicate,
    child: BoxedOp,
}

impl Filter {
    pub fn new(predicate: Predicate, child: BoxedOp) -> Result<Self> {
        check_field(&predicate, child.tuple_desc())?;
        Ok(Self { predicate, child })
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }
}

fn check_field(predicate: &Predicate, desc: &TupleDesc) -> Result<()> {
    desc.field_type(predicate.field)?;
    Ok(())
}

impl Producer for Filter {
    fn name(&self) -> &'static str {
        "filter"
    }

    // Same shape as the input.
    fn tuple_desc(&self) -> &Arc<TupleDesc> {
        self.child.tuple_desc()
    }

    fn open(&mut self) -> Result<()> {
        self.child.open()
    }

    fn close(&mut self) {
        self.child.close();
    }

    fn produce_next(&mut self) -> Result<Option<Tuple>> {
        while self.child.has_next()? {
            let t = self.child.next()?;
            if self.predicate.filter(&t)? {
                return Ok(Some(t));
            }
        }
        Ok(None)
    }

    fn children(&self) -> Vec<&dyn OpIterator> {
        vec![self.child.as_ref()]
    }

    fn set_children(&mut self, children: Vec<BoxedOp>) -> Result<()> {
        let [child] = take_children::<1>(self.name(), children)?;
        check_field(&self.predicate, child.tuple_desc())?;
        self.child = child;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::TupleScan;
    use crate::traits::OpError;
    use tessera_core::error::Error;
    use tessera_core::types::{Field, Op, Type};

    fn scan(values: &[i32]) -> BoxedOp {
        let desc = Arc::new(TupleDesc::new(vec![Type::Int], vec![Some("v")]).unwrap());
        let rows = values
            .iter()
            .map(|v| Tuple::from_fields(Arc::clone(&desc), vec![Field::Int(*v)]).unwrap())
            .collect();
        TupleScan::new(desc, rows).unwrap().boxed()
    }

    fn values(op: &mut dyn OpIterator) -> Vec<i32> {
        let mut out = Vec::new();
        while op.has_next().unwrap() {
            let t = op.next().unwrap();
            out.push(t.get_field(0).unwrap().and_then(Field::as_int).unwrap());
        }
        out
    }

    #[test]
    fn keeps_matching_rows_in_order() {
        let pred = Predicate::new(0, Op::GreaterThanOrEq, 3);
        let child = scan(&[5, 1, 3, 2, 7]);
        let mut op = Filter::new(pred, child).unwrap().into_operator();
        op.open().unwrap();
        assert_eq!(values(&mut op), vec![5, 3, 7]);
        op.rewind().unwrap();
        assert_eq!(values(&mut op), vec![5, 3, 7]);
        op.close();
    }

    #[test]
    fn nothing_matches() {
        let pred = Predicate::new(0, Op::Equals, 100);
        let mut op = Filter::new(pred, scan(&[1, 2])).unwrap().into_operator();
        op.open().unwrap();
        assert!(matches!(op.next(), Err(OpError::NoSuchElement)));
    }

    #[test]
    fn field_out_of_range_is_rejected() {
        let err = Filter::new(Predicate::new(3, Op::Equals, 1), scan(&[1]))
            .err()
            .unwrap();
        assert!(matches!(err, OpError::Core(Error::NoSuchField(_))));
    }

    #[test]
    fn children_can_be_replaced() {
        let mut op = Filter::new(Predicate::new(0, Op::LessThan, 2), scan(&[1]))
            .unwrap()
            .into_operator();
        assert_eq!(op.children().len(), 1);
        assert_eq!(op.children()[0].name(), "tuple_scan");

        op.set_children(vec![scan(&[0, 1, 2, 3])]).unwrap();
        op.open().unwrap();
        assert_eq!(values(&mut op), vec![0, 1]);
        op.close();

        assert!(op.set_children(vec![]).is_err());
        assert!(op.set_children(vec![scan(&[1]), scan(&[2])]).is_err());
    }
}

//! Leaf operators: in-memory rows and catalog tables.

use std::sync::Arc;
use std::vec;

use tessera_core::buffer::{Catalog, DbFile};
use tessera_core::error::Error;
use tessera_core::id::TableId;
use tessera_core::schema::{TdItem, TupleDesc};
use tessera_core::tuple::Tuple;

use crate::traits::{Producer, Result};

/// Replays a fixed list of rows.
pub struct TupleScan {
    desc: Arc<TupleDesc>,
    rows: Vec<Tuple>,
    pos: usize,
}

impl TupleScan {
    /// Every row must have the same field types as `desc`.
    pub fn new(desc: Arc<TupleDesc>, rows: Vec<Tuple>) -> Result<Self> {
        if let Some((i, bad)) = rows
            .iter()
            .enumerate()
            .find(|(_, t)| !desc.types_match(t.tuple_desc()))
        {
            return Err(Error::InvalidSchema(format!(
                "row {i} is [{}], scan produces [{desc}]",
                bad.tuple_desc()
            ))
            .into());
        }
        Ok(Self { desc, rows, pos: 0 })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Producer for TupleScan {
    fn name(&self) -> &'static str {
        "tuple_scan"
    }

    fn tuple_desc(&self) -> &Arc<TupleDesc> {
        &self.desc
    }

    fn open(&mut self) -> Result<()> {
        self.pos = 0;
        Ok(())
    }

    fn produce_next(&mut self) -> Result<Option<Tuple>> {
        let row = self.rows.get(self.pos).cloned();
        if row.is_some() {
            self.pos += 1;
        }
        Ok(row)
    }
}

/// Sequential scan over every row of a catalog table.
///
/// Output field names are qualified with the alias: `alias.name`, or
/// `alias.null` for an anonymous field. Record ids are preserved.
pub struct SeqScan {
    table: TableId,
    alias: String,
    file: Arc<dyn DbFile>,
    desc: Arc<TupleDesc>,
    rows: Option<vec::IntoIter<Tuple>>,
}

impl SeqScan {
    pub fn new(table: TableId, alias: &str, catalog: &dyn Catalog) -> Result<Self> {
        let file = Arc::clone(catalog.table(table)?.file());
        let desc = Arc::new(aliased(file.tuple_desc(), alias)?);
        Ok(Self {
            table,
            alias: alias.to_string(),
            file,
            desc,
            rows: None,
        })
    }

    pub fn table_id(&self) -> TableId {
        self.table
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Re-tag a stored row with the aliased descriptor.
    fn retag(&self, row: &Tuple) -> Result<Tuple> {
        let mut out = Tuple::new(Arc::clone(&self.desc));
        for (i, value) in row.fields().enumerate() {
            if let Some(v) = value {
                out.set_field(i, v.clone())?;
            }
        }
        if let Some(rid) = row.record_id() {
            out.set_record_id(rid);
        }
        Ok(out)
    }
}

fn aliased(desc: &TupleDesc, alias: &str) -> Result<TupleDesc> {
    let items = desc
        .iter()
        .map(|item| {
            let name = item.field_name.as_deref().unwrap_or("null");
            TdItem::new(item.field_type, Some(format!("{alias}.{name}")))
        })
        .collect();
    Ok(TupleDesc::from_items(items)?)
}

impl Producer for SeqScan {
    fn name(&self) -> &'static str {
        "seq_scan"
    }

    fn tuple_desc(&self) -> &Arc<TupleDesc> {
        &self.desc
    }

    fn open(&mut self) -> Result<()> {
        // Snapshot: rows inserted while the scan is open are not seen.
        self.rows = Some(self.file.scan()?.into_iter());
        Ok(())
    }

    fn close(&mut self) {
        self.rows = None;
    }

    fn produce_next(&mut self) -> Result<Option<Tuple>> {
        let Some(row) = self.rows.as_mut().and_then(Iterator::next) else {
            return Ok(None);
        };
        self.retag(&row).map(Some)
    }
}

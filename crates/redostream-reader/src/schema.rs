//! Schema Dictionary
//!
//! Maps object numbers seen in the redo stream to immutable table
//! descriptors. The dictionary is seeded once at startup from the catalog's
//! table and column listings and is read-only while streaming - the log
//! reader looks objects up by the object number embedded in each redo
//! record.
//!
//! Partitioned and index-organized tables carry no data object number and
//! are skipped during seeding. When two masks match the same object, the
//! first registration wins.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use redostream_catalog::{CatalogClient, ColumnRow};

use crate::error::Result;

/// One column of a registered table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    pub col_no: u64,
    pub seg_col_no: u64,
    pub name: String,
    pub type_no: u64,
    pub length: u64,
    pub precision: Option<i64>,
    pub scale: Option<i64>,
    pub num_pk: u64,
    pub nullable: bool,
}

impl From<&ColumnRow> for TableColumn {
    fn from(row: &ColumnRow) -> Self {
        Self {
            col_no: row.col_no,
            seg_col_no: row.seg_col_no,
            name: row.name.clone(),
            type_no: row.type_no,
            length: row.length,
            precision: row.precision,
            scale: row.scale,
            num_pk: row.num_pk,
            nullable: row.nullable,
        }
    }
}

/// An immutable table descriptor registered in the dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableObject {
    pub objn: u32,
    pub objd: u32,
    pub dependencies: bool,
    pub clu_cols: u64,
    pub options: u64,
    pub owner: String,
    pub name: String,
    pub columns: Vec<TableColumn>,
    pub total_cols: u64,
    pub total_pk: u64,
}

/// Object-number lookup table, populated once, shared read-only afterwards.
#[derive(Debug, Default)]
pub struct SchemaDictionary {
    objects: HashMap<u32, Arc<TableObject>>,
}

impl SchemaDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the descriptor for an object number.
    pub fn get(&self, objn: u32) -> Option<&Arc<TableObject>> {
        self.objects.get(&objn)
    }

    /// Register a descriptor. The first registration of an object number
    /// wins; later ones are dropped.
    pub fn insert(&mut self, object: TableObject) {
        self.objects.entry(object.objn).or_insert_with(|| Arc::new(object));
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Seed the dictionary from the catalog for one `OWNER.NAME` mask.
    /// Returns the number of tables registered.
    pub async fn seed(
        &mut self,
        catalog: &dyn CatalogClient,
        mask: &str,
        options: u64,
    ) -> Result<usize> {
        info!(mask, "reading table schema");
        let mut registered = 0usize;

        for table in catalog.list_tables(mask).await? {
            let objd = match table.objd {
                Some(objd) => objd,
                None => {
                    debug!(
                        owner = %table.owner,
                        table = %table.name,
                        objn = table.objn,
                        "skipped: partitioned or index-organized"
                    );
                    continue;
                }
            };

            let mut columns = Vec::new();
            let mut total_pk = 0u64;
            for row in catalog.list_columns(table.objn).await? {
                total_pk += row.num_pk;
                columns.push(TableColumn::from(&row));
            }
            let total_cols = columns.len() as u64;

            info!(
                owner = %table.owner,
                table = %table.name,
                objn = table.objn,
                objd,
                dependencies = table.dependencies,
                "found table"
            );

            self.insert(TableObject {
                objn: table.objn,
                objd,
                dependencies: table.dependencies,
                // The catalog reports a cluster-column count but the
                // original pipeline never consumed it; keep zero until the
                // record decoder needs it.
                clu_cols: 0,
                options,
                owner: table.owner,
                name: table.name,
                columns,
                total_cols,
                total_pk,
            });
            registered += 1;
        }

        info!(mask, total = registered, "table schema loaded");
        Ok(registered)
    }
}

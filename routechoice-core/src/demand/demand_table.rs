use indexmap::IndexMap;
use log::warn;

use super::demand_column::{DemandColumn, DemandValue};
use super::demand_error::DemandError;

/// an `(origin, destination)` pair of external node ids, as carried on
/// demand rows before resolution against the compact graph.
pub type OdPair = (i64, i64);

/// accumulates sparse demand rows and dense OD matrices, then collapses them
/// into a column-major, OD-order-aligned table via [`DemandTable::finalize`].
#[derive(Debug, Default)]
pub struct DemandTable {
    rows: IndexMap<OdPair, IndexMap<String, DemandValue>>,
    column_kinds: IndexMap<String, &'static str>,
}

impl DemandTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// true once finalized if every value in every column is zero.
    pub fn no_demand(&self) -> bool {
        self.rows
            .values()
            .all(|row| row.values().all(|v| v.as_f64() == 0.0))
    }

    /// merges a sparse set of rows into the table. a row's absent columns
    /// are filled with `fill_value` at finalize time, not here.
    pub fn add_frame(
        &mut self,
        frame: Vec<(OdPair, Vec<(String, DemandValue)>)>,
    ) -> Result<(), DemandError> {
        for (od, columns) in frame {
            for (name, value) in columns {
                self.check_and_register_kind(&name, value.kind())?;
                let row = self.rows.entry(od).or_default();
                if row.insert(name.clone(), value).is_some() {
                    warn!("demand row ({}, {}) re-supplied column {name:?}; overwriting", od.0, od.1);
                }
            }
        }
        Ok(())
    }

    /// converts a dense OD matrix into sparse rows, dropping zero and NaN
    /// entries, then merges it the same way `add_frame` would. Unlike
    /// `add_frame`, which accumulates a column incrementally across many
    /// calls, one `add_dense_matrix` call supplies a column's complete
    /// value set, so `column_name` must not already exist.
    pub fn add_dense_matrix(
        &mut self,
        matrix: &[Vec<f64>],
        origin_ids: &[i64],
        destination_ids: &[i64],
        column_name: &str,
    ) -> Result<(), DemandError> {
        self.declare_column(column_name, "f64")?;
        for (i, origin) in origin_ids.iter().enumerate() {
            for (j, destination) in destination_ids.iter().enumerate() {
                let value = matrix[i][j];
                if value == 0.0 || value.is_nan() {
                    continue;
                }
                let row = self.rows.entry((*origin, *destination)).or_default();
                row.insert(column_name.to_string(), DemandValue::F64(value));
            }
        }
        Ok(())
    }

    fn check_and_register_kind(&mut self, name: &str, kind: &'static str) -> Result<(), DemandError> {
        match self.column_kinds.get(name) {
            Some(existing) if *existing != kind => {
                Err(DemandError::TypeMismatch(name.to_string(), existing))
            }
            Some(_) => Ok(()),
            None => {
                self.column_kinds.insert(name.to_string(), kind);
                Ok(())
            }
        }
    }

    /// registers a brand-new column name up front; used when a caller wants
    /// a duplicate-name collision reported even before any rows land in it.
    pub fn declare_column(&mut self, name: &str, kind: &'static str) -> Result<(), DemandError> {
        if self.column_kinds.contains_key(name) {
            return Err(DemandError::DuplicateDemandColumn(name.to_string()));
        }
        self.column_kinds.insert(name.to_string(), kind);
        Ok(())
    }

    /// produces the column-major, OD-order-aligned view: a vector of OD
    /// pairs and, per column, a contiguous value vector aligned with it.
    /// Missing cells fill to 0, preserving each column's declared dtype.
    pub fn finalize(&self) -> FinalizedDemand {
        let od_pairs: Vec<OdPair> = self.rows.keys().copied().collect();
        let mut columns: IndexMap<String, DemandColumn> = IndexMap::new();
        for (name, kind) in &self.column_kinds {
            let mut column = match *kind {
                "f32" => DemandColumn::F32(Vec::with_capacity(od_pairs.len())),
                _ => DemandColumn::F64(Vec::with_capacity(od_pairs.len())),
            };
            for od in &od_pairs {
                match self.rows.get(od).and_then(|row| row.get(name)) {
                    Some(value) => match (&mut column, value) {
                        (DemandColumn::F32(v), DemandValue::F32(x)) => v.push(*x),
                        (DemandColumn::F64(v), DemandValue::F64(x)) => v.push(*x),
                        _ => column.push_fill(),
                    },
                    None => column.push_fill(),
                }
            }
            columns.insert(name.clone(), column);
        }
        FinalizedDemand { od_pairs, columns }
    }
}

/// the column-major demand table produced by [`DemandTable::finalize`].
#[derive(Debug, Clone, Default)]
pub struct FinalizedDemand {
    pub od_pairs: Vec<OdPair>,
    pub columns: IndexMap<String, DemandColumn>,
}

impl FinalizedDemand {
    pub fn value(&self, column: &str, row: usize) -> Option<f64> {
        self.columns.get(column).map(|c| c.value_at(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_fills_missing_with_zero() {
        let mut table = DemandTable::new();
        table
            .add_frame(vec![
                ((0, 1), vec![("volume".to_string(), DemandValue::F64(10.0))]),
                ((0, 2), vec![("trucks".to_string(), DemandValue::F64(2.0))]),
            ])
            .unwrap();
        let finalized = table.finalize();
        assert_eq!(finalized.od_pairs.len(), 2);
        assert_eq!(finalized.value("volume", 1), Some(0.0));
        assert_eq!(finalized.value("trucks", 0), Some(0.0));
    }

    #[test]
    fn duplicate_column_name_with_mismatched_type_is_an_error() {
        let mut table = DemandTable::new();
        table
            .add_frame(vec![((0, 1), vec![("volume".to_string(), DemandValue::F64(1.0))])])
            .unwrap();
        let err = table
            .add_frame(vec![((1, 2), vec![("volume".to_string(), DemandValue::F32(1.0))])])
            .unwrap_err();
        assert!(matches!(err, DemandError::TypeMismatch(_, "f64")));
    }

    #[test]
    fn dense_matrix_drops_zero_and_nan() {
        let mut table = DemandTable::new();
        let matrix = vec![vec![0.0, 5.0], vec![f64::NAN, 3.0]];
        table
            .add_dense_matrix(&matrix, &[0, 1], &[0, 1], "volume")
            .unwrap();
        let finalized = table.finalize();
        assert_eq!(finalized.od_pairs.len(), 2);
    }

    #[test]
    fn add_dense_matrix_twice_with_same_name_is_duplicate() {
        let mut table = DemandTable::new();
        let matrix = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        table.add_dense_matrix(&matrix, &[0, 1], &[0, 1], "volume").unwrap();
        let err = table.add_dense_matrix(&matrix, &[0, 1], &[0, 1], "volume").unwrap_err();
        assert!(matches!(err, DemandError::DuplicateDemandColumn(_)));
    }

    #[test]
    fn add_dense_matrix_after_add_frame_with_same_name_is_duplicate() {
        let mut table = DemandTable::new();
        table
            .add_frame(vec![((0, 1), vec![("volume".to_string(), DemandValue::F64(1.0))])])
            .unwrap();
        let matrix = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let err = table.add_dense_matrix(&matrix, &[0, 1], &[0, 1], "volume").unwrap_err();
        assert!(matches!(err, DemandError::DuplicateDemandColumn(_)));
    }

    #[test]
    fn add_frame_can_add_more_rows_to_an_already_declared_column_across_calls() {
        let mut table = DemandTable::new();
        table
            .add_frame(vec![((0, 1), vec![("volume".to_string(), DemandValue::F64(1.0))])])
            .unwrap();
        table
            .add_frame(vec![((2, 3), vec![("volume".to_string(), DemandValue::F64(2.0))])])
            .unwrap();
        let finalized = table.finalize();
        assert_eq!(finalized.od_pairs.len(), 2);
    }

    #[test]
    fn declare_column_twice_is_duplicate() {
        let mut table = DemandTable::new();
        table.declare_column("volume", "f64").unwrap();
        let err = table.declare_column("volume", "f64").unwrap_err();
        assert!(matches!(err, DemandError::DuplicateDemandColumn(_)));
    }
}

//! End-to-end brushing scenarios against a populated table

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::Result;
use approx::assert_abs_diff_eq;
use chrono::{Duration, TimeZone, Utc};
use lv_core::{
    CategoricalColumnSelection, ColumnHandle, ColumnId, DataTableListener, DoubleColumnSelectionRange,
    EventDispatcher, TableEvent, TemporalColumnSelectionRange, Value,
};
use lv_data::{Column, DataTable, Histogram, Tuple};
use parking_lot::Mutex;

const A: ColumnId = ColumnId(0);
const B: ColumnId = ColumnId(1);

/// A(double: 1,2,3,10), B(categorical: x,y,x,y)
fn scenario_table() -> Result<DataTable> {
    let tuples = [(1.0, "x"), (2.0, "y"), (3.0, "x"), (10.0, "y")]
        .iter()
        .map(|&(a, b)| Tuple::from_elements(vec![a.into(), b.into()]))
        .collect();
    let mut table = DataTable::new();
    table.set_data(vec![Column::double("A"), Column::categorical("B")], tuples)?;
    Ok(table)
}

fn assert_partition(table: &DataTable) {
    let query = table.active_query();
    let queried: BTreeSet<_> = query.queried_rows().iter().copied().collect();
    let rest: BTreeSet<_> = query.non_queried_rows().iter().copied().collect();
    assert!(queried.is_disjoint(&rest));
    assert_eq!(queried.len() + rest.len(), table.tuple_count());
    for (row, tuple) in table.tuples().iter().enumerate() {
        assert_eq!(tuple.query_flag(), queried.contains(&row));
    }
}

#[test]
fn test_brushing_scenario() -> Result<()> {
    let mut table = scenario_table()?;

    table.add_selection(DoubleColumnSelectionRange::new(A, 0.0, 5.0)?.into())?;
    assert_eq!(table.active_query().queried_rows(), &[0, 1, 2]);
    assert_eq!(table.active_query().non_queried_rows(), &[3]);
    assert_partition(&table);

    table.add_selection(CategoricalColumnSelection::new(B, ["x"]).into())?;
    assert_eq!(table.active_query().queried_rows(), &[0, 2]);
    assert_eq!(table.active_query().non_queried_rows(), &[1, 3]);
    assert_partition(&table);

    let queried_a = table
        .active_query()
        .queried_statistics(A)
        .and_then(|s| s.as_double())
        .expect("queried statistics for A");
    assert_abs_diff_eq!(queried_a.mean(), 2.0);
    let queried_b = table
        .active_query()
        .queried_statistics(B)
        .and_then(|s| s.as_categorical())
        .expect("queried statistics for B");
    assert_eq!(queried_b.count_for("x"), 2);
    assert_eq!(queried_b.count_for("y"), 0);
    Ok(())
}

#[test]
fn test_zero_selections_select_nothing() -> Result<()> {
    let mut table = scenario_table()?;
    assert!(table.active_query().queried_rows().is_empty());
    assert_eq!(table.active_query().non_queried_count(), 4);

    let (id, _) = table.add_selection(DoubleColumnSelectionRange::new(A, 0.0, 100.0)?.into())?;
    assert_eq!(table.active_query().queried_count(), 4);
    table.remove_selection(id)?;
    assert!(table.active_query().queried_rows().is_empty());
    assert_partition(&table);
    Ok(())
}

#[test]
fn test_summary_statistics() -> Result<()> {
    let tuples = (1..=5)
        .map(|v| Tuple::from_elements(vec![Value::Double(v as f64)]))
        .collect();
    let mut table = DataTable::new();
    table.set_data(vec![Column::double("v")], tuples)?;

    let stats = table.columns()[0]
        .statistics()
        .and_then(|s| s.as_double())
        .expect("statistics for v");
    assert_eq!(stats.min(), 1.0);
    assert_eq!(stats.max(), 5.0);
    assert_abs_diff_eq!(stats.mean(), 3.0);
    assert_abs_diff_eq!(stats.median(), 3.0);
    assert_abs_diff_eq!(stats.variance(), 2.5);

    let histogram = stats.histogram().expect("histogram");
    assert_eq!(histogram.counts().iter().sum::<usize>(), 5);
    Ok(())
}

#[test]
fn test_nan_is_excluded_everywhere() -> Result<()> {
    let tuples = [1.0, f64::NAN, 3.0]
        .iter()
        .map(|&v| Tuple::from_elements(vec![Value::Double(v), Value::Double(v * 2.0)]))
        .collect();
    let mut table = DataTable::new();
    table.set_data(vec![Column::double("a"), Column::double("b")], tuples)?;

    let stats = table.columns()[0]
        .statistics()
        .and_then(|s| s.as_double())
        .expect("statistics for a");
    assert_eq!(stats.count(), 2);
    assert_eq!(stats.nan_count(), 1);
    assert_abs_diff_eq!(stats.mean(), 2.0);

    let histogram = table.histograms_2d().get(ColumnId(0), ColumnId(1)).expect("a x b");
    assert_eq!(histogram.total_count(), 2);

    table.add_selection(DoubleColumnSelectionRange::new(ColumnId(0), f64::MIN, f64::MAX)?.into())?;
    assert_eq!(table.active_query().queried_rows(), &[0, 2]);
    Ok(())
}

#[test]
fn test_infinities_are_treated_as_missing() -> Result<()> {
    let tuples = [1.0, f64::INFINITY, 3.0, 5.0]
        .iter()
        .map(|&v| Tuple::from_elements(vec![Value::Double(v), Value::Double(2.0)]))
        .collect();
    let mut table = DataTable::new();
    table.set_data(vec![Column::double("a"), Column::double("b")], tuples)?;

    let stats = table.columns()[0]
        .statistics()
        .and_then(|s| s.as_double())
        .expect("statistics for a");
    assert_eq!(stats.max(), 5.0);
    assert_eq!(stats.nan_count(), 1);
    let histogram = stats.histogram().expect("histogram");
    assert_eq!(histogram.counts(), &[1, 2]);

    let a_b = table.histograms_2d().get(ColumnId(0), ColumnId(1)).expect("a x b");
    assert_eq!(a_b.total_count(), 3);

    let everything = DoubleColumnSelectionRange::new(A, f64::NEG_INFINITY, f64::INFINITY)?;
    table.add_selection(everything.into())?;
    assert_eq!(table.active_query().queried_rows(), &[0, 2, 3]);
    Ok(())
}

#[test]
fn test_disable_enable_restores_values() -> Result<()> {
    let mut table = scenario_table()?;
    let original: Vec<Vec<Value>> = table.tuples().iter().map(|t| t.elements().to_vec()).collect();

    table.disable_column(A)?;
    assert!(table.tuples().iter().all(|t| t.element_count() == 1));
    table.enable_column(A)?;

    let restored: Vec<Vec<Value>> = table.tuples().iter().map(|t| t.elements().to_vec()).collect();
    assert_eq!(restored, original);
    assert_eq!(table.column_index(A), Some(0));
    Ok(())
}

#[test]
fn test_reorder_keeps_values_by_name() -> Result<()> {
    let mut table = scenario_table()?;
    table.add_selection(DoubleColumnSelectionRange::new(A, 0.0, 5.0)?.into())?;
    let before: Vec<_> = table.active_query().queried_rows().to_vec();

    table.change_column_order(&[B, A])?;
    let a = table.column_by_name("A").expect("column A").id();
    let slot = table.column_index(a).expect("A enabled");
    let values: Vec<_> = table.tuples().iter().map(|t| t.element(slot).clone()).collect();
    assert_eq!(
        values,
        vec![Value::Double(1.0), Value::Double(2.0), Value::Double(3.0), Value::Double(10.0)]
    );

    table.calculate_statistics();
    assert_eq!(table.active_query().queried_rows(), &before[..]);
    assert!(table.active_query().queried_statistics(A).is_some());
    Ok(())
}

#[test]
fn test_temporal_selection() -> Result<()> {
    let origin = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let tuples = (0..4)
        .map(|day| Tuple::from_elements(vec![Value::Temporal(origin + Duration::days(day))]))
        .collect();
    let mut table = DataTable::new();
    table.set_data(vec![Column::temporal("when")], tuples)?;

    let stats = table.columns()[0]
        .statistics()
        .and_then(|s| s.as_temporal())
        .expect("statistics for when");
    assert_eq!(stats.start(), Some(origin));
    assert_eq!(stats.end(), Some(origin + Duration::days(3)));

    let range = TemporalColumnSelectionRange::new(
        ColumnId(0),
        origin + Duration::days(1),
        origin + Duration::days(2),
    )?;
    table.add_selection(range.into())?;
    assert_eq!(table.active_query().queried_rows(), &[1, 2]);
    Ok(())
}

#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<String>>,
}

impl DataTableListener for Recorder {
    fn data_table_reset(&self) {
        self.seen.lock().push("reset".to_string());
    }

    fn data_table_selection_added(&self, range: &lv_core::ColumnSelectionRange) {
        self.seen.lock().push(format!("selection added on {}", range.column()));
    }

    fn data_table_tuples_removed(&self, count: usize) {
        self.seen.lock().push(format!("removed {}", count));
    }

    fn data_table_column_disabled(&self, column: &ColumnHandle) {
        self.seen.lock().push(format!("disabled {}", column.name));
    }
}

#[test]
fn test_events_reach_listeners() -> Result<()> {
    let recorder = Arc::new(Recorder::default());
    let listener: Arc<dyn DataTableListener> = recorder.clone();
    let dispatcher = EventDispatcher::new();
    dispatcher.add_listener(&listener);

    let mut table = scenario_table()?;
    dispatcher.publish(&[TableEvent::Reset]);

    let (_, events) = table.add_selection(DoubleColumnSelectionRange::new(A, 0.0, 5.0)?.into())?;
    dispatcher.publish(&events);
    let (removed, events) = table.remove_unselected_tuples();
    assert_eq!(removed, 1);
    dispatcher.publish(&events);
    dispatcher.publish(&table.disable_column(B)?);

    assert_eq!(
        *recorder.seen.lock(),
        vec!["reset", "selection added on c0", "removed 1", "disabled B"]
    );
    Ok(())
}

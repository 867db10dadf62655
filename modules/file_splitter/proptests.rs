//! Property-based tests for the row partitioning.
//!
//! - Concatenated chunks reproduce the source data rows in order
//! - Every chunk carries the source header
//! - Chunk count never exceeds the requested count
//! - All chunks but the last hold exactly ceil(rows / count) rows

use proptest::prelude::*;

use super::{split, CellValue, ChunkSpec, TabularDocument};

fn cell() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        "[a-z]{0,8}".prop_map(CellValue::Text),
        (-1.0e6f64..1.0e6).prop_map(CellValue::Number),
        any::<bool>().prop_map(CellValue::Bool),
        Just(CellValue::Empty),
    ]
}

fn document() -> impl Strategy<Value = TabularDocument> {
    (1usize..6).prop_flat_map(|width| {
        (
            prop::collection::vec(cell(), width),
            prop::collection::vec(prop::collection::vec(cell(), width), 0..60),
        )
            .prop_map(|(header, rows)| TabularDocument::new(header, rows))
    })
}

proptest! {
    #[test]
    fn chunks_partition_data_rows(doc in document(), count in 2usize..20) {
        let chunks = split(&doc, count);
        let rebuilt: Vec<Vec<CellValue>> = chunks
            .iter()
            .flat_map(|c| c.data_rows().iter().cloned())
            .collect();
        prop_assert_eq!(rebuilt.as_slice(), doc.data_rows());
    }

    #[test]
    fn every_chunk_keeps_header(doc in document(), count in 2usize..20) {
        for chunk in split(&doc, count) {
            prop_assert_eq!(chunk.header(), doc.header());
            prop_assert_eq!(chunk.column_count(), doc.column_count());
        }
    }

    #[test]
    fn chunk_count_is_bounded(doc in document(), count in 2usize..20) {
        let chunks = split(&doc, count);
        let rows = doc.data_row_count();

        prop_assert!(chunks.len() <= count);
        prop_assert!(!chunks.is_empty());
        if rows == 0 {
            prop_assert_eq!(chunks.len(), 1);
            prop_assert_eq!(chunks[0].data_row_count(), 0);
        } else {
            prop_assert!(chunks.iter().all(|c| c.data_row_count() >= 1));
        }
        if chunks.len() == count {
            prop_assert!(rows >= count);
        }
    }

    #[test]
    fn chunks_use_ceiling_sizes(doc in document(), count in 2usize..20) {
        let rows = doc.data_row_count();
        prop_assume!(rows > 0);

        let per_chunk = ChunkSpec::new(count, rows).rows_per_chunk;
        prop_assert_eq!(per_chunk, rows.div_ceil(count));

        let chunks = split(&doc, count);
        let (last, rest) = chunks.split_last().unwrap();
        for chunk in rest {
            prop_assert_eq!(chunk.data_row_count(), per_chunk);
        }
        prop_assert!(last.data_row_count() >= 1 && last.data_row_count() <= per_chunk);
    }
}

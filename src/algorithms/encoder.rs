use crate::models::TitleRecord;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

pub const MEMBERS_COLUMN: &str = "members";
pub const GENRE_PREFIX: &str = "primary_genre_";

#[derive(Debug, Clone)]
pub struct OneHotFrame {
    pub columns: Vec<String>,
    pub data: Array2<f64>,
}

impl OneHotFrame {
    pub fn encode<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a TitleRecord>,
    {
        let rows: Vec<&TitleRecord> = rows.into_iter().collect();
        let categories: BTreeSet<&str> = rows.iter().map(|r| r.primary_genre.as_str()).collect();

        let mut columns = Vec::with_capacity(categories.len() + 1);
        columns.push(MEMBERS_COLUMN.to_string());
        columns.extend(categories.iter().map(|c| format!("{}{}", GENRE_PREFIX, c)));

        let offset: HashMap<&str, usize> = categories
            .iter()
            .enumerate()
            .map(|(i, c)| (*c, i + 1))
            .collect();

        let mut data = Array2::<f64>::zeros((rows.len(), columns.len()));
        for (i, row) in rows.iter().enumerate() {
            data[[i, 0]] = row.members as f64;
            if let Some(&j) = offset.get(row.primary_genre.as_str()) {
                data[[i, j]] = 1.0;
            }
        }

        Self { columns, data }
    }

    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }
}

/// Ordered column layout fixed at training time.
///
/// Every encoding made after training goes through [`FeatureSchema::align`]:
/// columns the schema knows but the frame lacks are zero-filled, columns the
/// frame has but the schema does not are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl FeatureSchema {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn from_frame(frame: &OneHotFrame) -> Self {
        Self::new(frame.columns.clone())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn align(&self, frame: &OneHotFrame) -> Array2<f64> {
        let source: HashMap<&str, usize> = frame
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();

        let mut aligned = Array2::<f64>::zeros((frame.nrows(), self.width()));
        for (target, column) in self.columns.iter().enumerate() {
            if let Some(&from) = source.get(column.as_str()) {
                aligned.column_mut(target).assign(&frame.data.column(from));
            }
        }
        aligned
    }

    pub fn encode<'a, I>(&self, rows: I) -> Array2<f64>
    where
        I: IntoIterator<Item = &'a TitleRecord>,
    {
        self.align(&OneHotFrame::encode(rows))
    }
}

/// One measurement line of a snapshot file.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub line: u64,
    pub label: String,
    pub values: Vec<f64>,
}

/// Shared x-axis declared by a snapshot file's header line.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub label: String,
    pub values: Vec<f64>,
}

/// Values placed parallel to a [`SeriesIndex`](super::SeriesIndex). Series without data stay
/// `None`; they are never filled with zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTable {
    axis: Option<Axis>,
    values: Vec<Option<Vec<f64>>>,
}

impl SeriesTable {
    pub fn new(len: usize, axis: Option<Axis>) -> Self {
        Self { axis, values: vec![None; len] }
    }

    pub fn axis(&self) -> Option<&Axis> {
        self.axis.as_ref()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when at least one series received values.
    pub fn has_data(&self) -> bool {
        self.values.iter().any(Option::is_some)
    }

    /// Stores values for the series at `index`, returning values it replaced.
    pub fn insert(&mut self, index: usize, values: Vec<f64>) -> Option<Vec<f64>> {
        match self.values.get_mut(index) {
            Some(slot) => slot.replace(values),
            None => {
                tracing::warn!(%index, len=%self.values.len(), "ignoring values for series outside of table");
                None
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<&[f64]> {
        self.values.get(index).and_then(|v| v.as_deref())
    }

    /// First value of the series at `index`; the value plotted in bar charts.
    pub fn scalar(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(|v| v.first().copied())
    }

    pub fn scalars(&self) -> Vec<Option<f64>> {
        (0..self.values.len()).map(|i| self.scalar(i)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&[f64]>> + '_ {
        self.values.iter().map(|v| v.as_deref())
    }
}

use std::{fs::File, io::BufReader, iter::FusedIterator, path::Path};

use crate::{DatasetError, LoadOptions, RecordLayout, reader::RecordReader};

/// In-memory evaluation dataset.
///
/// Inputs and outputs are stored as row-major `f32` matrices so that a whole
/// batch can be handed to a model without further copying.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    layout: RecordLayout,
    inputs: Vec<f32>,
    outputs: Vec<f32>,
    skipped: usize,
}

impl Dataset {
    /// Creates an empty dataset with the given layout.
    #[must_use]
    pub fn empty(layout: RecordLayout) -> Self {
        Self {
            layout,
            inputs: vec![],
            outputs: vec![],
            skipped: 0,
        }
    }

    /// Builds a dataset from `(input, output)` rows.
    ///
    /// # Panics
    ///
    /// Panics if a row does not match the layout widths.
    #[must_use]
    pub fn from_rows<'a, I>(layout: RecordLayout, rows: I) -> Self
    where
        I: IntoIterator<Item = (&'a [f32], &'a [f32])>,
    {
        let mut dataset = Self::empty(layout);
        for (input, output) in rows {
            dataset.push(input, output);
        }
        dataset
    }

    /// Opens a dataset file.
    pub fn open<P>(path: P, options: &LoadOptions) -> Result<Self, DatasetError>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path)?;
        Self::read(BufReader::new(file), options)
    }

    /// Reads fixed-width records from `reader`.
    ///
    /// See the crate documentation for the record format.
    pub fn read<R>(reader: R, options: &LoadOptions) -> Result<Self, DatasetError>
    where
        R: std::io::BufRead,
    {
        let layout = options.layout;
        if layout.record_width() == 0 {
            return Err(DatasetError::EmptyLayout);
        }

        let mut dataset = Self::empty(layout);
        let mut reader = RecordReader::new(reader, layout.record_width());
        let mut index = 0;
        while options.max_samples.is_none_or(|max| dataset.len() < max) {
            let Some(record) = reader.next_record()? else {
                break;
            };
            let record_index = index;
            index += 1;
            if record.first() == Some(&b'-') {
                dataset.skipped += 1;
                continue;
            }
            for (column, &byte) in record.iter().enumerate() {
                if !byte.is_ascii_digit() {
                    return Err(DatasetError::InvalidDigit {
                        record: record_index,
                        column,
                        byte,
                    });
                }
                let value = f32::from(byte - b'0');
                if column < layout.input_width {
                    dataset.inputs.push(value);
                } else {
                    dataset.outputs.push(value);
                }
            }
        }
        Ok(dataset)
    }

    fn push(&mut self, input: &[f32], output: &[f32]) {
        assert_eq!(input.len(), self.layout.input_width, "input width mismatch");
        assert_eq!(
            output.len(),
            self.layout.output_width,
            "output width mismatch"
        );
        self.inputs.extend_from_slice(input);
        self.outputs.extend_from_slice(output);
    }

    #[must_use]
    pub fn layout(&self) -> RecordLayout {
        self.layout
    }

    /// Number of loaded records.
    #[must_use]
    pub fn len(&self) -> usize {
        if self.layout.input_width > 0 {
            self.inputs.len() / self.layout.input_width
        } else if self.layout.output_width > 0 {
            self.outputs.len() / self.layout.output_width
        } else {
            0
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of separator records skipped while loading.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Condition input of record `index`.
    #[must_use]
    pub fn input(&self, index: usize) -> &[f32] {
        let width = self.layout.input_width;
        &self.inputs[index * width..(index + 1) * width]
    }

    /// Target output of record `index`.
    #[must_use]
    pub fn output(&self, index: usize) -> &[f32] {
        let width = self.layout.output_width;
        &self.outputs[index * width..(index + 1) * width]
    }

    /// All condition inputs, row-major.
    #[must_use]
    pub fn inputs(&self) -> &[f32] {
        &self.inputs
    }

    /// All target outputs, row-major.
    #[must_use]
    pub fn outputs(&self) -> &[f32] {
        &self.outputs
    }

    /// Iterates over `(input, output)` rows.
    #[must_use]
    pub fn iter(&self) -> Rows<'_> {
        Rows {
            dataset: self,
            next: 0,
        }
    }

    /// Keeps only the first `count` records.
    pub fn truncate(&mut self, count: usize) {
        if count < self.len() {
            self.inputs.truncate(count * self.layout.input_width);
            self.outputs.truncate(count * self.layout.output_width);
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = (&'a [f32], &'a [f32]);
    type IntoIter = Rows<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over dataset rows.
#[derive(Debug, Clone)]
pub struct Rows<'a> {
    dataset: &'a Dataset,
    next: usize,
}

impl<'a> Iterator for Rows<'a> {
    type Item = (&'a [f32], &'a [f32]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.dataset.len() {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some((self.dataset.input(index), self.dataset.output(index)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.dataset.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Rows<'_> {}
impl FusedIterator for Rows<'_> {}

//! Cells addressed by candidate indices.

/// One cell per parameter set, stored in expansion order.
///
/// A cell is addressed by the candidate indices of its set
/// ([`ParameterSet::indices`](super::ParameterSet::indices)).
#[derive(Debug, Clone, PartialEq)]
pub struct SweepGrid<T> {
    shape: Vec<usize>,
    cells: Vec<T>,
}

impl<T: Clone> SweepGrid<T> {
    /// Grid of the given shape with every cell set to `fill`
    pub fn new(shape: Vec<usize>, fill: T) -> Self {
        let len = shape.iter().product();
        Self {
            cells: vec![fill; len],
            shape,
        }
    }
}

impl<T> SweepGrid<T> {
    /// Position of a cell in expansion order, `None` when out of range
    fn offset(&self, indices: &[usize]) -> Option<usize> {
        if indices.len() != self.shape.len() {
            return None;
        }
        indices
            .iter()
            .zip(&self.shape)
            .try_fold(0, |acc, (&i, &size)| (i < size).then_some(acc * size + i))
    }

    pub fn get(&self, indices: &[usize]) -> Option<&T> {
        self.offset(indices).map(|at| &self.cells[at])
    }

    /// Replace a cell. Returns false if `indices` is out of range.
    pub fn set(&mut self, indices: &[usize], value: T) -> bool {
        match self.offset(indices) {
            Some(at) => {
                self.cells[at] = value;
                true
            }
            None => false,
        }
    }

    /// Cells in expansion order
    pub fn data(&self) -> &[T] {
        &self.cells
    }
}

/// Odometer over every index of a shape, last dimension fastest.
///
/// A zero-length dimension yields nothing. A zero-dimensional shape yields
/// the single empty index.
#[derive(Debug, Clone)]
pub struct GridIndices {
    shape: Vec<usize>,
    next: Option<Vec<usize>>,
}

impl GridIndices {
    pub fn new(shape: Vec<usize>) -> Self {
        let next = (!shape.contains(&0)).then(|| vec![0; shape.len()]);
        Self { shape, next }
    }
}

impl Iterator for GridIndices {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;

        let mut following = current.clone();
        for (digit, &size) in following.iter_mut().zip(&self.shape).rev() {
            *digit += 1;
            if *digit < size {
                self.next = Some(following);
                break;
            }
            *digit = 0;
        }

        Some(current)
    }
}

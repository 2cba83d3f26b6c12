//! Instrumented comparison sorts
//!
//! Each [`SortAlgorithm`] sorts a private copy of its input in ascending
//! order and records a [`SortStep`] for every comparison, swap or write-back.
//! Every history starts with the untouched input and ends with a "Sorted!"
//! step whose `sorted` set covers every index.
//!
//! Index sets are highlight hints only:
//! - `compared`: the two positions currently being probed
//! - `pivot`: the quicksort pivot
//! - `swapped`: positions just written
//! - `sorted`: positions known to be final

use crate::snapshot::{History, SortStep};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// The available sorting algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortAlgorithm {
    Bubble,
    Insertion,
    Selection,
    Quick,
    Merge,
}

impl SortAlgorithm {
    pub const ALL: [SortAlgorithm; 5] = [
        SortAlgorithm::Bubble,
        SortAlgorithm::Insertion,
        SortAlgorithm::Selection,
        SortAlgorithm::Quick,
        SortAlgorithm::Merge,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SortAlgorithm::Bubble => "Bubble Sort",
            SortAlgorithm::Insertion => "Insertion Sort",
            SortAlgorithm::Selection => "Selection Sort",
            SortAlgorithm::Quick => "Quick Sort",
            SortAlgorithm::Merge => "Merge Sort",
        }
    }

    /// Sort a copy of `values`, returning the full step history
    pub fn run(self, values: &[i32]) -> History {
        let mut recorder = Recorder::new(values);
        match self {
            SortAlgorithm::Bubble => bubble_sort(&mut recorder),
            SortAlgorithm::Insertion => insertion_sort(&mut recorder),
            SortAlgorithm::Selection => selection_sort(&mut recorder),
            SortAlgorithm::Quick => {
                if !recorder.data.is_empty() {
                    let high = recorder.data.len() - 1;
                    quick_sort(&mut recorder, 0, high);
                }
            }
            SortAlgorithm::Merge => {
                if !recorder.data.is_empty() {
                    let right = recorder.data.len() - 1;
                    merge_sort(&mut recorder, 0, right);
                }
            }
        }
        let history = recorder.finish();
        tracing::debug!(
            algorithm = self.name(),
            input_len = values.len(),
            steps = history.len(),
            "sort history recorded"
        );
        history
    }
}

impl fmt::Display for SortAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortAlgorithm::ALL
            .into_iter()
            .find(|alg| alg.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| s.to_string())
    }
}

/// Working array plus the history being built for it
struct Recorder {
    data: Vec<i32>,
    history: History,
    /// Positions settled so far; carried on every step by algorithms that
    /// finalize one position at a time
    sorted: BTreeSet<usize>,
}

impl Recorder {
    fn new(values: &[i32]) -> Self {
        let mut history = History::new();
        history.push(SortStep::new(values, "Initial array"));
        Recorder {
            data: values.to_vec(),
            history,
            sorted: BTreeSet::new(),
        }
    }

    /// A step over the current data, carrying the settled positions
    fn step(&self, message: impl Into<String>) -> SortStep {
        let mut step = SortStep::new(&self.data, message);
        step.sorted = self.sorted.clone();
        step
    }

    fn record(&mut self, step: SortStep) {
        self.history.push(step);
    }

    fn settle(&mut self, index: usize, message: impl Into<String>) {
        self.sorted.insert(index);
        let step = self.step(message);
        self.record(step);
    }

    fn finish(mut self) -> History {
        let all = 0..self.data.len();
        self.history
            .push(SortStep::new(&self.data, "Sorted!").sorted(all));
        self.history
    }
}

fn bubble_sort(rec: &mut Recorder) {
    let n = rec.data.len();
    for i in 0..n.saturating_sub(1) {
        let mut swapped = false;
        for j in 0..n - i - 1 {
            let step = rec
                .step(format!("Comparing {} and {}", rec.data[j], rec.data[j + 1]))
                .compared([j, j + 1]);
            rec.record(step);

            if rec.data[j] > rec.data[j + 1] {
                rec.data.swap(j, j + 1);
                swapped = true;
                let step = rec
                    .step(format!("Swapping {} and {}", rec.data[j + 1], rec.data[j]))
                    .swapped([j, j + 1]);
                rec.record(step);
            }
        }
        let last = n - 1 - i;
        rec.settle(last, format!("{} is in its final position", rec.data[last]));

        if !swapped {
            break;
        }
    }
}

fn insertion_sort(rec: &mut Recorder) {
    let n = rec.data.len();
    for i in 1..n {
        let key = rec.data[i];
        let step = rec
            .step(format!("Selecting key: {}", key))
            .compared([i])
            .sorted(0..i);
        rec.record(step);

        let mut j = i;
        while j > 0 {
            let step = rec
                .step(format!("Comparing {} and {}", key, rec.data[j - 1]))
                .compared([j - 1, j])
                .sorted(0..i);
            rec.record(step);

            if rec.data[j - 1] <= key {
                break;
            }
            rec.data[j] = rec.data[j - 1];
            let step = rec
                .step(format!("Shifting {}", rec.data[j]))
                .swapped([j - 1, j])
                .sorted(0..i);
            rec.record(step);
            j -= 1;
        }

        rec.data[j] = key;
        let step = rec
            .step(format!("Inserting {}", key))
            .swapped([j])
            .sorted(0..=i);
        rec.record(step);
    }
}

fn selection_sort(rec: &mut Recorder) {
    let n = rec.data.len();
    for i in 0..n.saturating_sub(1) {
        let mut min_idx = i;
        let step = rec
            .step(format!("Finding minimum for pass {}", i + 1))
            .compared([min_idx])
            .sorted(0..i);
        rec.record(step);

        for j in i + 1..n {
            let step = rec
                .step(format!("Comparing {} and {}", rec.data[j], rec.data[min_idx]))
                .compared([j, min_idx])
                .sorted(0..i);
            rec.record(step);

            if rec.data[j] < rec.data[min_idx] {
                min_idx = j;
                let step = rec
                    .step(format!("Found new minimum: {}", rec.data[min_idx]))
                    .compared([min_idx])
                    .sorted(0..i);
                rec.record(step);
            }
        }

        rec.data.swap(i, min_idx);
        let step = rec
            .step(format!("Swapping with position {}", i))
            .swapped([i, min_idx])
            .sorted(0..=i);
        rec.record(step);
    }
}

/// Sort the inclusive range `low..=high`
fn quick_sort(rec: &mut Recorder, low: usize, high: usize) {
    if low == high {
        rec.settle(low, format!("{} is in its final position", rec.data[low]));
        return;
    }
    if low > high {
        return;
    }

    let pivot_index = partition(rec, low, high);
    rec.settle(
        pivot_index,
        format!("Pivot {} is in its final position", rec.data[pivot_index]),
    );

    if pivot_index > low {
        quick_sort(rec, low, pivot_index - 1);
    }
    quick_sort(rec, pivot_index + 1, high);
}

/// Lomuto partition around `data[high]`; returns the pivot's final index
fn partition(rec: &mut Recorder, low: usize, high: usize) -> usize {
    let pivot = rec.data[high];
    let step = rec
        .step(format!("Partitioning. Pivot: {}", pivot))
        .pivot([high]);
    rec.record(step);

    let mut store = low;
    for j in low..high {
        let step = rec
            .step(format!("Comparing {} and {}", rec.data[j], pivot))
            .compared([j, high])
            .pivot([high]);
        rec.record(step);

        if rec.data[j] < pivot {
            rec.data.swap(store, j);
            let step = rec
                .step(format!("Swapping {} and {}", rec.data[store], rec.data[j]))
                .pivot([high])
                .swapped([store, j]);
            rec.record(step);
            store += 1;
        }
    }

    rec.data.swap(store, high);
    let step = rec.step("Placing pivot").swapped([store, high]);
    rec.record(step);
    store
}

/// Sort the inclusive range `left..=right`
fn merge_sort(rec: &mut Recorder, left: usize, right: usize) {
    if left >= right {
        return;
    }
    let mid = left + (right - left) / 2;
    merge_sort(rec, left, mid);
    merge_sort(rec, mid + 1, right);
    merge(rec, left, mid, right);
}

fn merge(rec: &mut Recorder, left: usize, mid: usize, right: usize) {
    let lower: Vec<i32> = rec.data[left..=mid].to_vec();
    let upper: Vec<i32> = rec.data[mid + 1..=right].to_vec();

    let step = SortStep::new(&rec.data, "Merging sub-arrays").compared(left..=right);
    rec.record(step);

    let (mut i, mut j, mut k) = (0, 0, left);
    while i < lower.len() && j < upper.len() {
        let step = SortStep::new(
            &rec.data,
            format!("Comparing {} and {}", lower[i], upper[j]),
        )
        .compared([left + i, mid + 1 + j]);
        rec.record(step);

        // `<=` keeps equal keys in their original order
        if lower[i] <= upper[j] {
            rec.data[k] = lower[i];
            i += 1;
        } else {
            rec.data[k] = upper[j];
            j += 1;
        }
        let step = SortStep::new(&rec.data, format!("Placing {}", rec.data[k])).swapped([k]);
        rec.record(step);
        k += 1;
    }

    for &value in lower[i..].iter().chain(upper[j..].iter()) {
        rec.data[k] = value;
        let step =
            SortStep::new(&rec.data, format!("Placing remaining {}", value)).swapped([k]);
        rec.record(step);
        k += 1;
    }

    let step = SortStep::new(&rec.data, "Sub-array merge complete").sorted(left..=right);
    rec.record(step);
}

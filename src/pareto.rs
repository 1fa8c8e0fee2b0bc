//! Pareto dominance over metric sets.
//!
//! Accuracy is maximized; latency, params and FLOPs are minimized. Failed
//! evaluations carry infinite costs and zero accuracy, so they are dominated
//! by any successful one.

use crate::eval::{Metric, MetricSet};

/// `a` dominates `b` on `objectives`: no worse on all, strictly better on one.
pub fn dominates_on(a: &MetricSet, b: &MetricSet, objectives: &[Metric]) -> bool {
    let mut strictly_better = false;
    for &metric in objectives {
        let (x, y) = (a.get(metric), b.get(metric));
        let (better, worse) = if metric.maximized() {
            (x > y, x < y)
        } else {
            (x < y, x > y)
        };
        if worse {
            return false;
        }
        strictly_better |= better;
    }
    strictly_better
}

/// Dominance on all four metrics.
pub fn dominates(a: &MetricSet, b: &MetricSet) -> bool {
    dominates_on(a, b, &Metric::ALL)
}

/// Indices of the non-dominated entries, in input order.
pub fn pareto_front(metrics: &[MetricSet]) -> Vec<usize> {
    (0..metrics.len())
        .filter(|&i| {
            !metrics
                .iter()
                .enumerate()
                .any(|(j, other)| j != i && dominates(other, &metrics[i]))
        })
        .collect()
}

/// Non-dominated sorting: front index per entry, 0 being the Pareto front.
pub fn pareto_ranks(metrics: &[MetricSet]) -> Vec<usize> {
    let n = metrics.len();
    let mut dominated_by = vec![0usize; n];
    let mut dominating: Vec<Vec<usize>> = vec![Vec::new(); n];
    for i in 0..n {
        for j in 0..n {
            if i != j && dominates(&metrics[i], &metrics[j]) {
                dominating[i].push(j);
                dominated_by[j] += 1;
            }
        }
    }

    let mut ranks = vec![0usize; n];
    let mut front: Vec<usize> = (0..n).filter(|&i| dominated_by[i] == 0).collect();
    let mut rank = 0;
    while !front.is_empty() {
        let mut next = Vec::new();
        for &i in &front {
            ranks[i] = rank;
            for &j in &dominating[i] {
                dominated_by[j] -= 1;
                if dominated_by[j] == 0 {
                    next.push(j);
                }
            }
        }
        front = next;
        rank += 1;
    }
    ranks
}

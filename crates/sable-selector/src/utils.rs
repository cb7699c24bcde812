//! Sequence helpers shared by weaving, nesting and extension.

use std::collections::VecDeque;

/// The longest common subsequence of `list1` and `list2`.
///
/// Two elements are "equal" when `select` returns `Some`; the returned
/// value is what goes into the subsequence. This lets callers merge
/// elements that are compatible without being identical.
pub(crate) fn longest_common_subsequence<T, U>(
    list1: &[T],
    list2: &[T],
    mut select: impl FnMut(&T, &T) -> Option<U>,
) -> Vec<U> {
    let rows = list1.len();
    let cols = list2.len();

    // lengths[i + 1][j + 1] is the LCS length of list1[..=i] and list2[..=j].
    let mut lengths = vec![vec![0_usize; cols + 1]; rows + 1];
    let mut selections: Vec<Vec<Option<U>>> = (0..rows)
        .map(|_| (0..cols).map(|_| None).collect())
        .collect();

    for i in 0..rows {
        for j in 0..cols {
            let selection = select(&list1[i], &list2[j]);
            lengths[i + 1][j + 1] = if selection.is_some() {
                lengths[i][j] + 1
            } else {
                lengths[i + 1][j].max(lengths[i][j + 1])
            };
            selections[i][j] = selection;
        }
    }

    let mut result = Vec::new();
    let (mut i, mut j) = (rows, cols);
    while i > 0 && j > 0 {
        if let Some(selection) = selections[i - 1][j - 1].take() {
            result.push(selection);
            i -= 1;
            j -= 1;
        } else if lengths[i][j - 1] > lengths[i - 1][j] {
            j -= 1;
        } else {
            i -= 1;
        }
    }
    result.reverse();
    result
}

/// Every way of picking one option from each choice, in order.
///
/// `paths([[1, 2], [3, 4], [5]])` is
/// `[[1, 3, 5], [2, 3, 5], [1, 4, 5], [2, 4, 5]]`: later choices vary
/// slowest.
pub(crate) fn paths<T: Clone>(choices: &[Vec<T>]) -> Vec<Vec<T>> {
    choices.iter().fold(vec![Vec::new()], |paths, choice| {
        choice
            .iter()
            .flat_map(|option| {
                paths.iter().map(move |path| {
                    let mut path = path.clone();
                    path.push(option.clone());
                    path
                })
            })
            .collect()
    })
}

/// Interleave `lists` by taking the first element of each, then the
/// second of each, and so on, skipping lists once they run out.
///
/// `[[1, 2, 3], [4, 5], [6, 7, 8]]` flattens to `[1, 4, 6, 2, 5, 7, 3, 8]`.
pub(crate) fn flatten_vertically<T>(lists: Vec<Vec<T>>) -> Vec<T> {
    let mut queues: Vec<VecDeque<T>> = lists.into_iter().map(VecDeque::from).collect();
    if queues.len() == 1 {
        return queues.pop().map(Vec::from).unwrap_or_default();
    }

    let mut result = Vec::new();
    while !queues.is_empty() {
        queues.retain_mut(|queue| {
            if let Some(first) = queue.pop_front() {
                result.push(first);
            }
            !queue.is_empty()
        });
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lcs_of_equal_elements() {
        let lcs = longest_common_subsequence(&[1, 2, 3, 4], &[2, 4, 5], |a, b| (a == b).then_some(*a));
        assert_eq!(lcs, vec![2, 4]);
    }

    #[test]
    fn test_lcs_with_custom_select() {
        // Treat numbers as equal when they share parity and keep their sum.
        let lcs = longest_common_subsequence(&[1, 2], &[3, 4], |a, b| {
            (a % 2 == b % 2).then_some(a + b)
        });
        assert_eq!(lcs, vec![4, 6]);
    }

    #[test]
    fn test_lcs_of_disjoint_lists_is_empty() {
        let lcs = longest_common_subsequence(&["a"], &["b"], |a, b| (a == b).then_some(*a));
        assert!(lcs.is_empty());
        let lcs: Vec<i32> = longest_common_subsequence(&[], &[1], |a: &i32, b| (a == b).then_some(*a));
        assert!(lcs.is_empty());
    }

    #[test]
    fn test_paths_varies_later_choices_slowest() {
        let result = paths(&[vec![1, 2], vec![3, 4], vec![5]]);
        assert_eq!(
            result,
            vec![vec![1, 3, 5], vec![2, 3, 5], vec![1, 4, 5], vec![2, 4, 5]]
        );
    }

    #[test]
    fn test_paths_with_an_empty_choice_is_empty() {
        let result = paths(&[vec![1, 2], Vec::new()]);
        assert!(result.is_empty());
        assert_eq!(paths::<i32>(&[]), vec![Vec::<i32>::new()]);
    }

    #[test]
    fn test_flatten_vertically() {
        let flat = flatten_vertically(vec![vec![1, 2, 3], vec![4, 5], vec![6, 7, 8]]);
        assert_eq!(flat, vec![1, 4, 6, 2, 5, 7, 3, 8]);
        assert_eq!(flatten_vertically(vec![vec![1, 2]]), vec![1, 2]);
        assert!(flatten_vertically(Vec::<Vec<u8>>::new()).is_empty());
    }
}

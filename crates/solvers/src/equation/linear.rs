//! Dense linear solves for Newton updates.

use ndarray::Array2;

/// Solves `a x = b` by LU factorization with partial pivoting.
///
/// Both inputs are consumed and reused as workspace. Returns `None` if `a` is
/// singular to working precision or produces non-finite values.
pub(crate) fn lu_solve(mut a: Array2<f64>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    debug_assert_eq!(a.dim(), (n, n));

    for k in 0..n {
        let (pivot_row, pivot_val) = (k..n)
            .map(|i| (i, a[[i, k]].abs()))
            .fold((k, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });
        if pivot_val == 0.0 || !pivot_val.is_finite() {
            return None;
        }
        if pivot_row != k {
            for j in 0..n {
                a.swap([k, j], [pivot_row, j]);
            }
            b.swap(k, pivot_row);
        }

        let akk = a[[k, k]];
        for i in (k + 1)..n {
            let factor = a[[i, k]] / akk;
            a[[i, k]] = factor;
            for j in (k + 1)..n {
                a[[i, j]] -= factor * a[[k, j]];
            }
            b[i] -= factor * b[k];
        }
    }

    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= a[[i, j]] * b[j];
        }
        b[i] = sum / a[[i, i]];
    }

    b.iter().all(|v| v.is_finite()).then_some(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn solves_full_2x2() {
        // [[3, 2], [1, 4]] x = [5, 6] => x = [0.8, 1.3]
        let x = lu_solve(array![[3.0, 2.0], [1.0, 4.0]], vec![5.0, 6.0]).expect("regular");
        assert_relative_eq!(x[0], 0.8, epsilon = 1e-14);
        assert_relative_eq!(x[1], 1.3, epsilon = 1e-14);
    }

    #[test]
    fn pivots_on_zero_diagonal() {
        // [[0, 1], [2, 0]] x = [3, 4] => x = [2, 3]
        let x = lu_solve(array![[0.0, 1.0], [2.0, 0.0]], vec![3.0, 4.0]).expect("regular");
        assert_relative_eq!(x[0], 2.0);
        assert_relative_eq!(x[1], 3.0);
    }

    #[test]
    fn solves_3x3() {
        let a = array![[2.0, 1.0, -1.0], [-3.0, -1.0, 2.0], [-2.0, 1.0, 2.0]];
        let x = lu_solve(a, vec![8.0, -11.0, -3.0]).expect("regular");
        assert_relative_eq!(x[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 3.0, epsilon = 1e-12);
        assert_relative_eq!(x[2], -1.0, epsilon = 1e-12);
    }

    #[test]
    fn detects_singular_matrix() {
        assert!(lu_solve(array![[1.0, 2.0], [2.0, 4.0]], vec![1.0, 2.0]).is_none());
    }
}

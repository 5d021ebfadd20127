use crate::float_trait::Float;
use crate::models::NPARAMS;

pub(super) enum SolveStatus<T> {
    Solved([T; NPARAMS]),
    Singular,
}

/// Solve the 7x7 damped normal equations by Gaussian elimination with partial pivoting
pub(super) fn solve_normal_equations<T>(
    mut a: [[T; NPARAMS]; NPARAMS],
    mut b: [T; NPARAMS],
) -> SolveStatus<T>
where
    T: Float,
{
    for col in 0..NPARAMS {
        let mut pivot_row = col;
        for row in col + 1..NPARAMS {
            if a[row][col].abs() > a[pivot_row][col].abs() {
                pivot_row = row;
            }
        }
        if !(a[pivot_row][col].abs() > T::zero()) {
            return SolveStatus::Singular;
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in col + 1..NPARAMS {
            let factor = a[row][col] / a[col][col];
            if factor.is_zero() {
                continue;
            }
            for k in col..NPARAMS {
                a[row][k] = a[row][k] - factor * a[col][k];
            }
            b[row] = b[row] - factor * b[col];
        }
    }

    let mut x = [T::zero(); NPARAMS];
    for col in (0..NPARAMS).rev() {
        let mut sum = b[col];
        for k in col + 1..NPARAMS {
            sum = sum - a[col][k] * x[k];
        }
        x[col] = sum / a[col][col];
    }
    SolveStatus::Solved(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn solve_identity() {
        let mut a = [[0.0; NPARAMS]; NPARAMS];
        for (i, row) in a.iter_mut().enumerate() {
            row[i] = 2.0;
        }
        let b = [2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0];
        match solve_normal_equations(a, b) {
            SolveStatus::Solved(x) => {
                assert_relative_eq!(
                    &x[..],
                    &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0][..],
                    epsilon = 1e-12
                );
            }
            SolveStatus::Singular => panic!("diagonal system must be solvable"),
        }
    }

    #[test]
    fn solve_known_system() {
        // a = M^T M + I for a fixed M, so the system is symmetric positive definite
        let mut a = [[0.0; NPARAMS]; NPARAMS];
        let mut desired = [0.0; NPARAMS];
        for i in 0..NPARAMS {
            for j in 0..NPARAMS {
                let m = ((i * NPARAMS + j) % 5) as f64 + 1.0;
                a[i][j] = m;
            }
        }
        let mut ata = [[0.0; NPARAMS]; NPARAMS];
        for i in 0..NPARAMS {
            for j in 0..NPARAMS {
                for k in 0..NPARAMS {
                    ata[i][j] += a[k][i] * a[k][j];
                }
            }
            ata[i][i] += 1.0;
            desired[i] = (i as f64) - 3.0;
        }
        let mut b = [0.0; NPARAMS];
        for i in 0..NPARAMS {
            for j in 0..NPARAMS {
                b[i] += ata[i][j] * desired[j];
            }
        }
        match solve_normal_equations(ata, b) {
            SolveStatus::Solved(x) => {
                assert_relative_eq!(&x[..], &desired[..], epsilon = 1e-9);
            }
            SolveStatus::Singular => panic!("positive definite system must be solvable"),
        }
    }

    #[test]
    fn solve_singular_system() {
        // a zero row and column cannot be eliminated
        let mut a = [[0.0; NPARAMS]; NPARAMS];
        for (i, row) in a.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        a[3][3] = 0.0;
        let b = [1.0; NPARAMS];
        assert!(matches!(
            solve_normal_equations(a, b),
            SolveStatus::Singular
        ));
    }
}

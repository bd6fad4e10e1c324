pub mod properties;

use crate::model::{Cmp, Constraint, LinearExpr, Problem, Sense, Variable};

/// min 3x + 2y s.t. x + 2y >= 8, 3x + y >= 6, x,y >= 0.
pub(crate) fn diet_toy() -> Problem {
    Problem::new(
        "diet-toy",
        Sense::Min,
        LinearExpr::terms(&[("x", 3.0), ("y", 2.0)]),
        vec![
            Variable::continuous("x", Some(0.0), None),
            Variable::continuous("y", Some(0.0), None),
        ],
        vec![
            Constraint::new(
                "c1",
                LinearExpr::terms(&[("x", 1.0), ("y", 2.0)]),
                Cmp::Ge,
                8.0,
            ),
            Constraint::new(
                "c2",
                LinearExpr::terms(&[("x", 3.0), ("y", 1.0)]),
                Cmp::Ge,
                6.0,
            ),
        ],
    )
}

/// max x + y s.t. x + y <= 1, x,y binary.
pub(crate) fn binary_packing() -> Problem {
    Problem::new(
        "binary-packing",
        Sense::Max,
        LinearExpr::terms(&[("x", 1.0), ("y", 1.0)]),
        vec![
            Variable::integer("x", Some(0.0), Some(1.0)),
            Variable::integer("y", Some(0.0), Some(1.0)),
        ],
        vec![Constraint::new(
            "limit",
            LinearExpr::terms(&[("x", 1.0), ("y", 1.0)]),
            Cmp::Le,
            1.0,
        )],
    )
}

/// min x + y s.t. x + y == 4, x - y == 0.
pub(crate) fn balanced_pair() -> Problem {
    Problem::new(
        "balanced-pair",
        Sense::Min,
        LinearExpr::terms(&[("x", 1.0), ("y", 1.0)]),
        vec![
            Variable::continuous("x", Some(0.0), None),
            Variable::continuous("y", Some(0.0), None),
        ],
        vec![
            Constraint::new(
                "balance",
                LinearExpr::terms(&[("x", 1.0), ("y", 1.0)]),
                Cmp::Eq,
                4.0,
            ),
            Constraint::new(
                "symmetry",
                LinearExpr::terms(&[("x", 1.0), ("y", -1.0)]),
                Cmp::Eq,
                0.0,
            ),
        ],
    )
}

/// max x + y s.t. x + y <= 5, x <= 3, y <= 3.
pub(crate) fn shared_cap() -> Problem {
    Problem::new(
        "shared-cap",
        Sense::Max,
        LinearExpr::terms(&[("x", 1.0), ("y", 1.0)]),
        vec![
            Variable::continuous("x", Some(0.0), None),
            Variable::continuous("y", Some(0.0), None),
        ],
        vec![
            Constraint::new(
                "total",
                LinearExpr::terms(&[("x", 1.0), ("y", 1.0)]),
                Cmp::Le,
                5.0,
            ),
            Constraint::new("cap_x", LinearExpr::terms(&[("x", 1.0)]), Cmp::Le, 3.0),
            Constraint::new("cap_y", LinearExpr::terms(&[("y", 1.0)]), Cmp::Le, 3.0),
        ],
    )
}

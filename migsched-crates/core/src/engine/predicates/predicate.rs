use crate::engine::variables::DomainId;

/// An atomic statement about the domain of a single variable. Predicates are both the narrowing
/// operations posted by propagators and the decisions taken by the search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Predicate {
    LowerBound {
        domain_id: DomainId,
        lower_bound: i32,
    },
    UpperBound {
        domain_id: DomainId,
        upper_bound: i32,
    },
    NotEqual {
        domain_id: DomainId,
        not_equal_constant: i32,
    },
    Equal {
        domain_id: DomainId,
        equality_constant: i32,
    },
}

impl Predicate {
    pub fn get_domain(&self) -> DomainId {
        match *self {
            Predicate::LowerBound { domain_id, .. }
            | Predicate::UpperBound { domain_id, .. }
            | Predicate::NotEqual { domain_id, .. }
            | Predicate::Equal { domain_id, .. } => domain_id,
        }
    }

    pub fn get_right_hand_side(&self) -> i32 {
        match *self {
            Predicate::LowerBound { lower_bound, .. } => lower_bound,
            Predicate::UpperBound { upper_bound, .. } => upper_bound,
            Predicate::NotEqual {
                not_equal_constant, ..
            } => not_equal_constant,
            Predicate::Equal {
                equality_constant, ..
            } => equality_constant,
        }
    }
}

impl std::ops::Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Self::Output {
        match self {
            Predicate::LowerBound {
                domain_id,
                lower_bound,
            } => Predicate::UpperBound {
                domain_id,
                upper_bound: lower_bound - 1,
            },
            Predicate::UpperBound {
                domain_id,
                upper_bound,
            } => Predicate::LowerBound {
                domain_id,
                lower_bound: upper_bound + 1,
            },
            Predicate::NotEqual {
                domain_id,
                not_equal_constant,
            } => Predicate::Equal {
                domain_id,
                equality_constant: not_equal_constant,
            },
            Predicate::Equal {
                domain_id,
                equality_constant,
            } => Predicate::NotEqual {
                domain_id,
                not_equal_constant: equality_constant,
            },
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Predicate::LowerBound {
                domain_id,
                lower_bound,
            } => write!(f, "[{domain_id} >= {lower_bound}]"),
            Predicate::UpperBound {
                domain_id,
                upper_bound,
            } => write!(f, "[{domain_id} <= {upper_bound}]"),
            Predicate::NotEqual {
                domain_id,
                not_equal_constant,
            } => write!(f, "[{domain_id} != {not_equal_constant}]"),
            Predicate::Equal {
                domain_id,
                equality_constant,
            } => write!(f, "[{domain_id} == {equality_constant}]"),
        }
    }
}

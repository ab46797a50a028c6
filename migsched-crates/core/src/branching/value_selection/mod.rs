//! Strategies which pick the value a selected variable is fixed to first.
mod in_domain_max;
mod in_domain_min;
mod in_domain_random;
mod value_selector;

pub use in_domain_max::InDomainMax;
pub use in_domain_min::InDomainMin;
pub use in_domain_random::InDomainRandom;
pub use value_selector::ValueSelector;
